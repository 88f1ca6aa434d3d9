use anyhow::{anyhow, Context, Result};
use chrono::{
    DateTime, FixedOffset, LocalResult, NaiveDate, NaiveDateTime, Offset, TimeDelta, TimeZone, Utc,
};
use exif::{Exif, In, Tag, Value};
use log::debug;
use std::io::{BufRead, Seek};

/// Date tags in order of preference, each with the tag holding its UTC offset.
const DATE_TAGS: [(Tag, Tag); 2] = [
    (Tag::DateTimeOriginal, Tag::OffsetTimeOriginal),
    (Tag::DateTimeDigitized, Tag::OffsetTimeDigitized),
];

fn ascii<'a>(exif: &'a Exif, tag: Tag) -> Option<&'a [u8]> {
    match &exif.get_field(tag, In::PRIMARY)?.value {
        Value::Ascii(values) => values.first().map(Vec::as_slice),
        _ => None,
    }
}

/// Reads a wall-clock time in `zone`. A time that occurs twice gives the
/// earlier instant. A time skipped by a spring-forward change is read with
/// the offset in force before the change, as a clock left unadjusted shows it.
fn local_instant(naive: &NaiveDateTime, zone: &impl TimeZone) -> Option<DateTime<Utc>> {
    match zone.from_local_datetime(naive) {
        LocalResult::None => {
            let before = zone.offset_from_utc_datetime(&(*naive - TimeDelta::days(1)));
            let before = before.fix().from_local_datetime(naive).single()?;
            Some(before.with_timezone(&Utc))
        }
        resolved => resolved.earliest().map(|dt| dt.with_timezone(&Utc)),
    }
}

fn parse_date(raw: &[u8], offset: Option<&[u8]>, zone: &impl TimeZone) -> Result<DateTime<Utc>> {
    let text = String::from_utf8_lossy(raw);
    let mut date = exif::DateTime::from_ascii(raw)
        .map_err(|e| anyhow!("Failed to parse date: {text}: {e}"))?;
    if let Some(offset) = offset {
        if let Err(e) = date.parse_offset(offset) {
            debug!("ignoring offset {:?}: {e}", String::from_utf8_lossy(offset));
        }
    }

    let naive: NaiveDateTime =
        NaiveDate::from_ymd_opt(date.year.into(), date.month.into(), date.day.into())
            .and_then(|d| d.and_hms_opt(date.hour.into(), date.minute.into(), date.second.into()))
            .with_context(|| format!("Date out of range: {text}"))?;

    let instant = match date.offset {
        Some(minutes) => FixedOffset::east_opt(i32::from(minutes) * 60)
            .and_then(|offset| offset.from_local_datetime(&naive).single())
            .map(|dt| dt.with_timezone(&Utc)),
        // Without an offset the camera clock is taken to be in `zone`.
        None => local_instant(&naive, zone),
    };
    instant.with_context(|| format!("Date out of range for its time zone: {text}"))
}

/// Reads when the picture was taken from its EXIF data.
///
/// Returns `Ok(None)` when the container has no EXIF block or the block has
/// no capture date.
pub fn read_time<R, Tz>(reader: &mut R, zone: &Tz) -> Result<Option<DateTime<Utc>>>
where
    R: BufRead + Seek,
    Tz: TimeZone,
{
    let exif = match exif::Reader::new().read_from_container(reader) {
        Ok(exif) => exif,
        Err(e) => {
            debug!("no EXIF data: {e}");
            return Ok(None);
        }
    };
    DATE_TAGS
        .iter()
        .find_map(|&(tag, offset_tag)| {
            ascii(&exif, tag).map(|raw| {
                debug!("using EXIF {tag}");
                parse_date(raw, ascii(&exif, offset_tag), zone)
            })
        })
        .transpose()
}
