//! Creation time from the movie header (`moov/mvhd`) of QuickTime and
//! ISO base media files such as `.mov`, `.mp4` and `.3gp`.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use log::debug;
use std::io::{Read, Seek, SeekFrom};

use crate::timestamp;

/// Box types that may open a file. Anything else is not treated as a movie.
const LEADING_BOXES: [&[u8; 4]; 7] = [
    b"ftyp", b"moov", b"mdat", b"wide", b"free", b"skip", b"pnot",
];

struct BoxRange {
    body: u64,
    end: u64,
}

/// Scans sibling boxes in `start..end` and returns the body of the first one named `kind`.
fn find_box<R>(reader: &mut R, start: u64, end: u64, kind: &[u8; 4]) -> Result<Option<BoxRange>>
where
    R: Read + Seek,
{
    let mut pos = start;
    while end.saturating_sub(pos) >= 8 {
        reader.seek(SeekFrom::Start(pos))?;
        let mut header = [0u8; 8];
        reader.read_exact(&mut header)?;
        let name: [u8; 4] = [header[4], header[5], header[6], header[7]];
        if pos == 0 && !LEADING_BOXES.contains(&&name) {
            return Ok(None);
        }

        let short_size = u32::from_be_bytes([header[0], header[1], header[2], header[3]]);
        let (header_len, size) = match short_size {
            0 => (8, end - pos),
            1 => {
                let mut large = [0u8; 8];
                reader.read_exact(&mut large)?;
                (16, u64::from_be_bytes(large))
            }
            n => (8, u64::from(n)),
        };
        if size < header_len || size > end - pos {
            bail!(
                "box {:?} at offset {pos} has invalid size {size}",
                String::from_utf8_lossy(&name)
            );
        }

        if &name == kind {
            return Ok(Some(BoxRange {
                body: pos + header_len,
                end: pos + size,
            }));
        }
        pos += size;
    }
    Ok(None)
}

/// Reads the movie creation time. Returns `Ok(None)` for files that are not
/// movies, or whose header leaves the creation time unset (zero).
pub fn read_time<R>(reader: &mut R) -> Result<Option<DateTime<Utc>>>
where
    R: Read + Seek,
{
    let len = reader.seek(SeekFrom::End(0))?;
    let Some(moov) = find_box(reader, 0, len, b"moov")? else {
        return Ok(None);
    };
    let mvhd = find_box(reader, moov.body, moov.end, b"mvhd")?.context("movie without mvhd box")?;

    reader.seek(SeekFrom::Start(mvhd.body))?;
    let mut version = [0u8; 4];
    reader.read_exact(&mut version)?;
    let created = match version[0] {
        0 => {
            let mut secs = [0u8; 4];
            reader.read_exact(&mut secs)?;
            u64::from(u32::from_be_bytes(secs))
        }
        1 => {
            let mut secs = [0u8; 8];
            reader.read_exact(&mut secs)?;
            u64::from_be_bytes(secs)
        }
        v => bail!("unsupported mvhd version {v}"),
    };
    debug!("mvhd creation time {created}");

    if created == 0 {
        return Ok(None);
    }
    timestamp::from_mac_epoch(created)
        .map(Some)
        .with_context(|| format!("creation time {created} out of range"))
}
