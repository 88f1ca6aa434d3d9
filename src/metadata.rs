use anyhow::{Context, Result};
use chrono::{DateTime, Local, TimeZone, Utc};
use log::debug;
use std::{
    fs,
    io::{BufReader, Seek},
    path::Path,
};

use crate::{photo, quicktime};

/// Anything that can tell when a file's contents were created.
///
/// Implementations never fail: every problem, from a missing file to a
/// corrupted header, is reported as `None`.
pub trait TimestampSource {
    fn creation_time(&self, path: &Path) -> Option<DateTime<Utc>>;
}

impl<S: TimestampSource + ?Sized> TimestampSource for &S {
    fn creation_time(&self, path: &Path) -> Option<DateTime<Utc>> {
        (**self).creation_time(path)
    }
}

/// Reads capture dates straight from the file: EXIF for pictures, the movie
/// header for QuickTime and MP4 videos.
#[derive(Debug, Clone)]
pub struct MediaMetadata<Tz = Local> {
    /// Zone assumed for EXIF dates that carry no offset.
    zone: Tz,
}

impl Default for MediaMetadata {
    fn default() -> Self {
        Self { zone: Local }
    }
}

impl<Tz: TimeZone> MediaMetadata<Tz> {
    pub fn with_zone(zone: Tz) -> Self {
        Self { zone }
    }

    fn read(&self, path: &Path) -> Result<Option<DateTime<Utc>>> {
        // The handle lives until the end of this call, whatever the outcome.
        let file = fs::File::open(path).with_context(|| format!("Path: {path:?}"))?;
        let mut reader = BufReader::new(file);

        if let Some(created) = photo::read_time(&mut reader, &self.zone)? {
            return Ok(Some(created));
        }
        reader.rewind()?;
        quicktime::read_time(&mut reader)
    }
}

impl<Tz: TimeZone> TimestampSource for MediaMetadata<Tz> {
    fn creation_time(&self, path: &Path) -> Option<DateTime<Utc>> {
        self.read(path).unwrap_or_else(|e| {
            debug!("{path:?}: {e:#}");
            None
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::FixedOffset;
    use exif::Tag;
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn reads_photos_and_movies() -> Result<()> {
        let dir = tempdir()?;
        let photo = dir.path().join("IMG_0001.tif");
        fs::write(
            &photo,
            photo::tests::tiff(&[(Tag::DateTimeOriginal, "2024:03:05 14:07:09")]),
        )?;
        let movie = dir.path().join("MOV_0001.mp4");
        fs::write(&movie, quicktime::tests::mp4(3_792_492_429))?;

        let source = MediaMetadata::with_zone(Utc);
        let expected = Utc.with_ymd_and_hms(2024, 3, 5, 14, 7, 9).single();
        assert_eq!(source.creation_time(&photo), expected);
        assert_eq!(source.creation_time(&movie), expected);

        let tokyo = MediaMetadata::with_zone(FixedOffset::east_opt(9 * 3600).unwrap());
        assert_eq!(
            tokyo.creation_time(&photo),
            Utc.with_ymd_and_hms(2024, 3, 5, 5, 7, 9).single()
        );
        // Movie headers are always UTC.
        assert_eq!(tokyo.creation_time(&movie), expected);
        Ok(())
    }

    #[test]
    fn failures_collapse_to_none() -> Result<()> {
        let dir = tempdir()?;
        let source = MediaMetadata::with_zone(Utc);

        assert_eq!(source.creation_time(&dir.path().join("missing.jpg")), None);
        assert_eq!(source.creation_time(dir.path()), None);
        assert_eq!(source.creation_time(Path::new("")), None);

        let text = dir.path().join("notes.txt");
        fs::write(&text, "nothing to see here")?;
        assert_eq!(source.creation_time(&text), None);

        let broken = dir.path().join("broken.jpg");
        fs::write(
            &broken,
            photo::tests::tiff(&[(Tag::DateTimeOriginal, "not a date at all!!")]),
        )?;
        assert_eq!(source.creation_time(&broken), None);
        Ok(())
    }
}
