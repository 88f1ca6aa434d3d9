use chrono::{DateTime, Utc};

/// Seconds between 1601-01-01 and 1970-01-01.
const FILETIME_UNIX_OFFSET: i64 = 11_644_473_600;
const FILETIME_TICKS_PER_SECOND: u64 = 10_000_000;

/// Seconds between 1904-01-01 and 1970-01-01.
const MAC_UNIX_OFFSET: i64 = 2_082_844_800;

/// Converts a Windows FILETIME (100 ns ticks since 1601-01-01 UTC).
pub fn from_filetime(ticks: u64) -> Option<DateTime<Utc>> {
    let secs = i64::try_from(ticks / FILETIME_TICKS_PER_SECOND).ok()? - FILETIME_UNIX_OFFSET;
    let nanos = u32::try_from(ticks % FILETIME_TICKS_PER_SECOND).ok()? * 100;
    DateTime::from_timestamp(secs, nanos)
}

/// Converts seconds since 1904-01-01 UTC, the epoch of QuickTime and MP4 headers.
pub fn from_mac_epoch(secs: u64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(i64::try_from(secs).ok()? - MAC_UNIX_OFFSET, 0)
}

#[cfg(test)]
mod tests {
    use chrono::{TimeDelta, TimeZone};

    use super::*;

    #[test]
    fn filetime() {
        assert_eq!(
            from_filetime(0),
            Some(Utc.with_ymd_and_hms(1601, 1, 1, 0, 0, 0).unwrap())
        );
        assert_eq!(
            from_filetime(116_444_736_000_000_000),
            Some(DateTime::UNIX_EPOCH)
        );
        // 2024-03-05T14:07:09.5Z
        let ts = from_filetime(133_541_212_295_000_000).unwrap();
        assert_eq!(
            ts,
            Utc.with_ymd_and_hms(2024, 3, 5, 14, 7, 9).unwrap() + TimeDelta::milliseconds(500)
        );
    }

    #[test]
    fn mac_epoch() {
        assert_eq!(
            from_mac_epoch(0),
            Some(Utc.with_ymd_and_hms(1904, 1, 1, 0, 0, 0).unwrap())
        );
        assert_eq!(from_mac_epoch(2_082_844_800), Some(DateTime::UNIX_EPOCH));
        assert_eq!(
            from_mac_epoch(3_792_492_429),
            Some(Utc.with_ymd_and_hms(2024, 3, 5, 14, 7, 9).unwrap())
        );
        assert_eq!(from_mac_epoch(u64::MAX), None);
    }
}
