use chrono::{DateTime, Datelike, Local, TimeZone, Timelike, Utc};

/// How a timestamp is rendered. Component order is always year, month, day,
/// hour, minute, second.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatOptions {
    pub date_only: bool,
    pub time_only: bool,
    pub date_separator: String,
    pub time_separator: String,
    pub date_time_separator: String,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            date_only: false,
            time_only: false,
            date_separator: "-".to_string(),
            time_separator: ":".to_string(),
            date_time_separator: " ".to_string(),
        }
    }
}

impl FormatOptions {
    /// Switches all three separators to ISO 8601: `YYYY-MM-DDThh:mm:ss`.
    pub fn set_iso(&mut self) {
        self.date_separator = "-".to_string();
        self.date_time_separator = "T".to_string();
        self.time_separator = ":".to_string();
    }
}

/// Renders `ts` in the host's local time zone, or returns an empty string
/// when there is no timestamp.
pub fn format(ts: Option<&DateTime<Utc>>, opts: &FormatOptions) -> String {
    format_in(ts, opts, &Local)
}

/// Same as [`format`] but converts into `zone`. The offset is resolved for
/// the instant itself, so daylight saving follows the date being printed.
pub fn format_in<Tz: TimeZone>(
    ts: Option<&DateTime<Utc>>,
    opts: &FormatOptions,
    zone: &Tz,
) -> String {
    let Some(ts) = ts else {
        return String::new();
    };
    let local = ts.with_timezone(zone);

    let date = format!(
        "{:04}{sep}{:02}{sep}{:02}",
        local.year(),
        local.month(),
        local.day(),
        sep = opts.date_separator
    );
    let time = format!(
        "{:02}{sep}{:02}{sep}{:02}",
        local.hour(),
        local.minute(),
        local.second(),
        sep = opts.time_separator
    );
    match (opts.date_only, opts.time_only) {
        (true, true) => String::new(),
        (true, false) => date,
        (false, true) => time,
        (false, false) => format!("{date}{}{time}", opts.date_time_separator),
    }
}
