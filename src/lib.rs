pub mod cli;
pub mod expand;
pub mod format;
pub mod metadata;
mod photo;
mod quicktime;
pub mod session;
#[cfg(windows)]
pub mod shell;
pub mod timestamp;

use anyhow::Result;
use chrono::{Local, TimeZone};
use std::{env, ffi::OsString, io, path, process::ExitCode};

use crate::{
    cli::{ParseError, Parsed},
    metadata::TimestampSource,
    session::Session,
};

/// Where the host keeps creation dates.
#[cfg(windows)]
pub type SystemSource = shell::PropertyStore;
/// Where the host keeps creation dates.
#[cfg(not(windows))]
pub type SystemSource = metadata::MediaMetadata;

/// How a run ended. Each variant has its own exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The date was written to stdout.
    Printed,
    InvalidArguments,
    InitFailed,
    /// The file has no readable creation date.
    NotFound,
    WriteFailed,
    HelpShown,
}

impl Outcome {
    pub fn code(self) -> u8 {
        match self {
            Outcome::Printed => 0,
            Outcome::InvalidArguments => 1,
            Outcome::InitFailed => 2,
            Outcome::NotFound => 3,
            Outcome::WriteFailed => 4,
            // -1 on hosts with signed exit codes.
            Outcome::HelpShown => 255,
        }
    }
}

impl From<Outcome> for ExitCode {
    fn from(outcome: Outcome) -> Self {
        ExitCode::from(outcome.code())
    }
}

/// Runs the tool against the host's metadata service and local time zone.
/// `args` starts with the program name.
pub fn run<I, T, WStd, WErr>(args: I, std: WStd, mut err: WErr) -> Result<Outcome>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
    WStd: io::Write,
    WErr: io::Write,
{
    let _session = match Session::start() {
        Ok(session) => session,
        Err(e) => {
            writeln!(err, "{e}")?;
            return Ok(Outcome::InitFailed);
        }
    };
    run_with(args, &SystemSource::default(), &Local, std, err)
}

/// The whole pipeline with its collaborators passed in: parse `args`, ask
/// `source` for the creation time and print it in `zone`.
pub fn run_with<I, T, S, Tz, WStd, WErr>(
    args: I,
    source: &S,
    zone: &Tz,
    mut std: WStd,
    mut err: WErr,
) -> Result<Outcome>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
    S: TimestampSource + ?Sized,
    Tz: TimeZone,
    WStd: io::Write,
    WErr: io::Write,
{
    let lookup = |name: &str| env::var(name).ok();
    let request = match cli::parse(args.into_iter().skip(1), lookup, &mut err) {
        Ok(Parsed::Proceed(request)) => request,
        Ok(Parsed::Help) => {
            writeln!(err, "{}", cli::USAGE)?;
            return Ok(Outcome::HelpShown);
        }
        Err(ParseError::Diagnostics(e)) => return Err(e.into()),
        Err(e) => {
            writeln!(err, "{e}")?;
            return Ok(Outcome::InvalidArguments);
        }
    };

    let path = request.path.as_path();
    match source.creation_time(path) {
        Some(created) => {
            let line = format::format_in(Some(&created), &request.format, zone);
            writeln!(std, "{line}")?;
            std.flush()?;
            Ok(Outcome::Printed)
        }
        None => {
            let shown = path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
            writeln!(err, "Failed to get item date for \"{}\".", shown.display())?;
            Ok(Outcome::NotFound)
        }
    }
}
