use std::{ffi::OsString, io, path::PathBuf};

use log::trace;

use crate::{
    expand::{self, ExpandError},
    format::FormatOptions,
};

pub const USAGE: &str = "\
get-item-time [-dateonly] [-timeonly] [-iso] [-datesep <sep>] [-timesep <sep>] [-dtsep <sep>] <filename>
  -dateonly, -do : Only output the date part
  -timeonly, -to : Only output the time part
  -iso           : Use ISO 8601 separators, short for: -datesep \"-\" -dtsep \"T\" -timesep \":\"
                   which yields: YYYY-MM-DDThh:mm:ss
  -datesep, -ds  : Separator between date components (default: \"-\")
  -dtsep, -dts   : Separator between date and time (default: \" \")
  -timesep, -ts  : Separator between time components (default: \":\")
  -h, -help, -?  : Show this help
  <filename>     : The file to get the date from. Relative paths, absolute paths and
                   %VARIABLE% environment references are accepted. Only one file may be given.

Prints when the contents of a file were created: Date Taken for pictures, Media Created
for videos. Options may start with '-' or '/' and are not case sensitive. Separator
options apply in order, so a separator given after -iso overrides it.

The component order is fixed: year month day hour minute second. The year has four
digits, the other components two, zero padded. -dateonly together with -timeonly
prints an empty line.

The result goes to stdout, messages go to stderr. When the file has no creation date,
is missing, or cannot be read, nothing is written to stdout.

Exit codes: 0 date printed, 1 invalid arguments, 2 platform initialization failed,
3 no creation date found, 4 output could not be written, 255 help shown.";

/// Everything needed to perform one lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Request {
    pub path: PathBuf,
    pub format: FormatOptions,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Parsed {
    Proceed(Request),
    Help,
}

#[derive(thiserror::Error, Debug)]
pub enum ParseError {
    #[error("Missing argument for {0}")]
    MissingValue(String),
    #[error("Only one filename allowed. In parameters, found \"{first}\" and also \"{second}\".")]
    DuplicateFilename { first: String, second: String },
    #[error("Failed to expand environment strings in \"{raw}\": {source}")]
    Expansion { raw: String, source: ExpandError },
    #[error("Argument {0:?} is not valid Unicode")]
    NotUnicode(OsString),
    #[error("failed to write diagnostics")]
    Diagnostics(#[from] io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Opt {
    DateOnly,
    TimeOnly,
    Iso,
    Help,
    DateSep,
    TimeSep,
    DateTimeSep,
}

impl Opt {
    fn from_name(name: &str) -> Option<Self> {
        const NAMES: &[(&str, Opt)] = &[
            ("dateonly", Opt::DateOnly),
            ("do", Opt::DateOnly),
            ("timeonly", Opt::TimeOnly),
            ("to", Opt::TimeOnly),
            ("iso", Opt::Iso),
            ("h", Opt::Help),
            ("help", Opt::Help),
            ("?", Opt::Help),
            ("datesep", Opt::DateSep),
            ("ds", Opt::DateSep),
            ("timesep", Opt::TimeSep),
            ("ts", Opt::TimeSep),
            ("dtsep", Opt::DateTimeSep),
            ("dts", Opt::DateTimeSep),
        ];
        NAMES
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, opt)| *opt)
    }
}

enum Token {
    Known(Opt),
    Unknown,
    Filename,
}

fn classify(token: &str) -> Token {
    match token.strip_prefix('-') {
        Some(name) => Opt::from_name(name).map_or(Token::Unknown, Token::Known),
        None => match token.strip_prefix('/') {
            Some(name) => match Opt::from_name(name) {
                Some(opt) => Token::Known(opt),
                // Outside Windows a leading slash is far more likely an absolute path.
                None if cfg!(windows) => Token::Unknown,
                None => Token::Filename,
            },
            None => Token::Filename,
        },
    }
}

/// Expands `%NAME%` references in a filename. Names that are not Unicode
/// are used as given.
fn expand_filename<F>(raw: OsString, env: F) -> Result<PathBuf, ParseError>
where
    F: Fn(&str) -> Option<String>,
{
    match raw.into_string() {
        Ok(text) => match expand::expand(&text, env) {
            Ok(expanded) => Ok(PathBuf::from(expanded)),
            Err(source) => Err(ParseError::Expansion { raw: text, source }),
        },
        Err(raw) => Ok(PathBuf::from(raw)),
    }
}

/// Parses the arguments that follow the program name.
///
/// Unknown options are reported to `diagnostics` and skipped. `env` resolves
/// `%NAME%` references in the filename.
pub fn parse<I, T, F, W>(tokens: I, env: F, mut diagnostics: W) -> Result<Parsed, ParseError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
    F: Fn(&str) -> Option<String>,
    W: io::Write,
{
    let mut tokens = tokens.into_iter().map(Into::<OsString>::into);
    let mut request = Request::default();
    let mut filename: Option<PathBuf> = None;

    while let Some(token) = tokens.next() {
        trace!("argument {token:?}");
        let name = token.to_string_lossy().into_owned();
        let opts = &mut request.format;
        match classify(&name) {
            Token::Known(Opt::DateOnly) => opts.date_only = true,
            Token::Known(Opt::TimeOnly) => opts.time_only = true,
            Token::Known(Opt::Iso) => opts.set_iso(),
            Token::Known(Opt::Help) => return Ok(Parsed::Help),
            Token::Known(opt @ (Opt::DateSep | Opt::TimeSep | Opt::DateTimeSep)) => {
                let value = tokens
                    .next()
                    .ok_or_else(|| ParseError::MissingValue(name.clone()))?
                    .into_string()
                    .map_err(ParseError::NotUnicode)?;
                let field = match opt {
                    Opt::DateSep => &mut opts.date_separator,
                    Opt::TimeSep => &mut opts.time_separator,
                    _ => &mut opts.date_time_separator,
                };
                *field = value;
            }
            Token::Unknown => writeln!(diagnostics, "Unknown option ignored: {name}")?,
            Token::Filename => {
                if let Some(first) = &filename {
                    return Err(ParseError::DuplicateFilename {
                        first: first.display().to_string(),
                        second: name,
                    });
                }
                filename = Some(expand_filename(token, &env)?);
            }
        }
    }

    request.path = filename.unwrap_or_default();
    Ok(Parsed::Proceed(request))
}
