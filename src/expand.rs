/// Longest path, in characters, that an expanded filename may have.
pub const MAX_PATH: usize = 260;

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ExpandError {
    #[error("expanded path is {len} characters long, the limit is {MAX_PATH}")]
    TooLong { len: usize },
}

/// Replaces `%NAME%` placeholders with values returned by `lookup`.
///
/// Names that `lookup` does not know, as well as a `%` without a closing
/// partner, are kept verbatim, the same way `ExpandEnvironmentStrings` treats
/// them.
pub fn expand<F>(input: &str, lookup: F) -> Result<String, ExpandError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(start) = rest.find('%') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        match after.find('%') {
            Some(end) => {
                let name = &after[..end];
                match (!name.is_empty()).then(|| lookup(name)).flatten() {
                    Some(value) => {
                        out.push_str(&value);
                        rest = &after[end + 1..];
                    }
                    None => {
                        // The closing `%` may open the next placeholder.
                        out.push('%');
                        out.push_str(name);
                        rest = &after[end..];
                    }
                }
            }
            None => {
                out.push('%');
                rest = after;
            }
        }
    }
    out.push_str(rest);

    let len = out.chars().count();
    if len > MAX_PATH {
        return Err(ExpandError::TooLong { len });
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(name: &str) -> Option<String> {
        match name {
            "PICTURES" => Some("/home/me/Pictures".to_string()),
            "YEAR" => Some("2024".to_string()),
            "EMPTY" => Some(String::new()),
            _ => None,
        }
    }

    #[test]
    fn replaces_known_variables() {
        assert_eq!(
            expand("%PICTURES%/%YEAR%/a.jpg", env).unwrap(),
            "/home/me/Pictures/2024/a.jpg"
        );
        assert_eq!(expand("a%EMPTY%b", env).unwrap(), "ab");
    }

    #[test]
    fn keeps_unknown_and_unmatched() {
        assert_eq!(expand("%NOPE%/a.jpg", env).unwrap(), "%NOPE%/a.jpg");
        assert_eq!(expand("100%", env).unwrap(), "100%");
        assert_eq!(expand("%%", env).unwrap(), "%%");
        assert_eq!(expand("%NOPE%YEAR%", env).unwrap(), "%NOPE2024");
    }

    #[test]
    fn plain_paths_pass_through() {
        assert_eq!(expand("photo.jpg", env).unwrap(), "photo.jpg");
        assert_eq!(expand("", env).unwrap(), "");
    }

    #[test]
    fn rejects_overlong_result() {
        let long = |_: &str| Some("x".repeat(MAX_PATH));
        assert_eq!(
            expand("%LONG%.jpg", long),
            Err(ExpandError::TooLong { len: MAX_PATH + 4 })
        );
        assert!(expand(&"y".repeat(MAX_PATH), env).is_ok());
    }
}
