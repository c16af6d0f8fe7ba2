//! Access token references: `pass::entry`, `env::VAR` or a literal token.

use std::process::Command;

/// Where a configured token comes from.
#[derive(Debug, PartialEq, Eq)]
enum TokenSource<'a> {
    Pass(&'a str),
    Env(&'a str),
    Literal(&'a str),
}

impl<'a> TokenSource<'a> {
    fn parse(value: &'a str) -> Self {
        if let Some(entry) = value.strip_prefix("pass::") {
            Self::Pass(entry)
        } else if let Some(var) = value.strip_prefix("env::") {
            Self::Env(var)
        } else {
            Self::Literal(value)
        }
    }
}

/// Returns true unless `value` is a literal token.
pub fn is_reference(value: &str) -> bool {
    !matches!(TokenSource::parse(value), TokenSource::Literal(_))
}

/// Returns the token `value` refers to.
pub fn resolve(value: &str) -> Result<String, String> {
    match TokenSource::parse(value) {
        TokenSource::Literal(token) => Ok(token.to_string()),
        TokenSource::Env(var) => std::env::var(var)
            .map_err(|_| format!("access token variable `{}` is not set", var)),
        TokenSource::Pass(entry) => {
            let output = Command::new("pass")
                .args(["show", entry])
                .output()
                .map_err(|e| format!("cannot run pass for `{}`: {}", entry, e))?;
            if !output.status.success() {
                return Err(format!("pass has no token at `{}` ({})", entry, output.status));
            }
            // pass stores the secret on the first line.
            String::from_utf8_lossy(&output.stdout)
                .lines()
                .map(str::trim)
                .find(|line| !line.is_empty())
                .map(str::to_string)
                .ok_or_else(|| format!("pass entry `{}` is empty", entry))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_sources() {
        assert_eq!(TokenSource::parse("pass::work/graph"), TokenSource::Pass("work/graph"));
        assert_eq!(TokenSource::parse("env::GRAPH"), TokenSource::Env("GRAPH"));
        assert_eq!(TokenSource::parse("eyJ0eXAi"), TokenSource::Literal("eyJ0eXAi"));
        assert!(is_reference("env::GRAPH"));
        assert!(!is_reference("eyJ0eXAi"));
    }

    #[test]
    fn literal_is_returned_as_is() {
        assert_eq!(resolve("eyJ0eXAiOiJKV1Qi").unwrap(), "eyJ0eXAiOiJKV1Qi");
    }

    #[test]
    fn env_reference() {
        unsafe {
            std::env::set_var("_ROOMFINDER_SECRET_TEST", "graph-token");
        }
        assert_eq!(resolve("env::_ROOMFINDER_SECRET_TEST").unwrap(), "graph-token");
        unsafe {
            std::env::remove_var("_ROOMFINDER_SECRET_TEST");
        }
        assert!(resolve("env::_ROOMFINDER_SECRET_TEST").unwrap_err().contains("not set"));
    }

    #[test]
    fn missing_pass_entry_errors() {
        assert!(resolve("pass::roomfinder/does/not/exist/12345").is_err());
    }
}
