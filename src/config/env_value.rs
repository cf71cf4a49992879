// ABOUTME: Reads session settings from environment variables.
// ABOUTME: Treats unset and empty variables alike and parses humantime durations.

use crate::error::{Error, Result};
use std::time::Duration;

/// Environment reader over an arbitrary variable lookup.
pub(crate) struct EnvReader<F> {
    lookup: F,
}

impl<F> EnvReader<F>
where
    F: Fn(&str) -> Option<String>,
{
    pub(crate) fn new(lookup: F) -> Self {
        Self { lookup }
    }

    /// Value of `var`, or `None` if it is unset or empty.
    pub(crate) fn optional(&self, var: &str) -> Option<String> {
        (self.lookup)(var).filter(|value| !value.is_empty())
    }

    pub(crate) fn required(&self, var: &str) -> Result<String> {
        self.optional(var)
            .ok_or_else(|| Error::MissingEnvVar(var.to_string()))
    }

    pub(crate) fn duration(&self, var: &str) -> Result<Option<Duration>> {
        self.optional(var)
            .map(|value| {
                humantime::parse_duration(value.trim()).map_err(|e| {
                    Error::InvalidConfig(format!("{var}: invalid duration '{value}': {e}"))
                })
            })
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn reader(vars: &[(&str, &str)]) -> EnvReader<impl Fn(&str) -> Option<String>> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        EnvReader::new(move |var| map.get(var).cloned())
    }

    #[test]
    fn empty_counts_as_unset() {
        let env = reader(&[("DBR_HOST", "")]);
        assert_eq!(env.optional("DBR_HOST"), None);
        assert!(matches!(
            env.required("DBR_HOST"),
            Err(Error::MissingEnvVar(var)) if var == "DBR_HOST"
        ));
    }

    #[test]
    fn parses_humantime_durations() {
        let env = reader(&[("DBR_LOGIN_TIMEOUT", "1m 30s")]);
        assert_eq!(
            env.duration("DBR_LOGIN_TIMEOUT").unwrap(),
            Some(Duration::from_secs(90))
        );
        assert_eq!(env.duration("DBR_PROMPT_TIMEOUT").unwrap(), None);
    }

    #[test]
    fn rejects_malformed_durations() {
        let env = reader(&[("DBR_LOGIN_TIMEOUT", "soon")]);
        let err = env.duration("DBR_LOGIN_TIMEOUT").unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
        assert!(err.to_string().contains("DBR_LOGIN_TIMEOUT"));
    }
}
