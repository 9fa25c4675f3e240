//! Connection options handed to the driver when a session is opened.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Environment variable holding the ledger's region.
pub const REGION_VAR: &str = "AWS_REGION";

/// Environment variable holding the secret access key.
pub const SECRET_ACCESS_KEY_VAR: &str = "AWS_SECRET_ACCESS_KEY";

/// Connection options for opening ledger sessions.
///
/// Built explicitly, deserialized from a config file, or read from the
/// environment at the program boundary with [`LedgerConfig::from_env`].
/// The executor itself never reads the environment.
///
/// # Example
///
/// ```
/// use ledger_ion_session::LedgerConfig;
///
/// let config = LedgerConfig::new()
///     .with_region("us-east-1")
///     .with_secret_access_key("s3cr3t");
/// assert_eq!(config.region(), Some("us-east-1"));
/// assert!(!format!("{config:?}").contains("s3cr3t"));
/// ```
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LedgerConfig {
    /// Region the ledger lives in.
    #[serde(default)]
    region: Option<String>,

    /// Secret access key used by the driver to sign requests.
    #[serde(default, alias = "secretAccessKey")]
    secret_access_key: Option<String>,
}

impl LedgerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads [`REGION_VAR`] and [`SECRET_ACCESS_KEY_VAR`] from the process
    /// environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds a config from an arbitrary variable lookup. Empty values
    /// count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| lookup(name).filter(|value| !value.is_empty());
        Self {
            region: read(REGION_VAR),
            secret_access_key: read(SECRET_ACCESS_KEY_VAR),
        }
    }

    #[must_use]
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    #[must_use]
    pub fn with_secret_access_key(mut self, key: impl Into<String>) -> Self {
        self.secret_access_key = Some(key.into());
        self
    }

    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    pub fn secret_access_key(&self) -> Option<&str> {
        self.secret_access_key.as_deref()
    }
}

impl fmt::Debug for LedgerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LedgerConfig")
            .field("region", &self.region)
            .field(
                "secret_access_key",
                &self.secret_access_key.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_reads_both_variables() {
        let config = LedgerConfig::from_lookup(|name| match name {
            REGION_VAR => Some("eu-west-1".to_owned()),
            SECRET_ACCESS_KEY_VAR => Some("abc".to_owned()),
            _ => None,
        });
        assert_eq!(config.region(), Some("eu-west-1"));
        assert_eq!(config.secret_access_key(), Some("abc"));
    }

    #[test]
    fn empty_variables_are_unset() {
        let config = LedgerConfig::from_lookup(|_| Some(String::new()));
        assert_eq!(config, LedgerConfig::default());
    }

    #[test]
    fn debug_redacts_secret() {
        let config = LedgerConfig::new().with_secret_access_key("hunter2");
        let debug = format!("{config:?}");
        assert!(debug.contains("<redacted>"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn json_accepts_camel_case_secret() {
        let config: LedgerConfig =
            serde_json::from_str(r#"{"region":"us-east-2","secretAccessKey":"k"}"#).unwrap();
        assert_eq!(config.region(), Some("us-east-2"));
        assert_eq!(config.secret_access_key(), Some("k"));
        assert!(serde_json::from_str::<LedgerConfig>(r#"{"endpoint":"x"}"#).is_err());
    }
}
