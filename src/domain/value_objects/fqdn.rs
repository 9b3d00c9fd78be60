use std::fmt;

use super::HostName;

/// A fully qualified domain name, stored without a trailing dot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fqdn(String);

#[derive(Debug, thiserror::Error)]
pub enum FqdnError {
    #[error("FQDN must contain at least two labels, got: {0}")]
    TooFewLabels(String),

    #[error("FQDN contains an empty label: {0}")]
    EmptyLabel(String),

    #[error("FQDN contains invalid characters: {0}")]
    InvalidCharacters(String),
}

impl Fqdn {
    pub fn new(name: impl Into<String>) -> Result<Self, FqdnError> {
        let name = name.into().to_lowercase();
        let name = name.strip_suffix('.').unwrap_or(&name).to_string();

        let labels: Vec<&str> = name.split('.').collect();
        if labels.len() < 2 {
            return Err(FqdnError::TooFewLabels(name));
        }

        for label in &labels {
            if label.is_empty() {
                return Err(FqdnError::EmptyLabel(name));
            }
            if !label
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-')
                || label.starts_with('-')
                || label.ends_with('-')
            {
                return Err(FqdnError::InvalidCharacters(name));
            }
        }

        Ok(Self(name))
    }

    /// Join a host name onto a zone, e.g. `dns1` + `home.sflab.io`.
    pub fn from_parts(host: &HostName, zone: &str) -> Result<Self, FqdnError> {
        Self::new(format!("{}.{}", host, zone))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The name with a trailing dot, as zone files and nsupdate want it.
    pub fn rooted(&self) -> String {
        format!("{}.", self.0)
    }
}

impl fmt::Display for Fqdn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
