use std::fmt;

/// A short inventory host name (a single DNS label, e.g. `dns1`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HostName(String);

#[derive(Debug, thiserror::Error)]
pub enum HostNameError {
    #[error("Host name cannot be empty")]
    Empty,

    #[error("Host name contains invalid characters: {0}")]
    InvalidCharacters(String),

    #[error("Host name cannot start or end with a hyphen: {0}")]
    HyphenAtEdge(String),
}

impl HostName {
    pub fn new(name: impl Into<String>) -> Result<Self, HostNameError> {
        let name = name.into().to_lowercase();

        if name.is_empty() {
            return Err(HostNameError::Empty);
        }

        if !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-')
        {
            return Err(HostNameError::InvalidCharacters(name));
        }

        if name.starts_with('-') || name.ends_with('-') {
            return Err(HostNameError::HyphenAtEdge(name));
        }

        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::str::FromStr for HostName {
    type Err = HostNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HostName::new(s)
    }
}

impl fmt::Display for HostName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl serde::Serialize for HostName {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for HostName {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        HostName::new(s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_host_names() {
        assert!(HostName::new("dns1").is_ok());
        assert!(HostName::new("ns-2").is_ok());
        assert!(HostName::new("DNS1").is_ok()); // Should lowercase
        assert_eq!(HostName::new("DNS1").unwrap().as_str(), "dns1");
    }

    #[test]
    fn test_invalid_host_names() {
        assert!(HostName::new("").is_err());
        assert!(HostName::new("dns 1").is_err()); // Space
        assert!(HostName::new("dns.1").is_err()); // Dot: not a single label
        assert!(HostName::new("-dns1").is_err()); // Starts with hyphen
        assert!(HostName::new("dns1-").is_err()); // Ends with hyphen
        assert!(HostName::new("dns_1").is_err()); // Underscore
    }
}
