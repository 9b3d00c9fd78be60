mod dto;
mod settings;

pub use settings::{DdnsSettings, PlatformSettings, ResolutionSettings, Settings};

use std::collections::BTreeMap;
use std::fs;
use std::net::Ipv4Addr;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::domain::HostName;
use dto::InventoryFile;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("Inventory {path} does not define 'all.vars.domain'")]
    MissingDomain { path: PathBuf },

    #[error("Inventory {path} defines no hosts")]
    NoHosts { path: PathBuf },

    #[error("Host not found in inventory: {0}")]
    HostNotFound(String),

    #[error("Unknown {service} role: {role}")]
    UnknownRole { service: String, role: String },

    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    #[error("Settings key '{key}' defined in both {first} and {second}")]
    DuplicateKey {
        key: String,
        first: PathBuf,
        second: PathBuf,
    },
}

/// The read-only host inventory: name → management IP, plus the internal
/// zone name. Loaded once at startup and shared by every suite.
#[derive(Debug)]
pub struct Inventory {
    hosts: BTreeMap<HostName, Ipv4Addr>,
    domain: String,
}

impl Inventory {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;

        let file: InventoryFile =
            serde_yaml::from_str(&content).map_err(|source| ConfigError::ParseError {
                path: path.to_path_buf(),
                source,
            })?;

        let domain = file
            .all
            .vars
            .domain
            .ok_or_else(|| ConfigError::MissingDomain {
                path: path.to_path_buf(),
            })?;

        if file.all.hosts.is_empty() {
            return Err(ConfigError::NoHosts {
                path: path.to_path_buf(),
            });
        }

        let hosts = file
            .all
            .hosts
            .into_iter()
            .map(|(name, vars)| (name, vars.ansible_host))
            .collect();

        Ok(Self { hosts, domain })
    }

    pub fn host_ip(&self, name: &HostName) -> Result<Ipv4Addr, ConfigError> {
        self.hosts
            .get(name)
            .copied()
            .ok_or_else(|| ConfigError::HostNotFound(name.to_string()))
    }

    pub fn host_names(&self) -> impl Iterator<Item = &HostName> {
        self.hosts.keys()
    }

    pub fn contains(&self, name: &HostName) -> bool {
        self.hosts.contains_key(name)
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_inventory(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_inventory() {
        let file = write_inventory(
            r#"
all:
  hosts:
    dns1:
      ansible_host: 192.168.1.2
    dns2:
      ansible_host: 192.168.1.3
  vars:
    domain: home.sflab.io
"#,
        );

        let inventory = Inventory::load(file.path()).unwrap();
        assert_eq!(inventory.domain(), "home.sflab.io");
        assert_eq!(inventory.host_names().count(), 2);

        let dns1 = HostName::new("dns1").unwrap();
        assert_eq!(
            inventory.host_ip(&dns1).unwrap(),
            Ipv4Addr::new(192, 168, 1, 2)
        );
    }

    #[test]
    fn test_unknown_host_is_an_error() {
        let file = write_inventory(
            r#"
all:
  hosts:
    dns1:
      ansible_host: 192.168.1.2
  vars:
    domain: home.sflab.io
"#,
        );

        let inventory = Inventory::load(file.path()).unwrap();
        let missing = HostName::new("dns9").unwrap();
        let err = inventory.host_ip(&missing).unwrap_err();
        assert!(matches!(err, ConfigError::HostNotFound(_)));
    }

    #[test]
    fn test_missing_domain_is_an_error() {
        let file = write_inventory(
            r#"
all:
  hosts:
    dns1:
      ansible_host: 192.168.1.2
"#,
        );

        let err = Inventory::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::MissingDomain { .. }));
    }

    #[test]
    fn test_empty_hosts_is_an_error() {
        let file = write_inventory(
            r#"
all:
  hosts: {}
  vars:
    domain: home.sflab.io
"#,
        );

        let err = Inventory::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::NoHosts { .. }));
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = Inventory::load(Path::new("/nonexistent/hosts.yml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/hosts.yml"));
    }
}
