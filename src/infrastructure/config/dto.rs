//! Deserialization DTOs for the Ansible-style inventory file.
//!
//! Decouples the on-disk YAML layout (`all.hosts.<name>.ansible_host`,
//! `all.vars.domain`) from the `Inventory` type handed to check suites,
//! so deserialization can't bypass host-name validation.

use std::collections::BTreeMap;
use std::net::Ipv4Addr;

use serde::Deserialize;

use crate::domain::HostName;

/// Top level of `hosts.yml`.
#[derive(Debug, Deserialize)]
pub struct InventoryFile {
    pub all: AllGroup,
}

#[derive(Debug, Deserialize)]
pub struct AllGroup {
    pub hosts: BTreeMap<HostName, HostVars>,
    #[serde(default)]
    pub vars: GroupVars,
}

#[derive(Debug, Deserialize)]
pub struct HostVars {
    /// Management address the execution backend connects to.
    pub ansible_host: Ipv4Addr,
}

#[derive(Debug, Default, Deserialize)]
pub struct GroupVars {
    pub domain: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_inventory() {
        let yaml = r#"
all:
  hosts:
    dns1:
      ansible_host: 192.168.1.2
  vars:
    domain: home.sflab.io
"#;
        let file: InventoryFile = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(file.all.hosts.len(), 1);
        let host = HostName::new("dns1").unwrap();
        assert_eq!(
            file.all.hosts[&host].ansible_host,
            Ipv4Addr::new(192, 168, 1, 2)
        );
        assert_eq!(file.all.vars.domain.as_deref(), Some("home.sflab.io"));
    }

    #[test]
    fn test_vars_are_optional_at_parse_time() {
        let yaml = r#"
all:
  hosts:
    dns1:
      ansible_host: 10.0.0.1
"#;
        let file: InventoryFile = serde_yaml::from_str(yaml).unwrap();
        assert!(file.all.vars.domain.is_none());
    }

    #[test]
    fn test_invalid_host_name_is_rejected() {
        let yaml = r#"
all:
  hosts:
    "bad host":
      ansible_host: 10.0.0.1
"#;
        assert!(serde_yaml::from_str::<InventoryFile>(yaml).is_err());
    }
}
