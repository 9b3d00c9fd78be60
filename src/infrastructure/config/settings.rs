//! Per-role settings, merged from every YAML file in a group_vars
//! directory. Each file contributes top-level keys (`adguard`, `bind9`,
//! `unbound`, `platform`, `resolution`, `ddns`); defining the same key
//! in two files is an error rather than a silent override.

use std::collections::BTreeMap;
use std::fs;
use std::net::Ipv4Addr;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_yaml::Value;

use super::ConfigError;
use crate::domain::{Fqdn, HostName};

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Inventory hosts the remote suites run against. The rest of the
    /// inventory only participates in the local resolution suite.
    pub dns_hosts: Vec<HostName>,
    pub adguard: AdguardSettings,
    pub bind9: ServiceSettings,
    pub unbound: ServiceSettings,
    pub platform: PlatformSettings,
    pub resolution: ResolutionSettings,
    pub ddns: DdnsSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            dns_hosts: vec![HostName::new("dns1").expect("static host name")],
            adguard: AdguardSettings::default(),
            bind9: ServiceSettings::with_primary(5353),
            unbound: ServiceSettings::with_primary(5335),
            platform: PlatformSettings::default(),
            resolution: ResolutionSettings::default(),
            ddns: DdnsSettings::default(),
        }
    }
}

impl Settings {
    /// Merge every `*.yml`/`*.yaml` file under `dir`. An empty or absent
    /// directory yields the defaults.
    pub fn load(dir: &Path) -> Result<Self, ConfigError> {
        if !dir.exists() {
            return Ok(Self::default());
        }

        let mut files: Vec<PathBuf> = fs::read_dir(dir)
            .map_err(|source| ConfigError::ReadError {
                path: dir.to_path_buf(),
                source,
            })?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                matches!(
                    path.extension().and_then(|e| e.to_str()),
                    Some("yml") | Some("yaml")
                )
            })
            .collect();
        files.sort();

        let mut merged = serde_yaml::Mapping::new();
        let mut origins: BTreeMap<String, PathBuf> = BTreeMap::new();

        for path in files {
            let content = fs::read_to_string(&path).map_err(|source| ConfigError::ReadError {
                path: path.clone(),
                source,
            })?;

            // Skip empty files; Ansible treats them as valid no-ops.
            if content.trim().is_empty() {
                continue;
            }

            let value: Value =
                serde_yaml::from_str(&content).map_err(|source| ConfigError::ParseError {
                    path: path.clone(),
                    source,
                })?;

            let Value::Mapping(mapping) = value else {
                continue;
            };

            for (key, val) in mapping {
                // Settings keys are plain strings; anything else can't
                // name a section and is dropped the way serde would
                // drop an unknown field.
                let Some(key_str) = key.as_str().map(str::to_string) else {
                    continue;
                };
                if let Some(first) = origins.get(&key_str) {
                    return Err(ConfigError::DuplicateKey {
                        key: key_str,
                        first: first.clone(),
                        second: path.clone(),
                    });
                }
                origins.insert(key_str, path.clone());
                merged.insert(key, val);
            }
        }

        serde_yaml::from_value(Value::Mapping(merged)).map_err(|source| ConfigError::ParseError {
            path: dir.to_path_buf(),
            source,
        })
    }
}

/// Port map for a service, keyed by role (e.g. `primary`).
#[derive(Debug, Deserialize)]
pub struct ServiceSettings {
    pub ports: BTreeMap<String, u16>,
}

impl ServiceSettings {
    fn with_primary(port: u16) -> Self {
        let mut ports = BTreeMap::new();
        ports.insert("primary".to_string(), port);
        Self { ports }
    }

    pub fn port(&self, service: &str, role: &str) -> Result<u16, ConfigError> {
        self.ports
            .get(role)
            .copied()
            .ok_or_else(|| ConfigError::UnknownRole {
                service: service.to_string(),
                role: role.to_string(),
            })
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct AdguardSettings {
    pub ports: BTreeMap<String, u16>,
    /// Admin UI, bound to loopback only.
    pub web_ui_port: u16,
}

impl Default for AdguardSettings {
    fn default() -> Self {
        let mut ports = BTreeMap::new();
        ports.insert("primary".to_string(), 53);
        Self {
            ports,
            web_ui_port: 3000,
        }
    }
}

impl AdguardSettings {
    pub fn port(&self, role: &str) -> Result<u16, ConfigError> {
        self.ports
            .get(role)
            .copied()
            .ok_or_else(|| ConfigError::UnknownRole {
                service: "adguard".to_string(),
                role: role.to_string(),
            })
    }
}

/// Expected operating system of a DNS host.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PlatformSettings {
    pub distribution: String,
    pub release: String,
}

impl Default for PlatformSettings {
    fn default() -> Self {
        Self {
            distribution: "ubuntu".to_string(),
            release: "24.04".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ResolutionSettings {
    /// Record names (relative to the zone) the internal suite resolves.
    pub internal_records: Vec<HostName>,
    /// External name used to exercise recursive resolution.
    pub external_probe: String,
}

impl Default for ResolutionSettings {
    fn default() -> Self {
        let records = ["ns1", "ns2", "adguard", "proxmox"]
            .iter()
            .map(|name| HostName::new(*name).expect("static host name"))
            .collect();
        Self {
            internal_records: records,
            external_probe: "google.com".to_string(),
        }
    }
}

impl ResolutionSettings {
    pub fn external_probe(&self) -> Result<Fqdn, ConfigError> {
        Fqdn::new(&self.external_probe).map_err(|_| ConfigError::InvalidValue {
            field: "resolution.external_probe".to_string(),
            value: self.external_probe.clone(),
        })
    }
}

/// Parameters of the dynamic-update check. The shared secret itself is
/// never stored here; it comes from the environment at run time.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DdnsSettings {
    pub key_name: String,
    pub algorithm: String,
    /// Record name (relative to the zone) created and deleted by the check.
    pub probe_record: HostName,
    pub ttl: u32,
    /// Address written into the probe record, from the documentation range.
    pub probe_address: Ipv4Addr,
}

impl Default for DdnsSettings {
    fn default() -> Self {
        Self {
            key_name: "ddns-key".to_string(),
            algorithm: "hmac-sha256".to_string(),
            probe_record: HostName::new("dnscheck-probe").expect("static host name"),
            ttl: 60,
            probe_address: Ipv4Addr::new(192, 0, 2, 53),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_values() {
        let settings = Settings::default();
        assert_eq!(settings.adguard.port("primary").unwrap(), 53);
        assert_eq!(settings.bind9.port("bind9", "primary").unwrap(), 5353);
        assert_eq!(settings.unbound.port("unbound", "primary").unwrap(), 5335);
        assert_eq!(settings.adguard.web_ui_port, 3000);
        assert_eq!(settings.platform.distribution, "ubuntu");
        assert_eq!(settings.platform.release, "24.04");
    }

    #[test]
    fn test_unknown_role_is_an_error() {
        let settings = Settings::default();
        let err = settings.adguard.port("secondary").unwrap_err();
        assert!(err.to_string().contains("secondary"));
    }

    #[test]
    fn test_load_merges_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("adguard.yml"),
            "adguard:\n  ports:\n    primary: 53\n  web_ui_port: 3000\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("bind9.yml"),
            "bind9:\n  ports:\n    primary: 5353\n    secondary: 5354\n",
        )
        .unwrap();

        let settings = Settings::load(dir.path()).unwrap();
        assert_eq!(settings.bind9.port("bind9", "secondary").unwrap(), 5354);
        // Keys absent from the directory fall back to defaults.
        assert_eq!(settings.unbound.port("unbound", "primary").unwrap(), 5335);
    }

    #[test]
    fn test_duplicate_key_across_files_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.yml"), "bind9:\n  ports:\n    primary: 1\n").unwrap();
        fs::write(dir.path().join("b.yml"), "bind9:\n  ports:\n    primary: 2\n").unwrap();

        let err = Settings::load(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateKey { .. }));
    }

    #[test]
    fn test_non_string_keys_are_skipped_not_conflated() {
        let dir = tempfile::tempdir().unwrap();
        // Two files with (distinct) non-string top-level keys must not
        // collide with each other, and must not disturb real sections.
        fs::write(dir.path().join("a.yml"), "1: ignored\n").unwrap();
        fs::write(
            dir.path().join("b.yml"),
            "2: ignored\nbind9:\n  ports:\n    primary: 5353\n",
        )
        .unwrap();

        let settings = Settings::load(dir.path()).unwrap();
        assert_eq!(settings.bind9.port("bind9", "primary").unwrap(), 5353);
    }

    #[test]
    fn test_absent_directory_yields_defaults() {
        let settings = Settings::load(Path::new("/nonexistent/group_vars")).unwrap();
        assert_eq!(settings.adguard.port("primary").unwrap(), 53);
    }

    #[test]
    fn test_empty_files_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("empty.yml"), "").unwrap();
        let settings = Settings::load(dir.path()).unwrap();
        assert_eq!(settings.platform.distribution, "ubuntu");
    }
}
