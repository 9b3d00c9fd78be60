pub mod ddns;
pub mod local;
pub mod platform;
pub mod resolution;
pub mod services;
pub mod sockets;

use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

use crate::domain::HostName;
use crate::infrastructure::config::Settings;
use crate::infrastructure::exec::CommandRunner;

/// Read-only context shared by every check against one host. Built once
/// from the inventory and settings; nothing in a suite mutates it.
pub struct CheckContext<'a> {
    pub host: &'a HostName,
    pub host_ip: Ipv4Addr,
    pub domain: &'a str,
    pub settings: &'a Settings,
    pub runner: &'a dyn CommandRunner,
}

/// The check suites, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Suite {
    Platform,
    Services,
    Sockets,
    Resolution,
    Ddns,
    Local,
}

impl Suite {
    pub const ALL: [Suite; 6] = [
        Suite::Platform,
        Suite::Services,
        Suite::Sockets,
        Suite::Resolution,
        Suite::Ddns,
        Suite::Local,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Platform => "platform",
            Self::Services => "services",
            Self::Sockets => "sockets",
            Self::Resolution => "resolution",
            Self::Ddns => "ddns",
            Self::Local => "local",
        }
    }

    /// Whether the suite probes a remote host (as opposed to the local
    /// resolver).
    pub fn is_remote(&self) -> bool {
        !matches!(self, Self::Local)
    }
}

impl fmt::Display for Suite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Unknown suite '{0}', expected one of: platform, services, sockets, resolution, ddns, local")]
pub struct UnknownSuite(String);

impl FromStr for Suite {
    type Err = UnknownSuite;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Suite::ALL
            .into_iter()
            .find(|suite| suite.name() == s)
            .ok_or_else(|| UnknownSuite(s.to_string()))
    }
}
