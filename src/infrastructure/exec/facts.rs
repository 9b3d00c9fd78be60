//! Read-only facts about a host, gathered through the command runner:
//! operating system, systemd unit state, listening sockets.

use std::net::IpAddr;

use super::{CommandRunner, ExecError};
use crate::domain::{Protocol, SocketSpec};

/// Distribution and release, from `/etc/os-release`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemInfo {
    pub distribution: String,
    pub release: String,
}

/// Systemd unit state as reported by `is-enabled` / `is-active`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceState {
    pub enabled: bool,
    pub running: bool,
}

/// Fact queries against one host. Borrows the runner; holds no state of
/// its own beyond the connection target.
pub struct RemoteHost<'a> {
    runner: &'a dyn CommandRunner,
}

impl<'a> RemoteHost<'a> {
    pub fn new(runner: &'a dyn CommandRunner) -> Self {
        Self { runner }
    }

    pub fn system_info(&self) -> Result<SystemInfo, ExecError> {
        let out = self.runner.run("cat /etc/os-release")?;
        if !out.success() {
            return Err(ExecError::CommandFailed {
                command: "cat /etc/os-release".to_string(),
                target: self.runner.target().to_string(),
                detail: out.detail(),
            });
        }
        parse_os_release(&out.stdout).ok_or_else(|| ExecError::CommandFailed {
            command: "cat /etc/os-release".to_string(),
            target: self.runner.target().to_string(),
            detail: "missing ID or VERSION_ID field".to_string(),
        })
    }

    /// `is-enabled`/`is-active` exit non-zero for disabled/inactive
    /// units, so only a spawn failure is an error here.
    pub fn service(&self, name: &str) -> Result<ServiceState, ExecError> {
        let enabled = self
            .runner
            .run(&format!("systemctl is-enabled {}", name))?;
        let active = self.runner.run(&format!("systemctl is-active {}", name))?;

        Ok(ServiceState {
            enabled: enabled.stdout.trim() == "enabled",
            running: active.stdout.trim() == "active",
        })
    }

    /// Whether anything on the host listens on the given socket. A bind
    /// to the wildcard address counts as listening on every local IP.
    pub fn socket_listening(&self, spec: &SocketSpec) -> Result<bool, ExecError> {
        let flag = match spec.protocol {
            Protocol::Tcp => "-t",
            Protocol::Udp => "-u",
        };
        let command = format!("ss -H -l -n {}", flag);

        let out = self.runner.run(&command)?;
        if !out.success() {
            return Err(ExecError::CommandFailed {
                command,
                target: self.runner.target().to_string(),
                detail: out.detail(),
            });
        }

        Ok(listeners_match(&out.stdout, spec.ip, spec.port))
    }
}

fn parse_os_release(content: &str) -> Option<SystemInfo> {
    let mut distribution = None;
    let mut release = None;

    for line in content.lines() {
        if let Some(value) = line.strip_prefix("ID=") {
            distribution = Some(unquote(value).to_lowercase());
        } else if let Some(value) = line.strip_prefix("VERSION_ID=") {
            release = Some(unquote(value).to_string());
        }
    }

    Some(SystemInfo {
        distribution: distribution?,
        release: release?,
    })
}

fn unquote(value: &str) -> &str {
    value.trim().trim_matches('"')
}

/// Scan `ss -H -l -n` output for a listener matching `ip:port`.
fn listeners_match(output: &str, ip: IpAddr, port: u16) -> bool {
    output
        .lines()
        .filter_map(local_address_column)
        .any(|addr| address_matches(addr, ip, port))
}

/// `ss` prints: State Recv-Q Send-Q Local-Address:Port Peer-Address:Port
/// (UDP listeners report state UNCONN, TCP listeners LISTEN; with -H the
/// header is suppressed either way).
fn local_address_column(line: &str) -> Option<&str> {
    line.split_whitespace().nth(3)
}

fn address_matches(addr: &str, ip: IpAddr, port: u16) -> bool {
    // Split on the last ':' so IPv6 brackets survive.
    let Some((host_part, port_part)) = addr.rsplit_once(':') else {
        return false;
    };
    if port_part.parse::<u16>() != Ok(port) {
        return false;
    }

    match host_part {
        "*" | "0.0.0.0" => ip.is_ipv4() || host_part == "*",
        "[::]" => true,
        other => {
            let bare = other.trim_start_matches('[').trim_end_matches(']');
            // Interface-scoped binds look like "127.0.0.1%lo".
            let bare = bare.split('%').next().unwrap_or(bare);
            bare.parse::<IpAddr>() == Ok(ip)
        }
    }
}
