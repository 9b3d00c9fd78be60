//! Listening-socket checks: each service is bound exactly where the
//! settings say it should be, including the loopback-only binds for the
//! AdGuard admin UI and Unbound.

use std::net::{IpAddr, Ipv4Addr};

use super::CheckContext;
use crate::domain::{CheckResult, SocketSpec};
use crate::infrastructure::config::{ConfigError, Settings};
use crate::infrastructure::exec::RemoteHost;

/// The expected socket table for one host, derived from settings.
pub fn expected(host_ip: Ipv4Addr, settings: &Settings) -> Result<Vec<(&'static str, SocketSpec)>, ConfigError> {
    let host_ip = IpAddr::V4(host_ip);
    let loopback = IpAddr::V4(Ipv4Addr::LOCALHOST);

    let adguard_port = settings.adguard.port("primary")?;
    let bind9_port = settings.bind9.port("bind9", "primary")?;
    let unbound_port = settings.unbound.port("unbound", "primary")?;

    Ok(vec![
        ("adguardhome", SocketSpec::tcp(host_ip, adguard_port)),
        ("adguardhome", SocketSpec::udp(host_ip, adguard_port)),
        ("adguardhome", SocketSpec::tcp(loopback, settings.adguard.web_ui_port)),
        ("bind9", SocketSpec::tcp(host_ip, bind9_port)),
        ("bind9", SocketSpec::udp(host_ip, bind9_port)),
        ("unbound", SocketSpec::tcp(loopback, unbound_port)),
    ])
}

pub fn plan(
    host: &crate::domain::HostName,
    host_ip: Ipv4Addr,
    settings: &Settings,
) -> Result<Vec<String>, ConfigError> {
    Ok(expected(host_ip, settings)?
        .into_iter()
        .map(|(service, spec)| check_id(host, service, &spec))
        .collect())
}

fn check_id(host: &crate::domain::HostName, service: &str, spec: &SocketSpec) -> String {
    format!("{}/socket/{}/{}", host, service, spec)
}

pub fn run(ctx: &CheckContext) -> Result<Vec<CheckResult>, ConfigError> {
    let host = RemoteHost::new(ctx.runner);
    let mut results = Vec::new();

    for (service, spec) in expected(ctx.host_ip, ctx.settings)? {
        let id = check_id(ctx.host, service, &spec);
        let result = match host.socket_listening(&spec) {
            Ok(true) => CheckResult::pass(id),
            Ok(false) => {
                CheckResult::fail(id, format!("{} is not listening on {}", service, spec))
            }
            Err(err) => CheckResult::fail(id, err.to_string()),
        };
        results.push(result);
    }

    Ok(results)
}
