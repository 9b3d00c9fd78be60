//! Systemd unit checks: every DNS service is both enabled at boot and
//! currently running.

use super::CheckContext;
use crate::domain::{CheckResult, HostName};
use crate::infrastructure::exec::RemoteHost;

/// The units provisioned on a DNS host.
pub const SERVICES: [&str; 3] = ["adguardhome", "bind9", "unbound"];

pub fn plan(host: &HostName) -> Vec<String> {
    SERVICES
        .iter()
        .flat_map(|service| {
            [
                format!("{}/service/{}/enabled", host, service),
                format!("{}/service/{}/running", host, service),
            ]
        })
        .collect()
}

pub fn run(ctx: &CheckContext) -> Vec<CheckResult> {
    let host = RemoteHost::new(ctx.runner);
    let mut results = Vec::with_capacity(SERVICES.len() * 2);

    for service in SERVICES {
        let enabled_id = format!("{}/service/{}/enabled", ctx.host, service);
        let running_id = format!("{}/service/{}/running", ctx.host, service);

        match host.service(service) {
            Ok(state) => {
                results.push(if state.enabled {
                    CheckResult::pass(enabled_id)
                } else {
                    CheckResult::fail(enabled_id, format!("{} is not enabled", service))
                });
                results.push(if state.running {
                    CheckResult::pass(running_id)
                } else {
                    CheckResult::fail(running_id, format!("{} is not running", service))
                });
            }
            Err(err) => {
                results.push(CheckResult::fail(enabled_id, err.to_string()));
                results.push(CheckResult::fail(running_id, err.to_string()));
            }
        }
    }

    results
}
