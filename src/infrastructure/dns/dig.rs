//! Resolution probes issued with `dig` through the command runner, so
//! the query originates from the host under test rather than from the
//! machine running dnscheck.

use std::net::IpAddr;

use super::DnsProbeError;
use crate::domain::Fqdn;
use crate::infrastructure::exec::CommandRunner;

pub struct DigProbe<'a> {
    runner: &'a dyn CommandRunner,
}

impl<'a> DigProbe<'a> {
    pub fn new(runner: &'a dyn CommandRunner) -> Self {
        Self { runner }
    }

    /// Resolve `name` against `server:port`, returning the `+short`
    /// answer lines. An empty vector means the query succeeded but the
    /// name did not resolve.
    pub fn query(
        &self,
        server: IpAddr,
        port: u16,
        name: &Fqdn,
    ) -> Result<Vec<String>, DnsProbeError> {
        let command = format!("dig @{} -p {} {} +short +time=5 +tries=1", server, port, name);

        let out = self.runner.run(&command)?;
        if !out.success() {
            return Err(DnsProbeError::QueryFailed {
                name: name.to_string(),
                server,
                detail: out.detail(),
            });
        }

        Ok(parse_short_output(&out.stdout))
    }
}

/// `+short` prints one answer per line; on some failures dig still exits
/// zero but emits `;;`-prefixed diagnostics, which are not answers.
fn parse_short_output(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with(';'))
        .map(str::to_string)
        .collect()
}
