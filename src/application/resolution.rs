//! Resolution checks against the Bind9 listener: internal zone records
//! must resolve, and an external name must resolve recursively. Queries
//! run on the host itself via dig, so they see the same view a service
//! on that host would.

use std::net::IpAddr;

use super::CheckContext;
use crate::domain::{CheckResult, Fqdn, HostName};
use crate::infrastructure::config::{ConfigError, Settings};
use crate::infrastructure::dns::DigProbe;

fn internal_id(host: &HostName, fqdn: &Fqdn) -> String {
    format!("{}/dns/internal/{}", host, fqdn)
}

fn external_id(host: &HostName, fqdn: &Fqdn) -> String {
    format!("{}/dns/external/{}", host, fqdn)
}

fn internal_records(domain: &str, settings: &Settings) -> Result<Vec<Fqdn>, ConfigError> {
    settings
        .resolution
        .internal_records
        .iter()
        .map(|record| {
            Fqdn::from_parts(record, domain).map_err(|_| ConfigError::InvalidValue {
                field: "resolution.internal_records".to_string(),
                value: format!("{}.{}", record, domain),
            })
        })
        .collect()
}

pub fn plan(
    host: &HostName,
    domain: &str,
    settings: &Settings,
) -> Result<Vec<String>, ConfigError> {
    let mut ids: Vec<String> = internal_records(domain, settings)?
        .iter()
        .map(|fqdn| internal_id(host, fqdn))
        .collect();
    ids.push(external_id(host, &settings.resolution.external_probe()?));
    Ok(ids)
}

pub fn run(ctx: &CheckContext) -> Result<Vec<CheckResult>, ConfigError> {
    let probe = DigProbe::new(ctx.runner);
    let server = IpAddr::V4(ctx.host_ip);
    let port = ctx.settings.bind9.port("bind9", "primary")?;

    let mut results = Vec::new();

    for fqdn in internal_records(ctx.domain, ctx.settings)? {
        let id = internal_id(ctx.host, &fqdn);
        results.push(resolve_check(&probe, server, port, &fqdn, id));
    }

    let external = ctx.settings.resolution.external_probe()?;
    let id = external_id(ctx.host, &external);
    results.push(resolve_check(&probe, server, port, &external, id));

    Ok(results)
}

fn resolve_check(
    probe: &DigProbe,
    server: IpAddr,
    port: u16,
    fqdn: &Fqdn,
    id: String,
) -> CheckResult {
    match probe.query(server, port, fqdn) {
        Ok(answers) if !answers.is_empty() => CheckResult::pass(id),
        Ok(_) => CheckResult::fail(id, format!("no DNS response for {} from {}", fqdn, server)),
        Err(err) => CheckResult::fail(id, err.to_string()),
    }
}
