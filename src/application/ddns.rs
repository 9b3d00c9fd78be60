//! Dynamic-update check: add a probe A record through a TSIG-signed
//! nsupdate transaction, verify it resolves, then delete it. The delete
//! runs no matter how the add or verify went, so a failed run does not
//! leave the probe record behind; a failed delete is logged only.

use std::net::IpAddr;

use super::CheckContext;
use crate::domain::{CheckResult, Fqdn, HostName};
use crate::infrastructure::config::{ConfigError, DdnsSettings, Settings};
use crate::infrastructure::dns::{DigProbe, TsigKey, UpdateTransaction};

fn probe_fqdn(domain: &str, settings: &DdnsSettings) -> Result<Fqdn, ConfigError> {
    Fqdn::from_parts(&settings.probe_record, domain).map_err(|_| ConfigError::InvalidValue {
        field: "ddns.probe_record".to_string(),
        value: format!("{}.{}", settings.probe_record, domain),
    })
}

pub fn plan(host: &HostName, domain: &str, settings: &Settings) -> Result<Vec<String>, ConfigError> {
    let fqdn = probe_fqdn(domain, &settings.ddns)?;
    Ok(vec![format!("{}/ddns/{}", host, fqdn)])
}

pub fn run(ctx: &CheckContext) -> Result<Vec<CheckResult>, ConfigError> {
    let ddns = &ctx.settings.ddns;
    let fqdn = probe_fqdn(ctx.domain, ddns)?;
    let id = format!("{}/ddns/{}", ctx.host, fqdn);
    let server = IpAddr::V4(ctx.host_ip);
    let port = ctx.settings.bind9.port("bind9", "primary")?;

    // No secret, no check: this case halts right here rather than
    // attempting an unauthenticated update.
    let key = match TsigKey::from_env(&ddns.key_name, &ddns.algorithm) {
        Ok(key) => key,
        Err(err) => return Ok(vec![CheckResult::fail(id, err.to_string())]),
    };

    let outcome = add_and_verify(ctx, server, port, &key, &fqdn);

    let cleanup = UpdateTransaction::new(server, port, key).delete(&fqdn);
    if let Err(err) = cleanup.send(ctx.runner) {
        tracing::warn!(record = %fqdn, error = %err, "failed to clean up probe record");
    }

    Ok(vec![match outcome {
        Ok(()) => CheckResult::pass(id),
        Err(reason) => CheckResult::fail(id, reason),
    }])
}

fn add_and_verify(
    ctx: &CheckContext,
    server: IpAddr,
    port: u16,
    key: &TsigKey,
    fqdn: &Fqdn,
) -> Result<(), String> {
    let ddns = &ctx.settings.ddns;

    UpdateTransaction::new(server, port, key.clone())
        .add_a(fqdn, ddns.ttl, ddns.probe_address)
        .send(ctx.runner)
        .map_err(|err| format!("adding {} failed: {}", fqdn, err))?;

    let answers = DigProbe::new(ctx.runner)
        .query(server, port, fqdn)
        .map_err(|err| format!("verifying {} failed: {}", fqdn, err))?;

    let expected = ddns.probe_address.to_string();
    if answers.iter().any(|answer| answer == &expected) {
        Ok(())
    } else {
        Err(format!(
            "{} did not resolve to {} after update (got: {:?})",
            fqdn, expected, answers
        ))
    }
}
