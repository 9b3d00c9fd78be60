use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, bail};

use crate::application::{CheckContext, Suite, ddns, local, platform, resolution, services, sockets};
use crate::domain::{CheckResult, HostName, RunReport};
use crate::infrastructure::config::{Inventory, Settings};
use crate::infrastructure::exec::SshRunner;
use crate::infrastructure::resolver::LocalResolver;

pub fn execute(
    inventory_path: &Path,
    group_vars: &Path,
    suites: &[Suite],
    host_filter: Option<&HostName>,
) -> Result<()> {
    let started = Instant::now();

    let inventory = Inventory::load(inventory_path)
        .with_context(|| format!("loading inventory {}", inventory_path.display()))?;
    let settings = Settings::load(group_vars)
        .with_context(|| format!("loading group vars from {}", group_vars.display()))?;

    let suites = selected(suites);
    let hosts = dns_hosts(&inventory, &settings, host_filter)?;

    // Unknown roles and malformed derived names (probe FQDNs, socket
    // table) must surface here, before any connection is attempted, not
    // halfway through a run that has already printed results.
    for host in &hosts {
        validate_derived(host, inventory.host_ip(host)?, inventory.domain(), &settings)?;
    }

    let mut report = RunReport::new();

    for host in &hosts {
        let host_ip = inventory.host_ip(host)?;
        let runner = SshRunner::new(host_ip.to_string());
        tracing::info!(host = %host, ip = %host_ip, "checking host");

        let ctx = CheckContext {
            host,
            host_ip,
            domain: inventory.domain(),
            settings: &settings,
            runner: &runner,
        };

        for suite in Suite::ALL {
            if !suite.is_remote() {
                continue;
            }
            let results = if suites.contains(&suite) {
                match suite {
                    Suite::Platform => platform::run(&ctx),
                    Suite::Services => services::run(&ctx),
                    Suite::Sockets => sockets::run(&ctx)?,
                    Suite::Resolution => resolution::run(&ctx)?,
                    Suite::Ddns => ddns::run(&ctx)?,
                    Suite::Local => continue,
                }
            } else {
                skip_suite(suite, &ctx)?
            };
            for result in &results {
                println!("{}", result);
            }
            report.extend(results);
        }
    }

    let local_results = if suites.contains(&Suite::Local) {
        let resolver =
            LocalResolver::from_system().context("initializing the system resolver")?;
        local::run(&inventory, &resolver)
    } else {
        skipped(local::plan(&inventory))
    };
    for result in &local_results {
        println!("{}", result);
    }
    report.extend(local_results);

    print_summary(&report, started.elapsed());

    if !report.is_success() {
        bail!("{} check(s) failed", report.failed());
    }
    Ok(())
}

/// Exercise every value the suites derive from settings (role port
/// lookups, probe FQDNs, the socket table) so a configuration mistake
/// aborts the run up front.
fn validate_derived(
    host: &HostName,
    host_ip: std::net::Ipv4Addr,
    domain: &str,
    settings: &Settings,
) -> Result<()> {
    sockets::plan(host, host_ip, settings)?;
    resolution::plan(host, domain, settings)?;
    ddns::plan(host, domain, settings)?;
    Ok(())
}

/// Results for a suite that was filtered out with `--suite`: one SKIP
/// per check it would have run.
fn skip_suite(suite: Suite, ctx: &CheckContext) -> Result<Vec<CheckResult>> {
    let ids = match suite {
        Suite::Platform => platform::plan(ctx.host),
        Suite::Services => services::plan(ctx.host),
        Suite::Sockets => sockets::plan(ctx.host, ctx.host_ip, ctx.settings)?,
        Suite::Resolution => resolution::plan(ctx.host, ctx.domain, ctx.settings)?,
        Suite::Ddns => ddns::plan(ctx.host, ctx.domain, ctx.settings)?,
        Suite::Local => Vec::new(),
    };
    Ok(skipped(ids))
}

fn skipped(ids: Vec<String>) -> Vec<CheckResult> {
    ids.into_iter()
        .map(|id| CheckResult::skip(id, "suite not selected"))
        .collect()
}

fn selected(suites: &[Suite]) -> Vec<Suite> {
    if suites.is_empty() {
        Suite::ALL.to_vec()
    } else {
        suites.to_vec()
    }
}

fn dns_hosts(
    inventory: &Inventory,
    settings: &Settings,
    filter: Option<&HostName>,
) -> Result<Vec<HostName>> {
    let hosts: Vec<HostName> = match filter {
        Some(host) => {
            if !settings.dns_hosts.contains(host) {
                bail!(
                    "'{}' is not a configured DNS host (dns_hosts: {})",
                    host,
                    settings
                        .dns_hosts
                        .iter()
                        .map(HostName::to_string)
                        .collect::<Vec<_>>()
                        .join(", ")
                );
            }
            vec![host.clone()]
        }
        None => settings.dns_hosts.clone(),
    };

    // Fail up front if a configured DNS host is missing from the
    // inventory, before any connection is attempted.
    for host in &hosts {
        if !inventory.contains(host) {
            bail!("DNS host '{}' is not in the inventory", host);
        }
    }

    Ok(hosts)
}

fn print_summary(report: &RunReport, elapsed: Duration) {
    // Sub-millisecond noise doesn't belong in a summary line.
    let rounded = Duration::from_millis(elapsed.as_millis() as u64);
    println!(
        "\n{} passed, {} failed, {} skipped in {}",
        report.passed(),
        report.failed(),
        report.skipped(),
        humantime::format_duration(rounded)
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selected_defaults_to_all_suites() {
        assert_eq!(selected(&[]).len(), Suite::ALL.len());
        assert_eq!(selected(&[Suite::Ddns]), vec![Suite::Ddns]);
    }

    #[test]
    fn test_validate_derived_rejects_missing_bind9_role() {
        let mut settings = Settings::default();
        settings.bind9.ports.clear();
        let host = HostName::new("dns1").unwrap();

        let err = validate_derived(&host, ip(), "home.sflab.io", &settings).unwrap_err();
        assert!(err.to_string().contains("bind9"));
    }

    #[test]
    fn test_validate_derived_rejects_bad_external_probe() {
        let mut settings = Settings::default();
        settings.resolution.external_probe = "localhost".to_string();
        let host = HostName::new("dns1").unwrap();

        let err = validate_derived(&host, ip(), "home.sflab.io", &settings).unwrap_err();
        assert!(err.to_string().contains("external_probe"));
    }

    #[test]
    fn test_unselected_suite_reports_skips() {
        use crate::infrastructure::exec::testing::ScriptedRunner;

        let settings = Settings::default();
        let host = HostName::new("dns1").unwrap();
        let runner = ScriptedRunner::new();
        let ctx = CheckContext {
            host: &host,
            host_ip: ip(),
            domain: "home.sflab.io",
            settings: &settings,
            runner: &runner,
        };

        let results = skip_suite(Suite::Ddns, &ctx).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(
            results[0].status,
            crate::domain::CheckStatus::Skipped("suite not selected".to_string())
        );
        // Nothing was executed on the host.
        assert!(runner.calls().is_empty());
    }

    fn ip() -> std::net::Ipv4Addr {
        std::net::Ipv4Addr::new(192, 168, 1, 2)
    }

    #[test]
    fn test_host_filter_must_be_a_dns_host() {
        let settings = Settings::default();
        let inventory = test_inventory();
        let other = HostName::new("proxmox").unwrap();

        let err = dns_hosts(&inventory, &settings, Some(&other)).unwrap_err();
        assert!(err.to_string().contains("not a configured DNS host"));
    }

    #[test]
    fn test_dns_host_must_be_in_inventory() {
        let mut settings = Settings::default();
        settings.dns_hosts = vec![HostName::new("dns9").unwrap()];
        let inventory = test_inventory();

        let err = dns_hosts(&inventory, &settings, None).unwrap_err();
        assert!(err.to_string().contains("not in the inventory"));
    }

    fn test_inventory() -> Inventory {
        use std::io::Write;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            br#"
all:
  hosts:
    dns1:
      ansible_host: 192.168.1.2
    proxmox:
      ansible_host: 192.168.1.20
  vars:
    domain: home.sflab.io
"#,
        )
        .unwrap();
        Inventory::load(file.path()).unwrap()
    }
}
