//! Local resolution checks: every inventory host's FQDN must resolve
//! from the machine running dnscheck, using the system resolver. This
//! is the client's-eye view of the zone.

use std::net::IpAddr;

use crate::domain::{CheckResult, Fqdn};
use crate::infrastructure::config::Inventory;
use crate::infrastructure::resolver::LocalResolver;

fn check_id(fqdn: &Fqdn) -> String {
    format!("local/dns/{}", fqdn)
}

pub fn plan(inventory: &Inventory) -> Vec<String> {
    inventory
        .host_names()
        .filter_map(|host| Fqdn::from_parts(host, inventory.domain()).ok())
        .map(|fqdn| check_id(&fqdn))
        .collect()
}

pub fn run(inventory: &Inventory, resolver: &LocalResolver) -> Vec<CheckResult> {
    run_with(inventory, |fqdn| {
        resolver.lookup_ip(fqdn).map_err(|err| err.to_string())
    })
}

/// Same flow with the lookup pluggable, so the assertion logic is
/// testable without a live resolver.
fn run_with(
    inventory: &Inventory,
    lookup: impl Fn(&Fqdn) -> Result<Vec<IpAddr>, String>,
) -> Vec<CheckResult> {
    let mut results = Vec::new();

    for host in inventory.host_names() {
        let fqdn = match Fqdn::from_parts(host, inventory.domain()) {
            Ok(fqdn) => fqdn,
            Err(err) => {
                results.push(CheckResult::fail(
                    format!("local/dns/{}.{}", host, inventory.domain()),
                    err.to_string(),
                ));
                continue;
            }
        };

        let id = check_id(&fqdn);
        let result = match lookup(&fqdn) {
            Ok(addresses) if !addresses.is_empty() => CheckResult::pass(id),
            Ok(_) => CheckResult::fail(id, format!("no address returned for {}", fqdn)),
            Err(err) => CheckResult::fail(id, format!("DNS resolution failed: {}", err)),
        };
        results.push(result);
    }

    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CheckStatus;
    use std::io::Write;
    use std::net::Ipv4Addr;

    fn inventory() -> Inventory {
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

    #[test]
    fn test_every_host_resolving_passes() {
        let inventory = inventory();
        let results = run_with(&inventory, |_| {
            Ok(vec![IpAddr::V4(Ipv4Addr::new(192, 168, 1, 2))])
        });

        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.status == CheckStatus::Passed));
    }

    #[test]
    fn test_empty_answer_fails() {
        let inventory = inventory();
        let results = run_with(&inventory, |fqdn| {
            if fqdn.as_str().starts_with("proxmox") {
                Ok(vec![])
            } else {
                Ok(vec![IpAddr::V4(Ipv4Addr::new(192, 168, 1, 2))])
            }
        });

        let proxmox = results
            .iter()
            .find(|r| r.id == "local/dns/proxmox.home.sflab.io")
            .unwrap();
        assert!(proxmox.to_string().contains("no address returned"));
    }

    #[test]
    fn test_lookup_error_fails_with_reason() {
        let inventory = inventory();
        let results = run_with(&inventory, |_| Err("no servers could be reached".to_string()));

        assert!(results.iter().all(CheckResult::is_failure));
        assert!(results[0].to_string().contains("DNS resolution failed"));
    }

    #[test]
    fn test_plan_lists_fqdns() {
        let ids = plan(&inventory());
        assert_eq!(ids.len(), 2);
        assert!(ids.contains(&"local/dns/dns1.home.sflab.io".to_string()));
    }
}
