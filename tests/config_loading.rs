//! End-to-end loading of the repository's sample inventory, pinning the
//! reference values the provisioning side is expected to use.

use std::path::{Path, PathBuf};

use dnscheck::application::{Suite, ddns, local, platform, resolution, services, sockets};
use dnscheck::domain::HostName;
use dnscheck::infrastructure::config::{Inventory, Settings};

fn repo_path(relative: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join(relative)
}

fn load() -> (Inventory, Settings) {
    let inventory = Inventory::load(&repo_path("inventory/hosts.yml")).unwrap();
    let settings = Settings::load(&repo_path("inventory/group_vars")).unwrap();
    (inventory, settings)
}

#[test]
fn adguard_port_is_53() {
    let (_, settings) = load();
    assert_eq!(settings.adguard.port("primary").unwrap(), 53);
}

#[test]
fn bind9_port_is_5353() {
    let (_, settings) = load();
    assert_eq!(settings.bind9.port("bind9", "primary").unwrap(), 5353);
}

#[test]
fn unbound_port_is_5335() {
    let (_, settings) = load();
    assert_eq!(settings.unbound.port("unbound", "primary").unwrap(), 5335);
}

#[test]
fn domain_is_home_sflab_io() {
    let (inventory, _) = load();
    assert_eq!(inventory.domain(), "home.sflab.io");
}

#[test]
fn dns1_management_ip_is_known() {
    let (inventory, _) = load();
    let dns1 = HostName::new("dns1").unwrap();
    assert_eq!(inventory.host_ip(&dns1).unwrap().to_string(), "192.168.1.2");
}

#[test]
fn every_dns_host_is_in_the_inventory() {
    let (inventory, settings) = load();
    for host in &settings.dns_hosts {
        assert!(inventory.contains(host), "missing from inventory: {}", host);
    }
}

#[test]
fn full_plan_covers_all_suites() {
    let (inventory, settings) = load();
    let dns1 = HostName::new("dns1").unwrap();
    let ip = inventory.host_ip(&dns1).unwrap();
    let domain = inventory.domain();

    assert_eq!(platform::plan(&dns1).len(), 2);
    assert_eq!(services::plan(&dns1).len(), 6);
    assert_eq!(sockets::plan(&dns1, ip, &settings).unwrap().len(), 6);
    assert_eq!(resolution::plan(&dns1, domain, &settings).unwrap().len(), 5);
    assert_eq!(ddns::plan(&dns1, domain, &settings).unwrap().len(), 1);
    // One local check per inventory host.
    assert_eq!(local::plan(&inventory).len(), inventory.host_names().count());

    // Suite names stay parseable from the CLI.
    for suite in Suite::ALL {
        assert_eq!(suite.name().parse::<Suite>().unwrap(), suite);
    }
}
