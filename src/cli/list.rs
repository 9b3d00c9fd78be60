use std::path::Path;

use anyhow::{Context, Result};

use crate::application::{Suite, ddns, local, platform, resolution, services, sockets};
use crate::infrastructure::config::{Inventory, Settings};

/// Print every check id that `check` would run, without connecting to
/// anything.
pub fn execute(inventory_path: &Path, group_vars: &Path, suites: &[Suite]) -> Result<()> {
    let inventory = Inventory::load(inventory_path)
        .with_context(|| format!("loading inventory {}", inventory_path.display()))?;
    let settings = Settings::load(group_vars)
        .with_context(|| format!("loading group vars from {}", group_vars.display()))?;

    let suites: Vec<Suite> = if suites.is_empty() {
        Suite::ALL.to_vec()
    } else {
        suites.to_vec()
    };

    for host in &settings.dns_hosts {
        let host_ip = inventory.host_ip(host)?;

        for suite in &suites {
            let ids = match suite {
                Suite::Platform => platform::plan(host),
                Suite::Services => services::plan(host),
                Suite::Sockets => sockets::plan(host, host_ip, &settings)?,
                Suite::Resolution => resolution::plan(host, inventory.domain(), &settings)?,
                Suite::Ddns => ddns::plan(host, inventory.domain(), &settings)?,
                Suite::Local => continue,
            };
            for id in ids {
                println!("{}", id);
            }
        }
    }

    if suites.contains(&Suite::Local) {
        for id in local::plan(&inventory) {
            println!("{}", id);
        }
    }

    Ok(())
}
