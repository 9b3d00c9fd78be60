//! Operating system checks: the host runs the expected distribution at
//! the expected release.

use super::CheckContext;
use crate::domain::{CheckResult, HostName};
use crate::infrastructure::exec::RemoteHost;

pub fn plan(host: &HostName) -> Vec<String> {
    vec![
        format!("{}/platform/distribution", host),
        format!("{}/platform/release", host),
    ]
}

pub fn run(ctx: &CheckContext) -> Vec<CheckResult> {
    let ids = plan(ctx.host);
    let expected = &ctx.settings.platform;

    let info = match RemoteHost::new(ctx.runner).system_info() {
        Ok(info) => info,
        Err(err) => {
            // Can't tell distribution from release apart if the host is
            // unreachable; fail both with the transport error.
            return ids
                .into_iter()
                .map(|id| CheckResult::fail(id, err.to_string()))
                .collect();
        }
    };

    let distribution = if info.distribution == expected.distribution {
        CheckResult::pass(&ids[0])
    } else {
        CheckResult::fail(
            &ids[0],
            format!(
                "expected {}, found {}",
                expected.distribution, info.distribution
            ),
        )
    };

    let release = if info.release == expected.release {
        CheckResult::pass(&ids[1])
    } else {
        CheckResult::fail(
            &ids[1],
            format!("expected {}, found {}", expected.release, info.release),
        )
    };

    vec![distribution, release]
}
