use std::fmt;

/// Outcome of a single check.
///
/// Mirrors what the CLI renders: a check either passed, failed with a
/// reason naming the host/service/record involved, or was skipped
/// (e.g. suite filtered out, or a precondition like a missing secret).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckStatus {
    Passed,
    Failed(String),
    Skipped(String),
}

impl CheckStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Passed => "PASS",
            Self::Failed(_) => "FAIL",
            Self::Skipped(_) => "SKIP",
        }
    }
}

/// A single check identified by a stable id, e.g.
/// `dns1/socket/adguardhome/tcp://192.168.1.2:53`.
#[derive(Debug, Clone)]
pub struct CheckResult {
    pub id: String,
    pub status: CheckStatus,
}

impl CheckResult {
    pub fn pass(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            status: CheckStatus::Passed,
        }
    }

    pub fn fail(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            status: CheckStatus::Failed(reason.into()),
        }
    }

    pub fn skip(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            status: CheckStatus::Skipped(reason.into()),
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self.status, CheckStatus::Failed(_))
    }
}

impl fmt::Display for CheckResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.status {
            CheckStatus::Passed => write!(f, "{}  {}", self.status.label(), self.id),
            CheckStatus::Failed(reason) | CheckStatus::Skipped(reason) => {
                write!(f, "{}  {}: {}", self.status.label(), self.id, reason)
            }
        }
    }
}

/// Accumulated results of a run, across all suites.
#[derive(Debug, Default)]
pub struct RunReport {
    results: Vec<CheckResult>,
}

impl RunReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, result: CheckResult) {
        self.results.push(result);
    }

    pub fn extend(&mut self, results: Vec<CheckResult>) {
        self.results.extend(results);
    }

    pub fn results(&self) -> &[CheckResult] {
        &self.results
    }

    pub fn passed(&self) -> usize {
        self.count(|s| matches!(s, CheckStatus::Passed))
    }

    pub fn failed(&self) -> usize {
        self.count(|s| matches!(s, CheckStatus::Failed(_)))
    }

    pub fn skipped(&self) -> usize {
        self.count(|s| matches!(s, CheckStatus::Skipped(_)))
    }

    /// A run succeeds iff nothing failed. Skips are not failures.
    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    fn count(&self, pred: impl Fn(&CheckStatus) -> bool) -> usize {
        self.results.iter().filter(|r| pred(&r.status)).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_counts() {
        let mut report = RunReport::new();
        report.push(CheckResult::pass("dns1/platform/distribution"));
        report.push(CheckResult::fail("dns1/service/bind9", "not running"));
        report.push(CheckResult::skip("dns1/ddns/add", "secret not set"));

        assert_eq!(report.passed(), 1);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.skipped(), 1);
        assert!(!report.is_success());
    }

    #[test]
    fn test_skips_do_not_fail_the_run() {
        let mut report = RunReport::new();
        report.push(CheckResult::pass("a"));
        report.push(CheckResult::skip("b", "filtered"));
        assert!(report.is_success());
    }

    #[test]
    fn test_result_display() {
        let pass = CheckResult::pass("dns1/platform/release");
        assert_eq!(pass.to_string(), "PASS  dns1/platform/release");

        let fail = CheckResult::fail("dns1/service/unbound", "inactive");
        assert_eq!(fail.to_string(), "FAIL  dns1/service/unbound: inactive");
    }
}
