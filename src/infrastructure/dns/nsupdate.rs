//! TSIG-signed dynamic updates via `nsupdate`, fed over stdin on the
//! target host. The shared secret comes from the environment and is
//! kept out of Debug output, log lines, and error messages.

use std::fmt;
use std::net::{IpAddr, Ipv4Addr};

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;

use super::DnsProbeError;
use crate::domain::Fqdn;
use crate::infrastructure::exec::CommandRunner;

/// Environment variable holding the base64 TSIG key material.
pub const TSIG_SECRET_ENV: &str = "DNSCHECK_TSIG_SECRET";

/// A TSIG key: name, HMAC algorithm, and the shared secret.
#[derive(Clone)]
pub struct TsigKey {
    name: String,
    algorithm: String,
    secret: String,
}

impl TsigKey {
    pub fn new(
        name: impl Into<String>,
        algorithm: impl Into<String>,
        secret: impl Into<String>,
    ) -> Result<Self, DnsProbeError> {
        let secret = secret.into();
        if secret.trim().is_empty() {
            return Err(DnsProbeError::MissingSecret {
                var: TSIG_SECRET_ENV,
            });
        }
        if BASE64.decode(secret.trim()).is_err() {
            return Err(DnsProbeError::InvalidSecret {
                var: TSIG_SECRET_ENV,
            });
        }
        Ok(Self {
            name: name.into(),
            algorithm: algorithm.into(),
            secret: secret.trim().to_string(),
        })
    }

    /// Read the secret from `DNSCHECK_TSIG_SECRET`. Absence is an error;
    /// the DDNS check cannot run unauthenticated.
    pub fn from_env(
        name: impl Into<String>,
        algorithm: impl Into<String>,
    ) -> Result<Self, DnsProbeError> {
        let secret = std::env::var(TSIG_SECRET_ENV).map_err(|_| DnsProbeError::MissingSecret {
            var: TSIG_SECRET_ENV,
        })?;
        Self::new(name, algorithm, secret)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn key_line(&self) -> String {
        format!("key {}:{} {}", self.algorithm, self.name, self.secret)
    }
}

impl fmt::Debug for TsigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TsigKey")
            .field("name", &self.name)
            .field("algorithm", &self.algorithm)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// One signed update transaction: a batch of add/delete statements sent
/// to the zone's primary in a single `send`.
pub struct UpdateTransaction {
    server: IpAddr,
    port: u16,
    key: TsigKey,
    statements: Vec<String>,
}

impl UpdateTransaction {
    pub fn new(server: IpAddr, port: u16, key: TsigKey) -> Self {
        Self {
            server,
            port,
            key,
            statements: Vec::new(),
        }
    }

    pub fn add_a(mut self, name: &Fqdn, ttl: u32, address: Ipv4Addr) -> Self {
        self.statements
            .push(format!("update add {} {} A {}", name.rooted(), ttl, address));
        self
    }

    pub fn delete(mut self, name: &Fqdn) -> Self {
        self.statements
            .push(format!("update delete {} A", name.rooted()));
        self
    }

    /// The script handed to nsupdate's stdin, secret included. Never log
    /// this; use [`Self::describe`] for messages.
    fn render(&self) -> String {
        let mut script = String::new();
        script.push_str(&format!("server {} {}\n", self.server, self.port));
        script.push_str(&self.key.key_line());
        script.push('\n');
        for statement in &self.statements {
            script.push_str(statement);
            script.push('\n');
        }
        script.push_str("send\n");
        script
    }

    /// Loggable summary of the transaction, without the key line.
    pub fn describe(&self) -> String {
        format!(
            "nsupdate to {}:{} [{}]",
            self.server,
            self.port,
            self.statements.join("; ")
        )
    }

    /// Send the transaction through `nsupdate` on the target host.
    pub fn send(&self, runner: &dyn CommandRunner) -> Result<(), DnsProbeError> {
        tracing::debug!(transaction = %self.describe(), "sending dynamic update");

        let out = runner.run_with_stdin("nsupdate", &self.render())?;
        if !out.success() {
            return Err(DnsProbeError::UpdateFailed {
                detail: out.detail(),
            });
        }
        Ok(())
    }
}
