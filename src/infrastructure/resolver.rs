//! Workstation-side resolution, using whatever resolver the local
//! system is configured with. This is the view a client on the network
//! gets, as opposed to the dig probes that run on the DNS host itself.

use std::net::IpAddr;

use hickory_resolver::Resolver;
use thiserror::Error;

use crate::domain::Fqdn;

#[derive(Debug, Error)]
pub enum LocalResolveError {
    #[error("Failed to read system resolver configuration: {source}")]
    Init {
        source: hickory_resolver::error::ResolveError,
    },

    #[error("Resolution of {name} failed: {source}")]
    Lookup {
        name: String,
        source: hickory_resolver::error::ResolveError,
    },
}

pub struct LocalResolver {
    inner: Resolver,
}

impl LocalResolver {
    /// Build from /etc/resolv.conf (or the platform equivalent).
    pub fn from_system() -> Result<Self, LocalResolveError> {
        let inner = Resolver::from_system_conf().map_err(|source| LocalResolveError::Init { source: source.into() })?;
        Ok(Self { inner })
    }

    pub fn lookup_ip(&self, name: &Fqdn) -> Result<Vec<IpAddr>, LocalResolveError> {
        let lookup = self
            .inner
            .lookup_ip(name.rooted().as_str())
            .map_err(|source| LocalResolveError::Lookup {
                name: name.to_string(),
                source,
            })?;
        Ok(lookup.iter().collect())
    }
}
