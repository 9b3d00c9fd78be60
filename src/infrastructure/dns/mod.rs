mod dig;
mod nsupdate;

pub use dig::DigProbe;
pub use nsupdate::{TSIG_SECRET_ENV, TsigKey, UpdateTransaction};

use std::net::IpAddr;

use thiserror::Error;

use super::exec::ExecError;

#[derive(Debug, Error)]
pub enum DnsProbeError {
    #[error("dig query for {name} against {server} failed: {detail}")]
    QueryFailed {
        name: String,
        server: IpAddr,
        detail: String,
    },

    #[error("nsupdate transaction failed: {detail}")]
    UpdateFailed { detail: String },

    #[error("TSIG secret not set: export {var} with the base64 key material")]
    MissingSecret { var: &'static str },

    #[error("TSIG secret in {var} is not valid base64")]
    InvalidSecret { var: &'static str },

    #[error(transparent)]
    Exec(#[from] ExecError),
}
