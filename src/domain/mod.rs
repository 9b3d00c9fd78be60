mod report;
pub mod value_objects;

pub use report::{CheckResult, CheckStatus, RunReport};
pub use value_objects::{Fqdn, HostName, Protocol, SocketSpec};
