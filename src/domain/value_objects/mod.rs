mod fqdn;
mod host_name;
mod socket_spec;

pub use fqdn::Fqdn;
pub use host_name::HostName;
pub use socket_spec::{Protocol, SocketSpec};
