use std::fmt;
use std::net::IpAddr;

/// Transport protocol of a listening socket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Tcp,
    Udp,
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tcp => write!(f, "tcp"),
            Self::Udp => write!(f, "udp"),
        }
    }
}

/// An expected listening socket on a host: protocol, bind address, port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SocketSpec {
    pub protocol: Protocol,
    pub ip: IpAddr,
    pub port: u16,
}

impl SocketSpec {
    pub fn tcp(ip: IpAddr, port: u16) -> Self {
        Self {
            protocol: Protocol::Tcp,
            ip,
            port,
        }
    }

    pub fn udp(ip: IpAddr, port: u16) -> Self {
        Self {
            protocol: Protocol::Udp,
            ip,
            port,
        }
    }
}

impl fmt::Display for SocketSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}:{}", self.protocol, self.ip, self.port)
    }
}
