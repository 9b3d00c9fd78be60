pub mod config;
pub mod dns;
pub mod exec;
pub mod resolver;
pub mod tracing;
