//! Request dispatch and the per-session serve loop.

mod builder;
mod config;
mod core;

pub use builder::ServerBuilder;
pub use config::ServerConfig;
pub use self::core::McpServer;
