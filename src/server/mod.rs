//! MCP server exposing chart calculations as tools

pub mod tools;

pub use tools::AstrologerServer;
