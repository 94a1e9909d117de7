//! Astrologer - Astrology MCP Server
//!
//! Birth charts, house systems, sensitive points, aspects and stelliums,
//! with planetary positions from the Swiss Ephemeris.

pub mod analysis;
pub mod charts;
pub mod config;
pub mod ephemeris;
pub mod error;
pub mod models;
pub mod server;
pub mod storage;

pub use charts::{Chart, Place, Radix, Settings};
pub use config::Config;
pub use error::{AstrologerError, Result};
pub use server::AstrologerServer;
