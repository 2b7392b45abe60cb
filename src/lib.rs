// src/lib.rs

#[macro_use]
pub mod macros;
#[macro_use]
pub mod log;

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod core;
pub mod csv;
pub mod error;

pub mod audit;
pub mod extract;
pub mod file;
pub mod gui;
pub mod mapping;
pub mod merge;
pub mod progress;
pub mod records;
pub mod runner;
pub mod search;
pub mod store;

pub use error::{PassError, Result};
pub use mapping::{TerritorialMapping, TerritoryEntry};
