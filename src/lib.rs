//! Surveylinker - single-use NPS survey links
//!
//! Each survey link carries an opaque signed token. Holding the token is
//! enough to submit exactly one Net Promoter Score response before the
//! link expires.
//!
//! # Architecture
//! - `token`: Token codec (mint / verify)
//! - `services`: Link registry, response ledger, status resolver, metrics aggregator
//! - `storage`: SeaORM storage backend (SQLite / MySQL / PostgreSQL)
//! - `api`: HTTP services and middleware
//! - `interfaces`: Command-line interface
//! - `config`: Configuration management
//! - `runtime`: Application lifecycle and execution modes
//! - `system`: Logging and signal handling

pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod interfaces;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod system;
pub mod token;
pub mod utils;
