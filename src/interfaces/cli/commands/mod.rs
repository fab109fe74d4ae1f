//! CLI command implementations
//!
//! This module re-exports all CLI command functions.

mod config_gen;
mod issue_token;
mod link_management;

pub use config_gen::config_generate;
pub use issue_token::issue_token;
pub use link_management::{create_link, list_links, open_services};
