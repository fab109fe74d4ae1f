//! Mode routing
//!
//! - Server mode (HTTP server)
//! - CLI mode (one-shot commands against the database)

pub mod cli;
pub mod server;

pub use cli::run_cli;
pub use server::run_server;
