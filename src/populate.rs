//! Populate command handler.

pub mod logging;
pub mod run;

pub use logging::mask_connection_password;
pub use run::run_populate;
