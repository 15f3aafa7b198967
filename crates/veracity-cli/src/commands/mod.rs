//! Command implementations.

pub mod check;
pub mod config;
pub mod validate_key;

pub use self::check::execute_check;
pub use self::config::execute_config;
pub use self::validate_key::execute_validate_key;
