pub mod analyze;
pub mod config;

// Re-export handler functions for convenience
pub use analyze::handle_analyze_command;
pub use config::handle_config_command;
