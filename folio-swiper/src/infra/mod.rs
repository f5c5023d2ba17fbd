pub mod constants;
pub mod runtime_config;
pub mod time;
