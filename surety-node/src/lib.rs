pub mod cli;
pub mod config;
pub mod logging;
pub mod runtime;

pub use config::Config;
pub use runtime::app::FlightSuretyApp;
pub use runtime::builder::build_runtime;
