pub mod app;
pub mod builder;
pub mod driver;
pub mod gateway;
pub mod oracle_sim;
