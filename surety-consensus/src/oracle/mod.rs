pub mod entropy;
pub mod registry;
