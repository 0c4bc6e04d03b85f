pub mod config;
pub mod polar;
