pub mod banner;
pub mod cli;
pub mod formatters;
