pub mod config;
pub mod house_file;
pub mod runner;
