pub mod cli;
pub mod commands;
pub mod qc;
pub mod utils;
