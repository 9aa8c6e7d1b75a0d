//! CLI command implementations

pub mod utils;

pub mod analyze;
pub mod class;
pub mod completions;
pub mod convert;
pub mod estimate;
pub mod init;
pub mod material;
pub mod units;
