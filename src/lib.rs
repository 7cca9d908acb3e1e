pub mod categorize;
pub mod cli;
pub mod dates;
pub mod error;
pub mod export;
pub mod git;
pub mod model;
pub mod report;
pub mod stats;
pub mod summarize;
pub mod tickets;
