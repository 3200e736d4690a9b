pub mod cli;
pub mod error;
pub mod loan;
pub mod report;
pub mod request;
pub mod schedule;
