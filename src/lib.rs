//! Library crate for portsweep exposing the scan engine and its collaborators.
pub mod catalog;
pub mod probe;
pub mod progress;
pub mod report;
pub mod resolve;
pub mod scanner;
pub mod state;
pub mod types;
