//! Validate a chain request and persist it into the working directory

/// Length and case checks on the PDB ID and chain ID
pub mod chain;
/// Decode the urlencoded body posted by the web form
pub mod form;
/// Write list.txt and the initial status log
pub mod write;
