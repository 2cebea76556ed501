//! Stage a Conserv chain request and hand it to the batch queue
//!
//! A request names a PDB entry and a chain. It gets a fresh numeric token, a private working
//! directory and a public result directory, the chain is extracted by an external script, and the
//! job is queued with the batch scheduler. If extraction or submission fails the working area is
//! published as a failed result instead. Either way the user is redirected to the results page
//! for the token.

pub mod config;
/// Queue the job or publish a failed result
pub mod dispatch;
pub mod error;
pub mod extract;
/// Paths and file names of the working and result areas
pub mod layout;
pub mod process;
pub mod request;
pub mod response;
pub mod scheduler;
pub mod stage;
pub mod workspace;

pub use config::Config;
pub use error::{InputError, StageError};
pub use layout::{Layout, Token, Workspace};
pub use stage::{handle, stage, Staged, Verdict};
