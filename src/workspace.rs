//! Claim a fresh token and the matched pair of directories it names
//!
//! Allocation and initialisation are separate steps: once `allocate` returns, both directories
//! exist and belong to this request; `init` then makes the result directory reachable by the
//! viewer. Until jobid.txt is written the result area is pending.

pub mod allocate;
pub mod init;
