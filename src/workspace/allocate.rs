use std::fs::{self, DirBuilder};
use std::io::{self, ErrorKind};
use std::ops::RangeInclusive;
use std::os::unix::fs::DirBuilderExt;
use std::path::Path;

use log::{debug, info, warn};
use rand::Rng;

use crate::config::AllocationConfig;
use crate::error::StageError;
use crate::layout::{Layout, Token, Workspace};

/// Source of candidate tokens
pub trait TokenSource {
    fn draw(&mut self, range: RangeInclusive<u32>) -> u32;
}

/// Draws tokens from the thread-local RNG
#[derive(Default, Clone, Debug)]
pub struct ThreadRandom;

impl TokenSource for ThreadRandom {
    fn draw(&mut self, range: RangeInclusive<u32>) -> u32 {
        rand::rng().random_range(range)
    }
}

/// Claim a token whose working and result directories did not exist
///
/// The directory creation itself is the collision test: `mkdir` fails if the path exists, so two
/// processes drawing the same token cannot both win it. A result directory left behind by an old
/// request also counts as taken; the working directory claimed for that token is released again
/// and a new token is drawn. Both directories are created owner-only (0700).
pub fn allocate<S: TokenSource>(
    layout: &Layout,
    policy: &AllocationConfig,
    source: &mut S,
) -> Result<Workspace, StageError> {
    let range = policy.min_token..=policy.max_token;

    for attempt in 1..=policy.max_attempts {
        let token = Token(source.draw(range.clone()));

        let working = layout.working_dir(token);
        match claim(&working) {
            Ok(()) => {}
            Err(err) if err.kind() == ErrorKind::AlreadyExists => {
                debug!("Token {token} taken (attempt {attempt})");
                continue;
            }
            Err(err) => return Err(StageError::io(&working, err)),
        }

        let result = layout.result_dir(token);
        match claim(&result) {
            Ok(()) => {
                info!("Allocated token {token} after {attempt} attempt(s)");
                return Ok(Workspace { token, working, result });
            }
            Err(err) if err.kind() == ErrorKind::AlreadyExists => {
                warn!("Stale result directory {}, releasing token {token}", result.display());
                fs::remove_dir(&working).map_err(|err| StageError::io(&working, err))?;
            }
            Err(err) => {
                if let Err(cleanup) = fs::remove_dir(&working) {
                    warn!("Can't release {}: {}", working.display(), cleanup);
                }
                return Err(StageError::io(&result, err));
            }
        }
    }

    warn!("No free token in {}..={}", policy.min_token, policy.max_token);
    Err(StageError::Exhausted { attempts: policy.max_attempts })
}

fn claim(path: &Path) -> io::Result<()> {
    DirBuilder::new().mode(0o700).create(path)
}
