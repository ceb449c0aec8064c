//! Environment configuration.
use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Possible errors while building an environment.
///
/// All of these are raised at construction time, never at first use.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not list problem instances in {}: {}", path.display(), source)]
    ReadDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("directory {} contains no problem instances", path.display())]
    EmptyCorpus { path: PathBuf },
    #[error("invalid repeat limit in mode '{}': expected a positive integer", mode)]
    InvalidRepeatLimit { mode: String },
    #[error("file {} is not present in directory {}", name, directory.display())]
    FileNotInCorpus { name: String, directory: PathBuf },
}

/// Problem selection mode, as configured.
///
/// This is the textual form resolved against the corpus when the environment is
/// built; see [`Mode`](crate::select::Mode) for the resolved variant.
#[derive(Clone, Eq, PartialEq, Debug, Serialize, Deserialize)]
pub enum ModeSpec {
    /// Pick a uniformly random instance on every reset.
    Random,
    /// Cycle through the corpus, one instance per reset.
    Iterate,
    /// Give out each instance `limit` times before moving to the next one.
    Repeat { limit: usize },
    /// Always use the named file.
    File { name: String },
}

impl ModeSpec {
    /// Parse a textual mode.
    ///
    /// Accepts `"random"`, `"iterate"`, `"repeat^<n>"` with a positive `n`, or a file
    /// name. A repeat limit of zero would never advance past the first instance and
    /// is rejected here. Whether a file name actually exists in the corpus is checked
    /// when the environment is built.
    pub fn parse(mode: &str) -> Result<ModeSpec, ConfigError> {
        const REPEAT_PREFIX: &str = "repeat^";

        if mode == "random" {
            Ok(ModeSpec::Random)
        } else if mode == "iterate" {
            Ok(ModeSpec::Iterate)
        } else if mode.starts_with(REPEAT_PREFIX) {
            match mode[REPEAT_PREFIX.len()..].parse() {
                Ok(limit) if limit > 0 => Ok(ModeSpec::Repeat { limit }),
                _ => Err(ConfigError::InvalidRepeatLimit {
                    mode: mode.to_owned(),
                }),
            }
        } else {
            Ok(ModeSpec::File {
                name: mode.to_owned(),
            })
        }
    }
}

/// Construction time configuration for [`SatEnv`](crate::env::SatEnv).
#[derive(Clone, Debug)]
pub struct EnvOptions {
    /// Directory holding the problem instance corpus.
    pub directory: PathBuf,
    /// Clause bound of the observation tensor. (Default: 100)
    pub max_clause: usize,
    /// Variable bound of the observation tensor. (Default: 20)
    pub max_var: usize,
    /// Problem selection mode. (Default: random)
    pub mode: ModeSpec,
}

impl EnvOptions {
    /// Options for the given instance directory, with defaults for everything else.
    pub fn new(directory: impl Into<PathBuf>) -> EnvOptions {
        EnvOptions {
            directory: directory.into(),
            max_clause: 100,
            max_var: 20,
            mode: ModeSpec::Random,
        }
    }
}
