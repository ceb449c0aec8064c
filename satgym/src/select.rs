//! Problem selection policy.
//!
//! Decides which corpus instance each environment reset loads. The policy is a small
//! state machine over two counters; everything except the random mode is
//! deterministic given the current [`Cursor`].
use log::warn;
use rand::{thread_rng, Rng};
use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, ModeSpec};
use crate::corpus::Corpus;

/// Resolved selection mode.
///
/// Unlike [`ModeSpec`] this form cannot name a file outside the corpus: the fixed
/// file variant stores the resolved index.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Serialize, Deserialize)]
pub enum Mode {
    /// A uniformly random instance per reset.
    Random,
    /// One instance per reset, cycling through the corpus.
    Iterate,
    /// Each instance `limit` consecutive times, then the next one.
    RepeatThenIterate { limit: usize },
    /// The same instance on every reset.
    FixedFile { index: usize },
}

impl Mode {
    /// Resolve a parsed mode against the corpus it will select from.
    pub fn resolve(spec: &ModeSpec, corpus: &Corpus) -> Result<Mode, ConfigError> {
        match spec {
            ModeSpec::Random => Ok(Mode::Random),
            ModeSpec::Iterate => Ok(Mode::Iterate),
            ModeSpec::Repeat { limit } => Ok(Mode::RepeatThenIterate { limit: *limit }),
            ModeSpec::File { name } => match corpus.position(name) {
                Some(index) => Ok(Mode::FixedFile { index }),
                None => Err(ConfigError::FileNotInCorpus {
                    name: name.clone(),
                    directory: corpus.directory().to_owned(),
                }),
            },
        }
    }
}

/// Counters driving the iterating selection modes.
///
/// Mutated only by the reset family of operations and only through
/// [`Selection::pick`]. The cursor can be snapshotted and restored to reproduce a
/// selection schedule across training runs. `iterate_index` always indexes a valid
/// corpus entry; `repeat_count` stays below the repeat limit and is unused by the
/// random and fixed file modes.
#[derive(Copy, Clone, Default, Eq, PartialEq, Debug, Serialize, Deserialize)]
pub struct Cursor {
    /// Instance the next iterating pick will use.
    pub iterate_index: usize,
    /// Picks already spent on that instance under a repeat limit.
    pub repeat_count: usize,
}

/// Selection state machine, applied once per environment reset.
pub struct Selection {
    mode: Mode,
    corpus_len: usize,
    cursor: Cursor,
}

impl Selection {
    /// Create a selection over a corpus of `corpus_len` instances.
    pub fn new(mode: Mode, corpus_len: usize) -> Selection {
        debug_assert!(corpus_len > 0);
        Selection {
            mode,
            corpus_len,
            cursor: Cursor::default(),
        }
    }

    /// Pick the corpus index the next session will load, advancing the cursor.
    pub fn pick(&mut self) -> usize {
        match self.mode {
            Mode::Random => thread_rng().gen_range(0, self.corpus_len),
            Mode::Iterate => {
                let index = self.cursor.iterate_index;
                self.advance();
                index
            }
            Mode::RepeatThenIterate { limit } => {
                let index = self.cursor.iterate_index;
                self.cursor.repeat_count += 1;
                if self.cursor.repeat_count >= limit {
                    self.cursor.repeat_count = 0;
                    self.advance();
                }
                index
            }
            Mode::FixedFile { index } => index,
        }
    }

    fn advance(&mut self) {
        self.cursor.iterate_index += 1;
        if self.cursor.iterate_index == self.corpus_len {
            self.cursor.iterate_index = 0;
            warn!(
                "all {} problem instances have been used, restarting the iteration",
                self.corpus_len
            );
        }
    }

    /// The mode this selection was built with.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Snapshot of the current counters.
    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Restore previously snapshotted counters.
    pub fn restore_cursor(&mut self, cursor: Cursor) {
        debug_assert!(cursor.iterate_index < self.corpus_len);
        self.cursor = cursor;
    }
}
