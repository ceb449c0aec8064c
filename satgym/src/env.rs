//! Training environment session management.
use std::path::PathBuf;

use log::info;
use thiserror::Error;

use satgym_engine::{Engine, EngineError, SearchStatus, Session};

use crate::config::{ConfigError, EnvOptions};
use crate::corpus::Corpus;
use crate::select::{Cursor, Mode, Selection};
use crate::tensor::{Observation, TensorDims};

/// Possible errors while running an environment.
#[derive(Debug, Error)]
pub enum EnvError {
    #[error("engine could not initialize a session for {}", path.display())]
    InitFailed { path: PathBuf },
    #[error(
        "file number {} is out of range for a corpus of {} instances",
        file_no,
        corpus_len
    )]
    FileOutOfRange { file_no: usize, corpus_len: usize },
    #[error("no live session, reset the environment first")]
    NoSession,
    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// A SAT solving engine wrapped as a stateful training environment.
///
/// Every reset picks a problem instance according to the configured mode, discards
/// the previous engine session and starts a fresh one bound to that instance. Between
/// resets the environment relays decisions, search iterations and visit count reads
/// to the live session. All calls are synchronous and run to completion; one
/// environment drives one session at a time.
pub struct SatEnv<E: Engine> {
    engine: E,
    corpus: Corpus,
    dims: TensorDims,
    selection: Selection,
    session: Option<E::Session>,
}

impl<E: Engine> SatEnv<E> {
    /// Create an environment over the instances in `options.directory`.
    ///
    /// All configuration errors surface here, never at first use.
    pub fn new(engine: E, options: EnvOptions) -> Result<SatEnv<E>, ConfigError> {
        let corpus = Corpus::new(options.directory)?;
        let mode = Mode::resolve(&options.mode, &corpus)?;
        let dims = TensorDims {
            max_clause: options.max_clause,
            max_var: options.max_var,
        };

        info!(
            "environment over {} instances, state bounds {}x{}x2, mode {:?}",
            corpus.len(),
            dims.max_clause,
            dims.max_var,
            mode
        );

        let selection = Selection::new(mode, corpus.len());

        Ok(SatEnv {
            engine,
            corpus,
            dims,
            selection,
            session: None,
        })
    }

    /// Bounds of the observation tensors produced by this environment.
    pub fn dims(&self) -> TensorDims {
        self.dims
    }

    /// Number of assignment actions.
    pub fn action_space(&self) -> usize {
        self.dims.action_space()
    }

    /// The instance corpus.
    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    /// Snapshot of the selection counters.
    pub fn cursor(&self) -> Cursor {
        self.selection.cursor()
    }

    /// Restore previously snapshotted selection counters.
    pub fn restore_cursor(&mut self, cursor: Cursor) {
        self.selection.restore_cursor(cursor)
    }

    /// Start a new session on the instance picked by the selection mode.
    ///
    /// The previous session, if any, is discarded. An engine that rejects the picked
    /// instance is a hard error here: the training loop cannot continue without a
    /// live session.
    pub fn reset(&mut self) -> Result<Observation, EnvError> {
        let index = self.selection.pick();
        match self.start_session(index)? {
            Some(state) => Ok(state),
            None => Err(EnvError::InitFailed {
                path: self.corpus.path(index).to_owned(),
            }),
        }
    }

    /// Start a new session on the instance with the given corpus index.
    ///
    /// Bypasses the selection mode and leaves its counters untouched. In contrast to
    /// [`reset`](SatEnv::reset), an engine that rejects the instance yields
    /// `Ok(None)`, so callers probing many candidate files can move on to the next
    /// one without special casing. An out of range index fails before any session or
    /// cursor state is touched.
    pub fn reset_at(&mut self, file_no: usize) -> Result<Option<Observation>, EnvError> {
        if file_no >= self.corpus.len() {
            return Err(EnvError::FileOutOfRange {
                file_no,
                corpus_len: self.corpus.len(),
            });
        }
        self.start_session(file_no)
    }

    fn start_session(&mut self, index: usize) -> Result<Option<Observation>, EnvError> {
        // The engine is stateful: drop the old session before opening the next one.
        self.session = None;

        let path = self.corpus.path(index);
        let mut state = Observation::zeroed(self.dims);
        let mut session = self.engine.open(path)?;

        if !session.init(state.as_flat_mut()) {
            return Ok(None);
        }

        self.session = Some(session);
        Ok(Some(state))
    }

    /// Apply one assignment decision to the live session.
    ///
    /// Returns the resulting state and whether the instance reached a finished
    /// state.
    pub fn step(&mut self, decision: usize) -> Result<(Observation, bool), EnvError> {
        debug_assert!(decision < self.dims.action_space());

        let session = self.session.as_mut().ok_or(EnvError::NoSession)?;
        session.set_decision(decision);

        let mut state = Observation::zeroed(self.dims);
        session.step(state.as_flat_mut());
        Ok((state, session.done()))
    }

    /// Advance the tree search of the live session by one iteration.
    ///
    /// `pi` and `v` evaluate the state returned by the previous `simulate` or `step`
    /// call; `pi` must have one entry per action. The decoded status says whether the
    /// returned state needs a fresh evaluation and whether more search is required
    /// before [`visit_counts`](SatEnv::visit_counts) can be harvested. A status code
    /// outside the protocol is fatal and performs no further session mutation.
    pub fn simulate(
        &mut self,
        pi: &[f32],
        v: f32,
    ) -> Result<(Observation, SearchStatus), EnvError> {
        debug_assert_eq!(pi.len(), self.dims.action_space());

        let session = self.session.as_mut().ok_or(EnvError::NoSession)?;
        let mut state = Observation::zeroed(self.dims);
        let code = session.simulate(state.as_flat_mut(), pi, v);
        let status = SearchStatus::from_code(code)?;
        Ok((state, status))
    }

    /// Visit counts accumulated at the search root of the live session.
    ///
    /// One entry per assignment action. Pure read, the session is not mutated.
    pub fn visit_counts(&self) -> Result<Vec<f32>, EnvError> {
        let session = self.session.as_ref().ok_or(EnvError::NoSession)?;
        let mut counts = vec![0.0; self.dims.action_space()];
        session.visit_counts(&mut counts);
        Ok(counts)
    }
}
