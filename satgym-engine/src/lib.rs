//! Call contract between the satgym training environment and the solving/search engine.
//!
//! The engine owns everything hard: unit propagation, clause learning, backtracking and
//! the tree search statistics. This crate only fixes the shape of the boundary, so the
//! environment can be driven against any binding of the engine (in-process, foreign
//! function or across a process boundary) without changing the adapter layer.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Possible errors at the engine boundary.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("could not open problem instance {}: {}", path.display(), source)]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("engine returned simulation status code {} outside the valid range 0..=3", code)]
    InvalidStatusCode { code: i32 },
}

/// Factory side of the engine boundary.
///
/// One call to [`open`](Engine::open) produces one [`Session`] bound to exactly one
/// problem instance.
pub trait Engine {
    type Session: Session;

    /// Create a session for the problem instance stored at `path`.
    fn open(&self, path: &Path) -> Result<Self::Session, EngineError>;
}

/// One live handle into the engine, scoped to a single problem instance.
///
/// All buffers passed here are flat row-major views of the environment's observation
/// tensor. The engine is stateful and order-sensitive: calls must reflect the true
/// order of decisions applied, and a session must never be driven from more than one
/// logical thread of control at a time.
pub trait Session {
    /// Fill `state` with the instance's initial encoding.
    ///
    /// Returns `false` if the engine could not set up the instance (e.g. it is
    /// malformed or solved away by preprocessing).
    fn init(&mut self, state: &mut [f32]) -> bool;

    /// Record an assignment decision, consumed by the next call to [`step`](Session::step).
    fn set_decision(&mut self, action: usize);

    /// Apply the recorded decision and fill `state` with the resulting encoding.
    fn step(&mut self, state: &mut [f32]);

    /// Whether the instance reached a finished state.
    fn done(&self) -> bool;

    /// Advance the tree search by one iteration, feeding back the evaluation `(pi, v)`
    /// for the state produced by the previous call.
    ///
    /// Fills `state` as a side effect and returns a raw status code, decoded by
    /// [`SearchStatus::from_code`].
    fn simulate(&mut self, state: &mut [f32], pi: &[f32], v: f32) -> i32;

    /// Fill `counts` with the per-action visit counts at the current search root.
    fn visit_counts(&self, counts: &mut [f32]);
}

/// Decoded outcome of one [`Session::simulate`] call.
///
/// The engine reports two independent facts packed into a 2-bit code. Raw codes never
/// travel past this decoder.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct SearchStatus {
    /// The returned tensor is a new leaf state that needs a `(pi, v)` evaluation
    /// before the next simulation call.
    pub need_evaluate: bool,
    /// More search iterations are required before a decision is ready. When unset,
    /// search has converged and the visit counts can be harvested.
    pub need_more_search: bool,
}

impl SearchStatus {
    /// Decode a raw engine status code.
    ///
    /// Valid codes are exactly `{0, 1, 2, 3}`: bit 0 is `need_evaluate`, bit 1 is
    /// `need_more_search`. Anything else means the engine and this adapter disagree
    /// about the protocol, which is never recoverable.
    pub fn from_code(code: i32) -> Result<SearchStatus, EngineError> {
        match code {
            0..=3 => Ok(SearchStatus {
                need_evaluate: code & 1 != 0,
                need_more_search: code & 2 != 0,
            }),
            _ => Err(EngineError::InvalidStatusCode { code }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_decode_to_their_flag_pairs() {
        let decoded: Vec<_> = (0..4)
            .map(|code| SearchStatus::from_code(code).unwrap())
            .map(|status| (status.need_evaluate, status.need_more_search))
            .collect();

        assert_eq!(
            decoded,
            vec![(false, false), (true, false), (false, true), (true, true)]
        );
    }

    #[test]
    fn out_of_range_codes_are_rejected() {
        for &code in [-1, 4, 5, 17, i32::max_value()].iter() {
            match SearchStatus::from_code(code) {
                Err(EngineError::InvalidStatusCode { code: reported }) => {
                    assert_eq!(reported, code)
                }
                other => panic!("code {} not rejected: {:?}", code, other),
            }
        }
    }
}
