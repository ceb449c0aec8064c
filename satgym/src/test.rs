//! Test utilities.
//!
//! A scripted in-memory engine standing in for the external solver, plus helpers for
//! building on-disk corpus fixtures.
use std::cell::RefCell;
use std::collections::{HashSet, VecDeque};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use tempfile::TempDir;

use satgym_engine::{Engine, EngineError, Session};

/// Create a directory holding empty instance files with the given names.
pub fn corpus_dir(names: &[&str]) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    for name in names {
        File::create(dir.path().join(name)).unwrap();
    }
    dir
}

/// Scripted stand-in for the external engine.
///
/// Each opened session gets a serial number and marks the first tensor slot with it,
/// so tests can tell sessions and their states apart. Every buffer handed in is
/// asserted to be all zero, which pins down the environment's fresh tensor contract.
pub struct TestEngine {
    /// File names whose sessions report an init failure.
    pub reject: HashSet<String>,
    /// Status codes handed out by consecutive simulate calls of each session.
    pub simulate_codes: Vec<i32>,
    /// Number of steps after which a session reports done.
    pub steps_until_done: usize,
    /// Paths opened so far, in order.
    pub opened: Rc<RefCell<Vec<PathBuf>>>,
}

impl TestEngine {
    pub fn new() -> TestEngine {
        TestEngine {
            reject: HashSet::new(),
            simulate_codes: vec![],
            steps_until_done: 2,
            opened: Rc::new(RefCell::new(vec![])),
        }
    }

    /// An engine whose sessions fail to initialize for the named files.
    pub fn rejecting(names: &[&str]) -> TestEngine {
        let mut engine = TestEngine::new();
        engine.reject = names.iter().map(|&name| name.to_owned()).collect();
        engine
    }
}

/// File names recorded by a [`TestEngine`]'s open log.
pub fn opened_names(opened: &Rc<RefCell<Vec<PathBuf>>>) -> Vec<String> {
    opened
        .borrow()
        .iter()
        .map(|path| path.file_name().unwrap().to_string_lossy().into_owned())
        .collect()
}

impl Engine for TestEngine {
    type Session = TestSession;

    fn open(&self, path: &Path) -> Result<TestSession, EngineError> {
        self.opened.borrow_mut().push(path.to_owned());
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        Ok(TestSession {
            marker: self.opened.borrow().len() as f32,
            reject: self.reject.contains(&name),
            codes: self.simulate_codes.iter().cloned().collect(),
            steps_left: self.steps_until_done,
            last_decision: None,
            done: false,
        })
    }
}

/// Session produced by a [`TestEngine`].
pub struct TestSession {
    marker: f32,
    reject: bool,
    codes: VecDeque<i32>,
    steps_left: usize,
    last_decision: Option<usize>,
    done: bool,
}

fn assert_zeroed(state: &[f32]) {
    assert!(
        state.iter().all(|&channel| channel == 0.0),
        "environment handed the engine a stale buffer"
    );
}

impl Session for TestSession {
    fn init(&mut self, state: &mut [f32]) -> bool {
        assert_zeroed(state);
        if self.reject {
            return false;
        }
        state[0] = self.marker;
        true
    }

    fn set_decision(&mut self, action: usize) {
        self.last_decision = Some(action);
    }

    fn step(&mut self, state: &mut [f32]) {
        assert_zeroed(state);
        state[0] = self.marker;
        state[1] = self.last_decision.map_or(0.0, |action| action as f32 + 1.0);
        self.steps_left = self.steps_left.saturating_sub(1);
        self.done = self.steps_left == 0;
    }

    fn done(&self) -> bool {
        self.done
    }

    fn simulate(&mut self, state: &mut [f32], _pi: &[f32], _v: f32) -> i32 {
        assert_zeroed(state);
        state[0] = self.marker;
        self.codes.pop_front().unwrap_or(0)
    }

    fn visit_counts(&self, counts: &mut [f32]) {
        for (action, count) in counts.iter_mut().enumerate() {
            *count = action as f32;
        }
    }
}
