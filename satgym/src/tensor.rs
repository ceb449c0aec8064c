//! Fixed shape encoding of the solver state.

/// Bounds of the observation tensor, fixed for the lifetime of the environment.
///
/// Instances smaller than the bounds are zero padded by the engine; instances
/// exceeding them violate the engine contract and are not checked here.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct TensorDims {
    /// Number of clause rows.
    pub max_clause: usize,
    /// Number of variable columns.
    pub max_var: usize,
}

impl TensorDims {
    /// Number of assignment actions: each variable can be set true or false.
    pub fn action_space(self) -> usize {
        2 * self.max_var
    }

    /// Flat element count of one observation tensor.
    pub fn flat_len(self) -> usize {
        self.max_clause * self.max_var * 2
    }
}

/// A dense `(max_clause, max_var, 2)` snapshot of the solver state.
///
/// Equivalent to a three dimensional array but stored as a single row-major buffer,
/// which is also the form the engine fills in place. The environment allocates a
/// freshly zeroed tensor for every engine call and never writes into one it already
/// returned, so stale state cannot leak between steps.
#[derive(Clone, PartialEq, Debug)]
pub struct Observation {
    dims: TensorDims,
    data: Vec<f32>,
}

impl Observation {
    /// Create a zero filled observation.
    pub fn zeroed(dims: TensorDims) -> Observation {
        Observation {
            dims,
            data: vec![0.0; dims.flat_len()],
        }
    }

    /// Bounds this observation was allocated with.
    pub fn dims(&self) -> TensorDims {
        self.dims
    }

    /// Channel value of a `(clause, variable, polarity)` slot.
    pub fn value(&self, clause: usize, var: usize, polarity: usize) -> f32 {
        debug_assert!(clause < self.dims.max_clause);
        debug_assert!(var < self.dims.max_var);
        debug_assert!(polarity < 2);
        self.data[(clause * self.dims.max_var + var) * 2 + polarity]
    }

    /// The whole tensor as a flat row-major slice.
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Flat mutable view handed to the engine to fill.
    pub(crate) fn as_flat_mut(&mut self) -> &mut [f32] {
        &mut self.data
    }
}
