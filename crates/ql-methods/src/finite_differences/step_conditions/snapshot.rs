//! Captures the solution vector when the rollback passes a given time.

use std::sync::{Mutex, PoisonError};

use ql_core::{errors::Result, Time};
use ql_math::Array;

use super::FdmStepCondition;

/// Stores a copy of the vector at time `t`.
#[derive(Debug)]
pub struct FdmSnapshotCondition {
    t: Time,
    values: Mutex<Option<Array>>,
}

impl FdmSnapshotCondition {
    /// Snapshot taken at time `t`.
    pub fn new(t: Time) -> Self {
        Self {
            t,
            values: Mutex::new(None),
        }
    }

    /// Snapshot time.
    pub fn time(&self) -> Time {
        self.t
    }

    /// The captured vector, if the rollback has passed the snapshot time.
    pub fn values(&self) -> Option<Array> {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl FdmStepCondition for FdmSnapshotCondition {
    fn apply_to(&self, a: &mut Array, t: Time) -> Result<()> {
        if t == self.t {
            *self.values.lock().unwrap_or_else(PoisonError::into_inner) = Some(a.clone());
        }
        Ok(())
    }
}
