//! Early exercise on a discrete set of dates.

use std::sync::Arc;

use ql_core::{errors::Result, Time};
use ql_math::Array;

use super::{exercise_into, FdmStepCondition};
use crate::finite_differences::meshers::FdmMesher;
use crate::finite_differences::utilities::FdmInnerValueCalculator;

/// Exercises only when `t` is one of the exercise times.
///
/// Exercise times are also stopping times of the rollback, so the lookup
/// is an exact match.
#[derive(Debug, Clone)]
pub struct FdmBermudanStepCondition {
    exercise_times: Vec<Time>,
    mesher: Arc<dyn FdmMesher>,
    calculator: Arc<dyn FdmInnerValueCalculator>,
}

impl FdmBermudanStepCondition {
    /// Bermudan exercise at `exercise_times` (any order, duplicates removed).
    pub fn new(
        exercise_times: Vec<Time>,
        mesher: Arc<dyn FdmMesher>,
        calculator: Arc<dyn FdmInnerValueCalculator>,
    ) -> Result<Self> {
        ql_core::ensure_arg!(
            exercise_times.iter().all(|t| t.is_finite() && *t >= 0.0),
            "exercise times must be finite and non-negative"
        );
        let mut exercise_times = exercise_times;
        exercise_times.sort_by(|a, b| a.total_cmp(b));
        exercise_times.dedup();
        Ok(Self {
            exercise_times,
            mesher,
            calculator,
        })
    }

    /// Sorted exercise times.
    pub fn exercise_times(&self) -> &[Time] {
        &self.exercise_times
    }
}

impl FdmStepCondition for FdmBermudanStepCondition {
    fn apply_to(&self, a: &mut Array, t: Time) -> Result<()> {
        if self
            .exercise_times
            .binary_search_by(|probe| probe.total_cmp(&t))
            .is_ok()
        {
            exercise_into(self.mesher.as_ref(), self.calculator.as_ref(), a, t)?;
        }
        Ok(())
    }
}
