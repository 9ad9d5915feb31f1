//! Early exercise at every time step.

use std::sync::Arc;

use ql_core::{errors::Result, Time};
use ql_math::Array;

use super::{exercise_into, FdmStepCondition};
use crate::finite_differences::meshers::FdmMesher;
use crate::finite_differences::utilities::FdmInnerValueCalculator;

/// Replaces every value below the inner value by the inner value.
#[derive(Debug, Clone)]
pub struct FdmAmericanStepCondition {
    mesher: Arc<dyn FdmMesher>,
    calculator: Arc<dyn FdmInnerValueCalculator>,
}

impl FdmAmericanStepCondition {
    /// American exercise against `calculator` on `mesher`.
    pub fn new(mesher: Arc<dyn FdmMesher>, calculator: Arc<dyn FdmInnerValueCalculator>) -> Self {
        Self { mesher, calculator }
    }
}

impl FdmStepCondition for FdmAmericanStepCondition {
    fn apply_to(&self, a: &mut Array, t: Time) -> Result<()> {
        exercise_into(self.mesher.as_ref(), self.calculator.as_ref(), a, t)
    }
}
