//! Step conditions: constraints applied to the solution vector at given
//! times during the rollback, such as early exercise.

pub mod american;
pub mod bermudan;
pub mod snapshot;

pub use american::FdmAmericanStepCondition;
pub use bermudan::FdmBermudanStepCondition;
pub use snapshot::FdmSnapshotCondition;

use std::fmt;
use std::sync::Arc;

use ql_core::{errors::Result, Time};
use ql_math::Array;

use crate::finite_differences::meshers::FdmMesher;
use crate::finite_differences::operators::check_size;
use crate::finite_differences::utilities::FdmInnerValueCalculator;

/// A condition applied to the solution vector at time `t`.
pub trait FdmStepCondition: fmt::Debug + Send + Sync {
    /// Mutate `a` in place for time `t`.
    fn apply_to(&self, a: &mut Array, t: Time) -> Result<()>;
}

/// `a[i] ← max(a[i], inner(i, t))` over the whole layout.
pub(crate) fn exercise_into(
    mesher: &dyn FdmMesher,
    calculator: &dyn FdmInnerValueCalculator,
    a: &mut Array,
    t: Time,
) -> Result<()> {
    let layout = mesher.layout();
    check_size(a, layout.size())?;
    for iter in layout.iter() {
        let inner = calculator.inner_value(&iter, t)?;
        let i = iter.index();
        if inner > a[i] {
            a[i] = inner;
        }
    }
    Ok(())
}

// ── Exercise ──────────────────────────────────────────────────────────────────

/// Exercise style of a vanilla contract, in year fractions from today.
#[derive(Debug, Clone, PartialEq)]
pub enum FdmExercise {
    /// Exercise at maturity only.
    European,
    /// Exercise at any time.
    American,
    /// Exercise at the listed times.
    Bermudan(Vec<Time>),
}

// ── Composite ─────────────────────────────────────────────────────────────────

/// An ordered list of step conditions with their merged stopping times.
#[derive(Debug, Clone, Default)]
pub struct FdmStepConditionComposite {
    stopping_times: Vec<Time>,
    conditions: Vec<Arc<dyn FdmStepCondition>>,
}

impl FdmStepConditionComposite {
    /// Merge the stopping-time lists (sorted, duplicates removed) and keep
    /// the conditions in the given order.
    pub fn new(stopping_times: Vec<Vec<Time>>, conditions: Vec<Arc<dyn FdmStepCondition>>) -> Self {
        let mut all: Vec<Time> = stopping_times.into_iter().flatten().collect();
        all.sort_by(|a, b| a.total_cmp(b));
        all.dedup();
        Self {
            stopping_times: all,
            conditions,
        }
    }

    /// Sorted stopping times.
    pub fn stopping_times(&self) -> &[Time] {
        &self.stopping_times
    }

    /// The conditions, in application order.
    pub fn conditions(&self) -> &[Arc<dyn FdmStepCondition>] {
        &self.conditions
    }

    /// `composite` followed by `snapshot`, so the snapshot sees the vector
    /// after every other condition has been applied.
    pub fn join_conditions(
        snapshot: &Arc<FdmSnapshotCondition>,
        composite: &Arc<FdmStepConditionComposite>,
    ) -> Self {
        let conditions = vec![
            composite.clone() as Arc<dyn FdmStepCondition>,
            snapshot.clone() as Arc<dyn FdmStepCondition>,
        ];
        Self::new(
            vec![composite.stopping_times.clone(), vec![snapshot.time()]],
            conditions,
        )
    }

    /// Exercise conditions of a vanilla option.
    pub fn vanilla_composite(
        exercise: &FdmExercise,
        mesher: Arc<dyn FdmMesher>,
        calculator: Arc<dyn FdmInnerValueCalculator>,
    ) -> Result<Self> {
        let mut stopping_times = Vec::new();
        let mut conditions: Vec<Arc<dyn FdmStepCondition>> = Vec::new();
        match exercise {
            FdmExercise::European => {}
            FdmExercise::American => {
                conditions.push(Arc::new(FdmAmericanStepCondition::new(mesher, calculator)));
            }
            FdmExercise::Bermudan(times) => {
                let bermudan = FdmBermudanStepCondition::new(times.clone(), mesher, calculator)?;
                stopping_times.push(bermudan.exercise_times().to_vec());
                conditions.push(Arc::new(bermudan));
            }
        }
        Ok(Self::new(stopping_times, conditions))
    }
}

impl FdmStepCondition for FdmStepConditionComposite {
    fn apply_to(&self, a: &mut Array, t: Time) -> Result<()> {
        self.conditions.iter().try_for_each(|c| c.apply_to(a, t))
    }
}
