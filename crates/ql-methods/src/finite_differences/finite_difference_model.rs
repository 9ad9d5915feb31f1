//! Backward rollback of a solution vector with a time-stepping scheme.

use log::trace;
use ql_core::{errors::Result, Real, Size, Time};
use ql_math::Array;

use super::schemes::TimeSteppingScheme;
use super::step_conditions::FdmStepCondition;

/// Drives a scheme over a grid of equal steps, splitting any step that
/// crosses a stopping time so that step conditions see the exact time.
#[derive(Debug, Clone)]
pub struct FiniteDifferenceModel<S> {
    evolver: S,
    stopping_times: Vec<Time>,
}

impl<S: TimeSteppingScheme> FiniteDifferenceModel<S> {
    /// Model around `evolver`; `stopping_times` are sorted and deduplicated.
    pub fn new(evolver: S, stopping_times: Vec<Time>) -> Self {
        let mut stopping_times = stopping_times;
        stopping_times.sort_by(|a, b| a.total_cmp(b));
        stopping_times.dedup();
        Self {
            evolver,
            stopping_times,
        }
    }

    /// The wrapped scheme.
    pub fn evolver(&self) -> &S {
        &self.evolver
    }

    /// Sorted stopping times.
    pub fn stopping_times(&self) -> &[Time] {
        &self.stopping_times
    }

    /// Roll `a` back from `from` to `to` in `steps` equal steps.
    ///
    /// `condition` is applied at the end of every step and at every
    /// stopping time passed on the way, and at `from` itself when the last
    /// stopping time equals `from`.
    ///
    /// # Errors
    /// [`ql_core::Error::InvalidTimeStep`] if `from < to`,
    /// [`ql_core::Error::InvalidArgument`] if `steps == 0`; errors of the
    /// scheme and the condition are propagated.
    pub fn rollback(
        &mut self,
        a: &mut Array,
        from: Time,
        to: Time,
        steps: Size,
        condition: Option<&dyn FdmStepCondition>,
    ) -> Result<()> {
        if from < to {
            return Err(ql_core::Error::InvalidTimeStep(format!(
                "trying to roll back from {from} to {to}"
            )));
        }
        ql_core::ensure_arg!(steps > 0, "at least one time step is required");

        let dt = (from - to) / steps as Real;
        let mut t = from;
        self.evolver.set_step(dt);

        if let Some(cond) = condition {
            if self.stopping_times.last() == Some(&from) {
                cond.apply_to(a, from)?;
            }
        }

        for _ in 0..steps {
            let mut now = t;
            let mut next = t - dt;
            if (to - next).abs() < Real::EPSILON.sqrt() {
                next = to;
            }

            let mut hit = false;
            for &stop in self.stopping_times.iter().rev() {
                if next <= stop && stop < now {
                    hit = true;
                    trace!("stopping time {stop} hit between {now} and {next}");
                    self.evolver.set_step(now - stop);
                    self.evolver.step(a, now)?;
                    if let Some(cond) = condition {
                        cond.apply_to(a, stop)?;
                    }
                    now = stop;
                }
            }

            if hit {
                if now > next {
                    self.evolver.set_step(now - next);
                    self.evolver.step(a, now)?;
                    if let Some(cond) = condition {
                        cond.apply_to(a, next)?;
                    }
                }
                self.evolver.set_step(dt);
            } else {
                self.evolver.step(a, now)?;
                if let Some(cond) = condition {
                    cond.apply_to(a, next)?;
                }
            }
            t -= dt;
        }
        Ok(())
    }
}
