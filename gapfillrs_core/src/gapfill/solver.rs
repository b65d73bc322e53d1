//! Seam traits for the external optimization capabilities: flux balance
//! evaluation and the mixed integer minimal reaction set solver
use thiserror::Error;

use crate::metabolic_model::model::Model;
use crate::metabolic_model::reaction::Reaction;

/// Result of evaluating a model's flux objective
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FluxOutcome {
    /// The problem solved; value of the objective at the optimum
    Feasible(f64),
    /// No flux distribution satisfies the constraints
    Infeasible,
}

/// Capability to evaluate a model's objective by flux balance optimization
pub trait FluxEvaluator {
    fn optimize(&mut self, model: &Model) -> FluxOutcome;
}

/// Failure kinds surfaced by the reaction selection solver.
///
/// These are the only two distinguished for reporting; anything else a solver
/// backend can fail with has to be mapped onto one of them.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum GapfillSolverError {
    /// A reaction subset was found but failed to restore feasibility when
    /// re-checked, commonly caused by too loose an integrality tolerance
    #[error("candidate reactions failed validation, try lowering the integer threshold")]
    ValidationFailed,
    /// No reaction subset within the search space restores feasibility
    #[error("no reaction subset restores feasibility")]
    Infeasible,
}

/// Options forwarded to the reaction selection solver
#[derive(Clone, Debug)]
pub struct SolverOptions {
    /// Tolerance controlling how strictly binary selection variables must
    /// resolve to 0/1
    pub integer_threshold: f64,
    /// Number of candidate sets to request
    pub iterations: usize,
    /// Whether open ended demand sinks may be offered as candidates
    pub demand_reactions: bool,
}

/// Capability to propose a minimal cardinality reaction set from a donor pool
/// whose addition makes the model's objective feasible
pub trait GapfillSolver {
    fn fill(
        &mut self,
        model: &Model,
        pool: &Model,
        options: &SolverOptions,
    ) -> Result<Vec<Reaction>, GapfillSolverError>;
}

/// Outcome of one gap fill invocation against one template
#[derive(Clone, Debug)]
pub enum GapfillOutcome {
    /// Candidate reactions proposed for adoption, in solver order
    Candidates(Vec<Reaction>),
    /// The proposed subset failed re-validation; template should be skipped
    ValidationFailed,
    /// No subset restores feasibility; template should be skipped
    Infeasible,
}

/// Invoke the reaction selection solver against a single template pool.
///
/// Demand sinks are never offered as candidates. The solver's two failure
/// kinds are folded into the outcome so the caller decides policy without
/// error plumbing.
pub fn invoke_gapfill<S: GapfillSolver>(
    solver: &mut S,
    model: &Model,
    template: &Model,
    integer_threshold: f64,
    iterations: usize,
) -> GapfillOutcome {
    let options = SolverOptions {
        integer_threshold,
        iterations,
        demand_reactions: false,
    };
    match solver.fill(model, template, &options) {
        Ok(reactions) => GapfillOutcome::Candidates(reactions),
        Err(GapfillSolverError::ValidationFailed) => GapfillOutcome::ValidationFailed,
        Err(GapfillSolverError::Infeasible) => GapfillOutcome::Infeasible,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct RecordingSolver {
        seen_options: Option<SolverOptions>,
        response: Result<Vec<Reaction>, GapfillSolverError>,
    }

    impl GapfillSolver for RecordingSolver {
        fn fill(
            &mut self,
            _model: &Model,
            _pool: &Model,
            options: &SolverOptions,
        ) -> Result<Vec<Reaction>, GapfillSolverError> {
            self.seen_options = Some(options.clone());
            self.response.clone()
        }
    }

    #[test]
    fn demand_reactions_are_never_requested() {
        let mut solver = RecordingSolver {
            seen_options: None,
            response: Ok(Vec::new()),
        };
        let model = Model::new_empty();
        let template = Model::new_empty();
        let outcome = invoke_gapfill(&mut solver, &model, &template, 1e-6, 1);
        assert!(matches!(outcome, GapfillOutcome::Candidates(_)));
        let options = solver.seen_options.unwrap();
        assert!(!options.demand_reactions);
        assert!((options.integer_threshold - 1e-6).abs() < 1e-25);
        assert_eq!(options.iterations, 1);
    }

    #[test]
    fn solver_failures_map_to_tagged_outcomes() {
        let model = Model::new_empty();
        let template = Model::new_empty();

        let mut failing = RecordingSolver {
            seen_options: None,
            response: Err(GapfillSolverError::ValidationFailed),
        };
        assert!(matches!(
            invoke_gapfill(&mut failing, &model, &template, 1e-6, 1),
            GapfillOutcome::ValidationFailed
        ));

        let mut infeasible = RecordingSolver {
            seen_options: None,
            response: Err(GapfillSolverError::Infeasible),
        };
        assert!(matches!(
            invoke_gapfill(&mut infeasible, &model, &template, 1e-6, 1),
            GapfillOutcome::Infeasible
        ));
    }
}
