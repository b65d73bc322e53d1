//! The gap filling loop: per template bridging, solving, evaluation, and the
//! accept/cap/reject policy
use derive_builder::Builder;
use indexmap::IndexMap;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::gapfill::bridge::{add_exchange_reactions, add_transport_reactions};
use crate::gapfill::objective::{select_objective, ObjectiveSpec};
use crate::gapfill::solver::{
    invoke_gapfill, FluxEvaluator, FluxOutcome, GapfillOutcome, GapfillSolver,
};
use crate::io::json::JsonError;
use crate::metabolic_model::model::Model;

/// Where an added reaction came from
#[derive(Clone, Debug, PartialEq)]
pub enum Provenance {
    /// Copied over as an exchange reaction
    Exchange,
    /// Contributed by the template through the listed genes
    Genes(Vec<String>),
}

/// One reaction added to the query model, with its provenance
#[derive(Clone, Debug, PartialEq)]
pub struct AddedReaction {
    pub id: String,
    pub provenance: Provenance,
}

/// Reactions contributed per template, keyed by template id, in application order
pub type AddedReactionsLog = IndexMap<String, Vec<AddedReaction>>;

/// Parameters of a gap filling run
#[derive(Builder, Clone, Debug)]
pub struct GapfillConfig {
    /// Objective selection applied to the query model at loop start
    #[builder(default)]
    pub model_objective: ObjectiveSpec,
    /// Objective selection applied to each template before it is used.
    ///
    /// Only mutates the template's own objective; the solve is constrained by
    /// the query model's objective, so this is configuration symmetry rather
    /// than behavior.
    #[builder(default)]
    pub template_objective: ObjectiveSpec,
    /// Apply every template unconditionally instead of stopping once the
    /// objective stops improving. In this mode no contribution is capped or
    /// rejected.
    #[builder(default = "false")]
    pub use_all_templates: bool,
    /// Integrality tolerance handed to the reaction selection solver
    #[builder(default = "1e-6")]
    pub integer_threshold: f64,
    /// Number of candidate sets requested per solve
    #[builder(default = "1")]
    pub iterations: usize,
    /// Copy matching exchange reactions from each template before solving
    #[builder(default = "false")]
    pub force_exchange: bool,
    /// Copy matching transport reactions from each template before solving
    #[builder(default = "false")]
    pub force_transport: bool,
    /// Transport classification requires both sides to carry the same compounds
    #[builder(default = "false")]
    pub transport_all_compounds: bool,
    /// Transport classification disregards a shared bare proton
    #[builder(default = "false")]
    pub transport_ignore_h: bool,
    /// Minimum acceptable fraction of the prior best objective before a
    /// template's contribution is rejected outright
    #[builder(default = "0.8")]
    pub value_fraction: f64,
}

impl Default for GapfillConfig {
    fn default() -> Self {
        GapfillConfig {
            model_objective: ObjectiveSpec::Unchanged,
            template_objective: ObjectiveSpec::Unchanged,
            use_all_templates: false,
            integer_threshold: 1e-6,
            iterations: 1,
            force_exchange: false,
            force_transport: false,
            transport_all_compounds: false,
            transport_ignore_h: false,
            value_fraction: 0.8,
        }
    }
}

/// Result of a gap filling run
#[derive(Clone, Debug)]
pub struct GapfillReport {
    /// The query model after gap filling
    pub model: Model,
    /// Reactions contributed per template, with provenance
    pub added_reactions: AddedReactionsLog,
    /// Final objective value (0.0 if the model never became feasible)
    pub objective_value: f64,
}

#[derive(Debug, Error)]
pub enum GapfillError {
    /// The structural rebuild between templates failed. Fatal: every later
    /// template depends on a consistent model.
    #[error("structural model rebuild failed: {0}")]
    StructuralReload(#[from] JsonError),
}

/// Gap fill a model against an ordered sequence of homologous templates.
///
/// For each template: optionally inject bridging exchange/transport reactions,
/// ask the solver for a minimal candidate reaction set, adopt it, re-evaluate
/// the objective, and accept, cap, or reject the contribution against the
/// running best value. Solver failures skip the template. The model is
/// structurally rebuilt between applied templates so each solve starts from a
/// consistent state.
pub fn homology_gapfill<S, E>(
    mut model: Model,
    mut templates: Vec<Model>,
    config: &GapfillConfig,
    solver: &mut S,
    evaluator: &mut E,
) -> Result<GapfillReport, GapfillError>
where
    S: GapfillSolver,
    E: FluxEvaluator,
{
    if let Err(err) = select_objective(&mut model, &config.model_objective) {
        warn!(%err, "query model objective left unchanged");
    }
    let mut added_reactions: AddedReactionsLog = IndexMap::new();
    let mut value = match evaluator.optimize(&model) {
        FluxOutcome::Feasible(v) => v,
        FluxOutcome::Infeasible => 0.0,
    };
    info!(
        initial_value = value,
        templates = templates.len(),
        "starting gap filling"
    );

    for (index, template) in templates.iter_mut().enumerate() {
        let template_id = match template.id {
            Some(ref id) => id.clone(),
            None => format!("template_{}", index),
        };
        if let Err(err) = select_objective(template, &config.template_objective) {
            warn!(template = %template_id, %err, "template objective left unchanged");
        }

        // Bridging reactions go in first so the solver sees them as part of
        // the model rather than as candidates
        let mut log: Vec<AddedReaction> = Vec::new();
        if config.force_exchange {
            for id in add_exchange_reactions(&mut model, template) {
                log.push(AddedReaction {
                    id,
                    provenance: Provenance::Exchange,
                });
            }
        }
        if config.force_transport {
            let added = add_transport_reactions(
                &mut model,
                template,
                config.transport_all_compounds,
                config.transport_ignore_h,
            );
            for (id, genes) in added {
                log.push(AddedReaction {
                    id,
                    provenance: Provenance::Genes(genes),
                });
            }
        }

        let candidates = match invoke_gapfill(
            solver,
            &model,
            template,
            config.integer_threshold,
            config.iterations,
        ) {
            GapfillOutcome::Candidates(reactions) => reactions,
            GapfillOutcome::ValidationFailed => {
                warn!(
                    template = %template_id,
                    "failed to validate gap filled model, try lowering the integer threshold"
                );
                retract(&mut model, &log);
                continue;
            }
            GapfillOutcome::Infeasible => {
                warn!(template = %template_id, "gap filling optimization failed (infeasible)");
                retract(&mut model, &log);
                continue;
            }
        };

        for reaction in &candidates {
            let provenance = if reaction.is_exchange() {
                Provenance::Exchange
            } else {
                Provenance::Genes(reaction.gene_ids())
            };
            log.push(AddedReaction {
                id: reaction.id.clone(),
                provenance,
            });
            model.adopt_reaction(reaction, template);
        }
        added_reactions.insert(template_id.clone(), log.clone());

        if config.use_all_templates {
            model = model.rebuilt()?;
            continue;
        }

        let new_value = match evaluator.optimize(&model) {
            FluxOutcome::Feasible(v) => v,
            FluxOutcome::Infeasible => {
                // Adding reactions cannot make a previously feasible problem
                // infeasible; keep the additions and move on
                debug!(template = %template_id, "objective infeasible after additions, moving on");
                continue;
            }
        };

        if new_value > value {
            info!(template = %template_id, value = new_value, "template accepted");
            value = new_value;
        } else if new_value == value {
            info!(template = %template_id, value, "objective stopped improving, stopping early");
            break;
        } else if new_value >= value * config.value_fraction {
            info!(
                template = %template_id,
                value = new_value,
                prior_best = value,
                "template capped, keeping its reactions with zeroed flux bounds"
            );
            for entry in &log {
                if let Some(reaction) = model.reactions.get_mut(&entry.id) {
                    reaction.silence();
                }
            }
            if let FluxOutcome::Feasible(v) = evaluator.optimize(&model) {
                value = v;
            }
        } else {
            info!(
                template = %template_id,
                value = new_value,
                prior_best = value,
                "template rejected, rolling back its reactions"
            );
            retract(&mut model, &log);
            added_reactions.shift_remove(&template_id);
            break;
        }

        // Rebuild so the next solve starts from a structurally consistent model
        model = model.rebuilt()?;
    }

    let objective_value = if config.use_all_templates {
        match evaluator.optimize(&model) {
            FluxOutcome::Feasible(v) => v,
            FluxOutcome::Infeasible => 0.0,
        }
    } else {
        value
    };
    Ok(GapfillReport {
        model,
        added_reactions,
        objective_value,
    })
}

/// Remove every reaction recorded in `log` from the model
fn retract(model: &mut Model, log: &[AddedReaction]) {
    for entry in log {
        model.remove_reaction(&entry.id);
    }
}
