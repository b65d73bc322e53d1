//! Objective selection for query and template models
use thiserror::Error;
use tracing::debug;

use crate::metabolic_model::model::Model;

/// How a model's optimization objective should be chosen
#[derive(Clone, Debug, Default, PartialEq)]
pub enum ObjectiveSpec {
    /// Leave the model's objective as it is
    #[default]
    Unchanged,
    /// Search the model for a biomass reaction, preferring a core biomass reaction
    Biomass,
    /// Use the reaction with this id
    Reaction(String),
}

#[derive(Clone, Debug, Error, PartialEq)]
pub enum ObjectiveError {
    #[error("no biomass reaction found in model {0}")]
    BiomassNotFound(String),
    #[error("objective reaction {0} not found in model {1}")]
    InvalidObjective(String, String),
}

/// Point the model's objective at the reaction `spec` selects.
///
/// On failure the model's objective is left untouched; callers decide whether
/// that is fatal (it never is during a gap filling run, see the orchestrator).
pub fn select_objective(model: &mut Model, spec: &ObjectiveSpec) -> Result<(), ObjectiveError> {
    match spec {
        ObjectiveSpec::Unchanged => Ok(()),
        ObjectiveSpec::Biomass => {
            let target = match find_biomass_reaction(model) {
                Some(id) => id,
                None => {
                    return Err(ObjectiveError::BiomassNotFound(
                        model.display_id().to_string(),
                    ))
                }
            };
            debug!(model = model.display_id(), reaction = %target, "selected biomass objective");
            model.set_objective(&target);
            Ok(())
        }
        ObjectiveSpec::Reaction(id) => {
            if !model.reactions.contains_key(id) {
                return Err(ObjectiveError::InvalidObjective(
                    id.clone(),
                    model.display_id().to_string(),
                ));
            }
            model.set_objective(id);
            Ok(())
        }
    }
}

/// Two tier search over reaction ids in stored order, case-insensitive:
/// prefer an id where "biomass" is followed by "core", fall back to any id
/// containing "biomass".
fn find_biomass_reaction(model: &Model) -> Option<String> {
    for id in model.reactions.keys() {
        let lowered = id.to_lowercase();
        if let Some(position) = lowered.find("biomass") {
            if lowered[position + "biomass".len()..].contains("core") {
                return Some(id.clone());
            }
        }
    }
    for id in model.reactions.keys() {
        if id.to_lowercase().contains("biomass") {
            return Some(id.clone());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metabolic_model::reaction::ReactionBuilder;

    fn model_with_reactions(ids: &[&str]) -> Model {
        let mut model = Model::new_empty();
        model.id = Some("query".to_string());
        for id in ids {
            model.add_reaction(
                ReactionBuilder::default()
                    .id(id.to_string())
                    .build()
                    .unwrap(),
            );
        }
        model
    }

    #[test]
    fn biomass_prefers_core_reaction() {
        let mut model = model_with_reactions(&["biomass_other", "biomass_core_v1"]);
        select_objective(&mut model, &ObjectiveSpec::Biomass).unwrap();
        assert!(model.objective.contains_key("biomass_core_v1"));
        assert_eq!(model.objective.len(), 1);
    }

    #[test]
    fn biomass_falls_back_to_any_biomass_reaction() {
        let mut model = model_with_reactions(&["PFK", "biomass_other"]);
        select_objective(&mut model, &ObjectiveSpec::Biomass).unwrap();
        assert!(model.objective.contains_key("biomass_other"));
    }

    #[test]
    fn biomass_match_is_case_insensitive() {
        let mut model = model_with_reactions(&["BIOMASS_Ecoli_core_w_GAM"]);
        select_objective(&mut model, &ObjectiveSpec::Biomass).unwrap();
        assert!(model.objective.contains_key("BIOMASS_Ecoli_core_w_GAM"));
    }

    #[test]
    fn missing_biomass_reports_and_leaves_objective_unchanged() {
        let mut model = model_with_reactions(&["PFK"]);
        model.set_objective("PFK");
        let result = select_objective(&mut model, &ObjectiveSpec::Biomass);
        assert_eq!(
            result,
            Err(ObjectiveError::BiomassNotFound("query".to_string()))
        );
        assert!(model.objective.contains_key("PFK"));
    }

    #[test]
    fn explicit_reaction_id_is_used_when_present() {
        let mut model = model_with_reactions(&["PFK", "PGI"]);
        select_objective(&mut model, &ObjectiveSpec::Reaction("PGI".to_string())).unwrap();
        assert!(model.objective.contains_key("PGI"));
    }

    #[test]
    fn absent_explicit_id_is_invalid_and_leaves_objective_unchanged() {
        let mut model = model_with_reactions(&["PFK"]);
        model.set_objective("PFK");
        let result = select_objective(&mut model, &ObjectiveSpec::Reaction("missing".to_string()));
        assert_eq!(
            result,
            Err(ObjectiveError::InvalidObjective(
                "missing".to_string(),
                "query".to_string()
            ))
        );
        assert!(model.objective.contains_key("PFK"));
    }

    #[test]
    fn unchanged_is_a_no_op() {
        let mut model = model_with_reactions(&["PFK"]);
        model.set_objective("PFK");
        select_objective(&mut model, &ObjectiveSpec::Unchanged).unwrap();
        assert!(model.objective.contains_key("PFK"));
    }
}
