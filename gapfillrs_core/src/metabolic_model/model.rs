//! This module provides the Model struct for representing an entire metabolic model
use crate::metabolic_model::gene::Gene;
use crate::metabolic_model::metabolite::{strip_compartment_suffix, Metabolite};
use crate::metabolic_model::reaction::Reaction;

use indexmap::{IndexMap, IndexSet};

/// Represents a Genome Scale Metabolic Model
#[derive(Clone, Debug)]
pub struct Model {
    /// Map of reaction ids to Reaction Objects
    pub reactions: IndexMap<String, Reaction>,
    /// Map of gene ids to Gene Objects
    pub genes: IndexMap<String, Gene>,
    /// Map of metabolite ids to Metabolite Objects
    pub metabolites: IndexMap<String, Metabolite>,
    /// Map of reaction ids to objective function coefficients
    pub objective: IndexMap<String, f64>,
    /// Id associated with the Model
    pub id: Option<String>,
    /// Compartments in the model
    ///
    /// An IndexMap<String, String> of {short name: long name}
    pub compartments: Option<IndexMap<String, String>>,
    /// A version identifier for the Model, stored as a string
    pub version: Option<String>,
}

impl Model {
    pub fn new_empty() -> Self {
        Model {
            reactions: IndexMap::new(),
            genes: IndexMap::new(),
            metabolites: IndexMap::new(),
            objective: IndexMap::new(),
            id: None,
            compartments: None,
            version: None,
        }
    }

    /// Add a reaction to the model
    ///
    /// # Parameters
    /// - reaction: Reaction to add
    ///
    /// # Examples
    /// ```rust
    /// use gapfillrs_core::metabolic_model::model::Model;
    /// use gapfillrs_core::metabolic_model::reaction::{Reaction, ReactionBuilder};
    /// let mut model = Model::new_empty();
    /// let new_reaction = ReactionBuilder::default().id("new_reaction".to_string()).build().unwrap();
    /// model.add_reaction(new_reaction);
    /// ```
    pub fn add_reaction(&mut self, reaction: Reaction) {
        let id = reaction.id.clone();
        self.reactions.insert(id, reaction);
    }

    /// Add a gene to the model
    pub fn add_gene(&mut self, gene: Gene) {
        let id = gene.id.clone();
        self.genes.insert(id, gene);
    }

    /// Add a metabolite to the model
    pub fn add_metabolite(&mut self, metabolite: Metabolite) {
        let id = metabolite.id.clone();
        self.metabolites.insert(id, metabolite);
    }

    /// Remove a reaction from the model by id, returning it if it was present
    pub fn remove_reaction(&mut self, id: &str) -> Option<Reaction> {
        self.reactions.shift_remove(id)
    }

    /// Copy a reaction from a donor model into this one.
    ///
    /// Any metabolites or genes the reaction references which this model lacks
    /// are registered as well, taken from the donor where the donor carries
    /// them and created bare otherwise.
    pub fn adopt_reaction(&mut self, reaction: &Reaction, donor: &Model) {
        for metabolite_id in reaction.metabolites.keys() {
            if !self.metabolites.contains_key(metabolite_id) {
                let metabolite = donor
                    .metabolites
                    .get(metabolite_id)
                    .cloned()
                    .unwrap_or_else(|| Metabolite::with_id(metabolite_id));
                self.add_metabolite(metabolite);
            }
        }
        for gene_id in &reaction.genes {
            if !self.genes.contains_key(gene_id) {
                let gene = donor
                    .genes
                    .get(gene_id)
                    .cloned()
                    .unwrap_or_else(|| Gene::with_id(gene_id));
                self.add_gene(gene);
            }
        }
        self.add_reaction(reaction.clone());
    }

    /// Set the objective to maximizing flux through a single reaction
    pub fn set_objective(&mut self, reaction_id: &str) {
        self.objective.clear();
        self.objective.insert(reaction_id.to_string(), 1.0);
    }

    /// Compartment suffix tokens of this model, in `_c` form.
    ///
    /// Derived from the compartment table when present, supplemented by the
    /// compartment codes recorded on individual metabolites.
    pub fn compartment_suffixes(&self) -> Vec<String> {
        let mut codes: IndexSet<String> = IndexSet::new();
        if let Some(ref compartments) = self.compartments {
            for short_name in compartments.keys() {
                codes.insert(short_name.clone());
            }
        }
        for metabolite in self.metabolites.values() {
            if let Some(ref compartment) = metabolite.compartment {
                codes.insert(compartment.clone());
            }
        }
        codes.into_iter().map(|code| format!("_{}", code)).collect()
    }

    /// Metabolite ids with their compartment suffix stripped, deduplicated,
    /// in stored order. Used for cross-model identity tests where the two
    /// models may use different compartment codes.
    pub fn stripped_metabolite_ids(&self) -> IndexSet<String> {
        let suffixes = self.compartment_suffixes();
        self.metabolites
            .keys()
            .map(|id| strip_compartment_suffix(id, &suffixes).to_string())
            .collect()
    }

    /// The model id, or a placeholder when the model carries none
    pub fn display_id(&self) -> &str {
        self.id.as_deref().unwrap_or("unnamed_model")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metabolic_model::metabolite::MetaboliteBuilder;
    use crate::metabolic_model::reaction::ReactionBuilder;
    use indexmap::IndexMap;

    fn donor_with_transporter() -> Model {
        let mut donor = Model::new_empty();
        donor.id = Some("donor".to_string());
        donor.add_metabolite(
            MetaboliteBuilder::default()
                .id("A_c".to_string())
                .compartment(Some("c".to_string()))
                .build()
                .unwrap(),
        );
        donor.add_metabolite(
            MetaboliteBuilder::default()
                .id("A_e".to_string())
                .compartment(Some("e".to_string()))
                .build()
                .unwrap(),
        );
        donor.add_gene(Gene::with_id("g1"));
        let mut metabolites = IndexMap::new();
        metabolites.insert("A_c".to_string(), -1.0);
        metabolites.insert("A_e".to_string(), 1.0);
        let mut genes = indexmap::IndexSet::new();
        genes.insert("g1".to_string());
        donor.add_reaction(
            ReactionBuilder::default()
                .id("At".to_string())
                .metabolites(metabolites)
                .genes(genes)
                .build()
                .unwrap(),
        );
        donor
    }

    #[test]
    fn adopt_reaction_registers_missing_elements() {
        let donor = donor_with_transporter();
        let mut model = Model::new_empty();
        let reaction = donor.reactions.get("At").unwrap().clone();

        model.adopt_reaction(&reaction, &donor);

        assert!(model.reactions.contains_key("At"));
        assert!(model.metabolites.contains_key("A_c"));
        assert!(model.metabolites.contains_key("A_e"));
        assert!(model.genes.contains_key("g1"));
        // donor's metabolite metadata came along
        assert_eq!(
            model.metabolites.get("A_c").unwrap().compartment.as_deref(),
            Some("c")
        );
    }

    #[test]
    fn remove_reaction_returns_the_reaction() {
        let mut model = donor_with_transporter();
        let removed = model.remove_reaction("At");
        assert_eq!(removed.unwrap().id, "At");
        assert!(model.remove_reaction("At").is_none());
    }

    #[test]
    fn set_objective_replaces_previous_objective() {
        let mut model = donor_with_transporter();
        model.set_objective("At");
        model.set_objective("other");
        assert_eq!(model.objective.len(), 1);
        assert!((model.objective.get("other").unwrap() - 1.0).abs() < 1e-25);
    }

    #[test]
    fn compartment_suffixes_merge_table_and_metabolites() {
        let mut model = donor_with_transporter();
        let mut compartments = IndexMap::new();
        compartments.insert("p".to_string(), "periplasm".to_string());
        model.compartments = Some(compartments);
        let suffixes = model.compartment_suffixes();
        assert!(suffixes.contains(&"_p".to_string()));
        assert!(suffixes.contains(&"_c".to_string()));
        assert!(suffixes.contains(&"_e".to_string()));
    }

    #[test]
    fn stripped_metabolite_ids_deduplicate_across_compartments() {
        let model = donor_with_transporter();
        let stripped = model.stripped_metabolite_ids();
        assert_eq!(stripped.len(), 1);
        assert!(stripped.contains("A"));
    }
}
