//! This module provides a struct for representing reactions
use crate::configuration::CONFIGURATION;
use derive_builder::Builder;
use indexmap::{IndexMap, IndexSet};

/// Identifier prefix conventionally marking exchange reactions
pub const EXCHANGE_PREFIX: &str = "EX_";

/// Represents a reaction in the metabolic model
#[derive(Builder, Debug, Clone)]
pub struct Reaction {
    /// Used to identify the reaction
    pub id: String,
    /// Metabolite stoichiometry of the reaction
    ///
    /// Maps metabolite ids to coefficients; negative coefficients are reactants,
    /// positive coefficients are products
    #[builder(default = "IndexMap::new()")]
    pub metabolites: IndexMap<String, f64>,
    /// Identifiers of the genes associated with the reaction
    #[builder(default = "IndexSet::new()")]
    pub genes: IndexSet<String>,
    /// Raw gene association rule the gene set was derived from, if any
    #[builder(default = "None")]
    pub gene_rule: Option<String>,
    /// Human-readable reaction name
    #[builder(default = "None")]
    pub name: Option<String>,
    /// Lower flux bound
    #[builder(default = "CONFIGURATION.read().unwrap().lower_bound")]
    pub lower_bound: f64,
    /// Upper flux bound
    #[builder(default = "CONFIGURATION.read().unwrap().upper_bound")]
    pub upper_bound: f64,
    /// Reaction subsystem
    #[builder(default = "None")]
    pub subsystem: Option<String>,
    /// Notes about the reaction
    #[builder(default = "None")]
    pub notes: Option<String>,
    /// Reaction Annotations
    #[builder(default = "None")]
    pub annotation: Option<String>,
}

impl Reaction {
    /// Whether this reaction is an exchange reaction (uptake/secretion across
    /// the system boundary), determined by the `EX_` id prefix
    pub fn is_exchange(&self) -> bool {
        self.id.starts_with(EXCHANGE_PREFIX)
    }

    /// Ids of the metabolites consumed by the reaction (coefficient < 0)
    pub fn reactant_ids(&self) -> Vec<&str> {
        self.metabolites
            .iter()
            .filter(|(_, &coefficient)| coefficient < 0.0)
            .map(|(id, _)| id.as_str())
            .collect()
    }

    /// Ids of the metabolites produced by the reaction (coefficient > 0)
    pub fn product_ids(&self) -> Vec<&str> {
        self.metabolites
            .iter()
            .filter(|(_, &coefficient)| coefficient > 0.0)
            .map(|(id, _)| id.as_str())
            .collect()
    }

    /// Gene identifiers associated with the reaction, in stored order
    pub fn gene_ids(&self) -> Vec<String> {
        self.genes.iter().cloned().collect()
    }

    /// Pin both flux bounds to zero so the reaction can no longer carry flux
    pub fn silence(&mut self) {
        self.lower_bound = 0.0;
        self.upper_bound = 0.0;
    }
}
