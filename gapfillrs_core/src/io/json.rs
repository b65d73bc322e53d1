//! Module providing JSON IO for gapfillrs Models
use std::fs;
use std::path::Path;

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::metabolic_model::gene::Gene;
use crate::metabolic_model::metabolite::Metabolite;
use crate::metabolic_model::model::Model;
use crate::metabolic_model::reaction::{Reaction, ReactionBuilder, ReactionBuilderError};

// region JSON Model
/// Represents a JSON serialized model, used for reading and writing models in json format
#[derive(Serialize, Deserialize)]
struct JsonModel {
    metabolites: Vec<JsonMetabolite>,
    reactions: Vec<JsonReaction>,
    genes: Vec<JsonGene>,
    id: Option<String>,
    compartments: Option<IndexMap<String, String>>,
    version: Option<String>,
}

#[derive(Serialize, Deserialize)]
struct JsonMetabolite {
    id: String,
    name: Option<String>,
    compartment: Option<String>,
    charge: Option<i32>,
    formula: Option<String>,
    notes: Option<Value>,
    annotation: Option<Value>,
}

#[derive(Serialize, Deserialize)]
struct JsonReaction {
    id: String,
    name: Option<String>,
    metabolites: IndexMap<String, f64>,
    lower_bound: f64,
    upper_bound: f64,
    #[serde(default)]
    gene_reaction_rule: String,
    objective_coefficient: Option<f64>,
    subsystem: Option<String>,
    notes: Option<Value>,
    annotation: Option<Value>,
}

#[derive(Serialize, Deserialize)]
struct JsonGene {
    id: String,
    name: Option<String>,
    notes: Option<Value>,
    annotation: Option<Value>,
}
// endregion JSON Model

/// Flatten a gene association rule into the set of gene ids it mentions.
///
/// Boolean structure is irrelevant to provenance tracking, so `and`/`or`/`not`
/// tokens and parentheses are dropped and the remaining tokens kept as ids.
fn genes_from_rule(rule: &str) -> IndexSet<String> {
    rule.split(|c: char| c.is_whitespace() || c == '(' || c == ')')
        .filter(|token| !token.is_empty())
        .filter(|token| {
            let lowered = token.to_ascii_lowercase();
            lowered != "and" && lowered != "or" && lowered != "not"
        })
        .map(|token| token.to_string())
        .collect()
}

// region Conversions
impl From<JsonGene> for Gene {
    fn from(g: JsonGene) -> Self {
        /* Notes and annotations are kept as JSON strings; the data isn't very
        structured, so unpacking more than this would require a lot of
        maintenance for little gain. */
        Self {
            id: g.id,
            name: g.name,
            notes: g.notes.map(|v| v.to_string()),
            annotation: g.annotation.map(|v| v.to_string()),
        }
    }
}

impl From<JsonMetabolite> for Metabolite {
    fn from(m: JsonMetabolite) -> Self {
        Self {
            id: m.id,
            name: m.name,
            compartment: m.compartment,
            charge: m.charge.unwrap_or_default(),
            formula: m.formula,
            notes: m.notes.map(|v| v.to_string()),
            annotation: m.annotation.map(|v| v.to_string()),
        }
    }
}

impl From<Gene> for JsonGene {
    fn from(g: Gene) -> Self {
        Self {
            id: g.id,
            name: g.name,
            notes: g
                .notes
                .map(|n| serde_json::from_str(&n).unwrap_or(Value::String(n))),
            annotation: g
                .annotation
                .map(|a| serde_json::from_str(&a).unwrap_or(Value::String(a))),
        }
    }
}

impl From<Metabolite> for JsonMetabolite {
    fn from(m: Metabolite) -> Self {
        Self {
            id: m.id,
            name: m.name,
            compartment: m.compartment,
            charge: Some(m.charge),
            formula: m.formula,
            notes: m
                .notes
                .map(|n| serde_json::from_str(&n).unwrap_or(Value::String(n))),
            annotation: m
                .annotation
                .map(|a| serde_json::from_str(&a).unwrap_or(Value::String(a))),
        }
    }
}

impl Model {
    pub fn read_json<P: AsRef<Path>>(path: P) -> Result<Model, JsonError> {
        let model_str = match fs::read_to_string(path) {
            Ok(data) => data,
            Err(err) => return Err(JsonError::UnableToRead(format!("{:?}", err))),
        };
        let json_model = match serde_json::from_str::<JsonModel>(&model_str) {
            Ok(model) => model,
            Err(err) => return Err(JsonError::UnableToParse(format!("{:?}", err))),
        };
        Model::from_json(json_model)
    }

    pub fn write_json<P: AsRef<Path>>(&self, path: P) -> Result<(), JsonError> {
        let json_model = self.to_json();
        let model_string = serde_json::to_string(&json_model)?;
        fs::write(path, model_string)?;
        Ok(())
    }

    /// Rebuild the model through its serialized form.
    ///
    /// Forces a structurally consistent copy: every element is reconstructed
    /// from its serialized representation, so no stale internal state can
    /// survive. Happens entirely in memory.
    pub fn rebuilt(&self) -> Result<Model, JsonError> {
        let json_model = self.to_json();
        let text = serde_json::to_string(&json_model)?;
        let reparsed = serde_json::from_str::<JsonModel>(&text)?;
        Model::from_json(reparsed)
    }

    fn from_json(json_model: JsonModel) -> Result<Self, JsonError> {
        let mut reactions: IndexMap<String, Reaction> = IndexMap::new();
        let mut genes: IndexMap<String, Gene> = IndexMap::new();
        let mut metabolites: IndexMap<String, Metabolite> = IndexMap::new();
        let mut objective: IndexMap<String, f64> = IndexMap::new();
        // Start by converting the genes and metabolites using the From methods
        json_model.genes.into_iter().for_each(|g| {
            genes.insert(g.id.clone(), Gene::from(g));
        });
        json_model.metabolites.into_iter().for_each(|m| {
            metabolites.insert(m.id.clone(), Metabolite::from(m));
        });
        /* Now, iterate through the reactions, flattening gene rules, and
        adding to the objective along the way */
        for rxn in json_model.reactions {
            let reaction_genes = genes_from_rule(&rxn.gene_reaction_rule);
            // Any gene the rule mentions but the gene list omits still gets an entry
            for gene_id in &reaction_genes {
                if !genes.contains_key(gene_id) {
                    genes.insert(gene_id.clone(), Gene::with_id(gene_id));
                }
            }
            let gene_rule = if rxn.gene_reaction_rule.is_empty() {
                None
            } else {
                Some(rxn.gene_reaction_rule.clone())
            };
            let new_reaction = ReactionBuilder::default()
                .id(rxn.id.clone())
                .metabolites(rxn.metabolites)
                .genes(reaction_genes)
                .gene_rule(gene_rule)
                .name(rxn.name)
                .lower_bound(rxn.lower_bound)
                .upper_bound(rxn.upper_bound)
                .subsystem(rxn.subsystem)
                .notes(rxn.notes.map(|v| v.to_string()))
                .annotation(rxn.annotation.map(|v| v.to_string()))
                .build()?;
            reactions.insert(rxn.id.clone(), new_reaction);
            // Add the reaction to the objective function if desired
            if let Some(coef) = rxn.objective_coefficient {
                objective.insert(rxn.id, coef);
            }
        }
        Ok(Model {
            reactions,
            genes,
            metabolites,
            objective,
            id: json_model.id,
            compartments: json_model.compartments,
            version: json_model.version,
        })
    }

    fn to_json(&self) -> JsonModel {
        let json_genes: Vec<JsonGene> = self.genes.iter().map(|(_, g)| g.clone().into()).collect();
        let json_metabolites: Vec<JsonMetabolite> = self
            .metabolites
            .iter()
            .map(|(_, m)| m.clone().into())
            .collect();
        let mut json_reactions: Vec<JsonReaction> = Vec::new();
        for (_, r) in &self.reactions {
            // A reaction built programmatically may carry genes without a rule;
            // joining with "or" keeps the gene set intact across a round trip
            let gene_reaction_rule = r.gene_rule.clone().unwrap_or_else(|| {
                r.genes.iter().cloned().collect::<Vec<String>>().join(" or ")
            });
            json_reactions.push(JsonReaction {
                id: r.id.clone(),
                name: r.name.clone(),
                metabolites: r.metabolites.clone(),
                lower_bound: r.lower_bound,
                upper_bound: r.upper_bound,
                gene_reaction_rule,
                objective_coefficient: self.objective.get(&r.id).copied(),
                subsystem: r.subsystem.clone(),
                notes: r
                    .notes
                    .clone()
                    .map(|n| serde_json::from_str(&n).unwrap_or(Value::String(n))),
                annotation: r
                    .annotation
                    .clone()
                    .map(|a| serde_json::from_str(&a).unwrap_or(Value::String(a))),
            })
        }

        JsonModel {
            metabolites: json_metabolites,
            reactions: json_reactions,
            genes: json_genes,
            id: self.id.clone(),
            compartments: self.compartments.clone(),
            version: self.version.clone(),
        }
    }
}

#[derive(Error, Debug)]
pub enum JsonError {
    #[error("Unable to read file due to {0}")]
    UnableToRead(String),
    #[error("Unable to parse json due to {0}")]
    UnableToParse(String),
    #[error("Unable to build reaction")]
    UnableToBuildReaction(#[from] ReactionBuilderError),
    #[error("Serde json parse error")]
    SerdeJsonParseError(#[from] serde_json::Error),
    #[error("Unable to write to file")]
    UnableToWrite(#[from] std::io::Error),
}

// endregion Conversions

#[cfg(test)]
mod json_tests {
    use super::*;

    #[test]
    fn json_metabolite() {
        let data = r#"{
"id":"glc__D_e",
"name":"D-Glucose",
"compartment":"e",
"charge":0,
"formula":"C6H12O6",
"notes":null,
"annotation":null
}"#;
        let met: JsonMetabolite = serde_json::from_str(data).unwrap();
        assert_eq!(met.id, "glc__D_e");
        assert_eq!(met.name.unwrap(), "D-Glucose");
        assert_eq!(met.compartment.unwrap(), "e");
        assert_eq!(met.charge.unwrap(), 0);
        assert_eq!(met.formula.unwrap(), "C6H12O6");
    }

    #[test]
    fn json_reaction() {
        let data = r#"{
"id":"PFK",
"name":"Phosphofructokinase",
"metabolites":{
"adp_c":1.0,
"atp_c":-1.0,
"f6p_c":-1.0,
"fdp_c":1.0,
"h_c":1.0
},
"lower_bound":0.0,
"upper_bound":1000.0,
"gene_reaction_rule":"b3916 or b1723",
"objective_coefficient":null,
"subsystem":"Glycolysis/Gluconeogenesis",
"notes":null,
"annotation":null
}"#;
        let reaction: JsonReaction = serde_json::from_str(data).unwrap();
        assert_eq!(reaction.id, "PFK");
        assert_eq!(reaction.name.unwrap(), "Phosphofructokinase");
        assert!((reaction.metabolites.get("atp_c").unwrap() - -1.0).abs() < 1e-25);
        assert!((reaction.lower_bound - 0.0).abs() < 1e-25);
        assert!((reaction.upper_bound - 1000.0).abs() < 1e-25);
        assert_eq!(reaction.gene_reaction_rule, "b3916 or b1723");
        assert_eq!(reaction.subsystem.unwrap(), "Glycolysis/Gluconeogenesis");
    }

    #[test]
    fn gene_rule_flattening() {
        let genes = genes_from_rule("(b3916 and not b1723) or b0001");
        assert_eq!(genes.len(), 3);
        assert!(genes.contains("b3916"));
        assert!(genes.contains("b1723"));
        assert!(genes.contains("b0001"));
        // operator tokens are dropped case-insensitively
        let genes = genes_from_rule("g1 AND g2 OR g3");
        assert_eq!(genes.len(), 3);
        assert!(genes_from_rule("").is_empty());
    }
}
