//! Bridging reactions: copying exchange and transport reactions from a
//! template into the query model ahead of the gap fill solve
use tracing::debug;

use crate::metabolic_model::metabolite::strip_compartment_suffix;
use crate::metabolic_model::model::Model;
use crate::metabolic_model::reaction::Reaction;

/// Decide whether a reaction moves the same (or overlapping) compounds
/// between compartments.
///
/// Reactant and product metabolite ids are stripped of the given compartment
/// suffixes and sorted. With `all_compounds` the two stripped lists must match
/// exactly (pure translocation); otherwise a single compound appearing on both
/// sides is enough. `ignore_h` removes one bare proton from each side before
/// the loose test so proton symport/antiport is not itself qualifying.
pub fn is_transport(
    reaction: &Reaction,
    compartment_suffixes: &[String],
    all_compounds: bool,
    ignore_h: bool,
) -> bool {
    let mut reactants: Vec<String> = reaction
        .reactant_ids()
        .iter()
        .map(|id| strip_compartment_suffix(id, compartment_suffixes).to_string())
        .collect();
    let mut products: Vec<String> = reaction
        .product_ids()
        .iter()
        .map(|id| strip_compartment_suffix(id, compartment_suffixes).to_string())
        .collect();
    reactants.sort();
    products.sort();
    if !all_compounds {
        if ignore_h {
            remove_one(&mut reactants, "h");
            remove_one(&mut products, "h");
        }
        return reactants
            .iter()
            .any(|reactant| products.iter().any(|product| product == reactant));
    }
    reactants == products
}

fn remove_one(ids: &mut Vec<String>, target: &str) {
    if let Some(position) = ids.iter().position(|id| id == target) {
        ids.remove(position);
    }
}

/// Copy every exchange reaction from the template whose metabolite the model
/// already knows.
///
/// Template reactions are considered in stored order; a reaction qualifies if
/// its id is absent from the model and its (single) metabolite, with the
/// template's compartment suffix stripped, exists among the model's stripped
/// metabolite ids. Returns the ids added.
pub fn add_exchange_reactions(model: &mut Model, template: &Model) -> Vec<String> {
    let template_suffixes = template.compartment_suffixes();
    let model_metabolites = model.stripped_metabolite_ids();
    let mut added = Vec::new();
    for reaction in template.reactions.values() {
        if !reaction.is_exchange() || model.reactions.contains_key(&reaction.id) {
            continue;
        }
        let metabolite_id = match reaction.metabolites.keys().next() {
            Some(id) => id,
            None => continue,
        };
        let stripped = strip_compartment_suffix(metabolite_id, &template_suffixes);
        if model_metabolites.contains(stripped) {
            debug!(reaction = %reaction.id, "adding exchange reaction from template");
            model.adopt_reaction(reaction, template);
            added.push(reaction.id.clone());
        }
    }
    added
}

/// Copy every transport reaction from the template whose carried compounds the
/// model already knows.
///
/// A template reaction qualifies if it is absent from the model, classifies as
/// transport under [`is_transport`], and every reactant id (template suffix
/// stripped) exists among the model's stripped metabolite ids. Reactants
/// suffice for the membership test since the products carry the same compounds
/// in another compartment. Returns `(reaction id, gene ids)` pairs.
pub fn add_transport_reactions(
    model: &mut Model,
    template: &Model,
    all_compounds: bool,
    ignore_h: bool,
) -> Vec<(String, Vec<String>)> {
    let template_suffixes = template.compartment_suffixes();
    let model_metabolites = model.stripped_metabolite_ids();
    let mut added = Vec::new();
    for reaction in template.reactions.values() {
        if model.reactions.contains_key(&reaction.id) {
            continue;
        }
        if !is_transport(reaction, &template_suffixes, all_compounds, ignore_h) {
            continue;
        }
        let carried: Vec<String> = reaction
            .reactant_ids()
            .iter()
            .map(|id| strip_compartment_suffix(id, &template_suffixes).to_string())
            .collect();
        if carried.iter().all(|compound| model_metabolites.contains(compound)) {
            debug!(reaction = %reaction.id, "adding transport reaction from template");
            model.adopt_reaction(reaction, template);
            added.push((reaction.id.clone(), reaction.gene_ids()));
        }
    }
    added
}
