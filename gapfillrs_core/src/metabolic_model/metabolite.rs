//! This module provides the metabolite struct representing a metabolite

use derive_builder::Builder;

/// Represents a metabolite
#[derive(Builder, Debug, Clone)]
pub struct Metabolite {
    /// Used to identify the metabolite (must be unique)
    pub id: String,
    /// Human Readable name of the metabolite
    #[builder(default = "None")]
    pub name: Option<String>,
    /// Which compartment the metabolite is in
    #[builder(default = "None")]
    pub compartment: Option<String>,
    /// Electrical charge of the Metabolite
    #[builder(default = "0")]
    pub charge: i32,
    /// Chemical Formula of the metabolite
    #[builder(default = "None")]
    pub formula: Option<String>,
    /// Notes about the metabolite
    #[builder(default = "None")]
    pub notes: Option<String>,
    /// Metabolite annotations
    #[builder(default = "None")]
    pub annotation: Option<String>,
}

impl Metabolite {
    /// Create a bare metabolite carrying only an identifier
    pub fn with_id(id: &str) -> Metabolite {
        Metabolite {
            id: id.to_string(),
            name: None,
            compartment: None,
            charge: 0,
            formula: None,
            notes: None,
            annotation: None,
        }
    }
}

/// Strip a trailing compartment suffix from a metabolite id.
///
/// Metabolite ids conventionally end in a compartment token such as `_c` or `_e`.
/// Only a trailing match is removed, so an id containing a compartment code
/// internally is left intact. An id consisting solely of a suffix is returned
/// unchanged.
pub fn strip_compartment_suffix<'a>(id: &'a str, suffixes: &[String]) -> &'a str {
    for suffix in suffixes {
        if let Some(stripped) = id.strip_suffix(suffix.as_str()) {
            if !stripped.is_empty() {
                return stripped;
            }
        }
    }
    id
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_trailing_suffix_only() {
        let suffixes = vec!["_c".to_string(), "_e".to_string()];
        assert_eq!(strip_compartment_suffix("glc__D_e", &suffixes), "glc__D");
        assert_eq!(strip_compartment_suffix("h_c", &suffixes), "h");
        // internal compartment codes are not touched
        assert_eq!(strip_compartment_suffix("ac_coa_m", &suffixes), "ac_coa_m");
    }

    #[test]
    fn suffix_only_id_is_unchanged() {
        let suffixes = vec!["_c".to_string()];
        assert_eq!(strip_compartment_suffix("_c", &suffixes), "_c");
    }
}
