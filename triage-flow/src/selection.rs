//! Per-annotation confirmation state.
//!
//! The same mention text can show up with different (or absent) ontology
//! bindings across extraction runs, so selection is keyed on the
//! (mention, binding) pair rather than on the mention text alone.

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::NormalizedSymptom;

/// Composite identity of one selectable annotation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SelectionKey {
    pub symptom: String,
    pub hpo_id: Option<String>,
}

impl SelectionKey {
    pub fn of(symptom: &NormalizedSymptom) -> Self {
        Self {
            symptom: symptom.symptom.clone(),
            hpo_id: symptom.hpo_id.clone(),
        }
    }
}

impl fmt::Display for SelectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}@@{}",
            self.symptom,
            self.hpo_id.as_deref().unwrap_or("null")
        )
    }
}

/// Mapping from SelectionKey to confirmed-flag. Fully replaced on every
/// successful extraction, never merged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectionState {
    confirmed: HashMap<SelectionKey, bool>,
}

impl SelectionState {
    /// Fresh state for a new extraction: confirmed iff the annotation carries
    /// an ontology binding.
    pub fn initialized(symptoms: &[NormalizedSymptom]) -> Self {
        let mut confirmed = HashMap::new();
        for symptom in symptoms {
            confirmed.insert(SelectionKey::of(symptom), symptom.has_binding());
        }
        Self { confirmed }
    }

    /// Set exactly one key's flag. Unknown keys are inserted.
    pub fn set(&mut self, key: SelectionKey, value: bool) {
        self.confirmed.insert(key, value);
    }

    /// Confirm or unconfirm every annotation at once. Confirming skips
    /// annotations without a binding, since there is nothing to send to
    /// prediction for them.
    pub fn set_all(&mut self, symptoms: &[NormalizedSymptom], value: bool) {
        let mut confirmed = HashMap::new();
        for symptom in symptoms {
            confirmed.insert(SelectionKey::of(symptom), value && symptom.has_binding());
        }
        self.confirmed = confirmed;
    }

    pub fn is_confirmed(&self, key: &SelectionKey) -> bool {
        self.confirmed.get(key).copied().unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.confirmed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.confirmed.is_empty()
    }

    /// Deduplicated ontology ids of all confirmed, bound annotations, in
    /// first-seen order over `symptoms`. This is the exact predict input.
    pub fn confirmed_hpo_ids(&self, symptoms: &[NormalizedSymptom]) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut ids = Vec::new();
        for symptom in symptoms {
            let Some(id) = &symptom.hpo_id else { continue };
            if self.is_confirmed(&SelectionKey::of(symptom)) && seen.insert(id.clone()) {
                ids.push(id.clone());
            }
        }
        ids
    }
}
