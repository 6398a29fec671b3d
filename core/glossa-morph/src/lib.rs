//! Morphological rule-generation engine: given a headword, its part of
//! speech, and one cell of that part of speech's grammatical grid, derives
//! the inflected surface form by running the designer's ordered,
//! regex-based transformation rules.
//!
//! The engine is a pure in-memory function library for a single designer
//! session. It owns the dimension records, the active and deprecated rule
//! stores, and the suppression set; everything around it (editors, lexicon,
//! persistence, clipboard) calls in through the operations on
//! [`MorphEngine`].

pub mod error;
pub mod evolve;
pub mod generate;
pub mod grid;
pub mod ruleset;
pub mod validate;

use std::collections::{HashMap, HashSet};

use glossa_protocol::{FormId, Language, PartOfSpeech, PartOfSpeechId, Rule};

pub use error::MorphError;
pub use evolve::Evolution;
pub use generate::{Derivation, RuleApplication};
pub use glossa_protocol::FormSelection;
pub use grid::parse_form_id;

/// Direction for [`MorphEngine::move_rule`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// The rule store and everything that keeps it consistent.
///
/// Single-writer: one designer session mutates one engine at a time, and
/// every mutating operation either applies fully or is rejected by
/// validation before any state changes.
pub struct MorphEngine {
    version: u32,
    parts_of_speech: HashMap<PartOfSpeechId, PartOfSpeech>,
    rules: HashMap<PartOfSpeechId, Vec<Rule>>,
    deprecated: HashMap<PartOfSpeechId, Vec<Rule>>,
    suppressed: HashSet<(PartOfSpeechId, FormId)>,
    next_rule_id: u32,
}

impl MorphEngine {
    pub fn new() -> Self {
        Self {
            version: 1,
            parts_of_speech: HashMap::new(),
            rules: HashMap::new(),
            deprecated: HashMap::new(),
            suppressed: HashSet::new(),
            next_rule_id: 1,
        }
    }

    /// Rebuilds an engine from a persisted snapshot, re-validating every
    /// active rule on the way in.
    pub fn from_language(language: Language) -> Result<Self, MorphError> {
        for rule in &language.rules {
            validate::validate_rule(rule)?;
        }

        let mut engine = Self::new();
        engine.version = language.version;

        for record in language.parts_of_speech {
            engine.parts_of_speech.insert(record.id, record);
        }

        let mut highest = 0;
        for rule in language.rules {
            highest = highest.max(rule.id.0);
            engine.rules.entry(rule.part_of_speech).or_default().push(rule);
        }
        for rule in language.deprecated_rules {
            highest = highest.max(rule.id.0);
            engine
                .deprecated
                .entry(rule.part_of_speech)
                .or_default()
                .push(rule);
        }

        engine.suppressed = language.suppressed_forms.into_iter().collect();
        engine.next_rule_id = highest + 1;

        Ok(engine)
    }

    /// Snapshots the engine for the external serializer. Output is
    /// deterministic: parts of speech, rule blocks, and suppressions come
    /// out sorted by id, while dimension order, value order, and rule
    /// order within each part of speech are preserved verbatim.
    pub fn to_language(&self) -> Language {
        let mut parts_of_speech: Vec<PartOfSpeech> =
            self.parts_of_speech.values().cloned().collect();
        parts_of_speech.sort_by_key(|record| record.id);

        let collect_rules = |store: &HashMap<PartOfSpeechId, Vec<Rule>>| {
            let mut ids: Vec<PartOfSpeechId> = store.keys().copied().collect();
            ids.sort();
            ids.iter()
                .flat_map(|id| store[id].iter().cloned())
                .collect::<Vec<Rule>>()
        };

        let mut suppressed_forms: Vec<(PartOfSpeechId, FormId)> =
            self.suppressed.iter().cloned().collect();
        suppressed_forms.sort();

        Language {
            version: self.version,
            parts_of_speech,
            rules: collect_rules(&self.rules),
            deprecated_rules: collect_rules(&self.deprecated),
            suppressed_forms,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rules.values().all(|rules| rules.is_empty())
            && self.deprecated.values().all(|rules| rules.is_empty())
    }
}

impl Default for MorphEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use glossa_protocol::{
        ClassFilter, Dimension, DimensionId, DimensionValue, DimensionValueId, Headword,
        HeadwordId, RuleId, Transform,
    };

    pub fn dimension(id: u32, name: &str, values: &[(u32, &str)]) -> Dimension {
        Dimension {
            id: DimensionId(id),
            name: name.to_string(),
            values: values
                .iter()
                .map(|&(value_id, label)| DimensionValue {
                    id: DimensionValueId(value_id),
                    label: label.to_string(),
                })
                .collect(),
        }
    }

    /// Noun with number {1: singular, 2: plural} × case {3: nominative,
    /// 4: genitive}; grid cells "1,3", "1,4", "2,3", "2,4".
    pub fn noun_two_by_two() -> MorphEngine {
        let mut engine = MorphEngine::new();
        engine.define_part_of_speech(PartOfSpeech {
            id: PartOfSpeechId(1),
            name: "noun".to_string(),
            dimensions: vec![
                dimension(1, "number", &[(1, "singular"), (2, "plural")]),
                dimension(2, "case", &[(3, "nominative"), (4, "genitive")]),
            ],
        });
        engine
    }

    /// Verb with a single tense dimension {1: present, 2: past}.
    pub fn verb_one_dim() -> MorphEngine {
        let mut engine = MorphEngine::new();
        engine.define_part_of_speech(PartOfSpeech {
            id: PartOfSpeechId(7),
            name: "verb".to_string(),
            dimensions: vec![dimension(3, "tense", &[(1, "present"), (2, "past")])],
        });
        engine
    }

    pub fn pos_without_dimensions() -> MorphEngine {
        let mut engine = MorphEngine::new();
        engine.define_part_of_speech(PartOfSpeech {
            id: PartOfSpeechId(1),
            name: "particle".to_string(),
            dimensions: Vec::new(),
        });
        engine
    }

    pub fn named_rule(
        part_of_speech: PartOfSpeechId,
        form: &str,
        name: &str,
        pattern: &str,
        transform_pattern: &str,
        transform_replacement: &str,
    ) -> Rule {
        Rule {
            id: RuleId(0),
            part_of_speech,
            form: FormId(form.to_string()),
            name: name.to_string(),
            pattern: pattern.to_string(),
            class_filter: ClassFilter::Any,
            transforms: vec![Transform {
                pattern: transform_pattern.to_string(),
                replacement: transform_replacement.to_string(),
            }],
            enabled: true,
        }
    }

    /// Match-anything rule appending `suffix` to the end of the word.
    pub fn suffix_rule(
        part_of_speech: PartOfSpeechId,
        form: &str,
        name: &str,
        suffix: &str,
    ) -> Rule {
        named_rule(part_of_speech, form, name, ".*", "$", suffix)
    }

    pub fn headword(part_of_speech: PartOfSpeechId, text: &str) -> Headword {
        Headword {
            id: HeadwordId(1),
            text: text.to_string(),
            part_of_speech,
            classes: Vec::new(),
        }
    }
}
