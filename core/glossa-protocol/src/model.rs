use rkyv::{Archive, Deserialize, Serialize};
use crate::ids::{
    ClassValueId, DimensionId, DimensionValueId, HeadwordId, PartOfSpeechId, RuleId, WordClassId,
};
use alloc::string::String;
use alloc::vec::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize as SerdeDeserialize, Serialize as SerdeSerialize};

/// One choice along a grammatical dimension (e.g. "past" along tense).
#[derive(Debug, Clone, PartialEq, Eq, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
pub struct DimensionValue {
    pub id: DimensionValueId,
    pub label: String,
}

/// One grammatical axis. Value order is enumeration order.
#[derive(Debug, Clone, PartialEq, Eq, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
pub struct Dimension {
    pub id: DimensionId,
    pub name: String,
    pub values: Vec<DimensionValue>,
}

/// A lexical category owning its own dimension model. Dimension order
/// defines tuple position in every combined-form id.
#[derive(Debug, Clone, PartialEq, Eq, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
pub struct PartOfSpeech {
    pub id: PartOfSpeechId,
    pub name: String,
    pub dimensions: Vec<Dimension>,
}

/// Identifies one cell of a part of speech's combined-form grid: the
/// dimension-value ids of the cell, comma-joined in dimension order.
/// The grid itself is derived on demand and never stored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
#[repr(transparent)]
pub struct FormId(pub String);

impl FormId {
    /// The implicit form of a part of speech with no dimensions: the
    /// empty tuple.
    pub fn bare() -> Self {
        Self(String::new())
    }

    pub fn from_values(values: &[DimensionValueId]) -> Self {
        let mut id = String::new();
        for (i, value) in values.iter().enumerate() {
            if i > 0 {
                id.push(',');
            }
            id.push_str(&alloc::format!("{}", value.0));
        }
        Self(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_bare(&self) -> bool {
        self.0.is_empty()
    }
}

impl core::fmt::Display for FormId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One regex search/replace step within a rule. Patterns are stored as
/// source text; the engine compiles them after validation.
#[derive(Debug, Clone, PartialEq, Eq, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
pub struct Transform {
    pub pattern: String,
    pub replacement: String,
}

/// Word-class predicate gating a rule. `Match` requires the word to carry
/// every listed class value.
#[derive(Debug, Clone, PartialEq, Eq, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
pub enum ClassFilter {
    Any,
    Match(Vec<(WordClassId, ClassValueId)>),
}

impl ClassFilter {
    pub fn accepts(&self, classes: &[(WordClassId, ClassValueId)]) -> bool {
        match self {
            ClassFilter::Any => true,
            ClassFilter::Match(required) => required
                .iter()
                .all(|requirement| classes.contains(requirement)),
        }
    }
}

/// A named, ordered entry attached to one combined form, gating a chain of
/// transforms behind a match filter.
#[derive(Debug, Clone, PartialEq, Eq, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
pub struct Rule {
    pub id: RuleId,
    pub part_of_speech: PartOfSpeechId,
    pub form: FormId,
    pub name: String,
    pub pattern: String,
    pub class_filter: ClassFilter,
    pub transforms: Vec<Transform>,
    pub enabled: bool,
}

/// A lexicon entry as the word store hands it to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
pub struct Headword {
    pub id: HeadwordId,
    pub text: String,
    pub part_of_speech: PartOfSpeechId,
    pub classes: Vec<(WordClassId, ClassValueId)>,
}

/// What kind of rule list a caller is addressing. UI selection dispatch
/// switches exhaustively on this instead of runtime type checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormSelection {
    Active(FormId),
    Deprecated,
}

/// Serializable snapshot of the whole engine state. Dimension order,
/// per-dimension value order, rule order, and the active/deprecated
/// partition survive round trips by construction.
#[derive(Debug, Clone, PartialEq, Eq, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
pub struct Language {
    pub version: u32,
    pub parts_of_speech: Vec<PartOfSpeech>,
    pub rules: Vec<Rule>,
    pub deprecated_rules: Vec<Rule>,
    pub suppressed_forms: Vec<(PartOfSpeechId, FormId)>,
}
