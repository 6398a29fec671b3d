use glossa_protocol::{DimensionId, DimensionValueId, FormId, PartOfSpeechId, RuleId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MorphError {
    #[error("rule \"{rule}\": pattern \"{pattern}\" does not compile: {source}")]
    InvalidPattern {
        rule: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// The replacement dialect has no entire-match shorthand; `$0` must be
    /// rejected up front rather than silently substituting nothing.
    #[error("rule \"{rule}\": replacement \"{replacement}\" references the entire match ($0)")]
    WholeMatchReference { rule: String, replacement: String },

    #[error("unknown part of speech {0:?}")]
    PartOfSpeechNotFound(PartOfSpeechId),

    #[error("unknown dimension {dimension:?} in part of speech {part_of_speech:?}")]
    DimensionNotFound {
        part_of_speech: PartOfSpeechId,
        dimension: DimensionId,
    },

    #[error("no dimension at position {index} in part of speech {part_of_speech:?}")]
    DimensionIndexOutOfRange {
        part_of_speech: PartOfSpeechId,
        index: usize,
    },

    #[error("unknown value {value:?} in dimension {dimension:?}")]
    DimensionValueNotFound {
        dimension: DimensionId,
        value: DimensionValueId,
    },

    #[error("unknown rule {0:?}")]
    RuleNotFound(RuleId),

    #[error("combined form {form} is not a cell of part of speech {part_of_speech:?}")]
    FormNotFound {
        part_of_speech: PartOfSpeechId,
        form: FormId,
    },

    #[error("combined id \"{0}\" is malformed")]
    MalformedFormId(String),

    /// Not a fault: the designer disabled this form outright.
    #[error("form {form} of part of speech {part_of_speech:?} is suppressed")]
    FormSuppressed {
        part_of_speech: PartOfSpeechId,
        form: FormId,
    },

    /// Internal invariant breach. The deprecation sweep runs inside every
    /// dimension mutation, so callers should never observe this.
    #[error("structural inconsistency in part of speech {part_of_speech:?}: {detail}")]
    StructuralInconsistency {
        part_of_speech: PartOfSpeechId,
        detail: String,
    },
}
