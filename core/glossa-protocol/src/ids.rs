use rkyv::{Archive, Deserialize, Serialize};

#[cfg(feature = "serde")]
use serde::{Deserialize as SerdeDeserialize, Serialize as SerdeSerialize};

macro_rules! define_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Archive, Serialize, Deserialize)]
        #[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
        #[archive(check_bytes)]
        #[repr(transparent)] // Ensure it has the same layout as u32
        pub struct $name(pub u32);

        impl $name {
            pub const fn new(id: u32) -> Self {
                Self(id)
            }
        }

        impl From<u32> for $name {
            fn from(id: u32) -> Self {
                Self(id)
            }
        }

        impl From<$name> for u32 {
            fn from(id: $name) -> u32 {
                id.0
            }
        }
    };
}

define_id!(PartOfSpeechId, "Unique identifier for a part of speech (lexical category).");
define_id!(DimensionId, "Unique identifier for a grammatical dimension (e.g. tense).");
define_id!(DimensionValueId, "Unique identifier for one value along a dimension (e.g. past).");
define_id!(RuleId, "Unique identifier for a word-form generation rule.");
define_id!(HeadwordId, "Unique identifier for a lexicon headword.");
define_id!(WordClassId, "Unique identifier for a word class (e.g. declension class).");
define_id!(ClassValueId, "Unique identifier for one value within a word class.");
