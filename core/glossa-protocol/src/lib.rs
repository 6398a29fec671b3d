#![no_std] // Critical for WASM/Embedded compatibility

extern crate alloc;

// Enable std if the feature is active (for tests/tools)
#[cfg(feature = "std")]
extern crate std;

pub mod ids;

// Re-export core types for convenience
pub use ids::{
    ClassValueId, DimensionId, DimensionValueId, HeadwordId, PartOfSpeechId, RuleId, WordClassId,
};

pub mod model;
pub use model::*;

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use alloc::vec;
    use rkyv::{from_bytes, to_bytes};

    #[test]
    fn test_id_serialization() {
        // Test NewType ID round-trip
        let original = RuleId::new(42);

        let bytes = to_bytes::<_, 256>(&original).expect("Failed to serialize RuleId");
        let deserialized: RuleId = from_bytes(&bytes).expect("Failed to deserialize RuleId");

        assert_eq!(original, deserialized);
    }

    #[test]
    fn test_id_layout() {
        // Verify Zero-Cost abstraction: RuleId(u32) should be exactly 4 bytes
        assert_eq!(core::mem::size_of::<RuleId>(), 4);
        assert_eq!(core::mem::size_of::<Option<RuleId>>(), 8); // u32 + tag (padding)
    }

    #[test]
    fn test_form_id_construction() {
        let form = FormId::from_values(&[DimensionValueId(3), DimensionValueId(7)]);
        assert_eq!(form.as_str(), "3,7");

        assert!(FormId::bare().is_bare());
        assert_eq!(FormId::from_values(&[]), FormId::bare());
    }

    #[test]
    fn test_rule_serialization() {
        // Rule round-trip (simulate save/load of a single rule)
        let original = Rule {
            id: RuleId(1),
            part_of_speech: PartOfSpeechId(2),
            form: FormId::from_values(&[DimensionValueId(1), DimensionValueId(2)]),
            name: "Plural stem".to_string(),
            pattern: "o$".to_string(),
            class_filter: ClassFilter::Match(vec![(WordClassId(4), ClassValueId(9))]),
            transforms: vec![Transform {
                pattern: "o".to_string(),
                replacement: "os".to_string(),
            }],
            enabled: true,
        };

        let bytes = to_bytes::<_, 256>(&original).expect("Failed to serialize Rule");
        let deserialized: Rule = from_bytes(&bytes).expect("Failed to deserialize Rule");

        assert_eq!(original, deserialized);
    }

    #[test]
    fn test_class_filter() {
        let word_classes = vec![(WordClassId(1), ClassValueId(10)), (WordClassId(2), ClassValueId(20))];

        assert!(ClassFilter::Any.accepts(&word_classes));
        assert!(ClassFilter::Match(vec![]).accepts(&word_classes));
        assert!(ClassFilter::Match(vec![(WordClassId(1), ClassValueId(10))]).accepts(&word_classes));
        assert!(!ClassFilter::Match(vec![(WordClassId(1), ClassValueId(11))]).accepts(&word_classes));
        assert!(
            !ClassFilter::Match(vec![(WordClassId(3), ClassValueId(30))]).accepts(&word_classes)
        );
    }
}
