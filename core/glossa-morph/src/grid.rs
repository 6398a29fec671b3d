use glossa_protocol::{
    Dimension, DimensionId, DimensionValueId, FormId, PartOfSpeech, PartOfSpeechId,
};
use nom::{
    character::complete::{char, digit1},
    combinator::{all_consuming, map_res},
    multi::separated_list1,
    IResult,
};

use crate::error::MorphError;
use crate::MorphEngine;

fn value_list(input: &str) -> IResult<&str, Vec<DimensionValueId>> {
    separated_list1(
        char(','),
        map_res(digit1, |digits: &str| digits.parse::<u32>().map(DimensionValueId)),
    )(input)
}

/// Splits a combined id back into its value tuple. The bare form parses to
/// the empty tuple.
pub fn parse_form_id(form: &FormId) -> Result<Vec<DimensionValueId>, MorphError> {
    if form.is_bare() {
        return Ok(Vec::new());
    }

    all_consuming(value_list)(form.as_str())
        .map(|(_, values)| values)
        .map_err(|_| MorphError::MalformedFormId(form.as_str().to_string()))
}

/// True when the cell holds `value` in the dimension at `position`,
/// whatever the other positions hold.
pub fn form_holds_value(
    form: &FormId,
    position: usize,
    value: DimensionValueId,
) -> Result<bool, MorphError> {
    Ok(parse_form_id(form)?.get(position) == Some(&value))
}

impl MorphEngine {
    pub fn part_of_speech(&self, id: PartOfSpeechId) -> Result<&PartOfSpeech, MorphError> {
        self.parts_of_speech
            .get(&id)
            .ok_or(MorphError::PartOfSpeechNotFound(id))
    }

    /// Creates or replaces a part-of-speech record. Runs the deprecation
    /// sweep before returning, like every dimension-model mutation.
    pub fn define_part_of_speech(&mut self, part_of_speech: PartOfSpeech) {
        let id = part_of_speech.id;
        self.parts_of_speech.insert(id, part_of_speech);
        self.sweep_deprecated(id);
    }

    /// Swaps out the whole dimension list of a part of speech.
    pub fn replace_dimensions(
        &mut self,
        id: PartOfSpeechId,
        dimensions: Vec<Dimension>,
    ) -> Result<(), MorphError> {
        let record = self
            .parts_of_speech
            .get_mut(&id)
            .ok_or(MorphError::PartOfSpeechNotFound(id))?;
        record.dimensions = dimensions;
        self.sweep_deprecated(id);
        Ok(())
    }

    pub fn remove_dimension(
        &mut self,
        id: PartOfSpeechId,
        dimension: DimensionId,
    ) -> Result<(), MorphError> {
        let record = self
            .parts_of_speech
            .get_mut(&id)
            .ok_or(MorphError::PartOfSpeechNotFound(id))?;

        let before = record.dimensions.len();
        record.dimensions.retain(|d| d.id != dimension);

        if record.dimensions.len() == before {
            return Err(MorphError::DimensionNotFound {
                part_of_speech: id,
                dimension,
            });
        }

        self.sweep_deprecated(id);
        Ok(())
    }

    pub fn remove_dimension_value(
        &mut self,
        id: PartOfSpeechId,
        dimension: DimensionId,
        value: DimensionValueId,
    ) -> Result<(), MorphError> {
        let record = self
            .parts_of_speech
            .get_mut(&id)
            .ok_or(MorphError::PartOfSpeechNotFound(id))?;

        let axis = record
            .dimensions
            .iter_mut()
            .find(|d| d.id == dimension)
            .ok_or(MorphError::DimensionNotFound {
                part_of_speech: id,
                dimension,
            })?;

        let before = axis.values.len();
        axis.values.retain(|v| v.id != value);

        if axis.values.len() == before {
            return Err(MorphError::DimensionValueNotFound { dimension, value });
        }

        self.sweep_deprecated(id);
        Ok(())
    }

    /// Enumerates every cell of the combined-form grid: the cartesian
    /// product of all dimensions' values, dimension order giving tuple
    /// position and value order giving enumeration order. A part of speech
    /// with no dimensions yields an empty list; its implicit bare form is
    /// not enumerated.
    pub fn all_combined_forms(&self, id: PartOfSpeechId) -> Result<Vec<FormId>, MorphError> {
        let record = self.part_of_speech(id)?;

        if record.dimensions.is_empty() {
            return Ok(Vec::new());
        }

        let mut tuples: Vec<Vec<DimensionValueId>> = vec![Vec::new()];

        for dimension in &record.dimensions {
            let mut extended = Vec::with_capacity(tuples.len() * dimension.values.len());
            for stem in &tuples {
                for value in &dimension.values {
                    let mut tuple = stem.clone();
                    tuple.push(value.id);
                    extended.push(tuple);
                }
            }
            tuples = extended;
        }

        Ok(tuples.iter().map(|tuple| FormId::from_values(tuple)).collect())
    }

    pub fn dimension_value_label(
        &self,
        id: PartOfSpeechId,
        dimension: DimensionId,
        value: DimensionValueId,
    ) -> Result<&str, MorphError> {
        let record = self.part_of_speech(id)?;

        let axis = record
            .dimensions
            .iter()
            .find(|d| d.id == dimension)
            .ok_or(MorphError::DimensionNotFound {
                part_of_speech: id,
                dimension,
            })?;

        axis.values
            .iter()
            .find(|v| v.id == value)
            .map(|v| v.label.as_str())
            .ok_or(MorphError::DimensionValueNotFound { dimension, value })
    }

    /// Human-readable name of a grid cell: the value labels joined with
    /// spaces, in dimension order.
    pub fn form_label(&self, id: PartOfSpeechId, form: &FormId) -> Result<String, MorphError> {
        let record = self.part_of_speech(id)?;
        let values = parse_form_id(form)?;

        if values.len() != record.dimensions.len() {
            return Err(MorphError::FormNotFound {
                part_of_speech: id,
                form: form.clone(),
            });
        }

        let mut labels = Vec::with_capacity(values.len());
        for (dimension, value) in record.dimensions.iter().zip(values) {
            labels.push(self.dimension_value_label(id, dimension.id, value)?);
        }

        Ok(labels.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{noun_two_by_two, pos_without_dimensions};
    use proptest::prelude::*;
    use std::collections::HashSet;

    #[test]
    fn grid_is_ordered_cartesian_product() {
        let engine = noun_two_by_two();
        let forms = engine.all_combined_forms(PartOfSpeechId(1)).unwrap();

        // Number (singular=1, plural=2) is the outer axis, case
        // (nominative=3, genitive=4) the inner one.
        let expected: Vec<&str> = vec!["1,3", "1,4", "2,3", "2,4"];
        let actual: Vec<&str> = forms.iter().map(FormId::as_str).collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn zero_dimension_grid_is_empty() {
        let engine = pos_without_dimensions();
        assert!(engine.all_combined_forms(PartOfSpeechId(1)).unwrap().is_empty());
    }

    #[test]
    fn missing_part_of_speech_is_reported() {
        let engine = MorphEngine::new();
        let err = engine.all_combined_forms(PartOfSpeechId(99)).unwrap_err();
        assert!(matches!(err, MorphError::PartOfSpeechNotFound(_)));
    }

    #[test]
    fn value_label_lookup() {
        let engine = noun_two_by_two();
        let label = engine
            .dimension_value_label(PartOfSpeechId(1), DimensionId(1), DimensionValueId(2))
            .unwrap();
        assert_eq!(label, "plural");

        let err = engine
            .dimension_value_label(PartOfSpeechId(1), DimensionId(1), DimensionValueId(9))
            .unwrap_err();
        assert!(matches!(err, MorphError::DimensionValueNotFound { .. }));
    }

    #[test]
    fn form_label_joins_value_labels() {
        let engine = noun_two_by_two();
        let label = engine
            .form_label(PartOfSpeechId(1), &FormId("2,3".to_string()))
            .unwrap();
        assert_eq!(label, "plural nominative");

        let err = engine
            .form_label(PartOfSpeechId(1), &FormId("2".to_string()))
            .unwrap_err();
        assert!(matches!(err, MorphError::FormNotFound { .. }));
    }

    #[test]
    fn combined_id_round_trip() {
        let form = FormId::from_values(&[DimensionValueId(3), DimensionValueId(7)]);
        assert_eq!(
            parse_form_id(&form).unwrap(),
            vec![DimensionValueId(3), DimensionValueId(7)]
        );

        assert!(parse_form_id(&FormId::bare()).unwrap().is_empty());
        assert!(parse_form_id(&FormId("3,,7".to_string())).is_err());
        assert!(parse_form_id(&FormId("3,x".to_string())).is_err());
    }

    #[test]
    fn position_match() {
        let form = FormId("3,7".to_string());
        assert!(form_holds_value(&form, 1, DimensionValueId(7)).unwrap());
        assert!(!form_holds_value(&form, 0, DimensionValueId(7)).unwrap());
        assert!(!form_holds_value(&form, 5, DimensionValueId(7)).unwrap());
    }

    proptest! {
        /// |grid| is the product of the per-dimension value counts and
        /// every cell id is unique.
        #[test]
        fn grid_size_and_uniqueness(counts in proptest::collection::vec(1usize..5, 0..4)) {
            let mut next = 1u32;
            let dimensions: Vec<Dimension> = counts
                .iter()
                .enumerate()
                .map(|(i, &count)| {
                    let values = (0..count)
                        .map(|v| {
                            let id = DimensionValueId(next);
                            next += 1;
                            glossa_protocol::DimensionValue { id, label: format!("v{v}") }
                        })
                        .collect();
                    Dimension { id: DimensionId(i as u32 + 1), name: format!("d{i}"), values }
                })
                .collect();

            let mut engine = MorphEngine::new();
            engine.define_part_of_speech(PartOfSpeech {
                id: PartOfSpeechId(1),
                name: "noun".to_string(),
                dimensions,
            });

            let forms = engine.all_combined_forms(PartOfSpeechId(1)).unwrap();
            let expected = if counts.is_empty() { 0 } else { counts.iter().product() };
            prop_assert_eq!(forms.len(), expected);

            let unique: HashSet<&FormId> = forms.iter().collect();
            prop_assert_eq!(unique.len(), forms.len());
        }
    }
}
