use glossa_protocol::{FormId, Headword, PartOfSpeechId, RuleId};
use regex::Regex;

use crate::error::MorphError;
use crate::MorphEngine;

/// One rule's contribution to a derivation, for designer-facing debugging.
#[derive(Debug, Clone)]
pub struct RuleApplication {
    pub rule: RuleId,
    pub name: String,
    pub before: String,
    pub after: String,
}

/// A derived surface form together with the breakdown of how it was built.
#[derive(Debug, Clone)]
pub struct Derivation {
    pub text: String,
    pub steps: Vec<RuleApplication>,
}

impl MorphEngine {
    /// Derives the surface form of `word` for one combined form.
    ///
    /// Rules fire in stored order. A rule participates when it is enabled,
    /// its class filter accepts the word, and its match pattern finds a
    /// match in the *base* text; the word as originally entered is what the
    /// designer's filters describe, so earlier rules' rewrites never change
    /// which later rules fire. Each participating rule's transforms then
    /// rewrite the running accumulator, every occurrence at once, so
    /// several rules can each contribute a piece of the final form.
    ///
    /// With no applicable rules the base text comes back unchanged.
    pub fn generate(&self, word: &Headword, form: &FormId) -> Result<String, MorphError> {
        self.generate_traced(word, form).map(|derivation| derivation.text)
    }

    /// [`generate`](Self::generate), keeping the per-rule breakdown.
    pub fn generate_traced(
        &self,
        word: &Headword,
        form: &FormId,
    ) -> Result<Derivation, MorphError> {
        let part_of_speech = word.part_of_speech;
        self.part_of_speech(part_of_speech)?;

        if self.is_suppressed(part_of_speech, form) {
            return Err(MorphError::FormSuppressed {
                part_of_speech,
                form: form.clone(),
            });
        }

        let mut derived = word.text.clone();
        let mut steps = Vec::new();

        for rule in self.rules_for(part_of_speech, form) {
            if !rule.enabled || !rule.class_filter.accepts(&word.classes) {
                continue;
            }

            let matcher = self.compiled(part_of_speech, &rule.name, &rule.pattern)?;
            if !matcher.is_match(&word.text) {
                continue;
            }

            let before = derived.clone();
            for transform in &rule.transforms {
                let search = self.compiled(part_of_speech, &rule.name, &transform.pattern)?;
                // A transform that matches nothing is a no-op, not an error.
                derived = search
                    .replace_all(&derived, transform.replacement.as_str())
                    .into_owned();
            }

            steps.push(RuleApplication {
                rule: rule.id,
                name: rule.name.clone(),
                before,
                after: derived.clone(),
            });
        }

        Ok(Derivation { text: derived, steps })
    }

    /// Every stored pattern passed the validation gate, so a compile
    /// failure here means the stores were corrupted behind the engine's
    /// back.
    fn compiled(
        &self,
        part_of_speech: PartOfSpeechId,
        rule_name: &str,
        pattern: &str,
    ) -> Result<Regex, MorphError> {
        Regex::new(pattern).map_err(|_| MorphError::StructuralInconsistency {
            part_of_speech,
            detail: format!("unvalidated pattern \"{pattern}\" in rule \"{rule_name}\""),
        })
    }
}
