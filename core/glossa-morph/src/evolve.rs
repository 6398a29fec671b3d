use glossa_protocol::{PartOfSpeechId, RuleId};
use regex::Regex;

use crate::validate::references_whole_match;
use crate::MorphEngine;

/// Outcome of one transform rewrite during a language-evolution pass.
/// `error` is set when the rewrite had to be reverted.
#[derive(Debug, Clone)]
pub struct Evolution {
    pub rule: RuleId,
    pub rule_name: String,
    pub before: String,
    pub after: String,
    pub error: Option<String>,
}

impl MorphEngine {
    /// Applies a language-evolution step to the rule store itself: a
    /// literal search/replace over the pattern and replacement text of
    /// every transform of the targeted active rules (one part of speech,
    /// or all of them when `part_of_speech` is `None`).
    ///
    /// A rewrite that blanks a pattern, breaks its compilation, or
    /// introduces an entire-match reference is reverted and reported;
    /// everything else is applied and reported. Transforms the search
    /// text does not touch go unreported.
    pub fn evolve_rules(
        &mut self,
        part_of_speech: Option<PartOfSpeechId>,
        search: &str,
        replacement: &str,
    ) -> Vec<Evolution> {
        let mut report = Vec::new();

        for (&pos, rules) in self.rules.iter_mut() {
            if part_of_speech.is_some_and(|filter| filter != pos) {
                continue;
            }

            for rule in rules.iter_mut() {
                for transform in rule.transforms.iter_mut() {
                    let old_pattern = transform.pattern.clone();
                    let old_replacement = transform.replacement.clone();

                    let new_pattern = old_pattern.replace(search, replacement);
                    let new_replacement = old_replacement.replace(search, replacement);

                    if new_pattern == old_pattern && new_replacement == old_replacement {
                        continue;
                    }

                    let before = format!("{old_pattern} -> {old_replacement}");
                    let after = format!("{new_pattern} -> {new_replacement}");

                    if let Some(problem) = rewrite_problem(&new_pattern, &new_replacement) {
                        // Leave the transform as it was; the report carries
                        // the rejected result for the designer to inspect.
                        report.push(Evolution {
                            rule: rule.id,
                            rule_name: rule.name.clone(),
                            before,
                            after,
                            error: Some(problem),
                        });
                        continue;
                    }

                    transform.pattern = new_pattern;
                    transform.replacement = new_replacement;

                    report.push(Evolution {
                        rule: rule.id,
                        rule_name: rule.name.clone(),
                        before,
                        after,
                        error: None,
                    });
                }
            }
        }

        report
    }
}

fn rewrite_problem(pattern: &str, replacement: &str) -> Option<String> {
    if pattern.is_empty() {
        return Some("rewrite blanked the pattern".to_string());
    }
    if let Err(err) = Regex::new(pattern) {
        return Some(format!("rewritten pattern does not compile: {err}"));
    }
    if references_whole_match(replacement) {
        return Some("rewritten replacement references the entire match".to_string());
    }
    None
}
