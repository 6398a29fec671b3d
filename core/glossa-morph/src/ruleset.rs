use std::collections::HashSet;

use glossa_protocol::{DimensionValueId, FormId, FormSelection, PartOfSpeechId, Rule, RuleId};

use crate::error::MorphError;
use crate::grid::form_holds_value;
use crate::validate::validate_rule;
use crate::{Direction, MorphEngine};

impl MorphEngine {
    /// Validates and appends a rule at the tail of its part of speech's
    /// priority order, assigning its id. The target form must be a current
    /// grid cell (or the bare form of a dimensionless part of speech);
    /// rules pasted in from elsewhere are expected to be re-scoped by the
    /// caller before they arrive here.
    pub fn add_rule(&mut self, mut rule: Rule) -> Result<RuleId, MorphError> {
        validate_rule(&rule)?;
        self.ensure_form_exists(rule.part_of_speech, &rule.form)?;

        let id = self.allocate_rule_id();
        rule.id = id;
        self.rules.entry(rule.part_of_speech).or_default().push(rule);

        Ok(id)
    }

    /// Removes a rule from whichever store, active or deprecated,
    /// currently holds it.
    pub fn delete_rule(&mut self, id: RuleId) -> Result<(), MorphError> {
        for store in [&mut self.rules, &mut self.deprecated] {
            for rules in store.values_mut() {
                if let Some(index) = rules.iter().position(|r| r.id == id) {
                    rules.remove(index);
                    return Ok(());
                }
            }
        }

        Err(MorphError::RuleNotFound(id))
    }

    /// Swaps an active rule with its adjacent sibling in the same
    /// `(part of speech, form)` rule set. No-op at either boundary.
    /// Deprecated rules cannot be reordered.
    pub fn move_rule(&mut self, id: RuleId, direction: Direction) -> Result<(), MorphError> {
        for rules in self.rules.values_mut() {
            let Some(index) = rules.iter().position(|r| r.id == id) else {
                continue;
            };

            let form = rules[index].form.clone();
            let sibling = match direction {
                Direction::Up => rules[..index].iter().rposition(|r| r.form == form),
                Direction::Down => rules[index + 1..]
                    .iter()
                    .position(|r| r.form == form)
                    .map(|offset| index + 1 + offset),
            };

            if let Some(other) = sibling {
                rules.swap(index, other);
            }

            return Ok(());
        }

        Err(MorphError::RuleNotFound(id))
    }

    /// The ordered rule set for one grid cell.
    pub fn rules_for(&self, part_of_speech: PartOfSpeechId, form: &FormId) -> Vec<&Rule> {
        self.rules
            .get(&part_of_speech)
            .map(|rules| rules.iter().filter(|r| &r.form == form).collect())
            .unwrap_or_default()
    }

    /// Rules orphaned by dimension-model restructures; retained for
    /// recoverability, never used in generation.
    pub fn deprecated_rules_for(&self, part_of_speech: PartOfSpeechId) -> Vec<&Rule> {
        self.deprecated
            .get(&part_of_speech)
            .map(|rules| rules.iter().collect())
            .unwrap_or_default()
    }

    /// Dispatch point for UI selection handling.
    pub fn rules_for_selection(
        &self,
        part_of_speech: PartOfSpeechId,
        selection: &FormSelection,
    ) -> Vec<&Rule> {
        match selection {
            FormSelection::Active(form) => self.rules_for(part_of_speech, form),
            FormSelection::Deprecated => self.deprecated_rules_for(part_of_speech),
        }
    }

    /// Deletes every active rule attached to one grid cell.
    pub fn delete_rules_for(&mut self, part_of_speech: PartOfSpeechId, form: &FormId) {
        if let Some(rules) = self.rules.get_mut(&part_of_speech) {
            rules.retain(|r| &r.form != form);
        }
    }

    /// Drops every active rule of a part of speech.
    pub fn wipe_rules(&mut self, part_of_speech: PartOfSpeechId) {
        self.rules.remove(&part_of_speech);
    }

    /// Template propagation: every active rule under the part of speech
    /// whose *name* matches an exemplar's takes that exemplar's pattern,
    /// class filter, and transform chain. Ids and form scoping stay put,
    /// so one edited exemplar corrects its same-named copies across the
    /// whole grid. Exemplars are validated before anything mutates.
    /// Returns how many rules were rewritten; irreversible, so callers
    /// confirm with the designer first.
    pub fn bulk_update(
        &mut self,
        part_of_speech: PartOfSpeechId,
        exemplars: &[Rule],
    ) -> Result<usize, MorphError> {
        for exemplar in exemplars {
            validate_rule(exemplar)?;
        }

        let mut updated = 0;
        if let Some(rules) = self.rules.get_mut(&part_of_speech) {
            for rule in rules.iter_mut() {
                for exemplar in exemplars {
                    if rule.id != exemplar.id && rule.name == exemplar.name {
                        rule.pattern = exemplar.pattern.clone();
                        rule.class_filter = exemplar.class_filter.clone();
                        rule.transforms = exemplar.transforms.clone();
                        updated += 1;
                    }
                }
            }
        }

        Ok(updated)
    }

    /// Deletes every active rule under the part of speech whose name
    /// matches an exemplar's, across all combined forms. Returns the
    /// number deleted; callers confirm with the designer first.
    pub fn bulk_delete(&mut self, part_of_speech: PartOfSpeechId, exemplars: &[Rule]) -> usize {
        let names: HashSet<&str> = exemplars.iter().map(|r| r.name.as_str()).collect();

        let Some(rules) = self.rules.get_mut(&part_of_speech) else {
            return 0;
        };

        let before = rules.len();
        rules.retain(|r| !names.contains(r.name.as_str()));
        before - rules.len()
    }

    /// Copies the given rules onto every grid cell that holds `value` in
    /// the dimension at `dimension_index`, whatever the other positions
    /// hold, skipping the cell the copy was initiated from. Copies get
    /// fresh ids and are appended at the tail of each target's order.
    /// The rule list is an explicit argument so a clipboard captured in
    /// one window can be pasted from another without shared state.
    pub fn copy_to_dimension(
        &mut self,
        part_of_speech: PartOfSpeechId,
        dimension_index: usize,
        value: DimensionValueId,
        rules: &[Rule],
        source_form: &FormId,
    ) -> Result<usize, MorphError> {
        self.ensure_dimension_index(part_of_speech, dimension_index)?;
        for rule in rules {
            validate_rule(rule)?;
        }

        let mut targets = Vec::new();
        for form in self.all_combined_forms(part_of_speech)? {
            if &form != source_form && form_holds_value(&form, dimension_index, value)? {
                targets.push(form);
            }
        }

        let mut copied = 0;
        for form in targets {
            for rule in rules {
                let mut copy = rule.clone();
                copy.id = self.allocate_rule_id();
                copy.part_of_speech = part_of_speech;
                copy.form = form.clone();
                self.rules.entry(part_of_speech).or_default().push(copy);
                copied += 1;
            }
        }

        Ok(copied)
    }

    /// The inverse of [`copy_to_dimension`](Self::copy_to_dimension):
    /// deletes matching-named rules from every cell sharing the fixed
    /// dimension value.
    pub fn delete_from_dimension(
        &mut self,
        part_of_speech: PartOfSpeechId,
        dimension_index: usize,
        value: DimensionValueId,
        rules: &[Rule],
    ) -> Result<usize, MorphError> {
        self.ensure_dimension_index(part_of_speech, dimension_index)?;
        let names: HashSet<&str> = rules.iter().map(|r| r.name.as_str()).collect();

        // Decide first, mutate second, so a malformed form id aborts the
        // whole operation instead of applying it halfway.
        let mut doomed = Vec::new();
        if let Some(stored) = self.rules.get(&part_of_speech) {
            for rule in stored {
                if names.contains(rule.name.as_str())
                    && form_holds_value(&rule.form, dimension_index, value)?
                {
                    doomed.push(rule.id);
                }
            }
        }

        if let Some(stored) = self.rules.get_mut(&part_of_speech) {
            stored.retain(|rule| !doomed.contains(&rule.id));
        }

        Ok(doomed.len())
    }

    /// Force-disables (or re-enables) generation of one combined form.
    /// Idempotent.
    pub fn set_suppressed(&mut self, part_of_speech: PartOfSpeechId, form: &FormId, suppress: bool) {
        let key = (part_of_speech, form.clone());
        if suppress {
            self.suppressed.insert(key);
        } else {
            self.suppressed.remove(&key);
        }
    }

    pub fn is_suppressed(&self, part_of_speech: PartOfSpeechId, form: &FormId) -> bool {
        self.suppressed
            .contains(&(part_of_speech, form.clone()))
    }

    pub fn has_deprecated_rules(&self, part_of_speech: PartOfSpeechId) -> bool {
        self.deprecated
            .get(&part_of_speech)
            .is_some_and(|rules| !rules.is_empty())
    }

    /// Moves every active rule whose form no longer names a grid cell into
    /// the deprecated store, preserving relative order. Runs inside every
    /// dimension-model mutation, before control returns to the caller, so
    /// an orphaned-but-active rule set is never observable from outside.
    pub(crate) fn sweep_deprecated(&mut self, part_of_speech: PartOfSpeechId) {
        let Ok(grid) = self.all_combined_forms(part_of_speech) else {
            return;
        };
        let live: HashSet<FormId> = grid.into_iter().collect();
        let bare_is_live = self
            .parts_of_speech
            .get(&part_of_speech)
            .is_some_and(|record| record.dimensions.is_empty());

        let Some(rules) = self.rules.get_mut(&part_of_speech) else {
            return;
        };

        let mut orphaned = Vec::new();
        let mut kept = Vec::with_capacity(rules.len());
        for rule in rules.drain(..) {
            let alive = if rule.form.is_bare() {
                bare_is_live
            } else {
                live.contains(&rule.form)
            };

            if alive {
                kept.push(rule);
            } else {
                orphaned.push(rule);
            }
        }
        *rules = kept;

        if !orphaned.is_empty() {
            self.deprecated
                .entry(part_of_speech)
                .or_default()
                .extend(orphaned);
        }
    }

    fn ensure_form_exists(
        &self,
        part_of_speech: PartOfSpeechId,
        form: &FormId,
    ) -> Result<(), MorphError> {
        let record = self.part_of_speech(part_of_speech)?;

        if record.dimensions.is_empty() {
            if form.is_bare() {
                return Ok(());
            }
        } else if self.all_combined_forms(part_of_speech)?.contains(form) {
            return Ok(());
        }

        Err(MorphError::FormNotFound {
            part_of_speech,
            form: form.clone(),
        })
    }

    fn ensure_dimension_index(
        &self,
        part_of_speech: PartOfSpeechId,
        index: usize,
    ) -> Result<(), MorphError> {
        let record = self.part_of_speech(part_of_speech)?;
        if index < record.dimensions.len() {
            Ok(())
        } else {
            Err(MorphError::DimensionIndexOutOfRange {
                part_of_speech,
                index,
            })
        }
    }

    pub(crate) fn allocate_rule_id(&mut self) -> RuleId {
        let id = RuleId(self.next_rule_id);
        self.next_rule_id += 1;
        id
    }
}
