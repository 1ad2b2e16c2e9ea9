//! Rule suggestion: merges taxonomy candidates across all hints of a question.
//!
//! Per rule the strongest candidate seen in any hint wins (max, not sum, so one
//! repeated hint cannot outweigh a single exact match). Ranking is by strength
//! descending, then rule id ascending.

use std::collections::{BTreeMap, HashSet};

use crate::taxonomy::{Candidate, Taxonomy};

/// Suggestions for one question plus the evidence counts the scorer needs.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Suggestions {
  pub ranked: Vec<Candidate>,
  pub total_hints: usize,
  /// Hints that produced at least one candidate for a known rule.
  pub matched_hints: usize,
}

impl Suggestions {
  pub fn rule_ids(&self) -> Vec<u32> {
    self.ranked.iter().map(|c| c.rule_id).collect()
  }

  pub fn best_strength(&self) -> f32 {
    self.ranked.first().map(|c| c.strength).unwrap_or(0.0)
  }
}

/// Suggest rules for a question given one keyword list per hint.
///
/// Candidates for rules missing from `known_rules` are dropped before merging.
pub fn suggest_rules(
  taxonomy: &Taxonomy,
  keywords_per_hint: &[Vec<String>],
  known_rules: &HashSet<u32>,
) -> Suggestions {
  let mut merged: BTreeMap<u32, Candidate> = BTreeMap::new();
  let mut matched_hints = 0;

  for keywords in keywords_per_hint {
    let cands: Vec<Candidate> = taxonomy
      .lookup(keywords)
      .into_iter()
      .filter(|c| known_rules.contains(&c.rule_id))
      .collect();
    if !cands.is_empty() {
      matched_hints += 1;
    }
    for cand in cands {
      merged
        .entry(cand.rule_id)
        .and_modify(|cur| {
          if cand.strength > cur.strength {
            *cur = cand;
          }
        })
        .or_insert(cand);
    }
  }

  let mut ranked: Vec<Candidate> = merged.into_values().collect();
  ranked.sort_by(|a, b| {
    b.strength
      .total_cmp(&a.strength)
      .then_with(|| a.rule_id.cmp(&b.rule_id))
  });

  Suggestions { ranked, total_hints: keywords_per_hint.len(), matched_hints }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::keywords::extract_keywords;

  fn all_rules() -> HashSet<u32> {
    (1..=21).collect()
  }

  fn per_hint(hints: &[&str]) -> Vec<Vec<String>> {
    hints.iter().map(|h| extract_keywords(h)).collect()
  }

  #[test]
  fn ranks_specific_rule_before_generic_one() {
    let s = suggest_rules(
      &Taxonomy::modifiers(),
      &per_hint(&["pre-modify the noun", "use possessive to pre-modify the noun"]),
      &all_rules(),
    );
    assert_eq!(s.rule_ids(), vec![5, 1]);
    assert_eq!(s.total_hints, 2);
    assert_eq!(s.matched_hints, 2);
    assert_eq!(s.best_strength(), 1.0);
  }

  #[test]
  fn ties_break_on_rule_id() {
    let s = suggest_rules(&Taxonomy::modifiers(), &per_hint(&["use a participle to pre-modify"]), &all_rules());
    // 3 and 4 tie on the generic participle entry; rule 1 is only a partial hit.
    assert_eq!(s.rule_ids(), vec![3, 4, 1]);
  }

  #[test]
  fn unknown_rules_are_filtered_and_do_not_count_as_matches() {
    let known: HashSet<u32> = [1].into_iter().collect();
    let s = suggest_rules(&Taxonomy::modifiers(), &per_hint(&["use possessive"]), &known);
    assert!(s.ranked.is_empty());
    assert_eq!(s.matched_hints, 0);
    assert_eq!(s.total_hints, 1);
  }

  #[test]
  fn nothing_in_nothing_out() {
    let s = suggest_rules(&Taxonomy::modifiers(), &[], &all_rules());
    assert_eq!(s, Suggestions::default());
    assert_eq!(s.best_strength(), 0.0);
  }
}
