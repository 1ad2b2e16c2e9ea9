//! Rule taxonomy: the table saying which keyword phrases are evidence for which
//! rules.
//!
//! This is the only place that knows "possessive" points at rule 5. The built-in
//! table is authored against the 21-rule modifier catalog in `seeds`; a catalog
//! file with other rules carries its own entries. Matching is by keyword sets,
//! not word order:
//! - exact: every keyword of the entry is present, strength = entry weight
//! - partial: the entry's first (anchor) keyword is present but not all of them,
//!   strength = 0.5 * weight * overlap / len, always below any exact match
//!
//! An entry naming one modifier position never fires on a hint that asks for the
//! other one ("pre-modify" vs "post-modify").

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TaxonomyEntry {
  /// Canonical keywords, anchor first.
  pub phrase: Vec<String>,
  pub rules: Vec<u32>,
  /// In (0.5, 1]; generic phrases carry lower weight than specific ones.
  pub weight: f32,
}

/// Static form of an entry for the built-in table.
#[derive(Clone, Copy, Debug)]
struct EntryDef {
  phrase: &'static [&'static str],
  rules: &'static [u32],
  weight: f32,
}

impl From<&EntryDef> for TaxonomyEntry {
  fn from(d: &EntryDef) -> Self {
    Self {
      phrase: d.phrase.iter().map(|k| k.to_string()).collect(),
      rules: d.rules.to_vec(),
      weight: d.weight,
    }
  }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
  Partial,
  Exact,
}

/// One candidate rule for a keyword set.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Candidate {
  pub rule_id: u32,
  pub kind: MatchKind,
  pub strength: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Taxonomy {
  entries: Vec<TaxonomyEntry>,
}

impl Default for Taxonomy {
  fn default() -> Self { Self::modifiers() }
}

impl Taxonomy {
  pub fn new(entries: Vec<TaxonomyEntry>) -> Self {
    Self { entries }
  }

  /// Table for the built-in modifier catalog.
  pub fn modifiers() -> Self {
    Self::new(MODIFIER_ENTRIES.iter().map(TaxonomyEntry::from).collect())
  }

  pub fn entries(&self) -> &[TaxonomyEntry] { &self.entries }

  /// Candidate rules for one hint's keywords, strongest match kept per rule,
  /// ordered by rule id. No match is an empty list.
  pub fn lookup<S: AsRef<str>>(&self, keywords: &[S]) -> Vec<Candidate> {
    let mut best: BTreeMap<u32, Candidate> = BTreeMap::new();
    for entry in &self.entries {
      let Some((kind, strength)) = score_entry(entry, keywords) else { continue };
      for &rule_id in &entry.rules {
        let cand = Candidate { rule_id, kind, strength };
        best
          .entry(rule_id)
          .and_modify(|cur| {
            if strength > cur.strength {
              *cur = cand;
            }
          })
          .or_insert(cand);
      }
    }
    best.into_values().collect()
  }
}

/// (position an entry may name, position that contradicts it)
const OPPOSITE_POSITIONS: &[(&str, &str)] = &[("pre-modify", "post-modify"), ("post-modify", "pre-modify")];

fn score_entry<S: AsRef<str>>(entry: &TaxonomyEntry, keywords: &[S]) -> Option<(MatchKind, f32)> {
  let has = |k: &str| keywords.iter().any(|w| w.as_ref() == k);
  let names = |k: &str| entry.phrase.iter().any(|p| p == k);
  let overlap = entry.phrase.iter().filter(|k| has(k.as_str())).count();
  let len = entry.phrase.len();
  if len == 0 || overlap == 0 {
    return None;
  }
  if overlap == len {
    return Some((MatchKind::Exact, entry.weight));
  }
  let contradicted = OPPOSITE_POSITIONS
    .iter()
    .any(|&(wanted, opposite)| names(wanted) && !has(wanted) && has(opposite));
  if contradicted {
    return None;
  }
  if has(entry.phrase[0].as_str()) {
    let strength = 0.5 * entry.weight * overlap as f32 / len as f32;
    return Some((MatchKind::Partial, strength));
  }
  None
}

macro_rules! entry {
  ([$($kw:expr),+ $(,)?] => [$($rule:expr),+ $(,)?], $weight:expr) => {
    EntryDef { phrase: &[$($kw),+], rules: &[$($rule),+], weight: $weight }
  };
}

// Weights: 1.0 names the construction outright, 0.9 strongly implies it,
// 0.8 is a generic instruction shared by several rules.
const MODIFIER_ENTRIES: &[EntryDef] = &[
  // 1: adjective as pre-modifier
  entry!(["pre-modify", "noun"] => [1], 0.8),
  entry!(["adjective", "pre-modify"] => [1], 1.0),
  entry!(["adjective", "noun"] => [1], 0.9),
  // 2: noun adjunct
  entry!(["adjunct"] => [2], 1.0),
  entry!(["noun-adjunct"] => [2], 1.0),
  entry!(["noun-modifier"] => [2], 1.0),
  // 3 / 4: participles before the noun
  entry!(["present", "participle", "pre-modify"] => [3], 1.0),
  entry!(["ing-form", "pre-modify"] => [3], 0.9),
  entry!(["past", "participle", "pre-modify"] => [4], 1.0),
  entry!(["participle", "pre-modify"] => [3, 4], 0.8),
  // 5: possessive
  entry!(["possessive"] => [5], 1.0),
  entry!(["possessive", "pre-modify"] => [5], 1.0),
  // 6: determiners and quantifiers
  entry!(["quantifier"] => [6], 1.0),
  entry!(["determiner"] => [6], 1.0),
  entry!(["article"] => [6], 0.9),
  // 7: compound adjective
  entry!(["compound", "adjective"] => [7], 1.0),
  entry!(["hyphenated", "adjective"] => [7], 1.0),
  // 8: intensifier before an adjective
  entry!(["intensifier"] => [8], 1.0),
  entry!(["adverb", "adjective"] => [8], 0.9),
  // 9: adverb modifying a verb
  entry!(["adverb", "verb"] => [9], 1.0),
  entry!(["adverb", "modify", "verb"] => [9], 1.0),
  // 10: prepositional phrase after the noun
  entry!(["prepositional", "phrase", "post-modify"] => [10], 1.0),
  entry!(["prepositional", "post-modify"] => [10], 1.0),
  entry!(["preposition", "post-modify"] => [10], 0.9),
  // 11: infinitive after the noun
  entry!(["infinitive", "post-modify"] => [11], 1.0),
  entry!(["infinitive", "noun"] => [11], 0.9),
  // 12: relative clause
  entry!(["relative", "clause"] => [12], 1.0),
  entry!(["relative", "pronoun"] => [12], 1.0),
  // 13 / 14: participle phrases after the noun
  entry!(["present", "participle", "post-modify"] => [13], 1.0),
  entry!(["past", "participle", "post-modify"] => [14], 1.0),
  entry!(["participle", "post-modify"] => [13, 14], 0.8),
  // 15: appositive
  entry!(["appositive"] => [15], 1.0),
  entry!(["apposition"] => [15], 1.0),
  // 16: sentence adverb
  entry!(["sentence", "adverb"] => [16], 1.0),
  entry!(["sentence", "modify"] => [16], 0.9),
  // 17: infinitive of purpose
  entry!(["infinitive", "purpose"] => [17], 1.0),
  entry!(["infinitive", "verb"] => [17], 0.9),
  // 18: conditional clause
  entry!(["if", "clause"] => [18], 1.0),
  entry!(["conditional"] => [18], 1.0),
  // 19: adverbial clause
  entry!(["adverbial", "clause"] => [19], 1.0),
  entry!(["time", "clause"] => [19], 0.9),
  // 20: adverbial phrase after the verb
  entry!(["adverbial", "phrase"] => [20], 1.0),
  entry!(["prepositional", "phrase", "verb"] => [20], 0.9),
  // 21: post-modifying an adjective
  entry!(["post-modify", "adjective"] => [21], 1.0),
  entry!(["infinitive", "adjective"] => [21], 0.9),
  // generic post-modification of a noun
  entry!(["post-modify", "noun"] => [10, 12], 0.8),
];
