//! Loading the rule/question catalog from TOML.
//!
//! Expected schema:
//!
//! ```toml
//! [[rules]]
//! id = 1
//! label = "Rule 1"
//! title = "Adjective as pre-modifier"
//!
//! [[questions]]
//! id = "q1"
//! question = "Cricket is an (a) --- (pre-modify the noun) game."
//!
//! # Optional. Required when the rules differ from the built-in modifier catalog.
//! [[taxonomy]]
//! phrase = ["pre-modify", "noun"]
//! rules = [1]
//! weight = 0.8
//! ```

use std::collections::{HashMap, HashSet};

use serde::Deserialize;
use tracing::{error, info, warn};

use crate::domain::{Question, Rule};
use crate::engine::MatchingEngine;
use crate::keywords::extract_keywords;
use crate::seeds::{seed_questions, seed_rules};
use crate::taxonomy::{Taxonomy, TaxonomyEntry};

#[derive(Clone, Debug, Deserialize, Default)]
pub struct CatalogConfig {
  #[serde(default)]
  pub rules: Vec<Rule>,
  #[serde(default)]
  pub questions: Vec<Question>,
  #[serde(default)]
  pub taxonomy: Vec<TaxonomyEntry>,
}

/// Where the catalog in use came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CatalogSource {
  File,
  Seed,
}

impl CatalogConfig {
  pub fn parse(s: &str) -> Result<Self, String> {
    toml::from_str::<CatalogConfig>(s).map_err(|e| format!("Failed to parse catalog TOML: {e}"))
  }

  pub fn seed() -> Self {
    Self { rules: seed_rules(), questions: seed_questions(), taxonomy: vec![] }
  }

  /// Log duplicate ids. The engine does not deduplicate; this only surfaces editorial slips.
  pub fn warn_on_duplicates(&self) {
    let mut seen_rules = HashSet::new();
    for r in &self.rules {
      if !seen_rules.insert(r.id) {
        warn!(target: "grammar_match", rule_id = r.id, "Duplicate rule id in catalog");
      }
    }
    let mut seen_questions = HashSet::new();
    for q in &self.questions {
      if !seen_questions.insert(q.id.as_str()) {
        warn!(target: "grammar_match", question_id = %q.id, "Duplicate question id in catalog");
      }
    }
  }

  /// The taxonomy this catalog is matched with.
  ///
  /// Entries given in the file win. Without any, the built-in modifier table is
  /// used, but only when every rule agrees (id and title) with the built-in catalog
  /// it was authored against.
  pub fn resolve_taxonomy(&self) -> Result<Taxonomy, String> {
    if !self.taxonomy.is_empty() {
      return self.file_taxonomy();
    }
    let seeds: HashMap<u32, String> = seed_rules().into_iter().map(|r| (r.id, r.title)).collect();
    for r in &self.rules {
      match seeds.get(&r.id) {
        Some(title) if title.eq_ignore_ascii_case(r.title.trim()) => {}
        Some(title) => {
          return Err(format!(
            "Rule {} is titled {:?} but the built-in taxonomy expects {:?}; add [[taxonomy]] entries",
            r.id, r.title, title
          ))
        }
        None => {
          return Err(format!(
            "Rule {} is not in the built-in modifier catalog; add [[taxonomy]] entries",
            r.id
          ))
        }
      }
    }
    Ok(Taxonomy::modifiers())
  }

  // Phrases go through the keyword extractor so they are keyed the same way hints are.
  fn file_taxonomy(&self) -> Result<Taxonomy, String> {
    let known: HashSet<u32> = self.rules.iter().map(|r| r.id).collect();
    let mut entries = Vec::with_capacity(self.taxonomy.len());
    for (i, e) in self.taxonomy.iter().enumerate() {
      if !(e.weight > 0.0 && e.weight <= 1.0) {
        return Err(format!("Taxonomy entry {i} has weight {} outside (0, 1]", e.weight));
      }
      let phrase: Vec<String> = e.phrase.iter().flat_map(|p| extract_keywords(p)).collect();
      if phrase.is_empty() || e.rules.is_empty() {
        return Err(format!("Taxonomy entry {i} needs at least one keyword and one rule"));
      }
      for &rule_id in e.rules.iter().filter(|id| !known.contains(*id)) {
        warn!(target: "grammar_match", entry = i, rule_id, "Taxonomy entry names a rule missing from the catalog");
      }
      entries.push(TaxonomyEntry { phrase, rules: e.rules.clone(), weight: e.weight });
    }
    Ok(Taxonomy::new(entries))
  }

  /// Engine over this catalog. A taxonomy that cannot be resolved is an error.
  pub fn into_engine(self) -> Result<MatchingEngine, String> {
    let taxonomy = self.resolve_taxonomy()?;
    Ok(MatchingEngine::with_taxonomy(self.rules, self.questions, taxonomy))
  }
}

/// Read the catalog from CATALOG_PATH. Any IO/parse failure, or a catalog with no
/// usable taxonomy, falls back to the built-in seeds.
pub fn load_catalog_from_env() -> (CatalogConfig, CatalogSource) {
  let Ok(path) = std::env::var("CATALOG_PATH") else {
    info!(target: "grammar_match", "CATALOG_PATH not set; using built-in modifier catalog");
    return (CatalogConfig::seed(), CatalogSource::Seed);
  };
  match std::fs::read_to_string(&path) {
    Ok(s) => catalog_from_str(&path, &s),
    Err(e) => {
      error!(target: "grammar_match", %path, error = %e, "Failed to read catalog file; using built-in seeds");
      (CatalogConfig::seed(), CatalogSource::Seed)
    }
  }
}

fn catalog_from_str(path: &str, s: &str) -> (CatalogConfig, CatalogSource) {
  let cfg = match CatalogConfig::parse(s) {
    Ok(cfg) => cfg,
    Err(e) => {
      error!(target: "grammar_match", %path, error = %e, "Failed to parse catalog; using built-in seeds");
      return (CatalogConfig::seed(), CatalogSource::Seed);
    }
  };
  if let Err(e) = cfg.resolve_taxonomy() {
    error!(target: "grammar_match", %path, error = %e, "Catalog has no usable taxonomy; using built-in seeds");
    return (CatalogConfig::seed(), CatalogSource::Seed);
  }
  info!(
    target: "grammar_match",
    %path,
    rules = cfg.rules.len(),
    questions = cfg.questions.len(),
    taxonomy_entries = cfg.taxonomy.len(),
    "Loaded catalog (TOML)"
  );
  cfg.warn_on_duplicates();
  (cfg, CatalogSource::File)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_rules_and_questions() {
    let cfg = CatalogConfig::parse(
      r#"
        [[rules]]
        id = 1
        label = "Rule 1"
        title = "Adjective as pre-modifier"
        examples = ["He is an honest man."]

        [[rules]]
        id = 5
        label = "Rule 5"
        title = "Possessive as pre-modifier"

        [[questions]]
        id = "q1"
        question = "It is a game of (b) --- (use possessive to pre-modify the noun) country."
        answer = "our"
        board = "Dhaka"
        year = 2023
        ruleId = 5
      "#,
    )
    .expect("valid catalog");

    assert_eq!(cfg.rules.len(), 2);
    assert_eq!(cfg.rules[0].examples, vec!["He is an honest man."]);
    assert!(cfg.rules[1].description.is_empty());
    assert_eq!(cfg.questions[0].rule_id, Some(5));
    assert_eq!(cfg.questions[0].year, Some(2023));
    assert!(cfg.questions[0].topic.is_empty());
  }

  #[test]
  fn empty_document_is_an_empty_catalog() {
    let cfg = CatalogConfig::parse("").expect("empty is fine");
    assert!(cfg.rules.is_empty() && cfg.questions.is_empty());
  }

  #[test]
  fn malformed_document_is_an_error() {
    let err = CatalogConfig::parse("[[rules]]\nid = \"one\"").unwrap_err();
    assert!(err.contains("Failed to parse catalog TOML"));
  }

  const TENSE_CATALOG: &str = r#"
    [[rules]]
    id = 5
    label = "Rule 5"
    title = "Present perfect tense"

    [[questions]]
    id = "t1"
    question = "It is a game of (b) --- (use possessive to pre-modify the noun) country."

    [[questions]]
    id = "t2"
    question = "I (a) --- (use present perfect) my homework."
  "#;

  #[test]
  fn foreign_rules_without_taxonomy_fall_back_to_seeds() {
    let cfg = CatalogConfig::parse(TENSE_CATALOG).expect("valid catalog");
    let err = cfg.resolve_taxonomy().unwrap_err();
    assert!(err.contains("Rule 5"), "{err}");

    let (cfg, source) = catalog_from_str("tense.toml", TENSE_CATALOG);
    assert_eq!(source, CatalogSource::Seed);
    assert_eq!(cfg.rules.len(), 21);
  }

  #[test]
  fn file_taxonomy_drives_matching() {
    let doc = format!(
      "{TENSE_CATALOG}\n[[taxonomy]]\nphrase = [\"Present\", \"perfect\"]\nrules = [5]\nweight = 1.0\n"
    );
    let (cfg, source) = catalog_from_str("tense.toml", &doc);
    assert_eq!(source, CatalogSource::File);

    let engine = cfg.into_engine().expect("taxonomy resolves");
    assert_eq!(engine.taxonomy().entries()[0].phrase, vec!["present", "perfect"]);
    let m = engine.create_mapping();
    assert_eq!(m.questions_for(5), ["t2".to_string()]);
    assert_eq!(m.unmatched_questions(), ["t1".to_string()]);
  }

  #[test]
  fn subset_of_built_in_rules_keeps_built_in_taxonomy() {
    let cfg = CatalogConfig::parse(
      r#"
        [[rules]]
        id = 5
        label = "Rule 5"
        title = "Possessive as pre-modifier"
      "#,
    )
    .expect("valid catalog");
    assert_eq!(cfg.resolve_taxonomy(), Ok(Taxonomy::modifiers()));
  }

  #[test]
  fn bad_taxonomy_weight_is_rejected() {
    let doc = format!("{TENSE_CATALOG}\n[[taxonomy]]\nphrase = [\"perfect\"]\nrules = [5]\nweight = 1.5\n");
    let cfg = CatalogConfig::parse(&doc).expect("valid toml");
    assert!(cfg.resolve_taxonomy().unwrap_err().contains("weight"));
  }

  #[test]
  fn seed_catalog_is_complete() {
    let cfg = CatalogConfig::seed();
    assert_eq!(cfg.rules.len(), 21);
    assert!(!cfg.questions.is_empty());
    assert_eq!(cfg.resolve_taxonomy(), Ok(Taxonomy::modifiers()));
  }
}
