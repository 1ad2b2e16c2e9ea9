//! Keyword extraction: turns one hint into normalized, taxonomy-ready keywords.
//!
//! Tokens split on anything that is not alphanumeric or `-`, so compounds such as
//! `pre-modify` survive as one keyword. Stop-words and instruction glue ("use",
//! "the", "to") are dropped, and a small canonical-form table folds plurals and
//! spelling variants onto the forms the taxonomy is keyed on.

const MIN_KEYWORD_LEN: usize = 3;

/// Short words that still carry grammatical meaning.
const SHORT_ALLOW_LIST: &[&str] = &["if"];

const STOP_WORDS: &[&str] = &[
  // articles / determiners used as glue
  "a", "an", "the", "this", "that", "these", "those", "some", "any",
  // prepositions
  "to", "of", "in", "on", "at", "by", "for", "with", "from", "into", "as", "about",
  // conjunctions
  "and", "or", "but", "nor", "so",
  // instruction verbs
  "use", "using", "used", "make", "write", "put", "fill", "blank", "blanks", "gap", "gaps",
  "suitable", "appropriate", "correct", "proper", "form", "given", "word", "words",
  // pronouns / auxiliaries
  "it", "its", "is", "are", "be", "was", "were", "you", "your", "there", "here",
];

/// Variant -> canonical keyword.
const CANONICAL_FORMS: &[(&str, &str)] = &[
  ("premodify", "pre-modify"),
  ("pre-modifies", "pre-modify"),
  ("pre-modifier", "pre-modify"),
  ("pre-modifiers", "pre-modify"),
  ("pre-modifying", "pre-modify"),
  ("postmodify", "post-modify"),
  ("post-modifies", "post-modify"),
  ("post-modifier", "post-modify"),
  ("post-modifiers", "post-modify"),
  ("post-modifying", "post-modify"),
  ("modifies", "modify"),
  ("modifying", "modify"),
  ("modifiers", "modifier"),
  ("nouns", "noun"),
  ("verbs", "verb"),
  ("adjectives", "adjective"),
  ("adverbs", "adverb"),
  ("participles", "participle"),
  ("infinitives", "infinitive"),
  ("phrases", "phrase"),
  ("clauses", "clause"),
  ("possessives", "possessive"),
  ("intensifiers", "intensifier"),
  ("quantifiers", "quantifier"),
  ("determiners", "determiner"),
  ("articles", "article"),
  ("prepositions", "preposition"),
  ("appositives", "appositive"),
];

/// Extract keywords from a single hint, preserving first-seen order without duplicates.
pub fn extract_keywords(hint: &str) -> Vec<String> {
  let lower = hint.to_lowercase();
  let mut out: Vec<String> = vec![];
  for raw in lower.split(|c: char| !(c.is_alphanumeric() || c == '-')) {
    let token = raw.trim_matches('-');
    if token.is_empty() {
      continue;
    }
    let token = canonical(token);
    if STOP_WORDS.contains(&token) {
      continue;
    }
    if token.chars().count() < MIN_KEYWORD_LEN && !SHORT_ALLOW_LIST.contains(&token) {
      continue;
    }
    if !out.iter().any(|k| k == token) {
      out.push(token.to_string());
    }
  }
  out
}

/// Flatten per-hint keyword lists into one de-duplicated list for display.
pub fn merge_keywords(per_hint: &[Vec<String>]) -> Vec<String> {
  let mut out: Vec<String> = vec![];
  for kw in per_hint.iter().flatten() {
    if !out.contains(kw) {
      out.push(kw.clone());
    }
  }
  out
}

fn canonical(token: &str) -> &str {
  CANONICAL_FORMS
    .iter()
    .find(|(variant, _)| *variant == token)
    .map(|(_, canon)| *canon)
    .unwrap_or(token)
}
