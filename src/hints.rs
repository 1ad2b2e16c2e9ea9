//! Hint extraction: pulls instructional phrases out of parenthesised spans in
//! question text.
//!
//! Question authors write blanks like `(a) --- (use possessive to pre-modify the noun)`.
//! The first span is an answer-blank label, the second is the hint. Board/year
//! citations such as `(Dhaka-2023)` are parenthesised too and must be dropped.

/// Extract hints in text order. Original casing is preserved; duplicates are kept.
pub fn extract_hints(text: &str) -> Vec<String> {
  parenthesised_spans(text)
    .into_iter()
    .map(str::trim)
    .filter(|span| !span.is_empty())
    .filter(|span| !is_blank_label(span))
    .filter(|span| !is_citation(span))
    .map(str::to_string)
    .collect()
}

// A `(` while a span is open restarts it; a stray `)` and a span left open at
// the end of the text are ignored.
fn parenthesised_spans(text: &str) -> Vec<&str> {
  let mut spans = vec![];
  let mut open: Option<usize> = None;
  for (i, c) in text.char_indices() {
    match c {
      '(' => open = Some(i + c.len_utf8()),
      ')' => {
        if let Some(start) = open.take() {
          spans.push(&text[start..i]);
        }
      }
      _ => {}
    }
  }
  spans
}

/// Answer-blank labels: `a`, `G`, `iv`, `3`, `12`.
fn is_blank_label(span: &str) -> bool {
  if span.contains(char::is_whitespace) {
    return false;
  }
  let mut chars = span.chars();
  if let (Some(c), None) = (chars.next(), chars.next()) {
    if c.is_ascii_alphabetic() {
      return true;
    }
  }
  if span.len() <= 2 && span.chars().all(|c| c.is_ascii_digit()) {
    return true;
  }
  is_roman_numeral(span)
}

fn is_roman_numeral(s: &str) -> bool {
  const NUMERALS: [&str; 10] = ["i", "ii", "iii", "iv", "v", "vi", "vii", "viii", "ix", "x"];
  NUMERALS.contains(&s.to_ascii_lowercase().as_str())
}

/// Citations like `Dhaka-2023`, `Rajshahi Board 2019`, `Ctg. B. 2017`, `All Boards 2018`.
fn is_citation(span: &str) -> bool {
  let pieces: Vec<&str> = span
    .split(|c: char| c.is_whitespace() || matches!(c, '-' | ',' | '.' | '/'))
    .filter(|p| !p.is_empty())
    .collect();

  let mut years = 0;
  let mut words = 0;
  for piece in &pieces {
    if is_year(piece) {
      years += 1;
    } else if is_place_word(piece) {
      words += 1;
    } else {
      return false;
    }
  }
  years > 0 && words > 0
}

fn is_year(piece: &str) -> bool {
  piece.len() == 4
    && piece.chars().all(|c| c.is_ascii_digit())
    && piece.parse::<u16>().map(|y| (1900..=2099).contains(&y)).unwrap_or(false)
}

/// Education boards and the abbreviations question banks cite them by.
const BOARD_WORDS: &[&str] = &[
  "board", "boards", "b", "all",
  "dhaka", "dha", "dhk",
  "rajshahi", "raj",
  "chittagong", "chattogram", "ctg", "chat",
  "comilla", "cumilla", "com", "cum",
  "jessore", "jashore", "jes",
  "barisal", "barishal", "bar",
  "sylhet", "syl",
  "dinajpur", "din",
  "mymensingh", "mym",
  "madrasah", "technical",
];

fn is_place_word(piece: &str) -> bool {
  BOARD_WORDS.contains(&piece.to_ascii_lowercase().as_str())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn keeps_instructional_phrases_in_order() {
    let text = "Cricket is an (a) --- (pre-modify the noun) game. It is not a game of (b) --- \
                (use possessive to pre-modify the noun) country.";
    assert_eq!(
      extract_hints(text),
      vec!["pre-modify the noun", "use possessive to pre-modify the noun"]
    );
  }

  #[test]
  fn drops_labels_and_citations() {
    let hints = extract_hints("(a) test with (Dhaka-2023) and (use adjective to pre-modify the noun)");
    assert_eq!(hints, vec!["use adjective to pre-modify the noun"]);

    assert!(extract_hints("(Rajshahi Board 2019) (Ctg. B. 2017) (iv) (12) (G)").is_empty());
  }

  #[test]
  fn no_parentheses_means_no_hints() {
    assert!(extract_hints("He is a good boy.").is_empty());
    assert!(extract_hints("").is_empty());
  }

  #[test]
  fn unbalanced_parentheses_do_not_emit() {
    assert!(extract_hints("a stray ) and an open (use adverb").is_empty());
    assert_eq!(
      extract_hints("(broken (use an intensifier) tail"),
      vec!["use an intensifier"]
    );
  }

  #[test]
  fn repeated_hints_are_kept_and_trimmed() {
    let hints = extract_hints("(a) --- ( use adverb ) and (b) --- (use adverb)");
    assert_eq!(hints, vec!["use adverb", "use adverb"]);
  }

  #[test]
  fn years_alone_or_lowercase_phrases_are_not_citations() {
    assert_eq!(extract_hints("(2023)"), vec!["2023"]);
    assert_eq!(extract_hints("(use present participle 2023)"), vec!["use present participle 2023"]);
  }

  #[test]
  fn title_case_instructions_with_a_year_are_hints() {
    assert_eq!(extract_hints("(Use Present Participle 2023)"), vec!["Use Present Participle 2023"]);
    assert_eq!(extract_hints("(Possessive 1999)"), vec!["Possessive 1999"]);
    assert!(extract_hints("(All Boards 2018) (Sylhet-2015) (Din. B. 2019)").is_empty());
  }
}
