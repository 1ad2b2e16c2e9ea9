//! Built-in content: the 21-rule modifier catalog the taxonomy is authored
//! against, plus a small question bank. Used when no catalog file is configured.

use crate::domain::{Question, Rule};

macro_rules! rule {
  ($id:expr, $title:expr, $desc:expr, [$($ex:expr),* $(,)?]) => {
    Rule {
      id: $id,
      label: format!("Rule {}", $id),
      title: $title.into(),
      description: $desc.into(),
      examples: vec![$($ex.to_string()),*],
    }
  };
}

pub fn seed_rules() -> Vec<Rule> {
  vec![
    rule!(1, "Adjective as pre-modifier", "An adjective placed before a noun describes it.",
      ["He is an honest man.", "Cricket is an outdoor game."]),
    rule!(2, "Noun as pre-modifier", "A noun placed before another noun works like an adjective (noun adjunct).",
      ["He bought a gold ring.", "The village road is muddy."]),
    rule!(3, "Present participle as pre-modifier", "An -ing form before a noun describes an ongoing quality.",
      ["Do not get off a running bus.", "Barking dogs seldom bite."]),
    rule!(4, "Past participle as pre-modifier", "A past participle before a noun describes a completed state.",
      ["A burnt child dreads the fire.", "He found the lost key."]),
    rule!(5, "Possessive as pre-modifier", "A possessive noun or pronoun before a noun shows ownership.",
      ["This is my book.", "Cricket is our national game."]),
    rule!(6, "Determiner or quantifier as pre-modifier", "Articles, demonstratives and quantifiers limit a noun.",
      ["Many people came.", "This pen is mine."]),
    rule!(7, "Compound adjective as pre-modifier", "A hyphenated group of words before a noun works as one adjective.",
      ["She has a six-year-old son.", "It was a well-known fact."]),
    rule!(8, "Intensifier before an adjective", "An adverb such as very or extremely strengthens an adjective.",
      ["It is a very interesting book.", "The tea is too hot."]),
    rule!(9, "Adverb modifying a verb", "An adverb tells how, when or where an action happens.",
      ["He walks slowly.", "She sang sweetly."]),
    rule!(10, "Prepositional phrase as post-modifier", "A phrase beginning with a preposition follows and describes a noun.",
      ["The man in the black coat is my uncle.", "A house of bricks stands there."]),
    rule!(11, "Infinitive as post-modifier", "A to-infinitive after a noun describes its purpose or use.",
      ["I have no money to spend.", "He has a lot of work to do."]),
    rule!(12, "Relative clause as post-modifier", "A clause introduced by who, which or that follows a noun.",
      ["The boy who came here is my brother.", "I saw the house which he built."]),
    rule!(13, "Present participle phrase as post-modifier", "An -ing phrase after a noun describes it.",
      ["The girl singing a song is my sister.", "I saw a man crossing the road."]),
    rule!(14, "Past participle phrase as post-modifier", "A past participle phrase after a noun describes it.",
      ["The book written by him is popular.", "The goods stolen from the shop were found."]),
    rule!(15, "Appositive as post-modifier", "A noun phrase beside another noun renames it.",
      ["Dhaka, the capital of Bangladesh, is crowded.", "Mr. Karim, our teacher, is kind."]),
    rule!(16, "Sentence adverb", "An adverb that modifies the whole sentence.",
      ["Fortunately, he passed.", "Surely, you will succeed."]),
    rule!(17, "Infinitive of purpose", "A to-infinitive after a verb tells why the action is done.",
      ["He went to the market to buy fish.", "She works hard to pass."]),
    rule!(18, "Conditional clause as modifier", "An if-clause modifies the main clause by stating a condition.",
      ["If you work hard, you will succeed.", "If it rains, we will stay home."]),
    rule!(19, "Adverbial clause as modifier", "A clause of time, place or reason modifies the verb.",
      ["When I reached the station, the train had left.", "He left because he was ill."]),
    rule!(20, "Adverbial phrase after a verb", "A prepositional or adverbial phrase after a verb says how, when or where.",
      ["He went to school by bus.", "They played in the field."]),
    rule!(21, "Post-modifying an adjective", "An infinitive or prepositional phrase after an adjective completes it.",
      ["He is eager to learn.", "She is good at English."]),
  ]
}

macro_rules! question {
  ($id:expr, $rule:expr, $board:expr, $year:expr, $text:expr, $answer:expr) => {
    Question {
      id: $id.into(),
      question: $text.into(),
      answer: Some($answer.into()),
      topic: "Use of modifiers".into(),
      level: "HSC".into(),
      board: $board.into(),
      year: $year,
      rule_id: $rule,
    }
  };
}

pub fn seed_questions() -> Vec<Question> {
  vec![
    question!("mod-001", Some(5), "Dhaka", Some(2023),
      "Cricket is an (a) --- (pre-modify the noun) game. It is not a game of (b) --- \
       (use possessive to pre-modify the noun) country. (Dhaka-2023)",
      "(a) outdoor (b) our"),
    question!("mod-002", Some(3), "Rajshahi", Some(2019),
      "Do not get off a (a) --- (use present participle to pre-modify the noun) bus. \
       It is a (b) --- (use an intensifier) dangerous habit.",
      "(a) running (b) very"),
    question!("mod-003", Some(12), "Comilla", Some(2018),
      "The man (a) --- (use a relative clause to post-modify the noun) is our teacher. \
       He teaches us (b) --- (use an adverb to modify the verb).",
      "(a) who came here yesterday (b) sincerely"),
    question!("mod-004", Some(11), "Jessore", Some(2017),
      "I have no time (a) --- (use an infinitive to post-modify the noun). \
       My brother has a (b) --- (use compound adjective) son.",
      "(a) to waste (b) six-year-old"),
    question!("mod-005", Some(15), "Sylhet", Some(2022),
      "Dhaka, (a) --- (use an appositive), is a crowded city. (b) --- (use a sentence adverb), \
       the traffic is getting better.",
      "(a) the capital of Bangladesh (b) Fortunately"),
    question!("mod-006", Some(18), "Barisal", Some(2016),
      "(a) --- (use an if clause) you will succeed. He went to the market \
       (b) --- (use an infinitive of purpose).",
      "(a) If you work hard (b) to buy fish"),
    question!("mod-007", Some(4), "Chittagong", Some(2021),
      "A (a) --- (use past participle to pre-modify the noun) child dreads the fire. \
       The girl (b) --- (use present participle to post-modify the noun) is my sister.",
      "(a) burnt (b) singing a song"),
    question!("mod-008", Some(10), "Dinajpur", Some(2019),
      "The house (a) --- (use a prepositional phrase to post-modify the noun) is ours. \
       The letter (b) --- (use past participle to post-modify the noun) reached me late.",
      "(a) of bricks (b) written by him"),
    question!("mod-009", Some(19), "Dhaka", Some(2020),
      "(a) --- (use an adverbial clause), the train had left. They played \
       (b) --- (use an adverbial phrase).",
      "(a) When I reached the station (b) in the field"),
    question!("mod-010", Some(6), "Mymensingh", Some(2023),
      "(a) --- (use a quantifier) people attended the (b) --- (use noun adjunct) fair.",
      "(a) Many (b) village"),
    question!("mod-011", Some(21), "Rajshahi", Some(2022),
      "He is eager (a) --- (use an infinitive to post-modify the adjective). \
       She is (b) --- (use an intensifier) good at English.",
      "(a) to learn (b) very"),
    question!("mod-012", None, "Comilla", Some(2015),
      "Read the passage carefully and answer the questions that follow.",
      "Answers will vary."),
    question!("mod-013", Some(1), "Sylhet", Some(2018),
      "Bangladesh is a (a) --- (use adjective to pre-modify the noun) country. \
       Her (b) --- (pre-modify the noun) people are hospitable.",
      "(a) riverine (b) simple"),
    question!("mod-014", None, "Jessore", Some(2016),
      "Fill in the gaps with (a) --- (suitable words) from the box. (Jessore-2016)",
      "Answers will vary."),
  ]
}
