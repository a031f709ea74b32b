//! Filter predicates and sort comparators over word records.
//!
//! Filtering normally happens in the store (see `WordStore::fetch_all`);
//! [`WordFilter::matches`] is the in-memory equivalent with the same
//! semantics. Sorting only ever happens in memory, over the current working
//! set.

use std::{cmp::Ordering, iter::Peekable, str::Chars, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
  Error,
  word::{WordFields, WordRecord},
};

// ─── Filter ──────────────────────────────────────────────────────────────────

/// Criteria for [`WordStore::fetch_all`](crate::store::WordStore::fetch_all).
///
/// Criteria combine with logical AND. A criterion that is `None` or the empty
/// string is ignored; an empty filter lets every record through.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WordFilter {
  /// Substring match on the headword, ASCII-case-insensitive.
  pub word:           Option<String>,
  /// Exact match.
  pub language:       Option<String>,
  /// Exact match.
  pub part_of_speech: Option<String>,
  /// Exact match.
  pub thematic_group: Option<String>,
}

fn active(criterion: &Option<String>) -> Option<&str> {
  criterion.as_deref().filter(|s| !s.is_empty())
}

impl WordFilter {
  pub fn word(&self) -> Option<&str> { active(&self.word) }

  pub fn language(&self) -> Option<&str> { active(&self.language) }

  pub fn part_of_speech(&self) -> Option<&str> { active(&self.part_of_speech) }

  pub fn thematic_group(&self) -> Option<&str> { active(&self.thematic_group) }

  /// `true` when no criterion is active.
  pub fn is_identity(&self) -> bool {
    self.word().is_none()
      && self.language().is_none()
      && self.part_of_speech().is_none()
      && self.thematic_group().is_none()
  }

  /// Evaluate the filter against a single record.
  pub fn matches(&self, record: &WordRecord) -> bool {
    let f = &record.fields;
    if let Some(needle) = self.word() {
      let needle = needle.to_ascii_lowercase();
      if !f.word.to_ascii_lowercase().contains(&needle) {
        return false;
      }
    }
    self.language().is_none_or(|v| f.language == v)
      && self.part_of_speech().is_none_or(|v| f.part_of_speech == v)
      && self.thematic_group().is_none_or(|v| f.thematic_group == v)
  }
}

// ─── Sort spec ───────────────────────────────────────────────────────────────

/// A field that can act as a sort key, named by its column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortField {
  Word,
  Language,
  PartOfSpeech,
  ThematicGroup,
}

impl SortField {
  pub const ALL: [SortField; 4] = [
    SortField::Word,
    SortField::Language,
    SortField::PartOfSpeech,
    SortField::ThematicGroup,
  ];

  pub fn as_str(self) -> &'static str {
    match self {
      SortField::Word => "word",
      SortField::Language => "language",
      SortField::PartOfSpeech => "partOfSpeech",
      SortField::ThematicGroup => "thematicGroup",
    }
  }

  fn value(self, fields: &WordFields) -> &str {
    match self {
      SortField::Word => &fields.word,
      SortField::Language => &fields.language,
      SortField::PartOfSpeech => &fields.part_of_speech,
      SortField::ThematicGroup => &fields.thematic_group,
    }
  }
}

impl FromStr for SortField {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    SortField::ALL
      .into_iter()
      .find(|f| f.as_str() == s)
      .ok_or_else(|| Error::UnknownSortField(s.to_owned()))
  }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
  #[default]
  Asc,
  Desc,
}

/// One `(field, direction)` entry of a [`SortSpec`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
  pub field:     SortField,
  pub direction: SortDirection,
}

/// Sort keys in priority order. Each field appears at most once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortSpec {
  keys: Vec<SortKey>,
}

impl SortSpec {
  pub fn new() -> Self { Self::default() }

  /// Build a spec from `(column name, direction)` pairs in priority order.
  ///
  /// Fails with [`Error::UnknownSortField`] on the first name that is not a
  /// sortable column.
  pub fn parse<'a>(
    keys: impl IntoIterator<Item = (&'a str, SortDirection)>,
  ) -> Result<Self, Error> {
    let mut spec = Self::new();
    for (name, direction) in keys {
      spec.push(name.parse()?, direction);
    }
    Ok(spec)
  }

  /// Builder form of [`SortSpec::push`].
  pub fn by(mut self, field: SortField, direction: SortDirection) -> Self {
    self.push(field, direction);
    self
  }

  /// Append a key. A field that is already present keeps its priority and
  /// takes the new direction.
  pub fn push(&mut self, field: SortField, direction: SortDirection) {
    match self.keys.iter_mut().find(|k| k.field == field) {
      Some(existing) => existing.direction = direction,
      None => self.keys.push(SortKey { field, direction }),
    }
  }

  pub fn keys(&self) -> &[SortKey] { &self.keys }

  /// `false` for an empty spec, which leaves the working set unsorted.
  pub fn is_active(&self) -> bool { !self.keys.is_empty() }

  /// Compare two records key by key, falling through on ties.
  pub fn compare(&self, a: &WordFields, b: &WordFields) -> Ordering {
    for key in &self.keys {
      let ord = natural_cmp(key.field.value(a), key.field.value(b));
      let ord = match key.direction {
        SortDirection::Asc => ord,
        SortDirection::Desc => ord.reverse(),
      };
      if ord != Ordering::Equal {
        return ord;
      }
    }
    Ordering::Equal
  }
}

/// Stable in-place sort. Records that tie on every key keep their relative
/// order; an inactive spec leaves the slice untouched.
pub fn sort_words(records: &mut [WordRecord], spec: &SortSpec) {
  if !spec.is_active() {
    return;
  }
  records.sort_by(|a, b| spec.compare(&a.fields, &b.fields));
}

// ─── Natural comparison ──────────────────────────────────────────────────────

#[derive(Clone, Copy)]
enum Strength {
  /// Base letters only: case and accents are ignored.
  Primary,
  /// Accents matter, case does not.
  Secondary,
}

/// One collation element. Variant order ranks the classes: spaces and
/// punctuation, then numbers, then letters.
#[derive(PartialEq, Eq, PartialOrd, Ord)]
enum Unit {
  Mark(char),
  /// A digit run without leading zeros, keyed by length first.
  Number(usize, String),
  Letter(char),
}

/// Numeric-aware, case- and accent-tolerant ordering.
///
/// Runs of ASCII digits compare by value, so `"word2" < "word10"`. Text
/// compares by base letter first (`ß`, `æ`, `œ` count as two letters), then
/// by accent, then by case (lowercase first). Punctuation sorts before
/// digits, and digits before letters. Strings that are equal at every
/// strength fall back to code-point order so the result is a total order.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
  units(a, Strength::Primary)
    .cmp(&units(b, Strength::Primary))
    .then_with(|| units(a, Strength::Secondary).cmp(&units(b, Strength::Secondary)))
    .then_with(|| case_key(a).cmp(&case_key(b)))
    .then_with(|| a.cmp(b))
}

fn units(s: &str, strength: Strength) -> Vec<Unit> {
  let mut out = Vec::with_capacity(s.len());
  let mut chars = s.chars().peekable();
  while let Some(&c) = chars.peek() {
    if c.is_ascii_digit() {
      let run = take_digits(&mut chars);
      let digits = run.trim_start_matches('0');
      out.push(Unit::Number(digits.len(), digits.to_owned()));
      continue;
    }
    chars.next();
    if !c.is_alphanumeric() {
      out.push(Unit::Mark(c));
      continue;
    }
    let c = lower(c);
    match strength {
      Strength::Secondary => out.push(Unit::Letter(c)),
      Strength::Primary => match expand(c) {
        Some([x, y]) => out.extend([Unit::Letter(x), Unit::Letter(y)]),
        None => out.push(Unit::Letter(fold_accent(c))),
      },
    }
  }
  out
}

/// `true` for each uppercase letter; lowercase sorts first.
fn case_key(s: &str) -> Vec<bool> {
  s.chars().filter(|c| c.is_alphabetic()).map(char::is_uppercase).collect()
}

fn take_digits(chars: &mut Peekable<Chars<'_>>) -> String {
  let mut run = String::new();
  while let Some(c) = chars.next_if(char::is_ascii_digit) {
    run.push(c);
  }
  run
}

fn lower(c: char) -> char { c.to_lowercase().next().unwrap_or(c) }

/// Lowercase letters that sort as two base letters.
fn expand(c: char) -> Option<[char; 2]> {
  match c {
    'ß' => Some(['s', 's']),
    'æ' => Some(['a', 'e']),
    'œ' => Some(['o', 'e']),
    'þ' => Some(['t', 'h']),
    'ĳ' => Some(['i', 'j']),
    _ => None,
  }
}

/// Map common Latin letters with diacritics onto their base letter.
fn fold_accent(c: char) -> char {
  match c {
    'à'..='å' | 'ā' | 'ă' | 'ą' => 'a',
    'ç' | 'ć' | 'ĉ' | 'ċ' | 'č' => 'c',
    'ď' | 'đ' | 'ð' => 'd',
    'è'..='ë' | 'ē' | 'ĕ' | 'ė' | 'ę' | 'ě' => 'e',
    'ĝ' | 'ğ' | 'ġ' | 'ģ' => 'g',
    'ì'..='ï' | 'ĩ' | 'ī' | 'ĭ' | 'į' | 'ı' => 'i',
    'ł' | 'ľ' | 'ĺ' | 'ļ' => 'l',
    'ñ' | 'ń' | 'ņ' | 'ň' => 'n',
    'ò'..='ö' | 'ø' | 'ō' | 'ŏ' | 'ő' => 'o',
    'ŕ' | 'ř' => 'r',
    'ś' | 'ŝ' | 'ş' | 'š' => 's',
    'ţ' | 'ť' => 't',
    'ù'..='ü' | 'ũ' | 'ū' | 'ŭ' | 'ů' | 'ű' | 'ų' => 'u',
    'ý' | 'ÿ' => 'y',
    'ź' | 'ż' | 'ž' => 'z',
    other => other,
  }
}

#[cfg(test)]
mod tests {
  use chrono::Utc;

  use super::*;

  fn rec(id: i64, word: &str, language: &str) -> WordRecord {
    WordRecord {
      id,
      fields: WordFields {
        word: word.into(),
        language: language.into(),
        ..WordFields::default()
      },
      date_added: Utc::now(),
    }
  }

  fn pairs(records: &[WordRecord]) -> Vec<(&str, &str)> {
    records
      .iter()
      .map(|r| (r.fields.word.as_str(), r.fields.language.as_str()))
      .collect()
  }

  // ── natural_cmp ─────────────────────────────────────────────────────────

  #[test]
  fn digits_compare_by_value() {
    assert_eq!(natural_cmp("word2", "word10"), Ordering::Less);
    assert_eq!(natural_cmp("word10", "word2"), Ordering::Greater);
    assert_eq!(natural_cmp("2", "002"), Ordering::Greater);
  }

  #[test]
  fn case_is_a_tiebreak_only() {
    assert_eq!(natural_cmp("apple", "Banana"), Ordering::Less);
    assert_eq!(natural_cmp("a", "A"), Ordering::Less);
    assert_eq!(natural_cmp("Zebra", "ant"), Ordering::Greater);
  }

  #[test]
  fn accents_sort_next_to_their_base_letter() {
    assert_eq!(natural_cmp("école", "ferme"), Ordering::Less);
    assert_eq!(natural_cmp("ecole", "école"), Ordering::Less);
    assert_eq!(natural_cmp("été", "etude"), Ordering::Less);
  }

  #[test]
  fn sharp_s_and_ligatures_sort_as_two_letters() {
    assert_eq!(natural_cmp("Straße", "Strauch"), Ordering::Less);
    assert_eq!(natural_cmp("Strasse", "Straße"), Ordering::Less);
    assert_eq!(natural_cmp("cœur", "cote"), Ordering::Less);
    assert_eq!(natural_cmp("Ærø", "Bar"), Ordering::Less);

    let mut words = vec!["Strauch", "Straße", "Stroh", "Strasse"];
    words.sort_by(|a, b| natural_cmp(a, b));
    assert_eq!(words, ["Strasse", "Straße", "Strauch", "Stroh"]);
  }

  #[test]
  fn punctuation_sorts_before_digits_before_letters() {
    assert_eq!(natural_cmp("a_", "a1"), Ordering::Less);
    assert_eq!(natural_cmp("a~", "a0"), Ordering::Less);
    assert_eq!(natural_cmp("a9", "aa"), Ordering::Less);
    assert_eq!(natural_cmp("a b", "ab"), Ordering::Less);
  }

  #[test]
  fn identical_strings_are_equal() {
    assert_eq!(natural_cmp("Straße 5", "Straße 5"), Ordering::Equal);
    assert_eq!(natural_cmp("", ""), Ordering::Equal);
    assert_eq!(natural_cmp("", "a"), Ordering::Less);
  }

  // ── sort ────────────────────────────────────────────────────────────────

  #[test]
  fn ties_fall_through_to_the_next_key() {
    let mut words = vec![rec(1, "b", "X"), rec(2, "a", "X"), rec(3, "a", "Y")];
    let spec = SortSpec::new()
      .by(SortField::Word, SortDirection::Asc)
      .by(SortField::Language, SortDirection::Asc);
    sort_words(&mut words, &spec);
    assert_eq!(pairs(&words), vec![("a", "X"), ("a", "Y"), ("b", "X")]);
  }

  #[test]
  fn key_priority_follows_declaration_order() {
    let mut words = vec![rec(1, "b", "X"), rec(2, "a", "Y"), rec(3, "c", "X")];
    let spec = SortSpec::new()
      .by(SortField::Language, SortDirection::Desc)
      .by(SortField::Word, SortDirection::Asc);
    sort_words(&mut words, &spec);
    assert_eq!(pairs(&words), vec![("a", "Y"), ("b", "X"), ("c", "X")]);
  }

  #[test]
  fn full_ties_keep_original_order() {
    let mut words = vec![rec(1, "same", "X"), rec(2, "same", "X"), rec(3, "same", "X")];
    sort_words(&mut words, &SortSpec::new().by(SortField::Word, SortDirection::Desc));
    let ids: Vec<_> = words.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
  }

  #[test]
  fn inactive_spec_is_a_no_op() {
    let mut words = vec![rec(1, "b", ""), rec(2, "a", "")];
    sort_words(&mut words, &SortSpec::new());
    assert_eq!(words[0].id, 1);
  }

  #[test]
  fn pushing_a_field_twice_keeps_its_priority() {
    let spec = SortSpec::new()
      .by(SortField::Word, SortDirection::Asc)
      .by(SortField::Language, SortDirection::Asc)
      .by(SortField::Word, SortDirection::Desc);
    assert_eq!(spec.keys().len(), 2);
    assert_eq!(spec.keys()[0].field, SortField::Word);
    assert_eq!(spec.keys()[0].direction, SortDirection::Desc);
  }

  #[test]
  fn sort_field_parses_column_names() {
    assert_eq!("partOfSpeech".parse::<SortField>().unwrap(), SortField::PartOfSpeech);
    assert!(matches!(
      "etymology".parse::<SortField>(),
      Err(Error::UnknownSortField(_))
    ));
  }

  #[test]
  fn sort_spec_parses_column_names_in_order() {
    let spec = SortSpec::parse([
      ("thematicGroup", SortDirection::Desc),
      ("word", SortDirection::Asc),
    ])
    .unwrap();
    assert_eq!(
      spec,
      SortSpec::new()
        .by(SortField::ThematicGroup, SortDirection::Desc)
        .by(SortField::Word, SortDirection::Asc)
    );

    let err = SortSpec::parse([("word", SortDirection::Asc), ("colour", SortDirection::Asc)])
      .unwrap_err();
    assert!(matches!(err, Error::UnknownSortField(ref f) if f == "colour"));
  }

  // ── filter ──────────────────────────────────────────────────────────────

  #[test]
  fn empty_filter_passes_everything_in_order() {
    let words = vec![rec(1, "b", "X"), rec(2, "a", "Y")];
    let filter = WordFilter::default();
    assert!(words.iter().all(|w| filter.matches(w)));
  }

  #[test]
  fn empty_strings_are_ignored() {
    let filter = WordFilter {
      word: Some(String::new()),
      language: Some(String::new()),
      ..WordFilter::default()
    };
    assert!(filter.is_identity());
    assert!(filter.matches(&rec(1, "x", "")));
  }

  #[test]
  fn criteria_combine_with_and() {
    let mut noun = rec(1, "maison", "French");
    noun.fields.part_of_speech = "noun".into();
    let mut verb = rec(2, "manger", "French");
    verb.fields.part_of_speech = "verb".into();
    let mut german = rec(3, "Haus", "German");
    german.fields.part_of_speech = "noun".into();

    let filter = WordFilter {
      language: Some("French".into()),
      part_of_speech: Some("noun".into()),
      ..WordFilter::default()
    };
    assert!(filter.matches(&noun));
    assert!(!filter.matches(&verb));
    assert!(!filter.matches(&german));
  }

  #[test]
  fn word_criterion_is_a_case_insensitive_substring() {
    let filter = WordFilter { word: Some("AIS".into()), ..WordFilter::default() };
    assert!(filter.matches(&rec(1, "maison", "")));
    assert!(!filter.matches(&rec(2, "mason", "")));
  }

  #[test]
  fn language_criterion_is_exact() {
    let filter = WordFilter { language: Some("French".into()), ..WordFilter::default() };
    assert!(!filter.matches(&rec(1, "x", "french")));
    assert!(!filter.matches(&rec(2, "x", "French Creole")));
  }
}
