//! Calculate the set of unique abbreviations for a list of words.
//!
//! An abbreviation is a prefix of a word that no other word in the list
//! shares. Every word is also an abbreviation of itself.
//!
//! # Example
//! ```
//! use abbrev::Abbrev;
//! use maplit::hashmap;
//!
//! let table = ["ruby", "rules"].abbrev(None);
//! assert_eq!(
//!     table,
//!     hashmap! {
//!         "rub".to_string() => "ruby".to_string(),
//!         "ruby".to_string() => "ruby".to_string(),
//!         "rul".to_string() => "rules".to_string(),
//!         "rule".to_string() => "rules".to_string(),
//!         "rules".to_string() => "rules".to_string(),
//!     }
//! );
//! ```
#![forbid(unsafe_code)]

use regex::Regex;
use std::collections::HashMap;

/// Restricts the abbreviations that are calculated
#[derive(Debug, Clone)]
pub enum Filter {
    /// Only abbreviations that start with this string
    Prefix(String),
    /// Only abbreviations containing a match for this pattern
    Pattern(Regex),
}

impl Filter {
    pub fn prefix<S: Into<String>>(prefix: S) -> Self {
        Filter::Prefix(prefix.into())
    }

    /// Create a filter from a regular expression.
    /// The pattern is not anchored, use `^` to match from the start.
    pub fn pattern(pattern: &str) -> Result<Self, regex::Error> {
        Regex::new(pattern).map(Filter::Pattern)
    }

    pub fn matches(&self, text: &str) -> bool {
        match self {
            Filter::Prefix(prefix) => text.starts_with(prefix.as_str()),
            Filter::Pattern(re) => re.is_match(text),
        }
    }
}

/// Calculate the unique abbreviations of the given words.
///
/// The returned map goes from abbreviation to word. When a filter is
/// given, only abbreviations and words that it matches are included.
pub fn abbrev<S: AsRef<str>>(words: &[S], filter: Option<&Filter>) -> HashMap<String, String> {
    let accept = |text: &str| filter.map_or(true, |f| f.matches(text));
    let mut table = HashMap::new();
    let mut seen: HashMap<&str, usize> = HashMap::new();

    for word in words.iter().map(AsRef::as_ref) {
        for abbreviation in prefixes(word).filter(|&a| accept(a)) {
            let count = seen.entry(abbreviation).or_insert(0);
            *count += 1;
            match *count {
                1 => {
                    table.insert(abbreviation.to_owned(), word.to_owned());
                }
                2 => {
                    table.remove(abbreviation);
                }
                _ => (),
            }
        }
    }

    for word in words.iter().map(AsRef::as_ref).filter(|&w| accept(w)) {
        table.insert(word.to_owned(), word.to_owned());
    }
    table
}

// Non-empty prefixes of a word, longest first
fn prefixes(word: &str) -> impl Iterator<Item = &str> {
    word.char_indices()
        .rev()
        .map(move |(i, c)| &word[..i + c.len_utf8()])
}

/// Abbreviations of a list of words, e.g `["ruby", "rules"].abbrev(None)`
pub trait Abbrev {
    fn abbrev(&self, filter: Option<&Filter>) -> HashMap<String, String>;
}

impl<S: AsRef<str>> Abbrev for [S] {
    fn abbrev(&self, filter: Option<&Filter>) -> HashMap<String, String> {
        abbrev(self, filter)
    }
}
