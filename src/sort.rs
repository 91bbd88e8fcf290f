//! Natural ordering of file names.
//!
//! A [`NaturalSortKey`] splits a name into alternating text and number
//! tokens so that `doc2` sorts before `doc10`. Digit runs are compared by
//! value without converting them to a fixed-width integer, so arbitrarily
//! long runs still order correctly. Text runs compare by bytes, which keeps
//! the order identical on every host regardless of locale.
//!
//! # Examples
//!
//! ```
//! use winpdfmerge::sort::NaturalSortKey;
//!
//! let mut names = vec!["doc10", "doc2", "doc1"];
//! names.sort_by_key(|name| NaturalSortKey::new(name));
//! assert_eq!(names, vec!["doc1", "doc2", "doc10"]);
//! ```

use std::cmp::Ordering;

/// One segment of a [`NaturalSortKey`].
///
/// When a number and a text token meet at the same position the number
/// orders first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A maximal run of ASCII digits, stored without leading zeros.
    Number(String),
    /// A maximal run of anything else.
    Text(String),
}

impl Ord for Token {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => a.len().cmp(&b.len()).then_with(|| a.cmp(b)),
            (Self::Text(a), Self::Text(b)) => a.as_bytes().cmp(b.as_bytes()),
            (Self::Number(_), Self::Text(_)) => Ordering::Less,
            (Self::Text(_), Self::Number(_)) => Ordering::Greater,
        }
    }
}

impl PartialOrd for Token {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Sort key that orders numeric runs by value.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct NaturalSortKey {
    tokens: Vec<Token>,
}

impl NaturalSortKey {
    /// Build the key for `name`.
    pub fn new(name: &str) -> Self {
        let mut tokens = Vec::new();
        let mut current = String::new();
        let mut in_digits = false;

        for ch in name.chars() {
            let is_digit = ch.is_ascii_digit();
            if !current.is_empty() && is_digit != in_digits {
                tokens.push(Self::finish(std::mem::take(&mut current), in_digits));
            }
            in_digits = is_digit;
            current.push(ch);
        }

        if !current.is_empty() {
            tokens.push(Self::finish(current, in_digits));
        }

        Self { tokens }
    }

    fn finish(run: String, digits: bool) -> Token {
        if !digits {
            return Token::Text(run);
        }

        let trimmed = run.trim_start_matches('0');
        if trimmed.is_empty() {
            Token::Number("0".to_string())
        } else {
            Token::Number(trimmed.to_string())
        }
    }
}
