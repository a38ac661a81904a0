//! Filter parser
//!
//! Turns a loose user filter such as `[Young Thug, Rap, 2015]` into the
//! ordered list of search attempts tried against the primary catalog.
//! The caller does not label which term is the artist and which is the
//! style, so both readings are produced. Parsing never fails.

use crate::types::SearchAttempt;
use once_cell::sync::Lazy;
use regex::Regex;

static BRACKET: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[(.*?)\]").expect("valid bracket pattern"));

/// Parsed filter: unlabeled terms plus an optional year
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSpec {
    /// Whether a bracketed list was present at all
    pub bracketed: bool,
    /// Non-year terms in the order given
    pub terms: Vec<String>,
    /// Four-digit year, if one was given (last one wins)
    pub year: Option<String>,
}

impl FilterSpec {
    /// Expand into the ordered attempt list
    ///
    /// The list is never empty: without usable terms a single attempt
    /// constrained only by the year (or nothing) is returned.
    pub fn attempts(&self) -> Vec<SearchAttempt> {
        let year = self.year.clone();
        let attempt = |artist: Option<&String>, style: Option<&String>| SearchAttempt {
            artist: artist.cloned(),
            style: style.cloned(),
            year: year.clone(),
        };

        match self.terms.as_slice() {
            [first, second] => vec![
                attempt(Some(first), Some(second)),
                attempt(Some(second), Some(first)),
            ],
            [only] => vec![attempt(None, Some(only)), attempt(Some(only), None)],
            _ => vec![attempt(None, None)],
        }
    }
}

/// Parse raw filter text
pub fn parse_filter(raw: &str) -> FilterSpec {
    let Some(captures) = BRACKET.captures(raw) else {
        return FilterSpec::default();
    };

    let mut parsed = FilterSpec {
        bracketed: true,
        ..Default::default()
    };

    for token in captures[1].split(',').map(str::trim).filter(|t| !t.is_empty()) {
        if is_year(token) {
            parsed.year = Some(token.to_string());
        } else {
            parsed.terms.push(token.to_string());
        }
    }

    parsed
}

/// Parse raw filter text straight into the attempt list
pub fn parse_attempts(raw: &str) -> Vec<SearchAttempt> {
    parse_filter(raw).attempts()
}

fn is_year(token: &str) -> bool {
    token.len() == 4 && token.bytes().all(|b| b.is_ascii_digit())
}
