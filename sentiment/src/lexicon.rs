use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Valence per word, from -4 (very negative) to 4 (very positive).
static LEXICON: Lazy<HashMap<String, i32>> = Lazy::new(|| {
    let raw = include_str!("../sentiment_lexicon.json");
    serde_json::from_str::<HashMap<String, i32>>(raw).expect("valid sentiment lexicon")
});

pub(crate) const MAX_VALENCE: f64 = 4.0;

/// Lexicon valence of a lower-cased token, 0 when unknown.
#[inline]
pub(crate) fn valence(token: &str) -> i32 {
    *LEXICON.get(token).unwrap_or(&0)
}

/// Lower-cased alphanumeric tokens; apostrophes stay inside words so
/// "isn't" is one token.
pub(crate) fn tokenize(s: &str) -> Vec<String> {
    s.split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .map(|t| t.trim_matches('\''))
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
        .collect()
}

pub(crate) fn is_negator(tok: &str) -> bool {
    matches!(
        tok,
        "not"
            | "no"
            | "never"
            | "isn't"
            | "wasn't"
            | "aren't"
            | "won't"
            | "don't"
            | "doesn't"
            | "can't"
            | "cannot"
            | "without"
    )
}

pub(crate) fn is_intensifier(tok: &str) -> bool {
    matches!(
        tok,
        "very" | "extremely" | "highly" | "really" | "incredibly" | "truly" | "super"
    )
}

/// True when one of the three tokens before `i` negates it.
pub(crate) fn negated(tokens: &[String], i: usize) -> bool {
    (1..=3).any(|k| i >= k && is_negator(tokens[i - k].as_str()))
}

/// True when the token right before `i` is an intensifier.
pub(crate) fn intensified(tokens: &[String], i: usize) -> bool {
    i >= 1 && is_intensifier(tokens[i - 1].as_str())
}
