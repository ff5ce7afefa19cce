//! Polarity scorers.
//!
//! Each scorer turns free text into a single polarity number. The analyzer
//! treats them as opaque and never looks at how a score was produced; the
//! three built-in scorers read the same lexicon but weigh it differently,
//! so they disagree in useful ways on real descriptions.

use thiserror::Error;

use crate::lexicon::{MAX_VALENCE, intensified, negated, tokenize, valence};

#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("scorer {scorer} failed: {reason}")]
    Failed { scorer: &'static str, reason: String },

    #[error("scorer {scorer} produced a non-finite score ({value})")]
    NonFinite { scorer: &'static str, value: f64 },
}

pub trait PolarityScorer: Send + Sync {
    fn name(&self) -> &'static str;

    /// Polarity of `text`, nominally in [-1.0, 1.0].
    fn score(&self, text: &str) -> Result<f64, ScoringError>;
}

/// Mean polarity of the opinion words found in the text.
///
/// Negation halves and flips a word, an intensifier in front of it scales
/// it by 1.3. Text without opinion words scores 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct MeanPolarityScorer;

const NEGATION_FACTOR: f64 = -0.5;
const INTENSIFIER_FACTOR: f64 = 1.3;

impl PolarityScorer for MeanPolarityScorer {
    fn name(&self) -> &'static str {
        "mean_polarity"
    }

    fn score(&self, text: &str) -> Result<f64, ScoringError> {
        let tokens = tokenize(text);
        let mut total = 0.0;
        let mut hits = 0usize;

        for (i, tok) in tokens.iter().enumerate() {
            let base = valence(tok);
            if base == 0 {
                continue;
            }
            let mut v = f64::from(base) / MAX_VALENCE;
            if intensified(&tokens, i) {
                v *= INTENSIFIER_FACTOR;
            }
            if negated(&tokens, i) {
                v *= NEGATION_FACTOR;
            }
            total += v;
            hits += 1;
        }

        if hits == 0 {
            return Ok(0.0);
        }
        Ok((total / hits as f64).clamp(-1.0, 1.0))
    }
}

/// Summed valence squashed into (-1, 1), with a boost for exclamation marks.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompoundScorer;

const COMPOUND_ALPHA: f64 = 15.0;
const COMPOUND_NEGATION: f64 = -0.74;
const COMPOUND_BOOST: f64 = 0.293;
const EXCLAMATION_BOOST: f64 = 0.292;
const MAX_EXCLAMATIONS: usize = 4;

impl PolarityScorer for CompoundScorer {
    fn name(&self) -> &'static str {
        "compound"
    }

    fn score(&self, text: &str) -> Result<f64, ScoringError> {
        let tokens = tokenize(text);
        let mut sum = 0.0;

        for (i, tok) in tokens.iter().enumerate() {
            let base = valence(tok);
            if base == 0 {
                continue;
            }
            let mut v = f64::from(base);
            if intensified(&tokens, i) {
                v += COMPOUND_BOOST * v.signum();
            }
            if negated(&tokens, i) {
                v *= COMPOUND_NEGATION;
            }
            sum += v;
        }

        if sum == 0.0 {
            return Ok(0.0);
        }

        let bangs = text.matches('!').count().min(MAX_EXCLAMATIONS);
        sum += bangs as f64 * EXCLAMATION_BOOST * sum.signum();

        Ok(sum / (sum * sum + COMPOUND_ALPHA).sqrt())
    }
}

/// Opinion valence averaged over every token, opinionated or not.
/// Long neutral text dilutes toward 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenMeanScorer;

impl PolarityScorer for TokenMeanScorer {
    fn name(&self) -> &'static str {
        "token_mean"
    }

    fn score(&self, text: &str) -> Result<f64, ScoringError> {
        let tokens = tokenize(text);
        if tokens.is_empty() {
            return Ok(0.0);
        }

        let total: f64 = tokens
            .iter()
            .enumerate()
            .map(|(i, tok)| {
                let v = f64::from(valence(tok)) / MAX_VALENCE;
                if negated(&tokens, i) { -v } else { v }
            })
            .sum();

        Ok(total / tokens.len() as f64)
    }
}
