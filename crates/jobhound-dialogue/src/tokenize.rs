//! Word tokenizer used for vocabulary phrase matching.
//!
//! A token is a maximal run of Unicode alphanumeric characters. Everything
//! else (spaces, punctuation, hyphens, brackets) separates tokens, so
//! "Санкт-Петербург" and "санкт петербург" tokenize identically.

use std::ops::Range;

use jobhound_core::normalize_label;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Token {
    /// Case-normalized text.
    pub norm: String,
    /// Byte range in the source text.
    pub span: Range<usize>,
}

pub(crate) fn tokenize(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut start: Option<usize> = None;

    for (idx, ch) in text.char_indices() {
        if ch.is_alphanumeric() {
            start.get_or_insert(idx);
        } else if let Some(begin) = start.take() {
            tokens.push(token(text, begin..idx));
        }
    }
    if let Some(begin) = start {
        tokens.push(token(text, begin..text.len()));
    }

    tokens
}

fn token(text: &str, span: Range<usize>) -> Token {
    Token {
        norm: normalize_label(&text[span.clone()]),
        span,
    }
}

/// Normalized tokens of a vocabulary phrase.
pub(crate) fn phrase_tokens(phrase: &str) -> Vec<String> {
    tokenize(phrase).into_iter().map(|t| t.norm).collect()
}

/// Index of the first token where `phrase` occurs as a contiguous run.
pub(crate) fn find_phrase(tokens: &[Token], phrase: &[String]) -> Option<usize> {
    if phrase.is_empty() || phrase.len() > tokens.len() {
        return None;
    }
    tokens
        .windows(phrase.len())
        .position(|window| window.iter().zip(phrase).all(|(t, p)| t.norm == *p))
}
