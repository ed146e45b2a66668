//! Text cleaning for transcripts and comments, and the tokenizer used by
//! the lexical scorer. All functions are pure and map malformed input to
//! the empty-string sentinel (meaning "discard") instead of erroring.

use ahash::AHashSet;
use regex::Regex;
use std::sync::OnceLock;

/// Cleaning profile for transcripts. `TopicModel` additionally strips
/// stopwords and numeric tokens and demands a richer vocabulary.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CleanMode {
    Transcript,
    TopicModel,
}

static BRACKETED_RE: OnceLock<Regex> = OnceLock::new();
static PUNCT_RE: OnceLock<Regex> = OnceLock::new();
static URL_RE: OnceLock<Regex> = OnceLock::new();
static MENTION_RE: OnceLock<Regex> = OnceLock::new();

fn bracketed() -> &'static Regex {
    // caption annotations such as [Music] or [Applause]
    BRACKETED_RE.get_or_init(|| Regex::new(r"\[.*?\]").unwrap())
}

fn punct() -> &'static Regex {
    PUNCT_RE.get_or_init(|| Regex::new(r"[^\w\s]").unwrap())
}

fn url() -> &'static Regex {
    URL_RE.get_or_init(|| Regex::new(r"http\S+").unwrap())
}

fn mention() -> &'static Regex {
    MENTION_RE.get_or_init(|| Regex::new(r"@\S+").unwrap())
}

/// Clean a raw video transcript into a lowercase, punctuation-free string.
///
/// Returns `""` when the result carries no signal: no alphabetic
/// characters, fewer than 3 tokens, or too few distinct tokens for the
/// chosen mode (10 for `TopicModel`, 5 for `Transcript`).
pub fn clean_transcript(raw: &str, stopwords: &AHashSet<String>, mode: CleanMode) -> String {
    let no_periods = raw.replace('.', " ");
    let no_tags = bracketed().replace_all(&no_periods, "");
    let lower = no_tags.to_lowercase();
    let spaced = punct().replace_all(&lower, " ");

    let mut words: Vec<&str> = spaced.split_whitespace().collect();
    if mode == CleanMode::TopicModel {
        words.retain(|w| !stopwords.contains(*w));
        words.retain(|w| !w.chars().all(|c| c.is_numeric()));
    }
    let out = words.join(" ");

    if !out.chars().any(|c| c.is_alphabetic()) {
        return String::new();
    }
    if words.len() < 3 {
        return String::new();
    }
    let distinct: AHashSet<&str> = words.iter().copied().collect();
    let min_distinct = match mode {
        CleanMode::TopicModel => 10,
        CleanMode::Transcript => 5,
    };
    if distinct.len() < min_distinct {
        return String::new();
    }
    out
}

/// Clean a raw comment body: strip URLs and @-mentions, keep everything
/// else verbatim (case and punctuation matter for dedup). Returns `""`
/// when fewer than 5 distinct whitespace tokens remain.
pub fn clean_comment(raw: &str) -> String {
    let no_urls = url().replace_all(raw, "");
    let cleaned = mention().replace_all(&no_urls, "");
    let distinct: AHashSet<&str> = cleaned.split_whitespace().collect();
    if distinct.len() < 5 {
        return String::new();
    }
    cleaned.into_owned()
}

/// Tokenize a cleaned comment for dictionary matching: remove punctuation
/// (joined, not spaced, so "don't" becomes "dont"), split on whitespace,
/// lowercase.
pub fn scoring_tokens(text: &str) -> Vec<String> {
    let stripped = punct().replace_all(text, "");
    stripped.split_whitespace().map(|w| w.to_lowercase()).collect()
}
