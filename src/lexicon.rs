//! Collective-action lexicon: plain words matched exactly, trailing-`*`
//! entries matched as prefix stems. Loaded once per run and passed
//! explicitly into scoring (no ambient globals).

use ahash::AHashSet;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

#[derive(Debug, Clone)]
pub struct ActionLexicon {
    exact: AHashSet<String>,
    stems: Vec<String>,
}

/// Match count and relative frequency for one comment's token list.
/// `relative_freq` is NaN when the token list is empty (an empty or
/// discarded comment reaching the scorer), never an error.
#[derive(Clone, Copy, Debug)]
pub struct LexicalScore {
    pub matches: usize,
    pub relative_freq: f64,
}

impl ActionLexicon {
    /// Load a dictionary file: one entry per line, first `;`-separated
    /// field. Any entry not ending in `*` is treated as an exact word.
    pub fn load(path: &Path) -> Result<Self> {
        let f = File::open(path).with_context(|| format!("open dictionary {}", path.display()))?;
        let r = BufReader::new(f);
        let mut entries = Vec::new();
        for line in r.lines() {
            let line = line.with_context(|| format!("read dictionary {}", path.display()))?;
            let entry = line.split(';').next().unwrap_or("").trim();
            if !entry.is_empty() {
                entries.push(entry.to_string());
            }
        }
        Ok(Self::from_entries(entries))
    }

    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut exact = AHashSet::new();
        let mut stems = Vec::new();
        for e in entries {
            let e = e.as_ref().trim().to_lowercase();
            if e.is_empty() {
                continue;
            }
            if let Some(stem) = e.strip_suffix('*') {
                stems.push(stem.to_string());
            } else {
                exact.insert(e);
            }
        }
        Self { exact, stems }
    }

    pub fn len(&self) -> usize {
        self.exact.len() + self.stems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True when the token equals a plain entry or starts with any stem.
    pub fn matches(&self, token: &str) -> bool {
        self.exact.contains(token) || self.stems.iter().any(|s| token.starts_with(s.as_str()))
    }

    /// Count matching tokens (with multiplicity) and their share of the
    /// token list.
    pub fn score<S: AsRef<str>>(&self, tokens: &[S]) -> LexicalScore {
        let matches = tokens.iter().filter(|t| self.matches(t.as_ref())).count();
        let relative_freq = if tokens.is_empty() {
            f64::NAN
        } else {
            matches as f64 / tokens.len() as f64
        };
        LexicalScore { matches, relative_freq }
    }
}
