//! Keyword Extractor: turns raw job-posting text into a ranked, de-duplicated keyword set.
//!
//! Two sources are unioned:
//! 1. frequency ranking of tokens longer than three characters (top 40)
//! 2. hits against the curated technical-skill vocabulary
//!
//! Blank text yields an empty set, which puts scoring into general (no-JD) mode.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::ats::vocabulary::{TECH_SKILLS, TOKEN_SEPARATOR};

pub const MAX_KEYWORDS: usize = 50;
pub const MAX_FREQUENCY_KEYWORDS: usize = 40;
/// Tokens of this length or shorter are discarded.
const MAX_DISCARDED_TOKEN_LEN: usize = 3;

/// Ordered, lowercased, de-duplicated keywords. Never longer than [`MAX_KEYWORDS`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeywordSet(Vec<String>);

impl KeywordSet {
    /// Builds a set from arbitrary strings, normalizing and de-duplicating them.
    pub fn from_keywords<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = KeywordSet::default();
        for kw in keywords {
            set.push(kw.as_ref());
        }
        set
    }

    fn push(&mut self, keyword: &str) -> bool {
        let keyword = keyword.trim().to_lowercase();
        if keyword.is_empty() || self.0.len() >= MAX_KEYWORDS || self.0.contains(&keyword) {
            return false;
        }
        self.0.push(keyword);
        true
    }

    /// General mode: no job text, so there is nothing to match against.
    pub fn is_general_mode(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Splits the set into (found, missing) against a lowercased corpus.
    pub fn partition(&self, corpus_lower: &str) -> (Vec<String>, Vec<String>) {
        self.0
            .iter()
            .cloned()
            .partition(|kw| corpus_lower.contains(kw.as_str()))
    }
}

/// Extracts the keyword set from job-posting text.
pub fn extract_keywords(job_text: &str) -> KeywordSet {
    let text = job_text.to_lowercase();
    if text.trim().is_empty() {
        return KeywordSet::default();
    }

    let mut set = KeywordSet::default();
    for token in rank_by_frequency(&text)
        .into_iter()
        .take(MAX_FREQUENCY_KEYWORDS)
    {
        set.push(token);
    }

    for skill in TECH_SKILLS.iter().filter(|s| text.contains(*s)) {
        set.push(skill);
    }

    set
}

/// Tokens ordered by descending frequency; ties keep first-occurrence order.
fn rank_by_frequency(text: &str) -> Vec<&str> {
    // token -> (count, first position)
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();

    for (position, token) in TOKEN_SEPARATOR.split(text).enumerate() {
        if token.len() <= MAX_DISCARDED_TOKEN_LEN {
            continue;
        }
        counts
            .entry(token)
            .and_modify(|(count, _)| *count += 1)
            .or_insert((1, position));
    }

    let mut ranked: Vec<(&str, usize, usize)> = counts
        .into_iter()
        .map(|(token, (count, first))| (token, count, first))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));
    ranked.into_iter().map(|(token, _, _)| token).collect()
}
