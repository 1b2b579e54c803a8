//! Word frequencies for the title word cloud.
//!
//! Tokenizes on word characters, drops numbers and common English stopwords,
//! folds case and simple plurals, then keeps the most frequent words with a
//! weight relative to the top word.

use std::collections::HashMap;

/// Common English words that carry no topic information.
const STOPWORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "also", "am", "an", "and", "any",
    "are", "aren't", "as", "at", "be", "because", "been", "before", "being", "below", "between",
    "both", "but", "by", "can", "can't", "cannot", "com", "could", "couldn't", "did", "didn't",
    "do", "does", "doesn't", "doing", "don't", "down", "during", "each", "else", "ever", "few",
    "for", "from", "further", "get", "had", "hadn't", "has", "hasn't", "have", "haven't",
    "having", "he", "he'd", "he'll", "he's", "hence", "her", "here", "here's", "hers", "herself",
    "him", "himself", "his", "how", "how's", "however", "http", "i", "i'd", "i'll", "i'm",
    "i've", "if", "in", "into", "is", "isn't", "it", "it's", "its", "itself", "just", "k",
    "let's", "like", "me", "more", "most", "mustn't", "my", "myself", "no", "nor", "not", "of",
    "off", "on", "once", "only", "or", "other", "otherwise", "ought", "our", "ours",
    "ourselves", "out", "over", "own", "r", "same", "shall", "shan't", "she", "she'd",
    "she'll", "she's", "should", "shouldn't", "since", "so", "some", "such", "than", "that",
    "that's", "the", "their", "theirs", "them", "themselves", "then", "there", "there's",
    "therefore", "these", "they", "they'd", "they'll", "they're", "they've", "this", "those",
    "through", "to", "too", "under", "until", "up", "very", "via", "was", "wasn't", "we",
    "we'd", "we'll", "we're", "we've", "were", "weren't", "what", "what's", "when", "when's",
    "where", "where's", "which", "while", "who", "who's", "whom", "why", "why's", "with",
    "won't", "would", "wouldn't", "www", "you", "you'd", "you'll", "you're", "you've", "your",
    "yours", "yourself", "yourselves",
];

/// One word of the cloud.
#[derive(Debug, Clone, PartialEq)]
pub struct WordWeight {
    /// Most common surface spelling.
    pub word: String,
    pub count: usize,
    /// `count / max count`, in `(0, 1]`.
    pub weight: f32,
}

#[derive(Debug)]
struct WordGroup {
    key: String,
    /// Surface forms with their counts, in first-seen order.
    forms: Vec<(String, usize)>,
    total: usize,
}

impl WordGroup {
    fn add(&mut self, form: &str, n: usize) {
        self.total += n;
        match self.forms.iter_mut().find(|(f, _)| f == form) {
            Some((_, c)) => *c += n,
            None => self.forms.push((form.to_string(), n)),
        }
    }

    fn best_form(&self) -> &str {
        // max_by_key returns the last maximum; scan manually to keep the first.
        let mut best: Option<&(String, usize)> = None;
        for entry in &self.forms {
            let better = match best {
                None => true,
                Some(b) => entry.1 > b.1,
            };
            if better {
                best = Some(entry);
            }
        }
        best.map(|(f, _)| f.as_str()).unwrap_or(&self.key)
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Split into tokens that start with a word character and may contain
/// apostrophes after the first character.
fn tokenize(text: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut start: Option<usize> = None;

    for (i, c) in text.char_indices() {
        match start {
            None if is_word_char(c) => start = Some(i),
            Some(s) if !(is_word_char(c) || c == '\'') => {
                tokens.push(&text[s..i]);
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        tokens.push(&text[s..]);
    }
    tokens
}

fn strip_possessive(word: &str) -> &str {
    let lower_tail = word.len() >= 2 && word.is_char_boundary(word.len() - 2);
    if lower_tail && word[word.len() - 2..].eq_ignore_ascii_case("'s") {
        &word[..word.len() - 2]
    } else {
        word
    }
}

/// Compute the `max_words` most frequent words in `text`.
///
/// Ties keep first-appearance order.  Returns an empty list when nothing
/// survives tokenization.
pub fn word_frequencies(text: &str, max_words: usize) -> Vec<WordWeight> {
    let mut groups: Vec<WordGroup> = Vec::new();
    let mut by_key: HashMap<String, usize> = HashMap::new();

    for token in tokenize(text) {
        let word = strip_possessive(token).trim_end_matches('\'');
        if word.is_empty() || word.chars().all(|c| c.is_ascii_digit()) {
            continue;
        }
        let key = word.to_lowercase();
        if STOPWORDS.contains(&key.as_str()) {
            continue;
        }
        let idx = *by_key.entry(key.clone()).or_insert_with(|| {
            groups.push(WordGroup {
                key,
                forms: Vec::new(),
                total: 0,
            });
            groups.len() - 1
        });
        groups[idx].add(word, 1);
    }

    // Fold "cells" into "cell" when both are present.
    let mut merged = vec![false; groups.len()];
    for i in 0..groups.len() {
        let key = groups[i].key.clone();
        if key.len() < 2 || !key.ends_with('s') || key.ends_with("ss") {
            continue;
        }
        let singular = &key[..key.len() - 1];
        if let Some(&j) = by_key.get(singular) {
            let forms = std::mem::take(&mut groups[i].forms);
            for (form, n) in forms {
                let cut = form.char_indices().last().map_or(0, |(at, _)| at);
                groups[j].add(&form[..cut], n);
            }
            merged[i] = true;
        }
    }

    let mut kept: Vec<&WordGroup> = groups
        .iter()
        .zip(&merged)
        .filter(|(_, m)| !**m)
        .map(|(g, _)| g)
        .collect();
    kept.sort_by(|a, b| b.total.cmp(&a.total));
    kept.truncate(max_words);

    let Some(max_count) = kept.first().map(|g| g.total) else {
        return Vec::new();
    };

    kept.into_iter()
        .map(|g| WordWeight {
            word: g.best_form().to_string(),
            count: g.total,
            weight: g.total as f32 / max_count as f32,
        })
        .collect()
}
