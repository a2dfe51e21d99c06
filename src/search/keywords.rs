//! Keyword extraction from free-text queries.

use lazy_static::lazy_static;
use std::collections::HashSet;

/// Common English function words that carry no search signal.
const STOP_WORD_LIST: &[&str] = &[
    "a", "an", "the", "and", "or", "but", "is", "are", "was", "were", "be", "been", "being", "in",
    "on", "at", "to", "for", "with", "about", "against", "between", "into", "through", "during",
    "before", "after", "above", "below", "from", "up", "down", "of", "off", "over", "under",
    "again", "further", "then", "once", "here", "there", "when", "where", "why", "how", "all",
    "any", "both", "each", "few", "more", "most", "other", "some", "such", "no", "nor", "not",
    "only", "own", "same", "so", "than", "too", "very", "can", "will", "just", "should", "now",
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "your", "yours",
    "yourself", "yourselves", "he", "him", "his", "himself", "she", "her", "hers", "herself",
    "it", "its", "itself", "they", "them", "their", "theirs", "themselves", "what", "which",
    "who", "whom", "this", "that", "these", "those", "am", "have", "has", "had", "having", "do",
    "does", "did", "doing", "would", "could", "ought", "get", "gets", "got", "use", "used",
    "using",
];

/// Communication and API vocabulary. Always kept, even when also a stop word.
const DOMAIN_WORD_LIST: &[&str] = &[
    "sms", "message", "call", "voice", "phone", "text", "media", "mms", "video", "email", "send",
    "receive", "create", "delete", "update", "get", "post", "put", "api", "verify",
    "authentication", "image", "upload", "download", "user", "account",
];

lazy_static! {
    static ref STOP_WORDS: HashSet<&'static str> = STOP_WORD_LIST.iter().copied().collect();
    static ref DOMAIN_WORDS: HashSet<&'static str> = DOMAIN_WORD_LIST.iter().copied().collect();
}

/// A query prepared for scoring: its significant keywords plus the
/// lower-cased full text used for the exact-phrase bonus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedQuery {
    pub keywords: HashSet<String>,
    pub normalized: String,
}

impl ParsedQuery {
    pub fn parse(raw: &str) -> Self {
        Self {
            keywords: extract_keywords(raw),
            normalized: raw.to_lowercase(),
        }
    }

    /// Blank queries match nothing.
    pub fn is_blank(&self) -> bool {
        self.normalized.trim().is_empty()
    }
}

/// Turn a raw query into its set of significant lower-cased terms.
///
/// Punctuation becomes a word separator, single-character tokens are
/// dropped, and stop words are dropped unless they are domain vocabulary.
pub fn extract_keywords(query: &str) -> HashSet<String> {
    let cleaned: String = query
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect();

    cleaned
        .split_whitespace()
        .filter(|word| word.chars().count() > 1)
        .filter(|word| !is_stop_word(word) || is_domain_word(word))
        .map(str::to_string)
        .collect()
}

fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(word)
}

fn is_domain_word(word: &str) -> bool {
    DOMAIN_WORDS.contains(word)
}
