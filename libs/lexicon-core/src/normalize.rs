//! Word normalization for vocabulary lookups.

use unicode_normalization::char::is_combining_mark;

/// Punctuation and quotation marks removed from lookup keys.
const STRIPPED: &[char] = &[
    '.', ',', ':', ';', '!', '?', '…', '/', '"', '\'', '“', '”', '„', '‘', '’', '«', '»', '‹',
    '›', '[', ']', '(', ')', '{', '}', '<', '>',
];

/// Reduce a word candidate to its lookup key.
///
/// No case folding is done: keys are matched exactly.
pub fn normalize(candidate: &str) -> String {
    let stripped: String = candidate
        .chars()
        .filter(|c| !STRIPPED.contains(c))
        .collect();
    stripped.trim().to_string()
}

/// Stricter key used when resolving a selection for save and promote.
///
/// Keeps letters, combining marks and whitespace; drops digits and symbols.
pub fn strict_key(word: &str) -> String {
    word.chars()
        .filter(|&c| c.is_alphabetic() || is_combining_mark(c) || c.is_whitespace())
        .collect()
}
