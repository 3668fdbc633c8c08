//! Text normalization for Turkish dictionary entries / Metin normalleştirme
//!
//! Provides / Sağlar:
//! - ASCII folding for accent-insensitive lemma search / ASCII dönüşümü
//! - Definition tokenization with a fixed stop word set / Tanım parçalama
//! - Token-set Jaccard similarity / Jaccard benzerliği
//! - Whole-word matching for untrusted lemma text / Tam kelime eşleşmesi

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use std::collections::HashSet;

/// Minimum token length kept by the tokenizer / En kısa token uzunluğu
pub const MIN_TOKEN_LEN: usize = 3;

/// Turkish function words excluded from overlap scoring / Etkisiz kelimeler
pub static STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "bir", "iki", "üç", "olan", "ile", "veya", "ve", "için",
        "gibi", "kadar", "olarak", "daha", "çok", "her", "bu", "şu",
        "ait", "göre", "türlü", "kendi", "şey",
    ]
    .into_iter()
    .collect()
});

/// Lower-case text, folding dotted capital İ to a plain i / Küçük harfe çevir
///
/// `char::to_lowercase` turns İ into "i" followed by a combining dot, which the
/// tokenizer would then treat as a separator.
pub fn lowercase(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if c == 'İ' {
            out.push('i');
        } else {
            out.extend(c.to_lowercase());
        }
    }
    out
}

/// Map Turkish letters to ASCII and lower-case / Türkçe harfleri ASCII'ye çevir
pub fn ascii_fold(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            'ğ' => 'g', 'Ğ' => 'G',
            'ü' => 'u', 'Ü' => 'U',
            'ş' => 's', 'Ş' => 'S',
            'ı' => 'i', 'İ' => 'I',
            'ö' => 'o', 'Ö' => 'O',
            'ç' => 'c', 'Ç' => 'C',
            _ => c,
        })
        .collect::<String>()
        .to_lowercase()
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Remove punctuation, keeping letters, digits, `_` and whitespace / Noktalamayı sil
pub fn strip_punctuation(text: &str) -> String {
    text.chars()
        .filter(|c| is_word_char(*c) || c.is_whitespace())
        .collect()
}

/// Tokenize a definition for overlap scoring / Tanımı parçala
///
/// Punctuation becomes a separator; tokens shorter than [`MIN_TOKEN_LEN`]
/// characters or present in `stop_words` are dropped.
pub fn definition_tokens(definition: &str, stop_words: &HashSet<&str>) -> HashSet<String> {
    let spaced: String = lowercase(definition)
        .chars()
        .map(|c| if is_word_char(c) { c } else { ' ' })
        .collect();

    spaced
        .split_whitespace()
        .filter(|t| t.chars().count() >= MIN_TOKEN_LEN && !stop_words.contains(t))
        .map(str::to_string)
        .collect()
}

/// If the text is a single token once punctuation is removed, return it
/// / Metin tek kelimeyse onu döndür
pub fn single_token(text: &str) -> Option<String> {
    let stripped = strip_punctuation(&lowercase(text));
    let mut parts = stripped.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some(token), None) => Some(token.to_string()),
        _ => None,
    }
}

/// |a ∩ b| / |a ∪ b|, zero for two empty sets / Jaccard benzerliği
pub fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    let intersection = a.intersection(b).count();
    intersection as f64 / union as f64
}

/// Case-insensitive whole-word matcher built from untrusted text / Tam kelime eşleyici
///
/// The word is matched literally; a hit counts only when the characters on
/// both sides of it are not letters, digits or `_`.
pub struct WholeWordMatcher {
    re: Regex,
}

impl WholeWordMatcher {
    /// Returns `None` for blank input, which would otherwise match everywhere
    pub fn new(word: &str) -> Option<Self> {
        let word = word.trim();
        if word.is_empty() {
            return None;
        }
        RegexBuilder::new(&regex::escape(word))
            .case_insensitive(true)
            .build()
            .ok()
            .map(|re| Self { re })
    }

    /// Overlapping candidates are all tried: a hit rejected by its neighbours
    /// restarts the search one character after its start.
    pub fn is_match(&self, haystack: &str) -> bool {
        let mut start = 0;
        while let Some(m) = self.re.find_at(haystack, start) {
            let before = haystack[..m.start()].chars().next_back();
            let after = haystack[m.end()..].chars().next();
            if !before.map_or(false, is_word_char) && !after.map_or(false, is_word_char) {
                return true;
            }
            start = match haystack[m.start()..].chars().next() {
                Some(c) => m.start() + c.len_utf8(),
                None => return false,
            };
        }
        false
    }
}

/// One-off whole-word check / Tek seferlik tam kelime kontrolü
pub fn contains_whole_word(haystack: &str, word: &str) -> bool {
    WholeWordMatcher::new(word)
        .map(|m| m.is_match(haystack))
        .unwrap_or(false)
}
