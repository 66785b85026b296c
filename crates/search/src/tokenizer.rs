//! Text normalizer for Vietnamese search
//!
//! Pipeline: NFC compose → allow-list letters (symbols become spaces)
//!           → optional lowercase → strip punctuation → split on whitespace
//!           → dedupe preserving order → derive keyword classes
//!
//! Every keyword is matched at four granularities, coarsest first:
//!
//! | Form | Example for "nghiêng" |
//! |------|-----------------------|
//! | pure ligature class | `ng` |
//! | ligature class | `ng` |
//! | pure keyword | `nghieng` |
//! | keyword | `nghiêng` |
//!
//! All functions here are pure and never fail; blank input yields no tokens.

use rustc_hash::FxHashSet;
use unicode_normalization::UnicodeNormalization;

/// Precomposed Vietnamese letters beyond ASCII (lowercase).
///
/// Uppercase forms are accepted through their lowercase mapping.
const VIETNAMESE_LETTERS: &str = "àáảãạăằắẳẵặâầấẩẫậ\
                                  èéẻẽẹêềếểễệ\
                                  ìíỉĩị\
                                  òóỏõọôồốổỗộơờớởỡợ\
                                  ùúủũụưừứửữự\
                                  ỳýỷỹỵ\
                                  đ";

/// Symbols replaced by a space during slugify (so "áo-dài" splits in two).
const SEPARATORS: &[char] = &[
    '/', '\\', '@', '#', '$', '%', '^', '&', '*', '(', ')', '{', '}', '[', ']', '+', '-', '=',
    '_', ',', '.', '!', '`', '<', '>', '?', ';', ':', '"', '\'',
];

/// Punctuation stripped after slugify.
const PUNCTUATION: &[char] = &[
    '`', '!', '@', '#', '$', '%', '^', '&', '*', '(', ')', '_', '+', '-', '=', '[', ']', '{',
    '}', ';', '\'', ':', '"', '\\', '|', ',', '.', '<', '>', '/', '?', '~',
];

/// Leading consonant clusters treated as one sound class.
///
/// Only the first two characters of a keyword are compared against this set,
/// so `ngh` behaves as `ng`.
pub const LIGATURES: [&str; 10] = ["ch", "gh", "gi", "kh", "ng", "ngh", "nh", "ph", "th", "tr"];

/// Check if a character is an allowed letter.
#[inline]
fn is_valid_letter(c: char) -> bool {
    if c.is_ascii_alphanumeric() || VIETNAMESE_LETTERS.contains(c) {
        return true;
    }
    let mut lower = c.to_lowercase();
    match (lower.next(), lower.next()) {
        (Some(l), None) => l != c && VIETNAMESE_LETTERS.contains(l),
        _ => false,
    }
}

/// Keep allowed letters, turn whitespace and separator symbols into spaces,
/// drop everything else.
///
/// # Example
///
/// ```
/// use vnsearch_search::tokenizer::slugify;
///
/// assert_eq!(slugify("Áo-dài ★ đẹp!", true), "áo dài  đẹp ");
/// ```
pub fn slugify(text: &str, fold_case: bool) -> String {
    let slug: String = text
        .nfc()
        .filter_map(|c| {
            if is_valid_letter(c) {
                Some(c)
            } else if c.is_whitespace() || SEPARATORS.contains(&c) {
                Some(' ')
            } else {
                None
            }
        })
        .collect();

    if fold_case {
        slug.to_lowercase()
    } else {
        slug
    }
}

/// Split text into raw tokens (may contain duplicates).
///
/// # Example
///
/// ```
/// use vnsearch_search::tokenizer::tokenize;
///
/// assert_eq!(tokenize("Khách sạn, ABC", true), vec!["khách", "sạn", "abc"]);
/// assert!(tokenize("   ", true).is_empty());
/// ```
pub fn tokenize(text: &str, fold_case: bool) -> Vec<String> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    slugify(text, fold_case)
        .replace(PUNCTUATION, " ")
        .split_whitespace()
        .map(String::from)
        .collect()
}

/// Tokenize, deduplicate preserving first occurrence, and derive keyword
/// classes.
///
/// # Example
///
/// ```
/// use vnsearch_search::tokenizer::extract_keywords;
///
/// let keywords = extract_keywords("Áo dài áo", true);
/// assert_eq!(keywords.len(), 2);
/// assert_eq!(keywords[0].text, "áo");
/// assert_eq!(keywords[0].pure, "ao");
/// ```
pub fn extract_keywords(text: &str, fold_case: bool) -> Vec<Keyword> {
    let mut seen = FxHashSet::default();
    tokenize(text, fold_case)
        .into_iter()
        .filter(|t| seen.insert(t.clone()))
        .map(Keyword::new)
        .collect()
}

/// Strip diacritics: decompose, drop combining marks and general
/// punctuation spacing marks, map `đ`/`Đ` to `d`/`D`.
pub fn remove_accents(text: &str) -> String {
    text.nfd()
        .filter(|c| !matches!(*c, '\u{0300}'..='\u{036f}' | '\u{2000}'..='\u{200f}'))
        .map(|c| match c {
            'đ' => 'd',
            'Đ' => 'D',
            other => other,
        })
        .collect()
}

/// Leading 1 or 2 characters of a keyword.
///
/// Two characters when they form one of [`LIGATURES`], otherwise one.
pub fn ligature_class(keyword: &str) -> &str {
    let word = keyword.trim();
    let mut boundaries = word.char_indices().map(|(i, _)| i).skip(1);
    let first_end = boundaries.next().unwrap_or(word.len());
    let second_end = boundaries.next().unwrap_or(word.len());

    if LIGATURES.contains(&&word[..second_end]) {
        &word[..second_end]
    } else {
        &word[..first_end]
    }
}

/// Ligature class with diacritics removed.
pub fn pure_ligature_class(keyword: &str) -> String {
    remove_accents(ligature_class(keyword))
}

// ============================================================================
// Keyword
// ============================================================================

/// A normalized token and its three derived match forms
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Keyword {
    /// The token as extracted
    pub text: String,
    /// Token without diacritics
    pub pure: String,
    /// Leading consonant class
    pub ligature: String,
    /// Leading consonant class without diacritics
    pub pure_ligature: String,
}

impl Keyword {
    /// Derive all forms from a token
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let ligature = ligature_class(&text).to_string();
        Keyword {
            pure: remove_accents(&text),
            pure_ligature: remove_accents(&ligature),
            ligature,
            text,
        }
    }

    /// Number of characters in the ligature class (1 or 2)
    pub fn ligature_len(&self) -> usize {
        self.ligature.chars().count()
    }
}

impl AsRef<str> for Keyword {
    fn as_ref(&self) -> &str {
        &self.text
    }
}
