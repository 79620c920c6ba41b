//! Markup vocabulary: which characters and literals the tokenizer recognizes
//! and which HTML fragments the rewriter substitutes for them.

use std::collections::{BTreeMap, HashSet};
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when loading or validating a vocabulary.
#[derive(Debug, Error)]
pub enum VocabularyError {
    /// JSON deserialization failed.
    #[error("invalid vocabulary JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// A field value breaks a vocabulary rule.
    #[error("invalid {field}: {reason}")]
    InvalidField {
        /// The name of the field that failed validation.
        field: String,
        /// A human-readable explanation of why the value is invalid.
        reason: String,
    },
}

/// Opening and closing fragment substituted for a matched flag pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TagPair {
    /// Fragment replacing the opening flag (e.g. `<em>`).
    pub open: String,
    /// Fragment replacing the closing flag (e.g. `</em>`).
    pub close: String,
}

impl TagPair {
    /// Shorthand constructor.
    pub fn new(open: impl Into<String>, close: impl Into<String>) -> Self {
        Self {
            open: open.into(),
            close: close.into(),
        }
    }
}

/// Fragments wrapped around an autolinked URL.
///
/// The rendered anchor is `open + url + href_close + url + close`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LinkMarkup {
    /// Emitted before the URL tokens (e.g. `<a href="`).
    pub open: String,
    /// Emitted after the URL tokens, ending the href attribute and opening
    /// the anchor body (e.g. `" target="_blank">`).
    pub href_close: String,
    /// Emitted after the repeated URL text (e.g. `</a>`).
    pub close: String,
}

/// The closed set of markup the tokenizer recognizes.
///
/// Flag literals are either one flag character or two copies of the same
/// flag character; every doubled literal needs its single form present too.
/// Derived lookups are cached on first access; edit flags and prefixes through
/// [`MarkupVocabulary::flags_mut`] and [`MarkupVocabulary::link_prefixes_mut`]
/// so the caches are dropped with the change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkupVocabulary {
    /// Flag literal → substituted fragments (`"*"`, `"**"`, ...).
    flags: BTreeMap<String, TagPair>,
    /// Literals that start an autolink (`"http://"`, ...).
    link_prefixes: Vec<String>,
    /// Anchor fragments for autolinks.
    pub link: LinkMarkup,
    /// Character surrounding emoji shortcodes.
    pub emoji_delimiter: char,
    /// Placeholder emitted for each resolved custom emoji.
    pub sentinel: char,
    /// Set of single flag characters (lazily derived from `flags`).
    #[serde(skip)]
    flag_chars_cache: OnceLock<HashSet<char>>,
    /// Link prefixes ordered longest first (lazily derived).
    #[serde(skip)]
    prefixes_cache: OnceLock<Vec<String>>,
}

/// Replacement emitted when the input itself contains the sentinel.
pub const SENTINEL_REPLACEMENT: char = '\u{FFFD}';

/// Default sentinel: U+FFFC OBJECT REPLACEMENT CHARACTER.
pub const DEFAULT_SENTINEL: char = '\u{FFFC}';

impl Default for MarkupVocabulary {
    fn default() -> Self {
        let flags = [
            ("*", TagPair::new("<em>", "</em>")),
            ("_", TagPair::new("<em>", "</em>")),
            ("`", TagPair::new("<code>", "</code>")),
            ("**", TagPair::new("<strong>", "</strong>")),
            ("__", TagPair::new("<strong>", "</strong>")),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();
        Self::new(
            flags,
            vec!["http://".into(), "https://".into(), "www.".into()],
            LinkMarkup {
                open: "<a href=\"".into(),
                href_close: "\" target=\"_blank\">".into(),
                close: "</a>".into(),
            },
            ':',
            DEFAULT_SENTINEL,
        )
    }
}

impl MarkupVocabulary {
    /// Create a vocabulary from its parts. Caches are initialized lazily.
    ///
    /// No validation is performed; see [`MarkupVocabulary::validate`].
    pub fn new(
        flags: BTreeMap<String, TagPair>,
        link_prefixes: Vec<String>,
        link: LinkMarkup,
        emoji_delimiter: char,
        sentinel: char,
    ) -> Self {
        Self {
            flags,
            link_prefixes,
            link,
            emoji_delimiter,
            sentinel,
            flag_chars_cache: OnceLock::new(),
            prefixes_cache: OnceLock::new(),
        }
    }

    /// Process-wide default vocabulary.
    pub fn standard() -> &'static MarkupVocabulary {
        static STANDARD: OnceLock<MarkupVocabulary> = OnceLock::new();
        STANDARD.get_or_init(MarkupVocabulary::default)
    }

    /// Flag literal → fragments.
    pub fn flags(&self) -> &BTreeMap<String, TagPair> {
        &self.flags
    }

    /// Mutable access to the flags. Derived lookups are rebuilt on next use.
    pub fn flags_mut(&mut self) -> &mut BTreeMap<String, TagPair> {
        self.flag_chars_cache = OnceLock::new();
        &mut self.flags
    }

    /// Link prefixes in configured order.
    pub fn link_prefixes(&self) -> &[String] {
        &self.link_prefixes
    }

    /// Mutable access to the link prefixes. The longest-first ordering is
    /// rebuilt on next use.
    pub fn link_prefixes_mut(&mut self) -> &mut Vec<String> {
        self.prefixes_cache = OnceLock::new();
        &mut self.link_prefixes
    }

    /// Characters that form single-character flag literals.
    pub fn flag_chars(&self) -> &HashSet<char> {
        self.flag_chars_cache.get_or_init(|| {
            self.flags
                .keys()
                .filter_map(|k| {
                    let mut chars = k.chars();
                    match (chars.next(), chars.next()) {
                        (Some(c), None) => Some(c),
                        _ => None,
                    }
                })
                .collect()
        })
    }

    /// Whether `c` is a flag character.
    pub fn is_flag_char(&self, c: char) -> bool {
        self.flag_chars().contains(&c)
    }

    /// Fragments for a flag literal, if it is one.
    pub fn flag_markup(&self, literal: &str) -> Option<&TagPair> {
        self.flags.get(literal)
    }

    /// Link prefixes ordered longest first, so the longest match wins.
    pub fn prefixes_longest_first(&self) -> &[String] {
        self.prefixes_cache.get_or_init(|| {
            let mut prefixes = self.link_prefixes.clone();
            prefixes.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
            prefixes
        })
    }

    /// Check the vocabulary rules.
    ///
    /// - at least one flag, each one flag char or two copies of one whose
    ///   single form is also present
    /// - link prefixes non-empty, unique, and not starting with a flag char
    /// - delimiter and sentinel are neither flag chars nor whitespace, and
    ///   differ from each other and from U+FFFD
    pub fn validate(&self) -> Result<(), VocabularyError> {
        if self.flags.is_empty() {
            return Err(invalid("flags", "must define at least one flag"));
        }
        for literal in self.flags.keys() {
            let chars: Vec<char> = literal.chars().collect();
            match chars.as_slice() {
                [_] => {}
                [a, b] if a == b => {
                    if !self.flags.contains_key(&a.to_string()) {
                        return Err(invalid(
                            "flags",
                            format!("doubled flag {literal:?} has no single form {a:?}"),
                        ));
                    }
                }
                _ => {
                    return Err(invalid(
                        "flags",
                        format!("{literal:?} is neither one character nor a doubled character"),
                    ));
                }
            }
        }

        let mut seen = HashSet::new();
        for prefix in &self.link_prefixes {
            let Some(first) = prefix.chars().next() else {
                return Err(invalid("link_prefixes", "must not contain an empty prefix"));
            };
            if !seen.insert(prefix.as_str()) {
                return Err(invalid("link_prefixes", format!("duplicate prefix {prefix:?}")));
            }
            if self.is_flag_char(first) {
                return Err(invalid(
                    "link_prefixes",
                    format!("{prefix:?} starts with flag character {first:?}"),
                ));
            }
        }

        for (field, c) in [
            ("emoji_delimiter", self.emoji_delimiter),
            ("sentinel", self.sentinel),
        ] {
            if self.is_flag_char(c) {
                return Err(invalid(field, format!("{c:?} is also a flag character")));
            }
            if c.is_whitespace() {
                return Err(invalid(field, "must not be whitespace"));
            }
        }
        if self.emoji_delimiter == self.sentinel {
            return Err(invalid("sentinel", "must differ from emoji_delimiter"));
        }
        if self.sentinel == SENTINEL_REPLACEMENT {
            return Err(invalid("sentinel", "must not be U+FFFD"));
        }
        Ok(())
    }
}

fn invalid(field: &str, reason: impl Into<String>) -> VocabularyError {
    VocabularyError::InvalidField {
        field: field.into(),
        reason: reason.into(),
    }
}

/// Load and validate a [`MarkupVocabulary`] from a JSON string.
///
/// Every field is required; see [`MarkupVocabulary::validate`] for the
/// structural rules checked afterward.
pub fn load_vocabulary_from_str(s: &str) -> Result<MarkupVocabulary, VocabularyError> {
    let vocab: MarkupVocabulary = serde_json::from_str(s)?;
    vocab.validate()?;
    Ok(vocab)
}
