//! Lexical segmentation of input text into word and whitespace tokens.

use crate::dictionary::SubstitutionDictionary;
use crate::text::measure::{FontMetrics, MeasureSurface, TextMeasurer, WidthUnit};
use crate::unicode::{capitalize_first, normalize_key, starts_uppercase};

/// What a token holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenKind {
    Word,
    Whitespace,
}

/// One unit of segmented text.
///
/// Tokens are immutable once segmented; effects change only the display
/// stored beside them in the registry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    text: String,
    kind: TokenKind,
    key: String,
    display_width: u32,
}

impl Token {
    /// Original text exactly as it appeared in the input.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    #[must_use]
    pub fn is_word(&self) -> bool {
        self.kind == TokenKind::Word
    }

    /// Dictionary lookup key (empty for whitespace).
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Reserved width: the widest of the original and its capitalization
    /// matched substitutions. Zero for whitespace.
    #[must_use]
    pub fn display_width(&self) -> u32 {
        self.display_width
    }
}

/// Apply the capitalization of `original` to `candidate`.
///
/// Only the first character is considered. When it is unchanged by
/// uppercasing, which includes punctuation and digits, the candidate gets an
/// uppercase first character. Otherwise the candidate is returned unchanged.
#[must_use]
pub fn match_capitalization(original: &str, candidate: &str) -> String {
    if starts_uppercase(original) {
        capitalize_first(candidate)
    } else {
        candidate.to_string()
    }
}

/// Result of one segmentation pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Segmentation {
    pub tokens: Vec<Token>,
    pub unit: WidthUnit,
}

/// Splits text on whitespace runs and measures the words.
pub struct Segmenter<'a> {
    dictionary: &'a SubstitutionDictionary,
    font: &'a FontMetrics,
}

impl<'a> Segmenter<'a> {
    #[must_use]
    pub fn new(dictionary: &'a SubstitutionDictionary, font: &'a FontMetrics) -> Self {
        Self { dictionary, font }
    }

    /// Segment `text`, measuring every word with `measurer`.
    ///
    /// The measurement surface is opened once for the whole pass and closed
    /// on return.
    pub fn segment(&self, text: &str, measurer: &mut dyn TextMeasurer) -> Segmentation {
        let mut surface = MeasureSurface::open(measurer, self.font);
        let unit = surface.unit();
        let tokens = split_runs(text)
            .map(|(kind, run)| match kind {
                TokenKind::Whitespace => Token {
                    text: run.to_string(),
                    kind,
                    key: String::new(),
                    display_width: 0,
                },
                TokenKind::Word => self.word_token(run, &mut surface),
            })
            .collect();
        Segmentation { tokens, unit }
    }

    fn word_token(&self, word: &str, surface: &mut MeasureSurface<'_>) -> Token {
        let key = normalize_key(word);
        let mut width = surface.width(word);
        if let Some(candidates) = self.dictionary.get(&key) {
            for candidate in candidates {
                width = width.max(surface.width(&match_capitalization(word, candidate)));
            }
        }
        Token {
            text: word.to_string(),
            kind: TokenKind::Word,
            key,
            display_width: width,
        }
    }
}

/// Iterate maximal runs of whitespace and non-whitespace, in order.
fn split_runs(text: &str) -> impl Iterator<Item = (TokenKind, &str)> {
    let mut rest = text;
    std::iter::from_fn(move || {
        let first = rest.chars().next()?;
        let whitespace = first.is_whitespace();
        let end = rest
            .char_indices()
            .find(|&(_, c)| c.is_whitespace() != whitespace)
            .map_or(rest.len(), |(idx, _)| idx);
        let (run, tail) = rest.split_at(end);
        rest = tail;
        let kind = if whitespace {
            TokenKind::Whitespace
        } else {
            TokenKind::Word
        };
        Some((kind, run))
    })
}
