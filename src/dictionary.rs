//! Substitution dictionary for the word-swap effect.
//!
//! Maps a normalized word (see [`normalize_key`]) to the words a reader
//! might mistake it for. The built-in table targets Italian text; custom
//! tables can be parsed from a simple line format:
//!
//! ```text
//! # comment
//! lettura: lettera, letture, lettore
//! meglio: melo, migliorare
//! ```

use crate::error::{Error, Result};
use crate::unicode::normalize_key;
use std::collections::HashMap;
use std::path::Path;

const BUILTIN: &[(&str, &[&str])] = &[
    ("lettura", &["lettera", "letture", "lettore"]),
    ("competenze", &["competenza", "componenti", "competere"]),
    ("apprendimento", &["apprendere", "apprendista", "apprendendo"]),
    ("comunicazione", &["comunicare", "comunicato", "comunicando", "patenti"]),
    ("persone", &["persona", "personale", "personaggio"]),
    ("dislessia", &["dislessico", "dislessica", "dislessici"]),
    ("processo", &["processore", "processare", "processato"]),
    ("presentare", &["presente", "presentato", "presentando"]),
    ("sfide", &["sfida", "sfidare", "sfidante"]),
    ("significative", &["significato", "significare", "significando"]),
    ("disturbo", &["disturbare", "disturbato", "disturbando"]),
    ("specifico", &["specifica", "specificare", "specificando"]),
    ("influisce", &["influenza", "influenzare", "influenzando"]),
    ("capacità", &["capace", "capaci", "capacitare"]),
    ("leggere", &["legge", "leggendo", "lettore"]),
    ("precisione", &["preciso", "precisare", "precisando"]),
    ("fluidità", &["fluido", "fluire", "fluendo"]),
    ("difficoltà", &["difficile", "difficili", "difficoltoso"]),
    ("riconoscere", &["riconosciuto", "riconoscimento", "riconoscendo"]),
    ("parole", &["parola", "parlare", "parlando"]),
    ("comprensione", &["comprendere", "compreso", "comprendendo"]),
    ("velocità", &["veloce", "velocemente", "velocizzare"]),
    ("simulatore", &["simulare", "simulato", "simulando"]),
    ("comprendere", &["comprensione", "compreso", "comprendendo"]),
    ("meglio", &["melo", "migliorare"]),
    ("attraverso", &["attraversare", "attraversato", "attraversando"]),
    ("esperienza", &["esperto", "esperire", "esperendo"]),
    ("interattiva", &["interazione", "interagire", "interagendo"]),
    ("riproduce", &["riprodurre", "riprodotto", "riproducendo"]),
    ("effetti", &["effetto", "affetti"]),
    ("sperimentare", &["sperimento", "sperimentato", "sperimentando"]),
    ("durante", &["durare", "durata", "durando"]),
    ("tuttavia", &["tutti", "tutto"]),
];

/// Normalized word → ordered replacement candidates.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SubstitutionDictionary {
    entries: HashMap<String, Vec<String>>,
}

impl SubstitutionDictionary {
    /// Empty dictionary (word swap never fires).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in Italian table.
    #[must_use]
    pub fn builtin() -> Self {
        let mut dictionary = Self::new();
        for (key, candidates) in BUILTIN {
            dictionary.insert(key, candidates.iter().copied());
        }
        dictionary
    }

    /// Parse the `key: a, b, c` line format.
    pub fn parse(source: &str) -> Result<Self> {
        let mut dictionary = Self::new();
        for (idx, raw) in source.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw.split('#').next().unwrap_or_default().trim();
            if line.is_empty() {
                continue;
            }
            let Some((key, rest)) = line.split_once(':') else {
                return Err(Error::Dictionary {
                    line: line_no,
                    reason: "expected 'word: candidate, ...'".to_string(),
                });
            };
            let key = key.trim();
            if normalize_key(key).is_empty() {
                return Err(Error::Dictionary {
                    line: line_no,
                    reason: "empty word before ':'".to_string(),
                });
            }
            let candidates: Vec<&str> = rest
                .split(',')
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .collect();
            if candidates.is_empty() {
                return Err(Error::Dictionary {
                    line: line_no,
                    reason: format!("no candidates for {key:?}"),
                });
            }
            dictionary.insert(key, candidates);
        }
        Ok(dictionary)
    }

    /// Read and parse a dictionary file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::parse(&source)
    }

    /// Add candidates for `word`; the word is normalized first and
    /// candidates are appended to any existing entry, skipping duplicates.
    pub fn insert<I, S>(&mut self, word: &str, candidates: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entry = self.entries.entry(normalize_key(word)).or_default();
        for candidate in candidates {
            let candidate = candidate.into();
            if !entry.contains(&candidate) {
                entry.push(candidate);
            }
        }
    }

    /// Candidates for an already-normalized key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.entries
            .get(key)
            .map(Vec::as_slice)
            .filter(|candidates| !candidates.is_empty())
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Number of words with candidates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
