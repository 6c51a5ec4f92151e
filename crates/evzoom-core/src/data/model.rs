//! Input records
//!
//! The shapes match the JSON emitted by the coupling pipelines:
//!
//! ```json
//! { "couplings": [ {"i": 2, "j": 5, "score": 0.3, "matrix": [[...]], "iC": ["A", ...], "jC": [...]} ],
//!   "logo": [ [ {"code": "A", "bits": 0.4}, ... ], ... ],
//!   "map": { "indices": [15, 16, ...], "letters": ["M", "K", ...] } }
//! ```
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::io::Read;

/// One letter of a logo stack.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LogoEntry {
    pub code: char,
    pub bits: f64,
}

/// Composition of one alignment column, stacked bottom to top.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogoColumn {
    pub entries: Vec<LogoEntry>,
}

impl LogoColumn {
    pub fn new(entries: Vec<LogoEntry>) -> Self {
        Self { entries }
    }
    pub fn len(&self) -> usize {
        self.entries.len()
    }
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
    pub fn iter(&self) -> impl Iterator<Item = &LogoEntry> {
        self.entries.iter()
    }
    pub fn total_bits(&self) -> f64 {
        self.entries.iter().map(|e| e.bits).sum()
    }
}

/// A pairwise coupling between positions `i` and `j` (1-based).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coupling {
    pub i: usize,
    pub j: usize,
    pub score: f64,
    #[serde(default)]
    pub matrix: Vec<Vec<f64>>,
    #[serde(rename = "iC", default)]
    pub i_labels: Vec<String>,
    #[serde(rename = "jC", default)]
    pub j_labels: Vec<String>,
}

impl Coupling {
    /// Zero-based cell the coupling is drawn at.
    pub fn anchor(&self) -> (i64, i64) {
        (self.i as i64 - 1, self.j as i64 - 1)
    }
    pub fn matrix_dims(&self) -> (usize, usize) {
        let rows = self.matrix.len();
        let cols = self.matrix.first().map_or(0, |r| r.len());
        (rows, cols)
    }
}

/// Internal index to external numbering and reference letter.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PositionMap {
    #[serde(default)]
    pub indices: Vec<i64>,
    #[serde(default)]
    pub letters: Vec<String>,
}

impl PositionMap {
    /// Crosshair label for position `k`: the external index, followed by the
    /// reference letter unless the reference has a gap there.
    pub fn label(&self, k: usize) -> Option<String> {
        let index = self.indices.get(k)?;
        match self.letters.get(k).map(String::as_str) {
            Some("-") | Some("") | None => Some(index.to_string()),
            Some(letter) => Some(format!("{} {}", index, letter)),
        }
    }
}

/// Everything a viewer session is built from.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ZoomData {
    #[serde(default)]
    pub couplings: Vec<Coupling>,
    #[serde(default)]
    pub logo: Vec<LogoColumn>,
    #[serde(default)]
    pub map: PositionMap,
}

impl ZoomData {
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Sequence length, taken from the logo.
    pub fn len(&self) -> usize {
        self.logo.len()
    }

    pub fn is_empty(&self) -> bool {
        self.logo.is_empty()
    }
}
