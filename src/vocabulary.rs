//! Vocabulary tables: the fixed word lists behind generation and query analysis.
//!
//! A vocabulary is a TOML document with `[meta]`, `[terms]`, `[names]` and
//! `[content]` tables. One vocabulary is bundled into the binary; an external
//! file can replace it at startup. Once loaded the tables are immutable and
//! shared behind an `Arc`.

use std::collections::HashSet;
use std::path::Path;
use std::sync::{Arc, OnceLock};

use serde::Deserialize;
use unicode_normalization::UnicodeNormalization;

use crate::error::VocabularyError;

const BUNDLED_TOML: &str = include_str!("../data/vocabulary.toml");

static BUNDLED: OnceLock<Result<Arc<Vocabulary>, String>> = OnceLock::new();

/// Which kind of term a query token matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TermKind {
    Concept,
    Field,
    Adjective,
}

// ── TOML deserialization helpers ─────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct VocabularyToml {
    meta: MetaToml,
    terms: TermsToml,
    names: NamesToml,
    content: ContentToml,
}

#[derive(Debug, Deserialize)]
struct MetaToml {
    version: String,
    #[serde(default = "default_latest_year")]
    latest_year: u32,
}

fn default_latest_year() -> u32 {
    2024
}

#[derive(Debug, Deserialize)]
struct TermsToml {
    concepts: Vec<String>,
    fields: Vec<String>,
    adjectives: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct NamesToml {
    first: Vec<String>,
    last: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ContentToml {
    genres: Vec<String>,
    publishers: Vec<String>,
    title_templates: Vec<String>,
    abstract_templates: Vec<String>,
    chapter_templates: Vec<String>,
    prose_templates: Vec<String>,
}

/// Parse `toml_str` into `cell` on first use; later calls share the result,
/// including a parse failure.
fn shared(
    cell: &OnceLock<Result<Arc<Vocabulary>, String>>,
    toml_str: &str,
    origin: &str,
) -> Result<Arc<Vocabulary>, VocabularyError> {
    let parsed = cell.get_or_init(|| {
        Vocabulary::from_toml_str(toml_str, origin)
            .map(Arc::new)
            .map_err(|e| e.to_string())
    });
    match parsed {
        Ok(vocab) => Ok(Arc::clone(vocab)),
        Err(message) => Err(VocabularyError::Parse {
            origin: origin.to_string(),
            message: message.clone(),
        }),
    }
}

// ── Vocabulary ───────────────────────────────────────────────────────────

/// Immutable vocabulary tables with O(1) term membership.
///
/// Table order matters: the generator indexes into these lists, so reordering
/// a table changes every book. Term entries are stored lowercased.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    pub version: String,
    /// Upper bound (inclusive) for generated publication years.
    pub latest_year: u32,
    pub concepts: Vec<String>,
    pub fields: Vec<String>,
    pub adjectives: Vec<String>,
    pub first_names: Vec<String>,
    pub last_names: Vec<String>,
    pub genres: Vec<String>,
    pub publishers: Vec<String>,
    pub title_templates: Vec<String>,
    pub abstract_templates: Vec<String>,
    pub chapter_templates: Vec<String>,
    pub prose_templates: Vec<String>,
    concept_set: HashSet<String>,
    field_set: HashSet<String>,
    adjective_set: HashSet<String>,
}

impl Vocabulary {
    /// The vocabulary compiled into the binary, parsed once per process.
    pub fn bundled() -> Result<Arc<Vocabulary>, VocabularyError> {
        shared(&BUNDLED, BUNDLED_TOML, "bundled")
    }

    /// Load and validate a vocabulary from an external TOML file.
    pub fn load(path: &Path) -> Result<Self, VocabularyError> {
        let content = std::fs::read_to_string(path).map_err(|e| VocabularyError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_toml_str(&content, &path.display().to_string())
    }

    /// Parse and validate a vocabulary from TOML text.
    pub fn from_toml_str(toml_str: &str, origin: &str) -> Result<Self, VocabularyError> {
        let parsed: VocabularyToml =
            toml::from_str(toml_str).map_err(|e| VocabularyError::Parse {
                origin: origin.to_string(),
                message: e.to_string(),
            })?;

        let vocab = Self::from_tables(
            parsed.meta.version,
            parsed.meta.latest_year,
            Tables {
                concepts: parsed.terms.concepts,
                fields: parsed.terms.fields,
                adjectives: parsed.terms.adjectives,
                first_names: parsed.names.first,
                last_names: parsed.names.last,
                genres: parsed.content.genres,
                publishers: parsed.content.publishers,
                title_templates: parsed.content.title_templates,
                abstract_templates: parsed.content.abstract_templates,
                chapter_templates: parsed.content.chapter_templates,
                prose_templates: parsed.content.prose_templates,
            },
        );
        vocab.validate()?;
        Ok(vocab)
    }

    /// Build a vocabulary from raw tables without validating them.
    ///
    /// Term entries are NFKC-normalized and lowercased, the same folding
    /// applied to query tokens.
    pub fn from_tables(version: String, latest_year: u32, tables: Tables) -> Self {
        let lower = |v: Vec<String>| -> Vec<String> {
            v.into_iter()
                .map(|t| t.trim().nfkc().collect::<String>().to_lowercase())
                .collect()
        };
        let concepts = lower(tables.concepts);
        let fields = lower(tables.fields);
        let adjectives = lower(tables.adjectives);

        Self {
            version,
            latest_year,
            concept_set: concepts.iter().cloned().collect(),
            field_set: fields.iter().cloned().collect(),
            adjective_set: adjectives.iter().cloned().collect(),
            concepts,
            fields,
            adjectives,
            first_names: tables.first_names,
            last_names: tables.last_names,
            genres: tables.genres,
            publishers: tables.publishers,
            title_templates: tables.title_templates,
            abstract_templates: tables.abstract_templates,
            chapter_templates: tables.chapter_templates,
            prose_templates: tables.prose_templates,
        }
    }

    /// Reject vocabularies with empty tables.
    pub fn validate(&self) -> Result<(), VocabularyError> {
        let tables: [(&str, usize); 11] = [
            ("terms.concepts", self.concepts.len()),
            ("terms.fields", self.fields.len()),
            ("terms.adjectives", self.adjectives.len()),
            ("names.first", self.first_names.len()),
            ("names.last", self.last_names.len()),
            ("content.genres", self.genres.len()),
            ("content.publishers", self.publishers.len()),
            ("content.title_templates", self.title_templates.len()),
            ("content.abstract_templates", self.abstract_templates.len()),
            ("content.chapter_templates", self.chapter_templates.len()),
            ("content.prose_templates", self.prose_templates.len()),
        ];
        match tables.iter().find(|(_, len)| *len == 0) {
            Some((table, _)) => Err(VocabularyError::EmptyTable {
                table: (*table).to_string(),
            }),
            None => Ok(()),
        }
    }

    /// Classify a lowercased token: concepts first, then fields, then adjectives.
    pub fn classify(&self, token: &str) -> Option<TermKind> {
        if self.concept_set.contains(token) {
            Some(TermKind::Concept)
        } else if self.field_set.contains(token) {
            Some(TermKind::Field)
        } else if self.adjective_set.contains(token) {
            Some(TermKind::Adjective)
        } else {
            None
        }
    }
}

/// Raw vocabulary tables, as handed to [`Vocabulary::from_tables`].
#[derive(Debug, Clone, Default)]
pub struct Tables {
    pub concepts: Vec<String>,
    pub fields: Vec<String>,
    pub adjectives: Vec<String>,
    pub first_names: Vec<String>,
    pub last_names: Vec<String>,
    pub genres: Vec<String>,
    pub publishers: Vec<String>,
    pub title_templates: Vec<String>,
    pub abstract_templates: Vec<String>,
    pub chapter_templates: Vec<String>,
    pub prose_templates: Vec<String>,
}
