//! Config Resolver
//!
//! Callers describe a publication with a [PartialConfig] in which every field
//! is optional. [resolve] merges it over the built-in defaults and checks the
//! fields that have no default, producing the immutable [Config] a builder
//! works from.
//!
//! ## Merge rules
//!
//! - `meta`, `meta.publisher`, `meta.ids` and `landmarks` merge key by key
//! - `creators`, `subjects`, `spine`, `toc` and every scalar replace the default
//!
//! ## Usage
//!
//! ```rust
//! # fn main() -> Result<(), epub_packer::error::EpubError> {
//! use epub_packer::config::{resolve, PartialConfig};
//!
//! let partial = PartialConfig::from_json(r#"{
//!     "meta": { "title": "A Book", "ids": { "isbn": "9780000000002" } },
//!     "landmarks": { "bodymatter": "chapter1.xhtml", "toc": "nav.xhtml" },
//!     "spine": ["chapter1.xhtml"],
//!     "toc": [{ "text": "Chapter 1", "href": "chapter1.xhtml" }]
//! }"#)?;
//!
//! let config = resolve(partial)?;
//! assert_eq!(config.meta.language, "en");
//! # Ok(())
//! # }
//! ```

use serde::Deserialize;
use uuid::Uuid;

use crate::{
    error::{EpubBuilderError, EpubError},
    locale::{Locale, LocaleRef},
    types::{Creator, Direction, EntityType, Identifiers, Landmarks, Publisher, Subject, TocEntry},
};

/// The reading order of the publication
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "SpineRepr")]
pub enum Spine {
    /// An explicit list of content document hrefs
    Explicit(Vec<String>),

    /// The hrefs of the top-level table of contents entries, in order
    ///
    /// Written as the string `"toc"` in JSON.
    FromToc,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SpineRepr {
    Hrefs(Vec<String>),
    Keyword(String),
}

impl TryFrom<SpineRepr> for Spine {
    type Error = String;

    fn try_from(value: SpineRepr) -> Result<Self, Self::Error> {
        match value {
            SpineRepr::Hrefs(hrefs) => Ok(Spine::Explicit(hrefs)),
            SpineRepr::Keyword(keyword) if keyword == "toc" => Ok(Spine::FromToc),
            SpineRepr::Keyword(keyword) => Err(format!(
                "unknown spine mode '{}', expected a list of hrefs or \"toc\"",
                keyword
            )),
        }
    }
}

/// A locale supplied by the caller
///
/// In JSON a string names a bundled locale and an object is an inline table.
/// The tag is only checked when the configuration is resolved, so an unknown
/// tag fails with `ResourceNotFound` naming the missing table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum PartialLocale {
    Tag(String),
    Inline(Locale),
}

impl PartialLocale {
    fn into_locale_ref(self) -> Result<LocaleRef, EpubError> {
        match self {
            PartialLocale::Tag(tag) => LocaleRef::from_tag(&tag),
            PartialLocale::Inline(table) => Ok(LocaleRef::Inline(table)),
        }
    }
}

impl From<LocaleRef> for PartialLocale {
    fn from(value: LocaleRef) -> Self {
        match value {
            LocaleRef::Tag(locale) => PartialLocale::Tag(locale.tag().to_string()),
            LocaleRef::Inline(table) => PartialLocale::Inline(table),
        }
    }
}

/// Publisher fields supplied by the caller
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PartialPublisher {
    #[serde(rename = "type")]
    pub entity_type: Option<EntityType>,
    pub name: Option<String>,
}

/// Publication metadata supplied by the caller
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PartialMeta {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    pub direction: Option<Direction>,
    pub language: Option<String>,
    pub date: Option<String>,
    pub publisher: Option<PartialPublisher>,
    pub creators: Option<Vec<Creator>>,
    pub subjects: Option<Vec<Subject>>,
    pub ids: Option<Identifiers>,
}

/// A builder configuration in which every field is optional
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PartialConfig {
    pub locale: Option<PartialLocale>,
    pub meta: Option<PartialMeta>,
    pub landmarks: Option<Landmarks>,
    pub spine: Option<Spine>,
    pub toc: Option<Vec<TocEntry>>,

    /// Whether to write `META-INF/com.apple.ibooks.display-options.xml`
    pub apple_display_options: Option<bool>,

    /// Deflate level of compressed entries
    pub compression_level: Option<i64>,
}

impl PartialConfig {
    /// Parses a partial configuration from JSON
    pub fn from_json(json: &str) -> Result<Self, EpubError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Resolved publication metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EbookMeta {
    pub title: String,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    pub direction: Direction,

    /// BCP 47 language tag of the publication
    pub language: String,

    /// Publication date, written verbatim into `dc:date`
    pub date: Option<String>,
    pub publisher: Publisher,
    pub creators: Vec<Creator>,
    pub subjects: Vec<Subject>,
    pub ids: Identifiers,
}

impl Default for EbookMeta {
    /// Built-in metadata defaults
    ///
    /// Each call generates a fresh v4 UUID identifier.
    fn default() -> Self {
        Self {
            title: String::new(),
            subtitle: None,
            description: None,
            direction: Direction::Ltr,
            language: "en".to_string(),
            date: None,
            publisher: Publisher::default(),
            creators: vec![],
            subjects: vec![],
            ids: Identifiers {
                isbn: None,
                doi: None,
                uuid: Some(Uuid::new_v4().to_string()),
            },
        }
    }
}

impl EbookMeta {
    fn merge(mut self, partial: PartialMeta) -> Self {
        if let Some(title) = partial.title {
            self.title = title;
        }
        if partial.subtitle.is_some() {
            self.subtitle = partial.subtitle;
        }
        if partial.description.is_some() {
            self.description = partial.description;
        }
        if let Some(direction) = partial.direction {
            self.direction = direction;
        }
        if let Some(language) = partial.language {
            self.language = language;
        }
        if partial.date.is_some() {
            self.date = partial.date;
        }
        if let Some(publisher) = partial.publisher {
            self.publisher = merge_publisher(self.publisher, publisher);
        }
        if let Some(creators) = partial.creators {
            self.creators = creators;
        }
        if let Some(subjects) = partial.subjects {
            self.subjects = subjects;
        }
        if let Some(ids) = partial.ids {
            self.ids = merge_identifiers(self.ids, ids);
        }

        self
    }
}

fn merge_publisher(mut base: Publisher, partial: PartialPublisher) -> Publisher {
    if let Some(entity_type) = partial.entity_type {
        base.entity_type = entity_type;
    }
    if let Some(name) = partial.name {
        base.name = name;
    }
    base
}

fn merge_identifiers(mut base: Identifiers, partial: Identifiers) -> Identifiers {
    if partial.isbn.is_some() {
        base.isbn = partial.isbn;
    }
    if partial.doi.is_some() {
        base.doi = partial.doi;
    }
    if partial.uuid.is_some() {
        base.uuid = partial.uuid;
    }
    base
}

/// A complete builder configuration
///
/// Produced once by [resolve] and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub locale: LocaleRef,
    pub meta: EbookMeta,

    /// Landmark hrefs; always contains `bodymatter` and `toc`
    pub landmarks: Landmarks,
    pub spine: Spine,
    pub toc: Vec<TocEntry>,
    pub apple_display_options: bool,
    pub compression_level: Option<i64>,
}

impl Config {
    /// Returns the hrefs of the reading order
    pub fn spine_hrefs(&self) -> Vec<&str> {
        match &self.spine {
            Spine::Explicit(hrefs) => hrefs.iter().map(String::as_str).collect(),
            Spine::FromToc => self.toc.iter().map(|entry| entry.href.as_str()).collect(),
        }
    }
}

/// Merges a partial configuration over the built-in defaults
///
/// # Return
/// - `Ok(Config)`: the complete configuration
/// - `Err(EpubError)`: a field without default (`landmarks.bodymatter`,
///   `landmarks.toc`, `spine`, `toc`) is missing, or the locale tag names
///   no bundled table
pub fn resolve(partial: PartialConfig) -> Result<Config, EpubError> {
    let meta = match partial.meta {
        Some(meta) => EbookMeta::default().merge(meta),
        None => EbookMeta::default(),
    };

    let mut landmarks = Landmarks::new();
    if let Some(partial_landmarks) = partial.landmarks {
        landmarks.extend(partial_landmarks);
    }

    for key in ["bodymatter", "toc"] {
        if !landmarks.contains_key(key) {
            return Err(missing_field(&format!("landmarks.{}", key)));
        }
    }

    let spine = partial.spine.ok_or_else(|| missing_field("spine"))?;
    let toc = partial.toc.ok_or_else(|| missing_field("toc"))?;

    let locale = match partial.locale {
        Some(locale) => locale.into_locale_ref()?,
        None => LocaleRef::default(),
    };

    Ok(Config {
        locale,
        meta,
        landmarks,
        spine,
        toc,
        apple_display_options: partial.apple_display_options.unwrap_or(true),
        compression_level: partial.compression_level,
    })
}

fn missing_field(field: &str) -> EpubError {
    EpubBuilderError::MissingRequiredField {
        field: field.to_string(),
    }
    .into()
}
