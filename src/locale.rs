//! Locale Resolver
//!
//! Translation tables label the landmarks and headings of the generated
//! navigation documents. A builder resolves exactly one table at initialization,
//! either taken verbatim from the caller or loaded from the bundled tables
//! under `locales/` with the base language underneath it.

use std::{fmt, fs, path::Path, str::FromStr};

use indexmap::IndexMap;
use log::debug;
use serde::Deserialize;

use crate::error::EpubError;

/// The language every bundled table falls back to
pub const BASE_LOCALE: KnownLocale = KnownLocale::En;

/// A translation table, mapping landmark keys to display strings
///
/// Standard keys are `bodymatter`, `landmarks`, `loi` and `toc`; any custom
/// landmark key may be added.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Locale {
    entries: IndexMap<String, String>,
}

impl Locale {
    /// Parses a table from a flat JSON object of strings
    pub fn from_json_str(json: &str) -> Result<Self, EpubError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a table stored on disk
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, EpubError> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Sets the translation of a key, returning the table for chaining
    pub fn with_entry(mut self, key: &str, value: &str) -> Self {
        self.entries.insert(key.to_string(), value.to_string());
        self
    }

    /// Returns the translation of a key, if any
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Returns the translation of a key, or the key itself when untranslated
    pub fn label<'a>(&'a self, key: &'a str) -> &'a str {
        self.get(key).unwrap_or(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Applies every entry of `other` on top of this table, later entries winning
    fn overlay(&mut self, other: Locale) {
        self.entries.extend(other.entries);
    }
}

/// A language with a bundled translation table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KnownLocale {
    De,
    En,
    Es,
    Fr,
    It,
}

impl KnownLocale {
    /// Returns the language tag of the locale
    pub fn tag(&self) -> &'static str {
        match self {
            KnownLocale::De => "de",
            KnownLocale::En => "en",
            KnownLocale::Es => "es",
            KnownLocale::Fr => "fr",
            KnownLocale::It => "it",
        }
    }

    fn source(&self) -> &'static str {
        match self {
            KnownLocale::De => include_str!("../locales/de.json"),
            KnownLocale::En => include_str!("../locales/en.json"),
            KnownLocale::Es => include_str!("../locales/es.json"),
            KnownLocale::Fr => include_str!("../locales/fr.json"),
            KnownLocale::It => include_str!("../locales/it.json"),
        }
    }

    /// Loads the bundled table of this locale, without any fallback
    pub fn load(&self) -> Result<Locale, EpubError> {
        debug!("loading locale table 'locales/{}.json'", self.tag());
        Locale::from_json_str(self.source())
    }
}

impl fmt::Display for KnownLocale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for KnownLocale {
    type Err = EpubError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        match tag {
            "de" => Ok(KnownLocale::De),
            "en" => Ok(KnownLocale::En),
            "es" => Ok(KnownLocale::Es),
            "fr" => Ok(KnownLocale::Fr),
            "it" => Ok(KnownLocale::It),
            _ => Err(EpubError::ResourceNotFound {
                resource: format!("locales/{}.json", tag),
            }),
        }
    }
}

/// A reference to the translation table a builder should use
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocaleRef {
    Tag(KnownLocale),
    Inline(Locale),
}

impl Default for LocaleRef {
    fn default() -> Self {
        LocaleRef::Tag(BASE_LOCALE)
    }
}

impl LocaleRef {
    /// Creates a reference from a language tag
    ///
    /// Fails with `ResourceNotFound` if no bundled table exists for the tag.
    pub fn from_tag(tag: &str) -> Result<Self, EpubError> {
        Ok(LocaleRef::Tag(tag.parse()?))
    }

    /// Resolves the reference into a complete translation table
    ///
    /// An inline table is returned unchanged; keys it lacks stay untranslated.
    /// A bundled locale is layered over the base language so every base key
    /// keeps at least its base-language value.
    pub fn resolve(&self) -> Result<Locale, EpubError> {
        match self {
            LocaleRef::Inline(table) => Ok(table.clone()),
            LocaleRef::Tag(locale) if *locale == BASE_LOCALE => BASE_LOCALE.load(),
            LocaleRef::Tag(locale) => {
                let mut table = BASE_LOCALE.load()?;
                table.overlay(locale.load()?);
                Ok(table)
            }
        }
    }
}
