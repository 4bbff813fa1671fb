//! Epub Builder
//!
//! This module provides the orchestrator that assembles an EPUB package.
//! The `EpubBuilder` owns one resolved configuration, one translation table,
//! one resource registry and one open package container. Resources are
//! registered and written into the container in the same call; the metadata
//! documents are generated from the final registry snapshot when the builder
//! is sealed.
//!
//! ## Usage
//!
//! ```rust, no_run
//! # fn main() -> Result<(), epub_packer::error::EpubError> {
//! use epub_packer::{
//!     builder::EpubBuilder,
//!     config::PartialConfig,
//!     types::ResourceProperty,
//! };
//!
//! let config = PartialConfig::from_json(r#"{
//!     "meta": { "title": "Test Book" },
//!     "landmarks": { "bodymatter": "chapter1.xhtml", "toc": "nav.xhtml" },
//!     "spine": "toc",
//!     "toc": [{ "text": "Chapter 1", "href": "chapter1.xhtml" }]
//! }"#)?;
//!
//! let mut builder = EpubBuilder::init(config)?;
//! builder.add_text_file("chapter1.xhtml", "<html>...</html>", &[])?;
//! builder.copy_file("images/cover.png", "path/to/cover.png", &[ResourceProperty::CoverImage])?;
//!
//! builder.seal_to("output.epub")?;
//! # Ok(())
//! # }
//! ```
//!
//! Sealing consumes the builder, so a package can only be sealed once:
//!
//! ```rust, compile_fail
//! # fn main() -> Result<(), epub_packer::error::EpubError> {
//! # use epub_packer::{builder::EpubBuilder, config::PartialConfig};
//! # let config = PartialConfig::default();
//! let builder = EpubBuilder::init(config)?;
//! let first = builder.seal()?;
//! let second = builder.seal()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Notes
//!
//! - Resource hrefs are relative to the content root `OEBPS/`.
//! - A resource is registered only once its bytes are in the container, so a
//!   failed add never leaves a manifest entry without content.
//! - Nothing is rolled back otherwise: the caller decides whether to continue
//!   or start over with a fresh builder.

use std::{fmt, fs, path::Path};

use log::{debug, info};

use crate::{
    archive::ZipContainer,
    config::{Config, PartialConfig, resolve},
    document::{
        APPLE_DISPLAY_OPTIONS_PATH, CONTAINER_PATH, CONTENT_ROOT, NAV_HREF, NCX_HREF,
        PACKAGE_HREF, PACKAGE_PATH, apple, container, nav, ncx, opf,
    },
    error::{EpubBuilderError, EpubError},
    locale::Locale,
    registry::ResourceRegistry,
    types::{Resource, ResourceProperty},
    utils::is_contained_href,
};

/// Hrefs of the documents generated when sealing
const RESERVED_HREFS: [&str; 3] = [NAV_HREF, NCX_HREF, PACKAGE_HREF];

/// EPUB Builder
///
/// The main structure used to assemble an EPUB package in memory.
pub struct EpubBuilder {
    config: Config,

    /// Translation table resolved from the configured locale
    locale: Locale,

    /// Every resource added so far, in manifest order
    registry: ResourceRegistry,

    container: ZipContainer,
}

impl EpubBuilder {
    /// Creates a builder ready to accept resources
    ///
    /// Resolves the configuration and the translation table, opens the
    /// package container and writes `mimetype` and `META-INF/container.xml`.
    ///
    /// # Return
    /// - `Ok(EpubBuilder)`: the builder is ready
    /// - `Err(EpubError)`: a required configuration field is missing, the locale
    ///   tag is unknown, or the container could not be written
    pub fn init(partial: PartialConfig) -> Result<Self, EpubError> {
        let config = resolve(partial)?;
        let locale = config.locale.resolve()?;

        let mut container = ZipContainer::open(config.compression_level)?;
        container.add_text(CONTAINER_PATH, &container::generate()?)?;

        info!(
            "initialized builder for '{}' ({} translations)",
            config.meta.title,
            locale.len()
        );

        Ok(Self {
            config,
            locale,
            registry: ResourceRegistry::new(),
            container,
        })
    }

    /// Adds a binary resource
    ///
    /// ## Parameters
    /// - `href`: path of the resource, relative to the content root
    /// - `content`: the bytes written into the package
    /// - `properties`: manifest properties of the resource
    ///
    /// # Return
    /// - `Ok(Resource)`: the registered descriptor
    /// - `Err(EpubError)`: the href is illegal, reserved or already registered,
    ///   or the entry could not be written
    pub fn add_binary_file(
        &mut self,
        href: &str,
        content: &[u8],
        properties: &[ResourceProperty],
    ) -> Result<Resource, EpubError> {
        Self::validate_href(href)?;
        self.write_resource(href, content, properties)
    }

    /// Adds a text resource, stored as UTF-8
    pub fn add_text_file(
        &mut self,
        href: &str,
        content: &str,
        properties: &[ResourceProperty],
    ) -> Result<Resource, EpubError> {
        self.add_binary_file(href, content.as_bytes(), properties)
    }

    /// Adds a resource read from the local file system
    ///
    /// The file is read before anything is registered, so an unreadable
    /// source leaves the builder unchanged.
    pub fn copy_file<P: AsRef<Path>>(
        &mut self,
        href: &str,
        source: P,
        properties: &[ResourceProperty],
    ) -> Result<Resource, EpubError> {
        Self::validate_href(href)?;

        let content = fs::read(source)?;
        self.write_resource(href, &content, properties)
    }

    /// Generates the metadata documents and returns the archive bytes
    ///
    /// `nav.xhtml` and `toc.ncx` are registered like any other resource so that
    /// they are listed in the manifest; the package document is then generated
    /// from the complete registry.
    pub fn seal(mut self) -> Result<Vec<u8>, EpubError> {
        let navigation = nav::generate(&self.config, &self.locale)?;
        debug!("generated navigation document");
        self.write_resource(NAV_HREF, navigation.as_bytes(), &[ResourceProperty::Nav])?;

        let control_file = ncx::generate(&self.config)?;
        debug!("generated ncx document");
        self.write_resource(NCX_HREF, control_file.as_bytes(), &[])?;

        let package = opf::generate(&self.config, self.registry.list(), &self.locale)?;
        debug!("generated package document");
        self.container.add_text(PACKAGE_PATH, &package)?;

        if self.config.apple_display_options {
            let display_options = apple::generate(self.registry.list())?;
            debug!("generated apple display options");
            self.container
                .add_text(APPLE_DISPLAY_OPTIONS_PATH, &display_options)?;
        }

        info!(
            "sealing '{}' with {} resources",
            self.config.meta.title,
            self.registry.len()
        );
        self.container.seal()
    }

    /// Seals the package and writes it to a file
    ///
    /// Missing parent directories of `output_path` are created.
    pub fn seal_to<P: AsRef<Path>>(self, output_path: P) -> Result<(), EpubError> {
        let bytes = self.seal()?;

        if let Some(parent) = output_path.as_ref().parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        fs::write(output_path, bytes)?;
        Ok(())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    /// Returns the registered resources in manifest order
    pub fn resources(&self) -> &[Resource] {
        self.registry.list()
    }

    /// Rejects hrefs escaping the content root or colliding with generated documents
    fn validate_href(href: &str) -> Result<(), EpubError> {
        if !is_contained_href(href) {
            return Err(EpubBuilderError::IllegalResourcePath {
                href: href.to_string(),
            }
            .into());
        }

        if RESERVED_HREFS.contains(&href) {
            return Err(EpubBuilderError::ReservedResource {
                href: href.to_string(),
            }
            .into());
        }

        Ok(())
    }

    fn write_resource(
        &mut self,
        href: &str,
        content: &[u8],
        properties: &[ResourceProperty],
    ) -> Result<Resource, EpubError> {
        if self.registry.contains(href) {
            return Err(EpubBuilderError::DuplicateResource {
                href: href.to_string(),
            }
            .into());
        }

        self.container
            .add_binary(&format!("{}/{}", CONTENT_ROOT, href), content)?;
        self.registry.register(href, properties)
    }
}

impl fmt::Debug for EpubBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EpubBuilder")
            .field("config", &self.config)
            .field("locale", &self.locale)
            .field("registry", &self.registry)
            .field("entries", &self.container.len())
            .finish()
    }
}
