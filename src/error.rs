//! Error Type Definition Module
//!
//! This module defines the error types that may be encountered while assembling
//! an EPUB package. All errors are uniformly wrapped in the `EpubError`
//! enumeration for convenient error handling by the caller.
//!
//! ## Main Error Types
//!
//! - [EpubError] - Enumeration of main errors during EPUB assembly
//! - [EpubBuilderError] - Caller contract violations detected by the builder

use thiserror::Error;

/// Types of errors that can occur during EPUB assembly
///
/// No operation retries internally. Every failure is surfaced to the caller,
/// who decides whether to abort or restart with a fresh builder.
#[derive(Debug, Error)]
pub enum EpubError {
    /// ZIP archive related errors
    ///
    /// Errors occur when writing entries into the package container.
    #[error("Archive error: {source}")]
    ArchiveError { source: zip::result::ZipError },

    #[error("Epub builder error: {source}")]
    EpubBuilderError { source: EpubBuilderError },

    #[error("IO error: {source}")]
    IOError { source: std::io::Error },

    /// Locale table decoding error
    ///
    /// This error occurs when a locale table is not a flat JSON object of strings,
    /// or when a partial configuration supplied as JSON is malformed.
    #[error("Json error: {source}")]
    JsonError { source: serde_json::Error },

    /// QuickXml error
    ///
    /// This error occurs when serializing a generated document with the QuickXml library.
    #[error("QuickXml error: {source}")]
    QuickXmlError { source: quick_xml::Error },

    /// Unable to find the resource error
    ///
    /// This error occurs when a locale tag does not name any bundled locale table.
    #[error("Resource not found: Unable to find resource from \"{resource}\".")]
    ResourceNotFound { resource: String },

    /// UTF-8 decoding error
    ///
    /// This error occurs when a generated document is not valid UTF-8.
    #[error("Decode error: {source}")]
    Utf8DecodeError { source: std::string::FromUtf8Error },
}

impl From<zip::result::ZipError> for EpubError {
    fn from(value: zip::result::ZipError) -> Self {
        EpubError::ArchiveError { source: value }
    }
}

impl From<quick_xml::Error> for EpubError {
    fn from(value: quick_xml::Error) -> Self {
        EpubError::QuickXmlError { source: value }
    }
}

impl From<std::io::Error> for EpubError {
    fn from(value: std::io::Error) -> Self {
        EpubError::IOError { source: value }
    }
}

impl From<serde_json::Error> for EpubError {
    fn from(value: serde_json::Error) -> Self {
        EpubError::JsonError { source: value }
    }
}

impl From<std::string::FromUtf8Error> for EpubError {
    fn from(value: std::string::FromUtf8Error) -> Self {
        EpubError::Utf8DecodeError { source: value }
    }
}

impl From<EpubBuilderError> for EpubError {
    fn from(value: EpubBuilderError) -> Self {
        EpubError::EpubBuilderError { source: value }
    }
}

#[cfg(test)]
impl PartialEq for EpubError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (
                Self::ResourceNotFound {
                    resource: l_resource,
                },
                Self::ResourceNotFound {
                    resource: r_resource,
                },
            ) => l_resource == r_resource,

            (
                Self::EpubBuilderError { source: l_source },
                Self::EpubBuilderError { source: r_source },
            ) => l_source == r_source,

            _ => core::mem::discriminant(self) == core::mem::discriminant(other),
        }
    }
}

/// Types of errors that can occur during EPUB build
///
/// These errors describe violations of the builder's caller contract:
/// required configuration that was never supplied, or resource paths
/// that cannot be placed inside the package.
#[derive(Debug, Error)]
#[cfg_attr(test, derive(PartialEq))]
pub enum EpubBuilderError {
    /// Duplicate resource error
    ///
    /// This error is triggered when a resource is registered with an href that
    /// is already present in the registry. Two manifest items sharing one path
    /// would make the package ambiguous.
    #[error("A resource with href '{href}' has already been registered.")]
    DuplicateResource { href: String },

    /// Illegal resource path error
    ///
    /// This error is triggered when a resource href is absolute or starts with "../",
    /// which would place the entry outside the content root.
    #[error("A resource href should be a relative path and not start with '/' or '../', got '{href}'.")]
    IllegalResourcePath { href: String },

    /// Missing required configuration error
    ///
    /// This error is triggered when the partial configuration lacks a field
    /// that has no built-in default: `landmarks.bodymatter`, `landmarks.toc`,
    /// `spine` or `toc`.
    #[error("The configuration field '{field}' is required.")]
    MissingRequiredField { field: String },

    /// Reserved resource error
    ///
    /// This error is triggered when a resource href collides with one of the
    /// documents the builder generates itself when sealing.
    #[error("The href '{href}' is reserved for a generated document.")]
    ReservedResource { href: String },
}
