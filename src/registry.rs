//! Resource Registry
//!
//! An append-only, ordered collection of resource descriptors. The order of
//! registration is the order of the OPF manifest.

use log::{debug, warn};

use crate::{
    error::{EpubBuilderError, EpubError},
    mime,
    types::{Resource, ResourceProperty},
};

/// Ordered collection of registered resources
#[derive(Debug, Default)]
pub struct ResourceRegistry {
    resources: Vec<Resource>,
}

impl ResourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a resource and returns its descriptor
    ///
    /// The media type is resolved from the href once, here, and never
    /// re-derived. An unrecognized extension does not fail the registration;
    /// the resource is kept with no media type.
    ///
    /// # Return
    /// - `Ok(Resource)`: the registered descriptor
    /// - `Err(EpubError)`: the href is already registered
    pub fn register(
        &mut self,
        href: &str,
        properties: &[ResourceProperty],
    ) -> Result<Resource, EpubError> {
        if self.contains(href) {
            return Err(EpubBuilderError::DuplicateResource {
                href: href.to_string(),
            }
            .into());
        }

        let mime = mime::resolve(href);
        match &mime {
            None => warn!("unable to determine the media type of '{}'", href),
            Some(mime_type) if !mime::is_core_media_type(Some(mime_type)) => {
                warn!("'{}' is a foreign resource of type '{}'", href, mime_type)
            }
            Some(_) => {}
        }

        let resource = Resource::new(href, mime, properties);
        debug!("registered resource '{}' ({:?})", href, resource.mime);

        self.resources.push(resource.clone());
        Ok(resource)
    }

    /// Checks whether an href has already been registered
    pub fn contains(&self, href: &str) -> bool {
        self.resources.iter().any(|resource| resource.href == href)
    }

    /// Returns the registered resources in registration order
    pub fn list(&self) -> &[Resource] {
        &self.resources
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        error::{EpubBuilderError, EpubError},
        registry::ResourceRegistry,
        types::ResourceProperty,
    };

    #[test]
    fn test_register_keeps_order() {
        let mut registry = ResourceRegistry::new();
        registry.register("b.xhtml", &[]).unwrap();
        registry.register("a.css", &[]).unwrap();
        registry.register("c.png", &[ResourceProperty::CoverImage]).unwrap();

        let hrefs = registry
            .list()
            .iter()
            .map(|resource| resource.href.as_str())
            .collect::<Vec<_>>();
        assert_eq!(hrefs, vec!["b.xhtml", "a.css", "c.png"]);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_register_resolves_mime() {
        let mut registry = ResourceRegistry::new();
        let resource = registry.register("text/chapter.xhtml", &[]).unwrap();

        assert_eq!(resource.mime.as_deref(), Some("application/xhtml+xml"));
        assert_eq!(registry.list()[0], resource);
    }

    /// Unknown extensions are registered without a media type instead of failing
    #[test]
    fn test_register_unknown_extension() {
        let mut registry = ResourceRegistry::new();
        let resource = registry.register("data/blob.notarealextension", &[]).unwrap();

        assert_eq!(resource.mime, None);
        assert_eq!(registry.len(), 1);
    }

    /// Registering the same href twice is rejected and leaves the registry unchanged
    #[test]
    fn test_register_duplicate_href() {
        let mut registry = ResourceRegistry::new();
        registry.register("chapter.xhtml", &[]).unwrap();

        let result = registry.register("chapter.xhtml", &[ResourceProperty::Scripted]);
        assert_eq!(
            result.unwrap_err(),
            EpubError::EpubBuilderError {
                source: EpubBuilderError::DuplicateResource {
                    href: "chapter.xhtml".to_string()
                }
            }
        );
        assert_eq!(registry.len(), 1);
    }
}
