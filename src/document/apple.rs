use quick_xml::events::{BytesEnd, BytesStart, Event};

use crate::{
    document::{finish, new_document, write_text_element},
    error::EpubError,
    types::{Resource, ResourceProperty},
};

/// Checks whether the package embeds fonts
fn has_embedded_fonts(resources: &[Resource]) -> bool {
    resources.iter().any(|resource| {
        resource
            .mime
            .as_deref()
            .is_some_and(|mime| mime.starts_with("font/"))
    })
}

/// Checks whether the package contains scripted content
fn has_interactive_content(resources: &[Resource]) -> bool {
    resources.iter().any(|resource| {
        resource.mime.as_deref() == Some("application/javascript")
            || resource.has_property(ResourceProperty::Scripted)
    })
}

/// Generates the proprietary `com.apple.ibooks.display-options.xml`
///
/// Apple Books ignores embedded fonts and scripts unless this document
/// opts in, so both flags are derived from the registered resources.
pub fn generate(resources: &[Resource]) -> Result<String, EpubError> {
    let mut writer = new_document()?;

    writer.write_event(Event::Start(BytesStart::new("display_options")))?;
    writer.write_event(Event::Start(
        BytesStart::new("platform").with_attributes([("name", "*")]),
    ))?;

    let specified_fonts = has_embedded_fonts(resources).to_string();
    let interactive = has_interactive_content(resources).to_string();
    write_text_element(
        &mut writer,
        "option",
        [("name", "specified-fonts")],
        &specified_fonts,
    )?;
    write_text_element(&mut writer, "option", [("name", "interactive")], &interactive)?;

    writer.write_event(Event::End(BytesEnd::new("platform")))?;
    writer.write_event(Event::End(BytesEnd::new("display_options")))?;

    finish(writer)
}

#[cfg(test)]
mod tests {
    use crate::{
        document::apple::generate,
        registry::ResourceRegistry,
        types::{Resource, ResourceProperty},
    };

    fn resource(href: &str, mime: &str, properties: &[ResourceProperty]) -> Resource {
        Resource::new(href, Some(mime.to_string()), properties)
    }

    #[test]
    fn test_generate_without_fonts_or_scripts() {
        let resources = vec![
            resource("chapter.xhtml", "application/xhtml+xml", &[]),
            resource("style.css", "text/css", &[]),
            Resource::new("blob.unknown", None, &[]),
        ];

        let document = generate(&resources).unwrap();
        assert!(document.contains("<option name=\"specified-fonts\">false</option>"));
        assert!(document.contains("<option name=\"interactive\">false</option>"));
    }

    #[test]
    fn test_generate_detects_fonts() {
        let resources = vec![resource("fonts/body.woff2", "font/woff2", &[])];

        let document = generate(&resources).unwrap();
        assert!(document.contains("<option name=\"specified-fonts\">true</option>"));
        assert!(document.contains("<option name=\"interactive\">false</option>"));
    }

    /// WOFF and OTF fonts registered by href are detected as embedded fonts
    #[test]
    fn test_generate_detects_registered_fonts() {
        for href in ["fonts/body.woff", "fonts/head.otf", "fonts/mono.ttf"] {
            let mut registry = ResourceRegistry::new();
            registry.register("chapter.xhtml", &[]).unwrap();
            registry.register(href, &[]).unwrap();

            let document = generate(registry.list()).unwrap();
            assert!(
                document.contains("<option name=\"specified-fonts\">true</option>"),
                "{} not detected",
                href
            );
        }
    }

    /// Either a javascript resource or the scripted property marks the package interactive
    #[test]
    fn test_generate_detects_interactive_content() {
        let scripts = vec![resource("app.js", "application/javascript", &[])];
        assert!(
            generate(&scripts)
                .unwrap()
                .contains("<option name=\"interactive\">true</option>")
        );

        let scripted = vec![resource(
            "quiz.xhtml",
            "application/xhtml+xml",
            &[ResourceProperty::Scripted],
        )];
        assert!(
            generate(&scripted)
                .unwrap()
                .contains("<option name=\"interactive\">true</option>")
        );
    }

    #[test]
    fn test_generate_structure() {
        let document = generate(&[]).unwrap();
        assert_eq!(
            document,
            "<?xml version=\"1.0\" encoding=\"utf-8\"?>\
             <display_options><platform name=\"*\">\
             <option name=\"specified-fonts\">false</option>\
             <option name=\"interactive\">false</option>\
             </platform></display_options>"
        );
    }
}
