//! Document Generators
//!
//! Pure transformations from the configuration, the resource snapshot and the
//! translation table into the XML documents every package needs:
//!
//! - [container] - `META-INF/container.xml`
//! - [opf] - the package document (metadata, manifest, spine, guide)
//! - [nav] - the EPUB 3 navigation document
//! - [ncx] - the EPUB 2 navigation control file
//! - [apple] - `META-INF/com.apple.ibooks.display-options.xml`
//!
//! Generators never mutate their inputs. Given identical inputs they produce
//! identical output, except the `dcterms:modified` timestamp of the package
//! document, which reflects the time of generation.

use std::io::Cursor;

use quick_xml::{
    Writer,
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};

use crate::error::EpubError;

pub mod apple;
pub mod container;
pub mod nav;
pub mod ncx;
pub mod opf;

/// Directory holding the package document and every registered resource
pub const CONTENT_ROOT: &str = "OEBPS";

/// Location of the package document inside the archive
pub const PACKAGE_PATH: &str = "OEBPS/content.opf";

pub const CONTAINER_PATH: &str = "META-INF/container.xml";

pub const APPLE_DISPLAY_OPTIONS_PATH: &str = "META-INF/com.apple.ibooks.display-options.xml";

/// Href of the navigation document, relative to the content root
pub const NAV_HREF: &str = "nav.xhtml";

/// Href of the NCX document, relative to the content root
pub const NCX_HREF: &str = "toc.ncx";

/// Href of the package document, relative to the content root
pub const PACKAGE_HREF: &str = "content.opf";

pub(crate) type XmlWriter = Writer<Cursor<Vec<u8>>>;

/// Creates a writer that has already emitted the XML declaration
pub(crate) fn new_document() -> Result<XmlWriter, EpubError> {
    let mut writer = Writer::new(Cursor::new(Vec::new()));
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;

    Ok(writer)
}

/// Writes `<tag attributes...>text</tag>`
pub(crate) fn write_text_element<'a, I>(
    writer: &mut XmlWriter,
    tag: &str,
    attributes: I,
    text: &str,
) -> Result<(), EpubError>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    writer.write_event(Event::Start(BytesStart::new(tag).with_attributes(attributes)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(tag)))?;

    Ok(())
}

/// Consumes the writer and returns the serialized document
pub(crate) fn finish(writer: XmlWriter) -> Result<String, EpubError> {
    Ok(String::from_utf8(writer.into_inner().into_inner())?)
}

#[cfg(test)]
mod tests {
    use crate::document::{finish, new_document, write_text_element};

    #[test]
    fn test_write_text_element_escapes() {
        let mut writer = new_document().unwrap();
        write_text_element(&mut writer, "dc:title", [("id", "a\"b")], "Tom & Jerry <3").unwrap();

        let document = finish(writer).unwrap();
        assert_eq!(
            document,
            "<?xml version=\"1.0\" encoding=\"utf-8\"?>\
             <dc:title id=\"a&quot;b\">Tom &amp; Jerry &lt;3</dc:title>"
        );
    }
}
