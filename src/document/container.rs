use quick_xml::events::{BytesEnd, BytesStart, Event};

use crate::{
    document::{PACKAGE_PATH, finish, new_document},
    error::EpubError,
};

/// Generates `META-INF/container.xml`
///
/// The document only points reading systems at the package document, so its
/// content is constant.
pub fn generate() -> Result<String, EpubError> {
    let mut writer = new_document()?;

    writer.write_event(Event::Start(BytesStart::new("container").with_attributes([
        ("version", "1.0"),
        ("xmlns", "urn:oasis:names:tc:opendocument:xmlns:container"),
    ])))?;
    writer.write_event(Event::Start(BytesStart::new("rootfiles")))?;

    writer.write_event(Event::Empty(BytesStart::new("rootfile").with_attributes([
        ("full-path", PACKAGE_PATH),
        ("media-type", "application/oebps-package+xml"),
    ])))?;

    writer.write_event(Event::End(BytesEnd::new("rootfiles")))?;
    writer.write_event(Event::End(BytesEnd::new("container")))?;

    finish(writer)
}

#[cfg(test)]
mod tests {
    use crate::document::container::generate;

    #[test]
    fn test_generate_container() {
        let document = generate().unwrap();

        assert!(document.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\"?>"));
        assert!(document.contains(
            "<rootfile full-path=\"OEBPS/content.opf\" media-type=\"application/oebps-package+xml\"/>"
        ));
        assert_eq!(document, generate().unwrap());
    }
}
