use quick_xml::events::{BytesEnd, BytesStart, Event};

use crate::{
    config::Config,
    document::{XmlWriter, finish, new_document, write_text_element},
    error::EpubError,
    locale::Locale,
    types::{Landmarks, TocEntry},
};

/// Generates the EPUB 3 navigation document
///
/// The document holds two `nav` elements: the table of contents, rendered
/// as nested ordered lists, and the landmarks list. Headings and landmark
/// labels come from the translation table; a landmark without translation
/// is labelled with its key.
pub fn generate(config: &Config, locale: &Locale) -> Result<String, EpubError> {
    let meta = &config.meta;
    let mut writer = new_document()?;

    writer.write_event(Event::Start(BytesStart::new("html").with_attributes([
        ("xmlns", "http://www.w3.org/1999/xhtml"),
        ("xmlns:epub", "http://www.idpf.org/2007/ops"),
        ("dir", meta.direction.as_str()),
        ("lang", meta.language.as_str()),
        ("xml:lang", meta.language.as_str()),
    ])))?;

    // make head
    writer.write_event(Event::Start(BytesStart::new("head")))?;
    writer.write_event(Event::Empty(
        BytesStart::new("meta").with_attributes([("charset", "UTF-8")]),
    ))?;
    write_text_element(&mut writer, "title", [], &meta.title)?;
    writer.write_event(Event::End(BytesEnd::new("head")))?;

    // make body
    writer.write_event(Event::Start(BytesStart::new("body")))?;
    write_text_element(&mut writer, "h1", [], &meta.title)?;

    writer.write_event(Event::Start(
        BytesStart::new("nav").with_attributes([("epub:type", "toc"), ("id", "toc")]),
    ))?;
    write_text_element(&mut writer, "h2", [], locale.get("toc").unwrap_or_default())?;
    make_toc_list(&mut writer, &config.toc)?;
    writer.write_event(Event::End(BytesEnd::new("nav")))?;

    writer.write_event(Event::Start(
        BytesStart::new("nav").with_attributes([("epub:type", "landmarks"), ("id", "landmarks")]),
    ))?;
    write_text_element(
        &mut writer,
        "h2",
        [],
        locale.get("landmarks").unwrap_or_default(),
    )?;
    make_landmarks_list(&mut writer, &config.landmarks, locale)?;
    writer.write_event(Event::End(BytesEnd::new("nav")))?;

    writer.write_event(Event::End(BytesEnd::new("body")))?;
    writer.write_event(Event::End(BytesEnd::new("html")))?;

    finish(writer)
}

fn make_toc_list(writer: &mut XmlWriter, entries: &[TocEntry]) -> Result<(), EpubError> {
    writer.write_event(Event::Start(BytesStart::new("ol")))?;

    for entry in entries {
        writer.write_event(Event::Start(BytesStart::new("li")))?;

        write_text_element(writer, "a", [("href", entry.href.as_str())], &entry.text)?;

        if !entry.children.is_empty() {
            make_toc_list(writer, &entry.children)?;
        }

        writer.write_event(Event::End(BytesEnd::new("li")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("ol")))?;

    Ok(())
}

fn make_landmarks_list(
    writer: &mut XmlWriter,
    landmarks: &Landmarks,
    locale: &Locale,
) -> Result<(), EpubError> {
    writer.write_event(Event::Start(BytesStart::new("ol")))?;

    for (landmark, href) in landmarks {
        writer.write_event(Event::Start(BytesStart::new("li")))?;
        write_text_element(
            writer,
            "a",
            [("epub:type", landmark.as_str()), ("href", href.as_str())],
            locale.label(landmark),
        )?;
        writer.write_event(Event::End(BytesEnd::new("li")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("ol")))?;

    Ok(())
}
