//! Package document generator
//!
//! Produces `OEBPS/content.opf` with its four sections: metadata, manifest,
//! spine, and the EPUB 2 guide.

use log::warn;
use quick_xml::events::{BytesEnd, BytesStart, Event};

use crate::{
    config::{Config, EbookMeta},
    document::{NCX_HREF, XmlWriter, finish, new_document, write_text_element},
    error::EpubError,
    locale::Locale,
    types::{Identifiers, Landmarks, Resource, ResourceProperty},
    utils::{item_id, modified_timestamp},
};

/// The id of the unique identifier element
pub const PUB_ID: &str = "pub-id";

/// The active unique identifier of the publication
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniqueIdentifier {
    /// The identifier as a URN
    pub id: String,

    /// ONIX code list 5 identifier type
    ///
    /// See <https://ns.editeur.org/onix/en/5>.
    pub onix: &'static str,
}

/// Selects the unique identifier, with the precedence ISBN, DOI, UUID
///
/// An ISBN of at most ten characters is an ISBN-10 (ONIX `02`), a longer one
/// an ISBN-13 (ONIX `15`). Hyphens and spaces are not counted, so a
/// hyphenated ISBN-10 such as `0-306-40615-2` is still `02` even though its
/// raw length exceeds ten.
pub fn unique_identifier(ids: &Identifiers) -> UniqueIdentifier {
    if let Some(isbn) = &ids.isbn {
        let length = isbn.chars().filter(|c| *c != '-' && *c != ' ').count();
        let onix = if length > 10 { "15" } else { "02" };
        UniqueIdentifier {
            id: format!("urn:isbn:{}", isbn),
            onix,
        }
    } else if let Some(doi) = &ids.doi {
        UniqueIdentifier {
            id: format!("urn:doi:{}", doi),
            onix: "06",
        }
    } else {
        UniqueIdentifier {
            id: format!("urn:uuid:{}", ids.uuid.as_deref().unwrap_or_default()),
            onix: "01",
        }
    }
}

/// Returns the first resource carrying the `cover-image` property
///
/// Later resources carrying the property are ignored, not merged.
pub fn cover_image(resources: &[Resource]) -> Option<&Resource> {
    let mut covers = resources
        .iter()
        .filter(|resource| resource.has_property(ResourceProperty::CoverImage));

    let cover = covers.next();
    for ignored in covers {
        warn!(
            "'{}' carries the cover-image property after '{}', ignored",
            ignored.href,
            cover.map(|cover| cover.href.as_str()).unwrap_or_default()
        );
    }

    cover
}

/// Generates the package document, stamped with the current time
pub fn generate(
    config: &Config,
    resources: &[Resource],
    locale: &Locale,
) -> Result<String, EpubError> {
    generate_with_timestamp(config, resources, locale, &modified_timestamp())
}

/// Generates the package document with a fixed `dcterms:modified` value
pub fn generate_with_timestamp(
    config: &Config,
    resources: &[Resource],
    locale: &Locale,
    modified: &str,
) -> Result<String, EpubError> {
    let meta = &config.meta;
    let mut writer = new_document()?;

    writer.write_event(Event::Start(BytesStart::new("package").with_attributes([
        ("xmlns", "http://www.idpf.org/2007/opf"),
        ("version", "3.0"),
        ("unique-identifier", PUB_ID),
        ("dir", meta.direction.as_str()),
        ("xml:lang", meta.language.as_str()),
    ])))?;

    make_metadata(&mut writer, meta, cover_image(resources), modified)?;
    make_manifest(&mut writer, resources)?;
    make_spine(&mut writer, config)?;
    make_guide(&mut writer, &config.landmarks, locale)?;

    writer.write_event(Event::End(BytesEnd::new("package")))?;

    finish(writer)
}

fn make_metadata(
    writer: &mut XmlWriter,
    meta: &EbookMeta,
    cover: Option<&Resource>,
    modified: &str,
) -> Result<(), EpubError> {
    let identifier = unique_identifier(&meta.ids);

    writer.write_event(Event::Start(BytesStart::new("metadata").with_attributes([
        ("xmlns:dc", "http://purl.org/dc/elements/1.1/"),
        ("xmlns:opf", "http://www.idpf.org/2007/opf"),
    ])))?;

    write_text_element(writer, "dc:identifier", [("id", PUB_ID)], &identifier.id)?;
    write_text_element(writer, "dc:title", [("id", "title")], &meta.title)?;

    if let Some(subtitle) = non_empty(&meta.subtitle) {
        write_text_element(writer, "dc:title", [("id", "subtitle")], subtitle)?;
        write_text_element(
            writer,
            "meta",
            [("refines", "#subtitle"), ("property", "title-type")],
            "subtitle",
        )?;
    }

    if let Some(description) = non_empty(&meta.description) {
        write_text_element(writer, "dc:description", [], description)?;
    }
    if !meta.publisher.name.is_empty() {
        write_text_element(writer, "dc:publisher", [], &meta.publisher.name)?;
    }
    if let Some(date) = non_empty(&meta.date) {
        write_text_element(writer, "dc:date", [], date)?;
    }

    write_text_element(writer, "dc:language", [], &meta.language)?;
    write_text_element(writer, "meta", [("property", "dcterms:modified")], modified)?;

    let refines = format!("#{}", PUB_ID);
    write_text_element(
        writer,
        "meta",
        [
            ("refines", refines.as_str()),
            ("property", "identifier-type"),
            ("scheme", "onix:codelist5"),
        ],
        identifier.onix,
    )?;

    if let Some(cover) = cover {
        writer.write_event(Event::Empty(
            BytesStart::new("meta").with_attributes([("name", "cover"), ("content", cover.href.as_str())]),
        ))?;
    }

    make_creators(writer, meta)?;
    make_subjects(writer, meta)?;

    writer.write_event(Event::End(BytesEnd::new("metadata")))?;

    Ok(())
}

fn make_creators(writer: &mut XmlWriter, meta: &EbookMeta) -> Result<(), EpubError> {
    for (index, creator) in meta.creators.iter().enumerate() {
        let id = format!("creators-{}", index + 1);
        let refines = format!("#{}", id);

        write_text_element(writer, creator.dc_tag(), [("id", id.as_str())], &creator.name)?;
        write_text_element(
            writer,
            "meta",
            [
                ("refines", refines.as_str()),
                ("property", "role"),
                ("scheme", "marc:relators"),
            ],
            &creator.role,
        )?;

        if let Some(file_as) = &creator.file_as {
            write_text_element(
                writer,
                "meta",
                [("refines", refines.as_str()), ("property", "file-as")],
                file_as,
            )?;
        }

        for (lang, alias) in &creator.alternate {
            write_text_element(
                writer,
                "meta",
                [
                    ("refines", refines.as_str()),
                    ("property", "alternate-script"),
                    ("xml:lang", lang.as_str()),
                ],
                alias,
            )?;
        }
    }

    Ok(())
}

fn make_subjects(writer: &mut XmlWriter, meta: &EbookMeta) -> Result<(), EpubError> {
    for (index, subject) in meta.subjects.iter().enumerate() {
        let id = format!("subject-{}", index + 1);
        let refines = format!("#{}", id);

        write_text_element(writer, "dc:subject", [("id", id.as_str())], &subject.label)?;
        write_text_element(
            writer,
            "meta",
            [("refines", refines.as_str()), ("property", "authority")],
            &subject.authority,
        )?;
        write_text_element(
            writer,
            "meta",
            [("refines", refines.as_str()), ("property", "term")],
            &subject.term,
        )?;
    }

    Ok(())
}

fn make_manifest(writer: &mut XmlWriter, resources: &[Resource]) -> Result<(), EpubError> {
    writer.write_event(Event::Start(BytesStart::new("manifest")))?;

    for resource in resources {
        let id = item_id(&resource.href);
        let mut item = BytesStart::new("item").with_attributes([
            ("href", resource.href.as_str()),
            ("id", id.as_str()),
            ("media-type", resource.mime.as_deref().unwrap_or_default()),
        ]);

        if let Some(properties) = resource.properties_attribute() {
            item.push_attribute(("properties", properties.as_str()));
        }

        writer.write_event(Event::Empty(item))?;
    }

    writer.write_event(Event::End(BytesEnd::new("manifest")))?;

    Ok(())
}

fn make_spine(writer: &mut XmlWriter, config: &Config) -> Result<(), EpubError> {
    let ncx_id = item_id(NCX_HREF);
    writer.write_event(Event::Start(BytesStart::new("spine").with_attributes([
        ("page-progression-direction", config.meta.direction.page_progression()),
        ("toc", ncx_id.as_str()),
    ])))?;

    for href in config.spine_hrefs() {
        let idref = item_id(href);
        writer.write_event(Event::Empty(
            BytesStart::new("itemref").with_attributes([("idref", idref.as_str()), ("linear", "yes")]),
        ))?;
    }

    writer.write_event(Event::End(BytesEnd::new("spine")))?;

    Ok(())
}

fn make_guide(
    writer: &mut XmlWriter,
    landmarks: &Landmarks,
    locale: &Locale,
) -> Result<(), EpubError> {
    writer.write_event(Event::Start(BytesStart::new("guide")))?;

    for (landmark, href) in landmarks {
        writer.write_event(Event::Empty(BytesStart::new("reference").with_attributes([
            ("type", guide_type(landmark)),
            ("title", locale.label(landmark)),
            ("href", href.as_str()),
        ])))?;
    }

    writer.write_event(Event::End(BytesEnd::new("guide")))?;

    Ok(())
}

/// Maps a landmark key onto the EPUB 2 guide vocabulary
fn guide_type(landmark: &str) -> &str {
    match landmark {
        "bodymatter" => "text",
        other => other,
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|value| !value.is_empty())
}
