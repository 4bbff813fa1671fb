//! NCX generator
//!
//! Produces `toc.ncx`, the EPUB 2 navigation control file kept for reading
//! systems that do not understand the EPUB 3 navigation document.

use quick_xml::events::{BytesEnd, BytesStart, Event};

use crate::{
    config::Config,
    document::{XmlWriter, finish, new_document, opf::unique_identifier, write_text_element},
    error::EpubError,
    types::TocEntry,
};

/// Prefix of every navPoint id
const NAV_POINT_PREFIX: &str = "ncx";

/// Generates the NCX document from the TOC tree
///
/// Each navPoint id is derived from its position in the tree: the n-th root
/// entry is `ncx-n`, and a child appends its own index to its parent's id,
/// so ids are unique without any counter. `playOrder` follows a depth-first
/// walk starting at 1.
pub fn generate(config: &Config) -> Result<String, EpubError> {
    let meta = &config.meta;
    let identifier = unique_identifier(&meta.ids);
    let depth = toc_depth(&config.toc).max(1).to_string();

    let mut writer = new_document()?;

    writer.write_event(Event::Start(BytesStart::new("ncx").with_attributes([
        ("xmlns", "http://www.daisy.org/z3986/2005/ncx/"),
        ("version", "2005-1"),
        ("xml:lang", meta.language.as_str()),
    ])))?;

    writer.write_event(Event::Start(BytesStart::new("head")))?;
    for (name, content) in [
        ("dtb:uid", identifier.id.as_str()),
        ("dtb:depth", depth.as_str()),
        ("dtb:totalPageCount", "0"),
        ("dtb:maxPageNumber", "0"),
    ] {
        writer.write_event(Event::Empty(
            BytesStart::new("meta").with_attributes([("name", name), ("content", content)]),
        ))?;
    }
    writer.write_event(Event::End(BytesEnd::new("head")))?;

    writer.write_event(Event::Start(BytesStart::new("docTitle")))?;
    write_text_element(&mut writer, "text", [], &meta.title)?;
    writer.write_event(Event::End(BytesEnd::new("docTitle")))?;

    writer.write_event(Event::Start(BytesStart::new("navMap")))?;
    let mut play_order = 0;
    make_nav_points(&mut writer, &config.toc, NAV_POINT_PREFIX, &mut play_order)?;
    writer.write_event(Event::End(BytesEnd::new("navMap")))?;

    writer.write_event(Event::End(BytesEnd::new("ncx")))?;

    finish(writer)
}

fn make_nav_points(
    writer: &mut XmlWriter,
    entries: &[TocEntry],
    prefix: &str,
    play_order: &mut usize,
) -> Result<(), EpubError> {
    for (index, entry) in entries.iter().enumerate() {
        let id = format!("{}-{}", prefix, index);
        *play_order += 1;
        let order = play_order.to_string();

        writer.write_event(Event::Start(
            BytesStart::new("navPoint")
                .with_attributes([("id", id.as_str()), ("playOrder", order.as_str())]),
        ))?;

        writer.write_event(Event::Start(BytesStart::new("navLabel")))?;
        write_text_element(writer, "text", [], &entry.text)?;
        writer.write_event(Event::End(BytesEnd::new("navLabel")))?;

        writer.write_event(Event::Empty(
            BytesStart::new("content").with_attributes([("src", entry.href.as_str())]),
        ))?;

        make_nav_points(writer, &entry.children, &id, play_order)?;

        writer.write_event(Event::End(BytesEnd::new("navPoint")))?;
    }

    Ok(())
}

fn toc_depth(entries: &[TocEntry]) -> usize {
    entries
        .iter()
        .map(|entry| 1 + toc_depth(&entry.children))
        .max()
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use indexmap::IndexMap;

    use crate::{
        config::{PartialConfig, PartialMeta, Spine, resolve},
        document::ncx::{generate, toc_depth},
        types::{Identifiers, TocEntry},
    };

    fn partial_config(toc: Vec<TocEntry>) -> PartialConfig {
        let mut landmarks = IndexMap::new();
        landmarks.insert("toc".to_string(), "nav.xhtml".to_string());
        landmarks.insert("bodymatter".to_string(), "one.xhtml".to_string());

        PartialConfig {
            meta: Some(PartialMeta {
                title: Some("Nested".to_string()),
                ids: Some(Identifiers {
                    isbn: None,
                    doi: Some("10.1000/182".to_string()),
                    uuid: None,
                }),
                ..Default::default()
            }),
            landmarks: Some(landmarks),
            spine: Some(Spine::FromToc),
            toc: Some(toc),
            ..Default::default()
        }
    }

    fn nested_toc() -> Vec<TocEntry> {
        vec![
            TocEntry::new("One", "one.xhtml")
                .with_child(TocEntry::new("One.A", "one.xhtml#a"))
                .with_child(
                    TocEntry::new("One.B", "one.xhtml#b")
                        .with_child(TocEntry::new("One.B.i", "one.xhtml#bi")),
                ),
            TocEntry::new("Two", "two.xhtml"),
        ]
    }

    #[test]
    fn test_toc_depth() {
        assert_eq!(toc_depth(&[]), 0);
        assert_eq!(toc_depth(&[TocEntry::new("One", "one.xhtml")]), 1);
        assert_eq!(toc_depth(&nested_toc()), 3);
    }

    #[test]
    fn test_generate_head() {
        let config = resolve(partial_config(nested_toc())).unwrap();
        let document = generate(&config).unwrap();

        assert!(document.contains(
            "<ncx xmlns=\"http://www.daisy.org/z3986/2005/ncx/\" version=\"2005-1\" xml:lang=\"en\">"
        ));
        assert!(document.contains(
            "<head>\
             <meta name=\"dtb:uid\" content=\"urn:doi:10.1000/182\"/>\
             <meta name=\"dtb:depth\" content=\"3\"/>\
             <meta name=\"dtb:totalPageCount\" content=\"0\"/>\
             <meta name=\"dtb:maxPageNumber\" content=\"0\"/>\
             </head>\
             <docTitle><text>Nested</text></docTitle>"
        ));
    }

    /// navPoint ids encode the tree position and playOrder is depth-first
    #[test]
    fn test_generate_nav_points() {
        let config = resolve(partial_config(nested_toc())).unwrap();
        let document = generate(&config).unwrap();

        assert!(document.contains(
            "<navMap>\
             <navPoint id=\"ncx-0\" playOrder=\"1\"><navLabel><text>One</text></navLabel><content src=\"one.xhtml\"/>\
             <navPoint id=\"ncx-0-0\" playOrder=\"2\"><navLabel><text>One.A</text></navLabel><content src=\"one.xhtml#a\"/></navPoint>\
             <navPoint id=\"ncx-0-1\" playOrder=\"3\"><navLabel><text>One.B</text></navLabel><content src=\"one.xhtml#b\"/>\
             <navPoint id=\"ncx-0-1-0\" playOrder=\"4\"><navLabel><text>One.B.i</text></navLabel><content src=\"one.xhtml#bi\"/></navPoint>\
             </navPoint>\
             </navPoint>\
             <navPoint id=\"ncx-1\" playOrder=\"5\"><navLabel><text>Two</text></navLabel><content src=\"two.xhtml\"/></navPoint>\
             </navMap>"
        ));
    }

    #[test]
    fn test_generate_unique_ids() {
        let toc = (0..12)
            .map(|index| {
                TocEntry::new(&format!("Part {}", index), &format!("part{}.xhtml", index))
                    .with_child(TocEntry::new("Intro", &format!("part{}.xhtml#intro", index)))
            })
            .collect();
        let config = resolve(partial_config(toc)).unwrap();
        let document = generate(&config).unwrap();

        let ids = document
            .split("<navPoint id=\"")
            .skip(1)
            .filter_map(|rest| rest.split('"').next())
            .collect::<Vec<_>>();
        let unique = ids.iter().collect::<HashSet<_>>();

        assert_eq!(ids.len(), 24);
        assert_eq!(unique.len(), 24);
    }

    /// An empty TOC still declares a depth of one and an empty navMap
    #[test]
    fn test_generate_empty_toc() {
        let config = resolve(partial_config(vec![])).unwrap();
        let document = generate(&config).unwrap();

        assert!(document.contains("<meta name=\"dtb:depth\" content=\"1\"/>"));
        assert!(document.contains("<navMap></navMap>"));
    }
}
