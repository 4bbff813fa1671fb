//! Package Container
//!
//! An in-memory ZIP archive that entries are appended to one by one. The
//! `mimetype` entry is written first and uncompressed when the container is
//! opened; every later entry is deflated.

use std::io::{Cursor, Write};

use log::{debug, info};
use zip::{CompressionMethod, ZipWriter, write::SimpleFileOptions};

use crate::error::EpubError;

/// Name of the first entry of every package
pub const MIMETYPE_PATH: &str = "mimetype";

/// Content of the `mimetype` entry
pub const EPUB_MIMETYPE: &str = "application/epub+zip";

/// An open package archive
///
/// Entries are kept in insertion order. Writing the same path twice is not
/// guarded here; the builder ensures paths are unique before writing.
pub struct ZipContainer {
    zip: ZipWriter<Cursor<Vec<u8>>>,
    deflated: SimpleFileOptions,
    entries: usize,
}

impl ZipContainer {
    /// Opens a new archive and writes the `mimetype` entry
    ///
    /// ## Parameters
    /// - `compression_level`: deflate level for every later entry, or `None`
    ///   for the library default
    pub fn open(compression_level: Option<i64>) -> Result<Self, EpubError> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

        let stored = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        let deflated = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .compression_level(compression_level);

        zip.start_file(MIMETYPE_PATH, stored)?;
        zip.write_all(EPUB_MIMETYPE.as_bytes())?;

        Ok(Self {
            zip,
            deflated,
            entries: 1,
        })
    }

    /// Appends a binary entry
    pub fn add_binary(&mut self, path: &str, content: &[u8]) -> Result<(), EpubError> {
        self.zip.start_file(path, self.deflated)?;
        self.zip.write_all(content)?;
        self.entries += 1;

        debug!("wrote archive entry '{}' ({} bytes)", path, content.len());
        Ok(())
    }

    /// Appends a UTF-8 text entry
    pub fn add_text(&mut self, path: &str, content: &str) -> Result<(), EpubError> {
        self.add_binary(path, content.as_bytes())
    }

    /// Number of entries written so far, `mimetype` included
    pub fn len(&self) -> usize {
        self.entries
    }

    /// Finalizes the archive and returns its bytes
    ///
    /// Consumes the container, so no entry can be appended afterwards.
    pub fn seal(self) -> Result<Vec<u8>, EpubError> {
        let entries = self.entries;
        let bytes = self.zip.finish()?.into_inner();

        info!("sealed archive with {} entries ({} bytes)", entries, bytes.len());
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Cursor, Read};

    use zip::{CompressionMethod, ZipArchive};

    use crate::archive::{EPUB_MIMETYPE, ZipContainer};

    fn read_entry(archive: &mut ZipArchive<Cursor<Vec<u8>>>, index: usize) -> (String, String) {
        let mut file = archive.by_index(index).unwrap();
        let mut content = String::new();
        file.read_to_string(&mut content).unwrap();

        (file.name().to_string(), content)
    }

    /// The mimetype entry comes first and is stored without compression
    #[test]
    fn test_open_writes_mimetype_first() {
        let container = ZipContainer::open(None).unwrap();
        assert_eq!(container.len(), 1);

        let bytes = container.seal().unwrap();
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();

        assert_eq!(archive.len(), 1);
        assert_eq!(
            archive.by_index(0).unwrap().compression(),
            CompressionMethod::Stored
        );
        assert_eq!(
            read_entry(&mut archive, 0),
            ("mimetype".to_string(), EPUB_MIMETYPE.to_string())
        );
    }

    /// The mimetype bytes sit at the fixed offset reading systems sniff
    #[test]
    fn test_mimetype_is_at_fixed_offset() {
        let bytes = ZipContainer::open(Some(9)).unwrap().seal().unwrap();

        assert_eq!(&bytes[30..38], b"mimetype");
        assert_eq!(&bytes[38..58], EPUB_MIMETYPE.as_bytes());
    }

    #[test]
    fn test_entries_keep_insertion_order() {
        let mut container = ZipContainer::open(Some(6)).unwrap();
        container
            .add_text("META-INF/container.xml", "<container/>")
            .unwrap();
        container
            .add_binary("OEBPS/images/cover.png", &[0x89, 0x50, 0x4e, 0x47])
            .unwrap();
        container.add_text("OEBPS/content.opf", "<package/>").unwrap();
        assert_eq!(container.len(), 4);

        let bytes = container.seal().unwrap();
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();

        let names = (0..archive.len())
            .map(|index| archive.by_index(index).unwrap().name().to_string())
            .collect::<Vec<_>>();
        assert_eq!(
            names,
            vec![
                "mimetype",
                "META-INF/container.xml",
                "OEBPS/images/cover.png",
                "OEBPS/content.opf"
            ]
        );

        let file = archive.by_index(1).unwrap();
        assert_eq!(file.compression(), CompressionMethod::Deflated);
        drop(file);

        assert_eq!(read_entry(&mut archive, 3).1, "<package/>");

        let mut image = Vec::new();
        archive
            .by_name("OEBPS/images/cover.png")
            .unwrap()
            .read_to_end(&mut image)
            .unwrap();
        assert_eq!(image, vec![0x89, 0x50, 0x4e, 0x47]);
    }
}
