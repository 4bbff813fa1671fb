use chrono::{DateTime, SecondsFormat, Utc};
use sha1::{Digest, Sha1};

/// Derives the manifest item id of a resource from its href
///
/// The id is the SHA-1 digest of the href in hexadecimal, prefixed so that
/// it is a valid XML name. The same href always yields the same id, and
/// distinct hrefs yield distinct ids, so spine and NCX references can be
/// computed without consulting the manifest.
pub fn item_id(href: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(href.as_bytes());
    format!("item-{:x}", hasher.finalize())
}

/// Returns the current time in `CCYY-MM-DDThh:mm:ssZ` format
pub fn modified_timestamp() -> String {
    format_timestamp(Utc::now())
}

/// Formats a UTC time with seconds precision, truncating sub-second digits
pub fn format_timestamp(time: DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Checks whether an href stays inside the content root
///
/// Both `/` and `\` count as separators. The href must be relative and no
/// segment may be `..`, wherever it appears in the path.
pub fn is_contained_href(href: &str) -> bool {
    if href.is_empty() || href.starts_with(['/', '\\']) {
        return false;
    }

    href.split(['/', '\\']).all(|segment| segment != "..")
}
