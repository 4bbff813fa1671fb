use std::fmt;

use indexmap::IndexMap;
use serde::Deserialize;

/// Named landmark hrefs, in the order the caller declared them
///
/// The iteration order of this map is the order in which landmarks are
/// rendered in the navigation document and in the OPF guide.
pub type Landmarks = IndexMap<String, String>;

/// A manifest property of a resource
///
/// The fixed vocabulary of item properties defined by EPUB 3.
/// See <https://www.w3.org/TR/epub-33/#app-item-properties-vocab>.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResourceProperty {
    CoverImage,
    Mathml,
    Nav,
    RemoteResources,
    Scripted,
    Svg,
    Switch,
}

impl ResourceProperty {
    /// Returns the property name as written in the manifest
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceProperty::CoverImage => "cover-image",
            ResourceProperty::Mathml => "mathml",
            ResourceProperty::Nav => "nav",
            ResourceProperty::RemoteResources => "remote-resources",
            ResourceProperty::Scripted => "scripted",
            ResourceProperty::Svg => "svg",
            ResourceProperty::Switch => "switch",
        }
    }
}

impl fmt::Display for ResourceProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Represents a resource registered in the package
///
/// A `Resource` is the descriptor of a file placed under the content root.
/// It only carries what the manifest needs; the file content itself is written
/// straight into the package container at registration time and is never
/// retained here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    /// The path of the resource relative to the content root
    pub href: String,

    /// The media type of the resource
    ///
    /// `None` when the extension is not recognized. Such a resource is still
    /// registered and listed in the manifest with an empty `media-type`.
    pub mime: Option<String>,

    /// Manifest properties of the resource, without duplicates, in the order given
    pub properties: Vec<ResourceProperty>,
}

impl Resource {
    /// Creates a new resource descriptor
    ///
    /// Repeated properties are collapsed to their first occurrence.
    pub fn new(href: &str, mime: Option<String>, properties: &[ResourceProperty]) -> Self {
        let mut unique = Vec::with_capacity(properties.len());
        for property in properties {
            if !unique.contains(property) {
                unique.push(*property);
            }
        }

        Self {
            href: href.to_string(),
            mime,
            properties: unique,
        }
    }

    /// Checks whether the resource carries the given manifest property
    pub fn has_property(&self, property: ResourceProperty) -> bool {
        self.properties.contains(&property)
    }

    /// Returns the space-separated properties attribute, or `None` when empty
    pub fn properties_attribute(&self) -> Option<String> {
        if self.properties.is_empty() {
            return None;
        }

        Some(
            self.properties
                .iter()
                .map(ResourceProperty::as_str)
                .collect::<Vec<_>>()
                .join(" "),
        )
    }
}

/// Represents an entry of the table of contents
///
/// Entries form a tree of unbounded depth. The order of `children` is the
/// order in which they are rendered in both navigation documents.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TocEntry {
    /// The display label of this entry
    pub text: String,

    /// The content document this entry points to
    pub href: String,

    /// Nested entries
    #[serde(default)]
    pub children: Vec<TocEntry>,
}

impl TocEntry {
    /// Creates a leaf entry
    pub fn new(text: &str, href: &str) -> Self {
        Self {
            text: text.to_string(),
            href: href.to_string(),
            children: vec![],
        }
    }

    /// Appends a child entry
    pub fn with_child(mut self, child: TocEntry) -> Self {
        self.children.push(child);
        self
    }
}

/// The reading direction of the publication
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Ltr,
    Rtl,
    Auto,
}

impl Direction {
    /// Returns the value used for `dir` attributes
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Ltr => "ltr",
            Direction::Rtl => "rtl",
            Direction::Auto => "auto",
        }
    }

    /// Returns the value used for the spine `page-progression-direction`
    ///
    /// The spine has no `auto` value; the reading system default is used instead.
    pub fn page_progression(&self) -> &'static str {
        match self {
            Direction::Ltr => "ltr",
            Direction::Rtl => "rtl",
            Direction::Auto => "default",
        }
    }
}

/// Whether a publisher or creator is a person or an organization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum EntityType {
    Organization,
    Person,
}

/// The publisher of the publication
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Publisher {
    pub entity_type: EntityType,

    /// Publisher name, omitted from the metadata when empty
    pub name: String,
}

impl Default for Publisher {
    fn default() -> Self {
        Self {
            entity_type: EntityType::Organization,
            name: String::new(),
        }
    }
}

/// A contributor to the publication
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Creator {
    /// The contributor's name
    pub name: String,

    /// The contributor's MARC relator code
    ///
    /// See <https://www.loc.gov/marc/relators/relaterm.html>. The codes `aut` and
    /// `dub` produce a `dc:creator` element; every other code a `dc:contributor`.
    pub role: String,

    #[serde(default, rename = "type")]
    pub entity_type: Option<EntityType>,

    /// Normalized form of the name, used for sorting
    #[serde(default, alias = "file as")]
    pub file_as: Option<String>,

    /// The name in alternative scripts, keyed by language tag
    #[serde(default)]
    pub alternate: IndexMap<String, String>,
}

impl Creator {
    pub fn new(name: &str, role: &str) -> Self {
        Self {
            name: name.to_string(),
            role: role.to_string(),
            entity_type: None,
            file_as: None,
            alternate: IndexMap::new(),
        }
    }

    pub fn with_file_as(mut self, file_as: &str) -> Self {
        self.file_as = Some(file_as.to_string());
        self
    }

    pub fn with_alternate(mut self, lang: &str, alias: &str) -> Self {
        self.alternate.insert(lang.to_string(), alias.to_string());
        self
    }

    /// Returns the Dublin Core element used for this contributor
    pub fn dc_tag(&self) -> &'static str {
        match self.role.as_str() {
            "aut" | "dub" => "dc:creator",
            _ => "dc:contributor",
        }
    }
}

/// A subject heading drawn from a controlled vocabulary
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Subject {
    /// The human readable label
    pub label: String,

    /// The vocabulary the term belongs to, e.g. "BISAC"
    pub authority: String,

    /// The code of the subject inside the vocabulary
    pub term: String,
}

/// The set of unique identifiers known for the publication
///
/// Only one identifier is active in the package, selected with the
/// precedence ISBN, then DOI, then UUID.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Identifiers {
    #[serde(default)]
    pub isbn: Option<String>,

    #[serde(default)]
    pub doi: Option<String>,

    #[serde(default)]
    pub uuid: Option<String>,
}
