use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::sections::{SECTION_COUNT, SECTION_ORDER, SectionColor, SectionId, SectionMeta};

/// One slot of the framework: registry metadata plus the user's text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Section {
    id: SectionId,
    pub content: String,
    pub expanded: bool,
}

impl Section {
    pub fn new(id: SectionId) -> Self {
        Self {
            id,
            content: String::new(),
            expanded: id.default_expanded(),
        }
    }

    pub fn id(&self) -> SectionId {
        self.id
    }

    pub fn meta(&self) -> &'static SectionMeta {
        self.id.meta()
    }

    pub fn label(&self) -> &'static str {
        self.meta().label
    }

    pub fn title(&self) -> &'static str {
        self.meta().title
    }

    pub fn subtitle(&self) -> &'static str {
        self.meta().subtitle
    }

    pub fn placeholder(&self) -> &'static str {
        self.meta().placeholder
    }

    pub fn color(&self) -> SectionColor {
        self.meta().color
    }
}

/// The closed set of sections, one entry per [`SectionId`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sections {
    entries: [Section; SECTION_COUNT],
}

impl Sections {
    pub fn get(&self, id: SectionId) -> &Section {
        &self.entries[id.index()]
    }

    pub fn get_mut(&mut self, id: SectionId) -> &mut Section {
        &mut self.entries[id.index()]
    }

    /// Sections in display order.
    pub fn iter(&self) -> impl Iterator<Item = &Section> {
        self.entries.iter()
    }
}

impl Default for Sections {
    fn default() -> Self {
        Self {
            entries: SECTION_ORDER.map(Section::new),
        }
    }
}

/// The complete editable state.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Document {
    pub reference: String,
    pub verses: String,
    pub statement: String,
    pub sections: Sections,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn section(&self, id: SectionId) -> &Section {
        self.sections.get(id)
    }

    pub fn count_words(&self) -> usize {
        fn words(text: &str) -> usize {
            text.split_whitespace().count()
        }

        words(&self.statement)
            + self
                .sections
                .iter()
                .map(|section| words(&section.content))
                .sum::<usize>()
    }
}

/// Serialized shape of a [`Document`], shared by the storage slot and by
/// exported files.
///
/// Every field is optional on the way in so that partial or older files
/// still load; the legacy camel-case names are accepted as aliases. Section
/// entries under ids the registry does not know are dropped whatever their
/// shape, and a null section map reads as empty.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default, alias = "bookReference")]
    pub reference: Option<String>,
    #[serde(default)]
    pub verses: Option<String>,
    #[serde(default, alias = "onePoint")]
    pub statement: Option<String>,
    #[serde(default, deserialize_with = "deserialize_sections")]
    pub sections: BTreeMap<String, SectionSnapshot>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, alias = "isExpanded", skip_serializing_if = "Option::is_none")]
    pub expanded: Option<bool>,
}

/// Known ids stay strictly typed: a mistyped entry fails the whole parse.
fn deserialize_sections<'de, D>(
    deserializer: D,
) -> Result<BTreeMap<String, SectionSnapshot>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<BTreeMap<String, serde_json::Value>>::deserialize(deserializer)?;
    let mut sections = BTreeMap::new();
    for (key, value) in raw.unwrap_or_default() {
        if SectionId::from_key(&key).is_none() {
            tracing::debug!(key = %key, "ignoring unknown section in snapshot");
            continue;
        }
        let entry = Option::<SectionSnapshot>::deserialize(value)
            .map_err(|err| serde::de::Error::custom(format!("section `{key}`: {err}")))?;
        if let Some(entry) = entry {
            sections.insert(key, entry);
        }
    }
    Ok(sections)
}

impl Snapshot {
    pub fn from_document(document: &Document) -> Self {
        let sections = document
            .sections
            .iter()
            .map(|section| {
                (
                    section.id().key().to_string(),
                    SectionSnapshot {
                        content: Some(section.content.clone()),
                        expanded: Some(section.expanded),
                    },
                )
            })
            .collect();

        Self {
            reference: Some(document.reference.clone()),
            verses: Some(document.verses.clone()),
            statement: Some(document.statement.clone()),
            sections,
        }
    }
}

/// Builds a document from registry defaults, overlaying whatever the
/// snapshot provides.
///
/// Only `content` and `expanded` are taken from a section entry, and only
/// for keys the registry knows. Everything else keeps its default.
pub fn merge_snapshot(snapshot: Snapshot) -> Document {
    let Snapshot {
        reference,
        verses,
        statement,
        sections,
    } = snapshot;

    let mut document = Document {
        reference: reference.unwrap_or_default(),
        verses: verses.unwrap_or_default(),
        statement: statement.unwrap_or_default(),
        sections: Sections::default(),
    };

    for (key, entry) in sections {
        let Some(id) = SectionId::from_key(&key) else {
            tracing::debug!(key = %key, "ignoring unknown section in snapshot");
            continue;
        };
        let section = document.sections.get_mut(id);
        if let Some(content) = entry.content {
            section.content = content;
        }
        if let Some(expanded) = entry.expanded {
            section.expanded = expanded;
        }
    }

    document
}

#[cfg(test)]
#[path = "document_tests.rs"]
mod document_tests;
