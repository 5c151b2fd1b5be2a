/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use quick_xml::{
    events::{BytesStart, BytesText, Event},
    Writer,
};
use serde::Deserialize;
use zm_xml::{
    Describe, FieldDescriptor, RecordTypeSpec, ValueKind, WireValue, XmlSerialize,
    XmlSerializeAttr,
};

/// A named value, written as `<a n="name">value</a>`.
#[derive(Clone, Debug, Deserialize, XmlSerialize, PartialEq, Eq)]
pub struct KeyValuePair {
    #[xml_struct(attribute, rename = "n")]
    #[serde(rename = "@n")]
    key: String,

    #[xml_struct(text)]
    #[serde(rename = "$text", default)]
    value: Option<String>,
}

impl KeyValuePair {
    pub fn new(key: impl Into<String>, value: Option<String>) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }
}

/// A section of custom metadata attached to an item by a client application.
#[derive(Clone, Debug, Deserialize, XmlSerialize, PartialEq, Eq)]
pub struct MailCustomMetadata {
    #[xml_struct(attribute)]
    #[serde(rename = "@section")]
    section: String,

    #[xml_struct(rename = "a")]
    #[serde(rename = "a", default)]
    pairs: Vec<KeyValuePair>,
}

impl MailCustomMetadata {
    pub fn new(section: impl Into<String>) -> Self {
        Self {
            section: section.into(),
            pairs: Vec::new(),
        }
    }

    pub fn section(&self) -> &str {
        &self.section
    }

    pub fn pairs(&self) -> &[KeyValuePair] {
        &self.pairs
    }

    /// Gets the value stored under `key`, if any.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|pair| pair.key() == key)
            .and_then(KeyValuePair::value)
    }

    pub fn set_pairs(&mut self, pairs: Vec<KeyValuePair>) {
        self.pairs = pairs;
    }

    pub fn add_pair(&mut self, pair: KeyValuePair) {
        self.pairs.push(pair);
    }
}

/// One node of mixed content: either a run of text or a metadata element.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub enum MixedContent {
    #[serde(rename = "$text")]
    Text(String),

    #[serde(rename = "meta")]
    Metadata(MailCustomMetadata),
}

impl XmlSerialize for MixedContent {
    fn serialize_child_nodes<W>(&self, writer: &mut Writer<W>) -> Result<(), zm_xml::Error>
    where
        W: std::io::Write,
    {
        match self {
            Self::Text(text) => writer.write_event(Event::Text(BytesText::new(text)))?,
            Self::Metadata(metadata) => metadata.serialize_as_element(writer, "meta")?,
        }

        Ok(())
    }
}

/// Mixed content carries no fixed shape, so the dynamic binder sees it as raw
/// XML.
impl WireValue for MixedContent {
    fn value_kind() -> ValueKind {
        ValueKind::RawXml
    }
}

/// Free text interleaved with metadata sections, e.g.
/// `<annotation section="notes">Call back<meta section="crm">…</meta></annotation>`.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct Annotation {
    #[serde(rename = "@section", default)]
    section: Option<String>,

    #[serde(rename = "$value", default)]
    content: Vec<MixedContent>,
}

impl Annotation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn section(&self) -> Option<&str> {
        self.section.as_deref()
    }

    pub fn set_section(&mut self, section: Option<String>) {
        self.section = section;
    }

    /// Gets every node of content in document order.
    pub fn content(&self) -> &[MixedContent] {
        &self.content
    }

    pub fn set_content(&mut self, content: Vec<MixedContent>) {
        self.content = content;
    }

    pub fn add_text(&mut self, text: impl Into<String>) {
        self.content.push(MixedContent::Text(text.into()));
    }

    pub fn add_metadata(&mut self, metadata: MailCustomMetadata) {
        self.content.push(MixedContent::Metadata(metadata));
    }

    /// Iterates over the text runs, skipping metadata.
    pub fn text(&self) -> impl Iterator<Item = &str> {
        self.content.iter().filter_map(|node| match node {
            MixedContent::Text(text) => Some(text.as_str()),
            MixedContent::Metadata(_) => None,
        })
    }

    /// Iterates over the metadata sections, skipping text.
    pub fn metadatas(&self) -> impl Iterator<Item = &MailCustomMetadata> {
        self.content.iter().filter_map(|node| match node {
            MixedContent::Metadata(metadata) => Some(metadata),
            MixedContent::Text(_) => None,
        })
    }
}

impl XmlSerialize for Annotation {
    fn serialize_attributes(&self, start_tag: &mut BytesStart) {
        self.section.serialize_as_attribute(start_tag, "section");
    }

    fn serialize_child_nodes<W>(&self, writer: &mut Writer<W>) -> Result<(), zm_xml::Error>
    where
        W: std::io::Write,
    {
        self.content.serialize_child_nodes(writer)
    }
}

/// The dynamic form of an annotation gathers its text runs into a single value
/// and keeps its metadata sections as raw XML, so the interleaving of the two
/// is not preserved.
impl Describe for Annotation {
    const NAME: &'static str = "Annotation";

    fn record_spec() -> RecordTypeSpec {
        RecordTypeSpec::new(Self::NAME)
            .field(FieldDescriptor::attribute("section", "section", ValueKind::String))
            .field(FieldDescriptor::text("text", ValueKind::String))
            .field(FieldDescriptor::any("content"))
    }
}

impl WireValue for Annotation {
    fn value_kind() -> ValueKind {
        ValueKind::NestedRecord(Self::NAME.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use zm_xml::{Registry, Value};

    use super::*;
    use crate::test_utils::{
        assert_deserialized_content, assert_serialized_content, deserialize_from_str,
    };

    fn crm_metadata() -> MailCustomMetadata {
        let mut metadata = MailCustomMetadata::new("crm");
        metadata.add_pair(KeyValuePair::new("id", Some("42".into())));
        metadata.add_pair(KeyValuePair::new("stage", None));

        metadata
    }

    #[test]
    fn metadata_pairs_carry_text_values() {
        let metadata = crm_metadata();
        let expected = r#"<meta section="crm"><a n="id">42</a><a n="stage"/></meta>"#;

        assert_serialized_content(&metadata, "meta", expected);
        assert_deserialized_content(expected, metadata.clone());

        assert_eq!(metadata.get("id"), Some("42"));
        assert_eq!(metadata.get("stage"), None);
        assert_eq!(metadata.get("missing"), None);
    }

    #[test]
    fn pair_value_is_escaped() {
        let pair = KeyValuePair::new("q", Some("a < b & c".into()));

        assert_serialized_content(&pair, "a", r#"<a n="q">a &lt; b &amp; c</a>"#);
        assert_deserialized_content(r#"<a n="q">a &lt; b &amp; c</a>"#, pair);
    }

    #[test]
    fn annotation_keeps_content_order() {
        let mut annotation = Annotation::new();
        annotation.set_section(Some("notes".into()));
        annotation.add_text("Call back");
        annotation.add_metadata(crm_metadata());
        annotation.add_text("before noon");

        let expected = r#"<annotation section="notes">Call back<meta section="crm"><a n="id">42</a><a n="stage"/></meta>before noon</annotation>"#;
        assert_serialized_content(&annotation, "annotation", expected);

        let decoded: Annotation = deserialize_from_str(expected);
        assert_eq!(decoded, annotation);

        let text: Vec<&str> = decoded.text().collect();
        assert_eq!(text, ["Call back", "before noon"]);

        let sections: Vec<&str> = decoded.metadatas().map(MailCustomMetadata::section).collect();
        assert_eq!(sections, ["crm"]);
    }

    #[test]
    fn annotation_without_content_is_empty() {
        let annotation = Annotation::new();
        assert_serialized_content(&annotation, "annotation", "<annotation/>");

        assert_eq!(annotation.text().count(), 0);
        assert_eq!(annotation.metadatas().count(), 0);
    }

    #[test]
    fn dynamic_annotation_captures_metadata_as_raw_xml() -> Result<(), zm_xml::Error> {
        let mut registry = Registry::new();
        registry.register::<Annotation>()?;

        let record = registry.decode(
            "Annotation",
            r#"<annotation section="notes">Call back<meta section="crm"/></annotation>"#,
        )?;

        assert_eq!(record.get("section")?, Some(&Value::from("notes")));
        assert_eq!(record.get("text")?, Some(&Value::from("Call back")));
        assert_eq!(
            record.list("content")?,
            &[Value::RawXml(r#"<meta section="crm"/>"#.into())]
        );

        Ok(())
    }
}
