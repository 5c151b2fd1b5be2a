/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use serde::Deserialize;
use zm_xml::{XmlSerialize, ZmBoolean};

use crate::MailCustomMetadata;

/// A single contact field, e.g. `<a n="email">bob@example.com</a>`.
///
/// Attachment fields additionally describe the MIME part holding the data.
#[derive(Clone, Debug, Deserialize, XmlSerialize, PartialEq, Eq)]
pub struct ContactAttr {
    #[xml_struct(attribute, rename = "n")]
    #[serde(rename = "@n")]
    key: String,

    #[xml_struct(attribute)]
    #[serde(rename = "@part")]
    part: Option<String>,

    #[xml_struct(attribute, rename = "ct")]
    #[serde(rename = "@ct")]
    content_type: Option<String>,

    #[xml_struct(attribute, rename = "s")]
    #[serde(rename = "@s")]
    size: Option<i32>,

    #[xml_struct(attribute)]
    #[serde(rename = "@filename")]
    filename: Option<String>,

    #[xml_struct(text)]
    #[serde(rename = "$text", default)]
    value: Option<String>,
}

impl ContactAttr {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            part: None,
            content_type: None,
            size: None,
            filename: None,
            value: Some(value.into()),
        }
    }

    /// Creates a field whose data is held in a MIME part of the contact.
    pub fn attachment(key: impl Into<String>, part: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            part: Some(part.into()),
            content_type: None,
            size: None,
            filename: None,
            value: None,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn part(&self) -> Option<&str> {
        self.part.as_deref()
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    pub fn size(&self) -> Option<i32> {
        self.size
    }

    pub fn filename(&self) -> Option<&str> {
        self.filename.as_deref()
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn set_content_type(&mut self, content_type: Option<String>) {
        self.content_type = content_type;
    }

    pub fn set_size(&mut self, size: Option<i32>) {
        self.size = size;
    }

    pub fn set_filename(&mut self, filename: Option<String>) {
        self.filename = filename;
    }
}

/// A member of a contact group.
#[derive(Clone, Debug, Deserialize, XmlSerialize, PartialEq, Eq)]
pub struct ContactGroupMember {
    /// `C` for a contact reference, `G` for a GAL entry, `I` for an inline
    /// address.
    #[xml_struct(attribute, rename = "type")]
    #[serde(rename = "@type")]
    member_type: String,

    #[xml_struct(attribute)]
    #[serde(rename = "@value")]
    value: String,
}

impl ContactGroupMember {
    pub fn new(member_type: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            member_type: member_type.into(),
            value: value.into(),
        }
    }

    pub fn member_type(&self) -> &str {
        &self.member_type
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

/// A contact or contact group.
#[derive(Clone, Debug, Deserialize, XmlSerialize, PartialEq, Eq)]
pub struct ContactInfo {
    #[xml_struct(attribute)]
    #[serde(rename = "@id")]
    id: String,

    #[xml_struct(attribute, rename = "l")]
    #[serde(rename = "@l")]
    folder_id: Option<String>,

    #[xml_struct(attribute, rename = "f")]
    #[serde(rename = "@f")]
    flags: Option<String>,

    #[xml_struct(attribute, rename = "t")]
    #[serde(rename = "@t")]
    tags: Option<String>,

    /// Modification time, in milliseconds since the epoch.
    #[xml_struct(attribute, rename = "d")]
    #[serde(rename = "@d")]
    date: Option<i64>,

    #[xml_struct(attribute, rename = "rev")]
    #[serde(rename = "@rev")]
    revision: Option<i32>,

    #[xml_struct(attribute, rename = "fileAsStr")]
    #[serde(rename = "@fileAsStr")]
    file_as: Option<String>,

    /// Whether the contact is a group which may be expanded.
    #[xml_struct(attribute, rename = "exp")]
    #[serde(rename = "@exp")]
    can_expand: Option<ZmBoolean>,

    #[xml_struct(rename = "meta")]
    #[serde(rename = "meta", default)]
    metadata: Vec<MailCustomMetadata>,

    #[xml_struct(rename = "a")]
    #[serde(rename = "a", default)]
    attrs: Vec<ContactAttr>,

    #[xml_struct(rename = "m")]
    #[serde(rename = "m", default)]
    members: Vec<ContactGroupMember>,
}

impl ContactInfo {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            folder_id: None,
            flags: None,
            tags: None,
            date: None,
            revision: None,
            file_as: None,
            can_expand: None,
            metadata: Vec::new(),
            attrs: Vec::new(),
            members: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn folder_id(&self) -> Option<&str> {
        self.folder_id.as_deref()
    }

    pub fn flags(&self) -> Option<&str> {
        self.flags.as_deref()
    }

    pub fn tags(&self) -> Option<&str> {
        self.tags.as_deref()
    }

    pub fn date(&self) -> Option<i64> {
        self.date
    }

    pub fn revision(&self) -> Option<i32> {
        self.revision
    }

    pub fn file_as(&self) -> Option<&str> {
        self.file_as.as_deref()
    }

    pub fn can_expand(&self) -> bool {
        ZmBoolean::to_bool_or(self.can_expand, false)
    }

    pub fn metadata(&self) -> &[MailCustomMetadata] {
        &self.metadata
    }

    pub fn attrs(&self) -> &[ContactAttr] {
        &self.attrs
    }

    /// Gets the value of the first field named `key`.
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|attr| attr.key() == key)
            .and_then(ContactAttr::value)
    }

    pub fn members(&self) -> &[ContactGroupMember] {
        &self.members
    }

    pub fn set_folder_id(&mut self, folder_id: Option<String>) {
        self.folder_id = folder_id;
    }

    pub fn set_flags(&mut self, flags: Option<String>) {
        self.flags = flags;
    }

    pub fn set_tags(&mut self, tags: Option<String>) {
        self.tags = tags;
    }

    pub fn set_date(&mut self, date: Option<i64>) {
        self.date = date;
    }

    pub fn set_revision(&mut self, revision: Option<i32>) {
        self.revision = revision;
    }

    pub fn set_file_as(&mut self, file_as: Option<String>) {
        self.file_as = file_as;
    }

    pub fn set_can_expand(&mut self, can_expand: Option<bool>) {
        self.can_expand = ZmBoolean::from_bool(can_expand);
    }

    pub fn set_metadata(&mut self, metadata: Vec<MailCustomMetadata>) {
        self.metadata = metadata;
    }

    pub fn set_attrs(&mut self, attrs: Vec<ContactAttr>) {
        self.attrs = attrs;
    }

    pub fn add_attr(&mut self, attr: ContactAttr) {
        self.attrs.push(attr);
    }

    pub fn set_members(&mut self, members: Vec<ContactGroupMember>) {
        self.members = members;
    }

    pub fn add_member(&mut self, member: ContactGroupMember) {
        self.members.push(member);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{assert_deserialized_content, assert_serialized_content};

    #[test]
    fn contact_round_trips() {
        let mut contact = ContactInfo::new("281");
        contact.set_folder_id(Some("7".into()));
        contact.set_date(Some(1700000000000));
        contact.set_revision(Some(12));
        contact.set_file_as(Some("Doe, Jane".into()));
        contact.add_attr(ContactAttr::new("firstName", "Jane"));
        contact.add_attr(ContactAttr::new("email", "jane@example.com"));

        let mut photo = ContactAttr::attachment("image", "1");
        photo.set_content_type(Some("image/png".into()));
        photo.set_size(Some(2048));
        photo.set_filename(Some("jane.png".into()));
        contact.add_attr(photo);

        let expected = concat!(
            r#"<cn id="281" l="7" d="1700000000000" rev="12" fileAsStr="Doe, Jane">"#,
            r#"<a n="firstName">Jane</a>"#,
            r#"<a n="email">jane@example.com</a>"#,
            r#"<a n="image" part="1" ct="image/png" s="2048" filename="jane.png"/>"#,
            r#"</cn>"#,
        );

        assert_serialized_content(&contact, "cn", expected);
        assert_deserialized_content(expected, contact.clone());

        assert_eq!(contact.attr("email"), Some("jane@example.com"));
        assert_eq!(contact.attr("image"), None, "attachments have no inline value");
        assert!(!contact.can_expand());
    }

    #[test]
    fn contact_group_lists_members() {
        let mut group = ContactInfo::new("300");
        group.set_can_expand(Some(true));
        group.add_attr(ContactAttr::new("type", "group"));
        group.add_member(ContactGroupMember::new("C", "281"));
        group.add_member(ContactGroupMember::new("I", "\"Sam\" <sam@example.org>"));

        let expected = concat!(
            r#"<cn id="300" exp="1">"#,
            r#"<a n="type">group</a>"#,
            r#"<m type="C" value="281"/>"#,
            r#"<m type="I" value="&quot;Sam&quot; &lt;sam@example.org&gt;"/>"#,
            r#"</cn>"#,
        );

        assert_serialized_content(&group, "cn", expected);
        assert_deserialized_content(expected, group.clone());
        assert!(group.can_expand());
    }
}
