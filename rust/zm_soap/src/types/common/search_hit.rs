/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! Search parameters and the hits a mail search returns.

use serde::Deserialize;
use zm_xml::{XmlSerialize, ZmBoolean};

/// An item which may appear in the results of a search.
pub trait SearchHit {
    /// The id of the item.
    fn id(&self) -> &str;

    /// The value the hit was sorted by, if the server reported one.
    fn sort_field(&self) -> Option<&str>;
}

/// Which addresses to report on message hits.
#[derive(Clone, Copy, Debug, Deserialize, XmlSerialize, PartialEq, Eq, Hash)]
#[xml_struct(text)]
#[serde(try_from = "String")]
pub enum WantRecipsSetting {
    #[xml_struct(rename = "0")]
    Senders,

    #[xml_struct(rename = "1")]
    Recipients,

    #[xml_struct(rename = "2")]
    Both,

    /// Older clients send a boolean; `false` means senders.
    #[xml_struct(rename = "false")]
    LegacyFalse,

    /// Older clients send a boolean; `true` means recipients.
    #[xml_struct(rename = "true")]
    LegacyTrue,
}

impl WantRecipsSetting {
    /// Maps the legacy boolean forms onto their current equivalents.
    pub fn useful_value(setting: Option<Self>) -> Self {
        match setting {
            None | Some(Self::LegacyFalse) | Some(Self::Senders) => Self::Senders,
            Some(Self::LegacyTrue) | Some(Self::Recipients) => Self::Recipients,
            Some(Self::Both) => Self::Both,
        }
    }
}

/// An email address associated with a message.
#[derive(Clone, Debug, Deserialize, XmlSerialize, PartialEq, Eq)]
pub struct EmailInfo {
    #[xml_struct(attribute, rename = "a")]
    #[serde(rename = "@a")]
    address: String,

    #[xml_struct(attribute, rename = "d")]
    #[serde(rename = "@d")]
    display: Option<String>,

    #[xml_struct(attribute, rename = "p")]
    #[serde(rename = "@p")]
    personal: Option<String>,

    /// The role of the address: `f` from, `t` to, `c` cc, `b` bcc, `r`
    /// reply-to, `s` sender.
    #[xml_struct(attribute, rename = "t")]
    #[serde(rename = "@t")]
    address_type: String,
}

impl EmailInfo {
    pub fn new(address: impl Into<String>, address_type: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            display: None,
            personal: None,
            address_type: address_type.into(),
        }
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn display(&self) -> Option<&str> {
        self.display.as_deref()
    }

    pub fn personal(&self) -> Option<&str> {
        self.personal.as_deref()
    }

    pub fn address_type(&self) -> &str {
        &self.address_type
    }

    pub fn with_display(mut self, display: impl Into<String>) -> Self {
        self.display = Some(display.into());
        self
    }

    pub fn with_personal(mut self, personal: impl Into<String>) -> Self {
        self.personal = Some(personal.into());
        self
    }
}

/// Attributes common to messages, embedded as the base of each kind of message
/// hit.
#[derive(Clone, Debug, Deserialize, XmlSerialize, PartialEq, Eq)]
pub struct MessageInfo {
    #[xml_struct(attribute)]
    #[serde(rename = "@id")]
    id: String,

    #[xml_struct(attribute, rename = "l")]
    #[serde(rename = "@l", default)]
    folder_id: Option<String>,

    #[xml_struct(attribute, rename = "f")]
    #[serde(rename = "@f", default)]
    flags: Option<String>,

    #[xml_struct(attribute, rename = "tn")]
    #[serde(rename = "@tn", default)]
    tag_names: Option<String>,

    #[xml_struct(attribute, rename = "cid")]
    #[serde(rename = "@cid", default)]
    conversation_id: Option<String>,

    /// Date of the message, in milliseconds since the epoch.
    #[xml_struct(attribute, rename = "d")]
    #[serde(rename = "@d", default, deserialize_with = "zm_xml::de::option_from_str")]
    date: Option<i64>,

    /// Size of the message, in bytes.
    #[xml_struct(attribute, rename = "s")]
    #[serde(rename = "@s", default, deserialize_with = "zm_xml::de::option_from_str")]
    size: Option<i64>,

    #[xml_struct(attribute, rename = "rev")]
    #[serde(rename = "@rev", default, deserialize_with = "zm_xml::de::option_from_str")]
    revision: Option<i32>,
}

impl MessageInfo {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            folder_id: None,
            flags: None,
            tag_names: None,
            conversation_id: None,
            date: None,
            size: None,
            revision: None,
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

    /// Whether the flags include `u`, unread.
    pub fn is_unread(&self) -> bool {
        self.flags.as_deref().is_some_and(|flags| flags.contains('u'))
    }

    pub fn tag_names(&self) -> Option<&str> {
        self.tag_names.as_deref()
    }

    pub fn conversation_id(&self) -> Option<&str> {
        self.conversation_id.as_deref()
    }

    pub fn date(&self) -> Option<i64> {
        self.date
    }

    pub fn size(&self) -> Option<i64> {
        self.size
    }

    pub fn revision(&self) -> Option<i32> {
        self.revision
    }

    pub fn set_folder_id(&mut self, folder_id: Option<String>) {
        self.folder_id = folder_id;
    }

    pub fn set_flags(&mut self, flags: Option<String>) {
        self.flags = flags;
    }

    pub fn set_tag_names(&mut self, tag_names: Option<String>) {
        self.tag_names = tag_names;
    }

    pub fn set_conversation_id(&mut self, conversation_id: Option<String>) {
        self.conversation_id = conversation_id;
    }

    pub fn set_date(&mut self, date: Option<i64>) {
        self.date = date;
    }

    pub fn set_size(&mut self, size: Option<i64>) {
        self.size = size;
    }

    pub fn set_revision(&mut self, revision: Option<i32>) {
        self.revision = revision;
    }
}

/// A message matching a search.
#[derive(Clone, Debug, Deserialize, XmlSerialize, PartialEq, Eq)]
#[xml_struct(capability = "SearchHit")]
pub struct MessageHitInfo {
    #[xml_struct(base)]
    #[serde(flatten)]
    message: MessageInfo,

    #[xml_struct(attribute, rename = "sf")]
    #[serde(rename = "@sf")]
    sort_field: Option<String>,

    /// Whether the message content matched the query, as opposed to only its
    /// headers.
    #[xml_struct(attribute, rename = "cm")]
    #[serde(rename = "@cm")]
    content_matched: Option<ZmBoolean>,

    #[xml_struct(rename = "e")]
    #[serde(rename = "e", default)]
    emails: Vec<EmailInfo>,

    #[xml_struct(element, rename = "su")]
    #[serde(rename = "su")]
    subject: Option<String>,

    /// The first few hundred characters of the body.
    #[xml_struct(element, rename = "fr")]
    #[serde(rename = "fr")]
    fragment: Option<String>,
}

impl MessageHitInfo {
    pub fn new(message: MessageInfo) -> Self {
        Self {
            message,
            sort_field: None,
            content_matched: None,
            emails: Vec::new(),
            subject: None,
            fragment: None,
        }
    }

    pub fn message(&self) -> &MessageInfo {
        &self.message
    }

    pub fn content_matched(&self) -> bool {
        ZmBoolean::to_bool_or(self.content_matched, false)
    }

    pub fn emails(&self) -> &[EmailInfo] {
        &self.emails
    }

    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }

    pub fn fragment(&self) -> Option<&str> {
        self.fragment.as_deref()
    }

    pub fn set_sort_field(&mut self, sort_field: Option<String>) {
        self.sort_field = sort_field;
    }

    pub fn set_content_matched(&mut self, content_matched: Option<bool>) {
        self.content_matched = ZmBoolean::from_bool(content_matched);
    }

    pub fn set_emails(&mut self, emails: Vec<EmailInfo>) {
        self.emails = emails;
    }

    pub fn add_email(&mut self, email: EmailInfo) {
        self.emails.push(email);
    }

    pub fn set_subject(&mut self, subject: Option<String>) {
        self.subject = subject;
    }

    pub fn set_fragment(&mut self, fragment: Option<String>) {
        self.fragment = fragment;
    }
}

impl SearchHit for MessageHitInfo {
    fn id(&self) -> &str {
        self.message.id()
    }

    fn sort_field(&self) -> Option<&str> {
        self.sort_field.as_deref()
    }
}

/// A chat transcript matching a search.
#[derive(Clone, Debug, Deserialize, XmlSerialize, PartialEq, Eq)]
#[xml_struct(capability = "SearchHit")]
pub struct ChatHitInfo {
    #[xml_struct(base)]
    #[serde(flatten)]
    message: MessageInfo,

    #[xml_struct(attribute, rename = "sf")]
    #[serde(rename = "@sf")]
    sort_field: Option<String>,

    #[xml_struct(element, rename = "su")]
    #[serde(rename = "su")]
    subject: Option<String>,

    #[xml_struct(element, rename = "fr")]
    #[serde(rename = "fr")]
    fragment: Option<String>,
}

impl ChatHitInfo {
    pub fn new(message: MessageInfo) -> Self {
        Self {
            message,
            sort_field: None,
            subject: None,
            fragment: None,
        }
    }

    pub fn message(&self) -> &MessageInfo {
        &self.message
    }

    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }

    pub fn fragment(&self) -> Option<&str> {
        self.fragment.as_deref()
    }

    pub fn set_sort_field(&mut self, sort_field: Option<String>) {
        self.sort_field = sort_field;
    }

    pub fn set_subject(&mut self, subject: Option<String>) {
        self.subject = subject;
    }

    pub fn set_fragment(&mut self, fragment: Option<String>) {
        self.fragment = fragment;
    }
}

impl SearchHit for ChatHitInfo {
    fn id(&self) -> &str {
        self.message.id()
    }

    fn sort_field(&self) -> Option<&str> {
        self.sort_field.as_deref()
    }
}

/// Any search hit, distinguished by element name.
#[derive(Clone, Debug, Deserialize, XmlSerialize, PartialEq, Eq)]
pub enum SearchHitNode {
    #[xml_struct(rename = "m")]
    #[serde(rename = "m")]
    Message(MessageHitInfo),

    #[xml_struct(rename = "chat")]
    #[serde(rename = "chat")]
    Chat(ChatHitInfo),
}

impl SearchHitNode {
    /// Gets the hit as a [`SearchHit`] regardless of its kind.
    pub fn as_hit(&self) -> &dyn SearchHit {
        match self {
            Self::Message(hit) => hit,
            Self::Chat(hit) => hit,
        }
    }
}

/// Parameters shared by every kind of mail search.
#[derive(Clone, Debug, Default, Deserialize, XmlSerialize, PartialEq, Eq)]
pub struct MailSearchParams {
    /// A comma-separated list of item types to search for, e.g.
    /// `message,conversation`.
    #[xml_struct(attribute, rename = "types")]
    #[serde(rename = "@types")]
    search_types: Option<String>,

    #[xml_struct(attribute)]
    #[serde(rename = "@groupBy")]
    group_by: Option<String>,

    #[xml_struct(attribute)]
    #[serde(rename = "@sortBy")]
    sort_by: Option<String>,

    #[xml_struct(attribute)]
    #[serde(rename = "@limit")]
    limit: Option<i32>,

    #[xml_struct(attribute)]
    #[serde(rename = "@offset")]
    offset: Option<i32>,

    /// Which hits to return with full content: `1`, `all`, `first`, `u` or an
    /// item id.
    #[xml_struct(attribute)]
    #[serde(rename = "@fetch")]
    fetch: Option<String>,

    #[xml_struct(attribute, rename = "read")]
    #[serde(rename = "@read")]
    mark_read: Option<ZmBoolean>,

    #[xml_struct(attribute, rename = "max")]
    #[serde(rename = "@max")]
    max_inlined_length: Option<i32>,

    #[xml_struct(attribute, rename = "html")]
    #[serde(rename = "@html")]
    want_html: Option<ZmBoolean>,

    #[xml_struct(attribute, rename = "needExp")]
    #[serde(rename = "@needExp")]
    need_can_expand: Option<ZmBoolean>,

    #[xml_struct(attribute, rename = "recip")]
    #[serde(rename = "@recip")]
    want_recipients: Option<WantRecipsSetting>,

    #[xml_struct(attribute)]
    #[serde(rename = "@inDumpster")]
    in_dumpster: Option<ZmBoolean>,

    #[xml_struct(attribute)]
    #[serde(rename = "@quick")]
    quick: Option<ZmBoolean>,

    #[xml_struct(element)]
    #[serde(rename = "query")]
    query: Option<String>,

    #[xml_struct(element)]
    #[serde(rename = "locale")]
    locale: Option<String>,
}

impl MailSearchParams {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: Some(query.into()),
            ..Default::default()
        }
    }

    pub fn search_types(&self) -> Option<&str> {
        self.search_types.as_deref()
    }

    pub fn group_by(&self) -> Option<&str> {
        self.group_by.as_deref()
    }

    pub fn sort_by(&self) -> Option<&str> {
        self.sort_by.as_deref()
    }

    pub fn limit(&self) -> Option<i32> {
        self.limit
    }

    pub fn offset(&self) -> Option<i32> {
        self.offset
    }

    pub fn fetch(&self) -> Option<&str> {
        self.fetch.as_deref()
    }

    pub fn mark_read(&self) -> Option<bool> {
        ZmBoolean::to_bool(self.mark_read)
    }

    pub fn max_inlined_length(&self) -> Option<i32> {
        self.max_inlined_length
    }

    pub fn want_html(&self) -> Option<bool> {
        ZmBoolean::to_bool(self.want_html)
    }

    pub fn need_can_expand(&self) -> Option<bool> {
        ZmBoolean::to_bool(self.need_can_expand)
    }

    pub fn want_recipients(&self) -> WantRecipsSetting {
        WantRecipsSetting::useful_value(self.want_recipients)
    }

    pub fn in_dumpster(&self) -> Option<bool> {
        ZmBoolean::to_bool(self.in_dumpster)
    }

    pub fn quick(&self) -> Option<bool> {
        ZmBoolean::to_bool(self.quick)
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn locale(&self) -> Option<&str> {
        self.locale.as_deref()
    }

    pub fn set_search_types(&mut self, search_types: Option<String>) {
        self.search_types = search_types;
    }

    pub fn set_group_by(&mut self, group_by: Option<String>) {
        self.group_by = group_by;
    }

    pub fn set_sort_by(&mut self, sort_by: Option<String>) {
        self.sort_by = sort_by;
    }

    pub fn set_limit(&mut self, limit: Option<i32>) {
        self.limit = limit;
    }

    pub fn set_offset(&mut self, offset: Option<i32>) {
        self.offset = offset;
    }

    pub fn set_fetch(&mut self, fetch: Option<String>) {
        self.fetch = fetch;
    }

    pub fn set_mark_read(&mut self, mark_read: Option<bool>) {
        self.mark_read = ZmBoolean::from_bool(mark_read);
    }

    pub fn set_max_inlined_length(&mut self, max_inlined_length: Option<i32>) {
        self.max_inlined_length = max_inlined_length;
    }

    pub fn set_want_html(&mut self, want_html: Option<bool>) {
        self.want_html = ZmBoolean::from_bool(want_html);
    }

    pub fn set_need_can_expand(&mut self, need_can_expand: Option<bool>) {
        self.need_can_expand = ZmBoolean::from_bool(need_can_expand);
    }

    pub fn set_want_recipients(&mut self, want_recipients: Option<WantRecipsSetting>) {
        self.want_recipients = want_recipients;
    }

    pub fn set_in_dumpster(&mut self, in_dumpster: Option<bool>) {
        self.in_dumpster = ZmBoolean::from_bool(in_dumpster);
    }

    pub fn set_quick(&mut self, quick: Option<bool>) {
        self.quick = ZmBoolean::from_bool(quick);
    }

    pub fn set_query(&mut self, query: Option<String>) {
        self.query = query;
    }

    pub fn set_locale(&mut self, locale: Option<String>) {
        self.locale = locale;
    }
}

#[cfg(test)]
mod tests {
    use zm_xml::{PolymorphicUnion, Registry, Value};

    use super::*;
    use crate::{
        decode_union,
        test_utils::{assert_deserialized_content, assert_serialized_content},
        Error,
    };

    fn lunch_hit() -> MessageHitInfo {
        let mut message = MessageInfo::new("257");
        message.set_folder_id(Some("2".into()));
        message.set_flags(Some("ua".into()));
        message.set_conversation_id(Some("-257".into()));
        message.set_date(Some(1700000000000));
        message.set_size(Some(1482));

        let mut hit = MessageHitInfo::new(message);
        hit.set_sort_field(Some("1700000000000".into()));
        hit.set_content_matched(Some(true));
        hit.add_email(EmailInfo::new("alice@example.com", "f").with_display("Alice"));
        hit.set_subject(Some("Lunch?".into()));
        hit.set_fragment(Some("Are you free at noon".into()));

        hit
    }

    const LUNCH_HIT_XML: &str = concat!(
        r#"<m id="257" l="2" f="ua" cid="-257" d="1700000000000" s="1482" sf="1700000000000" cm="1">"#,
        r#"<e a="alice@example.com" d="Alice" t="f"/>"#,
        r#"<su>Lunch?</su>"#,
        r#"<fr>Are you free at noon</fr>"#,
        r#"</m>"#,
    );

    #[test]
    fn serialize_message_hit() {
        assert_serialized_content(&lunch_hit(), "m", LUNCH_HIT_XML);
    }

    #[test]
    fn deserialize_message_hit() {
        assert_deserialized_content(LUNCH_HIT_XML, lunch_hit());
    }

    #[test]
    fn hits_share_search_hit_behavior() {
        let mut chat = ChatHitInfo::new(MessageInfo::new("300"));
        chat.set_sort_field(Some("b".into()));

        let hits = [
            SearchHitNode::Message(lunch_hit()),
            SearchHitNode::Chat(chat),
        ];

        let ids: Vec<&str> = hits.iter().map(|hit| hit.as_hit().id()).collect();
        assert_eq!(ids, ["257", "300"]);

        let sort_fields: Vec<Option<&str>> =
            hits.iter().map(|hit| hit.as_hit().sort_field()).collect();
        assert_eq!(sort_fields, [Some("1700000000000"), Some("b")]);

        assert!(lunch_hit().message().is_unread());
    }

    #[test]
    fn hit_records_carry_search_hit_capability() -> Result<(), zm_xml::Error> {
        let mut registry = Registry::new();
        let message_hit = registry.register::<MessageHitInfo>()?;
        let chat_hit = registry.register::<ChatHitInfo>()?;
        registry.register::<EmailInfo>()?;

        assert!(message_hit.has_capability("SearchHit"));
        assert!(chat_hit.has_capability("SearchHit"));
        assert!(message_hit.is_a("MessageInfo"));

        let record = registry.decode("MessageHitInfo", LUNCH_HIT_XML)?;
        assert_eq!(record.get("id")?, Some(&Value::from("257")));
        assert_eq!(record.get("size")?, Some(&Value::Long(1482)));
        assert_eq!(record.get("contentMatched")?, Some(&Value::Boolean(true)));
        assert_eq!(record.list("emails")?.len(), 1);

        Ok(())
    }

    #[test]
    fn legacy_recipient_settings_map_to_current_values() {
        assert_eq!(
            WantRecipsSetting::useful_value(Some(WantRecipsSetting::LegacyTrue)),
            WantRecipsSetting::Recipients
        );
        assert_eq!(
            WantRecipsSetting::useful_value(None),
            WantRecipsSetting::Senders
        );

        let params: MailSearchParams =
            crate::test_utils::deserialize_from_str(r#"<params recip="true"><query>in:inbox</query></params>"#);
        assert_eq!(params.want_recipients(), WantRecipsSetting::Recipients);
        assert_eq!(params.query(), Some("in:inbox"));
    }

    #[test]
    fn search_params_write_attributes_before_query() {
        let mut params = MailSearchParams::new("from:alice is:unread");
        params.set_search_types(Some("message".into()));
        params.set_sort_by(Some("dateDesc".into()));
        params.set_limit(Some(25));
        params.set_fetch(Some("1".into()));
        params.set_want_html(Some(false));
        params.set_want_recipients(Some(WantRecipsSetting::Both));

        let expected = r#"<params types="message" sortBy="dateDesc" limit="25" fetch="1" html="0" recip="2"><query>from:alice is:unread</query></params>"#;
        assert_serialized_content(&params, "params", expected);
        assert_deserialized_content(expected, params);
    }

    #[test]
    fn every_hit_tag_decodes_to_its_variant() -> Result<(), Error> {
        let documents = [
            ("m", r#"<m id="257" sf="1700000000000"><su>Lunch?</su></m>"#),
            ("chat", r#"<chat id="301" sf="1700000100000"><fr>brb</fr></chat>"#),
        ];

        let tags: Vec<&str> = documents.iter().map(|(tag, _)| *tag).collect();
        let declared: Vec<&str> = SearchHitNode::VARIANTS.iter().map(|(tag, _)| *tag).collect();
        assert_eq!(tags, declared, "every hit kind should be covered");

        for (tag, xml) in documents {
            let hit: SearchHitNode = decode_union(xml)?;
            assert_eq!(hit.tag_name(), tag, "decoding {xml}");
        }

        let err = decode_union::<SearchHitNode>(r#"<c id="-257"/>"#)
            .expect_err("conversations are not search hits here");
        assert!(
            matches!(err, Error::UnknownVariant { ref union, ref tag } if union == "SearchHitNode" && tag == "c"),
            "unexpected error {err:?}"
        );

        Ok(())
    }
}
