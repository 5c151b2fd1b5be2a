/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! Mail filter rules: the tests a message is matched against and the actions
//! taken when it matches.

use serde::Deserialize;
use zm_xml::{XmlSerialize, ZmBoolean};

/// The importance of a message, as matched by an [`ImportanceTest`].
#[derive(Clone, Copy, Debug, Deserialize, XmlSerialize, PartialEq, Eq, Hash)]
#[xml_struct(text)]
#[serde(try_from = "String")]
pub enum Importance {
    #[xml_struct(rename = "high")]
    High,

    #[xml_struct(rename = "normal")]
    Normal,

    #[xml_struct(rename = "low")]
    Low,
}

/// Properties common to every filter test.
#[derive(Clone, Debug, Default, Deserialize, XmlSerialize, PartialEq, Eq)]
pub struct FilterTestInfo {
    /// Position of the test within its rule.
    #[xml_struct(attribute)]
    #[serde(rename = "@index", default, deserialize_with = "zm_xml::de::option_from_str")]
    index: Option<i32>,

    /// Whether the outcome of the test is inverted.
    #[xml_struct(attribute)]
    #[serde(rename = "@negative", default)]
    negative: Option<ZmBoolean>,
}

impl FilterTestInfo {
    pub fn index(&self) -> Option<i32> {
        self.index
    }

    pub fn is_negative(&self) -> bool {
        ZmBoolean::to_bool_or(self.negative, false)
    }

    pub fn set_index(&mut self, index: Option<i32>) {
        self.index = index;
    }

    pub fn set_negative(&mut self, negative: Option<bool>) {
        self.negative = ZmBoolean::from_bool(negative);
    }
}

/// Matches an address in a header, e.g. `from` or `to`.
#[derive(Clone, Debug, Deserialize, XmlSerialize, PartialEq, Eq)]
pub struct AddressTest {
    #[xml_struct(base)]
    #[serde(flatten)]
    info: FilterTestInfo,

    /// A comma-separated list of header names.
    #[xml_struct(attribute)]
    #[serde(rename = "@header")]
    header: String,

    /// The part of the address compared: `all`, `localpart` or `domain`.
    #[xml_struct(attribute)]
    #[serde(rename = "@part")]
    part: String,

    #[xml_struct(attribute)]
    #[serde(rename = "@stringComparison")]
    string_comparison: String,

    #[xml_struct(attribute)]
    #[serde(rename = "@caseSensitive", default)]
    case_sensitive: Option<ZmBoolean>,

    #[xml_struct(attribute)]
    #[serde(rename = "@value")]
    value: String,
}

impl AddressTest {
    pub fn new(
        header: impl Into<String>,
        part: impl Into<String>,
        string_comparison: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            info: FilterTestInfo::default(),
            header: header.into(),
            part: part.into(),
            string_comparison: string_comparison.into(),
            case_sensitive: None,
            value: value.into(),
        }
    }

    pub fn info(&self) -> &FilterTestInfo {
        &self.info
    }

    pub fn info_mut(&mut self) -> &mut FilterTestInfo {
        &mut self.info
    }

    pub fn header(&self) -> &str {
        &self.header
    }

    pub fn part(&self) -> &str {
        &self.part
    }

    pub fn string_comparison(&self) -> &str {
        &self.string_comparison
    }

    pub fn is_case_sensitive(&self) -> bool {
        ZmBoolean::to_bool_or(self.case_sensitive, false)
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn set_case_sensitive(&mut self, case_sensitive: Option<bool>) {
        self.case_sensitive = ZmBoolean::from_bool(case_sensitive);
    }
}

/// Matches the value of a header.
#[derive(Clone, Debug, Default, Deserialize, XmlSerialize, PartialEq, Eq)]
pub struct HeaderTest {
    #[xml_struct(base)]
    #[serde(flatten)]
    info: FilterTestInfo,

    #[xml_struct(attribute)]
    #[serde(rename = "@header")]
    header: Option<String>,

    #[xml_struct(attribute)]
    #[serde(rename = "@stringComparison")]
    string_comparison: Option<String>,

    #[xml_struct(attribute)]
    #[serde(rename = "@caseSensitive", default)]
    case_sensitive: Option<ZmBoolean>,

    #[xml_struct(attribute)]
    #[serde(rename = "@value")]
    value: Option<String>,
}

impl HeaderTest {
    pub fn new(
        header: impl Into<String>,
        string_comparison: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            header: Some(header.into()),
            string_comparison: Some(string_comparison.into()),
            value: Some(value.into()),
            ..Default::default()
        }
    }

    pub fn info(&self) -> &FilterTestInfo {
        &self.info
    }

    pub fn info_mut(&mut self) -> &mut FilterTestInfo {
        &mut self.info
    }

    pub fn header(&self) -> Option<&str> {
        self.header.as_deref()
    }

    pub fn string_comparison(&self) -> Option<&str> {
        self.string_comparison.as_deref()
    }

    pub fn is_case_sensitive(&self) -> bool {
        ZmBoolean::to_bool_or(self.case_sensitive, false)
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn set_case_sensitive(&mut self, case_sensitive: Option<bool>) {
        self.case_sensitive = ZmBoolean::from_bool(case_sensitive);
    }
}

/// Matches messages carrying a header, whatever its value.
#[derive(Clone, Debug, Deserialize, XmlSerialize, PartialEq, Eq)]
pub struct HeaderExistsTest {
    #[xml_struct(base)]
    #[serde(flatten)]
    info: FilterTestInfo,

    #[xml_struct(attribute)]
    #[serde(rename = "@header")]
    header: String,
}

impl HeaderExistsTest {
    pub fn new(header: impl Into<String>) -> Self {
        Self {
            info: FilterTestInfo::default(),
            header: header.into(),
        }
    }

    pub fn info(&self) -> &FilterTestInfo {
        &self.info
    }

    pub fn info_mut(&mut self) -> &mut FilterTestInfo {
        &mut self.info
    }

    pub fn header(&self) -> &str {
        &self.header
    }
}

/// Matches the size of a message.
#[derive(Clone, Debug, Default, Deserialize, XmlSerialize, PartialEq, Eq)]
pub struct SizeTest {
    #[xml_struct(base)]
    #[serde(flatten)]
    info: FilterTestInfo,

    /// `over` or `under`.
    #[xml_struct(attribute)]
    #[serde(rename = "@numberComparison")]
    number_comparison: Option<String>,

    /// The size to compare against, with an optional unit suffix, e.g. `10M`.
    #[xml_struct(attribute, rename = "s")]
    #[serde(rename = "@s")]
    size: Option<String>,
}

impl SizeTest {
    pub fn new(number_comparison: impl Into<String>, size: impl Into<String>) -> Self {
        Self {
            info: FilterTestInfo::default(),
            number_comparison: Some(number_comparison.into()),
            size: Some(size.into()),
        }
    }

    pub fn info(&self) -> &FilterTestInfo {
        &self.info
    }

    pub fn info_mut(&mut self) -> &mut FilterTestInfo {
        &mut self.info
    }

    pub fn number_comparison(&self) -> Option<&str> {
        self.number_comparison.as_deref()
    }

    pub fn size(&self) -> Option<&str> {
        self.size.as_deref()
    }
}

/// Matches text in the body of a message.
#[derive(Clone, Debug, Default, Deserialize, XmlSerialize, PartialEq, Eq)]
pub struct BodyTest {
    #[xml_struct(base)]
    #[serde(flatten)]
    info: FilterTestInfo,

    #[xml_struct(attribute)]
    #[serde(rename = "@value")]
    value: Option<String>,

    #[xml_struct(attribute)]
    #[serde(rename = "@caseSensitive", default)]
    case_sensitive: Option<ZmBoolean>,
}

impl BodyTest {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
            ..Default::default()
        }
    }

    pub fn info(&self) -> &FilterTestInfo {
        &self.info
    }

    pub fn info_mut(&mut self) -> &mut FilterTestInfo {
        &mut self.info
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn is_case_sensitive(&self) -> bool {
        ZmBoolean::to_bool_or(self.case_sensitive, false)
    }

    pub fn set_case_sensitive(&mut self, case_sensitive: Option<bool>) {
        self.case_sensitive = ZmBoolean::from_bool(case_sensitive);
    }
}

#[derive(Clone, Debug, Deserialize, XmlSerialize, PartialEq, Eq)]
pub struct ImportanceTest {
    #[xml_struct(base)]
    #[serde(flatten)]
    info: FilterTestInfo,

    #[xml_struct(attribute, rename = "imp")]
    #[serde(rename = "@imp")]
    importance: Importance,
}

impl ImportanceTest {
    pub fn new(importance: Importance) -> Self {
        Self {
            info: FilterTestInfo::default(),
            importance,
        }
    }

    pub fn info(&self) -> &FilterTestInfo {
        &self.info
    }

    pub fn info_mut(&mut self) -> &mut FilterTestInfo {
        &mut self.info
    }

    pub fn importance(&self) -> Importance {
        self.importance
    }
}

/// Matches calendar invitations, optionally only those with given methods.
#[derive(Clone, Debug, Default, Deserialize, XmlSerialize, PartialEq, Eq)]
pub struct InviteTest {
    #[xml_struct(base)]
    #[serde(flatten)]
    info: FilterTestInfo,

    #[xml_struct(rename = "method")]
    #[serde(rename = "method", default)]
    methods: Vec<String>,
}

impl InviteTest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn info(&self) -> &FilterTestInfo {
        &self.info
    }

    pub fn info_mut(&mut self) -> &mut FilterTestInfo {
        &mut self.info
    }

    pub fn methods(&self) -> &[String] {
        &self.methods
    }

    pub fn add_method(&mut self, method: impl Into<String>) {
        self.methods.push(method.into());
    }
}

/// Matches every message.
#[derive(Clone, Debug, Default, Deserialize, XmlSerialize, PartialEq, Eq)]
pub struct TrueTest {
    #[xml_struct(base)]
    #[serde(flatten)]
    info: FilterTestInfo,
}

impl TrueTest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn info(&self) -> &FilterTestInfo {
        &self.info
    }
}

/// Any filter test, distinguished by element name.
#[derive(Clone, Debug, Deserialize, XmlSerialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum FilterTest {
    AddressTest(AddressTest),
    HeaderTest(HeaderTest),
    HeaderExistsTest(HeaderExistsTest),
    SizeTest(SizeTest),
    BodyTest(BodyTest),
    ImportanceTest(ImportanceTest),
    InviteTest(InviteTest),
    TrueTest(TrueTest),
}

impl FilterTest {
    /// Gets the properties shared by every kind of test.
    pub fn info(&self) -> &FilterTestInfo {
        match self {
            Self::AddressTest(test) => test.info(),
            Self::HeaderTest(test) => test.info(),
            Self::HeaderExistsTest(test) => test.info(),
            Self::SizeTest(test) => test.info(),
            Self::BodyTest(test) => test.info(),
            Self::ImportanceTest(test) => test.info(),
            Self::InviteTest(test) => test.info(),
            Self::TrueTest(test) => test.info(),
        }
    }
}

/// The tests of a rule and how their outcomes combine.
#[derive(Clone, Debug, Deserialize, XmlSerialize, PartialEq, Eq)]
pub struct FilterTests {
    /// `allof` or `anyof`.
    #[xml_struct(attribute)]
    #[serde(rename = "@condition")]
    condition: String,

    #[xml_struct(flatten)]
    #[serde(rename = "$value", default)]
    tests: Vec<FilterTest>,
}

impl FilterTests {
    /// Creates tests which match when every test matches.
    pub fn all_of() -> Self {
        Self::with_condition("allof")
    }

    /// Creates tests which match when any test matches.
    pub fn any_of() -> Self {
        Self::with_condition("anyof")
    }

    fn with_condition(condition: &str) -> Self {
        Self {
            condition: condition.to_owned(),
            tests: Vec::new(),
        }
    }

    pub fn condition(&self) -> &str {
        &self.condition
    }

    pub fn tests(&self) -> &[FilterTest] {
        &self.tests
    }

    pub fn add_test(&mut self, test: FilterTest) {
        self.tests.push(test);
    }
}

/// Properties common to every filter action.
#[derive(Clone, Debug, Default, Deserialize, XmlSerialize, PartialEq, Eq)]
pub struct FilterActionInfo {
    #[xml_struct(attribute)]
    #[serde(rename = "@index", default, deserialize_with = "zm_xml::de::option_from_str")]
    index: Option<i32>,
}

impl FilterActionInfo {
    pub fn index(&self) -> Option<i32> {
        self.index
    }

    pub fn set_index(&mut self, index: Option<i32>) {
        self.index = index;
    }
}

/// Delivers the message to the inbox.
#[derive(Clone, Debug, Default, Deserialize, XmlSerialize, PartialEq, Eq)]
pub struct KeepAction {
    #[xml_struct(base)]
    #[serde(flatten)]
    info: FilterActionInfo,
}

#[derive(Clone, Debug, Default, Deserialize, XmlSerialize, PartialEq, Eq)]
pub struct DiscardAction {
    #[xml_struct(base)]
    #[serde(flatten)]
    info: FilterActionInfo,
}

/// Stops evaluation of any further rules.
#[derive(Clone, Debug, Default, Deserialize, XmlSerialize, PartialEq, Eq)]
pub struct StopAction {
    #[xml_struct(base)]
    #[serde(flatten)]
    info: FilterActionInfo,
}

/// Files the message into a folder.
#[derive(Clone, Debug, Deserialize, XmlSerialize, PartialEq, Eq)]
pub struct FileIntoAction {
    #[xml_struct(base)]
    #[serde(flatten)]
    info: FilterActionInfo,

    #[xml_struct(attribute)]
    #[serde(rename = "@folderPath")]
    folder_path: String,

    /// Whether a copy is also kept in the inbox.
    #[xml_struct(attribute)]
    #[serde(rename = "@copy", default)]
    copy: Option<ZmBoolean>,
}

impl FileIntoAction {
    pub fn new(folder_path: impl Into<String>) -> Self {
        Self {
            info: FilterActionInfo::default(),
            folder_path: folder_path.into(),
            copy: None,
        }
    }

    pub fn folder_path(&self) -> &str {
        &self.folder_path
    }

    pub fn is_copy(&self) -> bool {
        ZmBoolean::to_bool_or(self.copy, false)
    }

    pub fn set_copy(&mut self, copy: Option<bool>) {
        self.copy = ZmBoolean::from_bool(copy);
    }
}

#[derive(Clone, Debug, Deserialize, XmlSerialize, PartialEq, Eq)]
pub struct TagAction {
    #[xml_struct(base)]
    #[serde(flatten)]
    info: FilterActionInfo,

    #[xml_struct(attribute)]
    #[serde(rename = "@tagName")]
    tag_name: String,
}

impl TagAction {
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            info: FilterActionInfo::default(),
            tag_name: tag_name.into(),
        }
    }

    pub fn tag_name(&self) -> &str {
        &self.tag_name
    }
}

#[derive(Clone, Debug, Deserialize, XmlSerialize, PartialEq, Eq)]
pub struct FlagAction {
    #[xml_struct(base)]
    #[serde(flatten)]
    info: FilterActionInfo,

    /// `flagged` or `read`.
    #[xml_struct(attribute)]
    #[serde(rename = "@flagName")]
    flag_name: String,
}

impl FlagAction {
    pub fn new(flag_name: impl Into<String>) -> Self {
        Self {
            info: FilterActionInfo::default(),
            flag_name: flag_name.into(),
        }
    }

    pub fn flag_name(&self) -> &str {
        &self.flag_name
    }
}

/// Redirects the message to another address.
#[derive(Clone, Debug, Deserialize, XmlSerialize, PartialEq, Eq)]
pub struct RedirectAction {
    #[xml_struct(base)]
    #[serde(flatten)]
    info: FilterActionInfo,

    #[xml_struct(attribute, rename = "a")]
    #[serde(rename = "@a")]
    address: String,

    #[xml_struct(attribute)]
    #[serde(rename = "@copy", default)]
    copy: Option<ZmBoolean>,
}

impl RedirectAction {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            info: FilterActionInfo::default(),
            address: address.into(),
            copy: None,
        }
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn is_copy(&self) -> bool {
        ZmBoolean::to_bool_or(self.copy, false)
    }

    pub fn set_copy(&mut self, copy: Option<bool>) {
        self.copy = ZmBoolean::from_bool(copy);
    }
}

/// Replies to the sender with a fixed body.
#[derive(Clone, Debug, Deserialize, XmlSerialize, PartialEq, Eq)]
pub struct ReplyAction {
    #[xml_struct(base)]
    #[serde(flatten)]
    info: FilterActionInfo,

    #[xml_struct(element)]
    #[serde(rename = "content")]
    content: String,
}

impl ReplyAction {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            info: FilterActionInfo::default(),
            content: content.into(),
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

/// Sends a notification message about the filtered message.
#[derive(Clone, Debug, Deserialize, XmlSerialize, PartialEq, Eq)]
pub struct NotifyAction {
    #[xml_struct(base)]
    #[serde(flatten)]
    info: FilterActionInfo,

    #[xml_struct(attribute, rename = "a")]
    #[serde(rename = "@a")]
    address: String,

    #[xml_struct(attribute, rename = "su")]
    #[serde(rename = "@su")]
    subject: Option<String>,

    /// Maximum number of bytes of the original body to include.
    #[xml_struct(attribute)]
    #[serde(rename = "@maxBodySize")]
    max_body_size: Option<i32>,

    #[xml_struct(element)]
    #[serde(rename = "content")]
    content: Option<String>,
}

impl NotifyAction {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            info: FilterActionInfo::default(),
            address: address.into(),
            subject: None,
            max_body_size: None,
            content: None,
        }
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }

    pub fn max_body_size(&self) -> Option<i32> {
        self.max_body_size
    }

    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    pub fn set_subject(&mut self, subject: Option<String>) {
        self.subject = subject;
    }

    pub fn set_max_body_size(&mut self, max_body_size: Option<i32>) {
        self.max_body_size = max_body_size;
    }

    pub fn set_content(&mut self, content: Option<String>) {
        self.content = content;
    }
}

/// Any filter action, distinguished by element name.
#[derive(Clone, Debug, Deserialize, XmlSerialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum FilterAction {
    ActionKeep(KeepAction),
    ActionDiscard(DiscardAction),
    ActionFileInto(FileIntoAction),
    ActionTag(TagAction),
    ActionFlag(FlagAction),
    ActionRedirect(RedirectAction),
    ActionReply(ReplyAction),
    ActionNotify(NotifyAction),
    ActionStop(StopAction),
}

impl FilterAction {
    pub fn keep() -> Self {
        Self::ActionKeep(KeepAction::default())
    }

    pub fn discard() -> Self {
        Self::ActionDiscard(DiscardAction::default())
    }

    pub fn stop() -> Self {
        Self::ActionStop(StopAction::default())
    }
}

/// A named filter rule.
#[derive(Clone, Debug, Deserialize, XmlSerialize, PartialEq, Eq)]
pub struct FilterRule {
    #[xml_struct(attribute)]
    #[serde(rename = "@name")]
    name: String,

    #[xml_struct(attribute)]
    #[serde(rename = "@active")]
    active: ZmBoolean,

    #[xml_struct(element, rename = "filterTests")]
    #[serde(rename = "filterTests")]
    tests: FilterTests,

    #[xml_struct(flatten, wrapper = "filterActions")]
    #[serde(rename = "filterActions", default, deserialize_with = "zm_xml::de::wrapped")]
    actions: Vec<FilterAction>,
}

impl FilterRule {
    pub fn new(name: impl Into<String>, active: bool, tests: FilterTests) -> Self {
        Self {
            name: name.into(),
            active: ZmBoolean::from(active),
            tests,
            actions: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_active(&self) -> bool {
        self.active.value()
    }

    pub fn tests(&self) -> &FilterTests {
        &self.tests
    }

    pub fn actions(&self) -> &[FilterAction] {
        &self.actions
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = ZmBoolean::from(active);
    }

    pub fn set_actions(&mut self, actions: Vec<FilterAction>) {
        self.actions = actions;
    }

    pub fn add_action(&mut self, action: FilterAction) {
        self.actions.push(action);
    }
}

#[cfg(test)]
mod tests {
    use zm_xml::{PolymorphicUnion, Registry, Value, WireEnum};

    use super::*;
    use crate::{
        decode_union,
        test_utils::{
            assert_deserialized_content, assert_serialized_content, deserialize_from_str,
            serialize_to_string,
        },
        Error,
    };

    const NEWSLETTER_RULE_XML: &str = concat!(
        r#"<filterRule name="Newsletters" active="1">"#,
        r#"<filterTests condition="anyof">"#,
        r#"<headerExistsTest index="0" header="List-Id"/>"#,
        r#"<addressTest index="1" negative="1" header="from" part="domain" stringComparison="is" value="example.com"/>"#,
        r#"<sizeTest index="2" numberComparison="over" s="1M"/>"#,
        r#"<importanceTest imp="low"/>"#,
        r#"<inviteTest><method>REQUEST</method><method>CANCEL</method></inviteTest>"#,
        r#"</filterTests>"#,
        r#"<filterActions>"#,
        r#"<actionFileInto index="0" folderPath="Inbox/Newsletters" copy="0"/>"#,
        r#"<actionFlag flagName="read"/>"#,
        r#"<actionNotify a="me@example.com" su="Filed" maxBodySize="512"><content>A newsletter arrived</content></actionNotify>"#,
        r#"<actionStop/>"#,
        r#"</filterActions>"#,
        r#"</filterRule>"#,
    );

    fn newsletter_rule() -> FilterRule {
        let mut tests = FilterTests::any_of();

        let mut exists = HeaderExistsTest::new("List-Id");
        exists.info_mut().set_index(Some(0));
        tests.add_test(FilterTest::HeaderExistsTest(exists));

        let mut address = AddressTest::new("from", "domain", "is", "example.com");
        address.info_mut().set_index(Some(1));
        address.info_mut().set_negative(Some(true));
        tests.add_test(FilterTest::AddressTest(address));

        let mut size = SizeTest::new("over", "1M");
        size.info_mut().set_index(Some(2));
        tests.add_test(FilterTest::SizeTest(size));

        tests.add_test(FilterTest::ImportanceTest(ImportanceTest::new(Importance::Low)));

        let mut invite = InviteTest::new();
        invite.add_method("REQUEST");
        invite.add_method("CANCEL");
        tests.add_test(FilterTest::InviteTest(invite));

        let mut rule = FilterRule::new("Newsletters", true, tests);

        let mut file_into = FileIntoAction::new("Inbox/Newsletters");
        file_into.info.set_index(Some(0));
        file_into.set_copy(Some(false));
        rule.add_action(FilterAction::ActionFileInto(file_into));

        rule.add_action(FilterAction::ActionFlag(FlagAction::new("read")));

        let mut notify = NotifyAction::new("me@example.com");
        notify.set_subject(Some("Filed".into()));
        notify.set_max_body_size(Some(512));
        notify.set_content(Some("A newsletter arrived".into()));
        rule.add_action(FilterAction::ActionNotify(notify));

        rule.add_action(FilterAction::stop());

        rule
    }

    #[test]
    fn serialize_filter_rule() {
        assert_serialized_content(&newsletter_rule(), "filterRule", NEWSLETTER_RULE_XML);
    }

    #[test]
    fn deserialize_filter_rule() {
        assert_deserialized_content(NEWSLETTER_RULE_XML, newsletter_rule());
    }

    #[test]
    fn test_info_reads_through_union() {
        let rule: FilterRule = deserialize_from_str(NEWSLETTER_RULE_XML);

        let negated: Vec<bool> = rule
            .tests()
            .tests()
            .iter()
            .map(|test| test.info().is_negative())
            .collect();
        assert_eq!(negated, [false, true, false, false, false]);

        let indices: Vec<Option<i32>> = rule
            .tests()
            .tests()
            .iter()
            .map(|test| test.info().index())
            .collect();
        assert_eq!(indices, [Some(0), Some(1), Some(2), None, None]);
    }

    #[test]
    fn rule_without_actions_omits_wrapper() {
        let mut tests = FilterTests::all_of();
        tests.add_test(FilterTest::TrueTest(TrueTest::new()));
        let mut rule = FilterRule::new("Everything", false, tests);

        let expected = r#"<filterRule name="Everything" active="0"><filterTests condition="allof"><trueTest/></filterTests></filterRule>"#;
        assert_serialized_content(&rule, "filterRule", expected);
        assert_deserialized_content(expected, rule.clone());

        rule.add_action(FilterAction::keep());
        rule.add_action(FilterAction::discard());
        assert_serialized_content(
            &rule,
            "filterRule",
            r#"<filterRule name="Everything" active="0"><filterTests condition="allof"><trueTest/></filterTests><filterActions><actionKeep/><actionDiscard/></filterActions></filterRule>"#,
        );
    }

    #[test]
    fn reply_content_is_escaped() {
        let action = FilterAction::ActionReply(ReplyAction::new("Away until <Monday> & after"));
        let mut tests = FilterTests::all_of();
        tests.add_test(FilterTest::BodyTest(BodyTest::new("urgent")));
        let mut rule = FilterRule::new("Away", true, tests);
        rule.add_action(action);

        let expected = r#"<filterRule name="Away" active="1"><filterTests condition="allof"><bodyTest value="urgent"/></filterTests><filterActions><actionReply><content>Away until &lt;Monday&gt; &amp; after</content></actionReply></filterActions></filterRule>"#;
        assert_serialized_content(&rule, "filterRule", expected);
        assert_deserialized_content(expected, rule);
    }

    #[test]
    fn union_tags_follow_variant_names() {
        assert_eq!(
            FilterTest::VARIANTS.iter().map(|(tag, _)| *tag).collect::<Vec<_>>(),
            [
                "addressTest",
                "headerTest",
                "headerExistsTest",
                "sizeTest",
                "bodyTest",
                "importanceTest",
                "inviteTest",
                "trueTest",
            ]
        );
        assert!(FilterAction::is_variant_tag("actionFileInto"));
        assert!(!FilterAction::is_variant_tag("actionFileinto"));
    }

    #[test]
    fn dynamic_rule_agrees_with_typed_rule() -> Result<(), zm_xml::Error> {
        let mut registry = Registry::new();
        registry.register::<FilterRule>()?;
        registry.register::<FilterTests>()?;
        registry.register::<FilterTestInfo>()?;
        registry.register::<AddressTest>()?;
        registry.register::<HeaderTest>()?;
        registry.register::<HeaderExistsTest>()?;
        registry.register::<SizeTest>()?;
        registry.register::<BodyTest>()?;
        registry.register::<ImportanceTest>()?;
        registry.register::<InviteTest>()?;
        registry.register::<TrueTest>()?;
        registry.register::<FilterActionInfo>()?;
        registry.register::<KeepAction>()?;
        registry.register::<DiscardAction>()?;
        registry.register::<FileIntoAction>()?;
        registry.register::<TagAction>()?;
        registry.register::<FlagAction>()?;
        registry.register::<RedirectAction>()?;
        registry.register::<ReplyAction>()?;
        registry.register::<NotifyAction>()?;
        registry.register::<StopAction>()?;
        registry.register_enum::<Importance>()?;
        registry.register_union::<FilterTest>()?;
        registry.register_union::<FilterAction>()?;

        let record = registry.decode("FilterRule", NEWSLETTER_RULE_XML)?;
        assert_eq!(record.get("active")?, Some(&Value::Boolean(true)));

        let actions = record.list("actions")?;
        assert_eq!(actions.len(), 4);

        let file_into = actions[0].as_record().expect("actions are records");
        assert_eq!(file_into.type_name(), "FileIntoAction");
        assert_eq!(file_into.get("index")?, Some(&Value::Integer(0)));
        assert_eq!(file_into.get("copy")?, Some(&Value::Boolean(false)));

        let encoded = registry.encode(&record, "filterRule")?;
        assert_eq!(encoded, serialize_to_string(&newsletter_rule(), "filterRule"));

        Ok(())
    }

    #[test]
    fn every_action_tag_decodes_to_its_variant() -> Result<(), Error> {
        let documents = [
            ("actionKeep", r#"<actionKeep/>"#),
            ("actionDiscard", r#"<actionDiscard/>"#),
            ("actionFileInto", r#"<actionFileInto folderPath="Junk"/>"#),
            ("actionTag", r#"<actionTag tagName="work"/>"#),
            ("actionFlag", r#"<actionFlag flagName="flagged"/>"#),
            ("actionRedirect", r#"<actionRedirect a="archive@example.com"/>"#),
            ("actionReply", r#"<actionReply><content>Away</content></actionReply>"#),
            ("actionNotify", r#"<actionNotify a="me@example.com"/>"#),
            ("actionStop", r#"<actionStop/>"#),
        ];

        let tags: Vec<&str> = documents.iter().map(|(tag, _)| *tag).collect();
        let declared: Vec<&str> = FilterAction::VARIANTS.iter().map(|(tag, _)| *tag).collect();
        assert_eq!(tags, declared, "every action should be covered");

        for (tag, xml) in documents {
            let action: FilterAction = decode_union(xml)?;
            assert_eq!(action.tag_name(), tag, "decoding {xml}");
        }

        Ok(())
    }

    #[test]
    fn every_test_tag_decodes_to_its_variant() -> Result<(), Error> {
        let documents = [
            (
                "addressTest",
                r#"<addressTest header="to" part="all" stringComparison="is" value="me@example.com"/>"#,
            ),
            ("headerTest", r#"<headerTest header="subject"/>"#),
            ("headerExistsTest", r#"<headerExistsTest header="List-Id"/>"#),
            ("sizeTest", r#"<sizeTest numberComparison="under" s="10K"/>"#),
            ("bodyTest", r#"<bodyTest value="invoice"/>"#),
            ("importanceTest", r#"<importanceTest imp="high"/>"#),
            ("inviteTest", r#"<inviteTest/>"#),
            ("trueTest", r#"<trueTest/>"#),
        ];

        let tags: Vec<&str> = documents.iter().map(|(tag, _)| *tag).collect();
        let declared: Vec<&str> = FilterTest::VARIANTS.iter().map(|(tag, _)| *tag).collect();
        assert_eq!(tags, declared, "every test should be covered");

        for (tag, xml) in documents {
            let test: FilterTest = decode_union(xml)?;
            assert_eq!(test.tag_name(), tag, "decoding {xml}");
        }

        Ok(())
    }

    #[test]
    fn unknown_tags_in_rule_lists_are_rejected() {
        let documents = [
            (
                "actionBogus",
                concat!(
                    r#"<filterRule name="Bad" active="1">"#,
                    r#"<filterTests condition="allof"><trueTest/></filterTests>"#,
                    r#"<filterActions><actionKeep/><actionBogus/></filterActions>"#,
                    r#"</filterRule>"#,
                ),
            ),
            (
                "bogusTest",
                concat!(
                    r#"<filterRule name="Bad" active="1">"#,
                    r#"<filterTests condition="anyof"><bogusTest header="x"/></filterTests>"#,
                    r#"</filterRule>"#,
                ),
            ),
        ];

        for (tag, xml) in documents {
            let err = quick_xml::de::from_str::<FilterRule>(xml)
                .expect_err("an unknown element should not decode");
            assert!(
                err.to_string().contains(&format!("`{tag}`")),
                "error for `{tag}` should name it, got {err}"
            );
        }
    }

    #[test]
    fn importance_tokens_are_reversible() {
        for importance in [Importance::High, Importance::Normal, Importance::Low] {
            let token = importance.to_token();
            assert_eq!(Importance::from_token(token), Ok(importance));
        }
        assert_eq!(Importance::TOKENS, ["high", "normal", "low"]);
        assert!(Importance::from_token("urgent").is_err());
    }
}
