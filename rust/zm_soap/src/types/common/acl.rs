/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! Access control lists shared on folders.

use serde::Deserialize;
use zm_xml::XmlSerialize;

/// The kind of principal a [`Grant`] is issued to.
#[derive(Clone, Copy, Debug, Deserialize, XmlSerialize, PartialEq, Eq, Hash)]
#[xml_struct(text)]
#[serde(try_from = "String")]
pub enum GranteeType {
    #[xml_struct(rename = "usr")]
    User,

    #[xml_struct(rename = "grp")]
    Group,

    /// Any authenticated user.
    #[xml_struct(rename = "all")]
    AuthUser,

    #[xml_struct(rename = "dom")]
    Domain,

    /// A class of service.
    #[xml_struct(rename = "cos")]
    Cos,

    /// A non-Zimbra user identified by email address and password.
    #[xml_struct(rename = "guest")]
    Guest,

    /// A non-Zimbra user identified by an access key.
    #[xml_struct(rename = "key")]
    Key,

    /// The public, i.e. no authentication required.
    #[xml_struct(rename = "pub")]
    Public,
}

/// A single permission grant on an item.
#[derive(Clone, Debug, Deserialize, XmlSerialize, PartialEq, Eq)]
pub struct Grant {
    /// The granted rights, e.g. `rwidx`: read, write, insert, delete,
    /// administer.
    #[xml_struct(attribute, rename = "perm")]
    #[serde(rename = "@perm")]
    rights: String,

    #[xml_struct(attribute, rename = "gt")]
    #[serde(rename = "@gt")]
    grantee_type: GranteeType,

    #[xml_struct(attribute, rename = "zid")]
    #[serde(rename = "@zid")]
    grantee_id: Option<String>,

    #[xml_struct(attribute, rename = "d")]
    #[serde(rename = "@d")]
    grantee_name: Option<String>,

    /// Time when the grant expires, in milliseconds since the epoch.
    #[xml_struct(attribute)]
    #[serde(rename = "@expiry")]
    expiry: Option<i64>,

    /// The password of a guest grantee.
    #[xml_struct(attribute, rename = "pw")]
    #[serde(rename = "@pw")]
    guest_password: Option<String>,

    /// The access key of a key grantee.
    #[xml_struct(attribute, rename = "key")]
    #[serde(rename = "@key")]
    access_key: Option<String>,
}

impl Grant {
    pub fn new(rights: impl Into<String>, grantee_type: GranteeType) -> Self {
        Self {
            rights: rights.into(),
            grantee_type,
            grantee_id: None,
            grantee_name: None,
            expiry: None,
            guest_password: None,
            access_key: None,
        }
    }

    pub fn rights(&self) -> &str {
        &self.rights
    }

    pub fn grantee_type(&self) -> GranteeType {
        self.grantee_type
    }

    pub fn grantee_id(&self) -> Option<&str> {
        self.grantee_id.as_deref()
    }

    pub fn grantee_name(&self) -> Option<&str> {
        self.grantee_name.as_deref()
    }

    pub fn expiry(&self) -> Option<i64> {
        self.expiry
    }

    pub fn guest_password(&self) -> Option<&str> {
        self.guest_password.as_deref()
    }

    pub fn access_key(&self) -> Option<&str> {
        self.access_key.as_deref()
    }

    pub fn with_grantee_id(mut self, grantee_id: impl Into<String>) -> Self {
        self.grantee_id = Some(grantee_id.into());
        self
    }

    pub fn with_grantee_name(mut self, grantee_name: impl Into<String>) -> Self {
        self.grantee_name = Some(grantee_name.into());
        self
    }

    pub fn with_expiry(mut self, expiry: i64) -> Self {
        self.expiry = Some(expiry);
        self
    }

    pub fn with_guest_password(mut self, password: impl Into<String>) -> Self {
        self.guest_password = Some(password.into());
        self
    }

    pub fn with_access_key(mut self, access_key: impl Into<String>) -> Self {
        self.access_key = Some(access_key.into());
        self
    }
}

/// The access control list of a folder.
///
/// Grants are written as repeated `<grant>` siblings without a wrapper.
#[derive(Clone, Debug, Default, Deserialize, XmlSerialize, PartialEq, Eq)]
pub struct Acl {
    /// Lifetime of internal grants, in milliseconds.
    #[xml_struct(attribute)]
    #[serde(rename = "@internalGrantExpiry")]
    internal_grant_expiry: Option<i64>,

    /// Lifetime of guest grants, in milliseconds.
    #[xml_struct(attribute)]
    #[serde(rename = "@guestGrantExpiry")]
    guest_grant_expiry: Option<i64>,

    #[xml_struct(rename = "grant")]
    #[serde(rename = "grant", default)]
    grants: Vec<Grant>,
}

impl Acl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn internal_grant_expiry(&self) -> Option<i64> {
        self.internal_grant_expiry
    }

    pub fn guest_grant_expiry(&self) -> Option<i64> {
        self.guest_grant_expiry
    }

    pub fn grants(&self) -> &[Grant] {
        &self.grants
    }

    pub fn set_internal_grant_expiry(&mut self, expiry: Option<i64>) {
        self.internal_grant_expiry = expiry;
    }

    pub fn set_guest_grant_expiry(&mut self, expiry: Option<i64>) {
        self.guest_grant_expiry = expiry;
    }

    /// Replaces the list of grants.
    pub fn set_grants(&mut self, grants: Vec<Grant>) {
        self.grants = grants;
    }

    pub fn add_grant(&mut self, grant: Grant) {
        self.grants.push(grant);
    }
}

#[cfg(test)]
mod tests {
    use zm_xml::{Registry, Value, WireEnum};

    use super::*;
    use crate::test_utils::{
        assert_deserialized_content, assert_serialized_content, deserialize_from_str,
        serialize_to_string,
    };

    #[test]
    fn grant_without_grantee_name_round_trips() {
        let grant = Grant::new("rwidx", GranteeType::User);

        let expected = r#"<grant perm="rwidx" gt="usr"/>"#;
        assert_serialized_content(&grant, "grant", expected);

        let decoded: Grant = deserialize_from_str(expected);
        assert_eq!(decoded, grant);
        assert_eq!(decoded.grantee_name(), None);
        assert_eq!(decoded.grantee_type(), GranteeType::User);
    }

    #[test]
    fn acl_writes_grants_as_siblings() {
        let mut acl = Acl::new();
        acl.set_internal_grant_expiry(Some(86400000));
        acl.add_grant(
            Grant::new("r", GranteeType::Group)
                .with_grantee_id("6f0a5d5e-2b7c-4b14-9a07-23a8cbd62dc6")
                .with_grantee_name("team@example.com"),
        );
        acl.add_grant(
            Grant::new("rwidx", GranteeType::Guest)
                .with_grantee_name("friend@example.net")
                .with_guest_password("secret"),
        );

        let expected = r#"<acl internalGrantExpiry="86400000"><grant perm="r" gt="grp" zid="6f0a5d5e-2b7c-4b14-9a07-23a8cbd62dc6" d="team@example.com"/><grant perm="rwidx" gt="guest" d="friend@example.net" pw="secret"/></acl>"#;

        assert_serialized_content(&acl, "acl", expected);
        assert_deserialized_content(expected, acl);
    }

    #[test]
    fn empty_acl_is_an_empty_tag() {
        let acl = Acl::new();
        assert_serialized_content(&acl, "acl", "<acl/>");

        let decoded: Acl = deserialize_from_str("<acl/>");
        assert!(decoded.grants().is_empty(), "absent grants should be empty");
    }

    #[test]
    fn unknown_grantee_type_lists_valid_tokens() {
        let err = GranteeType::from_token("robot").expect_err("`robot` is not a grantee type");

        assert_eq!(err.token(), "robot");
        assert_eq!(
            err.valid_tokens(),
            &["usr", "grp", "all", "dom", "cos", "guest", "key", "pub"]
        );
    }

    #[test]
    fn grantee_type_tokens_are_reversible() {
        for token in GranteeType::TOKENS {
            let value = GranteeType::from_token(token).expect("declared token should parse");
            assert_eq!(value.to_token(), *token);
        }
    }

    #[test]
    fn grant_matches_dynamic_record_type() -> Result<(), zm_xml::Error> {
        let mut registry = Registry::new();
        registry.register::<Grant>()?;
        registry.register_enum::<GranteeType>()?;

        let grant = Grant::new("rwidx", GranteeType::Key)
            .with_grantee_name("calendar-viewer")
            .with_access_key("k3y");
        let xml = serialize_to_string(&grant, "grant");

        let record = registry.decode("Grant", &xml)?;
        assert_eq!(record.get("rights")?, Some(&Value::from("rwidx")));
        assert_eq!(
            record.get("granteeType")?,
            Some(&Value::enum_symbol("Key"))
        );
        assert_eq!(record.get("granteeId")?, None);

        let encoded = registry.encode(&record, "grant")?;
        assert_eq!(encoded, xml, "dynamic and typed encodings should agree");

        let decoded: Grant = deserialize_from_str(&encoded);
        assert_eq!(decoded, grant);

        Ok(())
    }
}
