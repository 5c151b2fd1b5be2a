/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! External accounts and feeds which a mailbox imports from.

use serde::Deserialize;
use zm_xml::{XmlSerialize, ZmBoolean};

/// Behavior shared by every kind of data source.
///
/// Implementors only provide access to their [`MailDataSource`] properties.
pub trait DataSource {
    fn common(&self) -> &MailDataSource;

    fn id(&self) -> Option<&str> {
        self.common().id()
    }

    fn name(&self) -> Option<&str> {
        self.common().name()
    }

    fn folder_id(&self) -> Option<&str> {
        self.common().folder_id()
    }

    fn host(&self) -> Option<&str> {
        self.common().host()
    }

    fn is_enabled(&self) -> bool {
        self.common().is_enabled()
    }

    fn polling_interval(&self) -> Option<&str> {
        self.common().polling_interval()
    }
}

/// How a connection to a data source's server is secured.
#[derive(Clone, Copy, Debug, Deserialize, XmlSerialize, PartialEq, Eq, Hash)]
#[xml_struct(text)]
#[serde(try_from = "String")]
pub enum ConnectionType {
    #[xml_struct(rename = "cleartext")]
    Cleartext,

    #[xml_struct(rename = "ssl")]
    Ssl,

    #[xml_struct(rename = "tls")]
    Tls,

    /// Use TLS if the server offers it.
    #[xml_struct(rename = "tls_is_available")]
    TlsIfAvailable,
}

/// Properties common to every kind of data source.
#[derive(Clone, Debug, Default, Deserialize, XmlSerialize, PartialEq, Eq)]
pub struct MailDataSource {
    #[xml_struct(attribute)]
    #[serde(rename = "@id", default)]
    id: Option<String>,

    #[xml_struct(attribute)]
    #[serde(rename = "@name", default)]
    name: Option<String>,

    /// The folder items are imported into.
    #[xml_struct(attribute, rename = "l")]
    #[serde(rename = "@l", default)]
    folder_id: Option<String>,

    #[xml_struct(attribute, rename = "isEnabled")]
    #[serde(rename = "@isEnabled", default)]
    enabled: Option<ZmBoolean>,

    /// Whether items are only imported, with no changes written back.
    #[xml_struct(attribute)]
    #[serde(rename = "@importOnly", default)]
    import_only: Option<ZmBoolean>,

    #[xml_struct(attribute)]
    #[serde(rename = "@host", default)]
    host: Option<String>,

    #[xml_struct(attribute)]
    #[serde(rename = "@port", default, deserialize_with = "zm_xml::de::option_from_str")]
    port: Option<i32>,

    #[xml_struct(attribute)]
    #[serde(rename = "@connectionType", default)]
    connection_type: Option<ConnectionType>,

    #[xml_struct(attribute)]
    #[serde(rename = "@username", default)]
    username: Option<String>,

    #[xml_struct(attribute)]
    #[serde(rename = "@password", default)]
    password: Option<String>,

    /// How often to poll, e.g. `30m`.
    #[xml_struct(attribute)]
    #[serde(rename = "@pollingInterval", default)]
    polling_interval: Option<String>,

    #[xml_struct(attribute)]
    #[serde(rename = "@emailAddress", default)]
    email_address: Option<String>,

    /// The server-side class performing the import, for custom data sources.
    #[xml_struct(attribute)]
    #[serde(rename = "@importClass", default)]
    import_class: Option<String>,

    /// When imports began failing, in milliseconds since the epoch.
    #[xml_struct(attribute)]
    #[serde(rename = "@failingSince", default, deserialize_with = "zm_xml::de::option_from_str")]
    failing_since: Option<i64>,

    #[xml_struct(attribute)]
    #[serde(rename = "@refreshToken", default)]
    refresh_token: Option<String>,
}

impl MailDataSource {
    pub fn new(name: impl Into<String>, folder_id: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            folder_id: Some(folder_id.into()),
            ..Default::default()
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn folder_id(&self) -> Option<&str> {
        self.folder_id.as_deref()
    }

    pub fn is_enabled(&self) -> bool {
        ZmBoolean::to_bool_or(self.enabled, false)
    }

    pub fn is_import_only(&self) -> bool {
        ZmBoolean::to_bool_or(self.import_only, false)
    }

    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    pub fn port(&self) -> Option<i32> {
        self.port
    }

    pub fn connection_type(&self) -> Option<ConnectionType> {
        self.connection_type
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    pub fn polling_interval(&self) -> Option<&str> {
        self.polling_interval.as_deref()
    }

    pub fn email_address(&self) -> Option<&str> {
        self.email_address.as_deref()
    }

    pub fn import_class(&self) -> Option<&str> {
        self.import_class.as_deref()
    }

    pub fn failing_since(&self) -> Option<i64> {
        self.failing_since
    }

    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_deref()
    }

    pub fn set_id(&mut self, id: Option<String>) {
        self.id = id;
    }

    pub fn set_enabled(&mut self, enabled: Option<bool>) {
        self.enabled = ZmBoolean::from_bool(enabled);
    }

    pub fn set_import_only(&mut self, import_only: Option<bool>) {
        self.import_only = ZmBoolean::from_bool(import_only);
    }

    /// Sets the server to connect to.
    pub fn set_server(&mut self, host: impl Into<String>, port: i32, connection_type: ConnectionType) {
        self.host = Some(host.into());
        self.port = Some(port);
        self.connection_type = Some(connection_type);
    }

    pub fn set_credentials(&mut self, username: impl Into<String>, password: Option<String>) {
        self.username = Some(username.into());
        self.password = password;
    }

    pub fn set_polling_interval(&mut self, polling_interval: Option<String>) {
        self.polling_interval = polling_interval;
    }

    pub fn set_email_address(&mut self, email_address: Option<String>) {
        self.email_address = email_address;
    }

    pub fn set_import_class(&mut self, import_class: Option<String>) {
        self.import_class = import_class;
    }

    pub fn set_failing_since(&mut self, failing_since: Option<i64>) {
        self.failing_since = failing_since;
    }

    pub fn set_refresh_token(&mut self, refresh_token: Option<String>) {
        self.refresh_token = refresh_token;
    }
}

/// A remote IMAP account.
#[derive(Clone, Debug, Deserialize, XmlSerialize, PartialEq, Eq)]
#[xml_struct(capability = "DataSource")]
pub struct ImapDataSource {
    #[xml_struct(base)]
    #[serde(flatten)]
    common: MailDataSource,

    #[xml_struct(attribute)]
    #[serde(rename = "@oauthToken")]
    oauth_token: Option<String>,

    #[xml_struct(attribute)]
    #[serde(rename = "@clientId")]
    client_id: Option<String>,

    #[xml_struct(attribute)]
    #[serde(rename = "@clientSecret")]
    client_secret: Option<String>,
}

impl ImapDataSource {
    pub fn new(common: MailDataSource) -> Self {
        Self {
            common,
            oauth_token: None,
            client_id: None,
            client_secret: None,
        }
    }

    pub fn oauth_token(&self) -> Option<&str> {
        self.oauth_token.as_deref()
    }

    pub fn client_id(&self) -> Option<&str> {
        self.client_id.as_deref()
    }

    pub fn client_secret(&self) -> Option<&str> {
        self.client_secret.as_deref()
    }

    pub fn set_oauth(
        &mut self,
        oauth_token: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) {
        self.oauth_token = Some(oauth_token.into());
        self.client_id = Some(client_id.into());
        self.client_secret = Some(client_secret.into());
    }
}

impl DataSource for ImapDataSource {
    fn common(&self) -> &MailDataSource {
        &self.common
    }
}

/// A remote POP3 account.
#[derive(Clone, Debug, Deserialize, XmlSerialize, PartialEq, Eq)]
#[xml_struct(capability = "DataSource")]
pub struct Pop3DataSource {
    #[xml_struct(base)]
    #[serde(flatten)]
    common: MailDataSource,

    /// Whether fetched messages are left on the server.
    #[xml_struct(attribute)]
    #[serde(rename = "@leaveOnServer")]
    leave_on_server: Option<ZmBoolean>,
}

impl Pop3DataSource {
    pub fn new(common: MailDataSource) -> Self {
        Self {
            common,
            leave_on_server: None,
        }
    }

    pub fn leave_on_server(&self) -> bool {
        ZmBoolean::to_bool_or(self.leave_on_server, true)
    }

    pub fn set_leave_on_server(&mut self, leave_on_server: Option<bool>) {
        self.leave_on_server = ZmBoolean::from_bool(leave_on_server);
    }
}

impl DataSource for Pop3DataSource {
    fn common(&self) -> &MailDataSource {
        &self.common
    }
}

/// A remote calendar.
#[derive(Clone, Debug, Deserialize, XmlSerialize, PartialEq, Eq)]
#[xml_struct(capability = "DataSource")]
pub struct CalDataSource {
    #[xml_struct(base)]
    #[serde(flatten)]
    common: MailDataSource,
}

impl CalDataSource {
    pub fn new(common: MailDataSource) -> Self {
        Self { common }
    }
}

impl DataSource for CalDataSource {
    fn common(&self) -> &MailDataSource {
        &self.common
    }
}

/// An RSS or Atom feed.
#[derive(Clone, Debug, Deserialize, XmlSerialize, PartialEq, Eq)]
#[xml_struct(capability = "DataSource")]
pub struct RssDataSource {
    #[xml_struct(base)]
    #[serde(flatten)]
    common: MailDataSource,
}

impl RssDataSource {
    pub fn new(common: MailDataSource) -> Self {
        Self { common }
    }
}

impl DataSource for RssDataSource {
    fn common(&self) -> &MailDataSource {
        &self.common
    }
}

/// Any data source, distinguished by element name.
#[derive(Clone, Debug, Deserialize, XmlSerialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DataSourceNode {
    Imap(ImapDataSource),
    Pop3(Pop3DataSource),
    Cal(CalDataSource),
    Rss(RssDataSource),
}

impl DataSourceNode {
    /// Gets the data source as a [`DataSource`] regardless of its kind.
    pub fn as_data_source(&self) -> &dyn DataSource {
        match self {
            Self::Imap(source) => source,
            Self::Pop3(source) => source,
            Self::Cal(source) => source,
            Self::Rss(source) => source,
        }
    }
}

#[cfg(test)]
mod tests {
    use zm_xml::{PolymorphicUnion, Registry, Value, WireEnum};

    use super::*;
    use crate::{
        decode_union,
        test_utils::{assert_deserialized_content, assert_serialized_content},
        Error,
    };

    fn yahoo_imap() -> ImapDataSource {
        let mut common = MailDataSource::new("bob@yahoo.com", "2");
        common.set_id(Some("71e1c69c-bbb3-4f5d-8903-14ef8bdacbcc".into()));
        common.set_enabled(Some(true));
        common.set_server("imap.yahoo.com", 993, ConnectionType::Ssl);
        common.set_credentials("bob", None);
        common.set_polling_interval(Some("30m".into()));

        let mut source = ImapDataSource::new(common);
        source.set_oauth("token", "someclientid", "test123");

        source
    }

    const YAHOO_IMAP_XML: &str = r#"<imap id="71e1c69c-bbb3-4f5d-8903-14ef8bdacbcc" name="bob@yahoo.com" l="2" isEnabled="1" host="imap.yahoo.com" port="993" connectionType="ssl" username="bob" pollingInterval="30m" oauthToken="token" clientId="someclientid" clientSecret="test123"/>"#;

    #[test]
    fn imap_source_round_trips() {
        assert_serialized_content(&yahoo_imap(), "imap", YAHOO_IMAP_XML);
        assert_deserialized_content(YAHOO_IMAP_XML, yahoo_imap());
    }

    #[test]
    fn sources_share_data_source_behavior() {
        let mut pop3 = Pop3DataSource::new(MailDataSource::new("pop3DSForTest", "1"));
        pop3.common.set_polling_interval(Some("24h".into()));
        pop3.common.set_enabled(Some(false));

        let feed = RssDataSource::new(MailDataSource::new("RssFeedDataSource", "260"));

        let nodes = [
            DataSourceNode::Imap(yahoo_imap()),
            DataSourceNode::Pop3(pop3.clone()),
            DataSourceNode::Rss(feed),
        ];

        let names: Vec<Option<&str>> = nodes
            .iter()
            .map(|node| node.as_data_source().name())
            .collect();
        assert_eq!(
            names,
            [Some("bob@yahoo.com"), Some("pop3DSForTest"), Some("RssFeedDataSource")]
        );

        let enabled: Vec<bool> = nodes
            .iter()
            .map(|node| node.as_data_source().is_enabled())
            .collect();
        assert_eq!(enabled, [true, false, false]);

        assert_eq!(pop3.polling_interval(), Some("24h"));
        assert!(pop3.leave_on_server(), "messages are left on the server by default");
    }

    #[test]
    fn pop3_source_writes_leave_on_server() {
        let mut source = Pop3DataSource::new(MailDataSource::new("pop", "1"));
        source.set_leave_on_server(Some(false));

        let expected = r#"<pop3 name="pop" l="1" leaveOnServer="0"/>"#;
        assert_serialized_content(&source, "pop3", expected);
        assert_deserialized_content(expected, source);
    }

    #[test]
    fn union_tags_name_each_protocol() {
        let tags: Vec<&str> = DataSourceNode::VARIANTS.iter().map(|(tag, _)| *tag).collect();
        assert_eq!(tags, ["imap", "pop3", "cal", "rss"]);
    }

    #[test]
    fn dynamic_sources_carry_data_source_capability() -> Result<(), zm_xml::Error> {
        let mut registry = Registry::new();
        for handle in [
            registry.register::<ImapDataSource>()?,
            registry.register::<Pop3DataSource>()?,
            registry.register::<CalDataSource>()?,
            registry.register::<RssDataSource>()?,
        ] {
            assert!(
                handle.has_capability("DataSource"),
                "`{}` should be a data source",
                handle.name()
            );
        }
        registry.register_enum::<ConnectionType>()?;
        registry.register_union::<DataSourceNode>()?;

        let record = registry.decode_union("DataSourceNode", YAHOO_IMAP_XML)?;
        assert_eq!(record.type_name(), "ImapDataSource");
        assert_eq!(record.get("port")?, Some(&Value::Integer(993)));
        assert_eq!(
            record.get("connectionType")?,
            Some(&Value::enum_symbol("Ssl"))
        );

        Ok(())
    }

    #[test]
    fn every_source_tag_decodes_to_its_variant() -> Result<(), Error> {
        let documents = [
            ("imap", r#"<imap name="imap" l="1" host="imap.example.com"/>"#),
            ("pop3", r#"<pop3 name="pop" l="1" leaveOnServer="1"/>"#),
            ("cal", r#"<cal name="calendar" l="10"/>"#),
            ("rss", r#"<rss name="news" l="260"/>"#),
        ];

        let tags: Vec<&str> = documents.iter().map(|(tag, _)| *tag).collect();
        let declared: Vec<&str> = DataSourceNode::VARIANTS.iter().map(|(tag, _)| *tag).collect();
        assert_eq!(tags, declared, "every data source kind should be covered");

        for (tag, xml) in documents {
            let source: DataSourceNode = decode_union(xml)?;
            assert_eq!(source.tag_name(), tag, "decoding {xml}");
            assert!(source.as_data_source().folder_id().is_some(), "decoding {xml}");
        }

        let err = decode_union::<DataSourceNode>(r#"<gal name="directory"/>"#)
            .expect_err("`gal` is not a known data source");
        assert!(
            matches!(err, Error::UnknownVariant { ref tag, .. } if tag == "gal"),
            "unexpected error {err:?}"
        );

        Ok(())
    }

    #[test]
    fn connection_type_tokens_are_reversible() {
        let values = [
            ConnectionType::Cleartext,
            ConnectionType::Ssl,
            ConnectionType::Tls,
            ConnectionType::TlsIfAvailable,
        ];
        for value in values {
            assert_eq!(ConnectionType::from_token(value.to_token()), Ok(value));
        }
        assert_eq!(
            ConnectionType::TOKENS,
            ["cleartext", "ssl", "tls", "tls_is_available"]
        );
    }
}
