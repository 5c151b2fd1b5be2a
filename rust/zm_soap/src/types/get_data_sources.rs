/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use serde::Deserialize;
use zm_soap_macros::operation;
use zm_xml::XmlSerialize;

use crate::{DataSourceNode, MAIL_NS_URI};

/// A request to get the external accounts the user's mailbox imports from.
///
/// See <https://files.zimbra.com/docs/soap_api/8.8.15/api-reference/zimbraMail/GetDataSources.html>
#[derive(Clone, Debug, Default, XmlSerialize)]
#[xml_struct(default_ns = MAIL_NS_URI)]
#[operation(GetDataSourcesResponse)]
pub struct GetDataSourcesRequest {}

/// A response to a [`GetDataSourcesRequest`].
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct GetDataSourcesResponse {
    #[serde(rename = "$value", default)]
    data_sources: Vec<DataSourceNode>,
}

impl GetDataSourcesResponse {
    pub fn data_sources(&self) -> &[DataSourceNode] {
        &self.data_sources
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{soap::Envelope, test_utils::assert_serialized_content, ConnectionType, DataSource};

    #[test]
    fn serialize_get_data_sources_request() {
        assert_serialized_content(
            &GetDataSourcesRequest::default(),
            "GetDataSourcesRequest",
            r#"<GetDataSourcesRequest xmlns="urn:zimbraMail"/>"#,
        );
    }

    #[test]
    fn deserialize_get_data_sources_response() {
        let xml = concat!(
            r#"<soap:Envelope xmlns:soap="http://www.w3.org/2003/05/soap-envelope">"#,
            r#"<soap:Body><GetDataSourcesResponse xmlns="urn:zimbraMail">"#,
            r#"<imap id="ds-1" name="bob@yahoo.com" l="257" isEnabled="1" host="imap.yahoo.com" port="993" connectionType="ssl"/>"#,
            r#"<pop3 id="ds-2" name="old account" l="258" isEnabled="0" host="pop.example.com" leaveOnServer="0"/>"#,
            r#"<rss id="ds-3" name="News" l="259" pollingInterval="1h"/>"#,
            r#"</GetDataSourcesResponse></soap:Body>"#,
            r#"</soap:Envelope>"#,
        );

        let envelope: Envelope<GetDataSourcesResponse> =
            Envelope::from_xml_document(xml.as_bytes()).expect("deserialization should succeed");
        let sources = envelope.body.data_sources();

        let summary: Vec<(Option<&str>, Option<&str>, bool)> = sources
            .iter()
            .map(DataSourceNode::as_data_source)
            .map(|source| (source.id(), source.folder_id(), source.is_enabled()))
            .collect();
        assert_eq!(
            summary,
            [
                (Some("ds-1"), Some("257"), true),
                (Some("ds-2"), Some("258"), false),
                (Some("ds-3"), Some("259"), false),
            ]
        );

        let DataSourceNode::Imap(imap) = &sources[0] else {
            panic!("first source should be IMAP");
        };
        assert_eq!(imap.common().port(), Some(993));
        assert_eq!(imap.common().connection_type(), Some(ConnectionType::Ssl));

        let DataSourceNode::Pop3(pop3) = &sources[1] else {
            panic!("second source should be POP3");
        };
        assert!(!pop3.leave_on_server());

        assert_eq!(sources[2].as_data_source().polling_interval(), Some("1h"));
    }
}
