/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use serde::Deserialize;
use zm_soap_macros::operation;
use zm_xml::{XmlSerialize, ZmBoolean};

use crate::{FolderNode, FolderSelector, FolderView, MAIL_NS_URI};

/// A request to get a folder, optionally along with the tree beneath it.
///
/// See <https://files.zimbra.com/docs/soap_api/8.8.15/api-reference/zimbraMail/GetFolder.html>
#[derive(Clone, Debug, Default, XmlSerialize)]
#[xml_struct(default_ns = MAIL_NS_URI)]
#[operation(GetFolderResponse)]
pub struct GetFolderRequest {
    /// Whether to include folders the user cannot read but which contain
    /// readable subfolders.
    #[xml_struct(attribute)]
    pub visible: Option<ZmBoolean>,

    /// Whether to resolve the display names of grantees in ACLs.
    #[xml_struct(attribute)]
    pub need_grantee_name: Option<ZmBoolean>,

    /// Only return folders of this view, and their parents.
    #[xml_struct(attribute)]
    pub view: Option<FolderView>,

    /// How many levels of subfolders to return. Unlimited when absent.
    #[xml_struct(attribute)]
    pub depth: Option<i32>,

    /// Whether to traverse mountpoints.
    #[xml_struct(attribute, rename = "tr")]
    pub traverse_mountpoints: Option<ZmBoolean>,

    /// The root of the tree to return. The user's root folder when absent.
    #[xml_struct(element)]
    pub folder: Option<FolderSelector>,
}

impl GetFolderRequest {
    pub fn new(folder: FolderSelector) -> Self {
        Self {
            folder: Some(folder),
            ..Default::default()
        }
    }
}

/// A response to a [`GetFolderRequest`].
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct GetFolderResponse {
    #[serde(rename = "$value", default)]
    folders: Vec<FolderNode>,
}

impl GetFolderResponse {
    /// Gets the node at the root of the returned tree.
    pub fn root(&self) -> Option<&FolderNode> {
        self.folders.first()
    }

    pub fn folders(&self) -> &[FolderNode] {
        &self.folders
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        soap::{Envelope, HeaderContext},
        Operation,
    };

    #[test]
    fn serialize_get_folder_request() {
        let mut request = GetFolderRequest::new(FolderSelector::by_path("/Inbox"));
        request.need_grantee_name = Some(ZmBoolean::TRUE);
        request.depth = Some(1);
        request.view = Some(FolderView::Message);

        let envelope = Envelope {
            header: Some(HeaderContext::with_auth_token("0_abc123")),
            body: request,
        };

        let expected = concat!(
            r#"<?xml version="1.0" encoding="utf-8"?>"#,
            r#"<soap:Envelope xmlns:soap="http://www.w3.org/2003/05/soap-envelope">"#,
            r#"<soap:Header><context xmlns="urn:zimbra"><authToken>0_abc123</authToken></context></soap:Header>"#,
            r#"<soap:Body>"#,
            r#"<GetFolderRequest xmlns="urn:zimbraMail" needGranteeName="1" view="message" depth="1">"#,
            r#"<folder path="/Inbox"/>"#,
            r#"</GetFolderRequest>"#,
            r#"</soap:Body></soap:Envelope>"#,
        );

        let actual = envelope
            .as_xml_document()
            .expect("serialization should succeed");
        assert_eq!(
            String::from_utf8(actual).expect("output should be UTF-8"),
            expected
        );
    }

    #[test]
    fn deserialize_get_folder_response() {
        let xml = concat!(
            r#"<soap:Envelope xmlns:soap="http://www.w3.org/2003/05/soap-envelope">"#,
            r#"<soap:Header><context xmlns="urn:zimbra"><change token="1722"/></context></soap:Header>"#,
            r#"<soap:Body><GetFolderResponse xmlns="urn:zimbraMail">"#,
            r#"<folder id="2" name="Inbox" l="1" view="message" u="3" n="41" s="882331" absFolderPath="/Inbox">"#,
            r#"<folder id="257" name="Receipts" l="2" view="message" n="4"/>"#,
            r#"<link id="300" name="Shared" l="2" owner="carol@example.com" rid="2" broken="1"/>"#,
            r#"</folder>"#,
            r#"</GetFolderResponse></soap:Body>"#,
            r#"</soap:Envelope>"#,
        );

        let envelope: Envelope<<GetFolderRequest as Operation>::Response> =
            Envelope::from_xml_document(xml.as_bytes()).expect("deserialization should succeed");

        let Some(FolderNode::Folder(inbox)) = envelope.body.root() else {
            panic!("root should be a folder, got {:?}", envelope.body.root());
        };
        assert_eq!(inbox.abs_folder_path(), Some("/Inbox"));
        assert_eq!(inbox.unread_count(), Some(3));

        let children: Vec<(&str, Option<&str>)> = inbox
            .subfolders()
            .iter()
            .map(|node| (node.id(), node.name()))
            .collect();
        assert_eq!(
            children,
            [("257", Some("Receipts")), ("300", Some("Shared"))]
        );

        let FolderNode::Mountpoint(shared) = &inbox.subfolders()[1] else {
            panic!("second child should be a mountpoint");
        };
        assert!(shared.is_broken());
        assert_eq!(shared.remote_folder_id(), Some(2));
    }
}
