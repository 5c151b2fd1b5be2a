/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use serde::Deserialize;
use zm_soap_macros::operation;
use zm_xml::{XmlSerialize, ZmBoolean};

use crate::{Grant, MAIL_NS_URI};

/// An operation which may be applied to folders.
#[derive(Clone, Copy, Debug, Deserialize, XmlSerialize, PartialEq, Eq, Hash)]
#[xml_struct(text)]
#[serde(try_from = "String")]
pub enum FolderActionOp {
    /// Marks every item in the folder as read.
    #[xml_struct(rename = "read")]
    Read,

    /// Hard-deletes the folder and everything in it.
    #[xml_struct(rename = "delete")]
    Delete,

    #[xml_struct(rename = "rename")]
    Rename,

    #[xml_struct(rename = "move")]
    Move,

    /// Moves the folder to the trash.
    #[xml_struct(rename = "trash")]
    Trash,

    /// Hard-deletes every item in the folder.
    #[xml_struct(rename = "empty")]
    Empty,

    #[xml_struct(rename = "color")]
    Color,

    #[xml_struct(rename = "grant")]
    Grant,

    #[xml_struct(rename = "!grant")]
    RevokeGrant,

    /// Marks the folder as checked in the UI.
    #[xml_struct(rename = "check")]
    Check,

    #[xml_struct(rename = "!check")]
    Uncheck,

    /// Fetches new content from the folder's remote data source.
    #[xml_struct(rename = "sync")]
    Sync,
}

/// The folders to act on and the parameters of the action.
#[derive(Clone, Debug, XmlSerialize)]
pub struct FolderActionSelector {
    #[xml_struct(attribute)]
    pub op: FolderActionOp,

    /// A comma-separated list of folder ids.
    #[xml_struct(attribute)]
    pub id: String,

    /// The new name, for [`FolderActionOp::Rename`].
    #[xml_struct(attribute)]
    pub name: Option<String>,

    /// The new parent folder, for [`FolderActionOp::Move`].
    #[xml_struct(attribute, rename = "l")]
    pub folder_id: Option<String>,

    #[xml_struct(attribute)]
    pub color: Option<i8>,

    /// The grantee whose access is revoked, for [`FolderActionOp::RevokeGrant`].
    #[xml_struct(attribute, rename = "zid")]
    pub grantee_id: Option<String>,

    /// Whether subfolders are also emptied, for [`FolderActionOp::Empty`].
    #[xml_struct(attribute)]
    pub recursive: Option<ZmBoolean>,

    /// The access to grant, for [`FolderActionOp::Grant`].
    #[xml_struct(element)]
    pub grant: Option<Grant>,
}

impl FolderActionSelector {
    pub fn new(op: FolderActionOp, id: impl Into<String>) -> Self {
        Self {
            op,
            id: id.into(),
            name: None,
            folder_id: None,
            color: None,
            grantee_id: None,
            recursive: None,
            grant: None,
        }
    }

    pub fn grant(id: impl Into<String>, grant: Grant) -> Self {
        Self {
            grant: Some(grant),
            ..Self::new(FolderActionOp::Grant, id)
        }
    }

    pub fn revoke_grant(id: impl Into<String>, grantee_id: impl Into<String>) -> Self {
        Self {
            grantee_id: Some(grantee_id.into()),
            ..Self::new(FolderActionOp::RevokeGrant, id)
        }
    }

    pub fn move_to(id: impl Into<String>, folder_id: impl Into<String>) -> Self {
        Self {
            folder_id: Some(folder_id.into()),
            ..Self::new(FolderActionOp::Move, id)
        }
    }
}

/// A request to apply an action to one or more folders.
///
/// See <https://files.zimbra.com/docs/soap_api/8.8.15/api-reference/zimbraMail/FolderAction.html>
#[derive(Clone, Debug, XmlSerialize)]
#[xml_struct(default_ns = MAIL_NS_URI)]
#[operation(FolderActionResponse)]
pub struct FolderActionRequest {
    pub action: FolderActionSelector,
}

/// A response to a [`FolderActionRequest`].
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct FolderActionResponse {
    action: FolderActionResult,
}

impl FolderActionResponse {
    pub fn action(&self) -> &FolderActionResult {
        &self.action
    }
}

/// The outcome of a folder action.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct FolderActionResult {
    #[serde(rename = "@op")]
    op: FolderActionOp,

    /// The ids of the folders acted on.
    #[serde(rename = "@id")]
    id: String,

    /// The grantee's id, for a grant.
    #[serde(rename = "@zid")]
    grantee_id: Option<String>,

    /// The grantee's display name, for a grant.
    #[serde(rename = "@d")]
    grantee_name: Option<String>,

    /// The generated access key, for a grant to a key grantee.
    #[serde(rename = "@key")]
    access_key: Option<String>,
}

impl FolderActionResult {
    pub fn op(&self) -> FolderActionOp {
        self.op
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn grantee_id(&self) -> Option<&str> {
        self.grantee_id.as_deref()
    }

    pub fn grantee_name(&self) -> Option<&str> {
        self.grantee_name.as_deref()
    }

    pub fn access_key(&self) -> Option<&str> {
        self.access_key.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use zm_xml::WireEnum;

    use super::*;
    use crate::{soap::Envelope, test_utils::assert_serialized_content, GranteeType};

    #[test]
    fn serialize_grant_action() {
        let request = FolderActionRequest {
            action: FolderActionSelector::grant(
                "257",
                Grant::new("rwidx", GranteeType::User).with_grantee_name("bob@example.com"),
            ),
        };

        let expected = concat!(
            r#"<FolderActionRequest xmlns="urn:zimbraMail">"#,
            r#"<action op="grant" id="257"><grant perm="rwidx" gt="usr" d="bob@example.com"/></action>"#,
            r#"</FolderActionRequest>"#,
        );
        assert_serialized_content(&request, "FolderActionRequest", expected);
    }

    #[test]
    fn serialize_revoke_and_move_actions() {
        assert_serialized_content(
            &FolderActionSelector::revoke_grant("257", "6f0a5d5e-2b7c-4b14-9a07-23a8cbd62dc6"),
            "action",
            r#"<action op="!grant" id="257" zid="6f0a5d5e-2b7c-4b14-9a07-23a8cbd62dc6"/>"#,
        );
        assert_serialized_content(
            &FolderActionSelector::move_to("257,258", "2"),
            "action",
            r#"<action op="move" id="257,258" l="2"/>"#,
        );
    }

    #[test]
    fn deserialize_grant_result() {
        let xml = concat!(
            r#"<soap:Envelope xmlns:soap="http://www.w3.org/2003/05/soap-envelope">"#,
            r#"<soap:Body><FolderActionResponse xmlns="urn:zimbraMail">"#,
            r#"<action op="grant" id="257" zid="b4d8f1c2-0000-4000-8000-000000000001" d="bob@example.com"/>"#,
            r#"</FolderActionResponse></soap:Body>"#,
            r#"</soap:Envelope>"#,
        );

        let envelope: Envelope<FolderActionResponse> =
            Envelope::from_xml_document(xml.as_bytes()).expect("deserialization should succeed");

        let result = envelope.body.action();
        assert_eq!(result.op(), FolderActionOp::Grant);
        assert_eq!(result.id(), "257");
        assert_eq!(result.grantee_name(), Some("bob@example.com"));
        assert_eq!(result.access_key(), None);
    }

    #[test]
    fn negated_ops_keep_their_prefix() {
        assert_eq!(FolderActionOp::RevokeGrant.to_token(), "!grant");
        assert_eq!(
            FolderActionOp::from_token("!check").expect("`!check` is an op"),
            FolderActionOp::Uncheck
        );
    }
}
