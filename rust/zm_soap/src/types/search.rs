/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use serde::Deserialize;
use zm_soap_macros::operation;
use zm_xml::{XmlSerialize, ZmBoolean};

use crate::{MailSearchParams, SearchHitNode, MAIL_NS_URI};

/// A request to search the user's mailbox.
///
/// See <https://files.zimbra.com/docs/soap_api/8.8.15/api-reference/zimbraMail/Search.html>
#[derive(Clone, Debug, Default, XmlSerialize)]
#[xml_struct(default_ns = MAIL_NS_URI)]
#[operation(SearchResponse)]
pub struct SearchRequest {
    #[xml_struct(base)]
    pub params: MailSearchParams,

    /// Where to resume a paged search.
    #[xml_struct(element)]
    pub cursor: Option<Cursor>,
}

impl SearchRequest {
    pub fn new(params: MailSearchParams) -> Self {
        Self {
            params,
            cursor: None,
        }
    }
}

/// A position in the results of a previous search.
#[derive(Clone, Debug, XmlSerialize)]
pub struct Cursor {
    /// The id of the last hit of the previous page.
    #[xml_struct(attribute)]
    pub id: Option<String>,

    /// The sort value of the last hit of the previous page.
    #[xml_struct(attribute)]
    pub sort_val: Option<String>,

    #[xml_struct(attribute)]
    pub end_sort_val: Option<String>,

    /// Whether the server should compute the offset of the page.
    #[xml_struct(attribute)]
    pub include_offset: Option<ZmBoolean>,
}

impl Cursor {
    /// Creates a cursor positioned after the given hit.
    pub fn after(id: impl Into<String>, sort_val: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            sort_val: Some(sort_val.into()),
            end_sort_val: None,
            include_offset: None,
        }
    }
}

/// A response to a [`SearchRequest`].
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct SearchResponse {
    #[serde(rename = "@sortBy")]
    sort_by: Option<String>,

    #[serde(rename = "@offset")]
    offset: Option<i32>,

    /// Whether more hits exist beyond this page.
    #[serde(rename = "@more")]
    more: Option<ZmBoolean>,

    #[serde(rename = "$value", default)]
    hits: Vec<SearchHitNode>,
}

impl SearchResponse {
    pub fn sort_by(&self) -> Option<&str> {
        self.sort_by.as_deref()
    }

    pub fn offset(&self) -> Option<i32> {
        self.offset
    }

    pub fn has_more(&self) -> bool {
        ZmBoolean::to_bool_or(self.more, false)
    }

    pub fn hits(&self) -> &[SearchHitNode] {
        &self.hits
    }
}
