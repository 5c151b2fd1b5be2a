/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use serde::Deserialize;
use zm_soap_macros::operation;
use zm_xml::XmlSerialize;

use crate::{FilterRule, MAIL_NS_URI};

/// A request to get the user's incoming message filter rules.
///
/// See <https://files.zimbra.com/docs/soap_api/8.8.15/api-reference/zimbraMail/GetFilterRules.html>
#[derive(Clone, Debug, Default, XmlSerialize)]
#[xml_struct(default_ns = MAIL_NS_URI)]
#[operation(GetFilterRulesResponse)]
pub struct GetFilterRulesRequest {}

/// A response to a [`GetFilterRulesRequest`].
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct GetFilterRulesResponse {
    /// The rules, in the order in which they are evaluated.
    #[serde(
        rename = "filterRules",
        default,
        deserialize_with = "zm_xml::de::wrapped"
    )]
    rules: Vec<FilterRule>,
}

impl GetFilterRulesResponse {
    pub fn rules(&self) -> &[FilterRule] {
        &self.rules
    }

    pub fn into_rules(self) -> Vec<FilterRule> {
        self.rules
    }
}
