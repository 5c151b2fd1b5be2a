/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use serde::Deserialize;
use zm_soap_macros::operation;
use zm_xml::XmlSerialize;

use crate::{FilterRule, MAIL_NS_URI};

/// A request to replace the user's incoming message filter rules.
///
/// The rules sent replace every existing rule, so sending an empty list
/// removes them all.
///
/// See <https://files.zimbra.com/docs/soap_api/8.8.15/api-reference/zimbraMail/ModifyFilterRules.html>
#[derive(Clone, Debug, Default, XmlSerialize)]
#[xml_struct(default_ns = MAIL_NS_URI)]
#[operation(ModifyFilterRulesResponse)]
pub struct ModifyFilterRulesRequest {
    #[xml_struct(element)]
    pub filter_rules: FilterRules,
}

impl ModifyFilterRulesRequest {
    pub fn new(rules: Vec<FilterRule>) -> Self {
        Self {
            filter_rules: FilterRules { rules },
        }
    }
}

/// The complete, ordered set of filter rules.
#[derive(Clone, Debug, Default, XmlSerialize)]
pub struct FilterRules {
    #[xml_struct(rename = "filterRule")]
    pub rules: Vec<FilterRule>,
}

/// A response to a [`ModifyFilterRulesRequest`].
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct ModifyFilterRulesResponse {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        soap::Envelope, test_utils::assert_serialized_content, FileIntoAction, FilterAction,
        FilterTest, FilterTests, HeaderExistsTest,
    };

    #[test]
    fn serialize_modify_filter_rules_request() {
        let mut tests = FilterTests::all_of();
        tests.add_test(FilterTest::HeaderExistsTest(HeaderExistsTest::new("List-Id")));

        let mut rule = FilterRule::new("Lists", true, tests);
        rule.add_action(FilterAction::ActionFileInto(FileIntoAction::new("Lists")));

        let expected = concat!(
            r#"<ModifyFilterRulesRequest xmlns="urn:zimbraMail"><filterRules>"#,
            r#"<filterRule name="Lists" active="1">"#,
            r#"<filterTests condition="allof"><headerExistsTest header="List-Id"/></filterTests>"#,
            r#"<filterActions><actionFileInto folderPath="Lists"/></filterActions>"#,
            r#"</filterRule>"#,
            r#"</filterRules></ModifyFilterRulesRequest>"#,
        );
        assert_serialized_content(
            &ModifyFilterRulesRequest::new(vec![rule]),
            "ModifyFilterRulesRequest",
            expected,
        );
    }

    #[test]
    fn empty_rule_set_is_still_sent() {
        assert_serialized_content(
            &ModifyFilterRulesRequest::default(),
            "ModifyFilterRulesRequest",
            r#"<ModifyFilterRulesRequest xmlns="urn:zimbraMail"><filterRules/></ModifyFilterRulesRequest>"#,
        );
    }

    #[test]
    fn deserialize_modify_filter_rules_response() {
        let xml = concat!(
            r#"<soap:Envelope xmlns:soap="http://www.w3.org/2003/05/soap-envelope">"#,
            r#"<soap:Body><ModifyFilterRulesResponse xmlns="urn:zimbraMail"/></soap:Body>"#,
            r#"</soap:Envelope>"#,
        );

        let envelope: Envelope<ModifyFilterRulesResponse> =
            Envelope::from_xml_document(xml.as_bytes()).expect("deserialization should succeed");

        assert_eq!(envelope.body, ModifyFilterRulesResponse {});
    }
}
