/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use quick_xml::{de::Deserializer, Writer};
use serde::Deserialize;
use zm_xml::XmlSerialize;

use crate::Error;

/// Serialize a structure as an element with the given name.
pub fn serialize_to_string<T: XmlSerialize>(data: &T, root_tag_name: &str) -> String {
    let mut writer = {
        let inner: Vec<u8> = Default::default();
        Writer::new(inner)
    };
    data.serialize_as_element(&mut writer, root_tag_name)
        .unwrap();

    // Read the contents of the `Writer`'s buffer.
    let buf = writer.into_inner();
    String::from_utf8(buf)
        .map_err(|e| Error::UnexpectedResponse(e.into_bytes()))
        .unwrap()
}

/// Assert the expected result of XML serialization.
pub fn assert_serialized_content<T: XmlSerialize>(
    data: &T,
    root_tag_name: &str,
    expected_xml_content: &str,
) {
    let actual_xml_content = serialize_to_string(data, root_tag_name);

    assert_eq!(actual_xml_content, expected_xml_content);
}

/// Deserialize a structure from an XML document.
pub fn deserialize_from_str<T>(content: &str) -> T
where
    T: for<'a> Deserialize<'a>,
{
    let mut deserializer = Deserializer::from_str(content);
    serde_path_to_error::deserialize(&mut deserializer).unwrap()
}

/// Assert the expected result of XML deserialization.
pub fn assert_deserialized_content<T>(content: &str, expected: T)
where
    T: for<'a> Deserialize<'a> + PartialEq + std::fmt::Debug,
{
    let deserialized_data: T = deserialize_from_str(content);
    assert_eq!(deserialized_data, expected);
}
