/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use std::fmt::Debug;

use quick_xml::{events::Event, Reader};
use serde::Deserialize;
use zm_xml::{PolymorphicUnion, XmlSerialize};

use crate::Error;

mod common;

pub use common::*;
pub mod soap;

pub mod folder_action;
pub mod get_data_sources;
pub mod get_filter_rules;
pub mod get_folder;
pub mod modify_filter_rules;
pub mod search;

/// A Zimbra SOAP request.
///
/// Implementations are generated by the `#[operation(Response)]` attribute.
pub trait Operation: XmlSerialize + sealed::EnvelopeBodyContents + Debug {
    /// The structure returned in the body of a successful response.
    type Response: OperationResponse;
}

/// The body of a response to a Zimbra SOAP request.
pub trait OperationResponse:
    for<'de> Deserialize<'de> + sealed::EnvelopeBodyContents + Debug
{
}

pub(crate) mod sealed {
    /// A trait for structures which may appear in the body of a SOAP envelope.
    pub trait EnvelopeBodyContents {
        /// Gets the name of the element enclosing the contents of this
        /// structure when represented in XML.
        fn name() -> &'static str;
    }
}

/// Deserializes a standalone document whose root element is a variant of the
/// union `U`, e.g. `<chat id="..."/>` for a search hit.
///
/// The root element's name is checked against the union's dispatch table
/// before deserialization, so that unknown tags are reported as such rather
/// than as a generic deserialization failure.
pub fn decode_union<U>(xml: &str) -> Result<U, Error>
where
    U: PolymorphicUnion + for<'de> Deserialize<'de>,
{
    let tag = root_element_name(xml)?;
    if !U::is_variant_tag(&tag) {
        return Err(Error::UnknownVariant {
            union: U::NAME.to_owned(),
            tag,
        });
    }

    let de = &mut quick_xml::de::Deserializer::from_str(xml);

    Ok(serde_path_to_error::deserialize(de)?)
}

/// Gets the local name of the root element of a document.
fn root_element_name(xml: &str) -> Result<String, Error> {
    let mut reader = Reader::from_str(xml);

    loop {
        match reader.read_event()? {
            Event::Start(start) | Event::Empty(start) => {
                return Ok(String::from_utf8_lossy(start.local_name().as_ref()).into_owned());
            }
            Event::Eof => return Err(Error::UnexpectedResponse(xml.as_bytes().to_vec())),
            _ => continue,
        }
    }
}
