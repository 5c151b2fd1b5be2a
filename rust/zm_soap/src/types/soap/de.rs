/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use std::marker::PhantomData;

use serde::{
    de::{IgnoredAny, MapAccess, Visitor},
    Deserialize, Deserializer,
};

use crate::OperationResponse;

use super::{Fault, HeaderContext};

/// The name of the element which replaces the response in a failed request.
const FAULT: &str = "Fault";

/// The name of the Zimbra-specific element in the SOAP header.
const CONTEXT: &str = "context";

/// A helper for deserialization of SOAP envelopes.
///
/// This struct is declared separately from the more general [`Envelope`] type
/// so that the latter can be used with types that are write-only.
///
/// [`Envelope`]: super::Envelope
#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(super) struct DeserializeEnvelope<T>
where
    T: OperationResponse,
{
    #[serde(default, deserialize_with = "deserialize_header")]
    pub header: Option<HeaderContext>,

    #[serde(deserialize_with = "deserialize_body")]
    pub body: EnvelopeContent<T>,
}

/// The contents of a SOAP body: either the expected response or a fault.
pub(super) enum EnvelopeContent<T> {
    Body(T),
    Fault(Fault),
}

fn deserialize_header<'de, D>(header: D) -> Result<Option<HeaderContext>, D::Error>
where
    D: Deserializer<'de>,
{
    header.deserialize_map(HeaderVisitor)
}

/// A visitor which picks the Zimbra context out of a SOAP header.
struct HeaderVisitor;

impl<'de> Visitor<'de> for HeaderVisitor {
    type Value = Option<HeaderContext>;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("SOAP header")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut context = None;

        while let Some(name) = map.next_key::<String>()? {
            if name == CONTEXT {
                context = Some(map.next_value()?);
            } else {
                log::debug!("ignoring unexpected SOAP header element `{name}`");
                map.next_value::<IgnoredAny>()?;
            }
        }

        Ok(context)
    }
}

fn deserialize_body<'de, D, T>(body: D) -> Result<EnvelopeContent<T>, D::Error>
where
    D: Deserializer<'de>,
    T: OperationResponse,
{
    body.deserialize_map(BodyVisitor::<T>(PhantomData))
}

/// A visitor for custom name-based deserialization of operation responses.
struct BodyVisitor<T>(PhantomData<T>);

impl<'de, T> Visitor<'de> for BodyVisitor<T>
where
    T: OperationResponse,
{
    type Value = EnvelopeContent<T>;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("Zimbra operation response body")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        match map.next_key::<String>()? {
            Some(name) => {
                // We expect the body of the response to contain a single
                // element with the name of the expected operation response, or
                // a fault.
                let expected = T::name();
                let value = if name == expected {
                    EnvelopeContent::Body(map.next_value()?)
                } else if name == FAULT {
                    EnvelopeContent::Fault(map.next_value()?)
                } else {
                    return Err(serde::de::Error::custom(format_args!(
                        "unknown element `{}`, expected {}",
                        name, expected
                    )));
                };

                // To satisfy quick-xml's serde impl, we need to consume the
                // final `None` key value in order to successfully complete.
                match map.next_key::<String>()? {
                    Some(name) => {
                        // The response body contained more than one element,
                        // which violates our expectations.
                        Err(serde::de::Error::custom(format_args!(
                            "unexpected element `{}`",
                            name
                        )))
                    }
                    None => Ok(value),
                }
            }
            None => Err(serde::de::Error::invalid_type(
                serde::de::Unexpected::Map,
                &self,
            )),
        }
    }
}
