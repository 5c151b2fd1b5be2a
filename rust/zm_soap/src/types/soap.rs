/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use quick_xml::{
    events::{BytesDecl, BytesEnd, BytesStart, Event},
    Writer,
};
use serde::Deserialize;
use zm_xml::XmlSerialize;

use crate::{types::sealed, Error, Operation, OperationResponse, SOAP_NS_URI, ZIMBRA_NS_URI};

mod de;
use self::de::{DeserializeEnvelope, EnvelopeContent};

/// The `<context>` element of a SOAP header, which carries the state of the
/// client's session with the server.
///
/// See <https://wiki.zimbra.com/wiki/SOAP_API_Reference_Material_Beginning_with_ZCS_8>
#[derive(Clone, Debug, Default, Deserialize, XmlSerialize, PartialEq, Eq)]
#[xml_struct(default_ns = ZIMBRA_NS_URI)]
pub struct HeaderContext {
    /// The token returned by a successful authentication.
    #[serde(rename = "authToken")]
    pub auth_token: Option<String>,

    pub session: Option<Session>,

    /// The account to act on, when different from the authenticated one.
    pub account: Option<AccountSelector>,

    #[serde(rename = "userAgent")]
    pub user_agent: Option<UserAgent>,

    /// The last change token seen by the client, or the mailbox's current
    /// change token in a response.
    pub change: Option<ChangeToken>,
}

impl HeaderContext {
    pub fn with_auth_token(auth_token: impl Into<String>) -> Self {
        Self {
            auth_token: Some(auth_token.into()),
            ..Default::default()
        }
    }
}

/// A server-side session.
///
/// A session without an id asks the server to create one.
#[derive(Clone, Debug, Default, Deserialize, XmlSerialize, PartialEq, Eq)]
pub struct Session {
    #[xml_struct(attribute)]
    #[serde(rename = "@id")]
    pub id: Option<String>,
}

#[derive(Clone, Debug, Deserialize, XmlSerialize, PartialEq, Eq)]
pub struct AccountSelector {
    /// How the account is identified: `name`, `id` or `foreignPrincipal`.
    #[xml_struct(attribute)]
    #[serde(rename = "@by")]
    pub by: String,

    #[xml_struct(text)]
    #[serde(rename = "$text")]
    pub value: String,
}

#[derive(Clone, Debug, Deserialize, XmlSerialize, PartialEq, Eq)]
pub struct UserAgent {
    #[xml_struct(attribute)]
    #[serde(rename = "@name")]
    pub name: String,

    #[xml_struct(attribute)]
    #[serde(rename = "@version")]
    pub version: Option<String>,
}

#[derive(Clone, Debug, Deserialize, XmlSerialize, PartialEq, Eq)]
pub struct ChangeToken {
    #[xml_struct(attribute)]
    #[serde(rename = "@token")]
    pub token: String,

    /// `mod` to detect any modification since the token, `new` to detect
    /// only newly created items.
    #[xml_struct(attribute, rename = "type")]
    #[serde(rename = "@type")]
    pub change_type: Option<String>,
}

/// A SOAP 1.2 envelope containing the body of a Zimbra request or response.
///
/// See <https://www.w3.org/TR/soap12-part1/#soapenvelope>
#[derive(Clone, Debug)]
pub struct Envelope<B> {
    pub header: Option<HeaderContext>,
    pub body: B,
}

impl<B> Envelope<B>
where
    B: Operation,
{
    /// Serializes the SOAP envelope as a complete XML document.
    pub fn as_xml_document(&self) -> Result<Vec<u8>, Error> {
        const SOAP_ENVELOPE: &str = "soap:Envelope";
        const SOAP_HEADER: &str = "soap:Header";
        const SOAP_BODY: &str = "soap:Body";

        let mut writer = {
            let inner: Vec<u8> = Default::default();
            Writer::new(inner)
        };

        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;

        // We manually write these elements in order to control the name we
        // write the body with.
        writer.write_event(Event::Start(
            BytesStart::new(SOAP_ENVELOPE).with_attributes([("xmlns:soap", SOAP_NS_URI)]),
        ))?;

        if let Some(header) = &self.header {
            writer.write_event(Event::Start(BytesStart::new(SOAP_HEADER)))?;
            header.serialize_as_element(&mut writer, "context")?;
            writer.write_event(Event::End(BytesEnd::new(SOAP_HEADER)))?;
        }

        writer.write_event(Event::Start(BytesStart::new(SOAP_BODY)))?;

        // Write the operation itself.
        self.body
            .serialize_as_element(&mut writer, <B as sealed::EnvelopeBodyContents>::name())?;

        writer.write_event(Event::End(BytesEnd::new(SOAP_BODY)))?;
        writer.write_event(Event::End(BytesEnd::new(SOAP_ENVELOPE)))?;

        Ok(writer.into_inner())
    }
}

impl<B> Envelope<B>
where
    B: OperationResponse,
{
    /// Populates an [`Envelope`] from raw XML.
    ///
    /// A body containing a SOAP fault rather than the expected response is
    /// returned as [`Error::RequestFault`].
    pub fn from_xml_document(document: &[u8]) -> Result<Self, Error> {
        let de = &mut quick_xml::de::Deserializer::from_reader(document);

        // `serde_path_to_error` ensures that we get sufficient information to
        // debug errors in deserialization. serde's default errors only provide
        // the immediate error with no context; this gives us a description of
        // the context within the structure.
        let envelope: DeserializeEnvelope<B> = serde_path_to_error::deserialize(de)?;

        match envelope.body {
            EnvelopeContent::Body(body) => Ok(Envelope {
                header: envelope.header,
                body,
            }),
            EnvelopeContent::Fault(fault) => {
                log::warn!(
                    "request failed with fault `{}`: {}",
                    fault.error_code().unwrap_or(&fault.code.value),
                    fault.reason()
                );

                Err(Error::RequestFault(Box::new(fault)))
            }
        }
    }
}

/// A structured representation of a SOAP 1.2 fault, indicating an error in a
/// Zimbra request.
///
/// See <https://www.w3.org/TR/soap12-part1/#soapfault>
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct Fault {
    /// Whether the fault lies with the sender or the receiver.
    pub code: FaultCode,

    pub reason: FaultReason,

    /// Clarifying information about Zimbra-specific errors.
    pub detail: Option<FaultDetail>,
}

impl Fault {
    /// Gets the human-readable description of the error.
    pub fn reason(&self) -> &str {
        &self.reason.text
    }

    /// Gets the Zimbra error code, e.g. `mail.NO_SUCH_FOLDER`, if the server
    /// provided one.
    pub fn error_code(&self) -> Option<&str> {
        self.detail
            .as_ref()
            .and_then(|detail| detail.error.as_ref())
            .map(|error| error.code.as_str())
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct FaultCode {
    /// A qualified name such as `soap:Sender` or `soap:Receiver`.
    // `quick_xml::name::QName` borrows from the input, so we keep the text.
    pub value: String,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct FaultReason {
    pub text: String,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct FaultDetail {
    pub error: Option<ServiceError>,
}

/// The `<Error>` element Zimbra places in the detail of a fault.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct ServiceError {
    pub code: String,

    /// A server-side identifier for the failed request, for use in logs.
    pub trace: Option<String>,

    /// Arguments describing the error, e.g. the id of a missing item.
    #[serde(rename = "a", default)]
    pub arguments: Vec<ErrorArgument>,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct ErrorArgument {
    #[serde(rename = "@n")]
    pub name: String,

    /// The type of the argument, e.g. `IID` or `STR`.
    #[serde(rename = "@t")]
    pub arg_type: Option<String>,

    #[serde(rename = "$text", default)]
    pub value: String,
}
