/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! This crate provides the record model and XML serialization contract used by
//! Zimbra's mail and calendar SOAP protocol.
//!
//! There are two complementary halves:
//!
//! - Typed structures derive [`XmlSerialize`] (and the schema description
//!   traits [`Describe`], [`WireEnum`] and [`PolymorphicUnion`]) and are read
//!   back with `serde` through `quick_xml`'s deserializer.
//! - A runtime [`Registry`] of [`RecordType`]s built from [`FieldDescriptor`]s
//!   drives a generic binder which reads and writes dynamic [`Record`]s.
//!
//! Both halves share the same wire conventions: names are lowerCamelCase by
//! default, booleans are written as `"1"`/`"0"`, absent optional values
//! produce no output, lists are written as repeated sibling elements
//! (optionally enclosed in a wrapper element) and elements without content are
//! written as empty tags.
//!
//! # Limitations
//!
//! The camelCase mapping of field names is naïve and depends on
//! [`char::to_ascii_uppercase`], making it unsuitable for use with non-ASCII
//! identifiers.
//!
//! Typed deserialization relies on `quick_xml`'s serde support, and so
//! any-element capture is only available through the dynamic binder.

extern crate self as zm_xml;

mod binder;
pub mod de;
mod impls;
mod json;
mod record;
mod registry;
mod schema;
pub mod tri_state;
mod union;
mod wire_enum;

use quick_xml::{
    events::{BytesEnd, BytesStart, Event},
    Writer,
};
use thiserror::Error;

pub use json::{CONTENT_KEY, NAMESPACE_KEY};
pub use record::{Record, Value};
pub use registry::Registry;
pub use schema::{
    BindingKind, Describe, FieldDescriptor, RecordType, RecordTypeHandle, RecordTypeSpec,
    SchemaError, ValueKind, WireValue,
};
pub use tri_state::ZmBoolean;
pub use union::{PolymorphicUnion, UnionTable};
pub use wire_enum::{EnumMapping, InvalidEnumValue, WireEnum};
pub use zm_xml_derive::*;

/// A data structure which can be serialized as XML content nodes.
///
/// # Usage
///
/// The following demonstrates end-to-end usage of `XmlSerialize` with both
/// derived and manual implementations.
///
/// ```
/// use quick_xml::{
///     events::{BytesText, Event},
///     writer::Writer
/// };
/// use zm_xml::{Error, XmlSerialize};
///
/// #[derive(XmlSerialize)]
/// #[xml_struct(default_ns = "urn:zimbraMail")]
/// struct Foo {
///     #[xml_struct(attribute)]
///     folder_id: String,
///
///     #[xml_struct(flatten)]
///     something_else: Bar,
/// }
///
/// enum Bar {
///     Baz,
///     Qux(String),
/// }
///
/// impl XmlSerialize for Bar {
///     fn serialize_child_nodes<W>(&self, writer: &mut Writer<W>) -> Result<(), Error>
///     where
///         W: std::io::Write,
///     {
///         match self {
///             Self::Baz => writer.write_event(Event::Text(BytesText::new("BAZ")))?,
///             Self::Qux(qux) => qux.serialize_as_element(writer, "qux")?,
///         }
///
///         Ok(())
///     }
/// }
///
/// impl zm_xml::WireValue for Bar {
///     fn value_kind() -> zm_xml::ValueKind {
///         zm_xml::ValueKind::String
///     }
/// }
///
/// let mut writer: Writer<Vec<u8>> = Writer::new(Vec::new());
/// let foo = Foo {
///     folder_id: "2".into(),
///     something_else: Bar::Baz,
/// };
///
/// assert!(foo.serialize_as_element(&mut writer, "action").is_ok());
///
/// let out = writer.into_inner();
/// let out = std::str::from_utf8(&out).unwrap();
///
/// assert_eq!(
///     out,
///     r#"<action xmlns="urn:zimbraMail" folderId="2">BAZ</action>"#,
/// );
/// ```
pub trait XmlSerialize {
    /// Serializes this value as XML content nodes within an enclosing XML
    /// element.
    ///
    /// The element is written as an empty tag if this value produces no
    /// content nodes.
    fn serialize_as_element<W>(&self, writer: &mut Writer<W>, name: &str) -> Result<(), Error>
    where
        W: std::io::Write,
    {
        let mut start_tag = BytesStart::new(name);
        self.serialize_attributes(&mut start_tag);

        write_element(writer, name, start_tag, |content| {
            self.serialize_child_nodes(content)
        })
    }

    /// Adds any attributes carried by this value to the start tag of its
    /// enclosing element.
    ///
    /// Most values carry no attributes. Structures embedded without an
    /// enclosing element (such as a base record) use this to contribute their
    /// attributes to the element of the structure embedding them.
    fn serialize_attributes(&self, _start_tag: &mut BytesStart) {}

    /// Serializes this value as XML content nodes.
    fn serialize_child_nodes<W>(&self, writer: &mut Writer<W>) -> Result<(), Error>
    where
        W: std::io::Write;
}

/// A data structure which can be serialized as the value of an XML attribute.
pub trait XmlSerializeAttr {
    /// Serializes this value as the value of an XML attribute.
    fn serialize_as_attribute(&self, start_tag: &mut BytesStart, name: &str);
}

/// Writes an element with the provided start tag, using `write_content` to
/// produce its content nodes.
///
/// Content is buffered so that an element without content can be written as
/// an empty tag, e.g. `<grant perm="r" gt="usr"/>`.
pub fn write_element<W, F>(
    writer: &mut Writer<W>,
    name: &str,
    start_tag: BytesStart<'_>,
    write_content: F,
) -> Result<(), Error>
where
    W: std::io::Write,
    F: FnOnce(&mut Writer<Vec<u8>>) -> Result<(), Error>,
{
    let mut content = Writer::new(Vec::new());
    write_content(&mut content)?;
    let content = content.into_inner();

    if content.is_empty() {
        writer.write_event(Event::Empty(start_tag))?;
    } else {
        writer.write_event(Event::Start(start_tag))?;
        writer.get_mut().write_all(&content)?;
        writer.write_event(Event::End(BytesEnd::new(name)))?;
    }

    Ok(())
}

/// An error generated while defining record types or while serializing or
/// deserializing records.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("failed to process XML document")]
    Xml(#[from] quick_xml::Error),

    #[error("failed to write XML content")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    InvalidEnumValue(#[from] InvalidEnumValue),

    #[error("`{record}` requires a value for field `{field}`")]
    MissingRequiredField { record: String, field: String },

    #[error("field `{field}` of `{record}` is required and cannot be changed after construction")]
    ImmutableField { record: String, field: String },

    #[error("field `{field}` of `{record}` expects {expected}, got {actual}")]
    TypeMismatch {
        record: String,
        field: String,
        expected: String,
        actual: String,
    },

    #[error("`{record}` has no field named `{field}`")]
    UnknownField { record: String, field: String },

    #[error("invalid value `{value}` for field `{field}` of `{record}`")]
    InvalidValue {
        record: String,
        field: String,
        value: String,
    },

    #[error("element `{tag}` is not a variant of `{union}`")]
    UnknownVariant { union: String, tag: String },

    #[error("unexpected element `{element}` in `{record}`")]
    UnexpectedElement { record: String, element: String },

    #[error("document ended inside `{0}`")]
    UnexpectedEof(String),

    #[error("document contains no root element")]
    MissingRootElement,

    #[error("no record type named `{0}` is registered")]
    UnknownRecordType(String),

    #[error("no enum named `{0}` is registered")]
    UnknownEnum(String),

    #[error("no union named `{0}` is registered")]
    UnknownUnion(String),
}
