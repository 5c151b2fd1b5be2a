/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! This module provides implementations of serialization for common types from
//! the standard library.

use quick_xml::{
    events::{BytesStart, BytesText, Event},
    Writer,
};

use crate::{Error, ValueKind, WireValue, XmlSerialize, XmlSerializeAttr};

/// Serializes a string as a text content node.
impl XmlSerialize for str {
    fn serialize_child_nodes<W>(&self, writer: &mut Writer<W>) -> Result<(), Error>
    where
        W: std::io::Write,
    {
        writer.write_event(Event::Text(BytesText::new(self)))?;

        Ok(())
    }
}

/// Serializes a reference to a string as a text content node.
impl<T> XmlSerialize for &T
where
    T: AsRef<str>,
{
    fn serialize_child_nodes<W>(&self, writer: &mut Writer<W>) -> Result<(), Error>
    where
        W: std::io::Write,
    {
        writer.write_event(Event::Text(BytesText::new(self.as_ref())))?;

        Ok(())
    }
}

/// Serializes a string as a text content node.
impl XmlSerialize for String {
    fn serialize_child_nodes<W>(&self, writer: &mut Writer<W>) -> Result<(), Error>
    where
        W: std::io::Write,
    {
        writer.write_event(Event::Text(BytesText::new(self.as_str())))?;

        Ok(())
    }
}

/// Serializes a string as a text content node.
impl XmlSerialize for &str {
    fn serialize_child_nodes<W>(&self, writer: &mut Writer<W>) -> Result<(), Error>
    where
        W: std::io::Write,
    {
        writer.write_event(Event::Text(BytesText::new(self)))?;

        Ok(())
    }
}

/// Serializes the contents of an `Option<T>` as content nodes.
///
/// `Some(t)` is serialized identically to `t`, while `None` produces no output.
impl<T> XmlSerialize for Option<T>
where
    T: XmlSerialize,
{
    fn serialize_as_element<W>(&self, writer: &mut Writer<W>, name: &str) -> Result<(), Error>
    where
        W: std::io::Write,
    {
        match self {
            Some(value) => <T as XmlSerialize>::serialize_as_element(value, writer, name),
            None => Ok(()),
        }
    }

    fn serialize_attributes(&self, start_tag: &mut BytesStart) {
        if let Some(value) = self {
            <T as XmlSerialize>::serialize_attributes(value, start_tag);
        }
    }

    fn serialize_child_nodes<W>(&self, writer: &mut Writer<W>) -> Result<(), Error>
    where
        W: std::io::Write,
    {
        match self {
            Some(value) => <T as XmlSerialize>::serialize_child_nodes(value, writer),
            None => Ok(()),
        }
    }
}

/// Serializes the contents of a `Vec<T>`.
///
/// As an element, each item is written as its own sibling element with the
/// given name. As content nodes, each item is serialized via its
/// `serialize_child_nodes()` implementation. If the `Vec` is empty, no output
/// is produced.
impl<T> XmlSerialize for Vec<T>
where
    T: XmlSerialize,
{
    fn serialize_as_element<W>(&self, writer: &mut Writer<W>, name: &str) -> Result<(), Error>
    where
        W: std::io::Write,
    {
        for value in self {
            <T as XmlSerialize>::serialize_as_element(value, writer, name)?;
        }

        Ok(())
    }

    fn serialize_child_nodes<W>(&self, writer: &mut Writer<W>) -> Result<(), Error>
    where
        W: std::io::Write,
    {
        for value in self {
            <T as XmlSerialize>::serialize_child_nodes(value, writer)?;
        }

        Ok(())
    }
}

/// Serializes a string as an XML attribute value.
impl XmlSerializeAttr for str {
    fn serialize_as_attribute(&self, start_tag: &mut BytesStart, name: &str) {
        start_tag.push_attribute((name, self));
    }
}

/// Serializes a reference to a string as an XML attribute value.
impl<T> XmlSerializeAttr for &T
where
    T: AsRef<str>,
{
    fn serialize_as_attribute(&self, start_tag: &mut BytesStart, name: &str) {
        start_tag.push_attribute((name, self.as_ref()));
    }
}

/// Serializes a string as an XML attribute value.
impl XmlSerializeAttr for String {
    fn serialize_as_attribute(&self, start_tag: &mut BytesStart, name: &str) {
        start_tag.push_attribute((name, self.as_str()));
    }
}

/// Serializes a string as an XML attribute value.
impl XmlSerializeAttr for &str {
    fn serialize_as_attribute(&self, start_tag: &mut BytesStart, name: &str) {
        start_tag.push_attribute((name, *self));
    }
}

/// Serializes the contents of an `Option<T>` as an XML attribute value.
///
/// `Some(t)` is serialized identically to `t`, while `None` produces no output.
impl<T> XmlSerializeAttr for Option<T>
where
    T: XmlSerializeAttr,
{
    fn serialize_as_attribute(&self, start_tag: &mut BytesStart, name: &str) {
        if let Some(value) = self {
            value.serialize_as_attribute(start_tag, name);
        }
    }
}

/// Serializes a boolean as the text `1` or `0`.
impl XmlSerialize for bool {
    fn serialize_child_nodes<W>(&self, writer: &mut Writer<W>) -> Result<(), Error>
    where
        W: std::io::Write,
    {
        let text = crate::tri_state::token_for(*self);
        writer.write_event(Event::Text(BytesText::new(text)))?;

        Ok(())
    }
}

/// Serializes a boolean as the attribute value `1` or `0`.
impl XmlSerializeAttr for bool {
    fn serialize_as_attribute(&self, start_tag: &mut BytesStart, name: &str) {
        start_tag.push_attribute((name, crate::tri_state::token_for(*self)));
    }
}

/// Implements serialization of a type as either an XML text node or attribute
/// value.
///
/// This is a convenience macro intended for implementing basic serialization of
/// primitive/standard library types. This is done per-type rather than
/// wholesale for `ToString` in order to avoid requiring that `Display` and
/// `XmlSerialize`/`XmlSerializeAttr` share a form.
macro_rules! impl_as_text_for {
    ($( $ty:ty ),*) => {
        $(
        /// Serializes an integer as a text content node.
        impl XmlSerialize for $ty {
            fn serialize_child_nodes<W>(&self, writer: &mut Writer<W>) -> Result<(), Error>
            where
                W: std::io::Write,
            {
                let string = self.to_string();
                writer.write_event(Event::Text(BytesText::new(&string)))?;

                Ok(())
            }
        }

        /// Serializes an integer as an XML attribute value.
        impl XmlSerializeAttr for $ty {
            fn serialize_as_attribute(&self, start_tag: &mut BytesStart, name: &str) {
                start_tag.push_attribute((name, self.to_string().as_str()));
            }
        })*
    };
}

impl_as_text_for!(i8, u8, i16, u16, i32, u32, i64, u64);

/// Implements [`WireValue`] for scalar types with a fixed value kind.
macro_rules! impl_wire_value_for {
    ($( $ty:ty => $kind:ident ),* $(,)?) => {
        $(
        impl WireValue for $ty {
            fn value_kind() -> ValueKind {
                ValueKind::$kind
            }
        })*
    };
}

impl_wire_value_for!(
    String => String,
    bool => Boolean,
    i8 => Byte,
    u8 => Integer,
    i16 => Integer,
    u16 => Integer,
    i32 => Integer,
    u32 => Long,
    i64 => Long,
    u64 => Long,
);

/// An absent value is described by the kind of its content and is never
/// required.
impl<T> WireValue for Option<T>
where
    T: WireValue,
{
    fn value_kind() -> ValueKind {
        T::value_kind()
    }

    fn is_optional() -> bool {
        true
    }
}

/// Lists are never required; an absent list is an empty one.
impl<T> WireValue for Vec<T>
where
    T: WireValue,
{
    fn value_kind() -> ValueKind {
        ValueKind::list_of(T::value_kind())
    }

    fn is_optional() -> bool {
        true
    }
}
