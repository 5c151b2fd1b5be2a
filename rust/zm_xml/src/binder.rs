/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! Encoding and decoding of dynamic records, driven by field descriptors.

use quick_xml::{
    events::{BytesEnd, BytesStart, BytesText, Event},
    Reader, Writer,
};

use crate::{
    tri_state, write_element, BindingKind, Error, FieldDescriptor, Record, RecordTypeHandle,
    Registry, UnionTable, Value, ValueKind,
};

impl Registry {
    /// Encodes a record as an element with the given name.
    pub fn encode(&self, record: &Record, element_name: &str) -> Result<String, Error> {
        let mut writer = Writer::new(Vec::new());
        self.encode_to_writer(&mut writer, record, element_name)?;

        Ok(String::from_utf8_lossy(&writer.into_inner()).into_owned())
    }

    /// Encodes a record as a member of a union, returning the XML along with
    /// the tag name the union assigns to the record's type.
    pub fn encode_union(&self, union: &str, record: &Record) -> Result<(String, String), Error> {
        let tag = self.union(union)?.tag_for(record)?.to_owned();
        let xml = self.encode(record, &tag)?;

        Ok((tag, xml))
    }

    /// Writes a record as an element with the given name.
    pub fn encode_to_writer<W>(
        &self,
        writer: &mut Writer<W>,
        record: &Record,
        element_name: &str,
    ) -> Result<(), Error>
    where
        W: std::io::Write,
    {
        let mut start_tag = BytesStart::new(element_name);
        for (field, value) in record.entries() {
            if let (BindingKind::Attribute, Some(value)) = (field.binding(), value) {
                let token = self.scalar_token(record, field, field.kind(), value)?;
                start_tag.push_attribute((field.wire_name(), token.as_str()));
            }
        }

        let write_content = |content: &mut Writer<Vec<u8>>| -> Result<(), Error> {
            for (field, value) in record.entries() {
                let Some(value) = value else {
                    continue;
                };

                match field.binding() {
                    BindingKind::Attribute => (),
                    BindingKind::Element => self.encode_element_field(content, record, field, value)?,
                    BindingKind::TextValue => {
                        let token = self.scalar_token(record, field, field.kind(), value)?;
                        content.write_event(Event::Text(BytesText::new(&token)))?;
                    }
                    BindingKind::AnyElement => {
                        for item in value.as_list().unwrap_or_default() {
                            if let Value::RawXml(raw) = item {
                                content.write_event(Event::Text(BytesText::from_escaped(raw.as_str())))?;
                            }
                        }
                    }
                }
            }

            Ok(())
        };

        // A present text value keeps its end tag even when empty, so that it
        // decodes as an empty string rather than as an absent one.
        let has_text = record
            .entries()
            .any(|(field, value)| field.binding() == BindingKind::TextValue && value.is_some());
        if !has_text {
            return write_element(writer, element_name, start_tag, write_content);
        }

        let mut content = Writer::new(Vec::new());
        write_content(&mut content)?;

        writer.write_event(Event::Start(start_tag))?;
        writer.get_mut().write_all(&content.into_inner())?;
        writer.write_event(Event::End(BytesEnd::new(element_name)))?;

        Ok(())
    }

    /// Decodes a document whose root element is a record of the named type.
    pub fn decode(&self, type_name: &str, xml: &str) -> Result<Record, Error> {
        let record_type = self.record_type(type_name)?.clone();
        let mut decoder = Decoder::new(self, xml);
        let (root, is_empty) = decoder.root()?;

        decoder.decode_record(&record_type, &root, is_empty)
    }

    /// Decodes a document whose root element is a member of the named union,
    /// selecting the record type by the root element's name.
    pub fn decode_union(&self, union: &str, xml: &str) -> Result<Record, Error> {
        let table = self.union(union)?;
        let mut decoder = Decoder::new(self, xml);
        let (root, is_empty) = decoder.root()?;

        decoder.decode_member(table, &root, is_empty)
    }

    fn encode_element_field<W>(
        &self,
        writer: &mut Writer<W>,
        record: &Record,
        field: &FieldDescriptor,
        value: &Value,
    ) -> Result<(), Error>
    where
        W: std::io::Write,
    {
        let item_kind = field.kind().item_kind();

        match (value, field.wrapper()) {
            (Value::List(items), Some(_)) if items.is_empty() => Ok(()),
            (Value::List(items), Some(wrapper)) => {
                write_element(writer, wrapper, BytesStart::new(wrapper), |content| {
                    for item in items {
                        self.encode_item(content, record, field, item_kind, item)?;
                    }

                    Ok(())
                })
            }
            (Value::List(items), None) => {
                for item in items {
                    self.encode_item(writer, record, field, item_kind, item)?;
                }

                Ok(())
            }
            (single, _) => self.encode_item(writer, record, field, item_kind, single),
        }
    }

    fn encode_item<W>(
        &self,
        writer: &mut Writer<W>,
        owner: &Record,
        field: &FieldDescriptor,
        kind: &ValueKind,
        value: &Value,
    ) -> Result<(), Error>
    where
        W: std::io::Write,
    {
        match (kind, value) {
            (ValueKind::Union(union), Value::Record(member)) => {
                let tag = self.union(union)?.tag_for(member)?;
                self.encode_to_writer(writer, member, tag)
            }
            (ValueKind::NestedRecord(name), Value::Record(nested)) => {
                if nested.type_name() != name {
                    return Err(Error::TypeMismatch {
                        record: owner.type_name().to_owned(),
                        field: field.name().to_owned(),
                        expected: kind.to_string(),
                        actual: value.describe(),
                    });
                }

                self.encode_to_writer(writer, nested, field.wire_name())
            }
            (ValueKind::RawXml, Value::RawXml(raw)) => {
                writer.write_event(Event::Text(BytesText::from_escaped(raw.as_str())))?;

                Ok(())
            }
            (kind, value) => {
                let token = self.scalar_token(owner, field, kind, value)?;
                let name = field.wire_name();

                write_element(writer, name, BytesStart::new(name), |content| {
                    content.write_event(Event::Text(BytesText::new(&token)))?;

                    Ok(())
                })
            }
        }
    }

    /// Formats a scalar value as its wire token.
    fn scalar_token(
        &self,
        owner: &Record,
        field: &FieldDescriptor,
        kind: &ValueKind,
        value: &Value,
    ) -> Result<String, Error> {
        let token = match (kind, value) {
            (ValueKind::String, Value::String(value)) => value.clone(),
            (ValueKind::Integer, Value::Integer(value)) => value.to_string(),
            (ValueKind::Long, Value::Long(value)) => value.to_string(),
            (ValueKind::Byte, Value::Byte(value)) => value.to_string(),
            (ValueKind::Boolean, Value::Boolean(value)) => tri_state::token_for(*value).to_owned(),
            (ValueKind::Enum(name), Value::Enum(symbol)) => {
                self.enum_mapping(name)?.to_token(symbol)?.to_owned()
            }
            (kind, value) => {
                return Err(Error::TypeMismatch {
                    record: owner.type_name().to_owned(),
                    field: field.name().to_owned(),
                    expected: kind.to_string(),
                    actual: value.describe(),
                })
            }
        };

        Ok(token)
    }
}

/// A pull-parser over a single document.
struct Decoder<'r, 'x> {
    registry: &'r Registry,
    reader: Reader<&'x [u8]>,
}

impl<'r, 'x> Decoder<'r, 'x> {
    fn new(registry: &'r Registry, xml: &'x str) -> Self {
        Self {
            registry,
            reader: Reader::from_str(xml),
        }
    }

    /// Advances to the root element, returning its start tag and whether it is
    /// an empty tag.
    fn root(&mut self) -> Result<(BytesStart<'x>, bool), Error> {
        loop {
            match self.reader.read_event()? {
                Event::Start(start) => return Ok((start, false)),
                Event::Empty(start) => return Ok((start, true)),
                Event::Eof => return Err(Error::MissingRootElement),

                // Declarations, comments and whitespace before the root.
                _ => continue,
            }
        }
    }

    fn decode_record(
        &mut self,
        record_type: &RecordTypeHandle,
        start: &BytesStart<'x>,
        is_empty: bool,
    ) -> Result<Record, Error> {
        log::trace!("decoding `{}` as `{}`", local_name(start), record_type.name());

        let mut record = Record::blank(record_type.clone());

        for attribute in start.attributes() {
            let attribute = attribute.map_err(quick_xml::Error::from)?;
            let key = String::from_utf8_lossy(attribute.key.local_name().as_ref()).into_owned();

            if attribute.key.as_ref() == b"xmlns" || attribute.key.as_ref().starts_with(b"xmlns:") {
                continue;
            }

            match record_type.attribute_index(&key) {
                Some(index) => {
                    let field = &record_type.fields()[index];
                    let text = attribute.unescape_value()?;
                    let value = self.parse_scalar(record_type, field, field.kind(), &text)?;
                    record.put(index, value);
                }
                None => log::debug!(
                    "ignoring unmapped attribute `{key}` on `{}`",
                    record_type.name()
                ),
            }
        }

        if !is_empty {
            let mut text = String::new();
            let mut has_children = false;

            loop {
                match self.reader.read_event()? {
                    Event::Start(child) => {
                        has_children = true;
                        self.decode_child(&mut record, &child, false)?
                    }
                    Event::Empty(child) => {
                        has_children = true;
                        self.decode_child(&mut record, &child, true)?
                    }
                    Event::Text(content) => text.push_str(&content.unescape()?),
                    Event::CData(content) => text.push_str(&String::from_utf8_lossy(&content)),
                    Event::End(_) => break,
                    Event::Eof => return Err(Error::UnexpectedEof(record_type.name().to_owned())),
                    _ => (),
                }
            }

            match record_type.text_index() {
                Some(index) => {
                    let field = &record_type.fields()[index];
                    // `<a n="k"></a>` carries an empty string; `<a n="k"/>`
                    // carries none.
                    let empty_string =
                        !has_children && matches!(field.kind(), ValueKind::String);
                    if !text.is_empty() || empty_string || field.is_required() {
                        let value = self.parse_scalar(record_type, field, field.kind(), &text)?;
                        record.put(index, value);
                    }
                }
                None if !text.trim().is_empty() => log::debug!(
                    "ignoring text content of `{}`",
                    record_type.name()
                ),
                None => (),
            }
        } else if let Some(index) = record_type.text_index() {
            let field = &record_type.fields()[index];
            if field.is_required() {
                let value = self.parse_scalar(record_type, field, field.kind(), "")?;
                record.put(index, value);
            }
        }

        record.check_required()?;

        Ok(record)
    }

    fn decode_child(
        &mut self,
        record: &mut Record,
        child: &BytesStart<'x>,
        is_empty: bool,
    ) -> Result<(), Error> {
        let record_type = record.record_type().clone();
        let name = local_name(child);

        if let Some(index) = record_type.element_index(&name) {
            let field = &record_type.fields()[index];

            if field.wrapper().is_some() {
                if !is_empty {
                    self.decode_wrapped(record, index)?;
                }
            } else {
                let value = self.decode_value(&record_type, field, field.kind().item_kind(), child, is_empty)?;
                if field.kind().is_list() {
                    record.push(index, value);
                } else {
                    record.put(index, value);
                }
            }

            return Ok(());
        }

        let registry = self.registry;
        for (index, union) in record_type.union_fields() {
            let table = registry.union(union)?;
            if table.contains(&name) {
                let value = self.decode_member(table, child, is_empty)?;
                if record_type.fields()[index].kind().is_list() {
                    record.push(index, Value::Record(value));
                } else {
                    record.put(index, Value::Record(value));
                }

                return Ok(());
            }
        }

        if let Some(index) = record_type.any_index() {
            let raw = self.capture_raw(child, is_empty)?;
            record.push(index, Value::RawXml(raw));

            return Ok(());
        }

        // An element which matches nothing is an unknown variant if the record
        // dispatches through a union.
        if let Some((_, union)) = record_type.union_fields().next() {
            return Err(Error::UnknownVariant {
                union: union.to_owned(),
                tag: name,
            });
        }

        Err(Error::UnexpectedElement {
            record: record_type.name().to_owned(),
            element: name,
        })
    }

    /// Decodes the items enclosed in a list's wrapper element.
    fn decode_wrapped(&mut self, record: &mut Record, index: usize) -> Result<(), Error> {
        let record_type = record.record_type().clone();
        let field = &record_type.fields()[index];
        let item_kind = field.kind().item_kind();

        loop {
            let value = match self.reader.read_event()? {
                Event::Start(item) => self.decode_value(&record_type, field, item_kind, &item, false)?,
                Event::Empty(item) => self.decode_value(&record_type, field, item_kind, &item, true)?,
                Event::End(_) => return Ok(()),
                Event::Eof => {
                    return Err(Error::UnexpectedEof(
                        field.wrapper().unwrap_or(field.wire_name()).to_owned(),
                    ))
                }
                _ => continue,
            };

            record.push(index, value);
        }
    }

    /// Decodes a single element as a value of the given kind.
    fn decode_value(
        &mut self,
        owner: &RecordTypeHandle,
        field: &FieldDescriptor,
        kind: &ValueKind,
        start: &BytesStart<'x>,
        is_empty: bool,
    ) -> Result<Value, Error> {
        let registry = self.registry;

        match kind {
            ValueKind::NestedRecord(name) => {
                let nested = registry.record_type(name)?.clone();
                Ok(Value::Record(self.decode_record(&nested, start, is_empty)?))
            }
            ValueKind::Union(name) => {
                let table = registry.union(name)?;
                Ok(Value::Record(self.decode_member(table, start, is_empty)?))
            }
            ValueKind::RawXml => Ok(Value::RawXml(self.capture_raw(start, is_empty)?)),
            ValueKind::ListOf(_) => Err(Error::UnexpectedElement {
                record: owner.name().to_owned(),
                element: local_name(start),
            }),
            scalar => {
                let text = if is_empty {
                    String::new()
                } else {
                    self.read_scalar_text(owner)?
                };

                self.parse_scalar(owner, field, scalar, &text)
            }
        }
    }

    /// Decodes an element as whichever union member its name selects.
    fn decode_member(
        &mut self,
        table: &UnionTable,
        start: &BytesStart<'x>,
        is_empty: bool,
    ) -> Result<Record, Error> {
        let record_type = self
            .registry
            .record_type(table.resolve(&local_name(start))?)?
            .clone();

        self.decode_record(&record_type, start, is_empty)
    }

    /// Reads the text content of the current element up to its end tag.
    fn read_scalar_text(&mut self, owner: &RecordTypeHandle) -> Result<String, Error> {
        let mut text = String::new();

        loop {
            match self.reader.read_event()? {
                Event::Text(content) => text.push_str(&content.unescape()?),
                Event::CData(content) => text.push_str(&String::from_utf8_lossy(&content)),
                Event::End(_) => return Ok(text),
                Event::Start(child) | Event::Empty(child) => {
                    return Err(Error::UnexpectedElement {
                        record: owner.name().to_owned(),
                        element: local_name(&child),
                    })
                }
                Event::Eof => return Err(Error::UnexpectedEof(owner.name().to_owned())),
                _ => (),
            }
        }
    }

    /// Captures an element, including its content, verbatim.
    fn capture_raw(&mut self, start: &BytesStart<'x>, is_empty: bool) -> Result<String, Error> {
        let open = String::from_utf8_lossy(start);
        if is_empty {
            return Ok(format!("<{open}/>"));
        }

        let inner = self.reader.read_text(start.name())?;
        let end = start.name();
        let name = String::from_utf8_lossy(end.as_ref());

        Ok(format!("<{open}>{inner}</{name}>"))
    }

    fn parse_scalar(
        &self,
        owner: &RecordTypeHandle,
        field: &FieldDescriptor,
        kind: &ValueKind,
        text: &str,
    ) -> Result<Value, Error> {
        let invalid = || Error::InvalidValue {
            record: owner.name().to_owned(),
            field: field.name().to_owned(),
            value: text.to_owned(),
        };

        let value = match kind {
            ValueKind::String => Value::String(text.to_owned()),
            ValueKind::Integer => Value::Integer(text.trim().parse().map_err(|_| invalid())?),
            ValueKind::Long => Value::Long(text.trim().parse().map_err(|_| invalid())?),
            ValueKind::Byte => Value::Byte(text.trim().parse().map_err(|_| invalid())?),
            ValueKind::Boolean => Value::Boolean(tri_state::parse_token(text)?),
            ValueKind::Enum(name) => {
                let symbol = self.registry.enum_mapping(name)?.from_token(text)?;
                Value::Enum(symbol.to_owned())
            }
            other => {
                return Err(Error::TypeMismatch {
                    record: owner.name().to_owned(),
                    field: field.name().to_owned(),
                    expected: other.to_string(),
                    actual: "text".into(),
                })
            }
        };

        Ok(value)
    }
}

fn local_name(start: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(start.local_name().as_ref()).into_owned()
}
