/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! Rendering of dynamic records in Zimbra's JSON form of SOAP structures.
//!
//! The JSON form is driven by the same field descriptors as the XML binder:
//!
//! - attributes become members holding typed scalars, so integers are numbers
//!   and booleans are `true`/`false` rather than `"1"`/`"0"`;
//! - text content becomes the `_content` member;
//! - child elements become arrays of objects keyed by element name, with
//!   repeated elements and union members of the same tag sharing one array;
//! - scalar child elements become objects holding only `_content`.

use serde_json::{Map, Value as JsonValue};

use crate::{BindingKind, Error, FieldDescriptor, Record, Registry, Value, ValueKind};

/// The member holding an element's text content.
pub const CONTENT_KEY: &str = "_content";

/// The member holding the namespace of a request or response body.
pub const NAMESPACE_KEY: &str = "_jsns";

impl Registry {
    /// Renders a record as a JSON object.
    pub fn encode_json(&self, record: &Record) -> Result<JsonValue, Error> {
        Ok(JsonValue::Object(self.json_object(record)?))
    }

    /// Renders a record as the body of a request or response in the given
    /// namespace.
    pub fn encode_json_in_namespace(
        &self,
        record: &Record,
        namespace: &str,
    ) -> Result<JsonValue, Error> {
        let mut object = self.json_object(record)?;
        object.insert(
            NAMESPACE_KEY.to_owned(),
            JsonValue::String(namespace.to_owned()),
        );

        Ok(JsonValue::Object(object))
    }

    fn json_object(&self, record: &Record) -> Result<Map<String, JsonValue>, Error> {
        let mut object = Map::new();

        for (field, value) in record.entries() {
            let Some(value) = value else {
                continue;
            };

            match field.binding() {
                BindingKind::Attribute => {
                    let scalar = self.json_scalar(record, field, field.kind(), value)?;
                    object.insert(field.wire_name().to_owned(), scalar);
                }
                BindingKind::TextValue => {
                    let scalar = self.json_scalar(record, field, field.kind(), value)?;
                    object.insert(CONTENT_KEY.to_owned(), scalar);
                }
                BindingKind::Element => self.json_element_field(&mut object, record, field, value)?,
                BindingKind::AnyElement => {
                    // Captured markup is carried verbatim.
                    for item in value.as_list().unwrap_or_default() {
                        if let Value::RawXml(raw) = item {
                            push(&mut object, field.wire_name(), JsonValue::String(raw.clone()));
                        }
                    }
                }
            }
        }

        Ok(object)
    }

    fn json_element_field(
        &self,
        object: &mut Map<String, JsonValue>,
        record: &Record,
        field: &FieldDescriptor,
        value: &Value,
    ) -> Result<(), Error> {
        let item_kind = field.kind().item_kind();

        match (value, field.wrapper()) {
            (Value::List(items), Some(_)) if items.is_empty() => Ok(()),
            (Value::List(items), Some(wrapper)) => {
                let mut content = Map::new();
                for item in items {
                    self.json_item(&mut content, record, field, item_kind, item)?;
                }
                push(object, wrapper, JsonValue::Object(content));

                Ok(())
            }
            (Value::List(items), None) => {
                for item in items {
                    self.json_item(object, record, field, item_kind, item)?;
                }

                Ok(())
            }
            (single, _) => self.json_item(object, record, field, item_kind, single),
        }
    }

    fn json_item(
        &self,
        object: &mut Map<String, JsonValue>,
        owner: &Record,
        field: &FieldDescriptor,
        kind: &ValueKind,
        value: &Value,
    ) -> Result<(), Error> {
        let (key, rendered) = match (kind, value) {
            (ValueKind::Union(union), Value::Record(member)) => {
                let tag = self.union(union)?.tag_for(member)?;
                (tag, JsonValue::Object(self.json_object(member)?))
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

                (field.wire_name(), JsonValue::Object(self.json_object(nested)?))
            }
            (ValueKind::RawXml, Value::RawXml(raw)) => {
                (field.wire_name(), JsonValue::String(raw.clone()))
            }
            (kind, value) => {
                let mut content = Map::new();
                content.insert(
                    CONTENT_KEY.to_owned(),
                    self.json_scalar(owner, field, kind, value)?,
                );

                (field.wire_name(), JsonValue::Object(content))
            }
        };

        push(object, key, rendered);

        Ok(())
    }

    fn json_scalar(
        &self,
        owner: &Record,
        field: &FieldDescriptor,
        kind: &ValueKind,
        value: &Value,
    ) -> Result<JsonValue, Error> {
        let scalar = match (kind, value) {
            (ValueKind::String, Value::String(value)) => JsonValue::String(value.clone()),
            (ValueKind::Integer, Value::Integer(value)) => JsonValue::from(*value),
            (ValueKind::Long, Value::Long(value)) => JsonValue::from(*value),
            (ValueKind::Byte, Value::Byte(value)) => JsonValue::from(*value),
            (ValueKind::Boolean, Value::Boolean(value)) => JsonValue::Bool(*value),
            (ValueKind::Enum(name), Value::Enum(symbol)) => {
                JsonValue::String(self.enum_mapping(name)?.to_token(symbol)?.to_owned())
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

        Ok(scalar)
    }
}

/// Appends a child element to the array holding its siblings of the same name.
fn push(object: &mut Map<String, JsonValue>, key: &str, value: JsonValue) {
    let siblings = object
        .entry(key)
        .or_insert_with(|| JsonValue::Array(Vec::new()));

    if let JsonValue::Array(siblings) = siblings {
        siblings.push(value);
    }
}
