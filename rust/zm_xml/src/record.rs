/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use crate::{Error, FieldDescriptor, RecordTypeHandle};

/// The value of a single field of a dynamic [`Record`].
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    String(String),
    Integer(i32),
    Long(i64),
    Byte(i8),
    Boolean(bool),

    /// The symbol of an enum value.
    Enum(String),

    Record(Record),
    RawXml(String),
    List(Vec<Value>),
}

impl Value {
    /// Creates an enum value from its symbol.
    pub fn enum_symbol<S>(symbol: S) -> Self
    where
        S: Into<String>,
    {
        Self::Enum(symbol.into())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) | Self::Enum(value) | Self::RawXml(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(value) => Some(i64::from(*value)),
            Self::Long(value) => Some(*value),
            Self::Byte(value) => Some(i64::from(*value)),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Self::Record(record) => Some(record),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// A short description of this value's kind, for error messages.
    pub(crate) fn describe(&self) -> String {
        match self {
            Self::String(_) => "string".into(),
            Self::Integer(_) => "integer".into(),
            Self::Long(_) => "long".into(),
            Self::Byte(_) => "byte".into(),
            Self::Boolean(_) => "boolean".into(),
            Self::Enum(symbol) => format!("enum symbol `{symbol}`"),
            Self::Record(record) => format!("record `{}`", record.type_name()),
            Self::RawXml(_) => "raw XML".into(),
            Self::List(_) => "list".into(),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Integer(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Long(value)
    }
}

impl From<i8> for Value {
    fn from(value: i8) -> Self {
        Self::Byte(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<Record> for Value {
    fn from(value: Record) -> Self {
        Self::Record(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Self::List(value)
    }
}

/// An instance of a runtime [`RecordType`](crate::RecordType).
///
/// Required fields are set at construction and cannot be changed afterwards.
/// List fields always hold a list, which is empty when there is no data, and
/// are only exposed as slices.
#[derive(Clone, Debug, PartialEq)]
pub struct Record {
    record_type: RecordTypeHandle,

    /// One slot per field, parallel to the record type's field list.
    values: Vec<Option<Value>>,
}

impl Record {
    /// Creates a record with every scalar field absent and every list empty.
    pub(crate) fn blank(record_type: RecordTypeHandle) -> Self {
        let values = record_type
            .fields()
            .iter()
            .map(|field| field.kind().is_list().then(|| Value::List(Vec::new())))
            .collect();

        Self {
            record_type,
            values,
        }
    }

    pub fn record_type(&self) -> &RecordTypeHandle {
        &self.record_type
    }

    pub fn type_name(&self) -> &str {
        self.record_type.name()
    }

    /// Gets the value of a field.
    ///
    /// Absent optional fields yield `None`; list fields always yield a list.
    pub fn get(&self, field: &str) -> Result<Option<&Value>, Error> {
        let index = self.index_of(field)?;

        Ok(self.values[index].as_ref())
    }

    /// Gets a read-only view of the items of a list field.
    pub fn list(&self, field: &str) -> Result<&[Value], Error> {
        let index = self.index_of(field)?;

        match &self.values[index] {
            Some(Value::List(items)) => Ok(items),
            _ => Err(self.mismatch(index, "list")),
        }
    }

    /// Sets the value of an optional field.
    ///
    /// Lists are replaced wholesale by the supplied list, which the record
    /// takes ownership of.
    pub fn set<V>(&mut self, field: &str, value: V) -> Result<(), Error>
    where
        V: Into<Value>,
    {
        let value = value.into();
        let index = self.checked_index(field, &value)?;
        self.ensure_mutable(index)?;

        self.values[index] = Some(value);

        Ok(())
    }

    /// Clears an optional field. List fields become empty.
    pub fn unset(&mut self, field: &str) -> Result<(), Error> {
        let index = self.index_of(field)?;
        self.ensure_mutable(index)?;

        let descriptor = &self.record_type.fields()[index];
        self.values[index] = descriptor
            .kind()
            .is_list()
            .then(|| Value::List(Vec::new()));

        Ok(())
    }

    /// Appends an item to a list field.
    pub fn add_to_collection<V>(&mut self, field: &str, value: V) -> Result<(), Error>
    where
        V: Into<Value>,
    {
        let value = value.into();
        let index = self.index_of(field)?;
        let descriptor = &self.record_type.fields()[index];

        if !descriptor.kind().is_list() || !descriptor.kind().item_kind().accepts(&value) {
            return Err(self.mismatch(index, &value.describe()));
        }

        self.ensure_mutable(index)?;
        self.push(index, value);

        Ok(())
    }

    /// Iterates over each field descriptor alongside its value.
    pub fn entries(&self) -> impl Iterator<Item = (&FieldDescriptor, Option<&Value>)> {
        self.record_type
            .fields()
            .iter()
            .zip(self.values.iter().map(Option::as_ref))
    }

    /// Stores a value without checking mutability.
    pub(crate) fn put(&mut self, index: usize, value: Value) {
        self.values[index] = Some(value);
    }

    /// Appends an item to a list field without checking mutability.
    pub(crate) fn push(&mut self, index: usize, value: Value) {
        match &mut self.values[index] {
            Some(Value::List(items)) => items.push(value),
            slot => *slot = Some(Value::List(vec![value])),
        }
    }

    /// Looks up a field by name and checks that it accepts a value.
    pub(crate) fn checked_index(&self, field: &str, value: &Value) -> Result<usize, Error> {
        let index = self.index_of(field)?;

        if self.record_type.fields()[index].kind().accepts(value) {
            Ok(index)
        } else {
            Err(self.mismatch(index, &value.describe()))
        }
    }

    /// Fails if any required field has no value.
    pub(crate) fn check_required(&self) -> Result<(), Error> {
        match self
            .entries()
            .find(|(field, value)| field.is_required() && value.is_none())
        {
            Some((field, _)) => Err(Error::MissingRequiredField {
                record: self.type_name().to_owned(),
                field: field.name().to_owned(),
            }),
            None => Ok(()),
        }
    }

    fn index_of(&self, field: &str) -> Result<usize, Error> {
        self.record_type
            .field_index(field)
            .ok_or_else(|| Error::UnknownField {
                record: self.type_name().to_owned(),
                field: field.to_owned(),
            })
    }

    fn ensure_mutable(&self, index: usize) -> Result<(), Error> {
        let field = &self.record_type.fields()[index];
        if field.is_required() {
            return Err(Error::ImmutableField {
                record: self.type_name().to_owned(),
                field: field.name().to_owned(),
            });
        }

        Ok(())
    }

    fn mismatch(&self, index: usize, actual: &str) -> Error {
        let field = &self.record_type.fields()[index];

        Error::TypeMismatch {
            record: self.type_name().to_owned(),
            field: field.name().to_owned(),
            expected: field.kind().to_string(),
            actual: actual.to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{FieldDescriptor, RecordType, RecordTypeSpec, ValueKind};

    use super::*;

    fn folder_type() -> RecordTypeHandle {
        RecordType::define(
            RecordTypeSpec::new("Folder")
                .field(FieldDescriptor::attribute("id", "id", ValueKind::String).required(true))
                .field(FieldDescriptor::attribute("name", "name", ValueKind::String))
                .field(FieldDescriptor::attribute("unread", "u", ValueKind::Integer))
                .field(FieldDescriptor::element(
                    "metadatas",
                    "meta",
                    ValueKind::list_of(ValueKind::String),
                )),
        )
        .expect("folder type should be valid")
    }

    #[test]
    fn new_instance_requires_required_fields() {
        let err = folder_type()
            .new_instance([("name", Value::from("Inbox"))])
            .expect_err("`id` was not supplied");

        assert!(
            matches!(&err, Error::MissingRequiredField { record, field } if record == "Folder" && field == "id"),
            "unexpected error {err:?}"
        );
    }

    #[test]
    fn new_instance_defaults_optional_fields() -> Result<(), Error> {
        let folder = folder_type().new_instance([("id", Value::from("2"))])?;

        assert_eq!(folder.get("id")?, Some(&Value::from("2")));
        assert_eq!(folder.get("name")?, None);
        assert_eq!(folder.list("metadatas")?, &[] as &[Value]);

        Ok(())
    }

    #[test]
    fn required_fields_are_immutable() -> Result<(), Error> {
        let mut folder = folder_type().new_instance([("id", Value::from("2"))])?;

        let err = folder.set("id", "3").expect_err("`id` is required");
        assert!(matches!(err, Error::ImmutableField { .. }));

        let err = folder.unset("id").expect_err("`id` is required");
        assert!(matches!(err, Error::ImmutableField { .. }));

        assert_eq!(folder.get("id")?, Some(&Value::from("2")));

        Ok(())
    }

    #[test]
    fn set_checks_value_kind() -> Result<(), Error> {
        let mut folder = folder_type().new_instance([("id", Value::from("2"))])?;

        folder.set("unread", 4)?;
        assert_eq!(folder.get("unread")?.and_then(Value::as_i64), Some(4));

        let err = folder.set("unread", "four").expect_err("`unread` is an integer");
        assert!(
            matches!(&err, Error::TypeMismatch { expected, actual, .. } if expected == "integer" && actual == "string"),
            "unexpected error {err:?}"
        );

        let err = folder.set("colour", 1).expect_err("no such field");
        assert!(matches!(err, Error::UnknownField { .. }));

        Ok(())
    }

    #[test]
    fn lists_are_owned_by_the_record() -> Result<(), Error> {
        let mut folder = folder_type().new_instance([("id", Value::from("2"))])?;

        let mut source = vec![Value::from("a")];
        folder.set("metadatas", source.clone())?;

        // Changing the list passed in has no effect on the record.
        source.push(Value::from("b"));
        assert_eq!(folder.list("metadatas")?, &[Value::from("a")]);

        folder.add_to_collection("metadatas", "c")?;
        assert_eq!(folder.list("metadatas")?, &[Value::from("a"), Value::from("c")]);

        folder.unset("metadatas")?;
        assert!(folder.list("metadatas")?.is_empty());

        Ok(())
    }

    #[test]
    fn add_to_collection_rejects_mismatched_items() -> Result<(), Error> {
        let mut folder = folder_type().new_instance([("id", Value::from("2"))])?;

        let err = folder
            .add_to_collection("metadatas", 7)
            .expect_err("items are strings");
        assert!(matches!(err, Error::TypeMismatch { .. }));

        let err = folder
            .add_to_collection("name", "Inbox")
            .expect_err("`name` is not a list");
        assert!(matches!(err, Error::TypeMismatch { .. }));

        assert!(folder.list("metadatas")?.is_empty());

        Ok(())
    }
}
