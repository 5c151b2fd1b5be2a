/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! Field descriptors and record types.
//!
//! A [`RecordType`] is an ordered list of [`FieldDescriptor`]s which together
//! describe how a record maps to an XML element. Record types are validated
//! when defined and are immutable afterwards; they are shared between records
//! through a reference-counted [`RecordTypeHandle`].

use std::{collections::HashSet, fmt, ops::Deref, sync::Arc};

use crate::{Error, Record, Value};

/// The XML structure a field is bound to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BindingKind {
    /// An attribute on the record's element.
    Attribute,

    /// A child element (or, for lists, a run of repeated child elements).
    Element,

    /// The text content of the record's element.
    TextValue,

    /// Any child element not claimed by another field, kept as raw XML.
    AnyElement,
}

/// The kind of value a field holds.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    String,
    Integer,
    Long,
    Byte,
    Boolean,

    /// A value of the named enum mapping.
    Enum(String),

    /// A record of the named type, or of a type extending it.
    NestedRecord(String),

    /// A record of any type in the named union, written with the tag name the
    /// union assigns to that type.
    Union(String),

    /// An XML fragment captured verbatim.
    RawXml,

    ListOf(Box<ValueKind>),
}

impl ValueKind {
    pub fn list_of(item: ValueKind) -> Self {
        Self::ListOf(Box::new(item))
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Self::ListOf(_))
    }

    /// Gets the kind of each item for a list, or this kind otherwise.
    pub fn item_kind(&self) -> &ValueKind {
        match self {
            Self::ListOf(item) => item,
            other => other,
        }
    }

    /// Whether values of this kind can be written as a single token.
    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            Self::String | Self::Integer | Self::Long | Self::Byte | Self::Boolean | Self::Enum(_)
        )
    }

    /// Checks whether a value is of this kind.
    pub fn accepts(&self, value: &Value) -> bool {
        match (self, value) {
            (Self::String, Value::String(_))
            | (Self::Integer, Value::Integer(_))
            | (Self::Long, Value::Long(_))
            | (Self::Byte, Value::Byte(_))
            | (Self::Boolean, Value::Boolean(_))
            | (Self::Enum(_), Value::Enum(_))
            | (Self::Union(_), Value::Record(_))
            | (Self::RawXml, Value::RawXml(_)) => true,

            // Subtypes would lose their own fields on decode, which always
            // builds the declared type; they belong in a union instead.
            (Self::NestedRecord(name), Value::Record(record)) => record.type_name() == name,
            (Self::ListOf(item), Value::List(items)) => items.iter().all(|value| item.accepts(value)),

            _ => false,
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String => f.write_str("string"),
            Self::Integer => f.write_str("integer"),
            Self::Long => f.write_str("long"),
            Self::Byte => f.write_str("byte"),
            Self::Boolean => f.write_str("boolean"),
            Self::Enum(name) => write!(f, "enum `{name}`"),
            Self::NestedRecord(name) => write!(f, "record `{name}`"),
            Self::Union(name) => write!(f, "union `{name}`"),
            Self::RawXml => f.write_str("raw XML"),
            Self::ListOf(item) => write!(f, "list of {item}"),
        }
    }
}

/// The description of a single field of a record type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldDescriptor {
    name: String,
    wire_name: String,
    binding: BindingKind,
    required: bool,
    kind: ValueKind,
    wrapper: Option<String>,
}

impl FieldDescriptor {
    pub fn new<N, W>(name: N, wire_name: W, binding: BindingKind, kind: ValueKind) -> Self
    where
        N: Into<String>,
        W: Into<String>,
    {
        Self {
            name: name.into(),
            wire_name: wire_name.into(),
            binding,
            required: false,
            kind,
            wrapper: None,
        }
    }

    pub fn attribute<N, W>(name: N, wire_name: W, kind: ValueKind) -> Self
    where
        N: Into<String>,
        W: Into<String>,
    {
        Self::new(name, wire_name, BindingKind::Attribute, kind)
    }

    pub fn element<N, W>(name: N, wire_name: W, kind: ValueKind) -> Self
    where
        N: Into<String>,
        W: Into<String>,
    {
        Self::new(name, wire_name, BindingKind::Element, kind)
    }

    pub fn text<N>(name: N, kind: ValueKind) -> Self
    where
        N: Into<String>,
    {
        Self::new(name, "", BindingKind::TextValue, kind)
    }

    /// A field collecting any child element not claimed by another field.
    pub fn any<N>(name: N) -> Self
    where
        N: Into<String>,
    {
        Self::new(name, "", BindingKind::AnyElement, ValueKind::list_of(ValueKind::RawXml))
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Encloses the items of a list-valued element field in an element with
    /// the given name.
    pub fn wrapped_in<W>(mut self, wrapper: W) -> Self
    where
        W: Into<String>,
    {
        self.wrapper = Some(wrapper.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn wire_name(&self) -> &str {
        &self.wire_name
    }

    pub fn binding(&self) -> BindingKind {
        self.binding
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn kind(&self) -> &ValueKind {
        &self.kind
    }

    pub fn wrapper(&self) -> Option<&str> {
        self.wrapper.as_deref()
    }

    /// The union this field dispatches through, if any.
    pub(crate) fn union_name(&self) -> Option<&str> {
        match self.kind.item_kind() {
            ValueKind::Union(name) => Some(name.as_str()),
            _ => None,
        }
    }

    /// The name of the child element which introduces this field's content,
    /// if it has a fixed one.
    fn claimed_element_name(&self) -> Option<&str> {
        match (&self.wrapper, self.union_name()) {
            (Some(wrapper), _) => Some(wrapper.as_str()),
            (None, Some(_)) => None,
            (None, None) => Some(self.wire_name.as_str()),
        }
    }
}

/// A problem with the definition of a record type, enum or union.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("`{record}` declares field `{field}` more than once")]
    DuplicateFieldName { record: String, field: String },

    #[error("`{record}` binds {binding:?} `{wire_name}` to more than one field")]
    DuplicateWireName {
        record: String,
        binding: BindingKind,
        wire_name: String,
    },

    #[error("`{0}` declares more than one text value field")]
    MultipleTextValues(String),

    #[error("`{0}` declares more than one any-element field")]
    MultipleAnyElements(String),

    #[error("field `{field}` of `{record}` cannot hold {kind} as {binding:?}")]
    InvalidFieldKind {
        record: String,
        field: String,
        binding: BindingKind,
        kind: ValueKind,
    },

    #[error("field `{field}` of `{record}` has a wrapper but is not a list element")]
    InvalidWrapper { record: String, field: String },

    #[error("`{0}` is already registered")]
    DuplicateType(String),

    #[error("enum `{name}` declares symbol `{symbol}` more than once")]
    DuplicateSymbol { name: String, symbol: String },

    #[error("enum `{name}` maps token `{token}` more than once")]
    DuplicateToken { name: String, token: String },

    #[error("union `{union}` maps tag `{tag}` more than once")]
    DuplicateTag { union: String, tag: String },

    #[error("union `{union}` maps record type `{record}` to more than one tag")]
    AmbiguousVariant { union: String, record: String },
}

/// The input to [`RecordType::define`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RecordTypeSpec {
    name: String,
    lineage: Vec<String>,
    fields: Vec<FieldDescriptor>,
    capabilities: Vec<String>,
}

impl RecordTypeSpec {
    pub fn new<N>(name: N) -> Self
    where
        N: Into<String>,
    {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    /// Tags the record type with a capability, e.g. `SearchHit`.
    pub fn capability<C>(mut self, capability: C) -> Self
    where
        C: Into<String>,
    {
        self.capabilities.push(capability.into());
        self
    }

    /// Embeds a parent record type.
    ///
    /// The parent's fields are placed ahead of this type's own fields and its
    /// capabilities are inherited.
    pub fn inherit(mut self, parent: RecordTypeSpec) -> Self {
        let RecordTypeSpec {
            name,
            mut lineage,
            mut fields,
            mut capabilities,
        } = parent;

        lineage.push(name);
        self.lineage = lineage;

        fields.append(&mut self.fields);
        self.fields = fields;

        for capability in self.capabilities.drain(..) {
            if !capabilities.contains(&capability) {
                capabilities.push(capability);
            }
        }
        self.capabilities = capabilities;

        self
    }

    /// Embeds a previously defined record type as the parent.
    pub fn extends(self, parent: &RecordType) -> Self {
        self.inherit(parent.to_spec())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }
}

/// A validated, immutable record type.
#[derive(Debug, PartialEq, Eq)]
pub struct RecordType {
    name: String,
    lineage: Vec<String>,
    fields: Vec<FieldDescriptor>,
    capabilities: Vec<String>,
}

impl RecordType {
    /// Validates a specification and produces a record type.
    pub fn define(spec: RecordTypeSpec) -> Result<RecordTypeHandle, SchemaError> {
        let RecordTypeSpec {
            name,
            lineage,
            fields,
            capabilities,
        } = spec;

        let mut field_names = HashSet::new();
        let mut attribute_names = HashSet::new();
        let mut element_names = HashSet::new();
        let mut has_text = false;
        let mut has_any = false;

        for field in &fields {
            if !field_names.insert(field.name()) {
                return Err(SchemaError::DuplicateFieldName {
                    record: name,
                    field: field.name.clone(),
                });
            }

            let invalid_kind = || SchemaError::InvalidFieldKind {
                record: name.clone(),
                field: field.name.clone(),
                binding: field.binding,
                kind: field.kind.clone(),
            };

            if field.wrapper.is_some()
                && !(field.binding == BindingKind::Element && field.kind.is_list())
            {
                return Err(SchemaError::InvalidWrapper {
                    record: name.clone(),
                    field: field.name.clone(),
                });
            }

            match field.binding {
                BindingKind::Attribute => {
                    if !field.kind.is_scalar() {
                        return Err(invalid_kind());
                    }

                    if !attribute_names.insert(field.wire_name()) {
                        return Err(SchemaError::DuplicateWireName {
                            record: name.clone(),
                            binding: field.binding,
                            wire_name: field.wire_name.clone(),
                        });
                    }
                }

                BindingKind::Element => {
                    if matches!(field.kind.item_kind(), ValueKind::ListOf(_)) {
                        return Err(invalid_kind());
                    }

                    if let Some(element_name) = field.claimed_element_name() {
                        if !element_names.insert(element_name) {
                            return Err(SchemaError::DuplicateWireName {
                                record: name.clone(),
                                binding: field.binding,
                                wire_name: element_name.to_owned(),
                            });
                        }
                    }
                }

                BindingKind::TextValue => {
                    if !field.kind.is_scalar() {
                        return Err(invalid_kind());
                    }

                    if has_text {
                        return Err(SchemaError::MultipleTextValues(name));
                    }
                    has_text = true;
                }

                BindingKind::AnyElement => {
                    if field.kind != ValueKind::list_of(ValueKind::RawXml) {
                        return Err(invalid_kind());
                    }

                    if has_any {
                        return Err(SchemaError::MultipleAnyElements(name));
                    }
                    has_any = true;
                }
            }
        }

        Ok(RecordTypeHandle(Arc::new(RecordType {
            name,
            lineage,
            fields,
            capabilities,
        })))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The name of the record type this one extends, if any.
    pub fn parent(&self) -> Option<&str> {
        self.lineage.last().map(String::as_str)
    }

    /// Whether this type is, or extends, the named record type.
    pub fn is_a(&self, name: &str) -> bool {
        self.name == name || self.lineage.iter().any(|ancestor| ancestor == name)
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn capabilities(&self) -> &[String] {
        &self.capabilities
    }

    pub fn has_capability(&self, capability: &str) -> bool {
        self.capabilities.iter().any(|candidate| candidate == capability)
    }

    /// Recovers a specification equivalent to this type, for use as a parent.
    pub fn to_spec(&self) -> RecordTypeSpec {
        RecordTypeSpec {
            name: self.name.clone(),
            lineage: self.lineage.clone(),
            fields: self.fields.clone(),
            capabilities: self.capabilities.clone(),
        }
    }

    pub(crate) fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|field| field.name == name)
    }

    pub(crate) fn attribute_index(&self, wire_name: &str) -> Option<usize> {
        self.fields.iter().position(|field| {
            field.binding == BindingKind::Attribute && field.wire_name == wire_name
        })
    }

    /// Finds the field whose content is introduced by a child element with
    /// the given name, excluding union dispatch.
    pub(crate) fn element_index(&self, element_name: &str) -> Option<usize> {
        self.fields.iter().position(|field| {
            field.binding == BindingKind::Element
                && field.claimed_element_name() == Some(element_name)
        })
    }

    /// Iterates over unwrapped element fields which dispatch through a union.
    pub(crate) fn union_fields(&self) -> impl Iterator<Item = (usize, &str)> {
        self.fields
            .iter()
            .enumerate()
            .filter(|(_, field)| field.binding == BindingKind::Element && field.wrapper.is_none())
            .filter_map(|(index, field)| field.union_name().map(|union| (index, union)))
    }

    pub(crate) fn text_index(&self) -> Option<usize> {
        self.fields
            .iter()
            .position(|field| field.binding == BindingKind::TextValue)
    }

    pub(crate) fn any_index(&self) -> Option<usize> {
        self.fields
            .iter()
            .position(|field| field.binding == BindingKind::AnyElement)
    }
}

/// A shared reference to a [`RecordType`].
#[derive(Clone, Debug)]
pub struct RecordTypeHandle(Arc<RecordType>);

impl RecordTypeHandle {
    /// Creates a record with the given field values.
    ///
    /// Every required field must be supplied. Optional fields which are not
    /// supplied are absent, and list fields which are not supplied are empty.
    pub fn new_instance<I, N>(&self, values: I) -> Result<Record, Error>
    where
        I: IntoIterator<Item = (N, Value)>,
        N: AsRef<str>,
    {
        let mut record = Record::blank(self.clone());
        for (name, value) in values {
            let index = record.checked_index(name.as_ref(), &value)?;
            record.put(index, value);
        }

        record.check_required()?;

        Ok(record)
    }
}

impl Deref for RecordTypeHandle {
    type Target = RecordType;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl PartialEq for RecordTypeHandle {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || self.0 == other.0
    }
}

impl Eq for RecordTypeHandle {}

/// A typed structure which can describe itself as a record type.
///
/// Implementations are generated by `#[derive(XmlSerialize)]` on structs with
/// named fields, and describe exactly the XML that the derived serialization
/// produces.
pub trait Describe {
    /// The name of the record type.
    const NAME: &'static str;

    fn record_spec() -> RecordTypeSpec;
}

/// A type which can appear as the value of a described field.
pub trait WireValue {
    fn value_kind() -> ValueKind;

    /// Whether a field of this type may be absent.
    fn is_optional() -> bool {
        false
    }
}
