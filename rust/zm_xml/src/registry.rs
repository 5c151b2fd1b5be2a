/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use std::collections::HashMap;

use crate::{
    Describe, EnumMapping, Error, PolymorphicUnion, RecordType, RecordTypeHandle,
    RecordTypeSpec, SchemaError, UnionTable, WireEnum,
};

/// The set of record types, enums and unions known to the dynamic binder.
///
/// A registry is assembled once, then shared read-only by everything which
/// encodes or decodes records against it.
#[derive(Debug, Default)]
pub struct Registry {
    records: HashMap<String, RecordTypeHandle>,
    enums: HashMap<String, EnumMapping>,
    unions: HashMap<String, UnionTable>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates and registers a record type.
    pub fn define(&mut self, spec: RecordTypeSpec) -> Result<RecordTypeHandle, SchemaError> {
        if self.records.contains_key(spec.name()) {
            return Err(SchemaError::DuplicateType(spec.name().to_owned()));
        }

        let record_type = RecordType::define(spec)?;
        log::debug!(
            "registered record type `{}` with {} fields",
            record_type.name(),
            record_type.fields().len()
        );

        self.records
            .insert(record_type.name().to_owned(), record_type.clone());

        Ok(record_type)
    }

    /// Registers the record type a typed structure serializes as.
    pub fn register<T>(&mut self) -> Result<RecordTypeHandle, SchemaError>
    where
        T: Describe,
    {
        self.define(T::record_spec())
    }

    pub fn define_enum(&mut self, mapping: EnumMapping) -> Result<(), SchemaError> {
        if self.enums.contains_key(mapping.name()) {
            return Err(SchemaError::DuplicateType(mapping.name().to_owned()));
        }

        log::debug!("registered enum `{}`", mapping.name());
        self.enums.insert(mapping.name().to_owned(), mapping);

        Ok(())
    }

    pub fn register_enum<E>(&mut self) -> Result<(), SchemaError>
    where
        E: WireEnum,
    {
        self.define_enum(EnumMapping::of::<E>())
    }

    pub fn define_union(&mut self, table: UnionTable) -> Result<(), SchemaError> {
        if self.unions.contains_key(table.name()) {
            return Err(SchemaError::DuplicateType(table.name().to_owned()));
        }

        log::debug!(
            "registered union `{}` with tags {:?}",
            table.name(),
            table.tags().collect::<Vec<_>>()
        );
        self.unions.insert(table.name().to_owned(), table);

        Ok(())
    }

    pub fn register_union<U>(&mut self) -> Result<(), SchemaError>
    where
        U: PolymorphicUnion,
    {
        self.define_union(UnionTable::of::<U>())
    }

    pub fn record_type(&self, name: &str) -> Result<&RecordTypeHandle, Error> {
        self.records
            .get(name)
            .ok_or_else(|| Error::UnknownRecordType(name.to_owned()))
    }

    pub fn enum_mapping(&self, name: &str) -> Result<&EnumMapping, Error> {
        self.enums
            .get(name)
            .ok_or_else(|| Error::UnknownEnum(name.to_owned()))
    }

    pub fn union(&self, name: &str) -> Result<&UnionTable, Error> {
        self.unions
            .get(name)
            .ok_or_else(|| Error::UnknownUnion(name.to_owned()))
    }
}
