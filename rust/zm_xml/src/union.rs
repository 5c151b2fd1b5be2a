/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use std::collections::HashSet;

use crate::{Error, Record, SchemaError};

/// A typed enum whose variants are distinguished on the wire by element name.
///
/// Implementations are generated by `#[derive(XmlSerialize)]` on enums which
/// are not marked `#[xml_struct(text)]`.
pub trait PolymorphicUnion {
    /// The name of the union, as used in value kinds and error messages.
    const NAME: &'static str;

    /// The tag name and record type name of each variant, in declaration
    /// order.
    const VARIANTS: &'static [(&'static str, &'static str)];

    /// Gets the tag name this value is written with.
    fn tag_name(&self) -> &'static str;

    /// Whether an element with the given name is a variant of this union.
    fn is_variant_tag(tag: &str) -> bool {
        Self::VARIANTS.iter().any(|(candidate, _)| *candidate == tag)
    }
}

/// A runtime dispatch table from tag names to record types.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnionTable {
    name: String,

    /// `(tag, record type)` pairs in declaration order.
    variants: Vec<(String, String)>,
}

impl UnionTable {
    /// Creates a dispatch table from `(tag, record type)` pairs.
    ///
    /// Each tag and each record type may appear only once, so that dispatch
    /// is unambiguous in both directions.
    pub fn new<N, I, T, R>(name: N, variants: I) -> Result<Self, SchemaError>
    where
        N: Into<String>,
        I: IntoIterator<Item = (T, R)>,
        T: Into<String>,
        R: Into<String>,
    {
        let name = name.into();
        let variants: Vec<(String, String)> = variants
            .into_iter()
            .map(|(tag, record)| (tag.into(), record.into()))
            .collect();

        let mut tags = HashSet::new();
        let mut records = HashSet::new();
        for (tag, record) in &variants {
            if !tags.insert(tag.as_str()) {
                return Err(SchemaError::DuplicateTag {
                    union: name,
                    tag: tag.clone(),
                });
            }

            if !records.insert(record.as_str()) {
                return Err(SchemaError::AmbiguousVariant {
                    union: name,
                    record: record.clone(),
                });
            }
        }

        Ok(Self { name, variants })
    }

    /// Builds the runtime table for a typed union.
    pub fn of<U>() -> Self
    where
        U: PolymorphicUnion,
    {
        Self {
            name: U::NAME.to_owned(),
            variants: U::VARIANTS
                .iter()
                .map(|&(tag, record)| (tag.to_owned(), record.to_owned()))
                .collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.variants.iter().map(|(tag, _)| tag.as_str())
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.tags().any(|candidate| candidate == tag)
    }

    /// Gets the record type instantiated for an element with the given name.
    pub fn resolve(&self, tag: &str) -> Result<&str, Error> {
        self.variants
            .iter()
            .find(|(candidate, _)| candidate == tag)
            .map(|(_, record)| record.as_str())
            .ok_or_else(|| Error::UnknownVariant {
                union: self.name.clone(),
                tag: tag.to_owned(),
            })
    }

    /// Gets the tag name a record is written with.
    pub fn tag_for(&self, record: &Record) -> Result<&str, Error> {
        self.variants
            .iter()
            .find(|(_, candidate)| candidate == record.type_name())
            .map(|(tag, _)| tag.as_str())
            .ok_or_else(|| Error::UnknownVariant {
                union: self.name.clone(),
                tag: record.type_name().to_owned(),
            })
    }
}
