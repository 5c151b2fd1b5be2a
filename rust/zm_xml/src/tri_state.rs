/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! Tri-state boolean values, as carried by optional boolean attributes.
//!
//! On the wire, a boolean is one of the tokens `"1"` or `"0"`. An optional
//! boolean has a third state, absence, in which case no attribute is written
//! at all. When reading, each call site decides what absence means by
//! supplying its own default.

use std::{fmt, str::FromStr};

use quick_xml::{
    events::{BytesStart, BytesText, Event},
    Writer,
};
use serde::{de::Visitor, Deserialize, Deserializer};

use crate::{Error, InvalidEnumValue, ValueKind, WireValue, XmlSerialize, XmlSerializeAttr};

pub const TRUE_TOKEN: &str = "1";
pub const FALSE_TOKEN: &str = "0";

/// Tokens accepted when reading a boolean.
const ACCEPTED_TOKENS: &[&str] = &[TRUE_TOKEN, FALSE_TOKEN, "true", "false"];

/// Converts an optional boolean to its optional wire token.
pub fn to_wire(value: Option<bool>) -> Option<&'static str> {
    value.map(token_for)
}

/// Reads an optional wire token, falling back to `default` when it is absent.
///
/// The default may itself be `None`, in which case absence is preserved.
pub fn from_wire(token: Option<&str>, default: Option<bool>) -> Result<Option<bool>, InvalidEnumValue> {
    match token {
        Some(token) => parse_token(token).map(Some),
        None => Ok(default),
    }
}

pub(crate) fn token_for(value: bool) -> &'static str {
    if value {
        TRUE_TOKEN
    } else {
        FALSE_TOKEN
    }
}

/// Parses a single boolean token.
///
/// `"true"` and `"false"` are accepted alongside the canonical tokens, as some
/// servers emit them in older responses.
pub(crate) fn parse_token(token: &str) -> Result<bool, InvalidEnumValue> {
    match token.trim() {
        TRUE_TOKEN | "true" => Ok(true),
        FALSE_TOKEN | "false" => Ok(false),
        other => Err(InvalidEnumValue::new("ZmBoolean", other, ACCEPTED_TOKENS)),
    }
}

/// A boolean which is serialized as `"1"` or `"0"`.
///
/// Structures declare optional booleans as `Option<ZmBoolean>` so that an
/// absent value round-trips as absent, and expose accessors which apply a
/// default chosen for that specific field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ZmBoolean(bool);

impl ZmBoolean {
    pub const TRUE: Self = Self(true);
    pub const FALSE: Self = Self(false);

    pub fn new(value: bool) -> Self {
        Self(value)
    }

    pub fn value(self) -> bool {
        self.0
    }

    pub fn token(self) -> &'static str {
        token_for(self.0)
    }

    /// Wraps an optional boolean for serialization.
    pub fn from_bool(value: Option<bool>) -> Option<Self> {
        value.map(Self)
    }

    /// Unwraps an optional value, preserving absence.
    pub fn to_bool(value: Option<Self>) -> Option<bool> {
        value.map(Self::value)
    }

    /// Unwraps an optional value, substituting `default` for absence.
    pub fn to_bool_or(value: Option<Self>, default: bool) -> bool {
        value.map_or(default, Self::value)
    }
}

impl From<bool> for ZmBoolean {
    fn from(value: bool) -> Self {
        Self(value)
    }
}

impl From<ZmBoolean> for bool {
    fn from(value: ZmBoolean) -> Self {
        value.0
    }
}

impl fmt::Display for ZmBoolean {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for ZmBoolean {
    type Err = InvalidEnumValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_token(s).map(Self)
    }
}

impl XmlSerialize for ZmBoolean {
    fn serialize_child_nodes<W>(&self, writer: &mut Writer<W>) -> Result<(), Error>
    where
        W: std::io::Write,
    {
        writer.write_event(Event::Text(BytesText::new(self.token())))?;

        Ok(())
    }
}

impl XmlSerializeAttr for ZmBoolean {
    fn serialize_as_attribute(&self, start_tag: &mut BytesStart, name: &str) {
        start_tag.push_attribute((name, self.token()));
    }
}

impl WireValue for ZmBoolean {
    fn value_kind() -> ValueKind {
        ValueKind::Boolean
    }
}

impl<'de> Deserialize<'de> for ZmBoolean {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_str(ZmBooleanVisitor)
    }
}

struct ZmBooleanVisitor;

impl Visitor<'_> for ZmBooleanVisitor {
    type Value = ZmBoolean;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a boolean token of `1` or `0`")
    }

    fn visit_bool<E>(self, v: bool) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(ZmBoolean(v))
    }

    fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        match v {
            0 => Ok(ZmBoolean::FALSE),
            1 => Ok(ZmBoolean::TRUE),
            _ => Err(E::invalid_value(serde::de::Unexpected::Unsigned(v), &self)),
        }
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        v.parse().map_err(E::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_value_writes_no_token() {
        assert_eq!(to_wire(None), None);
        assert_eq!(to_wire(Some(true)), Some("1"));
        assert_eq!(to_wire(Some(false)), Some("0"));
    }

    #[test]
    fn absent_token_uses_call_site_default() -> Result<(), InvalidEnumValue> {
        assert_eq!(from_wire(None, Some(false))?, Some(false));
        assert_eq!(from_wire(None, Some(true))?, Some(true));
        assert_eq!(
            from_wire(None, None)?,
            None,
            "absence should be preserved without a default"
        );

        assert_eq!(from_wire(Some("1"), Some(false))?, Some(true));
        assert_eq!(from_wire(Some("0"), Some(true))?, Some(false));
        assert_eq!(from_wire(Some("true"), None)?, Some(true));

        Ok(())
    }

    #[test]
    fn unknown_token_is_rejected() {
        let err = from_wire(Some("yes"), Some(true)).expect_err("`yes` is not a boolean token");
        assert_eq!(err.token(), "yes");
        assert_eq!(err.valid_tokens(), &["1", "0", "true", "false"]);
    }

    #[test]
    fn optional_accessors_apply_defaults() {
        assert!(ZmBoolean::to_bool_or(None, true));
        assert!(!ZmBoolean::to_bool_or(None, false));
        assert!(!ZmBoolean::to_bool_or(Some(ZmBoolean::FALSE), true));
        assert_eq!(ZmBoolean::to_bool(ZmBoolean::from_bool(None)), None);
        assert_eq!(
            ZmBoolean::to_bool(ZmBoolean::from_bool(Some(true))),
            Some(true)
        );
    }
}
