/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use std::collections::HashSet;

use thiserror::Error;

use crate::SchemaError;

/// A closed set of symbolic values, each bound to a short wire token.
///
/// Implementations are generated by `#[derive(XmlSerialize)]` on unit-only
/// enums marked `#[xml_struct(text)]`. Lookups in both directions are `match`
/// tables fixed at compile time.
pub trait WireEnum: Sized {
    /// The name of the enum, as used in value kinds and error messages.
    const NAME: &'static str;

    /// The symbolic name of each value, in declaration order.
    const SYMBOLS: &'static [&'static str];

    /// The wire token of each value, in declaration order.
    const TOKENS: &'static [&'static str];

    /// Gets the wire token for this value.
    fn to_token(&self) -> &'static str;

    /// Gets the value represented by a wire token.
    fn from_token(token: &str) -> Result<Self, InvalidEnumValue>;
}

/// A wire token which does not belong to the expected enum.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("invalid value `{token}` for `{enum_name}`, expected one of: {}", .valid_tokens.join(", "))]
pub struct InvalidEnumValue {
    enum_name: String,
    token: String,
    valid_tokens: Vec<String>,
}

impl InvalidEnumValue {
    pub fn new(enum_name: &str, token: &str, valid_tokens: &[&str]) -> Self {
        Self {
            enum_name: enum_name.to_owned(),
            token: token.to_owned(),
            valid_tokens: valid_tokens.iter().map(|&token| token.to_owned()).collect(),
        }
    }

    pub fn enum_name(&self) -> &str {
        &self.enum_name
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    /// Every token which would have been accepted.
    pub fn valid_tokens(&self) -> &[String] {
        &self.valid_tokens
    }
}

/// A runtime enum mapping, for use by the dynamic binder.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnumMapping {
    name: String,

    /// `(symbol, token)` pairs in declaration order.
    pairs: Vec<(String, String)>,
}

impl EnumMapping {
    /// Creates a mapping from `(symbol, token)` pairs.
    ///
    /// Both symbols and tokens must be unique.
    pub fn new<N, I, S, T>(name: N, pairs: I) -> Result<Self, SchemaError>
    where
        N: Into<String>,
        I: IntoIterator<Item = (S, T)>,
        S: Into<String>,
        T: Into<String>,
    {
        let name = name.into();
        let pairs: Vec<(String, String)> = pairs
            .into_iter()
            .map(|(symbol, token)| (symbol.into(), token.into()))
            .collect();

        let mut symbols = HashSet::new();
        let mut tokens = HashSet::new();
        for (symbol, token) in &pairs {
            if !symbols.insert(symbol.as_str()) {
                return Err(SchemaError::DuplicateSymbol {
                    name,
                    symbol: symbol.clone(),
                });
            }

            if !tokens.insert(token.as_str()) {
                return Err(SchemaError::DuplicateToken {
                    name,
                    token: token.clone(),
                });
            }
        }

        Ok(Self { name, pairs })
    }

    /// Builds the runtime mapping for a typed enum.
    pub fn of<E>() -> Self
    where
        E: WireEnum,
    {
        Self {
            name: E::NAME.to_owned(),
            pairs: E::SYMBOLS
                .iter()
                .zip(E::TOKENS)
                .map(|(&symbol, &token)| (symbol.to_owned(), token.to_owned()))
                .collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.pairs.iter().map(|(_, token)| token.as_str())
    }

    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.pairs.iter().map(|(symbol, _)| symbol.as_str())
    }

    pub fn to_token(&self, symbol: &str) -> Result<&str, InvalidEnumValue> {
        self.pairs
            .iter()
            .find(|(candidate, _)| candidate == symbol)
            .map(|(_, token)| token.as_str())
            .ok_or_else(|| {
                let symbols: Vec<&str> = self.symbols().collect();
                InvalidEnumValue::new(&self.name, symbol, &symbols)
            })
    }

    pub fn from_token(&self, token: &str) -> Result<&str, InvalidEnumValue> {
        self.pairs
            .iter()
            .find(|(_, candidate)| candidate == token)
            .map(|(symbol, _)| symbol.as_str())
            .ok_or_else(|| {
                let tokens: Vec<&str> = self.tokens().collect();
                InvalidEnumValue::new(&self.name, token, &tokens)
            })
    }
}
