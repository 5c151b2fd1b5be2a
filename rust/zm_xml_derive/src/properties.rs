/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use proc_macro2::TokenStream;
use quote::ToTokens as _;
use syn::{
    punctuated::Punctuated, spanned::Spanned as _, Attribute, DeriveInput, Error, Expr, ExprLit,
    Lit, Meta, MetaNameValue, Token,
};

use crate::MACRO_ATTRIBUTE;

const UNRECOGNIZED_ATTRIBUTE_MSG: &str = "unrecognized `xml_struct` attribute";

#[derive(Debug, Default)]
/// Properties governing the serialization of a struct or enum with a derived
/// `XmlSerialize` implementation.
pub(crate) struct TypeProps {
    /// A declaration of a name for the default XML namespace.
    ///
    /// The value of this name, if any, will be represented as an `xmlns`
    /// attribute on the start tag if a value of this type is serialized as an
    /// XML element.
    pub default_ns_name: Option<TokenStream>,

    /// Whether values of this type should be serialized as text nodes instead
    /// of element nodes.
    ///
    /// A value of `true` is only valid when the type to which it is applied is
    /// an `enum` consisting only of unit variants.
    pub should_serialize_as_text: bool,

    /// Capabilities recorded in the described record type, e.g. `SearchHit`.
    pub capabilities: Vec<TokenStream>,
}

impl TypeProps {
    /// Constructs a set of serialization properties for an enum or struct from
    /// its input to the derive macro.
    pub(crate) fn try_from_input(input: &DeriveInput) -> Result<Self, Error> {
        let attr = match find_configuration_attribute(&input.attrs) {
            Some(attr) => attr,

            // If we don't find a matching attribute, we assume the default set
            // of properties.
            None => return Ok(Self::default()),
        };

        // We build a list of errors so that we can combine them later and emit
        // them all instead of quitting at the first we encounter.
        let mut errors = Vec::new();

        let mut properties = TypeProps::default();
        for meta in attr.parse_args_with(Punctuated::<Meta, Token![,]>::parse_terminated)? {
            match meta {
                Meta::Path(path) => {
                    if path.is_ident("text") {
                        // Text representation is only possible for enums whose
                        // variants are all unit, where each variant maps to a
                        // single token.
                        let is_unit_only_enum = match &input.data {
                            syn::Data::Enum(input) => input
                                .variants
                                .iter()
                                .all(|variant| matches!(variant.fields, syn::Fields::Unit)),

                            _ => false,
                        };

                        if is_unit_only_enum {
                            properties.should_serialize_as_text = true;
                        } else {
                            errors.push(Error::new(
                                path.span(),
                                "only unit enums may be derived as text",
                            ))
                        }
                    } else {
                        errors.push(Error::new(path.span(), UNRECOGNIZED_ATTRIBUTE_MSG));
                    }
                }
                Meta::NameValue(name_value) => {
                    if name_value.path.is_ident("default_ns") {
                        match properties.default_ns_name {
                            Some(_) => {
                                errors.push(Error::new(
                                    name_value.path.span(),
                                    "cannot declare more than one default namespace",
                                ));
                            }

                            None => {
                                properties.default_ns_name =
                                    Some(name_value.value.to_token_stream())
                            }
                        }
                    } else if name_value.path.is_ident("capability") {
                        match &input.data {
                            syn::Data::Struct(_) => properties
                                .capabilities
                                .push(name_value.value.to_token_stream()),

                            _ => errors.push(Error::new(
                                name_value.path.span(),
                                "capabilities may only be declared on structs",
                            )),
                        }
                    } else {
                        errors.push(Error::new(name_value.span(), UNRECOGNIZED_ATTRIBUTE_MSG));
                    }
                }

                _ => {
                    errors.push(Error::new(meta.span(), UNRECOGNIZED_ATTRIBUTE_MSG));
                }
            }
        }

        if properties.default_ns_name.is_some() && properties.should_serialize_as_text {
            // There's no meaningful way to namespace text content, so the
            // combination of these properties is almost certainly a mistake.
            errors.push(Error::new(
                attr.span(),
                "cannot declare namespaces for text content",
            ));
        }

        combine_errors(errors).map(|_| properties)
    }
}

#[derive(Debug, Default)]
/// Properties governing the serialization of a field in a struct or enum with a
/// derived `XmlSerialize` implementation.
pub(crate) struct FieldProps {
    /// The type of XML structure which the field represents.
    pub repr: FieldRepr,

    /// Whether the field should be serialized with a "flat" representation.
    ///
    /// A flattened field will be serialized only as its content nodes, rather
    /// than as an XML element containing those content nodes. Any attributes it
    /// carries are added to the enclosing element.
    pub should_flatten: bool,

    /// Whether the field embeds a parent record, whose fields precede the
    /// fields of the containing structure.
    pub is_base: bool,

    /// An explicit wire name, used instead of the camelCase field name.
    pub rename: Option<String>,

    /// The name of an element enclosing the items of a list field.
    ///
    /// Combined with `should_flatten`, the items are written inside the
    /// wrapper without an element of their own, as for lists of unions.
    pub wrapper: Option<String>,
}

impl FieldProps {
    /// Constructs a set of serialization properties for an enum or struct field
    /// from its struct attributes.
    pub(crate) fn try_from_attrs(
        value: Vec<Attribute>,
        field_has_name: bool,
    ) -> Result<Self, Error> {
        let attr = match find_configuration_attribute(&value) {
            Some(attr) => attr,
            None => return Ok(Self::default()),
        };

        let mut errors = Vec::new();

        let mut properties = FieldProps::default();
        for meta in attr.parse_args_with(Punctuated::<Meta, Token![,]>::parse_terminated)? {
            match meta {
                Meta::Path(path) => {
                    if path.is_ident("attribute") {
                        // The name of the field is used as the XML attribute
                        // name, so unnamed fields (e.g., members of tuple
                        // structs) cannot be represented as attributes.
                        if field_has_name {
                            properties.repr = FieldRepr::Attribute;
                        } else {
                            errors.push(Error::new(
                                path.span(),
                                "cannot serialize unnamed field as XML attribute",
                            ))
                        }
                    } else if path.is_ident("element") {
                        properties.repr = FieldRepr::Element;
                    } else if path.is_ident("text") {
                        properties.repr = FieldRepr::Text;
                    } else if path.is_ident("flatten") {
                        properties.should_flatten = true;
                    } else if path.is_ident("base") {
                        if field_has_name {
                            properties.is_base = true;
                            properties.should_flatten = true;
                        } else {
                            errors.push(Error::new(
                                path.span(),
                                "cannot embed unnamed field as a base record",
                            ))
                        }
                    } else {
                        errors.push(Error::new(path.span(), UNRECOGNIZED_ATTRIBUTE_MSG));
                    }
                }
                Meta::NameValue(name_value) => {
                    if name_value.path.is_ident("rename") {
                        if !field_has_name {
                            errors.push(Error::new(
                                name_value.span(),
                                "cannot rename unnamed field",
                            ));
                        } else {
                            match string_value(&name_value) {
                                Ok(value) => properties.rename = Some(value),
                                Err(err) => errors.push(err),
                            }
                        }
                    } else if name_value.path.is_ident("wrapper") {
                        match string_value(&name_value) {
                            Ok(value) => properties.wrapper = Some(value),
                            Err(err) => errors.push(err),
                        }
                    } else {
                        errors.push(Error::new(name_value.span(), UNRECOGNIZED_ATTRIBUTE_MSG));
                    }
                }

                _ => {
                    errors.push(Error::new(meta.span(), UNRECOGNIZED_ATTRIBUTE_MSG));
                }
            }
        }

        if properties.should_flatten && !matches!(properties.repr, FieldRepr::Element) {
            errors.push(Error::new(
                attr.span(),
                "only element fields may be flattened",
            ));
        }

        if properties.wrapper.is_some()
            && (properties.is_base || !matches!(properties.repr, FieldRepr::Element))
        {
            errors.push(Error::new(
                attr.span(),
                "only element fields may declare a wrapper",
            ));
        }

        combine_errors(errors).map(|_| properties)
    }
}

#[derive(Clone, Copy, Debug, Default)]
/// The types of XML structure which fields may represent.
pub(crate) enum FieldRepr {
    Attribute,

    #[default]
    Element,

    /// The text content of the enclosing element.
    Text,
}

#[derive(Debug, Default)]
/// Properties governing the serialization of an enum variant.
pub(crate) struct VariantProps {
    /// An explicit tag name or text token for the variant.
    pub rename: Option<String>,
}

impl VariantProps {
    pub(crate) fn try_from_attrs(value: &[Attribute]) -> Result<Self, Error> {
        let attr = match find_configuration_attribute(value) {
            Some(attr) => attr,
            None => return Ok(Self::default()),
        };

        let mut errors = Vec::new();

        let mut properties = VariantProps::default();
        for meta in attr.parse_args_with(Punctuated::<Meta, Token![,]>::parse_terminated)? {
            match meta {
                Meta::NameValue(name_value) if name_value.path.is_ident("rename") => {
                    match string_value(&name_value) {
                        Ok(value) => properties.rename = Some(value),
                        Err(err) => errors.push(err),
                    }
                }

                _ => {
                    errors.push(Error::new(meta.span(), UNRECOGNIZED_ATTRIBUTE_MSG));
                }
            }
        }

        combine_errors(errors).map(|_| properties)
    }
}

/// Extracts the value of a `name = "value"` option.
fn string_value(name_value: &MetaNameValue) -> Result<String, Error> {
    match &name_value.value {
        Expr::Lit(ExprLit {
            lit: Lit::Str(value),
            ..
        }) => Ok(value.value()),

        unexpected => Err(Error::new(unexpected.span(), "expected a string literal")),
    }
}

/// Combines a list of errors into a single error, if there are any.
pub(crate) fn combine_errors(errors: Vec<Error>) -> Result<(), Error> {
    match errors.into_iter().reduce(|mut combined, err| {
        combined.combine(err);

        combined
    }) {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

/// Gets the attribute containing configuration parameters for this derive
/// macro, if any.
fn find_configuration_attribute(attrs: &[Attribute]) -> Option<&Attribute> {
    attrs
        .iter()
        .find(|attr| attr.path().is_ident(MACRO_ATTRIBUTE))
}
