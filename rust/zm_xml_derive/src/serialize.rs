/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

mod codegen;
mod describe;

use std::collections::HashSet;

use proc_macro2::{Ident, Literal, TokenStream};
use quote::{format_ident, quote, ToTokens};
use syn::{spanned::Spanned as _, DataEnum, DataStruct, Generics};

use crate::{combine_errors, FieldProps, FieldRepr, TypeProps, VariantProps};

use self::codegen::{
    generate_serialize_impl_for, pascal_to_camel, with_enum_variants, with_struct_fields,
    with_text_variants, Field, FieldKind, TextVariant, Variant, VariantKind,
};
use self::describe::{describe_struct, describe_text_enum, describe_union};

/// Generates an implementation of the `XmlSerialize` trait for a Rust struct
/// and its fields, along with its record type description.
pub(crate) fn write_serialize_impl_for_struct(
    ident: Ident,
    generics: Generics,
    input: DataStruct,
    props: TypeProps,
) -> TokenStream {
    // We build a list of errors so that we can combine them later and emit
    // them all instead of quitting at the first we encounter.
    let mut errors = Vec::new();

    // Only structs with named fields (or none at all) describe a record type.
    let is_record = !matches!(input.fields, syn::Fields::Unnamed(_));

    // Process the struct's fields in order to determine how to represent them,
    // based on struct type and any consumer-applied attributes.
    let fields: Vec<Field> = match input.fields {
        // Fields in a regular struct, i.e. declared with a name and type.
        syn::Fields::Named(fields) => fields
            .named
            .into_iter()
            .map(process_named_field(
                &mut errors,
                |ident| quote!(self.#ident),
            ))
            .collect(),

        // Fields in a tuple struct, i.e. declared by type and position only.
        syn::Fields::Unnamed(fields) => fields
            .unnamed
            .into_iter()
            .enumerate()
            .map(process_unnamed_field(&mut errors, |idx| {
                let idx_literal = Literal::usize_unsuffixed(idx);
                quote!(self.#idx_literal)
            }))
            .collect(),

        // A unit struct, i.e. one which has no fields.
        syn::Fields::Unit => vec![],
    };

    check_field_set(&ident, &fields, &mut errors);

    if let Err(err) = combine_errors(errors) {
        return err.into_compile_error();
    }

    // Descriptions name concrete field types, so generic structures are
    // serialized but not described.
    let description = if is_record && generics.params.is_empty() {
        describe_struct(&ident, &props, &fields)
    } else {
        TokenStream::default()
    };

    let serialize_impl =
        generate_serialize_impl_for(ident, generics, props, with_struct_fields(fields));

    quote! {
        #serialize_impl

        #description
    }
}

/// Generates an implementation of the `XmlSerialize` trait (and the
/// `XmlSerializeAttr` trait if appropriate) for a Rust enum, its variants, and
/// their fields, along with its enum mapping or union description.
pub(crate) fn write_serialize_impl_for_enum(
    ident: Ident,
    generics: Generics,
    input: DataEnum,
    props: TypeProps,
) -> TokenStream {
    let mut errors = Vec::new();

    if props.should_serialize_as_text {
        // We depend on the code which generates `TypeProps` to handle verifying
        // that this enum consists solely of unit variants when setting this
        // property, so we just collect variant identifiers and tokens.
        let mut tokens = HashSet::new();
        let variants: Vec<TextVariant> = input
            .variants
            .into_iter()
            .map(|variant| {
                let props = VariantProps::try_from_attrs(&variant.attrs).unwrap_or_else(|err| {
                    errors.push(err);

                    VariantProps::default()
                });

                let token = props.rename.unwrap_or_else(|| variant.ident.to_string());
                if !tokens.insert(token.clone()) {
                    errors.push(syn::Error::new(
                        variant.ident.span(),
                        format!("token `{token}` is used by more than one variant"),
                    ));
                }

                TextVariant {
                    ident: variant.ident,
                    token,
                }
            })
            .collect();

        if let Err(err) = combine_errors(errors) {
            return err.into_compile_error();
        }

        let description = if generics.params.is_empty() {
            describe_text_enum(&ident, &variants)
        } else {
            TokenStream::default()
        };

        let serialize_impl =
            generate_serialize_impl_for(ident, generics, props, with_text_variants(variants));

        return quote! {
            #serialize_impl

            #description
        };
    }

    // Process the enum's variants in order to determine how to represent them,
    // based on variant type and any consumer-applied attributes.
    let variants: Vec<Variant> = input
        .variants
        .into_iter()
        .map(process_enum_variant(&mut errors))
        .collect();

    let mut tags = HashSet::new();
    for variant in &variants {
        if !tags.insert(variant.tag.as_str()) {
            errors.push(syn::Error::new(
                variant.ident.span(),
                format!("tag `{}` is used by more than one variant", variant.tag),
            ));
        }
    }

    if let Err(err) = combine_errors(errors) {
        return err.into_compile_error();
    }

    let description = if generics.params.is_empty() {
        describe_union(&ident, &variants)
    } else {
        TokenStream::default()
    };

    let serialize_impl =
        generate_serialize_impl_for(ident, generics, props, with_enum_variants(variants));

    quote! {
        #serialize_impl

        #description
    }
}

/// Creates a callback for processing a `syn` enum variant into codegen details.
fn process_enum_variant(errors: &mut Vec<syn::Error>) -> impl FnMut(syn::Variant) -> Variant + '_ {
    |variant| {
        let props = VariantProps::try_from_attrs(&variant.attrs).unwrap_or_else(|err| {
            errors.push(err);

            VariantProps::default()
        });

        // Process the variants's fields in order to determine how to represent
        // them, based on variant type and any consumer-applied attributes.
        let kind = match variant.fields {
            syn::Fields::Named(fields) => {
                let fields = fields
                    .named
                    .into_iter()
                    .map(process_named_field(errors, Ident::to_token_stream))
                    .collect();

                VariantKind::Struct(fields)
            }
            syn::Fields::Unnamed(fields) => {
                // A tuple variant stands for the record it holds, so there
                // must be exactly one.
                if fields.unnamed.len() != 1 {
                    errors.push(syn::Error::new(
                        fields.span(),
                        "tuple variants must hold exactly one record",
                    ));
                }

                let fields = fields
                    .unnamed
                    .into_iter()
                    .enumerate()
                    .map(process_unnamed_field(errors, |idx| {
                        format_ident!("field{idx}").into_token_stream()
                    }))
                    .collect();

                VariantKind::Tuple(fields)
            }
            syn::Fields::Unit => VariantKind::Unit,
        };

        let tag = props
            .rename
            .unwrap_or_else(|| pascal_to_camel(&variant.ident.to_string()));

        Variant {
            ident: variant.ident,
            tag,
            kind,
        }
    }
}

/// Creates a callback for extracting representation details from a named field
/// (i.e., a field of a regular struct or a struct enum variant) and its
/// attributes.
///
/// The `accessor_generator` callback should, based on the name of a field,
/// return an expression for accessing the value of that field (either on `self`
/// or within a match arm).
fn process_named_field<'cb, 'g: 'cb, G>(
    errors: &'cb mut Vec<syn::Error>,
    mut accessor_generator: G,
) -> impl FnMut(syn::Field) -> Field + 'cb
where
    G: FnMut(&Ident) -> TokenStream + 'g,
{
    move |field| {
        // We should be able to unwrap without panicking, since we know this is
        // a named field.
        let ident = field.ident.unwrap();
        let accessor = accessor_generator(&ident);

        let props = FieldProps::try_from_attrs(field.attrs, true)
            .unwrap_or_else(collect_field_processing_error(errors));

        Field {
            kind: FieldKind::Named(ident),
            ty: field.ty.into_token_stream(),
            accessor,
            props,
        }
    }
}

/// Creates a callback for extracting representation details from an unnamed
/// field (i.e., a field of a tuple struct or a tuple enum variant) and its
/// attributes.
///
/// The `accessor_generator` callback should, based on the position of a field,
/// return an expression for accessing the value of that field (either on `self`
/// or within a match arm).
fn process_unnamed_field<'cb, 'g: 'cb, G>(
    errors: &'cb mut Vec<syn::Error>,
    mut accessor_generator: G,
) -> impl FnMut((usize, syn::Field)) -> Field + 'cb
where
    G: FnMut(usize) -> TokenStream + 'g,
{
    move |(idx, field)| {
        let accessor = accessor_generator(idx);

        let props = FieldProps::try_from_attrs(field.attrs, false)
            .unwrap_or_else(collect_field_processing_error(errors));

        Field {
            kind: FieldKind::Unnamed,
            ty: field.ty.into_token_stream(),
            accessor,
            props,
        }
    }
}

/// Creates a callback for handling errors in processing field properties.
fn collect_field_processing_error(
    errors: &mut Vec<syn::Error>,
) -> impl FnMut(syn::Error) -> FieldProps + '_ {
    |err| {
        errors.push(err);

        FieldProps::default()
    }
}

/// Checks constraints which apply to a structure's fields as a set.
fn check_field_set(ident: &Ident, fields: &[Field], errors: &mut Vec<syn::Error>) {
    let text_fields = fields
        .iter()
        .filter(|field| matches!(field.props.repr, FieldRepr::Text))
        .count();
    if text_fields > 1 {
        errors.push(syn::Error::new(
            ident.span(),
            "cannot declare more than one text field",
        ));
    }

    let base_fields = fields.iter().filter(|field| field.props.is_base).count();
    if base_fields > 1 {
        errors.push(syn::Error::new(
            ident.span(),
            "cannot embed more than one base record",
        ));
    }
}
