/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! Generation of the schema description traits: `Describe` and `WireValue` for
//! records, `WireEnum` for text enums and `PolymorphicUnion` for unions.

use proc_macro2::{Ident, Literal, TokenStream};
use quote::{quote, ToTokens as _};

use crate::{FieldRepr, TypeProps};

use super::codegen::{
    field_logical_name, field_wire_name, Field, TextVariant, Variant, VariantKind,
};

/// Generates the record type description of a struct with named fields.
pub(super) fn describe_struct(type_ident: &Ident, props: &TypeProps, fields: &[Field]) -> TokenStream {
    let type_name = Literal::string(&type_ident.to_string());

    let mut inherit_call = TokenStream::default();
    let mut field_calls = Vec::new();
    for field in fields {
        let ty = &field.ty;

        if field.props.is_base {
            inherit_call = quote! {
                .inherit(<#ty as ::zm_xml::Describe>::record_spec())
            };

            continue;
        }

        let name = Literal::string(&field_logical_name(field));
        let (binding, wire_name) = match field.props.repr {
            FieldRepr::Attribute => (quote!(Attribute), field_wire_name(field)),
            FieldRepr::Element => (quote!(Element), field_wire_name(field)),
            FieldRepr::Text => (quote!(TextValue), String::new()),
        };
        let wire_name = Literal::string(&wire_name);

        let wrapper_call = field.props.wrapper.as_deref().map(|wrapper| {
            let wrapper = Literal::string(wrapper);
            quote!(.wrapped_in(#wrapper))
        });

        field_calls.push(quote! {
            .field(
                ::zm_xml::FieldDescriptor::new(
                    #name,
                    #wire_name,
                    ::zm_xml::BindingKind::#binding,
                    <#ty as ::zm_xml::WireValue>::value_kind(),
                )
                .required(!<#ty as ::zm_xml::WireValue>::is_optional())
                #wrapper_call
            )
        });
    }

    let capabilities = &props.capabilities;

    quote! {
        #[automatically_derived]
        impl ::zm_xml::Describe for #type_ident {
            const NAME: &'static str = #type_name;

            fn record_spec() -> ::zm_xml::RecordTypeSpec {
                ::zm_xml::RecordTypeSpec::new(<Self as ::zm_xml::Describe>::NAME)
                    #(#field_calls)*
                    #(.capability(#capabilities))*
                    #inherit_call
            }
        }

        #[automatically_derived]
        impl ::zm_xml::WireValue for #type_ident {
            fn value_kind() -> ::zm_xml::ValueKind {
                ::zm_xml::ValueKind::NestedRecord(
                    <Self as ::zm_xml::Describe>::NAME.to_owned()
                )
            }
        }
    }
}

/// Generates the enum mapping of an enum serialized as text, along with the
/// conversions to and from its tokens.
pub(super) fn describe_text_enum(type_ident: &Ident, variants: &[TextVariant]) -> TokenStream {
    let type_name = Literal::string(&type_ident.to_string());

    let idents: Vec<_> = variants.iter().map(|variant| &variant.ident).collect();
    let symbols: Vec<_> = variants
        .iter()
        .map(|variant| Literal::string(&variant.ident.to_string()))
        .collect();
    let tokens: Vec<_> = variants
        .iter()
        .map(|variant| Literal::string(&variant.token))
        .collect();

    quote! {
        #[automatically_derived]
        impl ::zm_xml::WireEnum for #type_ident {
            const NAME: &'static str = #type_name;
            const SYMBOLS: &'static [&'static str] = &[#(#symbols),*];
            const TOKENS: &'static [&'static str] = &[#(#tokens),*];

            fn to_token(&self) -> &'static str {
                match self {
                    #(Self::#idents => #tokens,)*
                }
            }

            fn from_token(token: &str) -> Result<Self, ::zm_xml::InvalidEnumValue> {
                match token {
                    #(#tokens => Ok(Self::#idents),)*
                    _ => Err(::zm_xml::InvalidEnumValue::new(
                        <Self as ::zm_xml::WireEnum>::NAME,
                        token,
                        <Self as ::zm_xml::WireEnum>::TOKENS,
                    )),
                }
            }
        }

        #[automatically_derived]
        impl ::std::fmt::Display for #type_ident {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(<Self as ::zm_xml::WireEnum>::to_token(self))
            }
        }

        #[automatically_derived]
        impl ::std::str::FromStr for #type_ident {
            type Err = ::zm_xml::InvalidEnumValue;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                <Self as ::zm_xml::WireEnum>::from_token(s)
            }
        }

        #[automatically_derived]
        impl ::std::convert::TryFrom<String> for #type_ident {
            type Error = ::zm_xml::InvalidEnumValue;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                <Self as ::zm_xml::WireEnum>::from_token(&value)
            }
        }

        #[automatically_derived]
        impl ::zm_xml::WireValue for #type_ident {
            fn value_kind() -> ::zm_xml::ValueKind {
                ::zm_xml::ValueKind::Enum(<Self as ::zm_xml::WireEnum>::NAME.to_owned())
            }
        }
    }
}

/// Generates the dispatch table of a polymorphic union.
pub(super) fn describe_union(type_ident: &Ident, variants: &[Variant]) -> TokenStream {
    let type_name = Literal::string(&type_ident.to_string());

    let entries: Vec<_> = variants
        .iter()
        .map(|variant| {
            let tag = Literal::string(&variant.tag);

            // A tuple variant is the record it holds. Other variants are
            // records in their own right, named after the variant.
            let record = match &variant.kind {
                VariantKind::Tuple(fields) if !fields.is_empty() => {
                    let ty = &fields[0].ty;
                    quote!(<#ty as ::zm_xml::Describe>::NAME)
                }
                _ => Literal::string(&variant.ident.to_string()).into_token_stream(),
            };

            quote!((#tag, #record))
        })
        .collect();

    let tag_arms: Vec<_> = variants
        .iter()
        .map(|variant| {
            let ident = &variant.ident;
            let tag = Literal::string(&variant.tag);

            match &variant.kind {
                VariantKind::Struct(_) => quote!(Self::#ident { .. } => #tag),
                VariantKind::Tuple(_) => quote!(Self::#ident(..) => #tag),
                VariantKind::Unit => quote!(Self::#ident => #tag),
            }
        })
        .collect();

    quote! {
        #[automatically_derived]
        impl ::zm_xml::PolymorphicUnion for #type_ident {
            const NAME: &'static str = #type_name;
            const VARIANTS: &'static [(&'static str, &'static str)] = &[#(#entries),*];

            fn tag_name(&self) -> &'static str {
                match self {
                    #(#tag_arms,)*
                }
            }
        }

        #[automatically_derived]
        impl ::zm_xml::WireValue for #type_ident {
            fn value_kind() -> ::zm_xml::ValueKind {
                ::zm_xml::ValueKind::Union(<Self as ::zm_xml::PolymorphicUnion>::NAME.to_owned())
            }
        }
    }
}
