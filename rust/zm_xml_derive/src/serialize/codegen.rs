/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use proc_macro2::{Ident, Literal, TokenStream};
use quote::{quote, ToTokens};
use syn::{ext::IdentExt as _, Generics};

use crate::{FieldProps, FieldRepr, TypeProps};

/// Generates an implementation of the `XmlSerialize` trait and, if appropriate,
/// the `XmlSerializeAttr` trait.
pub(super) fn generate_serialize_impl_for<G>(
    type_ident: Ident,
    generics: Generics,
    props: TypeProps,
    body_generator: G,
) -> TokenStream
where
    G: FnOnce(&[XmlAttribute]) -> ImplTokenSets,
{
    let namespace_attrs: Vec<_> = props
        .default_ns_name
        .map(|ns_name| XmlAttribute {
            // The terminology is a little confusing here. In terms of the XML
            // spec, the "name" of a namespace is the (usually) URI used as the
            // _value_ of the namespace declaration attribute.
            name: Literal::string("xmlns").into_token_stream(),
            value: ns_name,
        })
        .into_iter()
        .collect();

    let ImplTokenSets {
        as_element_impl,
        attributes_impl,
        child_nodes_body,
        as_attr_body,
    } = body_generator(&namespace_attrs);

    // Avoid an unused parameter warning for values without content.
    let child_nodes_body = if child_nodes_body.is_empty() {
        quote!(let _ = writer;)
    } else {
        child_nodes_body
    };

    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let attr_impl = if let Some(body) = as_attr_body {
        quote! {
            #[automatically_derived]
            impl #impl_generics ::zm_xml::XmlSerializeAttr for #type_ident #ty_generics #where_clause {
                fn serialize_as_attribute(&self, start_tag: &mut ::quick_xml::events::BytesStart, name: &str) {
                    #body
                }
            }
        }
    } else {
        // In cases where there is no clear text representation of a value, we
        // provide no derivation of `XmlSerializeAttr`.
        TokenStream::default()
    };

    // Construct the final implementation from the type-specific sets of tokens.
    quote! {
        #[automatically_derived]
        impl #impl_generics ::zm_xml::XmlSerialize for #type_ident #ty_generics #where_clause {
            #as_element_impl

            #attributes_impl

            fn serialize_child_nodes<W: std::io::Write>(
                &self,
                writer: &mut ::quick_xml::writer::Writer<W>
            ) -> Result<(), ::zm_xml::Error> {
                #child_nodes_body

                Ok(())
            }
        }

        #attr_impl
    }
}

/// The sets of tokens which make up the implementations or bodies of
/// `XmlSerialize` and `XmlSerializeAttr` trait methods.
pub(super) struct ImplTokenSets {
    /// The implementation of `XmlSerialize::serialize_as_element()` if it is
    /// necessary to override the provided default implementation.
    as_element_impl: TokenStream,

    /// The implementation of `XmlSerialize::serialize_attributes()` if the
    /// type carries any attributes.
    attributes_impl: TokenStream,

    /// The body of `XmlSerialize::serialize_child_nodes()`.
    child_nodes_body: TokenStream,

    /// The body of `XmlSerializeAttr::serialize_as_attribute()` if the type is
    /// capable of being serialized as such.
    as_attr_body: Option<TokenStream>,
}

/// Creates a generator for the sets of tokens necessary to serialize a struct
/// with the provided fields.
pub(super) fn with_struct_fields(
    fields: Vec<Field>,
) -> impl FnOnce(&[XmlAttribute]) -> ImplTokenSets {
    move |namespace_attrs| {
        // The default implementation writes the element, its attributes and
        // its content, so it only needs replacing to declare namespaces.
        let as_element_impl = if namespace_attrs.is_empty() {
            TokenStream::default()
        } else {
            let namespaces_call = generate_namespace_attrs_call(namespace_attrs);

            quote! {
                fn serialize_as_element<W: std::io::Write>(
                    &self,
                    writer: &mut ::quick_xml::writer::Writer<W>,
                    name: &str,
                ) -> Result<(), ::zm_xml::Error> {
                    let mut start_tag = ::quick_xml::events::BytesStart::new(name)
                        #namespaces_call;

                    <Self as ::zm_xml::XmlSerialize>::serialize_attributes(self, &mut start_tag);

                    ::zm_xml::write_element(writer, name, start_tag, |writer| {
                        <Self as ::zm_xml::XmlSerialize>::serialize_child_nodes(self, writer)
                    })
                }
            }
        };

        let attr_calls = generate_attribute_field_calls(&fields);
        let attributes_impl = if attr_calls.is_empty() {
            TokenStream::default()
        } else {
            quote! {
                fn serialize_attributes(&self, start_tag: &mut ::quick_xml::events::BytesStart) {
                    #attr_calls
                }
            }
        };

        ImplTokenSets {
            as_element_impl,
            attributes_impl,
            child_nodes_body: generate_field_content_node_calls(&fields),

            // There is no clear text representation of an arbitrary struct, so
            // we cannot provide an `XmlSerializeAttr` derivation.
            as_attr_body: None,
        }
    }
}

/// Creates a generator for the sets of tokens necessary to serialize a
/// unit-only enum as text nodes or attribute values.
pub(super) fn with_text_variants(
    variants: Vec<TextVariant>,
) -> impl FnOnce(&[XmlAttribute]) -> ImplTokenSets {
    // While the generator function takes namespace attributes as its argument,
    // we expect that the consuming code has already verified that there are
    // none for this enum, since attributes cannot be specified for text content
    // nodes.
    move |_| {
        let match_arms: Vec<_> = variants
            .iter()
            .map(|TextVariant { ident, token }| quote!(Self::#ident => #token))
            .collect();

        let text_from_value = quote! {
            let text = match self {
                #(#match_arms,)*
            };
        };

        ImplTokenSets {
            // No namespaces can be declared on enums which are serialized as
            // text, nor can they contain any attribute fields, so the default
            // implementations are sufficient.
            as_element_impl: TokenStream::default(),
            attributes_impl: TokenStream::default(),
            child_nodes_body: quote! {
                #text_from_value

                writer.write_event(
                    ::quick_xml::events::Event::Text(
                        ::quick_xml::events::BytesText::new(text)
                    )
                )?;
            },
            as_attr_body: Some(quote! {
                #text_from_value

                // `start_tag` is one of the parameters to the
                // `serialize_as_attribute()` method.
                start_tag.push_attribute((name, text));
            }),
        }
    }
}

/// Creates a generator for the sets of tokens necessary to serialize an enum
/// with the provided variants.
pub(super) fn with_enum_variants(
    variants: Vec<Variant>,
) -> impl FnOnce(&[XmlAttribute]) -> ImplTokenSets {
    move |namespace_attrs| {
        let match_arms: TokenStream = variants
            .into_iter()
            .map(|variant| {
                let ident = variant.ident;
                let name_tokens = Literal::string(&variant.tag).into_token_stream();

                match variant.kind {
                    VariantKind::Struct(fields) => {
                        let accessors = field_accessors(&fields);
                        let content_calls =
                            generate_xml_tag_calls(name_tokens, namespace_attrs, &fields);

                        quote! {
                            Self::#ident { #(#accessors),* } => {
                                #content_calls
                            }
                        }
                    }
                    VariantKind::Tuple(fields) => {
                        let accessors = field_accessors(&fields);
                        let content_calls =
                            generate_xml_tag_calls(name_tokens, namespace_attrs, &fields);

                        quote! {
                            Self::#ident(#(#accessors),*) => {
                                #content_calls
                            }
                        }
                    }
                    VariantKind::Unit => {
                        let content_calls =
                            generate_xml_tag_calls(name_tokens, namespace_attrs, &[]);

                        quote! {
                            Self::#ident => {
                                #content_calls
                            }
                        }
                    }
                }
            })
            .collect();

        ImplTokenSets {
            // No namespaces can be declared directly on the element enclosing
            // an enum value, nor can it be provided with attribute fields, so
            // the default implementations are sufficient.
            as_element_impl: TokenStream::default(),
            attributes_impl: TokenStream::default(),

            child_nodes_body: quote! {
                match self {
                    #match_arms
                }
            },

            // There is no clear text representation of an arbitrary enum
            // variant, so we cannot provide an `XmlSerializeAttr` derivation.
            as_attr_body: None,
        }
    }
}

/// Gets the identifiers used for accessing the fields of an enum variant.
fn field_accessors(fields: &[Field]) -> Vec<TokenStream> {
    fields.iter().map(|field| field.accessor.clone()).collect()
}

/// Generates tokens representing a call to add namespace attributes to an
/// element.
fn generate_namespace_attrs_call(namespace_attrs: &[XmlAttribute]) -> TokenStream {
    if !namespace_attrs.is_empty() {
        let namespace_attrs: Vec<_> = namespace_attrs
            .iter()
            .map(|XmlAttribute { name, value }| quote!((#name, #value)))
            .collect();

        quote! {
            .with_attributes([
                #(#namespace_attrs,)*
            ])
        }
    } else {
        TokenStream::default()
    }
}

/// Generates calls to add the attributes of struct or enum fields to the start
/// tag referenced by `start_tag`.
///
/// Attribute fields are written directly. Flattened and unnamed fields are
/// written without an enclosing element, so any attributes they carry belong
/// to the enclosing start tag.
fn generate_attribute_field_calls(fields: &[Field]) -> TokenStream {
    fields
        .iter()
        .map(|field| {
            let accessor = &field.accessor;
            let ty = &field.ty;

            match (&field.props.repr, &field.kind) {
                (FieldRepr::Attribute, _) => {
                    let name = Literal::string(&field_wire_name(field));

                    quote! {
                        <#ty as ::zm_xml::XmlSerializeAttr>::serialize_as_attribute(&#accessor, start_tag, #name);
                    }
                }

                (FieldRepr::Element, FieldKind::Unnamed) => quote! {
                    <#ty as ::zm_xml::XmlSerialize>::serialize_attributes(&#accessor, start_tag);
                },

                (FieldRepr::Element, FieldKind::Named(_))
                    if field.props.should_flatten && field.props.wrapper.is_none() =>
                {
                    quote! {
                        <#ty as ::zm_xml::XmlSerialize>::serialize_attributes(&#accessor, start_tag);
                    }
                }

                _ => TokenStream::default(),
            }
        })
        .collect()
}

/// Generates calls to add a new XML element to a document, including any
/// necessary attributes and content nodes.
///
/// If the fields produce no content nodes, the XML element will be an empty
/// tag (e.g., "<actionKeep/>").
fn generate_xml_tag_calls(
    name_tokens: TokenStream,
    namespace_attrs: &[XmlAttribute],
    fields: &[Field],
) -> TokenStream {
    let namespaces_call = generate_namespace_attrs_call(namespace_attrs);
    let attr_calls = generate_attribute_field_calls(fields);
    let content_calls = generate_field_content_node_calls(fields);

    let start_tag = if attr_calls.is_empty() {
        quote! {
            let start_tag = ::quick_xml::events::BytesStart::new(#name_tokens)
                #namespaces_call;
        }
    } else {
        quote! {
            let mut start_tag = ::quick_xml::events::BytesStart::new(#name_tokens)
                #namespaces_call;

            {
                let start_tag = &mut start_tag;

                #attr_calls
            }
        }
    };

    let element = if content_calls.is_empty() {
        // If the type has no fields which are to be serialized as child
        // nodes, write an empty XML tag.
        quote! {
            writer.write_event(
                ::quick_xml::events::Event::Empty(start_tag)
            )?;
        }
    } else {
        quote! {
            ::zm_xml::write_element(writer, #name_tokens, start_tag, |writer| {
                #content_calls

                Ok(())
            })?;
        }
    };

    quote! {
        #start_tag

        #element
    }
}

/// Generates calls to serialize the given fields as XML content nodes.
fn generate_field_content_node_calls(fields: &[Field]) -> TokenStream {
    fields
        .iter()
        .map(|field| {
            let ty = &field.ty;
            let accessor = &field.accessor;

            match (&field.props.repr, &field.kind) {
                (FieldRepr::Attribute, _) => TokenStream::default(),

                (FieldRepr::Element, FieldKind::Named(_)) if !field.props.should_flatten => {
                    let child_name = Literal::string(&field_wire_name(field));

                    match &field.props.wrapper {
                        Some(wrapper) => {
                            let wrapper = Literal::string(wrapper);

                            quote! {
                                if !#accessor.is_empty() {
                                    ::zm_xml::write_element(
                                        writer,
                                        #wrapper,
                                        ::quick_xml::events::BytesStart::new(#wrapper),
                                        |writer| {
                                            <#ty as ::zm_xml::XmlSerialize>::serialize_as_element(&#accessor, writer, #child_name)
                                        },
                                    )?;
                                }
                            }
                        }

                        None => quote! {
                            <#ty as ::zm_xml::XmlSerialize>::serialize_as_element(&#accessor, writer, #child_name)?;
                        },
                    }
                }

                (FieldRepr::Element, FieldKind::Named(_)) if field.props.wrapper.is_some() => {
                    let wrapper = Literal::string(field.props.wrapper.as_deref().unwrap_or_default());

                    quote! {
                        if !#accessor.is_empty() {
                            ::zm_xml::write_element(
                                writer,
                                #wrapper,
                                ::quick_xml::events::BytesStart::new(#wrapper),
                                |writer| {
                                    <#ty as ::zm_xml::XmlSerialize>::serialize_child_nodes(&#accessor, writer)
                                },
                            )?;
                        }
                    }
                }

                // Text content, tuple struct fields and fields for which the
                // consumer has specifically requested a flat representation
                // are serialized without a containing element.
                _ => {
                    quote! {
                        <#ty as ::zm_xml::XmlSerialize>::serialize_child_nodes(&#accessor, writer)?;
                    }
                }
            }
        })
        .collect()
}

/// Gets the name a field is written with, as an element or attribute name.
pub(super) fn field_wire_name(field: &Field) -> String {
    match (&field.props.rename, &field.kind) {
        (Some(name), _) => name.clone(),
        (None, FieldKind::Named(_)) => field_logical_name(field),
        (None, FieldKind::Unnamed) => panic!("cannot stringify unnamed field"),
    }
}

/// Gets the name of a field as it appears in the record type description.
pub(super) fn field_logical_name(field: &Field) -> String {
    match &field.kind {
        FieldKind::Named(ident) => snake_to_camel(&ident.unraw().to_string()),
        FieldKind::Unnamed => panic!("cannot stringify unnamed field"),
    }
}

/// Converts a snake_case identifier string to lowerCamelCase.
fn snake_to_camel(snake: &str) -> String {
    let mut capitalize_next = false;

    snake
        .chars()
        .filter_map(|character| {
            if character == '_' {
                // Consume the underscore and capitalize the next character.
                capitalize_next = true;

                None
            } else if capitalize_next {
                capitalize_next = false;

                // Rust supports non-ASCII identifiers, so this could
                // technically fail, but this macro does not currently handle
                // the general XML case, and so full Unicode case mapping is out
                // of scope at present.
                Some(character.to_ascii_uppercase())
            } else {
                Some(character)
            }
        })
        .collect()
}

/// Converts a PascalCase identifier string to lowerCamelCase.
pub(super) fn pascal_to_camel(pascal: &str) -> String {
    let mut characters = pascal.chars();

    match characters.next() {
        Some(first) => first.to_ascii_lowercase().to_string() + characters.as_str(),
        None => String::new(),
    }
}

#[derive(Debug)]
/// A representation of an enum variant.
pub(crate) struct Variant {
    // The identifier for the variant.
    pub ident: Ident,

    // The tag name of the element representing the variant.
    pub tag: String,

    // The form of the variant, along with any fields.
    pub kind: VariantKind,
}

#[derive(Debug)]
/// A representation of a variant of an enum serialized as text.
pub(crate) struct TextVariant {
    pub ident: Ident,

    // The text written for the variant.
    pub token: String,
}

#[derive(Debug)]
/// The form of an enum variant and its contained fields.
pub(crate) enum VariantKind {
    Struct(Vec<Field>),
    Tuple(Vec<Field>),
    Unit,
}

#[derive(Debug)]
/// A representation of a struct or enum field.
pub(crate) struct Field {
    // The form of the field, along with any identifier.
    pub kind: FieldKind,

    // The type of the field.
    pub ty: TokenStream,

    // An expression which will access the value of the field.
    pub accessor: TokenStream,

    // Properties affecting the serialization of the field.
    pub props: FieldProps,
}

#[derive(Debug)]
/// The form of a field, whether named or unnamed.
pub(crate) enum FieldKind {
    Named(Ident),
    Unnamed,
}

/// Tokens representing an XML attribute's name/value pair.
pub(crate) struct XmlAttribute {
    name: TokenStream,
    value: TokenStream,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_names_become_lower_camel_case() {
        assert_eq!(snake_to_camel("abs_folder_path"), "absFolderPath");
        assert_eq!(snake_to_camel("name"), "name");
        assert_eq!(snake_to_camel("internal_grant_expiry"), "internalGrantExpiry");
    }

    #[test]
    fn variant_names_become_lower_camel_case() {
        assert_eq!(pascal_to_camel("ActionFileInto"), "actionFileInto");
        assert_eq!(pascal_to_camel("M"), "m");
        assert_eq!(pascal_to_camel(""), "");
    }
}
