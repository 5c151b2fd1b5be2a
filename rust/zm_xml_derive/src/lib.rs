/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

mod properties;
mod serialize;

use syn::{parse_macro_input, DeriveInput};

pub(crate) use properties::*;

use crate::serialize::{write_serialize_impl_for_enum, write_serialize_impl_for_struct};

// This value must match the `attributes` attribute for the derive macro.
const MACRO_ATTRIBUTE: &str = "xml_struct";

/// A macro providing automated derivation of the `XmlSerialize` trait, along
/// with the schema description of the type.
///
/// By default, when applied to a struct, the resulting implementation will
/// serialize each of the struct's fields as an XML element with a tag name
/// derived from the name of the field in lowerCamelCase. Elements without
/// content are written as empty tags.
///
/// For example, the following declaration corresponds to the following output:
///
/// ```ignore
/// #[derive(XmlSerialize)]
/// struct Foo {
///     #[xml_struct(attribute, rename = "l")]
///     parent_id: String,
///     sort_by: String,
/// }
///
/// let foo = Foo {
///     parent_id: String::from("1"),
///     sort_by: String::from("dateDesc"),
/// };
/// ```
///
/// ```text
/// <foo l="1">
///     <sortBy>dateDesc</sortBy>
/// </foo>
/// ```
///
/// Structs with named fields also receive implementations of `Describe` and
/// `WireValue`, which describe the record type matching the derived
/// serialization.
///
/// When applied to an enum, the implementation will write an XML element with a
/// tag name derived from the name of the variant in lowerCamelCase. Any fields
/// of the variant will be serialized as the attributes and children of that
/// element. Such an enum is a polymorphic union, and receives an
/// implementation of `PolymorphicUnion` mapping each tag to the record type
/// of its variant. Tuple variants must hold exactly one described record.
///
/// ```ignore
/// #[derive(XmlSerialize)]
/// enum FolderNode {
///     Folder(Folder),
///
///     #[xml_struct(rename = "link")]
///     Mountpoint(Mountpoint),
/// }
/// ```
///
/// ```text
/// <folder id="2" name="Inbox"/>
/// <link id="257" name="Shared" rid="2"/>
/// ```
///
/// Unnamed fields, i.e. fields of tuple structs or enum tuple variants, are
/// serialized without an enclosing element.
///
/// # Configuration
///
/// The output from derived implementations may be configured with the
/// `xml_struct` attribute.
///
/// ## Data Structures
///
/// - `default_ns = "urn:zimbraMail"`
///
///   Provides the name to be used as the default namespace of elements
///   representing the marked structure, i.e.:
///
///   ```text
///   <Element xmlns="urn:zimbraMail"/>
///   ```
///
///   **NOTE**: The namespace will not be specified if values are serialized as
///   content nodes only.
///
/// - `text`
///
///   Specifies that a marked enum's variants should be serialized as text nodes
///   or as XML attribute values (depending on use in containing structures).
///   Each variant is written as its name unless renamed. The enum receives
///   implementations of `WireEnum`, `Display`, `FromStr` and
///   `TryFrom<String>`, the latter being suitable for
///   `#[serde(try_from = "String")]`.
///
///   **NOTE**: This option is only valid for enums which contain solely unit
///   variants.
///
/// - `capability = "SearchHit"`
///
///   Records a capability on the described record type. May be repeated.
///
/// ## Structure Fields
///
/// - `attribute`
///
///   Specifies that the marked field should be serialized as an XML attribute,
///   i.e. `field="value"`.
///
/// - `element`
///
///   Specifies that the marked field should be serialized as an XML element.
///   This is the default behavior, and use of this attribute is optional.
///
/// - `text`
///
///   Specifies that the marked field should be serialized as the text content
///   of the enclosing element.
///
/// - `flatten`
///
///   Specifies that the marked field should be serialized as content nodes
///   without an enclosing XML element. Fields holding polymorphic unions are
///   flattened so that each value is written with its own tag name.
///
/// - `base`
///
///   Embeds a parent record. Its attributes and content are written as part of
///   the enclosing element and its fields precede the fields of the containing
///   structure in the described record type.
///
/// - `rename = "l"`
///
///   Uses the given name instead of the name derived from the field.
///
/// - `wrapper = "replies"`
///
///   Encloses the items of a list field in an element with the given name. The
///   wrapper is omitted when the list is empty.
///
/// ## Enum Variants
///
/// - `rename = "usr"`
///
///   Uses the given tag name (or text token, for text enums) instead of the
///   name derived from the variant.
#[proc_macro_derive(XmlSerialize, attributes(xml_struct))]
pub fn derive_xml_serialize(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let props = match TypeProps::try_from_input(&input) {
        Ok(props) => props,
        Err(err) => return err.into_compile_error().into(),
    };

    let DeriveInput {
        generics, ident, ..
    } = input;

    match input.data {
        syn::Data::Struct(input) => write_serialize_impl_for_struct(ident, generics, input, props),
        syn::Data::Enum(input) => write_serialize_impl_for_enum(ident, generics, input, props),
        syn::Data::Union(_) => panic!("Serializing unions as XML is unsupported"),
    }
    // `syn` and `quote` use the `proc_macro2` crate, so internally we deal in
    // its `TokenStream`, but derive macros must use `proc_macro`'s, so convert
    // at the last minute.
    .into()
}
