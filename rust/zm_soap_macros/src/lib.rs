/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Ident, ItemStruct};

/// Annotate a struct as a Zimbra SOAP request whose response is the given type.
///
/// Both the request and the response are written in the SOAP body under their
/// own type names, e.g. `<GetFolderRequest>` and `<GetFolderResponse>`, so the
/// response type must be declared alongside the request and derive
/// `serde::Deserialize`.
#[proc_macro_attribute]
pub fn operation(attr: TokenStream, annotated_item: TokenStream) -> TokenStream {
    let response_name = parse_macro_input!(attr as Ident);
    let input_struct = parse_macro_input!(annotated_item as ItemStruct);

    let request_name = input_struct.ident.clone();

    let expanded = quote! {
        #input_struct

        impl crate::Operation for #request_name {
            type Response = #response_name;
        }

        impl crate::types::sealed::EnvelopeBodyContents for #request_name {
            fn name() -> &'static str {
                stringify!(#request_name)
            }
        }

        impl crate::OperationResponse for #response_name {}

        impl crate::types::sealed::EnvelopeBodyContents for #response_name {
            fn name() -> &'static str {
                stringify!(#response_name)
            }
        }
    };

    TokenStream::from(expanded)
}
