/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! Typed structures for Zimbra's mail and calendar SOAP protocol, along with
//! the SOAP 1.2 envelope they travel in.

use thiserror::Error;

mod types;

pub use types::*;

#[cfg(test)]
mod test_utils;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to serialize structure as XML")]
    Serialize(#[from] zm_xml::Error),

    #[error("failed to deserialize structure from XML")]
    Deserialize(#[from] serde_path_to_error::Error<quick_xml::DeError>),

    #[error("error manipulating XML data")]
    Xml(#[from] quick_xml::Error),

    #[error("failed to write XML document")]
    Io(#[from] std::io::Error),

    #[error("request failed with fault: {0:?}")]
    RequestFault(Box<soap::Fault>),

    #[error("element `{tag}` is not a variant of `{union}`")]
    UnknownVariant { union: String, tag: String },

    #[error("response could not be read: {}", String::from_utf8_lossy(.0))]
    UnexpectedResponse(Vec<u8>),
}
