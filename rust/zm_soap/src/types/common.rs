/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

pub mod acl;
pub use self::acl::*;
pub mod calendar;
pub use self::calendar::*;
pub mod contact;
pub use self::contact::*;
pub mod data_source;
pub use self::data_source::*;
pub mod filter;
pub use self::filter::*;
pub mod folder;
pub use self::folder::*;
pub mod metadata;
pub use self::metadata::*;
pub mod search_hit;
pub use self::search_hit::*;

pub(crate) const ZIMBRA_NS_URI: &str = "urn:zimbra";
pub(crate) const MAIL_NS_URI: &str = "urn:zimbraMail";
pub(crate) const SOAP_NS_URI: &str = "http://www.w3.org/2003/05/soap-envelope";
