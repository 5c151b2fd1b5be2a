/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! Helpers for reading typed structures with `serde`.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Deserializer};

/// Deserializes the items of a list enclosed in a wrapper element, e.g.
/// `<replies><reply/><reply/></replies>`.
///
/// `quick-xml`'s `serde` implementation requires an intermediate type for the
/// wrapper element, which does not exist in our model for serialization. A
/// wrapper element without children yields an empty list.
///
/// Use with `#[serde(default, deserialize_with = "zm_xml::de::wrapped")]` so
/// that an absent wrapper also yields an empty list.
pub fn wrapped<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    #[derive(Deserialize)]
    struct Wrapper<T> {
        #[serde(rename = "$value", default = "Vec::new")]
        items: Vec<T>,
    }

    let wrapper = Wrapper::<T>::deserialize(deserializer)?;

    Ok(wrapper.items)
}

/// Deserializes an optional value from its string form.
///
/// Fields of flattened structures are buffered by `serde` as strings, so
/// numeric attributes of base records must be parsed explicitly. Use with
/// `#[serde(default, deserialize_with = "zm_xml::de::option_from_str")]`.
pub fn option_from_str<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    Option::<String>::deserialize(deserializer)?
        .map(|value| value.trim().parse().map_err(serde::de::Error::custom))
        .transpose()
}

/// Deserializes a required value from its string form.
///
/// The counterpart of [`option_from_str`] for required attributes of base
/// records.
pub fn from_str<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    String::deserialize(deserializer)?
        .trim()
        .parse()
        .map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Base {
        #[serde(rename = "@seq", deserialize_with = "super::from_str")]
        sequence: i32,

        #[serde(rename = "@d", default, deserialize_with = "super::option_from_str")]
        date: Option<i64>,
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Derived {
        #[serde(flatten)]
        base: Base,

        #[serde(rename = "@at")]
        attendee: String,
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Container {
        #[serde(rename = "replies", default, deserialize_with = "super::wrapped")]
        replies: Vec<Base>,
    }

    #[test]
    fn flattened_numbers_are_parsed_from_strings() {
        let derived: Derived =
            quick_xml::de::from_str(r#"<reply seq="2" d="1705309200000" at="bob@example.com"/>"#)
                .expect("flattened attributes should deserialize");

        assert_eq!(
            derived,
            Derived {
                base: Base {
                    sequence: 2,
                    date: Some(1705309200000),
                },
                attendee: "bob@example.com".into(),
            }
        );

        let derived: Derived = quick_xml::de::from_str(r#"<reply seq=" 7 " at="carol@example.com"/>"#)
            .expect("absent optional attributes should deserialize");
        assert_eq!(derived.base.date, None);
        assert_eq!(derived.base.sequence, 7);
    }

    #[test]
    fn malformed_number_is_rejected() {
        let result = quick_xml::de::from_str::<Derived>(r#"<reply seq="two" at="bob@example.com"/>"#);
        assert!(result.is_err(), "`two` is not a sequence number");
    }

    #[test]
    fn wrapped_items_are_unwrapped() {
        let container: Container = quick_xml::de::from_str(
            r#"<comp><replies><reply seq="1"/><reply seq="2"/></replies></comp>"#,
        )
        .expect("wrapped list should deserialize");
        let sequences: Vec<i32> = container.replies.iter().map(|reply| reply.sequence).collect();
        assert_eq!(sequences, [1, 2]);

        let container: Container =
            quick_xml::de::from_str("<comp/>").expect("absent wrapper should deserialize");
        assert!(container.replies.is_empty());
    }
}
