// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Parsing of category answers from freeform model text
//!
//! The model is asked to wrap its JSON answer as `-- <json> --`. The payload
//! is whatever sits between the first and second marker.

use serde::de::{Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use std::fmt;

use crate::{Result, ShotsortError};

/// Marker framing the JSON payload in a model answer
pub const MARKER: &str = "--";

/// Instruction appended to every categorization prompt
pub const WRAPPER_INSTRUCTION: &str =
    "VERY_IMPORTANT_NOTE: respond with only and only this format: -- <json_here> --";

/// One suggested category and the titles assigned to it, in answer order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub name: String,
    pub titles: Vec<String>,
}

/// Categories in the order the model listed them
struct CategoryList(Vec<Category>);

impl<'de> Deserialize<'de> for CategoryList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct CategoryListVisitor;

        impl<'de> Visitor<'de> for CategoryListVisitor {
            type Value = CategoryList;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object mapping category names to title arrays")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<CategoryList, A::Error> {
                let mut categories = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((name, titles)) = map.next_entry::<String, Vec<String>>()? {
                    categories.push(Category { name, titles });
                }
                Ok(CategoryList(categories))
            }
        }

        deserializer.deserialize_map(CategoryListVisitor)
    }
}

/// Return the trimmed text between the first two markers
pub fn extract_payload(raw: &str) -> Result<&str> {
    let mut parts = raw.split(MARKER);
    parts.next();
    match (parts.next(), parts.next()) {
        (Some(payload), Some(_)) => Ok(payload.trim()),
        _ => Err(ShotsortError::MalformedResponse(format!(
            "expected payload between two '{}' markers",
            MARKER
        ))),
    }
}

/// Decode a payload of the form `{"Category": ["title", ...], ...}`.
///
/// Categories keep the order of the object's keys.
pub fn parse_categories(payload: &str) -> Result<Vec<Category>> {
    let CategoryList(categories) = serde_json::from_str(payload)
        .map_err(|e| ShotsortError::MalformedResponse(format!("invalid category JSON: {}", e)))?;
    Ok(categories)
}

/// Extract and decode a full model answer
pub fn parse_response(raw: &str) -> Result<Vec<Category>> {
    parse_categories(extract_payload(raw)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_between_markers() {
        let raw = r#"prefix -- {"A": ["x"]} -- suffix"#;
        assert_eq!(extract_payload(raw).unwrap(), r#"{"A": ["x"]}"#);
    }

    #[test]
    fn test_extract_ignores_later_markers() {
        let raw = "-- first -- second -- third";
        assert_eq!(extract_payload(raw).unwrap(), "first");
    }

    #[test]
    fn test_extract_requires_two_markers() {
        assert!(matches!(
            extract_payload(r#"-- {"A": ["x"]}"#),
            Err(ShotsortError::MalformedResponse(_))
        ));
        assert!(matches!(
            extract_payload(r#"{"A": ["x"]}"#),
            Err(ShotsortError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_parse_response() {
        let raw = "Sure!\n-- {\"Animals\": [\"cat_photo\", \"dog_photo\"], \"Finance\": [\"invoice_scan\"]} --";
        let categories = parse_response(raw).unwrap();

        assert_eq!(categories.len(), 2);
        assert_eq!(categories[0].name, "Animals");
        assert_eq!(categories[0].titles, vec!["cat_photo", "dog_photo"]);
        assert_eq!(categories[1].name, "Finance");
    }

    #[test]
    fn test_categories_keep_answer_order() {
        let categories = parse_response(r#"-- {"Zeta": ["shot"], "Alpha": ["shot"], "Mid": []} --"#).unwrap();
        let names: Vec<&str> = categories.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Zeta", "Alpha", "Mid"]);
        assert!(categories[2].titles.is_empty());
    }

    #[test]
    fn test_invalid_json_is_malformed() {
        assert!(matches!(
            parse_response("-- {not json} --"),
            Err(ShotsortError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_wrong_shape_is_malformed() {
        assert!(matches!(
            parse_response(r#"-- ["a", "b"] --"#),
            Err(ShotsortError::MalformedResponse(_))
        ));
        assert!(matches!(
            parse_response(r#"-- {"A": "x"} --"#),
            Err(ShotsortError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_empty_object_is_valid() {
        assert!(parse_response("-- {} --").unwrap().is_empty());
    }
}
