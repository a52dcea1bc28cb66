// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use shotsort::naming::{sanitize_filename, INVALID_CHARS, MAX_NAME_CHARS};
use shotsort::response::parse_response;

#[derive(Arbitrary, Debug)]
struct Input<'a> {
    title: &'a str,
    answer: &'a str,
}

fuzz_target!(|input: Input<'_>| {
    let name = sanitize_filename(input.title);
    assert!(!name.is_empty());
    assert!(name.chars().count() <= MAX_NAME_CHARS);
    assert!(!name.contains(INVALID_CHARS));
    assert_eq!(sanitize_filename(&name), name);

    if let Ok(categories) = parse_response(input.answer) {
        for category in categories {
            assert!(!sanitize_filename(&category.name).is_empty());
        }
    }
});
