// Copyright 2025 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Path templates with [RFC 6570] simple and reserved expansion.
//!
//! Google discovery documents use `{name}` for single path segments and
//! `{+name}` for values that span segments, such as
//! `projects/p/locations/l`. Simple expansion percent-encodes everything
//! except the unreserved characters. Reserved expansion keeps the reserved
//! characters that are valid in a path, so `/` and `:` pass through, and
//! keeps existing `%XX` triplets so already encoded values are not encoded
//! twice.
//!
//! Values that would expand to a `.` or `..` segment are rejected. URL
//! parsing removes dot segments, so such a value would send the request to a
//! different resource.
//!
//! [RFC 6570]: https://datatracker.ietf.org/doc/html/rfc6570

use crate::error::ValidationError;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};

type Result<T> = std::result::Result<T, ValidationError>;

/// Everything except the RFC 3986 unreserved characters.
const SIMPLE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// [SIMPLE] minus the reserved characters allowed in a path. `?` and `#`
/// would end the path, they are always encoded.
const RESERVED: &AsciiSet = &SIMPLE
    .remove(b':')
    .remove(b'/')
    .remove(b'@')
    .remove(b'!')
    .remove(b'$')
    .remove(b'&')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')')
    .remove(b'*')
    .remove(b'+')
    .remove(b',')
    .remove(b';')
    .remove(b'=');

#[derive(Clone, Debug, PartialEq)]
enum Segment<'a> {
    Literal(&'a str),
    Variable { name: &'a str, reserved: bool },
}

/// A parsed path template.
#[derive(Clone, Debug)]
pub struct PathTemplate<'a> {
    segments: Vec<Segment<'a>>,
}

impl<'a> PathTemplate<'a> {
    /// Parses `template`, failing on unbalanced or empty braces.
    pub fn parse(template: &'a str) -> Result<Self> {
        let malformed = || ValidationError::MalformedTemplate(template.to_string());
        let mut segments = Vec::new();
        let mut rest = template;
        while let Some(open) = rest.find(['{', '}']) {
            if rest[open..].starts_with('}') {
                return Err(malformed());
            }
            if open > 0 {
                segments.push(Segment::Literal(&rest[..open]));
            }
            let tail = &rest[open + 1..];
            let close = tail.find(['{', '}']).ok_or_else(malformed)?;
            if !tail[close..].starts_with('}') {
                return Err(malformed());
            }
            let expression = &tail[..close];
            let (name, reserved) = match expression.strip_prefix('+') {
                Some(name) => (name, true),
                None => (expression, false),
            };
            if name.is_empty() {
                return Err(malformed());
            }
            segments.push(Segment::Variable { name, reserved });
            rest = &tail[close + 1..];
        }
        if !rest.is_empty() {
            segments.push(Segment::Literal(rest));
        }
        Ok(Self { segments })
    }

    /// The names of all the variables, in order.
    pub fn variables(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.segments.iter().filter_map(|s| match s {
            Segment::Variable { name, .. } => Some(*name),
            Segment::Literal(_) => None,
        })
    }

    /// Expands the template, calling `value` once per variable.
    pub fn expand<F>(&self, mut value: F) -> Result<String>
    where
        F: FnMut(&str) -> Result<String>,
    {
        let mut path = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(s) => path.push_str(s),
                Segment::Variable { name, reserved: false } => {
                    let v = value(name)?;
                    if v == "." || v == ".." {
                        return Err(ValidationError::InvalidPathValue(name.to_string()));
                    }
                    path.extend(utf8_percent_encode(&v, SIMPLE));
                }
                Segment::Variable { name, reserved: true } => {
                    let v = value(name)?;
                    if v.split('/').any(is_dot_segment) {
                        return Err(ValidationError::InvalidPathValue(name.to_string()));
                    }
                    path.push_str(&encode_reserved(&v));
                }
            }
        }
        Ok(path)
    }
}

/// `.` and `..`, including their percent-encoded forms, which reserved
/// expansion keeps as they are.
fn is_dot_segment(segment: &str) -> bool {
    let decoded = percent_decode_str(segment).decode_utf8_lossy();
    decoded == "." || decoded == ".."
}

fn encode_reserved(value: &str) -> String {
    let mut encoded = String::with_capacity(value.len());
    let mut rest = value;
    while let Some(pos) = rest.find('%') {
        encoded.extend(utf8_percent_encode(&rest[..pos], RESERVED));
        let tail = &rest[pos..];
        if is_pct_triplet(tail) {
            encoded.push_str(&tail[..3]);
            rest = &tail[3..];
        } else {
            encoded.push_str("%25");
            rest = &tail[1..];
        }
    }
    encoded.extend(utf8_percent_encode(rest, RESERVED));
    encoded
}

fn is_pct_triplet(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() >= 3 && bytes[1].is_ascii_hexdigit() && bytes[2].is_ascii_hexdigit()
}
