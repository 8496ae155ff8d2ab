use log::debug;
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

use super::RawPayload;

static INGREDIENTS_START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""ingredients"\s*:\s*\["#).expect("valid ingredients pattern"));

static RECIPES_START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""recipes"\s*:\s*\["#).expect("valid recipes pattern"));

/// Recover the `ingredients` and `recipes` arrays from text that is not a
/// valid JSON document.
///
/// Each array is located and parsed on its own, so a broken `recipes` array
/// does not prevent `ingredients` from being recovered. Returns `None` when
/// neither array yields anything.
pub(crate) fn salvage_fragments(text: &str) -> Option<RawPayload> {
    let ingredients = array_fragment(text, &INGREDIENTS_START);
    let recipes = array_fragment(text, &RECIPES_START);

    if ingredients.is_none() && recipes.is_none() {
        return None;
    }

    Some(RawPayload {
        ingredients: ingredients.unwrap_or_default(),
        recipes: recipes.unwrap_or_default(),
    })
}

fn array_fragment(text: &str, start: &Regex) -> Option<Vec<Value>> {
    let open = start.find(text)?;
    let body = &text[open.end()..];

    match closing_index(body) {
        Some(end) => parse_fragment(&body[..end]),
        None => {
            debug!("Array fragment is unterminated, keeping complete elements only");
            non_empty(complete_objects(body))
        }
    }
}

/// Parse the contents of an array; when the array as a whole is invalid, keep
/// whichever top-level objects parse on their own.
fn parse_fragment(inner: &str) -> Option<Vec<Value>> {
    match serde_json::from_str::<Vec<Value>>(&format!("[{}]", inner)) {
        Ok(items) => Some(items),
        Err(e) => {
            debug!("Array fragment did not parse ({}), salvaging elements", e);
            non_empty(complete_objects(inner))
        }
    }
}

fn non_empty(items: Vec<Value>) -> Option<Vec<Value>> {
    if items.is_empty() {
        None
    } else {
        Some(items)
    }
}

/// Byte offset of the bracket closing an array whose opening `[` precedes `body`
fn closing_index(body: &str) -> Option<usize> {
    let mut scanner = Scanner::default();
    let mut depth = 1usize;

    for (i, byte) in body.bytes().enumerate() {
        match scanner.structural(byte) {
            Some(b'[' | b'{') => depth += 1,
            Some(b']' | b'}') => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }

    None
}

/// Every balanced top-level `{...}` in `inner` that parses as JSON
fn complete_objects(inner: &str) -> Vec<Value> {
    let mut scanner = Scanner::default();
    let mut depth = 0usize;
    let mut object_start = None;
    let mut items = Vec::new();

    for (i, byte) in inner.bytes().enumerate() {
        match scanner.structural(byte) {
            Some(open @ (b'[' | b'{')) => {
                if depth == 0 && open == b'{' {
                    object_start = Some(i);
                }
                depth += 1;
            }
            Some(b']' | b'}') if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    if let Some(start) = object_start.take() {
                        if let Ok(value) = serde_json::from_str::<Value>(&inner[start..=i]) {
                            items.push(value);
                        }
                    }
                }
            }
            _ => {}
        }
    }

    items
}

/// Tracks whether the scan is inside a JSON string literal.
///
/// Works on bytes: the structural characters are ASCII and never occur inside
/// a multi-byte UTF-8 sequence.
#[derive(Default)]
struct Scanner {
    in_string: bool,
    escaped: bool,
}

impl Scanner {
    /// Returns the byte when it is a bracket outside of a string literal
    fn structural(&mut self, byte: u8) -> Option<u8> {
        if self.in_string {
            if self.escaped {
                self.escaped = false;
            } else if byte == b'\\' {
                self.escaped = true;
            } else if byte == b'"' {
                self.in_string = false;
            }
            return None;
        }

        match byte {
            b'"' => {
                self.in_string = true;
                None
            }
            b'[' | b']' | b'{' | b'}' => Some(byte),
            _ => None,
        }
    }
}
