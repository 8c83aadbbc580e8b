use std::borrow::Cow;

use serde_json::Value;

/// Look up a value by a JSON pointer, optionally written as a fragment (`#/a/b`).
///
/// A trailing `/` is dropped, so `#/` addresses the whole document.
#[must_use]
pub fn pointer<'a>(document: &'a Value, pointer: &str) -> Option<&'a Value> {
    let pointer = pointer.strip_prefix('#').unwrap_or(pointer);
    let pointer = pointer.strip_suffix('/').unwrap_or(pointer);
    let Some(tokens) = pointer.strip_prefix('/') else {
        return pointer.is_empty().then_some(document);
    };
    let mut target = document;
    for token in tokens.split('/') {
        let token = unescape_segment(token);
        target = match target {
            Value::Object(map) => map.get(token.as_ref())?,
            Value::Array(items) => items.get(parse_index(&token)?)?,
            _ => return None,
        };
    }
    Some(target)
}

/// Whether `candidate` is a JSON pointer once a leading `#` is dropped.
#[inline]
pub(crate) fn is_pointer(candidate: &str) -> bool {
    let candidate = candidate.strip_prefix('#').unwrap_or(candidate);
    candidate.is_empty() || candidate.starts_with('/')
}

/// Parse an array index token. Signs and leading zeros are rejected.
#[must_use]
pub fn parse_index(token: &str) -> Option<usize> {
    match token.as_bytes() {
        [b'0'] => Some(0),
        [b'1'..=b'9', rest @ ..] if rest.iter().all(u8::is_ascii_digit) => token.parse().ok(),
        _ => None,
    }
}

/// Unescape a single JSON Pointer reference token (`~1` -> `/`, `~0` -> `~`).
#[must_use]
pub fn unescape_segment(mut segment: &str) -> Cow<'_, str> {
    // Naive implementation would be:
    //   segment.replace("~1", "/").replace("~0", "~")
    // but it allocates twice even if there is nothing to replace.
    let Some(mut tilde) = segment.find('~') else {
        return Cow::Borrowed(segment);
    };
    let mut buffer = String::with_capacity(segment.len());
    loop {
        buffer.push_str(&segment[..tilde]);
        segment = &segment[tilde..];
        match segment.as_bytes().get(1) {
            Some(b'1') => {
                buffer.push('/');
                segment = &segment[2..];
            }
            Some(b'0') => {
                buffer.push('~');
                segment = &segment[2..];
            }
            _ => {
                buffer.push('~');
                segment = &segment[1..];
            }
        }
        if let Some(next) = segment.find('~') {
            tilde = next;
        } else {
            buffer.push_str(segment);
            return Cow::Owned(buffer);
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use test_case::test_case;

    use super::{parse_index, pointer, unescape_segment};

    #[test]
    fn test_empty_pointer() {
        let document = json!({});
        assert_eq!(pointer(&document, ""), Some(&document));
    }

    #[test_case("#")]
    #[test_case("#/")]
    fn test_whole_document(fragment: &str) {
        let document = json!({"a": 1});
        assert_eq!(pointer(&document, fragment), Some(&document));
    }

    #[test]
    fn test_not_a_pointer() {
        let document = json!({"a": 1});
        assert_eq!(pointer(&document, "a"), None);
    }

    #[test_case("/a/b", Some(&json!(1)); "nested object")]
    #[test_case("/list/1", Some(&json!("y")); "array index")]
    #[test_case("/list/01", None; "leading zero index")]
    #[test_case("/a~1b", Some(&json!(2)); "escaped slash")]
    #[test_case("/m~0n", Some(&json!(3)); "escaped tilde")]
    #[test_case("/missing", None; "missing key")]
    #[test_case("#/a/b", Some(&json!(1)); "fragment")]
    #[test_case("/a/", Some(&json!({"b": 1})); "trailing slash")]
    #[test_case("/a/b/c", None; "through a scalar")]
    fn test_pointer(path: &str, expected: Option<&serde_json::Value>) {
        let document = json!({"a": {"b": 1}, "list": ["x", "y"], "a/b": 2, "m~n": 3});
        assert_eq!(pointer(&document, path), expected);
    }

    #[test_case("plain", "plain")]
    #[test_case("a~1b", "a/b")]
    #[test_case("a~0b", "a~b")]
    #[test_case("~01", "~1")]
    #[test_case("~", "~")]
    #[test_case("a~2", "a~2")]
    fn test_unescape_segment(input: &str, expected: &str) {
        assert_eq!(unescape_segment(input), expected);
    }

    #[test_case("0", Some(0))]
    #[test_case("12", Some(12))]
    #[test_case("+1", None)]
    #[test_case("007", None)]
    #[test_case("x", None)]
    fn test_parse_index(input: &str, expected: Option<usize>) {
        assert_eq!(parse_index(input), expected);
    }
}
