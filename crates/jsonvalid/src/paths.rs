//! Facilities for working with paths within schemas or validated instances.
use std::{fmt, sync::Arc};

/// A key within a JSON object or an index within a JSON array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LocationSegment<'a> {
    Property(&'a str),
    Index(usize),
}

impl<'a> From<&'a str> for LocationSegment<'a> {
    #[inline]
    fn from(value: &'a str) -> Self {
        LocationSegment::Property(value)
    }
}

impl<'a> From<&'a String> for LocationSegment<'a> {
    #[inline]
    fn from(value: &'a String) -> Self {
        LocationSegment::Property(value)
    }
}

impl From<usize> for LocationSegment<'_> {
    #[inline]
    fn from(value: usize) -> Self {
        LocationSegment::Index(value)
    }
}

/// A lazily constructed location within a JSON instance.
///
/// Segments are only linked together while validation descends, the rendered field path is
/// built when a violation is actually recorded.
#[derive(Debug)]
pub(crate) struct LazyLocation<'a> {
    segment: LocationSegment<'a>,
    parent: Option<&'a LazyLocation<'a>>,
}

impl Default for LazyLocation<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> LazyLocation<'a> {
    /// Create a root location of a JSON instance.
    pub(crate) const fn new() -> Self {
        LazyLocation {
            // The value does not matter, it will never be used
            segment: LocationSegment::Index(0),
            parent: None,
        }
    }

    /// Push a new segment to the location.
    #[inline]
    pub(crate) fn push(&'a self, segment: impl Into<LocationSegment<'a>>) -> LazyLocation<'a> {
        LazyLocation {
            segment: segment.into(),
            parent: Some(self),
        }
    }

    /// Render the location as a field path, e.g. `data.items[0]["hello world"]`.
    pub(crate) fn render(&self) -> String {
        let mut segments = Vec::new();
        let mut head = self;
        while let Some(parent) = head.parent {
            segments.push(head.segment);
            head = parent;
        }
        let mut buffer = String::from("data");
        for segment in segments.iter().rev() {
            match segment {
                LocationSegment::Property(name) => write_property(&mut buffer, name),
                LocationSegment::Index(idx) => {
                    let mut itoa = itoa::Buffer::new();
                    buffer.push('[');
                    buffer.push_str(itoa.format(*idx));
                    buffer.push(']');
                }
            }
        }
        buffer
    }
}

fn write_property(buffer: &mut String, name: &str) {
    if is_identifier(name) {
        buffer.push('.');
        buffer.push_str(name);
    } else {
        buffer.push('[');
        // Serializing a `str` never fails
        buffer.push_str(&serde_json::to_string(name).unwrap_or_default());
        buffer.push(']');
    }
}

/// Whether `name` can be rendered after a dot.
fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_alphabetic() || first == '_' || first == '$')
        && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

/// A cheap to clone JSON Pointer into a schema.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Location(Arc<String>);

impl Default for Location {
    fn default() -> Self {
        Self::new()
    }
}

impl Location {
    /// Create a new, empty `Location`.
    #[must_use]
    pub fn new() -> Self {
        Self(Arc::new(String::new()))
    }

    /// Append a segment, escaping `~` and `/` as JSON Pointer requires.
    #[must_use]
    pub(crate) fn join<'a>(&self, segment: impl Into<LocationSegment<'a>>) -> Self {
        let parent = &self.0;
        match segment.into() {
            LocationSegment::Property(property) => {
                let mut buffer = String::with_capacity(parent.len() + property.len() + 1);
                buffer.push_str(parent);
                buffer.push('/');
                for ch in property.chars() {
                    match ch {
                        '~' => buffer.push_str("~0"),
                        '/' => buffer.push_str("~1"),
                        _ => buffer.push(ch),
                    }
                }
                Self(Arc::new(buffer))
            }
            LocationSegment::Index(idx) => {
                let mut itoa = itoa::Buffer::new();
                let segment = itoa.format(idx);
                let mut buffer = String::with_capacity(parent.len() + segment.len() + 1);
                buffer.push_str(parent);
                buffer.push('/');
                buffer.push_str(segment);
                Self(Arc::new(buffer))
            }
        }
    }

    /// Get a string slice representing the JSON Pointer.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Location {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::{LazyLocation, Location};
    use test_case::test_case;

    #[test]
    fn root_is_data() {
        assert_eq!(LazyLocation::new().render(), "data");
    }

    #[test]
    fn nested_render() {
        let root = LazyLocation::new();
        let list = root.push("list");
        let first = list.push(0_usize);
        let spaced = first.push("hello world");
        assert_eq!(spaced.render(), r#"data.list[0]["hello world"]"#);
    }

    #[test_case("foo", "data.foo")]
    #[test_case("_private", "data._private")]
    #[test_case("$ref", "data.$ref")]
    #[test_case("0", r#"data["0"]"#)]
    #[test_case("a-b", r#"data["a-b"]"#)]
    #[test_case("", r#"data[""]"#)]
    #[test_case("say \"hi\"", r#"data["say \"hi\""]"#)]
    fn property_rendering(name: &str, expected: &str) {
        let root = LazyLocation::new();
        assert_eq!(root.push(name).render(), expected);
    }

    #[test]
    fn join_escapes() {
        let location = Location::new().join("properties").join("a/b~c").join(3_usize);
        assert_eq!(location.as_str(), "/properties/a~1b~0c/3");
    }
}
