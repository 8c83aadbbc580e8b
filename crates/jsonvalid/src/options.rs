use std::{fmt, sync::Arc};

use ahash::AHashMap;
use referencing::Documents;
use serde_json::{Map, Value};

use crate::{
    compiler,
    formats::Format,
    keywords::custom::{Keyword, KeywordFactory},
    paths::Location,
    SchemaError, Validator,
};

/// Configuration options for building a [`Validator`].
///
/// ```rust
/// use serde_json::json;
///
/// let validator = jsonvalid::options()
///     .with_format_pattern("as", "a+")
///     .verbose(true)
///     .build(&json!({"type": "string", "format": "as"}))
///     .expect("Invalid schema");
///
/// assert!(validator.is_valid(&json!("aaa")));
/// assert!(!validator.is_valid(&json!("b")));
/// ```
#[derive(Clone, Default)]
pub struct ValidationOptions {
    pub(crate) formats: AHashMap<String, Format>,
    pub(crate) schemas: Documents,
    pub(crate) keywords: AHashMap<String, Arc<dyn KeywordFactory>>,
    pub(crate) filter: bool,
    pub(crate) use_defaults: bool,
    pub(crate) verbose: bool,
    pub(crate) greedy: bool,
}

impl ValidationOptions {
    /// Build a validator for `schema`.
    ///
    /// # Errors
    ///
    /// Returns an error if the schema uses unknown keywords, types or formats, or if a keyword
    /// holds a malformed value.
    pub fn build(&self, schema: &Value) -> Result<Validator, SchemaError> {
        compiler::build(self, schema)
    }

    /// Add a format checked by a predicate. Applies to strings only.
    ///
    /// ```rust
    /// # use serde_json::json;
    /// let validator = jsonvalid::options()
    ///     .with_format("even-length", |value: &str| value.len() % 2 == 0)
    ///     .build(&json!({"format": "even-length"}))
    ///     .expect("Invalid schema");
    ///
    /// assert!(validator.is_valid(&json!("ab")));
    /// assert!(!validator.is_valid(&json!("abc")));
    /// ```
    #[must_use]
    pub fn with_format<N, F>(mut self, name: N, format: F) -> Self
    where
        N: Into<String>,
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.formats
            .insert(name.into(), Format::Predicate(Arc::new(format)));
        self
    }

    /// Add a format checked by a regular expression that has to match the whole string.
    /// Applies to strings only.
    #[must_use]
    pub fn with_format_pattern(mut self, name: impl Into<String>, pattern: impl Into<String>) -> Self {
        self.formats
            .insert(name.into(), Format::Pattern(pattern.into()));
        self
    }

    /// Add a format that is itself a schema. Values using the format are validated against it.
    #[must_use]
    pub fn with_format_schema(mut self, name: impl Into<String>, schema: Value) -> Self {
        self.formats.insert(name.into(), Format::Schema(schema));
        self
    }

    /// Make `schema` available to `$ref` under `key`.
    ///
    /// A reference selects it by the exact key, e.g. `"definitions.json#/address"` uses the
    /// document registered as `"definitions.json"`.
    #[must_use]
    pub fn with_schema(mut self, key: impl Into<String>, schema: Value) -> Self {
        self.schemas.insert(key.into(), schema);
        self
    }

    /// Register a custom keyword.
    ///
    /// The factory is called once for every schema object that contains the keyword.
    ///
    /// ```rust
    /// # use serde_json::{json, Map, Value};
    /// use jsonvalid::{Keyword, Location, SchemaError};
    ///
    /// struct Even;
    ///
    /// impl Keyword for Even {
    ///     fn validate(&self, instance: &Value) -> Result<(), String> {
    ///         match instance.as_u64() {
    ///             Some(n) if n % 2 == 1 => Err("is odd".to_string()),
    ///             _ => Ok(()),
    ///         }
    ///     }
    /// }
    ///
    /// let validator = jsonvalid::options()
    ///     .with_keyword("even", |_: &Map<String, Value>, _: &Value, _: Location| {
    ///         Ok(Box::new(Even) as Box<dyn Keyword>)
    ///     })
    ///     .build(&json!({"even": true}))
    ///     .expect("Invalid schema");
    ///
    /// assert!(validator.is_valid(&json!(2)));
    /// assert!(!validator.is_valid(&json!(3)));
    /// ```
    #[must_use]
    pub fn with_keyword<N, F>(mut self, name: N, factory: F) -> Self
    where
        N: Into<String>,
        F: Fn(&Map<String, Value>, &Value, Location) -> Result<Box<dyn Keyword>, SchemaError>
            + Send
            + Sync
            + 'static,
    {
        self.keywords.insert(name.into(), Arc::new(factory));
        self
    }

    /// Strip properties rejected by `additionalProperties: false` in [`Validator::validate_mut`]
    /// instead of reporting them. Also enables default injection.
    #[must_use]
    pub fn should_filter(mut self, filter: bool) -> Self {
        self.filter = filter;
        self
    }

    /// Inject `default` values for absent fields in [`Validator::validate_mut`].
    #[must_use]
    pub fn should_use_defaults(mut self, use_defaults: bool) -> Self {
        self.use_defaults = use_defaults;
        self
    }

    /// Include the offending value, the declared type and the schema path in every violation.
    #[must_use]
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Keep checking an object's properties when some of its required properties are missing.
    #[must_use]
    pub fn greedy(mut self, greedy: bool) -> Self {
        self.greedy = greedy;
        self
    }
}

impl fmt::Debug for ValidationOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut formats = self.formats.keys().collect::<Vec<_>>();
        formats.sort();
        let mut keywords = self.keywords.keys().collect::<Vec<_>>();
        keywords.sort();
        let mut schemas = self.schemas.keys().collect::<Vec<_>>();
        schemas.sort();
        f.debug_struct("ValidationOptions")
            .field("formats", &formats)
            .field("schemas", &schemas)
            .field("keywords", &keywords)
            .field("filter", &self.filter)
            .field("use_defaults", &self.use_defaults)
            .field("verbose", &self.verbose)
            .field("greedy", &self.greedy)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    #[test]
    fn defaults() {
        let options = crate::options();
        assert!(!options.filter);
        assert!(!options.use_defaults);
        assert!(!options.verbose);
        assert!(!options.greedy);
        assert!(options.formats.is_empty());
        assert!(options.schemas.is_empty());
    }

    #[test]
    fn user_format_replaces_builtin() {
        let validator = crate::options()
            .with_format("email", |value: &str| value == "me")
            .build(&json!({"format": "email"}))
            .expect("Invalid schema");
        assert!(validator.is_valid(&json!("me")));
        assert!(!validator.is_valid(&json!("user@example.com")));
    }

    #[test]
    fn debug_lists_names() {
        let options = crate::options()
            .with_format_pattern("b", "b+")
            .with_format_pattern("a", "a+")
            .greedy(true);
        let rendered = format!("{options:?}");
        assert!(rendered.contains(r#"formats: ["a", "b"]"#));
        assert!(rendered.contains("greedy: true"));
    }
}
