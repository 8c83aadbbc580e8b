pub(crate) mod additional_properties;
pub(crate) mod all_of;
pub(crate) mod any_of;
pub(crate) mod custom;
pub(crate) mod dependencies;
pub(crate) mod enum_;
pub(crate) mod format;
pub(crate) mod helpers;
pub(crate) mod items;
pub(crate) mod max_items;
pub(crate) mod max_length;
pub(crate) mod max_properties;
pub(crate) mod maximum;
pub(crate) mod min_items;
pub(crate) mod min_length;
pub(crate) mod min_properties;
pub(crate) mod minimum;
pub(crate) mod multiple_of;
pub(crate) mod not;
pub(crate) mod one_of;
pub(crate) mod pattern;
pub(crate) mod pattern_properties;
pub(crate) mod properties;
pub(crate) mod ref_;
pub(crate) mod required;
pub(crate) mod unique_items;

use serde_json::{Map, Value};

use crate::{compiler, validator::Validate, SchemaError};

pub(crate) type CompilationResult = Result<BoxedValidator, SchemaError>;
pub(crate) type BoxedValidator = Box<dyn Validate>;
pub(crate) type CompileFunc =
    for<'a> fn(&compiler::Context<'a>, &'a Map<String, Value>, &'a Value) -> Option<CompilationResult>;

/// Keywords checked after the object-level `required` list, in evaluation order.
///
/// `type`, `required`, `default`, `format`, `properties` and tuple `items` are handled by the
/// compiler itself as they shape the node rather than add a single check.
pub(crate) const TRAILING: &[(&str, CompileFunc)] = &[
    ("uniqueItems", unique_items::compile),
    ("enum", enum_::compile),
    ("dependencies", dependencies::compile),
    ("additionalProperties", additional_properties::compile),
    ("$ref", ref_::compile),
    ("not", not::compile),
    ("items", items::compile),
    ("patternProperties", pattern_properties::compile),
    ("pattern", pattern::compile),
    ("allOf", all_of::compile),
    ("anyOf", any_of::compile),
    ("oneOf", one_of::compile),
    ("multipleOf", multiple_of::compile),
    ("maxProperties", max_properties::compile),
    ("minProperties", min_properties::compile),
    ("maxItems", max_items::compile),
    ("minItems", min_items::compile),
    ("maxLength", max_length::compile),
    ("minLength", min_length::compile),
    ("minimum", minimum::compile),
    ("maximum", maximum::compile),
];

/// Whether `keyword` may appear in a schema object.
pub(crate) fn is_known(keyword: &str) -> bool {
    matches!(
        keyword,
        "type"
            | "required"
            | "default"
            | "format"
            | "properties"
            | "additionalItems"
            | "exclusiveMinimum"
            | "exclusiveMaximum"
            // Annotations
            | "$schema"
            | "id"
            | "$id"
            | "title"
            | "description"
            | "definitions"
            | "$comment"
            | "examples"
            | "readOnly"
            | "writeOnly"
            // Accepted but not enforced
            | "const"
            | "contains"
            | "propertyNames"
            | "if"
            | "then"
            | "else"
            | "contentEncoding"
            | "contentMediaType"
    ) || TRAILING.iter().any(|(name, _)| *name == keyword)
}
