use std::{
    cell::RefCell,
    sync::{Arc, OnceLock},
};

use ahash::AHashMap;
use fancy_regex::Regex;
use serde_json::{Map, Value};

use crate::{
    keywords::{self, required::RequiredValidator},
    node::SchemaNode,
    options::ValidationOptions,
    paths::{Location, LocationSegment},
    regex,
    types::{JsonType, JsonTypeSet},
    validator::Validator,
    SchemaError,
};

pub(crate) type SubroutineId = usize;

/// Targets that are compiled once and shared by every place that uses them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) enum SubroutineKey {
    /// A `$ref` value, verbatim.
    Reference(String),
    /// A format whose definition is a schema.
    Format(String),
}

/// Compiled targets of references and schema formats.
///
/// An id is handed out before its target is compiled, so a target that reaches itself again
/// gets the same id instead of being compiled recursively. The cell is filled once the target
/// is done.
#[derive(Default)]
pub(crate) struct Subroutines {
    map: AHashMap<SubroutineKey, SubroutineId>,
    nodes: Vec<OnceLock<SchemaNode>>,
}

impl Subroutines {
    pub(crate) fn get(&self, key: &SubroutineKey) -> Option<SubroutineId> {
        self.map.get(key).copied()
    }

    pub(crate) fn reserve(&mut self, key: SubroutineKey) -> SubroutineId {
        let id = self.nodes.len();
        self.nodes.push(OnceLock::new());
        self.map.insert(key, id);
        id
    }

    /// Store the compiled target of a reserved id.
    pub(crate) fn fill(&mut self, id: SubroutineId, node: SchemaNode) {
        let filled = self.nodes.get(id).is_some_and(|cell| cell.set(node).is_ok());
        debug_assert!(filled, "subroutine {id} must be reserved and filled once");
    }

    pub(crate) fn into_nodes(self) -> Box<[OnceLock<SchemaNode>]> {
        self.nodes.into_boxed_slice()
    }
}

/// State shared by every context of a single compilation.
#[derive(Default)]
struct Shared {
    subroutines: Subroutines,
    patterns: AHashMap<String, Arc<Regex>>,
}

/// Context holds information about the part of the schema being compiled.
#[derive(Clone)]
pub(crate) struct Context<'a> {
    config: &'a ValidationOptions,
    root: &'a Value,
    location: Location,
    shared: &'a RefCell<Shared>,
}

impl<'a> Context<'a> {
    pub(crate) fn config(&self) -> &'a ValidationOptions {
        self.config
    }

    pub(crate) fn location(&self) -> &Location {
        &self.location
    }

    #[inline]
    pub(crate) fn new_at_location<'s>(&self, segment: impl Into<LocationSegment<'s>>) -> Self {
        Context {
            location: self.location.join(segment),
            ..self.clone()
        }
    }

    /// Compile `pattern`, reusing an earlier compilation of the same text.
    pub(crate) fn get_or_compile_regex(
        &self,
        pattern: &str,
        location: &Location,
    ) -> Result<Arc<Regex>, SchemaError> {
        if let Some(regex) = self.shared.borrow().patterns.get(pattern) {
            return Ok(Arc::clone(regex));
        }
        let regex = Arc::new(
            regex::build(pattern)
                .map_err(|error| SchemaError::invalid_regex(location.clone(), pattern, &error))?,
        );
        self.shared
            .borrow_mut()
            .patterns
            .insert(pattern.to_string(), Arc::clone(&regex));
        Ok(regex)
    }

    /// Compile the target of `reference`.
    ///
    /// Returns `None` if the reference cannot be resolved.
    pub(crate) fn compile_reference(
        &self,
        reference: &str,
    ) -> Result<Option<SubroutineId>, SchemaError> {
        let key = SubroutineKey::Reference(reference.to_string());
        if let Some(id) = self.shared.borrow().subroutines.get(&key) {
            tracing::trace!(reference, id, "Reusing compiled reference");
            return Ok(Some(id));
        }
        let Some(target) = referencing::resolve(self.root, &self.config.schemas, reference) else {
            tracing::debug!(
                reference,
                location = %self.location,
                "Unresolvable reference, ignoring it"
            );
            return Ok(None);
        };
        if !matches!(target, Value::Object(_) | Value::Bool(_)) {
            tracing::debug!(
                reference,
                location = %self.location,
                "Reference target is not a schema, ignoring it"
            );
            return Ok(None);
        }
        self.compile_subroutine(key, target, self.location.join("$ref"))
            .map(Some)
    }

    /// Compile a format defined as a schema.
    pub(crate) fn compile_format_schema(
        &self,
        name: &str,
        schema: &'a Value,
    ) -> Result<SubroutineId, SchemaError> {
        let key = SubroutineKey::Format(name.to_string());
        if let Some(id) = self.shared.borrow().subroutines.get(&key) {
            tracing::trace!(format = name, id, "Reusing compiled format");
            return Ok(id);
        }
        self.compile_subroutine(key, schema, self.location.join("format"))
    }

    fn compile_subroutine(
        &self,
        key: SubroutineKey,
        target: &'a Value,
        location: Location,
    ) -> Result<SubroutineId, SchemaError> {
        let id = self.shared.borrow_mut().subroutines.reserve(key);
        tracing::trace!(id, location = %location, "Compiling subroutine");
        let ctx = Context {
            location,
            ..self.clone()
        };
        let node = compile(&ctx, target)?;
        self.shared.borrow_mut().subroutines.fill(id, node);
        Ok(id)
    }
}

/// Compile `schema` into a [`Validator`].
pub(crate) fn build(config: &ValidationOptions, schema: &Value) -> Result<Validator, SchemaError> {
    let shared = RefCell::new(Shared::default());
    let root = {
        let ctx = Context {
            config,
            root: schema,
            location: Location::new(),
            shared: &shared,
        };
        compile(&ctx, schema)?
    };
    let subroutines = shared.into_inner().subroutines.into_nodes();
    Ok(Validator::new(root, subroutines, schema.clone(), config))
}

/// Compile a single schema node and everything below it.
pub(crate) fn compile<'a>(ctx: &Context<'a>, schema: &'a Value) -> Result<SchemaNode, SchemaError> {
    match schema {
        Value::Object(map) => compile_object(ctx, map),
        Value::Bool(_) => Ok(SchemaNode::empty(ctx.location())),
        _ => Err(SchemaError::invalid_schema(ctx.location().clone())),
    }
}

fn compile_object<'a>(
    ctx: &Context<'a>,
    schema: &'a Map<String, Value>,
) -> Result<SchemaNode, SchemaError> {
    check_keywords(ctx, schema)?;
    let config = ctx.config();

    let tuple = match schema.get("items") {
        Some(Value::Array(items)) => Some(items),
        _ => None,
    };
    let (types, declared_type) = if tuple.is_some() {
        (
            Some(JsonTypeSet::from(JsonType::Array)),
            Some(Value::from(JsonType::Array.as_str())),
        )
    } else {
        match schema.get("type") {
            Some(value) => (compile_type(ctx, value)?, Some(value.clone())),
            None => (None, None),
        }
    };

    let mut required = false;
    let mut required_properties = None;
    match schema.get("required") {
        None => {}
        Some(Value::Bool(value)) => required = *value,
        Some(value @ Value::Array(_)) => {
            required_properties = Some(RequiredValidator::compile(ctx, value)?);
        }
        Some(_) => {
            return Err(SchemaError::invalid_keyword_value(
                ctx.location().join("required"),
                "required",
                "a boolean or an array of strings",
            ))
        }
    }

    let mut head = Vec::new();
    if let Some(items) = tuple {
        if let Some(validator) = keywords::items::compile_additional_items(ctx, schema, items.len())
        {
            head.push(validator?);
        }
    }
    if let Some(value) = schema.get("format") {
        head.push(keywords::format::compile(ctx, value)?);
    }

    let mut tail = Vec::new();
    for (keyword, compile_keyword) in keywords::TRAILING {
        if config.keywords.contains_key(*keyword) {
            continue;
        }
        if let Some(value) = schema.get(*keyword) {
            if let Some(validator) = compile_keyword(ctx, schema, value) {
                tail.push(validator?);
            }
        }
    }
    if let Some(items) = tuple {
        tail.push(keywords::items::compile_tuple(ctx, items)?);
    } else if let Some(value) = schema.get("properties") {
        if let Some(validator) = keywords::properties::compile(ctx, schema, value) {
            tail.push(validator?);
        }
    }
    for (keyword, value) in schema {
        if let Some(factory) = config.keywords.get(keyword) {
            tail.push(keywords::custom::compile(ctx, factory.as_ref(), schema, keyword, value)?);
        }
    }

    Ok(SchemaNode {
        type_location: ctx.location().join("type"),
        required_location: ctx.location().join("required"),
        default: schema.get("default").cloned(),
        required,
        types,
        declared_type,
        head,
        required_properties,
        greedy: config.greedy,
        tail,
    })
}

/// Reject keywords that would otherwise be silently ignored.
fn check_keywords(ctx: &Context<'_>, schema: &Map<String, Value>) -> Result<(), SchemaError> {
    for keyword in schema.keys() {
        if !keywords::is_known(keyword) && !ctx.config().keywords.contains_key(keyword) {
            return Err(SchemaError::unknown_keyword(
                ctx.location().join(keyword),
                keyword,
            ));
        }
    }
    Ok(())
}

/// `None` means any value is accepted.
fn compile_type(ctx: &Context<'_>, value: &Value) -> Result<Option<JsonTypeSet>, SchemaError> {
    let location = ctx.location().join("type");
    let parse = |name: &Value| -> Result<Option<JsonType>, SchemaError> {
        match name {
            Value::String(name) if name == "any" => Ok(None),
            Value::String(name) => name
                .parse()
                .map(Some)
                .map_err(|()| SchemaError::unknown_type(location.clone(), name)),
            _ => Err(SchemaError::invalid_keyword_value(
                location.clone(),
                "type",
                "a string or an array of strings",
            )),
        }
    };
    match value {
        Value::Array(names) => {
            let mut types = JsonTypeSet::empty();
            let mut any = names.is_empty();
            for name in names {
                match parse(name)? {
                    Some(ty) => types = types.insert(ty),
                    None => any = true,
                }
            }
            Ok((!any).then_some(types))
        }
        _ => Ok(parse(value)?.map(JsonTypeSet::from)),
    }
}

#[cfg(test)]
mod tests {
    use crate::{error::SchemaErrorKind, tests_util};
    use serde_json::{json, Value};
    use test_case::test_case;

    #[test_case(&json!({"foo": 1}), "/foo"; "top level")]
    #[test_case(&json!({"properties": {"a": {"typo": 1}}}), "/properties/a/typo"; "nested")]
    fn unknown_keyword(schema: &Value, location: &str) {
        let error = crate::validator_for(schema).expect_err("Should fail");
        assert!(matches!(error.kind(), SchemaErrorKind::UnknownKeyword(_)));
        assert_eq!(error.location().as_str(), location);
    }

    #[test]
    fn unknown_type() {
        let error = crate::validator_for(&json!({"type": "text"})).expect_err("Should fail");
        assert_eq!(error.kind(), &SchemaErrorKind::UnknownType("text".into()));
        assert_eq!(error.to_string(), "Unknown type: text (at /type)");
    }

    #[test_case(&json!({"type": 1}))]
    #[test_case(&json!({"required": "x"}))]
    #[test_case(&json!({"properties": {"a": 1}}))]
    fn malformed(schema: &Value) {
        assert!(crate::validator_for(schema).is_err());
    }

    #[test_case(&json!({"title": "t", "description": "d", "$schema": "x", "definitions": {}}))]
    #[test_case(&json!({"$id": "x", "id": "y", "$comment": "c", "examples": []}))]
    #[test_case(&json!({"const": 1, "contains": {}, "propertyNames": {}}))]
    #[test_case(&json!({"if": {}, "then": {}, "else": {}, "readOnly": true, "writeOnly": false}))]
    fn tolerated(schema: &Value) {
        tests_util::is_valid(schema, &json!(42));
    }

    #[test_case(&json!({"type": "any"}), &json!(null))]
    #[test_case(&json!({"type": ["any", "string"]}), &json!(1))]
    #[test_case(&json!({"type": []}), &json!(1))]
    fn any_type(schema: &Value, instance: &Value) {
        tests_util::is_valid(schema, instance);
    }

    #[test]
    fn boolean_subschema() {
        tests_util::is_valid(&json!({"properties": {"a": true, "b": false}}), &json!({"a": 1, "b": 2}));
    }

    #[test]
    fn self_reference_compiles_once() {
        let schema = json!({
            "definitions": {"list": {"type": "array", "items": {"$ref": "#/definitions/list"}}},
            "properties": {
                "a": {"$ref": "#/definitions/list"},
                "b": {"$ref": "#/definitions/list"}
            }
        });
        let validator = crate::validator_for(&schema).expect("Invalid schema");
        assert_eq!(validator.subroutine_count(), 1);
    }
}
