use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use serde_json::{json, Value};

fn schemas() -> [(&'static str, Value, Value); 3] {
    [
        (
            "object",
            json!({
                "type": "object",
                "properties": {
                    "name": {"type": "string", "required": true, "minLength": 1},
                    "age": {"type": "integer", "minimum": 0, "maximum": 150},
                    "email": {"type": "string", "format": "email"},
                    "tags": {"type": "array", "items": {"type": "string"}, "uniqueItems": true}
                },
                "additionalProperties": false
            }),
            json!({"name": "alice", "age": 30, "email": "alice@example.com", "tags": ["a", "b"]}),
        ),
        (
            "recursive",
            json!({
                "type": "object",
                "properties": {
                    "value": {"type": "number"},
                    "children": {"type": "array", "items": {"$ref": "#"}}
                }
            }),
            json!({"value": 1, "children": [
                {"value": 2, "children": [{"value": 3}, {"value": 4}]},
                {"value": 5, "children": []}
            ]}),
        ),
        (
            "combinators",
            json!({
                "anyOf": [{"type": "string"}, {"type": "number", "multipleOf": 0.01}],
                "not": {"enum": [0]}
            }),
            json!(12.34),
        ),
    ]
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");
    for (name, schema, _) in &schemas() {
        group.bench_with_input(BenchmarkId::from_parameter(name), schema, |b, schema| {
            b.iter(|| jsonvalid::validator_for(schema).expect("Invalid schema"));
        });
    }
    group.finish();
}

fn bench_validation(c: &mut Criterion) {
    let mut group = c.benchmark_group("validation");
    for (name, schema, instance) in &schemas() {
        let validator = jsonvalid::validator_for(schema).expect("Invalid schema");
        group.bench_with_input(BenchmarkId::new("is_valid", name), instance, |b, instance| {
            b.iter(|| validator.is_valid(instance));
        });
        group.bench_with_input(BenchmarkId::new("validate", name), instance, |b, instance| {
            b.iter(|| validator.validate(instance));
        });
    }
    group.finish();
}

fn bench_filter(c: &mut Criterion) {
    let (_, schema, _) = &schemas()[0];
    let validator = jsonvalid::options()
        .should_filter(true)
        .build(schema)
        .expect("Invalid schema");
    let instance = json!({"name": "alice", "age": 30, "token": "secret", "extra": [1, 2, 3]});
    c.bench_function("filter", |b| {
        b.iter_batched(
            || instance.clone(),
            |mut instance| {
                let _ = validator.validate_mut(&mut instance);
                instance
            },
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(benches, bench_build, bench_validation, bench_filter);
criterion_main!(benches);
