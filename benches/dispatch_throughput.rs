//! Bind + build throughput benchmark.
//!
//! Measures the CPU-only part of a dispatch (argument binding and request
//! construction) for representative built-in tools using Criterion.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pm_tools_core::tools::{bind, build, builtin_tools, RawArguments, ToolSpec};
use serde_json::{json, Value};

fn tool(name: &str) -> ToolSpec {
    builtin_tools()
        .into_iter()
        .find(|t| t.name == name)
        .unwrap()
}

fn args(value: Value) -> RawArguments {
    value.as_object().cloned().unwrap_or_default()
}

fn bench_bind_and_build(c: &mut Criterion) {
    let cases = [
        ("delete_user", args(json!({"userID": 42.0}))),
        (
            "list_tasks",
            args(json!({"executionID": 7, "status": "doing", "recPerPage": 50, "pageID": 2})),
        ),
        (
            "create_task",
            args(json!({
                "executionID": 3,
                "name": "Write release notes & changelog",
                "type": "devel",
                "assignedTo": ["alice", "bob"],
                "estimate": 4.5,
                "desc": "Cover every user-visible change since the last build."
            })),
        ),
    ];

    let mut group = c.benchmark_group("bind_build");
    for (name, raw) in &cases {
        let spec = tool(name);
        group.bench_with_input(BenchmarkId::from_parameter(name), raw, |b, raw| {
            b.iter(|| {
                let bound = bind(&spec, black_box(raw)).unwrap();
                build(&spec, &bound).unwrap().target()
            });
        });
    }
    group.finish();
}

fn bench_bind_rejection(c: &mut Criterion) {
    let spec = tool("delete_user");
    let raw = args(json!({"userID": 3.5}));
    c.bench_function("bind_reject_fractional", |b| {
        b.iter(|| bind(&spec, black_box(&raw)).unwrap_err());
    });
}

criterion_group!(benches, bench_bind_and_build, bench_bind_rejection);
criterion_main!(benches);
