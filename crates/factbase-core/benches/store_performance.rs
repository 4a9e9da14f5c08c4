use criterion::{Criterion, black_box, criterion_group, criterion_main};
use factbase_core::{Fact, FactBase, FactValue, Retrieval, boolean_predicate};

fn create_sample_fact(id: i64) -> Fact {
    vec![
        FactValue::String(format!("employee-{id}")),
        FactValue::Integer(id % 8),
        FactValue::String(if id % 3 == 0 { "active" } else { "inactive" }.to_string()),
    ]
}

fn populated_store(fact_count: i64) -> FactBase {
    let mut store = FactBase::new(&["name", "department", "status"]);
    for i in 0..fact_count {
        store.assert_fact(&create_sample_fact(i)).unwrap();
    }
    store
}

fn bench_assert(c: &mut Criterion) {
    c.bench_function("assert_1000_facts", |b| {
        b.iter(|| {
            let mut store = FactBase::new(&["name", "department", "status"]);
            for i in 0..1000 {
                black_box(store.assert_fact(&create_sample_fact(i)).unwrap());
            }
        });
    });
}

fn bench_contains(c: &mut Criterion) {
    let store = populated_store(1000);

    c.bench_function("contains_fact_present", |b| {
        let fact = create_sample_fact(500);
        b.iter(|| black_box(store.contains_fact(&fact).unwrap()));
    });

    c.bench_function("contains_fact_absent", |b| {
        let fact = create_sample_fact(5000);
        b.iter(|| black_box(store.contains_fact(&fact).unwrap()));
    });
}

fn bench_scan(c: &mut Criterion) {
    let mut store = populated_store(1000);
    let is_active = boolean_predicate(1, |args| args[0] == FactValue::from("active"));
    let retrieval = Retrieval::new(&mut store, is_active, &["status"], None).unwrap();

    c.bench_function("scan_1000_facts", |b| {
        b.iter(|| black_box(retrieval.scan_all().unwrap()));
    });
}

criterion_group!(benches, bench_assert, bench_contains, bench_scan);
criterion_main!(benches);
