use citymap_lib::{
    plan_route, CellPool, List, Relaxation, RoadMap, RouteRequest, SearchConfig,
};
use criterion::{criterion_group, criterion_main, Criterion};
use once_cell::sync::Lazy;
use std::cmp::Ordering;
use std::hint::black_box;
use std::path::PathBuf;

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../docs/fixtures/france.map")
}

static FIXTURE: Lazy<String> =
    Lazy::new(|| std::fs::read_to_string(fixture_path()).expect("fixture readable"));
static OBSERVED_REQUEST: Lazy<RouteRequest> = Lazy::new(|| RouteRequest::new("Rennes", "Lyon"));
static CANONICAL_REQUEST: Lazy<RouteRequest> = Lazy::new(|| RouteRequest {
    start: "Rennes".to_string(),
    goal: "Lyon".to_string(),
    config: SearchConfig {
        relaxation: Relaxation::Canonical,
        ..SearchConfig::default()
    },
});

fn ascending(a: &u32, b: &u32) -> Ordering {
    a.cmp(b)
}

fn benchmark_pathfinding(c: &mut Criterion) {
    c.bench_function("load_france_map", |b| {
        b.iter(|| {
            let map = RoadMap::from_reader(FIXTURE.as_bytes()).expect("fixture parses");
            black_box(map.len())
        });
    });

    let map = RoadMap::from_reader(FIXTURE.as_bytes()).expect("fixture parses");

    c.bench_function("astar_observed_rennes_lyon", |b| {
        let request = &*OBSERVED_REQUEST;
        b.iter(|| {
            let plan = plan_route(&map, request).expect("route exists");
            black_box(plan.cost)
        });
    });

    c.bench_function("astar_canonical_rennes_lyon", |b| {
        let request = &*CANONICAL_REQUEST;
        b.iter(|| {
            let plan = plan_route(&map, request).expect("route exists");
            black_box(plan.steps.len())
        });
    });

    c.bench_function("pooled_sorted_insert_256", |b| {
        let pool = CellPool::shared();
        b.iter(|| {
            let mut list = List::sorted(&pool, ascending);
            for value in 0..256u32 {
                list.insert_sorted(value.wrapping_mul(2_654_435_761) % 1_000)
                    .expect("pool is unbounded");
            }
            black_box(list.len())
        });
    });
}

criterion_group!(benches, benchmark_pathfinding);
criterion_main!(benches);
