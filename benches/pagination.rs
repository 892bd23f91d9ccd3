//! Planner, assembler and end-to-end generation benchmarks.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use std::sync::Arc;
use tokio::runtime::Runtime;
use waybill::layout::{PageSpace, PaginationPlanner, PlannerOptions, assemble};
use waybill::source::InMemoryRecordSource;
use waybill::types::{HistoryEvent, Package, PageGeometry, ShipmentRecord};
use waybill::{DocumentGenerator, GeneratorConfig};

fn record(rows: usize) -> ShipmentRecord {
    let mut record = ShipmentRecord::new(format!("BENCH-{}", rows));
    record.packages = (0..rows)
        .map(|i| Package {
            description: Some(format!("Package {}", i)),
            ..Default::default()
        })
        .collect();
    record.history = (0..rows)
        .map(|i| HistoryEvent {
            status: Some(format!("Event {}", i)),
            ..Default::default()
        })
        .collect();
    record
}

fn benchmark_planner(c: &mut Criterion) {
    let mut group = c.benchmark_group("planner");
    let planner = PaginationPlanner::new(PlannerOptions::default()).expect("valid options");

    for rows in [10, 1_000, 100_000] {
        group.bench_with_input(BenchmarkId::new("rows", rows), &rows, |b, &rows| {
            b.iter(|| {
                let space = PageSpace::fresh(0, 649.89);
                black_box(planner.plan_at(black_box(rows), 46.0, &space).expect("plan"))
            });
        });
    }
    group.finish();
}

fn benchmark_assemble(c: &mut Criterion) {
    let mut group = c.benchmark_group("assemble");
    let layout = GeneratorConfig::default().layout_config();
    let geometry = PageGeometry::a4();

    for rows in [5, 50, 500] {
        let record = record(rows);
        group.bench_with_input(BenchmarkId::new("rows", rows), &record, |b, record| {
            b.iter(|| black_box(assemble(record, &geometry, &layout).expect("assemble")));
        });
    }
    group.finish();
}

fn benchmark_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_document");
    group.sample_size(20);
    let rt = Runtime::new().expect("Failed to create Tokio runtime");

    for rows in [5, 100] {
        let source = InMemoryRecordSource::from_records([record(rows)]);
        let generator =
            DocumentGenerator::new(Arc::new(source), GeneratorConfig::default()).expect("generator");
        let code = format!("BENCH-{}", rows);
        group.bench_with_input(BenchmarkId::new("rows", rows), &code, |b, code| {
            b.iter(|| {
                rt.block_on(async {
                    generator
                        .generate_document(code, &PageGeometry::a4())
                        .await
                        .expect("Failed to generate PDF")
                })
            });
        });
    }
    group.finish();
}

criterion_group!(benches, benchmark_planner, benchmark_assemble, benchmark_generate);
criterion_main!(benches);
