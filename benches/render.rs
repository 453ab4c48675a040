//! Benchmarks for export rendering.
//!
//! Measures the full build (validation, record read, render) per format for
//! the demo order set and for a larger synthetic table.

// Criterion macros generate items without docs - this is expected for benchmarks
#![allow(missing_docs)]
#![allow(clippy::expect_used, clippy::unwrap_used)]
#![allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]

use backoffice_export::models::{CellValue, ExportCategory, ExportFormat, Record};
use backoffice_export::schema::{ColumnKind, HeaderRegistry};
use backoffice_export::{ExportService, MockRecordSource, RecordSource, Result};
use chrono::NaiveDate;
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use std::sync::Arc;

struct LargeSource {
    rows: usize,
}

impl RecordSource for LargeSource {
    fn records(&self, category: ExportCategory) -> Result<Vec<Record>> {
        let schema = HeaderRegistry::global().schema(category)?;
        Ok((0..self.rows)
            .map(|i| {
                schema
                    .columns
                    .iter()
                    .map(|column| {
                        let value = match column.kind {
                            ColumnKind::Integer => CellValue::Integer(i as i64 * 37),
                            ColumnKind::Money(unit) => CellValue::money_cents(i as i64 * 991, unit),
                            ColumnKind::Date => CellValue::date(2024, 6, 1 + (i % 28) as u32),
                            ColumnKind::Text | ColumnKind::Display => {
                                CellValue::text(format!("{} value {i}", column.label))
                            },
                        };
                        (column.key, value)
                    })
                    .collect()
            })
            .collect())
    }

    fn supports(&self, _category: ExportCategory) -> bool {
        true
    }
}

fn bench_demo_orders(c: &mut Criterion) {
    let service = ExportService::new(Arc::new(MockRecordSource::new()));
    let at = NaiveDate::from_ymd_opt(2024, 3, 7)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap();

    let mut group = c.benchmark_group("demo_orders");
    for format in ExportFormat::all() {
        group.bench_with_input(
            BenchmarkId::from_parameter(format.as_str()),
            format,
            |b, format| {
                b.iter(|| {
                    service
                        .build_at(black_box("orders"), format.as_str(), "manager", at)
                        .unwrap()
                });
            },
        );
    }
    group.finish();
}

fn bench_large_csv_xlsx(c: &mut Criterion) {
    let at = NaiveDate::from_ymd_opt(2024, 3, 7)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap();

    let mut group = c.benchmark_group("large_table");
    group.sample_size(20);
    for rows in [1_000, 10_000] {
        let service = ExportService::new(Arc::new(LargeSource { rows }));
        for format in [ExportFormat::Csv, ExportFormat::Xlsx] {
            group.bench_with_input(
                BenchmarkId::new(format.as_str(), rows),
                &format,
                |b, format| {
                    b.iter(|| {
                        service
                            .build_at("calls", format.as_str(), "controller", at)
                            .unwrap()
                    });
                },
            );
        }
    }
    group.finish();
}

criterion_group!(benches, bench_demo_orders, bench_large_csv_xlsx);
criterion_main!(benches);
