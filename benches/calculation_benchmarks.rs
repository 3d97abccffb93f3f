//! Performance benchmarks for the Pension Engine.
//!
//! Covers the pure report calculation at several history sizes, the
//! goal-seeking solver, and a full `/calculate` round trip through the router.
//!
//! Run with: `cargo bench`
//! HTML reports are generated in `target/criterion/`

use chrono::{Months, NaiveDate};
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rust_decimal::Decimal;

use pension_engine::api::{AppState, create_router};
use pension_engine::calculation::{calculate_pension_report, seek_required_base};
use pension_engine::config::ConfigLoader;
use pension_engine::models::{
    Applicant, EmploymentHistory, EmploymentRecord, Gender, MonthlyContribution,
};

use axum::{body::Body, http::Request};
use tower::ServiceExt;

fn load_config() -> ConfigLoader {
    ConfigLoader::load("./config/colombia").expect("Failed to load config")
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// A summary history of `count` consecutive one-year employers ending in 2024.
fn summary_history(count: u32) -> EmploymentHistory {
    let first = date(2025 - count as i32, 1, 1);
    let records = (0..count)
        .map(|i| {
            let start = first.checked_add_months(Months::new(12 * i)).unwrap();
            let end = start
                .checked_add_months(Months::new(12))
                .unwrap()
                .pred_opt()
                .unwrap();
            EmploymentRecord {
                employer_id: format!("80{:04}", i),
                employer_name: format!("Employer {}", i),
                start_date: Some(start),
                end_date: Some(end),
                salary: Decimal::new(1_500_000 + 50_000 * i as i64, 0),
                reported_weeks: Decimal::new(5142, 2),
                total_weeks: Decimal::new(5142, 2),
                simultaneous_weeks: None,
            }
        })
        .collect();

    EmploymentHistory {
        records,
        ..Default::default()
    }
}

/// A detailed history with one contribution row per month for `years` years.
fn detailed_history(years: u32) -> EmploymentHistory {
    let monthly_detail = (0..years * 12)
        .map(|i| MonthlyContribution {
            year: 2025 - years as i32 + (i / 12) as i32,
            month: i % 12 + 1,
            base: Decimal::new(2_000_000, 0),
            employer_id: None,
        })
        .collect();

    EmploymentHistory {
        records: summary_history(years.min(30)).records,
        monthly_detail,
        reported_total_weeks: None,
    }
}

fn applicant() -> Applicant {
    Applicant {
        age: 60,
        gender: Gender::Male,
    }
}

/// Benchmark: full report from summary records of varying length.
fn bench_report_summary(c: &mut Criterion) {
    let config = load_config();
    let mut group = c.benchmark_group("report_summary");

    for record_count in [1u32, 10, 30].iter() {
        let history = summary_history(*record_count);
        group.throughput(Throughput::Elements(*record_count as u64));
        group.bench_with_input(
            BenchmarkId::new("records", record_count),
            record_count,
            |b, _| {
                b.iter(|| {
                    black_box(
                        calculate_pension_report(
                            &history,
                            &applicant(),
                            date(2024, 12, 31),
                            date(2025, 1, 1),
                            config.tables(),
                        )
                        .unwrap(),
                    )
                })
            },
        );
    }

    group.finish();
}

/// Benchmark: full report from 30 years of monthly detail.
fn bench_report_detailed(c: &mut Criterion) {
    let config = load_config();
    let history = detailed_history(30);

    c.bench_function("report_detailed_360_months", |b| {
        b.iter(|| {
            black_box(
                calculate_pension_report(
                    &history,
                    &applicant(),
                    date(2024, 12, 31),
                    date(2025, 1, 1),
                    config.tables(),
                )
                .unwrap(),
            )
        })
    });
}

/// Benchmark: goal seeking over all five horizons.
fn bench_goal_seek(c: &mut Criterion) {
    let config = load_config();

    c.bench_function("goal_seek_five_horizons", |b| {
        b.iter(|| {
            black_box(
                seek_required_base(
                    Decimal::new(3_000_000, 0),
                    Decimal::new(1150, 0),
                    Decimal::new(240_000_000, 0),
                    120,
                    2025,
                    config.tables(),
                )
                .unwrap(),
            )
        })
    });
}

/// Benchmark: `/calculate` through the router, including JSON handling.
fn bench_api_calculate(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let router = create_router(AppState::new(load_config()));
    let body = serde_json::json!({
        "history": summary_history(20),
        "applicant": { "age": 60, "gender": "male" },
        "liquidation_date": "2024-12-31",
        "as_of": "2025-01-01"
    })
    .to_string();

    c.bench_function("api_calculate_20_records", |b| {
        b.to_async(&rt).iter(|| async {
            let router = router.clone();
            let response = router
                .oneshot(
                    Request::builder()
                        .method("POST")
                        .uri("/calculate")
                        .header("Content-Type", "application/json")
                        .body(Body::from(body.clone()))
                        .unwrap(),
                )
                .await
                .unwrap();
            black_box(response)
        })
    });
}

criterion_group!(
    benches,
    bench_report_summary,
    bench_report_detailed,
    bench_goal_seek,
    bench_api_calculate,
);
criterion_main!(benches);
