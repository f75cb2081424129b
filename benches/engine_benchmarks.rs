//! Performance benchmarks for the Crew Rules Engine.
//!
//! This benchmark suite covers the hot paths a scheduler or payroll run
//! exercises:
//! - Single assignment validation against a year of duty history
//! - Crew pool validation (fan-out over 100 crew members)
//! - Monthly pay calculation
//! - Bulk pay for 100 and 1000 crew members
//!
//! Run with: `cargo bench`
//! HTML reports are generated in `target/criterion/`

use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use crew_rules_engine::CrewRulesEngine;
use crew_rules_engine::models::{
    AircraftTypeRating, CrewCategory, CrewMember, CrewStatus, CurrencyStatus, DutyTimeRecord,
    MedicalCertificate, MedicalStatus, ProposedDutyAssignment,
};
use crew_rules_engine::store::InMemoryStore;

fn crew_id(i: usize) -> String {
    format!("crew_{i:04}")
}

fn create_crew(i: usize) -> CrewMember {
    CrewMember {
        id: crew_id(i),
        employee_number: format!("E{i:05}"),
        first_name: "Bench".to_string(),
        last_name: format!("Pilot{i}"),
        category: CrewCategory::Pilot,
        position: if i % 2 == 0 { "CAPTAIN" } else { "FIRST_OFFICER" }.to_string(),
        base: "JFK".to_string(),
        hire_date: NaiveDate::from_ymd_opt(2010 + (i % 15) as i32, 6, 1).unwrap(),
        status: CrewStatus::Active,
    }
}

/// A duty every third day for the year before `until`.
fn create_history(id: &str, until: DateTime<Utc>) -> Vec<DutyTimeRecord> {
    (1..=120)
        .map(|n| {
            let start = until - Duration::days(n * 3);
            DutyTimeRecord {
                id: format!("{id}-{n}"),
                crew_id: id.to_string(),
                duty_date: start.date_naive(),
                start_time: start,
                end_time: Some(start + Duration::hours(9)),
                flight_minutes: 330,
                duty_minutes: 540,
                block_minutes: 330,
                segment_count: 2,
                is_fdp: true,
                crosses_wocl: n % 7 == 0,
                is_international: n % 11 == 0,
            }
        })
        .collect()
}

/// Creates an engine with `crew_count` qualified pilots and a year of history each.
fn create_engine(crew_count: usize) -> CrewRulesEngine<InMemoryStore> {
    let until = Utc.with_ymd_and_hms(2025, 4, 1, 8, 0, 0).unwrap();
    let mut store = InMemoryStore::new();
    for i in 0..crew_count {
        let id = crew_id(i);
        store = store
            .with_crew_member(create_crew(i))
            .with_type_rating(AircraftTypeRating {
                crew_id: id.clone(),
                aircraft_type: "B737".to_string(),
                currency_status: CurrencyStatus::Current,
                last_check_date: None,
            })
            .with_medical(MedicalCertificate {
                crew_id: id.clone(),
                medical_class: "FIRST".to_string(),
                status: MedicalStatus::Valid,
                expiry_date: NaiveDate::from_ymd_opt(2026, 1, 31).unwrap(),
            })
            .with_duty_records(create_history(&id, until));
    }
    CrewRulesEngine::from_config_dir(Arc::new(store), "./config/default")
        .expect("Failed to load rule set")
}

fn create_proposal() -> ProposedDutyAssignment {
    let start = Utc.with_ymd_and_hms(2025, 4, 1, 8, 0, 0).unwrap();
    ProposedDutyAssignment {
        aircraft_type: "B737".to_string(),
        start_time: start,
        end_time: Some(start + Duration::hours(10)),
        estimated_flight_minutes: Some(420),
        segment_count: 2,
    }
}

fn march() -> (NaiveDate, NaiveDate) {
    (
        NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
        NaiveDate::from_ymd_opt(2025, 3, 31).unwrap(),
    )
}

/// Benchmark: One assignment against 120 history records.
fn bench_validate_assignment(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let engine = create_engine(1);
    let proposed = create_proposal();
    let id = crew_id(0);

    c.bench_function("validate_assignment", |b| {
        b.to_async(&rt)
            .iter(|| async { black_box(engine.validate_assignment(&id, &proposed).await.unwrap()) })
    });
}

/// Benchmark: Pool validation over 100 crew members.
fn bench_validate_crew_pool(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let engine = create_engine(100);
    let proposed = create_proposal();
    let pool: Vec<String> = (0..100).map(crew_id).collect();

    let mut group = c.benchmark_group("crew_pool");
    group.throughput(Throughput::Elements(100));
    group.bench_function("pool_100", |b| {
        b.to_async(&rt)
            .iter(|| async { black_box(engine.validate_crew_pool(&pool, &proposed).await) })
    });
    group.finish();
}

/// Benchmark: One monthly pay calculation.
fn bench_calculate_pay(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let engine = create_engine(1);
    let (start, end) = march();
    let id = crew_id(0);

    c.bench_function("calculate_pay", |b| {
        b.to_async(&rt)
            .iter(|| async { black_box(engine.calculate_pay(&id, start, end).await.unwrap()) })
    });
}

/// Benchmark: Bulk pay at increasing crew counts.
fn bench_bulk_pay(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let (start, end) = march();

    let mut group = c.benchmark_group("bulk_pay");
    group.sample_size(20);

    for crew_count in [100usize, 1000] {
        let engine = create_engine(crew_count);
        let crew_ids: Vec<String> = (0..crew_count).map(crew_id).collect();

        group.throughput(Throughput::Elements(crew_count as u64));
        group.bench_with_input(BenchmarkId::new("crew", crew_count), &crew_count, |b, _| {
            b.to_async(&rt).iter(|| async {
                black_box(engine.calculate_bulk_pay(&crew_ids, start, end).await)
            })
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_validate_assignment,
    bench_validate_crew_pool,
    bench_calculate_pay,
    bench_bulk_pay,
);
criterion_main!(benches);
