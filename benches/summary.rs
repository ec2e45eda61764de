use chrono::{Duration, NaiveDate, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use slip_core::{
    export::{encode_csv, encode_json},
    CategoryFilter, ReceiptFilter, StorageService, SummaryService,
};
use slip_domain::{Category, LineItem, Receipt, ReceiptDraft};
use slip_storage_json::JsonFileStore;
use tempfile::tempdir;

fn build_receipts(count: usize) -> Vec<Receipt> {
    let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
    let created = Utc.with_ymd_and_hms(2025, 1, 1, 8, 0, 0).unwrap();

    (0..count)
        .map(|idx| {
            let category = Category::ALL[idx % Category::ALL.len()];
            let draft = ReceiptDraft::new(
                format!("Store {}", idx % 250),
                start + Duration::days((idx % 365) as i64),
                5.0 + (idx % 120) as f64 * 0.75,
                category,
            )
            .with_notes(format!("note, \"{idx}\""))
            .with_items(vec![LineItem::new("Item", 1.5)]);
            Receipt::from_draft(
                draft,
                idx.to_string(),
                created + Duration::minutes(idx as i64),
            )
        })
        .collect()
}

fn bench_aggregates(c: &mut Criterion) {
    let receipts = build_receipts(black_box(10_000));

    c.bench_function("total_spending_10k", |b| {
        b.iter(|| black_box(SummaryService::total_spending(&receipts)))
    });

    c.bench_function("category_shares_10k", |b| {
        b.iter(|| black_box(SummaryService::category_shares(&receipts)))
    });

    c.bench_function("recent_receipts_10k", |b| {
        b.iter(|| black_box(SummaryService::recent_receipts(&receipts, 5)))
    });

    let filter = ReceiptFilter::new("store 1", CategoryFilter::Only(Category::Food));
    c.bench_function("filter_search_10k", |b| {
        b.iter(|| black_box(filter.apply(&receipts)))
    });
}

fn bench_encoders(c: &mut Criterion) {
    let receipts = build_receipts(black_box(10_000));

    c.bench_function("encode_csv_10k", |b| {
        b.iter(|| black_box(encode_csv(&receipts)))
    });

    c.bench_function("encode_json_10k", |b| {
        b.iter(|| black_box(encode_json(&receipts).expect("encode json")))
    });

    let dir = tempdir().expect("tempdir");
    let storage = StorageService::new(Box::new(
        JsonFileStore::new(dir.path()).expect("json store"),
    ));
    c.bench_function("persist_receipts_10k", |b| {
        b.iter(|| storage.persist_receipts(&receipts).expect("persist"))
    });
}

criterion_group!(benches, bench_aggregates, bench_encoders);
criterion_main!(benches);
