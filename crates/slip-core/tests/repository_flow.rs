use std::sync::{Arc, Mutex};

use chrono::{NaiveDate, TimeZone, Utc};
use slip_core::{
    CategoryFilter, CoreError, FixedClock, LoadSource, ReceiptFilter, ReceiptRepository,
    RepositoryEvent, RepositoryPhase, StorageService,
};
use slip_domain::{Category, ReceiptDraft, ReceiptPatch};

fn repository() -> ReceiptRepository {
    let clock = FixedClock(Utc.with_ymd_and_hms(2025, 6, 1, 9, 30, 0).unwrap());
    ReceiptRepository::new(StorageService::in_memory()).with_clock(Arc::new(clock))
}

fn draft(store: &str, total: f64, category: Category) -> ReceiptDraft {
    ReceiptDraft::new(
        store,
        NaiveDate::from_ymd_opt(2025, 5, 31).unwrap(),
        total,
        category,
    )
}

#[test]
fn mutations_before_load_are_rejected() {
    let mut repo = repository();
    assert_eq!(repo.phase(), RepositoryPhase::Loading);
    assert!(repo.receipts().is_empty());
    assert_eq!(repo.total_spending(), 0.0);
    assert!(repo.recent_receipts(5).is_empty());
    assert!(matches!(
        repo.add(draft("Tesco", 10.0, Category::Food)),
        Err(CoreError::NotReady)
    ));
    assert!(matches!(repo.reset_to_seed(), Err(CoreError::NotReady)));
}

#[test]
fn listeners_see_every_change_until_unsubscribed() {
    let mut repo = repository();
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    let subscription = repo.subscribe(move |event: &RepositoryEvent| {
        sink.lock().unwrap().push(event.clone());
    });

    let report = repo.load();
    assert_eq!(report.source, LoadSource::Seeded);
    let added = repo.add(draft("Tesco", 10.0, Category::Food)).unwrap();
    repo.update(&added.id, ReceiptPatch::new().total(12.0)).unwrap();
    repo.delete(&added.id).unwrap();
    repo.delete("missing").unwrap();

    assert!(repo.unsubscribe(subscription));
    assert!(!repo.unsubscribe(subscription));
    repo.reset_to_seed().unwrap();

    let seen = events.lock().unwrap().clone();
    assert_eq!(
        seen,
        vec![
            RepositoryEvent::Loaded(LoadSource::Seeded),
            RepositoryEvent::Added(added.id.clone()),
            RepositoryEvent::Updated(added.id.clone()),
            RepositoryEvent::Deleted(added.id),
        ]
    );
}

#[test]
fn dashboard_figures_follow_the_collection() {
    let mut repo = repository();
    repo.load();
    let seeded_total = repo.total_spending();

    repo.add(draft("Kedai Buku", 40.0, Category::Shopping)).unwrap();
    assert!((repo.total_spending() - (seeded_total + 40.0)).abs() < 1e-9);

    let recent = repo.recent_receipts(1);
    assert_eq!(recent[0].store_name, "Kedai Buku");

    let shopping = repo.filtered(&ReceiptFilter::new(
        "buku",
        CategoryFilter::Only(Category::Shopping),
    ));
    assert_eq!(shopping.len(), 1);

    let shares = repo.category_shares();
    let amounts: Vec<f64> = shares.iter().map(|share| share.amount).collect();
    assert!(amounts.windows(2).all(|pair| pair[0] >= pair[1]));
    assert_eq!(repo.top_category().map(|(category, _)| category), Some(shares[0].category));
}
