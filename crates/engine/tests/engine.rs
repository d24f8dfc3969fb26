use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{Database, DatabaseConnection};

use engine::{
    BatchFilter, BatchNew, BatchStatus, BatchUpdate, EarningInput, Engine, EngineError,
    ExpenseInput, TimeRange, User, UserRole, categories,
};
use migration::MigratorTrait;
use uuid::Uuid;

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (engine, db)
}

async fn register(engine: &Engine, email: &str, role: UserRole) -> User {
    engine
        .register_user(email, "Farmer", "secret-pass", role)
        .await
        .unwrap()
}

fn d(value: &str) -> Decimal {
    Decimal::from_str(value).unwrap()
}

fn date(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn batch_new(name: &str, start: NaiveDate) -> BatchNew {
    BatchNew {
        name: name.to_string(),
        start_date: start,
        notes: None,
    }
}

fn expense(item: &str, quantity: &str, cost: &str, category: &str) -> ExpenseInput {
    ExpenseInput {
        item_name: item.to_string(),
        quantity: d(quantity),
        cost_per_unit: d(cost),
        category: category.to_string(),
        ..Default::default()
    }
}

fn earning(item: &str, quantity: &str, amount: &str, category: &str) -> EarningInput {
    EarningInput {
        item_name: item.to_string(),
        quantity: d(quantity),
        amount_per_unit: d(amount),
        category: category.to_string(),
        ..Default::default()
    }
}

#[tokio::test]
async fn register_and_authenticate() {
    let (engine, _db) = engine_with_db().await;

    let user = engine
        .register_user(" Alice@Example.com ", "Alice", "secret-pass", UserRole::Standard)
        .await
        .unwrap();
    assert_eq!(user.email, "alice@example.com");
    assert_eq!(user.role, UserRole::Standard);

    let logged_in = engine
        .authenticate("ALICE@example.com", "secret-pass")
        .await
        .unwrap();
    assert_eq!(logged_in.id, user.id);

    assert_eq!(
        engine.authenticate("alice@example.com", "wrong").await,
        Err(EngineError::InvalidCredentials)
    );
    assert_eq!(
        engine.authenticate("nobody@example.com", "secret-pass").await,
        Err(EngineError::InvalidCredentials)
    );

    let duplicate = engine
        .register_user("alice@example.com", "Other", "secret-pass", UserRole::Standard)
        .await;
    assert!(matches!(duplicate, Err(EngineError::ExistingKey(_))));

    let short = engine
        .register_user("bob@example.com", "Bob", "12345", UserRole::Standard)
        .await;
    assert!(matches!(short, Err(EngineError::InvalidName(_))));
}

#[tokio::test]
async fn batch_totals_follow_entries() {
    let (engine, _db) = engine_with_db().await;
    let alice = register(&engine, "alice@example.com", UserRole::Standard).await;

    let batch = engine
        .new_batch(&alice, batch_new("  Spring   layers ", date(2026, 3, 1)))
        .await
        .unwrap();
    assert_eq!(batch.name, "Spring layers");
    assert_eq!(batch.status, BatchStatus::InProgress);
    assert_eq!(batch.end_date, None);

    engine
        .new_expense(&alice, batch.id, expense("Layer mash", "10", "2.5", categories::FEED))
        .await
        .unwrap();
    engine
        .new_expense(
            &alice,
            batch.id,
            expense("Newcastle", "2", "2", categories::VACCINES),
        )
        .await
        .unwrap();
    engine
        .new_earning(
            &alice,
            batch.id,
            earning("Trays", "100", "0.3", categories::EGG_SALES),
        )
        .await
        .unwrap();

    let summary = engine.batch_summary(&alice, batch.id).await.unwrap();
    assert_eq!(summary.totals.total_expenses, d("29"));
    assert_eq!(summary.totals.total_earnings, d("30"));
    assert_eq!(summary.totals.profit_loss, d("1"));
    assert_eq!(summary.totals.roi, Some(d("3.45")));
    assert_eq!(summary.expenses_by_category.len(), 2);

    let detail = engine.batch_detail(&alice, batch.id).await.unwrap();
    assert_eq!(detail.owner.email, "alice@example.com");
    assert_eq!(detail.expenses.len(), 2);
    assert_eq!(detail.expenses[0].item_name, "Layer mash");
    assert_eq!(detail.earnings.len(), 1);
}

#[tokio::test]
async fn update_recomputes_total() {
    let (engine, _db) = engine_with_db().await;
    let alice = register(&engine, "alice@example.com", UserRole::Standard).await;
    let batch = engine
        .new_batch(&alice, batch_new("Broilers", date(2026, 3, 1)))
        .await
        .unwrap();

    let created = engine
        .new_expense(&alice, batch.id, expense("Feed", "10", "2.5", categories::FEED))
        .await
        .unwrap();
    assert_eq!(created.total, d("25"));

    let updated = engine
        .update_expense(&alice, created.id, expense("Feed", "4", "3", categories::FEED))
        .await
        .unwrap();
    assert_eq!(updated.total, d("12"));
    assert_eq!(updated.batch_id, batch.id);
    assert_eq!(updated.created_at, created.created_at);

    let sale = engine
        .new_earning(
            &alice,
            batch.id,
            earning("Birds", "10", "7", categories::CHICKEN_SALES),
        )
        .await
        .unwrap();
    let sale = engine
        .update_earning(
            &alice,
            sale.id,
            earning("Birds", "12", "7.5", categories::CHICKEN_SALES),
        )
        .await
        .unwrap();
    assert_eq!(sale.total, d("90"));
}

#[tokio::test]
async fn other_users_get_not_found() {
    let (engine, _db) = engine_with_db().await;
    let alice = register(&engine, "alice@example.com", UserRole::Standard).await;
    let mallory = register(&engine, "mallory@example.com", UserRole::Standard).await;

    let batch = engine
        .new_batch(&alice, batch_new("Layers", date(2026, 3, 1)))
        .await
        .unwrap();
    let feed = engine
        .new_expense(&alice, batch.id, expense("Feed", "1", "1", categories::FEED))
        .await
        .unwrap();

    assert!(matches!(
        engine.batch(&mallory, batch.id).await,
        Err(EngineError::KeyNotFound(_))
    ));
    assert!(matches!(
        engine
            .new_expense(&mallory, batch.id, expense("Feed", "1", "1", categories::FEED))
            .await,
        Err(EngineError::KeyNotFound(_))
    ));
    assert!(matches!(
        engine
            .update_expense(&mallory, feed.id, expense("Feed", "9", "9", categories::FEED))
            .await,
        Err(EngineError::KeyNotFound(_))
    ));
    assert!(matches!(
        engine.delete_expense(&mallory, feed.id).await,
        Err(EngineError::KeyNotFound(_))
    ));
    assert!(matches!(
        engine.delete_batch(&mallory, batch.id).await,
        Err(EngineError::KeyNotFound(_))
    ));

    let missing = engine.expense(&alice, Uuid::new_v4()).await;
    assert!(matches!(missing, Err(EngineError::KeyNotFound(_))));

    let listed = engine
        .list_batches(&mallory, &BatchFilter::default())
        .await
        .unwrap();
    assert!(listed.is_empty());

    let untouched = engine.expense(&alice, feed.id).await.unwrap();
    assert_eq!(untouched.total, d("1"));
}

#[tokio::test]
async fn admin_reads_every_batch_but_cannot_modify() {
    let (engine, _db) = engine_with_db().await;
    let alice = register(&engine, "alice@example.com", UserRole::Standard).await;
    let admin = register(&engine, "admin@example.com", UserRole::Admin).await;

    let batch = engine
        .new_batch(&alice, batch_new("Layers", date(2026, 3, 1)))
        .await
        .unwrap();

    let listed = engine
        .list_batches(&admin, &BatchFilter::default())
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);
    assert!(engine.batch_detail(&admin, batch.id).await.is_ok());

    let update = BatchUpdate {
        name: "Renamed".to_string(),
        status: BatchStatus::Sold,
        start_date: date(2026, 3, 1),
        end_date: None,
        notes: None,
    };
    assert!(matches!(
        engine.update_batch(&admin, batch.id, update).await,
        Err(EngineError::KeyNotFound(_))
    ));
    assert!(matches!(
        engine
            .new_earning(&admin, batch.id, earning("Eggs", "1", "1", categories::EGG_SALES))
            .await,
        Err(EngineError::KeyNotFound(_))
    ));
}

#[tokio::test]
async fn update_batch_replaces_fields_and_checks_dates() {
    let (engine, _db) = engine_with_db().await;
    let alice = register(&engine, "alice@example.com", UserRole::Standard).await;
    let batch = engine
        .new_batch(&alice, batch_new("Layers", date(2026, 3, 1)))
        .await
        .unwrap();

    let backwards = BatchUpdate {
        name: "Layers".to_string(),
        status: BatchStatus::Completed,
        start_date: date(2026, 3, 1),
        end_date: Some(date(2026, 2, 1)),
        notes: None,
    };
    assert!(matches!(
        engine.update_batch(&alice, batch.id, backwards).await,
        Err(EngineError::InvalidName(_))
    ));

    let sold = BatchUpdate {
        name: "Layers A".to_string(),
        status: BatchStatus::Sold,
        start_date: date(2026, 3, 1),
        end_date: Some(date(2026, 5, 1)),
        notes: Some("sold at market".to_string()),
    };
    let updated = engine.update_batch(&alice, batch.id, sold).await.unwrap();
    assert_eq!(updated.name, "Layers A");
    assert_eq!(updated.status, BatchStatus::Sold);
    assert_eq!(updated.end_date, Some(date(2026, 5, 1)));
    assert_eq!(updated.notes.as_deref(), Some("sold at market"));
}

#[tokio::test]
async fn list_batches_filters_and_orders() {
    let (engine, _db) = engine_with_db().await;
    let alice = register(&engine, "alice@example.com", UserRole::Standard).await;

    let older = engine
        .new_batch(&alice, batch_new("Broilers March", date(2026, 3, 1)))
        .await
        .unwrap();
    let newer = engine
        .new_batch(&alice, batch_new("Layers June", date(2026, 6, 1)))
        .await
        .unwrap();
    engine
        .update_batch(
            &alice,
            older.id,
            BatchUpdate {
                name: older.name.clone(),
                status: BatchStatus::Sold,
                start_date: older.start_date,
                end_date: None,
                notes: None,
            },
        )
        .await
        .unwrap();

    let all = engine
        .list_batches(&alice, &BatchFilter::default())
        .await
        .unwrap();
    let names: Vec<_> = all.iter().map(|s| s.batch.name.as_str()).collect();
    assert_eq!(names, ["Layers June", "Broilers March"]);

    let sold = engine
        .list_batches(
            &alice,
            &BatchFilter {
                status: Some(BatchStatus::Sold),
                search: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(sold.len(), 1);
    assert_eq!(sold[0].batch.id, older.id);

    let searched = engine
        .list_batches(
            &alice,
            &BatchFilter {
                status: None,
                search: Some("LAYERS".to_string()),
            },
        )
        .await
        .unwrap();
    assert_eq!(searched.len(), 1);
    assert_eq!(searched[0].batch.id, newer.id);
}

#[tokio::test]
async fn delete_batch_removes_its_entries() {
    let (engine, _db) = engine_with_db().await;
    let alice = register(&engine, "alice@example.com", UserRole::Standard).await;
    let batch = engine
        .new_batch(&alice, batch_new("Layers", date(2026, 3, 1)))
        .await
        .unwrap();
    let feed = engine
        .new_expense(&alice, batch.id, expense("Feed", "1", "1", categories::FEED))
        .await
        .unwrap();
    let eggs = engine
        .new_earning(&alice, batch.id, earning("Eggs", "1", "1", categories::EGG_SALES))
        .await
        .unwrap();

    engine.delete_batch(&alice, batch.id).await.unwrap();

    assert!(matches!(
        engine.batch(&alice, batch.id).await,
        Err(EngineError::KeyNotFound(_))
    ));
    assert!(matches!(
        engine.expense(&alice, feed.id).await,
        Err(EngineError::KeyNotFound(_))
    ));
    assert!(matches!(
        engine.earning(&alice, eggs.id).await,
        Err(EngineError::KeyNotFound(_))
    ));
    assert!(engine.item_names(&alice, None).await.unwrap().is_empty());
}

#[tokio::test]
async fn delete_entries_individually() {
    let (engine, _db) = engine_with_db().await;
    let alice = register(&engine, "alice@example.com", UserRole::Standard).await;
    let batch = engine
        .new_batch(&alice, batch_new("Layers", date(2026, 3, 1)))
        .await
        .unwrap();
    let feed = engine
        .new_expense(&alice, batch.id, expense("Feed", "2", "3", categories::FEED))
        .await
        .unwrap();
    let eggs = engine
        .new_earning(&alice, batch.id, earning("Eggs", "1", "4", categories::EGG_SALES))
        .await
        .unwrap();

    engine.delete_expense(&alice, feed.id).await.unwrap();
    engine.delete_earning(&alice, eggs.id).await.unwrap();

    let summary = engine.batch_summary(&alice, batch.id).await.unwrap();
    assert_eq!(summary.totals.total_expenses, Decimal::ZERO);
    assert_eq!(summary.totals.total_earnings, Decimal::ZERO);
    assert_eq!(summary.totals.roi, None);
}

#[tokio::test]
async fn item_names_are_deduplicated_and_scoped() {
    let (engine, _db) = engine_with_db().await;
    let alice = register(&engine, "alice@example.com", UserRole::Standard).await;
    let bob = register(&engine, "bob@example.com", UserRole::Standard).await;

    let first = engine
        .new_batch(&alice, batch_new("Layers", date(2026, 3, 1)))
        .await
        .unwrap();
    let second = engine
        .new_batch(&alice, batch_new("Broilers", date(2026, 4, 1)))
        .await
        .unwrap();
    for batch_id in [first.id, second.id] {
        engine
            .new_expense(&alice, batch_id, expense("Layer mash", "1", "1", categories::FEED))
            .await
            .unwrap();
    }
    engine
        .new_expense(&alice, first.id, expense("Drinkers", "1", "1", categories::EQUIPMENT))
        .await
        .unwrap();
    engine
        .new_earning(&alice, first.id, earning("Egg trays", "1", "1", categories::EGG_SALES))
        .await
        .unwrap();
    engine
        .new_earning(&alice, first.id, earning("Drinkers", "1", "1", categories::BY_PRODUCTS))
        .await
        .unwrap();

    let bobs = engine
        .new_batch(&bob, batch_new("Bob's", date(2026, 3, 1)))
        .await
        .unwrap();
    engine
        .new_expense(&bob, bobs.id, expense("Secret feed", "1", "1", categories::FEED))
        .await
        .unwrap();

    let all = engine.item_names(&alice, None).await.unwrap();
    assert_eq!(all, ["Drinkers", "Layer mash", "Egg trays"]);

    let filtered = engine.item_names(&alice, Some("MASH")).await.unwrap();
    assert_eq!(filtered, ["Layer mash"]);

    let blank = engine.item_names(&alice, Some("  ")).await.unwrap();
    assert_eq!(blank.len(), 3);
}

#[tokio::test]
async fn dashboard_keeps_batches_active_in_range() {
    let (engine, _db) = engine_with_db().await;
    let alice = register(&engine, "alice@example.com", UserRole::Standard).await;
    let today = date(2026, 6, 30);

    let current = engine
        .new_batch(&alice, batch_new("Current", date(2026, 6, 10)))
        .await
        .unwrap();
    let finished = engine
        .new_batch(&alice, batch_new("Finished", date(2025, 1, 1)))
        .await
        .unwrap();
    engine
        .update_batch(
            &alice,
            finished.id,
            BatchUpdate {
                name: "Finished".to_string(),
                status: BatchStatus::Completed,
                start_date: date(2025, 1, 1),
                end_date: Some(date(2025, 3, 1)),
                notes: None,
            },
        )
        .await
        .unwrap();

    engine
        .new_expense(&alice, current.id, expense("Feed", "10", "2", categories::FEED))
        .await
        .unwrap();
    engine
        .new_earning(&alice, current.id, earning("Birds", "5", "5", categories::CHICKEN_SALES))
        .await
        .unwrap();
    engine
        .new_expense(&alice, finished.id, expense("Feed", "1", "100", categories::FEED))
        .await
        .unwrap();

    let month = engine
        .dashboard(&alice, TimeRange::Month, today)
        .await
        .unwrap();
    assert_eq!(month.since, date(2026, 5, 30));
    assert_eq!(month.batches.len(), 1);
    assert_eq!(month.overall.total_expenses, d("20"));
    assert_eq!(month.overall.total_earnings, d("25"));
    assert_eq!(month.overall.roi, Some(d("25")));

    let year = engine
        .dashboard(&alice, TimeRange::Year, date(2026, 2, 1))
        .await
        .unwrap();
    assert_eq!(year.batches.len(), 1);
    assert_eq!(year.batches[0].batch.id, finished.id);
    assert_eq!(year.overall.total_expenses, d("100"));
}

#[tokio::test]
async fn invalid_entries_are_rejected_before_writing() {
    let (engine, _db) = engine_with_db().await;
    let alice = register(&engine, "alice@example.com", UserRole::Standard).await;
    let batch = engine
        .new_batch(&alice, batch_new("Layers", date(2026, 3, 1)))
        .await
        .unwrap();

    let other_without_text = expense("Wood shavings", "1", "1", categories::OTHER);
    assert!(matches!(
        engine.new_expense(&alice, batch.id, other_without_text).await,
        Err(EngineError::InvalidName(_))
    ));

    let other = ExpenseInput {
        custom_category: Some(" Bedding ".to_string()),
        ..expense("Wood shavings", "1", "1", categories::OTHER)
    };
    let stored = engine.new_expense(&alice, batch.id, other).await.unwrap();
    assert_eq!(stored.category, "Bedding");

    let negative = expense("Feed", "-1", "1", categories::FEED);
    assert!(matches!(
        engine.new_expense(&alice, batch.id, negative).await,
        Err(EngineError::InvalidAmount(_))
    ));

    let summary = engine.batch_summary(&alice, batch.id).await.unwrap();
    assert_eq!(summary.totals.total_expenses, d("1"));
}

#[tokio::test]
async fn oversized_amounts_cannot_break_listings() {
    let (engine, _db) = engine_with_db().await;
    let alice = register(&engine, "alice@example.com", UserRole::Standard).await;
    let admin = register(&engine, "admin@example.com", UserRole::Admin).await;
    let batch = engine
        .new_batch(&alice, batch_new("Broilers", date(2026, 3, 1)))
        .await
        .unwrap();

    let huge = "50000000000000000000000000000";
    for _ in 0..2 {
        assert!(matches!(
            engine
                .new_expense(&alice, batch.id, expense("Feed", huge, "1", categories::FEED))
                .await,
            Err(EngineError::InvalidAmount(_))
        ));
        assert!(matches!(
            engine
                .new_earning(
                    &alice,
                    batch.id,
                    earning("Eggs", huge, "1", categories::EGG_SALES)
                )
                .await,
            Err(EngineError::InvalidAmount(_))
        ));
    }

    let largest = "1000000000000000";
    let stored = engine
        .new_expense(&alice, batch.id, expense("Feed", largest, "1", categories::FEED))
        .await
        .unwrap();
    engine
        .new_expense(&alice, batch.id, expense("Feed", largest, "1", categories::FEED))
        .await
        .unwrap();
    assert!(matches!(
        engine
            .update_expense(&alice, stored.id, expense("Feed", huge, "1", categories::FEED))
            .await,
        Err(EngineError::InvalidAmount(_))
    ));

    let listed = engine
        .list_batches(&admin, &BatchFilter::default())
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].totals.total_expenses, d("2000000000000000"));
    assert_eq!(listed[0].totals.roi, Some(d("-100")));

    let dashboard = engine
        .dashboard(&admin, TimeRange::Year, date(2026, 3, 15))
        .await
        .unwrap();
    assert_eq!(dashboard.overall.total_expenses, d("2000000000000000"));
}
