use chrono::NaiveDate;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};

use engine::{
    DEFAULT_MONTHLY_INCOME_MINOR, Engine, EngineError, ExpenseChanges, InstallmentPlan, NewExpense,
};
use migration::MigratorTrait;

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let backend = db.get_database_backend();
    for username in ["alice", "bob"] {
        db.execute(Statement::from_sql_and_values(
            backend,
            "INSERT INTO users (username, password) VALUES (?, ?)",
            vec![username.into(), "password".into()],
        ))
        .await
        .unwrap();
    }
    let engine = Engine::builder().database(db.clone()).build();
    (engine, db)
}

fn date(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

fn new_expense(category: &str, amount_minor: i64, day: &str) -> NewExpense {
    NewExpense::new(category, amount_minor, date(day), None).unwrap()
}

async fn budget_row_count(db: &DatabaseConnection, owner: &str) -> i64 {
    let backend = db.get_database_backend();
    let row = db
        .query_one(Statement::from_sql_and_values(
            backend,
            "SELECT COUNT(*) AS n FROM budgets WHERE user_id = ?",
            vec![owner.into()],
        ))
        .await
        .unwrap()
        .unwrap();
    row.try_get("", "n").unwrap()
}

#[tokio::test]
async fn create_assigns_ids_and_list_is_newest_first() {
    let (engine, _db) = engine_with_db().await;

    let first = engine
        .create_expense("alice", &new_expense("Lazer", 1_000, "2025-05-01"))
        .await
        .unwrap();
    let second = engine
        .create_expense("alice", &new_expense("Moradia", 2_000, "2025-05-20"))
        .await
        .unwrap();
    assert_ne!(first.id, second.id);

    let listed = engine.list_expenses("alice").await;
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].date, date("2025-05-20"));
    assert_eq!(listed[1].date, date("2025-05-01"));
}

#[tokio::test]
async fn expenses_are_scoped_to_their_owner() {
    let (engine, _db) = engine_with_db().await;

    engine
        .create_expense("alice", &new_expense("Lazer", 1_000, "2025-05-01"))
        .await
        .unwrap();

    assert!(engine.list_expenses("bob").await.is_empty());
}

#[tokio::test]
async fn delete_by_another_owner_affects_nothing() {
    let (engine, _db) = engine_with_db().await;

    let expense = engine
        .create_expense("alice", &new_expense("Lazer", 1_000, "2025-05-01"))
        .await
        .unwrap();

    assert!(!engine.delete_expense(expense.id, "bob").await.unwrap());
    assert_eq!(engine.list_expenses("alice").await.len(), 1);

    assert!(engine.delete_expense(expense.id, "alice").await.unwrap());
    assert!(engine.list_expenses("alice").await.is_empty());
}

#[tokio::test]
async fn update_changes_only_the_given_fields() {
    let (engine, _db) = engine_with_db().await;

    let expense = engine
        .create_expense("alice", &new_expense("Lazer", 1_000, "2025-05-01"))
        .await
        .unwrap();

    let changes = ExpenseChanges {
        amount_minor: Some(2_500),
        description: Some("cinema".to_string()),
        ..Default::default()
    };
    let updated = engine
        .update_expense(expense.id, "alice", &changes)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.amount_minor, 2_500);
    assert_eq!(updated.description.as_deref(), Some("cinema"));
    assert_eq!(updated.category, "Lazer");
    assert_eq!(updated.date, date("2025-05-01"));
}

#[tokio::test]
async fn update_by_another_owner_returns_none() {
    let (engine, _db) = engine_with_db().await;

    let expense = engine
        .create_expense("alice", &new_expense("Lazer", 1_000, "2025-05-01"))
        .await
        .unwrap();

    let changes = ExpenseChanges {
        amount_minor: Some(2_500),
        ..Default::default()
    };
    assert!(
        engine
            .update_expense(expense.id, "bob", &changes)
            .await
            .unwrap()
            .is_none()
    );

    // The row is untouched.
    let listed = engine.list_expenses("alice").await;
    assert_eq!(listed[0].amount_minor, 1_000);
}

#[tokio::test]
async fn update_validates_before_touching_the_store() {
    let (engine, _db) = engine_with_db().await;

    let expense = engine
        .create_expense("alice", &new_expense("Lazer", 1_000, "2025-05-01"))
        .await
        .unwrap();

    let bad_amount = ExpenseChanges {
        amount_minor: Some(0),
        ..Default::default()
    };
    assert!(matches!(
        engine.update_expense(expense.id, "alice", &bad_amount).await,
        Err(EngineError::InvalidAmount(_))
    ));

    assert!(matches!(
        engine
            .update_expense(expense.id, "alice", &ExpenseChanges::default())
            .await,
        Err(EngineError::InvalidAmount(_))
    ));
}

#[tokio::test]
async fn installment_batch_persists_every_row() {
    let (engine, _db) = engine_with_db().await;

    let plan = InstallmentPlan::new(
        "Compras",
        100_000,
        3,
        date("2025-01-31"),
        Some("Notebook".to_string()),
    )
    .unwrap();
    let created = engine.create_installments("alice", &plan).await.unwrap();

    assert_eq!(created.len(), 3);
    let sum: i64 = created.iter().map(|e| e.amount_minor).sum();
    assert_eq!(sum, 100_000);
    assert_eq!(created[1].date, date("2025-02-28"));
    assert_eq!(created[2].description.as_deref(), Some("Notebook (3/3)"));

    for (i, row) in created.iter().enumerate() {
        assert_eq!(row.installments, Some(3));
        assert_eq!(row.installment_number, Some(i as u32 + 1));
        assert_eq!(row.original_purchase_date, Some(date("2025-01-31")));
    }

    // The batch is visible like any other expenses.
    assert_eq!(engine.list_expenses("alice").await.len(), 3);
}

#[tokio::test]
async fn budget_lookup_is_absent_until_set() {
    let (engine, _db) = engine_with_db().await;

    assert!(engine.budget("alice", "2025-05").await.is_none());

    let budget = engine
        .set_budget("alice", "2025-05", DEFAULT_MONTHLY_INCOME_MINOR)
        .await
        .unwrap();
    assert_eq!(budget.monthly_income_minor, DEFAULT_MONTHLY_INCOME_MINOR);

    let read_back = engine.budget("alice", "2025-05").await.unwrap();
    assert_eq!(read_back.monthly_income_minor, DEFAULT_MONTHLY_INCOME_MINOR);
}

#[tokio::test]
async fn budget_upsert_keeps_a_single_row_per_month() {
    let (engine, db) = engine_with_db().await;

    engine.set_budget("alice", "2025-05", 300_000).await.unwrap();
    engine.set_budget("alice", "2025-05", 450_000).await.unwrap();

    assert_eq!(budget_row_count(&db, "alice").await, 1);
    let budget = engine.budget("alice", "2025-05").await.unwrap();
    assert_eq!(budget.monthly_income_minor, 450_000);
}

#[tokio::test]
async fn budgets_for_different_months_coexist() {
    let (engine, db) = engine_with_db().await;

    engine.set_budget("alice", "2025-04", 300_000).await.unwrap();
    engine.set_budget("alice", "2025-05", 310_000).await.unwrap();

    assert_eq!(budget_row_count(&db, "alice").await, 2);
    assert_eq!(
        engine
            .budget("alice", "2025-04")
            .await
            .unwrap()
            .monthly_income_minor,
        300_000
    );
}

#[tokio::test]
async fn reads_degrade_once_the_store_is_gone() {
    let (engine, db) = engine_with_db().await;

    engine
        .create_expense("alice", &new_expense("Lazer", 1_000, "2025-05-01"))
        .await
        .unwrap();
    engine.set_budget("alice", "2025-05", 300_000).await.unwrap();

    db.close().await.unwrap();

    // Reads fall back to empty/absent results.
    assert!(engine.list_expenses("alice").await.is_empty());
    assert!(engine.budget("alice", "2025-05").await.is_none());

    // Writes keep reporting failure.
    assert!(
        engine
            .create_expense("alice", &new_expense("Lazer", 1_000, "2025-05-02"))
            .await
            .is_err()
    );

    // An installment batch degenerates to the empty prefix.
    let plan = InstallmentPlan::new("Compras", 300, 3, date("2025-05-02"), None).unwrap();
    assert!(
        engine
            .create_installments("alice", &plan)
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn set_budget_validates_income_and_month() {
    let (engine, _db) = engine_with_db().await;

    assert!(matches!(
        engine.set_budget("alice", "2025-05", 0).await,
        Err(EngineError::InvalidAmount(_))
    ));
    assert!(matches!(
        engine.set_budget("alice", "2025-13", 300_000).await,
        Err(EngineError::InvalidDate(_))
    ));
    assert!(matches!(
        engine.set_budget("alice", "202505", 300_000).await,
        Err(EngineError::InvalidDate(_))
    ));
}
