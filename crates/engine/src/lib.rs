//! Expense and budget tracking engine.
//!
//! The engine owns the store access (sea-orm entities over sqlite) and the
//! two pure computations built on top of it: the installment splitter and
//! the spending aggregator. It never resolves the caller; every operation
//! takes the owner explicitly, and the database connection is injected at
//! construction.

use chrono::Utc;
use sea_orm::{
    ActiveValue, DatabaseConnection, QueryFilter, QueryOrder, sea_query::Expr,
    sea_query::OnConflict, prelude::*,
};

pub use budgets::{Budget, DEFAULT_MONTHLY_INCOME_MINOR};
pub use categories::SUGGESTED_CATEGORIES;
pub use error::EngineError;
pub use expenses::{Expense, ExpenseChanges, InstallmentStamp, NewExpense};
pub use installments::{InstallmentPlan, MAX_INSTALLMENTS};
pub use summary::{
    BudgetSummary, CategoryTotal, MonthBucket, RECENT_MONTHS, SavingSuggestion, monthly_statement,
    recent_months, summarize,
};

mod budgets;
mod categories;
mod error;
mod expenses;
mod installments;
mod summary;

type ResultEngine<T> = Result<T, EngineError>;

#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// Lists an owner's expenses, newest date first.
    ///
    /// Reads degrade: when the store is unreachable the caller gets an empty
    /// list instead of an error.
    pub async fn list_expenses(&self, owner: &str) -> Vec<Expense> {
        let rows = expenses::Entity::find()
            .filter(expenses::Column::UserId.eq(owner))
            .order_by_desc(expenses::Column::Date)
            .all(&self.database)
            .await;

        match rows {
            Ok(models) => models.into_iter().map(Expense::from).collect(),
            Err(err) => {
                tracing::warn!("failed to list expenses, returning empty list: {err}");
                Vec::new()
            }
        }
    }

    /// Inserts a single expense and returns the stored row.
    pub async fn create_expense(&self, owner: &str, new: &NewExpense) -> ResultEngine<Expense> {
        let model = expenses::new_row(owner, new).insert(&self.database).await?;
        Ok(model.into())
    }

    /// Applies a partial update to an owned expense.
    ///
    /// Returns `None` when no owned row changed; a foreign id and a missing
    /// id are indistinguishable on purpose.
    pub async fn update_expense(
        &self,
        id: i64,
        owner: &str,
        changes: &ExpenseChanges,
    ) -> ResultEngine<Option<Expense>> {
        changes.validate()?;
        if changes.is_empty() {
            return Err(EngineError::InvalidAmount(
                "no fields to update".to_string(),
            ));
        }

        let mut update = expenses::Entity::update_many()
            .filter(expenses::Column::Id.eq(id))
            .filter(expenses::Column::UserId.eq(owner));
        if let Some(category) = &changes.category {
            update = update.col_expr(expenses::Column::Category, Expr::value(category.trim()));
        }
        if let Some(amount_minor) = changes.amount_minor {
            update = update.col_expr(expenses::Column::AmountMinor, Expr::value(amount_minor));
        }
        if let Some(date) = changes.date {
            update = update.col_expr(expenses::Column::Date, Expr::value(date));
        }
        if let Some(description) = &changes.description {
            update = update.col_expr(
                expenses::Column::Description,
                Expr::value(description.clone()),
            );
        }

        let result = update.exec(&self.database).await?;
        if result.rows_affected == 0 {
            return Ok(None);
        }

        let model = expenses::Entity::find_by_id(id)
            .filter(expenses::Column::UserId.eq(owner))
            .one(&self.database)
            .await?;
        Ok(model.map(Expense::from))
    }

    /// Deletes an owned expense; `false` when no owned row matched.
    pub async fn delete_expense(&self, id: i64, owner: &str) -> ResultEngine<bool> {
        let result = expenses::Entity::delete_many()
            .filter(expenses::Column::Id.eq(id))
            .filter(expenses::Column::UserId.eq(owner))
            .exec(&self.database)
            .await?;
        Ok(result.rows_affected > 0)
    }

    /// Persists an installment batch, one row at a time and in order.
    ///
    /// Row `i + 1` is only written after row `i` committed. A failure
    /// mid-batch keeps the rows already inserted and returns only that
    /// prefix; callers must treat a short result as partial success.
    pub async fn create_installments(
        &self,
        owner: &str,
        plan: &InstallmentPlan,
    ) -> ResultEngine<Vec<Expense>> {
        let requests = plan.split()?;

        let mut created = Vec::with_capacity(requests.len());
        for request in &requests {
            match expenses::new_row(owner, request).insert(&self.database).await {
                Ok(model) => created.push(model.into()),
                Err(err) => {
                    tracing::warn!(
                        created = created.len(),
                        total = plan.count,
                        "installment batch stopped early: {err}"
                    );
                    break;
                }
            }
        }

        Ok(created)
    }

    /// Looks up the budget row for (owner, month).
    ///
    /// Reads degrade: a storage failure is reported as an absent budget.
    pub async fn budget(&self, owner: &str, month: &str) -> Option<Budget> {
        let row = budgets::Entity::find_by_id((owner.to_string(), month.to_string()))
            .one(&self.database)
            .await;

        match row {
            Ok(model) => model.map(Budget::from),
            Err(err) => {
                tracing::warn!("failed to read budget, treating as absent: {err}");
                None
            }
        }
    }

    /// Upserts the budget row for (owner, month) and returns the stored row.
    pub async fn set_budget(
        &self,
        owner: &str,
        month: &str,
        monthly_income_minor: i64,
    ) -> ResultEngine<Budget> {
        budgets::validate_month(month)?;
        if monthly_income_minor <= 0 {
            return Err(EngineError::InvalidAmount(
                "monthly_income_minor must be > 0".to_string(),
            ));
        }

        let row = budgets::ActiveModel {
            user_id: ActiveValue::Set(owner.to_string()),
            month: ActiveValue::Set(month.to_string()),
            monthly_income_minor: ActiveValue::Set(monthly_income_minor),
            updated_at: ActiveValue::Set(Utc::now()),
        };
        budgets::Entity::insert(row)
            .on_conflict(
                OnConflict::columns([budgets::Column::UserId, budgets::Column::Month])
                    .update_columns([
                        budgets::Column::MonthlyIncomeMinor,
                        budgets::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&self.database)
            .await?;

        let model = budgets::Entity::find_by_id((owner.to_string(), month.to_string()))
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("budget not exists".to_string()))?;
        Ok(model.into())
    }
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Construct `Engine`
    pub fn build(self) -> Engine {
        Engine {
            database: self.database,
        }
    }
}
