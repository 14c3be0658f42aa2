//! Monthly budget rows.
//!
//! At most one row exists per (user, month); writes go through an upsert on
//! that composite key.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{EngineError, ResultEngine};

/// Default monthly income (3000.00) used when a budget is read before one
/// was ever set for the current month.
pub const DEFAULT_MONTHLY_INCOME_MINOR: i64 = 300_000;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Budget {
    pub user_id: String,
    /// Calendar month key, `YYYY-MM`.
    pub month: String,
    pub monthly_income_minor: i64,
    pub updated_at: DateTime<Utc>,
}

/// Checks the `YYYY-MM` month-key shape and range.
pub(crate) fn validate_month(month: &str) -> ResultEngine<()> {
    let invalid = || EngineError::InvalidDate(format!("invalid month key: {month}"));

    let (year, month_number) = month.split_once('-').ok_or_else(invalid)?;
    if year.len() != 4 || month_number.len() != 2 {
        return Err(invalid());
    }
    if !year.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }
    let month_number: u32 = month_number.parse().map_err(|_| invalid())?;
    if !(1..=12).contains(&month_number) {
        return Err(invalid());
    }
    Ok(())
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "budgets")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub month: String,
    pub monthly_income_minor: i64,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Budget {
    fn from(model: Model) -> Self {
        Self {
            user_id: model.user_id,
            month: model.month,
            monthly_income_minor: model.monthly_income_minor,
            updated_at: model.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_key_shape_is_enforced() {
        assert!(validate_month("2025-01").is_ok());
        assert!(validate_month("2025-12").is_ok());
        assert!(validate_month("2025-13").is_err());
        assert!(validate_month("2025-00").is_err());
        assert!(validate_month("25-01").is_err());
        assert!(validate_month("2025-1").is_err());
        assert!(validate_month("2025/01").is_err());
        assert!(validate_month("").is_err());
    }
}
