//! Expense rows and the requests that create or change them.
//!
//! An `Expense` is one recorded outflow. Rows created by an installment
//! split additionally carry an [`InstallmentStamp`] so clients can group a
//! purchase back together.

use chrono::NaiveDate;
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};

use crate::{EngineError, ResultEngine};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub id: i64,
    pub user_id: String,
    pub category: String,
    /// Integer minor units (cents), always > 0.
    pub amount_minor: i64,
    pub date: NaiveDate,
    pub description: Option<String>,
    pub installments: Option<u32>,
    pub installment_number: Option<u32>,
    pub original_purchase_date: Option<NaiveDate>,
}

/// Links a row back to the installment batch that produced it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallmentStamp {
    pub count: u32,
    /// 1-based position within the batch.
    pub number: u32,
    pub purchase_date: NaiveDate,
}

/// A validated expense-creation request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewExpense {
    pub category: String,
    pub amount_minor: i64,
    pub date: NaiveDate,
    pub description: Option<String>,
    pub installment: Option<InstallmentStamp>,
}

impl NewExpense {
    pub fn new(
        category: &str,
        amount_minor: i64,
        date: NaiveDate,
        description: Option<String>,
    ) -> ResultEngine<Self> {
        let category = validate_category(category)?;
        validate_amount(amount_minor)?;
        Ok(Self {
            category,
            amount_minor,
            date,
            description,
            installment: None,
        })
    }
}

/// Partial update; `None` fields are left untouched.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExpenseChanges {
    pub category: Option<String>,
    pub amount_minor: Option<i64>,
    pub date: Option<NaiveDate>,
    pub description: Option<String>,
}

impl ExpenseChanges {
    pub fn is_empty(&self) -> bool {
        self.category.is_none()
            && self.amount_minor.is_none()
            && self.date.is_none()
            && self.description.is_none()
    }

    pub(crate) fn validate(&self) -> ResultEngine<()> {
        if let Some(category) = &self.category {
            validate_category(category)?;
        }
        if let Some(amount_minor) = self.amount_minor {
            validate_amount(amount_minor)?;
        }
        Ok(())
    }
}

pub(crate) fn validate_category(category: &str) -> ResultEngine<String> {
    let trimmed = category.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidCategory(
            "category must not be empty".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}

pub(crate) fn validate_amount(amount_minor: i64) -> ResultEngine<()> {
    if amount_minor <= 0 {
        return Err(EngineError::InvalidAmount(
            "amount_minor must be > 0".to_string(),
        ));
    }
    Ok(())
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: String,
    pub category: String,
    pub amount_minor: i64,
    pub date: Date,
    pub description: Option<String>,
    pub installments: Option<i32>,
    pub installment_number: Option<i32>,
    pub original_purchase_date: Option<Date>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Row for a creation request; the id is assigned by the store.
pub(crate) fn new_row(owner: &str, new: &NewExpense) -> ActiveModel {
    ActiveModel {
        id: ActiveValue::NotSet,
        user_id: ActiveValue::Set(owner.to_string()),
        category: ActiveValue::Set(new.category.clone()),
        amount_minor: ActiveValue::Set(new.amount_minor),
        date: ActiveValue::Set(new.date),
        description: ActiveValue::Set(new.description.clone()),
        installments: ActiveValue::Set(new.installment.map(|s| s.count as i32)),
        installment_number: ActiveValue::Set(new.installment.map(|s| s.number as i32)),
        original_purchase_date: ActiveValue::Set(new.installment.map(|s| s.purchase_date)),
    }
}

impl From<Model> for Expense {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            category: model.category,
            amount_minor: model.amount_minor,
            date: model.date,
            description: model.description,
            installments: model.installments.map(|n| n as u32),
            installment_number: model.installment_number.map(|n| n as u32),
            original_purchase_date: model.original_purchase_date,
        }
    }
}
