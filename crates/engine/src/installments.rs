//! Installment purchase splitting.
//!
//! A single purchase is split into N dated expense-creation requests whose
//! amounts always sum exactly to the purchase total.

use chrono::{Months, NaiveDate};

use crate::{
    EngineError, ResultEngine,
    expenses::{InstallmentStamp, NewExpense, validate_amount, validate_category},
};

pub const MAX_INSTALLMENTS: u32 = 36;

/// A validated request to split one purchase into installment rows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InstallmentPlan {
    pub category: String,
    /// Total purchase amount in minor units.
    pub total_minor: i64,
    pub count: u32,
    pub purchase_date: NaiveDate,
    pub description: Option<String>,
}

impl InstallmentPlan {
    pub fn new(
        category: &str,
        total_minor: i64,
        count: u32,
        purchase_date: NaiveDate,
        description: Option<String>,
    ) -> ResultEngine<Self> {
        let category = validate_category(category)?;
        validate_amount(total_minor)?;
        if !(1..=MAX_INSTALLMENTS).contains(&count) {
            return Err(EngineError::InvalidInstallments(format!(
                "installments must be between 1 and {MAX_INSTALLMENTS}, got {count}"
            )));
        }
        // Every row must keep the amount > 0 invariant.
        if total_minor < i64::from(count) {
            return Err(EngineError::InvalidAmount(format!(
                "total of {total_minor} cannot be split into {count} positive installments"
            )));
        }
        Ok(Self {
            category,
            total_minor,
            count,
            purchase_date,
            description,
        })
    }

    /// Builds the creation requests for the whole batch, in installment order.
    ///
    /// Each row carries `total / count` (truncating division); the rounding
    /// remainder goes on the last row, so the batch sums exactly to the
    /// total. Row `i` is dated `i` calendar months after the purchase date,
    /// with the day clamped to the last day of the target month
    /// (`2025-01-31` + 1 month = `2025-02-28`).
    pub fn split(&self) -> ResultEngine<Vec<NewExpense>> {
        let count = i64::from(self.count);
        let base = self.total_minor / count;
        let remainder = self.total_minor - base * count;

        let mut requests = Vec::with_capacity(self.count as usize);
        for i in 0..self.count {
            let amount_minor = if i == self.count - 1 {
                base + remainder
            } else {
                base
            };
            let date = self
                .purchase_date
                .checked_add_months(Months::new(i))
                .ok_or_else(|| {
                    EngineError::InvalidDate(format!(
                        "installment date out of range: {} + {i} months",
                        self.purchase_date
                    ))
                })?;
            let number = i + 1;
            let description = Some(match &self.description {
                Some(text) => format!("{text} ({number}/{})", self.count),
                None => format!("Parcela {number}/{}", self.count),
            });

            requests.push(NewExpense {
                category: self.category.clone(),
                amount_minor,
                date,
                description,
                installment: Some(InstallmentStamp {
                    count: self.count,
                    number,
                    purchase_date: self.purchase_date,
                }),
            });
        }

        Ok(requests)
    }
}
