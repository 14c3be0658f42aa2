use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::EngineError;

use serde::Serialize;
pub use server::{run, run_with_listener, spawn_with_listener};

mod budget;
mod categories;
mod expenses;
mod server;
mod summary;
mod user;

pub mod types {
    pub mod expense {
        pub use api_types::expense::{
            ExpenseDeleted, ExpenseNew, ExpenseUpdate, ExpenseView, InstallmentNew,
        };
    }

    pub mod budget {
        pub use api_types::budget::{BudgetSet, BudgetView};
    }

    pub mod summary {
        pub use api_types::summary::{BudgetSummaryView, CategoryTotalView, SavingSuggestionView};
    }

    pub mod statement {
        pub use api_types::statement::{MonthView, StatementQuery, StatementResponse};
    }

    pub mod category {
        pub use api_types::category::CategoriesResponse;
    }
}

pub enum ServerError {
    Engine(EngineError),
    Generic(String),
}

#[derive(Serialize)]
struct Error {
    error: String,
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::KeyNotFound(_) => StatusCode::NOT_FOUND,
        EngineError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        EngineError::InvalidAmount(_)
        | EngineError::InvalidDate(_)
        | EngineError::InvalidCategory(_)
        | EngineError::InvalidInstallments(_) => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ServerError::Engine(err) => {
                (status_for_engine_error(&err), message_for_engine_error(err))
            }
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, err),
        };

        (status, Json(Error { error })).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}
