//! Category API endpoints

use api_types::category::CategoriesResponse;
use axum::Json;
use engine::SUGGESTED_CATEGORIES;

/// Returns the suggested category labels, in their canonical order.
pub async fn list() -> Json<CategoriesResponse> {
    Json(CategoriesResponse {
        categories: SUGGESTED_CATEGORIES.iter().map(|c| c.to_string()).collect(),
    })
}
