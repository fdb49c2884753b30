use std::collections::BTreeMap;

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::{
    db::{Category, Question, Store},
    server::{app::AppState, error::ApiError, extractors::IdPath},
};

use super::ApiResponse;

/// Category id to label, serialized as a JSON object keyed by id.
pub(super) type CategoryMap = BTreeMap<i64, String>;

pub(super) fn category_map(categories: Vec<Category>) -> CategoryMap {
    categories.into_iter().map(|c| (c.id, c.kind)).collect()
}

#[derive(Serialize)]
struct CategoriesList {
    success: bool,
    categories: CategoryMap,
}

#[derive(Serialize)]
struct CategoryQuestions {
    success: bool,
    questions: Vec<Question>,
    total_questions: i64,
    // null when the questions point at a category that no longer exists
    current_category: Option<Category>,
}

async fn get_categories(State(store): State<Store>) -> ApiResponse<Json<CategoriesList>> {
    let categories = category_map(store.list_categories().await?);
    if categories.is_empty() {
        return Err(ApiError::NotFound);
    }
    Ok(Json(CategoriesList {
        success: true,
        categories,
    }))
}

async fn questions_by_category(
    State(store): State<Store>,
    IdPath(id): IdPath,
) -> ApiResponse<Json<CategoryQuestions>> {
    let questions = store.questions_in_category(id).await?;
    if questions.is_empty() {
        return Err(ApiError::NotFound);
    }
    let current_category = store.get_category(id).await?;
    if current_category.is_none() {
        tracing::warn!("Questions reference missing category {id}");
    }
    Ok(Json(CategoryQuestions {
        success: true,
        questions,
        total_questions: store.count_questions().await?,
        current_category,
    }))
}

pub fn category_router(state: AppState) -> Router {
    Router::new()
        .route("/categories", get(get_categories))
        .route("/categories/{id}/questions", get(questions_by_category))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_map_serializes_ids_as_keys() {
        let map = category_map(vec![
            Category {
                id: 2,
                kind: "Art".into(),
            },
            Category {
                id: 1,
                kind: "Science".into(),
            },
        ]);
        assert_eq!(
            serde_json::to_string(&map).unwrap(),
            r#"{"1":"Science","2":"Art"}"#
        );
    }
}
