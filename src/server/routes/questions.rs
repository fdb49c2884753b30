use std::collections::HashMap;

use axum::{
    extract::{FromRequest, Request, State},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::{
    db::{NewQuestion, Question, Store},
    server::{
        app::AppState,
        deserializers::{deserialize_page, first_page, Stri64},
        error::ApiError,
        extractors::{IdPath, JsonBody, QueryParams},
    },
    telemetry::{QUESTIONS_CREATED, QUESTIONS_DELETED},
};

use super::categories::{category_map, CategoryMap};
use super::ApiResponse;

pub const QUESTIONS_PER_PAGE: usize = 10;

#[derive(Deserialize)]
struct PageQuery {
    #[serde(default = "first_page", deserialize_with = "deserialize_page")]
    page: i64,
}

#[derive(Deserialize)]
struct NewQuestionBody {
    question: String,
    answer: String,
    category: Stri64,
    difficulty: Stri64,
}

impl From<NewQuestionBody> for NewQuestion {
    fn from(body: NewQuestionBody) -> Self {
        NewQuestion {
            question: body.question,
            answer: body.answer,
            category: body.category.0,
            difficulty: body.difficulty.0,
        }
    }
}

#[derive(Deserialize)]
struct SearchBody {
    #[serde(alias = "searchTerm")]
    search_term: String,
}

#[derive(Serialize)]
struct QuestionsPage {
    success: bool,
    questions: Vec<Question>,
    total_questions: i64,
    current_category: &'static str,
    categories: CategoryMap,
}

#[derive(Serialize)]
struct SearchResults {
    success: bool,
    questions: Vec<Question>,
    total_questions: i64,
    current_category: &'static str,
}

#[derive(Serialize)]
struct QuestionCreated {
    success: bool,
    created: i64,
    question: Question,
}

#[derive(Serialize)]
struct QuestionDeleted {
    success: bool,
    deleted: i64,
}

/// Returns the `page`-th slice of `QUESTIONS_PER_PAGE` items. Pages before the first are empty.
pub(crate) fn paginate<T>(items: Vec<T>, page: i64) -> Vec<T> {
    if page < 1 {
        return Vec::new();
    }
    let start = usize::try_from(page - 1)
        .unwrap_or(usize::MAX)
        .saturating_mul(QUESTIONS_PER_PAGE);
    items
        .into_iter()
        .skip(start)
        .take(QUESTIONS_PER_PAGE)
        .collect()
}

async fn list_questions(
    State(store): State<Store>,
    QueryParams(query): QueryParams<PageQuery>,
) -> ApiResponse<Json<QuestionsPage>> {
    let all = store.list_questions().await?;
    let total_questions = all.len() as i64;
    let questions = paginate(all, query.page);
    let categories = category_map(store.list_categories().await?);

    if questions.is_empty() || categories.is_empty() {
        return Err(ApiError::NotFound);
    }
    Ok(Json(QuestionsPage {
        success: true,
        questions,
        total_questions,
        current_category: "",
        categories,
    }))
}

async fn search_questions(store: &Store, term: &str) -> ApiResponse<SearchResults> {
    let questions = store.search_questions(term).await?;
    if questions.is_empty() {
        return Err(ApiError::Unprocessable);
    }
    Ok(SearchResults {
        success: true,
        questions,
        total_questions: store.count_questions().await?,
        current_category: "",
    })
}

async fn create_question(store: &Store, body: NewQuestionBody) -> ApiResponse<QuestionCreated> {
    let question = store
        .create_question(&body.into())
        .await
        .map_err(|err| {
            tracing::warn!("Failed to persist question: {err}");
            ApiError::Unprocessable
        })?;
    QUESTIONS_CREATED.inc();
    tracing::info!("Created question {}", question.id);
    Ok(QuestionCreated {
        success: true,
        created: question.id,
        question,
    })
}

// Any query string turns the request into a search, otherwise the body is a new question.
async fn create_or_search(
    State(store): State<Store>,
    QueryParams(params): QueryParams<HashMap<String, String>>,
    request: Request,
) -> ApiResponse<Response> {
    if !params.is_empty() {
        let term = params.get("term").ok_or(ApiError::BadRequest)?;
        return Ok(Json(search_questions(&store, term).await?).into_response());
    }
    let JsonBody(body) = JsonBody::<NewQuestionBody>::from_request(request, &()).await?;
    Ok(Json(create_question(&store, body).await?).into_response())
}

async fn search(
    State(store): State<Store>,
    JsonBody(body): JsonBody<SearchBody>,
) -> ApiResponse<Json<SearchResults>> {
    Ok(Json(search_questions(&store, &body.search_term).await?))
}

async fn delete_question(
    State(store): State<Store>,
    IdPath(id): IdPath,
) -> ApiResponse<Json<QuestionDeleted>> {
    if !store.delete_question(id).await? {
        return Err(ApiError::Unprocessable);
    }
    QUESTIONS_DELETED.inc();
    tracing::info!("Deleted question {id}");
    Ok(Json(QuestionDeleted {
        success: true,
        deleted: id,
    }))
}

pub fn questions_router(state: AppState) -> Router {
    Router::new()
        .route("/questions", get(list_questions).post(create_or_search))
        .route("/questions/search", post(search))
        .route("/questions/{id}", delete(delete_question))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paginate_slices_by_ten() {
        let items: Vec<i32> = (1..=25).collect();
        assert_eq!(paginate(items.clone(), 1), (1..=10).collect::<Vec<_>>());
        assert_eq!(paginate(items.clone(), 3), vec![21, 22, 23, 24, 25]);
        assert!(paginate(items.clone(), 4).is_empty());
        assert!(paginate(items.clone(), 1000).is_empty());
        assert!(paginate(items.clone(), i64::MAX).is_empty());
    }

    #[test]
    fn paginate_rejects_pages_before_first() {
        let items: Vec<i32> = (1..=25).collect();
        assert!(paginate(items.clone(), 0).is_empty());
        assert!(paginate(items, -1).is_empty());
    }

    #[test]
    fn new_question_body_requires_every_field() {
        let missing = serde_json::from_str::<NewQuestionBody>(r#"{"question": "q", "answer": "a"}"#);
        assert!(missing.is_err());

        let body: NewQuestionBody = serde_json::from_str(
            r#"{"question": "q", "answer": "a", "category": "2", "difficulty": 4}"#,
        )
        .unwrap();
        let new: NewQuestion = body.into();
        assert_eq!(new.category, 2);
        assert_eq!(new.difficulty, 4);
    }
}
