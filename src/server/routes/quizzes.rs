use std::collections::HashSet;

use axum::{extract::State, routing::post, Json, Router};
use rand::{seq::SliceRandom, Rng};
use serde::{Deserialize, Serialize};

use crate::{
    db::{Question, Store},
    server::{app::AppState, deserializers::Stri64, error::ApiError, extractors::JsonBody},
    telemetry::QUIZ_DRAWS,
};

use super::ApiResponse;

/// Category id meaning "questions from every category".
const ALL_CATEGORIES: i64 = 0;

/// Only a JSON integer `0` selects every category; the string `"0"` names a
/// category id like any other and so matches nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
enum QuizCategoryId {
    Int(i64),
    Str(Stri64),
}

impl QuizCategoryId {
    fn value(self) -> i64 {
        match self {
            QuizCategoryId::Int(id) | QuizCategoryId::Str(Stri64(id)) => id,
        }
    }
}

#[derive(Deserialize)]
struct QuizCategory {
    id: QuizCategoryId,
}

#[derive(Deserialize)]
struct QuizRequest {
    quiz_category: QuizCategory,
    #[serde(default)]
    previous_questions: Vec<i64>,
}

#[derive(Serialize)]
struct QuizQuestion {
    success: bool,
    question: Question,
}

/// Drops every question the player has already seen.
pub(crate) fn candidate_pool(questions: Vec<Question>, previous: &[i64]) -> Vec<Question> {
    let seen: HashSet<i64> = previous.iter().copied().collect();
    questions
        .into_iter()
        .filter(|q| !seen.contains(&q.id))
        .collect()
}

/// Picks one question uniformly at random.
pub(crate) fn draw<'a, R>(pool: &'a [Question], rng: &mut R) -> Option<&'a Question>
where
    R: Rng + ?Sized,
{
    pool.choose(rng)
}

async fn next_question(
    State(store): State<Store>,
    JsonBody(request): JsonBody<QuizRequest>,
) -> ApiResponse<Json<QuizQuestion>> {
    let selected = request.quiz_category.id;
    let category = selected.value();
    let questions = match selected {
        QuizCategoryId::Int(ALL_CATEGORIES) => store.list_questions().await?,
        QuizCategoryId::Int(id) | QuizCategoryId::Str(Stri64(id)) if id > 0 => {
            store.questions_in_category(id).await?
        }
        _ => Vec::new(),
    };

    let pool = candidate_pool(questions, &request.previous_questions);
    let question = draw(&pool, &mut rand::thread_rng())
        .cloned()
        .ok_or(ApiError::Unprocessable)?;

    QUIZ_DRAWS
        .with_label_values(&[category.to_string().as_str()])
        .inc();
    tracing::debug!(
        "Drew question {} for category {category} from {} candidates",
        question.id,
        pool.len()
    );
    Ok(Json(QuizQuestion {
        success: true,
        question,
    }))
}

pub fn quizzes_router(state: AppState) -> Router {
    Router::new()
        .route("/quizzes", post(next_question))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    fn question(id: i64, category: i64) -> Question {
        Question {
            id,
            question: format!("question {id}"),
            answer: format!("answer {id}"),
            category,
            difficulty: 1,
        }
    }

    #[test]
    fn pool_excludes_previous_questions() {
        let questions = (1..=6).map(|id| question(id, 1)).collect();
        let pool = candidate_pool(questions, &[2, 4, 8]);
        let ids: Vec<i64> = pool.iter().map(|q| q.id).collect();
        assert_eq!(ids, vec![1, 3, 5, 6]);
    }

    #[test]
    fn empty_pool_draws_nothing() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(draw(&[], &mut rng).is_none());
        let exhausted = candidate_pool(vec![question(1, 1)], &[1]);
        assert!(draw(&exhausted, &mut rng).is_none());
    }

    #[test]
    fn draws_are_roughly_uniform() {
        let pool: Vec<Question> = (1..=4).map(|id| question(id, 2)).collect();
        let mut rng = StdRng::seed_from_u64(7);
        let mut counts: HashMap<i64, u32> = HashMap::new();
        for _ in 0..4000 {
            let q = draw(&pool, &mut rng).unwrap();
            *counts.entry(q.id).or_default() += 1;
        }
        assert_eq!(counts.len(), 4);
        for (id, count) in counts {
            assert!((800..1200).contains(&count), "question {id} drawn {count} times");
        }
    }

    #[test]
    fn quiz_request_accepts_string_category_and_missing_history() {
        let request: QuizRequest =
            serde_json::from_str(r#"{"quiz_category": {"id": "3", "type": "Geography"}}"#).unwrap();
        assert_eq!(request.quiz_category.id, QuizCategoryId::Str(Stri64(3)));
        assert!(request.previous_questions.is_empty());
    }

    #[test]
    fn only_integer_zero_means_every_category() {
        let id = |body: &str| {
            serde_json::from_str::<QuizRequest>(body)
                .unwrap()
                .quiz_category
                .id
        };
        assert_eq!(
            id(r#"{"quiz_category": {"id": 0}}"#),
            QuizCategoryId::Int(ALL_CATEGORIES)
        );
        assert_eq!(
            id(r#"{"quiz_category": {"id": "0"}}"#),
            QuizCategoryId::Str(Stri64(0))
        );
        assert!(serde_json::from_str::<QuizRequest>(r#"{"quiz_category": {"id": "x"}}"#).is_err());
    }
}
