pub mod queries;

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use sqlx::migrate::MigrateError;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Error;

pub use queries::categories::Category;
pub use queries::questions::{NewQuestion, Question};

/// Shared handle to the persistence layer, as held by the HTTP state.
pub type Store = Arc<dyn TriviaStore>;

pub async fn establish_connection(path: &Path, max_connections: u32) -> Result<SqlitePool, Error> {
    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true);
    SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await
}

pub async fn run_migrations(pool: &SqlitePool) -> Result<(), MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// Operations the request handlers need from storage.
#[async_trait]
pub trait TriviaStore: Send + Sync {
    /// All categories ordered by id.
    async fn list_categories(&self) -> Result<Vec<Category>, Error>;
    async fn get_category(&self, id: i64) -> Result<Option<Category>, Error>;
    /// All questions ordered by id.
    async fn list_questions(&self) -> Result<Vec<Question>, Error>;
    async fn count_questions(&self) -> Result<i64, Error>;
    async fn questions_in_category(&self, category: i64) -> Result<Vec<Question>, Error>;
    async fn search_questions(&self, term: &str) -> Result<Vec<Question>, Error>;
    async fn get_question(&self, id: i64) -> Result<Option<Question>, Error>;
    async fn create_question(&self, new: &NewQuestion) -> Result<Question, Error>;
    /// Returns `false` if there was nothing to delete.
    async fn delete_question(&self, id: i64) -> Result<bool, Error>;
}

/// [`TriviaStore`] backed by a SQLite pool.
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl TriviaStore for SqliteStore {
    async fn list_categories(&self) -> Result<Vec<Category>, Error> {
        queries::categories::get_all_categories(&self.pool).await
    }

    async fn get_category(&self, id: i64) -> Result<Option<Category>, Error> {
        queries::categories::get_category(&self.pool, id).await
    }

    async fn list_questions(&self) -> Result<Vec<Question>, Error> {
        queries::questions::get_all_questions(&self.pool).await
    }

    async fn count_questions(&self) -> Result<i64, Error> {
        queries::questions::count_questions(&self.pool).await
    }

    async fn questions_in_category(&self, category: i64) -> Result<Vec<Question>, Error> {
        queries::questions::get_questions_for_category(&self.pool, category).await
    }

    async fn search_questions(&self, term: &str) -> Result<Vec<Question>, Error> {
        queries::questions::search_questions(&self.pool, term).await
    }

    async fn get_question(&self, id: i64) -> Result<Option<Question>, Error> {
        queries::questions::get_question_by_id(&self.pool, id).await
    }

    async fn create_question(&self, new: &NewQuestion) -> Result<Question, Error> {
        queries::questions::create_question(&self.pool, new).await
    }

    async fn delete_question(&self, id: i64) -> Result<bool, Error> {
        queries::questions::delete_question(&self.pool, id).await
    }
}
