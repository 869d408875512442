use super::ConnectionPool;
use crate::shared::error::AppError;

mod bookmarks;
mod filter;
mod interactions;
mod mapper;
mod posts;
mod queries;
mod trending;

pub struct SqliteRepository {
    pool: ConnectionPool,
}

impl SqliteRepository {
    pub fn new(pool: ConnectionPool) -> Self {
        Self { pool }
    }

    pub async fn initialize(&self) -> Result<(), AppError> {
        self.pool.migrate().await?;
        Ok(())
    }

    pub async fn health_check(&self) -> Result<bool, AppError> {
        let result = sqlx::query("SELECT 1")
            .fetch_one(self.pool.get_pool())
            .await;
        Ok(result.is_ok())
    }
}

#[cfg(test)]
pub(crate) async fn memory_repository() -> SqliteRepository {
    let pool = ConnectionPool::from_memory()
        .await
        .expect("failed to create pool");
    let repository = SqliteRepository::new(pool);
    repository
        .initialize()
        .await
        .expect("failed to run migrations");
    repository
}
