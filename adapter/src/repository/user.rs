use async_trait::async_trait;
use derive_new::new;

use kernel::model::{id::UserId, user::User};
use kernel::repository::user::UserRepository;
use shared::error::{AppError, AppResult};

use crate::database::{model::user::UserRow, ConnectionPool};

#[derive(new)]
pub struct UserRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl UserRepository for UserRepositoryImpl {
    async fn find_current_user(&self, current_user_id: UserId) -> AppResult<Option<User>> {
        let row: Option<UserRow> =
            sqlx::query_as("SELECT user_id, name, email, role FROM users WHERE user_id = $1")
                .bind(current_user_id)
                .fetch_optional(self.db.inner_ref())
                .await
                .map_err(AppError::SpecificOperationError)?;

        row.map(User::try_from).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kernel::model::role::Role;

    #[sqlx::test(migrations = "../migrations")]
    async fn current_user_carries_its_role(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let repo = UserRepositoryImpl::new(ConnectionPool::new(pool.clone()));

        let id = UserId::new();
        sqlx::query(
            "INSERT INTO users (user_id, name, email, role) VALUES ($1, 'Malee', $2, 'admin')",
        )
        .bind(id)
        .bind(format!("{id}@example.com"))
        .execute(&pool)
        .await?;

        let user = repo.find_current_user(id).await?.unwrap();
        assert_eq!(user.name, "Malee");
        assert_eq!(user.role, Role::Admin);

        assert!(repo.find_current_user(UserId::new()).await?.is_none());
        Ok(())
    }
}
