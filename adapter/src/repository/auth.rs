use std::sync::Arc;

use async_trait::async_trait;
use derive_new::new;

use kernel::model::{auth::AccessToken, id::UserId};
use kernel::repository::auth::AuthRepository;
use shared::error::{AppError, AppResult};

use crate::redis::{RedisClient, RedisKey, RedisValue};

/// Key shape for access-token entries in the kv store. Tokens are issued by
/// the external identity provider; this side only resolves them.
pub struct AuthorizationKey(AccessToken);

impl From<&AccessToken> for AuthorizationKey {
    fn from(value: &AccessToken) -> Self {
        Self(value.clone())
    }
}

impl RedisKey for AuthorizationKey {
    type Value = AuthorizedUserId;

    fn inner(&self) -> String {
        format!("auth:token:{}", self.0 .0)
    }
}

#[derive(new)]
pub struct AuthorizedUserId(UserId);

impl AuthorizedUserId {
    pub fn into_inner(self) -> UserId {
        self.0
    }
}

impl RedisValue for AuthorizedUserId {
    fn inner(&self) -> String {
        self.0.to_string()
    }
}

impl TryFrom<String> for AuthorizedUserId {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse::<UserId>().map(Self)
    }
}

#[derive(new)]
pub struct AuthRepositoryImpl {
    kv: Arc<RedisClient>,
}

#[async_trait]
impl AuthRepository for AuthRepositoryImpl {
    async fn fetch_user_id_from_token(
        &self,
        access_token: &AccessToken,
    ) -> AppResult<Option<UserId>> {
        let key = AuthorizationKey::from(access_token);
        self.kv
            .get(&key)
            .await
            .map(|value| value.map(AuthorizedUserId::into_inner))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::config::RedisConfig;

    #[tokio::test]
    #[ignore = "requires a running redis"]
    async fn token_resolves_to_the_stored_user_id() -> anyhow::Result<()> {
        let kv = Arc::new(RedisClient::new(&RedisConfig {
            host: "localhost".into(),
            port: 6379,
        })?);
        let repo = AuthRepositoryImpl::new(kv.clone());

        let token = AccessToken(format!("test-{}", uuid::Uuid::new_v4()));
        let user_id = UserId::new();
        kv.set_ex(
            &AuthorizationKey::from(&token),
            &AuthorizedUserId::new(user_id),
            10,
        )
        .await?;

        let resolved = repo.fetch_user_id_from_token(&token).await?;
        assert_eq!(resolved, Some(user_id));

        let unknown = AccessToken(format!("test-{}", uuid::Uuid::new_v4()));
        assert_eq!(repo.fetch_user_id_from_token(&unknown).await?, None);
        Ok(())
    }
}
