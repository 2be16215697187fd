//! Profiles service.

use async_trait::async_trait;
use mockall::automock;
use storefront::{ids::UserId, orders::Recipient};

use crate::{
    database::Db,
    domain::profiles::{errors::ProfilesServiceError, repository::PgProfilesRepository},
};

#[derive(Debug, Clone)]
pub struct PgProfilesService {
    db: Db,
    repository: PgProfilesRepository,
}

impl PgProfilesService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgProfilesRepository::new(),
        }
    }
}

#[async_trait]
impl ProfilesService for PgProfilesService {
    #[tracing::instrument(
        name = "profiles.service.get_recipient",
        skip(self),
        fields(user_id = %user),
        err
    )]
    async fn get_recipient(&self, user: UserId) -> Result<Recipient, ProfilesServiceError> {
        let mut tx = self.db.begin().await?;

        let recipient = self.repository.get_recipient(&mut tx, user).await?;

        tx.commit().await?;

        Ok(recipient)
    }
}

#[automock]
#[async_trait]
pub trait ProfilesService: Send + Sync {
    /// Name and e-mail orders of `user` are addressed to.
    async fn get_recipient(&self, user: UserId) -> Result<Recipient, ProfilesServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::test::TestContext;

    use super::*;

    #[tokio::test]
    async fn get_recipient_reads_profile() -> TestResult {
        let ctx = TestContext::new().await;

        let user = ctx.create_user("Ivan", "Petrov", "ivan@example.com").await?;

        let recipient = ctx.profiles.get_recipient(user).await?;

        assert_eq!(recipient.first_name, "Ivan");
        assert_eq!(recipient.last_name, "Petrov");
        assert_eq!(recipient.email, "ivan@example.com");

        Ok(())
    }

    #[tokio::test]
    async fn get_recipient_unknown_user_returns_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx.profiles.get_recipient(UserId::new(404)).await;

        assert!(
            matches!(result, Err(ProfilesServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }
}
