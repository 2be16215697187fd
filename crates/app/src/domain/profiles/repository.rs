//! Profiles Repository

use sqlx::{Postgres, Transaction, query_as};
use storefront::{ids::UserId, orders::Recipient};

use crate::database::encode_id;

const GET_RECIPIENT_SQL: &str = include_str!("sql/get_recipient.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgProfilesRepository;

impl PgProfilesRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn get_recipient(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserId,
    ) -> Result<Recipient, sqlx::Error> {
        let (first_name, last_name, email): (String, String, String) =
            query_as(GET_RECIPIENT_SQL)
                .bind(encode_id(user)?)
                .fetch_one(&mut **tx)
                .await?;

        Ok(Recipient {
            first_name,
            last_name,
            email,
        })
    }
}
