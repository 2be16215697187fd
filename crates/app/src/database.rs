//! Database connection management

use sqlx::{
    Connection, PgPool, Postgres, Row, Transaction, migrate::MigrateError, pool::PoolConnection,
    postgres::PgRow, query, query_scalar,
};
use storefront::ids::{TypedId, UserId};
use tracing::warn;

/// SQL used to serialize checkouts of a single user.
const CHECKOUT_LOCK_SQL: &str = "SELECT pg_advisory_lock($1)";

const CHECKOUT_UNLOCK_SQL: &str = "SELECT pg_advisory_unlock($1)";

#[derive(Debug, Clone)]
pub struct Db {
    pool: PgPool,
}

impl Db {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Begin a transaction.
    ///
    /// # Errors
    ///
    /// Returns an error when no connection can be acquired or `BEGIN` fails.
    pub async fn begin(&self) -> Result<Transaction<'static, Postgres>, sqlx::Error> {
        self.pool.begin().await
    }

    /// Take the checkout lock of `user`, waiting for any checkout of the same user
    /// that already holds it. The lock owns one pooled connection until released.
    ///
    /// # Errors
    ///
    /// Returns an error when the user id does not fit the lock key, no connection
    /// can be acquired or the lock cannot be taken.
    pub async fn lock_checkout(&self, user: UserId) -> Result<CheckoutLock, sqlx::Error> {
        let key = encode_id(user)?;

        let mut conn = self.pool.acquire().await?;

        query(CHECKOUT_LOCK_SQL).bind(key).execute(&mut *conn).await?;

        Ok(CheckoutLock {
            user,
            key,
            conn,
            held: true,
        })
    }
}

/// Session advisory lock on a user's checkout, held on the connection that also
/// runs the checkout's writes.
///
/// A lock dropped without [`CheckoutLock::release`] closes its connection instead
/// of returning it to the pool, which ends the session and the lock with it.
#[derive(Debug)]
pub struct CheckoutLock {
    user: UserId,
    key: i64,
    conn: PoolConnection<Postgres>,
    held: bool,
}

impl CheckoutLock {
    /// Begin a transaction on the locked connection.
    ///
    /// # Errors
    ///
    /// Returns an error when `BEGIN` fails.
    pub async fn begin(&mut self) -> Result<Transaction<'_, Postgres>, sqlx::Error> {
        Connection::begin(&mut *self.conn).await
    }

    /// Release the lock and return the connection to the pool.
    pub async fn release(mut self) {
        let unlocked = query_scalar::<_, bool>(CHECKOUT_UNLOCK_SQL)
            .bind(self.key)
            .fetch_one(&mut *self.conn)
            .await;

        match unlocked {
            Ok(true) => self.held = false,
            Ok(false) => {
                self.held = false;
                warn!(user_id = %self.user, "checkout lock was not held");
            }
            Err(error) => {
                warn!(user_id = %self.user, %error, "failed to release checkout lock");
            }
        }
    }
}

impl Drop for CheckoutLock {
    fn drop(&mut self) {
        if self.held {
            self.conn.close_on_drop();
        }
    }
}

/// Connect to `PostgreSQL`.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPool::connect(database_url).await
}

/// Apply pending schema migrations.
///
/// # Errors
///
/// Returns an error if a migration fails to apply.
pub async fn migrate(pool: &PgPool) -> Result<(), MigrateError> {
    sqlx::migrate!("../../migrations").run(pool).await
}

/// Bind form of a typed id.
pub(crate) fn encode_id<T>(id: TypedId<T>) -> Result<i64, sqlx::Error> {
    id.try_into_i64().map_err(|e| sqlx::Error::Encode(Box::new(e)))
}

/// Bind form of an amount in minor units.
pub(crate) fn encode_amount(amount: u64) -> Result<i64, sqlx::Error> {
    i64::try_from(amount).map_err(|e| sqlx::Error::Encode(Box::new(e)))
}

pub(crate) fn try_get_id<T>(row: &PgRow, column: &str) -> sqlx::Result<TypedId<T>> {
    let value: i64 = row.try_get(column)?;

    TypedId::try_from_i64(value).map_err(|e| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}

pub(crate) fn try_get_amount(row: &PgRow, column: &str) -> sqlx::Result<u64> {
    let value: i64 = row.try_get(column)?;

    u64::try_from(value).map_err(|e| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}
