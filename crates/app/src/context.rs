//! App Context

use std::sync::Arc;

use thiserror::Error;

use crate::{
    config::{CartStoreArgs, DatabaseArgs},
    database::{self, Db},
    domain::{
        carts::{CartStore, CartStoreError, CartsService, RedisCartStore, StoreCartsService},
        orders::{OrdersService, PgOrdersService},
        products::{PgProductsService, ProductsService},
        profiles::{PgProfilesService, ProfilesService},
        promotions::{PgPromotionsService, PromotionsService},
    },
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),

    #[error("failed to connect to cart store")]
    CartStore(#[source] CartStoreError),
}

#[derive(Clone)]
pub struct AppContext {
    pub carts: Arc<dyn CartsService>,
    pub products: Arc<dyn ProductsService>,
    pub promotions: Arc<dyn PromotionsService>,
    pub profiles: Arc<dyn ProfilesService>,
    pub orders: Arc<dyn OrdersService>,
}

impl AppContext {
    /// Build application context from the database and cart store settings.
    ///
    /// # Errors
    ///
    /// Returns an error when connecting to either store fails.
    pub async fn connect(
        database: &DatabaseArgs,
        cart_store: &CartStoreArgs,
    ) -> Result<Self, AppInitError> {
        let pool = database::connect(&database.database_url)
            .await
            .map_err(AppInitError::Database)?;

        let store: Arc<dyn CartStore> = Arc::new(
            RedisCartStore::connect(&cart_store.redis_url, &cart_store.cart_key_prefix)
                .await
                .map_err(AppInitError::CartStore)?,
        );

        Ok(Self::from_parts(Db::new(pool), store))
    }

    /// Wire services over an open database and cart store.
    #[must_use]
    pub fn from_parts(db: Db, store: Arc<dyn CartStore>) -> Self {
        let products: Arc<dyn ProductsService> = Arc::new(PgProductsService::new(db.clone()));
        let promotions: Arc<dyn PromotionsService> =
            Arc::new(PgPromotionsService::new(db.clone()));
        let profiles: Arc<dyn ProfilesService> = Arc::new(PgProfilesService::new(db.clone()));

        Self {
            carts: Arc::new(StoreCartsService::new(store.clone(), products.clone())),
            orders: Arc::new(PgOrdersService::new(
                db,
                store,
                promotions.clone(),
                profiles.clone(),
            )),
            products,
            promotions,
            profiles,
        }
    }
}
