//! Products service.

use async_trait::async_trait;
use mockall::automock;
use storefront::ids::ProductId;

use crate::{
    database::Db,
    domain::products::{
        errors::ProductsServiceError, models::Product, repository::PgProductsRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgProductsService {
    db: Db,
    repository: PgProductsRepository,
}

impl PgProductsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgProductsRepository::new(),
        }
    }
}

#[async_trait]
impl ProductsService for PgProductsService {
    #[tracing::instrument(
        name = "products.service.get_product",
        skip(self),
        fields(product_id = %product),
        err
    )]
    async fn get_product(&self, product: ProductId) -> Result<Product, ProductsServiceError> {
        let mut tx = self.db.begin().await?;

        let product = self.repository.get_product(&mut tx, product).await?;

        tx.commit().await?;

        Ok(product)
    }
}

#[automock]
#[async_trait]
pub trait ProductsService: Send + Sync {
    /// Retrieve the current catalog entry of a product.
    async fn get_product(&self, product: ProductId) -> Result<Product, ProductsServiceError>;
}
