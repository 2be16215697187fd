//! Carts service.

use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use storefront::{
    cart::{CartLine, PricedCart, PricedCartLine},
    ids::{ProductId, UserId},
};
use tracing::{Span, info};

use crate::domain::{
    carts::{
        errors::{CartStoreError, CartsServiceError},
        store::CartStore,
    },
    products::{ProductsService, ProductsServiceError, models::Product},
};

/// Carts service pricing a [`CartStore`] against the catalog.
#[derive(Clone)]
pub struct StoreCartsService {
    store: Arc<dyn CartStore>,
    products: Arc<dyn ProductsService>,
}

impl StoreCartsService {
    #[must_use]
    pub fn new(store: Arc<dyn CartStore>, products: Arc<dyn ProductsService>) -> Self {
        Self { store, products }
    }

    async fn product(&self, product: ProductId) -> Result<Product, CartsServiceError> {
        self.products
            .get_product(product)
            .await
            .map_err(|error| match error {
                ProductsServiceError::NotFound => CartsServiceError::ProductNotFound(product),
                other => CartsServiceError::Catalog(other),
            })
    }

    async fn load_lines(&self, user: UserId) -> Result<Vec<CartLine>, CartsServiceError> {
        match self.store.get_cart(user).await {
            Ok(lines) => Ok(lines),
            Err(CartStoreError::NotFound) => Ok(Vec::new()),
            Err(error) => Err(CartsServiceError::Store(error)),
        }
    }
}

#[async_trait]
impl CartsService for StoreCartsService {
    #[tracing::instrument(
        name = "carts.service.get_preview_cart",
        skip(self),
        fields(
            user_id = %user,
            line_count = tracing::field::Empty,
            total_cost = tracing::field::Empty
        ),
        err
    )]
    async fn get_preview_cart(&self, user: UserId) -> Result<PricedCart, CartsServiceError> {
        let lines = self.load_lines(user).await?;

        let mut priced = Vec::with_capacity(lines.len());

        for line in lines {
            let product = self.product(line.product()).await?;

            priced.push(PricedCartLine {
                product: product.id,
                preview_image: product.preview_image().map(str::to_string),
                title: product.title,
                quantity: line.quantity(),
                price: product.price,
            });
        }

        priced.sort_by_key(|line| line.product);

        let cart = PricedCart::from_lines(priced)?;

        let span = Span::current();

        span.record("line_count", cart.lines().len());
        span.record("total_cost", cart.totals().total_cost());

        Ok(cart)
    }

    #[tracing::instrument(
        name = "carts.service.add_product",
        skip(self),
        fields(user_id = %user, product_id = %product),
        err
    )]
    async fn add_product(
        &self,
        user: UserId,
        product: ProductId,
        count: u64,
    ) -> Result<(), CartsServiceError> {
        let added = CartLine::new(product, count)?;

        self.product(product).await?;

        let mut lines = self.load_lines(user).await?;

        match lines.iter_mut().find(|line| line.product() == product) {
            Some(line) => {
                let quantity = line
                    .quantity()
                    .checked_add(count)
                    .ok_or(CartsServiceError::QuantityOverflow)?;

                *line = CartLine::new(product, quantity)?;
            }
            None => lines.push(added),
        }

        self.store.put_cart(user, lines).await?;

        info!(user_id = %user, product_id = %product, count, "added product to cart");

        Ok(())
    }

    #[tracing::instrument(
        name = "carts.service.change_product",
        skip(self),
        fields(user_id = %user, product_id = %product),
        err
    )]
    async fn change_product(
        &self,
        user: UserId,
        product: ProductId,
        count: u64,
    ) -> Result<(), CartsServiceError> {
        let mut lines = self.load_lines(user).await?;

        let Some(line) = lines.iter_mut().find(|line| line.product() == product) else {
            return Err(CartsServiceError::ProductNotInCart(product));
        };

        if count == 0 {
            lines.retain(|line| line.product() != product);
        } else {
            *line = CartLine::new(product, count)?;
        }

        self.store.put_cart(user, lines).await?;

        Ok(())
    }

    #[tracing::instrument(
        name = "carts.service.delete_product",
        skip(self),
        fields(user_id = %user, product_id = %product),
        err
    )]
    async fn delete_product(
        &self,
        user: UserId,
        product: ProductId,
    ) -> Result<(), CartsServiceError> {
        let mut lines = self.load_lines(user).await?;

        let before = lines.len();

        lines.retain(|line| line.product() != product);

        if lines.len() == before {
            return Err(CartsServiceError::ProductNotInCart(product));
        }

        self.store.put_cart(user, lines).await?;

        Ok(())
    }

    #[tracing::instrument(
        name = "carts.service.delete_cart",
        skip(self),
        fields(user_id = %user),
        err
    )]
    async fn delete_cart(&self, user: UserId) -> Result<(), CartsServiceError> {
        if !self.store.delete_cart(user).await? {
            return Err(CartsServiceError::NotFound);
        }

        info!(user_id = %user, "deleted cart");

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait CartsService: Send + Sync {
    /// Price the user's cart against the current catalog. A user without a cart
    /// gets an empty cart.
    async fn get_preview_cart(&self, user: UserId) -> Result<PricedCart, CartsServiceError>;

    /// Add `count` units of a product, creating the cart or line when missing.
    async fn add_product(
        &self,
        user: UserId,
        product: ProductId,
        count: u64,
    ) -> Result<(), CartsServiceError>;

    /// Set the quantity of a line already in the cart. Zero removes the line.
    async fn change_product(
        &self,
        user: UserId,
        product: ProductId,
        count: u64,
    ) -> Result<(), CartsServiceError>;

    /// Remove a line. Removing the last line removes the cart.
    async fn delete_product(
        &self,
        user: UserId,
        product: ProductId,
    ) -> Result<(), CartsServiceError>;

    /// Remove the user's cart.
    async fn delete_cart(&self, user: UserId) -> Result<(), CartsServiceError>;
}

#[cfg(test)]
mod tests {
    use mockall::predicate::eq;
    use storefront::pricing::UnitPrice;
    use testresult::TestResult;

    use crate::domain::{carts::store::MockCartStore, products::MockProductsService};

    use super::*;

    const USER: UserId = UserId::new(1);
    const PRODUCT_A: ProductId = ProductId::new(10);
    const PRODUCT_B: ProductId = ProductId::new(20);

    fn catalog() -> MockProductsService {
        let mut products = MockProductsService::new();

        products.expect_get_product().returning(|id| match id.into_inner() {
            10 => Ok(Product {
                id,
                title: "Product A".to_string(),
                images: vec!["a.png".to_string()],
                price: UnitPrice {
                    base_cost: 100,
                    total_cost: 90,
                    discount: 10,
                },
            }),
            20 => Ok(Product {
                id,
                title: "Product B".to_string(),
                images: Vec::new(),
                price: UnitPrice {
                    base_cost: 50,
                    total_cost: 50,
                    discount: 0,
                },
            }),
            _ => Err(ProductsServiceError::NotFound),
        });

        products
    }

    fn service(store: MockCartStore, products: MockProductsService) -> StoreCartsService {
        StoreCartsService::new(Arc::new(store), Arc::new(products))
    }

    fn stored(lines: &[(ProductId, u64)]) -> Vec<CartLine> {
        lines
            .iter()
            .map(|&(product, quantity)| CartLine::new(product, quantity).expect("valid line"))
            .collect()
    }

    #[tokio::test]
    async fn missing_cart_prices_as_empty() -> TestResult {
        let mut store = MockCartStore::new();

        store
            .expect_get_cart()
            .returning(|_| Err(CartStoreError::NotFound));

        let cart = service(store, MockProductsService::new())
            .get_preview_cart(USER)
            .await?;

        assert!(cart.is_empty());
        assert_eq!(cart.totals().total_cost(), 0);
        assert_eq!(cart.totals().total_discount(), 0);

        Ok(())
    }

    #[tokio::test]
    async fn preview_cart_sums_quantity_weighted_totals() -> TestResult {
        let mut store = MockCartStore::new();
        let lines = stored(&[(PRODUCT_B, 1), (PRODUCT_A, 2)]);

        store
            .expect_get_cart()
            .with(eq(USER))
            .return_once(move |_| Ok(lines));

        let cart = service(store, catalog()).get_preview_cart(USER).await?;

        assert_eq!(cart.product_ids(), vec![PRODUCT_A, PRODUCT_B]);
        assert_eq!(cart.totals().total_base_cost(), 250);
        assert_eq!(cart.totals().total_cost(), 230);
        assert_eq!(cart.totals().total_discount(), 20);
        assert_eq!(cart.lines()[0].preview_image.as_deref(), Some("a.png"));
        assert_eq!(cart.lines()[1].preview_image, None);

        Ok(())
    }

    #[tokio::test]
    async fn missing_product_fails_the_whole_cart() {
        let mut store = MockCartStore::new();
        let lines = stored(&[(PRODUCT_A, 1), (ProductId::new(99), 1)]);

        store.expect_get_cart().return_once(move |_| Ok(lines));

        let result = service(store, catalog()).get_preview_cart(USER).await;

        assert!(
            matches!(
                result,
                Err(CartsServiceError::ProductNotFound(id)) if id == ProductId::new(99)
            ),
            "expected ProductNotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn add_product_increments_existing_line() -> TestResult {
        let mut store = MockCartStore::new();
        let lines = stored(&[(PRODUCT_A, 1)]);
        let expected = stored(&[(PRODUCT_A, 3)]);

        store.expect_get_cart().return_once(move |_| Ok(lines));
        store
            .expect_put_cart()
            .withf(move |user, lines| *user == USER && *lines == expected)
            .times(1)
            .returning(|_, _| Ok(()));

        service(store, catalog())
            .add_product(USER, PRODUCT_A, 2)
            .await?;

        Ok(())
    }

    #[tokio::test]
    async fn add_product_creates_missing_cart() -> TestResult {
        let mut store = MockCartStore::new();
        let expected = stored(&[(PRODUCT_B, 1)]);

        store
            .expect_get_cart()
            .returning(|_| Err(CartStoreError::NotFound));
        store
            .expect_put_cart()
            .withf(move |_, lines| *lines == expected)
            .times(1)
            .returning(|_, _| Ok(()));

        service(store, catalog())
            .add_product(USER, PRODUCT_B, 1)
            .await?;

        Ok(())
    }

    #[tokio::test]
    async fn add_product_rejects_unknown_product_and_zero_count() {
        let result = service(MockCartStore::new(), catalog())
            .add_product(USER, ProductId::new(99), 1)
            .await;

        assert!(matches!(result, Err(CartsServiceError::ProductNotFound(_))));

        let result = service(MockCartStore::new(), catalog())
            .add_product(USER, PRODUCT_A, 0)
            .await;

        assert!(matches!(result, Err(CartsServiceError::ZeroQuantity)));
    }

    #[tokio::test]
    async fn change_product_requires_line() {
        let mut store = MockCartStore::new();
        let lines = stored(&[(PRODUCT_A, 1)]);

        store.expect_get_cart().return_once(move |_| Ok(lines));
        store.expect_put_cart().never();

        let result = service(store, catalog())
            .change_product(USER, PRODUCT_B, 4)
            .await;

        assert!(matches!(
            result,
            Err(CartsServiceError::ProductNotInCart(id)) if id == PRODUCT_B
        ));
    }

    #[tokio::test]
    async fn change_product_to_zero_removes_line() -> TestResult {
        let mut store = MockCartStore::new();
        let lines = stored(&[(PRODUCT_A, 1), (PRODUCT_B, 2)]);
        let expected = stored(&[(PRODUCT_B, 2)]);

        store.expect_get_cart().return_once(move |_| Ok(lines));
        store
            .expect_put_cart()
            .withf(move |_, lines| *lines == expected)
            .times(1)
            .returning(|_, _| Ok(()));

        service(store, catalog())
            .change_product(USER, PRODUCT_A, 0)
            .await?;

        Ok(())
    }

    #[tokio::test]
    async fn deleting_last_product_empties_cart() -> TestResult {
        let mut store = MockCartStore::new();
        let lines = stored(&[(PRODUCT_A, 1)]);

        store.expect_get_cart().return_once(move |_| Ok(lines));
        store
            .expect_put_cart()
            .withf(|_, lines| lines.is_empty())
            .times(1)
            .returning(|_, _| Ok(()));

        service(store, catalog())
            .delete_product(USER, PRODUCT_A)
            .await?;

        Ok(())
    }

    #[tokio::test]
    async fn delete_missing_cart_returns_not_found() {
        let mut store = MockCartStore::new();

        store.expect_delete_cart().returning(|_| Ok(false));

        let result = service(store, catalog()).delete_cart(USER).await;

        assert!(matches!(result, Err(CartsServiceError::NotFound)));
    }
}
