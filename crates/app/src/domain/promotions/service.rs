//! Promotions Service

use async_trait::async_trait;
use mockall::automock;
use sqlx::{Postgres, Transaction};
use storefront::{
    ids::ProductId,
    pricing::PriceTotals,
    promotions::{PromoApplication, PromoCode, PromoPrice},
};
use tracing::Span;

use crate::{
    database::Db,
    domain::promotions::{PromotionsServiceError, repository::PgPromotionsRepository},
};

#[derive(Debug, Clone)]
pub struct PgPromotionsService {
    db: Db,
    repository: PgPromotionsRepository,
}

impl PgPromotionsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgPromotionsRepository::new(),
        }
    }

    async fn ensure_exists(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        code: &PromoCode,
    ) -> Result<(), PromotionsServiceError> {
        if !self.repository.code_exists(tx, code).await? {
            return Err(PromotionsServiceError::NotFound);
        }

        Ok(())
    }

    async fn price(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductId,
        code: &PromoCode,
    ) -> Result<PromoPrice, PromotionsServiceError> {
        let row = self
            .repository
            .get_discounted_price(tx, product, code)
            .await?
            .ok_or(PromotionsServiceError::ProductNotFound(product))?;

        Ok(row.into_promo_price()?)
    }
}

#[async_trait]
impl PromotionsService for PgPromotionsService {
    #[tracing::instrument(
        name = "promotions.service.check_promo_exists",
        skip(self, code),
        fields(promo_code = %code),
        err
    )]
    async fn check_promo_exists(&self, code: &PromoCode) -> Result<(), PromotionsServiceError> {
        let mut tx = self.db.begin().await?;

        self.ensure_exists(&mut tx, code).await?;

        tx.commit().await?;

        Ok(())
    }

    #[tracing::instrument(
        name = "promotions.service.price_with_promo",
        skip(self, code),
        fields(product_id = %product, promo_code = %code, eligible = tracing::field::Empty),
        err
    )]
    async fn price_with_promo(
        &self,
        product: ProductId,
        code: &PromoCode,
    ) -> Result<PromoPrice, PromotionsServiceError> {
        let mut tx = self.db.begin().await?;

        let price = self.price(&mut tx, product, code).await?;

        tx.commit().await?;

        Span::current().record("eligible", price.is_eligible());

        Ok(price)
    }

    #[tracing::instrument(
        name = "promotions.service.apply_promo_code_to_order",
        skip(self, products, code),
        fields(
            promo_code = %code,
            product_count = products.len(),
            eligible_count = tracing::field::Empty
        ),
        err
    )]
    async fn apply_promo_code_to_order(
        &self,
        products: &[ProductId],
        code: &PromoCode,
    ) -> Result<PriceTotals, PromotionsServiceError> {
        let mut tx = self.db.begin().await?;

        self.ensure_exists(&mut tx, code).await?;

        let mut application = PromoApplication::new();

        for &product in products {
            let price = self.price(&mut tx, product, code).await?;

            application = application
                .add(price, 1)
                .map_err(|error| PromotionsServiceError::InvalidPromoGroup(error.into()))?;
        }

        tx.commit().await?;

        Span::current().record("eligible_count", application.eligible());

        Ok(application.finish()?)
    }
}

#[automock]
#[async_trait]
pub trait PromotionsService: Send + Sync {
    /// Fail with [`PromotionsServiceError::NotFound`] unless the code exists.
    async fn check_promo_exists(&self, code: &PromoCode) -> Result<(), PromotionsServiceError>;

    /// Unit price of a product under a code. Products outside the code's promo
    /// group come back as [`PromoPrice::NotEligible`] at catalog price.
    async fn price_with_promo(
        &self,
        product: ProductId,
        code: &PromoCode,
    ) -> Result<PromoPrice, PromotionsServiceError>;

    /// Totals of one unit of each product under a code. Fails with
    /// [`PromotionsServiceError::ProductNotInPromo`] when the code discounts none
    /// of them.
    async fn apply_promo_code_to_order(
        &self,
        products: &[ProductId],
        code: &PromoCode,
    ) -> Result<PriceTotals, PromotionsServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::test::{TestContext, helpers::NewTestProduct};

    use super::*;

    async fn seeded() -> Result<(TestContext, ProductId, ProductId, PromoCode), sqlx::Error> {
        let ctx = TestContext::new().await;

        let promo = ctx.create_promo_code("SPRING10", 10).await?;

        let in_group = ctx
            .create_product(NewTestProduct {
                sale_group: vec![promo],
                ..NewTestProduct::priced("Kettle", 100, 90, 10)
            })
            .await?;

        let outside = ctx
            .create_product(NewTestProduct::priced("Toaster", 50, 50, 0))
            .await?;

        let code = PromoCode::parse("SPRING10").expect("valid code");

        Ok((ctx, in_group, outside, code))
    }

    #[tokio::test]
    async fn check_promo_exists_distinguishes_unknown_codes() -> TestResult {
        let (ctx, _, _, code) = seeded().await?;

        ctx.promotions.check_promo_exists(&code).await?;

        let result = ctx
            .promotions
            .check_promo_exists(&PromoCode::parse("NOPE")?)
            .await;

        assert!(
            matches!(result, Err(PromotionsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn price_with_promo_discounts_group_members_only() -> TestResult {
        let (ctx, in_group, outside, code) = seeded().await?;

        let discounted = ctx.promotions.price_with_promo(in_group, &code).await?;

        assert_eq!(
            discounted,
            PromoPrice::Discounted {
                base_cost: 100,
                total_cost: 81
            }
        );

        let not_eligible = ctx.promotions.price_with_promo(outside, &code).await?;

        assert_eq!(
            not_eligible,
            PromoPrice::NotEligible {
                base_cost: 50,
                total_cost: 50
            }
        );

        Ok(())
    }

    #[tokio::test]
    async fn price_with_promo_unknown_product_is_not_found() -> TestResult {
        let (ctx, _, _, code) = seeded().await?;

        let result = ctx
            .promotions
            .price_with_promo(ProductId::new(9_999), &code)
            .await;

        assert!(
            matches!(result, Err(PromotionsServiceError::ProductNotFound(_))),
            "expected ProductNotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn apply_promo_code_includes_every_product() -> TestResult {
        let (ctx, in_group, outside, code) = seeded().await?;

        let totals = ctx
            .promotions
            .apply_promo_code_to_order(&[in_group, outside], &code)
            .await?;

        assert_eq!(totals.total_base_cost(), 150);
        assert_eq!(totals.total_cost(), 131);
        assert_eq!(totals.total_discount(), 19);

        Ok(())
    }

    #[tokio::test]
    async fn apply_promo_code_without_eligible_products_fails() -> TestResult {
        let (ctx, _, outside, code) = seeded().await?;

        let result = ctx
            .promotions
            .apply_promo_code_to_order(&[outside], &code)
            .await;

        assert!(
            matches!(result, Err(PromotionsServiceError::ProductNotInPromo)),
            "expected ProductNotInPromo, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn zero_sale_code_is_not_eligible() -> TestResult {
        let ctx = TestContext::new().await;

        let promo = ctx.create_promo_code("ZERO", 0).await?;

        let product = ctx
            .create_product(NewTestProduct {
                sale_group: vec![promo],
                ..NewTestProduct::priced("Mug", 20, 20, 0)
            })
            .await?;

        let price = ctx
            .promotions
            .price_with_promo(product, &PromoCode::parse("ZERO")?)
            .await?;

        assert!(!price.is_eligible());

        Ok(())
    }
}
