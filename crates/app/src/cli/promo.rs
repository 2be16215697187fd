use clap::{Args, Subcommand};
use storefront::{ids::ProductId, promotions::PromoCode};
use storefront_app::{
    config::DatabaseArgs,
    database::{self, Db},
    domain::promotions::{PgPromotionsService, PromotionsService},
};

use super::print_totals;

#[derive(Debug, Args)]
pub(crate) struct PromoCommand {
    #[command(subcommand)]
    command: PromoSubcommand,
}

#[derive(Debug, Subcommand)]
enum PromoSubcommand {
    /// Price one unit of each product under a promo code
    Apply(ApplyArgs),
}

#[derive(Debug, Args)]
struct ApplyArgs {
    #[command(flatten)]
    database: DatabaseArgs,

    /// Promo code
    #[arg(long)]
    code: String,

    /// Product ids
    #[arg(long = "product", required = true)]
    products: Vec<u64>,
}

pub(crate) async fn run(command: PromoCommand) -> Result<(), String> {
    match command.command {
        PromoSubcommand::Apply(args) => apply(args).await,
    }
}

async fn apply(args: ApplyArgs) -> Result<(), String> {
    let code = PromoCode::parse(&args.code).map_err(|error| format!("invalid code: {error}"))?;

    let pool = database::connect(&args.database.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let products: Vec<ProductId> = args.products.into_iter().map(ProductId::new).collect();

    let totals = PgPromotionsService::new(Db::new(pool))
        .apply_promo_code_to_order(&products, &code)
        .await
        .map_err(|error| format!("failed to apply promo code: {error}"))?;

    print_totals(&totals);

    Ok(())
}
