use clap::{Args, Parser, Subcommand};
use storefront::{cart::PricedCart, pricing::PriceTotals};
use storefront_app::{
    config::{CartStoreArgs, DatabaseArgs, LoggingArgs},
    context::AppContext,
};

mod cart;
mod db;
mod order;
mod promo;

#[derive(Debug, Parser)]
#[command(name = "storefront-app", about = "Storefront CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    logging: LoggingArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Cart(cart::CartCommand),
    Order(order::OrderCommand),
    Promo(promo::PromoCommand),
    Db(db::DbCommand),
}

impl Cli {
    pub(crate) fn logging(&self) -> &LoggingArgs {
        &self.logging
    }

    pub(crate) async fn run(self) -> Result<(), String> {
        match self.command {
            Commands::Cart(command) => cart::run(command).await,
            Commands::Order(command) => order::run(command).await,
            Commands::Promo(command) => promo::run(command).await,
            Commands::Db(command) => db::run(command).await,
        }
    }
}

/// Settings of both stores the services need.
#[derive(Debug, Args)]
pub(crate) struct StoreArgs {
    #[command(flatten)]
    database: DatabaseArgs,

    #[command(flatten)]
    cart_store: CartStoreArgs,
}

impl StoreArgs {
    pub(crate) async fn connect(&self) -> Result<AppContext, String> {
        AppContext::connect(&self.database, &self.cart_store)
            .await
            .map_err(|error| format!("failed to start services: {error}"))
    }
}

pub(crate) fn print_totals(totals: &PriceTotals) {
    println!("total_base_cost: {}", totals.total_base_cost());
    println!("total_discount: {}", totals.total_discount());
    println!("total_cost: {}", totals.total_cost());
}

pub(crate) fn print_cart(cart: &PricedCart) {
    for line in cart.lines() {
        println!(
            "{}\t{}\tx{}\t{}\t{}\t-{}%",
            line.product,
            line.title,
            line.quantity,
            line.price.base_cost,
            line.price.total_cost,
            line.price.discount
        );
    }

    print_totals(&cart.totals());
}
