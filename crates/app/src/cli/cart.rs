use clap::{Args, Subcommand};
use storefront::ids::{ProductId, UserId};

use super::{StoreArgs, print_cart};

#[derive(Debug, Args)]
pub(crate) struct CartCommand {
    #[command(subcommand)]
    command: CartSubcommand,
}

#[derive(Debug, Subcommand)]
enum CartSubcommand {
    /// Show the priced cart of a user
    Show(UserArgs),

    /// Add units of a product
    Add(LineArgs),

    /// Set the quantity of a product already in the cart
    Change(LineArgs),

    /// Remove a product from the cart
    Remove(ProductArgs),

    /// Remove the whole cart
    Clear(UserArgs),
}

#[derive(Debug, Args)]
struct UserArgs {
    #[command(flatten)]
    stores: StoreArgs,

    /// User id
    #[arg(long)]
    user: u64,
}

#[derive(Debug, Args)]
struct ProductArgs {
    #[command(flatten)]
    stores: StoreArgs,

    /// User id
    #[arg(long)]
    user: u64,

    /// Product id
    #[arg(long)]
    product: u64,
}

#[derive(Debug, Args)]
struct LineArgs {
    #[command(flatten)]
    stores: StoreArgs,

    /// User id
    #[arg(long)]
    user: u64,

    /// Product id
    #[arg(long)]
    product: u64,

    /// Number of units
    #[arg(long, default_value_t = 1)]
    count: u64,
}

pub(crate) async fn run(command: CartCommand) -> Result<(), String> {
    match command.command {
        CartSubcommand::Show(args) => {
            let app = args.stores.connect().await?;

            let cart = app
                .carts
                .get_preview_cart(UserId::new(args.user))
                .await
                .map_err(|error| format!("failed to price cart: {error}"))?;

            print_cart(&cart);
        }
        CartSubcommand::Add(args) => {
            let app = args.stores.connect().await?;

            app.carts
                .add_product(
                    UserId::new(args.user),
                    ProductId::new(args.product),
                    args.count,
                )
                .await
                .map_err(|error| format!("failed to add product: {error}"))?;

            println!("added product {} x{}", args.product, args.count);
        }
        CartSubcommand::Change(args) => {
            let app = args.stores.connect().await?;

            app.carts
                .change_product(
                    UserId::new(args.user),
                    ProductId::new(args.product),
                    args.count,
                )
                .await
                .map_err(|error| format!("failed to change product: {error}"))?;

            println!("set product {} to x{}", args.product, args.count);
        }
        CartSubcommand::Remove(args) => {
            let app = args.stores.connect().await?;

            app.carts
                .delete_product(UserId::new(args.user), ProductId::new(args.product))
                .await
                .map_err(|error| format!("failed to remove product: {error}"))?;

            println!("removed product {}", args.product);
        }
        CartSubcommand::Clear(args) => {
            let app = args.stores.connect().await?;

            app.carts
                .delete_cart(UserId::new(args.user))
                .await
                .map_err(|error| format!("failed to clear cart: {error}"))?;

            println!("cleared cart of user {}", args.user);
        }
    }

    Ok(())
}
