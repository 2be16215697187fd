use clap::{Args, Subcommand};
use storefront::{
    ids::UserId,
    orders::{OrderDetails, Recipient},
    pagination::Paginator,
};

use super::{StoreArgs, print_cart, print_totals};

#[derive(Debug, Args)]
pub(crate) struct OrderCommand {
    #[command(subcommand)]
    command: OrderSubcommand,
}

#[derive(Debug, Subcommand)]
enum OrderSubcommand {
    /// Show recipient and priced cart before checkout
    Preview(PreviewArgs),

    /// Place an order from the user's cart
    Checkout(CheckoutArgs),

    /// List one page of the user's orders
    List(ListArgs),
}

#[derive(Debug, Args)]
struct PreviewArgs {
    #[command(flatten)]
    stores: StoreArgs,

    /// User id
    #[arg(long)]
    user: u64,
}

#[derive(Debug, Args)]
struct CheckoutArgs {
    #[command(flatten)]
    stores: StoreArgs,

    /// User id
    #[arg(long)]
    user: u64,

    /// Recipient first name
    #[arg(long)]
    first_name: String,

    /// Recipient last name
    #[arg(long)]
    last_name: String,

    /// Recipient e-mail
    #[arg(long)]
    email: String,

    /// Shipping address
    #[arg(long)]
    address: String,

    /// Promo code to apply
    #[arg(long)]
    promo_code: Option<String>,
}

#[derive(Debug, Args)]
struct ListArgs {
    #[command(flatten)]
    stores: StoreArgs,

    /// User id
    #[arg(long)]
    user: u64,

    /// One-based page number
    #[arg(long, default_value_t = 1)]
    page: u64,

    /// Orders per page
    #[arg(long, default_value_t = 10)]
    count: u64,

    /// Sort key
    #[arg(long, default_value = "date")]
    sort: String,

    /// Sort direction (ASC, DESC)
    #[arg(long, default_value = "DESC")]
    direction: String,
}

pub(crate) async fn run(command: OrderCommand) -> Result<(), String> {
    match command.command {
        OrderSubcommand::Preview(args) => preview(args).await,
        OrderSubcommand::Checkout(args) => checkout(args).await,
        OrderSubcommand::List(args) => list(args).await,
    }
}

async fn preview(args: PreviewArgs) -> Result<(), String> {
    let app = args.stores.connect().await?;
    let user = UserId::new(args.user);

    let cart = app
        .carts
        .get_preview_cart(user)
        .await
        .map_err(|error| format!("failed to price cart: {error}"))?;

    let preview = app
        .orders
        .get_preview_order(user, cart)
        .await
        .map_err(|error| format!("failed to preview order: {error}"))?;

    println!(
        "recipient: {} {} <{}>",
        preview.recipient.first_name, preview.recipient.last_name, preview.recipient.email
    );

    print_cart(&preview.cart);

    Ok(())
}

async fn checkout(args: CheckoutArgs) -> Result<(), String> {
    let details = OrderDetails::new(
        Recipient {
            first_name: args.first_name,
            last_name: args.last_name,
            email: args.email,
        },
        &args.address,
        args.promo_code.as_deref(),
    )
    .map_err(|error| format!("invalid order details: {error}"))?;

    let app = args.stores.connect().await?;
    let user = UserId::new(args.user);

    let cart = app
        .carts
        .get_preview_cart(user)
        .await
        .map_err(|error| format!("failed to price cart: {error}"))?;

    let placed = app
        .orders
        .add_completed_order(&details, user, cart)
        .await
        .map_err(|error| format!("failed to place order: {error}"))?;

    println!("order_id: {}", placed.order_id);
    println!("order_number: {}", placed.order_number);

    Ok(())
}

async fn list(args: ListArgs) -> Result<(), String> {
    let paginator = Paginator::parse(args.page, args.count, &args.sort, &args.direction)
        .map_err(|error| format!("invalid page request: {error}"))?;

    let app = args.stores.connect().await?;

    let range = app
        .orders
        .get_range_orders(UserId::new(args.user), paginator)
        .await
        .map_err(|error| format!("failed to list orders: {error}"))?;

    println!("pages: {}", range.max_count_pages);

    for order in range.orders {
        println!(
            "{}\t{}\t{}\tdelivery {}\t{} product(s)",
            order.order_number,
            order.status,
            order.date_added,
            order.date_delivery,
            order.products.len()
        );

        print_totals(&order.totals);
    }

    Ok(())
}
