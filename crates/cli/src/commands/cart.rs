//! Cart commands.
//!
//! Mutations report failures through the store's notifier (logged to
//! stderr); the resulting cart is always printed afterwards.

use rust_decimal::Decimal;

use rocketshoes_cart::{Cart, CartItem, CartStore, ProductId, UpdateProductAmount};

pub async fn add(store: &CartStore, id: i32) {
    store.add_product(ProductId::new(id)).await;
}

pub fn remove(store: &CartStore, id: i32) {
    store.remove_product(ProductId::new(id));
}

pub async fn update(store: &CartStore, id: i32, amount: i32) {
    store
        .update_product_amount(UpdateProductAmount {
            product_id: ProductId::new(id),
            amount,
        })
        .await;
}

/// Print the cart to stdout.
#[allow(clippy::print_stdout)]
pub fn print(cart: &Cart) {
    print!("{}", render(cart));
}

/// Format a price for display.
fn format_price(amount: Decimal) -> String {
    format!("${:.2}", amount.round_dp(2))
}

fn render_line(item: &CartItem) -> String {
    format!(
        "#{:<4} {:<40} {:>3} x {:>10} = {:>10}",
        item.id().as_i32(),
        item.product.title.as_deref().unwrap_or("(untitled)"),
        item.amount,
        format_price(item.product.unit_price()),
        format_price(item.subtotal()),
    )
}

/// Render the cart as a plain-text table.
fn render(cart: &Cart) -> String {
    if cart.is_empty() {
        return "Cart is empty\n".to_string();
    }

    let mut out = String::new();
    for item in cart {
        out.push_str(&render_line(item));
        out.push('\n');
    }
    out.push_str(&format!(
        "Total: {} ({} products, {} units)\n",
        format_price(cart.total()),
        cart.len(),
        cart.item_count()
    ));
    out
}
