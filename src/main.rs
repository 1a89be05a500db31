use tracing::{error, info, warn, Instrument};

use storefront_cart::catalog::CatalogClient;
use storefront_cart::domain::Product;
use storefront_cart::presentation::{
    cart_badge, checkout_with_feedback, format_price, CartSummary, CheckoutFeedback,
};
use storefront_cart::{setup_tracing, AppConfig, CartEvent, CartSystem};

fn demo_products() -> Vec<Product> {
    vec![
        Product::new(1, "Essence Mascara Lash Princess", 9.99).with_stock(99),
        Product::new(2, "Eyeshadow Palette with Mirror", 19.99).with_stock(34),
        Product::new(3, "Powder Canister", 14.99).with_stock(89),
    ]
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Setup tracing once for the entire application
    setup_tracing();

    let config = AppConfig::load()?;
    info!(catalog = %config.catalog_base_url, outcome = %config.checkout_outcome, "Starting storefront");

    let catalog = CatalogClient::new(config.catalog_base_url.clone(), config.catalog_timeout())?;
    let products = match catalog.get_products(0, config.catalog_page_size).await {
        Ok(page) if !page.products.is_empty() => {
            info!(count = page.products.len(), total = page.total, "Catalog loaded");
            page.products
        }
        Ok(_) => {
            warn!("Catalog returned no products, using demo products");
            demo_products()
        }
        Err(e) => {
            warn!(error = %e, "Catalog unavailable, using demo products");
            demo_products()
        }
    };

    let system = CartSystem::simulated(&config);
    let cart = system.cart_client.clone();

    cart.subscribe(|event| match event {
        CartEvent::Changed(snapshot) => info!(
            items = snapshot.total_items,
            total = %format_price(snapshot.total_price),
            "Cart changed"
        ),
        CartEvent::CheckoutStarted { total_items, .. } => {
            info!(items = total_items, "Checkout started")
        }
        CartEvent::CheckoutSucceeded(confirmation) => {
            info!(order_id = %confirmation.order_id, "Checkout succeeded")
        }
        CartEvent::CheckoutFailed { reason, retryable } => {
            warn!(%reason, retryable, "Checkout failed")
        }
    })
    .await?;

    let span = tracing::info_span!("shopping");
    async {
        for product in products.iter().take(2) {
            cart.add_to_cart(product.clone()).await?;
        }
        if let Some(first) = products.first() {
            cart.add_to_cart(first.clone()).await?;
            cart.update_quantity(first.id, 3).await?;
        }

        let summary = CartSummary::load(&cart).await?;
        info!(
            items = summary.item_count,
            subtotal = %summary.subtotal_display(),
            badge = ?cart_badge(summary.item_count),
            "Cart ready"
        );
        Ok::<_, storefront_cart::CartError>(())
    }
    .instrument(span)
    .await?;

    let report = |feedback: CheckoutFeedback| match feedback {
        CheckoutFeedback::Processing => info!("Processing..."),
        CheckoutFeedback::Succeeded { message, .. } => info!(%message),
        CheckoutFeedback::Failed { message, .. } => warn!(%message),
    };

    let span = tracing::info_span!("checkout");
    let result = async {
        match checkout_with_feedback(&cart, report).await {
            Err(e) if e.is_retryable() => {
                info!("Retrying checkout");
                checkout_with_feedback(&cart, report).await
            }
            other => other,
        }
    }
    .instrument(span)
    .await;

    match result {
        Ok(confirmation) => info!(order_id = %confirmation.order_id, "Order placed"),
        Err(e) => error!(error = %e, "Order could not be placed"),
    }

    // Shutdown system gracefully
    system.shutdown().await?;

    info!("Storefront finished");
    Ok(())
}
