//! # Order-Flow Runtime
//!
//! ```text
//! order-runtime                          # serve until Ctrl+C
//! order-runtime <customer> <product> <quantity>   # place one order and exit
//! ```

use anyhow::{Context, Result};
use order_runtime::{OrderFlowRuntime, RuntimeConfig};
use order_service::OrderDecision;
use telemetry::{init_logging, TelemetryConfig};
use tracing::{info, warn};

/// Parsed `<customer> <product> <quantity>` arguments.
fn parse_order_args(args: &[String]) -> Result<Option<(u64, u64, u32)>> {
    match args {
        [] => Ok(None),
        [customer, product, quantity] => Ok(Some((
            customer.parse().context("customer id must be a number")?,
            product.parse().context("product id must be a number")?,
            quantity.parse().context("quantity must be a number")?,
        ))),
        _ => anyhow::bail!("usage: order-runtime [<customer> <product> <quantity>]"),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    init_logging(&TelemetryConfig::for_service("order-runtime"))?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    let order = parse_order_args(&args)?;

    // Load configuration
    let config = RuntimeConfig::from_env();

    let mut runtime = OrderFlowRuntime::new(config)?;
    runtime.start().await?;

    match order {
        Some((customer_id, product_id, quantity)) => {
            match runtime
                .orders()
                .create_order(customer_id, product_id, quantity)
                .await?
            {
                OrderDecision::Accepted(order) => info!(
                    order_id = order.id,
                    total_price = %order.total_price,
                    "Order accepted"
                ),
                OrderDecision::Rejected { reason } => warn!(reason = %reason, "Order rejected"),
            }
        }
        None => {
            info!("Order-flow is running. Press Ctrl+C to stop.");
            tokio::signal::ctrl_c().await?;
        }
    }

    // Graceful shutdown
    runtime.shutdown().await;

    Ok(())
}
