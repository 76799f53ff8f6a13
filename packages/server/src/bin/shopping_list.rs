//! Interactive shopping-list builder.
//!
//! Asks for an event, shows five recommendations, then offers one more item
//! at a time until declined.

use anyhow::{Context, Result};
use advisor_core::domains::shopping::{
    recommend_items, recommend_next_item, ItemRef, ShoppingItem, PRICE_NOT_AVAILABLE,
};
use advisor_core::kernel::ServerDeps;
use advisor_core::Config;
use console::style;
use dialoguer::{theme::ColorfulTheme, Confirm, Input};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const INITIAL_COUNT: usize = 5;

fn print_item(item: &ShoppingItem) {
    let price = match (item.price_low, item.price_high) {
        (None, None) => PRICE_NOT_AVAILABLE.to_string(),
        _ => format!("({})", item.display_price(PRICE_NOT_AVAILABLE)),
    };
    println!("- {}: {} {}", style(&item.item).bold(), item.reason, style(price).dim());
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().context("Failed to load configuration")?;
    let deps = ServerDeps::from_config(&config)?;
    let theme = ColorfulTheme::default();

    let event: String = Input::with_theme(&theme)
        .with_prompt("What event are you shopping for? (e.g. back to school)")
        .interact_text()?;
    let event = event.trim().to_string();

    println!();
    println!("{}", style("--- Recommended Items ---").bold());

    let rejected: Vec<ItemRef> = Vec::new();
    let mut accepted: Vec<ShoppingItem> =
        recommend_items(&event, &[], &rejected, INITIAL_COUNT, &deps).await?;
    if accepted.is_empty() {
        println!("{}", style("No recommendations received.").yellow());
        return Ok(());
    }
    accepted.iter().for_each(print_item);

    loop {
        println!();
        let more = Confirm::with_theme(&theme)
            .with_prompt("Generate another item?")
            .default(false)
            .interact()?;
        if !more {
            break;
        }

        let accepted_refs: Vec<ItemRef> = accepted.iter().map(ItemRef::from).collect();
        match recommend_next_item(&event, &accepted_refs, &rejected, &deps).await? {
            Some(item) => {
                print_item(&item);
                accepted.push(item);
            }
            None => {
                println!("{}", style("No more items generated.").yellow());
                break;
            }
        }
    }

    println!();
    println!("{}", style("--- Final Shopping List ---").bold());
    accepted.iter().for_each(print_item);

    Ok(())
}
