use clap::Parser;

use finlist::app;
use finlist::cli::{Cli, Commands};
use finlist::config::{sector_by_id, Config};
use finlist::error::{AppError, Result};
use finlist::fetch::{ArticleClient, QuoteFetcher, SubscriptionClient};
use finlist::ui::text;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        None | Some(Commands::Dashboard) => app::bootstrap::run().await?,
        Some(Commands::Quotes { symbols }) => print_quotes(symbols).await?,
        Some(Commands::Article { slug }) => print_article(&slug).await?,
        Some(Commands::Subscribe { email, sectors }) => subscribe(email, sectors).await?,
    }

    Ok(())
}

async fn print_quotes(symbols: Vec<String>) -> Result<()> {
    let config = Config::from_env();
    let symbols = if symbols.is_empty() {
        config.symbols.clone()
    } else {
        symbols
    };

    let fetcher = QuoteFetcher::new(&config);
    let quotes = fetcher.fetch_quotes(&symbols).await?;

    println!("{:<8} {:>10} {:>10} {:>10}", "Symbol", "Price", "Change", "Change %");
    for quote in &quotes {
        println!(
            "{:<8} {:>10} {:>10} {:>9} {}",
            quote.symbol,
            text::format_price(quote.price),
            text::format_change(quote.change),
            text::format_percent(quote.change_percent),
            text::direction_arrow(quote),
        );
    }

    Ok(())
}

async fn print_article(slug: &str) -> Result<()> {
    let config = Config::from_env();
    let client = ArticleClient::new(&config);
    let article = client.fetch_article_by_slug(slug).await?;

    println!("{}", article.article_name);
    println!("{} • {}", article.sector, article.author);
    println!();
    println!("{}", article.content);

    Ok(())
}

async fn subscribe(email: String, sectors: Vec<String>) -> Result<()> {
    for id in &sectors {
        if sector_by_id(id).is_none() {
            return Err(AppError::Validation(format!("unknown sector `{}`", id)));
        }
    }

    let mut form = app::SubscriptionForm::new();
    form.email = email;
    for id in &sectors {
        form.select_sector(id);
    }

    let request = form.validate()?;
    let config = Config::from_env();
    let client = SubscriptionClient::new(&config);
    client.submit(&request).await?;

    println!("Subscribed {} to: {}", request.email, request.selected_sectors.join(", "));
    Ok(())
}
