use anyhow::{anyhow, Context, Result};
use canvass::dispatch::OperationQueue;
use canvass::environment::Settings;
use canvass::error::{FetchError, TransportError};
use canvass::events::{ConcreteEventRepository, Event, EventRepository, StockEventDeserializer};
use canvass::geocode::HttpGeocoder;
use canvass::logging;
use canvass::news::{ConcreteNewsItemRepository, NewsItem, NewsItemRepository, StockNewsItemDeserializer};
use canvass::search::HttpJsonClient;
use canvass::urls::{ConfiguredUrlProvider, UrlProvider};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::sync::Arc;
use tokio::sync::oneshot;
use tracing::info;

const CALLBACK_QUEUE_NAME: &str = "canvass-callbacks";

#[derive(Parser)]
#[command(author, version, about = "Campaign events and news from the command line", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find upcoming events near a zip code
    Events {
        /// Zip code to search around
        #[arg(short, long)]
        zip: String,

        /// Search radius in miles
        #[arg(short, long, default_value = "50")]
        radius: f32,

        /// Print events as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the latest campaign news
    News {
        /// Print news items as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the configured external links
    Links,
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::configure_logging();

    let cli = Cli::parse();
    let settings = Settings::from_env()?;
    let url_provider: Arc<dyn UrlProvider> = Arc::new(
        ConfiguredUrlProvider::new(&settings).context("Failed to build service URLs")?,
    );

    match cli.command {
        Commands::Events { zip, radius, json } => {
            let events = fetch_events(&settings, url_provider, &zip, radius).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&events)?);
            } else {
                print_events(&zip, radius, &events);
            }
        }
        Commands::News { json } => {
            let items = fetch_news(&settings, url_provider).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&items)?);
            } else {
                print_news(&items);
            }
        }
        Commands::Links => print_links(url_provider.as_ref()),
    }

    Ok(())
}

async fn fetch_events(
    settings: &Settings,
    url_provider: Arc<dyn UrlProvider>,
    zip: &str,
    radius: f32,
) -> Result<Vec<Event>> {
    let repository = ConcreteEventRepository::new(
        Arc::new(HttpGeocoder::new(settings)?),
        url_provider,
        Arc::new(HttpJsonClient::new(settings)?),
        Arc::new(StockEventDeserializer::new()),
        Arc::new(OperationQueue::new(CALLBACK_QUEUE_NAME)?),
    );

    info!("Searching for events within {} miles of {}", radius, zip);

    let (tx, rx) = oneshot::channel::<Result<Vec<Event>, FetchError>>();
    let tx = Arc::new(std::sync::Mutex::new(Some(tx)));
    let error_tx = Arc::clone(&tx);

    repository
        .fetch_events_with_zip_code(
            zip,
            radius,
            Box::new(move |events| send_once(&tx, Ok(events))),
            Box::new(move |err| send_once(&error_tx, Err(err))),
        )
        .await
        .context("Event fetch task failed")?;

    rx.await
        .map_err(|_| anyhow!("Event fetch finished without a result"))?
        .with_context(|| format!("Failed to fetch events near {}", zip))
}

async fn fetch_news(settings: &Settings, url_provider: Arc<dyn UrlProvider>) -> Result<Vec<NewsItem>> {
    let repository = ConcreteNewsItemRepository::new(
        url_provider,
        Arc::new(HttpJsonClient::new(settings)?),
        Arc::new(StockNewsItemDeserializer::new()),
        Arc::new(OperationQueue::new(CALLBACK_QUEUE_NAME)?),
        settings.news_page_size,
    );

    let (tx, rx) = oneshot::channel::<Result<Vec<NewsItem>, TransportError>>();
    let tx = Arc::new(std::sync::Mutex::new(Some(tx)));
    let error_tx = Arc::clone(&tx);

    repository
        .fetch_news(
            Box::new(move |items| send_once(&tx, Ok(items))),
            Box::new(move |err| send_once(&error_tx, Err(err))),
        )
        .await
        .context("News fetch task failed")?;

    rx.await
        .map_err(|_| anyhow!("News fetch finished without a result"))?
        .context("Failed to fetch news")
}

type SharedSender<T> = Arc<std::sync::Mutex<Option<oneshot::Sender<T>>>>;

fn send_once<T>(sender: &SharedSender<T>, value: T) {
    if let Some(tx) = sender.lock().ok().and_then(|mut guard| guard.take()) {
        let _ = tx.send(value);
    }
}

fn print_events(zip: &str, radius: f32, events: &[Event]) {
    println!("\n{}", "═".repeat(80).bright_blue());
    println!(
        "{}  {} within {} miles",
        "EVENTS".bright_blue(),
        zip.bright_yellow(),
        radius
    );
    println!("{}", "═".repeat(80).bright_blue());

    if events.is_empty() {
        println!("{}", "No upcoming events found.".dimmed());
        return;
    }

    for event in events {
        println!("\n{}", event.name().bright_white().bold());
        let timezone = event.timezone().map(|tz| format!(" ({})", tz)).unwrap_or_default();
        println!(
            "{}: {}{}",
            "When".bright_blue(),
            event.start_time().format("%a %b %e %Y, %H:%M UTC"),
            timezone
        );

        let venue = event.venue();
        let address = venue.formatted_address();
        match (venue.name(), address.is_empty()) {
            (Some(name), false) => println!("{}: {}, {}", "Where".bright_blue(), name, address),
            (Some(name), true) => println!("{}: {}", "Where".bright_blue(), name),
            (None, false) => println!("{}: {}", "Where".bright_blue(), address),
            (None, true) => println!(
                "{}: {}, {}",
                "Where".bright_blue(),
                venue.location().latitude,
                venue.location().longitude
            ),
        }

        if event.capacity() > 0 {
            println!(
                "{}: {}/{}",
                "Attending".bright_blue(),
                event.attendee_count(),
                event.capacity()
            );
        } else {
            println!("{}: {}", "Attending".bright_blue(), event.attendee_count());
        }

        if !event.description().is_empty() {
            println!("{}", event.description());
        }
        println!("{}", event.url().as_str().bright_magenta());
    }
}

fn print_news(items: &[NewsItem]) {
    println!("\n{}", "═".repeat(80).bright_blue());
    println!("{}", "NEWS".bright_blue());
    println!("{}", "═".repeat(80).bright_blue());

    if items.is_empty() {
        println!("{}", "No news items found.".dimmed());
        return;
    }

    for item in items {
        println!(
            "\n{}  {}",
            item.date().format("%Y-%m-%d").to_string().dimmed(),
            item.title().bright_white().bold()
        );
        let preview: String = item.body().chars().take(200).collect();
        if !preview.is_empty() {
            println!("{}", preview);
        }
        println!("{}", item.url().as_str().bright_magenta());
    }
}

fn print_links(url_provider: &dyn UrlProvider) {
    let links = [
        ("Campaign site", url_provider.campaign_site_url()),
        ("Volunteer", url_provider.volunteer_url()),
        ("Coders", url_provider.coders_url()),
        ("Designers", url_provider.designers_url()),
        ("Privacy policy", url_provider.privacy_policy_url()),
    ];

    for (label, url) in links {
        println!("{}: {}", format!("{:>16}", label).bright_blue(), url);
    }
}
