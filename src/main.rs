use clap::{Parser, Subcommand};
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use tracker_client::configuration::get_configuration;
use tracker_client::create_page;
use tracker_client::data_models::{Credentials, ExportFormat, Platform, Registration};
use tracker_client::navigation::TerminalNavigator;
use tracker_client::page::{Page, TrackForm};
use tracker_client::render::{Row, TableHeader};

#[derive(Debug, Parser)]
#[command(name = "tracker", about = "Search marketplaces and track product prices")]
struct Cli {
    /// Print the rendered page as HTML instead of plain rows.
    #[arg(long, global = true)]
    html: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    Logout,
    /// Scrape a marketplace for products.
    Search {
        platform: Platform,
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },
    /// Start tracking a product page.
    Track {
        url: String,
        #[arg(long, default_value = "")]
        threshold: String,
    },
    /// Show tracked products.
    List,
    Remove {
        id: u32,
    },
    /// Ask the backend to re-price every tracked product.
    Update,
    Download {
        #[arg(default_value = "csv")]
        format: ExportFormat,
    },
}

fn print_table(header: &TableHeader, rows: &[Row]) {
    println!("{}", header.to_plain());
    for row in rows {
        println!("{}", row.to_plain());
    }
}

fn print_page(page: &Page, html: bool) {
    let document = page.document();
    if html {
        match document.to_html() {
            Ok(html) => print!("{html}"),
            Err(e) => eprintln!("Failed to render page: {e}"),
        }
        return;
    }
    if !document.results.is_empty() {
        print_table(&document.results_header, &document.results);
        println!();
    }
    if let Some(status) = &document.track_status {
        println!("{}", status.text);
    }
    if !document.tracked.is_empty() {
        print_table(&document.tracked_header, &document.tracked);
    }
}

async fn run(cli: Cli) -> Result<bool, tracker_client::errors::Error> {
    let settings = get_configuration()?;
    let mut page = create_page(&settings, Arc::new(TerminalNavigator))?;

    match cli.command {
        Command::Login { email, password } => {
            page.login(&Credentials { email, password }).await?;
            println!("Signed in.");
            return Ok(true);
        }
        Command::Register {
            name,
            email,
            password,
        } => {
            let message = page
                .register(&Registration {
                    name,
                    email,
                    password,
                })
                .await?;
            println!("{message}");
            return Ok(true);
        }
        Command::Logout => {
            page.logout();
            return Ok(true);
        }
        _ => {}
    }

    if !page.bootstrap().await {
        return Ok(false);
    }
    match cli.command {
        Command::Search { platform, query } => page.search(platform, &query.join(" ")).await,
        Command::Track { url, threshold } => {
            page.document_mut().track_form = TrackForm::new(&url, &threshold);
            page.track_product().await;
        }
        Command::List => {}
        Command::Remove { id } => page.remove_product(id).await,
        Command::Update => page.update_prices().await,
        Command::Download { format } => {
            page.download_data(format)
                .map_err(tracker_client::errors::AppErrors::from)?;
            return Ok(true);
        }
        Command::Login { .. } | Command::Register { .. } | Command::Logout => {}
    }
    print_page(&page, cli.html);
    Ok(true)
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
