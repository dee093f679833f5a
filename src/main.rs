use anyhow::Result;
use calscrape::app::Application;
use calscrape::cli::{Cli, Commands, ScrapeArgs};
use calscrape::config::Config;
use calscrape::env_manager;
use clap::Parser;
use env_logger::Env;
use log::{error, info};

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_level))
        .format(|buf, record| {
            use chrono::Local;
            use std::io::Write;
            writeln!(
                buf,
                "{} [{}] {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or_else(|| Commands::Scrape(ScrapeArgs::default()));
    let verbose = matches!(&command, Commands::Scrape(args) if args.verbose);
    init_logging(verbose);

    if let Err(e) = env_manager::load_env_file() {
        error!("Failed to prepare .env file: {}", e);
    }

    let app = Application::new(Config::load()?);

    match command {
        Commands::Scrape(args) => {
            if !env_manager::check_env_vars() && app.config().source.website_url.is_empty() {
                return Err(anyhow::anyhow!("WEBSITE_URL is not set"));
            }
            let summary = app.scrape(args.output.as_deref(), args.year).await?;
            info!("Scrape finished");
            println!("Exported {} events to {}", summary.events, summary.path.display());
            println!("Unprocessable dates: {}", summary.unresolved);
            println!("Hash: {}", summary.hash);
        }
        Commands::Show { file, window } => {
            let events = app.show(&file, window.window())?;
            if events.is_empty() {
                println!("No matching events.");
            }
            for event in events {
                println!("{}\n", event);
            }
        }
        Commands::Hash { file } => {
            println!("{}", app.hash(&file)?);
        }
        Commands::Diff { old, new } => {
            if app.diff(&old, &new)? {
                println!("Events changed");
            } else {
                println!("No changes");
            }
        }
    }

    Ok(())
}
