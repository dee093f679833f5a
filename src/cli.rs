use crate::app::EventWindow;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// calscrape - scrape an HTML event calendar into JSON
#[derive(Debug, Parser)]
#[command(name = "calscrape")]
#[command(about = "Scrape an HTML event calendar, normalize its dates and export the events as JSON", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute (defaults to `scrape`)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Fetch the calendar page, parse it and export the events
    Scrape(ScrapeArgs),

    /// Print the events stored in an exported file
    #[command(alias = "list")]
    Show {
        /// Exported events file
        #[arg(required = true)]
        file: PathBuf,

        #[command(flatten)]
        window: WindowArgs,
    },

    /// Print the content hash of an exported file
    Hash {
        /// Exported events file
        #[arg(required = true)]
        file: PathBuf,
    },

    /// Report whether two exported files hold different events
    Diff {
        /// Earlier export
        #[arg(required = true)]
        old: PathBuf,

        /// Later export
        #[arg(required = true)]
        new: PathBuf,
    },
}

#[derive(Debug, Default, Args)]
pub struct ScrapeArgs {
    /// Directory to write the export into
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Year assumed for dates on the page
    #[arg(long)]
    pub year: Option<i32>,

    /// Log every parsed event
    #[arg(long, short)]
    pub verbose: bool,
}

#[derive(Debug, Default, Args)]
#[group(multiple = false)]
pub struct WindowArgs {
    /// Only events happening today
    #[arg(long)]
    pub today: bool,

    /// Only events happening tomorrow
    #[arg(long)]
    pub tomorrow: bool,

    /// Only events in the next seven days
    #[arg(long)]
    pub week: bool,
}

impl WindowArgs {
    pub fn window(&self) -> EventWindow {
        if self.today {
            EventWindow::Today
        } else if self.tomorrow {
            EventWindow::Tomorrow
        } else if self.week {
            EventWindow::Week
        } else {
            EventWindow::All
        }
    }
}
