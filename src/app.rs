use crate::collection::EventCollection;
use crate::config::Config;
use crate::event::EventRecord;
use crate::fetch;
use crate::parser::ParsePipeline;
use anyhow::{Context, Result, anyhow};
use chrono::{Local, NaiveDate};
use log::{info, warn};
use reqwest::Client;
use std::path::{Path, PathBuf};

/// Which events `show` prints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventWindow {
    #[default]
    All,
    Today,
    Tomorrow,
    Week,
}

impl EventWindow {
    pub fn matches(self, event: &EventRecord, today: NaiveDate) -> bool {
        match self {
            EventWindow::All => true,
            EventWindow::Today => event.is_today(today),
            EventWindow::Tomorrow => event.is_tomorrow(today),
            EventWindow::Week => event.is_this_week(today),
        }
    }
}

/// Result of a scrape run.
#[derive(Debug)]
pub struct ScrapeSummary {
    pub path: PathBuf,
    pub hash: String,
    pub events: usize,
    pub unresolved: usize,
}

pub struct Application {
    config: Config,
}

impl Application {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Fetch the calendar page, parse it and export the events.
    pub async fn scrape(
        &self,
        output: Option<&Path>,
        reference_year: Option<i32>,
    ) -> Result<ScrapeSummary> {
        let url = self.config.source.website_url.as_str();
        if url.is_empty() {
            return Err(anyhow!("No website URL configured; set WEBSITE_URL"));
        }

        let client = Client::new();
        let document = fetch::fetch_document(&client, url).await?;

        let year = reference_year.unwrap_or_else(|| self.config.reference_year());
        let output = output.unwrap_or(self.config.output.directory.as_path());
        self.parse_and_export(&document, year, output)
    }

    /// Parse an already fetched page and export the events to `output`.
    pub fn parse_and_export(
        &self,
        document: &str,
        reference_year: i32,
        output: &Path,
    ) -> Result<ScrapeSummary> {
        let mut pipeline = ParsePipeline::new(self.config.table.clone())?;
        let (success, records) = pipeline.run_with(document, reference_year, |event| {
            warn!("Unprocessable date {:?} for event {:?}", event.event_date(), event.event_name().trim());
        });
        let records = match (success, records) {
            (true, Some(records)) => records,
            _ => return Err(anyhow!("Failed to parse events")),
        };

        let mut collection = EventCollection::from_events(records);
        let path = collection.export(output).context("Failed to export events")?;
        let hash = collection.update_hash()?.to_string();
        info!("Event set hash: {}", hash);

        Ok(ScrapeSummary {
            path,
            hash,
            events: collection.len(),
            unresolved: pipeline.unresolved_count(),
        })
    }

    pub fn load(&self, path: &Path) -> Result<EventCollection> {
        let mut collection = EventCollection::new();
        collection
            .import(path)
            .with_context(|| format!("Failed to import events from {}", path.display()))?;
        Ok(collection)
    }

    pub fn show(&self, path: &Path, window: EventWindow) -> Result<Vec<EventRecord>> {
        let collection = self.load(path)?;
        let today = Local::now().date_naive();
        Ok(collection
            .filter(|event| window.matches(event, today))
            .into_iter()
            .cloned()
            .collect())
    }

    pub fn hash(&self, path: &Path) -> Result<String> {
        Ok(self.load(path)?.content_hash()?)
    }

    /// Whether two exported files hold different event sets.
    pub fn diff(&self, old: &Path, new: &Path) -> Result<bool> {
        let previous = self.hash(old)?;
        Ok(self.load(new)?.has_changed(&previous)?)
    }
}
