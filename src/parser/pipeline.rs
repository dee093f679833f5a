//! Table extraction followed by date resolution.

use crate::error::{EventError, EventResult};
use crate::event::EventRecord;
use crate::parser::table::{TableExtractor, TableLayout};
use log::{debug, info, warn};
use scraper::Html;

/// Counters from the most recent run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseStats {
    pub rows: usize,
    pub resolved: usize,
    pub unresolved: usize,
}

pub struct ParsePipeline {
    extractor: TableExtractor,
    stats: ParseStats,
}

impl ParsePipeline {
    pub fn new(layout: TableLayout) -> EventResult<Self> {
        Ok(Self::with_extractor(TableExtractor::new(layout)?))
    }

    pub fn with_extractor(extractor: TableExtractor) -> Self {
        Self { extractor, stats: ParseStats::default() }
    }

    /// Returns `(true, Some(records))` when the table was found, even if some
    /// dates stayed unresolved, and `(false, None)` when it was not.
    pub fn run(&mut self, document: &str, reference_year: i32) -> (bool, Option<Vec<EventRecord>>) {
        self.run_with(document, reference_year, |_| {})
    }

    /// Like [`ParsePipeline::run`], calling `on_unresolved` for every record
    /// whose date could not be resolved.
    pub fn run_with<F>(
        &mut self,
        document: &str,
        reference_year: i32,
        on_unresolved: F,
    ) -> (bool, Option<Vec<EventRecord>>)
    where
        F: FnMut(&EventRecord),
    {
        match self.try_parse(document, reference_year, on_unresolved) {
            Ok(records) => (true, Some(records)),
            Err(e) => {
                warn!("Failed to parse events: {}", e);
                (false, None)
            }
        }
    }

    pub fn try_parse<F>(
        &mut self,
        document: &str,
        reference_year: i32,
        mut on_unresolved: F,
    ) -> EventResult<Vec<EventRecord>>
    where
        F: FnMut(&EventRecord),
    {
        self.stats = ParseStats::default();

        let html = Html::parse_document(document);
        let pairs = self.extractor.extract(&html).ok_or(EventError::NoTableFound)?;
        self.stats.rows = pairs.len();

        let mut records = Vec::with_capacity(pairs.len());
        for pair in pairs {
            let mut record = EventRecord::new(pair.name_text, pair.date_text);
            if record.normalize_date(reference_year) {
                self.stats.resolved += 1;
            } else {
                self.stats.unresolved += 1;
                on_unresolved(&record);
            }
            debug!("Parsed event:\n{}", record);
            records.push(record);
        }

        self.report();
        Ok(records)
    }

    pub fn unresolved_count(&self) -> usize {
        self.stats.unresolved
    }

    pub fn stats(&self) -> ParseStats {
        self.stats
    }

    fn report(&self) {
        info!(
            "Parser complete: {} rows, {} resolved, {} unprocessable dates",
            self.stats.rows, self.stats.resolved, self.stats.unresolved
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> TableLayout {
        TableLayout { selector: "table".to_string(), header_rows: 1, ..TableLayout::default() }
    }

    #[test]
    fn test_counters_reset_between_runs() {
        let mut pipeline = ParsePipeline::new(layout()).unwrap();
        let html = "<table><tr><th>h</th></tr><tr><td>TBD</td><td>A</td></tr></table>";

        pipeline.run(html, 2025);
        pipeline.run(html, 2025);
        assert_eq!(pipeline.unresolved_count(), 1);
        assert_eq!(pipeline.stats(), ParseStats { rows: 1, resolved: 0, unresolved: 1 });
    }

    #[test]
    fn test_no_table_is_error() {
        let mut pipeline = ParsePipeline::new(layout()).unwrap();
        let result = pipeline.try_parse("<p>nothing</p>", 2025, |_| {});
        assert!(matches!(result, Err(EventError::NoTableFound)));
        assert_eq!(pipeline.run("<p>nothing</p>", 2025), (false, None));
    }
}
