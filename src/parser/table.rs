//! Event table extraction from an HTML calendar page.

use crate::error::{EventError, EventResult};
use log::debug;
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};

pub const DEFAULT_TABLE_SELECTOR: &str =
    "#introduction > div > div:nth-child(1) > div > div > table > tbody";

/// Where the event table lives and how its rows are laid out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableLayout {
    pub selector: String,
    pub header_rows: usize,
    pub date_column: usize,
    pub name_column: usize,
}

impl Default for TableLayout {
    fn default() -> Self {
        Self {
            selector: DEFAULT_TABLE_SELECTOR.to_string(),
            header_rows: 2,
            date_column: 0,
            name_column: 1,
        }
    }
}

/// Raw cell text of one table row, untrimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEvent {
    pub date_text: String,
    pub name_text: String,
}

impl RawEvent {
    pub fn new(date_text: impl Into<String>, name_text: impl Into<String>) -> Self {
        Self { date_text: date_text.into(), name_text: name_text.into() }
    }
}

pub struct TableExtractor {
    layout: TableLayout,
    table: Selector,
    row: Selector,
}

impl TableExtractor {
    pub fn new(layout: TableLayout) -> EventResult<Self> {
        let table = Selector::parse(&layout.selector)
            .map_err(|_| EventError::InvalidSelector(layout.selector.clone()))?;
        let row = Selector::parse("tr").map_err(|_| EventError::InvalidSelector("tr".into()))?;
        Ok(Self { layout, table, row })
    }

    pub fn layout(&self) -> &TableLayout {
        &self.layout
    }

    /// Parse `html` and extract its event rows.
    pub fn extract_str(&self, html: &str) -> Option<Vec<RawEvent>> {
        self.extract(&Html::parse_document(html))
    }

    /// Rows of the first table matching the layout selector.
    ///
    /// `None` means no table matched; `Some` with an empty vector means the
    /// table had no usable rows.
    pub fn extract(&self, document: &Html) -> Option<Vec<RawEvent>> {
        let Some(table) = document.select(&self.table).next() else {
            debug!("No element matches table selector '{}'", self.layout.selector);
            return None;
        };

        // A selector pointing outside any table (a wrapper div) still owns
        // the rows of the first table below it.
        let allowed_tables = usize::from(!is_table(table) && !has_table_ancestor(table));
        let rows = table
            .select(&self.row)
            .filter(|row| tables_between(*row, table) <= allowed_tables)
            .skip(self.layout.header_rows)
            .enumerate()
            .filter_map(|(index, row)| {
                let raw = self.read_row(row);
                if raw.is_none() {
                    debug!("Skipping malformed row {}", index + self.layout.header_rows);
                }
                raw
            })
            .collect();

        Some(rows)
    }

    fn read_row(&self, row: ElementRef<'_>) -> Option<RawEvent> {
        let cells: Vec<String> = row
            .children()
            .filter_map(ElementRef::wrap)
            .filter(|cell| cell.value().name() == "td")
            .map(|cell| cell.text().collect::<String>())
            .collect();
        let date_text = cells.get(self.layout.date_column)?;
        let name_text = cells.get(self.layout.name_column)?;
        Some(RawEvent::new(date_text.clone(), name_text.clone()))
    }
}

fn is_table(element: ElementRef<'_>) -> bool {
    element.value().name() == "table"
}

fn has_table_ancestor(element: ElementRef<'_>) -> bool {
    element.ancestors().filter_map(ElementRef::wrap).any(is_table)
}

/// Number of `table` elements strictly between `row` and `root`.
fn tables_between(row: ElementRef<'_>, root: ElementRef<'_>) -> usize {
    row.ancestors()
        .take_while(|node| node.id() != root.id())
        .filter_map(ElementRef::wrap)
        .filter(|element| is_table(*element))
        .count()
}
