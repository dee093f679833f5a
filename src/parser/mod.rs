/// Calendar page parsing
///
/// `table` pulls raw date/name pairs out of the page, `date` resolves date
/// text and `pipeline` ties the two together.
pub mod date;
pub mod pipeline;
pub mod table;

pub use date::normalize;
pub use pipeline::{ParsePipeline, ParseStats};
pub use table::{RawEvent, TableExtractor, TableLayout, DEFAULT_TABLE_SELECTOR};
