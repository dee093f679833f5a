use calscrape::parser::{ParsePipeline, RawEvent, TableExtractor, TableLayout};
use calscrape::EventRecord;
use chrono::NaiveDate;
use pretty_assertions::assert_eq;

/// Mirrors the structure of the published calendar page.
fn calendar_page(rows: &[&[&str]]) -> String {
    let body: String = rows
        .iter()
        .map(|cells| {
            let cells: String = cells.iter().map(|c| format!("<td>{}</td>", c)).collect();
            format!("<tr>{}</tr>\n", cells)
        })
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html>
<head><title>Calendar</title></head>
<body>
  <section id="introduction">
    <div>
      <div>
        <div>
          <div>
            <table>
              <tbody>
                <tr><th colspan="2">Spring Calendar</th></tr>
                <tr><td><strong>Date</strong></td><td><strong>Event</strong></td></tr>
                {}
              </tbody>
            </table>
          </div>
        </div>
      </div>
      <div><p>Footnotes</p></div>
    </div>
  </section>
</body>
</html>"#,
        body
    )
}

fn scenario_page() -> String {
    calendar_page(&[&["Jan. 5 - Jan. 6", "Talk A"], &["Foo 99", "Talk B"], &["x"]])
}

#[test]
fn extractor_skips_headers_and_short_rows() {
    let extractor = TableExtractor::new(TableLayout::default()).unwrap();
    let rows = extractor.extract_str(&scenario_page()).unwrap();
    assert_eq!(
        rows,
        vec![RawEvent::new("Jan. 5 - Jan. 6", "Talk A"), RawEvent::new("Foo 99", "Talk B")]
    );
}

#[test]
fn pipeline_resolves_and_counts_unresolved() {
    let mut pipeline = ParsePipeline::new(TableLayout::default()).unwrap();
    let mut unresolved: Vec<String> = Vec::new();

    let (success, records) = pipeline.run_with(&scenario_page(), 2025, |event| {
        unresolved.push(event.event_name().to_string());
    });

    assert!(success);
    let records = records.unwrap();
    assert_eq!(records.len(), 2);

    assert_eq!(records[0].event_name(), "Talk A");
    assert_eq!(records[0].event_date(), "Jan. 5 - Jan. 6");
    assert_eq!(
        records[0].resolved_date(),
        NaiveDate::from_ymd_opt(2025, 1, 5).unwrap().and_hms_opt(0, 0, 0)
    );

    assert_eq!(records[1].event_name(), "Talk B");
    assert!(records[1].is_unresolved());

    assert_eq!(pipeline.unresolved_count(), 1);
    assert_eq!(unresolved, vec!["Talk B".to_string()]);

    let stats = pipeline.stats();
    assert_eq!((stats.rows, stats.resolved, stats.unresolved), (2, 1, 1));
}

#[test]
fn pipeline_without_table_reports_failure() {
    let mut pipeline = ParsePipeline::new(TableLayout::default()).unwrap();
    let page = "<html><body><section id=\"introduction\"><p>Coming soon</p></section></body></html>";
    assert_eq!(pipeline.run(page, 2025), (false, None));
    assert_eq!(pipeline.unresolved_count(), 0);
}

#[test]
fn pipeline_with_empty_table_succeeds() {
    let mut pipeline = ParsePipeline::new(TableLayout::default()).unwrap();
    let (success, records) = pipeline.run(&calendar_page(&[]), 2025);
    assert!(success);
    assert_eq!(records, Some(Vec::<EventRecord>::new()));
}

#[test]
fn pipeline_keeps_raw_cell_text() {
    let mut pipeline = ParsePipeline::new(TableLayout::default()).unwrap();
    let page = calendar_page(&[&["\n  Wed. Feb. 12\n", " Workshop <em>B</em> "]]);
    let (_, records) = pipeline.run(&page, 2026);
    let records = records.unwrap();

    assert_eq!(records[0].event_date(), "\n  Wed. Feb. 12\n");
    assert_eq!(records[0].event_name(), " Workshop B ");
    assert_eq!(
        records[0].resolved_date(),
        NaiveDate::from_ymd_opt(2026, 2, 12).unwrap().and_hms_opt(0, 0, 0)
    );
}
