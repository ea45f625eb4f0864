// CobbleLog - core/export.rs
//
// CSV serialisation of the currently filtered records.
// Core layer: builds the document in memory; writing it out is a thin wrapper.
//
// Default output is unescaped: cells are joined with ',' as-is, so a value
// containing a comma or newline shifts the columns. `CsvStyle::Quoted` routes
// the same cells through the csv writer instead.

use crate::core::model::{cell_text, join_values, parse_timestamp, LogRecord};
use crate::util::constants;
use crate::util::error::{ExportError, MalformedRecord};
use chrono::TimeZone;
use serde_json::Value;
use std::fmt::Display;
use std::path::Path;

/// Fixed header row, in column order.
pub const CSV_HEADERS: [&str; 10] = [
    "Report time",
    "Cobble time",
    "Reported by",
    "Duration",
    "Region",
    "Sensor ID",
    "Profile",
    "Stoppage",
    "Measure",
    "Comment",
];

/// How cells are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CsvStyle {
    /// Join cells with ',' without escaping.
    #[default]
    Raw,
    /// Quote cells that contain separators, quotes or newlines.
    Quoted,
}

/// A rendered CSV document plus the records that could not be rendered.
#[derive(Debug, Clone)]
pub struct CsvDocument {
    pub text: String,
    /// Number of data rows written (header excluded).
    pub rows: usize,
    pub malformed: Vec<MalformedRecord>,
}

/// Render a timestamp field the way the report table shows it,
/// e.g. `3/14/2024, 9:05:00 AM`. Missing or unparseable values render as
/// `Invalid Date`.
pub fn localized_time<Tz>(value: Option<&Value>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    value
        .and_then(|v| parse_timestamp(v, tz))
        .map(|dt| dt.format(constants::LOCALIZED_TIME_FORMAT).to_string())
        .unwrap_or_else(|| constants::INVALID_DATE.to_string())
}

/// Derive the ten display cells of a record, in `CSV_HEADERS` order.
///
/// `position` is only used to identify the record in the error.
pub fn project_row<Tz>(
    record: &LogRecord,
    position: usize,
    tz: &Tz,
) -> Result<[String; 10], MalformedRecord>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let reported_by = record.author_username().ok_or_else(|| MalformedRecord {
        position,
        id: record.id(),
        field: "author.username",
    })?;

    let sensor_id = match record.field("sensorID") {
        Some(Value::Array(items)) => join_values(items, ", "),
        other => cell_text(other),
    };

    // Remaining columns are looked up by lower-cased header text.
    let by_header = |header: &str| cell_text(record.field(&header.to_lowercase()));

    Ok([
        localized_time(record.field("time"), tz),
        localized_time(record.field("createdAt"), tz),
        reported_by,
        by_header("Duration"),
        by_header("Region"),
        sensor_id,
        cell_text(record.field("profile")),
        by_header("Stoppage"),
        by_header("Measure"),
        by_header("Comment"),
    ])
}

/// Serialise `records` into a CSV document.
///
/// Rows are separated by '\n' with no trailing newline. Malformed records
/// are skipped, logged and listed in the result; they never abort the export.
pub fn render_csv<'a, I, Tz>(
    records: I,
    style: CsvStyle,
    tz: &Tz,
) -> Result<CsvDocument, ExportError>
where
    I: IntoIterator<Item = &'a LogRecord>,
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let mut rows: Vec<[String; 10]> = Vec::new();
    let mut malformed = Vec::new();

    for (position, record) in records.into_iter().enumerate() {
        match project_row(record, position, tz) {
            Ok(cells) => rows.push(cells),
            Err(e) => {
                tracing::warn!(error = %e, "Skipping malformed record in CSV export");
                malformed.push(e);
            }
        }
    }

    let text = match style {
        CsvStyle::Raw => render_raw(&rows),
        CsvStyle::Quoted => render_quoted(&rows)?,
    };

    tracing::debug!(
        rows = rows.len(),
        skipped = malformed.len(),
        ?style,
        "CSV document rendered"
    );

    Ok(CsvDocument {
        text,
        rows: rows.len(),
        malformed,
    })
}

fn render_raw(rows: &[[String; 10]]) -> String {
    std::iter::once(CSV_HEADERS.join(","))
        .chain(rows.iter().map(|cells| cells.join(",")))
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_quoted(rows: &[[String; 10]]) -> Result<String, ExportError> {
    let mut csv_writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .quote_style(csv::QuoteStyle::Necessary)
        .from_writer(Vec::new());

    csv_writer
        .write_record(CSV_HEADERS)
        .map_err(|e| ExportError::Csv { source: e })?;
    for cells in rows {
        csv_writer
            .write_record(cells)
            .map_err(|e| ExportError::Csv { source: e })?;
    }

    let bytes = csv_writer.into_inner().map_err(|e| ExportError::Csv {
        source: csv::Error::from(e.into_error()),
    })?;

    let mut text = String::from_utf8_lossy(&bytes).into_owned();
    if text.ends_with('\n') {
        text.pop();
    }
    Ok(text)
}

/// Write a rendered document to `path`.
pub fn save_document(document: &CsvDocument, path: &Path) -> Result<(), ExportError> {
    std::fs::write(path, document.text.as_bytes()).map_err(|e| ExportError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    tracing::info!(
        path = %path.display(),
        rows = document.rows,
        mime = constants::CSV_MIME_TYPE,
        "CSV export written"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    const HEADER_LINE: &str = "Report time,Cobble time,Reported by,Duration,Region,\
                               Sensor ID,Profile,Stoppage,Measure,Comment";

    fn record(value: Value) -> LogRecord {
        LogRecord::from_value(value).unwrap()
    }

    fn full_record() -> LogRecord {
        record(json!({
            "_id": "1",
            "time": "2024-03-14T09:05:00.000Z",
            "createdAt": "2024-03-14T21:30:15.000Z",
            "author": {"username": "bob"},
            "region": "north",
            "sensorID": [1, 2],
            "profile": "p1",
            "duration": 5,
            "stoppage": "none",
            "measure": "m",
            "comment": "ok"
        }))
    }

    #[test]
    fn test_header_only_for_empty_input() {
        let empty: Vec<LogRecord> = Vec::new();
        let doc = render_csv(&empty, CsvStyle::Raw, &Utc).unwrap();
        assert_eq!(doc.text, HEADER_LINE);
        assert_eq!(doc.rows, 0);
    }

    #[test]
    fn test_header_independent_of_record_contents() {
        let recs = vec![record(json!({"author": {"username": "x"}, "extra": "field"}))];
        let doc = render_csv(&recs, CsvStyle::Raw, &Utc).unwrap();
        assert_eq!(doc.text.lines().next(), Some(HEADER_LINE));
    }

    #[test]
    fn test_full_row() {
        let recs = vec![full_record()];
        let doc = render_csv(&recs, CsvStyle::Raw, &Utc).unwrap();
        let body: Vec<&str> = doc.text.lines().skip(1).collect();
        assert_eq!(
            body,
            vec!["3/14/2024, 9:05:00 AM,3/14/2024, 9:30:15 PM,bob,5,north,1, 2,p1,none,m,ok"]
        );
        assert!(!doc.text.ends_with('\n'));
    }

    #[test]
    fn test_sensor_id_forms() {
        let tz = Utc;
        let list = record(json!({"author": {"username": "a"}, "sensorID": [1, 2, 3]}));
        let scalar = record(json!({"author": {"username": "a"}, "sensorID": 7}));
        assert_eq!(project_row(&list, 0, &tz).unwrap()[5], "1, 2, 3");
        assert_eq!(project_row(&scalar, 0, &tz).unwrap()[5], "7");
    }

    #[test]
    fn test_missing_fields_render_blank_and_invalid_date() {
        let r = record(json!({"author": {"username": "a"}, "time": "garbage"}));
        let cells = project_row(&r, 0, &Utc).unwrap();
        assert_eq!(cells[0], "Invalid Date");
        assert_eq!(cells[1], "Invalid Date");
        assert_eq!(cells[3], "");
        assert_eq!(cells[9], "");
    }

    #[test]
    fn test_localized_time_forms() {
        let at = |s: &str| localized_time(Some(&json!(s)), &Utc);
        assert_eq!(at("2024-03-14T09:05"), "3/14/2024, 9:05:00 AM");
        assert_eq!(at("2024-03-14"), "3/14/2024, 12:00:00 AM");
        assert_eq!(at("2024-03-14T21:05:00"), "3/14/2024, 9:05:00 PM");
        assert_eq!(localized_time(None, &Utc), "Invalid Date");
    }

    #[test]
    fn test_localized_time_keeps_wall_clock_in_rendering_zone() {
        let plus_one = chrono::FixedOffset::east_opt(3600).unwrap();
        assert_eq!(
            localized_time(Some(&json!("2024-03-14T09:05")), &plus_one),
            "3/14/2024, 9:05:00 AM"
        );
        assert_eq!(
            localized_time(Some(&json!("2024-03-14T09:05:00Z")), &plus_one),
            "3/14/2024, 10:05:00 AM"
        );
    }

    #[test]
    fn test_numeric_username_is_rendered() {
        let r = record(json!({"author": {"username": 1042}}));
        assert_eq!(project_row(&r, 0, &Utc).unwrap()[2], "1042");
    }

    #[test]
    fn test_malformed_record_is_skipped_not_fatal() {
        let recs = vec![
            record(json!({"_id": "bad", "region": "x"})),
            full_record(),
        ];
        let doc = render_csv(&recs, CsvStyle::Raw, &Utc).unwrap();
        assert_eq!(doc.rows, 1);
        assert_eq!(doc.text.lines().count(), 2);
        assert_eq!(doc.malformed.len(), 1);
        assert_eq!(doc.malformed[0].id.as_deref(), Some("bad"));
        assert_eq!(doc.malformed[0].field, "author.username");
    }

    #[test]
    fn test_raw_style_does_not_escape() {
        let recs = vec![record(json!({
            "author": {"username": "a"},
            "comment": "late, again"
        }))];
        let doc = render_csv(&recs, CsvStyle::Raw, &Utc).unwrap();
        assert!(doc.text.ends_with(",late, again"));
    }

    #[test]
    fn test_quoted_style_escapes_separators() {
        let recs = vec![record(json!({
            "author": {"username": "a"},
            "comment": "late, \"again\""
        }))];
        let doc = render_csv(&recs, CsvStyle::Quoted, &Utc).unwrap();
        let mut lines = doc.text.lines();
        assert_eq!(lines.next(), Some(HEADER_LINE));
        let row = lines.next().unwrap();
        assert!(row.starts_with("Invalid Date,Invalid Date,a,"));
        assert!(row.ends_with(",\"late, \"\"again\"\"\""));
        assert!(!doc.text.ends_with('\n'));
    }

    #[test]
    fn test_save_document_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(constants::DEFAULT_EXPORT_FILE_NAME);
        let doc = render_csv(&[full_record()], CsvStyle::Raw, &Utc).unwrap();
        save_document(&doc, &path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), doc.text);
    }
}
