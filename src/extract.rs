use std::path::Path;

use calamine::{open_workbook_auto, Data, ExcelDateTime, Range, Reader};
use tracing::{debug, info, warn};

use crate::aggregate::{AggregateText, ExtractedRows};
use crate::column::ColumnAddress;
use crate::error::ExtractError;

/// Sheet row 1 holds the header; data starts at sheet row 2 (0-based row 1).
const FIRST_DATA_ROW: u32 = 1;

/// Something that can hand back the first worksheet of a spreadsheet file.
pub trait SheetSource {
    fn first_sheet(&self, path: &Path) -> Result<Range<Data>, ExtractError>;
}

/// Reads spreadsheets from disk with calamine (xlsx, xlsm, xlsb, xls, ods).
pub struct WorkbookSource;

impl SheetSource for WorkbookSource {
    fn first_sheet(&self, path: &Path) -> Result<Range<Data>, ExtractError> {
        if !path.is_file() {
            return Err(ExtractError::FileNotFound(path.to_path_buf()));
        }

        let unreadable = |reason: String| ExtractError::Unreadable {
            path: path.to_path_buf(),
            reason,
        };

        // Workbook is dropped on return, so the file is released before summarization.
        let mut workbook = open_workbook_auto(path).map_err(|e| unreadable(e.to_string()))?;
        match workbook.worksheet_range_at(0) {
            Some(Ok(range)) => Ok(range),
            Some(Err(e)) => Err(unreadable(e.to_string())),
            None => Err(ExtractError::NoWorksheet(path.to_path_buf())),
        }
    }
}

pub struct ColumnExtractor<'a, S: SheetSource> {
    source: &'a S,
}

impl<'a, S: SheetSource> ColumnExtractor<'a, S> {
    pub fn new(source: &'a S) -> Self {
        ColumnExtractor { source }
    }

    /// Read `label`'s column from the first worksheet and join it behind `context`.
    pub fn extract(
        &self,
        path: &Path,
        label: &str,
        context: Option<&str>,
    ) -> Result<AggregateText, ExtractError> {
        let column: ColumnAddress = label.parse()?;
        let range = self.source.first_sheet(path)?;
        let rows = read_column(&range, column);
        if rows.is_empty() {
            warn!(column = %column, "No data below the header row");
        }
        info!(path = %path.display(), column = %column, rows = rows.len(), "Extracted column");
        Ok(AggregateText::build(context, rows))
    }
}

/// Walk down `column` from the first data row, stopping at the first cell that
/// is missing, empty, or whitespace-only. Anything below a gap is not read.
pub fn read_column(range: &Range<Data>, column: ColumnAddress) -> ExtractedRows {
    let col = column.offset();
    let mut rows = Vec::new();
    let mut row = FIRST_DATA_ROW;
    loop {
        let text = range
            .get_value((row, col))
            .map(render_cell)
            .unwrap_or_default();
        if text.trim().is_empty() {
            debug!(row = row + 1, "Stopped at empty cell");
            break;
        }
        rows.push(text);
        row += 1;
    }
    ExtractedRows::new(rows)
}

/// Text a cell shows when rendered.
fn render_cell(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::Error(e) => e.to_string(),
        Data::DateTime(dt) => render_datetime(dt),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
    }
}

/// ISO date, with the time only when it is not midnight. Durations render as
/// elapsed `h:mm:ss`, hours unbounded.
fn render_datetime(dt: &ExcelDateTime) -> String {
    if dt.is_duration() {
        let total_secs = (dt.as_f64() * 86_400.0).round() as i64;
        let sign = if total_secs < 0 { "-" } else { "" };
        let secs = total_secs.abs();
        return format!("{sign}{}:{:02}:{:02}", secs / 3600, secs % 3600 / 60, secs % 60);
    }

    let (year, month, day, hour, minute, second, milli) = dt.to_ymd_hms_milli();
    let date = format!("{year:04}-{month:02}-{day:02}");
    match (hour, minute, second, milli) {
        (0, 0, 0, 0) => date,
        (_, _, _, 0) => format!("{date} {hour:02}:{minute:02}:{second:02}"),
        _ => format!("{date} {hour:02}:{minute:02}:{second:02}.{milli:03}"),
    }
}
