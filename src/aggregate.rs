/// Cell texts read from one column, in sheet order, header excluded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedRows(Vec<String>);

impl ExtractedRows {
    pub fn new(rows: Vec<String>) -> Self {
        ExtractedRows(rows)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

/// The single text blob sent for summarization: optional context line first,
/// then every extracted row, newline-joined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateText {
    text: String,
    rows: usize,
}

impl AggregateText {
    pub fn build(context: Option<&str>, rows: ExtractedRows) -> Self {
        let context = context.filter(|c| !c.trim().is_empty());
        let lines: Vec<&str> = context.into_iter().chain(rows.iter()).collect();
        AggregateText {
            text: lines.join("\n"),
            rows: rows.len(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Data rows only; the context line is not counted.
    pub fn row_count(&self) -> usize {
        self.rows
    }

    pub fn has_rows(&self) -> bool {
        self.rows > 0
    }
}
