use super::Row;

/// Rows collected during a run, in scrape order. Read-only once built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregateTable {
    rows: Vec<Row>,
}

impl AggregateTable {
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Sole owner of the table while scraping is in progress
#[derive(Debug, Default)]
pub struct Aggregator {
    table: AggregateTable,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, row: Row) {
        self.table.rows.push(row);
    }

    pub fn view(&self) -> &AggregateTable {
        &self.table
    }

    /// Ends collection and hands the table over for reporting.
    pub fn finish(self) -> AggregateTable {
        self.table
    }
}
