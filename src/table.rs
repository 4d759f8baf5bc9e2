//! Delimited-text table parsing with header inference.
//!
//! Copied page text arrives as lines of tab-separated cells. Rows are grouped into runs that share
//! a field count; the first row of any run longer than one is taken to be that run's header.

use serde::{Serialize, Serializer};

/// Field separator used by rendered table text.
pub const DEFAULT_DELIMITER: char = '\t';

#[derive(Clone, Debug, PartialEq, Eq)]
/// One line of a parsed table.
pub enum Row {
    /// Ordinary data fields.
    Plain(Vec<String>),
    /// Fields of the first row of a same-width run.
    Header(Vec<String>),
}

impl Row {
    #[must_use]
    /// Fields in order, whether or not the row is a header.
    pub fn fields(&self) -> &[String] {
        match self {
            Self::Plain(fields) | Self::Header(fields) => fields,
        }
    }

    #[must_use]
    /// Whether this row was promoted to a header.
    pub fn is_header(&self) -> bool {
        matches!(self, Self::Header(_))
    }

    fn promote(&mut self) {
        if let Self::Plain(fields) = self {
            *self = Self::Header(std::mem::take(fields));
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
/// Structured result of parsing copied text.
pub struct Table {
    /// Rows in input order.
    pub rows: Vec<Row>,
}

impl Table {
    #[must_use]
    /// Number of rows, headers included.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    /// Whether no non-blank line was found.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Header rows in order.
    pub fn headers(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter().filter(|row| row.is_header())
    }
}

/// Clipboard shape of a table: nested `children` objects tagged by `type`.
#[derive(Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum Wire<'a> {
    Row { children: Vec<Wire<'a>> },
    Header { children: Vec<Wire<'a>> },
    Field { value: &'a str },
}

fn wire_fields(fields: &[String]) -> Vec<Wire<'_>> {
    fields.iter().map(|value| Wire::Field { value }).collect()
}

impl Serialize for Table {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Root<'a> {
            children: Vec<Wire<'a>>,
        }

        let children = self
            .rows
            .iter()
            .map(|row| match row {
                Row::Plain(fields) => Wire::Row {
                    children: wire_fields(fields),
                },
                Row::Header(fields) => Wire::Row {
                    children: vec![Wire::Header {
                        children: wire_fields(fields),
                    }],
                },
            })
            .collect();

        Root { children }.serialize(serializer)
    }
}

#[must_use]
/// Parses tab-delimited text into a [`Table`].
pub fn parse_table_text(text: &str) -> Table {
    parse_table_text_with(text, DEFAULT_DELIMITER)
}

#[must_use]
/// Parses text split on `delimiter` into a [`Table`].
///
/// Blank lines are dropped, fields are kept verbatim, and every run of two or more consecutive
/// rows with the same field count has its first row promoted to [`Row::Header`].
pub fn parse_table_text_with(text: &str, delimiter: char) -> Table {
    let mut rows: Vec<Row> = text
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .filter(|line| !line.trim().is_empty())
        .map(|line| Row::Plain(line.split(delimiter).map(str::to_string).collect()))
        .collect();

    let mut run_start = 0;
    for i in 1..=rows.len() {
        let run_width = rows[run_start].fields().len();
        let run_ended = i == rows.len() || rows[i].fields().len() != run_width;
        if run_ended {
            if i - run_start > 1 {
                rows[run_start].promote();
            }
            run_start = i;
        }
    }

    Table { rows }
}

#[cfg(test)]
#[path = "tests/table.rs"]
mod tests;
