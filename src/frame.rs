//! Ordered table of typed columns flowing through the pipeline.
//!
//! Column order is the input order; assigning an existing name overwrites in place,
//! a new name is appended.

use crate::features::Nullable;
use chrono::NaiveDateTime;

#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    /// Raw cell text as read from the export; `None` is a null cell
    Text(Vec<Option<String>>),
    Number(Vec<Nullable>),
    Time(Vec<Option<NaiveDateTime>>),
    Label(Vec<String>),
}

impl Column {
    pub fn len(&self) -> usize {
        match self {
            Column::Text(v) => v.len(),
            Column::Number(v) => v.len(),
            Column::Time(v) => v.len(),
            Column::Label(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn reorder(&mut self, order: &[usize]) {
        fn pick<T: Clone>(v: &[T], order: &[usize]) -> Vec<T> {
            order.iter().map(|&i| v[i].clone()).collect()
        }
        match self {
            Column::Text(v) => *v = pick(v, order),
            Column::Number(v) => *v = pick(v, order),
            Column::Time(v) => *v = pick(v, order),
            Column::Label(v) => *v = pick(v, order),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    names: Vec<String>,
    columns: Vec<Column>,
    rows: usize,
}

impl Frame {
    /// Build a text frame from a header and row-major cells. Every row must have `headers.len()` cells.
    pub fn from_rows(headers: Vec<String>, rows: Vec<Vec<Option<String>>>) -> Self {
        let n = rows.len();
        let mut columns: Vec<Vec<Option<String>>> =
            headers.iter().map(|_| Vec::with_capacity(n)).collect();
        for row in rows {
            for (col, cell) in columns.iter_mut().zip(row) {
                col.push(cell);
            }
        }
        Self {
            names: headers,
            columns: columns.into_iter().map(Column::Text).collect(),
            rows: n,
        }
    }

    pub fn len(&self) -> usize {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Column)> {
        self.names.iter().map(String::as_str).zip(self.columns.iter())
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    pub fn get(&self, name: &str) -> Option<&Column> {
        self.position(name).map(|i| &self.columns[i])
    }

    pub fn text(&self, name: &str) -> Option<&[Option<String>]> {
        match self.get(name)? {
            Column::Text(v) => Some(v),
            _ => None,
        }
    }

    pub fn numbers(&self, name: &str) -> Option<&[Nullable]> {
        match self.get(name)? {
            Column::Number(v) => Some(v),
            _ => None,
        }
    }

    pub fn times(&self, name: &str) -> Option<&[Option<NaiveDateTime>]> {
        match self.get(name)? {
            Column::Time(v) => Some(v),
            _ => None,
        }
    }

    /// Overwrite `name` in place or append it.
    ///
    /// Panics if the column length differs from the frame's row count (a frame with
    /// no columns adopts the first column's length).
    pub fn set(&mut self, name: &str, column: Column) {
        if self.columns.is_empty() {
            self.rows = column.len();
        }
        assert_eq!(column.len(), self.rows, "column {name:?} length mismatch");
        match self.position(name) {
            Some(i) => self.columns[i] = column,
            None => {
                self.names.push(name.to_string());
                self.columns.push(column);
            }
        }
    }

    /// Permute every column so row `i` becomes old row `order[i]`.
    pub fn reorder(&mut self, order: &[usize]) {
        assert_eq!(order.len(), self.rows);
        for col in &mut self.columns {
            col.reorder(order);
        }
    }

    /// Columns not named in `drop`, in frame order. Unknown names in `drop` are ignored.
    pub fn without<'a>(&'a self, drop: &'a [String]) -> impl Iterator<Item = (&'a str, &'a Column)> {
        self.iter().filter(move |(name, _)| !drop.iter().any(|d| d.as_str() == *name))
    }
}
