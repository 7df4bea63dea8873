//! Diagnostic value rendering.
//!
//! A small closed set of tagged variants covering the shapes the demo
//! prints: scalars, sequences, pairs, mappings, and numeric matrices.
//! Nested containers render as indented multi-line blocks. Display-only;
//! none of this is part of the bridge's wire contract.

use std::fmt;

use rand::Rng;

/// A value the diagnostic renderer knows how to print.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
    /// Ordered sequence, rendered in `[ ]`.
    Seq(Vec<Value>),
    /// Two values, rendered in `( )`.
    Pair(Box<Value>, Box<Value>),
    /// Key/value entries, rendered in `{ }` in insertion order.
    Map(Vec<(Value, Value)>),
    /// Numeric matrix, rendered as aligned rows.
    Matrix(Matrix),
}

impl Value {
    /// Build a pair without writing the boxes out.
    pub fn pair(first: impl Into<Value>, second: impl Into<Value>) -> Self {
        Value::Pair(Box::new(first.into()), Box::new(second.into()))
    }

    fn fmt_at(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        let pad = "  ".repeat(indent + 1);
        let close = "  ".repeat(indent);
        match self {
            Value::Int(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::Bool(v) => write!(f, "{}", v),
            Value::Text(v) => write!(f, "{}", v),
            Value::Seq(items) => {
                if items.is_empty() {
                    return write!(f, "[]");
                }
                writeln!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    write!(f, "{}", pad)?;
                    item.fmt_at(f, indent + 1)?;
                    if i + 1 != items.len() {
                        writeln!(f, ",")?;
                    } else {
                        writeln!(f)?;
                    }
                }
                write!(f, "{}]", close)
            }
            Value::Pair(first, second) => {
                writeln!(f, "(")?;
                write!(f, "{}", pad)?;
                first.fmt_at(f, indent + 1)?;
                writeln!(f, ",")?;
                write!(f, "{}", pad)?;
                second.fmt_at(f, indent + 1)?;
                writeln!(f)?;
                write!(f, "{})", close)
            }
            Value::Map(entries) => {
                if entries.is_empty() {
                    return write!(f, "{{}}");
                }
                writeln!(f, "{{")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    write!(f, "{}", pad)?;
                    key.fmt_at(f, indent + 1)?;
                    write!(f, ": ")?;
                    value.fmt_at(f, indent + 1)?;
                    if i + 1 != entries.len() {
                        writeln!(f, ",")?;
                    } else {
                        writeln!(f)?;
                    }
                }
                write!(f, "{}}}", close)
            }
            Value::Matrix(matrix) => {
                let rendered = matrix.to_string();
                for (i, line) in rendered.lines().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                        write!(f, "{}", close)?;
                    }
                    write!(f, "{}", line)?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_at(f, 0)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v.into())
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<Matrix> for Value {
    fn from(v: Matrix) -> Self {
        Value::Matrix(v)
    }
}

/// Row-major numeric matrix for diagnostic output.
///
/// Holds its cells for display only; there is no arithmetic here.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// Create a matrix with entries drawn uniformly from `[0, 1)`.
    pub fn random(rows: usize, cols: usize) -> Self {
        let mut rng = rand::thread_rng();
        let data = (0..rows * cols).map(|_| rng.gen::<f64>()).collect();
        Self { rows, cols, data }
    }

    /// Build a matrix from rows. Returns `None` if the rows are ragged.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Option<Self> {
        let row_count = rows.len();
        let col_count = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|row| row.len() != col_count) {
            return None;
        }
        let data = rows.into_iter().flatten().collect();
        Some(Self {
            rows: row_count,
            cols: col_count,
            data,
        })
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Fetch a cell, if in range.
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        Some(self.data[row * self.cols + col])
    }

    /// Apply `f` to every entry, returning a new matrix.
    pub fn map(&self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().map(|&v| f(v)).collect(),
        }
    }
}

impl fmt::Display for Matrix {
    /// Rows on separate lines, columns right-aligned to their widest cell.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cells: Vec<String> = self.data.iter().map(|v| v.to_string()).collect();
        let mut widths = vec![0usize; self.cols];
        for (i, cell) in cells.iter().enumerate() {
            let col = i % self.cols;
            widths[col] = widths[col].max(cell.len());
        }
        for row in 0..self.rows {
            if row > 0 {
                writeln!(f)?;
            }
            for col in 0..self.cols {
                if col > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{:>width$}", cells[row * self.cols + col], width = widths[col])?;
            }
        }
        Ok(())
    }
}
