//! # Report Cells and Ranges
//!
//! Values written to the destination spreadsheet and the A1-notation range they
//! are written into.

use crate::config::{ConfigResult, ConfigurationError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A single spreadsheet cell value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Integer(i64),
    Number(f64),
    Text(String),
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(value) => write!(f, "{value}"),
            Self::Number(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
        }
    }
}

/// Rectangular A1 range such as `A2:Z1000`. Rows and columns are 1-based and inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellRange {
    pub start_column: u32,
    pub start_row: u32,
    pub end_column: u32,
    pub end_row: u32,
}

impl CellRange {
    pub fn parse(range: &str) -> ConfigResult<Self> {
        let range = range.trim();
        let (start, end) = match range.split_once(':') {
            Some((start, end)) => (start, end),
            None => (range, range),
        };

        let (start_column, start_row) = parse_cell(start)
            .ok_or_else(|| ConfigurationError::invalid_range(range, format!("bad cell '{start}'")))?;
        let (end_column, end_row) = parse_cell(end)
            .ok_or_else(|| ConfigurationError::invalid_range(range, format!("bad cell '{end}'")))?;

        if end_column < start_column || end_row < start_row {
            return Err(ConfigurationError::invalid_range(
                range,
                "end cell must not precede start cell",
            ));
        }

        Ok(Self {
            start_column,
            start_row,
            end_column,
            end_row,
        })
    }

    /// Top-left cell, where writes begin
    pub fn anchor(&self) -> String {
        format!("{}{}", column_name(self.start_column), self.start_row)
    }

    pub fn row_capacity(&self) -> usize {
        (self.end_row - self.start_row + 1) as usize
    }

    pub fn column_capacity(&self) -> usize {
        (self.end_column - self.start_column + 1) as usize
    }

    pub fn contains(&self, column: u32, row: u32) -> bool {
        (self.start_column..=self.end_column).contains(&column)
            && (self.start_row..=self.end_row).contains(&row)
    }
}

impl FromStr for CellRange {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}:{}{}",
            column_name(self.start_column),
            self.start_row,
            column_name(self.end_column),
            self.end_row
        )
    }
}

fn parse_cell(cell: &str) -> Option<(u32, u32)> {
    let split = cell.find(|c: char| c.is_ascii_digit())?;
    let (letters, digits) = cell.split_at(split);
    if letters.is_empty() || letters.len() > 3 || !letters.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }

    let column = letters
        .chars()
        .fold(0u32, |acc, c| acc * 26 + (c.to_ascii_uppercase() as u32 - 'A' as u32 + 1));
    let row: u32 = digits.parse().ok()?;
    (row > 0).then_some((column, row))
}

/// 1 -> A, 26 -> Z, 27 -> AA
fn column_name(mut column: u32) -> String {
    let mut name = Vec::new();
    while column > 0 {
        let rem = (column - 1) % 26;
        name.push(b'A' + rem as u8);
        column = (column - 1) / 26;
    }
    name.reverse();
    String::from_utf8(name).unwrap_or_default()
}
