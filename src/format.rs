//! Matrix encodings used in the pattern store.
//!
//! Each pattern is stored as a sequence of rows, one per `y`, each row holding
//! the cells for `x = 0..width`. The row is then encoded according to the
//! format tag:
//!
//! | tag  | row encoding                                  |
//! |------|-----------------------------------------------|
//! | `ai` | `[0, 1, 1]` (default)                         |
//! | `as` | `["0", "1", "1"]`                             |
//! | `s`  | `"011"`                                       |
//! | `i`  | `3` (the digit string read as base 2, MSB first) |

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::grid::{GridError, Matrix};

/// Widest row the `i` format can hold.
pub const MAX_INTEGER_ROW_BITS: usize = u64::BITS as usize;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    #[error("unknown format tag '{0}' (expected one of: ai, as, s, i)")]
    UnknownTag(String),

    #[error("rows of {width} cells do not fit the 'i' format (max {max})")]
    RowTooWide { width: usize, max: usize },

    #[error("row {row}: {reason}")]
    InvalidRow { row: usize, reason: String },

    #[error("stored pattern is not a list of rows")]
    NotRows,

    #[error(transparent)]
    Shape(#[from] GridError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    #[default]
    ArrayOfInts,
    ArrayOfStrings,
    String,
    Integer,
}

impl Format {
    pub const ALL: [Format; 4] = [
        Format::ArrayOfInts,
        Format::ArrayOfStrings,
        Format::String,
        Format::Integer,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            Format::ArrayOfInts => "ai",
            Format::ArrayOfStrings => "as",
            Format::String => "s",
            Format::Integer => "i",
        }
    }

    /// Reject grids this format cannot store. Only `i` has a limit.
    pub fn check_width(self, width: usize) -> Result<(), FormatError> {
        if self == Format::Integer && width > MAX_INTEGER_ROW_BITS {
            return Err(FormatError::RowTooWide {
                width,
                max: MAX_INTEGER_ROW_BITS,
            });
        }
        Ok(())
    }

    /// Encode `matrix` as a JSON list of rows.
    pub fn encode(self, matrix: &Matrix) -> Result<Value, FormatError> {
        self.check_width(matrix.width())?;
        let rows = matrix.rows().map(|row| self.encode_row(row)).collect();
        Ok(Value::Array(rows))
    }

    fn encode_row(self, row: &[bool]) -> Value {
        let digit = |c: &bool| if *c { '1' } else { '0' };
        match self {
            Format::ArrayOfInts => row.iter().map(|&c| Value::from(u8::from(c))).collect(),
            Format::ArrayOfStrings => row
                .iter()
                .map(|c| Value::String(digit(c).to_string()))
                .collect(),
            Format::String => Value::String(row.iter().map(digit).collect()),
            Format::Integer => {
                let bits = row.iter().fold(0u64, |acc, &c| (acc << 1) | u64::from(c));
                Value::from(bits)
            }
        }
    }

    /// Guess the format of a stored pattern from its JSON shape.
    ///
    /// The four encodings differ in JSON types, so a non-empty pattern
    /// identifies its format unambiguously.
    pub fn detect(value: &Value) -> Option<Format> {
        let first = value.as_array()?.first()?;
        match first {
            Value::Array(cells) => match cells.first()? {
                Value::Number(_) => Some(Format::ArrayOfInts),
                Value::String(_) => Some(Format::ArrayOfStrings),
                _ => None,
            },
            Value::String(_) => Some(Format::String),
            Value::Number(_) => Some(Format::Integer),
            _ => None,
        }
    }

    /// Decode a stored pattern back into a [`Matrix`].
    ///
    /// `width_hint` is only consulted for `i`, whose rows lose leading zeros;
    /// without it the widest row's bit length is used.
    pub fn decode(self, value: &Value, width_hint: Option<usize>) -> Result<Matrix, FormatError> {
        let rows = value.as_array().ok_or(FormatError::NotRows)?;
        let decoded = match self {
            Format::Integer => decode_integer_rows(rows, width_hint)?,
            _ => rows
                .iter()
                .enumerate()
                .map(|(y, row)| self.decode_row(y, row))
                .collect::<Result<Vec<_>, _>>()?,
        };
        Ok(Matrix::from_rows(decoded)?)
    }

    fn decode_row(self, y: usize, row: &Value) -> Result<Vec<bool>, FormatError> {
        let invalid = |reason: &str| FormatError::InvalidRow {
            row: y,
            reason: reason.to_string(),
        };
        match self {
            Format::ArrayOfInts => row
                .as_array()
                .ok_or_else(|| invalid("expected a list of 0/1 integers"))?
                .iter()
                .map(|cell| match cell.as_u64() {
                    Some(0) => Ok(false),
                    Some(1) => Ok(true),
                    _ => Err(invalid(&format!("cell {cell} is not 0 or 1"))),
                })
                .collect(),
            Format::ArrayOfStrings => row
                .as_array()
                .ok_or_else(|| invalid("expected a list of \"0\"/\"1\" strings"))?
                .iter()
                .map(|cell| match cell.as_str() {
                    Some("0") => Ok(false),
                    Some("1") => Ok(true),
                    _ => Err(invalid(&format!("cell {cell} is not \"0\" or \"1\""))),
                })
                .collect(),
            Format::String => row
                .as_str()
                .ok_or_else(|| invalid("expected a digit string"))?
                .chars()
                .map(|ch| match ch {
                    '0' => Ok(false),
                    '1' => Ok(true),
                    other => Err(invalid(&format!("'{other}' is not a binary digit"))),
                })
                .collect(),
            Format::Integer => unreachable!("integer rows are decoded together"),
        }
    }
}

fn decode_integer_rows(rows: &[Value], width_hint: Option<usize>) -> Result<Vec<Vec<bool>>, FormatError> {
    let values = rows
        .iter()
        .enumerate()
        .map(|(y, row)| {
            row.as_u64().ok_or_else(|| FormatError::InvalidRow {
                row: y,
                reason: format!("{row} is not a non-negative integer"),
            })
        })
        .collect::<Result<Vec<u64>, _>>()?;

    let needed = values
        .iter()
        .map(|v| (u64::BITS - v.leading_zeros()) as usize)
        .max()
        .unwrap_or(0)
        .max(1);
    let width = width_hint.unwrap_or(needed);
    Format::Integer.check_width(width)?;
    if let Some(y) = values.iter().position(|&v| width < MAX_INTEGER_ROW_BITS && v >> width != 0) {
        return Err(FormatError::InvalidRow {
            row: y,
            reason: format!("{} does not fit in {width} cells", values[y]),
        });
    }

    Ok(values
        .iter()
        .map(|&v| (0..width).rev().map(|bit| (v >> bit) & 1 == 1).collect())
        .collect())
}

impl FromStr for Format {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Format::ALL
            .into_iter()
            .find(|f| f.tag() == s.trim())
            .ok_or_else(|| FormatError::UnknownTag(s.to_string()))
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}
