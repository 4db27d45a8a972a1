//! A1-notation parsing and formatting for zones.
//!
//! Supported forms: `B2`, `A1:C3`, `A:C` (whole columns), `2:5` (whole rows),
//! `B2:B` (open bottom) and `B2:5` (open right). `$` markers and a leading
//! `Sheet!` prefix are ignored.

use std::fmt;
use std::str::FromStr;

use crate::{UnboundedZone, Zone};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AddressError {
    #[error("Invalid column: {0}")]
    InvalidColumn(String),
    #[error("Invalid row: {0}")]
    InvalidRow(String),
    #[error("Invalid range: {0}")]
    InvalidRange(String),
}

/// One side of an A1 reference; either part may be missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Endpoint {
    col: Option<u32>,
    row: Option<u32>,
}

/// Convert column index to letters (0 -> A, 25 -> Z, 26 -> AA).
pub fn column_index_to_letters(index: u32) -> String {
    let mut n = index;
    let mut out = Vec::new();
    loop {
        out.push(b'A' + (n % 26) as u8);
        n /= 26;
        if n == 0 {
            break;
        }
        n -= 1;
    }
    out.iter().rev().map(|&b| b as char).collect()
}

/// Convert column letters to index (A -> 0, Z -> 25, AA -> 26).
pub fn column_letters_to_index(letters: &str) -> Result<u32, AddressError> {
    if letters.is_empty() {
        return Err(AddressError::InvalidColumn(letters.to_string()));
    }
    let mut result: u32 = 0;
    for ch in letters.chars() {
        if !ch.is_ascii_alphabetic() {
            return Err(AddressError::InvalidColumn(letters.to_string()));
        }
        let value = u32::from(ch.to_ascii_uppercase() as u8 - b'A' + 1);
        result = result
            .checked_mul(26)
            .and_then(|r| r.checked_add(value))
            .ok_or_else(|| AddressError::InvalidColumn(letters.to_string()))?;
    }
    Ok(result - 1)
}

/// One-based row number shown in A1 notation.
pub(crate) fn row_number(row: u32) -> u64 {
    u64::from(row) + 1
}

fn parse_endpoint(text: &str) -> Result<Endpoint, AddressError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(AddressError::InvalidRange("Empty A1 reference".to_string()));
    }
    let bytes = trimmed.as_bytes();
    let mut i = 0;
    if bytes.get(i) == Some(&b'$') {
        i += 1;
    }
    let letters_start = i;
    while i < bytes.len() && bytes[i].is_ascii_alphabetic() {
        i += 1;
    }
    let letters = &trimmed[letters_start..i];
    if bytes.get(i) == Some(&b'$') {
        i += 1;
    }
    let digits_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let digits = &trimmed[digits_start..i];
    if i != bytes.len() || (letters.is_empty() && digits.is_empty()) {
        return Err(AddressError::InvalidRange(trimmed.to_string()));
    }

    let col = if letters.is_empty() {
        None
    } else {
        Some(column_letters_to_index(letters)?)
    };
    let row = if digits.is_empty() {
        None
    } else {
        let number: u32 = digits
            .parse()
            .map_err(|_| AddressError::InvalidRow(digits.to_string()))?;
        if number == 0 {
            return Err(AddressError::InvalidRow(digits.to_string()));
        }
        Some(number - 1)
    };
    Ok(Endpoint { col, row })
}

fn strip_sheet_prefix(reference: &str) -> &str {
    reference
        .trim()
        .rsplit_once('!')
        .map(|(_, address)| address)
        .unwrap_or(reference.trim())
}

impl UnboundedZone {
    /// Parse an A1 reference that may be open-ended.
    pub fn from_a1(reference: &str) -> Result<Self, AddressError> {
        let address = strip_sheet_prefix(reference);
        let (start, end) = match address.split_once(':') {
            Some((start, end)) => (parse_endpoint(start)?, parse_endpoint(end)?),
            None => {
                let single = parse_endpoint(address)?;
                (single, single)
            }
        };

        match (start, end) {
            (
                Endpoint {
                    col: Some(c1),
                    row: Some(r1),
                },
                Endpoint {
                    col: Some(c2),
                    row: Some(r2),
                },
            ) => Ok(Zone::new(c1.min(c2), r1.min(r2), c1.max(c2), r1.max(r2)).into()),
            (
                Endpoint {
                    col: Some(c1),
                    row: None,
                },
                Endpoint {
                    col: Some(c2),
                    row: None,
                },
            ) => Ok(Self::full_columns(c1.min(c2), c1.max(c2))),
            (
                Endpoint {
                    col: None,
                    row: Some(r1),
                },
                Endpoint {
                    col: None,
                    row: Some(r2),
                },
            ) => Ok(Self::full_rows(r1.min(r2), r1.max(r2))),
            (
                Endpoint {
                    col: Some(c1),
                    row: Some(r1),
                },
                Endpoint {
                    col: Some(c2),
                    row: None,
                },
            ) => Ok(Self::new(c1.min(c2), r1, Some(c1.max(c2)), None)),
            (
                Endpoint {
                    col: Some(c1),
                    row: Some(r1),
                },
                Endpoint {
                    col: None,
                    row: Some(r2),
                },
            ) => Ok(Self::new(c1, r1.min(r2), None, Some(r1.max(r2)))),
            _ => Err(AddressError::InvalidRange(address.to_string())),
        }
    }
}

impl Zone {
    /// Parse a fully bounded A1 reference such as `B2` or `A1:C3`.
    pub fn from_a1(reference: &str) -> Result<Self, AddressError> {
        let zone = UnboundedZone::from_a1(reference)?;
        if !zone.is_bounded() {
            return Err(AddressError::InvalidRange(reference.trim().to_string()));
        }
        Ok(zone.to_zone())
    }
}

impl FromStr for Zone {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_a1(s)
    }
}

impl FromStr for UnboundedZone {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_a1(s)
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let start = format!("{}{}", column_index_to_letters(self.left), row_number(self.top));
        if self.is_single_cell() {
            return f.write_str(&start);
        }
        write!(
            f,
            "{}:{}{}",
            start,
            column_index_to_letters(self.right),
            row_number(self.bottom)
        )
    }
}

impl fmt::Display for UnboundedZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.right, self.bottom) {
            (Some(right), None) if self.top == 0 => write!(
                f,
                "{}:{}",
                column_index_to_letters(self.left),
                column_index_to_letters(right)
            ),
            (None, Some(bottom)) if self.left == 0 => {
                write!(f, "{}:{}", row_number(self.top), row_number(bottom))
            }
            (Some(right), None) => write!(
                f,
                "{}{}:{}",
                column_index_to_letters(self.left),
                row_number(self.top),
                column_index_to_letters(right)
            ),
            (None, Some(bottom)) => write!(
                f,
                "{}{}:{}",
                column_index_to_letters(self.left),
                row_number(self.top),
                row_number(bottom)
            ),
            _ => write!(f, "{}", self.to_zone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_letters() {
        assert_eq!(column_index_to_letters(0), "A");
        assert_eq!(column_index_to_letters(27), "AB");
        assert_eq!(column_letters_to_index("ab").unwrap(), 27);
        assert!(matches!(
            column_letters_to_index("ZZZZZZZZ"),
            Err(AddressError::InvalidColumn(_))
        ));
    }

    #[test]
    fn test_parse_cell_and_range() {
        assert_eq!(Zone::from_a1("$B$2").unwrap(), Zone::cell(1, 1));
        assert_eq!(Zone::from_a1("C3:A1").unwrap(), Zone::new(0, 0, 2, 2));
        assert_eq!(Zone::from_a1("Sheet1!A2").unwrap(), Zone::cell(0, 1));
    }

    #[test]
    fn test_parse_open_ended() {
        assert_eq!(
            UnboundedZone::from_a1("A:B").unwrap(),
            UnboundedZone::full_columns(0, 1)
        );
        assert_eq!(
            UnboundedZone::from_a1("3:5").unwrap(),
            UnboundedZone::full_rows(2, 4)
        );
        assert_eq!(
            UnboundedZone::from_a1("B2:B").unwrap(),
            UnboundedZone::new(1, 1, Some(1), None)
        );
        assert!(Zone::from_a1("A:A").is_err());
    }

    #[test]
    fn test_invalid_rows() {
        assert!(matches!(
            Zone::from_a1("A0"),
            Err(AddressError::InvalidRow(_))
        ));
        assert!(matches!(
            Zone::from_a1("A1B"),
            Err(AddressError::InvalidRange(_))
        ));
    }

    #[test]
    fn test_display() {
        assert_eq!(Zone::new(0, 0, 1, 2).to_string(), "A1:B3");
        assert_eq!(Zone::cell(2, 3).to_string(), "C4");
        assert_eq!(UnboundedZone::full_columns(0, 0).to_string(), "A:A");
        assert_eq!(UnboundedZone::full_rows(2, 4).to_string(), "3:5");
        assert_eq!(UnboundedZone::new(1, 1, Some(1), None).to_string(), "B2:B");
    }

    #[test]
    fn test_display_at_last_row() {
        assert_eq!(Zone::cell(0, u32::MAX).to_string(), "A4294967296");
        assert_eq!(
            Zone::new(0, u32::MAX - 1, 0, u32::MAX).to_string(),
            "A4294967295:A4294967296"
        );
        assert_eq!(
            UnboundedZone::full_rows(u32::MAX, u32::MAX).to_string(),
            "4294967296:4294967296"
        );
        assert_eq!(
            crate::CellPosition::new(1, 0, u32::MAX).to_string(),
            "sheet 1!A4294967296"
        );
    }
}
