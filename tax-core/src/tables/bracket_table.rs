use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Deserializer, Serialize};

use super::TableError;
use crate::models::Band;

/// Largest distance allowed between one row's upper bound and the next row's
/// lower bound. Published tables step in whole cents.
const CENT: Decimal = dec!(0.01);

/// Ordered, validated partition of the income axis `[0, +∞)`.
///
/// Rows are contiguous at cent granularity: each row starts strictly above,
/// and at most one cent above, where the previous one ends, so no value lies
/// in two closed ranges. Only the last row is unbounded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct BracketTable<T> {
    rows: Vec<T>,
}

impl<T: Band> BracketTable<T> {
    /// Validates `rows` and builds a table from them.
    ///
    /// # Errors
    ///
    /// Returns [`TableError`] if the rows are empty, do not start at zero,
    /// overlap, leave a gap wider than a cent, have an inverted range, or if
    /// the last row has a finite upper bound.
    pub fn new(rows: Vec<T>) -> Result<Self, TableError> {
        let first = rows.first().ok_or(TableError::Empty)?;
        if first.lower_bound() != Decimal::ZERO {
            return Err(TableError::DoesNotStartAtZero(first.lower_bound()));
        }

        for (index, row) in rows.iter().enumerate() {
            let row_number = index + 1;
            let is_last = row_number == rows.len();

            match row.upper_bound() {
                None if !is_last => return Err(TableError::UnboundedRow { row: row_number }),
                Some(_) if is_last => return Err(TableError::BoundedLastRow),
                Some(upper) if upper < row.lower_bound() => {
                    return Err(TableError::InvertedRow {
                        row: row_number,
                        lower: row.lower_bound(),
                        upper,
                    });
                }
                _ => {}
            }
        }

        for (index, pair) in rows.windows(2).enumerate() {
            let (previous, next) = (&pair[0], &pair[1]);
            // Checked above: only the last row is unbounded.
            let Some(previous_upper) = previous.upper_bound() else {
                continue;
            };
            let step = next.lower_bound() - previous_upper;

            if step <= Decimal::ZERO {
                return Err(TableError::Overlap {
                    row: index + 2,
                    lower: next.lower_bound(),
                    previous_upper,
                });
            }
            if step > CENT {
                return Err(TableError::Gap {
                    row: index + 2,
                    lower: next.lower_bound(),
                    previous_upper,
                });
            }
        }

        Ok(Self { rows })
    }

    /// Builds a table from rows known to be valid (the embedded tables).
    pub(crate) fn from_trusted(rows: Vec<T>) -> Self {
        Self { rows }
    }

    /// Finds the row for `value`.
    ///
    /// A row whose closed range contains `value` wins. Otherwise the last row
    /// starting at or below `value` is used, which resolves amounts above the
    /// last finite bound as well as sub-cent amounts between two rows.
    /// Returns `None` only for values below the first row.
    pub fn find(
        &self,
        value: Decimal,
    ) -> Option<&T> {
        self.rows.iter().find(|row| row.contains(value)).or_else(|| {
            self.rows
                .iter()
                .rev()
                .find(|row| row.lower_bound() <= value)
        })
    }
}

impl<T> BracketTable<T> {
    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.rows.iter()
    }
}

impl<T: Band> TryFrom<Vec<T>> for BracketTable<T> {
    type Error = TableError;

    fn try_from(rows: Vec<T>) -> Result<Self, Self::Error> {
        Self::new(rows)
    }
}

/// Deserializes a list of rows and validates it like [`BracketTable::new`].
impl<'de, T> Deserialize<'de> for BracketTable<T>
where
    T: Band + Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let rows = Vec::<T>::deserialize(deserializer)?;
        Self::new(rows).map_err(serde::de::Error::custom)
    }
}
