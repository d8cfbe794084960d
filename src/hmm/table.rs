//!
//! Dense table of probabilities (or expected counts)
//!
//! `table[(k, l)]` is the value of source `k` and target `l`, where both are
//! dense indices of a `Domain`.
//!
use crate::error::{HmmError, Result};

///
/// Row-major dense table of `f64` of size `n_rows x n_cols`.
///
#[derive(Debug, Clone, PartialEq)]
pub struct ProbTable {
    n_rows: usize,
    n_cols: usize,
    values: Vec<f64>,
}

impl ProbTable {
    /// Create a table filled with `value`
    pub fn new(n_rows: usize, n_cols: usize, value: f64) -> Self {
        ProbTable {
            n_rows,
            n_cols,
            values: vec![value; n_rows * n_cols],
        }
    }
    /// Create a table filled with zeros
    pub fn zeros(n_rows: usize, n_cols: usize) -> Self {
        ProbTable::new(n_rows, n_cols, 0.0)
    }
    ///
    /// Create a table from rows.
    /// Returns `None` if some row does not have `n_cols` elements.
    ///
    pub fn from_rows(rows: Vec<Vec<f64>>, n_cols: usize) -> Option<Self> {
        let n_rows = rows.len();
        let mut values = Vec::with_capacity(n_rows * n_cols);
        for row in rows {
            if row.len() != n_cols {
                return None;
            }
            values.extend(row);
        }
        Some(ProbTable {
            n_rows,
            n_cols,
            values,
        })
    }
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }
    pub fn n_cols(&self) -> usize {
        self.n_cols
    }
    /// The values of the row `k`
    pub fn row(&self, k: usize) -> &[f64] {
        &self.values[k * self.n_cols..(k + 1) * self.n_cols]
    }
    pub fn row_mut(&mut self, k: usize) -> &mut [f64] {
        &mut self.values[k * self.n_cols..(k + 1) * self.n_cols]
    }
    /// Iterator of rows
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> + '_ {
        self.values.chunks(self.n_cols)
    }
    /// Sum of the values of the row `k`
    pub fn row_sum(&self, k: usize) -> f64 {
        self.row(k).iter().sum()
    }
    /// Sum of all the values
    pub fn sum(&self) -> f64 {
        self.values.iter().sum()
    }
    /// Divide all the values by `d`
    pub fn scale(&mut self, d: f64) {
        for v in self.values.iter_mut() {
            *v /= d;
        }
    }
    ///
    /// Check that the table is `n_rows x n_cols`.
    ///
    pub fn check_shape(&self, what: &'static str, n_rows: usize, n_cols: usize) -> Result<()> {
        if self.n_rows != n_rows {
            return Err(HmmError::DimensionMismatch {
                what,
                expected: n_rows,
                actual: self.n_rows,
            });
        }
        if self.n_cols != n_cols {
            return Err(HmmError::DimensionMismatch {
                what,
                expected: n_cols,
                actual: self.n_cols,
            });
        }
        Ok(())
    }
    ///
    /// Elementwise addition, used to merge expected counts.
    ///
    /// Fails if the shapes differ.
    pub fn merge(&mut self, other: &ProbTable) -> Result<()> {
        other.check_shape("merged table", self.n_rows, self.n_cols)?;
        for (a, b) in self.values.iter_mut().zip(other.values.iter()) {
            *a += b;
        }
        Ok(())
    }
    ///
    /// Maximum of `|a[k,l] - b[k,l]|`.
    ///
    /// # Panics
    ///
    /// Panics if the shapes differ.
    pub fn max_abs_diff(&self, other: &ProbTable) -> f64 {
        assert_eq!(self.n_rows, other.n_rows);
        assert_eq!(self.n_cols, other.n_cols);
        self.values
            .iter()
            .zip(other.values.iter())
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f64::max)
    }
}

impl std::ops::Index<(usize, usize)> for ProbTable {
    type Output = f64;
    #[inline]
    fn index(&self, (k, l): (usize, usize)) -> &f64 {
        &self.values[k * self.n_cols + l]
    }
}

impl std::ops::IndexMut<(usize, usize)> for ProbTable {
    #[inline]
    fn index_mut(&mut self, (k, l): (usize, usize)) -> &mut f64 {
        &mut self.values[k * self.n_cols + l]
    }
}

impl std::fmt::Display for ProbTable {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        for row in self.rows() {
            let cells: Vec<String> = row.iter().map(|v| format!("{:.4}", v)).collect();
            writeln!(f, "{}", cells.join("\t"))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prob_table_index_and_rows() {
        let mut t = ProbTable::from_rows(vec![vec![0.6, 0.4], vec![0.3, 0.7]], 2).unwrap();
        assert_eq!(t[(0, 1)], 0.4);
        assert_eq!(t[(1, 0)], 0.3);
        assert_eq!(t.row(1), &[0.3, 0.7]);
        assert_abs_diff_eq!(t.row_sum(0), 1.0);
        assert_abs_diff_eq!(t.sum(), 2.0);
        t[(1, 1)] = 0.0;
        assert_eq!(t.row(1), &[0.3, 0.0]);
        assert!(ProbTable::from_rows(vec![vec![1.0], vec![0.5, 0.5]], 2).is_none());
    }
    #[test]
    fn prob_table_merge() {
        let mut a = ProbTable::new(2, 3, 1.0);
        let mut b = ProbTable::zeros(2, 3);
        b[(1, 2)] = 2.5;
        a.merge(&b).unwrap();
        assert_eq!(a[(1, 2)], 3.5);
        assert_eq!(a[(0, 0)], 1.0);
        assert_abs_diff_eq!(a.max_abs_diff(&ProbTable::new(2, 3, 1.0)), 2.5);
        a.scale(2.0);
        assert_eq!(a[(1, 2)], 1.75);

        // shapes must agree
        assert!(matches!(
            a.merge(&ProbTable::zeros(3, 3)),
            Err(HmmError::DimensionMismatch {
                expected: 2,
                actual: 3,
                ..
            })
        ));
        assert!(matches!(
            a.merge(&ProbTable::zeros(2, 2)),
            Err(HmmError::DimensionMismatch { .. })
        ));
        assert_eq!(a[(1, 2)], 1.75);
    }
}
