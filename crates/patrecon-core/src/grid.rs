//! Dense row-major grid of gain values
//!
//! Rows run along θ, columns along φ.

use serde::{Deserialize, Serialize};

/// A `rows × cols` grid of `f64` stored row-major.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Grid {
    /// Grid filled with a single value.
    pub fn filled(rows: usize, cols: usize, value: f64) -> Self {
        Self {
            rows,
            cols,
            data: vec![value; rows * cols],
        }
    }

    /// Build a grid by evaluating `f(row, col)` for every cell.
    pub fn from_fn(rows: usize, cols: usize, mut f: impl FnMut(usize, usize) -> f64) -> Self {
        let mut data = Vec::with_capacity(rows * cols);
        for r in 0..rows {
            for c in 0..cols {
                data.push(f(r, c));
            }
        }
        Self { rows, cols, data }
    }

    /// Wrap existing row-major data. Returns `None` if the length is wrong.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<f64>) -> Option<Self> {
        (data.len() == rows * cols).then_some(Self { rows, cols, data })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        (row < self.rows && col < self.cols).then(|| self.data[row * self.cols + col])
    }

    pub fn row(&self, row: usize) -> Option<&[f64]> {
        (row < self.rows).then(|| &self.data[row * self.cols..(row + 1) * self.cols])
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[f64]> {
        // chunks(0) panics, and an empty grid has no rows anyway
        self.data.chunks(self.cols.max(1)).take(self.rows)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }

    /// Apply `f` to every cell.
    pub fn map(&self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().map(|&v| f(v)).collect(),
        }
    }

    /// Combine two grids cell by cell. `None` if the shapes differ.
    pub fn zip_map(&self, other: &Grid, f: impl Fn(f64, f64) -> f64) -> Option<Self> {
        if self.shape() != other.shape() {
            return None;
        }
        Some(Self {
            rows: self.rows,
            cols: self.cols,
            data: self
                .data
                .iter()
                .zip(&other.data)
                .map(|(&a, &b)| f(a, b))
                .collect(),
        })
    }

    pub fn transpose(&self) -> Self {
        Self::from_fn(self.cols, self.rows, |r, c| self.data[c * self.cols + r])
    }

    /// Largest value and its (row, col), `None` for an empty grid.
    pub fn max(&self) -> Option<(f64, usize, usize)> {
        let cols = self.cols;
        self.data
            .iter()
            .enumerate()
            .fold(None, |best: Option<(f64, usize)>, (i, &v)| match best {
                Some((b, _)) if b >= v => best,
                _ => Some((v, i)),
            })
            .map(|(v, i)| (v, i / cols, i % cols))
    }
}
