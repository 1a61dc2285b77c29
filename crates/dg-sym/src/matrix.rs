//! Dense matrices of symbolic expressions.

use std::collections::BTreeMap;
use std::fmt;

use dg_core::{DgError, ErrorInfo};

use crate::atom::Symbol;
use crate::expr::Expr;

/// Row-major dense matrix of [`Expr`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    cells: Vec<Expr>,
}

impl Matrix {
    /// All-zero matrix of the given shape.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![Expr::zero(); rows * cols],
        }
    }

    /// Identity matrix of size `n`.
    pub fn identity(n: usize) -> Self {
        let mut out = Matrix::zeros(n, n);
        for k in 0..n {
            out.cells[k * n + k] = Expr::one();
        }
        out
    }

    /// Square diagonal matrix.
    pub fn diag(entries: Vec<Expr>) -> Self {
        let n = entries.len();
        let mut out = Matrix::zeros(n, n);
        for (k, value) in entries.into_iter().enumerate() {
            out.cells[k * n + k] = value;
        }
        out
    }

    /// Builds a matrix from rows; every row must have the same length.
    pub fn from_rows(rows: Vec<Vec<Expr>>) -> Result<Self, DgError> {
        let cols = rows.first().map(Vec::len).unwrap_or(0);
        if let Some((idx, row)) = rows.iter().enumerate().find(|(_, row)| row.len() != cols) {
            return Err(DgError::Shape(
                ErrorInfo::new("ragged-rows", "matrix rows differ in length")
                    .with_context("row", idx)
                    .with_context("expected", cols)
                    .with_context("found", row.len()),
            ));
        }
        let n_rows = rows.len();
        Ok(Self {
            rows: n_rows,
            cols,
            cells: rows.into_iter().flatten().collect(),
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

    /// True for square matrices.
    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    /// Entry at `(row, col)`, `None` when out of range.
    pub fn get(&self, row: usize, col: usize) -> Option<&Expr> {
        if row < self.rows && col < self.cols {
            self.cells.get(row * self.cols + col)
        } else {
            None
        }
    }

    fn at(&self, row: usize, col: usize) -> &Expr {
        &self.cells[row * self.cols + col]
    }

    /// True if `M == M^T`.
    pub fn is_symmetric(&self) -> bool {
        self.is_square()
            && (0..self.rows).all(|i| (0..i).all(|j| (self.at(i, j) - self.at(j, i)).is_zero()))
    }

    /// Transposed copy.
    pub fn transpose(&self) -> Matrix {
        let mut cells = Vec::with_capacity(self.cells.len());
        for col in 0..self.cols {
            for row in 0..self.rows {
                cells.push(self.at(row, col).clone());
            }
        }
        Matrix {
            rows: self.cols,
            cols: self.rows,
            cells,
        }
    }

    /// Matrix product `self * other`.
    pub fn mul(&self, other: &Matrix) -> Result<Matrix, DgError> {
        if self.cols != other.rows {
            return Err(DgError::Shape(
                ErrorInfo::new("shape-mismatch", "inner matrix dimensions differ")
                    .with_context("lhs", format!("{}x{}", self.rows, self.cols))
                    .with_context("rhs", format!("{}x{}", other.rows, other.cols)),
            ));
        }
        let mut out = Matrix::zeros(self.rows, other.cols);
        for row in 0..self.rows {
            for col in 0..other.cols {
                out.cells[row * other.cols + col] = (0..self.cols)
                    .map(|k| self.at(row, k) * other.at(k, col))
                    .sum();
            }
        }
        Ok(out)
    }

    /// Applies `f` to every entry.
    pub fn map(&self, f: impl Fn(&Expr) -> Expr) -> Matrix {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            cells: self.cells.iter().map(f).collect(),
        }
    }

    /// Substitutes symbols in every entry.
    pub fn subs(&self, map: &BTreeMap<Symbol, Expr>) -> Result<Matrix, DgError> {
        Ok(Matrix {
            rows: self.rows,
            cols: self.cols,
            cells: self
                .cells
                .iter()
                .map(|cell| cell.subs(map))
                .collect::<Result<_, _>>()?,
        })
    }

    /// Inverse by Gauss-Jordan elimination, pivoting on the first nonzero entry.
    pub fn inverse(&self) -> Result<Matrix, DgError> {
        if !self.is_square() {
            return Err(DgError::Shape(
                ErrorInfo::new("non-square", "only square matrices can be inverted")
                    .with_context("shape", format!("{}x{}", self.rows, self.cols)),
            ));
        }
        let n = self.rows;
        let mut work = self.clone();
        let mut inv = Matrix::identity(n);
        for col in 0..n {
            let pivot_row = (col..n)
                .find(|row| !work.at(*row, col).is_zero())
                .ok_or_else(|| {
                    DgError::Singular(
                        ErrorInfo::new("singular-matrix", "matrix has no inverse")
                            .with_context("column", col)
                            .with_hint("a degenerate metric has no inverse metric"),
                    )
                })?;
            if pivot_row != col {
                work.swap_rows(pivot_row, col);
                inv.swap_rows(pivot_row, col);
            }
            let pivot_inv = work.at(col, col).recip().ok_or_else(|| {
                DgError::Singular(ErrorInfo::new("singular-matrix", "zero pivot"))
            })?;
            work.scale_row(col, &pivot_inv);
            inv.scale_row(col, &pivot_inv);
            for row in 0..n {
                if row == col || work.at(row, col).is_zero() {
                    continue;
                }
                let factor = work.at(row, col).clone();
                work.eliminate(row, col, &factor);
                inv.eliminate(row, col, &factor);
            }
        }
        Ok(inv)
    }

    fn swap_rows(&mut self, a: usize, b: usize) {
        for col in 0..self.cols {
            self.cells.swap(a * self.cols + col, b * self.cols + col);
        }
    }

    fn scale_row(&mut self, row: usize, factor: &Expr) {
        for col in 0..self.cols {
            let idx = row * self.cols + col;
            self.cells[idx] = &self.cells[idx] * factor;
        }
    }

    /// `row -= factor * pivot_row`.
    fn eliminate(&mut self, row: usize, pivot_row: usize, factor: &Expr) {
        for col in 0..self.cols {
            let delta = factor * self.at(pivot_row, col);
            let idx = row * self.cols + col;
            self.cells[idx] = &self.cells[idx] - &delta;
        }
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for row in 0..self.rows {
            if row > 0 {
                write!(f, ", ")?;
            }
            write!(f, "[")?;
            for col in 0..self.cols {
                if col > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", self.at(row, col))?;
            }
            write!(f, "]")?;
        }
        write!(f, "]")
    }
}
