use std::{
    fmt::{Display, Write},
    ops::{Index, IndexMut, Mul},
    slice::Chunks,
};

use crate::domains::{DivisionByZero, Ring};

/// Errors that can occur when performing matrix operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MatrixError {
    /// An entry outside of the matrix was accessed.
    IndexOutOfBounds {
        row: u32,
        col: u32,
        nrows: u32,
        ncols: u32,
    },
    /// The rows of a nested input do not all have the same length.
    NotRectangular,
    /// The number of entries does not match the requested shape.
    DataLengthMismatch { len: usize, nrows: u32, ncols: u32 },
    NotSquare,
    /// The dimensions of the operands are not compatible.
    ShapeMismatch {
        expected: (u32, u32),
        found: (u32, u32),
    },
    /// Elimination found no usable pivot.
    Singular,
    DivisionByZero,
}

impl std::fmt::Display for MatrixError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatrixError::IndexOutOfBounds {
                row,
                col,
                nrows,
                ncols,
            } => write!(
                f,
                "Index ({},{}) is out of bounds for a matrix of shape ({},{})",
                row, col, nrows, ncols
            ),
            MatrixError::NotRectangular => write!(f, "Matrix is not rectangular"),
            MatrixError::DataLengthMismatch { len, nrows, ncols } => write!(
                f,
                "Data length does not match matrix dimensions: {} vs ({},{})",
                len, nrows, ncols
            ),
            MatrixError::NotSquare => write!(f, "The matrix is not square"),
            MatrixError::ShapeMismatch { expected, found } => write!(
                f,
                "The shape of the matrix is not compatible: expected ({},{}), found ({},{})",
                expected.0, expected.1, found.0, found.1
            ),
            MatrixError::Singular => write!(f, "The matrix is singular"),
            MatrixError::DivisionByZero => write!(f, "Division by zero"),
        }
    }
}

impl std::error::Error for MatrixError {}

impl From<DivisionByZero> for MatrixError {
    fn from(_: DivisionByZero) -> Self {
        MatrixError::DivisionByZero
    }
}

/// A matrix with entries that are elements of a ring `F`, stored row-major.
/// A vector can be represented as a matrix with one row or one column.
#[derive(Clone, PartialEq, Debug)]
pub struct Matrix<F: Ring> {
    pub(crate) data: Vec<F::Element>,
    pub(crate) nrows: u32,
    pub(crate) ncols: u32,
    pub(crate) field: F,
}

impl<F: Ring> Matrix<F> {
    /// Create a new zeroed matrix with `nrows` rows and `ncols` columns.
    pub fn new(nrows: u32, ncols: u32, field: F) -> Matrix<F> {
        Matrix {
            data: (0..nrows as usize * ncols as usize)
                .map(|_| field.zero())
                .collect(),
            nrows,
            ncols,
            field,
        }
    }

    /// Create a new square matrix with `nrows` rows and ones on the main diagonal and zeroes elsewhere.
    pub fn identity(nrows: u32, field: F) -> Matrix<F> {
        Matrix::from_fn(nrows, nrows, field, |i, j, f| {
            if i == j {
                f.one()
            } else {
                f.zero()
            }
        })
    }

    /// Create a matrix where the entry at `(i, j)` is generated by `gen(i, j, field)`.
    pub fn from_fn(
        nrows: u32,
        ncols: u32,
        field: F,
        mut gen: impl FnMut(u32, u32, &F) -> F::Element,
    ) -> Matrix<F> {
        let mut data = Vec::with_capacity(nrows as usize * ncols as usize);
        for i in 0..nrows {
            for j in 0..ncols {
                data.push(gen(i, j, &field));
            }
        }

        Matrix {
            data,
            nrows,
            ncols,
            field,
        }
    }

    /// Convert a linear representation of a matrix to a `Matrix`.
    pub fn from_linear(
        data: Vec<F::Element>,
        nrows: u32,
        ncols: u32,
        field: F,
    ) -> Result<Matrix<F>, MatrixError> {
        if data.len() == nrows as usize * ncols as usize {
            Ok(Matrix {
                data,
                nrows,
                ncols,
                field,
            })
        } else {
            Err(MatrixError::DataLengthMismatch {
                len: data.len(),
                nrows,
                ncols,
            })
        }
    }

    /// Create a new matrix from a 2-dimensional vector of scalars.
    pub fn from_nested_vec(
        matrix: Vec<Vec<F::Element>>,
        field: F,
    ) -> Result<Matrix<F>, MatrixError> {
        let nrows = matrix.len() as u32;
        let cols = matrix.first().map(|r| r.len()).unwrap_or(0);

        let mut data = Vec::with_capacity(nrows as usize * cols);
        for d in matrix {
            if d.len() != cols {
                return Err(MatrixError::NotRectangular);
            }

            data.extend(d);
        }

        Ok(Matrix {
            data,
            nrows,
            ncols: cols as u32,
            field,
        })
    }

    /// Create a new column vector from a list of scalars.
    pub fn new_vec(data: Vec<F::Element>, field: F) -> Matrix<F> {
        Matrix {
            nrows: data.len() as u32,
            ncols: 1,
            data,
            field,
        }
    }

    /// Return the number of rows.
    pub fn nrows(&self) -> usize {
        self.nrows as usize
    }

    /// Return the number of columns.
    pub fn ncols(&self) -> usize {
        self.ncols as usize
    }

    /// Return the field of the matrix entries.
    pub fn field(&self) -> &F {
        &self.field
    }

    /// Return the entries in row-major order.
    pub fn data(&self) -> &[F::Element] {
        &self.data
    }

    /// Consume the matrix and return its entries in row-major order.
    pub fn into_data(self) -> Vec<F::Element> {
        self.data
    }

    #[inline]
    fn checked_index(&self, row: u32, col: u32) -> Result<usize, MatrixError> {
        if row < self.nrows && col < self.ncols {
            Ok(row as usize * self.ncols as usize + col as usize)
        } else {
            Err(MatrixError::IndexOutOfBounds {
                row,
                col,
                nrows: self.nrows,
                ncols: self.ncols,
            })
        }
    }

    /// Get the entry at row `row` and column `col`.
    pub fn get(&self, row: u32, col: u32) -> Result<&F::Element, MatrixError> {
        let i = self.checked_index(row, col)?;
        Ok(&self.data[i])
    }

    /// Get a mutable reference to the entry at row `row` and column `col`.
    pub fn get_mut(&mut self, row: u32, col: u32) -> Result<&mut F::Element, MatrixError> {
        let i = self.checked_index(row, col)?;
        Ok(&mut self.data[i])
    }

    /// Set the entry at row `row` and column `col`.
    pub fn set(&mut self, row: u32, col: u32, value: F::Element) -> Result<(), MatrixError> {
        *self.get_mut(row, col)? = value;
        Ok(())
    }

    /// Get the `row`th row of the matrix.
    pub fn row(&self, row: u32) -> Result<&[F::Element], MatrixError> {
        if row >= self.nrows {
            return Err(MatrixError::IndexOutOfBounds {
                row,
                col: 0,
                nrows: self.nrows,
                ncols: self.ncols,
            });
        }

        let start = row as usize * self.ncols as usize;
        Ok(&self.data[start..start + self.ncols as usize])
    }

    /// Return an iterator over the rows of the matrix.
    pub fn row_iter(&self) -> Chunks<'_, F::Element> {
        // `chunks` panics on a zero chunk size
        self.data.chunks(self.ncols.max(1) as usize)
    }

    /// Swap row `i` and row `j` in-place.
    pub fn swap_rows(&mut self, i: u32, j: u32) -> Result<(), MatrixError> {
        if i >= self.nrows || j >= self.nrows {
            return Err(MatrixError::IndexOutOfBounds {
                row: i.max(j),
                col: 0,
                nrows: self.nrows,
                ncols: self.ncols,
            });
        }

        self.swap_rows_from(i, j, 0);
        Ok(())
    }

    /// Swap the entries of rows `i` and `j`, starting from column `start_col`.
    /// The indices must be in range.
    #[inline]
    pub(crate) fn swap_rows_from(&mut self, i: u32, j: u32, start_col: u32) {
        if i == j {
            return;
        }

        let ncols = self.ncols as usize;
        for l in start_col as usize..ncols {
            self.data.swap(i as usize * ncols + l, j as usize * ncols + l);
        }
    }

    /// Transpose the matrix.
    pub fn transpose(&self) -> Matrix<F> {
        Matrix::from_fn(self.ncols, self.nrows, self.field.clone(), |i, j, _| {
            self[(j, i)].clone()
        })
    }

    /// Concatenate the columns of `other` to the right of `self`.
    pub fn augment(&self, other: &Matrix<F>) -> Result<Matrix<F>, MatrixError> {
        if self.nrows != other.nrows {
            return Err(MatrixError::ShapeMismatch {
                expected: (self.nrows, other.ncols),
                found: (other.nrows, other.ncols),
            });
        }

        let mut data = Vec::with_capacity(self.data.len() + other.data.len());
        for (a, b) in self.row_iter().zip(other.row_iter()) {
            data.extend_from_slice(a);
            data.extend_from_slice(b);
        }

        Ok(Matrix {
            data,
            nrows: self.nrows,
            ncols: self.ncols + other.ncols,
            field: self.field.clone(),
        })
    }

    /// Apply a function `f` to each entry of the matrix.
    pub fn map<G: Ring>(&self, f: impl Fn(&F::Element) -> G::Element, field: G) -> Matrix<G> {
        Matrix {
            data: self.data.iter().map(f).collect(),
            nrows: self.nrows,
            ncols: self.ncols,
            field,
        }
    }

    /// Return true iff every entry in the matrix is zero.
    pub fn is_zero(&self) -> bool {
        self.data.iter().all(|e| F::is_zero(e))
    }
}

impl<F: Ring> Index<(u32, u32)> for Matrix<F> {
    type Output = F::Element;

    /// Get the `i`th row and `j`th column of the matrix, where `index=(i,j)`.
    /// Panics when out of bounds, see [Matrix::get] for the checked version.
    #[inline]
    fn index(&self, index: (u32, u32)) -> &Self::Output {
        &self.data[index.0 as usize * self.ncols as usize + index.1 as usize]
    }
}

impl<F: Ring> IndexMut<(u32, u32)> for Matrix<F> {
    /// Get the `i`th row and `j`th column of the matrix, where `index=(i,j)`.
    #[inline]
    fn index_mut(&mut self, index: (u32, u32)) -> &mut F::Element {
        &mut self.data[index.0 as usize * self.ncols as usize + index.1 as usize]
    }
}

impl<F: Ring> Display for Matrix<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_char('{')?;
        for (ri, r) in self.row_iter().enumerate() {
            f.write_char('{')?;
            for (ci, c) in r.iter().enumerate() {
                Display::fmt(c, f)?;
                if ci + 1 < self.ncols as usize {
                    f.write_char(',')?;
                }
            }
            f.write_char('}')?;
            if ri + 1 < self.nrows as usize {
                f.write_char(',')?;
            }
        }
        f.write_char('}')
    }
}

impl<F: Ring> Mul<&Matrix<F>> for &Matrix<F> {
    type Output = Matrix<F>;

    /// Multiply two matrices.
    fn mul(self, rhs: &Matrix<F>) -> Self::Output {
        if self.ncols != rhs.nrows {
            panic!(
                "Cannot multiply matrices because of a dimension mismatch: ({},{}) vs ({},{})",
                self.nrows, self.ncols, rhs.nrows, rhs.ncols
            );
        }

        let mut m = Matrix::new(self.nrows, rhs.ncols, self.field.clone());

        for i in 0..self.nrows {
            for j in 0..rhs.ncols {
                let mut sum = self.field.zero();
                for k in 0..self.ncols {
                    self.field
                        .add_assign(&mut sum, &self.field.mul(&self[(i, k)], &rhs[(k, j)]));
                }
                m[(i, j)] = sum;
            }
        }

        m
    }
}
