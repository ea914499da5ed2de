use std::fmt;
use std::ops::Range;

/// Compressed sparse row matrix of `f64` values.
///
/// Row `i` owns `indices[indptr[i]..indptr[i + 1]]` and the matching slice of
/// `data`. Column indices inside a row are strictly ascending.
#[derive(Clone, PartialEq)]
pub struct CsrMatrix {
    n_cols: usize,
    indptr: Vec<usize>,
    indices: Vec<usize>,
    data: Vec<f64>,
}

impl CsrMatrix {
    /// An empty matrix with no rows.
    pub fn new(n_cols: usize) -> Self {
        CsrMatrix {
            n_cols,
            indptr: vec![0],
            indices: Vec::new(),
            data: Vec::new(),
        }
    }

    pub fn with_capacity(n_cols: usize, n_rows: usize, nnz: usize) -> Self {
        let mut indptr = Vec::with_capacity(n_rows + 1);
        indptr.push(0);
        CsrMatrix {
            n_cols,
            indptr,
            indices: Vec::with_capacity(nnz),
            data: Vec::with_capacity(nnz),
        }
    }

    /// Appends a row. `entries` must be sorted by column without duplicates.
    pub fn push_row<I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (usize, f64)>,
    {
        let row_start = self.indices.len();
        for (col, value) in entries {
            debug_assert!(col < self.n_cols);
            debug_assert!(self.indices.len() == row_start || self.indices[self.indices.len() - 1] < col);
            self.indices.push(col);
            self.data.push(value);
        }
        self.indptr.push(self.indices.len());
    }

    pub fn n_rows(&self) -> usize {
        self.indptr.len() - 1
    }

    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    #[inline]
    fn row_range(&self, row: usize) -> Range<usize> {
        self.indptr[row]..self.indptr[row + 1]
    }

    /// Column indices and values of one row.
    #[inline]
    pub fn row(&self, row: usize) -> (&[usize], &[f64]) {
        let range = self.row_range(row);
        (&self.indices[range.clone()], &self.data[range])
    }

    /// Iterates `(row, col, value)` for every stored entry in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        (0..self.n_rows()).flat_map(move |row| {
            let (cols, values) = self.row(row);
            cols.iter().zip(values.iter()).map(move |(&col, &value)| (row, col, value))
        })
    }

    /// Returns the transpose, again in CSR form.
    pub fn transpose(&self) -> CsrMatrix {
        let mut counts = vec![0usize; self.n_cols + 1];
        for &col in &self.indices {
            counts[col + 1] += 1;
        }
        for i in 0..self.n_cols {
            counts[i + 1] += counts[i];
        }
        let indptr = counts.clone();
        let mut next = counts;
        let mut indices = vec![0usize; self.nnz()];
        let mut data = vec![0.0; self.nnz()];
        for (row, col, value) in self.iter() {
            let dest = next[col];
            indices[dest] = row;
            data[dest] = value;
            next[col] += 1;
        }
        CsrMatrix {
            n_cols: self.n_rows(),
            indptr,
            indices,
            data,
        }
    }

    /// Stacks row blocks on top of each other. All blocks must share `n_cols`.
    pub fn vstack<I>(n_cols: usize, blocks: I) -> CsrMatrix
    where
        I: IntoIterator<Item = CsrMatrix>,
    {
        let mut result = CsrMatrix::new(n_cols);
        for block in blocks {
            assert_eq!(block.n_cols, n_cols);
            let offset = result.indices.len();
            result
                .indptr
                .extend(block.indptr.iter().skip(1).map(|p| p + offset));
            result.indices.extend(block.indices);
            result.data.extend(block.data);
        }
        result
    }

    pub fn to_dense(&self) -> Vec<Vec<f64>> {
        let mut dense = vec![vec![0.0; self.n_cols]; self.n_rows()];
        for (row, col, value) in self.iter() {
            dense[row][col] = value;
        }
        dense
    }
}

impl fmt::Debug for CsrMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CsrMatrix {{ shape = ({}, {}), nnz = {} }}",
            self.n_rows(),
            self.n_cols,
            self.nnz()
        )
    }
}
