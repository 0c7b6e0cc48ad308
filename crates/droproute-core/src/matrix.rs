//! Square travel-cost matrix.

/// Row-major square matrix of travel costs between waypoints.
///
/// Row is the source, column the target; symmetry is never assumed.
/// Unroutable pairs hold `f64::INFINITY`.
#[derive(Debug, Clone, PartialEq)]
pub struct CostMatrix {
    size: usize,
    data: Vec<f64>,
}

impl CostMatrix {
    /// Matrix of `size` x `size` with every entry set to `value`.
    pub fn filled(size: usize, value: f64) -> Self {
        Self {
            size,
            data: vec![value; size * size],
        }
    }

    /// Build from nested rows; rejects ragged or non-square input.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Option<Self> {
        let size = rows.len();
        let mut data = Vec::with_capacity(size * size);
        for row in &rows {
            if row.len() != size {
                return None;
            }
            data.extend_from_slice(row);
        }
        Some(Self { size, data })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Cost of traveling from `from` to `to`. Panics when out of range.
    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.data[from * self.size + to]
    }

    /// Bounds-checked lookup.
    pub fn try_get(&self, from: usize, to: usize) -> Option<f64> {
        if from >= self.size || to >= self.size {
            return None;
        }
        Some(self.data[from * self.size + to])
    }

    pub fn set(&mut self, from: usize, to: usize, cost: f64) {
        self.data[from * self.size + to] = cost;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_rows_accepts_square_input() {
        let m = CostMatrix::from_rows(vec![vec![0.0, 2.0], vec![2.0, 0.0]]).unwrap();
        assert_eq!(m.size(), 2);
        assert_eq!(m.get(0, 1), 2.0);
        assert_eq!(m.get(1, 0), 2.0);
    }

    #[test]
    fn from_rows_rejects_ragged_input() {
        assert!(CostMatrix::from_rows(vec![vec![0.0, 1.0], vec![1.0]]).is_none());
        assert!(CostMatrix::from_rows(vec![vec![0.0, 1.0, 2.0]]).is_none());
    }

    #[test]
    fn asymmetric_entries_are_kept_apart() {
        let mut m = CostMatrix::filled(2, 0.0);
        m.set(0, 1, 5.0);
        m.set(1, 0, 9.0);
        assert_eq!(m.get(0, 1), 5.0);
        assert_eq!(m.get(1, 0), 9.0);
    }

    #[test]
    fn try_get_guards_bounds() {
        let m = CostMatrix::filled(2, 1.0);
        assert_eq!(m.try_get(1, 1), Some(1.0));
        assert_eq!(m.try_get(2, 0), None);
        assert_eq!(m.try_get(0, 2), None);
    }

    #[test]
    fn empty_matrix_reports_empty() {
        let m = CostMatrix::from_rows(Vec::new()).unwrap();
        assert!(m.is_empty());
        assert_eq!(m.size(), 0);
    }
}
