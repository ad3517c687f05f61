use crate::table::{ItemTable, NumericColumn};

/// Pairwise Pearson correlations between numeric columns.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    pub columns: Vec<NumericColumn>,
    /// `values[i][j]`; `None` when fewer than two complete pairs or zero variance.
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.values.get(row)?.get(col).copied().flatten()
    }

    /// Cell text with three decimals, `nan` for undefined cells.
    pub fn label(&self, row: usize, col: usize) -> String {
        match self.get(row, col) {
            Some(value) => format!("{value:.3}"),
            None => "nan".to_string(),
        }
    }
}

/// Correlate every pair of numeric columns using rows where both are present.
pub fn correlation(table: &ItemTable) -> CorrelationMatrix {
    let columns: Vec<NumericColumn> = NumericColumn::ALL.to_vec();
    let data: Vec<Vec<Option<f64>>> = columns
        .iter()
        .map(|column| table.numeric_column(*column))
        .collect();
    let values = (0..columns.len())
        .map(|i| {
            (0..columns.len())
                .map(|j| {
                    let (xs, ys): (Vec<f64>, Vec<f64>) = data[i]
                        .iter()
                        .zip(&data[j])
                        .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
                        .unzip();
                    pearson(&xs, &ys)
                })
                .collect()
        })
        .collect();
    CorrelationMatrix { columns, values }
}

/// Pearson correlation coefficient, clamped to [-1, 1].
pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    let n = xs.len().min(ys.len());
    if n < 2 {
        return None;
    }
    let mean_x = xs[..n].iter().sum::<f64>() / n as f64;
    let mean_y = ys[..n].iter().sum::<f64>() / n as f64;
    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in xs[..n].iter().zip(&ys[..n]) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }
    Some((cov / (var_x.sqrt() * var_y.sqrt())).clamp(-1.0, 1.0))
}
