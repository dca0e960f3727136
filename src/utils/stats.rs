/// Running mean that skips missing readings.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MeanAccumulator {
    sum: f64,
    count: usize,
}

impl MeanAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, value: Option<f64>) {
        if let Some(v) = value {
            self.sum += v;
            self.count += 1;
        }
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// `None` when nothing valid was pushed
    pub fn mean(&self) -> Option<f64> {
        if self.count == 0 {
            None
        } else {
            Some(self.sum / self.count as f64)
        }
    }
}

/// Per-column mean accumulators for a fixed-width row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnMeans<const N: usize> {
    columns: [MeanAccumulator; N],
}

impl<const N: usize> Default for ColumnMeans<N> {
    fn default() -> Self {
        Self {
            columns: [MeanAccumulator::default(); N],
        }
    }
}

impl<const N: usize> ColumnMeans<N> {
    pub fn push(&mut self, row: [Option<f64>; N]) {
        for (column, value) in self.columns.iter_mut().zip(row) {
            column.push(value);
        }
    }

    pub fn means(&self) -> [Option<f64>; N] {
        self.columns.map(|c| c.mean())
    }
}

/// Linear-interpolated quantile of an ascending slice, `q` in [0, 1]
pub fn quantile_sorted(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let position = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
}

/// Round to `places` decimals, ties to even on the scaled binary value
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    let scaled = value * factor;
    let rounded = if (scaled - scaled.trunc()).abs() == 0.5 {
        2.0 * (scaled / 2.0).round()
    } else {
        scaled.round()
    };
    rounded / factor
}
