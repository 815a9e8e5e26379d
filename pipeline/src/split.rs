use rand::{SeedableRng, rngs::StdRng, seq::SliceRandom};

use crate::error::{PipelineError, Result};

/// Rows partitioned into a fitting set and a held-out set.
#[derive(Debug, Clone, PartialEq)]
pub struct Split<T> {
    pub train: Vec<T>,
    pub test: Vec<T>,
}

/// Shuffles `rows` with a seeded generator and holds out
/// `ceil(test_size * n)` of them.
///
/// The same rows, fraction and seed always produce the same partition.
///
/// # Errors
/// Returns `PipelineError::NotEnoughRows` if either side would be empty.
pub fn train_test_split<T: Clone>(rows: &[T], test_size: f64, seed: u64) -> Result<Split<T>> {
    let n = rows.len();
    let n_test = (test_size * n as f64).ceil() as usize;
    if n_test == 0 || n_test >= n {
        return Err(PipelineError::NotEnoughRows { got: n, needed: 2 });
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut indices: Vec<usize> = (0..n).collect();
    indices.shuffle(&mut rng);

    let (test_idx, train_idx) = indices.split_at(n_test);
    let pick = |idx: &[usize]| -> Vec<T> { idx.iter().map(|&i| rows[i].clone()).collect() };

    Ok(Split {
        train: pick(train_idx),
        test: pick(test_idx),
    })
}
