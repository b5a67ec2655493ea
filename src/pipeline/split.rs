//! Seeded, stratified train/test split

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use super::error::PrepareError;

/// Default share of rows held out as the test partition
pub const DEFAULT_TEST_SIZE: f64 = 0.25;

/// Default seed for the split shuffle
pub const DEFAULT_SEED: u64 = 42;

/// Row indices of the two partitions, each sorted ascending
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainTestSplit {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Split row indices so both partitions keep the label proportions.
///
/// The test partition gets `ceil(test_size * n)` rows, allocated across classes
/// by largest remainder. Every present class must have at least two rows so
/// that it lands in both partitions. Same labels and seed give the same split.
pub fn stratified_split(
    labels: &[u8],
    test_size: f64,
    seed: u64,
) -> Result<TrainTestSplit, PrepareError> {
    let n = labels.len();
    if n == 0 {
        return Err(PrepareError::EmptyTrainingSet);
    }

    let mut class_indices: [Vec<usize>; 2] = [Vec::new(), Vec::new()];
    for (idx, &label) in labels.iter().enumerate() {
        class_indices[usize::from(label == 1)].push(idx);
    }

    for (class, indices) in class_indices.iter().enumerate() {
        if indices.len() == 1 {
            return Err(PrepareError::UnderpopulatedClass {
                class: class_name(class),
                count: 1,
            });
        }
    }

    let n_test = ((test_size * n as f64).ceil() as usize).clamp(1, n - 1);
    let allocation = allocate_test_rows(&class_indices, n_test, n);

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut train = Vec::with_capacity(n - n_test);
    let mut test = Vec::with_capacity(n_test);

    for (indices, &take) in class_indices.iter_mut().zip(allocation.iter()) {
        indices.shuffle(&mut rng);
        test.extend_from_slice(&indices[..take]);
        train.extend_from_slice(&indices[take..]);
    }

    train.sort_unstable();
    test.sort_unstable();

    Ok(TrainTestSplit { train, test })
}

/// Largest-remainder allocation of test rows per class, leaving at least one
/// training row in every non-empty class.
fn allocate_test_rows(class_indices: &[Vec<usize>; 2], n_test: usize, n: usize) -> [usize; 2] {
    let mut allocation = [0usize; 2];
    let mut remainders = [0.0f64; 2];

    for (class, indices) in class_indices.iter().enumerate() {
        let exact = n_test as f64 * indices.len() as f64 / n as f64;
        allocation[class] = exact.floor() as usize;
        remainders[class] = exact - exact.floor();
    }

    let mut left = n_test - allocation.iter().sum::<usize>();
    let mut order = [0usize, 1];
    order.sort_by(|&a, &b| {
        remainders[b]
            .partial_cmp(&remainders[a])
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    for class in order {
        if left > 0 && allocation[class] + 1 < class_indices[class].len() {
            allocation[class] += 1;
            left -= 1;
        }
    }

    for class in 0..2 {
        let cap = class_indices[class].len().saturating_sub(1);
        allocation[class] = allocation[class].min(cap);
    }

    allocation
}

fn class_name(class: usize) -> &'static str {
    if class == 1 {
        "Completed"
    } else {
        "Terminated"
    }
}
