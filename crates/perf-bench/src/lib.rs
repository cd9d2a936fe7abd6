// ----------------------------
// Queue discipline benchmarks
// ----------------------------

use std::hint::black_box;
use std::time::{Duration, Instant};

use common::error::Error;
use common::types::{Cost, CostMatrix};
use cycle_cancel_core::{Objective, QueueDiscipline, SolverOptions, solve_assignment};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

pub const NUM_MATRICES: usize = 50;
pub const MATRIX_SIZE: usize = 30;
pub const MAX_COST: Cost = 1_000;
pub const SEED: u64 = 0x5eed;

/// Generates the fixed benchmark batch.
///
/// Seeded, so both binaries solve identical matrices and their checksums
/// must agree.
pub fn generate_benchmark_matrices() -> Result<Vec<CostMatrix>, Error> {
    let mut rng = SmallRng::seed_from_u64(SEED);

    (0..NUM_MATRICES)
        .map(|_| {
            let cells = (0..MATRIX_SIZE * MATRIX_SIZE)
                .map(|_| rng.random_range(0..=MAX_COST))
                .collect();
            CostMatrix::new(MATRIX_SIZE, cells)
        })
        .collect()
}

pub struct BenchReport {
    pub checksum: Cost,
    pub elapsed: Duration,
}

/// Solves every matrix with `discipline` and sums the optimal costs.
pub fn run_benchmark(
    matrices: &[CostMatrix],
    discipline: QueueDiscipline,
) -> Result<BenchReport, Error> {
    let options = SolverOptions {
        queue_discipline: discipline,
        ..SolverOptions::default()
    };

    let start_time = Instant::now();
    let mut checksum: Cost = 0;
    for matrix in matrices {
        checksum += solve_assignment(black_box(matrix), Objective::Minimize, options)?;
    }
    let elapsed = start_time.elapsed();

    Ok(BenchReport {
        checksum: black_box(checksum),
        elapsed,
    })
}

pub fn print_report(label: &str, report: &BenchReport) {
    println!(
        "--- {} Benchmark Results ({} matrices of size {}) ---",
        label, NUM_MATRICES, MATRIX_SIZE
    );
    println!("Checksum: {}", report.checksum);
    println!("Elapsed Time: {:?}", report.elapsed);
}
