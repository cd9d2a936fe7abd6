use cycle_cancel_core::QueueDiscipline;
use perf_bench::*;

fn main() {
    // Plain first-in first-out queue.
    let result = generate_benchmark_matrices()
        .and_then(|matrices| run_benchmark(&matrices, QueueDiscipline::Fifo));

    match result {
        Ok(report) => print_report("FIFO", &report),
        Err(e) => {
            eprintln!("FIFO benchmark failed: {}", e);
            std::process::exit(1);
        }
    }
}
