use cycle_cancel_core::QueueDiscipline;
use perf_bench::*;

fn main() {
    // Pop from the back, push to the front.
    let result = generate_benchmark_matrices()
        .and_then(|matrices| run_benchmark(&matrices, QueueDiscipline::Hybrid));

    match result {
        Ok(report) => print_report("Hybrid", &report),
        Err(e) => {
            eprintln!("Hybrid benchmark failed: {}", e);
            std::process::exit(1);
        }
    }
}
