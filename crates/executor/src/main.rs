pub mod config;
pub mod csv_streamer;
pub mod error;
pub mod producer;
pub mod simulator;
pub mod text_streamer;
pub mod types;
pub mod worker;
pub mod writer;

use log::{error, info};
use std::env;
use std::fs::File;
use std::io::BufWriter;
use tokio::sync::{mpsc, mpsc::Receiver, mpsc::Sender};

use csv_streamer::CsvStreamer;
use cycle_cancel_core::{Objective, SolverOptions};
use error::Error;
use producer::Producer;
use simulator::SimulatorStreamer;
use text_streamer::TextStreamer;
use types::{CaseOutcome, DataSource, TaskHandle, TestCase};
use worker::CaseSolver;
use writer::Writer;

const USAGE: &str = "Usage: executor <TEXT|CSV> <input> <output> | executor SIM <output> | executor <input> <output>\n  - TEXT: test count, then N and N*N costs per case (whitespace separated)\n  - CSV: one case per record: N, c00, c01, ...\n  - SIM: solve randomly generated matrices";

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run().await {
        error!("{}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Error> {
    let args: Vec<String> = env::args().collect();
    let (source, output_path) = parse_args(&args)?;
    let config = config::load_config()?;
    let options = config.solver.options()?;
    let objective = config.solver.objective()?;

    let output = BufWriter::new(File::create(&output_path)?);

    let (case_sender, case_receiver) = mpsc::channel::<TestCase>(config.executor.buffer_size);
    let (outcome_sender, outcome_receiver) =
        mpsc::channel::<CaseOutcome>(config.executor.buffer_size);

    // Spawn tasks
    let producer_handle = spawn_producer(&source, case_sender, &config);
    let solver_handle = spawn_solver(case_receiver, outcome_sender, options, objective);
    let writer_handle = Writer::new(output, outcome_receiver).spawn_task();

    let (produced, solved, written) = tokio::join!(producer_handle, solver_handle, writer_handle);
    let produced = produced??;
    let solved = solved??;
    let written = written??;

    info!(
        "Pipeline shut down: {} cases read, {} solved, {} written to {}.",
        produced, solved, written, output_path
    );
    Ok(())
}

/// Parse command-line arguments into a data source and an output path.
///
/// `<input> <output>` without a mode keyword reads the text format.
fn parse_args(args: &[String]) -> Result<(DataSource, String), Error> {
    let usage = || Error::Usage(USAGE.to_string());
    let mode = args.get(1).map(|s| s.to_lowercase()).ok_or_else(usage)?;

    match (mode.as_str(), args.len()) {
        ("text", 4) => Ok((DataSource::Text(args[2].clone()), args[3].clone())),
        ("csv", 4) => Ok((DataSource::Csv(args[2].clone()), args[3].clone())),
        ("sim", 3) => Ok((DataSource::Sim, args[2].clone())),
        ("text" | "csv" | "sim", _) => Err(usage()),
        (_, 3) => Ok((DataSource::Text(args[1].clone()), args[2].clone())),
        _ => Err(usage()),
    }
}

pub fn spawn_producer(
    source: &DataSource,
    sender: Sender<TestCase>,
    config: &config::Config,
) -> TaskHandle {
    match source {
        DataSource::Text(path) => {
            info!("Starting TextStreamer producer task...");
            Producer::new(TextStreamer::new(path.clone())).spawn(sender)
        }
        DataSource::Csv(path) => {
            info!("Starting CsvStreamer producer task...");
            Producer::new(CsvStreamer::new(path.clone())).spawn(sender)
        }
        DataSource::Sim => {
            info!("Starting SimulatorStreamer producer task...");
            Producer::new(SimulatorStreamer::new(config.simulator.clone())).spawn(sender)
        }
    }
}

/// Spawn solver task
fn spawn_solver(
    receiver: Receiver<TestCase>,
    sender: Sender<CaseOutcome>,
    options: SolverOptions,
    objective: Objective,
) -> TaskHandle {
    let solver = CaseSolver::new(receiver, sender, options, objective);
    tokio::spawn(solver.solve_cases())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn explicit_modes_are_parsed() {
        assert_eq!(
            parse_args(&args(&["executor", "TEXT", "in.txt", "out.txt"])).unwrap(),
            (DataSource::Text("in.txt".into()), "out.txt".into())
        );
        assert_eq!(
            parse_args(&args(&["executor", "csv", "in.csv", "out.txt"])).unwrap(),
            (DataSource::Csv("in.csv".into()), "out.txt".into())
        );
        assert_eq!(
            parse_args(&args(&["executor", "sim", "out.txt"])).unwrap(),
            (DataSource::Sim, "out.txt".into())
        );
    }

    #[test]
    fn bare_input_and_output_read_text() {
        assert_eq!(
            parse_args(&args(&["executor", "cases.txt", "results.txt"])).unwrap(),
            (DataSource::Text("cases.txt".into()), "results.txt".into())
        );
    }

    #[tokio::test]
    async fn pipeline_writes_one_result_per_case() {
        use std::io::Write;
        use tempfile::NamedTempFile;

        let mut input = NamedTempFile::new().expect("Failed to create input file");
        input
            .write_all(b"4\n2\n1 2\n2 1\n1\n5\n3\n0 3 9\n4 0 1\n7 2 0\n2\n1 2 3\n")
            .expect("Failed to write input");
        let output = NamedTempFile::new().expect("Failed to create output file");

        let config = config::load_config_from(std::path::Path::new("no/such/Config.toml")).unwrap();
        let source = DataSource::Text(input.path().to_str().unwrap().to_string());
        let (case_sender, case_receiver) = mpsc::channel(2);
        let (outcome_sender, outcome_receiver) = mpsc::channel(2);

        let producer = spawn_producer(&source, case_sender, &config);
        let solver = spawn_solver(
            case_receiver,
            outcome_sender,
            config.solver.options().unwrap(),
            config.solver.objective().unwrap(),
        );
        let writer = Writer::new(BufWriter::new(output.reopen().unwrap()), outcome_receiver)
            .spawn_task();

        // The last case is truncated: the whole input is rejected before anything is sent.
        let (produced, solved, written) = tokio::join!(producer, solver, writer);
        assert!(matches!(produced.unwrap(), Err(Error::UnexpectedEof { .. })));
        assert_eq!(solved.unwrap().unwrap(), 0);
        assert_eq!(written.unwrap().unwrap(), 0);

        let mut input = NamedTempFile::new().expect("Failed to create input file");
        input
            .write_all(b"3\n2\n1 2\n2 1\n1\n5\n3\n0 3 9\n4 0 1\n7 2 0\n")
            .expect("Failed to write input");
        let source = DataSource::Text(input.path().to_str().unwrap().to_string());
        let (case_sender, case_receiver) = mpsc::channel(2);
        let (outcome_sender, outcome_receiver) = mpsc::channel(2);

        let producer = spawn_producer(&source, case_sender, &config);
        let solver = spawn_solver(
            case_receiver,
            outcome_sender,
            config.solver.options().unwrap(),
            config.solver.objective().unwrap(),
        );
        let writer = Writer::new(BufWriter::new(output.reopen().unwrap()), outcome_receiver)
            .spawn_task();

        let (produced, solved, written) = tokio::join!(producer, solver, writer);
        assert_eq!(produced.unwrap().unwrap(), 3);
        assert_eq!(solved.unwrap().unwrap(), 3);
        assert_eq!(written.unwrap().unwrap(), 3);
        assert_eq!(
            std::fs::read_to_string(output.path()).unwrap(),
            "2\n5\n0\n"
        );
    }

    #[test]
    fn wrong_arity_is_a_usage_error() {
        assert!(matches!(
            parse_args(&args(&["executor"])),
            Err(Error::Usage(_))
        ));
        assert!(matches!(
            parse_args(&args(&["executor", "csv", "in.csv"])),
            Err(Error::Usage(_))
        ));
        assert!(matches!(
            parse_args(&args(&["executor", "sim", "a", "b"])),
            Err(Error::Usage(_))
        ));
        assert!(matches!(
            parse_args(&args(&["executor", "only-one"])),
            Err(Error::Usage(_))
        ));
    }
}
