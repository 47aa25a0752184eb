use contagion::runner::run_with_args;
use std::process::ExitCode;

fn main() -> ExitCode {
    match run_with_args() {
        Ok(summary) => {
            let state = if summary.completed {
                "complete"
            } else {
                "step limit"
            };
            println!(
                "{state} after {} ticks: vulnerable={} infected={} immune={}",
                summary.steps,
                summary.census.vulnerable,
                summary.census.infected,
                summary.census.immune
            );
            if let Some(path) = summary.report {
                println!("census report: {}", path.display());
            }
            ExitCode::SUCCESS
        }
        Err(error) => {
            eprintln!("Error: {error}");
            ExitCode::FAILURE
        }
    }
}
