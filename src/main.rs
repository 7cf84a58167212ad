use std::fs::File;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Parser;
use num_format::{Locale, ToFormattedString};
use serde::Serialize;
use serde_with::serde_as;
use serde_with::DurationSecondsWithFrac;

use intersat::options::Options;
use intersat::options::DEFAULT_OPTIONS;
use intersat::solver::{SolveResult, Solver};

const HEADING_RESTART: &str = "Restart options";
const HEADING_REDUCE_DB: &str = "Reduce-DB options";

#[derive(Parser)]
#[command(author, version)]
struct Cli {
    /// Path to input CNF.
    #[arg(value_name = "PATH")]
    input: PathBuf,

    /// Path to output results.
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Record a resolution proof and write its trace here on UNSAT.
    #[arg(long, value_name = "PATH")]
    proof: Option<PathBuf>,

    /// Verbosity level.
    #[arg(short, long, default_value_t = 0)]
    verbosity: u32,

    /// Base number of conflicts between restarts.
    #[arg(help_heading = HEADING_RESTART)]
    #[arg(long, value_name = "NUM")]
    #[arg(default_value_t = DEFAULT_OPTIONS.restart_init)]
    restart_init: usize,

    /// Growth factor for the number of conflicts between restarts.
    #[arg(help_heading = HEADING_RESTART)]
    #[arg(long, value_name = "NUM")]
    #[arg(default_value_t = DEFAULT_OPTIONS.restart_inc)]
    restart_inc: f64,

    /// Variable activity decay.
    #[arg(long, value_name = "NUM")]
    #[arg(default_value_t = DEFAULT_OPTIONS.var_decay)]
    var_decay: f64,

    /// Clause activity decay.
    #[arg(long, value_name = "NUM")]
    #[arg(default_value_t = DEFAULT_OPTIONS.cla_decay)]
    cla_decay: f64,

    #[arg(help_heading = HEADING_REDUCE_DB)]
    #[arg(long, value_name = "NUM")]
    #[arg(default_value_t = DEFAULT_OPTIONS.learntsize_factor)]
    learntsize_factor: f64,

    #[arg(help_heading = HEADING_REDUCE_DB)]
    #[arg(long, value_name = "NUM")]
    #[arg(default_value_t = DEFAULT_OPTIONS.learntsize_inc)]
    learntsize_inc: f64,

    #[arg(help_heading = HEADING_REDUCE_DB)]
    #[arg(long, value_name = "NUM")]
    #[arg(default_value_t = DEFAULT_OPTIONS.learntsize_adjust_start)]
    learntsize_adjust_start: f64,

    #[arg(help_heading = HEADING_REDUCE_DB)]
    #[arg(long, value_name = "NUM")]
    #[arg(default_value_t = DEFAULT_OPTIONS.learntsize_adjust_inc)]
    learntsize_adjust_inc: f64,
}

#[serde_as]
#[derive(Debug, Serialize)]
struct TheResult {
    name: String,
    result: SolveResult,
    #[serde_as(as = "DurationSecondsWithFrac<f64>")]
    time_total: Duration,
    #[serde_as(as = "DurationSecondsWithFrac<f64>")]
    time_search: Duration,
    #[serde_as(as = "DurationSecondsWithFrac<f64>")]
    time_propagate: Duration,
    num_vars: usize,
    num_clauses: usize,
    num_learnts: usize,
    num_decisions: usize,
    num_propagations: usize,
    num_conflicts: usize,
    num_restarts: usize,
    num_reduces: usize,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    // Setup the solver:
    let time_start = Instant::now();
    let options = Options {
        restart_init: cli.restart_init,
        restart_inc: cli.restart_inc,
        var_decay: cli.var_decay,
        cla_decay: cli.cla_decay,
        learntsize_factor: cli.learntsize_factor,
        learntsize_inc: cli.learntsize_inc,
        learntsize_adjust_start: cli.learntsize_adjust_start,
        learntsize_adjust_inc: cli.learntsize_adjust_inc,
    };
    let mut solver = Solver::new(options);
    solver.set_verbosity(cli.verbosity);
    if cli.proof.is_some() {
        solver.enable_proof_recording();
    }
    solver.init_from_file(&cli.input)?;
    let time_create = time_start.elapsed();

    // Solve:
    let result = solver.solve();
    let time_total = time_start.elapsed();

    if result == SolveResult::Unsat {
        if let Some(path) = &cli.proof {
            println!("Writing proof trace to '{}'...", path.display());
            solver
                .proof()
                .expect("recording was enabled")
                .write_trace(&mut File::create(path)?)?;
        }
    }

    let the_result = TheResult {
        name: cli.input.file_name().unwrap().to_str().unwrap().to_string(),
        result,
        time_total,
        time_search: solver.time_search,
        time_propagate: solver.time_propagate,
        num_vars: solver.num_vars(),
        num_clauses: solver.num_clauses(),
        num_learnts: solver.num_learnts(),
        num_decisions: solver.num_decisions(),
        num_propagations: solver.num_propagations(),
        num_conflicts: solver.num_conflicts(),
        num_restarts: solver.num_restarts(),
        num_reduces: solver.num_reduces(),
    };

    // Dump the result:
    if let Some(output) = cli.output {
        println!("Writing result to '{}'...", output.display());
        serde_json::to_writer_pretty(File::create(output)?, &the_result)?;
    }

    // Print the result and timings:
    let format = &Locale::en;
    println!("Solver returned: {:?}", result);
    println!("vars:         {}", solver.num_vars().to_formatted_string(format));
    println!("clauses:      {}", solver.num_clauses().to_formatted_string(format));
    println!("learnts:      {}", solver.num_learnts().to_formatted_string(format));
    println!("decisions:    {}", solver.num_decisions().to_formatted_string(format));
    println!("propagations: {}", solver.num_propagations().to_formatted_string(format));
    println!("conflicts:    {}", solver.num_conflicts().to_formatted_string(format));
    println!("restarts:     {}", solver.num_restarts().to_formatted_string(format));
    println!("reduces:      {}", solver.num_reduces().to_formatted_string(format));
    println!("time total:     {:?}", time_total);
    println!(
        "time create:    {:?} ({:.2}%)",
        time_create,
        100.0 * time_create.as_secs_f64() / time_total.as_secs_f64(),
    );
    println!(
        "time search:    {:?} ({:.2}%)",
        solver.time_search,
        100.0 * solver.time_search.as_secs_f64() / time_total.as_secs_f64(),
    );
    println!(
        "time propagate: {:?} ({:.2}%)",
        solver.time_propagate,
        100.0 * solver.time_propagate.as_secs_f64() / time_total.as_secs_f64(),
    );

    println!("All done in {:?}", time_start.elapsed());
    Ok(())
}
