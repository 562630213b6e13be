use std::io;
use std::process;

use hash_collision_bench::{BenchConfig, Orchestrator, Reporter};

fn main() {
    let config = BenchConfig::default();
    let mut orchestrator = Orchestrator::new(&config);
    let mut reporter = Reporter::new(io::stdout().lock());

    if let Err(e) = orchestrator.run(&mut reporter) {
        eprintln!("Benchmark aborted: {}", e);
        process::exit(1);
    }
}
