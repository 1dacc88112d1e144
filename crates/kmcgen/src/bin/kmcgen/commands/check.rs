use anyhow::{Context, Result};
use kmcgen::compiler::compile;
use tracing::warn;

use crate::cli::ModelArgs;
use crate::io::load_model;

pub fn run_check(args: ModelArgs) -> Result<()> {
    let model = load_model(&args.model)?;
    let plan = compile(&model)
        .with_context(|| format!("Compilation failed for {}", args.model.display()))?;
    let report = plan.report();

    for idle in report.idle_events() {
        warn!(event = %idle.event, "event affects no process");
    }
    println!(
        "{}: ok ({} processes, {} update procedures, {} queries, fingerprint {:016x})",
        args.model.display(),
        report.processes,
        report.events.len(),
        report.total_queries(),
        report.fingerprint
    );
    Ok(())
}
