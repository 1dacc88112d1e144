use anyhow::{Context, Result};
use kmcgen::compiler::compile;

use crate::cli::ModelArgs;
use crate::io::load_model;

pub fn run_inspect(args: ModelArgs) -> Result<()> {
    let model = load_model(&args.model)?;
    let plan = compile(&model)
        .with_context(|| format!("Compilation failed for {}", args.model.display()))?;
    println!("{}", plan.report());
    Ok(())
}
