use anyhow::{Context, Result};
use kmcgen::emit::{build, EmitConfig, OverwritePolicy};

use crate::cli::BuildArgs;
use crate::io::{confirm_overwrite, load_model};

pub fn run_build(args: BuildArgs) -> Result<()> {
    let model = load_model(&args.input.model)?;
    let config = EmitConfig {
        output_dir: args.output,
        lattice_file: args.lattice_file,
        proclist_file: args.proclist_file,
        overwrite: if args.force {
            OverwritePolicy::Force
        } else {
            OverwritePolicy::Refuse
        },
        indent: args.indent,
    };

    let output = build(&model, &config, confirm_overwrite)
        .with_context(|| format!("Build failed for {}", args.input.model.display()))?;

    for path in &output.paths {
        println!("wrote {}", path.display());
    }
    println!("model fingerprint: {:016x}", output.plan.fingerprint());
    Ok(())
}
