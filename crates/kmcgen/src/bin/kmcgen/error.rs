use std::io::{self, Write};

use anyhow::Error;
use kmcgen::compiler::CompileError;
use kmcgen::emit::EmitError;
use kmcgen::model::ModelError;

/// Print `err`, its causes, and any hints for it to stderr.
pub fn print_error(err: &Error) {
    let mut stderr = io::stderr().lock();

    let _ = writeln!(stderr, "error: {err}");
    for cause in err.chain().skip(1) {
        let _ = writeln!(stderr, "  caused by: {cause}");
    }
    for hint in hints(err) {
        let _ = writeln!(stderr, "  hint: {hint}");
    }
}

fn hints(err: &Error) -> Vec<&'static str> {
    let mut out = Vec::new();
    for cause in err.chain() {
        if let Some(e) = cause.downcast_ref::<EmitError>() {
            emit_hints(e, &mut out);
        } else if let Some(e) = cause.downcast_ref::<CompileError>() {
            compile_hints(e, &mut out);
        } else if let Some(e) = cause.downcast_ref::<ModelError>() {
            model_hints(e, &mut out);
        } else if let Some(e) = cause.downcast_ref::<io::Error>() {
            if e.kind() == io::ErrorKind::NotFound {
                out.push("check that the model path is correct");
            }
        }
    }
    out.dedup();
    out
}

fn emit_hints(err: &EmitError, out: &mut Vec<&'static str>) {
    match err {
        EmitError::OutputConflict { .. } => {
            out.push("pass --force to overwrite, or choose another directory with -o");
        }
        EmitError::IdentifierTooLong { .. } => {
            out.push("shorten the process, species or site name");
        }
        EmitError::Compile(e) => compile_hints(e, out),
        EmitError::Model(e) => model_hints(e, out),
        EmitError::Config { .. } | EmitError::PlanMismatch { .. } | EmitError::Io { .. } => {}
    }
}

fn compile_hints(err: &CompileError, out: &mut Vec<&'static str>) {
    match err {
        CompileError::NameCollision { .. } => {
            out.push("generated names share one namespace, case-insensitively; rename one of them");
        }
        CompileError::Model(e) => model_hints(e, out),
        CompileError::Lattice(_) => {}
    }
}

fn model_hints(err: &ModelError, out: &mut Vec<&'static str>) {
    match err {
        ModelError::MissingConversion { .. } => {
            out.push("add a \"conversions\" entry for the layer pair, or set \"shared_unit_cell\"");
        }
        ModelError::AmbiguousEmptySpecies { .. } => {
            out.push("the default species cannot be put or taken; check \"default_species\"");
        }
        ModelError::MissingAnchor { .. } => {
            out.push("every process needs a condition at offset (0,0,0)");
        }
        ModelError::Parse { .. } => {
            out.push("coordinates are written as site.(dx,dy,dz) or site.(dx,dy,dz).layer");
        }
        _ => {}
    }
}
