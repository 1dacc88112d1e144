//! The `lattice` module: constants, index mapping and site access.
//!
//! Site access wraps the runtime's `base` module, which stores the
//! lattice by linear index, so the process list can address sites by
//! `(x, y, z, site type)` vectors.

use kmcgen_compiler::KernelPlan;
use kmcgen_core::ProcessList;
use kmcgen_lattice::{Axis, IndexFormula};
use tracing::debug;

use crate::error::EmitError;
use crate::names::check_identifier;
use crate::writer::SourceWriter;

/// Write the header comment every generated file starts with.
pub(crate) fn header(w: &mut SourceWriter, title: &str, fingerprint: u64) {
    w.comment(format!(
        "{title}\ngenerated by kmcgen {}, do not edit\nmodel fingerprint: {fingerprint:016x}",
        env!("CARGO_PKG_VERSION")
    ));
    w.blank();
}

/// Write an integer parameter declaration.
pub(crate) fn parameter(w: &mut SourceWriter, name: &str, value: impl std::fmt::Display) {
    w.line(format!("integer(kind=iint), parameter :: {name} = {value}"));
}

fn fortran_axis(axis: Axis) -> usize {
    axis.index() + 1
}

fn product(axes: &[Axis]) -> String {
    axes.iter()
        .map(|&a| format!("system_size({})", fortran_axis(a)))
        .collect::<Vec<_>>()
        .join("*")
}

/// Right-hand side of `to_index`.
fn forward_expr(formula: &IndexFormula) -> String {
    let terms: Vec<String> = formula
        .forward()
        .iter()
        .map(|term| {
            let i = fortran_axis(term.axis);
            let wrapped = format!("modulo(site({i}), system_size({i}))");
            if term.stride.is_empty() {
                wrapped
            } else {
                format!("{}*{wrapped}", product(&term.stride))
            }
        })
        .collect();
    format!("spuck*({}) + site(4)", terms.join(" + "))
}

/// Assignments of `to_coord`, one per axis, unused axes included.
fn inverse_assignments(formula: &IndexFormula) -> Vec<String> {
    let mut out: Vec<String> = formula
        .inverse()
        .iter()
        .map(|term| {
            let i = fortran_axis(term.axis);
            let quotient = match term.divisor.len() {
                0 => "cell".to_string(),
                1 => format!("cell/{}", product(&term.divisor)),
                _ => format!("cell/({})", product(&term.divisor)),
            };
            let value = match term.modulus {
                Some(m) => format!("modulo({quotient}, system_size({}))", fortran_axis(m)),
                None => quotient,
            };
            format!("site({i}) = {value}")
        })
        .collect();
    for i in formula.dimension() + 1..=3 {
        out.push(format!("site({i}) = 0"));
    }
    out
}

/// Render `lattice.f90`.
pub fn render_lattice(
    model: &ProcessList,
    plan: &KernelPlan,
    indent: usize,
) -> Result<String, EmitError> {
    for site in plan.sites() {
        check_identifier(&site.name)?;
    }
    let formula = plan.formula();

    let mut w = SourceWriter::new(indent);
    header(&mut w, "kMC lattice: index mapping and site access", plan.fingerprint());
    w.block("module lattice", "end module lattice", |w| {
        w.line("use kind_values");
        w.line(
            "use base, only: base_get_species => get_species, \
             base_replace_species => replace_species, base_add_proc => add_proc, \
             base_del_proc => del_proc, base_can_do => can_do",
        );
        w.line("implicit none");
        w.blank();
        parameter(w, "lattice_dimension", formula.dimension());
        parameter(w, "spuck", formula.sites_per_cell());
        parameter(w, "nr_of_layers", model.layers().len());
        w.blank();
        w.comment("site types");
        for site in plan.sites() {
            parameter(w, &site.name, site.index);
        }
        w.blank();
        w.line("integer(kind=iint), dimension(3) :: system_size = (/1, 1, 1/)");
        w.blank();
        w.line("contains");
        w.blank();

        w.block(
            "subroutine set_system_size(extents)",
            "end subroutine set_system_size",
            |w| {
                w.line("integer(kind=iint), dimension(lattice_dimension), intent(in) :: extents");
                w.line("system_size = 1");
                w.line("system_size(1:lattice_dimension) = extents");
            },
        );
        w.blank();

        w.block(
            "pure function to_index(site) result(n)",
            "end function to_index",
            |w| {
                w.line("integer(kind=iint), dimension(4), intent(in) :: site");
                w.line("integer(kind=iint) :: n");
                w.line(format!("n = {}", forward_expr(formula)));
            },
        );
        w.blank();

        w.block(
            "pure function to_coord(n) result(site)",
            "end function to_coord",
            |w| {
                w.line("integer(kind=iint), intent(in) :: n");
                w.line("integer(kind=iint), dimension(4) :: site");
                w.line("integer(kind=iint) :: cell");
                w.line("cell = (n - 1)/spuck");
                w.line("site(4) = modulo(n - 1, spuck) + 1");
                for assignment in inverse_assignments(formula) {
                    w.line(assignment);
                }
            },
        );
        w.blank();

        w.block(
            "function get_species(site)",
            "end function get_species",
            |w| {
                w.line("integer(kind=iint), dimension(4), intent(in) :: site");
                w.line("integer(kind=iint) :: get_species");
                w.line("get_species = base_get_species(to_index(site))");
            },
        );
        w.blank();

        w.block(
            "subroutine replace_species(site, old_species, new_species)",
            "end subroutine replace_species",
            |w| {
                w.line("integer(kind=iint), dimension(4), intent(in) :: site");
                w.line("integer(kind=iint), intent(in) :: old_species, new_species");
                w.line("call base_replace_species(to_index(site), old_species, new_species)");
            },
        );
        w.blank();

        for (name, call) in [("add_proc", "base_add_proc"), ("del_proc", "base_del_proc")] {
            w.block(
                format!("subroutine {name}(proc, site)"),
                format!("end subroutine {name}"),
                |w| {
                    w.line("integer(kind=iint), intent(in) :: proc");
                    w.line("integer(kind=iint), dimension(4), intent(in) :: site");
                    w.line(format!("call {call}(proc, to_index(site))"));
                },
            );
            w.blank();
        }

        w.block(
            "logical function can_do(proc, site)",
            "end function can_do",
            |w| {
                w.line("integer(kind=iint), intent(in) :: proc");
                w.line("integer(kind=iint), dimension(4), intent(in) :: site");
                w.line("can_do = base_can_do(proc, to_index(site))");
            },
        );
    });

    let text = w.finish();
    debug!(bytes = text.len(), "rendered lattice source");
    Ok(text)
}
