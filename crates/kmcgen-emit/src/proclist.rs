//! The `proclist` module: process constants, check, update and touch-up
//! procedures, dispatch, and name tables.

use kmcgen_compiler::{KernelPlan, Node, Payload};
use kmcgen_core::ProcessList;
use tracing::debug;

use crate::error::EmitError;
use crate::lattice::{header, parameter};
use crate::names::{check_identifier, site_constant, site_expr, string_literal};
use crate::writer::SourceWriter;

/// Names indexed by one-based process id.
struct ProcessNames<'a>(Vec<&'a str>);

impl ProcessNames<'_> {
    fn get(&self, id: kmcgen_core::ProcessId) -> &str {
        self.0[(id.0 - 1) as usize]
    }
}

fn site_argument(w: &mut SourceWriter) {
    w.line("integer(kind=iint), dimension(4), intent(in) :: site");
}

/// Render a decision tree. `origin` is the site-type constant of `site`.
fn render_tree(
    w: &mut SourceWriter,
    nodes: &[Node<Payload>],
    names: &ProcessNames<'_>,
    origin: &str,
) {
    for node in nodes {
        match node {
            Node::Fire(Payload::Enable { process, location }) => {
                let at = site_expr("site", location, origin);
                w.line(format!("call add_proc({}, {at})", names.get(*process)));
            }
            Node::Fire(Payload::Disable { process, location }) => {
                let at = site_expr("site", location, origin);
                let p = names.get(*process);
                w.line(format!("if(can_do({p}, {at})) call del_proc({p}, {at})"));
            }
            Node::Branch { coord, arms } => {
                w.line(format!(
                    "select case(get_species({}))",
                    site_expr("site", coord, origin)
                ));
                for arm in arms {
                    w.line(format!("case({})", arm.species));
                    w.indented(|w| render_tree(w, &arm.body, names, origin));
                }
                w.line("end select");
            }
        }
    }
}

/// A lookup function mapping integer constants to their names.
fn name_table<'a>(
    w: &mut SourceWriter,
    function: &str,
    argument: &str,
    entries: impl Iterator<Item = &'a str> + Clone,
) {
    let width = entries.clone().map(str::len).max().unwrap_or(0).max(1);
    w.block(
        format!("function {function}({argument}) result(name)"),
        format!("end function {function}"),
        |w| {
            w.line(format!("integer(kind=iint), intent(in) :: {argument}"));
            w.line(format!("character(len={width}) :: name"));
            w.line(format!("select case({argument})"));
            for entry in entries {
                w.line(format!("case({entry})"));
                w.indented(|w| w.line(format!("name = {}", string_literal(entry))));
            }
            w.line("case default");
            w.indented(|w| w.line("name = \"\""));
            w.line("end select");
        },
    );
}

/// Render `proclist.f90`.
pub fn render_proclist(
    model: &ProcessList,
    plan: &KernelPlan,
    indent: usize,
) -> Result<String, EmitError> {
    let names = ProcessNames(model.processes().iter().map(|p| p.name.as_str()).collect());
    for name in names.0.iter().copied().chain(model.species().iter().map(|s| s.name.as_str())) {
        check_identifier(name)?;
    }
    for c in plan.checks() {
        check_identifier(&c.name)?;
    }
    for u in plan.updates() {
        check_identifier(&u.name)?;
    }
    for t in plan.touchups() {
        check_identifier(&t.name)?;
    }

    let mut w = SourceWriter::new(indent);
    header(&mut w, "kMC process list: availability updates and dispatch", plan.fingerprint());
    w.block("module proclist", "end module proclist", |w| {
        w.line("use kind_values");
        w.line("use base, only: determine_procsite");
        w.line("use lattice");
        w.line("implicit none");
        w.blank();

        parameter(w, "nr_of_species", model.species().len());
        parameter(w, "nr_of_proc", model.processes().len());
        w.blank();
        w.comment("species");
        for s in model.species() {
            parameter(w, &s.name, s.id);
        }
        parameter(w, "default_species", &model.default_species().name);
        w.blank();
        w.comment("processes and their rate constants");
        for (id, p) in model.processes_with_ids() {
            w.comment(format!("{}: {}", p.name, p.rate_constant.replace('\n', " ")));
            parameter(w, &p.name, id);
        }
        w.blank();
        w.line("contains");

        // ── Checks ──
        for check in plan.checks() {
            w.blank();
            let origin = site_constant(&check.origin.layer, &check.origin.site);
            w.block(
                format!("logical function {}(site)", check.name),
                format!("end function {}", check.name),
                |w| {
                    site_argument(w);
                    let terms: Vec<String> = check
                        .conditions
                        .iter()
                        .map(|c| {
                            format!(
                                "get_species({}) == {}",
                                site_expr("site", &c.coord, &origin),
                                c.species
                            )
                        })
                        .collect();
                    w.line(format!("{} = {}", check.name, terms.join(" .and. ")));
                },
            );
        }

        // ── Updates ──
        for update in plan.updates() {
            w.blank();
            let origin = site_constant(&update.event.layer, &update.event.site);
            w.block(
                format!("subroutine {}(site)", update.name),
                format!("end subroutine {}", update.name),
                |w| {
                    site_argument(w);
                    w.line(format!(
                        "call replace_species(site, {}, {})",
                        update.from, update.to
                    ));
                    render_tree(w, update.tree.nodes(), &names, &origin);
                },
            );
        }

        // ── Touch-ups ──
        for touchup in plan.touchups() {
            w.blank();
            let origin = site_constant(&touchup.layer, &touchup.site);
            w.block(
                format!("subroutine {}(site)", touchup.name),
                format!("end subroutine {}", touchup.name),
                |w| {
                    site_argument(w);
                    for &process in &touchup.removals {
                        let p = names.get(process);
                        w.line(format!("if(can_do({p}, site)) call del_proc({p}, site)"));
                    }
                    render_tree(w, touchup.tree.nodes(), &names, &origin);
                },
            );
        }
        w.blank();
        w.block("subroutine touchup_site(site)", "end subroutine touchup_site", |w| {
            site_argument(w);
            w.line("select case(site(4))");
            for touchup in plan.touchups() {
                w.line(format!("case({})", site_constant(&touchup.layer, &touchup.site)));
                w.indented(|w| w.line(format!("call {}(site)", touchup.name)));
            }
            w.line("end select");
        });

        // ── Dispatch ──
        w.blank();
        w.block("subroutine run_proc_nr(proc, nr_site)", "end subroutine run_proc_nr", |w| {
            w.line("integer(kind=iint), intent(in) :: proc, nr_site");
            w.line("integer(kind=iint), dimension(4) :: site");
            w.line("site = to_coord(nr_site)");
            w.line("select case(proc)");
            for run in plan.dispatch() {
                w.line(format!("case({})", run.name));
                let origin = site_constant(&run.anchor.layer, &run.anchor.site);
                w.indented(|w| {
                    for step in &run.steps {
                        w.line(format!(
                            "call {}({})",
                            step.procedure,
                            site_expr("site", &step.coord, &origin)
                        ));
                    }
                });
            }
            w.line("end select");
        });
        w.blank();
        w.block("subroutine do_kmc_step()", "end subroutine do_kmc_step", |w| {
            w.line("integer(kind=iint) :: proc_nr, nr_site");
            w.line("call determine_procsite(proc_nr, nr_site)");
            w.line("call run_proc_nr(proc_nr, nr_site)");
        });

        // ── Initial state ──
        w.blank();
        w.block("subroutine initialize_state()", "end subroutine initialize_state", |w| {
            w.line("integer(kind=iint) :: n");
            w.line("integer(kind=iint), dimension(4) :: site");
            w.block("do n = 1, spuck*product(system_size)", "end do", |w| {
                w.line("site = to_coord(n)");
                w.line("call replace_species(site, get_species(site), default_species)");
            });
            w.block("do n = 1, spuck*product(system_size)", "end do", |w| {
                w.line("call touchup_site(to_coord(n))");
            });
        });

        // ── Name tables ──
        w.blank();
        name_table(w, "get_proc_name", "proc", names.0.iter().copied());
        w.blank();
        name_table(
            w,
            "get_species_name",
            "species",
            model.species().iter().map(|s| s.name.as_str()),
        );
        w.blank();
        name_table(
            w,
            "get_site_name",
            "site_type",
            plan.sites().iter().map(|s| s.name.as_str()),
        );
    });

    let text = w.finish();
    debug!(bytes = text.len(), "rendered proclist source");
    Ok(text)
}
