//! End-to-end emission tests over the shared fixtures.

use kmcgen_compiler::compile;
use kmcgen_core::model_fingerprint;
use kmcgen_emit::writer::MAX_LINE;
use kmcgen_emit::{generate, EmitConfig, EmitError, GeneratedSources};
use kmcgen_test_utils::fixtures;

fn emit(model: &kmcgen_core::ProcessList) -> GeneratedSources {
    let plan = compile(model).expect("fixture compiles");
    generate(model, &plan, &EmitConfig::default()).expect("fixture renders")
}

/// Text of the subroutine `name`, header line included.
fn procedure<'a>(source: &'a str, name: &str) -> &'a str {
    let start = source
        .find(&format!("subroutine {name}(site)"))
        .unwrap_or_else(|| panic!("{name} not found"));
    let end_marker = format!("end subroutine {name}");
    let end = source[start..]
        .find(&end_marker)
        .unwrap_or_else(|| panic!("end of {name} not found"));
    &source[start..start + end + end_marker.len()]
}

#[test]
fn every_fixture_renders_byte_identically() {
    for (name, model) in fixtures::all() {
        let first = emit(&model);
        let second = emit(&model);
        assert_eq!(first, second, "{name} output differs between runs");
    }
}

#[test]
fn ads_des_has_expected_procedures() {
    let sources = emit(&fixtures::ads_des_1d());
    for needle in [
        "logical function check_adsA(site)",
        "logical function check_desA(site)",
        "subroutine put_A_default_a(site)",
        "subroutine take_A_default_a(site)",
        "subroutine touchup_default_a(site)",
        "subroutine run_proc_nr(proc, nr_site)",
        "subroutine initialize_state()",
        "function get_proc_name(proc) result(name)",
    ] {
        assert!(sources.proclist.contains(needle), "missing `{needle}`");
    }
    assert!(sources.lattice.contains("integer(kind=iint), parameter :: lattice_dimension = 1"));
    assert!(sources.lattice.contains("integer(kind=iint), parameter :: default_a = 1"));
}

#[test]
fn ads_des_updates_need_no_queries() {
    let sources = emit(&fixtures::ads_des_1d());
    let put = procedure(&sources.proclist, "put_A_default_a");
    assert!(!put.contains("select case"));
    assert!(put.contains("call add_proc(desA, site)"));
    assert!(put.contains("if(can_do(adsA, site)) call del_proc(adsA, site)"));
}

#[test]
fn shared_neighbour_is_queried_once() {
    let sources = emit(&fixtures::shared_neighbour_1d());
    let put = procedure(&sources.proclist, "put_A_default_a");
    assert_eq!(
        put.matches("select case(get_species(site + (/1, 0, 0, 0/)))").count(),
        1,
        "{put}"
    );
}

#[test]
fn header_records_model_fingerprint() {
    let model = fixtures::co_oxidation_2d();
    let sources = emit(&model);
    let line = format!("! model fingerprint: {:016x}", model_fingerprint(&model));
    assert!(sources.lattice.contains(&line));
    assert!(sources.proclist.contains(&line));
}

#[test]
fn code_lines_fit_the_line_limit() {
    for (name, model) in fixtures::all() {
        let sources = emit(&model);
        for text in [&sources.lattice, &sources.proclist] {
            for line in text.lines().filter(|l| !l.trim_start().starts_with('!')) {
                assert!(line.len() <= MAX_LINE, "{name}: overlong line `{line}`");
            }
        }
    }
}

#[test]
fn plan_from_another_model_is_rejected() {
    let plan = compile(&fixtures::ads_des_1d()).unwrap();
    let other = fixtures::diffusion_1d();
    let err = generate(&other, &plan, &EmitConfig::default()).unwrap_err();
    assert!(matches!(err, EmitError::PlanMismatch { .. }));
}

#[test]
fn cross_layer_offsets_use_site_type_difference() {
    let sources = emit(&fixtures::two_layer_1d());
    let text = &sources.proclist;
    assert!(text.contains("bottom_a - top_t/)") || text.contains("top_t - bottom_a/)"));
}
