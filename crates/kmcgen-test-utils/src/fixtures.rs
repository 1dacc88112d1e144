//! Reusable fixture models.
//!
//! - [`ads_des_1d`]: one site, `A` adsorbs and desorbs.
//! - [`shared_neighbour_1d`]: three processes asking about the same
//!   neighbour.
//! - [`diffusion_1d`]: hopping in both directions.
//! - [`co_oxidation_2d`]: two site types, pair adsorption and reaction.
//! - [`two_layer_1d`]: hopping between layers with a cell shift.

use kmcgen_core::{Coordinate, Layer, Process, ProcessList, SiteType};
use smallvec::smallvec;

fn chain_site(dx: i32) -> Coordinate {
    Coordinate::new(smallvec![dx], "a", "default")
}

fn chain(species: &[&str]) -> kmcgen_core::ProcessListBuilder {
    let mut b = ProcessList::builder(1);
    for s in species {
        b = b.species(*s);
    }
    b.layer(Layer::new("default").with_site(SiteType::new("a", [0.0; 3])))
}

/// `adsA`: empty -> A, `desA`: A -> empty, on a 1D chain of one site type.
pub fn ads_des_1d() -> ProcessList {
    chain(&["empty", "A"])
        .process(
            Process::new("adsA", "k_ads")
                .with_condition(chain_site(0), "empty")
                .with_action(chain_site(0), "A"),
        )
        .process(
            Process::new("desA", "k_des")
                .with_condition(chain_site(0), "A")
                .with_action(chain_site(0), "empty"),
        )
        .build()
        .expect("ads/des fixture is valid")
}

/// Three processes, all requiring `empty` one cell to the right of an `A`.
pub fn shared_neighbour_1d() -> ProcessList {
    chain(&["empty", "A", "B"])
        .process(
            Process::new("hop", "k_hop")
                .with_condition(chain_site(0), "A")
                .with_condition(chain_site(1), "empty")
                .with_action(chain_site(0), "empty")
                .with_action(chain_site(1), "A"),
        )
        .process(
            Process::new("push", "k_push")
                .with_condition(chain_site(0), "A")
                .with_condition(chain_site(1), "empty")
                .with_condition(chain_site(-1), "B")
                .with_action(chain_site(-1), "empty"),
        )
        .process(
            Process::new("pull", "k_pull")
                .with_condition(chain_site(0), "A")
                .with_condition(chain_site(1), "empty")
                .with_condition(chain_site(2), "B")
                .with_action(chain_site(0), "empty"),
        )
        .build()
        .expect("shared-neighbour fixture is valid")
}

/// Adsorption, desorption and hopping left and right.
pub fn diffusion_1d() -> ProcessList {
    chain(&["empty", "A"])
        .process(
            Process::new("adsA", "k_ads")
                .with_condition(chain_site(0), "empty")
                .with_action(chain_site(0), "A"),
        )
        .process(
            Process::new("desA", "k_des")
                .with_condition(chain_site(0), "A")
                .with_action(chain_site(0), "empty"),
        )
        .process(
            Process::new("hop_right", "k_hop")
                .with_condition(chain_site(0), "A")
                .with_condition(chain_site(1), "empty")
                .with_action(chain_site(0), "empty")
                .with_action(chain_site(1), "A"),
        )
        .process(
            Process::new("hop_left", "k_hop")
                .with_condition(chain_site(0), "A")
                .with_condition(chain_site(-1), "empty")
                .with_action(chain_site(0), "empty")
                .with_action(chain_site(-1), "A"),
        )
        .build()
        .expect("diffusion fixture is valid")
}

const CO_OXIDATION: &str = r#"{
    "dimension": 2,
    "species": ["empty", "CO", "O"],
    "default_species": "empty",
    "layers": [{
        "name": "ruo2",
        "cell_size": [6.43, 3.12, 20.0],
        "sites": [
            { "name": "bridge", "position": [0.0, 0.5, 0.7] },
            { "name": "cus", "position": [0.5, 0.5, 0.7] }
        ]
    }],
    "processes": [
        { "name": "CO_ads_bridge", "rate_constant": "k_co_ads",
          "conditions": [{ "coord": "bridge.(0,0,0)", "species": "empty" }],
          "actions": [{ "coord": "bridge.(0,0,0)", "species": "CO" }] },
        { "name": "CO_ads_cus", "rate_constant": "k_co_ads",
          "conditions": [{ "coord": "cus.(0,0,0)", "species": "empty" }],
          "actions": [{ "coord": "cus.(0,0,0)", "species": "CO" }] },
        { "name": "CO_des_cus", "rate_constant": "k_co_des",
          "conditions": [{ "coord": "cus.(0,0,0)", "species": "CO" }],
          "actions": [{ "coord": "cus.(0,0,0)", "species": "empty" }] },
        { "name": "O2_ads_cus_cus", "rate_constant": "k_o2_ads",
          "conditions": [
              { "coord": "cus.(0,0,0)", "species": "empty" },
              { "coord": "cus.(0,1,0)", "species": "empty" }
          ],
          "actions": [
              { "coord": "cus.(0,0,0)", "species": "O" },
              { "coord": "cus.(0,1,0)", "species": "O" }
          ] },
        { "name": "O2_ads_bridge_cus", "rate_constant": "k_o2_ads",
          "conditions": [
              { "coord": "bridge.(0,0,0)", "species": "empty" },
              { "coord": "cus.(0,0,0)", "species": "empty" }
          ],
          "actions": [
              { "coord": "bridge.(0,0,0)", "species": "O" },
              { "coord": "cus.(0,0,0)", "species": "O" }
          ] },
        { "name": "CO_O_react", "rate_constant": "k_react",
          "conditions": [
              { "coord": "cus.(0,0,0)", "species": "CO" },
              { "coord": "bridge.(1,0,0)", "species": "O" }
          ],
          "actions": [
              { "coord": "cus.(0,0,0)", "species": "empty" },
              { "coord": "bridge.(1,0,0)", "species": "empty" }
          ] },
        { "name": "CO_diff_cus_up", "rate_constant": "k_diff",
          "conditions": [
              { "coord": "cus.(0,0,0)", "species": "CO" },
              { "coord": "cus.(0,1,0)", "species": "empty" }
          ],
          "actions": [
              { "coord": "cus.(0,0,0)", "species": "empty" },
              { "coord": "cus.(0,1,0)", "species": "CO" }
          ] },
        { "name": "O_to_CO_swap", "rate_constant": "k_swap",
          "conditions": [{ "coord": "bridge.(0,0,0)", "species": "O" }],
          "actions": [{ "coord": "bridge.(0,0,0)", "species": "CO" }] }
    ]
}"#;

/// A 2D CO oxidation model on two site types, loaded from JSON.
pub fn co_oxidation_2d() -> ProcessList {
    ProcessList::from_json(CO_OXIDATION).expect("CO oxidation fixture is valid")
}

/// The JSON text of [`co_oxidation_2d`].
pub fn co_oxidation_2d_json() -> &'static str {
    CO_OXIDATION
}

/// Two layers whose cells are shifted by one along x: position `p` in
/// `top` is position `p + 1` in `bottom`.
pub fn two_layer_1d() -> ProcessList {
    let bottom = |dx| Coordinate::new(smallvec![dx], "a", "bottom");
    let top = |dx| Coordinate::new(smallvec![dx], "t", "top");
    ProcessList::builder(1)
        .species("empty")
        .species("A")
        .layer(Layer::new("bottom").with_site(SiteType::new("a", [0.0; 3])))
        .layer(Layer::new("top").with_site(SiteType::new("t", [0.5, 0.0, 1.0])))
        .conversion("top", "bottom", smallvec![1])
        .process(
            Process::new("ads_bottom", "k_ads")
                .with_condition(bottom(0), "empty")
                .with_action(bottom(0), "A"),
        )
        .process(
            Process::new("climb", "k_climb")
                .with_condition(bottom(0), "A")
                .with_condition(top(0), "empty")
                .with_action(bottom(0), "empty")
                .with_action(top(0), "A"),
        )
        .process(
            Process::new("descend", "k_descend")
                .with_condition(top(0), "A")
                .with_condition(bottom(1), "empty")
                .with_action(top(0), "empty")
                .with_action(bottom(1), "A"),
        )
        .build()
        .expect("two-layer fixture is valid")
}

/// Every fixture with its name.
pub fn all() -> Vec<(&'static str, ProcessList)> {
    vec![
        ("ads_des_1d", ads_des_1d()),
        ("shared_neighbour_1d", shared_neighbour_1d()),
        ("diffusion_1d", diffusion_1d()),
        ("co_oxidation_2d", co_oxidation_2d()),
        ("two_layer_1d", two_layer_1d()),
    ]
}
