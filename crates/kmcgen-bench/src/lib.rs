//! Benchmark model profiles for the kmcgen compiler.
//!
//! Both profiles are built programmatically so their size can be scaled:
//!
//! - [`diffusion_profile`]: adsorption, desorption and nearest-neighbour
//!   hopping of several species on a square or cubic lattice
//! - [`shell_profile`]: one process per neighbourhood radius, all asking
//!   about the same growing set of sites

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use kmcgen_core::{Coordinate, Layer, ModelError, Offset, Process, ProcessList, SiteType};
use smallvec::smallvec;

fn site(offset: Offset) -> Coordinate {
    Coordinate::new(offset, "a", "default")
}

fn unit(dimension: usize, axis: usize, step: i32) -> Offset {
    let mut offset: Offset = smallvec![0; dimension];
    offset[axis] = step;
    offset
}

/// `species` adsorbing species hopping along every axis of a
/// `dimension`-D lattice with one site type.
///
/// Each species gets `adsX`, `desX` and two hops per axis, so the model
/// has `species * (2 + 2 * dimension)` processes.
pub fn diffusion_profile(dimension: usize, species: usize) -> Result<ProcessList, ModelError> {
    let names: Vec<String> = (1..=species).map(|i| format!("S{i}")).collect();
    let mut b = ProcessList::builder(dimension).species("empty");
    for name in &names {
        b = b.species(name.clone());
    }
    b = b.layer(Layer::new("default").with_site(SiteType::new("a", [0.0; 3])));

    let here = || site(smallvec![0; dimension]);
    for name in &names {
        b = b
            .process(
                Process::new(format!("ads{name}"), format!("k_ads_{name}"))
                    .with_condition(here(), "empty")
                    .with_action(here(), name.clone()),
            )
            .process(
                Process::new(format!("des{name}"), format!("k_des_{name}"))
                    .with_condition(here(), name.clone())
                    .with_action(here(), "empty"),
            );
        for axis in 0..dimension {
            for (step, dir) in [(1, "p"), (-1, "m")] {
                let there = site(unit(dimension, axis, step));
                b = b.process(
                    Process::new(format!("hop{name}_{dir}{axis}"), format!("k_hop_{name}"))
                        .with_condition(here(), name.clone())
                        .with_condition(there.clone(), "empty")
                        .with_action(here(), "empty")
                        .with_action(there, name.clone()),
                );
            }
        }
    }
    b.build()
}

/// A 2D model where process `fill_r` turns the anchor into `A` when
/// every site within Manhattan distance `r` is empty, for `r` in
/// `1..=radius`.
pub fn shell_profile(radius: i32) -> Result<ProcessList, ModelError> {
    let mut b = ProcessList::builder(2)
        .species("empty")
        .species("A")
        .layer(Layer::new("default").with_site(SiteType::new("a", [0.0; 3])));
    for r in 1..=radius {
        let mut p = Process::new(format!("fill_{r}"), "k_fill");
        for dx in -r..=r {
            for dy in -r..=r {
                if dx.abs() + dy.abs() <= r {
                    p = p.with_condition(site(smallvec![dx, dy]), "empty");
                }
            }
        }
        b = b.process(p.with_action(site(smallvec![0, 0]), "A"));
    }
    b.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diffusion_profile_process_count() {
        let model = diffusion_profile(2, 3).unwrap();
        assert_eq!(model.processes().len(), 3 * (2 + 2 * 2));
    }

    #[test]
    fn shell_profile_condition_counts() {
        let model = shell_profile(3).unwrap();
        let counts: Vec<usize> = model.processes().iter().map(|p| p.conditions.len()).collect();
        assert_eq!(counts, vec![5, 13, 25]);
    }
}
