//! Index mapping compliance helpers.
//!
//! These functions verify the bijectivity contract of an
//! [`IndexMapping`] by exhaustive enumeration. Reused across the mapping
//! and formula test modules.

use indexmap::IndexSet;

use crate::mapping::{IndexMapping, LatticeSite};

/// Assert `to_index(to_coord(n)) == n` for every `n` in `[1, volume]`.
pub fn assert_index_round_trip(m: &IndexMapping) {
    for n in 1..=m.volume() {
        let site = m.to_coord(n).expect("index in range");
        let back = m.to_index(&site).expect("site in range");
        assert_eq!(back, n, "to_index(to_coord({n})) = {back}");
    }
}

/// Assert `to_coord(to_index(site)) == site` for every in-range site.
pub fn assert_coord_round_trip(m: &IndexMapping) {
    let [nx, ny, nz] = m.extents();
    for z in 0..nz as i32 {
        for y in 0..ny as i32 {
            for x in 0..nx as i32 {
                for local in 1..=m.sites_per_cell() {
                    let site = LatticeSite::new([x, y, z], local);
                    let n = m.to_index(&site).expect("site in range");
                    let back = m.to_coord(n).expect("index in range");
                    assert_eq!(back, site, "to_coord(to_index({site:?})) = {back:?}");
                }
            }
        }
    }
}

/// Assert that the canonical ordering visits each site exactly once.
pub fn assert_canonical_ordering_complete(m: &IndexMapping) {
    let ordering: Vec<LatticeSite> = m.canonical_ordering().collect();
    assert_eq!(ordering.len() as u64, m.volume());
    let unique: IndexSet<_> = ordering.iter().collect();
    assert_eq!(
        unique.len(),
        ordering.len(),
        "canonical_ordering has duplicates"
    );
}

/// Run all compliance checks on a mapping.
pub fn run_full_compliance(m: &IndexMapping) {
    assert_index_round_trip(m);
    assert_coord_round_trip(m);
    assert_canonical_ordering_complete(m);
}
