//! Model fingerprinting.
//!
//! Uses FNV-1a for a fast, deterministic 64-bit digest of a model. The
//! fingerprint is written into the header of generated sources so two
//! builds can be compared without diffing. It is not cryptographically
//! secure.

use crate::proclist::ProcessList;

/// FNV-1a offset basis for 64-bit.
const FNV_OFFSET: u64 = 0xcbf29ce484222325;
/// FNV-1a prime for 64-bit.
const FNV_PRIME: u64 = 0x00000100000001B3;

/// Feed a single byte into an FNV-1a hash state.
#[inline]
fn fnv1a_byte(hash: u64, byte: u8) -> u64 {
    (hash ^ byte as u64).wrapping_mul(FNV_PRIME)
}

/// Feed a u32 (as 4 LE bytes) into an FNV-1a hash state.
#[inline]
fn fnv1a_u32(mut hash: u64, v: u32) -> u64 {
    for &b in &v.to_le_bytes() {
        hash = fnv1a_byte(hash, b);
    }
    hash
}

/// Feed a length-prefixed string into an FNV-1a hash state.
///
/// The length prefix keeps `("ab", "c")` and `("a", "bc")` apart.
#[inline]
fn fnv1a_str(mut hash: u64, s: &str) -> u64 {
    hash = fnv1a_u32(hash, s.len() as u32);
    for &b in s.as_bytes() {
        hash = fnv1a_byte(hash, b);
    }
    hash
}

/// Compute a fingerprint over everything that influences generated code.
///
/// Hashes the dimension, species (in order, with the default marked),
/// layers and their site types, conversion entries, and every process's
/// name, rate constant, conditions and actions. Spatial positions do not
/// influence generated code and are left out.
pub fn model_fingerprint(model: &ProcessList) -> u64 {
    let mut hash = FNV_OFFSET;
    hash = fnv1a_u32(hash, model.dimension() as u32);

    for species in model.species() {
        hash = fnv1a_str(hash, &species.name);
    }
    hash = fnv1a_str(hash, &model.default_species().name);

    for layer in model.layers() {
        hash = fnv1a_str(hash, &layer.name);
        hash = fnv1a_u32(hash, layer.sites.len() as u32);
        for site in &layer.sites {
            hash = fnv1a_str(hash, &site.name);
        }
    }

    for (from, to, shift) in model.conversions().iter() {
        hash = fnv1a_str(hash, from);
        hash = fnv1a_str(hash, to);
        for &s in shift {
            hash = fnv1a_u32(hash, s as u32);
        }
    }

    for process in model.processes() {
        hash = fnv1a_str(hash, &process.name);
        hash = fnv1a_str(hash, &process.rate_constant);
        hash = fnv1a_u32(hash, process.conditions.len() as u32);
        for condition in &process.conditions {
            hash = fnv1a_str(hash, &condition.coord.to_string());
            hash = fnv1a_str(hash, &condition.species);
        }
        hash = fnv1a_u32(hash, process.actions.len() as u32);
        for action in &process.actions {
            hash = fnv1a_str(hash, &action.coord.to_string());
            hash = fnv1a_str(hash, &action.species);
        }
    }

    hash
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Coordinate, Layer, Process, SiteType};
    use smallvec::smallvec;

    fn model(rate: &str) -> ProcessList {
        let here = Coordinate::new(smallvec![0], "a", "default");
        ProcessList::builder(1)
            .species("empty")
            .species("A")
            .layer(Layer::new("default").with_site(SiteType::new("a", [0.0; 3])))
            .process(
                Process::new("adsA", rate)
                    .with_condition(here.clone(), "empty")
                    .with_action(here, "A"),
            )
            .build()
            .unwrap()
    }

    #[test]
    fn fingerprint_is_deterministic() {
        assert_eq!(model_fingerprint(&model("k")), model_fingerprint(&model("k")));
    }

    #[test]
    fn fingerprint_tracks_rate_constant() {
        assert_ne!(model_fingerprint(&model("k1")), model_fingerprint(&model("k2")));
    }

    #[test]
    fn length_prefix_separates_fields() {
        let a = fnv1a_str(fnv1a_str(FNV_OFFSET, "ab"), "c");
        let b = fnv1a_str(fnv1a_str(FNV_OFFSET, "a"), "bc");
        assert_ne!(a, b);
    }
}
