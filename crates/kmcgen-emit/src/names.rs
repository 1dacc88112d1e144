//! Identifier and expression helpers shared by both source files.

use kmcgen_core::Coordinate;

use crate::error::EmitError;

/// Longest identifier Fortran 2003 accepts.
pub const MAX_IDENTIFIER: usize = 63;

/// Fail if `name` is too long to be a Fortran identifier.
pub fn check_identifier(name: &str) -> Result<(), EmitError> {
    if name.len() > MAX_IDENTIFIER {
        return Err(EmitError::IdentifierTooLong {
            name: name.to_string(),
            length: name.len(),
            limit: MAX_IDENTIFIER,
        });
    }
    Ok(())
}

/// The site-type constant `<layer>_<site>`.
pub fn site_constant(layer: &str, site: &str) -> String {
    format!("{layer}_{site}")
}

/// Position of `coord` seen from the site vector `arg`, whose site type
/// is the constant `origin`.
pub fn site_expr(arg: &str, coord: &Coordinate, origin: &str) -> String {
    let target = site_constant(&coord.layer, &coord.site);
    if coord.is_anchor() && target == origin {
        return arg.to_string();
    }
    let local = if target == origin {
        "0".to_string()
    } else {
        format!("{target} - {origin}")
    };
    format!(
        "{arg} + (/{}, {}, {}, {local}/)",
        coord.axis(0),
        coord.axis(1),
        coord.axis(2)
    )
}

/// A Fortran character literal.
pub fn string_literal(text: &str) -> String {
    format!("\"{}\"", text.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use kmcgen_core::Coordinate;

    fn c(offset: &[i32], site: &str, layer: &str) -> Coordinate {
        Coordinate::new(offset.iter().copied().collect(), site, layer)
    }

    #[test]
    fn same_site_zero_offset_is_the_argument() {
        assert_eq!(site_expr("site", &c(&[0, 0], "a", "l"), "l_a"), "site");
    }

    #[test]
    fn offsets_are_padded_to_three_axes() {
        assert_eq!(
            site_expr("site", &c(&[-1], "a", "l"), "l_a"),
            "site + (/-1, 0, 0, 0/)"
        );
    }

    #[test]
    fn other_site_types_shift_the_local_index() {
        assert_eq!(
            site_expr("site", &c(&[0, 1], "cus", "ruo2"), "ruo2_bridge"),
            "site + (/0, 1, 0, ruo2_cus - ruo2_bridge/)"
        );
    }

    #[test]
    fn identifiers_over_the_limit_fail() {
        assert!(check_identifier(&"x".repeat(63)).is_ok());
        assert!(matches!(
            check_identifier(&"x".repeat(64)),
            Err(EmitError::IdentifierTooLong { length: 64, .. })
        ));
    }

    #[test]
    fn quotes_are_doubled() {
        assert_eq!(string_literal(r#"a"b"#), r#""a""b""#);
    }
}
