//! Coordinate string parser.
//!
//! Coordinates are written `site.(dx,dy,dz)` with an optional `.layer`
//! suffix, e.g. `cus.(0, -1, 0).ruo2`. Between one and three offset
//! components may be given; missing trailing components are zero, and
//! components beyond the model dimension must be zero.

use std::sync::LazyLock;

use regex::Regex;

use crate::coord::Coordinate;
use crate::error::ParseError;
use crate::id::Offset;

static COORDINATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\s*([A-Za-z_][A-Za-z0-9_]*)\s*\.\s*\(([^()]*)\)\s*(?:\.\s*([A-Za-z_][A-Za-z0-9_]*))?\s*$",
    )
    .expect("coordinate pattern is a valid regex")
});

/// Parse a coordinate string for a model of the given dimension.
///
/// `default_layer` is used when the string carries no layer suffix.
///
/// # Examples
///
/// ```
/// use kmcgen_core::parse_coordinate;
///
/// let c = parse_coordinate("cus.(1, 0, 0).ruo2", 2, "default").unwrap();
/// assert_eq!(c.offset.as_slice(), &[1, 0]);
/// assert_eq!(c.layer, "ruo2");
///
/// let d = parse_coordinate("a.(-2)", 1, "default").unwrap();
/// assert_eq!(d.layer, "default");
/// assert!(parse_coordinate("a.(0, 1)", 1, "default").is_err());
/// ```
pub fn parse_coordinate(
    input: &str,
    dimension: usize,
    default_layer: &str,
) -> Result<Coordinate, ParseError> {
    let malformed = || ParseError::MalformedCoordinate {
        input: input.to_string(),
    };
    let caps = COORDINATE.captures(input).ok_or_else(malformed)?;
    let site = &caps[1];
    let layer = caps.get(3).map_or(default_layer, |m| m.as_str());

    let components: Vec<&str> = caps[2].split(',').map(str::trim).collect();
    if components.is_empty() || components.len() > 3 {
        return Err(malformed());
    }

    let mut full = [0i32; 3];
    for (axis, component) in components.iter().enumerate() {
        full[axis] = component
            .parse::<i32>()
            .map_err(|_| ParseError::InvalidComponent {
                input: input.to_string(),
                component: component.to_string(),
            })?;
    }
    for (axis, &value) in full.iter().enumerate().skip(dimension) {
        if value != 0 {
            return Err(ParseError::ExcessAxis {
                input: input.to_string(),
                axis,
                value,
                dimension,
            });
        }
    }

    let offset: Offset = full.iter().take(dimension).copied().collect();
    Ok(Coordinate::new(offset, site, layer))
}
