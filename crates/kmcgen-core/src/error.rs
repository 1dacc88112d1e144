//! Error types for model construction and coordinate parsing.
//!
//! [`ModelError`] is the consistency-error family: the input model
//! violates an invariant the compiler relies on. [`ParseError`] is the
//! malformed-expression family, raised where a coordinate string is read.
//! Both are fatal to the current compilation.

use thiserror::Error;

/// A coordinate or numeric literal could not be parsed.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The text does not match `site.(dx,dy,dz)[.layer]`.
    #[error("malformed coordinate '{input}': expected 'site.(dx,dy,dz)' with an optional '.layer' suffix")]
    MalformedCoordinate {
        /// The offending text.
        input: String,
    },
    /// An offset component is not a valid 32-bit integer.
    #[error("malformed coordinate '{input}': offset component '{component}' is not an integer")]
    InvalidComponent {
        /// The offending text.
        input: String,
        /// The component that failed to parse.
        component: String,
    },
    /// The coordinate names an axis the model does not have.
    #[error(
        "malformed coordinate '{input}': non-zero offset {value} on axis {axis} of a {dimension}D model"
    )]
    ExcessAxis {
        /// The offending text.
        input: String,
        /// Zero-based axis of the offending component.
        axis: usize,
        /// The non-zero value found.
        value: i32,
        /// Model dimension.
        dimension: usize,
    },
}

/// The model violates an invariant the compiler assumes.
///
/// Every variant names the process, condition or coordinate at fault so a
/// human can locate it in the input.
#[derive(Debug, Error)]
pub enum ModelError {
    /// Dimension outside `1..=3`.
    #[error("model dimension must be 1, 2 or 3, got {dimension}")]
    InvalidDimension {
        /// The configured dimension.
        dimension: usize,
    },
    /// No species were declared.
    #[error("model declares no species")]
    NoSpecies,
    /// No layers were declared.
    #[error("model declares no layers")]
    NoLayers,
    /// A layer declares no site types.
    #[error("layer '{layer}' declares no site types")]
    EmptyLayer {
        /// The empty layer.
        layer: String,
    },
    /// The default species is not among the declared species.
    #[error("default species '{name}' is not declared")]
    UnknownDefaultSpecies {
        /// The configured default species.
        name: String,
    },
    /// Two entities of the same kind share a name.
    #[error("duplicate {kind} name '{name}'")]
    DuplicateName {
        /// Entity kind ("species", "layer", "process").
        kind: &'static str,
        /// The repeated name.
        name: String,
    },
    /// Two site types inside one layer share a name.
    #[error("duplicate site type '{site}' in layer '{layer}'")]
    DuplicateSite {
        /// Owning layer.
        layer: String,
        /// The repeated site name.
        site: String,
    },
    /// A name is not a valid identifier in generated source.
    #[error("{kind} name '{name}' is not a valid identifier ([A-Za-z][A-Za-z0-9_]*)")]
    InvalidIdentifier {
        /// Entity kind.
        kind: &'static str,
        /// The offending name.
        name: String,
    },
    /// A condition or action names an undeclared species.
    #[error("process '{process}': unknown species '{species}'")]
    UnknownSpecies {
        /// The referencing process (empty when looked up outside a process).
        process: String,
        /// The undeclared species.
        species: String,
    },
    /// A coordinate names an undeclared layer.
    #[error("{context}: unknown layer '{layer}'")]
    UnknownLayer {
        /// Where the reference was found.
        context: String,
        /// The undeclared layer.
        layer: String,
    },
    /// A coordinate names a site type its layer does not declare.
    #[error("{context}: unknown site type '{site}' in layer '{layer}'")]
    UnknownSite {
        /// Where the reference was found.
        context: String,
        /// The layer searched.
        layer: String,
        /// The undeclared site type.
        site: String,
    },
    /// An offset does not have one component per model axis.
    #[error("{context}: offset has {found} components, model dimension is {expected}")]
    OffsetDimension {
        /// Where the offset was found.
        context: String,
        /// Model dimension.
        expected: usize,
        /// Offset length.
        found: usize,
    },
    /// The process has no zero-offset condition to anchor it.
    #[error("process '{process}' has no anchor condition (a condition with zero offset)")]
    MissingAnchor {
        /// The offending process.
        process: String,
    },
    /// An action acts on a coordinate no condition constrains.
    #[error("process '{process}': action at {coord} has no matching condition")]
    UnmatchedAction {
        /// The offending process.
        process: String,
        /// The unmatched action coordinate.
        coord: String,
    },
    /// Two conditions of one process constrain the same coordinate.
    #[error("process '{process}': more than one condition at {coord}")]
    DuplicateCondition {
        /// The offending process.
        process: String,
        /// The repeated coordinate.
        coord: String,
    },
    /// Two actions of one process act on the same coordinate.
    #[error("process '{process}': more than one action at {coord}")]
    DuplicateAction {
        /// The offending process.
        process: String,
        /// The repeated coordinate.
        coord: String,
    },
    /// A cross-layer translation has no conversion-table entry.
    #[error("no lattice conversion registered from layer '{from}' to layer '{to}'")]
    MissingConversion {
        /// Source layer.
        from: String,
        /// Target layer.
        to: String,
    },
    /// A condition species can be read as both the event species and the
    /// default species, so the event cannot be classified.
    #[error(
        "process '{process}': condition {condition} cannot be classified for species '{species}': \
         it is both the event species and the default species"
    )]
    AmbiguousEmptySpecies {
        /// The offending process.
        process: String,
        /// The condition being classified.
        condition: String,
        /// The event species.
        species: String,
    },
    /// A coordinate string failed to parse.
    #[error("{context}: {source}")]
    Parse {
        /// Where the coordinate was read.
        context: String,
        /// The parse failure.
        #[source]
        source: ParseError,
    },
    /// The model document is not valid JSON for the model schema.
    #[error("invalid model document: {0}")]
    Json(#[from] serde_json::Error),
}
