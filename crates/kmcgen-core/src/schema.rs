//! JSON model documents.
//!
//! The editor (or any other model provider) hands the compiler a JSON
//! document. [`ModelDocument`] mirrors that document field for field;
//! [`ProcessList::from_document`] parses its coordinate strings and runs
//! the builder, so a loaded model is always validated.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ModelError;
use crate::layer::{Layer, SiteType};
use crate::parse::parse_coordinate;
use crate::process::Process;
use crate::proclist::ProcessList;

/// Top-level model document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModelDocument {
    /// Model dimension (1 to 3).
    pub dimension: usize,
    /// Species names in declaration order.
    pub species: Vec<String>,
    /// Default species; the first species when omitted.
    #[serde(default)]
    pub default_species: Option<String>,
    /// Layers in declaration order.
    pub layers: Vec<LayerDocument>,
    /// Explicit layer-to-layer cell shifts.
    #[serde(default)]
    pub conversions: Vec<ConversionDocument>,
    /// Declare that all layers share one unit cell.
    #[serde(default)]
    pub shared_unit_cell: bool,
    /// Processes in declaration order.
    #[serde(default)]
    pub processes: Vec<ProcessDocument>,
}

/// A layer entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LayerDocument {
    /// Layer name.
    pub name: String,
    /// Spatial unit-cell size.
    #[serde(default = "unit_cell")]
    pub cell_size: [f64; 3],
    /// Site types of the layer.
    pub sites: Vec<SiteDocument>,
}

/// A site-type entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SiteDocument {
    /// Site-type name.
    pub name: String,
    /// Fractional position inside the unit cell.
    #[serde(default)]
    pub position: [f64; 3],
}

/// A conversion-table entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConversionDocument {
    /// Source layer.
    pub from: String,
    /// Target layer.
    pub to: String,
    /// Cell shift, one component per model axis.
    pub shift: Vec<i32>,
}

/// A process entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProcessDocument {
    /// Process name.
    pub name: String,
    /// Opaque rate-constant expression.
    #[serde(default)]
    pub rate_constant: String,
    /// Conditions as `(coordinate string, species)` entries.
    pub conditions: Vec<ElementDocument>,
    /// Actions as `(coordinate string, species)` entries.
    #[serde(default)]
    pub actions: Vec<ElementDocument>,
}

/// A condition or action entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ElementDocument {
    /// Coordinate string, `site.(dx,dy,dz)[.layer]`.
    pub coord: String,
    /// Species name.
    pub species: String,
}

fn unit_cell() -> [f64; 3] {
    [1.0, 1.0, 1.0]
}

impl ProcessList {
    /// Parse and validate a JSON model document.
    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        let document: ModelDocument = serde_json::from_str(json)?;
        Self::from_document(&document)
    }

    /// Build and validate a model from a parsed document.
    pub fn from_document(document: &ModelDocument) -> Result<Self, ModelError> {
        let dimension = document.dimension;
        let default_layer = document
            .layers
            .first()
            .map(|l| l.name.clone())
            .ok_or(ModelError::NoLayers)?;

        let mut builder = ProcessList::builder(dimension);
        for name in &document.species {
            builder = builder.species(name.clone());
        }
        if let Some(default) = &document.default_species {
            builder = builder.default_species(default.clone());
        }
        for layer in &document.layers {
            let mut built = Layer::new(layer.name.clone()).with_cell_size(layer.cell_size);
            for site in &layer.sites {
                built = built.with_site(SiteType::new(site.name.clone(), site.position));
            }
            builder = builder.layer(built);
        }
        for conversion in &document.conversions {
            if conversion.shift.len() != dimension {
                return Err(ModelError::OffsetDimension {
                    context: format!(
                        "conversion '{}' -> '{}'",
                        conversion.from, conversion.to
                    ),
                    expected: dimension,
                    found: conversion.shift.len(),
                });
            }
            builder = builder.conversion(
                conversion.from.clone(),
                conversion.to.clone(),
                conversion.shift.iter().copied().collect(),
            );
        }
        if document.shared_unit_cell {
            builder = builder.shared_unit_cell();
        }

        for entry in &document.processes {
            let mut process = Process::new(entry.name.clone(), entry.rate_constant.clone());
            let context = |kind: &str, i: usize| format!("process '{}' {kind} {}", entry.name, i + 1);
            for (i, condition) in entry.conditions.iter().enumerate() {
                let coord = parse_coordinate(&condition.coord, dimension, &default_layer)
                    .map_err(|source| ModelError::Parse {
                        context: context("condition", i),
                        source,
                    })?;
                process = process.with_condition(coord, condition.species.clone());
            }
            for (i, action) in entry.actions.iter().enumerate() {
                let coord = parse_coordinate(&action.coord, dimension, &default_layer)
                    .map_err(|source| ModelError::Parse {
                        context: context("action", i),
                        source,
                    })?;
                process = process.with_action(coord, action.species.clone());
            }
            builder = builder.process(process);
        }

        let model = builder.build()?;
        debug!(processes = model.processes().len(), "loaded model document");
        Ok(model)
    }
}
