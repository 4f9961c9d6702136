//! # Astrometric measurements
//!
//! The astrometry family measures positions from a detected [`Peak`]. Base
//! layout: `x`/`y` centroids (Double) interleaved with their errors (Float),
//! all in pixel units, at offsets [`X`], [`X_ERR`], [`Y`], [`Y_ERR`].
//! Algorithm-specific fields start at [`NVALUE`].
//!
//! Like the photometric builtins, the algorithm bodies are placeholders with
//! fixed transforms; see [`naive`].

pub mod naive;

use std::fmt;
use std::sync::{Arc, LazyLock};

use crate::image::Peak;
use crate::record::Record;
use crate::registry::{AlgorithmRegistry, MeasureQuantity};
use crate::schema::{FieldEntry, FieldType, Schema};

/// Base offset of the `x` centroid (Double).
pub const X: usize = 0;
/// Base offset of `xErr` (Float).
pub const X_ERR: usize = 1;
/// Base offset of the `y` centroid (Double).
pub const Y: usize = 2;
/// Base offset of `yErr` (Float).
pub const Y_ERR: usize = 3;
/// First offset available to algorithm-specific fields.
pub const NVALUE: usize = 4;

/// Append the base astrometric fields to a concrete type's schema.
pub(crate) fn define_base_schema(schema: &mut Schema) {
    schema.add(FieldEntry::new("x", X as i32, FieldType::Double).with_units("pixel"));
    schema.add(FieldEntry::new("xErr", X_ERR as i32, FieldType::Float).with_units("pixel"));
    schema.add(FieldEntry::new("y", Y as i32, FieldType::Double).with_units("pixel"));
    schema.add(FieldEntry::new("yErr", Y_ERR as i32, FieldType::Float).with_units("pixel"));
}

/// An astrometric measurement record.
pub trait Astrometry: Record {
    fn x(&self) -> f64;
    fn x_err(&self) -> f32;
    fn y(&self) -> f64;
    fn y_err(&self) -> f32;
}

/// Render `(x+-xErr, y+-yErr)`.
pub(crate) fn fmt_position(
    f: &mut fmt::Formatter<'_>,
    x: f64,
    x_err: f32,
    y: f64,
    y_err: f32,
) -> fmt::Result {
    write!(f, "({x}+-{x_err}, {y}+-{y_err})")
}

/// A configured astrometric measuring instance.
pub type MeasureAstrometry = MeasureQuantity<dyn Astrometry, Peak>;

/// Register every builtin astrometric algorithm into `registry`.
pub fn register_builtins(registry: &mut AlgorithmRegistry<dyn Astrometry, Peak>) {
    naive::register(registry);
}

static BUILTIN_REGISTRY: LazyLock<Arc<AlgorithmRegistry<dyn Astrometry, Peak>>> =
    LazyLock::new(|| {
        let mut registry = AlgorithmRegistry::new();
        register_builtins(&mut registry);
        Arc::new(registry)
    });

/// The shared registry holding the builtin astrometric algorithms
/// (`"naive"`).
pub fn builtin_registry() -> Arc<AlgorithmRegistry<dyn Astrometry, Peak>> {
    Arc::clone(&BUILTIN_REGISTRY)
}

/// A fresh [`MeasureAstrometry`] resolving names against the builtin
/// registry.
pub fn measurer() -> MeasureAstrometry {
    MeasureQuantity::new(builtin_registry())
}
