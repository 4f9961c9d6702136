//! # Photometric measurements
//!
//! The photometry family measures fluxes over an [`Image`] sample. The base
//! layout every photometric record starts from is `flux` (Double, offset
//! [`FLUX`]) and `fluxErr` (Float, offset [`FLUX_ERR`]); algorithms that
//! carry extra quantities declare additional offsets starting at [`NVALUE`]
//! (see [`model`]) or define their own full array layout (see [`aperture`]).
//!
//! Every algorithm body here is a deliberate placeholder: a fixed arbitrary
//! arithmetic transform of the sample value, preserved exactly so runs stay
//! reproducible. Swap in real pixel math by registering your own
//! [`MeasureAlgorithm`](crate::registry::MeasureAlgorithm) under a new name.
//!
//! Builtins are registered explicitly, once, inside a `LazyLock`:
//! [`builtin_registry`] is ready before any lookup can observe it.

pub mod aperture;
pub mod model;
pub mod psf;

use std::fmt;
use std::sync::{Arc, LazyLock};

use crate::image::Image;
use crate::record::Record;
use crate::registry::{AlgorithmRegistry, MeasureQuantity};
use crate::schema::{FieldEntry, FieldType, Schema};

/// Base offset of `flux` (Double).
pub const FLUX: usize = 0;
/// Base offset of `fluxErr` (Float).
pub const FLUX_ERR: usize = 1;
/// First offset available to algorithm-specific fields.
pub const NVALUE: usize = 2;

/// Append the base photometric fields to a concrete type's schema.
pub(crate) fn define_base_schema(schema: &mut Schema) {
    schema.add(FieldEntry::new("flux", FLUX as i32, FieldType::Double));
    schema.add(FieldEntry::new("fluxErr", FLUX_ERR as i32, FieldType::Float));
}

/// A photometric measurement record.
pub trait Photometry: Record {
    /// The measured flux (first aperture, for array layouts).
    fn flux(&self) -> f64;
    /// The flux error; negative means "not estimated".
    fn flux_err(&self) -> f32;
}

/// Render `flux`, with `+-fluxErr` appended only when the error was
/// estimated.
pub(crate) fn fmt_flux(f: &mut fmt::Formatter<'_>, flux: f64, flux_err: f32) -> fmt::Result {
    write!(f, "{flux}")?;
    if flux_err >= 0.0 {
        write!(f, "+-{flux_err}")?;
    }
    Ok(())
}

/// A configured photometric measuring instance.
pub type MeasurePhotometry = MeasureQuantity<dyn Photometry, Image>;

/// Register every builtin photometric algorithm into `registry`.
///
/// Callers composing their own registry (builtins plus custom algorithms)
/// can start from this and keep declaring.
pub fn register_builtins(registry: &mut AlgorithmRegistry<dyn Photometry, Image>) {
    psf::register(registry);
    model::register(registry);
    aperture::register(registry);
}

static BUILTIN_REGISTRY: LazyLock<Arc<AlgorithmRegistry<dyn Photometry, Image>>> =
    LazyLock::new(|| {
        let mut registry = AlgorithmRegistry::new();
        register_builtins(&mut registry);
        Arc::new(registry)
    });

/// The shared registry holding the builtin photometric algorithms
/// (`"psf"`, `"model"`, `"aper"`).
pub fn builtin_registry() -> Arc<AlgorithmRegistry<dyn Photometry, Image>> {
    Arc::clone(&BUILTIN_REGISTRY)
}

/// A fresh [`MeasurePhotometry`] resolving names against the builtin
/// registry.
pub fn measurer() -> MeasurePhotometry {
    MeasureQuantity::new(builtin_registry())
}
