//! # skymeter: pluggable, schema-described source measurements
//!
//! A small framework for computing named, self-describing measurements
//! (fluxes, positions) by running runtime-selected algorithms over a sample
//! and exposing every result through one reflection layer:
//!
//! - [`schema`] — per-type field descriptions (name, type tag, arity, units,
//!   component) with ordered iteration and two-level name lookup,
//! - [`record`] — typed, schema-indexed slot storage: one erased tagged-union
//!   slot per unit of schema capacity, compile-time-offset fast accessors for
//!   the owning type, widening name-based getters for everyone else,
//! - [`registry`] — name-keyed algorithm factories and configured measuring
//!   instances,
//! - [`measurement`] — the ordered composite of records one run produces,
//! - [`photometry`] / [`astrometry`] — the two builtin quantity families,
//!   with deliberately-placeholder algorithm bodies,
//! - [`source`] / [`output`] — a measured source and its CSV/table
//!   renderings.
//!
//! ## Example
//!
//! ```rust
//! use skymeter::image::Image;
//! use skymeter::photometry;
//! use skymeter::record::Record;
//!
//! let mut photo = photometry::measurer();
//! photo.add_algorithm("psf")?;
//! photo.add_algorithm("aper")?;
//!
//! let values = photo.measure(&Image::new(10.0))?;
//! assert_eq!(values.find("psf").unwrap().get("flux", "")?, 30.0);
//! # Ok::<(), skymeter::skymeter_errors::SkymeterError>(())
//! ```

pub mod astrometry;
pub mod image;
pub mod measurement;
pub mod output;
pub mod photometry;
pub mod record;
pub mod registry;
pub mod schema;
pub mod skymeter_errors;
pub mod source;

pub use crate::image::{Image, Peak};
pub use crate::measurement::Measurement;
pub use crate::record::{FieldValue, Record, RecordBuilder, RecordStore};
pub use crate::registry::{AlgorithmRegistry, MeasureAlgorithm, MeasureQuantity};
pub use crate::schema::{FieldEntry, FieldType, Schema};
pub use crate::skymeter_errors::SkymeterError;
pub use crate::source::Source;
