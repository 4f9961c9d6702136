//! Aperture photometry. Measures the flux in [`NRADIUS`] concentric
//! apertures, so every base field becomes an array and the radii join the
//! schema (with units, and with a typed accessor — unlike `sersic_n`).
//!
//! Placeholder transform: `radius_i = 6.66 + i` arcsec,
//! `flux_i = sample × (1 + 0.1·i)`, no error estimate.

use std::fmt;
use std::sync::{Arc, LazyLock};

use crate::image::Image;
use crate::record::{Record, RecordBuilder, RecordStore};
use crate::registry::{AlgorithmRegistry, MeasureAlgorithm};
use crate::schema::{FieldEntry, FieldType, Schema};
use crate::skymeter_errors::SkymeterError;

use super::{fmt_flux, Photometry};

/// Number of apertures.
pub const NRADIUS: usize = 3;

// Full array layout; the base scalar offsets do not apply here.
const FLUX: usize = 0;
const FLUX_ERR: usize = FLUX + NRADIUS;
const RADIUS: usize = FLUX_ERR + NRADIUS;

static SCHEMA: LazyLock<Arc<Schema>> = LazyLock::new(|| {
    let mut schema = Schema::new();
    schema.add(
        FieldEntry::new("flux", FLUX as i32, FieldType::Double).with_arity(NRADIUS as u32),
    );
    schema.add(
        FieldEntry::new("fluxErr", FLUX_ERR as i32, FieldType::Float).with_arity(NRADIUS as u32),
    );
    schema.add(
        FieldEntry::new("radius", RADIUS as i32, FieldType::Float)
            .with_arity(NRADIUS as u32)
            .with_units("arcsec"),
    );
    Arc::new(schema)
});

/// A multi-aperture flux measurement.
pub struct AperturePhotometry {
    store: RecordStore,
}

impl AperturePhotometry {
    /// Record fluxes for [`NRADIUS`] apertures: radii step by 1 arcsec from
    /// `radius`, fluxes scale by 1.0, 1.1, 1.2, …, and every aperture shares
    /// the same `flux_err`.
    pub fn new(radius: f32, flux: f64, flux_err: f32) -> Result<Self, SkymeterError> {
        let mut builder = RecordBuilder::new(Arc::clone(&SCHEMA));
        for i in 0..NRADIUS as u32 {
            builder.set_indexed(RADIUS, i, radius + i as f32)?;
            builder.set_indexed(FLUX, i, flux + flux * 0.1 * i as f64)?;
            builder.set_indexed(FLUX_ERR, i, flux_err)?;
        }
        Ok(Self {
            store: builder.freeze()?,
        })
    }

    /// The per-type schema singleton shared by every instance.
    pub fn shared_schema() -> Arc<Schema> {
        Arc::clone(&SCHEMA)
    }

    pub fn n_radius(&self) -> usize {
        NRADIUS
    }

    pub fn radius(&self, i: u32) -> f32 {
        self.store.value_at(RADIUS, i)
    }

    pub fn flux_at(&self, i: u32) -> f64 {
        self.store.value_at(FLUX, i)
    }

    pub fn flux_err_at(&self, i: u32) -> f32 {
        self.store.value_at(FLUX_ERR, i)
    }
}

impl fmt::Display for AperturePhotometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in 0..NRADIUS as u32 {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "[R: {}  ", self.radius(i))?;
            fmt_flux(f, self.flux_at(i), self.flux_err_at(i))?;
            write!(f, "]")?;
        }
        Ok(())
    }
}

impl Record for AperturePhotometry {
    fn store(&self) -> &RecordStore {
        &self.store
    }

    fn store_mut(&mut self) -> &mut RecordStore {
        &mut self.store
    }
}

impl Photometry for AperturePhotometry {
    fn flux(&self) -> f64 {
        self.flux_at(0)
    }

    fn flux_err(&self) -> f32 {
        self.flux_err_at(0)
    }
}

struct ApertureAlgorithm;

impl MeasureAlgorithm<dyn Photometry, Image> for ApertureAlgorithm {
    fn measure(&self, image: &Image) -> Result<Box<dyn Photometry>, SkymeterError> {
        // Measure your flux here
        Ok(Box::new(AperturePhotometry::new(6.66, image.value(), -1.0)?))
    }
}

pub(crate) fn register(registry: &mut AlgorithmRegistry<dyn Photometry, Image>) {
    registry.declare("aper", || Box::new(ApertureAlgorithm));
}
