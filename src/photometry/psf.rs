//! PSF photometry. The astronomical details are left to the reader: the
//! placeholder transform is `flux = 3 × sample`, no error estimate.

use std::fmt;
use std::sync::{Arc, LazyLock};

use crate::image::Image;
use crate::record::{Record, RecordBuilder, RecordStore};
use crate::registry::{AlgorithmRegistry, MeasureAlgorithm};
use crate::schema::Schema;
use crate::skymeter_errors::SkymeterError;

use super::{define_base_schema, fmt_flux, Photometry, FLUX, FLUX_ERR};

static SCHEMA: LazyLock<Arc<Schema>> = LazyLock::new(|| {
    let mut schema = Schema::new();
    define_base_schema(&mut schema);
    Arc::new(schema)
});

/// A PSF flux measurement: the base photometric fields only.
pub struct PsfPhotometry {
    store: RecordStore,
}

impl PsfPhotometry {
    pub fn new(flux: f64, flux_err: f32) -> Result<Self, SkymeterError> {
        let mut builder = RecordBuilder::new(Arc::clone(&SCHEMA));
        builder.set(FLUX, flux)?;
        builder.set(FLUX_ERR, flux_err)?;
        Ok(Self {
            store: builder.freeze()?,
        })
    }

    /// The per-type schema singleton shared by every instance.
    pub fn shared_schema() -> Arc<Schema> {
        Arc::clone(&SCHEMA)
    }
}

impl fmt::Display for PsfPhotometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_flux(f, self.flux(), self.flux_err())
    }
}

impl Record for PsfPhotometry {
    fn store(&self) -> &RecordStore {
        &self.store
    }

    fn store_mut(&mut self) -> &mut RecordStore {
        &mut self.store
    }
}

impl Photometry for PsfPhotometry {
    fn flux(&self) -> f64 {
        self.store.value(FLUX)
    }

    fn flux_err(&self) -> f32 {
        self.store.value(FLUX_ERR)
    }
}

struct PsfAlgorithm;

impl MeasureAlgorithm<dyn Photometry, Image> for PsfAlgorithm {
    fn measure(&self, image: &Image) -> Result<Box<dyn Photometry>, SkymeterError> {
        // Here is the real work, hiding in a comment
        Ok(Box::new(PsfPhotometry::new(3.0 * image.value(), -1.0)?))
    }
}

pub(crate) fn register(registry: &mut AlgorithmRegistry<dyn Photometry, Image>) {
    registry.declare("psf", || Box::new(PsfAlgorithm));
}
