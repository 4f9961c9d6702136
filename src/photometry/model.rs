//! Model-fit photometry. Adds a Sersic index to the base photometric
//! layout; the placeholder transform is `flux = 2 × sample`,
//! `fluxErr = 0.2`, `sersic_n = 4`.

use std::fmt;
use std::sync::{Arc, LazyLock};

use crate::image::Image;
use crate::record::{Record, RecordBuilder, RecordStore};
use crate::registry::{AlgorithmRegistry, MeasureAlgorithm};
use crate::schema::{FieldEntry, FieldType, Schema};
use crate::skymeter_errors::SkymeterError;

use super::{define_base_schema, fmt_flux, Photometry, FLUX, FLUX_ERR, NVALUE};

/// Offset of the Sersic index; [0, NVALUE) are taken by the base fields.
const SERSIC_N: usize = NVALUE;

static SCHEMA: LazyLock<Arc<Schema>> = LazyLock::new(|| {
    let mut schema = Schema::new();
    define_base_schema(&mut schema);
    schema.add(FieldEntry::new("sersic_n", SERSIC_N as i32, FieldType::Int));
    Arc::new(schema)
});

/// A model-fit flux measurement: base fields plus `sersic_n`.
///
/// There is no typed accessor for the Sersic index; generic callers reach it
/// as `get("sersic_n", …)` or `get_as_long`.
pub struct ModelPhotometry {
    store: RecordStore,
}

impl ModelPhotometry {
    pub fn new(flux: f64, flux_err: f32) -> Result<Self, SkymeterError> {
        let mut builder = RecordBuilder::new(Arc::clone(&SCHEMA));
        builder.set(FLUX, flux)?;
        builder.set(FLUX_ERR, flux_err)?;
        // Placeholder profile: a fixed de Vaucouleurs index.
        builder.set(SERSIC_N, 4_i32)?;
        Ok(Self {
            store: builder.freeze()?,
        })
    }

    /// The per-type schema singleton shared by every instance.
    pub fn shared_schema() -> Arc<Schema> {
        Arc::clone(&SCHEMA)
    }
}

impl fmt::Display for ModelPhotometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n_s: {}  ", self.store.value::<i32>(SERSIC_N))?;
        fmt_flux(f, self.flux(), self.flux_err())
    }
}

impl Record for ModelPhotometry {
    fn store(&self) -> &RecordStore {
        &self.store
    }

    fn store_mut(&mut self) -> &mut RecordStore {
        &mut self.store
    }
}

impl Photometry for ModelPhotometry {
    fn flux(&self) -> f64 {
        self.store.value(FLUX)
    }

    fn flux_err(&self) -> f32 {
        self.store.value(FLUX_ERR)
    }
}

struct ModelAlgorithm;

impl MeasureAlgorithm<dyn Photometry, Image> for ModelAlgorithm {
    fn measure(&self, image: &Image) -> Result<Box<dyn Photometry>, SkymeterError> {
        // Burn CPU time here
        Ok(Box::new(ModelPhotometry::new(2.0 * image.value(), 0.2)?))
    }
}

pub(crate) fn register(registry: &mut AlgorithmRegistry<dyn Photometry, Image>) {
    registry.declare("model", || Box::new(ModelAlgorithm));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extended_schema_appends_after_base_fields() {
        let m = ModelPhotometry::new(20.0, 0.2).unwrap();
        assert_eq!(m.schema().size(), 3);
        let entry = m.schema().find("sersic_n", "");
        assert!(entry.found());
        assert_eq!(entry.index, SERSIC_N as i32);
        assert_eq!(entry.ftype, FieldType::Int);
    }

    #[test]
    fn sersic_index_reads_as_long() {
        let m = ModelPhotometry::new(20.0, 0.2).unwrap();
        assert_eq!(m.get_as_long("sersic_n", "").unwrap(), 4);
        assert_eq!(m.get("sersic_n", "").unwrap(), 4.0);
    }

    #[test]
    fn display_prefixes_sersic_index() {
        let m = ModelPhotometry::new(20.0, 0.2).unwrap();
        assert_eq!(m.to_string(), "n_s: 4  20+-0.2");
    }
}
