//! Naive astrometry: the centroid is taken to be the detected peak itself,
//! with zero error.

use std::fmt;
use std::sync::{Arc, LazyLock};

use crate::image::Peak;
use crate::record::{Record, RecordBuilder, RecordStore};
use crate::registry::{AlgorithmRegistry, MeasureAlgorithm};
use crate::schema::Schema;
use crate::skymeter_errors::SkymeterError;

use super::{define_base_schema, fmt_position, Astrometry, X, X_ERR, Y, Y_ERR};

static SCHEMA: LazyLock<Arc<Schema>> = LazyLock::new(|| {
    let mut schema = Schema::new();
    define_base_schema(&mut schema);
    Arc::new(schema)
});

/// A peak-copy position measurement: the base astrometric fields only.
pub struct NaiveAstrometry {
    store: RecordStore,
}

impl NaiveAstrometry {
    pub fn new(x: f64, x_err: f32, y: f64, y_err: f32) -> Result<Self, SkymeterError> {
        let mut builder = RecordBuilder::new(Arc::clone(&SCHEMA));
        builder.set(X, x)?;
        builder.set(X_ERR, x_err)?;
        builder.set(Y, y)?;
        builder.set(Y_ERR, y_err)?;
        Ok(Self {
            store: builder.freeze()?,
        })
    }

    /// The per-type schema singleton shared by every instance.
    pub fn shared_schema() -> Arc<Schema> {
        Arc::clone(&SCHEMA)
    }
}

impl fmt::Display for NaiveAstrometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_position(f, self.x(), self.x_err(), self.y(), self.y_err())
    }
}

impl Record for NaiveAstrometry {
    fn store(&self) -> &RecordStore {
        &self.store
    }

    fn store_mut(&mut self) -> &mut RecordStore {
        &mut self.store
    }
}

impl Astrometry for NaiveAstrometry {
    fn x(&self) -> f64 {
        self.store.value(X)
    }

    fn x_err(&self) -> f32 {
        self.store.value(X_ERR)
    }

    fn y(&self) -> f64 {
        self.store.value(Y)
    }

    fn y_err(&self) -> f32 {
        self.store.value(Y_ERR)
    }
}

struct NaiveAlgorithm;

impl MeasureAlgorithm<dyn Astrometry, Peak> for NaiveAlgorithm {
    fn measure(&self, peak: &Peak) -> Result<Box<dyn Astrometry>, SkymeterError> {
        // Here is the real work, hiding in a comment
        Ok(Box::new(NaiveAstrometry::new(
            peak.x() as f64,
            0.0,
            peak.y() as f64,
            0.0,
        )?))
    }
}

pub(crate) fn register(registry: &mut AlgorithmRegistry<dyn Astrometry, Peak>) {
    registry.declare("naive", || Box::new(NaiveAlgorithm));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_schema_layout() {
        let n = NaiveAstrometry::new(20.0, 0.0, 100.0, 0.0).unwrap();
        assert_eq!(n.schema().size(), 4);
        let x = n.schema().find("x", "");
        assert_eq!(x.units, "pixel");
        assert_eq!(x.index, 0);
    }

    #[test]
    fn accessors_round_trip() {
        let n = NaiveAstrometry::new(20.0, 0.5, 100.0, 0.25).unwrap();
        assert_eq!(n.x(), 20.0);
        assert_eq!(n.x_err(), 0.5);
        assert_eq!(n.y(), 100.0);
        assert_eq!(n.y_err(), 0.25);
        assert_eq!(n.get("y", "").unwrap(), 100.0);
    }

    #[test]
    fn display_pairs_coordinates_with_errors() {
        let n = NaiveAstrometry::new(20.0, 0.0, 100.0, 0.0).unwrap();
        assert_eq!(n.to_string(), "(20+-0, 100+-0)");
    }
}
