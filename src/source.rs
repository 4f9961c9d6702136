//! A detected source and the measurements made of it.

use std::fmt;

use crate::astrometry::Astrometry;
use crate::measurement::Measurement;
use crate::photometry::Photometry;

/// One detected source: owns the astrometric and photometric composites
/// produced for it.
#[derive(Default)]
pub struct Source {
    astrometry: Measurement<dyn Astrometry>,
    photometry: Measurement<dyn Photometry>,
}

impl Source {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_astrometry(&mut self, astrometry: Measurement<dyn Astrometry>) {
        self.astrometry = astrometry;
    }

    pub fn astrometry(&self) -> &Measurement<dyn Astrometry> {
        &self.astrometry
    }

    pub fn set_photometry(&mut self, photometry: Measurement<dyn Photometry>) {
        self.photometry = photometry;
    }

    pub fn photometry(&self) -> &Measurement<dyn Photometry> {
        &self.photometry
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}\t{}}}", self.astrometry, self.photometry)
    }
}
