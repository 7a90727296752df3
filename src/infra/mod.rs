//! Concrete backends for the traits in [`crate::query`].

pub mod arcgis;
