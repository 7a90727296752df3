//! ArcGIS REST `FeatureServer` layers.

mod client;

pub use client::{ArcGisLayer, parse_query_response};
