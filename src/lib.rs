//! Matter vendor cluster definitions.
//!
//! This library describes manufacturer-specific Matter clusters (Eve Energy
//! and a weather station) so that attribute reports can be decoded into typed
//! values and writes encoded with the right wire type.

pub mod clusters;
pub mod codec;
pub mod config;
pub mod error;
pub mod matter;
pub mod registry;
pub mod report;

pub use clusters::{
    AttributeAccessor, ClusterDescriptor, ClusterValue, EveEnergyCluster, FieldSpec,
    VendorCluster, WeatherStationCluster, WireType, WireValue,
};
pub use error::{ClusterError, Result};
pub use registry::ClusterRegistry;
pub use report::{AttributeReport, DecodedAttribute, ReportDecoder};
