//! Explicit registry of vendor cluster descriptors.
//!
//! The registry maps a cluster ID to its [`ClusterDescriptor`] and resolves
//! `(cluster_id, attribute_id)` pairs to the [`FieldSpec`] that carries the wire
//! type. Registration validates each descriptor and refuses ID or name
//! collisions instead of overwriting an earlier entry.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use log::debug;

use crate::clusters::{
    ClusterDescriptor, EveEnergyCluster, FieldSpec, VendorCluster, WeatherStationCluster,
};
use crate::config::Config;
use crate::error::{ClusterError, Result};

/// Descriptors compiled into this crate, in registration order.
pub fn builtin_descriptors() -> [&'static ClusterDescriptor; 2] {
    [
        EveEnergyCluster::descriptor(),
        WeatherStationCluster::descriptor(),
    ]
}

static BUILTIN: LazyLock<ClusterRegistry> = LazyLock::new(|| {
    ClusterRegistry::with_builtin()
        .unwrap_or_else(|e| panic!("Built-in vendor cluster descriptors are inconsistent: {e}"))
});

/// Process-wide registry holding every built-in cluster.
///
/// Built on first use and never mutated afterwards, so it can be shared
/// across threads without locking.
pub fn builtin() -> &'static ClusterRegistry {
    &BUILTIN
}

#[derive(Debug, Default)]
pub struct ClusterRegistry {
    clusters: BTreeMap<u32, &'static ClusterDescriptor>,
}

impl ClusterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with all built-in clusters.
    pub fn with_builtin() -> Result<Self> {
        let mut registry = Self::new();
        for descriptor in builtin_descriptors() {
            registry.register(descriptor)?;
        }

        Ok(registry)
    }

    /// Registry with the built-in clusters named in `config.enabled_clusters`.
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut registry = Self::new();

        for name in &config.enabled_clusters {
            let descriptor = builtin_descriptors()
                .into_iter()
                .find(|d| d.name == name.as_str())
                .ok_or_else(|| ClusterError::UnknownClusterName(name.clone()))?;

            registry.register(descriptor)?;
        }

        Ok(registry)
    }

    pub fn register_cluster<C: VendorCluster>(&mut self) -> Result<()> {
        self.register(C::descriptor())
    }

    pub fn register(&mut self, descriptor: &'static ClusterDescriptor) -> Result<()> {
        descriptor.validate()?;

        if self.clusters.contains_key(&descriptor.cluster_id) {
            return Err(ClusterError::DuplicateClusterId(descriptor.cluster_id));
        }

        if self.descriptor_by_name(descriptor.name).is_some() {
            return Err(ClusterError::DuplicateClusterName(descriptor.name));
        }

        debug!(
            "Registered vendor cluster {} (0x{:08X}) with {} attributes",
            descriptor.name,
            descriptor.cluster_id,
            descriptor.fields.len()
        );

        self.clusters.insert(descriptor.cluster_id, descriptor);

        Ok(())
    }

    pub fn descriptor(&self, cluster_id: u32) -> Option<&'static ClusterDescriptor> {
        self.clusters.get(&cluster_id).copied()
    }

    pub fn descriptor_by_name(&self, name: &str) -> Option<&'static ClusterDescriptor> {
        self.clusters.values().copied().find(|d| d.name == name)
    }

    pub fn contains(&self, cluster_id: u32) -> bool {
        self.clusters.contains_key(&cluster_id)
    }

    /// Resolve an attribute path to its field.
    pub fn resolve(&self, cluster_id: u32, attribute_id: u32) -> Result<&'static FieldSpec> {
        let descriptor = self
            .descriptor(cluster_id)
            .ok_or(ClusterError::UnknownCluster(cluster_id))?;

        descriptor
            .field(attribute_id)
            .ok_or(ClusterError::UnknownAttribute {
                cluster_id,
                attribute_id,
            })
    }

    /// Registered descriptors in ascending cluster ID order.
    pub fn iter(&self) -> impl Iterator<Item = &'static ClusterDescriptor> + '_ {
        self.clusters.values().copied()
    }

    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }
}
