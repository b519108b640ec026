//! Routing of attribute reports into vendor cluster values.
//!
//! The interaction model hands over one `AttrData` per reported attribute.
//! [`ReportDecoder`] resolves the path against a [`ClusterRegistry`], decodes the
//! TLV payload with the field's wire type and stores it in the matching slot of
//! a [`ClusterValue`].

use log::{debug, trace, warn};
use rs_matter::im::AttrData;
use rs_matter::tlv::{FromTLV, TLVElement};
use serde::Serialize;

use crate::clusters::{ClusterValue, VendorCluster, WireValue, is_global_attribute};
use crate::codec::decode_nullable;
use crate::error::{ClusterError, Result};
use crate::registry::{self, ClusterRegistry};

/// A single reported attribute: its path and the undecoded TLV payload.
#[derive(Clone, Debug)]
pub struct AttributeReport<'a> {
    pub endpoint: Option<u16>,
    pub cluster_id: u32,
    pub attribute_id: u32,
    pub data: TLVElement<'a>,
}

impl<'a> AttributeReport<'a> {
    pub const fn new(
        endpoint: Option<u16>,
        cluster_id: u32,
        attribute_id: u32,
        data: TLVElement<'a>,
    ) -> Self {
        Self {
            endpoint,
            cluster_id,
            attribute_id,
            data,
        }
    }

    /// Parse an encoded `AttributeDataIB` structure.
    pub fn from_tlv(element: &TLVElement<'a>) -> Result<Self> {
        let data = AttrData::from_tlv(element)?;
        Self::try_from(&data)
    }
}

impl<'a> TryFrom<&AttrData<'a>> for AttributeReport<'a> {
    type Error = ClusterError;

    fn try_from(data: &AttrData<'a>) -> Result<Self> {
        let cluster_id = data
            .path
            .cluster
            .ok_or(ClusterError::IncompletePath("cluster"))?;
        let attribute_id = data
            .path
            .attr
            .ok_or(ClusterError::IncompletePath("attribute"))?;

        Ok(Self::new(
            data.path.endpoint,
            cluster_id,
            attribute_id,
            data.data.clone(),
        ))
    }
}

/// A report resolved against the registry.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DecodedAttribute {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<u16>,
    pub cluster_id: u32,
    pub attribute_id: u32,
    pub label: &'static str,
    /// `None` when the device reported null (value not yet known).
    pub value: Option<WireValue>,
}

pub struct ReportDecoder<'r> {
    registry: &'r ClusterRegistry,
}

impl ReportDecoder<'static> {
    /// Decoder over the process-wide built-in registry.
    pub fn builtin() -> Self {
        Self::new(registry::builtin())
    }
}

impl<'r> ReportDecoder<'r> {
    pub const fn new(registry: &'r ClusterRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &'r ClusterRegistry {
        self.registry
    }

    pub fn decode(&self, report: &AttributeReport<'_>) -> Result<DecodedAttribute> {
        let field = self
            .registry
            .resolve(report.cluster_id, report.attribute_id)?;
        let value = decode_nullable(field.wire_type, &report.data)?;

        trace!(
            "Decoded 0x{:08X}/0x{:08X} ({}) = {:?}",
            report.cluster_id, report.attribute_id, field.label, value
        );

        Ok(DecodedAttribute {
            endpoint: report.endpoint,
            cluster_id: report.cluster_id,
            attribute_id: report.attribute_id,
            label: field.label,
            value,
        })
    }

    /// Decode `report` into the matching slot of `value`.
    pub fn apply<V: ClusterValue>(&self, value: &mut V, report: &AttributeReport<'_>) -> Result<()> {
        if report.cluster_id != V::CLUSTER_ID {
            return Err(ClusterError::ClusterMismatch {
                expected: V::CLUSTER_ID,
                actual: report.cluster_id,
            });
        }

        let decoded = self.decode(report)?;
        value.set(decoded.attribute_id, decoded.value)
    }

    /// Assemble a fresh cluster value from a batch of reports, as delivered by a
    /// subscription.
    ///
    /// Reports for other clusters and global attributes are skipped. Attributes
    /// the descriptor does not know are logged and skipped; a payload that does
    /// not match its declared wire type fails the whole batch.
    pub fn assemble<'a, C: VendorCluster>(
        &self,
        reports: impl IntoIterator<Item = AttributeReport<'a>>,
    ) -> Result<C::Value> {
        if !self.registry.contains(C::ID) {
            return Err(ClusterError::UnknownCluster(C::ID));
        }

        let mut value = C::Value::default();

        for report in reports {
            if report.cluster_id != C::ID {
                debug!(
                    "Skipping report for cluster 0x{:08X} while assembling {}",
                    report.cluster_id,
                    C::NAME
                );
                continue;
            }

            if is_global_attribute(report.attribute_id) {
                trace!("Skipping global attribute 0x{:08X}", report.attribute_id);
                continue;
            }

            match self.decode(&report) {
                Ok(decoded) => value.set(decoded.attribute_id, decoded.value)?,
                Err(ClusterError::UnknownAttribute {
                    cluster_id,
                    attribute_id,
                }) => {
                    warn!(
                        "Ignoring unknown attribute 0x{:08X} reported for cluster 0x{:08X}",
                        attribute_id, cluster_id
                    );
                }
                Err(e) => return Err(e),
            }
        }

        Ok(value)
    }
}
