//! Crate error type.

use thiserror::Error as ThisError;

use crate::clusters::WireType;

#[derive(ThisError, Debug)]
pub enum ClusterError {
    #[error("Cluster 0x{0:08X} is not a manufacturer-specific cluster ID")]
    StandardClusterId(u32),

    #[error("Cluster 0x{0:08X} declares no attributes")]
    EmptyDescriptor(u32),

    #[error("Cluster 0x{0:08X} is already registered")]
    DuplicateClusterId(u32),

    #[error("A cluster named {0:?} is already registered")]
    DuplicateClusterName(&'static str),

    #[error("Cluster 0x{cluster_id:08X} declares attribute 0x{attribute_id:08X} more than once")]
    DuplicateAttributeId { cluster_id: u32, attribute_id: u32 },

    #[error("Cluster 0x{cluster_id:08X} declares label {label:?} more than once")]
    DuplicateLabel {
        cluster_id: u32,
        label: &'static str,
    },

    #[error("Label {0:?} is not a valid identifier")]
    InvalidLabel(&'static str),

    #[error(
        "Field {label:?} of cluster 0x{cluster_id:08X} belongs to cluster 0x{field_cluster_id:08X}"
    )]
    FieldClusterMismatch {
        cluster_id: u32,
        label: &'static str,
        field_cluster_id: u32,
    },

    #[error("Unknown cluster 0x{0:08X}")]
    UnknownCluster(u32),

    #[error("Unknown cluster name: {0}")]
    UnknownClusterName(String),

    #[error("Unknown attribute 0x{attribute_id:08X} in cluster 0x{cluster_id:08X}")]
    UnknownAttribute { cluster_id: u32, attribute_id: u32 },

    #[error("Report for cluster 0x{actual:08X} applied to a cluster 0x{expected:08X} value")]
    ClusterMismatch { expected: u32, actual: u32 },

    #[error("Wire type mismatch: expected {expected}, got {actual}")]
    WireTypeMismatch { expected: WireType, actual: WireType },

    #[error("Attribute path is missing its {0}")]
    IncompletePath(&'static str),

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("TLV codec error: {0}")]
    Tlv(rs_matter::error::Error),

    #[error(transparent)]
    IoError(#[from] std::io::Error),

    #[error(transparent)]
    SerdeJsonError(#[from] serde_json::Error),
}

impl From<rs_matter::error::Error> for ClusterError {
    fn from(e: rs_matter::error::Error) -> Self {
        Self::Tlv(e)
    }
}

impl From<rs_matter::error::ErrorCode> for ClusterError {
    fn from(code: rs_matter::error::ErrorCode) -> Self {
        Self::Tlv(code.into())
    }
}

pub type Result<T> = std::result::Result<T, ClusterError>;
