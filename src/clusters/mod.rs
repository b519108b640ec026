//! Vendor-specific Matter cluster definitions.
//!
//! Each cluster declares a [`ClusterDescriptor`] (its ID and ordered field list),
//! a [`ClusterValue`] record holding the latest reported value of every field,
//! and one [`AttributeAccessor`] type per attribute for point reads/writes.
//!
//! The `(cluster_id, attribute_id, wire_type)` triple of a field is derived from
//! its accessor type, so the descriptor and the accessor cannot disagree.

use rs_matter::dm::Attribute;
use serde::Serialize;

use crate::codec;
use crate::error::{ClusterError, Result};

pub mod eve_energy;
pub mod weather_station;

pub use eve_energy::EveEnergyCluster;
pub use weather_station::WeatherStationCluster;

/// Primitive type used to encode a field on the wire.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WireType {
    Float32,
    UInt,
    Int,
    Bool,
}

impl WireType {
    /// The zero value of this wire type.
    pub const fn zero(self) -> WireValue {
        match self {
            WireType::Float32 => WireValue::Float32(0.0),
            WireType::UInt => WireValue::UInt(0),
            WireType::Int => WireValue::Int(0),
            WireType::Bool => WireValue::Bool(false),
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            WireType::Float32 => "float32",
            WireType::UInt => "uint",
            WireType::Int => "int",
            WireType::Bool => "bool",
        }
    }

    /// Parse a textual value (as typed on a command line) into this wire type.
    pub fn parse(self, text: &str) -> Result<WireValue> {
        let text = text.trim();
        let invalid = || ClusterError::InvalidValue(format!("{text:?} is not a valid {self}"));

        match self {
            WireType::Float32 => text.parse().map(WireValue::Float32).map_err(|_| invalid()),
            WireType::UInt => text.parse().map(WireValue::UInt).map_err(|_| invalid()),
            WireType::Int => text.parse().map(WireValue::Int).map_err(|_| invalid()),
            WireType::Bool => text.parse().map(WireValue::Bool).map_err(|_| invalid()),
        }
    }
}

impl core::fmt::Display for WireType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// A decoded scalar, tagged with its wire type.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum WireValue {
    Float32(f32),
    UInt(u64),
    Int(i64),
    Bool(bool),
}

impl WireValue {
    pub const fn wire_type(&self) -> WireType {
        match self {
            WireValue::Float32(_) => WireType::Float32,
            WireValue::UInt(_) => WireType::UInt,
            WireValue::Int(_) => WireType::Int,
            WireValue::Bool(_) => WireType::Bool,
        }
    }

    /// Fail with [`ClusterError::WireTypeMismatch`] unless this value has `expected` type.
    pub fn expect_type(self, expected: WireType) -> Result<Self> {
        if self.wire_type() == expected {
            Ok(self)
        } else {
            Err(ClusterError::WireTypeMismatch {
                expected,
                actual: self.wire_type(),
            })
        }
    }
}

impl core::fmt::Display for WireValue {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            WireValue::Float32(v) => write!(f, "{v}"),
            WireValue::UInt(v) => write!(f, "{v}"),
            WireValue::Int(v) => write!(f, "{v}"),
            WireValue::Bool(v) => write!(f, "{v}"),
        }
    }
}

/// Rust scalar types that map onto a single [`WireType`].
pub trait WireScalar: Copy + Default + PartialEq + core::fmt::Debug {
    const WIRE_TYPE: WireType;

    fn into_wire(self) -> WireValue;

    fn from_wire(value: WireValue) -> Result<Self>;
}

macro_rules! wire_scalar {
    ($t:ty, $variant:ident) => {
        impl WireScalar for $t {
            const WIRE_TYPE: WireType = WireType::$variant;

            fn into_wire(self) -> WireValue {
                WireValue::$variant(self)
            }

            fn from_wire(value: WireValue) -> Result<Self> {
                match value {
                    WireValue::$variant(v) => Ok(v),
                    other => Err(ClusterError::WireTypeMismatch {
                        expected: WireType::$variant,
                        actual: other.wire_type(),
                    }),
                }
            }
        }

        impl From<$t> for WireValue {
            fn from(value: $t) -> Self {
                WireValue::$variant(value)
            }
        }
    };
}

wire_scalar!(f32, Float32);
wire_scalar!(u64, UInt);
wire_scalar!(i64, Int);
wire_scalar!(bool, Bool);

/// One attribute of a vendor cluster.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct FieldSpec {
    /// Field name on the cluster value (and in JSON dumps).
    pub label: &'static str,
    /// Attribute tag, scoped to the owning cluster.
    pub attribute_id: u32,
    pub wire_type: WireType,
    /// Cluster ID as declared by the field's accessor type.
    #[serde(skip)]
    pub cluster_id: u32,
    pub writable: bool,
}

impl FieldSpec {
    /// Read-only field whose triple is taken from accessor `A`.
    pub const fn of<A: AttributeAccessor>(label: &'static str) -> Self {
        Self {
            label,
            attribute_id: A::ATTRIBUTE_ID,
            wire_type: A::WIRE_TYPE,
            cluster_id: A::CLUSTER_ID,
            writable: false,
        }
    }

    pub const fn writable(self) -> Self {
        Self {
            writable: true,
            ..self
        }
    }

    /// The `(cluster_id, attribute_id, wire_type)` join key.
    pub const fn triple(&self) -> (u32, u32, WireType) {
        (self.cluster_id, self.attribute_id, self.wire_type)
    }
}

/// The immutable schema of one vendor cluster.
#[derive(Debug, Serialize)]
pub struct ClusterDescriptor {
    pub cluster_id: u32,
    pub name: &'static str,
    pub fields: &'static [FieldSpec],
}

impl ClusterDescriptor {
    pub fn field(&self, attribute_id: u32) -> Option<&'static FieldSpec> {
        self.fields.iter().find(|f| f.attribute_id == attribute_id)
    }

    pub fn field_by_label(&self, label: &str) -> Option<&'static FieldSpec> {
        self.fields.iter().find(|f| f.label == label)
    }

    /// Check the descriptor for internal consistency.
    ///
    /// Catches accessors that point at another cluster as well as duplicate
    /// attribute IDs or labels.
    pub fn validate(&self) -> Result<()> {
        if !is_manufacturer_cluster_id(self.cluster_id) {
            return Err(ClusterError::StandardClusterId(self.cluster_id));
        }

        if self.fields.is_empty() {
            return Err(ClusterError::EmptyDescriptor(self.cluster_id));
        }

        for (index, field) in self.fields.iter().enumerate() {
            if field.cluster_id != self.cluster_id {
                return Err(ClusterError::FieldClusterMismatch {
                    cluster_id: self.cluster_id,
                    label: field.label,
                    field_cluster_id: field.cluster_id,
                });
            }

            if !is_identifier(field.label) {
                return Err(ClusterError::InvalidLabel(field.label));
            }

            let earlier = &self.fields[..index];

            if earlier.iter().any(|f| f.attribute_id == field.attribute_id) {
                return Err(ClusterError::DuplicateAttributeId {
                    cluster_id: self.cluster_id,
                    attribute_id: field.attribute_id,
                });
            }

            if earlier.iter().any(|f| f.label == field.label) {
                return Err(ClusterError::DuplicateLabel {
                    cluster_id: self.cluster_id,
                    label: field.label,
                });
            }
        }

        Ok(())
    }
}

/// Manufacturer extension identifiers carry the vendor ID in the upper 16 bits
/// and a suffix in `0xFC00..=0xFFFE`. Anything else is either a standard
/// cluster or malformed.
pub const fn is_manufacturer_cluster_id(cluster_id: u32) -> bool {
    let vendor = cluster_id >> 16;
    let suffix = cluster_id & 0xFFFF;

    vendor != 0 && vendor != 0xFFFF && suffix >= 0xFC00 && suffix <= 0xFFFE
}

/// Global attributes (`ClusterRevision`, `FeatureMap`, the attribute lists)
/// live in `0xFFF8..=0xFFFE` without a vendor prefix. Vendor-prefixed IDs such
/// as `0x130A_0008` are regular attributes even though they compare above that
/// range.
pub fn is_global_attribute(attribute_id: u32) -> bool {
    attribute_id >> 16 == 0 && Attribute::is_system_attr(attribute_id)
}

fn is_identifier(label: &str) -> bool {
    let mut chars = label.chars();

    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// A vendor cluster type.
pub trait VendorCluster {
    const ID: u32;

    /// Stable snake_case name used by configuration and the CLI.
    const NAME: &'static str;

    /// Data-model metadata used when serving the cluster on a local endpoint.
    const CLUSTER: rs_matter::dm::Cluster<'static>;

    type Value: ClusterValue;

    fn descriptor() -> &'static ClusterDescriptor;
}

/// The whole-cluster record: one optional slot per field, `None` until reported.
pub trait ClusterValue: Default + core::fmt::Debug {
    const CLUSTER_ID: u32;

    fn get(&self, attribute_id: u32) -> Option<WireValue>;

    /// Store a decoded value (`None` clears the slot).
    fn set(&mut self, attribute_id: u32, value: Option<WireValue>) -> Result<()>;
}

/// Write-request payload extracted from an accessor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AttributeWrite {
    pub cluster_id: u32,
    pub attribute_id: u32,
    pub value: WireValue,
}

impl AttributeWrite {
    /// TLV encoding of `value`, anonymous tag.
    pub fn encode(&self) -> Result<Vec<u8>> {
        codec::encode_value(&self.value, codec::DEFAULT_BUFFER_SIZE)
    }
}

/// Point-wise accessor for a single attribute, independent of [`ClusterValue`].
pub trait AttributeAccessor: Sized {
    type Value: WireScalar;

    const CLUSTER_ID: u32;
    const ATTRIBUTE_ID: u32;
    const WIRE_TYPE: WireType = <Self::Value as WireScalar>::WIRE_TYPE;

    fn new(value: Self::Value) -> Self;

    fn value(&self) -> Self::Value;

    fn from_wire(value: WireValue) -> Result<Self> {
        Self::Value::from_wire(value).map(Self::new)
    }

    fn from_tlv(element: &rs_matter::tlv::TLVElement<'_>) -> Result<Self> {
        let value = WireValue::from_tlv(Self::WIRE_TYPE, element)?;
        Self::from_wire(value)
    }

    fn to_write(&self) -> AttributeWrite {
        AttributeWrite {
            cluster_id: Self::CLUSTER_ID,
            attribute_id: Self::ATTRIBUTE_ID,
            value: self.value().into_wire(),
        }
    }

    fn encode(&self) -> Result<Vec<u8>> {
        self.to_write().encode()
    }
}

/// Declare a single-attribute accessor struct holding a `value` that defaults
/// to the zero value of its wire type.
macro_rules! attribute_accessor {
    ($(#[$meta:meta])* $name:ident: $t:ty = ($cluster:expr, $attr:expr)) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize)]
        pub struct $name {
            pub value: $t,
        }

        impl $crate::clusters::AttributeAccessor for $name {
            type Value = $t;

            const CLUSTER_ID: u32 = $cluster;
            const ATTRIBUTE_ID: u32 = $attr;

            fn new(value: $t) -> Self {
                Self { value }
            }

            fn value(&self) -> $t {
                self.value
            }
        }
    };
}

pub(crate) use attribute_accessor;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manufacturer_cluster_ids() {
        assert!(is_manufacturer_cluster_id(0x130A_FC01));
        assert!(is_manufacturer_cluster_id(0xFFF1_FEDC));
        // standard On/Off
        assert!(!is_manufacturer_cluster_id(0x0006));
        assert!(!is_manufacturer_cluster_id(0x130A_0006));
        assert!(!is_manufacturer_cluster_id(0xFFFF_FC01));
        assert!(!is_manufacturer_cluster_id(0x130A_FFFF));
    }

    #[test]
    fn test_global_attributes() {
        assert!(is_global_attribute(0xFFFD));
        assert!(is_global_attribute(0xFFFC));
        assert!(is_global_attribute(0xFFF8));
        assert!(!is_global_attribute(0x0002));
        assert!(!is_global_attribute(0x130A_0008));
        assert!(!is_global_attribute(0x130A_000E));
        assert!(!is_global_attribute(0x130A_FFFD));
    }

    #[test]
    fn test_identifier_labels() {
        assert!(is_identifier("watt"));
        assert!(is_identifier("wattAccumulatedControlPoint"));
        assert!(is_identifier("_x1"));
        assert!(!is_identifier(""));
        assert!(!is_identifier("1watt"));
        assert!(!is_identifier("watt accumulated"));
    }

    #[test]
    fn test_wire_scalar_mismatch() {
        assert_eq!(f32::from_wire(WireValue::Float32(1.5)).unwrap(), 1.5);
        assert!(matches!(
            f32::from_wire(WireValue::UInt(1)),
            Err(ClusterError::WireTypeMismatch {
                expected: WireType::Float32,
                actual: WireType::UInt
            })
        ));
    }

    #[test]
    fn test_parse_wire_values() {
        assert_eq!(WireType::Float32.parse("230").unwrap(), WireValue::Float32(230.0));
        assert_eq!(WireType::UInt.parse(" 7 ").unwrap(), WireValue::UInt(7));
        assert_eq!(WireType::Bool.parse("true").unwrap(), WireValue::Bool(true));
        assert!(WireType::UInt.parse("-1").is_err());
        assert!(WireType::Float32.parse("abc").is_err());
    }

    #[test]
    fn test_zero_values() {
        assert_eq!(WireType::Float32.zero(), WireValue::Float32(0.0));
        assert_eq!(WireType::Bool.zero().wire_type(), WireType::Bool);
    }

    static BROKEN_FIELDS: [FieldSpec; 2] = [
        FieldSpec {
            label: "a",
            attribute_id: 1,
            wire_type: WireType::Float32,
            cluster_id: 0x130A_FC01,
            writable: false,
        },
        FieldSpec {
            label: "b",
            attribute_id: 1,
            wire_type: WireType::UInt,
            cluster_id: 0x130A_FC01,
            writable: false,
        },
    ];

    #[test]
    fn test_validate_duplicate_attribute() {
        let descriptor = ClusterDescriptor {
            cluster_id: 0x130A_FC01,
            name: "broken",
            fields: &BROKEN_FIELDS,
        };

        assert!(matches!(
            descriptor.validate(),
            Err(ClusterError::DuplicateAttributeId {
                attribute_id: 1,
                ..
            })
        ));
    }

    #[test]
    fn test_validate_foreign_field() {
        let descriptor = ClusterDescriptor {
            cluster_id: 0xFFF1_FEDC,
            name: "broken",
            fields: &BROKEN_FIELDS[..1],
        };

        assert!(matches!(
            descriptor.validate(),
            Err(ClusterError::FieldClusterMismatch { label: "a", .. })
        ));
    }

    #[test]
    fn test_validate_standard_cluster() {
        let descriptor = ClusterDescriptor {
            cluster_id: 0x0006,
            name: "on_off",
            fields: &[],
        };

        assert!(matches!(
            descriptor.validate(),
            Err(ClusterError::StandardClusterId(0x0006))
        ));
    }
}
