//! Weather station cluster (0xFFF1FEDC).
//!
//! Served by DIY weather stations under the test vendor prefix 0xFFF1.
//! Attribute IDs are plain `0x0000..=0x0002` rather than vendor-prefixed.

use rs_matter::attribute_enum;
use rs_matter::dm::{Access, Attribute, Cluster, Quality};
use rs_matter::{attributes, with};
use serde::Serialize;
use strum::{EnumIter, FromRepr};

use super::{
    AttributeAccessor, ClusterDescriptor, ClusterValue, FieldSpec, VendorCluster, WireScalar,
    WireValue, attribute_accessor,
};
use crate::error::{ClusterError, Result};

/// Weather station Cluster ID
pub const CLUSTER_ID: u32 = 0xFFF1_FEDC;

/// Cluster revision
pub const CLUSTER_REVISION: u16 = 1;

/// Attribute IDs for the weather station cluster
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, FromRepr, EnumIter)]
#[repr(u32)]
pub enum WeatherStationAttribute {
    WindSpeed = 0x0000,
    WindDirection = 0x0001,
    Rainfall = 0x0002,
}

attribute_enum!(WeatherStationAttribute);

attribute_accessor!(
    /// Wind speed (`windspeed`).
    WindSpeed: f32 = (CLUSTER_ID, WeatherStationAttribute::WindSpeed as u32)
);

attribute_accessor!(
    /// Wind direction in degrees (`winddirection`).
    WindDirection: f32 = (CLUSTER_ID, WeatherStationAttribute::WindDirection as u32)
);

attribute_accessor!(
    /// Rainfall (`rainfall`).
    Rainfall: f32 = (CLUSTER_ID, WeatherStationAttribute::Rainfall as u32)
);

const _: () = {
    assert!(WindSpeed::CLUSTER_ID == CLUSTER_ID);
    assert!(WindDirection::CLUSTER_ID == CLUSTER_ID);
    assert!(Rainfall::CLUSTER_ID == CLUSTER_ID);
};

static FIELDS: [FieldSpec; 3] = [
    FieldSpec::of::<WindSpeed>("windspeed"),
    FieldSpec::of::<WindDirection>("winddirection"),
    FieldSpec::of::<Rainfall>("rainfall"),
];

pub static DESCRIPTOR: ClusterDescriptor = ClusterDescriptor {
    cluster_id: CLUSTER_ID,
    name: "weather_station",
    fields: &FIELDS,
};

/// Cluster metadata definition
pub const CLUSTER: Cluster<'static> = Cluster {
    id: CLUSTER_ID,
    revision: CLUSTER_REVISION,
    feature_map: 0,
    attributes: attributes!(
        Attribute::new(
            WeatherStationAttribute::WindSpeed as _,
            Access::RV,
            Quality::NULLABLE
        ),
        Attribute::new(
            WeatherStationAttribute::WindDirection as _,
            Access::RV,
            Quality::NULLABLE
        ),
        Attribute::new(
            WeatherStationAttribute::Rainfall as _,
            Access::RV,
            Quality::NULLABLE
        ),
    ),
    commands: &[],
    with_attrs: with!(all),
    with_cmds: with!(all),
};

/// Latest reported state of a weather station.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct WeatherStation {
    pub windspeed: Option<f32>,
    pub winddirection: Option<f32>,
    pub rainfall: Option<f32>,
}

impl ClusterValue for WeatherStation {
    const CLUSTER_ID: u32 = CLUSTER_ID;

    fn get(&self, attribute_id: u32) -> Option<WireValue> {
        let value = match WeatherStationAttribute::from_repr(attribute_id)? {
            WeatherStationAttribute::WindSpeed => self.windspeed,
            WeatherStationAttribute::WindDirection => self.winddirection,
            WeatherStationAttribute::Rainfall => self.rainfall,
        };

        value.map(WireValue::Float32)
    }

    fn set(&mut self, attribute_id: u32, value: Option<WireValue>) -> Result<()> {
        let attr = WeatherStationAttribute::from_repr(attribute_id).ok_or(
            ClusterError::UnknownAttribute {
                cluster_id: CLUSTER_ID,
                attribute_id,
            },
        )?;
        let value = value.map(f32::from_wire).transpose()?;

        match attr {
            WeatherStationAttribute::WindSpeed => self.windspeed = value,
            WeatherStationAttribute::WindDirection => self.winddirection = value,
            WeatherStationAttribute::Rainfall => self.rainfall = value,
        }

        Ok(())
    }
}

pub struct WeatherStationCluster;

impl VendorCluster for WeatherStationCluster {
    const ID: u32 = CLUSTER_ID;
    const NAME: &'static str = "weather_station";
    const CLUSTER: Cluster<'static> = CLUSTER;

    type Value = WeatherStation;

    fn descriptor() -> &'static ClusterDescriptor {
        &DESCRIPTOR
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clusters::WireType;
    use strum::IntoEnumIterator;

    #[test]
    fn test_descriptor_is_valid() {
        DESCRIPTOR.validate().unwrap();
        assert_eq!(WeatherStationCluster::descriptor().cluster_id, 0xFFF1_FEDC);
        assert_eq!(DESCRIPTOR.fields.len(), 3);
    }

    #[test]
    fn test_descriptor_matches_accessors() {
        let accessors = [
            (WindSpeed::CLUSTER_ID, WindSpeed::ATTRIBUTE_ID, WindSpeed::WIRE_TYPE),
            (
                WindDirection::CLUSTER_ID,
                WindDirection::ATTRIBUTE_ID,
                WindDirection::WIRE_TYPE,
            ),
            (Rainfall::CLUSTER_ID, Rainfall::ATTRIBUTE_ID, Rainfall::WIRE_TYPE),
        ];

        for (field, accessor) in DESCRIPTOR.fields.iter().zip(accessors) {
            assert_eq!(field.triple(), accessor, "field {}", field.label);
        }

        assert_eq!(
            DESCRIPTOR.field_by_label("rainfall").map(|f| f.attribute_id),
            Some(0x0002)
        );
    }

    #[test]
    fn test_every_attribute_has_a_field() {
        for attr in WeatherStationAttribute::iter() {
            let field = DESCRIPTOR.field(attr as u32).unwrap();
            assert_eq!(field.wire_type, WireType::Float32);
            assert!(!field.writable);
        }
    }

    #[test]
    fn test_value_starts_absent() {
        let value = WeatherStation::default();
        assert_eq!(value.windspeed, None);
        assert_eq!(value.winddirection, None);
        assert_eq!(value.rainfall, None);
    }

    #[test]
    fn test_zero_windspeed_is_reported() {
        let mut value = WeatherStation::default();
        value
            .set(WindSpeed::ATTRIBUTE_ID, Some(WireValue::Float32(0.0)))
            .unwrap();

        assert_eq!(value.windspeed, Some(0.0));
        assert_eq!(value.get(WindSpeed::ATTRIBUTE_ID), Some(WireValue::Float32(0.0)));
        assert_eq!(value.get(Rainfall::ATTRIBUTE_ID), None);
    }

    #[test]
    fn test_accessor_tlv_roundtrip() {
        let encoded = WindSpeed::new(0.0).encode().unwrap();
        let decoded = WindSpeed::from_tlv(&rs_matter::tlv::TLVElement::new(&encoded)).unwrap();
        assert_eq!(decoded.value.to_bits(), 0.0f32.to_bits());
    }

    #[test]
    fn test_set_rejects_foreign_attribute() {
        let mut value = WeatherStation::default();
        assert!(matches!(
            value.set(0x130A_0008, Some(WireValue::Float32(230.0))),
            Err(ClusterError::UnknownAttribute { .. })
        ));
    }
}
