//! Eve Energy power metering cluster (0x130AFC01).
//!
//! Eve Energy plugs report their instantaneous and accumulated consumption
//! through this manufacturer-specific cluster. All attributes are `float32`.
//! Writing `wattAccumulatedControlPoint` resets the accumulated energy counter.

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

/// Eve Energy Cluster ID (Eve Systems vendor prefix 0x130A)
pub const CLUSTER_ID: u32 = 0x130A_FC01;

/// Cluster revision
pub const CLUSTER_REVISION: u16 = 1;

/// Attribute IDs for the Eve Energy cluster
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, FromRepr, EnumIter)]
#[repr(u32)]
pub enum EveEnergyAttribute {
    /// Mains voltage in volts
    Voltage = 0x130A_0008,
    /// Current draw in amperes
    Current = 0x130A_0009,
    /// Instantaneous power in watts
    Watt = 0x130A_000A,
    /// Accumulated energy in kWh
    WattAccumulated = 0x130A_000B,
    WattAccumulatedControlPoint = 0x130A_000E,
}

attribute_enum!(EveEnergyAttribute);

attribute_accessor!(
    /// Instantaneous power (`watt`).
    Watt: f32 = (CLUSTER_ID, EveEnergyAttribute::Watt as u32)
);

attribute_accessor!(
    /// Accumulated energy (`wattAccumulated`).
    WattAccumulated: f32 = (CLUSTER_ID, EveEnergyAttribute::WattAccumulated as u32)
);

attribute_accessor!(
    /// Reset point for the accumulated energy (`wattAccumulatedControlPoint`).
    WattAccumulatedControlPoint: f32 = (
        CLUSTER_ID,
        EveEnergyAttribute::WattAccumulatedControlPoint as u32
    )
);

attribute_accessor!(
    /// Mains voltage (`voltage`).
    Voltage: f32 = (CLUSTER_ID, EveEnergyAttribute::Voltage as u32)
);

attribute_accessor!(
    /// Current draw (`current`).
    Current: f32 = (CLUSTER_ID, EveEnergyAttribute::Current as u32)
);

const _: () = {
    assert!(Watt::CLUSTER_ID == CLUSTER_ID);
    assert!(WattAccumulated::CLUSTER_ID == CLUSTER_ID);
    assert!(WattAccumulatedControlPoint::CLUSTER_ID == CLUSTER_ID);
    assert!(Voltage::CLUSTER_ID == CLUSTER_ID);
    assert!(Current::CLUSTER_ID == CLUSTER_ID);
};

/// Field order matches the order the plug's firmware documents them in.
static FIELDS: [FieldSpec; 5] = [
    FieldSpec::of::<Watt>("watt"),
    FieldSpec::of::<WattAccumulated>("wattAccumulated"),
    FieldSpec::of::<WattAccumulatedControlPoint>("wattAccumulatedControlPoint").writable(),
    FieldSpec::of::<Voltage>("voltage"),
    FieldSpec::of::<Current>("current"),
];

pub static DESCRIPTOR: ClusterDescriptor = ClusterDescriptor {
    cluster_id: CLUSTER_ID,
    name: "eve_energy",
    fields: &FIELDS,
};

/// Cluster metadata definition
pub const CLUSTER: Cluster<'static> = Cluster {
    id: CLUSTER_ID,
    revision: CLUSTER_REVISION,
    feature_map: 0,
    attributes: attributes!(
        Attribute::new(EveEnergyAttribute::Watt as _, Access::RV, Quality::NULLABLE),
        Attribute::new(
            EveEnergyAttribute::WattAccumulated as _,
            Access::RV,
            Quality::NULLABLE
        ),
        Attribute::new(
            EveEnergyAttribute::WattAccumulatedControlPoint as _,
            Access::RWVM,
            Quality::NULLABLE
        ),
        Attribute::new(
            EveEnergyAttribute::Voltage as _,
            Access::RV,
            Quality::NULLABLE
        ),
        Attribute::new(
            EveEnergyAttribute::Current as _,
            Access::RV,
            Quality::NULLABLE
        ),
    ),
    commands: &[],
    with_attrs: with!(all),
    with_cmds: with!(all),
};

/// Latest reported state of an Eve Energy plug.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EveEnergy {
    pub watt: Option<f32>,
    pub watt_accumulated: Option<f32>,
    pub watt_accumulated_control_point: Option<f32>,
    pub voltage: Option<f32>,
    pub current: Option<f32>,
}

impl EveEnergy {
    fn slot(&mut self, attr: EveEnergyAttribute) -> &mut Option<f32> {
        match attr {
            EveEnergyAttribute::Watt => &mut self.watt,
            EveEnergyAttribute::WattAccumulated => &mut self.watt_accumulated,
            EveEnergyAttribute::WattAccumulatedControlPoint => {
                &mut self.watt_accumulated_control_point
            }
            EveEnergyAttribute::Voltage => &mut self.voltage,
            EveEnergyAttribute::Current => &mut self.current,
        }
    }
}

impl ClusterValue for EveEnergy {
    const CLUSTER_ID: u32 = CLUSTER_ID;

    fn get(&self, attribute_id: u32) -> Option<WireValue> {
        let value = match EveEnergyAttribute::from_repr(attribute_id)? {
            EveEnergyAttribute::Watt => self.watt,
            EveEnergyAttribute::WattAccumulated => self.watt_accumulated,
            EveEnergyAttribute::WattAccumulatedControlPoint => self.watt_accumulated_control_point,
            EveEnergyAttribute::Voltage => self.voltage,
            EveEnergyAttribute::Current => self.current,
        };

        value.map(WireValue::Float32)
    }

    fn set(&mut self, attribute_id: u32, value: Option<WireValue>) -> Result<()> {
        let attr = EveEnergyAttribute::from_repr(attribute_id).ok_or(
            ClusterError::UnknownAttribute {
                cluster_id: CLUSTER_ID,
                attribute_id,
            },
        )?;

        *self.slot(attr) = value.map(f32::from_wire).transpose()?;

        Ok(())
    }
}

/// Marker type tying the Eve Energy schema together.
pub struct EveEnergyCluster;

impl VendorCluster for EveEnergyCluster {
    const ID: u32 = CLUSTER_ID;
    const NAME: &'static str = "eve_energy";
    const CLUSTER: Cluster<'static> = CLUSTER;

    type Value = EveEnergy;

    fn descriptor() -> &'static ClusterDescriptor {
        &DESCRIPTOR
    }
}
