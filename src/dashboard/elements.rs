//! Dashboard elements and their SVG ids.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::Error;

macro_rules! elements {
    ($($variant:ident => $name:literal, $svg:literal;)+) => {
        /// A dynamic element of the dashboard drawing.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[non_exhaustive]
        pub enum ElementId {
            $(
                #[doc = concat!("`", $name, "`")]
                $variant,
            )+
        }

        impl ElementId {
            /// Every element, in drawing order.
            pub const ALL: &'static [ElementId] = &[$(ElementId::$variant),+];

            /// Logical name, e.g. `zone_1_humidity`.
            pub fn name(self) -> &'static str {
                match self {
                    $(ElementId::$variant => $name,)+
                }
            }

            /// Id of the element inside the SVG document.
            pub fn svg_id(self) -> &'static str {
                match self {
                    $(ElementId::$variant => $svg,)+
                }
            }
        }

        impl FromStr for ElementId {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($name => Ok(ElementId::$variant),)+
                    other => Err(Error::UnknownElement(other.to_string())),
                }
            }
        }
    };
}

elements! {
    OutsideTemperature => "outside_temperature", "tspan2407-0-1";
    HeatpumpBlades => "heatpump_blades", "g949";
    HeatpumpDelivery => "heatpump_delivery", "g9960";
    HeatpumpReturn => "heatpump_return", "g9964";

    WaterHeaterCurTemperature => "water_heater_cur_temperature", "tspan2407";
    WaterHeaterTarTemperature => "water_heater_tar_temperature", "tspan2407-0";
    WaterHeaterDelivery => "water_heater_delivery", "g9984";
    WaterHeaterReturn => "water_heater_return", "g9988";
    WaterHeaterHot => "water_heater_hot", "g11642-0";

    Zone1 => "zone_1", "g9595";
    Zone1Humidity => "zone_1_humidity", "tspan2407-7-0";
    Zone1CurTemperature => "zone_1_cur_temperature", "tspan2407-7-7";
    Zone1TarTemperature => "zone_1_tar_temperature", "tspan2407-7";
    Zone1Delivery => "zone_1_delivery", "g9968";
    Zone1Return => "zone_1_return", "g9972";
    Zone1LowBattery => "zone_1_low_battery", "g30748";
    Zone1Cold => "zone_1_cold", "g9598";
    Zone1Hot => "zone_1_hot", "g6363-5-3-4";

    Zone2 => "zone_2", "g9559";
    Zone2Humidity => "zone_2_humidity", "tspan2407-7-0-1";
    Zone2CurTemperature => "zone_2_cur_temperature", "tspan2407-7-7-6";
    Zone2TarTemperature => "zone_2_tar_temperature", "tspan2407-7-8";
    Zone2Delivery => "zone_2_delivery", "g9980";
    Zone2Return => "zone_2_return", "g9976";
    Zone2LowBattery => "zone_2_low_battery", "g30748-2";
    Zone2Cold => "zone_2_cold", "g9531";
    Zone2Hot => "zone_2_hot", "g6363-5-3-4-4";

    Zone => "zone", "g1479";
    ZoneHumidity => "zone_humidity", "tspan1459";
    ZoneCurTemperature => "zone_cur_temperature", "tspan1453";
    ZoneTarTemperature => "zone_tar_temperature", "tspan1447";
    ZoneDelivery => "zone_delivery", "g1653";
    ZoneReturn => "zone_return", "g1647";
    ZoneLowBattery => "zone_low_battery", "g1443";
    ZoneCold => "zone_cold", "g1477";
    ZoneHot => "zone_hot", "g1473";

    OnlineStatus => "online_status", "g3185";
    ErrorStatus => "error_status", "g9849";
}

impl ElementId {
    /// Class added when the element is made active.
    pub fn active_class(self) -> &'static str {
        if self.name().contains("cold") {
            "active-blue"
        } else {
            "active-orange"
        }
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for ElementId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// Colour of a pipe; [`PipeColor::Clear`] removes any colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PipeColor {
    Hot,
    Cold,
    Return,
    Clear,
}

impl PipeColor {
    /// Class prefix applied to the pipe's lines and arrow heads (`hot-line`, `hot-head`).
    pub fn class_prefix(self) -> Option<&'static str> {
        match self {
            PipeColor::Hot => Some("hot"),
            PipeColor::Cold => Some("cold"),
            PipeColor::Return => Some("return"),
            PipeColor::Clear => None,
        }
    }
}

impl FromStr for PipeColor {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hot" => Ok(PipeColor::Hot),
            "cold" => Ok(PipeColor::Cold),
            "return" => Ok(PipeColor::Return),
            "" => Ok(PipeColor::Clear),
            other => Err(Error::InvalidColor(other.to_string())),
        }
    }
}

/// A heating zone of the installation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Zone {
    /// The only zone of a single-zone installation.
    Single,
    /// First zone of a dual-zone installation.
    First,
    /// Second zone of a dual-zone installation.
    Second,
}

/// The elements belonging to one [`Zone`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoneElements {
    pub group: ElementId,
    pub humidity: ElementId,
    pub cur_temperature: ElementId,
    pub tar_temperature: ElementId,
    pub delivery: ElementId,
    pub return_pipe: ElementId,
    pub low_battery: ElementId,
    pub cold: ElementId,
    pub hot: ElementId,
}

impl Zone {
    /// Key of the thermostat reporting for this zone.
    pub fn thermostat_key(self) -> &'static str {
        match self {
            Zone::Single | Zone::First => "thermostat_1",
            Zone::Second => "thermostat_2",
        }
    }

    /// The dashboard elements drawn for this zone.
    pub fn elements(self) -> ZoneElements {
        use ElementId as E;
        match self {
            Zone::Single => ZoneElements {
                group: E::Zone,
                humidity: E::ZoneHumidity,
                cur_temperature: E::ZoneCurTemperature,
                tar_temperature: E::ZoneTarTemperature,
                delivery: E::ZoneDelivery,
                return_pipe: E::ZoneReturn,
                low_battery: E::ZoneLowBattery,
                cold: E::ZoneCold,
                hot: E::ZoneHot,
            },
            Zone::First => ZoneElements {
                group: E::Zone1,
                humidity: E::Zone1Humidity,
                cur_temperature: E::Zone1CurTemperature,
                tar_temperature: E::Zone1TarTemperature,
                delivery: E::Zone1Delivery,
                return_pipe: E::Zone1Return,
                low_battery: E::Zone1LowBattery,
                cold: E::Zone1Cold,
                hot: E::Zone1Hot,
            },
            Zone::Second => ZoneElements {
                group: E::Zone2,
                humidity: E::Zone2Humidity,
                cur_temperature: E::Zone2CurTemperature,
                tar_temperature: E::Zone2TarTemperature,
                delivery: E::Zone2Delivery,
                return_pipe: E::Zone2Return,
                low_battery: E::Zone2LowBattery,
                cold: E::Zone2Cold,
                hot: E::Zone2Hot,
            },
        }
    }
}
