//! Status snapshot passed to the dashboard in its `data` URL parameter.

use serde_json::{Map, Value};

use crate::stream::format::integral_floats_as_ints;
use crate::{Error, Result};

/// URL parameter carrying the JSON snapshot.
pub const DATA_PARAM: &str = "data";

/// Placeholder shown for a missing reading.
pub const MISSING: &str = "--";

/// `data` value sent when the upstream query returned nothing.
const EMPTY_PANEL_DATA: &str = r#"{"":{}}"#;

/// Operating state of the heat pump (`heat_pump.pump_active_state`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PumpActiveState {
    Unspecified,
    Idle,
    Heating,
    Cooling,
    Dhw,
    AntiLegionella,
    Defrosting,
    Other(String),
}

impl PumpActiveState {
    fn parse(raw: &str) -> Self {
        match raw {
            "PUMP_ACTIVE_STATE_UNSPECIFIED" => Self::Unspecified,
            "PUMP_ACTIVE_STATE_IDLE" => Self::Idle,
            "PUMP_ACTIVE_STATE_HEATING" => Self::Heating,
            "PUMP_ACTIVE_STATE_COOLING" => Self::Cooling,
            "PUMP_ACTIVE_STATE_DHW" => Self::Dhw,
            "PUMP_ACTIVE_STATE_ANTI_LEGIONELLA" => Self::AntiLegionella,
            "PUMP_ACTIVE_STATE_DEFROSTING" => Self::Defrosting,
            other => Self::Other(other.to_string()),
        }
    }
}

/// Pump mode of a thermostat zone (`current_pump_mode_state`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PumpModeState {
    Unspecified,
    Idle,
    Heating,
    Cooling,
    Other(String),
}

impl PumpModeState {
    fn parse(raw: &str) -> Self {
        match raw {
            "PUMP_MODE_STATE_UNSPECIFIED" => Self::Unspecified,
            "PUMP_MODE_STATE_IDLE" => Self::Idle,
            "PUMP_MODE_STATE_HEATING" => Self::Heating,
            "PUMP_MODE_STATE_COOLING" => Self::Cooling,
            other => Self::Other(other.to_string()),
        }
    }
}

/// Readings of one thermostat.
#[derive(Debug, Clone, Copy)]
pub struct Thermostat<'a> {
    fields: Option<&'a Map<String, Value>>,
}

impl<'a> Thermostat<'a> {
    fn get(&self, key: &str) -> Option<&'a Value> {
        self.fields.and_then(|fields| fields.get(key))
    }

    /// Relative humidity, or `--`.
    pub fn humidity(&self) -> String {
        display_value(self.get("humidity"))
    }

    /// Measured temperature, or `--`.
    pub fn actual_temperature(&self) -> String {
        display_value(self.get("actual_temperature"))
    }

    /// Pump mode; `None` when not reported.
    pub fn pump_mode(&self) -> Option<PumpModeState> {
        self.get("current_pump_mode_state")
            .and_then(Value::as_str)
            .map(PumpModeState::parse)
    }

    /// Whether the battery warning is raised.
    pub fn low_battery(&self) -> bool {
        is_true(self.get("warning_low_battery_level"))
    }
}

/// A heat-pump status snapshot.
///
/// Accessors are lenient: missing sections and fields read as missing values.
///
/// # Example
///
/// ```
/// use heatpump_console::dashboard::{HeatpumpStatus, PumpActiveState};
///
/// let status = HeatpumpStatus::from_json(r#"{
///     "heat_pump": {"pump_active_state": "PUMP_ACTIVE_STATE_HEATING", "current_outdoor_temperature": 7.5},
///     "thermostat_1": {"humidity": 45}
/// }"#).unwrap().unwrap();
///
/// assert_eq!(status.pump_active_state(), Some(PumpActiveState::Heating));
/// assert_eq!(status.outdoor_temperature(), "7.5");
/// assert_eq!(status.water_heater_current_temperature(), "--");
/// assert!(!status.is_dual_zone());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct HeatpumpStatus {
    data: Map<String, Value>,
}

impl HeatpumpStatus {
    /// Read the snapshot from a URL query string (with or without the leading `?`).
    ///
    /// A missing `data` parameter reads as `{}`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::JsonParse`] if `data` is not valid JSON.
    pub fn from_query(query: &str) -> Result<Option<Self>> {
        let query = query.strip_prefix('?').unwrap_or(query);
        let data = url::form_urlencoded::parse(query.as_bytes())
            .find(|(key, _)| key == DATA_PARAM)
            .map(|(_, value)| value.into_owned())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| "{}".to_string());
        Self::from_json(&data)
    }

    /// Read the snapshot from its JSON text.
    ///
    /// Returns `None`, with a warning, when there is nothing to show: an
    /// empty object, a non-object, or the empty panel marker `{"":{}}`.
    pub fn from_json(raw: &str) -> Result<Option<Self>> {
        if raw.trim() == EMPTY_PANEL_DATA {
            tracing::warn!("no data provided");
            return Ok(None);
        }

        let value: Value = serde_json::from_str(raw).map_err(|e| Error::json_parse(e, raw))?;
        match value {
            Value::Object(data) if !data.is_empty() => Ok(Some(Self { data })),
            _ => {
                tracing::warn!("no data provided");
                Ok(None)
            }
        }
    }

    /// Build from an already parsed object.
    pub fn from_map(data: Map<String, Value>) -> Self {
        Self { data }
    }

    /// The raw snapshot.
    pub fn data(&self) -> &Map<String, Value> {
        &self.data
    }

    fn section(&self, key: &str) -> Option<&Map<String, Value>> {
        self.data.get(key).and_then(Value::as_object)
    }

    fn field(&self, section: &str, key: &str) -> Option<&Value> {
        self.section(section).and_then(|s| s.get(key))
    }

    /// Operating state of the heat pump, if reported.
    pub fn pump_active_state(&self) -> Option<PumpActiveState> {
        self.field("heat_pump", "pump_active_state")
            .and_then(Value::as_str)
            .map(PumpActiveState::parse)
    }

    /// Outdoor temperature, or `--`.
    pub fn outdoor_temperature(&self) -> String {
        display_value(self.field("heat_pump", "current_outdoor_temperature"))
    }

    /// Hot water temperature, or `--`.
    pub fn water_heater_current_temperature(&self) -> String {
        display_value(self.field("water_heater", "current_hot_water_temperature"))
    }

    /// Hot water setpoint, or `--`.
    pub fn water_heater_target_temperature(&self) -> String {
        display_value(self.field("water_heater", "target_hot_water_temperature"))
    }

    /// Two zones are installed when a second thermostat reports.
    pub fn is_dual_zone(&self) -> bool {
        self.data.contains_key("thermostat_2")
    }

    /// Readings of the thermostat stored under `key`.
    pub fn thermostat(&self, key: &str) -> Thermostat<'_> {
        Thermostat {
            fields: self.section(key),
        }
    }

    /// Error flag; `None` when the snapshot has no `error` section.
    pub fn error_active(&self) -> Option<bool> {
        self.data
            .get("error")
            .map(|_| is_true(self.field("error", "active")))
    }
}

/// Text for a reading; `--` for missing, null, empty, or `false`.
fn display_value(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) | Some(Value::Bool(false)) => MISSING.to_string(),
        Some(Value::String(s)) if s.is_empty() => MISSING.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => {
            let mut other = other.clone();
            integral_floats_as_ints(&mut other);
            other.to_string()
        }
    }
}

/// Flags arrive as `"true"` strings; a JSON `true` is accepted too.
fn is_true(value: Option<&Value>) -> bool {
    matches!(value, Some(Value::Bool(true))) || matches!(value, Some(Value::String(s)) if s == "true")
}
