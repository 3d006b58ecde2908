//! Scene: the ordered element operations that draw a status snapshot.

use serde::Serialize;

use super::elements::{ElementId, PipeColor, Zone};
use super::status::{HeatpumpStatus, PumpActiveState, PumpModeState, MISSING};

/// One change to the drawing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
#[non_exhaustive]
pub enum SceneOp {
    /// Show or hide an element.
    Show { element: ElementId, visible: bool },
    /// Replace the first text node of an element.
    SetText { element: ElementId, text: String },
    /// Recolour a pipe and its arrow heads.
    SetPipeColor { element: ElementId, color: PipeColor },
    /// Add a highlight class (`active-blue` or `active-orange`).
    AddClass { element: ElementId, class: &'static str },
    /// Start the rotating animation.
    Spin { element: ElementId },
    /// Start the pulse animation.
    Pulse { element: ElementId },
}

impl SceneOp {
    /// The element this operation touches.
    pub fn element(&self) -> ElementId {
        match self {
            SceneOp::Show { element, .. }
            | SceneOp::SetText { element, .. }
            | SceneOp::SetPipeColor { element, .. }
            | SceneOp::AddClass { element, .. }
            | SceneOp::Spin { element }
            | SceneOp::Pulse { element } => *element,
        }
    }
}

/// Ordered list of [`SceneOp`]s, applied front to back.
///
/// # Example
///
/// ```
/// use heatpump_console::dashboard::{ElementId, HeatpumpStatus, Scene, SceneOp};
///
/// let status = HeatpumpStatus::from_json(r#"{"heat_pump": {"current_outdoor_temperature": 4}}"#)
///     .unwrap()
///     .unwrap();
/// let scene = Scene::render(&status);
///
/// assert!(scene.ops().contains(&SceneOp::SetText {
///     element: ElementId::OutsideTemperature,
///     text: "4".to_string(),
/// }));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Scene {
    ops: Vec<SceneOp>,
}

impl Scene {
    /// An empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Hide every element whose visibility depends on the data.
    pub fn initial() -> Self {
        use ElementId as E;

        let mut scene = Self::new();
        for element in [
            E::Zone1LowBattery,
            E::Zone2LowBattery,
            E::Zone1,
            E::Zone2,
            E::Zone,
            E::Zone1Delivery,
            E::Zone1Return,
            E::Zone2Delivery,
            E::Zone2Return,
            E::ZoneDelivery,
            E::ZoneReturn,
            E::Zone1Cold,
            E::Zone1Hot,
            E::Zone2Cold,
            E::Zone2Hot,
            E::ZoneCold,
            E::ZoneHot,
            E::OnlineStatus,
            E::ErrorStatus,
        ] {
            scene.show(element, false);
        }
        scene
    }

    /// Operations that draw `status`, to apply after [`Scene::initial`].
    pub fn render(status: &HeatpumpStatus) -> Self {
        use ElementId as E;

        let mut scene = Self::new();
        scene.pulse(E::OnlineStatus);

        match status.pump_active_state() {
            Some(PumpActiveState::Heating) => scene.heat_pump_running(PipeColor::Hot, PipeColor::Cold),
            Some(PumpActiveState::Cooling) => scene.heat_pump_running(PipeColor::Cold, PipeColor::Hot),
            Some(PumpActiveState::Dhw) => {
                scene.heat_pump_running(PipeColor::Hot, PipeColor::Cold);
                scene.set_pipe_color(E::WaterHeaterDelivery, PipeColor::Hot);
                scene.set_pipe_color(E::WaterHeaterReturn, PipeColor::Cold);
                scene.set_active(E::WaterHeaterHot);
            }
            _ => {}
        }

        scene.set_text(E::OutsideTemperature, status.outdoor_temperature());
        scene.set_text(E::WaterHeaterCurTemperature, status.water_heater_current_temperature());
        scene.set_text(E::WaterHeaterTarTemperature, status.water_heater_target_temperature());

        let zones: &[Zone] = if status.is_dual_zone() {
            &[Zone::First, Zone::Second]
        } else {
            &[Zone::Single]
        };
        for &zone in zones {
            let elements = zone.elements();
            scene.show(elements.group, true);
            scene.show(elements.delivery, true);
            scene.show(elements.return_pipe, true);
        }

        for &zone in zones {
            scene.zone(status, zone);
        }

        if let Some(active) = status.error_active() {
            scene.show(E::ErrorStatus, active);
        }

        scene
    }

    fn heat_pump_running(&mut self, delivery: PipeColor, return_pipe: PipeColor) {
        self.set_pipe_color(ElementId::HeatpumpDelivery, delivery);
        self.set_pipe_color(ElementId::HeatpumpReturn, return_pipe);
        self.spin(ElementId::HeatpumpBlades);
    }

    fn zone(&mut self, status: &HeatpumpStatus, zone: Zone) {
        let elements = zone.elements();
        let thermostat = status.thermostat(zone.thermostat_key());

        self.set_text(elements.humidity, thermostat.humidity());
        self.set_text(elements.cur_temperature, thermostat.actual_temperature());
        self.set_text(elements.tar_temperature, MISSING);

        match thermostat.pump_mode() {
            Some(PumpModeState::Heating) => {
                self.set_active(elements.hot);
                self.set_pipe_color(elements.delivery, PipeColor::Hot);
                self.set_pipe_color(elements.return_pipe, PipeColor::Cold);
            }
            Some(PumpModeState::Cooling) => {
                self.set_active(elements.cold);
                self.set_pipe_color(elements.delivery, PipeColor::Cold);
                self.set_pipe_color(elements.return_pipe, PipeColor::Hot);
            }
            Some(PumpModeState::Other(state)) => {
                tracing::warn!(thermostat = zone.thermostat_key(), %state, "unknown pump mode state");
            }
            Some(PumpModeState::Unspecified | PumpModeState::Idle) | None => {}
        }

        self.show(elements.low_battery, thermostat.low_battery());
    }

    /// Show or hide an element.
    pub fn show(&mut self, element: ElementId, visible: bool) {
        self.ops.push(SceneOp::Show { element, visible });
    }

    /// Replace an element's text.
    pub fn set_text(&mut self, element: ElementId, text: impl Into<String>) {
        self.ops.push(SceneOp::SetText {
            element,
            text: text.into(),
        });
    }

    /// Recolour a pipe.
    pub fn set_pipe_color(&mut self, element: ElementId, color: PipeColor) {
        self.ops.push(SceneOp::SetPipeColor { element, color });
    }

    /// Show the element, then highlight it.
    pub fn set_active(&mut self, element: ElementId) {
        self.show(element, true);
        self.ops.push(SceneOp::AddClass {
            element,
            class: element.active_class(),
        });
    }

    /// Start the element's rotation animation.
    pub fn spin(&mut self, element: ElementId) {
        self.ops.push(SceneOp::Spin { element });
    }

    /// Show the element, then pulse it.
    pub fn pulse(&mut self, element: ElementId) {
        self.show(element, true);
        self.ops.push(SceneOp::Pulse { element });
    }

    /// Recolour a pipe given by name.
    ///
    /// Unknown elements and colours are logged and ignored; returns whether
    /// an operation was added.
    pub fn paint_pipe(&mut self, name: &str, color: &str) -> bool {
        let color = match color.parse::<PipeColor>() {
            Ok(color) => color,
            Err(e) => {
                tracing::warn!(error = %e, "pipe not painted");
                return false;
            }
        };
        match name.parse::<ElementId>() {
            Ok(element) => {
                self.set_pipe_color(element, color);
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "pipe not painted");
                false
            }
        }
    }

    /// Show or hide an element given by name; unknown names are logged and ignored.
    pub fn show_named(&mut self, name: &str, visible: bool) -> bool {
        match name.parse::<ElementId>() {
            Ok(element) => {
                self.show(element, visible);
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "element not shown");
                false
            }
        }
    }

    /// Append another scene's operations.
    pub fn extend(&mut self, other: Scene) {
        self.ops.extend(other.ops);
    }

    /// The operations in application order.
    pub fn ops(&self) -> &[SceneOp] {
        &self.ops
    }

    /// Number of operations.
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Whether the scene changes nothing.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

impl IntoIterator for Scene {
    type Item = SceneOp;
    type IntoIter = std::vec::IntoIter<SceneOp>;

    fn into_iter(self) -> Self::IntoIter {
        self.ops.into_iter()
    }
}
