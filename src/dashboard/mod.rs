//! Heat-pump dashboard model.
//!
//! The dashboard is an SVG drawing whose elements are shown, hidden,
//! recoloured and animated from a status snapshot. This module derives the
//! operations without touching any drawing:
//!
//! - [`HeatpumpStatus`] - the snapshot, read from the `data` URL parameter
//! - [`ElementId`] - logical element names and their SVG ids
//! - [`Scene`] - the ordered [`SceneOp`]s that draw a snapshot
//!
//! # Example
//!
//! ```
//! use heatpump_console::dashboard::{HeatpumpStatus, Scene};
//!
//! let mut scene = Scene::initial();
//! if let Some(status) = HeatpumpStatus::from_query("?data=%7B%22thermostat_1%22%3A%7B%7D%7D").unwrap() {
//!     scene.extend(Scene::render(&status));
//! }
//! assert!(scene.len() > 19);
//! ```

mod elements;
mod scene;
mod status;

pub use elements::{ElementId, PipeColor, Zone, ZoneElements};
pub use scene::{Scene, SceneOp};
pub use status::{HeatpumpStatus, PumpActiveState, PumpModeState, Thermostat, DATA_PARAM, MISSING};
