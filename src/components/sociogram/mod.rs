//! Character relationship graph: force layout, camera, pointer handling and
//! canvas rendering.

mod avatar;
mod camera;
mod component;
mod config;
mod curve;
mod interaction;
mod physics;
mod render;
mod state;
mod types;

pub use component::SociogramCanvas;
pub use config::{LayoutConfig, ViewConfig};
pub use types::{Character, EntityKind, Relationship, merge_relationships};
