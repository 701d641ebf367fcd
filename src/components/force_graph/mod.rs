//! Force-directed graph drawn as SVG.

mod component;
mod error;
mod render;
mod simulation;
mod state;
mod types;

pub use component::ForceGraphSvg;
pub use error::SurfaceError;
pub use simulation::{ForceConfig, SimNode, Simulation};
pub use types::{GraphData, GraphLink, GraphNode};
