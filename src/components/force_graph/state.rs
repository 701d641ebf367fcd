use log::{debug, warn};

use super::simulation::{ForceConfig, Simulation};
use super::types::GraphData;

pub const NODE_RADIUS: f64 = 5.0;

/// Node position in graph space.
pub type Point = (f64, f64);

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub node_idx: Option<usize>,
}

impl DragState {
	pub fn active(&self) -> bool {
		self.node_idx.is_some()
	}
}

pub struct ForceGraphState {
	pub simulation: Simulation,
	pub drag: DragState,
	pub width: f64,
	pub height: f64,
}

impl ForceGraphState {
	pub fn new(data: &GraphData, config: ForceConfig, width: f64, height: f64) -> Self {
		Self {
			simulation: Simulation::new(data, config),
			drag: DragState::default(),
			width,
			height,
		}
	}

	/// Map an offset inside the drawing surface to graph space. The surface
	/// shows a `width` x `height` view box centered on the origin, scaled to
	/// the element's rendered size.
	pub fn screen_to_graph(&self, sx: f64, sy: f64, rendered_w: f64, rendered_h: f64) -> Point {
		let kx = if rendered_w > 0.0 { self.width / rendered_w } else { 1.0 };
		let ky = if rendered_h > 0.0 { self.height / rendered_h } else { 1.0 };
		(sx * kx - self.width / 2.0, sy * ky - self.height / 2.0)
	}

	/// Heat the simulation and pin `idx` where it currently is. Returns false
	/// when the node is not tracked.
	pub fn drag_start(&mut self, idx: usize) -> bool {
		let Some(node) = self.simulation.node(idx) else {
			warn!("drag started on untracked node {idx}");
			return false;
		};
		let (x, y) = (node.x, node.y);
		debug!("drag start on `{}`", node.id);

		if self.drag.active() {
			self.drag_end();
		}
		let target = self.simulation.config().drag_alpha_target;
		self.simulation.set_alpha_target(target);
		self.simulation.restart();
		self.simulation.pin(idx, x, y);
		self.drag.node_idx = Some(idx);
		true
	}

	/// Move the pin of the dragged node to `(x, y)` in graph space.
	pub fn drag_to(&mut self, x: f64, y: f64) {
		if let Some(idx) = self.drag.node_idx {
			self.simulation.pin(idx, x, y);
		}
	}

	/// Release the dragged node back to the simulation and let it cool.
	pub fn drag_end(&mut self) {
		let Some(idx) = self.drag.node_idx.take() else {
			return;
		};
		self.simulation.set_alpha_target(0.0);
		self.simulation.unpin(idx);
		debug!("drag end on node {idx}");
	}

	/// Step the simulation once. Returns whether another frame is wanted.
	pub fn tick(&mut self) -> bool {
		self.simulation.tick()
	}

	pub fn positions(&self) -> Vec<Point> {
		self.simulation.nodes().iter().map(|n| (n.x, n.y)).collect()
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}
}
