//! Force layout with link, charge and centering forces, integrated by
//! semi-implicit Euler steps with velocity decay (`v *= 1 - decay; p += v`).
//!
//! The simulation is driven by `alpha`, a temperature that scales every force
//! and decays toward `alpha_target` each step. Once alpha falls below
//! `alpha_min` the simulation reports itself settled and the frame loop stops
//! asking for steps until [`Simulation::restart`] is called.

use std::collections::HashMap;
use std::f64::consts::PI;

use log::{info, warn};

use super::types::GraphData;

const INITIAL_RADIUS: f64 = 10.0;

/// Tunables for [`Simulation`].
#[derive(Clone, Debug, PartialEq)]
pub struct ForceConfig {
	/// Pairwise charge; negative values repel.
	pub charge_strength: f64,
	/// Rest length of every link.
	pub link_distance: f64,
	/// Point the node centroid is held at.
	pub center: (f64, f64),
	/// Alpha below which the layout counts as settled.
	pub alpha_min: f64,
	/// Rate at which alpha approaches its target each step.
	pub alpha_decay: f64,
	/// Fraction of velocity lost per step.
	pub velocity_decay: f64,
	/// Alpha target held while a node is being dragged.
	pub drag_alpha_target: f64,
}

impl Default for ForceConfig {
	fn default() -> Self {
		let alpha_min = 0.001;
		Self {
			charge_strength: -400.0,
			link_distance: 100.0,
			center: (0.0, 0.0),
			alpha_min,
			alpha_decay: 1.0 - alpha_min.powf(1.0 / 300.0),
			velocity_decay: 0.4,
			drag_alpha_target: 0.3,
		}
	}
}

/// Simulated state of one node. While `fx`/`fy` are set the node is pinned
/// there and ignores forces.
#[derive(Clone, Debug, PartialEq)]
pub struct SimNode {
	/// Node label.
	pub id: String,
	/// Horizontal position.
	pub x: f64,
	/// Vertical position.
	pub y: f64,
	/// Horizontal velocity.
	pub vx: f64,
	/// Vertical velocity.
	pub vy: f64,
	/// Pinned horizontal position.
	pub fx: Option<f64>,
	/// Pinned vertical position.
	pub fy: Option<f64>,
}

impl SimNode {
	/// Whether either coordinate is pinned.
	pub fn is_pinned(&self) -> bool {
		self.fx.is_some() || self.fy.is_some()
	}
}

#[derive(Clone, Copy, Debug)]
struct SimLink {
	source: usize,
	target: usize,
	strength: f64,
	bias: f64,
}

/// Linear congruential generator used to separate coincident nodes.
#[derive(Clone, Debug)]
struct Lcg(u32);

impl Lcg {
	fn next_f64(&mut self) -> f64 {
		self.0 = self.0.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
		self.0 as f64 / 4_294_967_296.0
	}

	fn jiggle(&mut self) -> f64 {
		(self.next_f64() - 0.5) * 1e-6
	}
}

/// Force layout over a fixed set of nodes and links.
#[derive(Clone, Debug)]
pub struct Simulation {
	nodes: Vec<SimNode>,
	links: Vec<SimLink>,
	index: HashMap<String, usize>,
	config: ForceConfig,
	alpha: f64,
	alpha_target: f64,
	running: bool,
	ticks: u64,
	random: Lcg,
}

impl Simulation {
	/// Lay out `data` on a spiral around the origin, at full heat. Duplicate
	/// nodes and links with unknown endpoints are dropped with a warning.
	pub fn new(data: &GraphData, config: ForceConfig) -> Self {
		let golden_angle = PI * (3.0 - 5f64.sqrt());
		let mut index = HashMap::with_capacity(data.nodes.len());
		let mut nodes = Vec::with_capacity(data.nodes.len());

		for node in &data.nodes {
			if index.contains_key(&node.id) {
				warn!("duplicate node `{}` ignored", node.id);
				continue;
			}
			let i = nodes.len();
			let (radius, angle) = (INITIAL_RADIUS * (0.5 + i as f64).sqrt(), i as f64 * golden_angle);
			index.insert(node.id.clone(), i);
			nodes.push(SimNode {
				id: node.id.clone(),
				x: radius * angle.cos(),
				y: radius * angle.sin(),
				vx: 0.0,
				vy: 0.0,
				fx: None,
				fy: None,
			});
		}

		let mut pairs = Vec::with_capacity(data.links.len());
		for link in &data.links {
			match (index.get(&link.source), index.get(&link.target)) {
				(Some(&source), Some(&target)) => pairs.push((source, target)),
				_ => warn!("skipping link {} -> {}: unknown endpoint", link.source, link.target),
			}
		}

		let mut degree = vec![0usize; nodes.len()];
		for &(source, target) in &pairs {
			degree[source] += 1;
			degree[target] += 1;
		}
		let links = pairs
			.into_iter()
			.map(|(source, target)| {
				let (ds, dt) = (degree[source] as f64, degree[target] as f64);
				SimLink {
					source,
					target,
					strength: 1.0 / ds.min(dt),
					bias: ds / (ds + dt),
				}
			})
			.collect();

		Self {
			nodes,
			links,
			index,
			config,
			alpha: 1.0,
			alpha_target: 0.0,
			running: true,
			ticks: 0,
			random: Lcg(1),
		}
	}

	/// Nodes in insertion order; indices match [`Simulation::links`].
	pub fn nodes(&self) -> &[SimNode] {
		&self.nodes
	}

	/// Node at `idx`, if tracked.
	pub fn node(&self, idx: usize) -> Option<&SimNode> {
		self.nodes.get(idx)
	}

	/// Index of the node labelled `id`.
	pub fn index_of(&self, id: &str) -> Option<usize> {
		self.index.get(id).copied()
	}

	/// Link endpoints as node indices.
	pub fn links(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
		self.links.iter().map(|l| (l.source, l.target))
	}

	/// Active tunables.
	pub fn config(&self) -> &ForceConfig {
		&self.config
	}

	/// Current temperature.
	pub fn alpha(&self) -> f64 {
		self.alpha
	}

	/// Temperature that alpha decays toward.
	pub fn alpha_target(&self) -> f64 {
		self.alpha_target
	}

	/// Set the temperature alpha decays toward.
	pub fn set_alpha_target(&mut self, target: f64) {
		self.alpha_target = target;
	}

	/// False once the layout has settled and until the next restart.
	pub fn is_running(&self) -> bool {
		self.running
	}

	/// Resume stepping after the simulation has settled.
	pub fn restart(&mut self) {
		self.running = true;
	}

	/// Fix a node at `(x, y)` until [`Simulation::unpin`]. Returns false for
	/// an unknown index.
	pub fn pin(&mut self, idx: usize, x: f64, y: f64) -> bool {
		let Some(node) = self.nodes.get_mut(idx) else {
			return false;
		};
		node.fx = Some(x);
		node.fy = Some(y);
		true
	}

	/// Release a pinned node. Returns false for an unknown index.
	pub fn unpin(&mut self, idx: usize) -> bool {
		let Some(node) = self.nodes.get_mut(idx) else {
			return false;
		};
		node.fx = None;
		node.fy = None;
		true
	}

	/// Advance one frame when running. Returns whether another frame is
	/// wanted.
	pub fn tick(&mut self) -> bool {
		if !self.running {
			return false;
		}
		self.step();
		if self.alpha < self.config.alpha_min {
			self.running = false;
			info!("layout settled after {} ticks", self.ticks);
		}
		self.running
	}

	/// Advance one step regardless of the running flag.
	pub fn step(&mut self) {
		self.ticks += 1;
		self.alpha += (self.alpha_target - self.alpha) * self.config.alpha_decay;
		let alpha = self.alpha;

		self.apply_links(alpha);
		self.apply_charge(alpha);
		self.apply_center();

		let keep = 1.0 - self.config.velocity_decay;
		for node in &mut self.nodes {
			match node.fx {
				Some(fx) => {
					node.x = fx;
					node.vx = 0.0;
				}
				None => {
					node.vx *= keep;
					node.x += node.vx;
				}
			}
			match node.fy {
				Some(fy) => {
					node.y = fy;
					node.vy = 0.0;
				}
				None => {
					node.vy *= keep;
					node.y += node.vy;
				}
			}
		}
	}

	fn apply_links(&mut self, alpha: f64) {
		let distance = self.config.link_distance;
		for link in &self.links {
			let (s, t) = (&self.nodes[link.source], &self.nodes[link.target]);
			let mut x = t.x + t.vx - s.x - s.vx;
			let mut y = t.y + t.vy - s.y - s.vy;
			if x == 0.0 {
				x = self.random.jiggle();
			}
			if y == 0.0 {
				y = self.random.jiggle();
			}
			let l = (x * x + y * y).sqrt();
			let k = (l - distance) / l * alpha * link.strength;
			let (x, y) = (x * k, y * k);

			let target = &mut self.nodes[link.target];
			target.vx -= x * link.bias;
			target.vy -= y * link.bias;
			let source = &mut self.nodes[link.source];
			source.vx += x * (1.0 - link.bias);
			source.vy += y * (1.0 - link.bias);
		}
	}

	fn apply_charge(&mut self, alpha: f64) {
		let w = self.config.charge_strength * alpha;
		for i in 0..self.nodes.len() {
			let (xi, yi) = (self.nodes[i].x, self.nodes[i].y);
			let (mut dvx, mut dvy) = (0.0, 0.0);
			for j in 0..self.nodes.len() {
				if i == j {
					continue;
				}
				let mut x = self.nodes[j].x - xi;
				let mut y = self.nodes[j].y - yi;
				let mut l = x * x + y * y;
				if x == 0.0 {
					x = self.random.jiggle();
					l += x * x;
				}
				if y == 0.0 {
					y = self.random.jiggle();
					l += y * y;
				}
				if l < 1.0 {
					l = l.sqrt();
				}
				dvx += x * w / l;
				dvy += y * w / l;
			}
			self.nodes[i].vx += dvx;
			self.nodes[i].vy += dvy;
		}
	}

	fn apply_center(&mut self) {
		if self.nodes.is_empty() {
			return;
		}
		let n = self.nodes.len() as f64;
		let (sx, sy) = self
			.nodes
			.iter()
			.fold((0.0, 0.0), |(sx, sy), node| (sx + node.x, sy + node.y));
		let (cx, cy) = self.config.center;
		let (dx, dy) = (sx / n - cx, sy / n - cy);
		for node in &mut self.nodes {
			node.x -= dx;
			node.y -= dy;
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::types::GraphLink;

	fn graph(links: &[(&str, &str)]) -> GraphData {
		GraphData::from_links(
			links
				.iter()
				.map(|&(s, t)| GraphLink {
					source: s.into(),
					target: t.into(),
				})
				.collect(),
		)
	}

	fn distance(sim: &Simulation, a: usize, b: usize) -> f64 {
		let (a, b) = (&sim.nodes()[a], &sim.nodes()[b]);
		((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt()
	}

	#[test]
	fn test_initial_positions_are_distinct() {
		let sim = Simulation::new(&graph(&[("a", "b"), ("a", "c"), ("a", "d")]), ForceConfig::default());
		assert_eq!(sim.nodes().len(), 4);
		for i in 0..4 {
			for j in (i + 1)..4 {
				assert!(distance(&sim, i, j) > 0.0);
			}
		}
	}

	#[test]
	fn test_settles_from_cold_start() {
		let mut sim = Simulation::new(&graph(&[("a", "b"), ("b", "c")]), ForceConfig::default());
		let mut ticks = 0;
		while sim.tick() {
			ticks += 1;
			assert!(ticks < 1000, "simulation never settled");
		}
		assert!(!sim.is_running());
		assert!(sim.alpha() < sim.config().alpha_min);
		// default decay settles in about 300 ticks
		assert!((290..=310).contains(&ticks));
		assert!(!sim.tick());
	}

	#[test]
	fn test_link_pulls_toward_rest_length() {
		let mut sim = Simulation::new(&graph(&[("a", "b")]), ForceConfig::default());
		for _ in 0..300 {
			sim.step();
		}
		let d = distance(&sim, 0, 1);
		// charge pushes the pair slightly beyond the rest length
		assert!(d > 90.0 && d < 200.0, "distance {d}");
	}

	#[test]
	fn test_charge_pushes_apart() {
		let config = ForceConfig {
			link_distance: 0.0,
			..ForceConfig::default()
		};
		let mut linked = Simulation::new(&graph(&[("a", "b")]), config.clone());
		let start = distance(&linked, 0, 1);
		let mut free = Simulation::new(&graph(&[("a", "b")]), ForceConfig::default());
		free.links.clear();
		for _ in 0..50 {
			linked.step();
			free.step();
		}
		assert!(distance(&free, 0, 1) > start);
		assert!(distance(&free, 0, 1) > distance(&linked, 0, 1));
	}

	#[test]
	fn test_center_holds_centroid() {
		let config = ForceConfig {
			center: (25.0, -10.0),
			..ForceConfig::default()
		};
		let mut sim = Simulation::new(&graph(&[("a", "b"), ("a", "c"), ("c", "d")]), config);
		for _ in 0..20 {
			sim.step();
		}
		sim.apply_center();
		let n = sim.nodes().len() as f64;
		let cx: f64 = sim.nodes().iter().map(|n| n.x).sum::<f64>() / n;
		let cy: f64 = sim.nodes().iter().map(|n| n.y).sum::<f64>() / n;
		assert!((cx - 25.0).abs() < 1e-9, "cx {cx}");
		assert!((cy + 10.0).abs() < 1e-9, "cy {cy}");
	}

	#[test]
	fn test_integration_is_damped_euler() {
		let config = ForceConfig {
			charge_strength: 0.0,
			..ForceConfig::default()
		};
		let mut sim = Simulation::new(&graph(&[("a", "b")]), config);
		sim.links.clear();
		sim.nodes[0].vx = 10.0;
		let (dx0, dy0) = (sim.nodes[0].x - sim.nodes[1].x, sim.nodes[0].y - sim.nodes[1].y);
		sim.step();
		// velocity decays first, then moves the node; centering shifts both alike
		let (a, b) = (&sim.nodes()[0], &sim.nodes()[1]);
		assert!((a.vx - 6.0).abs() < 1e-12);
		assert!((a.x - b.x - (dx0 + 6.0)).abs() < 1e-9);
		assert!((a.y - b.y - dy0).abs() < 1e-9);
	}

	#[test]
	fn test_pinned_node_stays_put() {
		let mut sim = Simulation::new(&graph(&[("a", "b"), ("b", "c")]), ForceConfig::default());
		assert!(sim.pin(1, 40.0, 40.0));
		for _ in 0..30 {
			sim.step();
		}
		let b = &sim.nodes()[1];
		assert_eq!((b.x, b.y, b.vx, b.vy), (40.0, 40.0, 0.0, 0.0));
		assert!(sim.unpin(1));
		assert!(!sim.nodes()[1].is_pinned());
	}

	#[test]
	fn test_unknown_indices_are_rejected() {
		let mut sim = Simulation::new(&graph(&[("a", "b")]), ForceConfig::default());
		assert!(!sim.pin(7, 0.0, 0.0));
		assert!(!sim.unpin(7));
		assert!(sim.node(7).is_none());
	}

	#[test]
	fn test_alpha_target_keeps_running() {
		let mut sim = Simulation::new(&graph(&[("a", "b")]), ForceConfig::default());
		while sim.tick() {}
		sim.set_alpha_target(0.3);
		sim.restart();
		for _ in 0..2000 {
			assert!(sim.tick());
		}
		assert!((sim.alpha() - 0.3).abs() < 0.01);
		sim.set_alpha_target(0.0);
		while sim.tick() {}
		assert!(!sim.is_running());
	}

	#[test]
	fn test_links_with_unknown_endpoints_are_skipped() {
		let mut data = graph(&[("a", "b")]);
		data.links.push(GraphLink {
			source: "a".into(),
			target: "ghost".into(),
		});
		let sim = Simulation::new(&data, ForceConfig::default());
		assert_eq!(sim.links().collect::<Vec<_>>(), vec![(0, 1)]);
		assert_eq!(sim.index_of("b"), Some(1));
		assert_eq!(sim.index_of("ghost"), None);
	}

	#[test]
	fn test_degree_weighting() {
		let sim = Simulation::new(&graph(&[("hub", "a"), ("hub", "b"), ("hub", "c")]), ForceConfig::default());
		for link in &sim.links {
			assert_eq!(link.strength, 1.0);
			assert_eq!(link.bias, 0.75);
		}
	}

	#[test]
	fn test_empty_graph_steps() {
		let mut sim = Simulation::new(&GraphData::default(), ForceConfig::default());
		sim.step();
		assert!(sim.nodes().is_empty());
	}
}
