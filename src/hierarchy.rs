//! Nested work breakdown structures and their flattening into parent-child edges.

/// One level of a work breakdown: either a list of task descriptions or
/// an ordered mapping from child label to child level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Hierarchy<'a> {
	/// Leaf holding task descriptions. Tasks never become graph nodes.
	Tasks(&'a [&'a str]),
	/// Internal node holding labelled children in authoring order.
	Children(&'a [(&'a str, Hierarchy<'a>)]),
}

impl<'a> Hierarchy<'a> {
	/// Whether this level is a task list.
	pub fn is_leaf(&self) -> bool {
		matches!(self, Self::Tasks(_))
	}

	/// All task descriptions below this level, depth-first.
	pub fn tasks(&self) -> Vec<&'a str> {
		let mut out = Vec::new();
		collect_tasks(*self, &mut out);
		out
	}
}

fn collect_tasks<'a>(level: Hierarchy<'a>, out: &mut Vec<&'a str>) {
	match level {
		Hierarchy::Tasks(tasks) => out.extend_from_slice(tasks),
		Hierarchy::Children(children) => {
			for &(_, child) in children {
				collect_tasks(child, out);
			}
		}
	}
}

/// A parent-child relation between two labels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Edge<'a> {
	/// Parent label.
	pub source: &'a str,
	/// Child label.
	pub target: &'a str,
}

/// Flatten a root mapping into edges, depth-first in key order.
///
/// Top-level keys have no parent and only ever appear as edge sources.
pub fn flatten<'a>(root: &'a [(&'a str, Hierarchy<'a>)]) -> Vec<Edge<'a>> {
	let mut edges = Vec::new();
	add_links(root, None, &mut edges);
	edges
}

fn add_links<'a>(level: &'a [(&'a str, Hierarchy<'a>)], parent: Option<&'a str>, out: &mut Vec<Edge<'a>>) {
	for &(key, value) in level {
		if let Some(source) = parent {
			out.push(Edge { source, target: key });
		}
		if let Hierarchy::Children(children) = value {
			add_links(children, Some(key), out);
		}
	}
}
