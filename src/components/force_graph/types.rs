use std::collections::HashSet;

use crate::hierarchy::Edge;

/// A labelled graph vertex.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GraphNode {
	/// Unique label.
	pub id: String,
}

/// A link between two node ids.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GraphLink {
	/// Parent node id.
	pub source: String,
	/// Child node id.
	pub target: String,
}

impl From<Edge<'_>> for GraphLink {
	fn from(edge: Edge<'_>) -> Self {
		Self {
			source: edge.source.to_owned(),
			target: edge.target.to_owned(),
		}
	}
}

/// Nodes and links handed to the force graph.
#[derive(Clone, Debug, Default)]
pub struct GraphData {
	/// Distinct nodes.
	pub nodes: Vec<GraphNode>,
	/// Parent-child links between node ids.
	pub links: Vec<GraphLink>,
}

impl GraphData {
	/// Build graph data from links alone. Nodes are the distinct link
	/// endpoints in first-seen order.
	pub fn from_links(links: Vec<GraphLink>) -> Self {
		let nodes = {
			let mut seen = HashSet::new();
			links
				.iter()
				.flat_map(|link| [&link.source, &link.target])
				.filter(|id| seen.insert(id.as_str()))
				.map(|id| GraphNode { id: id.clone() })
				.collect()
		};
		Self { nodes, links }
	}
}

impl<'a> FromIterator<Edge<'a>> for GraphData {
	fn from_iter<I: IntoIterator<Item = Edge<'a>>>(iter: I) -> Self {
		Self::from_links(iter.into_iter().map(GraphLink::from).collect())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn link(source: &str, target: &str) -> GraphLink {
		GraphLink {
			source: source.into(),
			target: target.into(),
		}
	}

	#[test]
	fn test_nodes_deduplicated_in_first_seen_order() {
		let data = GraphData::from_links(vec![link("a", "b"), link("a", "c"), link("c", "d")]);
		let ids: Vec<_> = data.nodes.iter().map(|n| n.id.as_str()).collect();
		assert_eq!(ids, vec!["a", "b", "c", "d"]);
	}

	#[test]
	fn test_node_set_covers_endpoints() {
		let data = GraphData::from_links(vec![link("x", "y"), link("y", "z"), link("x", "z")]);
		assert!(data.nodes.len() <= 2 * data.links.len());
		for l in &data.links {
			assert!(data.nodes.iter().any(|n| n.id == l.source));
			assert!(data.nodes.iter().any(|n| n.id == l.target));
		}
	}

	#[test]
	fn test_empty_links() {
		let data = GraphData::from_links(Vec::new());
		assert!(data.nodes.is_empty());
	}

	#[test]
	fn test_collect_from_edges() {
		let data: GraphData = [Edge { source: "p", target: "q" }].into_iter().collect();
		assert_eq!(data.links, vec![link("p", "q")]);
		assert_eq!(data.nodes.len(), 2);
	}
}
