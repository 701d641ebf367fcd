use leptos::prelude::*;

use crate::components::force_graph::{ForceGraphSvg, GraphData};
use crate::hierarchy::Hierarchy::{Children, Tasks};
use crate::hierarchy::{Hierarchy, flatten};

/// Work breakdown of the Halloween murder-mystery event.
pub static EVENT_WBS: &[(&str, Hierarchy<'static>)] = &[
	(
		"1.1 Game Setup",
		Children(&[
			(
				"1.1.1 Murder Mystery Scenario",
				Children(&[
					(
						"1.1.1.1 Script and Storyline",
						Tasks(&["Develop script", "Create plot and main clues"]),
					),
					(
						"1.1.1.2 Character Roles",
						Tasks(&["Assign roles", "Prepare character profiles"]),
					),
					(
						"1.1.1.3 Clue Cards and Evidence Sheets",
						Tasks(&["Design and print clue cards", "Create evidence sheets"]),
					),
					(
						"1.1.1.4 Mystery-solving Tools",
						Tasks(&["Procure tools", "Distribute materials"]),
					),
				]),
			),
			(
				"1.1.2 Game Stages",
				Children(&[
					("1.1.2.1 Puzzle Design", Tasks(&["Create puzzles for game phases"])),
					(
						"1.1.2.2 Team Clues Distribution",
						Tasks(&["Organize and distribute team clues"]),
					),
					(
						"1.1.2.3 Final Reveal of Murderer",
						Tasks(&["Plan final scene of reveal"]),
					),
				]),
			),
		]),
	),
	(
		"1.2 Event Logistics",
		Children(&[
			(
				"1.2.1 Venue Setup",
				Children(&[
					("1.2.1.1 Decorations", Tasks(&["Set up Halloween decorations"])),
					("1.2.1.2 Lighting", Tasks(&["Install lighting"])),
					(
						"1.2.1.3 Sound System & DJ Booth",
						Tasks(&["Set up sound system and DJ booth"]),
					),
				]),
			),
			(
				"1.2.2 Food and Drink Stands",
				Children(&[
					("1.2.2.1 Halloween-themed Snacks", Tasks(&["Prepare snacks"])),
					("1.2.2.2 Beverage Stands", Tasks(&["Set up beverage stands"])),
				]),
			),
			(
				"1.2.3 Logistics and Equipment",
				Children(&[
					("1.2.3.1 Fog Machine", Tasks(&["Install and test fog machine"])),
					("1.2.3.2 Photobooth", Tasks(&["Set up photobooth with props"])),
					(
						"1.2.3.3 Clean-up and Waste Management",
						Tasks(&["Organize clean-up crews"]),
					),
				]),
			),
			(
				"1.2.4 Security & First Aid",
				Tasks(&["Ensure security presence", "Arrange first aid staff"]),
			),
		]),
	),
	(
		"1.3 Marketing & Promotion",
		Children(&[
			(
				"1.3.1 Social Media Campaign",
				Children(&[
					("1.3.1.1 Event Announcements", Tasks(&["Post event announcements"])),
					("1.3.1.2 Teasers", Tasks(&["Release teasers and clues online"])),
				]),
			),
			(
				"1.3.2 On-Campus Promotion",
				Children(&[
					("1.3.2.1 Posters and Flyers", Tasks(&["Design and distribute posters"])),
					("1.3.2.2 Volunteer Recruitment Ads", Tasks(&["Post volunteer ads"])),
				]),
			),
			("1.3.3 Website Event Page", Tasks(&["Create and maintain event page"])),
		]),
	),
	(
		"1.4 Participation",
		Children(&[
			(
				"1.4.1 Team Formation & Registration",
				Children(&[
					("1.4.1.1 Randomized Team Assignment", Tasks(&["Form teams randomly"])),
					(
						"1.4.1.2 Participant Registration Forms",
						Tasks(&["Manage registration forms"]),
					),
				]),
			),
			("1.4.2 Game Rules & Instructions", Tasks(&["Write and distribute rules"])),
		]),
	),
	(
		"1.5 Rewards & Feedback",
		Children(&[
			("1.5.1 Prizes for Winning Team", Tasks(&["Purchase and prepare prizes"])),
			("1.5.2 Participation Goodies", Tasks(&["Provide TSM-branded items"])),
			(
				"1.5.3 Post-Event Surveys",
				Children(&[
					("1.5.3.1 Satisfaction Survey", Tasks(&["Distribute satisfaction survey"])),
					("1.5.3.2 Impact Evaluation", Tasks(&["Evaluate social impact"])),
				]),
			),
		]),
	),
];

fn event_graph() -> GraphData {
	flatten(EVENT_WBS).into_iter().collect()
}

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let graph_data = event_graph();
	let package_count = graph_data.nodes.len();
	let task_count: usize = EVENT_WBS.iter().map(|(_, level)| level.tasks().len()).sum();

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<div class="fullscreen-graph">
				<ForceGraphSvg data=graph_data fullscreen=true />
				<div class="graph-overlay">
					<h1>"Event Work Breakdown"</h1>
					<p class="subtitle">
						{format!(
							"{} work packages, {} tasks. Drag nodes to reposition.",
							package_count,
							task_count,
						)}
					</p>
				</div>
			</div>
		</ErrorBoundary>
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::hierarchy::Edge;

	#[test]
	fn test_event_edges() {
		let edges = flatten(EVENT_WBS);
		assert!(edges.contains(&Edge {
			source: "1.1 Game Setup",
			target: "1.1.1 Murder Mystery Scenario",
		}));
		assert!(edges.contains(&Edge {
			source: "1.2 Event Logistics",
			target: "1.2.4 Security & First Aid",
		}));
		assert!(edges.iter().all(|e| e.target != "Develop script"));
	}

	#[test]
	fn test_event_graph_shape() {
		let graph = event_graph();
		// a forest: every package but the five roots has exactly one parent
		assert_eq!(graph.links.len(), 37);
		assert_eq!(graph.nodes.len(), 37 + 5);
		assert!(graph.nodes.len() <= 2 * graph.links.len());
		let tasks: Vec<_> = EVENT_WBS.iter().flat_map(|(_, level)| level.tasks()).collect();
		assert!(graph.nodes.iter().all(|n| !tasks.contains(&n.id.as_str())));
	}

	#[test]
	fn test_event_graph_is_stable() {
		assert_eq!(event_graph().links, event_graph().links);
	}
}
