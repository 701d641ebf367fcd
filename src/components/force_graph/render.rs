use leptos::prelude::*;
use web_sys::MouseEvent;

use super::state::{NODE_RADIUS, Point};

const EDGE_STROKE: &str = "#999";
const EDGE_OPACITY: &str = "0.6";
const NODE_FILL: &str = "lightcoral";
const NODE_STROKE: &str = "#fff";
const STROKE_WIDTH: &str = "1.5";
const LABEL_DY: &str = "-5";

fn point(frame: RwSignal<Vec<Point>>, idx: usize) -> Point {
	frame.with(|p| p.get(idx).copied().unwrap_or_default())
}

/// One line per link, following both endpoints.
pub fn edges(links: Vec<(usize, usize)>, frame: RwSignal<Vec<Point>>) -> impl IntoView {
	view! {
		<g stroke=EDGE_STROKE stroke-opacity=EDGE_OPACITY>
			{links
				.into_iter()
				.map(|(s, t)| {
					view! {
						<line
							stroke-width=STROKE_WIDTH
							x1=move || point(frame, s).0
							y1=move || point(frame, s).1
							x2=move || point(frame, t).0
							y2=move || point(frame, t).1
						/>
					}
				})
				.collect_view()}
		</g>
	}
}

/// One circle per node. `on_grab` receives the node index on mouse down.
pub fn nodes<F>(count: usize, frame: RwSignal<Vec<Point>>, on_grab: F) -> impl IntoView
where
	F: Fn(usize, MouseEvent) + Clone + 'static,
{
	view! {
		<g stroke=NODE_STROKE stroke-width=STROKE_WIDTH>
			{(0..count)
				.map(|idx| {
					let on_grab = on_grab.clone();
					view! {
						<circle
							r=NODE_RADIUS
							fill=NODE_FILL
							style="cursor: grab;"
							cx=move || point(frame, idx).0
							cy=move || point(frame, idx).1
							on:mousedown=move |ev: MouseEvent| on_grab(idx, ev)
						/>
					}
				})
				.collect_view()}
		</g>
	}
}

/// Node labels, drawn above the circles and transparent to the pointer.
pub fn labels(ids: Vec<String>, frame: RwSignal<Vec<Point>>) -> impl IntoView {
	view! {
		<g style="pointer-events: none; user-select: none;" font-family="sans-serif" font-size="10">
			{ids
				.into_iter()
				.enumerate()
				.map(|(idx, id)| {
					view! {
						<text
							dy=LABEL_DY
							x=move || point(frame, idx).0
							y=move || point(frame, idx).1
						>
							{id}
						</text>
					}
				})
				.collect_view()}
		</g>
	}
}
