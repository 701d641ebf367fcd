//! Trunk entry point: mounts the work breakdown graph app.

// the library owns every other dependency
#![allow(unused_crate_dependencies)]

use wbs_force_graph::{App, init_logging};

fn main() {
	init_logging();
	leptos::mount::mount_to_body(App)
}
