use leptos::prelude::*;
use plothole_sociogram::{App, init_logging};

fn main() {
	init_logging();
	mount_to_body(App);
}
