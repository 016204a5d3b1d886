//! Browser tests for `WebDom` and a controller bound to live elements
//!
//! Run with `wasm-pack test --headless --chrome crates/tableaux-pages`.

#[cfg(target_arch = "wasm32")]
mod web_dom_tests {
	use std::cell::Cell;
	use std::rc::Rc;

	use tableaux_core::{BreakpointService, BreakpointTable, Settings};
	use tableaux_pages::TableController;
	use tableaux_pages::dom::{Dom, EventKind, ListenTarget, Selector, WebDom, listener};
	use tableaux_pages::transport::RecordingTransport;
	use wasm_bindgen::JsCast;
	use wasm_bindgen_test::*;

	wasm_bindgen_test_configure!(run_in_browser);

	fn mount(dom: &WebDom, html: &str) -> web_sys::Element {
		let holder = dom.document().create_element("div").unwrap();
		holder.set_inner_html(html);
		dom.body().unwrap().append_child(&holder).unwrap();
		holder
	}

	fn click(element: &web_sys::Element) {
		element.unchecked_ref::<web_sys::HtmlElement>().click();
	}

	#[wasm_bindgen_test]
	fn test_query_and_attributes() {
		let dom = WebDom::new().unwrap();
		let holder = mount(
			&dom,
			r#"<table selected="table-active"><tr data-pk="7"><td class="td-edit a">x</td></tr></table>"#,
		);

		let cell = dom.query(&holder, &Selector::class("td-edit")).unwrap();
		assert_eq!(dom.tag_name(&cell), "td");
		let row = dom.closest(&cell, &Selector::tag("tr")).unwrap();
		assert_eq!(dom.attribute(&row, "data-pk").as_deref(), Some("7"));
		assert!(dom.toggle_class(&cell, "open"));
		assert!(dom.has_class(&cell, "open"));
		holder.remove();
	}

	#[wasm_bindgen_test]
	fn test_listen_and_unlisten() {
		let dom = WebDom::new().unwrap();
		let holder = mount(&dom, r#"<button id="wasm-btn">go</button>"#);
		let button = dom.get_by_id("wasm-btn").unwrap();
		let calls = Rc::new(Cell::new(0));
		let sink = Rc::clone(&calls);

		let id = dom.listen(
			&ListenTarget::Node(button.clone()),
			EventKind::Click,
			listener(move |_| sink.set(sink.get() + 1)),
		);
		click(&button);
		assert_eq!(calls.get(), 1);

		assert!(dom.unlisten(id));
		click(&button);
		assert_eq!(calls.get(), 1);
		holder.remove();
	}

	#[wasm_bindgen_test]
	fn test_controller_counts_live_checkboxes() {
		let dom = Rc::new(WebDom::new().unwrap());
		let holder = mount(
			&dom,
			r#"<div id="wasm-orders" data-controller="tableaux">
				<span class="count"></span>
				<input type="hidden" name="selected_ids">
				<table><tr data-pk="7"><td><input type="checkbox" name="select-checkbox" value="7" id="wasm-c7"></td></tr></table>
			</div>"#,
		);
		let container = dom.get_by_id("wasm-orders").unwrap();
		let controller = TableController::new(
			Rc::clone(&dom),
			Rc::new(RecordingTransport::new()),
			Rc::new(BreakpointService::new(BreakpointTable::default(), 1024)),
			container,
			Rc::new(Settings::default()),
		);

		click(&dom.get_by_id("wasm-c7").unwrap());

		assert_eq!(controller.selection().hidden_value(), "7");
		controller.destroy();
		assert_eq!(dom.listener_count(), 0);
		holder.remove();
	}
}
