//! CSRF token lookup for inline-edit commits
//!
//! Committing an inline edit is a POST back to the page URL, which Django
//! rejects without a CSRF token. The token is looked up through the [`Dom`]
//! in this order:
//!
//! 1. **Cookie**: the `csrftoken` cookie set by Django
//! 2. **Meta tag**: `<meta name="csrf-token" content="...">`
//! 3. **Hidden input**: `<input name="csrfmiddlewaretoken">` in any form
//!
//! ## Usage
//!
//! ```ignore
//! use tableaux_pages::csrf::csrf_header;
//!
//! if let Some((name, token)) = csrf_header(&*dom) {
//!     request = request.header(name, token);
//! }
//! ```

use crate::dom::{Dom, Selector};

/// The cookie name used by Django for CSRF tokens.
pub const CSRF_COOKIE_NAME: &str = "csrftoken";

/// The meta tag name for CSRF tokens.
pub const CSRF_META_NAME: &str = "csrf-token";

/// The header name used to send CSRF tokens in AJAX requests.
pub const CSRF_HEADER_NAME: &str = "X-CSRFToken";

/// The form field name for CSRF tokens.
pub const CSRF_FORM_FIELD: &str = "csrfmiddlewaretoken";

/// Finds the CSRF token, trying the cookie, the meta tag and then a hidden
/// form input. Empty values are skipped.
pub fn csrf_token<D: Dom>(dom: &D) -> Option<String> {
	token_from_cookie(dom)
		.or_else(|| token_from_meta(dom))
		.or_else(|| token_from_input(dom))
}

/// `(header name, token)` for a POST, if a token is available.
pub fn csrf_header<D: Dom>(dom: &D) -> Option<(&'static str, String)> {
	csrf_token(dom).map(|token| (CSRF_HEADER_NAME, token))
}

fn token_from_cookie<D: Dom>(dom: &D) -> Option<String> {
	parse_cookie_value(&dom.cookie(), CSRF_COOKIE_NAME).filter(|token| !token.is_empty())
}

fn token_from_meta<D: Dom>(dom: &D) -> Option<String> {
	let body = dom.body()?;
	let root = dom.parent(&body).unwrap_or(body);
	let selector = Selector::all([Selector::tag("meta"), Selector::name(CSRF_META_NAME)]);
	let meta = dom.query(&root, &selector)?;
	dom.attribute(&meta, "content").filter(|token| !token.is_empty())
}

fn token_from_input<D: Dom>(dom: &D) -> Option<String> {
	let body = dom.body()?;
	let selector = Selector::all([Selector::tag("input"), Selector::name(CSRF_FORM_FIELD)]);
	let input = dom.query(&body, &selector)?;
	Some(dom.value(&input)).filter(|token| !token.is_empty())
}

/// Parses a cookie value from a cookie string.
///
/// The cookie string format is: "name1=value1; name2=value2; ..."
pub fn parse_cookie_value(cookie_str: &str, name: &str) -> Option<String> {
	cookie_str
		.split(';')
		.filter_map(|part| part.trim().split_once('='))
		.find(|(key, _)| key.trim() == name)
		.map(|(_, value)| value.trim().to_string())
}
