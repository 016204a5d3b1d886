//! Transport that records requests instead of sending them.

use std::cell::RefCell;

use tableaux_core::Result;

use super::{AjaxRequest, Transport};

/// Something a controller asked the transport to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sent {
	/// A partial update.
	Ajax(AjaxRequest),
	/// A full navigation to the URL.
	Navigate(String),
}

/// Keeps every request in order, for tests and dry runs.
#[derive(Debug, Default)]
pub struct RecordingTransport {
	sent: RefCell<Vec<Sent>>,
}

impl RecordingTransport {
	/// Creates an empty recorder.
	pub fn new() -> Self {
		Self::default()
	}

	/// Everything sent so far.
	pub fn sent(&self) -> Vec<Sent> {
		self.sent.borrow().clone()
	}

	/// Partial updates sent so far.
	pub fn requests(&self) -> Vec<AjaxRequest> {
		self.sent
			.borrow()
			.iter()
			.filter_map(|sent| match sent {
				Sent::Ajax(request) => Some(request.clone()),
				Sent::Navigate(_) => None,
			})
			.collect()
	}

	/// Navigations performed so far.
	pub fn navigations(&self) -> Vec<String> {
		self.sent
			.borrow()
			.iter()
			.filter_map(|sent| match sent {
				Sent::Navigate(url) => Some(url.clone()),
				Sent::Ajax(_) => None,
			})
			.collect()
	}

	/// Drains the log.
	pub fn take(&self) -> Vec<Sent> {
		self.sent.take()
	}

	/// Number of recorded entries.
	pub fn len(&self) -> usize {
		self.sent.borrow().len()
	}

	/// Whether nothing was recorded.
	pub fn is_empty(&self) -> bool {
		self.sent.borrow().is_empty()
	}
}

impl Transport for RecordingTransport {
	fn ajax(&self, request: AjaxRequest) -> Result<()> {
		self.sent.borrow_mut().push(Sent::Ajax(request));
		Ok(())
	}

	fn navigate(&self, url: &str) -> Result<()> {
		self.sent.borrow_mut().push(Sent::Navigate(url.to_string()));
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_records_in_order() {
		let transport = RecordingTransport::new();
		transport.ajax(AjaxRequest::get("/a")).unwrap();
		transport.navigate("/b").unwrap();

		assert_eq!(transport.len(), 2);
		assert_eq!(transport.requests()[0].url(), "/a");
		assert_eq!(transport.navigations(), vec!["/b".to_string()]);
		assert_eq!(
			transport.take(),
			vec![
				Sent::Ajax(AjaxRequest::get("/a")),
				Sent::Navigate("/b".to_string())
			]
		);
		assert!(transport.is_empty());
	}
}
