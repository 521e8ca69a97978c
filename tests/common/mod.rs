//! Shared fixtures for the integration tests.

#![allow(dead_code)]

// std
use std::{collections::HashMap, sync::Arc, time::Duration as StdDuration};
// crates.io
use parking_lot::Mutex;
// self
use sas_broker::{
	error::Result,
	flows::CompletionRouter,
	http::{Completion, StaticEndpoint, Transport},
	sas::SasRequest,
	token::ResourceKey,
	url::Url,
};

/// Canned endpoint reply, delivered after `delay` on the Tokio runtime.
#[derive(Clone, Debug)]
pub struct Reply {
	pub status: Option<u16>,
	pub body: String,
	pub delay: StdDuration,
}
impl Reply {
	pub fn ok(body: impl Into<String>, delay_ms: u64) -> Self {
		Self { status: Some(200), body: body.into(), delay: StdDuration::from_millis(delay_ms) }
	}

	pub fn status(status: u16, body: impl Into<String>) -> Self {
		Self { status: Some(status), body: body.into(), delay: StdDuration::ZERO }
	}
}

/// Transport that answers from a per-resource script on spawned tasks.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
	replies: Mutex<HashMap<String, Reply>>,
	submitted: Mutex<Vec<SasRequest>>,
}
impl ScriptedTransport {
	pub fn script(&self, resource: &str, reply: Reply) {
		self.replies.lock().insert(resource.to_owned(), reply);
	}

	pub fn submitted(&self) -> Vec<SasRequest> {
		self.submitted.lock().clone()
	}
}
impl Transport for ScriptedTransport {
	fn submit(&self, request: SasRequest, router: CompletionRouter) -> Result<()> {
		let reply = self.replies.lock().get(request.resource.as_ref()).cloned().unwrap_or_else(
			|| Reply { status: None, body: "no scripted reply".into(), delay: StdDuration::ZERO },
		);
		let id = request.id.clone();

		self.submitted.lock().push(request);

		tokio::spawn(async move {
			tokio::time::sleep(reply.delay).await;

			let completion = match reply.status {
				Some(status) => Completion::from_status(id, status, reply.body),
				None => Completion::no_response(id, reply.body),
			};

			router.complete(completion);
		});

		Ok(())
	}
}

pub fn resource(value: &str) -> ResourceKey {
	ResourceKey::new(value).expect("Resource fixture should be valid.")
}

pub fn static_endpoint(raw: &str) -> StaticEndpoint {
	StaticEndpoint(Url::parse(raw).expect("Endpoint fixture should parse."))
}

pub fn structured_body(url: &str, valid_for: i64) -> String {
	format!("{{\"sasUrl\":\"{url}\",\"validFor\":{valid_for}}}")
}
