//! Signing requests and their documents.

// std
use std::ops::Deref;
// self
use crate::{
	_prelude::*,
	gateway::PageContext,
	resource::{Entity, ResourceModule},
};

/// The `requests` resource.
#[derive(Clone, Debug)]
pub struct Requests(ResourceModule);
impl Requests {
	/// Wraps a module whose descriptor is `requests`.
	pub fn new(module: ResourceModule) -> Self {
		Self(module)
	}

	/// Lists one page of requests keyed by `request_id`.
	pub async fn list(&self, page: &PageContext) -> Result<IndexMap<String, Request>> {
		let entities = self.0.list(page).await?;

		Ok(entities.into_iter().map(|(id, entity)| (id, Request(entity))).collect())
	}

	/// Fetches a request.
	pub async fn get(&self, id: &str) -> Result<Request> {
		Ok(Request(self.0.get(id, &[]).await?.into_entity()?))
	}

	/// Downloads the signed documents of request `id` (`requests/<id>/pdf`).
	pub async fn download(&self, id: &str) -> Result<Vec<u8>> {
		self.fetch(id, "pdf").await
	}

	/// Downloads the completion certificate of request `id`.
	pub async fn certificate(&self, id: &str) -> Result<Vec<u8>> {
		self.fetch(id, "completioncertificate").await
	}

	/// Downloads one document of request `id`.
	pub async fn pdf(&self, id: &str, document_id: &str) -> Result<Vec<u8>> {
		self.fetch(id, &format!("documents/{document_id}/pdf")).await
	}

	async fn fetch(&self, id: &str, suffix: &str) -> Result<Vec<u8>> {
		let path = format!("{}/{suffix}", self.0.descriptor().record_path(id));

		self.0.gateway().fetch_binary(&path).await
	}
}
impl Deref for Requests {
	type Target = ResourceModule;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

/// A signing request record.
#[derive(Clone, Debug, Serialize)]
#[serde(transparent)]
pub struct Request(Entity);
impl Request {
	/// Wraps a request entity.
	pub fn new(entity: Entity) -> Self {
		Self(entity)
	}

	/// Request name.
	pub fn name(&self) -> Option<&str> {
		self.0.get_str("request_name")
	}

	/// Request status (for example `inprogress` or `completed`).
	pub fn status(&self) -> Option<&str> {
		self.0.get_str("request_status")
	}

	/// Signing id used by the guest signing page.
	pub fn sign_id(&self) -> Option<&str> {
		self.0.get_str("sign_id")
	}

	/// Guest signing URL: `<guest_sign>?locale=<locale>&sign_id=<id>&action_type=SIGN`.
	pub fn sign_url(&self, locale: &str) -> Result<Url> {
		let sign_id =
			self.sign_id().ok_or_else(|| Error::unexpected_payload("request has no `sign_id`"))?;
		let mut url = self.0.module().gateway().credentials().config().endpoints.guest_sign.clone();

		url.query_pairs_mut()
			.append_pair("locale", locale)
			.append_pair("sign_id", sign_id)
			.append_pair("action_type", "SIGN");

		Ok(url)
	}

	/// Downloads the signed documents.
	pub async fn download(&self) -> Result<Vec<u8>> {
		self.requests().download(&self.0.persisted_id()?).await
	}

	/// Downloads the completion certificate.
	pub async fn certificate(&self) -> Result<Vec<u8>> {
		self.requests().certificate(&self.0.persisted_id()?).await
	}

	/// Downloads one document.
	pub async fn pdf(&self, document_id: &str) -> Result<Vec<u8>> {
		self.requests().pdf(&self.0.persisted_id()?, document_id).await
	}

	/// Consumes the request, returning the underlying entity.
	pub fn into_entity(self) -> Entity {
		self.0
	}

	fn requests(&self) -> Requests {
		Requests(self.0.module().clone())
	}
}
impl Deref for Request {
	type Target = Entity;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
