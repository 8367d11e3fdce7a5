//! Document templates.

// std
use std::ops::Deref;
// self
use crate::{
	_prelude::*,
	api::SignTemplate,
	gateway::PageContext,
	resource::{Entity, ResourceModule},
};

/// The `templates` resource.
#[derive(Clone, Debug)]
pub struct Templates(ResourceModule);
impl Templates {
	/// Wraps a module whose descriptor is `templates`.
	pub fn new(module: ResourceModule) -> Self {
		Self(module)
	}

	/// Lists one page of templates keyed by `template_id`.
	pub async fn list(&self, page: &PageContext) -> Result<IndexMap<String, Template>> {
		let entities = self.0.list(page).await?;

		Ok(entities.into_iter().map(|(id, entity)| (id, Template(entity))).collect())
	}

	/// Fetches a template with its actions and fields.
	pub async fn get(&self, id: &str) -> Result<Template> {
		Ok(Template(self.0.get(id, &[]).await?.into_entity()?))
	}
}
impl Deref for Templates {
	type Target = ResourceModule;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

/// A template record.
#[derive(Clone, Debug, Serialize)]
#[serde(transparent)]
pub struct Template(Entity);
impl Template {
	/// Wraps a template entity.
	pub fn new(entity: Entity) -> Self {
		Self(entity)
	}

	/// Template name.
	pub fn name(&self) -> Option<&str> {
		self.0.get_str("template_name")
	}

	/// Recipient actions declared by the template; empty when absent.
	pub fn actions(&self) -> &[JsonValue] {
		self.0
			.get("actions")
			.and_then(JsonValue::as_array)
			.map(Vec::as_slice)
			.unwrap_or_default()
	}

	/// Ids of the documents attached to the template.
	pub fn document_ids(&self) -> Vec<String> {
		self.0
			.get("document_ids")
			.and_then(JsonValue::as_array)
			.into_iter()
			.flatten()
			.filter_map(|document| document.get("document_id").and_then(JsonValue::as_str))
			.map(str::to_owned)
			.collect()
	}

	/// Starts a signing request built from this template.
	pub fn send_for_signing(&self) -> SignTemplate {
		SignTemplate::new(self.clone())
	}

	/// Consumes the template, returning the underlying entity.
	pub fn into_entity(self) -> Entity {
		self.0
	}
}
impl Deref for Template {
	type Target = Entity;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
