//! Convention-driven resource mapping.
//!
//! A resource is described only by its type name. Everything else is derived by inflection:
//! the REST path and list envelope key use the plural form, create/update envelopes and the
//! identity attribute use the singular form. The same [`ResourceModule`] therefore backs every
//! resource without per-resource code.

/// Record wrapper delegating follow-up calls to its module.
pub mod entity;
/// Singular/plural inflection.
pub mod inflect;
/// Generic list/get/create/update/delete operations.
pub mod module;

pub use entity::*;
pub use module::*;

// self
use crate::_prelude::*;

/// Names and keys derived from a resource type name.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ResourceDescriptor {
	type_name: String,
	singular: String,
	plural: String,
	url_path: String,
	identity_key: String,
}
impl ResourceDescriptor {
	/// Describes the resource called `type_name`, given in singular or plural form.
	pub fn new(type_name: impl Into<String>) -> Self {
		let type_name = type_name.into();
		let singular = inflect::singularize(&type_name.to_lowercase());
		let plural = inflect::pluralize(&singular);
		let identity_key = format!("{singular}_id");

		Self { type_name, url_path: plural.clone(), singular, plural, identity_key }
	}

	/// Overrides the REST path, which otherwise equals the plural name.
	pub fn with_url_path(mut self, url_path: impl Into<String>) -> Self {
		self.url_path = url_path.into().trim_matches('/').to_owned();

		self
	}

	/// Type name as given.
	pub fn type_name(&self) -> &str {
		&self.type_name
	}

	/// Lowercase singular name.
	pub fn singular(&self) -> &str {
		&self.singular
	}

	/// Lowercase plural name.
	pub fn plural(&self) -> &str {
		&self.plural
	}

	/// REST path relative to the API base.
	pub fn url_path(&self) -> &str {
		&self.url_path
	}

	/// Envelope key of list and get responses.
	pub fn list_key(&self) -> &str {
		&self.plural
	}

	/// Envelope key of create and update responses.
	pub fn item_key(&self) -> &str {
		&self.singular
	}

	/// Attribute holding the record identifier (`<singular>_id`).
	pub fn identity_key(&self) -> &str {
		&self.identity_key
	}

	/// Path of a single record.
	pub fn record_path(&self, id: &str) -> String {
		format!("{}/{id}", self.url_path)
	}
}

/// Resource descriptors addressable by name.
#[derive(Clone, Debug)]
pub struct ResourceRegistry {
	descriptors: IndexMap<String, Arc<ResourceDescriptor>>,
}
impl ResourceRegistry {
	/// Creates an empty registry.
	pub fn empty() -> Self {
		Self { descriptors: IndexMap::new() }
	}

	/// Registers `descriptor` under its plural name, replacing any previous entry.
	pub fn register(&mut self, descriptor: ResourceDescriptor) -> Arc<ResourceDescriptor> {
		let descriptor = Arc::new(descriptor);

		self.descriptors.insert(descriptor.plural().to_owned(), descriptor.clone());

		descriptor
	}

	/// Looks up a descriptor by name, in singular or plural form and any case.
	pub fn get(&self, name: &str) -> Option<&Arc<ResourceDescriptor>> {
		let plural = inflect::pluralize(&inflect::singularize(&name.to_lowercase()));

		self.descriptors.get(&plural)
	}

	/// Registered plural names, in registration order.
	pub fn names(&self) -> impl Iterator<Item = &str> {
		self.descriptors.keys().map(String::as_str)
	}
}
impl Default for ResourceRegistry {
	fn default() -> Self {
		let mut registry = Self::empty();

		registry.register(ResourceDescriptor::new("Templates"));
		registry.register(ResourceDescriptor::new("Requests"));

		registry
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn keys_derive_from_the_type_name() {
		for name in ["Template", "Templates", "templates"] {
			let descriptor = ResourceDescriptor::new(name);

			assert_eq!(descriptor.url_path(), "templates");
			assert_eq!(descriptor.list_key(), "templates");
			assert_eq!(descriptor.item_key(), "template");
			assert_eq!(descriptor.identity_key(), "template_id");
		}
	}

	#[test]
	fn url_path_override_keeps_envelope_keys() {
		let descriptor = ResourceDescriptor::new("FieldTypes").with_url_path("/fieldtypes/");

		assert_eq!(descriptor.url_path(), "fieldtypes");
		assert_eq!(descriptor.list_key(), "fieldtypes");
		assert_eq!(descriptor.record_path("42"), "fieldtypes/42");
	}

	#[test]
	fn registry_resolves_any_form() {
		let registry = ResourceRegistry::default();

		assert_eq!(registry.names().collect::<Vec<_>>(), ["templates", "requests"]);
		assert!(registry.get("Request").is_some());
		assert!(registry.get("TEMPLATES").is_some());
		assert!(registry.get("folders").is_none());
	}
}
