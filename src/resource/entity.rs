// self
use crate::{
	_prelude::*,
	gateway::ApiPayload,
	http::HttpMethod,
	resource::{PropertyListOptions, ResourceDescriptor, ResourceModule},
};

/// A record returned by a [`ResourceModule`].
///
/// Attributes keep the order of the response. Record-level calls delegate to the owning module
/// with this record's id; they fail with [`Error::EntityNotPersisted`] while the record is new.
#[derive(Clone)]
pub struct Entity {
	attributes: JsonMap<String, JsonValue>,
	kind: Arc<ResourceDescriptor>,
	module: ResourceModule,
}
impl Entity {
	/// Wraps `attributes` as a record of `kind` owned by `module`.
	pub fn new(
		attributes: JsonMap<String, JsonValue>,
		kind: Arc<ResourceDescriptor>,
		module: ResourceModule,
	) -> Self {
		Self { attributes, kind, module }
	}

	/// Descriptor of this record's type.
	pub fn kind(&self) -> &Arc<ResourceDescriptor> {
		&self.kind
	}

	/// Module the record delegates to.
	pub fn module(&self) -> &ResourceModule {
		&self.module
	}

	/// Reads an attribute.
	pub fn get(&self, name: &str) -> Option<&JsonValue> {
		self.attributes.get(name)
	}

	/// Reads a string attribute.
	pub fn get_str(&self, name: &str) -> Option<&str> {
		self.get(name).and_then(JsonValue::as_str)
	}

	/// Writes an attribute. The identity attribute is read-only.
	pub fn set(&mut self, name: impl Into<String>, value: impl Into<JsonValue>) -> Result<()> {
		let name = name.into();

		if name == self.kind.identity_key() {
			return Err(Error::ImmutableIdentity { key: name });
		}

		self.attributes.insert(name, value.into());

		Ok(())
	}

	/// Record id, read from the `<singular>_id` attribute.
	///
	/// Numeric ids are rendered as text; null and empty values count as absent.
	pub fn id(&self) -> Option<String> {
		match self.attributes.get(self.kind.identity_key())? {
			JsonValue::String(id) if !id.is_empty() => Some(id.clone()),
			JsonValue::Number(id) => Some(id.to_string()),
			_ => None,
		}
	}

	/// Returns true until the record has been created remotely.
	pub fn is_new(&self) -> bool {
		self.id().is_none()
	}

	/// All attributes.
	pub fn attributes(&self) -> &JsonMap<String, JsonValue> {
		&self.attributes
	}

	/// Consumes the record, returning its attributes.
	pub fn into_attributes(self) -> JsonMap<String, JsonValue> {
		self.attributes
	}

	/// Re-reads the record and replaces the local attributes.
	pub async fn reload(&mut self) -> Result<()> {
		let id = self.persisted_id()?;
		let fresh = self.module.get(&id, &[]).await?.into_entity()?;

		self.attributes = fresh.attributes;

		Ok(())
	}

	/// Updates the record remotely with `data` and adopts the returned attributes.
	pub async fn update(&mut self, data: &JsonValue, extra: &[(String, String)]) -> Result<()> {
		let id = self.persisted_id()?;
		let updated = self.module.update(&id, data, extra).await?;

		self.attributes = updated.attributes;

		Ok(())
	}

	/// Creates the record when new, otherwise updates it, sending the attributes wrapped in the
	/// plural envelope key.
	pub async fn save(&mut self) -> Result<()> {
		let mut envelope = JsonMap::new();

		envelope
			.insert(self.kind.list_key().to_owned(), JsonValue::Object(self.attributes.clone()));

		let body = JsonValue::Object(envelope);
		let saved = match self.id() {
			None => self.module.create(&body, &[]).await?,
			Some(id) => self.module.update(&id, &body, &[]).await?,
		};

		self.attributes = saved.attributes;

		Ok(())
	}

	/// Deletes the record.
	pub async fn delete(&self) -> Result<()> {
		self.module.delete(&self.persisted_id()?).await
	}

	/// Sets the record's `key` (default `status`) to `status`.
	pub async fn mark_as(&self, status: &str, key: Option<&str>) -> Result<()> {
		self.module.mark_as(&self.persisted_id()?, status, key).await
	}

	/// Posts `action` for this record.
	pub async fn do_action(
		&self,
		action: &str,
		data: Option<&JsonValue>,
		extra: &[(String, String)],
	) -> Result<()> {
		self.module.do_action(&self.persisted_id()?, action, data, extra).await
	}

	/// Calls `action` for this record with `method`.
	pub async fn custom_action(
		&self,
		action: &str,
		data: Option<&JsonValue>,
		extra: &[(String, String)],
		method: HttpMethod,
	) -> Result<ApiPayload> {
		self.module.custom_action(&self.persisted_id()?, action, data, extra, method).await
	}

	/// Lists a sub-resource of this record.
	pub async fn property_list(
		&self,
		property: &str,
		options: PropertyListOptions,
	) -> Result<IndexMap<String, Entity>> {
		let options = PropertyListOptions { id: Some(self.persisted_id()?), ..options };

		self.module.property_list(property, options).await
	}

	pub(crate) fn persisted_id(&self) -> Result<String> {
		self.id()
			.ok_or_else(|| Error::EntityNotPersisted { kind: self.kind.singular().to_owned() })
	}
}
impl Debug for Entity {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Entity")
			.field("kind", &self.kind.singular())
			.field("attributes", &self.attributes)
			.finish()
	}
}
impl Serialize for Entity {
	fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
	where
		S: serde::Serializer,
	{
		self.attributes.serialize(serializer)
	}
}
