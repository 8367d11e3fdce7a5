// self
use crate::{
	_prelude::*,
	gateway::{ApiPayload, Gateway, PageContext},
	http::HttpMethod,
	resource::{Entity, ResourceDescriptor, inflect},
};

/// Attribute segment used by [`ResourceModule::mark_as`] when no key is given.
pub const DEFAULT_MARK_KEY: &str = "status";

/// Result of [`ResourceModule::get`].
#[derive(Clone, Debug)]
pub enum Fetched {
	/// Record unwrapped from the plural envelope key.
	Entity(Entity),
	/// Non-JSON body (for example a PDF), returned untouched.
	Raw(Vec<u8>),
}
impl Fetched {
	/// Returns the entity or an error for raw payloads.
	pub fn into_entity(self) -> Result<Entity> {
		match self {
			Fetched::Entity(entity) => Ok(entity),
			Fetched::Raw(_) => Err(Error::unexpected_payload("expected a record, got a raw body")),
		}
	}
}

/// Overrides for [`ResourceModule::property_list`].
#[derive(Clone, Debug, Default)]
pub struct PropertyListOptions {
	/// Parent record; the list is read from `<path>/<id>/<property>` when set.
	pub id: Option<String>,
	/// Descriptor of the listed items (default: the singularized property name).
	pub descriptor: Option<ResourceDescriptor>,
	/// Envelope key holding the items (default: the property name).
	pub sub_property: Option<String>,
	/// Module owning the listed items (default: the calling module).
	pub module: Option<ResourceModule>,
}
impl PropertyListOptions {
	/// Lists the property of record `id`.
	pub fn for_record(id: impl Into<String>) -> Self {
		Self { id: Some(id.into()), ..Default::default() }
	}
}

/// Generic CRUD and action calls for one resource.
///
/// Cloning is cheap; clones share the gateway and descriptor.
#[derive(Clone)]
pub struct ResourceModule {
	gateway: Arc<Gateway>,
	descriptor: Arc<ResourceDescriptor>,
}
impl ResourceModule {
	/// Creates a module for `descriptor`.
	pub fn new(gateway: Arc<Gateway>, descriptor: Arc<ResourceDescriptor>) -> Self {
		Self { gateway, descriptor }
	}

	/// Descriptor of the records this module manages.
	pub fn descriptor(&self) -> &Arc<ResourceDescriptor> {
		&self.descriptor
	}

	/// Gateway used for every call.
	pub fn gateway(&self) -> &Arc<Gateway> {
		&self.gateway
	}

	/// Lists one page of records keyed by record id, in response order.
	///
	/// Records sharing an id collapse into the last one.
	pub async fn list(&self, page: &PageContext) -> Result<IndexMap<String, Entity>> {
		let envelope = self.gateway.get_list(self.descriptor.url_path(), page).await?;
		let records = take_envelope(envelope, self.descriptor.list_key())?;

		self.collect(records, &self.descriptor)
	}

	/// Fetches one record; non-JSON bodies come back as [`Fetched::Raw`].
	pub async fn get(&self, id: &str, query: &[(String, String)]) -> Result<Fetched> {
		match self.gateway.get(&self.descriptor.record_path(id), query).await? {
			ApiPayload::Raw(bytes) => Ok(Fetched::Raw(bytes)),
			ApiPayload::Json(envelope) => {
				let record = take_envelope(envelope, self.descriptor.list_key())?;

				Ok(Fetched::Entity(self.make(into_object(record, self.descriptor.list_key())?)))
			},
		}
	}

	/// Total number of records, read from the pagination metadata.
	pub async fn total(&self) -> Result<u64> {
		let envelope = self
			.gateway
			.get_list(self.descriptor.url_path(), &PageContext::pagination_only())
			.await?;
		let context = take_envelope(envelope, "page_context")?;

		context.get("total").and_then(as_count).ok_or_else(|| {
			Error::unexpected_payload("`page_context.total` is missing or not a number")
		})
	}

	/// Creates a record; the response is unwrapped from the singular envelope key.
	pub async fn create(&self, data: &JsonValue, extra: &[(String, String)]) -> Result<Entity> {
		let payload = self.gateway.post(self.descriptor.url_path(), Some(data), extra).await?;

		self.unwrap_item(payload)
	}

	/// Updates record `id`; the response is unwrapped from the singular envelope key.
	pub async fn update(
		&self,
		id: &str,
		data: &JsonValue,
		extra: &[(String, String)],
	) -> Result<Entity> {
		let payload = self.gateway.put(&self.descriptor.record_path(id), Some(data), extra).await?;

		self.unwrap_item(payload)
	}

	/// Deletes record `id`.
	pub async fn delete(&self, id: &str) -> Result<()> {
		self.gateway.delete(&self.descriptor.record_path(id)).await?;

		Ok(())
	}

	/// Posts to `<path>/<id>/<key>/<status>`; `key` defaults to [`DEFAULT_MARK_KEY`].
	pub async fn mark_as(&self, id: &str, status: &str, key: Option<&str>) -> Result<()> {
		let key = key.unwrap_or(DEFAULT_MARK_KEY);
		let path = format!("{}/{key}/{status}", self.descriptor.record_path(id));

		self.gateway.post(&path, None, &[]).await?;

		Ok(())
	}

	/// Posts `data` to `<path>/<id>/<action>`.
	pub async fn do_action(
		&self,
		id: &str,
		action: &str,
		data: Option<&JsonValue>,
		extra: &[(String, String)],
	) -> Result<()> {
		self.custom_action(id, action, data, extra, HttpMethod::Post).await?;

		Ok(())
	}

	/// Calls `<path>/<id>/<action>` and returns the processed payload.
	///
	/// `GET` and `DELETE` ignore `data` and `extra`.
	pub async fn custom_action(
		&self,
		id: &str,
		action: &str,
		data: Option<&JsonValue>,
		extra: &[(String, String)],
		method: HttpMethod,
	) -> Result<ApiPayload> {
		let path = format!("{}/{action}", self.descriptor.record_path(id));

		match method {
			HttpMethod::Get => self.gateway.get(&path, &[]).await,
			HttpMethod::Post => self.gateway.post(&path, data, extra).await,
			HttpMethod::Put => self.gateway.put(&path, data, extra).await,
			HttpMethod::Delete => self.gateway.delete(&path).await,
		}
	}

	/// Lists a sub-resource such as `templates/<id>/fields`.
	pub async fn property_list(
		&self,
		property: &str,
		options: PropertyListOptions,
	) -> Result<IndexMap<String, Entity>> {
		let PropertyListOptions { id, descriptor, sub_property, module } = options;
		let descriptor = descriptor
			.unwrap_or_else(|| ResourceDescriptor::new(inflect::singularize(property)));
		let descriptor = Arc::new(descriptor);
		let owner = module.unwrap_or_else(|| self.clone());
		let path = match id {
			Some(id) => format!("{}/{property}", self.descriptor.record_path(&id)),
			None => format!("{}/{property}", self.descriptor.url_path()),
		};
		let envelope = self.gateway.get_list(&path, &PageContext::default()).await?;
		let records = take_envelope(envelope, sub_property.as_deref().unwrap_or(property))?;

		owner.collect(records, &descriptor)
	}

	/// Wraps `attributes` as an entity of this module.
	pub fn make(&self, attributes: JsonMap<String, JsonValue>) -> Entity {
		Entity::new(attributes, self.descriptor.clone(), self.clone())
	}

	fn unwrap_item(&self, payload: ApiPayload) -> Result<Entity> {
		let key = self.descriptor.item_key();
		let record = take_envelope(payload.into_json()?, key)?;

		Ok(self.make(into_object(record, key)?))
	}

	fn collect(
		&self,
		records: JsonValue,
		descriptor: &Arc<ResourceDescriptor>,
	) -> Result<IndexMap<String, Entity>> {
		let JsonValue::Array(items) = records else {
			return Err(Error::unexpected_payload(format!(
				"`{}` is not a list of records",
				descriptor.list_key()
			)));
		};
		let mut entities = IndexMap::with_capacity(items.len());

		for item in items {
			let attributes = into_object(item, descriptor.list_key())?;
			let entity = Entity::new(attributes, descriptor.clone(), self.clone());

			entities.insert(entity.id().unwrap_or_default(), entity);
		}

		Ok(entities)
	}
}
impl Debug for ResourceModule {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ResourceModule").field("descriptor", &self.descriptor).finish()
	}
}

/// Removes `key` from an envelope; a remote `message` becomes an [`Error::remote`] when it is
/// absent.
pub(crate) fn take_envelope(
	mut envelope: JsonMap<String, JsonValue>,
	key: &str,
) -> Result<JsonValue> {
	if let Some(value) = envelope.remove(key) {
		return Ok(value);
	}

	match envelope.get("message").and_then(JsonValue::as_str) {
		Some(message) => Err(Error::remote(message, None)),
		None => Err(Error::unexpected_payload(format!("response has no `{key}` field"))),
	}
}

pub(crate) fn into_object(value: JsonValue, key: &str) -> Result<JsonMap<String, JsonValue>> {
	match value {
		JsonValue::Object(map) => Ok(map),
		_ => Err(Error::unexpected_payload(format!("`{key}` holds a non-object record"))),
	}
}

fn as_count(value: &JsonValue) -> Option<u64> {
	match value {
		JsonValue::Number(number) => number.as_u64(),
		JsonValue::String(text) => text.parse().ok(),
		_ => None,
	}
}
