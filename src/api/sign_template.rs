//! Creating a signing request from a template.

// self
use crate::{
	_prelude::*,
	api::{Request, Template},
	resource::{self, ResourceDescriptor, ResourceModule},
};

/// How the recipient proves their identity before signing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum VerificationType {
	/// One-time code sent by email.
	#[default]
	Email,
	/// One-time code sent by SMS.
	Sms,
}
impl VerificationType {
	/// Returns the wire value.
	pub const fn as_str(self) -> &'static str {
		match self {
			VerificationType::Email => "EMAIL",
			VerificationType::Sms => "SMS",
		}
	}
}

/// Builder that turns a [`Template`] into a signing request.
///
/// Every template action whose `role` matches [`SignTemplate::to_role`] (or every action when no
/// role is set) is addressed to the configured recipient; its pre-filled `fields` are dropped.
#[derive(Clone, Debug)]
pub struct SignTemplate {
	template: Template,
	role: Option<String>,
	name: Option<String>,
	email: Option<String>,
	phone: Option<String>,
	country_code: Option<String>,
	verification: Option<VerificationType>,
}
impl SignTemplate {
	/// Starts a request for `template`.
	pub fn new(template: Template) -> Self {
		Self {
			template,
			role: None,
			name: None,
			email: None,
			phone: None,
			country_code: None,
			verification: None,
		}
	}

	/// Restricts the recipient to actions with this role.
	pub fn to_role(mut self, role: impl Into<String>) -> Self {
		self.role = Some(role.into());

		self
	}

	/// Recipient email.
	pub fn to_email(mut self, email: impl Into<String>) -> Self {
		self.email = Some(email.into());

		self
	}

	/// Recipient phone number, sent with identity verification.
	pub fn to_phone(mut self, phone: impl Into<String>) -> Self {
		self.phone = Some(phone.into());

		self
	}

	/// Recipient phone country code, sent with identity verification.
	pub fn to_country_code(mut self, code: impl Into<String>) -> Self {
		self.country_code = Some(code.into());

		self
	}

	/// Recipient display name.
	pub fn to_name(mut self, name: impl Into<String>) -> Self {
		self.name = Some(name.into());

		self
	}

	/// Requires email verification before signing.
	pub fn verify_via_email(self) -> Self {
		self.verify_via(VerificationType::Email)
	}

	/// Requires verification of the given type before signing.
	pub fn verify_via(mut self, verification: VerificationType) -> Self {
		self.verification = Some(verification);

		self
	}

	/// Actions as they will be sent.
	pub fn actions(&self) -> Vec<JsonValue> {
		self.template
			.actions()
			.iter()
			.cloned()
			.map(|mut action| {
				if let JsonValue::Object(fields) = &mut action
					&& self.addresses(fields)
				{
					self.address(fields);
				}

				action
			})
			.collect()
	}

	/// Posts `templates/<id>/createdocument` and returns the created request.
	pub async fn send(&self) -> Result<Request> {
		let template_id = self.template.persisted_id()?;
		let module = self.template.module();
		let path = format!("{}/createdocument", module.descriptor().record_path(&template_id));
		let body = serde_json::json!({ "templates": { "actions": self.actions() } });
		let envelope = module.gateway().post(&path, Some(&body), &[]).await?.into_json()?;
		let descriptor = Arc::new(ResourceDescriptor::new("Requests"));
		let requests = ResourceModule::new(module.gateway().clone(), descriptor);
		let key = requests.descriptor().list_key().to_owned();
		let record = resource::take_envelope(envelope, &key)?;

		Ok(Request::new(requests.make(resource::into_object(record, &key)?)))
	}

	fn addresses(&self, action: &JsonMap<String, JsonValue>) -> bool {
		match &self.role {
			None => true,
			Some(role) => action.get("role").and_then(JsonValue::as_str) == Some(role.as_str()),
		}
	}

	fn address(&self, action: &mut JsonMap<String, JsonValue>) {
		action.remove("fields");
		action.insert("recipient_name".into(), self.name.clone().into());
		action.insert("recipient_email".into(), self.email.clone().into());

		if let Some(verification) = self.verification {
			action.insert("verify_recipient".into(), true.into());
			action.insert("verification_type".into(), verification.as_str().into());
			action.insert("recipient_phonenumber".into(), self.phone.clone().into());
			action.insert("recipient_countrycode".into(), self.country_code.clone().into());
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{
		config::ServiceConfig,
		error::TransportError,
		flows::CredentialManager,
		gateway::Gateway,
		http::{ApiHttpClient, ApiRequest, HttpFuture},
	};

	struct OfflineTransport;
	impl ApiHttpClient for OfflineTransport {
		fn execute(&self, _: ApiRequest) -> HttpFuture<'_> {
			Box::pin(async { Err(TransportError::Io(std::io::Error::other("offline"))) })
		}
	}

	fn template() -> Template {
		let http: Arc<dyn ApiHttpClient> = Arc::new(OfflineTransport);
		let config = Arc::new(ServiceConfig::default());
		let credentials = CredentialManager::new("client", "secret", config, http.clone());
		let gateway = Arc::new(Gateway::new(http, Arc::new(credentials)));
		let module = ResourceModule::new(gateway, Arc::new(ResourceDescriptor::new("Templates")));
		let serde_json::Value::Object(attributes) = serde_json::json!({
			"template_id": "3000",
			"actions": [
				{"action_id": "1", "role": "Client", "fields": [{"field_name": "Name"}]},
				{"action_id": "2", "role": "Witness", "fields": []}
			]
		}) else {
			unreachable!();
		};

		Template::new(module.make(attributes))
	}

	#[test]
	fn role_filter_addresses_matching_actions_only() {
		let actions = template()
			.send_for_signing()
			.to_role("Client")
			.to_name("Ada")
			.to_email("ada@example.com")
			.actions();

		assert_eq!(actions[0]["recipient_email"], "ada@example.com");
		assert_eq!(actions[0]["recipient_name"], "Ada");
		assert!(actions[0].get("fields").is_none());
		assert!(actions[1].get("recipient_email").is_none());
		assert!(actions[1].get("fields").is_some());
	}

	#[test]
	fn verification_adds_phone_details_to_every_action() {
		let actions = template()
			.send_for_signing()
			.to_email("ada@example.com")
			.to_phone("5550100")
			.to_country_code("+1")
			.verify_via_email()
			.actions();

		for action in &actions {
			assert_eq!(action["verify_recipient"], true);
			assert_eq!(action["verification_type"], "EMAIL");
			assert_eq!(action["recipient_phonenumber"], "5550100");
			assert_eq!(action["recipient_countrycode"], "+1");
		}
	}
}
