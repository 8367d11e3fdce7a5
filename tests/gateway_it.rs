#![cfg(feature = "reqwest")]

// self
use zoho_sign_api::{
	_preludet::*,
	client::ZohoSign,
	error::TransportError,
	gateway::PageContext,
	http::{ApiHttpClient, ApiRequest, ApiResponse, HttpFuture, HttpMethod},
};

const TOKEN_BODY: &str = "{\"access_token\":\"1000.fake\",\"expires_in_sec\":3600}";
const TEMPLATE_BODY: &str =
	"{\"code\":0,\"template\":{\"template_id\":\"1\"},\"templates\":[{\"template_id\":\"1\"}]}";

#[derive(Clone, Default)]
struct RecordingTransport {
	requests: Arc<Mutex<Vec<ApiRequest>>>,
}
impl RecordingTransport {
	fn api_requests(&self) -> Vec<ApiRequest> {
		self.requests
			.lock()
			.iter()
			.filter(|request| request.url.path().starts_with("/api/v1/"))
			.cloned()
			.collect()
	}

	fn token_requests(&self) -> usize {
		self.requests
			.lock()
			.iter()
			.filter(|request| request.url.path() == "/oauth/v2/token")
			.count()
	}
}
impl ApiHttpClient for RecordingTransport {
	fn execute(&self, request: ApiRequest) -> HttpFuture<'_> {
		let body = if request.url.path() == "/oauth/v2/token" { TOKEN_BODY } else { TEMPLATE_BODY };

		self.requests.lock().push(request);

		Box::pin(async move { Ok::<_, TransportError>(ApiResponse::new(200, body)) })
	}
}

fn client(transport: &RecordingTransport) -> ZohoSign {
	ZohoSign::builder("client-fake", "secret-fake")
		.config(test_service_config("https://sign.test"))
		.http_client(transport.clone())
		.refresh_token("1000.refresh")
		.build()
		.expect("Client should build with the recording transport.")
}

#[tokio::test]
async fn mutations_send_json_data_and_extra_fields() {
	let transport = RecordingTransport::default();
	let client = client(&transport);

	client
		.templates()
		.create(
			&serde_json::json!({"templates": {"template_name": "Lease"}}),
			&[("is_quicksend".into(), "true".into())],
		)
		.await
		.expect("Create should succeed.");

	let requests = transport.api_requests();
	let request = requests.last().expect("An API request should be recorded.");

	assert_eq!(request.method, HttpMethod::Post);
	assert_eq!(request.form_value("data"), Some("{\"templates\":{\"template_name\":\"Lease\"}}"));
	assert_eq!(request.form_value("is_quicksend"), Some("true"));
	assert_eq!(
		request.authorization.as_ref().map(|value| value.expose()),
		Some("Zoho-oauthtoken 1000.fake")
	);
}

#[tokio::test]
async fn bodiless_mutations_send_an_empty_object() {
	let transport = RecordingTransport::default();

	client(&transport).requests().mark_as("9", "completed", None).await.expect("Mark should work.");

	let requests = transport.api_requests();

	assert_eq!(requests[0].url.path(), "/api/v1/requests/9/status/completed");
	assert_eq!(requests[0].form_value("data"), Some("{}"));
}

#[tokio::test]
async fn reads_carry_no_form_body() {
	let transport = RecordingTransport::default();
	let client = client(&transport);

	client.templates().list(&PageContext::default().row_count(50)).await.expect("List works.");

	let requests = transport.api_requests();
	let list = &requests[0];
	let data = list
		.url
		.query_pairs()
		.find(|(key, _)| key == "data")
		.map(|(_, value)| value.into_owned())
		.expect("List calls should carry the page context.");

	assert_eq!(list.method, HttpMethod::Get);
	assert!(list.form.is_empty());
	assert!(data.contains("\"row_count\":50"));
}

#[tokio::test]
async fn token_requests_post_client_credentials() {
	let transport = RecordingTransport::default();

	client(&transport).credentials().generate_access_token().await.expect("Mint should work.");

	let requests = transport.requests.lock();
	let token = &requests[0];

	assert_eq!(token.method, HttpMethod::Post);
	assert!(token.authorization.is_none());
	assert_eq!(token.form_value("grant_type"), Some("refresh_token"));
	assert_eq!(token.form_value("refresh_token"), Some("1000.refresh"));
	assert_eq!(token.form_value("client_id"), Some("client-fake"));
	assert_eq!(token.form_value("client_secret"), Some("secret-fake"));
}

#[tokio::test]
async fn grant_code_exchange_posts_state_and_scopes() {
	let transport = RecordingTransport::default();
	let client = ZohoSign::builder("client-fake", "secret-fake")
		.config(test_service_config("https://sign.test"))
		.http_client(transport.clone())
		.grant_code("1000.grant")
		.build()
		.expect("Client should build with the recording transport.");

	// The canned token body has no refresh token, so the exchange itself fails.
	let err = client
		.credentials()
		.generate_refresh_token()
		.await
		.expect_err("A response without refresh_token should be rejected.");

	assert!(matches!(err, Error::Api { ref message, .. } if message.contains("refresh_token")));

	let requests = transport.requests.lock();
	let exchange = &requests[0];

	assert_eq!(exchange.form_value("grant_type"), Some("authorization_code"));
	assert_eq!(exchange.form_value("code"), Some("1000.grant"));
	assert_eq!(exchange.form_value("state"), Some("zoho-sign-api"));
	assert_eq!(
		exchange.form_value("scope"),
		Some("ZohoSign.documents.all,ZohoSign.templates.all,ZohoSign.account.all")
	);
}

#[tokio::test]
async fn every_call_resolves_a_token_without_cache() {
	let transport = RecordingTransport::default();
	let client = client(&transport);

	client.templates().delete("1").await.expect("Delete should succeed.");
	client.templates().delete("2").await.expect("Delete should succeed.");

	assert_eq!(transport.token_requests(), 2);
	assert_eq!(transport.api_requests().len(), 2);
}
