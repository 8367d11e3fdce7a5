//! One-time bootstrap: turns a grant code into a cached refresh token.
//!
//! The example prints the consent URL, waits for the redirect URL to be pasted back, exchanges
//! the embedded grant code, and stores both tokens in a JSON file cache so later runs (see
//! `send_template`) start without operator interaction.

// std
use std::{
	io::{self, Write},
	sync::Arc,
};
// crates.io
use color_eyre::{Result, eyre::eyre};
// self
use zoho_sign_api::{
	cache::{FileCache, TokenCache},
	client::ZohoSign,
	gateway::PageContext,
	url::Url,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let client_id = prompt("Enter your Zoho client ID", None)?;
	let client_secret = prompt("Enter your Zoho client secret", None)?;
	let redirect_uri = prompt(
		"Enter the redirect URI registered with Zoho",
		Some("https://app.example.com/zoho/callback"),
	)?;
	let cache_path = prompt("Token cache file", Some("zoho-sign-tokens.json"))?;
	let cache: Arc<dyn TokenCache> = Arc::new(FileCache::open(&cache_path)?);
	let client = ZohoSign::builder(client_id, client_secret).cache(cache).build()?;

	println!("Consent URL: {}", client.grant_code_consent_url(&redirect_uri)?);
	println!("After Zoho redirects back, paste the full redirect URL here.");

	let redirected = Url::parse(&prompt("Redirect URL", None)?)?;
	let code = ZohoSign::parse_grant_code_from_url(&redirected)
		.ok_or_else(|| eyre!("The redirect URL carries no `code` parameter."))?;

	client.set_grant_code(code);

	let refresh_token = client.credentials().generate_refresh_token().await?;

	println!("Refresh token cached in {cache_path} ({} characters).", refresh_token.expose().len());

	let templates = client.templates().list(&PageContext::default().row_count(5)).await?;

	for (id, template) in &templates {
		println!("Template {id}: {}", template.name().unwrap_or("<unnamed>"));
	}

	Ok(())
}

fn prompt(message: &str, default: Option<&str>) -> Result<String> {
	loop {
		if let Some(value) = default {
			print!("{message} [{value}]: ");
		} else {
			print!("{message}: ");
		}

		io::stdout().flush()?;

		let mut input = String::new();

		io::stdin().read_line(&mut input)?;

		let trimmed = input.trim();

		if !trimmed.is_empty() {
			return Ok(trimmed.to_owned());
		}
		if let Some(value) = default {
			return Ok(value.to_owned());
		}
	}
}
