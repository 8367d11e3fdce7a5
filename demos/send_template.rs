//! Sends a template to a single recipient and prints the guest signing link.
//!
//! Reads `ZOHO_CLIENT_ID`, `ZOHO_CLIENT_SECRET`, and `ZOHO_REFRESH_TOKEN` from the environment
//! and takes `<template_id> <recipient_email> <recipient_name> [role]` as arguments.

// std
use std::{env, sync::Arc};
// crates.io
use color_eyre::{Result, eyre::eyre};
// self
use zoho_sign_api::{cache::MemoryCache, client::ZohoSign};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let mut args = env::args().skip(1);
	let (Some(template_id), Some(email), Some(name)) = (args.next(), args.next(), args.next())
	else {
		return Err(eyre!("usage: send_template <template_id> <email> <name> [role]"));
	};
	let role = args.next();
	let client = ZohoSign::builder(env::var("ZOHO_CLIENT_ID")?, env::var("ZOHO_CLIENT_SECRET")?)
		.refresh_token(env::var("ZOHO_REFRESH_TOKEN")?)
		.cache(Arc::new(MemoryCache::default()))
		.build()?;
	let template = client.templates().get(&template_id).await?;

	println!(
		"Template `{}` has {} action(s) and {} document(s).",
		template.name().unwrap_or("<unnamed>"),
		template.actions().len(),
		template.document_ids().len()
	);

	let mut signing = template.send_for_signing().to_email(email).to_name(name);

	if let Some(role) = role {
		signing = signing.to_role(role);
	}

	let request = signing.send().await?;

	println!(
		"Request {} is {}.",
		request.id().unwrap_or_default(),
		request.status().unwrap_or("unknown")
	);

	if request.sign_id().is_some() {
		println!("Sign URL: {}", request.sign_url("en")?);
	}

	Ok(())
}
