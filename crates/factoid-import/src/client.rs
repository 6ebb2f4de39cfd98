//! Async HTTP client for posting facts to a running Factoid server.

use std::time::Duration;

use anyhow::{Context as _, Result, anyhow};
use reqwest::{Client, header::AUTHORIZATION};
use serde::Serialize;

use crate::records::Record;

#[derive(Serialize)]
struct CreateBody<'a> {
  content: &'a str,
  source:  &'a str,
}

/// Posts records to `<addr>/facts`, sending `auth` verbatim as the
/// `Authorization` header.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ImportClient {
  client: Client,
  url:    String,
  auth:   String,
}

impl ImportClient {
  pub fn new(addr: &str, auth: impl Into<String>) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self {
      client,
      url: format!("{}/facts", addr.trim_end_matches('/')),
      auth: auth.into(),
    })
  }

  /// `POST <addr>/facts`. Returns the response body on success; a non-2xx
  /// status is an error carrying the body.
  pub async fn create(&self, record: &Record) -> Result<String> {
    let resp = self
      .client
      .post(&self.url)
      .header(AUTHORIZATION, &self.auth)
      .json(&CreateBody { content: &record.content, source: &record.source })
      .send()
      .await
      .with_context(|| format!("POST {} failed", self.url))?;

    let status = resp.status();
    let body = resp.text().await.context("reading response body")?;
    if !status.is_success() {
      return Err(anyhow!("POST {} returned {status}: {}", self.url, body.trim_end()));
    }
    Ok(body)
  }
}
