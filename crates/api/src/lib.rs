//! Rentals service API client.
//!
//! This module provides a lightweight client for the external rentals HTTP
//! service. It focuses on:
//!
//! - Constructing an HTTP client with sensible defaults
//! - Validating the configured base URL for safety
//! - Building requests with a consistent User-Agent and Accept headers
//! - The three rentals operations the admin screen needs
//!
//! The primary entry point is [`RentalsClient`]. Create an instance via
//! [`RentalsClient::from_config`]; the async operations are exposed through
//! the [`RentalsApi`] trait so callers can substitute a fake in tests.
//!
//! # Example
//!
//! ```ignore
//! use rentals_api::{RentalsApi, RentalsClient};
//! use rentals_util::AppConfig;
//!
//! async fn print_rentals() -> anyhow::Result<()> {
//!     let client = RentalsClient::from_config(&AppConfig::load()?)?;
//!     for rental in client.list_rentals().await? {
//!         println!("{} <{}>", rental.name, rental.email);
//!     }
//!     Ok(())
//! }
//! ```

use std::env;

use anyhow::{Context, Result, anyhow, bail};
use async_trait::async_trait;
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use rentals_types::{RentalEntity, RentalId, RentalPayload};
use rentals_util::AppConfig;
use reqwest::{Client, Method, RequestBuilder, Response, Url, header};
use tracing::debug;

/// Hostnames allowed to use plain HTTP.
const LOCALHOST_DOMAINS: &[&str] = &["localhost", "127.0.0.1"];

/// Collection path of the rentals resource.
pub const RENTALS_PATH: &str = "/rentals";

/// Characters escaped when an identifier is placed in a path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Async operations offered by the rentals service.
#[async_trait]
pub trait RentalsApi: Send + Sync {
    /// `GET /rentals`
    async fn list_rentals(&self) -> Result<Vec<RentalEntity>>;
    /// `POST /rentals`; returns the stored record when the service echoes it.
    async fn create_rental(&self, payload: &RentalPayload) -> Result<Option<RentalEntity>>;
    /// `PUT /rentals/{id}`; returns the stored record when the service echoes it.
    async fn update_rental(&self, id: &RentalId, payload: &RentalPayload) -> Result<Option<RentalEntity>>;
}

#[derive(Debug, Clone)]
/// Thin wrapper around a configured `reqwest::Client` for rentals access.
///
/// The client pre-configures default headers (including the bearer token when
/// one is configured) and builds requests against a validated base URL.
pub struct RentalsClient {
    pub base_url: String,
    pub http: Client,
    pub user_agent: String,
}

impl RentalsClient {
    /// Construct a [`RentalsClient`] from the loaded application config.
    ///
    /// The base URL must be HTTPS unless it points at localhost.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let base_url = config.api_base_url.trim().trim_end_matches('/').to_string();
        validate_base_url(&base_url)?;

        let mut default_headers = header::HeaderMap::new();
        if let Some(api_token) = config.api_token.as_deref() {
            let mut authorization = header::HeaderValue::from_str(&format!("Bearer {api_token}"))
                .context("api token contains characters not allowed in a header")?;
            authorization.set_sensitive(true);
            default_headers.insert(header::AUTHORIZATION, authorization);
        }
        default_headers.insert(header::ACCEPT, header::HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .default_headers(default_headers)
            .timeout(config.request_timeout())
            .build()
            .context("build http client")?;

        Ok(Self {
            base_url,
            http,
            user_agent: format!("rentals-tui/0.1; {}", env::consts::OS),
        })
    }

    /// Build a `reqwest::RequestBuilder` for a method and API-relative path.
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!(%method, %url, "building request");

        self.http.request(method, url).header(header::USER_AGENT, &self.user_agent)
    }
}

#[async_trait]
impl RentalsApi for RentalsClient {
    async fn list_rentals(&self) -> Result<Vec<RentalEntity>> {
        let response = self.request(Method::GET, RENTALS_PATH).send().await.context("list rentals")?;
        let response = ensure_success(response).await?;
        response.json::<Vec<RentalEntity>>().await.context("decode rentals list")
    }

    async fn create_rental(&self, payload: &RentalPayload) -> Result<Option<RentalEntity>> {
        let response = self
            .request(Method::POST, RENTALS_PATH)
            .json(payload)
            .send()
            .await
            .context("create rental")?;
        read_optional_rental(ensure_success(response).await?).await
    }

    async fn update_rental(&self, id: &RentalId, payload: &RentalPayload) -> Result<Option<RentalEntity>> {
        let response = self
            .request(Method::PUT, &rental_path(id))
            .json(payload)
            .send()
            .await
            .with_context(|| format!("update rental {id}"))?;
        read_optional_rental(ensure_success(response).await?).await
    }
}

/// API-relative path of a single rental, with the identifier escaped.
pub fn rental_path(id: &RentalId) -> String {
    format!("{}/{}", RENTALS_PATH, utf8_percent_encode(id.as_str(), PATH_SEGMENT))
}

async fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let detail = body.trim();
    if detail.is_empty() {
        bail!("rentals service responded with {status}");
    }
    bail!("rentals service responded with {status}: {detail}")
}

/// Decodes an echoed rental record; empty or unrecognized bodies yield `None`.
async fn read_optional_rental(response: Response) -> Result<Option<RentalEntity>> {
    let body = response.text().await.context("read response body")?;
    if body.trim().is_empty() {
        return Ok(None);
    }
    match serde_json::from_str::<RentalEntity>(&body) {
        Ok(rental) => Ok(Some(rental)),
        Err(error) => {
            debug!(%error, "response body is not a rental record");
            Ok(None)
        }
    }
}

/// Validate that a base URL is acceptable for use by the client.
///
/// Rules:
/// - `localhost` or `127.0.0.1`: any scheme is allowed
/// - otherwise: scheme must be HTTPS
pub fn validate_base_url(base: &str) -> Result<()> {
    let parsed_base_url = Url::parse(base).map_err(|e| anyhow!("Invalid rentals API base URL '{}': {}", base, e))?;

    let host_name = parsed_base_url
        .host_str()
        .ok_or_else(|| anyhow!("rentals API base URL must include a host"))?;

    if LOCALHOST_DOMAINS
        .iter()
        .any(|&allowed| host_name.eq_ignore_ascii_case(allowed))
    {
        return Ok(());
    }

    if parsed_base_url.scheme() != "https" {
        return Err(anyhow!(
            "rentals API base URL must use https for non-localhost hosts; got '{}://'",
            parsed_base_url.scheme()
        ));
    }

    Ok(())
}
