//! Signed HTTPS client for the `bedrock-agent` REST API.

use std::time::{Duration, SystemTime};

use async_trait::async_trait;
use aws_config::meta::region::RegionProviderChain;
use aws_config::BehaviorVersion;
use aws_credential_types::provider::{ProvideCredentials, SharedCredentialsProvider};
use aws_sigv4::http_request::{sign, SignableBody, SignableRequest, SigningSettings};
use aws_sigv4::sign::v4;
use aws_smithy_runtime_api::client::identity::Identity;
use aws_types::region::Region;
use reqwest::{Client, Method, Url};
use serde_json::{json, Value};

use crate::api::{Operation, PromptApi, Route};
use crate::config::{AwsSettings, FALLBACK_REGION};
use crate::types::{PromptApiError, PromptApiResult};

/// SigV4 signing name shared by the Bedrock control-plane services.
const SIGNING_NAME: &str = "bedrock";
const CONTENT_TYPE: &str = "application/json";
const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Production [`PromptApi`] backed by the AWS standard credential chain.
pub struct BedrockAgentHttp {
    http: Client,
    endpoint: Url,
    region: Region,
    credentials: SharedCredentialsProvider,
}

impl BedrockAgentHttp {
    /// Load region and credentials the way the AWS SDKs do, honouring overrides.
    pub async fn connect(settings: &AwsSettings) -> PromptApiResult<Self> {
        let region_chain = RegionProviderChain::first_try(settings.region.clone().map(Region::new))
            .or_default_provider()
            .or_else(Region::new(FALLBACK_REGION));

        let mut loader = aws_config::defaults(BehaviorVersion::latest()).region(region_chain);
        if let Some(profile) = &settings.profile {
            loader = loader.profile_name(profile);
        }
        let sdk_config = loader.load().await;

        let region = sdk_config
            .region()
            .cloned()
            .unwrap_or_else(|| Region::new(FALLBACK_REGION));
        let credentials = sdk_config.credentials_provider().ok_or_else(|| {
            PromptApiError::Credentials("No AWS credentials provider is configured".to_string())
        })?;

        let endpoint = settings
            .endpoint
            .clone()
            .unwrap_or_else(|| AwsSettings::endpoint_for(region.as_ref()));

        tracing::info!(
            "Bedrock Prompt Management client ready (region: {}, profile: {}, endpoint: {})",
            region.as_ref(),
            settings.profile.as_deref().unwrap_or("default chain"),
            endpoint
        );

        Self::new(&endpoint, region, credentials)
    }

    pub fn new(
        endpoint: &str,
        region: Region,
        credentials: SharedCredentialsProvider,
    ) -> PromptApiResult<Self> {
        let endpoint = Url::parse(endpoint).map_err(|e| {
            PromptApiError::InvalidRequest(format!("Invalid endpoint URL {endpoint}: {e}"))
        })?;
        let http = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            http,
            endpoint,
            region,
            credentials,
        })
    }

    pub fn region(&self) -> &str {
        self.region.as_ref()
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Absolute URL for a route, with segments and query pairs percent-encoded.
    pub fn url_for(&self, route: &Route) -> PromptApiResult<Url> {
        let mut url = self.endpoint.clone();
        {
            let mut path = url.path_segments_mut().map_err(|_| {
                PromptApiError::InvalidRequest(format!(
                    "Endpoint {} cannot carry a path",
                    self.endpoint
                ))
            })?;
            path.pop_if_empty();
            path.extend(route.segments.iter());
        }
        if !route.query.is_empty() {
            url.query_pairs_mut().extend_pairs(route.query.iter());
        }
        Ok(url)
    }

    async fn send(&self, operation: Operation, route: Route) -> PromptApiResult<Value> {
        let url = self.url_for(&route)?;
        let body = match &route.body {
            Some(body) => serde_json::to_vec(body)?,
            None => Vec::new(),
        };

        let credentials = self
            .credentials
            .provide_credentials()
            .await
            .map_err(|e| PromptApiError::Credentials(e.to_string()))?;
        let identity: Identity = credentials.into();

        let signing_params = v4::SigningParams::builder()
            .identity(&identity)
            .region(self.region.as_ref())
            .name(SIGNING_NAME)
            .time(SystemTime::now())
            .settings(SigningSettings::default())
            .build()
            .map_err(|e| PromptApiError::Signing(e.to_string()))?
            .into();

        let headers = [("content-type", CONTENT_TYPE)];
        let signable = SignableRequest::new(
            route.method,
            url.as_str(),
            headers.iter().copied(),
            SignableBody::Bytes(&body),
        )
        .map_err(|e| PromptApiError::Signing(e.to_string()))?;
        let (instructions, _signature) = sign(signable, &signing_params)
            .map_err(|e| PromptApiError::Signing(e.to_string()))?
            .into_parts();

        let method = Method::from_bytes(route.method.as_bytes())
            .map_err(|e| PromptApiError::InvalidRequest(e.to_string()))?;
        let mut request = self
            .http
            .request(method, url)
            .header("content-type", CONTENT_TYPE);
        for (name, value) in instructions.headers() {
            request = request.header(name, value);
        }
        if route.body.is_some() {
            request = request.body(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let error_type = response
            .headers()
            .get("x-amzn-errortype")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let text = response.text().await?;

        if status.is_success() {
            parse_success(&text)
        } else {
            Err(service_error(operation, status.as_u16(), error_type.as_deref(), &text))
        }
    }
}

#[async_trait]
impl PromptApi for BedrockAgentHttp {
    async fn invoke(&self, operation: Operation, payload: Value) -> PromptApiResult<Value> {
        let route = operation.route(payload)?;
        tracing::debug!("{operation}: {} /{}", route.method, route.segments.join("/"));
        self.send(operation, route).await
    }
}

fn parse_success(text: &str) -> PromptApiResult<Value> {
    if text.trim().is_empty() {
        return Ok(json!({}));
    }
    Ok(serde_json::from_str(text)?)
}

/// Build the error for a non-2xx reply, worded like the AWS SDKs word it.
fn service_error(
    operation: Operation,
    status: u16,
    error_type: Option<&str>,
    body: &str,
) -> PromptApiError {
    let parsed: Option<Value> = serde_json::from_str(body).ok();

    let code = error_type
        .and_then(|t| t.split(':').next())
        .map(str::to_string)
        .or_else(|| {
            parsed
                .as_ref()
                .and_then(|v| v.get("__type"))
                .and_then(Value::as_str)
                .map(|t| t.rsplit('#').next().unwrap_or(t).to_string())
        })
        .filter(|c| !c.is_empty());

    let detail = parsed
        .as_ref()
        .and_then(|v| v.get("message").or_else(|| v.get("Message")))
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| body.trim().to_string());

    let message = format!(
        "An error occurred ({}) when calling the {} operation: {}",
        code.as_deref().unwrap_or("Unknown"),
        operation.name(),
        detail
    );

    PromptApiError::Service {
        status,
        code,
        message,
    }
}
