use crate::config::MerchantCredentials;
use crate::error::{GatewayError, GatewayResult};
use crate::payments::types::ApiErrorResponse;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};

const CONTENT_TYPE_JSON: &str = "application/json";
const SERVER_META_INFO_HEADER: &str = "X-GCS-ServerMetaInfo";

/// JSON client that signs every request with the merchant's v1HMAC key.
///
/// Requests are sent exactly once; failures are reported to the caller as-is.
#[derive(Clone)]
pub struct SignedHttpClient {
    client: Client,
}

impl SignedHttpClient {
    /// `timeout` bounds each whole request, connect through body read.
    pub fn new(timeout: Duration) -> GatewayResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GatewayError::upstream(format!("failed to initialize HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    pub async fn request_json<T, B>(
        &self,
        method: Method,
        credentials: &MerchantCredentials,
        path: &str,
        body: Option<&B>,
    ) -> GatewayResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = format!("{}{}", credentials.endpoint(), path);
        let date = rfc1123_now();
        let server_meta = server_meta_info(credentials.integrator())?;
        let content_type = if body.is_some() { CONTENT_TYPE_JSON } else { "" };

        let to_sign = string_to_sign(
            &method,
            content_type,
            &date,
            &[(SERVER_META_INFO_HEADER, server_meta.as_str())],
            path,
        );
        let signature = sign_v1hmac(credentials.api_secret(), &to_sign)?;

        let mut request = self
            .client
            .request(method.clone(), &url)
            .header("Date", &date)
            .header(SERVER_META_INFO_HEADER, &server_meta)
            .header(
                "Authorization",
                format!("GCS v1HMAC:{}:{}", credentials.api_key(), signature),
            );
        if let Some(payload) = body {
            let text = serde_json::to_string(payload).map_err(|e| {
                GatewayError::upstream(format!("failed to encode request body: {}", e))
            })?;
            request = request.header("Content-Type", content_type).body(text);
        }

        debug!(method = %method, path = %path, "sending processor request");
        let response = request
            .send()
            .await
            .map_err(|e| GatewayError::upstream(format!("processor request failed: {}", e)))?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            GatewayError::upstream(format!("failed to read processor response: {}", e))
        })?;
        if status.is_success() {
            return serde_json::from_str::<T>(&text).map_err(|e| {
                GatewayError::upstream(format!("invalid processor JSON response: {}", e))
            });
        }

        warn!(status = %status, path = %path, "processor returned an error response");
        Err(error_from_response(status, &text))
    }
}

fn error_from_response(status: StatusCode, text: &str) -> GatewayError {
    let parsed = serde_json::from_str::<ApiErrorResponse>(text).ok();
    let message = parsed
        .as_ref()
        .and_then(|body| body.first_message())
        .map(str::to_string)
        .unwrap_or_else(|| text.to_string());

    if status == StatusCode::BAD_REQUEST {
        return GatewayError::UpstreamValidation { message };
    }
    GatewayError::upstream(format!("HTTP {}: {}", status, message))
}

fn rfc1123_now() -> String {
    chrono::Utc::now()
        .format("%a, %d %b %Y %H:%M:%S GMT")
        .to_string()
}

fn server_meta_info(integrator: &str) -> GatewayResult<String> {
    let meta = serde_json::json!({
        "platformIdentifier": format!("rust/{}", env!("CARGO_PKG_VERSION")),
        "sdkIdentifier": concat!("hosted-checkout-gateway/", env!("CARGO_PKG_VERSION")),
        "integrator": integrator,
    });
    let encoded = serde_json::to_vec(&meta)
        .map_err(|e| GatewayError::upstream(format!("failed to encode meta info: {}", e)))?;
    Ok(BASE64.encode(encoded))
}

/// Canonical request representation covered by the v1HMAC signature.
///
/// `X-GCS-*` headers are lower-cased and sorted; every line ends in `\n`.
pub fn string_to_sign(
    method: &Method,
    content_type: &str,
    date: &str,
    gcs_headers: &[(&str, &str)],
    path: &str,
) -> String {
    let mut headers: Vec<(String, String)> = gcs_headers
        .iter()
        .filter(|(name, _)| name.to_ascii_lowercase().starts_with("x-gcs"))
        .map(|(name, value)| {
            let value = value.split_whitespace().collect::<Vec<_>>().join(" ");
            (name.to_ascii_lowercase(), value)
        })
        .collect();
    headers.sort();

    let mut out = format!("{}\n{}\n{}\n", method.as_str(), content_type, date);
    for (name, value) in headers {
        out.push_str(&name);
        out.push(':');
        out.push_str(&value);
        out.push('\n');
    }
    out.push_str(path);
    out.push('\n');
    out
}

pub fn sign_v1hmac(secret: &str, to_sign: &str) -> GatewayResult<String> {
    use hmac::{Hmac, Mac};
    use sha2::Sha256;

    type HmacSha256 = Hmac<Sha256>;
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).map_err(|_| {
        GatewayError::Configuration {
            message: "API Secret cannot be used as an HMAC key.".to_string(),
            field: Some("api_secret".to_string()),
        }
    })?;
    mac.update(to_sign.as_bytes());
    Ok(BASE64.encode(mac.finalize().into_bytes()))
}

pub fn secure_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter()
        .zip(b.iter())
        .fold(0_u8, |acc, (x, y)| acc | (x ^ y))
        == 0
}
