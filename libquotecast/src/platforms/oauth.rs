//! OAuth 1.0a request signing for the Twitter API
//!
//! Posting statuses requires user-context auth, i.e. an HMAC-SHA1 signed
//! `Authorization` header. JSON request bodies are not part of the
//! signature base string.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use hmac::{Hmac, Mac};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use rand::RngCore;
use secrecy::{ExposeSecret, SecretString};
use sha1::Sha1;

use crate::config::Credentials;
use crate::error::{PublishError, Result};

/// Everything except RFC 3986 unreserved characters: ALPHA / DIGIT / "-" / "." / "_" / "~"
const OAUTH_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

pub struct OAuthSigner {
    consumer_key: SecretString,
    consumer_secret: SecretString,
    access_token: SecretString,
    access_token_secret: SecretString,
}

impl OAuthSigner {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            consumer_key: credentials.api_key,
            consumer_secret: credentials.api_secret,
            access_token: credentials.access_token,
            access_token_secret: credentials.access_token_secret,
        }
    }

    /// Build the `Authorization` header value for a request
    ///
    /// `url` must not include a query string; query parameters go in `params`.
    pub fn sign(&self, method: &str, url: &str, params: &[(String, String)]) -> Result<String> {
        let timestamp = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map_err(|e| PublishError::Authentication(format!("System clock error: {}", e)))?
            .as_secs()
            .to_string();

        self.sign_with(method, url, params, &generate_nonce(), &timestamp)
    }

    fn sign_with(
        &self,
        method: &str,
        url: &str,
        params: &[(String, String)],
        nonce: &str,
        timestamp: &str,
    ) -> Result<String> {
        let mut oauth_params = vec![
            (
                "oauth_consumer_key".to_string(),
                self.consumer_key.expose_secret().to_string(),
            ),
            ("oauth_nonce".to_string(), nonce.to_string()),
            ("oauth_signature_method".to_string(), "HMAC-SHA1".to_string()),
            ("oauth_timestamp".to_string(), timestamp.to_string()),
            (
                "oauth_token".to_string(),
                self.access_token.expose_secret().to_string(),
            ),
            ("oauth_version".to_string(), "1.0".to_string()),
        ];

        let mut all_params: Vec<(String, String)> = oauth_params
            .iter()
            .chain(params.iter())
            .map(|(k, v)| (percent_encode(k), percent_encode(v)))
            .collect();
        all_params.sort();

        let param_string = all_params
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&");

        let base_string = format!(
            "{}&{}&{}",
            method.to_uppercase(),
            percent_encode(url),
            percent_encode(&param_string)
        );

        let signing_key = format!(
            "{}&{}",
            percent_encode(self.consumer_secret.expose_secret()),
            percent_encode(self.access_token_secret.expose_secret())
        );

        oauth_params.push((
            "oauth_signature".to_string(),
            hmac_sha1(&signing_key, &base_string)?,
        ));

        let header = oauth_params
            .iter()
            .map(|(k, v)| format!("{}=\"{}\"", percent_encode(k), percent_encode(v)))
            .collect::<Vec<_>>()
            .join(", ");

        Ok(format!("OAuth {}", header))
    }
}

fn percent_encode(s: &str) -> String {
    utf8_percent_encode(s, OAUTH_ENCODE_SET).to_string()
}

fn generate_nonce() -> String {
    let mut bytes = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

fn hmac_sha1(key: &str, data: &str) -> Result<String> {
    type HmacSha1 = Hmac<Sha1>;

    let mut mac = HmacSha1::new_from_slice(key.as_bytes())
        .map_err(|e| PublishError::Authentication(format!("Invalid signing key: {}", e)))?;
    mac.update(data.as_bytes());
    Ok(BASE64.encode(mac.finalize().into_bytes()))
}
