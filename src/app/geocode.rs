//! Client for the postcodes.io-style geocoding service.

use deunicode::deunicode;
use log::{debug, info};
use serde::Deserialize;
use snafu::{prelude::*, Snafu};
use std::time::Duration;

#[derive(Debug, Snafu)]
pub enum GeocodeError {
    #[snafu(display("{postcode:?} is not a recognized postcode"))]
    InvalidPostcode { postcode: String },
    #[snafu(display("Error contacting the postcode service"))]
    Unreachable { source: reqwest::Error },
    #[snafu(display("The postcode service returned an unexpected payload"))]
    BadPayload { source: reqwest::Error },
    #[snafu(display("Error building the HTTP client"))]
    ClientBuild { source: reqwest::Error },
}

/// Response envelope of the postcode service. The service reports its own
/// status code inside the body, alongside the HTTP status.
#[derive(Debug, Clone, Deserialize)]
struct PostcodeEnvelope {
    status: u16,
    result: Option<PostcodePayload>,
}

#[derive(Debug, Clone, Deserialize)]
struct PostcodePayload {
    parliamentary_constituency: Option<String>,
}

/// Stateless lookup client. Every request is independent: no retry, no cache.
pub struct GeocodeClient {
    client: reqwest::Client,
    base_url: String,
}

impl GeocodeClient {
    /// `base_url` should be like `http://api.postcodes.io` (no trailing slash).
    /// The timeout bounds the whole request, connection included.
    pub fn new(base_url: &str, timeout: Duration) -> Result<GeocodeClient, GeocodeError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context(ClientBuildSnafu {})?;
        Ok(GeocodeClient {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Resolves a raw postcode to an ASCII-folded constituency name.
    pub async fn constituency(&self, postcode: &str) -> Result<String, GeocodeError> {
        let url = format!("{}/postcodes/{}", self.base_url, encode_postcode(postcode));
        debug!("constituency: GET {}", url);
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .context(UnreachableSnafu {})?;
        // Invalid postcodes come back as a JSON envelope with a non-200 body
        // status, so the body is parsed regardless of the HTTP status.
        let envelope: PostcodeEnvelope = resp.json().await.context(BadPayloadSnafu {})?;
        let name = match envelope {
            PostcodeEnvelope {
                status: 200,
                result: Some(payload),
            } => payload.parliamentary_constituency,
            _ => None,
        };
        match name {
            Some(raw) => {
                // Welsh constituency names carry diacritics that the results
                // table does not, e.g. "Ynys Môn".
                let folded = deunicode(&raw);
                info!("constituency: {:?} resolved to {:?}", postcode, folded);
                Ok(folded)
            }
            None => InvalidPostcodeSnafu { postcode }.fail(),
        }
    }
}

fn encode_postcode(postcode: &str) -> String {
    postcode.trim().replace(' ', "%20")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn postcodes_are_trimmed_and_space_encoded() {
        assert_eq!(encode_postcode("  SW1A 1AA "), "SW1A%201AA");
        assert_eq!(encode_postcode("M11AE"), "M11AE");
    }

    #[test]
    fn success_envelope_parses() {
        let js = r#"{
            "status": 200,
            "result": {
                "postcode": "SW1A 1AA",
                "parliamentary_constituency": "Cities of London and Westminster"
            }
        }"#;
        let envelope: PostcodeEnvelope = serde_json::from_str(js).unwrap();
        assert_eq!(envelope.status, 200);
        assert_eq!(
            envelope.result.unwrap().parliamentary_constituency.unwrap(),
            "Cities of London and Westminster"
        );
    }

    #[test]
    fn rejection_envelope_parses() {
        let js = r#"{"status": 404, "error": "Invalid postcode."}"#;
        let envelope: PostcodeEnvelope = serde_json::from_str(js).unwrap();
        assert_eq!(envelope.status, 404);
        assert!(envelope.result.is_none());
    }

    #[test]
    fn diacritics_fold_to_ascii() {
        assert_eq!(deunicode("Ynys Môn"), "Ynys Mon");
        assert_eq!(deunicode("Dwyfor Meirionnydd"), "Dwyfor Meirionnydd");
    }
}
