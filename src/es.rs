use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

pub const DEFAULT_HOST: &str = "ec2-54-217-5-98.eu-west-1.compute.amazonaws.com";
pub const DEFAULT_PORT: u16 = 9200;
pub const DEFAULT_INDEX: &str = "intprof";
pub const SEARCH_DOC_TYPE: &str = "profile";

/// Indexed field holding the numeric profile id.
pub const ID_FIELD: &str = "snid.fb.id";

/// Retry budget for timed-out or unconnectable requests.
pub const MAX_RETRIES: usize = 3;
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Log target for the transport trace stream; routed to its own file, see
/// the logging module.
pub const ES_TRACE_TARGET: &str = "es_trace";

#[derive(Debug, Error)]
pub enum EsError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("search backend returned status {status}: {detail}")]
    Status { status: StatusCode, detail: String },

    #[error("malformed search response: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    pub hits: Hits,
}

#[derive(Debug, Deserialize)]
pub struct Hits {
    pub hits: Vec<ProfileHit>,
}

/// One matching profile record.
#[derive(Debug, Deserialize)]
pub struct ProfileHit {
    #[serde(rename = "_source")]
    pub source: ProfileSource,
}

#[derive(Debug, Default, Deserialize)]
pub struct ProfileSource {
    pub snid: Option<SocialIds>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SocialIds {
    #[serde(default)]
    pub fb: Vec<SocialProfile>,
}

/// Demographic attributes of one social sub-profile.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SocialProfile {
    pub gender: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
}

impl ProfileHit {
    /// The first social sub-profile of the record, if the expected nested
    /// structure is present.
    pub fn sub_profile(&self) -> Option<&SocialProfile> {
        self.source.snid.as_ref()?.fb.first()
    }
}

impl SocialProfile {
    pub fn attr_values(&self) -> [(&'static str, Option<&str>); 3] {
        [
            ("gender", self.gender.as_deref()),
            ("city", self.city.as_deref()),
            ("country", self.country.as_deref()),
        ]
    }
}

/// Match-all query intersected with a terms filter on the id field.
pub fn build_query_body(ids: &[u64]) -> Value {
    json!({
        "query": {
            "filtered": {
                "query": {
                    "match_all": {}
                },
                "filter": {
                    "terms": {
                        ID_FIELD: ids
                    }
                }
            }
        }
    })
}

/// Blocking client for the profile search index.
pub struct EsClient {
    http: Client,
    base_url: String,
    index: String,
}

impl EsClient {
    pub fn new(host: &str, port: u16, index: &str) -> Result<Self, EsError> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(EsClient {
            http,
            base_url: format!("http://{}:{}", host, port),
            index: index.to_string(),
        })
    }

    /// Fetches the records whose id field matches any id in `ids`.
    ///
    /// The requested page size equals `ids.len()`, so one round trip is
    /// expected to return all matches for the chunk; no further pages are
    /// requested. Timed-out and unconnectable requests are retried up to
    /// `MAX_RETRIES` times before the error propagates.
    pub fn search_ids(&self, ids: &[u64]) -> Result<Vec<ProfileHit>, EsError> {
        let url = format!(
            "{}/{}/{}/_search?size={}",
            self.base_url,
            self.index,
            SEARCH_DOC_TYPE,
            ids.len()
        );
        let body = build_query_body(ids);
        debug!(target: "es_trace", url = %url, body = %body, "search request");

        let mut attempt = 0;
        let response = loop {
            match self.http.post(&url).json(&body).send() {
                Ok(response) => break response,
                Err(err) if attempt < MAX_RETRIES && (err.is_timeout() || err.is_connect()) => {
                    attempt += 1;
                    warn!(
                        action = "retry",
                        component = "es_client",
                        attempt,
                        max_retries = MAX_RETRIES,
                        error = %err,
                        "Search request failed, retrying"
                    );
                }
                Err(err) => return Err(EsError::Transport(err)),
            }
        };

        let status = response.status();
        let text = response.text()?;
        debug!(target: "es_trace", status = status.as_u16(), body = %text, "search response");

        if !status.is_success() {
            return Err(EsError::Status {
                status,
                detail: text,
            });
        }

        let parsed: SearchResponse = serde_json::from_str(&text)?;
        Ok(parsed.hits.hits)
    }
}
