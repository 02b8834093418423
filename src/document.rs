use serde_json::Value;
use std::fs;
use std::time::Duration;
use tracing::{debug, info};

use crate::dsl::types::DocumentError;

/// Where the JSON document comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum Source {
    File(String),
    Url { url: String, timeout: Duration },
}

impl Source {
    fn name(&self) -> &str {
        match self {
            Source::File(path) => path,
            Source::Url { url, .. } => url,
        }
    }
}

fn unavailable(source: &Source, reason: impl ToString) -> DocumentError {
    DocumentError::DocumentUnavailable {
        source_name: source.name().to_string(),
        reason: reason.to_string(),
    }
}

fn read(source: &Source) -> Result<String, DocumentError> {
    match source {
        Source::File(path) => fs::read_to_string(path).map_err(|error| unavailable(source, error)),
        Source::Url { url, timeout } => {
            let client = reqwest::blocking::Client::builder()
                .timeout(*timeout)
                .user_agent(concat!("check_json/", env!("CARGO_PKG_VERSION")))
                .build()
                .map_err(|error| unavailable(source, error))?;

            let response = client
                .get(url)
                .send()
                .and_then(|response| response.error_for_status())
                .map_err(|error| unavailable(source, error))?;
            debug!(status = %response.status(), "received response");

            response.text().map_err(|error| unavailable(source, error))
        }
    }
}

pub fn parse(source: &Source, payload: &str) -> Result<Value, DocumentError> {
    serde_json::from_str(payload).map_err(|error| DocumentError::DocumentMalformed {
        source_name: source.name().to_string(),
        reason: error.to_string(),
    })
}

pub fn load(source: &Source) -> Result<Value, DocumentError> {
    info!(source = source.name(), "loading document");
    let payload = read(source)?;
    let document = parse(source, &payload)?;
    debug!(%document, "got data");

    Ok(document)
}
