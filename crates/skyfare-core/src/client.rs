use std::time::Duration;

use log::{debug, info};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::flow::SearchParams;
use crate::offers::{Airport, FlightOffer};

#[derive(Debug, Error)]
pub enum ClientError {
    /// The service answered with its own error payload.
    #[error("{0}")]
    Service(String),
    /// Non-success status without a readable error body.
    #[error("Server error: {0}. Make sure the search service is reachable")]
    Status(u16),
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

#[derive(Debug, Deserialize)]
struct ServiceError {
    error: String,
}

#[derive(Debug, Serialize)]
struct AutocompleteRequest<'a> {
    keyword: &'a str,
}

/// Blocking client for the remote flight-search service.
///
/// Both operations are stateless request/response calls; nothing is retried
/// automatically, and an empty search result is Ok — "no flights found" is a
/// flow-level condition, not a transport error.
pub struct SearchClient {
    http: reqwest::blocking::Client,
    base: String,
}

impl SearchClient {
    pub fn new(endpoint: &str) -> Result<Self, ClientError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            http,
            base: endpoint.trim_end_matches('/').to_string(),
        })
    }

    /// Submits a structured search and returns the flat itinerary list.
    pub fn search(&self, params: &SearchParams) -> Result<Vec<FlightOffer>, ClientError> {
        let url = format!("{}/flight_app/search/", self.base);
        info!(
            "Searching flights — url={} origin={} destination={} departure={}",
            url, params.origin, params.destination, params.departure_date
        );

        let resp = self.http.post(&url).json(params).send()?;
        let status = resp.status();
        if !status.is_success() {
            // The service reports failures as {"error": "..."}; anything
            // else becomes a bare status error.
            if let Ok(body) = resp.json::<ServiceError>() {
                return Err(ClientError::Service(body.error));
            }
            return Err(ClientError::Status(status.as_u16()));
        }

        let offers = resp.json::<Vec<FlightOffer>>()?;
        info!("Search returned — offers={}", offers.len());
        Ok(offers)
    }

    /// Airport autocomplete. Empty or whitespace input short-circuits to an
    /// empty list without touching the network, and any failure degrades to
    /// "no suggestions" — the form must never surface autocomplete errors.
    pub fn suggest_airports(&self, keyword: &str) -> Vec<Airport> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Vec::new();
        }

        let url = format!("{}/flight_app/search-destinations/", self.base);
        let result = self
            .http
            .post(&url)
            .json(&AutocompleteRequest { keyword })
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.json::<Vec<Airport>>());

        match result {
            Ok(airports) => airports,
            Err(e) => {
                debug!("Autocomplete degraded to no suggestions — keyword={} error={}", keyword, e);
                Vec::new()
            }
        }
    }
}

/// Orders autocomplete responses so a slow early reply can never overwrite a
/// newer suggestion list. Each issued query takes the next sequence number;
/// a response older than the newest applied one is dropped.
#[derive(Debug, Default)]
pub struct SuggestionFeed {
    issued: u64,
    applied: u64,
    suggestions: Vec<Airport>,
}

impl SuggestionFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a query about to be issued and returns its tag.
    pub fn begin_query(&mut self) -> u64 {
        self.issued += 1;
        self.issued
    }

    /// Applies a response. Returns false (and keeps the current list) when
    /// the response is stale.
    pub fn apply(&mut self, seq: u64, suggestions: Vec<Airport>) -> bool {
        if seq <= self.applied {
            debug!(
                "Dropping stale suggestion response — seq={} newest_applied={}",
                seq, self.applied
            );
            return false;
        }
        self.applied = seq;
        self.suggestions = suggestions;
        true
    }

    /// Empties the list, e.g. when the input is cleared. In-flight responses
    /// from before the clear are treated as stale.
    pub fn clear(&mut self) {
        self.applied = self.issued;
        self.suggestions.clear();
    }

    pub fn suggestions(&self) -> &[Airport] {
        &self.suggestions
    }
}
