use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::duration;
use crate::PLACEHOLDER;

/// One itinerary option as returned by the search service.
///
/// The wire schema is optional everywhere: the service is free to omit any
/// field, and a partial record must still display (field-by-field fallback)
/// rather than fail deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct FlightOffer {
    #[serde(default)]
    pub price: Option<Price>,
    #[serde(default)]
    pub itineraries: Vec<Itinerary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Price {
    #[serde(default)]
    pub total: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
}

/// One directional trip within an offer, composed of one or more segments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Itinerary {
    /// ISO-8601 style, e.g. `PT2H30M`.
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub segments: Vec<Segment>,
}

/// A single flown leg: one takeoff, one landing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    #[serde(default)]
    pub departure: Option<Endpoint>,
    #[serde(default)]
    pub arrival: Option<Endpoint>,
    #[serde(default)]
    pub carrier_code: Option<String>,
    #[serde(default)]
    pub number: Option<String>,
    #[serde(default)]
    pub operating: Option<Operating>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    #[serde(default)]
    pub iata_code: Option<String>,
    /// Local timestamp as sent by the service, e.g. `2024-06-01T08:15:00`.
    /// Kept as the wire string; the calendar day is extracted on demand.
    #[serde(default)]
    pub at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Operating {
    #[serde(default)]
    pub carrier_code: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// An airport candidate from the autocomplete endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Airport {
    pub iata_code: String,
    #[serde(default)]
    pub name: String,
}

impl FlightOffer {
    fn first_segment(&self) -> Option<&Segment> {
        self.itineraries.first()?.segments.first()
    }

    fn last_segment(&self) -> Option<&Segment> {
        self.itineraries.first()?.segments.last()
    }

    /// Calendar day of the first segment's departure. This is the key the
    /// outbound/return partition matches against.
    pub fn departure_day(&self) -> Option<NaiveDate> {
        let at = self.first_segment()?.departure.as_ref()?.at.as_deref()?;
        parse_day(at)
    }
}

/// Day part of a wire timestamp (`2024-06-01T08:15:00` -> 2024-06-01).
pub fn parse_day(at: &str) -> Option<NaiveDate> {
    let day = at.split('T').next()?;
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

fn clock_time(at: &str) -> Option<String> {
    let parsed = NaiveDateTime::parse_from_str(at, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(at, "%Y-%m-%dT%H:%M"))
        .ok()?;
    Some(parsed.format("%H:%M").to_string())
}

/// A flattened, display-ready view of one offer.
///
/// Every field degrades independently to a placeholder so a malformed record
/// renders as a row of `N/A`s instead of aborting the whole listing.
#[derive(Debug, Clone, PartialEq)]
pub struct OfferSummary {
    pub departure_time: String,
    pub arrival_time: String,
    pub departure_date: String,
    pub departure_code: String,
    pub arrival_code: String,
    pub airline: String,
    pub airline_name: String,
    pub flight_number: String,
    pub price: String,
    pub currency: String,
    pub duration: String,
    pub stops: usize,
}

impl OfferSummary {
    pub fn from_offer(offer: &FlightOffer) -> Self {
        let first = offer.first_segment();
        let last = offer.last_segment();

        let endpoint_time = |ep: Option<&Endpoint>| -> String {
            ep.and_then(|e| e.at.as_deref())
                .and_then(clock_time)
                .unwrap_or_else(|| PLACEHOLDER.to_string())
        };
        let endpoint_code = |ep: Option<&Endpoint>| -> String {
            ep.and_then(|e| e.iata_code.clone())
                .unwrap_or_else(|| PLACEHOLDER.to_string())
        };

        let airline = first
            .and_then(|s| {
                s.operating
                    .as_ref()
                    .and_then(|o| o.carrier_code.clone())
                    .or_else(|| s.carrier_code.clone())
            })
            .unwrap_or_else(|| PLACEHOLDER.to_string());
        let airline_name = first
            .and_then(|s| s.operating.as_ref().and_then(|o| o.name.clone()))
            .unwrap_or_else(|| {
                if airline == PLACEHOLDER {
                    "Unknown Airline".to_string()
                } else {
                    airline.clone()
                }
            });

        let stops = offer
            .itineraries
            .first()
            .map(|it| it.segments.len().saturating_sub(1))
            .unwrap_or(0);

        OfferSummary {
            departure_time: endpoint_time(first.and_then(|s| s.departure.as_ref())),
            arrival_time: endpoint_time(last.and_then(|s| s.arrival.as_ref())),
            departure_date: first
                .and_then(|s| s.departure.as_ref())
                .and_then(|e| e.at.as_deref())
                .and_then(parse_day)
                .map(|d| d.to_string())
                .unwrap_or_else(|| PLACEHOLDER.to_string()),
            departure_code: endpoint_code(first.and_then(|s| s.departure.as_ref())),
            arrival_code: endpoint_code(last.and_then(|s| s.arrival.as_ref())),
            airline,
            airline_name,
            flight_number: first
                .and_then(|s| s.number.clone())
                .unwrap_or_else(|| PLACEHOLDER.to_string()),
            price: offer
                .price
                .as_ref()
                .and_then(|p| p.total.clone())
                .unwrap_or_else(|| PLACEHOLDER.to_string()),
            currency: offer
                .price
                .as_ref()
                .and_then(|p| p.currency.clone())
                .unwrap_or_else(|| "IDR".to_string()),
            duration: offer
                .itineraries
                .first()
                .and_then(|it| it.duration.as_deref())
                .map(duration::pretty)
                .unwrap_or_else(|| PLACEHOLDER.to_string()),
            stops,
        }
    }

    pub fn stops_label(&self) -> String {
        match self.stops {
            0 => "Direct".to_string(),
            1 => "1 stop".to_string(),
            n => format!("{} stops", n),
        }
    }
}
