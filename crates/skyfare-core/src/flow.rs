//! The three-stage search flow: form -> outbound results -> return results.
//!
//! Each stage owns its own transient state; nothing here is persisted or
//! shared process-wide. Advancing is only possible through the handoff
//! structs, so a stage can never be entered without the data it needs.

use chrono::NaiveDate;
use log::info;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::offers::{Airport, FlightOffer};
use crate::partition::partition_by_date;
use crate::sorter::{sorted, SortKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TripType {
    #[default]
    #[serde(rename = "oneway")]
    OneWay,
    #[serde(rename = "twoway")]
    RoundTrip,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("Please fill in all required fields")]
    MissingRequired,
    #[error("Please select return date for round trip")]
    MissingReturnDate,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FlowError {
    #[error("Please select a flight")]
    NoFlightSelected,
    #[error("Please select a return flight")]
    NoReturnSelected,
}

/// Trip parameters as submitted. Immutable once built; threaded unchanged
/// through the later stages for display and partitioning. Serializes to the
/// search request payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchParams {
    pub origin: String,
    pub destination: String,
    pub departure_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
    pub trip_type: TripType,
    pub passenger_count: u32,
}

/// Stage 1: collects trip parameters.
///
/// Airport fields keep the free-typed text and the resolved code side by
/// side; picking an autocomplete candidate fills the code, and submission
/// falls back to the typed text when no pick was made.
#[derive(Debug, Clone)]
pub struct SearchForm {
    pub origin: String,
    pub origin_display: String,
    pub destination: String,
    pub destination_display: String,
    pub departure_date: Option<NaiveDate>,
    pub return_date: Option<NaiveDate>,
    pub trip_type: TripType,
    pub passenger_count: u32,
}

impl Default for SearchForm {
    fn default() -> Self {
        Self {
            origin: String::new(),
            origin_display: String::new(),
            destination: String::new(),
            destination_display: String::new(),
            departure_date: None,
            return_date: None,
            trip_type: TripType::OneWay,
            passenger_count: 1,
        }
    }
}

impl SearchForm {
    pub fn set_origin(&mut self, airport: &Airport) {
        self.origin = airport.iata_code.clone();
        self.origin_display = airport.iata_code.clone();
    }

    pub fn set_destination(&mut self, airport: &Airport) {
        self.destination = airport.iata_code.clone();
        self.destination_display = airport.iata_code.clone();
    }

    /// Exchanges origin and destination, typed text included.
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.origin, &mut self.destination);
        std::mem::swap(&mut self.origin_display, &mut self.destination_display);
    }

    /// Presence checks only; anything beyond that is the service's problem.
    /// Codes are upper-cased on the way out, and the typed display value
    /// stands in when no autocomplete pick was made.
    pub fn validate(&self) -> Result<SearchParams, FormError> {
        if self.origin_display.trim().is_empty()
            || self.destination_display.trim().is_empty()
            || self.departure_date.is_none()
        {
            return Err(FormError::MissingRequired);
        }
        if self.trip_type == TripType::RoundTrip && self.return_date.is_none() {
            return Err(FormError::MissingReturnDate);
        }

        let pick = |code: &str, display: &str| -> String {
            let chosen = if code.is_empty() { display } else { code };
            chosen.trim().to_uppercase()
        };

        Ok(SearchParams {
            origin: pick(&self.origin, &self.origin_display),
            destination: pick(&self.destination, &self.destination_display),
            departure_date: self.departure_date.unwrap_or_default(),
            return_date: self.return_date,
            trip_type: self.trip_type,
            passenger_count: self.passenger_count,
        })
    }
}

/// Final pair handed to the external booking step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "tripType")]
pub enum Trip {
    #[serde(rename = "oneway")]
    OneWay { flight: FlightOffer },
    #[serde(rename = "twoway", rename_all = "camelCase")]
    RoundTrip {
        outbound_flight: FlightOffer,
        return_flight: FlightOffer,
    },
}

/// What confirming the outbound stage produces.
#[derive(Debug, Clone)]
pub enum StageHandoff {
    /// Round trip: the pick travels together with the pre-partitioned
    /// return subset and the original parameters.
    Return(ReturnHandoff),
    /// One-way: straight to booking.
    Booking(Trip),
}

#[derive(Debug, Clone)]
pub struct ReturnHandoff {
    pub outbound: FlightOffer,
    pub params: SearchParams,
    pub return_offers: Vec<FlightOffer>,
}

/// Stage 2: splits the raw results and lets the user pick an outbound offer.
#[derive(Debug, Clone)]
pub struct ResultsStage {
    params: SearchParams,
    outbound: Vec<FlightOffer>,
    inbound: Vec<FlightOffer>,
    unmatched: Vec<FlightOffer>,
    sort_key: SortKey,
    selected: Option<FlightOffer>,
}

impl ResultsStage {
    pub fn new(offers: Vec<FlightOffer>, params: SearchParams) -> Self {
        let (outbound, inbound, unmatched) = match (params.trip_type, params.return_date) {
            (TripType::RoundTrip, Some(return_date)) => {
                let split = partition_by_date(&offers, params.departure_date, Some(return_date));
                (split.outbound, split.inbound, split.unmatched)
            }
            // One-way results are shown as-is, no date filtering.
            _ => (offers, Vec::new(), Vec::new()),
        };

        info!(
            "Entering results stage — outbound={} inbound={} unmatched={} trip_type={:?}",
            outbound.len(),
            inbound.len(),
            unmatched.len(),
            params.trip_type
        );

        Self {
            params,
            outbound,
            inbound,
            unmatched,
            sort_key: SortKey::default(),
            selected: None,
        }
    }

    pub fn params(&self) -> &SearchParams {
        &self.params
    }

    pub fn is_round_trip(&self) -> bool {
        self.params.trip_type == TripType::RoundTrip
    }

    pub fn sort_key(&self) -> SortKey {
        self.sort_key
    }

    /// Changing the key recomputes the view from the unsorted subset; the
    /// selection is held by offer, so it survives the re-sort.
    pub fn set_sort_key(&mut self, key: SortKey) {
        self.sort_key = key;
    }

    /// Ordered view of the outbound subset. The underlying subset is never
    /// reordered.
    pub fn sorted_offers(&self) -> Vec<FlightOffer> {
        sorted(&self.outbound, self.sort_key)
    }

    /// Offers that matched neither requested date. Surfaced for the front
    /// end to mention; never silently lost.
    pub fn unmatched(&self) -> &[FlightOffer] {
        &self.unmatched
    }

    /// Single-select into the current sorted view; picking another offer
    /// replaces the previous pick. Returns false for an out-of-range index.
    pub fn select(&mut self, index: usize) -> bool {
        match self.sorted_offers().get(index) {
            Some(offer) => {
                self.selected = Some(offer.clone());
                true
            }
            None => false,
        }
    }

    pub fn selected(&self) -> Option<&FlightOffer> {
        self.selected.as_ref()
    }

    pub fn is_selected(&self, offer: &FlightOffer) -> bool {
        self.selected.as_ref() == Some(offer)
    }

    /// Confirming with no pick is rejected with the user-facing prompt; the
    /// stage state is untouched either way.
    pub fn confirm(&self) -> Result<StageHandoff, FlowError> {
        let selected = self.selected.clone().ok_or(FlowError::NoFlightSelected)?;

        if self.is_round_trip() {
            Ok(StageHandoff::Return(ReturnHandoff {
                outbound: selected,
                params: self.params.clone(),
                return_offers: self.inbound.clone(),
            }))
        } else {
            Ok(StageHandoff::Booking(Trip::OneWay { flight: selected }))
        }
    }
}

/// Stage 3: sorts the pre-partitioned return subset and pairs the pick with
/// the already-chosen outbound offer.
#[derive(Debug, Clone)]
pub struct ReturnStage {
    outbound: FlightOffer,
    params: SearchParams,
    return_offers: Vec<FlightOffer>,
    sort_key: SortKey,
    selected: Option<FlightOffer>,
}

impl ReturnStage {
    pub fn new(handoff: ReturnHandoff) -> Self {
        info!(
            "Entering return stage — return_offers={}",
            handoff.return_offers.len()
        );
        Self {
            outbound: handoff.outbound,
            params: handoff.params,
            return_offers: handoff.return_offers,
            sort_key: SortKey::default(),
            selected: None,
        }
    }

    pub fn params(&self) -> &SearchParams {
        &self.params
    }

    /// The outbound pick carried in from the previous stage, for display.
    pub fn outbound(&self) -> &FlightOffer {
        &self.outbound
    }

    pub fn sort_key(&self) -> SortKey {
        self.sort_key
    }

    pub fn set_sort_key(&mut self, key: SortKey) {
        self.sort_key = key;
    }

    pub fn sorted_offers(&self) -> Vec<FlightOffer> {
        sorted(&self.return_offers, self.sort_key)
    }

    pub fn select(&mut self, index: usize) -> bool {
        match self.sorted_offers().get(index) {
            Some(offer) => {
                self.selected = Some(offer.clone());
                true
            }
            None => false,
        }
    }

    pub fn selected(&self) -> Option<&FlightOffer> {
        self.selected.as_ref()
    }

    pub fn is_selected(&self, offer: &FlightOffer) -> bool {
        self.selected.as_ref() == Some(offer)
    }

    pub fn confirm(&self) -> Result<Trip, FlowError> {
        let selected = self.selected.clone().ok_or(FlowError::NoReturnSelected)?;
        Ok(Trip::RoundTrip {
            outbound_flight: self.outbound.clone(),
            return_flight: selected,
        })
    }
}
