// SPDX-License-Identifier: MIT
// Copyright (c) 2026 SkyFare contributors

use chrono::NaiveDate;
use log::debug;

use crate::offers::FlightOffer;

/// Result of splitting a flat search response by requested travel dates.
#[derive(Debug, Clone, Default)]
pub struct PartitionedOffers {
    /// Offers departing on the requested departure date.
    pub outbound: Vec<FlightOffer>,
    /// Offers departing on the requested return date (round trip only).
    pub inbound: Vec<FlightOffer>,
    /// Offers matching neither date, or with an unreadable departure.
    /// Kept rather than dropped so a front end can decide what to do with
    /// them; the service occasionally returns dates outside the requested
    /// window around timezone boundaries.
    pub unmatched: Vec<FlightOffer>,
}

/// Single linear scan over the raw list. An offer's bucket is decided by the
/// calendar day of its first segment's departure. Buckets are disjoint and
/// no offer is mutated.
pub fn partition_by_date(
    offers: &[FlightOffer],
    departure: NaiveDate,
    return_date: Option<NaiveDate>,
) -> PartitionedOffers {
    let mut result = PartitionedOffers::default();

    for offer in offers {
        match offer.departure_day() {
            Some(day) if day == departure => result.outbound.push(offer.clone()),
            Some(day) if return_date == Some(day) => result.inbound.push(offer.clone()),
            _ => result.unmatched.push(offer.clone()),
        }
    }

    debug!(
        "Partitioned search results — total={} outbound={} inbound={} unmatched={}",
        offers.len(),
        result.outbound.len(),
        result.inbound.len(),
        result.unmatched.len()
    );

    result
}
