// SPDX-License-Identifier: MIT
// Copyright (c) 2026 SkyFare contributors

use std::cmp::Ordering;

use crate::duration;
use crate::offers::FlightOffer;

/// Sort key offered by the results stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Price,
    Duration,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Price => "price",
            SortKey::Duration => "duration",
        }
    }
}

impl std::str::FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "price" => Ok(SortKey::Price),
            "duration" => Ok(SortKey::Duration),
            other => Err(format!("unknown sort key '{}'", other)),
        }
    }
}

/// Numeric price of an offer. Missing or non-numeric totals parse to zero,
/// which places them at the front of a price-ascending listing.
fn price_value(offer: &FlightOffer) -> f64 {
    offer
        .price
        .as_ref()
        .and_then(|p| p.total.as_deref())
        .and_then(|t| t.parse::<f64>().ok())
        .unwrap_or(0.0)
}

/// Total minutes of the first itinerary. Missing or unparseable durations
/// compare as zero, mirroring the missing-price rule.
fn duration_minutes(offer: &FlightOffer) -> u32 {
    offer
        .itineraries
        .first()
        .and_then(|it| it.duration.as_deref())
        .and_then(duration::parse_minutes)
        .unwrap_or(0)
}

/// Sorts offers in place, ascending by the given key.
///
/// The sort is stable: offers that compare equal keep their service-supplied
/// relative order, so re-sorting by the same key is a no-op.
pub fn sort_offers(offers: &mut [FlightOffer], key: SortKey) {
    match key {
        SortKey::Price => {
            offers.sort_by(|a, b| {
                price_value(a)
                    .partial_cmp(&price_value(b))
                    .unwrap_or(Ordering::Equal)
            });
        }
        SortKey::Duration => {
            offers.sort_by(|a, b| duration_minutes(a).cmp(&duration_minutes(b)));
        }
    }
}

/// Non-destructive form used by the stages: the unsorted subset is retained
/// so switching keys always recomputes from the original order.
pub fn sorted(offers: &[FlightOffer], key: SortKey) -> Vec<FlightOffer> {
    let mut view = offers.to_vec();
    sort_offers(&mut view, key);
    view
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::offers::{Itinerary, Price};

    fn priced(total: &str) -> FlightOffer {
        FlightOffer {
            price: Some(Price {
                total: Some(total.to_string()),
                currency: Some("IDR".into()),
            }),
            itineraries: vec![],
        }
    }

    fn timed(total: &str, dur: &str) -> FlightOffer {
        FlightOffer {
            price: Some(Price {
                total: Some(total.to_string()),
                currency: None,
            }),
            itineraries: vec![Itinerary {
                duration: Some(dur.to_string()),
                segments: vec![],
            }],
        }
    }

    fn prices(offers: &[FlightOffer]) -> Vec<&str> {
        offers
            .iter()
            .map(|o| o.price.as_ref().unwrap().total.as_deref().unwrap())
            .collect()
    }

    #[test]
    fn test_price_ascending() {
        let offers = vec![priced("150"), priced("90"), priced("200")];
        let view = sorted(&offers, SortKey::Price);
        assert_eq!(prices(&view), vec!["90", "150", "200"]);
        // Original order untouched.
        assert_eq!(prices(&offers), vec!["150", "90", "200"]);
    }

    #[test]
    fn test_missing_price_sorts_first() {
        let offers = vec![priced("150"), FlightOffer::default(), priced("abc")];
        let view = sorted(&offers, SortKey::Price);
        assert_eq!(price_value(&view[0]), 0.0);
        assert_eq!(price_value(&view[1]), 0.0);
        assert_eq!(prices(&[view[2].clone()]), vec!["150"]);
    }

    #[test]
    fn test_sort_is_idempotent() {
        let offers = vec![priced("150"), priced("90"), priced("90"), priced("200")];
        let once = sorted(&offers, SortKey::Price);
        let twice = sorted(&once, SortKey::Price);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_equal_prices_keep_service_order() {
        let mut a = priced("100");
        a.itineraries.push(Itinerary {
            duration: Some("PT1H".into()),
            segments: vec![],
        });
        let mut b = priced("100");
        b.itineraries.push(Itinerary {
            duration: Some("PT5H".into()),
            segments: vec![],
        });
        let view = sorted(&[a.clone(), b.clone()], SortKey::Price);
        assert_eq!(view, vec![a, b]);
    }

    #[test]
    fn test_duration_parses_before_comparing() {
        // Lexicographically "PT10H" < "PT9H"; numerically it is the reverse.
        let offers = vec![timed("1", "PT10H"), timed("2", "PT9H")];
        let view = sorted(&offers, SortKey::Duration);
        assert_eq!(prices(&view), vec!["2", "1"]);
    }

    #[test]
    fn test_duration_missing_sorts_first() {
        let offers = vec![timed("1", "PT2H"), priced("2")];
        let view = sorted(&offers, SortKey::Duration);
        assert_eq!(prices(&view), vec!["2", "1"]);
    }

    #[test]
    fn test_sort_key_round_trip() {
        assert_eq!("price".parse::<SortKey>().unwrap(), SortKey::Price);
        assert_eq!("Duration".parse::<SortKey>().unwrap(), SortKey::Duration);
        assert!("fastest".parse::<SortKey>().is_err());
        assert_eq!(SortKey::Price.as_str(), "price");
    }
}
