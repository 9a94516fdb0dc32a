use chrono::NaiveDate;
use skyfare_core::flow::{
    ReturnStage, ResultsStage, SearchForm, StageHandoff, Trip, TripType,
};
use skyfare_core::offers::{FlightOffer, OfferSummary};
use skyfare_core::sorter::SortKey;

/// A service response the way the wire actually sends it: two offers on the
/// requested departure day, two on the return day.
fn wire_response() -> Vec<FlightOffer> {
    let raw = r#"[
        {
            "price": {"total": "150.00", "currency": "IDR"},
            "itineraries": [{
                "duration": "PT2H30M",
                "segments": [{
                    "departure": {"iataCode": "JKT", "at": "2024-06-01T08:15:00"},
                    "arrival": {"iataCode": "DPS", "at": "2024-06-01T10:45:00"},
                    "carrierCode": "GA", "number": "402",
                    "operating": {"carrierCode": "GA", "name": "Garuda"}
                }]
            }]
        },
        {
            "price": {"total": "90.00", "currency": "IDR"},
            "itineraries": [{
                "duration": "PT10H",
                "segments": [
                    {"departure": {"iataCode": "JKT", "at": "2024-06-01T06:00:00"},
                     "arrival": {"iataCode": "SUB", "at": "2024-06-01T07:10:00"},
                     "carrierCode": "QG", "number": "311"},
                    {"departure": {"iataCode": "SUB", "at": "2024-06-01T14:00:00"},
                     "arrival": {"iataCode": "DPS", "at": "2024-06-01T16:00:00"},
                     "carrierCode": "QG", "number": "312"}
                ]
            }]
        },
        {
            "price": {"total": "200.00", "currency": "IDR"},
            "itineraries": [{
                "duration": "PT9H",
                "segments": [{
                    "departure": {"iataCode": "DPS", "at": "2024-06-10T09:00:00"},
                    "arrival": {"iataCode": "JKT", "at": "2024-06-10T18:00:00"},
                    "carrierCode": "GA", "number": "403"
                }]
            }]
        },
        {
            "price": {"total": "120.00", "currency": "IDR"},
            "itineraries": [{
                "duration": "PT2H40M",
                "segments": [{
                    "departure": {"iataCode": "DPS", "at": "2024-06-10T21:00:00"},
                    "arrival": {"iataCode": "JKT", "at": "2024-06-10T23:40:00"},
                    "carrierCode": "JT", "number": "29"
                }]
            }]
        }
    ]"#;
    serde_json::from_str(raw).expect("wire fixture must parse")
}

fn round_trip_form() -> SearchForm {
    let mut form = SearchForm::default();
    form.origin_display = "JKT".into();
    form.destination_display = "DPS".into();
    form.departure_date = NaiveDate::from_ymd_opt(2024, 6, 1);
    form.return_date = NaiveDate::from_ymd_opt(2024, 6, 10);
    form.trip_type = TripType::RoundTrip;
    form.passenger_count = 2;
    form
}

#[test]
fn test_round_trip_search_to_booking() {
    let params = round_trip_form().validate().unwrap();
    let mut stage = ResultsStage::new(wire_response(), params);

    // Partition: 2 outbound, 2 return, nothing lost.
    let outbound = stage.sorted_offers();
    assert_eq!(outbound.len(), 2);
    assert!(stage.unmatched().is_empty());

    // Default sort is price ascending: the 90.00 offer leads.
    assert_eq!(
        OfferSummary::from_offer(&outbound[0]).price,
        "90.00"
    );

    // Duration sort compares parsed minutes: 2h30m beats 10h even though
    // "PT2H30M" > "PT10H" lexicographically.
    stage.set_sort_key(SortKey::Duration);
    let by_duration = stage.sorted_offers();
    assert_eq!(OfferSummary::from_offer(&by_duration[0]).duration, "2h 30m");

    stage.select(0);
    let handoff = match stage.confirm().unwrap() {
        StageHandoff::Return(h) => h,
        other => panic!("round trip must hand off to the return stage: {:?}", other),
    };
    assert_eq!(handoff.return_offers.len(), 2);

    let mut ret = ReturnStage::new(handoff);

    // Return stage: duration sort puts the 2h40m hop before the 9h one.
    ret.set_sort_key(SortKey::Duration);
    let view = ret.sorted_offers();
    assert_eq!(OfferSummary::from_offer(&view[0]).flight_number, "29");

    ret.select(0);
    let trip = ret.confirm().unwrap();

    let json = serde_json::to_value(&trip).unwrap();
    assert_eq!(json["tripType"], "twoway");
    assert_eq!(
        json["outboundFlight"]["itineraries"][0]["segments"][0]["departure"]["iataCode"],
        "JKT"
    );
    assert_eq!(
        json["returnFlight"]["itineraries"][0]["segments"][0]["departure"]["iataCode"],
        "DPS"
    );
}

#[test]
fn test_one_way_skips_return_stage() {
    let mut form = round_trip_form();
    form.trip_type = TripType::OneWay;
    form.return_date = None;
    let params = form.validate().unwrap();

    let mut stage = ResultsStage::new(wire_response(), params);
    // One-way lists are not partitioned; all four offers are shown.
    assert_eq!(stage.sorted_offers().len(), 4);

    stage.select(0);
    match stage.confirm().unwrap() {
        StageHandoff::Booking(Trip::OneWay { flight }) => {
            assert_eq!(OfferSummary::from_offer(&flight).price, "90.00");
        }
        other => panic!("one-way must go straight to booking: {:?}", other),
    }
}

#[test]
fn test_off_window_offers_survive_in_unmatched() {
    let mut offers = wire_response();
    // The service strays outside the requested window.
    offers.push(
        serde_json::from_str(
            r#"{"itineraries": [{"segments": [{
                "departure": {"iataCode": "JKT", "at": "2024-06-03T08:00:00"}
            }]}]}"#,
        )
        .unwrap(),
    );

    let params = round_trip_form().validate().unwrap();
    let stage = ResultsStage::new(offers, params);
    assert_eq!(stage.sorted_offers().len(), 2);
    assert_eq!(stage.unmatched().len(), 1);
}

#[test]
fn test_partial_record_renders_as_placeholders_not_errors() {
    let offers: Vec<FlightOffer> =
        serde_json::from_str(r#"[{"price": {"total": "75.00"}}, {}]"#).unwrap();
    for offer in &offers {
        let summary = OfferSummary::from_offer(offer);
        assert!(!summary.departure_code.is_empty());
        assert!(!summary.currency.is_empty());
    }
    assert_eq!(OfferSummary::from_offer(&offers[0]).price, "75.00");
    assert_eq!(OfferSummary::from_offer(&offers[1]).price, "N/A");
}
