//! Shareable trip encoding in the page query string:
//! `?start=<lat,lon>&end=<lat,lon>`, 5 decimals each.
//!
//! Functions take and return query strings (with or without the leading
//! `?`) and leave unrelated parameters alone.

use std::borrow::Cow;

use shared::GeoPoint;

pub const START_PARAM: &str = "start";
pub const END_PARAM: &str = "end";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Trip {
    pub start: GeoPoint,
    pub end: GeoPoint,
}

fn pairs(query: &str) -> impl Iterator<Item = &str> {
    query
        .trim_start_matches('?')
        .split('&')
        .filter(|pair| !pair.is_empty())
}

fn key_of(pair: &str) -> Cow<'_, str> {
    let key = pair.split_once('=').map_or(pair, |(key, _)| key);
    urlencoding::decode(key).unwrap_or(Cow::Borrowed(key))
}

fn param<'a>(query: &'a str, name: &str) -> Option<&'a str> {
    pairs(query)
        .find(|pair| key_of(pair) == name)
        .map(|pair| pair.split_once('=').map_or("", |(_, value)| value))
}

fn join(pairs: Vec<String>) -> String {
    if pairs.is_empty() {
        String::new()
    } else {
        format!("?{}", pairs.join("&"))
    }
}

fn format_point(point: GeoPoint) -> String {
    format!("{:.5},{:.5}", point.lat(), point.lon())
}

fn parse_point(raw: &str) -> Option<GeoPoint> {
    let spaced = raw.replace('+', " ");
    let decoded = urlencoding::decode(&spaced).ok()?;
    let (lat, lon) = decoded.split_once(',')?;
    let lat = lat.trim().parse::<f64>().ok()?;
    let lon = lon.trim().parse::<f64>().ok()?;
    GeoPoint::new(lat, lon).ok()
}

/// Returns `query` with `start` and `end` set to `trip`. Existing values
/// are replaced in place; missing ones are appended.
pub fn encode_trip(query: &str, trip: &Trip) -> String {
    let start = format!("{START_PARAM}={}", format_point(trip.start));
    let end = format!("{END_PARAM}={}", format_point(trip.end));
    let (mut wrote_start, mut wrote_end) = (false, false);

    let mut out = Vec::new();
    for pair in pairs(query) {
        let key = key_of(pair);
        if key == START_PARAM {
            if !wrote_start {
                out.push(start.clone());
                wrote_start = true;
            }
        } else if key == END_PARAM {
            if !wrote_end {
                out.push(end.clone());
                wrote_end = true;
            }
        } else {
            out.push(pair.to_string());
        }
    }
    if !wrote_start {
        out.push(start);
    }
    if !wrote_end {
        out.push(end);
    }
    join(out)
}

/// Both parameters must be present and parse to valid points.
pub fn decode_trip(query: &str) -> Option<Trip> {
    let start = parse_point(param(query, START_PARAM)?)?;
    let end = parse_point(param(query, END_PARAM)?)?;
    Some(Trip { start, end })
}

pub fn clear_trip(query: &str) -> String {
    join(
        pairs(query)
            .filter(|pair| {
                let key = key_of(pair);
                key != START_PARAM && key != END_PARAM
            })
            .map(str::to_string)
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::point;
    use proptest::prelude::*;

    fn trip() -> Trip {
        Trip {
            start: point(50.7, -3.5),
            end: point(50.71, -3.52),
        }
    }

    #[test]
    fn test_encode_into_empty_query() {
        assert_eq!(
            encode_trip("", &trip()),
            "?start=50.70000,-3.50000&end=50.71000,-3.52000"
        );
    }

    #[test]
    fn test_encode_keeps_other_params() {
        let query = encode_trip("?lang=en&start=1,1&z=12", &trip());
        assert_eq!(
            query,
            "?lang=en&start=50.70000,-3.50000&z=12&end=50.71000,-3.52000"
        );
    }

    #[test]
    fn test_decode_plain_and_percent_encoded() {
        assert_eq!(
            decode_trip("?start=50.70000,-3.50000&end=50.71000,-3.52000"),
            Some(trip())
        );
        assert_eq!(
            decode_trip("start=50.70000%2C-3.50000&end=50.71000%2c-3.52000"),
            Some(trip())
        );
    }

    #[test]
    fn test_decode_requires_both() {
        assert_eq!(decode_trip("?start=50.7,-3.5"), None);
        assert_eq!(decode_trip("?end=50.7,-3.5"), None);
        assert_eq!(decode_trip(""), None);
    }

    #[test]
    fn test_decode_rejects_malformed() {
        assert_eq!(decode_trip("?start=abc,-3.5&end=50.7,-3.5"), None);
        assert_eq!(decode_trip("?start=50.7&end=50.7,-3.5"), None);
        assert_eq!(decode_trip("?start=95.0,-3.5&end=50.7,-3.5"), None);
        assert_eq!(decode_trip("?start=&end=50.7,-3.5"), None);
    }

    #[test]
    fn test_clear_leaves_other_params() {
        assert_eq!(
            clear_trip("?lang=en&start=50.7,-3.5&end=50.7,-3.5&z=12"),
            "?lang=en&z=12"
        );
        assert_eq!(clear_trip("?start=50.7,-3.5&end=50.7,-3.5"), "");
    }

    proptest! {
        #[test]
        fn prop_round_trip_to_five_decimals(
            a in (-90.0..=90.0f64, -180.0..=180.0f64),
            b in (-90.0..=90.0f64, -180.0..=180.0f64),
        ) {
            let original = Trip { start: point(a.0, a.1), end: point(b.0, b.1) };
            let decoded = decode_trip(&encode_trip("?x=1", &original)).unwrap();
            prop_assert!((decoded.start.lat() - a.0).abs() <= 5e-6);
            prop_assert!((decoded.start.lon() - a.1).abs() <= 5e-6);
            prop_assert!((decoded.end.lat() - b.0).abs() <= 5e-6);
            prop_assert!((decoded.end.lon() - b.1).abs() <= 5e-6);
        }
    }
}
