//! Legacy coordinate-list handling
//!
//! Older clients send a region as a flat list of alternating longitude and
//! latitude tokens. The separator arrives double-encoded as a literal `%2C`;
//! a plain `,` is accepted too.

/// Literal separator sent by double-encoding clients
pub const ENCODED_SEPARATOR: &str = "%2C";

/// Split a raw coordinate parameter into its flat token list.
///
/// Tokens are returned verbatim; an empty input yields a single empty token.
pub fn split_tokens(raw: &str) -> Vec<&str> {
    raw.split(ENCODED_SEPARATOR).flat_map(|chunk| chunk.split(',')).collect()
}

/// Reformat a flat coordinate list into `POLYGON((lon lat,lon lat,...))`.
///
/// Token 0 is emitted as is. Every later token is prefixed with a space when
/// its index is odd and with a comma when it is even, which pairs each
/// longitude with the latitude that follows it.
pub fn format_polygon(raw: &str) -> String {
    let tokens = split_tokens(raw);

    let mut body = String::with_capacity(raw.len() + tokens.len());
    for (i, token) in tokens.iter().enumerate() {
        if i > 0 {
            body.push(if i % 2 != 0 { ' ' } else { ',' });
        }
        body.push_str(token);
    }

    format!("POLYGON(({}))", body)
}

/// Recover the flat token list from a polygon produced by [`format_polygon`].
///
/// Returns `None` if the text is not a single-ring `POLYGON((...))` or a pair
/// does not hold exactly two tokens.
pub fn polygon_tokens(wkt: &str) -> Option<Vec<String>> {
    let body = wkt.strip_prefix("POLYGON((")?.strip_suffix("))")?;
    if body.is_empty() {
        return Some(Vec::new());
    }

    let mut tokens = Vec::new();
    for pair in body.split(',') {
        let mut parts = pair.split(' ');
        let lon = parts.next()?;
        let lat = parts.next()?;
        if parts.next().is_some() {
            return None;
        }
        tokens.push(lon.to_string());
        tokens.push(lat.to_string());
    }

    Some(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::str::FromStr;

    #[test]
    fn test_encoded_separator() {
        assert_eq!(format_polygon("-2%2C51%2C-1%2C52"), "POLYGON((-2 51,-1 52))");
    }

    #[test]
    fn test_plain_comma_separator() {
        assert_eq!(format_polygon("-2,51,-1,52,-1,51,-2,51"), "POLYGON((-2 51,-1 52,-1 51,-2 51))");
    }

    #[test]
    fn test_separator_alternation() {
        // index 1 -> space, index 2 -> comma, index 3 -> space, index 4 -> comma
        assert_eq!(format_polygon("a,b,c,d,e"), "POLYGON((a b,c d,e))");
    }

    #[test]
    fn test_single_and_empty_input() {
        assert_eq!(format_polygon("10"), "POLYGON((10))");
        assert_eq!(format_polygon(""), "POLYGON(())");
    }

    #[test]
    fn test_tokens_are_verbatim() {
        assert_eq!(split_tokens("-83.0%2C 40.0"), vec!["-83.0", " 40.0"]);
    }

    #[test]
    fn test_polygon_tokens_rejects_foreign_text() {
        assert!(polygon_tokens("LINESTRING(0 0,1 1)").is_none());
        assert!(polygon_tokens("POLYGON((0 0 0,1 1))").is_none());
        assert!(polygon_tokens("POLYGON((0,1 1))").is_none());
        assert_eq!(polygon_tokens("POLYGON(())"), Some(Vec::new()));
    }

    #[test]
    fn test_formatted_ring_is_valid_wkt() {
        let polygon = format_polygon("-83%2C40%2C-82%2C40%2C-82%2C41%2C-83%2C40");
        assert!(wkt::Wkt::<f64>::from_str(&polygon).is_ok());
    }

    fn coordinate() -> impl Strategy<Value = String> {
        (-180_000_000i64..180_000_000).prop_map(|micro| format!("{}", micro as f64 / 1e6))
    }

    proptest! {
        #[test]
        fn prop_pairs_round_trip(pairs in prop::collection::vec((coordinate(), coordinate()), 1..40)) {
            let flat: Vec<String> = pairs
                .iter()
                .flat_map(|(lon, lat)| [lon.clone(), lat.clone()])
                .collect();
            let polygon = format_polygon(&flat.join(ENCODED_SEPARATOR));

            let body = polygon
                .strip_prefix("POLYGON((")
                .and_then(|b| b.strip_suffix("))"))
                .unwrap();
            prop_assert_eq!(body.split(',').count(), pairs.len());
            prop_assert_eq!(polygon_tokens(&polygon), Some(flat));
            prop_assert!(wkt::Wkt::<f64>::from_str(&polygon).is_ok());
        }

        #[test]
        fn prop_both_separators_agree(pairs in prop::collection::vec((coordinate(), coordinate()), 1..20)) {
            let flat: Vec<String> = pairs
                .iter()
                .flat_map(|(lon, lat)| [lon.clone(), lat.clone()])
                .collect();
            prop_assert_eq!(
                format_polygon(&flat.join(ENCODED_SEPARATOR)),
                format_polygon(&flat.join(","))
            );
        }
    }
}
