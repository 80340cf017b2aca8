//! Canonical cache keys for search queries

use serde::Serialize;
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

use crate::domain::DomainError;

/// Number of digest bytes kept in a fingerprint (128 bits)
const FINGERPRINT_BYTES: usize = 16;

/// Fingerprints any serializable query
///
/// The value is converted to JSON, null fields are dropped, and object keys
/// are emitted in sorted order before hashing, so field order and omitted
/// optionals never change the key.
pub fn fingerprint<T: Serialize>(query: &T) -> Result<String, DomainError> {
    let value = serde_json::to_value(query)
        .map_err(|e| DomainError::internal(format!("Failed to serialize query: {}", e)))?;

    Ok(fingerprint_value(&value))
}

/// Fingerprints an already-built JSON value
pub fn fingerprint_value(value: &Value) -> String {
    let canonical = canonical_json(value);
    let digest = Sha256::digest(canonical.as_bytes());

    hex::encode(&digest[..FINGERPRINT_BYTES])
}

/// Serializes `value` with sorted keys, without null members and with
/// negative zero folded into zero
pub fn canonical_json(value: &Value) -> String {
    strip_nulls(value).to_string()
}

fn strip_nulls(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> =
                map.iter().filter(|(_, v)| !v.is_null()).collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));

            let mut sorted = Map::new();
            for (k, v) in entries {
                sorted.insert(k.clone(), strip_nulls(v));
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.iter().map(strip_nulls).collect()),
        // -0.0 == 0.0 but serializes differently
        Value::Number(n) if n.as_f64().is_some_and(|f| f == 0.0 && f.is_sign_negative()) => {
            Value::from(0.0)
        }
        other => other.clone(),
    }
}

/// Builds a namespaced storage key, e.g. `hotels:search:<fingerprint>`
pub fn namespaced_key(namespace: &str, fingerprint: &str) -> String {
    if namespace.is_empty() {
        fingerprint.to_string()
    } else {
        format!("{}:{}", namespace, fingerprint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::hotel::{SearchParams, SortOrder};
    use serde_json::json;

    fn params() -> SearchParams {
        SearchParams::near(
            40.7128,
            -74.0060,
            "2026-03-01".parse().unwrap(),
            "2026-03-04".parse().unwrap(),
            2,
        )
    }

    #[test]
    fn test_fingerprint_is_128_bit_hex() {
        let key = fingerprint(&params()).unwrap();

        assert_eq!(key.len(), 32);
        assert!(key.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_negative_zero_matches_zero() {
        let dates = ("2026-03-01".parse().unwrap(), "2026-03-04".parse().unwrap());
        let negative = SearchParams::near(-0.0, -0.0, dates.0, dates.1, 2);
        let positive = SearchParams::near(0.0, 0.0, dates.0, dates.1, 2);

        assert_eq!(negative, positive);
        assert_eq!(fingerprint(&negative).unwrap(), fingerprint(&positive).unwrap());
        assert_eq!(canonical_json(&json!({"lat": -0.0})), r#"{"lat":0.0}"#);
    }

    #[test]
    fn test_fingerprint_is_deterministic() {
        assert_eq!(fingerprint(&params()).unwrap(), fingerprint(&params()).unwrap());
    }

    #[test]
    fn test_key_order_does_not_matter() {
        let permutations = [
            r#"{"lat":40.7,"lng":-74.0,"checkin":"2026-03-01","checkout":"2026-03-04","guests":2,"sort":"distance","page":1,"limit":20}"#,
            r#"{"limit":20,"page":1,"sort":"distance","guests":2,"checkout":"2026-03-04","checkin":"2026-03-01","lng":-74.0,"lat":40.7}"#,
            r#"{"guests":2,"lat":40.7,"sort":"distance","checkin":"2026-03-01","limit":20,"lng":-74.0,"page":1,"checkout":"2026-03-04"}"#,
        ];

        let keys: Vec<String> = permutations
            .iter()
            .map(|raw| fingerprint_value(&serde_json::from_str(raw).unwrap()))
            .collect();

        assert!(keys.windows(2).all(|w| w[0] == w[1]));

        // Deserializing into the typed query gives the same key too
        let typed: Vec<String> = permutations
            .iter()
            .map(|raw| {
                let params: SearchParams = serde_json::from_str(raw).unwrap();
                fingerprint(&params).unwrap()
            })
            .collect();

        assert!(typed.windows(2).all(|w| w[0] == w[1]));
    }

    #[test]
    fn test_nulls_are_ignored() {
        let with_null = json!({"lat": 1.0, "cityId": null, "nested": {"a": null, "b": 2}});
        let without = json!({"nested": {"b": 2}, "lat": 1.0});

        assert_eq!(fingerprint_value(&with_null), fingerprint_value(&without));
    }

    #[test]
    fn test_omitted_optional_matches_explicit_null() {
        let typed = fingerprint(&params()).unwrap();

        let mut value = serde_json::to_value(params()).unwrap();
        value["cityId"] = Value::Null;
        value["radiusMeters"] = Value::Null;

        assert_eq!(typed, fingerprint_value(&value));
    }

    #[test]
    fn test_any_field_change_changes_fingerprint() {
        let base = fingerprint(&params()).unwrap();

        let mut variants = Vec::new();

        let mut p = params();
        p.checkin = "2026-03-02".parse().unwrap();
        variants.push(p);

        let mut p = params();
        p.checkout = "2026-03-05".parse().unwrap();
        variants.push(p);

        let mut p = params();
        p.guests = 3;
        variants.push(p);

        variants.push(params().with_sort(SortOrder::PriceAsc));
        variants.push(params().with_radius(1_000.0));
        variants.push(params().with_page(2));
        variants.push(params().with_limit(5));

        let mut p = params();
        p.lat = Some(40.7129);
        variants.push(p);

        let mut p = params();
        p.city_id = Some("NYC".to_string());
        variants.push(p);

        for variant in variants {
            assert_ne!(base, fingerprint(&variant).unwrap(), "{variant:?}");
        }
    }

    #[test]
    fn test_canonical_json_sorts_nested_keys() {
        let value = json!({"b": [{"z": 1, "a": 2}], "a": true});
        assert_eq!(canonical_json(&value), r#"{"a":true,"b":[{"a":2,"z":1}]}"#);
    }

    #[test]
    fn test_namespaced_key() {
        assert_eq!(namespaced_key("hotels:search", "abc"), "hotels:search:abc");
        assert_eq!(namespaced_key("", "abc"), "abc");
    }
}
