//! Deterministic transform from raw upstream payloads to row shapes.
//!
//! Field access is defensive throughout: a missing or oddly-typed field
//! becomes a NULL column, never an error. The complete original payload is
//! preserved in `raw_data` so unmapped fields survive round-trips.

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::warn;

use crate::models::job::{InventoryItemRow, JobRow};

/// Key under which the upstream inventory endpoint nests its items.
const INVENTORY_KEY: &str = "inventoryUsage";

fn str_at(raw: &Value, pointer: &str) -> Option<String> {
    raw.pointer(pointer)
        .and_then(Value::as_str)
        .map(String::from)
}

fn f64_at(raw: &Value, pointer: &str) -> Option<f64> {
    raw.pointer(pointer).and_then(Value::as_f64)
}

fn date_at(raw: &Value, pointer: &str) -> Option<DateTime<Utc>> {
    raw.pointer(pointer)
        .and_then(Value::as_str)
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

/// Flattens an upstream job payload into the row shape.
///
/// Only the first element of `measures` is promoted; `addresses.Uplift`
/// feeds the origin columns and `addresses.Delivery` the destination
/// columns. `job_id` is the requested id, used if the payload omits its own.
pub fn job_from_upstream(job_id: i64, raw: &Value) -> JobRow {
    JobRow {
        id: raw.get("id").and_then(Value::as_i64).unwrap_or(job_id),
        title_name: str_at(raw, "/titleName"),
        first_name: str_at(raw, "/firstName"),
        last_name: str_at(raw, "/lastName"),
        estimated_delivery_details: str_at(raw, "/estimatedDeliveryDetails"),
        job_value: f64_at(raw, "/jobValue"),
        date_modified: date_at(raw, "/dateModified"),
        brand_code: str_at(raw, "/brandCode"),
        branch_code: str_at(raw, "/branchCode"),
        company_code: str_at(raw, "/companyCode"),

        measures_volume_gross_f3: f64_at(raw, "/measures/0/volume/gross/f3"),
        measures_volume_gross_m3: f64_at(raw, "/measures/0/volume/gross/m3"),
        measures_volume_net_f3: f64_at(raw, "/measures/0/volume/net/f3"),
        measures_volume_net_m3: f64_at(raw, "/measures/0/volume/net/m3"),
        measures_weight_gross_kg: f64_at(raw, "/measures/0/weight/gross/kg"),
        measures_weight_gross_lb: f64_at(raw, "/measures/0/weight/gross/lb"),
        measures_weight_net_kg: f64_at(raw, "/measures/0/weight/net/kg"),
        measures_weight_net_lb: f64_at(raw, "/measures/0/weight/net/lb"),

        uplift_line1: str_at(raw, "/addresses/Uplift/line1"),
        uplift_line2: str_at(raw, "/addresses/Uplift/line2"),
        uplift_city: str_at(raw, "/addresses/Uplift/city"),
        uplift_state: str_at(raw, "/addresses/Uplift/state"),
        uplift_postcode: str_at(raw, "/addresses/Uplift/postcode"),
        uplift_country: str_at(raw, "/addresses/Uplift/country"),

        delivery_line1: str_at(raw, "/addresses/Delivery/line1"),
        delivery_line2: str_at(raw, "/addresses/Delivery/line2"),
        delivery_city: str_at(raw, "/addresses/Delivery/city"),
        delivery_state: str_at(raw, "/addresses/Delivery/state"),
        delivery_postcode: str_at(raw, "/addresses/Delivery/postcode"),
        delivery_country: str_at(raw, "/addresses/Delivery/country"),

        raw_data: raw.clone(),
    }
}

/// Whether an inventory payload carries item data at all. Absence is a
/// successful empty result, not an error.
pub fn has_inventory(raw: &Value) -> bool {
    raw.get(INVENTORY_KEY).map_or(false, Value::is_array)
}

/// Extracts inventory items from an upstream payload. Entries without a
/// numeric id cannot be keyed and are skipped with a warning.
pub fn inventory_from_upstream(job_id: i64, raw: &Value) -> Vec<InventoryItemRow> {
    let Some(items) = raw.get(INVENTORY_KEY).and_then(Value::as_array) else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| {
            let Some(id) = item.get("id").and_then(Value::as_i64) else {
                warn!("Skipping inventory entry without numeric id for job {job_id}");
                return None;
            };
            Some(InventoryItemRow {
                id,
                job_id,
                description: str_at(item, "/description"),
                room: str_at(item, "/room"),
                quantity: f64_at(item, "/quantity"),
                destination: str_at(item, "/destination"),
                cube: f64_at(item, "/cube"),
                type_code: str_at(item, "/typeCode"),
                barcode: str_at(item, "/barcode"),
                raw_data: item.clone(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_job() -> Value {
        json!({
            "id": 111505,
            "titleName": "Mr",
            "firstName": "Leigh",
            "lastName": "Morrow",
            "estimatedDeliveryDetails": "27/02/26",
            "jobValue": 2675.0,
            "dateModified": "2026-02-05T09:35:48.734Z",
            "brandCode": "MWB",
            "branchCode": "MEL",
            "companyCode": "01",
            "addresses": {
                "Uplift": {
                    "line1": "1 Example St",
                    "city": "Melbourne",
                    "state": "VIC",
                    "postcode": "3000",
                    "country": "Australia"
                },
                "Delivery": {
                    "line1": "9 Destination Rd",
                    "city": "Sydney",
                    "state": "NSW",
                    "postcode": "2000",
                    "country": "Australia"
                }
            },
            "measures": [{
                "volume": { "gross": { "f3": 22.0, "m3": 0.622965 }, "net": { "f3": 22.0, "m3": 0.622965 } },
                "weight": { "gross": { "kg": 70.0, "lb": 154.0 }, "net": { "kg": 70.0, "lb": 154.0 } }
            }],
            "surveyComment": "not promoted to a column"
        })
    }

    #[test]
    fn test_job_promotes_scalar_fields() {
        let job = job_from_upstream(111505, &sample_job());
        assert_eq!(job.id, 111505);
        assert_eq!(job.first_name.as_deref(), Some("Leigh"));
        assert_eq!(job.last_name.as_deref(), Some("Morrow"));
        assert_eq!(job.job_value, Some(2675.0));
        assert_eq!(job.brand_code.as_deref(), Some("MWB"));
    }

    #[test]
    fn test_job_promotes_first_measure_only() {
        let mut raw = sample_job();
        raw["measures"]
            .as_array_mut()
            .unwrap()
            .push(json!({ "volume": { "gross": { "f3": 99.0 } } }));
        let job = job_from_upstream(111505, &raw);
        assert_eq!(job.measures_volume_gross_f3, Some(22.0));
        assert_eq!(job.measures_weight_gross_kg, Some(70.0));
    }

    #[test]
    fn test_job_maps_addresses_to_uplift_and_delivery() {
        let job = job_from_upstream(111505, &sample_job());
        assert_eq!(job.uplift_city.as_deref(), Some("Melbourne"));
        assert_eq!(job.delivery_city.as_deref(), Some("Sydney"));
        assert_eq!(job.uplift_line2, None);
    }

    #[test]
    fn test_job_missing_sections_become_none() {
        let job = job_from_upstream(42, &json!({ "id": 42 }));
        assert_eq!(job.first_name, None);
        assert_eq!(job.measures_volume_gross_m3, None);
        assert_eq!(job.delivery_country, None);
        assert_eq!(job.date_modified, None);
    }

    #[test]
    fn test_job_falls_back_to_requested_id() {
        let job = job_from_upstream(7, &json!({ "firstName": "Ann" }));
        assert_eq!(job.id, 7);
    }

    #[test]
    fn test_job_preserves_raw_payload() {
        let raw = sample_job();
        let job = job_from_upstream(111505, &raw);
        assert_eq!(job.raw_data, raw);
        assert_eq!(
            job.raw_data.get("surveyComment").and_then(Value::as_str),
            Some("not promoted to a column")
        );
    }

    #[test]
    fn test_job_parses_date_modified() {
        let job = job_from_upstream(111505, &sample_job());
        let date = job.date_modified.expect("dateModified should parse");
        assert_eq!(date.to_rfc3339(), "2026-02-05T09:35:48.734+00:00");
    }

    #[test]
    fn test_job_unparseable_date_is_none() {
        let job = job_from_upstream(1, &json!({ "id": 1, "dateModified": "yesterday" }));
        assert_eq!(job.date_modified, None);
    }

    #[test]
    fn test_inventory_extracts_items() {
        let raw = json!({ "inventoryUsage": [
            { "id": 1, "description": "Sofa", "room": "Lounge", "quantity": 1, "cube": 1.4, "typeCode": "F" },
            { "id": 2, "description": "Boxes", "room": "Kitchen", "quantity": 12, "cube": 0.1 }
        ]});
        let items = inventory_from_upstream(111505, &raw);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].id, 1);
        assert_eq!(items[0].job_id, 111505);
        assert_eq!(items[0].description.as_deref(), Some("Sofa"));
        assert_eq!(items[1].quantity, Some(12.0));
    }

    #[test]
    fn test_inventory_skips_entries_without_id() {
        let raw = json!({ "inventoryUsage": [
            { "description": "unlabelled" },
            { "id": 3, "description": "Desk" }
        ]});
        let items = inventory_from_upstream(1, &raw);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, 3);
    }

    #[test]
    fn test_inventory_preserves_item_raw_payload() {
        let raw = json!({ "inventoryUsage": [
            { "id": 5, "description": "Piano", "fragility": "high" }
        ]});
        let items = inventory_from_upstream(1, &raw);
        assert_eq!(
            items[0].raw_data.get("fragility").and_then(Value::as_str),
            Some("high")
        );
    }

    #[test]
    fn test_has_inventory() {
        assert!(has_inventory(&json!({ "inventoryUsage": [] })));
        assert!(!has_inventory(&json!({})));
        assert!(!has_inventory(&json!({ "inventoryUsage": null })));
    }
}
