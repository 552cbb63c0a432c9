//! Shared fixtures for the client integration tests.

#![allow(dead_code)] // Each test binary uses a different subset

use orb_client::{ClientOptions, OrbClient};
use serde_json::{json, Value};
use wiremock::MockServer;

pub const API_KEY: &str = "test-api-key";

/// A client pointed at the mock server.
pub fn client_for(server: &MockServer) -> OrbClient {
    client_with(server, ClientOptions::default())
}

/// Route client logs to the test output, filtered by `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A client pointed at the mock server, with custom options.
pub fn client_with(server: &MockServer, options: ClientOptions) -> OrbClient {
    init_tracing();
    let options = options.with_base_url(format!("{}/v1", server.uri()));
    OrbClient::with_options(API_KEY, options).expect("client builds")
}

pub fn unit_price_json(cadence: &str) -> Value {
    json!({
        "id": "price_1",
        "billable_metric": null,
        "billing_cycle_configuration": {"duration": 1, "duration_unit": "month"},
        "cadence": cadence,
        "conversion_rate": null,
        "created_at": "2024-01-01T00:00:00Z",
        "credit_allocation": null,
        "currency": "USD",
        "discount": null,
        "external_price_id": null,
        "fixed_price_quantity": null,
        "invoicing_cycle_configuration": null,
        "item": {"id": "item_id", "name": "Seats"},
        "maximum": null,
        "maximum_amount": null,
        "metadata": {},
        "minimum": null,
        "minimum_amount": null,
        "model_type": "unit",
        "name": "Seats",
        "plan_phase_order": null,
        "price_type": "fixed_price",
        "replaces_price_id": null,
        "unit_config": {"unit_amount": "10.00"}
    })
}

pub fn plan_version_json(version: i64) -> Value {
    json!({
        "adjustments": [],
        "created_at": "2024-01-01T00:00:00Z",
        "plan_phases": null,
        "prices": [unit_price_json("annual")],
        "version": version
    })
}

pub fn alert_json(id: &str, kind: &str) -> Value {
    json!({
        "id": id,
        "created_at": "2024-01-01T00:00:00Z",
        "currency": "USD",
        "customer": {"id": "cus_1", "external_customer_id": null},
        "enabled": true,
        "metric": null,
        "plan": null,
        "subscription": null,
        "thresholds": [{"value": 100.0}],
        "type": kind
    })
}

pub fn ledger_entry_json(entry_type: &str) -> Value {
    json!({
        "id": "le_1",
        "amount": -5.0,
        "created_at": "2024-04-01T00:00:00Z",
        "credit_block": {"id": "blk_1", "expiry_date": null, "per_unit_cost_basis": "1.00"},
        "currency": "credits",
        "customer": {"id": "cus_1", "external_customer_id": "acme"},
        "description": null,
        "ending_balance": 95.0,
        "entry_status": "committed",
        "entry_type": entry_type,
        "ledger_sequence_number": 4,
        "metadata": {},
        "starting_balance": 100.0,
        "void_amount": 5.0,
        "void_reason": null
    })
}

pub fn page_json(data: Vec<Value>, next_cursor: Option<&str>) -> Value {
    json!({
        "data": data,
        "pagination_metadata": {
            "has_more": next_cursor.is_some(),
            "next_cursor": next_cursor
        }
    })
}
