//! Integration tests for the Roster Engine HTTP API.
//!
//! This test suite drives every endpoint through the router:
//! - Schedule validation against the configured grid and rules
//! - Aggregation of schedules and check-in records
//! - Payroll lines, period summaries and export
//! - Settlement with salary resolution, allowances, tax and caching
//! - Error cases

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use rust_decimal::Decimal;
use serde_json::{Value, json};
use std::str::FromStr;
use tower::ServiceExt;

use roster_engine::api::{AppState, create_router};
use roster_engine::config::ConfigLoader;

// =============================================================================
// Test Helpers
// =============================================================================

fn create_test_state() -> AppState {
    let config = ConfigLoader::load("./config/default").expect("Failed to load config");
    AppState::new(config)
}

fn create_router_for_test() -> Router {
    create_router(create_test_state())
}

fn decimal(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

async fn post_raw(router: Router, uri: &str, body: String) -> (StatusCode, String) {
    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("Content-Type", "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(body_bytes.to_vec()).unwrap())
}

async fn post_json(router: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let (status, text) = post_raw(router, uri, body.to_string()).await;
    (status, serde_json::from_str(&text).unwrap())
}

/// Reads a decimal that may be serialized as a string or a number.
fn decimal_at(value: &Value) -> Decimal {
    match value {
        Value::String(s) => decimal(s),
        other => decimal(&other.to_string()),
    }
}

fn assert_decimal(value: &Value, expected: &str) {
    assert_eq!(
        decimal_at(value).normalize(),
        decimal(expected).normalize(),
        "Expected {}, got {}",
        expected,
        value
    );
}

fn schedule(id: &str, name: &str, assignments: &[(&str, &str)]) -> Value {
    let map: serde_json::Map<String, Value> = assignments
        .iter()
        .map(|(slot, assignment)| (slot.to_string(), json!(assignment)))
        .collect();
    json!({
        "id": id,
        "display_name": name,
        "day_start_time": "09:00",
        "assignments": map
    })
}

/// Every slot from `start` to `end` inclusive on a 30-minute grid.
fn half_hours(start: &str, end: &str) -> Vec<String> {
    let minutes = |s: &str| {
        let (h, m) = s.split_once(':').unwrap();
        h.parse::<u32>().unwrap() * 60 + m.parse::<u32>().unwrap()
    };
    (minutes(start)..=minutes(end))
        .step_by(30)
        .map(|m| format!("{:02}:{:02}", m / 60, m % 60))
        .collect()
}

fn work_record(id: &str, staff_id: &str, date: &str, start: &str, end: &str, worked: u32) -> Value {
    json!({
        "id": id,
        "staff_id": staff_id,
        "date": date,
        "scheduled_start": {"clock": start},
        "scheduled_end": {"clock": end},
        "worked_minutes": worked,
        "status": "completed"
    })
}

fn violations_of_kind<'a>(result: &'a Value, kind: &str) -> Vec<&'a Value> {
    result["violations"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|v| v["kind"] == kind)
        .collect()
}

// =============================================================================
// SECTION 1: Schedule Validation
// =============================================================================

#[tokio::test]
async fn test_validate_clean_schedule() {
    // Two dealers on different tables with a break each
    let body = json!({
        "schedules": [
            schedule("s1", "Kim", &[("09:00", "station:T1"), ("09:30", "station:T1"), ("10:00", "break"), ("10:30", "station:T1")]),
            schedule("s2", "Lee", &[("09:00", "station:T2"), ("09:30", "break"), ("10:00", "station:T2")])
        ]
    });

    let (status, result) = post_json(create_router_for_test(), "/schedule/validate", body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["is_valid"], true);
    assert!(result["violations"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_validate_station_conflict_invalidates() {
    let body = json!({
        "schedules": [
            schedule("s1", "Kim", &[("11:00", "station:T1")]),
            schedule("s2", "Lee", &[("11:00", "station:T1")])
        ]
    });

    let (status, result) = post_json(create_router_for_test(), "/schedule/validate", body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["is_valid"], false);
    let conflicts = violations_of_kind(&result, "station_conflict");
    assert_eq!(conflicts.len(), 2);
    assert_eq!(conflicts[0]["staff_id"], "s1");
    assert_eq!(conflicts[1]["staff_id"], "s2");
    assert!(conflicts.iter().all(|v| v["severity"] == "error"));
    let suggestions = result["suggestions"].as_array().unwrap();
    assert!(suggestions[0].as_str().unwrap().starts_with("2 error(s)"));
}

#[tokio::test]
async fn test_validate_rules_override_allows_conflicts() {
    let body = json!({
        "schedules": [
            schedule("s1", "Kim", &[("11:00", "station:T1")]),
            schedule("s2", "Lee", &[("11:00", "station:T1")])
        ],
        "rules": {
            "max_continuous_minutes": 240,
            "min_rest_minutes": 30,
            "allow_station_conflicts": true
        }
    });

    let (status, result) = post_json(create_router_for_test(), "/schedule/validate", body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["is_valid"], true);
    assert!(violations_of_kind(&result, "station_conflict").is_empty());
}

#[tokio::test]
async fn test_validate_long_run_is_warning_only() {
    // 09:00 to 14:00 on one table: 300 minutes against a 240 limit
    let slots = half_hours("09:00", "14:00");
    let mut assignments: Vec<(&str, &str)> = slots.iter().map(|s| (s.as_str(), "station:T1")).collect();
    assignments.push(("14:30", "break"));
    let body = json!({ "schedules": [schedule("s1", "Kim", &assignments)] });

    let (status, result) = post_json(create_router_for_test(), "/schedule/validate", body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["is_valid"], true);
    let warnings = violations_of_kind(&result, "continuous_work");
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0]["severity"], "warning");
    assert_eq!(warnings[0]["slot"], "09:00");
    assert!(warnings[0]["message"].as_str().unwrap().contains("300 minutes"));
}

#[tokio::test]
async fn test_validate_short_rest_and_long_gap() {
    // 150 minutes of rest is under the 180 minimum and also a gap
    let body = json!({
        "schedules": [schedule("s1", "Kim", &[
            ("09:00", "station:T1"),
            ("09:30", "station:T1"),
            ("12:30", "station:T1")
        ])],
        "grid": {"start_time": "09:00", "end_time": "13:00", "interval_minutes": 30},
        "rules": {"max_continuous_minutes": 240, "min_rest_minutes": 180}
    });

    let (status, result) = post_json(create_router_for_test(), "/schedule/validate", body).await;

    assert_eq!(status, StatusCode::OK);
    let rest = violations_of_kind(&result, "insufficient_rest");
    assert_eq!(rest.len(), 1);
    assert_eq!(rest[0]["slot"], "12:30");
    let gaps = violations_of_kind(&result, "schedule_gap");
    assert_eq!(gaps.len(), 1);
    assert_eq!(gaps[0]["severity"], "info");
    assert_eq!(gaps[0]["slot"], "10:00");
}

#[tokio::test]
async fn test_validate_custom_grid_accepts_quarter_hours() {
    let body = json!({
        "schedules": [schedule("s1", "Kim", &[("09:15", "station:T1")])],
        "grid": {"start_time": "09:00", "end_time": "10:00", "interval_minutes": 15}
    });

    let (status, result) = post_json(create_router_for_test(), "/schedule/validate", body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["is_valid"], true);
}

#[tokio::test]
async fn test_validate_empty_schedule_list() {
    let (status, result) = post_json(
        create_router_for_test(),
        "/schedule/validate",
        json!({"schedules": []}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["is_valid"], true);
    assert!(result["suggestions"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_validate_unknown_assignment_rejected() {
    let body = json!({
        "schedules": [schedule("s1", "Kim", &[("09:00", "dancing")])]
    });

    let (status, result) = post_json(create_router_for_test(), "/schedule/validate", body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(result["code"], "MALFORMED_JSON");
}

// =============================================================================
// SECTION 2: Aggregation
// =============================================================================

#[tokio::test]
async fn test_aggregate_schedule_on_configured_grid() {
    let body = json!({
        "schedule": schedule("s1", "Kim", &[
            ("09:00", "idle"),
            ("10:00", "station:T1"),
            ("10:30", "station:T2"),
            ("11:00", "break"),
            ("11:30", "station:T1")
        ]),
        "date": "2024-05-01"
    });

    let (status, record) = post_json(create_router_for_test(), "/schedule/aggregate", body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(record["id"], "s1_2024-05-01");
    assert_eq!(record["worked_minutes"], 90);
    assert_eq!(record["break_minutes"], 30);
    assert_eq!(record["scheduled_start"]["clock"], "10:00");
    assert_eq!(record["scheduled_end"]["clock"], "12:00");
    assert_eq!(record["stations_touched"], json!(["T1", "T2"]));
    assert_eq!(record["status"], "scheduled");
}

#[tokio::test]
async fn test_aggregate_check_in_without_check_out() {
    let body = json!({
        "check_in_out": {
            "id": "c1",
            "staff_id": "s1",
            "date": "2024-05-01",
            "scheduled_start": {"clock": "09:00"},
            "scheduled_end": {"clock": "17:00"},
            "check_in": {"clock": "09:30"}
        }
    });

    let (status, record) = post_json(create_router_for_test(), "/schedule/aggregate", body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(record["status"], "in_progress");
    assert_eq!(record["worked_minutes"], 450);
}

#[tokio::test]
async fn test_aggregate_schedule_without_date_rejected() {
    let body = json!({ "schedule": schedule("s1", "Kim", &[]) });

    let (status, result) = post_json(create_router_for_test(), "/schedule/aggregate", body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(result["code"], "VALIDATION_ERROR");
}

// =============================================================================
// SECTION 3: Payroll
// =============================================================================

async fn payroll_line(staff_id: &str, name: &str, role: &str, records: Vec<Value>) -> Value {
    let body = json!({
        "staff_id": staff_id,
        "records": records,
        "policy": {"staff_name": name, "job_role": role, "context": "Spring Series"}
    });
    let (status, line) = post_json(create_router_for_test(), "/payroll/staff", body).await;
    assert_eq!(status, StatusCode::OK, "payroll failed: {line}");
    line
}

#[tokio::test]
async fn test_payroll_daily_overtime() {
    // Dealer at 18,000/h, 10 hours: 8 regular + 2 at 1.5x
    // Expected: 144,000 + 54,000 = 198,000
    let line = payroll_line(
        "s1",
        "Kim",
        "dealer",
        vec![work_record("r1", "s1", "2024-05-01", "09:00", "19:00", 600)],
    )
    .await;

    assert_decimal(&line["regular_hours"], "8");
    assert_decimal(&line["overtime_hours"], "2");
    assert_decimal(&line["pay"]["base_rate"], "18000");
    assert_decimal(&line["pay"]["overtime_rate"], "27000");
    assert_decimal(&line["pay"]["regular_pay"], "144000");
    assert_decimal(&line["pay"]["overtime_pay"], "54000");
    assert_decimal(&line["pay"]["total_pay"], "198000");
    assert_eq!(line["status"], "draft");
}

#[tokio::test]
async fn test_payroll_threshold_is_per_day() {
    // Two 6-hour days never cross the 8-hour daily threshold
    let line = payroll_line(
        "s1",
        "Kim",
        "cashier",
        vec![
            work_record("r2", "s1", "2024-05-02", "09:00", "15:00", 360),
            work_record("r1", "s1", "2024-05-01", "09:00", "15:00", 360),
        ],
    )
    .await;

    assert_decimal(&line["regular_hours"], "12");
    assert_decimal(&line["overtime_hours"], "0");
    assert_decimal(&line["pay"]["total_pay"], "192000");
    assert_eq!(line["period_start"], "2024-05-01");
    assert_eq!(line["period_end"], "2024-05-02");
    assert_eq!(line["daily_records"][0]["id"], "r1");
}

#[tokio::test]
async fn test_payroll_unknown_role_uses_default_rate() {
    let line = payroll_line(
        "s1",
        "Kim",
        "juggler",
        vec![work_record("r1", "s1", "2024-05-01", "09:00", "13:00", 240)],
    )
    .await;

    assert_eq!(line["job_role"], "default");
    assert_decimal(&line["pay"]["total_pay"], "60000");
    let steps = line["audit_steps"].as_array().unwrap();
    assert_eq!(steps[0]["rule_id"], "base_rate_lookup");
    assert_eq!(steps.last().unwrap()["rule_id"], "pay_total");
}

#[tokio::test]
async fn test_payroll_daily_role_paid_per_day_worked() {
    // Manager is a daily role at 250,000; two days worked plus 10,000 a day
    // in allowance.
    let body = json!({
        "staff_id": "s2",
        "records": [
            work_record("r1", "s2", "2024-05-01", "09:00", "21:00", 720),
            work_record("r2", "s2", "2024-05-02", "09:00", "13:00", 240),
        ],
        "policy": {"staff_name": "Lee", "job_role": "manager", "daily_allowance": "10000"}
    });

    let (status, line) = post_json(create_router_for_test(), "/payroll/staff", body).await;

    assert_eq!(status, StatusCode::OK, "payroll failed: {line}");
    assert_eq!(line["salary_type"], "daily");
    assert_eq!(line["work_days"], 2);
    assert_decimal(&line["overtime_hours"], "4");
    assert_decimal(&line["pay"]["regular_pay"], "500000");
    assert_decimal(&line["pay"]["overtime_pay"], "0");
    assert_decimal(&line["pay"]["allowance_pay"], "20000");
    assert_decimal(&line["pay"]["total_pay"], "520000");
}

#[tokio::test]
async fn test_payroll_deduction_floors_at_zero() {
    let body = json!({
        "staff_id": "s1",
        "records": [work_record("r1", "s1", "2024-05-01", "09:00", "10:00", 60)],
        "policy": {"job_role": "server", "deduction": "50000"}
    });

    let (status, line) = post_json(create_router_for_test(), "/payroll/staff", body).await;

    assert_eq!(status, StatusCode::OK);
    assert_decimal(&line["pay"]["total_pay"], "0");
    assert_eq!(line["staff_name"], "s1");
}

#[tokio::test]
async fn test_payroll_empty_records_rejected() {
    let body = json!({"staff_id": "s1", "records": []});

    let (status, result) = post_json(create_router_for_test(), "/payroll/staff", body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(result["code"], "EMPTY_WORK_RECORDS");
}

#[tokio::test]
async fn test_payroll_summary_of_two_lines() {
    let dealer = payroll_line(
        "s1",
        "Kim",
        "dealer",
        vec![work_record("r1", "s1", "2024-05-01", "09:00", "19:00", 600)],
    )
    .await;
    let cashier = payroll_line(
        "s2",
        "Lee",
        "cashier",
        vec![work_record("r2", "s2", "2024-05-03", "09:00", "17:00", 480)],
    )
    .await;

    let (status, summary) = post_json(
        create_router_for_test(),
        "/payroll/summary",
        json!({"lines": [dealer, cashier]}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["total_staff"], 2);
    assert_eq!(summary["period_type"], "weekly");
    assert_eq!(summary["period_start"], "2024-05-01");
    assert_eq!(summary["period_end"], "2024-05-03");
    assert_decimal(&summary["total_hours"], "18");
    assert_decimal(&summary["total_pay"], "326000");
    assert_decimal(&summary["average_pay"], "163000");
}

#[tokio::test]
async fn test_payroll_summary_long_range_is_monthly() {
    let line = payroll_line(
        "s1",
        "Kim",
        "dealer",
        vec![
            work_record("r1", "s1", "2024-05-01", "09:00", "17:00", 480),
            work_record("r2", "s1", "2024-05-28", "09:00", "17:00", 480),
        ],
    )
    .await;

    let (_, summary) = post_json(
        create_router_for_test(),
        "/payroll/summary",
        json!({"lines": [line]}),
    )
    .await;

    assert_eq!(summary["period_type"], "monthly");
}

#[tokio::test]
async fn test_payroll_export_rows() {
    let line = payroll_line(
        "s1",
        "Kim \"Ace\" Park",
        "dealer",
        vec![work_record("r1", "s1", "2024-05-01", "09:00", "19:00", 600)],
    )
    .await;

    let (status, text) = post_raw(
        create_router_for_test(),
        "/payroll/export",
        json!({"lines": [line]}).to_string(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let rows: Vec<&str> = text.lines().collect();
    assert_eq!(rows.len(), 2);
    assert!(rows[1].starts_with("\"Kim \"\"Ace\"\" Park\",\"Spring Series\",\"2024-05-01 ~ 2024-05-01\""));
    assert!(rows[1].contains("\"8.00\",\"2.00\",\"10.00\""));
    assert!(rows[1].contains("\"198,000\""));
    assert!(rows[1].ends_with("\"Draft\""));
}

// =============================================================================
// SECTION 4: Settlement
// =============================================================================

fn settlement_body(role: Option<&str>, tax: Option<Value>) -> Value {
    let mut body = json!({
        "record": work_record("r1", "s1", "2024-05-01", "09:00", "18:00", 540),
        "allowances": {"meal": {"amount": "10000"}, "accommodation": "provided"}
    });
    if let Some(role) = role {
        body["role"] = json!(role);
    }
    if let Some(tax) = tax {
        body["tax"] = tax;
    }
    body
}

#[tokio::test]
async fn test_settlement_default_salary_no_tax() {
    // 9 hours at the default 15,000/h plus a 10,000 meal allowance
    let (status, result) =
        post_json(create_router_for_test(), "/settlement", settlement_body(None, None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_decimal(&result["hours_worked"], "9");
    assert_decimal(&result["base_pay"], "135000");
    assert_decimal(&result["allowance_pay"], "10000");
    assert_decimal(&result["tax_amount"], "0");
    assert_decimal(&result["total_pay"], "145000");
    assert_decimal(&result["after_tax_pay"], "145000");
    assert_eq!(result["provided_in_kind"], json!(["accommodation"]));
    assert_eq!(result["is_estimate"], true);
}

#[tokio::test]
async fn test_settlement_role_salary_with_percentage_tax() {
    // Dealer 18,000/h * 9 = 162,000; 10% of 172,000 = 17,200
    let tax = json!({"type": "percentage_rate", "rate": "10"});
    let (status, result) = post_json(
        create_router_for_test(),
        "/settlement",
        settlement_body(Some("dealer"), Some(tax)),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_decimal(&result["base_pay"], "162000");
    assert_decimal(&result["tax_amount"], "17200");
    assert_decimal(&result["after_tax_pay"], "154800");
}

#[tokio::test]
async fn test_settlement_tax_on_base_only() {
    let tax = json!({
        "type": "percentage_rate",
        "rate": "3.3",
        "taxable_items": {"base": true, "allowances": false}
    });
    let (_, result) = post_json(
        create_router_for_test(),
        "/settlement",
        settlement_body(None, Some(tax)),
    )
    .await;

    // 3.3% of 135,000 = 4,455
    assert_decimal(&result["tax_amount"], "4455");
    assert_decimal(&result["after_tax_pay"], "140545");
}

#[tokio::test]
async fn test_settlement_daily_role_salary() {
    let (_, result) = post_json(
        create_router_for_test(),
        "/settlement",
        settlement_body(Some("manager"), None),
    )
    .await;

    assert_decimal(&result["base_pay"], "250000");
}

#[tokio::test]
async fn test_settlement_explicit_salary_wins_over_role() {
    let mut body = settlement_body(Some("manager"), None);
    body["salary"] = json!({"type": "hourly", "amount": "20000"});

    let (_, result) = post_json(create_router_for_test(), "/settlement", body).await;

    assert_decimal(&result["base_pay"], "180000");
}

#[tokio::test]
async fn test_settlement_batch_uses_cache() {
    let first = settlement_body(None, None);
    let mut second = settlement_body(Some("dealer"), None);
    second["record"]["id"] = json!("r2");
    let body = json!({"items": [first.clone(), second, first]});

    let (status, result) = post_json(create_router_for_test(), "/settlement/batch", body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["results"].as_array().unwrap().len(), 3);
    assert_eq!(result["results"][0], result["results"][2]);
    assert_decimal(&result["total_pay"], "462000");
    assert_eq!(result["cache"]["hits"], 1);
    assert_eq!(result["cache"]["misses"], 2);
    assert_eq!(result["cache"]["entries"], 2);
}

#[tokio::test]
async fn test_settlement_cache_shared_across_requests() {
    let state = create_test_state();

    let (_, _) = post_json(
        create_router(state.clone()),
        "/settlement",
        settlement_body(None, None),
    )
    .await;
    let (_, _) = post_json(
        create_router(state.clone()),
        "/settlement",
        settlement_body(None, None),
    )
    .await;

    assert_eq!(state.cache_stats().hits, 1);
    assert_eq!(state.cache_stats().entries, 1);
}

#[tokio::test]
async fn test_settlement_zero_hours_is_all_zero() {
    let body = json!({
        "record": work_record("r1", "s1", "2024-05-01", "09:00", "09:00", 0),
        "role": "manager",
        "allowances": {"meal": {"amount": "10000"}}
    });

    let (status, result) = post_json(create_router_for_test(), "/settlement", body).await;

    assert_eq!(status, StatusCode::OK);
    assert_decimal(&result["total_pay"], "0");
    assert_decimal(&result["allowance_pay"], "0");
}

// =============================================================================
// SECTION 5: Error Cases
// =============================================================================

#[tokio::test]
async fn test_malformed_json() {
    let (status, text) = post_raw(
        create_router_for_test(),
        "/settlement",
        "{not json".to_string(),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(error["code"], "MALFORMED_JSON");
}

#[tokio::test]
async fn test_missing_content_type() {
    let response = create_router_for_test()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/payroll/summary")
                .body(Body::from(json!({"lines": []}).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let error: Value = serde_json::from_slice(&body_bytes).unwrap();
    assert_eq!(error["code"], "MISSING_CONTENT_TYPE");
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let (status, _) = post_raw(create_router_for_test(), "/calculate", "{}".to_string()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
