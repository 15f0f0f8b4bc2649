//! AWS Lambda handler for loan calculations
//!
//! Accepts a loan request as JSON and returns the schedule summary, the
//! baseline comparison, the per-prepayment breakdown and (optionally) the
//! monthly rows. Works both with direct invocation, where the event is the
//! request itself, and with Function URLs, where the request is the `body`
//! string of the event.

use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use log::{info, warn};
use serde::Serialize;
use serde_json::{json, Value};

use loan_amortizer::schedule::{ScheduleRow, ScheduleSummary, YearlyBreakdown};
use loan_amortizer::{LoanCalculator, LoanRequest, PrepaymentSaving};

/// Output from the calculation
#[derive(Debug, Serialize)]
pub struct CalculationResponse {
    pub base_emi: f64,
    pub summary: ScheduleSummary,
    pub baseline_summary: ScheduleSummary,
    pub interest_saved: f64,
    pub months_saved: i64,
    pub savings: Vec<PrepaymentSaving>,
    pub yearly: Vec<YearlyBreakdown>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub rows: Vec<ScheduleRow>,
    pub execution_time_ms: u64,
}

fn error_response(message: &str) -> Value {
    json!({ "error": message })
}

/// Pull the request out of a Function URL event, or use the event as-is
fn request_body(event: &Value) -> Result<String, serde_json::Error> {
    match event.get("body") {
        Some(Value::String(body)) => Ok(body.clone()),
        Some(Value::Null) | None => serde_json::to_string(event),
        Some(other) => serde_json::to_string(other),
    }
}

/// Compute the full response for one request body
fn calculate(body: &str, include_rows: bool) -> Result<CalculationResponse, String> {
    let start = std::time::Instant::now();

    let request = LoanRequest::from_json_str(body).map_err(|e| e.to_string())?;
    let report = LoanCalculator::new().report(&request).map_err(|e| e.to_string())?;

    let summary = report.comparison.with_prepayments.clone();
    let yearly = report.schedule.yearly_breakdown();
    let rows = if include_rows { report.schedule.rows } else { Vec::new() };

    Ok(CalculationResponse {
        base_emi: summary.base_emi,
        summary,
        baseline_summary: report.comparison.baseline,
        interest_saved: report.comparison.interest_saved,
        months_saved: report.comparison.months_saved,
        savings: report.savings,
        yearly,
        rows,
        execution_time_ms: start.elapsed().as_millis() as u64,
    })
}

/// Whether the request asks for monthly rows (default: yes)
fn wants_rows(body: &str) -> bool {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|request| request.get("include_rows").and_then(Value::as_bool))
        .unwrap_or(true)
}

/// Build the JSON reply for one event
fn respond(payload: &Value) -> Result<Value, serde_json::Error> {
    let body = match request_body(payload) {
        Ok(b) => b,
        Err(e) => return Ok(error_response(&format!("Invalid JSON: {}", e))),
    };

    match calculate(&body, wants_rows(&body)) {
        Ok(response) => {
            info!(
                "calculated {} months, {} prepayments in {} ms",
                response.summary.months_taken,
                response.savings.len(),
                response.execution_time_ms
            );
            serde_json::to_value(&response)
        }
        Err(message) => {
            warn!("calculation failed: {}", message);
            Ok(error_response(&message))
        }
    }
}

/// Lambda handler function
async fn handler(event: LambdaEvent<Value>) -> Result<Value, Error> {
    let (payload, _context) = event.into_parts();
    Ok(respond(&payload)?)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();
    run(service_fn(handler)).await
}

#[cfg(test)]
mod tests {
    use super::*;

    const REQUEST: &str = r#"{
        "principal": 1000000,
        "annual_rate": 8.8,
        "total_months": 240,
        "start_date": "2024-01-15",
        "prepayments": [
            {"kind": "one-time", "amount": 200000, "effective_date": "2024-12-15", "strategy": "reduce-tenure"}
        ]
    }"#;

    #[test]
    fn test_direct_event_body() {
        let event: Value = serde_json::from_str(REQUEST).unwrap();
        let body = request_body(&event).unwrap();
        assert!(LoanRequest::from_json_str(&body).is_ok());
    }

    #[test]
    fn test_function_url_body() {
        let event = json!({ "body": REQUEST, "requestContext": {} });
        let body = request_body(&event).unwrap();
        assert_eq!(body, REQUEST);
    }

    #[test]
    fn test_calculate() {
        let response = calculate(REQUEST, false).unwrap();

        assert_eq!(response.baseline_summary.months_taken, 240);
        assert_eq!(response.summary.months_taken, 154);
        assert_eq!(response.months_saved, 86);
        assert_eq!(response.savings.len(), 1);
        assert!(response.rows.is_empty());
        assert!((response.base_emi - 8869.04).abs() < 0.005);
    }

    #[test]
    fn test_bad_date_reports_error() {
        let err = calculate(r#"{"start_date": "2024-02-30"}"#, true).unwrap_err();
        assert!(err.contains("Invalid input"));
    }

    #[test]
    fn test_function_url_respects_include_rows() {
        let body = REQUEST.replacen('{', r#"{"include_rows": false,"#, 1);
        let event = json!({ "body": body, "requestContext": {} });
        let reply = respond(&event).unwrap();

        assert!(reply.get("error").is_none());
        assert!(reply.get("rows").is_none());
        assert_eq!(reply["summary"]["months_taken"], 154);
    }

    #[test]
    fn test_rows_included_by_default() {
        let event = json!({ "body": REQUEST });
        let reply = respond(&event).unwrap();

        assert_eq!(reply["rows"].as_array().map(Vec::len), Some(154));
    }

    #[test]
    fn test_direct_event_respects_include_rows() {
        let mut event: Value = serde_json::from_str(REQUEST).unwrap();
        event["include_rows"] = json!(false);
        let reply = respond(&event).unwrap();

        assert!(reply.get("rows").is_none());
    }
}
