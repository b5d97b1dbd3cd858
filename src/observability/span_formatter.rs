//! Span line formatter.
//!
//! Each finished span becomes one self-contained JSON object: ids as hex,
//! timestamps as Unix nanoseconds, attributes and events in OTLP value
//! notation, and the resource attributes inlined so every line can be read
//! on its own.
//!
//! ```json
//! {"resource":{"service.name":"eventmap"},"traceId":"…","spanId":"…",
//!  "parentSpanId":"","name":"handle_event","kind":1,"durationNanos":"1200",
//!  "attributes":[{"key":"event_type","value":{"stringValue":"Tick"}}], …}
//! ```

use opentelemetry::trace::{SpanId, SpanKind, Status};
use opentelemetry::{KeyValue, Value};
use opentelemetry_sdk::export::trace::SpanData;
use opentelemetry_sdk::resource::Resource;
use serde_json::{json, Map, Value as JsonValue};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Formats spans with the resource they belong to.
pub struct SpanFormatter {
    resource: JsonValue,
}

impl SpanFormatter {
    pub fn new(resource: &Resource) -> Self {
        let attributes: Map<String, JsonValue> = resource
            .iter()
            .map(|(k, v)| (k.to_string(), JsonValue::String(v.to_string())))
            .collect();
        Self {
            resource: JsonValue::Object(attributes),
        }
    }

    /// One JSON object per span.
    pub fn format_span(&self, span: &SpanData) -> JsonValue {
        let (status_code, status_message) = format_status(&span.status);
        let duration = span.end_time.duration_since(span.start_time).unwrap_or_default();

        json!({
            "resource": self.resource,
            "traceId": format!("{:032x}", span.span_context.trace_id()),
            "spanId": format!("{:016x}", span.span_context.span_id()),
            "parentSpanId": if span.parent_span_id == SpanId::INVALID {
                String::new()
            } else {
                format!("{:016x}", span.parent_span_id)
            },
            "name": span.name,
            "kind": span_kind_to_int(&span.span_kind),
            "startTimeUnixNano": unix_nanos(span.start_time),
            "endTimeUnixNano": unix_nanos(span.end_time),
            "durationNanos": duration.as_nanos().to_string(),
            "attributes": format_attributes(&span.attributes),
            "events": span
                .events
                .iter()
                .map(|event| json!({
                    "timeUnixNano": unix_nanos(event.timestamp),
                    "name": event.name,
                    "attributes": format_attributes(&event.attributes),
                }))
                .collect::<Vec<_>>(),
            "status": {
                "code": status_code,
                "message": status_message,
            },
        })
    }
}

impl std::fmt::Debug for SpanFormatter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpanFormatter").finish_non_exhaustive()
    }
}

fn unix_nanos(at: SystemTime) -> String {
    at.duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::ZERO)
        .as_nanos()
        .to_string()
}

const fn span_kind_to_int(kind: &SpanKind) -> u8 {
    match kind {
        SpanKind::Internal => 1,
        SpanKind::Server => 2,
        SpanKind::Client => 3,
        SpanKind::Producer => 4,
        SpanKind::Consumer => 5,
    }
}

fn format_attributes(attributes: &[KeyValue]) -> Vec<JsonValue> {
    attributes
        .iter()
        .map(|kv| json!({ "key": kv.key.to_string(), "value": format_attribute_value(&kv.value) }))
        .collect()
}

fn format_attribute_value(value: &Value) -> JsonValue {
    match value {
        Value::Bool(b) => json!({ "boolValue": b }),
        Value::I64(i) => json!({ "intValue": i.to_string() }),
        Value::F64(f) => json!({ "doubleValue": f }),
        Value::String(s) => json!({ "stringValue": s.to_string() }),
        Value::Array(_) => json!({ "stringValue": format!("{value:?}") }),
    }
}

fn format_status(status: &Status) -> (u8, String) {
    match status {
        Status::Unset => (0, String::new()),
        Status::Ok => (1, String::new()),
        Status::Error { description } => (2, description.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attribute_values_use_otlp_notation() {
        assert_eq!(format_attribute_value(&Value::I64(7)), json!({ "intValue": "7" }));
        assert_eq!(format_attribute_value(&Value::Bool(true)), json!({ "boolValue": true }));
        assert_eq!(
            format_attributes(&[KeyValue::new("query", "Berlin")]),
            vec![json!({ "key": "query", "value": { "stringValue": "Berlin" } })]
        );
    }

    #[test]
    fn resource_attributes_are_flattened() {
        let resource = Resource::new(vec![KeyValue::new("service.name", "eventmap")]);
        let formatter = SpanFormatter::new(&resource);
        assert_eq!(formatter.resource["service.name"], "eventmap");
    }

    #[test]
    fn status_codes() {
        assert_eq!(format_status(&Status::Ok), (1, String::new()));
        assert_eq!(format_status(&Status::error("boom")).0, 2);
    }
}
