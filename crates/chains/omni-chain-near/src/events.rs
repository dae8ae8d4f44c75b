//! Event extraction from NEAR receipt logs.
//!
//! NEAR contracts emit events as log lines prefixed `EVENT_JSON:` followed by
//! a NEP-297 object `{ standard, version, event, data }`. After a finalized
//! transaction the builder locates the expected tag by substring scan across
//! every receipt outcome's logs; a missing tag is fatal because the caller
//! cannot proceed without the extracted payload.

use serde::Deserialize;
use serde_json::Value;

use omni_bridge_types::errors::EncodingError;

/// Prefix of NEP-297 event log lines.
pub const EVENT_JSON_PREFIX: &str = "EVENT_JSON:";

/// Event tags the bridge flows consume.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventTag {
    LogMetadata,
    InitTransfer,
    SignTransfer,
    GenerateBtcPendingInfo,
    SignedBtcTransaction,
}

impl EventTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventTag::LogMetadata => "LogMetadataEvent",
            EventTag::InitTransfer => "InitTransferEvent",
            EventTag::SignTransfer => "SignTransferEvent",
            EventTag::GenerateBtcPendingInfo => "generate_btc_pending_info",
            EventTag::SignedBtcTransaction => "signed_btc_transaction",
        }
    }
}

/// A parsed NEP-297 event envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct EventEnvelope {
    pub standard: Option<String>,
    pub version: Option<String>,
    pub event: String,
    #[serde(default)]
    pub data: Value,
}

/// Scan all receipt outcomes' logs for `tag` and return the parsed event.
///
/// `logs` is the flattened log-line list across every receipt outcome of the
/// transaction, in execution order. The first line containing the tag wins.
pub fn find_event(logs: &[String], tag: EventTag) -> Result<Value, EncodingError> {
    let line = logs
        .iter()
        .find(|line| line.contains(tag.as_str()))
        .ok_or_else(|| {
            EncodingError::MalformedEvent(format!("no {} in receipt logs", tag.as_str()))
        })?;
    parse_event_line(line)
}

/// Parse one `EVENT_JSON:` line into its JSON payload.
pub fn parse_event_line(line: &str) -> Result<Value, EncodingError> {
    let start = line.find(EVENT_JSON_PREFIX).ok_or_else(|| {
        EncodingError::MalformedEvent(format!("log line is not an event: {line}"))
    })?;
    let payload = &line[start + EVENT_JSON_PREFIX.len()..];
    serde_json::from_str(payload)
        .map_err(|e| EncodingError::MalformedEvent(format!("invalid event JSON: {e}")))
}

/// Find `tag` and deserialize the envelope in one step.
pub fn find_envelope(logs: &[String], tag: EventTag) -> Result<EventEnvelope, EncodingError> {
    let value = find_event(logs, tag)?;
    serde_json::from_value(value)
        .map_err(|e| EncodingError::MalformedEvent(format!("invalid event envelope: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_event_across_outcomes() {
        let logs = vec![
            "Transfer 100 from alice".to_string(),
            r#"EVENT_JSON:{"standard":"nep297","version":"1.0.0","event":"InitTransferEvent","data":[{"transfer_message":{"origin_nonce":12}}]}"#
                .to_string(),
        ];
        let event = find_event(&logs, EventTag::InitTransfer).unwrap();
        assert_eq!(event["event"], "InitTransferEvent");
        assert_eq!(event["data"][0]["transfer_message"]["origin_nonce"], 12);
    }

    #[test]
    fn missing_tag_is_fatal() {
        let logs = vec!["nothing to see".to_string()];
        let err = find_event(&logs, EventTag::SignTransfer).unwrap_err();
        assert!(matches!(err, EncodingError::MalformedEvent(_)));
    }

    #[test]
    fn tag_without_event_json_prefix_is_malformed() {
        let logs = vec!["SignTransferEvent happened".to_string()];
        assert!(find_event(&logs, EventTag::SignTransfer).is_err());
    }

    #[test]
    fn envelope_deserializes() {
        let logs = vec![
            r#"EVENT_JSON:{"standard":"nep297","version":"1.0.0","event":"LogMetadataEvent","data":[{"name":"Wrapped NEAR"}]}"#
                .to_string(),
        ];
        let envelope = find_envelope(&logs, EventTag::LogMetadata).unwrap();
        assert_eq!(envelope.event, "LogMetadataEvent");
        assert_eq!(envelope.data[0]["name"], "Wrapped NEAR");
    }

    #[test]
    fn btc_connector_tags_are_snake_case() {
        let logs = vec![
            r#"EVENT_JSON:{"event":"generate_btc_pending_info","data":{"btc_pending_id":"abc"}}"#
                .to_string(),
        ];
        let event = find_event(&logs, EventTag::GenerateBtcPendingInfo).unwrap();
        assert_eq!(event["data"]["btc_pending_id"], "abc");
    }
}
