//! Trigger adapter: turns S3 "object created" notifications into pipeline runs

use aws_lambda_events::event::s3::{S3Event, S3EventRecord};
use lambda_runtime::LambdaEvent;
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};

use crate::pipeline::{Pipeline, PipelineContext, PipelineReport};
use crate::{PipelineError, Result};

/// Status object returned to the trigger framework
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    #[serde(rename = "statusCode")]
    pub status_code: String,
    #[serde(rename = "statusMessage")]
    pub status_message: String,
}

impl Response {
    #[must_use]
    pub fn success() -> Self {
        Self {
            status_code: "200".to_string(),
            status_message: "Success".to_string(),
        }
    }

    #[must_use]
    pub fn failure(err: &PipelineError) -> Self {
        Self {
            status_code: "400".to_string(),
            status_message: err.to_string(),
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status_code == "200"
    }
}

/// Object keys arrive form-encoded (`+` for space, `%XX` escapes)
pub fn decode_object_key(raw: &str) -> Result<String> {
    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(|key| key.into_owned())
        .map_err(|e| PipelineError::event(format!("object key '{raw}' is not valid UTF-8: {e}")))
}

fn record_key(record: &S3EventRecord) -> Result<String> {
    let raw = record
        .s3
        .object
        .key
        .as_deref()
        .filter(|key| !key.is_empty())
        .ok_or_else(|| PipelineError::event("record has no object key"))?;
    decode_object_key(raw)
}

/// One context per notification record, in delivery order
pub fn contexts_from_event(event: &S3Event) -> Result<Vec<PipelineContext>> {
    if event.records.is_empty() {
        return Err(PipelineError::event("notification contains no records"));
    }

    event
        .records
        .iter()
        .map(|record| record_key(record).map(PipelineContext::new))
        .collect()
}

/// Run the pipeline for every record of `event`.
///
/// Records are independent: a failing record does not stop the ones after it.
/// A record whose upload no longer exists was consumed by an earlier delivery
/// and is skipped. Any other failure is collected, and the batch as a whole
/// fails once every record has been tried.
#[instrument(skip_all, fields(records = event.records.len()))]
pub async fn handle_event(pipeline: &Pipeline, event: &S3Event) -> Result<Vec<PipelineReport>> {
    let contexts = contexts_from_event(event)?;

    for record in &event.records {
        if let Some(bucket) = record.s3.bucket.name.as_deref() {
            if bucket != pipeline.locations().input {
                warn!(
                    event_bucket = bucket,
                    input = %pipeline.locations().input,
                    "Notification bucket differs from configured input location"
                );
            }
        }
    }

    let mut reports = Vec::with_capacity(contexts.len());
    let mut failures = Vec::new();
    for ctx in &contexts {
        match pipeline.run(ctx).await {
            Ok(report) => reports.push(report),
            Err(err) if err.is_missing_source() => {
                warn!(key = %ctx.source_key, "Source object already consumed, skipping record");
            }
            Err(err) => {
                error!(key = %ctx.source_key, stage = %err.stage(), "Record failed: {err}");
                failures.push(err);
            }
        }
    }

    if failures.is_empty() {
        Ok(reports)
    } else {
        Err(PipelineError::Batch {
            total: contexts.len(),
            failures,
        })
    }
}

/// Lambda entry point.
///
/// Success returns the `200` [`Response`]. On failure the `400` response is
/// only logged: the invocation itself returns an error, so the trigger's
/// redelivery policy applies and the caller never sees a `400` body.
pub async fn function_handler(
    pipeline: &Pipeline,
    event: LambdaEvent<S3Event>,
) -> std::result::Result<Response, lambda_runtime::Error> {
    let request_id = event.context.request_id.clone();

    match handle_event(pipeline, &event.payload).await {
        Ok(reports) => {
            info!(%request_id, processed = reports.len(), "Invocation succeeded");
            Ok(Response::success())
        }
        Err(err) => {
            let response = Response::failure(&err);
            error!(
                %request_id,
                stage = %err.stage(),
                status_code = %response.status_code,
                "{}",
                err.user_message()
            );
            Err(err.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn event_with_keys(keys: &[&str]) -> S3Event {
        let records: Vec<_> = keys
            .iter()
            .map(|key| {
                json!({
                    "eventVersion": "2.1",
                    "eventSource": "aws:s3",
                    "awsRegion": "eu-west-1",
                    "eventTime": "2024-05-01T12:00:00.000Z",
                    "eventName": "ObjectCreated:Put",
                    "userIdentity": {"principalId": "EXAMPLE"},
                    "requestParameters": {"sourceIPAddress": "127.0.0.1"},
                    "responseElements": {
                        "x-amz-request-id": "C3D13FE58DE4C810",
                        "x-amz-id-2": "FMyUVURIY8/IgAtTv8xRjskZQpcIZ9KG4V5Wp6S7S/JRWeUWerMUE5JgHvANOjpD"
                    },
                    "s3": {
                        "s3SchemaVersion": "1.0",
                        "configurationId": "upload",
                        "bucket": {
                            "name": "uploads",
                            "ownerIdentity": {"principalId": "EXAMPLE"},
                            "arn": "arn:aws:s3:::uploads"
                        },
                        "object": {
                            "key": key,
                            "size": 20,
                            "eTag": "d41d8cd98f00b204e9800998ecf8427e",
                            "sequencer": "0A1B2C3D4E5F678901"
                        }
                    }
                })
            })
            .collect();
        serde_json::from_value(json!({ "Records": records })).unwrap()
    }

    #[rstest]
    #[case("cities.txt", "cities.txt")]
    #[case("my+cities.txt", "my cities.txt")]
    #[case("lists/caf%C3%A9+cities.csv", "lists/café cities.csv")]
    #[case("100%25.txt", "100%.txt")]
    fn test_decode_object_key(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(decode_object_key(raw).unwrap(), expected);
    }

    #[test]
    fn test_contexts_follow_record_order() {
        let event = event_with_keys(&["a.txt", "b+list.txt"]);
        let contexts = contexts_from_event(&event).unwrap();
        assert_eq!(
            contexts,
            vec![PipelineContext::new("a.txt"), PipelineContext::new("b list.txt")]
        );
    }

    #[test]
    fn test_empty_event_rejected() {
        let event: S3Event = serde_json::from_value(json!({ "Records": [] })).unwrap();
        let err = contexts_from_event(&event).unwrap_err();
        assert!(matches!(err, PipelineError::Event { .. }));
    }

    #[test]
    fn test_response_shape() {
        let ok = serde_json::to_value(Response::success()).unwrap();
        assert_eq!(ok, json!({"statusCode": "200", "statusMessage": "Success"}));

        let failed = Response::failure(&PipelineError::weather_fetch("Paris", "timed out"));
        assert!(!failed.is_success());
        assert_eq!(failed.status_code, "400");
        assert!(failed.status_message.contains("Paris"));
    }
}
