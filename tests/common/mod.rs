//! Shared fixtures for integration tests

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use aws_lambda_events::event::s3::S3Event;
use city_weather_ranker::config::LocationConfig;
use city_weather_ranker::weather::parse_weather;
use city_weather_ranker::{
    MemoryObjectStore, Pipeline, PipelineError, Result, WeatherProvider, WeatherRecord,
};
use serde_json::json;

pub const INPUT: &str = "uploads";
pub const OUTPUT: &str = "results";

/// Canned per-city answers
#[derive(Clone)]
pub enum Reply {
    Weather { temp: f64, wind: f64 },
    Timeout,
    Garbage,
}

/// Weather provider answering from a fixed table and recording every call
#[derive(Default)]
pub struct StubProvider {
    replies: HashMap<String, Reply>,
    pub calls: Mutex<Vec<String>>,
}

impl StubProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, city: &str, temp: f64, wind: f64) -> Self {
        self.replies
            .insert(city.to_string(), Reply::Weather { temp, wind });
        self
    }

    pub fn failing(mut self, city: &str, reply: Reply) -> Self {
        self.replies.insert(city.to_string(), reply);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl WeatherProvider for StubProvider {
    async fn current_weather(&self, city: &str) -> Result<WeatherRecord> {
        self.calls.lock().unwrap().push(city.to_string());
        match self.replies.get(city) {
            Some(Reply::Weather { temp, wind }) => {
                let body = json!({
                    "id": 1000,
                    "name": city,
                    "main": {
                        "temp": temp, "feels_like": temp - 1.0,
                        "temp_min": temp - 2.0, "temp_max": temp + 2.0,
                        "pressure": 1012, "humidity": 60
                    },
                    "wind": {"speed": wind, "deg": 270}
                });
                parse_weather(city, &body.to_string())
            }
            Some(Reply::Timeout) => Err(PipelineError::weather_fetch(
                city,
                "request timed out after 2s",
            )),
            Some(Reply::Garbage) => parse_weather(city, "<html>oops</html>"),
            None => Err(PipelineError::weather_fetch(city, "HTTP 404: city not found")),
        }
    }
}

pub fn locations() -> LocationConfig {
    LocationConfig {
        input: INPUT.to_string(),
        output: OUTPUT.to_string(),
    }
}

pub fn pipeline(store: Arc<MemoryObjectStore>, provider: Arc<StubProvider>) -> Pipeline {
    Pipeline::new(store, provider, locations())
}

/// Object-created notification for `keys` in the input bucket
pub fn s3_event(keys: &[&str]) -> S3Event {
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
                        "name": INPUT,
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

pub fn output_text(store: &MemoryObjectStore, key: &str) -> Option<String> {
    store
        .object(OUTPUT, key)
        .map(|object| String::from_utf8(object.bytes.to_vec()).unwrap())
}
