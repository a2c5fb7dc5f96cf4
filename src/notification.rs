// Notification payload processing.
//
// Runs the image classifier and the timestamp extractor over one incoming
// payload and produces what the client renders. Title, call-to-action and
// app name pass through untouched.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::body::format::{BodyFormatter, PlainFormatter};
use crate::body::timestamp::{extract_timestamp, ParsedBody};
use crate::image::reference::{classify_with_gateway, ImageReference, DEFAULT_IPFS_GATEWAY};

/// A notification as delivered by the sender.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct NotificationPayload {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: String,
    /// Image URL, IPFS reference or base64 data URI.
    #[serde(default)]
    pub image: Option<String>,
    /// Call-to-action link.
    #[serde(default)]
    pub cta: Option<String>,
    /// Name of the sending app or channel.
    #[serde(default)]
    pub app: Option<String>,
}

/// A payload after post-processing, ready for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedNotification {
    pub title: Option<String>,
    pub body: ParsedBody,
    pub image: ImageReference,
    pub cta: Option<String>,
    pub app: Option<String>,
    /// The body's timestamp tag resolved to UTC, when it parses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sent_at: Option<DateTime<Utc>>,
}

/// Applies the classifier and extractor with a fixed gateway and formatter.
pub struct NotificationProcessor<F = PlainFormatter> {
    gateway: String,
    formatter: F,
}

// Formatters are usually closures, so only the gateway is shown.
impl<F> fmt::Debug for NotificationProcessor<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotificationProcessor")
            .field("gateway", &self.gateway)
            .finish_non_exhaustive()
    }
}

impl Default for NotificationProcessor<PlainFormatter> {
    fn default() -> Self {
        Self::new(DEFAULT_IPFS_GATEWAY)
    }
}

impl NotificationProcessor<PlainFormatter> {
    pub fn new(gateway: &str) -> Self {
        Self::with_formatter(gateway, PlainFormatter)
    }
}

impl<F: BodyFormatter> NotificationProcessor<F> {
    pub fn with_formatter(gateway: &str, formatter: F) -> Self {
        Self {
            gateway: gateway.to_string(),
            formatter,
        }
    }

    pub fn gateway(&self) -> &str {
        &self.gateway
    }

    /// Process a single payload.
    pub fn process(&self, payload: &NotificationPayload) -> ProcessedNotification {
        let image = classify_with_gateway(payload.image.as_deref(), &self.gateway);
        let body = extract_timestamp(&payload.body, &self.formatter);
        let sent_at = body.sent_at();

        debug!(
            image_kind = %image.kind,
            has_image = !image.is_empty(),
            timestamp = %body.timestamp,
            resolved = sent_at.is_some(),
            "Processed notification"
        );

        ProcessedNotification {
            title: payload.title.clone(),
            body,
            image,
            cta: payload.cta.clone(),
            app: payload.app.clone(),
            sent_at,
        }
    }

    /// Process payloads in order.
    pub fn process_batch(&self, payloads: &[NotificationPayload]) -> Vec<ProcessedNotification> {
        payloads.iter().map(|p| self.process(p)).collect()
    }
}

/// Input accepted by `parse_payloads`: one payload or an array of them.
#[derive(Deserialize)]
#[serde(untagged)]
enum PayloadInput {
    Many(Vec<NotificationPayload>),
    One(NotificationPayload),
}

/// Parse a JSON document holding either a single payload or an array.
pub fn parse_payloads(json: &str) -> anyhow::Result<Vec<NotificationPayload>> {
    use anyhow::Context;

    let input: PayloadInput =
        serde_json::from_str(json).context("Failed to parse notification payload JSON")?;
    Ok(match input {
        PayloadInput::Many(payloads) => payloads,
        PayloadInput::One(payload) => vec![payload],
    })
}
