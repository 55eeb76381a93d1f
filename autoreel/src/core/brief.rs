//! The creative brief and its validation boundary.
//!
//! A [`BriefRequest`] is whatever arrived on the wire. [`Brief::from_request`]
//! trims and coerces it, checks it against the brief rules, and only then
//! produces a [`Brief`], which is immutable from that point on.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::errors::{BriefValidationError, FieldError};
use crate::utils::sha256_hex;

/// Shortest accepted target duration, in seconds.
pub const MIN_DURATION_SECONDS: u32 = 30;
/// Longest accepted target duration, in seconds.
pub const MAX_DURATION_SECONDS: u32 = 300;

/// Raw, unvalidated brief as received from a client.
///
/// Missing text fields deserialize as empty strings so that they surface as
/// field-level validation errors rather than as decode failures.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BriefRequest {
    /// What the video is about.
    #[serde(default)]
    #[validate(length(min = 3, max = 200, message = "must be between 3 and 200 characters"))]
    pub topic: String,

    /// Who the video is for.
    #[serde(default)]
    #[validate(length(min = 3, max = 200, message = "must be between 3 and 200 characters"))]
    pub target_audience: String,

    /// What the video should achieve.
    #[serde(default)]
    #[validate(length(min = 3, max = 1000, message = "must be between 3 and 1000 characters"))]
    pub content_goals: String,

    /// Desired voice, e.g. "playful".
    #[serde(default)]
    pub tone: Option<String>,

    /// Search keywords, in priority order.
    #[serde(default)]
    pub keywords: Option<Vec<String>>,

    /// Closing call-to-action line.
    #[serde(default)]
    pub call_to_action: Option<String>,

    /// Target runtime in seconds.
    #[serde(default)]
    #[validate(range(min = 30, max = 300, message = "must be between 30 and 300"))]
    pub duration_seconds: Option<i64>,
}

impl BriefRequest {
    /// Creates a request with the three required fields set.
    #[must_use]
    pub fn new(
        topic: impl Into<String>,
        target_audience: impl Into<String>,
        content_goals: impl Into<String>,
    ) -> Self {
        Self {
            topic: topic.into(),
            target_audience: target_audience.into(),
            content_goals: content_goals.into(),
            ..Self::default()
        }
    }

    /// Sets the tone.
    #[must_use]
    pub fn with_tone(mut self, tone: impl Into<String>) -> Self {
        self.tone = Some(tone.into());
        self
    }

    /// Sets the keywords.
    #[must_use]
    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = Some(keywords.into_iter().map(Into::into).collect());
        self
    }

    /// Sets the call to action.
    #[must_use]
    pub fn with_call_to_action(mut self, cta: impl Into<String>) -> Self {
        self.call_to_action = Some(cta.into());
        self
    }

    /// Sets the target duration.
    #[must_use]
    pub fn with_duration_seconds(mut self, seconds: i64) -> Self {
        self.duration_seconds = Some(seconds);
        self
    }

    /// Trims text and turns blank optionals into `None`.
    fn normalized(self) -> Self {
        Self {
            topic: self.topic.trim().to_string(),
            target_audience: self.target_audience.trim().to_string(),
            content_goals: self.content_goals.trim().to_string(),
            tone: non_blank(self.tone),
            keywords: self
                .keywords
                .map(|kws| kws.iter().map(|k| k.trim().to_string()).collect::<Vec<_>>())
                .filter(|kws| !kws.is_empty()),
            call_to_action: non_blank(self.call_to_action),
            duration_seconds: self.duration_seconds,
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Maps a Rust field name to its wire name.
fn wire_name(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// A validated creative brief.
///
/// Only constructible through validation, and exposes no mutators, so every
/// stage of a run sees the identical input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "BriefRequest")]
pub struct Brief {
    topic: String,
    target_audience: String,
    content_goals: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    tone: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    keywords: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    call_to_action: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    duration_seconds: Option<u32>,
}

impl Brief {
    /// Validates a raw request into a brief.
    ///
    /// Text is trimmed before length checks, blank optional text becomes
    /// `None`, and an empty keyword list is treated as absent.
    pub fn from_request(request: BriefRequest) -> Result<Self, BriefValidationError> {
        let request = request.normalized();
        let mut fields = Vec::new();

        if let Err(errors) = request.validate() {
            for (field, errs) in errors.field_errors() {
                let field = wire_name(&field.to_string());
                for err in errs {
                    let message = err
                        .message
                        .as_ref()
                        .map_or_else(|| err.code.to_string(), ToString::to_string);
                    fields.push(FieldError::new(field.clone(), err.code.to_string(), message));
                }
            }
        }

        if let Some(keywords) = &request.keywords {
            if keywords.iter().any(String::is_empty) {
                fields.push(FieldError::new("keywords", "blank", "keywords must not be blank"));
            }
        }

        if !fields.is_empty() {
            return Err(BriefValidationError::new(fields));
        }

        // Range-checked above.
        let duration_seconds = request
            .duration_seconds
            .and_then(|d| u32::try_from(d).ok());

        Ok(Self {
            topic: request.topic,
            target_audience: request.target_audience,
            content_goals: request.content_goals,
            tone: request.tone,
            keywords: request.keywords.unwrap_or_default(),
            call_to_action: request.call_to_action,
            duration_seconds,
        })
    }

    /// Runs an accepted brief through validation again.
    ///
    /// Validation is idempotent: this always returns an identical brief.
    pub fn revalidate(&self) -> Result<Self, BriefValidationError> {
        Self::from_request(BriefRequest::from(self.clone()))
    }

    /// What the video is about.
    #[must_use]
    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Who the video is for.
    #[must_use]
    pub fn target_audience(&self) -> &str {
        &self.target_audience
    }

    /// What the video should achieve.
    #[must_use]
    pub fn content_goals(&self) -> &str {
        &self.content_goals
    }

    /// Desired voice, if any.
    #[must_use]
    pub fn tone(&self) -> Option<&str> {
        self.tone.as_deref()
    }

    /// Keywords in priority order; empty when none were given.
    #[must_use]
    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// Closing call-to-action, if any.
    #[must_use]
    pub fn call_to_action(&self) -> Option<&str> {
        self.call_to_action.as_deref()
    }

    /// Target runtime in seconds, if one was requested.
    #[must_use]
    pub fn duration_seconds(&self) -> Option<u32> {
        self.duration_seconds
    }

    /// Stable SHA-256 digest of the brief's canonical JSON form.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        sha256_hex(serde_json::to_vec(self).unwrap_or_default())
    }
}

impl TryFrom<BriefRequest> for Brief {
    type Error = BriefValidationError;

    fn try_from(request: BriefRequest) -> Result<Self, Self::Error> {
        Self::from_request(request)
    }
}

impl From<Brief> for BriefRequest {
    fn from(brief: Brief) -> Self {
        Self {
            topic: brief.topic,
            target_audience: brief.target_audience,
            content_goals: brief.content_goals,
            tone: brief.tone,
            keywords: Some(brief.keywords).filter(|k| !k.is_empty()),
            call_to_action: brief.call_to_action,
            duration_seconds: brief.duration_seconds.map(i64::from),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn base() -> BriefRequest {
        BriefRequest::new(
            "AI automation for video creators",
            "Busy YouTubers",
            "Educate on automation",
        )
    }

    #[test]
    fn test_minimal_brief_accepted() {
        let brief = Brief::from_request(base()).unwrap();

        assert_eq!(brief.topic(), "AI automation for video creators");
        assert_eq!(brief.target_audience(), "Busy YouTubers");
        assert!(brief.keywords().is_empty());
        assert_eq!(brief.duration_seconds(), None);
    }

    #[test]
    fn test_duration_bounds() {
        for (seconds, ok) in [(29, false), (30, true), (300, true), (301, false)] {
            let result = Brief::from_request(base().with_duration_seconds(seconds));
            assert_eq!(result.is_ok(), ok, "duration {seconds}");
            if let Err(err) = result {
                assert!(err.has_field("durationSeconds"));
            }
        }
    }

    #[test]
    fn test_negative_duration_rejected() {
        let err = Brief::from_request(base().with_duration_seconds(-5)).unwrap_err();
        assert!(err.has_field("durationSeconds"));
    }

    #[test]
    fn test_short_required_fields_rejected() {
        let request = BriefRequest::new("  AI ", "", "ok");
        let err = Brief::from_request(request).unwrap_err();

        assert!(err.has_field("topic"));
        assert!(err.has_field("targetAudience"));
        assert!(err.has_field("contentGoals"));
        assert_eq!(err.fields.len(), 3);
    }

    #[test]
    fn test_text_is_trimmed_and_blank_optionals_dropped() {
        let request = BriefRequest {
            tone: Some("   ".into()),
            call_to_action: Some("  Subscribe for more  ".into()),
            ..BriefRequest::new("  Rust tips  ", "Developers", "Teach ownership")
        };
        let brief = Brief::from_request(request).unwrap();

        assert_eq!(brief.topic(), "Rust tips");
        assert_eq!(brief.tone(), None);
        assert_eq!(brief.call_to_action(), Some("Subscribe for more"));
    }

    #[test]
    fn test_blank_keyword_rejected() {
        let err = Brief::from_request(base().with_keywords(["automation", "  "])).unwrap_err();
        assert!(err.has_field("keywords"));
    }

    #[test]
    fn test_empty_keyword_list_is_absent() {
        let brief = Brief::from_request(base().with_keywords(Vec::<String>::new())).unwrap();
        assert!(brief.keywords().is_empty());
    }

    #[test]
    fn test_revalidate_is_identity() {
        let brief = Brief::from_request(
            base()
                .with_tone("energetic")
                .with_keywords(["automation", "workflow"])
                .with_call_to_action("Try it today")
                .with_duration_seconds(120),
        )
        .unwrap();

        assert_eq!(brief.revalidate().unwrap(), brief);
    }

    #[test]
    fn test_deserialize_goes_through_validation() {
        let ok: Result<Brief, _> = serde_json::from_value(serde_json::json!({
            "topic": "AI automation for video creators",
            "targetAudience": "Busy YouTubers",
            "contentGoals": "Educate on automation",
            "durationSeconds": 120
        }));
        assert_eq!(ok.unwrap().duration_seconds(), Some(120));

        let bad: Result<Brief, _> = serde_json::from_value(serde_json::json!({
            "topic": "AI automation",
            "targetAudience": "Busy YouTubers",
            "contentGoals": "Educate on automation",
            "durationSeconds": 301
        }));
        assert!(bad.is_err());
    }

    #[test]
    fn test_serialize_uses_camel_case() {
        let brief = Brief::from_request(base().with_duration_seconds(60)).unwrap();
        let json = serde_json::to_value(&brief).unwrap();

        assert_eq!(json["targetAudience"], "Busy YouTubers");
        assert_eq!(json["durationSeconds"], 60);
        assert!(json.get("tone").is_none());
    }

    #[test]
    fn test_fingerprint_tracks_content() {
        let a = Brief::from_request(base()).unwrap();
        let b = Brief::from_request(base()).unwrap();
        let c = Brief::from_request(base().with_tone("calm")).unwrap();

        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_ne!(a.fingerprint(), c.fingerprint());
    }

    #[test]
    fn test_wire_name() {
        assert_eq!(wire_name("duration_seconds"), "durationSeconds");
        assert_eq!(wire_name("topic"), "topic");
    }
}
