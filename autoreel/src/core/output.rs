//! Stage output value types.

use serde::{Deserialize, Serialize};

/// One section of a video script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptSection {
    /// Section heading; doubles as the scene identifier for visual prompts.
    pub heading: String,
    /// Voice-over narrative.
    pub narrative: String,
    /// Planned runtime of the section.
    pub duration_seconds: u32,
}

impl ScriptSection {
    /// Creates a new section.
    #[must_use]
    pub fn new(heading: impl Into<String>, narrative: impl Into<String>, duration_seconds: u32) -> Self {
        Self {
            heading: heading.into(),
            narrative: narrative.into(),
            duration_seconds,
        }
    }
}

/// Structured video script produced by the Scriptwriter stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Script {
    /// Opening line.
    pub hook: String,
    /// Body sections in playback order.
    pub sections: Vec<ScriptSection>,
    /// Closing line.
    pub outro: String,
}

impl Script {
    /// Sum of all section durations.
    #[must_use]
    pub fn total_duration_seconds(&self) -> u32 {
        self.sections.iter().map(|s| s.duration_seconds).sum()
    }

    /// Looks up a section by heading.
    #[must_use]
    pub fn section(&self, heading: &str) -> Option<&ScriptSection> {
        self.sections.iter().find(|s| s.heading == heading)
    }
}

/// Visual-generation prompt for one scene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualPrompt {
    /// Heading of the script section this scene illustrates.
    pub scene: String,
    /// Description of the desired visual.
    pub prompt: String,
    /// How long the visual stays on screen.
    pub duration_seconds: u32,
}

impl VisualPrompt {
    /// Creates a new prompt.
    #[must_use]
    pub fn new(scene: impl Into<String>, prompt: impl Into<String>, duration_seconds: u32) -> Self {
        Self {
            scene: scene.into(),
            prompt: prompt.into(),
            duration_seconds,
        }
    }
}

/// Output of the Renderer stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderOutput {
    /// Where the rendered asset can be downloaded.
    pub video_download_url: String,
}

/// Listing metadata attached to a published video.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishMetadata {
    /// Platform tags, unique and in priority order.
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Output of the Publisher stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishOutput {
    /// Public watch URL.
    pub youtube_video_url: String,
    /// Listing metadata.
    #[serde(default)]
    pub metadata: PublishMetadata,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn script() -> Script {
        Script {
            hook: "Stop editing by hand.".into(),
            sections: vec![
                ScriptSection::new("Why automate", "Time is the bottleneck.", 40),
                ScriptSection::new("The workflow", "Brief in, video out.", 50),
            ],
            outro: "See you next time.".into(),
        }
    }

    #[test]
    fn test_total_duration() {
        assert_eq!(script().total_duration_seconds(), 90);
    }

    #[test]
    fn test_section_lookup() {
        let script = script();
        assert!(script.section("The workflow").is_some());
        assert!(script.section("Missing").is_none());
    }

    #[test]
    fn test_wire_format_is_camel_case() {
        let json = serde_json::to_value(script()).unwrap();
        assert_eq!(json["sections"][0]["durationSeconds"], 40);

        let publish = PublishOutput {
            youtube_video_url: "https://youtu.be/abc".into(),
            metadata: PublishMetadata {
                tags: vec!["automation".into()],
            },
        };
        let json = serde_json::to_value(&publish).unwrap();
        assert_eq!(json["youtubeVideoUrl"], "https://youtu.be/abc");
        assert_eq!(json["metadata"]["tags"][0], "automation");
    }

    #[test]
    fn test_publish_output_tolerates_missing_metadata() {
        let publish: PublishOutput =
            serde_json::from_str(r#"{"youtubeVideoUrl":"https://youtu.be/x"}"#).unwrap();
        assert!(publish.metadata.tags.is_empty());
    }
}
