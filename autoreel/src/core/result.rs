//! Aggregated result of a fully successful run.

use serde::Serialize;

use super::{PublishMetadata, PublishOutput, RenderOutput, Script, VisualPrompt};

/// Everything a successful run produced.
///
/// Only the orchestrator assembles one, and only after all four stages
/// succeeded. The type is serialize-only, so there is no way to build a
/// partial result from outside the crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineResult {
    script: Script,
    visual_prompts: Vec<VisualPrompt>,
    video_download_url: String,
    youtube_video_url: String,
    metadata: PublishMetadata,
}

impl PipelineResult {
    pub(crate) fn assemble(
        script: Script,
        visual_prompts: Vec<VisualPrompt>,
        render: RenderOutput,
        publish: PublishOutput,
    ) -> Self {
        Self {
            script,
            visual_prompts,
            video_download_url: render.video_download_url,
            youtube_video_url: publish.youtube_video_url,
            metadata: publish.metadata,
        }
    }

    /// The script.
    #[must_use]
    pub fn script(&self) -> &Script {
        &self.script
    }

    /// One visual prompt per script section, in section order.
    #[must_use]
    pub fn visual_prompts(&self) -> &[VisualPrompt] {
        &self.visual_prompts
    }

    /// Rendered asset locator.
    #[must_use]
    pub fn video_download_url(&self) -> &str {
        &self.video_download_url
    }

    /// Public watch locator.
    #[must_use]
    pub fn youtube_video_url(&self) -> &str {
        &self.youtube_video_url
    }

    /// Listing metadata.
    #[must_use]
    pub fn metadata(&self) -> &PublishMetadata {
        &self.metadata
    }

    /// Shorthand for `metadata().tags`.
    #[must_use]
    pub fn tags(&self) -> &[String] {
        &self.metadata.tags
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ScriptSection;

    #[test]
    fn test_assemble_flattens_stage_outputs() {
        let script = Script {
            hook: "hook".into(),
            sections: vec![ScriptSection::new("One", "narrative", 30)],
            outro: "outro".into(),
        };
        let prompts = vec![VisualPrompt::new("One", "a desk at sunrise", 30)];
        let render = RenderOutput {
            video_download_url: "https://cdn.example/v.mp4".into(),
        };
        let publish = PublishOutput {
            youtube_video_url: "https://youtu.be/v".into(),
            metadata: PublishMetadata {
                tags: vec!["desk".into()],
            },
        };

        let result = PipelineResult::assemble(script, prompts, render, publish);

        assert_eq!(result.visual_prompts().len(), result.script().sections.len());
        assert_eq!(result.video_download_url(), "https://cdn.example/v.mp4");
        assert_eq!(result.tags(), ["desk".to_string()]);

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["youtubeVideoUrl"], "https://youtu.be/v");
        assert_eq!(json["visualPrompts"][0]["scene"], "One");
    }
}
