//! Deterministic adapters that run without any external service.
//!
//! Output depends only on the input, so the same brief always produces the
//! same script, prompts, and locators. Useful for local development, demos,
//! and benchmarks.

use async_trait::async_trait;

use super::{PromptDesigner, Publisher, Renderer, Scriptwriter};
use crate::core::{
    Brief, PublishMetadata, PublishOutput, RenderOutput, Script, ScriptSection, VisualPrompt,
};
use crate::errors::AdapterError;
use crate::utils::sha256_hex;

const SECTION_HEADINGS: [&str; 5] = [
    "Why it matters",
    "The core idea",
    "How it works",
    "Putting it into practice",
    "Common pitfalls",
];

const MAX_TAGS: usize = 15;
const MIN_TAG_WORD_LEN: usize = 3;

/// Splits `total` seconds into `parts` near-equal chunks; earlier chunks
/// absorb the remainder.
fn split_duration(total: u32, parts: usize) -> Vec<u32> {
    let parts_u32 = u32::try_from(parts.max(1)).unwrap_or(1);
    let base = total / parts_u32;
    let remainder = total % parts_u32;
    (0..parts_u32)
        .map(|i| base + u32::from(i < remainder))
        .collect()
}

fn section_count(total_seconds: u32) -> usize {
    match total_seconds {
        0..=60 => 3,
        61..=180 => 4,
        _ => 5,
    }
}

/// Derives listing tags for a brief.
///
/// Keywords win when present; otherwise the topic's words are used. Tags
/// are lowercased, deduplicated, and keep their first-seen order.
#[must_use]
pub fn derive_tags(brief: &Brief) -> Vec<String> {
    let candidates: Vec<String> = if brief.keywords().is_empty() {
        brief
            .topic()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| w.chars().count() >= MIN_TAG_WORD_LEN)
            .map(str::to_lowercase)
            .collect()
    } else {
        brief.keywords().iter().map(|k| k.to_lowercase()).collect()
    };

    let mut tags: Vec<String> = Vec::with_capacity(candidates.len());
    for tag in candidates {
        if !tags.contains(&tag) {
            tags.push(tag);
        }
        if tags.len() == MAX_TAGS {
            break;
        }
    }

    if tags.is_empty() {
        tags.push(brief.topic().to_lowercase());
    }
    tags
}

/// Template-driven scriptwriter.
#[derive(Debug, Clone)]
pub struct OfflineScriptwriter {
    default_duration_seconds: u32,
}

impl Default for OfflineScriptwriter {
    fn default() -> Self {
        Self {
            default_duration_seconds: 60,
        }
    }
}

impl OfflineScriptwriter {
    /// Sets the runtime used when the brief has no duration.
    #[must_use]
    pub fn with_default_duration(mut self, seconds: u32) -> Self {
        self.default_duration_seconds = seconds;
        self
    }
}

#[async_trait]
impl Scriptwriter for OfflineScriptwriter {
    async fn write_script(&self, brief: &Brief) -> Result<Script, AdapterError> {
        let total = brief
            .duration_seconds()
            .unwrap_or(self.default_duration_seconds);
        let durations = split_duration(total, section_count(total));

        let tone = brief.tone().map_or(String::new(), |t| format!(" Keep it {t}."));
        let sections = SECTION_HEADINGS
            .iter()
            .zip(durations)
            .map(|(heading, seconds)| {
                let narrative = format!(
                    "{heading}: {} for {}, in the context of {}.{tone}",
                    brief.content_goals(),
                    brief.target_audience(),
                    brief.topic(),
                );
                ScriptSection::new(*heading, narrative, seconds)
            })
            .collect();

        Ok(Script {
            hook: format!(
                "Here is what {} need to know about {}.",
                brief.target_audience(),
                brief.topic()
            ),
            sections,
            outro: brief
                .call_to_action()
                .unwrap_or("Thanks for watching.")
                .to_string(),
        })
    }
}

/// Prompt designer that turns each section into one styled scene.
#[derive(Debug, Clone)]
pub struct OfflinePromptDesigner {
    style: String,
}

impl Default for OfflinePromptDesigner {
    fn default() -> Self {
        Self {
            style: "cinematic, soft natural light, 16:9".to_string(),
        }
    }
}

impl OfflinePromptDesigner {
    /// Overrides the visual style suffix.
    #[must_use]
    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = style.into();
        self
    }
}

#[async_trait]
impl PromptDesigner for OfflinePromptDesigner {
    async fn design_prompts(&self, script: &Script) -> Result<Vec<VisualPrompt>, AdapterError> {
        Ok(script
            .sections
            .iter()
            .map(|section| {
                VisualPrompt::new(
                    section.heading.clone(),
                    format!("Scene illustrating \"{}\", {}", section.heading, self.style),
                    section.duration_seconds,
                )
            })
            .collect())
    }
}

/// Renderer that derives a stable asset URL from the prompts.
#[derive(Debug, Clone)]
pub struct OfflineRenderer {
    base_url: String,
}

impl Default for OfflineRenderer {
    fn default() -> Self {
        Self {
            base_url: "https://render.autoreel.local/videos".to_string(),
        }
    }
}

impl OfflineRenderer {
    /// Overrides the asset base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl Renderer for OfflineRenderer {
    async fn render(
        &self,
        prompts: &[VisualPrompt],
        _script: &Script,
    ) -> Result<RenderOutput, AdapterError> {
        if prompts.is_empty() {
            return Err(AdapterError::rejected("nothing to render"));
        }

        let payload = serde_json::to_vec(prompts)
            .map_err(|e| AdapterError::invalid_response(e.to_string()))?;
        let digest = sha256_hex(payload);

        Ok(RenderOutput {
            video_download_url: format!(
                "{}/{}.mp4",
                self.base_url.trim_end_matches('/'),
                &digest[..16]
            ),
        })
    }
}

/// Publisher that derives a watch URL from the rendered asset.
#[derive(Debug, Clone)]
pub struct OfflinePublisher {
    watch_base_url: String,
}

impl Default for OfflinePublisher {
    fn default() -> Self {
        Self {
            watch_base_url: "https://www.youtube.com/watch?v=".to_string(),
        }
    }
}

#[async_trait]
impl Publisher for OfflinePublisher {
    async fn publish(
        &self,
        render: &RenderOutput,
        brief: &Brief,
    ) -> Result<PublishOutput, AdapterError> {
        let video_id = &sha256_hex(&render.video_download_url)[..11];
        Ok(PublishOutput {
            youtube_video_url: format!("{}{video_id}", self.watch_base_url),
            metadata: PublishMetadata {
                tags: derive_tags(brief),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::BriefRequest;
    use crate::testing::sample_brief;
    use pretty_assertions::assert_eq;

    fn brief_with_duration(seconds: i64) -> Brief {
        Brief::from_request(
            BriefRequest::new("Home espresso", "New baristas", "Dial in a first shot")
                .with_duration_seconds(seconds),
        )
        .unwrap()
    }

    #[test]
    fn test_split_duration_sums_to_total() {
        assert_eq!(split_duration(60, 3), vec![20, 20, 20]);
        assert_eq!(split_duration(61, 3), vec![21, 20, 20]);
        assert_eq!(split_duration(301, 5).iter().sum::<u32>(), 301);
    }

    #[tokio::test]
    async fn test_script_sections_scale_with_duration() {
        let writer = OfflineScriptwriter::default();

        let short = writer.write_script(&brief_with_duration(30)).await.unwrap();
        let long = writer.write_script(&brief_with_duration(300)).await.unwrap();

        assert_eq!(short.sections.len(), 3);
        assert_eq!(long.sections.len(), 5);
        assert_eq!(long.total_duration_seconds(), 300);
    }

    #[tokio::test]
    async fn test_script_defaults_duration_and_outro() {
        let brief = Brief::from_request(BriefRequest::new(
            "Home espresso",
            "New baristas",
            "Dial in a first shot",
        ))
        .unwrap();

        let script = OfflineScriptwriter::default().write_script(&brief).await.unwrap();

        assert_eq!(script.total_duration_seconds(), 60);
        assert_eq!(script.outro, "Thanks for watching.");
    }

    #[tokio::test]
    async fn test_prompts_cover_each_section_once() {
        let script = OfflineScriptwriter::default()
            .write_script(&sample_brief())
            .await
            .unwrap();
        let prompts = OfflinePromptDesigner::default()
            .design_prompts(&script)
            .await
            .unwrap();

        let scenes: Vec<&str> = prompts.iter().map(|p| p.scene.as_str()).collect();
        let headings: Vec<&str> = script.sections.iter().map(|s| s.heading.as_str()).collect();
        assert_eq!(scenes, headings);
    }

    #[tokio::test]
    async fn test_render_is_deterministic() {
        let prompts = vec![VisualPrompt::new("One", "a quiet desk", 30)];
        let script = crate::testing::sample_script();
        let renderer = OfflineRenderer::default();

        let a = renderer.render(&prompts, &script).await.unwrap();
        let b = renderer.render(&prompts, &script).await.unwrap();

        assert_eq!(a, b);
        assert!(a.video_download_url.ends_with(".mp4"));
    }

    #[tokio::test]
    async fn test_render_rejects_empty_prompts() {
        let err = OfflineRenderer::default()
            .render(&[], &crate::testing::sample_script())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "rejected");
    }

    #[test]
    fn test_tags_from_keywords_are_deduplicated() {
        let brief = Brief::from_request(
            BriefRequest::new("Home espresso", "New baristas", "Dial in a first shot")
                .with_keywords(["Espresso", "grinder", "espresso"]),
        )
        .unwrap();

        assert_eq!(derive_tags(&brief), vec!["espresso", "grinder"]);
    }

    #[test]
    fn test_tags_fall_back_to_topic_words() {
        let brief = Brief::from_request(BriefRequest::new(
            "AI for small teams",
            "Founders",
            "Pick one workflow to automate",
        ))
        .unwrap();

        assert_eq!(derive_tags(&brief), vec!["for", "small", "teams"]);
    }

    #[tokio::test]
    async fn test_publish_uses_watch_url() {
        let render = RenderOutput {
            video_download_url: "https://render.autoreel.local/videos/abc.mp4".into(),
        };
        let out = OfflinePublisher::default()
            .publish(&render, &sample_brief())
            .await
            .unwrap();

        assert!(out
            .youtube_video_url
            .starts_with("https://www.youtube.com/watch?v="));
        assert_eq!(out.youtube_video_url.len(), "https://www.youtube.com/watch?v=".len() + 11);
    }
}
