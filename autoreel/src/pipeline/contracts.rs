//! Output checks applied between stages.
//!
//! Adapters are external collaborators, so the orchestrator verifies the
//! shape each downstream stage relies on. A violation is attributed to the
//! stage that produced the output.

use std::collections::HashSet;

use crate::core::{PublishOutput, RenderOutput, Script, VisualPrompt};
use crate::errors::AdapterError;

/// A script needs at least one section and unique headings, since headings
/// identify scenes.
pub(crate) fn check_script(script: &Script) -> Result<(), AdapterError> {
    if script.sections.is_empty() {
        return Err(AdapterError::contract_violation("script has no sections"));
    }

    let mut seen = HashSet::with_capacity(script.sections.len());
    for section in &script.sections {
        if !seen.insert(section.heading.as_str()) {
            return Err(AdapterError::contract_violation(format!(
                "duplicate section heading '{}'",
                section.heading
            )));
        }
    }
    Ok(())
}

/// Prompts must pair one-to-one with the script's sections.
pub(crate) fn check_prompts(script: &Script, prompts: &[VisualPrompt]) -> Result<(), AdapterError> {
    if prompts.len() != script.sections.len() {
        return Err(AdapterError::contract_violation(format!(
            "expected {} visual prompts, got {}",
            script.sections.len(),
            prompts.len()
        )));
    }

    let mut used = HashSet::with_capacity(prompts.len());
    for prompt in prompts {
        if script.section(&prompt.scene).is_none() {
            return Err(AdapterError::contract_violation(format!(
                "scene '{}' matches no script section",
                prompt.scene
            )));
        }
        if !used.insert(prompt.scene.as_str()) {
            return Err(AdapterError::contract_violation(format!(
                "scene '{}' appears more than once",
                prompt.scene
            )));
        }
    }
    Ok(())
}

pub(crate) fn check_render(render: &RenderOutput) -> Result<(), AdapterError> {
    if render.video_download_url.trim().is_empty() {
        return Err(AdapterError::contract_violation("empty video download URL"));
    }
    Ok(())
}

pub(crate) fn check_publish(publish: &PublishOutput) -> Result<(), AdapterError> {
    if publish.youtube_video_url.trim().is_empty() {
        return Err(AdapterError::contract_violation("empty video URL"));
    }
    Ok(())
}
