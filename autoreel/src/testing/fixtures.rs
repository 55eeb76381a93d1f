//! Sample inputs shared by tests, benches and demos.

use crate::core::{Brief, BriefRequest, Script, ScriptSection, VisualPrompt};

/// The reference brief: a two-minute explainer for YouTubers.
#[must_use]
pub fn sample_request() -> BriefRequest {
    BriefRequest::new(
        "AI automation for video creators",
        "Busy YouTubers",
        "Educate on automation",
    )
    .with_duration_seconds(120)
}

/// [`sample_request`], validated.
///
/// # Panics
///
/// Never in practice; the sample request satisfies every rule.
#[must_use]
pub fn sample_brief() -> Brief {
    match Brief::from_request(sample_request()) {
        Ok(brief) => brief,
        Err(e) => panic!("sample brief must be valid: {e}"),
    }
}

/// A three-section script matching the sample brief.
#[must_use]
pub fn sample_script() -> Script {
    Script {
        hook: "You are editing by hand. Stop.".into(),
        sections: vec![
            ScriptSection::new("The bottleneck", "Where the hours actually go.", 40),
            ScriptSection::new("The workflow", "Brief in, finished video out.", 50),
            ScriptSection::new("First steps", "Automate one repeatable task this week.", 30),
        ],
        outro: "Subscribe for the full toolkit.".into(),
    }
}

/// One prompt per section of `script`, in order.
#[must_use]
pub fn sample_prompts(script: &Script) -> Vec<VisualPrompt> {
    script
        .sections
        .iter()
        .map(|s| {
            VisualPrompt::new(
                s.heading.clone(),
                format!("B-roll for {}", s.heading.to_lowercase()),
                s.duration_seconds,
            )
        })
        .collect()
}
