//! Built-in agent definitions.
//!
//! Prompt templates may reference `{prefix}`, the agent's storage prefix
//! (e.g. `s3://company-bedrock-agents/agents/baseball-video-analyzer`).

/// A built-in agent definition selectable with `--preset`.
#[derive(Debug, Clone, Copy)]
pub struct AgentPreset {
    pub name: &'static str,
    pub description: &'static str,
    pub instruction: &'static str,
    /// Placeholder folders created in a dedicated bucket.
    pub folders: &'static [&'static str],
    /// Smoke-test prompts sent by `agentctl test`.
    pub prompts: &'static [&'static str],
}

pub const DEFAULT_PRESET: &str = "baseball-video-analyzer";

pub const PRESETS: &[AgentPreset] = &[
    AgentPreset {
        name: "baseball-video-analyzer",
        description: "Analyzes baseball videos to extract game insights",
        instruction: "You are a baseball video analysis assistant. You help users analyze baseball game footage to extract:
- Scoreboard information (teams, scores, inning, count)
- Player identification (jersey numbers, positions)
- Key plays (hits, strikeouts, fielding actions)
Provide detailed, structured analysis of baseball videos.",
        folders: &["videos/", "artifacts/"],
        prompts: &[
            "What kind of information can you extract from baseball videos?",
            "Analyze a baseball video at {prefix}/videos/sample.mp4",
            "What scoreboard information do you look for?",
        ],
    },
    AgentPreset {
        name: "sports-video-analyzer",
        description: "Analyzes sports videos to extract game insights",
        instruction: "You are a sports video analysis assistant. You help users analyze sports game footage to extract:
- Scoreboard information (teams, scores, time/period, game state)
- Player identification (jersey numbers, positions, names)
- Key plays (goals, assists, shots, passes, defensive actions, scoring plays)
- Game statistics and highlights
You can analyze videos from various sports including soccer, basketball, football, hockey, and more.
Provide detailed, structured analysis of sports videos.",
        folders: &["videos/", "artifacts/"],
        prompts: &[
            "What kind of information can you extract from sports videos?",
            "Analyze a sports video at {prefix}/videos/sample.mp4",
            "Which sports can you analyze?",
        ],
    },
    AgentPreset {
        name: "image-scanner-agent",
        description: "Scans images and outputs analysis to JSON format",
        instruction: "You are an image analysis assistant. When given an image, you:
1. Analyze the image content (objects, people, text, scenes, colors)
2. Extract any visible text (OCR)
3. Identify key elements and their locations
4. Output the analysis in structured JSON format with these fields:
   - objects: list of detected objects
   - text: any text found in the image
   - scene: description of the overall scene
   - colors: dominant colors
   - metadata: image properties
Provide detailed, accurate analysis in valid JSON format.",
        folders: &["images/", "output/"],
        prompts: &[
            "What fields does your JSON analysis contain?",
            "Analyze the image at {prefix}/images/sample.jpg",
        ],
    },
];

/// Look up a preset by name.
#[must_use]
pub fn find_preset(name: &str) -> Option<&'static AgentPreset> {
    PRESETS.iter().find(|p| p.name == name)
}

/// Comma-separated preset names, for error messages.
#[must_use]
pub fn preset_names() -> String {
    PRESETS.iter().map(|p| p.name).collect::<Vec<_>>().join(", ")
}

/// Substitute `{prefix}` in a prompt template.
#[must_use]
pub fn render_prompt(template: &str, prefix: &str) -> String {
    template.replace("{prefix}", prefix)
}
