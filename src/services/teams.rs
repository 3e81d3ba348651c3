//! Pre-built team and pipeline configurations.

use std::sync::Arc;

use crate::domain::models::{create_team, AgentDescriptor, Pipeline, Stage};
use crate::domain::ports::Tool;
use crate::services::presets::{self, PersonaOptions};

/// Names accepted by `--team` and the `team` config key.
pub const TEAM_NAMES: [&str; 2] = ["dev", "full"];

pub const DEV_LEAD_PROMPT: &str = r#"You are Pain, leader of the Akatsuki dev team. For every task:

1. Hand off to **Kisame** to implement the changes
2. Hand off to **Sasori** to write tests
3. Hand off to **Itachi** to review quality
4. Hand off to **Hidan** to check for vulnerabilities

Only mark the task complete when ALL agents have finished and any issues they raised have been addressed.

"#;

pub const FULL_LEAD_PROMPT: &str = r#"You are Pain, leader of the full Akatsuki dev team. Assign tasks to the right specialist:

- **Kisame** — implementation, bug fixes, refactoring
- **Tobi** — mobile development (React Native / Expo)
- **Sasori** — writing and fixing tests
- **Itachi** — code review (read-only)
- **Hidan** — security audit (read-only)
- **Deidara** — debugging and root cause analysis
- **Konan** — documentation
- **Kakuzu** — CI/CD, deployment, infrastructure

Delegate — don't do the work yourself. Run independent tasks in parallel when possible.

"#;

/// Options for [`dev_team`].
#[derive(Default, Clone)]
pub struct DevTeamOptions {
    /// Appended to the lead's prompt (e.g. the tech stack).
    pub extra_instructions: String,
    pub kisame_tools: Option<Vec<Arc<dyn Tool>>>,
    pub sasori_tools: Option<Vec<Arc<dyn Tool>>>,
    /// Should be read-only.
    pub itachi_tools: Option<Vec<Arc<dyn Tool>>>,
    /// Should be read-only.
    pub hidan_tools: Option<Vec<Arc<dyn Tool>>>,
}

impl DevTeamOptions {
    pub fn with_extra_instructions(mut self, extra: impl Into<String>) -> Self {
        self.extra_instructions = extra.into();
        self
    }
}

fn with_tools(tools: Option<Vec<Arc<dyn Tool>>>) -> PersonaOptions {
    PersonaOptions {
        tools,
        ..PersonaOptions::default()
    }
}

/// Pain leading Kisame, Sasori, Itachi and Hidan.
pub fn dev_team(options: DevTeamOptions) -> AgentDescriptor {
    dev_team_with_members(
        &options.extra_instructions,
        vec![
            presets::kisame(with_tools(options.kisame_tools)),
            presets::sasori(with_tools(options.sasori_tools)),
            presets::itachi(with_tools(options.itachi_tools)),
            presets::hidan(with_tools(options.hidan_tools)),
        ],
    )
}

/// The dev team lead over caller-built members.
pub fn dev_team_with_members(extra_instructions: &str, members: Vec<AgentDescriptor>) -> AgentDescriptor {
    create_team(
        "Pain",
        format!("{DEV_LEAD_PROMPT}{extra_instructions}"),
        members,
        None,
    )
}

/// Pain leading all eight specialists.
pub fn full_team(extra_instructions: &str) -> AgentDescriptor {
    full_team_with_members(
        extra_instructions,
        vec![
            presets::kisame(PersonaOptions::default()),
            presets::tobi(PersonaOptions::default()),
            presets::sasori(PersonaOptions::default()),
            presets::itachi(PersonaOptions::default()),
            presets::hidan(PersonaOptions::default()),
            presets::deidara(PersonaOptions::default()),
            presets::konan(PersonaOptions::default()),
            presets::kakuzu(PersonaOptions::default()),
        ],
    )
}

/// The full team lead over caller-built members.
pub fn full_team_with_members(extra_instructions: &str, members: Vec<AgentDescriptor>) -> AgentDescriptor {
    create_team(
        "Pain",
        format!("{FULL_LEAD_PROMPT}{extra_instructions}"),
        members,
        None,
    )
}

/// Members a pipeline is assembled from.
pub struct PipelineMembers {
    pub kisame: AgentDescriptor,
    pub sasori: AgentDescriptor,
    pub itachi: AgentDescriptor,
    pub hidan: AgentDescriptor,
    pub deidara: AgentDescriptor,
    pub konan: AgentDescriptor,
}

impl Default for PipelineMembers {
    fn default() -> Self {
        Self {
            kisame: presets::kisame(PersonaOptions::default()),
            sasori: presets::sasori(PersonaOptions::default()),
            itachi: presets::itachi(PersonaOptions::default()),
            hidan: presets::hidan(PersonaOptions::default()),
            deidara: presets::deidara(PersonaOptions::default()),
            konan: presets::konan(PersonaOptions::default()),
        }
    }
}

/// Implement, review in parallel, then fix.
///
/// Kisame -> [Sasori, Itachi, Hidan] -> Kisame (fix)
pub fn dev_pipeline(extra_instructions: &str) -> Pipeline {
    dev_pipeline_with_members(extra_instructions, PipelineMembers::default())
}

pub fn dev_pipeline_with_members(extra_instructions: &str, members: PipelineMembers) -> Pipeline {
    Pipeline::new(vec![
        Stage::new(vec![members.kisame.clone()]).with_label("implement"),
        Stage::new(vec![members.sasori, members.itachi, members.hidan]).with_label("review"),
        Stage::fix(vec![members.kisame]).with_label("fix"),
    ])
    .with_context(extra_instructions)
}

/// Implement, review (with bug hunting), fix, then document.
///
/// Kisame -> [Sasori, Itachi, Hidan, Deidara] -> Kisame (fix) -> Konan
pub fn full_pipeline(extra_instructions: &str) -> Pipeline {
    full_pipeline_with_members(extra_instructions, PipelineMembers::default())
}

pub fn full_pipeline_with_members(extra_instructions: &str, members: PipelineMembers) -> Pipeline {
    Pipeline::new(vec![
        Stage::new(vec![members.kisame.clone()]).with_label("implement"),
        Stage::new(vec![members.sasori, members.itachi, members.hidan, members.deidara])
            .with_label("review"),
        Stage::fix(vec![members.kisame]).with_label("fix"),
        Stage::new(vec![members.konan]).with_label("docs"),
    ])
    .with_context(extra_instructions)
}
