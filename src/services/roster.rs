//! Roster assembly: personas, squads, teams and pipelines built from the
//! project configuration plus command-line overrides.
//!
//! Instruction text is layered as YAML `context`, then the per-agent
//! `extra`, then the command-line context. Model precedence is
//! command line, then per-agent YAML, then the persona default.

use tracing::debug;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{create_team, AgentDescriptor, Config, Pipeline, Stage};
use crate::services::presets::{Persona, PersonaOptions};
use crate::services::teams::{
    dev_pipeline_with_members, dev_team_with_members, full_pipeline_with_members,
    full_team_with_members, PipelineMembers, TEAM_NAMES,
};

/// Overrides given on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliOverrides {
    /// Appended after the YAML context and per-agent extra.
    pub context: String,
    /// Wins over every configured model.
    pub model: Option<String>,
}

impl CliOverrides {
    pub fn new(context: impl Into<String>, model: Option<String>) -> Self {
        Self {
            context: context.into(),
            model,
        }
    }
}

/// Parse persona keys, reporting every unknown one at once.
///
/// Blank entries (as produced by `a,,b`) are skipped.
pub fn resolve_personas<S: AsRef<str>>(names: &[S]) -> DomainResult<Vec<Persona>> {
    let mut personas = Vec::with_capacity(names.len());
    let mut unknown = Vec::new();

    for name in names.iter().map(AsRef::as_ref).map(str::trim) {
        if name.is_empty() {
            continue;
        }
        match name.parse::<Persona>() {
            Ok(persona) => personas.push(persona),
            Err(_) => unknown.push(name.to_string()),
        }
    }

    if !unknown.is_empty() {
        return Err(DomainError::UnknownAgents {
            unknown,
            valid: Persona::keys(),
        });
    }
    if personas.is_empty() {
        return Err(DomainError::UnknownAgents {
            unknown: vec![],
            valid: Persona::keys(),
        });
    }
    Ok(personas)
}

/// Layered instruction text for `persona`; blank parts are dropped.
fn layered_instructions(persona: Persona, config: &Config, cli: &CliOverrides) -> String {
    let overrides = config.agent_overrides(persona.as_str());
    [
        config.context.as_str(),
        overrides.extra.as_deref().unwrap_or(""),
        cli.context.as_str(),
    ]
    .into_iter()
    .map(str::trim)
    .filter(|part| !part.is_empty())
    .collect::<Vec<_>>()
    .join("\n\n")
}

fn resolved_model(persona: Persona, config: &Config, cli: &CliOverrides) -> String {
    cli.model
        .clone()
        .or_else(|| config.agent_overrides(persona.as_str()).model)
        .unwrap_or_else(|| persona.default_model().to_string())
}

/// Build one persona with its default tools and every override applied.
pub fn build_agent_with_overrides(
    persona: Persona,
    config: &Config,
    cli: &CliOverrides,
) -> AgentDescriptor {
    let options = PersonaOptions::new()
        .with_extra_instructions(layered_instructions(persona, config, cli))
        .with_model(resolved_model(persona, config, cli));
    persona.build_with_default_tools(options)
}

fn custom_squad_prompt(members: &[Persona]) -> String {
    let steps = members
        .iter()
        .enumerate()
        .map(|(i, p)| format!("{}. Hand off to **{}** ({})", i + 1, p.display_name(), p.role()))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "You are Pain, leader of a custom Akatsuki squad. For every task:\n\n{steps}\n\n\
         Only mark the task complete when ALL agents have finished and any issues \
         they raised have been addressed.\n\n"
    )
}

/// Pain leading the named members via handoffs.
pub fn build_custom_squad<S: AsRef<str>>(
    names: &[S],
    config: &Config,
    cli: &CliOverrides,
) -> DomainResult<AgentDescriptor> {
    let personas = resolve_personas(names)?;
    let members: Vec<AgentDescriptor> = personas
        .iter()
        .map(|p| build_agent_with_overrides(*p, config, cli))
        .collect();

    debug!(members = ?personas, "Building custom squad");
    let instructions = format!(
        "{}{}",
        custom_squad_prompt(&personas),
        layered_instructions(Persona::Pain, config, cli)
    );
    let model = resolved_model(Persona::Pain, config, cli);
    Ok(create_team("Pain", instructions, members, Some(&model)))
}

fn unknown_team(team: &str) -> DomainError {
    DomainError::UnknownTeam {
        name: team.to_string(),
        valid: TEAM_NAMES.iter().map(|t| t.to_string()).collect(),
    }
}

/// The dev or full handoff team with overrides applied to every member.
pub fn build_named_team(team: &str, config: &Config, cli: &CliOverrides) -> DomainResult<AgentDescriptor> {
    let build = |p: Persona| build_agent_with_overrides(p, config, cli);
    let lead_extra = layered_instructions(Persona::Pain, config, cli);

    let lead = match team.trim().to_lowercase().as_str() {
        "dev" => dev_team_with_members(
            &lead_extra,
            [Persona::Kisame, Persona::Sasori, Persona::Itachi, Persona::Hidan]
                .into_iter()
                .map(build)
                .collect(),
        ),
        "full" => full_team_with_members(
            &lead_extra,
            Persona::all()
                .into_iter()
                .filter(|p| *p != Persona::Pain)
                .map(build)
                .collect(),
        ),
        _ => return Err(unknown_team(team)),
    };
    Ok(lead.with_model(resolved_model(Persona::Pain, config, cli)))
}

/// A pipeline over the named personas.
///
/// One name runs alone. `[lead, rest...]` runs the lead, then the rest in
/// parallel, then (with `with_fix`) the lead again as a fix stage.
pub fn build_custom_pipeline<S: AsRef<str>>(
    names: &[S],
    config: &Config,
    cli: &CliOverrides,
    with_fix: bool,
) -> DomainResult<Pipeline> {
    let personas = resolve_personas(names)?;
    let mut agents = personas
        .iter()
        .map(|p| build_agent_with_overrides(*p, config, cli));

    // resolve_personas never returns an empty list
    let Some(lead) = agents.next() else {
        return Err(DomainError::EmptyPipeline);
    };
    let rest: Vec<AgentDescriptor> = agents.collect();

    if rest.is_empty() {
        return Ok(Pipeline::new(vec![Stage::new(vec![lead])]));
    }

    let mut stages = vec![
        Stage::new(vec![lead.clone()]).with_label(lead.name.clone()),
        Stage::new(rest).with_label("review"),
    ];
    if with_fix {
        stages.push(Stage::fix(vec![lead]).with_label("fix"));
    }
    Ok(Pipeline::new(stages))
}

/// The dev or full pipeline with overrides applied to every member.
pub fn build_named_pipeline(team: &str, config: &Config, cli: &CliOverrides) -> DomainResult<Pipeline> {
    let build = |p: Persona| build_agent_with_overrides(p, config, cli);
    let members = PipelineMembers {
        kisame: build(Persona::Kisame),
        sasori: build(Persona::Sasori),
        itachi: build(Persona::Itachi),
        hidan: build(Persona::Hidan),
        deidara: build(Persona::Deidara),
        konan: build(Persona::Konan),
    };

    match team.trim().to_lowercase().as_str() {
        "dev" => Ok(dev_pipeline_with_members("", members)),
        "full" => Ok(full_pipeline_with_members("", members)),
        _ => Err(unknown_team(team)),
    }
}
