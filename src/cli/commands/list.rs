//! `--list`: the roster and the teams.

use anyhow::Result;
use serde::Serialize;

use crate::cli::output::{output, CommandOutput, TableFormatter};
use crate::domain::models::Pipeline;
use crate::services::presets::Persona;
use crate::services::teams::{dev_pipeline, dev_team, full_pipeline, full_team, DevTeamOptions};

#[derive(Debug, Clone, Serialize)]
pub struct AgentEntry {
    pub key: String,
    pub name: String,
    pub role: String,
    pub tools: String,
    pub model: String,
}

impl From<Persona> for AgentEntry {
    fn from(persona: Persona) -> Self {
        Self {
            key: persona.as_str().to_string(),
            name: persona.display_name().to_string(),
            role: persona.role().to_string(),
            tools: persona.access().as_str().to_string(),
            model: persona.default_model().to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TeamEntry {
    pub name: String,
    pub lead: String,
    pub members: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ListOutput {
    pub agents: Vec<AgentEntry>,
    pub teams: Vec<TeamEntry>,
    /// Stage layout used with `--parallel`, keyed by team.
    pub pipelines: Vec<(String, String)>,
}

/// `Kisame -> [Sasori, Itachi] -> Kisame (fix)`
pub fn describe_pipeline(pipeline: &Pipeline) -> String {
    pipeline
        .stages
        .iter()
        .map(|stage| {
            let names: Vec<&str> = stage.agents.iter().map(|a| a.name.as_str()).collect();
            let members = if stage.is_parallel() {
                format!("[{}]", names.join(", "))
            } else {
                names.join(", ")
            };
            if stage.is_fix() {
                format!("{members} (fix)")
            } else {
                members
            }
        })
        .collect::<Vec<_>>()
        .join(" -> ")
}

impl ListOutput {
    pub fn collect() -> Self {
        let teams = [("dev", dev_team(DevTeamOptions::default())), ("full", full_team(""))]
            .into_iter()
            .map(|(name, lead)| TeamEntry {
                name: name.to_string(),
                members: lead.handoffs.iter().map(|a| a.name.clone()).collect(),
                lead: lead.name,
            })
            .collect();

        Self {
            agents: Persona::all().into_iter().map(AgentEntry::from).collect(),
            teams,
            pipelines: vec![
                ("dev".to_string(), describe_pipeline(&dev_pipeline(""))),
                ("full".to_string(), describe_pipeline(&full_pipeline(""))),
            ],
        }
    }
}

impl CommandOutput for ListOutput {
    fn to_human(&self) -> String {
        let formatter = TableFormatter::new();
        let mut lines = vec![
            "Akatsuki Dev Team".to_string(),
            formatter.format_agents(&self.agents),
            String::new(),
            "Teams".to_string(),
            formatter.format_teams(&self.teams),
            String::new(),
            "Pipelines (--parallel)".to_string(),
        ];
        for (team, layout) in &self.pipelines {
            lines.push(format!("  {team:<6} {layout}"));
        }
        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub fn execute(json_mode: bool) -> Result<()> {
    output(&ListOutput::collect(), json_mode);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_covers_roster_and_teams() {
        let list = ListOutput::collect();
        assert_eq!(list.agents.len(), 9);
        assert_eq!(list.agents[0].name, "Pain");
        assert_eq!(list.teams[0].members, vec!["Kisame", "Sasori", "Itachi", "Hidan"]);
        assert_eq!(list.teams[1].members.len(), 8);
    }

    #[test]
    fn test_describe_dev_pipeline() {
        assert_eq!(
            describe_pipeline(&dev_pipeline("")),
            "Kisame -> [Sasori, Itachi, Hidan] -> Kisame (fix)"
        );
    }

    #[test]
    fn test_json_shape() {
        let json = ListOutput::collect().to_json();
        assert_eq!(json["agents"][1]["key"], "kisame");
        assert_eq!(json["teams"][0]["lead"], "Pain");
    }
}
