//! Table output for the roster and team listings, using comfy-table.

use comfy_table::{presets, Attribute, Cell, Color, ContentArrangement, Table};
use std::env;

use crate::cli::commands::list::{AgentEntry, TeamEntry};

/// Table formatter for CLI output
pub struct TableFormatter {
    /// Whether to use colors in output
    use_colors: bool,
}

impl TableFormatter {
    pub fn new() -> Self {
        Self {
            use_colors: supports_color(),
        }
    }

    pub fn with_colors(use_colors: bool) -> Self {
        Self { use_colors }
    }

    /// One row per persona: key, name, role, tool access and default model.
    pub fn format_agents(&self, agents: &[AgentEntry]) -> String {
        let mut table = create_base_table();
        table.set_header(header(&["Key", "Name", "Role", "Tools", "Model"]));

        for agent in agents {
            let access = if self.use_colors {
                Cell::new(&agent.tools).fg(access_color(&agent.tools))
            } else {
                Cell::new(&agent.tools)
            };
            table.add_row(vec![
                Cell::new(&agent.key),
                Cell::new(&agent.name),
                Cell::new(&agent.role),
                access,
                Cell::new(&agent.model),
            ]);
        }

        table.to_string()
    }

    pub fn format_teams(&self, teams: &[TeamEntry]) -> String {
        let mut table = create_base_table();
        table.set_header(header(&["Team", "Lead", "Members"]));

        for team in teams {
            let name = if self.use_colors {
                Cell::new(&team.name).fg(Color::Cyan)
            } else {
                Cell::new(&team.name)
            };
            table.add_row(vec![name, Cell::new(&team.lead), Cell::new(team.members.join(", "))]);
        }

        table.to_string()
    }
}

impl Default for TableFormatter {
    fn default() -> Self {
        Self::new()
    }
}

fn header(titles: &[&str]) -> Vec<Cell> {
    titles
        .iter()
        .map(|t| Cell::new(t).add_attribute(Attribute::Bold))
        .collect()
}

fn create_base_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Check if color output is supported
fn supports_color() -> bool {
    if env::var("NO_COLOR").is_ok() {
        return false;
    }
    !matches!(env::var("TERM").as_deref(), Ok("dumb"))
}

fn access_color(access: &str) -> Color {
    match access {
        "read-write" => Color::Yellow,
        "read-only" => Color::Green,
        _ => Color::DarkGrey,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_teams_without_colors() {
        let teams = vec![TeamEntry {
            name: "dev".to_string(),
            lead: "Pain".to_string(),
            members: vec!["Kisame".to_string(), "Itachi".to_string()],
        }];
        let table = TableFormatter::with_colors(false).format_teams(&teams);
        assert!(table.contains("dev"));
        assert!(table.contains("Kisame, Itachi"));
    }
}
