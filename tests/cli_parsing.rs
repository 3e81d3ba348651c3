use akatsuki::cli::Cli;
use akatsuki::domain::models::SubstrateType;
use akatsuki::services::Persona;
use clap::Parser;

#[test]
fn test_parse_task_only() {
    let cli = Cli::try_parse_from(["akatsuki", "fix the login bug"]).unwrap();
    assert_eq!(cli.task.as_deref(), Some("fix the login bug"));
    assert!(cli.agent.is_none());
    assert!(cli.team.is_none());
    assert!(cli.agents.is_empty());
    assert!(!cli.parallel);
    assert_eq!(cli.context, "");
    assert!(!cli.is_informational());
}

#[test]
fn test_parse_single_agent() {
    let cli = Cli::try_parse_from(["akatsuki", "--agent", "Hidan", "audit auth"]).unwrap();
    assert_eq!(cli.agent, Some(Persona::Hidan));
}

#[test]
fn test_parse_unknown_agent_fails() {
    assert!(Cli::try_parse_from(["akatsuki", "--agent", "madara", "t"]).is_err());
}

#[test]
fn test_parse_agents_list() {
    let cli = Cli::try_parse_from([
        "akatsuki",
        "--agents",
        "kisame,itachi,hidan",
        "--parallel",
        "--no-fix",
        "add price alerts",
    ])
    .unwrap();
    assert_eq!(cli.agents, vec!["kisame", "itachi", "hidan"]);
    assert!(cli.parallel);
    assert!(cli.no_fix);
    assert_eq!(cli.task.as_deref(), Some("add price alerts"));
}

#[test]
fn test_agent_conflicts_with_agents() {
    let result = Cli::try_parse_from(["akatsuki", "--agent", "kisame", "--agents", "itachi", "t"]);
    assert!(result.is_err());
}

#[test]
fn test_parse_overrides() {
    let cli = Cli::try_parse_from([
        "akatsuki",
        "--team",
        "full",
        "--context",
        "Stack: Next.js",
        "--model",
        "claude-haiku-4-5",
        "--substrate",
        "claude-code",
        "--config",
        "/tmp/custom.yaml",
        "--json",
        "--quiet",
        "t",
    ])
    .unwrap();
    assert_eq!(cli.team.as_deref(), Some("full"));
    assert_eq!(cli.context, "Stack: Next.js");
    assert_eq!(cli.model.as_deref(), Some("claude-haiku-4-5"));
    assert_eq!(cli.substrate, Some(SubstrateType::ClaudeCode));
    assert_eq!(cli.config.unwrap().to_str(), Some("/tmp/custom.yaml"));
    assert!(cli.json);
    assert!(cli.quiet);
}

#[test]
fn test_parse_informational_flags_without_task() {
    let cli = Cli::try_parse_from(["akatsuki", "--list"]).unwrap();
    assert!(cli.task.is_none());
    assert!(cli.is_informational());

    let cli = Cli::try_parse_from(["akatsuki", "--show-config", "--json"]).unwrap();
    assert!(cli.show_config);
    assert!(cli.is_informational());
}

#[test]
fn test_parse_bad_substrate_fails() {
    assert!(Cli::try_parse_from(["akatsuki", "--substrate", "openai", "t"]).is_err());
}
