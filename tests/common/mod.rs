//! Common test utilities for integration tests
//!
//! Shared fixtures used across the integration test files.

#![allow(dead_code)]

use std::sync::Mutex;

use akatsuki::domain::models::AgentDescriptor;
use akatsuki::domain::ports::RunHooks;

/// A bare agent with throwaway instructions.
pub fn agent(name: &str) -> AgentDescriptor {
    AgentDescriptor::new(name, format!("You are {name}."))
}

/// Setup test logging
///
/// Initializes a tracing subscriber that writes through the test harness.
pub fn setup_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// Hooks that record every event as a line of text.
#[derive(Default)]
pub struct RecordingHooks {
    events: Mutex<Vec<String>>,
}

impl RecordingHooks {
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    fn push(&self, event: String) {
        self.events.lock().unwrap().push(event);
    }
}

impl RunHooks for RecordingHooks {
    fn on_agent_start(&self, agent: &AgentDescriptor) {
        self.push(format!("start {}", agent.name));
    }

    fn on_tool_start(&self, agent: &AgentDescriptor, tool: &str) {
        self.push(format!("tool {} {tool}", agent.name));
    }

    fn on_handoff(&self, from: &AgentDescriptor, to: &AgentDescriptor) {
        self.push(format!("handoff {} -> {}", from.name, to.name));
    }

    fn on_agent_end(&self, agent: &AgentDescriptor, _output: &str) {
        self.push(format!("end {}", agent.name));
    }

    fn on_stage_start(&self, label: &str, agents: usize) {
        self.push(format!("stage {label} {agents}"));
    }

    fn on_stage_end(&self, label: &str) {
        self.push(format!("stage-end {label}"));
    }
}
