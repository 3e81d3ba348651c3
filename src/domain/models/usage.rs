//! Token usage accounting across agent runs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Token counts for a single agent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub requests: u64,
}

impl AgentUsage {
    pub fn total_tokens(&self) -> u64 {
        self.input_tokens + self.output_tokens
    }
}

/// Aggregated token usage across one or more agent runs.
///
/// Counts only ever grow; `add` is the sole mutator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub requests: u64,
    pub by_agent: BTreeMap<String, AgentUsage>,
}

impl TokenUsage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total_tokens(&self) -> u64 {
        self.input_tokens + self.output_tokens
    }

    /// Record one invocation's usage against `agent_name`.
    pub fn add(
        &mut self,
        agent_name: &str,
        input_tokens: u64,
        output_tokens: u64,
        requests: u64,
    ) -> &mut Self {
        self.input_tokens += input_tokens;
        self.output_tokens += output_tokens;
        self.requests += requests;

        let entry = self.by_agent.entry(agent_name.to_string()).or_default();
        entry.input_tokens += input_tokens;
        entry.output_tokens += output_tokens;
        entry.requests += requests;
        self
    }

    /// Record the usage of a completed run.
    pub fn add_run(&mut self, run: &AgentRun) -> &mut Self {
        self.add(&run.agent_name, run.input_tokens, run.output_tokens, run.requests)
    }

    /// Fold another usage record into this one.
    pub fn merge(&mut self, other: &TokenUsage) -> &mut Self {
        for (name, counts) in &other.by_agent {
            self.add(name, counts.input_tokens, counts.output_tokens, counts.requests);
        }
        self
    }

    pub fn agent(&self, name: &str) -> Option<&AgentUsage> {
        self.by_agent.get(name)
    }

    /// Render the per-agent usage report.
    pub fn summary(&self) -> String {
        let mut lines = vec![
            String::new(),
            "Token Usage".to_string(),
            "═══════════════════════════════════════".to_string(),
        ];
        for (name, counts) in &self.by_agent {
            lines.push(format!(
                "  {:<16} {:>8} tokens ({} in / {} out) [{} req]",
                name,
                format_thousands(counts.total_tokens()),
                format_thousands(counts.input_tokens),
                format_thousands(counts.output_tokens),
                counts.requests
            ));
        }
        lines.push("───────────────────────────────────────".to_string());
        lines.push(format!(
            "  {:<16} {:>8} tokens ({} in / {} out) [{} req]",
            "Total",
            format_thousands(self.total_tokens()),
            format_thousands(self.input_tokens),
            format_thousands(self.output_tokens),
            self.requests
        ));
        lines.join("\n")
    }
}

/// `1234567` -> `"1,234,567"`.
pub fn format_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Result of running one agent to completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentRun {
    /// Name of the agent that was invoked (the entry agent when handoffs occur).
    pub agent_name: String,
    /// Final text output.
    pub output: String,
    pub input_tokens: u64,
    pub output_tokens: u64,
    /// Number of model requests made.
    pub requests: u64,
}

impl AgentRun {
    pub fn new(agent_name: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            agent_name: agent_name.into(),
            output: output.into(),
            input_tokens: 0,
            output_tokens: 0,
            requests: 0,
        }
    }

    pub fn with_usage(mut self, input_tokens: u64, output_tokens: u64, requests: u64) -> Self {
        self.input_tokens = input_tokens;
        self.output_tokens = output_tokens;
        self.requests = requests;
        self
    }

    /// Record one model request.
    pub fn record_request(&mut self, input_tokens: u64, output_tokens: u64) {
        self.requests += 1;
        self.input_tokens += input_tokens;
        self.output_tokens += output_tokens;
    }

    pub fn total_tokens(&self) -> u64 {
        self.input_tokens + self.output_tokens
    }

    /// Usage of this run alone.
    pub fn usage(&self) -> TokenUsage {
        let mut usage = TokenUsage::new();
        usage.add_run(self);
        usage
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_two_agents() {
        let mut usage = TokenUsage::new();
        usage.add("X", 1000, 500, 2).add("Y", 800, 300, 1);

        assert_eq!(usage.total_tokens(), 2600);
        assert_eq!(usage.requests, 3);
        assert_eq!(usage.by_agent.len(), 2);
    }

    #[test]
    fn test_add_same_agent_accumulates() {
        let mut usage = TokenUsage::new();
        usage.add("Kisame", 100, 50, 1).add("Kisame", 200, 25, 2);

        let kisame = usage.agent("Kisame").unwrap();
        assert_eq!(kisame.input_tokens, 300);
        assert_eq!(kisame.output_tokens, 75);
        assert_eq!(kisame.requests, 3);
        assert_eq!(usage.by_agent.len(), 1);
    }

    #[test]
    fn test_split_add_matches_single_add() {
        let mut split = TokenUsage::new();
        split.add("A", 1, 2, 3).add("A", 4, 5, 6);

        let mut single = TokenUsage::new();
        single.add("A", 5, 7, 9);

        assert_eq!(split, single);
    }

    #[test]
    fn test_merge() {
        let mut left = TokenUsage::new();
        left.add("Kisame", 10, 5, 1);
        let mut right = TokenUsage::new();
        right.add("Kisame", 1, 1, 1).add("Itachi", 7, 3, 1);

        left.merge(&right);
        assert_eq!(left.total_tokens(), 27);
        assert_eq!(left.agent("Kisame").unwrap().requests, 2);
        assert_eq!(left.agent("Itachi").unwrap().input_tokens, 7);
    }

    #[test]
    fn test_summary_format() {
        let mut usage = TokenUsage::new();
        usage.add("Kisame", 12_000, 3_456, 4);
        let summary = usage.summary();

        assert!(summary.contains("Token Usage"));
        assert!(summary.contains("Kisame"));
        assert!(summary.contains("15,456 tokens"));
        assert!(summary.contains("(12,000 in / 3,456 out)"));
        assert!(summary.contains("[4 req]"));
        assert!(summary.contains("Total"));
    }

    #[test]
    fn test_format_thousands() {
        assert_eq!(format_thousands(0), "0");
        assert_eq!(format_thousands(999), "999");
        assert_eq!(format_thousands(1000), "1,000");
        assert_eq!(format_thousands(1_234_567), "1,234,567");
    }

    #[test]
    fn test_agent_run_record_request() {
        let mut run = AgentRun::new("Itachi", "");
        run.record_request(100, 20);
        run.record_request(50, 10);
        assert_eq!(run.requests, 2);
        assert_eq!(run.total_tokens(), 180);
        assert_eq!(run.usage().agent("Itachi").unwrap().requests, 2);
    }
}
