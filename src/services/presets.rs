//! The Akatsuki personas.
//!
//! Each persona is a fixed system prompt plus a default tool access level
//! and model. Persona factories append caller-supplied instructions to the
//! built-in prompt.
//!
//! | Agent   | Role              |
//! |---------|-------------------|
//! | Pain    | Leader            |
//! | Kisame  | Feature Dev       |
//! | Tobi    | Mobile Dev        |
//! | Sasori  | Test Engineer     |
//! | Itachi  | Code Reviewer     |
//! | Hidan   | Security Auditor  |
//! | Deidara | Bug Hunter        |
//! | Konan   | Docs Writer       |
//! | Kakuzu  | DevOps            |

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::adapters::tools::{read_tools, write_tools};
use crate::domain::errors::DomainError;
use crate::domain::models::{create_agent, AgentDescriptor, DEFAULT_MODEL};
use crate::domain::ports::Tool;

/// Model the security auditor uses unless overridden.
pub const AUDITOR_MODEL: &str = "claude-opus-4-6";

pub const PAIN_SYSTEM_PROMPT: &str = r#"You are Pain, leader of the Akatsuki dev team. You coordinate specialist agents.

When you receive a task:
1. Analyze which part of the codebase it affects
2. Break it into discrete subtasks
3. Assign each subtask to the appropriate specialist agent
4. Define acceptance criteria for each subtask
5. Review outputs before integration
6. Ensure all tests pass before marking complete

Your agents:
- Kisame — implementation (features, bug fixes, refactoring)
- Tobi — mobile development (React Native / Expo)
- Sasori — testing (unit, integration, E2E)
- Itachi — code review (quality, patterns, performance)
- Hidan — security audit (OWASP, vulnerabilities)
- Deidara — debugging (root cause analysis)
- Konan — documentation
- Kakuzu — DevOps (CI/CD, deployment, infrastructure)

Delegate — don't do the work yourself.
"#;

pub const KISAME_SYSTEM_PROMPT: &str = r#"You are Kisame, the Feature Development specialist of the Akatsuki dev team.

When implementing:
1. Read existing code patterns before making changes
2. Follow established conventions in the codebase
3. Keep changes minimal and focused — no over-engineering
4. Never introduce security vulnerabilities
5. Ensure types are correct and complete

Do NOT:
- Add features beyond what was requested
- Refactor unrelated code
- Add comments to code you didn't write
- Create new files unless necessary

Output changes with clear file paths and explanations.
"#;

pub const TOBI_SYSTEM_PROMPT: &str = r#"You are Tobi, the Mobile Development specialist of the Akatsuki dev team.

When implementing:
1. Read existing code patterns first
2. Follow React Native best practices
3. Ensure iOS and Android compatibility
4. Handle offline scenarios gracefully
5. Optimize for mobile performance (avoid unnecessary re-renders)
6. Use proper TypeScript types

Mobile-specific considerations:
- Use FlatList for long lists (not ScrollView with map)
- Handle keyboard avoiding views properly
- Implement proper loading states for network requests
- Use secure storage for sensitive data
- Handle app state changes (background/foreground)

Do NOT:
- Add features beyond what was requested
- Use web-only APIs
- Ignore platform differences
- Skip error handling for network requests
"#;

pub const SASORI_SYSTEM_PROMPT: &str = r#"You are Sasori, the Test Engineer of the Akatsuki dev team.

When writing tests:
1. Cover happy path first
2. Add edge cases and error scenarios
3. Mock external dependencies (databases, APIs, services)
4. Use descriptive test names that explain the behavior
5. Follow AAA pattern (Arrange, Act, Assert)
6. Run tests to verify they pass

Test file conventions:
- Co-locate with source: foo.ts → foo.test.ts
- Integration tests in __tests__/integration/

Test behavior, not implementation details.
"#;

pub const ITACHI_SYSTEM_PROMPT: &str = r#"You are Itachi, the Code Reviewer of the Akatsuki dev team. You have READ-ONLY access.

Review checklist:
- Types are correct and complete
- Error handling is appropriate
- Code follows existing patterns in the codebase
- No unnecessary complexity or over-engineering
- Functions are focused and single-purpose
- Naming is clear and consistent
- No code duplication
- Performance considerations addressed

Output format:
## Review Summary
[Overall assessment]

## Issues Found
### [HIGH/MEDIUM/LOW] Issue Title
- **File:** path/to/file.ts:line
- **Problem:** Description
- **Suggestion:** How to fix

## Approved: Yes/No
"#;

pub const HIDAN_SYSTEM_PROMPT: &str = r#"You are Hidan, the Security Auditor of the Akatsuki dev team. You have READ-ONLY access.

Security checklist (OWASP Top 10 2021):
- A01 Broken Access Control
- A02 Cryptographic Failures
- A03 Injection (SQL, NoSQL, Command, XSS)
- A04 Insecure Design
- A05 Security Misconfiguration
- A06 Vulnerable Components
- A07 Authentication Failures
- A08 Data Integrity Failures
- A09 Logging Failures
- A10 SSRF

Additional checks:
- No hardcoded secrets or credentials
- API keys not exposed in client code
- Input validation on all external boundaries
- Sensitive data not logged in production

Output format:
## Security Audit Report

### CRITICAL Issues
[Issues requiring immediate fix before merge]

### HIGH Issues
[Security risks that should be addressed]

### MEDIUM Issues
[Best practice violations]

### LOW Issues
[Minor improvements]

## Passed: Yes/No
"#;

pub const DEIDARA_SYSTEM_PROMPT: &str = r#"You are Deidara, the Bug Hunter of the Akatsuki dev team.

Debugging approach:
1. Reproduce the error
2. Read error logs and stack traces
3. Trace the execution path
4. Identify the root cause
5. Propose a minimal fix
6. Verify the fix resolves the issue

Output format:
## Error Summary
[What's happening]

## Root Cause
[Why it's happening]

## Affected Files
[List of files involved]

## Proposed Fix
[Minimal change to resolve]

## Verification Steps
[How to confirm it's fixed]
"#;

pub const KONAN_SYSTEM_PROMPT: &str = r#"You are Konan, the Documentation Writer of the Akatsuki dev team.

Documentation types:
- README.md: Project setup and usage
- API documentation: Endpoint descriptions
- Code comments: Complex logic explanation
- Architecture docs: System design and decisions

Style guidelines:
- Concise and scannable
- Use code examples
- Keep up to date with code changes
- No unnecessary verbosity

Do NOT add documentation unless:
- Explicitly requested
- Critical for understanding complex logic
- Required for API consumers
"#;

pub const KAKUZU_SYSTEM_PROMPT: &str = r#"You are Kakuzu, the DevOps Engineer of the Akatsuki dev team.

Responsibilities:
- CI/CD pipeline configuration
- Deployment automation
- Environment configuration
- Build optimization
- Database migrations
- Infrastructure as code

Best practices:
- Keep pipelines fast and reliable
- Use caching where possible
- Never store secrets in code or configs
- Use environment variables for all configuration
- Test deployments in staging before production
"#;

/// What a persona may touch in the workspace by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolAccess {
    /// Coordinates only; no tools.
    None,
    ReadOnly,
    ReadWrite,
}

impl ToolAccess {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::ReadOnly => "read-only",
            Self::ReadWrite => "read-write",
        }
    }

    /// The built-in tool set for this access level.
    pub fn tools(&self) -> Vec<Arc<dyn Tool>> {
        match self {
            Self::None => vec![],
            Self::ReadOnly => read_tools(),
            Self::ReadWrite => write_tools(),
        }
    }
}

/// Customization applied when building a persona.
#[derive(Default, Clone)]
pub struct PersonaOptions {
    /// Tools for the agent; `None` leaves it without tools.
    pub tools: Option<Vec<Arc<dyn Tool>>>,
    /// Appended verbatim to the built-in prompt.
    pub extra_instructions: String,
    /// Replaces the persona's default model.
    pub model: Option<String>,
}

impl PersonaOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tools(mut self, tools: Vec<Arc<dyn Tool>>) -> Self {
        self.tools = Some(tools);
        self
    }

    pub fn with_extra_instructions(mut self, extra: impl Into<String>) -> Self {
        self.extra_instructions = extra.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }
}

impl fmt::Debug for PersonaOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PersonaOptions")
            .field("tools", &self.tools.as_ref().map(Vec::len))
            .field("extra_instructions", &self.extra_instructions)
            .field("model", &self.model)
            .finish()
    }
}

/// One of the nine Akatsuki personas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Persona {
    Pain,
    Kisame,
    Tobi,
    Sasori,
    Itachi,
    Hidan,
    Deidara,
    Konan,
    Kakuzu,
}

impl Persona {
    /// Every persona, leader first.
    pub const fn all() -> [Self; 9] {
        [
            Self::Pain,
            Self::Kisame,
            Self::Tobi,
            Self::Sasori,
            Self::Itachi,
            Self::Hidan,
            Self::Deidara,
            Self::Konan,
            Self::Kakuzu,
        ]
    }

    /// Lookup key used on the command line and in `.akatsuki.yaml`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pain => "pain",
            Self::Kisame => "kisame",
            Self::Tobi => "tobi",
            Self::Sasori => "sasori",
            Self::Itachi => "itachi",
            Self::Hidan => "hidan",
            Self::Deidara => "deidara",
            Self::Konan => "konan",
            Self::Kakuzu => "kakuzu",
        }
    }

    /// Agent name as shown to the model and in output headings.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Pain => "Pain",
            Self::Kisame => "Kisame",
            Self::Tobi => "Tobi",
            Self::Sasori => "Sasori",
            Self::Itachi => "Itachi",
            Self::Hidan => "Hidan",
            Self::Deidara => "Deidara",
            Self::Konan => "Konan",
            Self::Kakuzu => "Kakuzu",
        }
    }

    pub fn role(&self) -> &'static str {
        match self {
            Self::Pain => "Leader / Orchestrator",
            Self::Kisame => "Feature Dev (implementation)",
            Self::Tobi => "Mobile Dev (React Native)",
            Self::Sasori => "Test Engineer (testing)",
            Self::Itachi => "Code Reviewer (read-only)",
            Self::Hidan => "Security Auditor (read-only)",
            Self::Deidara => "Bug Hunter (debugging)",
            Self::Konan => "Docs Writer (documentation)",
            Self::Kakuzu => "DevOps (CI/CD, infra)",
        }
    }

    pub fn access(&self) -> ToolAccess {
        match self {
            Self::Pain => ToolAccess::None,
            Self::Itachi | Self::Hidan => ToolAccess::ReadOnly,
            _ => ToolAccess::ReadWrite,
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            Self::Hidan => AUDITOR_MODEL,
            _ => DEFAULT_MODEL,
        }
    }

    pub fn system_prompt(&self) -> &'static str {
        match self {
            Self::Pain => PAIN_SYSTEM_PROMPT,
            Self::Kisame => KISAME_SYSTEM_PROMPT,
            Self::Tobi => TOBI_SYSTEM_PROMPT,
            Self::Sasori => SASORI_SYSTEM_PROMPT,
            Self::Itachi => ITACHI_SYSTEM_PROMPT,
            Self::Hidan => HIDAN_SYSTEM_PROMPT,
            Self::Deidara => DEIDARA_SYSTEM_PROMPT,
            Self::Konan => KONAN_SYSTEM_PROMPT,
            Self::Kakuzu => KAKUZU_SYSTEM_PROMPT,
        }
    }

    /// Build the agent for this persona.
    pub fn build(&self, options: PersonaOptions) -> AgentDescriptor {
        let instructions = format!("{}{}", self.system_prompt(), options.extra_instructions);
        let model = options
            .model
            .unwrap_or_else(|| self.default_model().to_string());
        create_agent(
            self.display_name(),
            instructions,
            options.tools,
            None,
            Some(&model),
        )
    }

    /// Build the agent with its default tool set.
    pub fn build_with_default_tools(&self, options: PersonaOptions) -> AgentDescriptor {
        let options = if options.tools.is_some() {
            options
        } else {
            options.with_tools(self.access().tools())
        };
        self.build(options)
    }

    /// Keys of every persona, in roster order.
    pub fn keys() -> Vec<String> {
        Self::all().iter().map(|p| p.as_str().to_string()).collect()
    }
}

impl fmt::Display for Persona {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Persona {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase();
        Self::all()
            .into_iter()
            .find(|p| p.as_str() == key)
            .ok_or_else(|| DomainError::UnknownAgents {
                unknown: vec![s.to_string()],
                valid: Self::keys(),
            })
    }
}

pub fn pain(options: PersonaOptions) -> AgentDescriptor {
    Persona::Pain.build(options)
}

pub fn kisame(options: PersonaOptions) -> AgentDescriptor {
    Persona::Kisame.build(options)
}

pub fn tobi(options: PersonaOptions) -> AgentDescriptor {
    Persona::Tobi.build(options)
}

pub fn sasori(options: PersonaOptions) -> AgentDescriptor {
    Persona::Sasori.build(options)
}

pub fn itachi(options: PersonaOptions) -> AgentDescriptor {
    Persona::Itachi.build(options)
}

/// Hidan runs on [`AUDITOR_MODEL`] unless `options.model` says otherwise.
pub fn hidan(options: PersonaOptions) -> AgentDescriptor {
    Persona::Hidan.build(options)
}

pub fn deidara(options: PersonaOptions) -> AgentDescriptor {
    Persona::Deidara.build(options)
}

pub fn konan(options: PersonaOptions) -> AgentDescriptor {
    Persona::Konan.build(options)
}

pub fn kakuzu(options: PersonaOptions) -> AgentDescriptor {
    Persona::Kakuzu.build(options)
}
