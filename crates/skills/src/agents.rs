//! Static table of the agent tools skilldash knows how to inspect.

use serde::Serialize;

/// Where one agent tool keeps its skills.
///
/// `global_skills` and `marker` are relative to the home directory,
/// `project_skills` is relative to a project root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AgentDefinition {
    pub id: &'static str,
    pub display_name: &'static str,
    pub global_skills: &'static str,
    pub project_skills: &'static str,
    /// Directory whose presence means the tool itself is installed.
    pub marker: &'static str,
}

/// Every known agent, in display-independent table order.
///
/// Several agents share a directory (e.g. `.agents/skills` in projects), so a
/// single skill directory may belong to more than one agent.
pub static AGENTS: &[AgentDefinition] = &[
    AgentDefinition {
        id: "amp",
        display_name: "Amp",
        global_skills: ".config/agents/skills",
        project_skills: ".agents/skills",
        marker: ".config/agents",
    },
    AgentDefinition {
        id: "antigravity",
        display_name: "Antigravity",
        global_skills: ".gemini/antigravity/skills",
        project_skills: ".agent/skills",
        marker: ".gemini/antigravity",
    },
    AgentDefinition {
        id: "augment",
        display_name: "Augment",
        global_skills: ".augment/skills",
        project_skills: ".augment/skills",
        marker: ".augment",
    },
    AgentDefinition {
        id: "claude-code",
        display_name: "Claude Code",
        global_skills: ".claude/skills",
        project_skills: ".claude/skills",
        marker: ".claude",
    },
    AgentDefinition {
        id: "cline",
        display_name: "Cline",
        global_skills: ".cline/skills",
        project_skills: ".cline/skills",
        marker: ".cline",
    },
    AgentDefinition {
        id: "codebuddy",
        display_name: "CodeBuddy",
        global_skills: ".codebuddy/skills",
        project_skills: ".codebuddy/skills",
        marker: ".codebuddy",
    },
    AgentDefinition {
        id: "codex",
        display_name: "Codex",
        global_skills: ".codex/skills",
        project_skills: ".agents/skills",
        marker: ".codex",
    },
    AgentDefinition {
        id: "command-code",
        display_name: "Command Code",
        global_skills: ".commandcode/skills",
        project_skills: ".commandcode/skills",
        marker: ".commandcode",
    },
    AgentDefinition {
        id: "continue",
        display_name: "Continue",
        global_skills: ".continue/skills",
        project_skills: ".continue/skills",
        marker: ".continue",
    },
    AgentDefinition {
        id: "cortex",
        display_name: "Cortex",
        global_skills: ".snowflake/cortex/skills",
        project_skills: ".cortex/skills",
        marker: ".snowflake/cortex",
    },
    AgentDefinition {
        id: "crush",
        display_name: "Crush",
        global_skills: ".config/crush/skills",
        project_skills: ".crush/skills",
        marker: ".config/crush",
    },
    AgentDefinition {
        id: "cursor",
        display_name: "Cursor",
        global_skills: ".cursor/skills",
        project_skills: ".agents/skills",
        marker: ".cursor",
    },
    AgentDefinition {
        id: "droid",
        display_name: "Droid",
        global_skills: ".factory/skills",
        project_skills: ".factory/skills",
        marker: ".factory",
    },
    AgentDefinition {
        id: "gemini-cli",
        display_name: "Gemini CLI",
        global_skills: ".gemini/skills",
        project_skills: ".agents/skills",
        marker: ".gemini",
    },
    AgentDefinition {
        id: "github-copilot",
        display_name: "GitHub Copilot",
        global_skills: ".copilot/skills",
        project_skills: ".agents/skills",
        marker: ".copilot",
    },
    AgentDefinition {
        id: "goose",
        display_name: "Goose",
        global_skills: ".config/goose/skills",
        project_skills: ".goose/skills",
        marker: ".config/goose",
    },
    AgentDefinition {
        id: "iflow-cli",
        display_name: "iFlow CLI",
        global_skills: ".iflow/skills",
        project_skills: ".iflow/skills",
        marker: ".iflow",
    },
    AgentDefinition {
        id: "junie",
        display_name: "Junie",
        global_skills: ".junie/skills",
        project_skills: ".junie/skills",
        marker: ".junie",
    },
    AgentDefinition {
        id: "kilo",
        display_name: "Kilo Code",
        global_skills: ".kilocode/skills",
        project_skills: ".kilocode/skills",
        marker: ".kilocode",
    },
    AgentDefinition {
        id: "kimi-cli",
        display_name: "Kimi CLI",
        global_skills: ".config/agents/skills",
        project_skills: ".agents/skills",
        marker: ".config/agents",
    },
    AgentDefinition {
        id: "kiro-cli",
        display_name: "Kiro",
        global_skills: ".kiro/skills",
        project_skills: ".kiro/skills",
        marker: ".kiro",
    },
    AgentDefinition {
        id: "kode",
        display_name: "Kode",
        global_skills: ".kode/skills",
        project_skills: ".kode/skills",
        marker: ".kode",
    },
    AgentDefinition {
        id: "mcpjam",
        display_name: "MCPJam",
        global_skills: ".mcpjam/skills",
        project_skills: ".mcpjam/skills",
        marker: ".mcpjam",
    },
    AgentDefinition {
        id: "mistral-vibe",
        display_name: "Mistral Vibe",
        global_skills: ".vibe/skills",
        project_skills: ".vibe/skills",
        marker: ".vibe",
    },
    AgentDefinition {
        id: "mux",
        display_name: "Mux",
        global_skills: ".mux/skills",
        project_skills: ".mux/skills",
        marker: ".mux",
    },
    AgentDefinition {
        id: "opencode",
        display_name: "OpenCode",
        global_skills: ".config/opencode/skills",
        project_skills: ".agents/skills",
        marker: ".config/opencode",
    },
    AgentDefinition {
        id: "openhands",
        display_name: "OpenHands",
        global_skills: ".openhands/skills",
        project_skills: ".openhands/skills",
        marker: ".openhands",
    },
    AgentDefinition {
        id: "pi",
        display_name: "Pi",
        global_skills: ".pi/agent/skills",
        project_skills: ".pi/skills",
        marker: ".pi",
    },
    AgentDefinition {
        id: "qoder",
        display_name: "Qoder",
        global_skills: ".qoder/skills",
        project_skills: ".qoder/skills",
        marker: ".qoder",
    },
    AgentDefinition {
        id: "qwen-code",
        display_name: "Qwen Code",
        global_skills: ".qwen/skills",
        project_skills: ".qwen/skills",
        marker: ".qwen",
    },
    AgentDefinition {
        id: "replit",
        display_name: "Replit",
        global_skills: ".config/agents/skills",
        project_skills: ".agents/skills",
        marker: ".config/agents",
    },
    AgentDefinition {
        id: "roo",
        display_name: "Roo Code",
        global_skills: ".roo/skills",
        project_skills: ".roo/skills",
        marker: ".roo",
    },
    AgentDefinition {
        id: "trae",
        display_name: "Trae",
        global_skills: ".trae/skills",
        project_skills: ".trae/skills",
        marker: ".trae",
    },
    AgentDefinition {
        id: "trae-cn",
        display_name: "Trae CN",
        global_skills: ".trae-cn/skills",
        project_skills: ".trae/skills",
        marker: ".trae-cn",
    },
    AgentDefinition {
        id: "windsurf",
        display_name: "Windsurf",
        global_skills: ".codeium/windsurf/skills",
        project_skills: ".windsurf/skills",
        marker: ".codeium",
    },
    AgentDefinition {
        id: "zencoder",
        display_name: "Zencoder",
        global_skills: ".zencoder/skills",
        project_skills: ".zencoder/skills",
        marker: ".zencoder",
    },
    AgentDefinition {
        id: "neovate",
        display_name: "Neovate",
        global_skills: ".neovate/skills",
        project_skills: ".neovate/skills",
        marker: ".neovate",
    },
    AgentDefinition {
        id: "pochi",
        display_name: "Pochi",
        global_skills: ".pochi/skills",
        project_skills: ".pochi/skills",
        marker: ".pochi",
    },
    AgentDefinition {
        id: "adal",
        display_name: "Adal",
        global_skills: ".adal/skills",
        project_skills: ".adal/skills",
        marker: ".adal",
    },
];

/// Look up an agent definition by id.
pub fn find_agent(id: &str) -> Option<&'static AgentDefinition> {
    AGENTS.iter().find(|a| a.id == id)
}
