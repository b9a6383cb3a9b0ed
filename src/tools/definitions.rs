//! Tool schema definitions.

use super::ToolDefinition;

/// Defines the command runner tool.
pub fn run_command_tool() -> ToolDefinition {
    ToolDefinition {
        name: super::RUN_PAL_COMMAND.to_string(),
        description: "Execute a $$ command or get the instructions for it. Built-in commands \
                      (echo, lorem-ipsum, prompt, help) run directly; other commands return \
                      instruction markdown to follow. Separate pipeline steps with ' | '."
            .to_string(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {
                "command": {
                    "type": "string",
                    "description": "The full command line, e.g. 'git commit' or 'git commit | review'"
                }
            },
            "required": ["command"]
        }),
    }
}

/// Defines the command listing tool.
pub fn list_commands_tool() -> ToolDefinition {
    ToolDefinition {
        name: super::LIST_PAL_COMMANDS.to_string(),
        description: "List all available $$ commands".to_string(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {}
        }),
    }
}

/// Defines the resource reader tool.
pub fn read_resource_tool() -> ToolDefinition {
    ToolDefinition {
        name: super::READ_PAL_RESOURCE.to_string(),
        description: "Read a pal resource. Start with pal://instructions/root.md, which \
                      describes the $$ protocol."
            .to_string(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {
                "uri": {
                    "type": "string",
                    "description": "Resource URI, e.g. 'pal://instructions/git/commit.md' or 'pal://prompts/tr.md'"
                }
            },
            "required": ["uri"]
        }),
    }
}

/// Defines the resource listing tool.
pub fn list_resources_tool() -> ToolDefinition {
    ToolDefinition {
        name: super::LIST_PAL_RESOURCES.to_string(),
        description: "List all pal resources (instructions and custom prompts) as URIs for \
                      read_pal_resource"
            .to_string(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {}
        }),
    }
}
