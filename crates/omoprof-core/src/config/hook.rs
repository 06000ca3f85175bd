//! Built-in hook names

/// Hooks oh-my-opencode ships, in the order the hooks checklist shows them
pub const BUILTIN_HOOKS: &[&str] = &[
    "todo-continuation-enforcer",
    "context-window-monitor",
    "session-recovery",
    "session-notification",
    "comment-checker",
    "grep-output-truncator",
    "tool-output-truncator",
    "directory-agents-injector",
    "directory-readme-injector",
    "empty-task-response-detector",
    "think-mode",
    "anthropic-context-window-limit-recovery",
    "rules-injector",
    "background-notification",
    "auto-update-checker",
    "startup-toast",
    "keyword-detector",
    "agent-usage-reminder",
    "non-interactive-env",
    "interactive-bash-session",
    "thinking-block-validator",
    "ralph-loop",
    "preemptive-compaction",
    "compaction-context-injector",
    "claude-code-hooks",
    "auto-slash-command",
    "edit-error-recovery",
    "delegate-task-retry",
    "prometheus-md-only",
    "start-work",
];

/// Whether `name` is one of the built-in hooks
#[must_use]
pub fn is_builtin_hook(name: &str) -> bool {
    BUILTIN_HOOKS.contains(&name)
}
