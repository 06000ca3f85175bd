//! Remaining settings
//!
//! One long form over every top-level field the other steps do not own.
//! Map-valued fields without a form row (`plugins_override`,
//! `providerConcurrency`, `modelConcurrency`, `protected_tools`) and `skills`
//! are carried through as loaded.

use super::{ConfigSection, StepSignal, StepView};
use crate::tui::form::{Field, Form};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use omoprof_core::config::{
    BackgroundTaskConfig, BrowserAutomationConfig, ClaudeCodeConfig, CommentCheckerConfig,
    DynamicContextPruningConfig, ExperimentalConfig, GitMasterConfig, NotificationConfig,
    PruningNotification, RalphLoopConfig, SisyphusAgentConfig, TmuxConfig, TurnProtectionConfig,
};
use omoprof_core::Config;
use ratatui::layout::Rect;
use ratatui::Frame;

const NOTIFICATIONS: &[&str] = &["off", "minimal", "detailed"];
const BROWSER_PROVIDERS: &[&str] = &["playwright", "agent-browser"];
const TMUX_LAYOUTS: &[&str] = &[
    "main-horizontal",
    "main-vertical",
    "tiled",
    "even-horizontal",
    "even-vertical",
];

#[derive(Debug)]
pub struct OtherStep {
    form: Form,
    /// Config as loaded, source of pass-through fields and section presence
    loaded: Config,
}

impl Default for OtherStep {
    fn default() -> Self {
        Self {
            form: other_form(),
            loaded: Config::default(),
        }
    }
}

#[allow(clippy::too_many_lines)]
fn other_form() -> Form {
    Form::new(vec![
        Field::heading("General"),
        Field::text("schema", "$schema"),
        Field::toggle("auto_update", "auto_update"),
        Field::toggle("google_auth", "google_auth"),
        Field::list("disabled_mcps", "disabled_mcps"),
        Field::list("disabled_skills", "disabled_skills"),
        Field::list("disabled_commands", "disabled_commands"),
        Field::heading("Claude Code compatibility"),
        Field::toggle("cc.mcp", "claude_code.mcp"),
        Field::toggle("cc.commands", "claude_code.commands"),
        Field::toggle("cc.skills", "claude_code.skills"),
        Field::toggle("cc.agents", "claude_code.agents"),
        Field::toggle("cc.hooks", "claude_code.hooks"),
        Field::toggle("cc.plugins", "claude_code.plugins"),
        Field::heading("Sisyphus agent"),
        Field::toggle("sa.disabled", "disabled"),
        Field::toggle("sa.default_builder_enabled", "default_builder_enabled"),
        Field::toggle("sa.planner_enabled", "planner_enabled"),
        Field::toggle("sa.replace_plan", "replace_plan"),
        Field::heading("Comment checker"),
        Field::text("comment_checker.custom_prompt", "custom_prompt"),
        Field::heading("Experimental"),
        Field::toggle("ex.aggressive_truncation", "aggressive_truncation"),
        Field::toggle("ex.auto_resume", "auto_resume"),
        Field::toggle("ex.truncate_all_tool_outputs", "truncate_all_tool_outputs"),
        Field::toggle("dcp.enabled", "context pruning enabled"),
        Field::choice("dcp.notification", "context pruning notify", NOTIFICATIONS),
        Field::toggle("dcp.tp.enabled", "turn protection enabled"),
        Field::integer32("dcp.tp.turns", "turn protection turns"),
        Field::heading("Ralph loop"),
        Field::toggle("rl.enabled", "enabled"),
        Field::integer32("rl.default_max_iterations", "default_max_iterations"),
        Field::text("rl.state_dir", "state_dir"),
        Field::heading("Background tasks"),
        Field::integer32("bg.default_concurrency", "defaultConcurrency"),
        Field::integer("bg.stale_timeout_ms", "staleTimeoutMs"),
        Field::heading("Notification"),
        Field::toggle("notification.force_enable", "force_enable"),
        Field::heading("Git master"),
        Field::toggle("gm.commit_footer", "commit_footer"),
        Field::toggle("gm.include_co_authored_by", "include_co_authored_by"),
        Field::heading("Browser automation"),
        Field::choice("browser.provider", "provider", BROWSER_PROVIDERS),
        Field::heading("Tmux"),
        Field::toggle("tmux.enabled", "enabled"),
        Field::choice("tmux.layout", "layout", TMUX_LAYOUTS),
        Field::integer32("tmux.main_pane_size", "main_pane_size"),
    ])
}

/// Numeric fields of the form, converted to their config types
struct Numbers {
    turns: Option<u32>,
    default_max_iterations: Option<u32>,
    default_concurrency: Option<u32>,
    stale_timeout_ms: Option<u64>,
    main_pane_size: Option<u32>,
}

impl Numbers {
    fn read(f: &Form) -> Result<Self, String> {
        Ok(Self {
            turns: f.number("dcp.tp.turns")?,
            default_max_iterations: f.number("rl.default_max_iterations")?,
            default_concurrency: f.number("bg.default_concurrency")?,
            stale_timeout_ms: f.number("bg.stale_timeout_ms")?,
            main_pane_size: f.number("tmux.main_pane_size")?,
        })
    }
}

/// Keep a section absent if it was absent and is still empty
fn section<T: Default + PartialEq>(loaded: Option<&T>, edited: T) -> Option<T> {
    if loaded.is_none() && edited == T::default() {
        None
    } else {
        Some(edited)
    }
}

fn notification(value: Option<&str>) -> Option<PruningNotification> {
    let value = value?;
    PruningNotification::all()
        .iter()
        .copied()
        .find(|n| n.as_str() == value)
}

impl OtherStep {
    #[allow(clippy::too_many_lines)]
    fn fill(&mut self) {
        let c = &self.loaded;
        let f = &mut self.form;
        f.reset();

        f.set_text("schema", c.schema.as_deref());
        f.set_toggle("auto_update", c.auto_update);
        f.set_toggle("google_auth", c.google_auth);
        f.set_list("disabled_mcps", c.disabled_mcps.as_deref());
        f.set_list("disabled_skills", c.disabled_skills.as_deref());
        f.set_list("disabled_commands", c.disabled_commands.as_deref());

        let cc = c.claude_code.clone().unwrap_or_default();
        f.set_toggle("cc.mcp", cc.mcp);
        f.set_toggle("cc.commands", cc.commands);
        f.set_toggle("cc.skills", cc.skills);
        f.set_toggle("cc.agents", cc.agents);
        f.set_toggle("cc.hooks", cc.hooks);
        f.set_toggle("cc.plugins", cc.plugins);

        let sa = c.sisyphus_agent.clone().unwrap_or_default();
        f.set_toggle("sa.disabled", sa.disabled);
        f.set_toggle("sa.default_builder_enabled", sa.default_builder_enabled);
        f.set_toggle("sa.planner_enabled", sa.planner_enabled);
        f.set_toggle("sa.replace_plan", sa.replace_plan);

        f.set_text(
            "comment_checker.custom_prompt",
            c.comment_checker
                .as_ref()
                .and_then(|cc| cc.custom_prompt.as_deref()),
        );

        let ex = c.experimental.clone().unwrap_or_default();
        f.set_toggle("ex.aggressive_truncation", ex.aggressive_truncation);
        f.set_toggle("ex.auto_resume", ex.auto_resume);
        f.set_toggle("ex.truncate_all_tool_outputs", ex.truncate_all_tool_outputs);
        let dcp = ex.dynamic_context_pruning.unwrap_or_default();
        f.set_toggle("dcp.enabled", dcp.enabled);
        f.set_text("dcp.notification", dcp.notification.map(PruningNotification::as_str));
        let tp = dcp.turn_protection.unwrap_or_default();
        f.set_toggle("dcp.tp.enabled", tp.enabled);
        f.set_number("dcp.tp.turns", tp.turns);

        let rl = c.ralph_loop.clone().unwrap_or_default();
        f.set_toggle("rl.enabled", rl.enabled);
        f.set_number("rl.default_max_iterations", rl.default_max_iterations);
        f.set_text("rl.state_dir", rl.state_dir.as_deref());

        let bg = c.background_task.clone().unwrap_or_default();
        f.set_number("bg.default_concurrency", bg.default_concurrency);
        f.set_number("bg.stale_timeout_ms", bg.stale_timeout_ms);

        f.set_toggle(
            "notification.force_enable",
            c.notification.as_ref().and_then(|n| n.force_enable),
        );

        let gm = c.git_master.clone().unwrap_or_default();
        f.set_toggle("gm.commit_footer", gm.commit_footer);
        f.set_toggle("gm.include_co_authored_by", gm.include_co_authored_by);

        f.set_text(
            "browser.provider",
            c.browser_automation_engine
                .as_ref()
                .and_then(|b| b.provider.as_deref()),
        );

        let tmux = c.tmux.clone().unwrap_or_default();
        f.set_toggle("tmux.enabled", tmux.enabled);
        f.set_text("tmux.layout", tmux.layout.as_deref());
        f.set_number("tmux.main_pane_size", tmux.main_pane_size);
    }

    fn experimental(&self, turns: Option<u32>) -> Option<ExperimentalConfig> {
        let f = &self.form;
        let loaded = self.loaded.experimental.as_ref();
        let loaded_dcp = loaded.and_then(|ex| ex.dynamic_context_pruning.as_ref());
        let loaded_tp = loaded_dcp.and_then(|dcp| dcp.turn_protection.as_ref());

        let turn_protection = section(
            loaded_tp,
            TurnProtectionConfig {
                enabled: f.toggle("dcp.tp.enabled"),
                turns,
            },
        );
        let pruning = section(
            loaded_dcp,
            DynamicContextPruningConfig {
                enabled: f.toggle("dcp.enabled"),
                notification: notification(f.get("dcp.notification")),
                turn_protection,
                protected_tools: loaded_dcp.and_then(|dcp| dcp.protected_tools.clone()),
            },
        );
        section(
            loaded,
            ExperimentalConfig {
                aggressive_truncation: f.toggle("ex.aggressive_truncation"),
                auto_resume: f.toggle("ex.auto_resume"),
                truncate_all_tool_outputs: f.toggle("ex.truncate_all_tool_outputs"),
                dynamic_context_pruning: pruning,
            },
        )
    }
}

impl StepView for OtherStep {
    fn render(&self, frame: &mut Frame, area: Rect) {
        self.form.render(frame, area, true);
    }

    fn handle_key(&mut self, key: KeyEvent) -> StepSignal {
        if !self.form.is_editing() && key.modifiers.contains(KeyModifiers::CONTROL) {
            return if key.code == KeyCode::Char('n') {
                StepSignal::Next
            } else {
                StepSignal::Stay
            };
        }
        if self.form.handle_key(key) {
            return StepSignal::Stay;
        }
        match key.code {
            KeyCode::Esc => StepSignal::Back,
            _ => StepSignal::Stay,
        }
    }

    fn title(&self) -> &'static str {
        "Other"
    }

    fn help(&self) -> &'static str {
        if self.form.is_editing() {
            "[Enter] Accept  [Esc] Discard"
        } else {
            "[Space/Enter] Cycle or edit  [x] Unset  [Ctrl+N] Next  [Esc] Back"
        }
    }

    fn check(&self) -> Result<(), String> {
        self.form.check()?;
        Numbers::read(&self.form).map(|_| ())
    }
}

impl ConfigSection for OtherStep {
    fn load_from(&mut self, config: &Config) {
        self.loaded = config.clone();
        self.fill();
    }

    fn apply_to(&self, config: &mut Config) {
        let f = &self.form;
        let c = &self.loaded;
        let numbers = match Numbers::read(f) {
            Ok(numbers) => numbers,
            Err(message) => {
                tracing::warn!(%message, "other settings not applied");
                return;
            }
        };

        config.schema = f.text("schema");
        config.auto_update = f.toggle("auto_update");
        config.google_auth = f.toggle("google_auth");
        config.disabled_mcps = f.list("disabled_mcps");
        config.disabled_skills = f.list("disabled_skills");
        config.disabled_commands = f.list("disabled_commands");

        config.claude_code = section(
            c.claude_code.as_ref(),
            ClaudeCodeConfig {
                mcp: f.toggle("cc.mcp"),
                commands: f.toggle("cc.commands"),
                skills: f.toggle("cc.skills"),
                agents: f.toggle("cc.agents"),
                hooks: f.toggle("cc.hooks"),
                plugins: f.toggle("cc.plugins"),
                plugins_override: c
                    .claude_code
                    .as_ref()
                    .and_then(|cc| cc.plugins_override.clone()),
            },
        );

        config.sisyphus_agent = section(
            c.sisyphus_agent.as_ref(),
            SisyphusAgentConfig {
                disabled: f.toggle("sa.disabled"),
                default_builder_enabled: f.toggle("sa.default_builder_enabled"),
                planner_enabled: f.toggle("sa.planner_enabled"),
                replace_plan: f.toggle("sa.replace_plan"),
            },
        );

        config.comment_checker = section(
            c.comment_checker.as_ref(),
            CommentCheckerConfig {
                custom_prompt: f.text("comment_checker.custom_prompt"),
            },
        );

        config.experimental = self.experimental(numbers.turns);

        config.ralph_loop = section(
            c.ralph_loop.as_ref(),
            RalphLoopConfig {
                enabled: f.toggle("rl.enabled"),
                default_max_iterations: numbers.default_max_iterations,
                state_dir: f.text("rl.state_dir"),
            },
        );

        let loaded_bg = c.background_task.as_ref();
        config.background_task = section(
            loaded_bg,
            BackgroundTaskConfig {
                default_concurrency: numbers.default_concurrency,
                provider_concurrency: loaded_bg.and_then(|bg| bg.provider_concurrency.clone()),
                model_concurrency: loaded_bg.and_then(|bg| bg.model_concurrency.clone()),
                stale_timeout_ms: numbers.stale_timeout_ms,
            },
        );

        config.notification = section(
            c.notification.as_ref(),
            NotificationConfig {
                force_enable: f.toggle("notification.force_enable"),
            },
        );

        config.git_master = section(
            c.git_master.as_ref(),
            GitMasterConfig {
                commit_footer: f.toggle("gm.commit_footer"),
                include_co_authored_by: f.toggle("gm.include_co_authored_by"),
            },
        );

        config.browser_automation_engine = section(
            c.browser_automation_engine.as_ref(),
            BrowserAutomationConfig {
                provider: f.text("browser.provider"),
            },
        );

        config.tmux = section(
            c.tmux.as_ref(),
            TmuxConfig {
                enabled: f.toggle("tmux.enabled"),
                layout: f.text("tmux.layout"),
                main_pane_size: numbers.main_pane_size,
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loaded(json: &str) -> OtherStep {
        let config: Config = json.parse().unwrap();
        let mut step = OtherStep::default();
        step.load_from(&config);
        step
    }

    fn applied(step: &OtherStep, base: &str) -> Config {
        let mut config: Config = base.parse().unwrap();
        step.apply_to(&mut config);
        config
    }

    const FULL: &str = r#"{
        "$schema": "https://example.com/schema.json",
        "auto_update": false,
        "google_auth": true,
        "disabled_mcps": ["websearch", "grep_app"],
        "disabled_skills": [],
        "claude_code": { "mcp": false, "plugins_override": { "foo@bar": false } },
        "sisyphus_agent": { "planner_enabled": true },
        "comment_checker": { "custom_prompt": "Be brief" },
        "experimental": {
            "auto_resume": true,
            "dynamic_context_pruning": {
                "enabled": true,
                "notification": "minimal",
                "turn_protection": { "turns": 4 },
                "protected_tools": ["task", "todowrite"]
            }
        },
        "ralph_loop": { "enabled": true, "default_max_iterations": 50, "state_dir": ".ralph" },
        "background_task": { "defaultConcurrency": 4, "modelConcurrency": { "anthropic/claude-opus-4-5": 1 } },
        "notification": {},
        "git_master": { "commit_footer": false },
        "browser_automation_engine": { "provider": "agent-browser" },
        "tmux": { "enabled": true, "layout": "tiled", "main_pane_size": 60 },
        "skills": ["playwright"],
        "agents": { "oracle": { "model": "openai/gpt-5.2" } }
    }"#;

    #[test]
    fn test_load_then_apply_is_identity() {
        let step = loaded(FULL);
        assert_eq!(applied(&step, FULL), FULL.parse::<Config>().unwrap());
    }

    #[test]
    fn test_empty_config_stays_empty() {
        let step = loaded("{}");
        assert_eq!(applied(&step, "{}"), Config::default());
    }

    #[test]
    fn test_setting_nested_value_creates_sections() {
        let mut step = loaded("{}");
        step.form.set_number("dcp.tp.turns", Some(3_u32));
        let config = applied(&step, "{}");
        let turns = config
            .experimental
            .and_then(|ex| ex.dynamic_context_pruning)
            .and_then(|dcp| dcp.turn_protection)
            .and_then(|tp| tp.turns);
        assert_eq!(turns, Some(3));
    }

    #[test]
    fn test_unsetting_value_keeps_loaded_section() {
        let mut step = loaded(r#"{"git_master":{"commit_footer":false}}"#);
        step.form.set_toggle("gm.commit_footer", None);
        let config = applied(&step, "{}");
        assert_eq!(config.git_master, Some(GitMasterConfig::default()));
    }

    #[test]
    fn test_unknown_layout_survives() {
        let json = r#"{"tmux":{"layout":"custom-grid"}}"#;
        let step = loaded(json);
        assert_eq!(applied(&step, json), json.parse::<Config>().unwrap());
    }

    #[test]
    fn test_bad_number_fails_check() {
        let mut step = loaded("{}");
        step.form.set_text("bg.default_concurrency", Some("many"));
        assert!(step.check().is_err());
    }

    #[test]
    fn test_value_too_large_for_field_fails_check() {
        let json = r#"{"tmux":{"main_pane_size":60}}"#;
        let mut step = loaded(json);
        step.form.set_text("tmux.main_pane_size", Some("5000000000"));

        let err = step.check().unwrap_err();
        assert!(err.contains("main_pane_size"));
        assert!(err.contains("larger than 4294967295"));
    }

    #[test]
    fn test_unconvertible_number_keeps_stored_value() {
        let json = r#"{"tmux":{"main_pane_size":60}}"#;
        let mut step = loaded(json);
        step.form.set_text("tmux.main_pane_size", Some("5000000000"));

        // Applying without a passing check writes nothing
        assert_eq!(applied(&step, json), json.parse::<Config>().unwrap());
    }

    #[test]
    fn test_u64_field_accepts_large_value() {
        let mut step = loaded("{}");
        step.form.set_text("bg.stale_timeout_ms", Some("5000000000"));
        assert!(step.check().is_ok());
        let config = applied(&step, "{}");
        assert_eq!(
            config.background_task.and_then(|bg| bg.stale_timeout_ms),
            Some(5_000_000_000)
        );
    }
}
