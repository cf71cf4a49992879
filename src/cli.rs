// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Credentials and the script come from the environment; flags only tune the session.

use clap::{Parser, ValueEnum};
use dbr::config::{
    COMPLETION_TIMEOUT_VAR, LOGIN_TIMEOUT_VAR, PROMPT_TIMEOUT_VAR, Prompts, SessionConfig,
};
use std::time::Duration;

const ENV_HELP: &str = "\
Environment:
  DBR_HOST                database host (required)
  DBR_USER                database user (required)
  DBR_PASS                database password (required)
  DBR_QUERY               SQL script to run (required)
  DBR_SQLPLUS_PATH        client executable [default: sqlplus]
  DBR_LOGIN_TIMEOUT       wait for the password prompt [default: 20s]
  DBR_PROMPT_TIMEOUT      wait for the SQL prompt [default: 20s]
  DBR_COMPLETION_TIMEOUT  wait for the client to exit [default: 5s]";

#[derive(Parser)]
#[command(name = "dbr")]
#[command(about = "Run a SQL script through sqlplus without an interactive terminal")]
#[command(version)]
#[command(after_help = ENV_HELP)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Log line format on stderr
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// Maximum wait for the password prompt (e.g. "20s")
    #[arg(long, value_parser = humantime::parse_duration)]
    pub login_timeout: Option<Duration>,

    /// Maximum wait for the SQL prompt after logging in
    #[arg(long, value_parser = humantime::parse_duration)]
    pub prompt_timeout: Option<Duration>,

    /// Maximum wait for the client to exit after the script is sent
    #[arg(long, value_parser = humantime::parse_duration)]
    pub completion_timeout: Option<Duration>,

    /// Prompt that asks for the password
    #[arg(long)]
    pub password_prompt: Option<String>,

    /// Prompt that signals the client is ready for commands
    #[arg(long)]
    pub ready_prompt: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

impl Cli {
    /// Read an environment variable unless a flag replaces it.
    ///
    /// Timeout variables covered by a flag are hidden, so a malformed value
    /// there cannot fail a run that never uses it.
    pub fn lookup_env(&self, var: &str) -> Option<String> {
        let overridden = match var {
            LOGIN_TIMEOUT_VAR => self.login_timeout.is_some(),
            PROMPT_TIMEOUT_VAR => self.prompt_timeout.is_some(),
            COMPLETION_TIMEOUT_VAR => self.completion_timeout.is_some(),
            _ => false,
        };
        if overridden {
            None
        } else {
            std::env::var(var).ok()
        }
    }

    /// Apply command-line overrides on top of the environment config.
    pub fn apply(&self, config: SessionConfig) -> SessionConfig {
        let mut timeouts = config.timeouts;
        if let Some(login) = self.login_timeout {
            timeouts.login = login;
        }
        if let Some(prompt) = self.prompt_timeout {
            timeouts.prompt = prompt;
        }
        if let Some(completion) = self.completion_timeout {
            timeouts.completion = completion;
        }

        let prompts = Prompts {
            password: self
                .password_prompt
                .clone()
                .unwrap_or_else(|| config.prompts.password.clone()),
            ready: self
                .ready_prompt
                .clone()
                .unwrap_or_else(|| config.prompts.ready.clone()),
        };

        config.timeouts(timeouts).prompts(prompts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_config() {
        let cli = Cli::parse_from([
            "dbr",
            "--login-timeout",
            "2s",
            "--completion-timeout",
            "1m",
            "--ready-prompt",
            "SQL> ",
        ]);
        let config = cli.apply(SessionConfig::new("h", "u", "p", "s"));

        assert_eq!(config.timeouts.login, Duration::from_secs(2));
        assert_eq!(config.timeouts.prompt, Duration::from_secs(20));
        assert_eq!(config.timeouts.completion, Duration::from_secs(60));
        assert_eq!(config.prompts.password, "Enter password:");
        assert_eq!(config.prompts.ready, "SQL> ");
    }

    #[test]
    fn flag_hides_matching_timeout_variable() {
        let cli = Cli::parse_from(["dbr", "--login-timeout", "2s"]);
        temp_env::with_vars(
            [
                ("DBR_LOGIN_TIMEOUT", Some("soon")),
                ("DBR_PROMPT_TIMEOUT", Some("30s")),
            ],
            || {
                assert_eq!(cli.lookup_env("DBR_LOGIN_TIMEOUT"), None);
                assert_eq!(cli.lookup_env("DBR_PROMPT_TIMEOUT").as_deref(), Some("30s"));
            },
        );
    }

    #[test]
    fn rejects_malformed_durations() {
        assert!(Cli::try_parse_from(["dbr", "--login-timeout", "soon"]).is_err());
    }

    #[test]
    fn json_log_format() {
        let cli = Cli::parse_from(["dbr", "--log-format", "json", "-v"]);
        assert_eq!(cli.log_format, LogFormat::Json);
        assert!(cli.verbose);
    }
}
