// ABOUTME: Session configuration sourced from DBR_* environment variables.
// ABOUTME: Holds credentials, the SQL script, client path, prompts, and wait timeouts.

mod env_value;

use crate::error::Result;
use env_value::EnvReader;
use secrecy::{Secret, SecretString};
use std::path::PathBuf;
use std::time::Duration;

pub const HOST_VAR: &str = "DBR_HOST";
pub const USER_VAR: &str = "DBR_USER";
pub const PASSWORD_VAR: &str = "DBR_PASS";
pub const SCRIPT_VAR: &str = "DBR_QUERY";
pub const CLIENT_VAR: &str = "DBR_SQLPLUS_PATH";
pub const LOGIN_TIMEOUT_VAR: &str = "DBR_LOGIN_TIMEOUT";
pub const PROMPT_TIMEOUT_VAR: &str = "DBR_PROMPT_TIMEOUT";
pub const COMPLETION_TIMEOUT_VAR: &str = "DBR_COMPLETION_TIMEOUT";

pub const DEFAULT_CLIENT: &str = "sqlplus";
pub const DEFAULT_PASSWORD_PROMPT: &str = "Enter password:";
pub const DEFAULT_READY_PROMPT: &str = "SQL>";

/// Bounded waits applied to each phase of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    /// Wait for the password prompt.
    pub login: Duration,
    /// Wait for the command prompt after the password is sent.
    pub prompt: Duration,
    /// Wait for the client to exit, measured from script submission.
    pub completion: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            login: Duration::from_secs(20),
            prompt: Duration::from_secs(20),
            completion: Duration::from_secs(5),
        }
    }
}

/// Literal prompt prefixes the client prints when it wants input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompts {
    pub password: String,
    pub ready: String,
}

impl Default for Prompts {
    fn default() -> Self {
        Self {
            password: DEFAULT_PASSWORD_PROMPT.to_string(),
            ready: DEFAULT_READY_PROMPT.to_string(),
        }
    }
}

/// Everything needed to run one script through the client.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub host: String,
    pub user: String,
    pub password: SecretString,
    /// Script text, submitted exactly as given.
    pub script: String,
    /// Client executable; bare names are resolved through `PATH`.
    pub client: PathBuf,
    pub timeouts: Timeouts,
    pub prompts: Prompts,
    /// Sleep between transcript checks while waiting for a prompt.
    pub poll_interval: Duration,
}

impl SessionConfig {
    pub fn new(
        host: impl Into<String>,
        user: impl Into<String>,
        password: impl Into<String>,
        script: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            user: user.into(),
            password: Secret::new(password.into()),
            script: script.into(),
            client: PathBuf::from(DEFAULT_CLIENT),
            timeouts: Timeouts::default(),
            prompts: Prompts::default(),
            poll_interval: Duration::from_millis(100),
        }
    }

    /// Build from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from an arbitrary variable lookup.
    ///
    /// Host, user, password and script are required; an empty value is
    /// treated as missing. Client path and timeouts fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = EnvReader::new(lookup);

        let host = env.required(HOST_VAR)?;
        let user = env.required(USER_VAR)?;
        let password = env.required(PASSWORD_VAR)?;
        let script = env.required(SCRIPT_VAR)?;

        let mut config = Self::new(host, user, password, script);

        if let Some(client) = env.optional(CLIENT_VAR) {
            config.client = PathBuf::from(client);
        }
        if let Some(login) = env.duration(LOGIN_TIMEOUT_VAR)? {
            config.timeouts.login = login;
        }
        if let Some(prompt) = env.duration(PROMPT_TIMEOUT_VAR)? {
            config.timeouts.prompt = prompt;
        }
        if let Some(completion) = env.duration(COMPLETION_TIMEOUT_VAR)? {
            config.timeouts.completion = completion;
        }

        Ok(config)
    }

    pub fn client(mut self, client: impl Into<PathBuf>) -> Self {
        self.client = client.into();
        self
    }

    pub fn timeouts(mut self, timeouts: Timeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    pub fn prompts(mut self, prompts: Prompts) -> Self {
        self.prompts = prompts;
        self
    }

    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// The client's only argument: `<user>@<host>`.
    pub fn connect_target(&self) -> String {
        format!("{}@{}", self.user, self.host)
    }
}
