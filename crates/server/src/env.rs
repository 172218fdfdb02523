/// Variables whose value `production` marks a production deployment.
const PRODUCTION_VALUE_VARS: &[&str] = &[
    "NODE_ENV",
    "VERCEL_ENV",
    "NETLIFY_ENV",
    "RAILWAY_ENVIRONMENT",
];

/// Variables whose mere presence marks a hosted deployment.
const HOSTED_MARKER_VARS: &[&str] = &["AWS_EXECUTION_ENV", "HEROKU_APP_NAME", "CF_PAGES", "RENDER"];

/// Whether editing is allowed in this process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RuntimeMode {
    /// Local development; editing enabled.
    #[default]
    Development,
    /// Deployed; every editor entry point is disabled.
    Production,
}

impl RuntimeMode {
    /// Detects the mode through `lookup`, which returns a variable's value.
    pub fn detect_with<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let production = PRODUCTION_VALUE_VARS
            .iter()
            .any(|name| lookup(name).is_some_and(|value| value == "production"))
            || HOSTED_MARKER_VARS
                .iter()
                .any(|name| lookup(name).is_some_and(|value| !value.is_empty()));

        if production {
            RuntimeMode::Production
        } else {
            RuntimeMode::Development
        }
    }

    /// Detects the mode from the process environment.
    pub fn from_env() -> Self {
        Self::detect_with(|name| std::env::var(name).ok())
    }

    /// True in production.
    pub fn is_production(self) -> bool {
        self == RuntimeMode::Production
    }
}
