use std::env;

/// AppConfig
///
/// Holds the application's entire configuration state. This struct is designed to be
/// immutable once loaded, ensuring consistency across all threads and services
/// (e.g., the session token codec and the gate middleware).
/// It is pulled into the application state via FromRef, embodying the "immutable AppConfig"
/// part of the Unified State Pattern.
#[derive(Clone)]
pub struct AppConfig {
    // Runtime environment marker. Controls feature activation (e.g., Dev Bypass).
    pub env: Env,
    // Secret key used to sign and validate session tokens.
    pub token_secret: String,
    // Lifetime of an issued session token, in seconds.
    pub token_ttl_secs: u64,
}

/// Env
///
/// Defines the runtime context, used to switch between development utilities
/// (header bypass, pretty logs) and secure, production-grade behavior
/// (mandatory secrets, JSON logs).
#[derive(Clone, PartialEq, Debug)]
pub enum Env {
    Local,
    Production,
}

impl Default for AppConfig {
    /// default
    ///
    /// Provides a safe, non-panicking AppConfig instance primarily used for test setup.
    /// This allows us to instantiate the configuration without needing to set environment
    /// variables for lightweight unit or integration testing state scaffolding.
    fn default() -> Self {
        // Provide safe, non-panicking dummy values for test state setup
        Self {
            env: Env::Local,
            token_secret: "super-secure-test-secret-value-local".to_string(),
            token_ttl_secs: 3600,
        }
    }
}

impl AppConfig {
    /// load
    ///
    /// The canonical function for initializing the application configuration at startup.
    /// It reads all parameters from environment variables and implements the **fail-fast** principle.
    ///
    /// # Panics
    /// Panics if a critical environment variable required for the current runtime environment
    /// (especially Production) is not found. This prevents the application from starting
    /// with an incomplete or insecure configuration.
    pub fn load() -> Self {
        let env_str = env::var("APP_ENV").unwrap_or_else(|_| "local".to_string());
        let env = match env_str.as_str() {
            "production" => Env::Production,
            _ => Env::Local,
        };

        // Token Secret Resolution
        // The production secret is mandatory and must be explicitly set.
        let token_secret = match env {
            Env::Production => {
                env::var("TOKEN_SECRET").expect("FATAL: TOKEN_SECRET must be set in production.")
            }
            // In local, we provide a fallback so the dev loop works out of the box.
            _ => env::var("TOKEN_SECRET")
                .unwrap_or_else(|_| "super-secure-test-secret-value-local".to_string()),
        };

        // Token lifetime defaults to one hour; override for shorter demo sessions.
        let token_ttl_secs = env::var("TOKEN_TTL_SECS")
            .ok()
            .and_then(|raw| raw.parse::<u64>().ok())
            .unwrap_or(3600);

        Self {
            env,
            token_secret,
            token_ttl_secs,
        }
    }
}
