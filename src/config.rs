//! Configuration types.

use std::time::Duration;

use secrecy::SecretString;

use crate::error::ConfigError;

/// Invitation link shown in link mode when nothing else is configured.
pub const DEFAULT_INVITE_LINK: &str = "https://flexsync.com/invite/coach123";

/// Route the wizard navigates to once the profile is accepted.
pub const DEFAULT_DASHBOARD_ROUTE: &str = "/dashboard";

/// Wizard configuration.
#[derive(Debug, Clone)]
pub struct WizardConfig {
    /// Read-only invitation URL tied to the coach's identity.
    pub invite_link: String,
    /// Navigation destination after a successful submission.
    pub dashboard_route: String,
    /// Where the finished profile is POSTed. `None` logs the profile instead.
    pub submit_url: Option<String>,
    /// Timeout applied to HTTP submissions.
    pub http_timeout: Duration,
    /// SMTP settings for email invitations. `None` logs invitations instead.
    pub smtp: Option<SmtpConfig>,
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            invite_link: DEFAULT_INVITE_LINK.to_string(),
            dashboard_route: DEFAULT_DASHBOARD_ROUTE.to_string(),
            submit_url: None,
            http_timeout: Duration::from_secs(10),
            smtp: None,
        }
    }
}

impl WizardConfig {
    /// Build config from environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let invite_link =
            std::env::var("COACH_SIGNUP_INVITE_LINK").unwrap_or(defaults.invite_link);
        if invite_link.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "COACH_SIGNUP_INVITE_LINK".into(),
                message: "must not be empty".into(),
            });
        }

        let dashboard_route =
            std::env::var("COACH_SIGNUP_DASHBOARD_ROUTE").unwrap_or(defaults.dashboard_route);
        if !dashboard_route.starts_with('/') {
            return Err(ConfigError::InvalidValue {
                key: "COACH_SIGNUP_DASHBOARD_ROUTE".into(),
                message: format!("route must start with '/', got {dashboard_route:?}"),
            });
        }

        let submit_url = std::env::var("COACH_SIGNUP_SUBMIT_URL")
            .ok()
            .filter(|s| !s.trim().is_empty());

        let http_timeout = std::env::var("COACH_SIGNUP_HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.http_timeout);

        Ok(Self {
            invite_link,
            dashboard_route,
            submit_url,
            http_timeout,
            smtp: SmtpConfig::from_env()?,
        })
    }
}

/// Outbound SMTP settings for email invitations.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: SecretString,
    pub from_address: String,
}

impl SmtpConfig {
    /// Returns `Ok(None)` if `SMTP_HOST` is not set (email invitations are logged only).
    pub fn from_env() -> Result<Option<Self>, ConfigError> {
        let Ok(host) = std::env::var("SMTP_HOST") else {
            return Ok(None);
        };

        let port: u16 = std::env::var("SMTP_PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(587);

        let username = std::env::var("SMTP_USERNAME").unwrap_or_default();
        let password = SecretString::from(std::env::var("SMTP_PASSWORD").unwrap_or_default());
        let from_address = std::env::var("SMTP_FROM_ADDRESS").unwrap_or_else(|_| username.clone());

        if from_address.is_empty() {
            return Err(ConfigError::MissingRequired {
                key: "SMTP_FROM_ADDRESS".into(),
                hint: "Set SMTP_FROM_ADDRESS or SMTP_USERNAME when SMTP_HOST is set.".into(),
            });
        }

        Ok(Some(Self {
            host,
            port,
            username,
            password,
            from_address,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Mutex;

    /// Environment variables are process-wide; tests touching them take this lock.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    const KEYS: [&str; 9] = [
        "COACH_SIGNUP_INVITE_LINK",
        "COACH_SIGNUP_DASHBOARD_ROUTE",
        "COACH_SIGNUP_SUBMIT_URL",
        "COACH_SIGNUP_HTTP_TIMEOUT_SECS",
        "SMTP_HOST",
        "SMTP_PORT",
        "SMTP_USERNAME",
        "SMTP_PASSWORD",
        "SMTP_FROM_ADDRESS",
    ];

    /// Run `f` with exactly `vars` set among the keys this module reads.
    fn with_env<T>(vars: &[(&str, &str)], f: impl FnOnce() -> T) -> T {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|p| p.into_inner());
        // SAFETY: every test that reads or writes these variables holds ENV_LOCK.
        unsafe {
            for key in KEYS {
                std::env::remove_var(key);
            }
            for (key, value) in vars {
                std::env::set_var(key, value);
            }
        }
        let result = f();
        // SAFETY: as above.
        unsafe {
            for key in KEYS {
                std::env::remove_var(key);
            }
        }
        result
    }

    #[test]
    fn from_env_without_variables_matches_default() {
        let config = with_env(&[], WizardConfig::from_env).unwrap();
        assert_eq!(config.invite_link, DEFAULT_INVITE_LINK);
        assert_eq!(config.dashboard_route, DEFAULT_DASHBOARD_ROUTE);
        assert!(config.submit_url.is_none());
        assert_eq!(config.http_timeout, Duration::from_secs(10));
        assert!(config.smtp.is_none());
    }

    #[test]
    fn from_env_reads_overrides() {
        let config = with_env(
            &[
                ("COACH_SIGNUP_INVITE_LINK", "https://flexsync.com/invite/abc"),
                ("COACH_SIGNUP_DASHBOARD_ROUTE", "/coach/home"),
                ("COACH_SIGNUP_SUBMIT_URL", "https://api.example.com/coaches"),
                ("COACH_SIGNUP_HTTP_TIMEOUT_SECS", "3"),
            ],
            WizardConfig::from_env,
        )
        .unwrap();
        assert_eq!(config.invite_link, "https://flexsync.com/invite/abc");
        assert_eq!(config.dashboard_route, "/coach/home");
        assert_eq!(config.submit_url.as_deref(), Some("https://api.example.com/coaches"));
        assert_eq!(config.http_timeout, Duration::from_secs(3));
    }

    #[test]
    fn blank_submit_url_means_log_only() {
        let config = with_env(&[("COACH_SIGNUP_SUBMIT_URL", "  ")], WizardConfig::from_env).unwrap();
        assert!(config.submit_url.is_none());
    }

    #[test]
    fn unparsable_timeout_falls_back_to_default() {
        let config = with_env(
            &[("COACH_SIGNUP_HTTP_TIMEOUT_SECS", "ten")],
            WizardConfig::from_env,
        )
        .unwrap();
        assert_eq!(config.http_timeout, Duration::from_secs(10));
    }

    #[test]
    fn dashboard_route_must_be_absolute() {
        let err = with_env(
            &[("COACH_SIGNUP_DASHBOARD_ROUTE", "dashboard")],
            WizardConfig::from_env,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "COACH_SIGNUP_DASHBOARD_ROUTE"));
    }

    #[test]
    fn empty_invite_link_is_rejected() {
        let err = with_env(&[("COACH_SIGNUP_INVITE_LINK", "")], WizardConfig::from_env).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "COACH_SIGNUP_INVITE_LINK"));
    }

    #[test]
    fn smtp_from_env_returns_none_when_no_host() {
        let smtp = with_env(&[("SMTP_USERNAME", "coach@example.com")], SmtpConfig::from_env).unwrap();
        assert!(smtp.is_none());
    }

    #[test]
    fn smtp_port_falls_back_and_from_address_defaults_to_username() {
        let smtp = with_env(
            &[
                ("SMTP_HOST", "smtp.example.com"),
                ("SMTP_PORT", "not-a-port"),
                ("SMTP_USERNAME", "coach@example.com"),
                ("SMTP_PASSWORD", "hunter2"),
            ],
            SmtpConfig::from_env,
        )
        .unwrap()
        .unwrap();
        assert_eq!(smtp.host, "smtp.example.com");
        assert_eq!(smtp.port, 587);
        assert_eq!(smtp.from_address, "coach@example.com");
        assert_eq!(secrecy::ExposeSecret::expose_secret(&smtp.password), "hunter2");
    }

    #[test]
    fn smtp_host_without_sender_is_missing_required() {
        let err = with_env(&[("SMTP_HOST", "smtp.example.com")], WizardConfig::from_env).unwrap_err();
        assert!(matches!(err, ConfigError::MissingRequired { ref key, .. } if key == "SMTP_FROM_ADDRESS"));
    }

    #[test]
    fn default_config_uses_dashboard_and_fixed_link() {
        let config = WizardConfig::default();
        assert_eq!(config.dashboard_route, "/dashboard");
        assert_eq!(config.invite_link, "https://flexsync.com/invite/coach123");
        assert!(config.submit_url.is_none());
        assert!(config.smtp.is_none());
        assert_eq!(config.http_timeout, Duration::from_secs(10));
    }
}
