//! Per-provider hook configuration.
//!
//! Every provider takes an optional shared secret and, where it has more
//! than one event, a comma-separated subscription (`*` for every event):
//!
//! ```bash
//! GITHUB_SECRET=s3cr3t GITHUB_EVENTS=push,pull_request hookwire
//! ```

use anyhow::{Context, ensure};
use clap::Args;
use hookwire_core::{DEFAULT_BODY_LIMIT, Hook, Provider, Secret, Subscription};
use uuid::Uuid;

use crate::TRACING_TARGET_CONFIG;

/// Hook secrets, subscriptions and mount paths.
#[derive(Debug, Clone, Args)]
#[must_use = "config does nothing unless you use it"]
pub struct HooksConfig {
    /// Path prefix every provider is mounted under.
    #[arg(long, env = "PATH_PREFIX", default_value = "/webhooks")]
    pub path_prefix: String,

    /// Largest accepted delivery body in bytes.
    #[arg(long, env = "BODY_LIMIT", default_value_t = DEFAULT_BODY_LIMIT)]
    pub body_limit: usize,

    /// GitHub webhook secret.
    #[arg(long, env = "GITHUB_SECRET", hide_env_values = true)]
    pub github_secret: Option<Secret>,

    /// GitHub events to accept.
    #[arg(long, env = "GITHUB_EVENTS", value_delimiter = ',', default_value = "*")]
    pub github_events: Vec<String>,

    /// Gogs webhook secret.
    #[arg(long, env = "GOGS_SECRET", hide_env_values = true)]
    pub gogs_secret: Option<Secret>,

    /// Gogs events to accept.
    #[arg(long, env = "GOGS_EVENTS", value_delimiter = ',', default_value = "*")]
    pub gogs_events: Vec<String>,

    /// Bitbucket webhook secret.
    #[arg(long, env = "BITBUCKET_SECRET", hide_env_values = true)]
    pub bitbucket_secret: Option<Secret>,

    /// Bitbucket events to accept.
    #[arg(long, env = "BITBUCKET_EVENTS", value_delimiter = ',', default_value = "*")]
    pub bitbucket_events: Vec<String>,

    /// Bitbucket webhook UUID deliveries must carry in `X-Hook-UUID`.
    ///
    /// Accepted with or without surrounding braces.
    #[arg(long, env = "BITBUCKET_HOOK_UUID", value_parser = parse_hook_uuid)]
    pub bitbucket_hook_uuid: Option<Uuid>,

    /// GitLab secret token.
    #[arg(long, env = "GITLAB_SECRET", hide_env_values = true)]
    pub gitlab_secret: Option<Secret>,

    /// GitLab events to accept.
    #[arg(long, env = "GITLAB_EVENTS", value_delimiter = ',', default_value = "*")]
    pub gitlab_events: Vec<String>,

    /// Google Calendar channel token.
    #[arg(long, env = "GOOGLE_CALENDAR_SECRET", hide_env_values = true)]
    pub google_calendar_secret: Option<Secret>,

    /// Google Calendar resource states to accept.
    #[arg(
        long,
        env = "GOOGLE_CALENDAR_EVENTS",
        value_delimiter = ',',
        default_value = "*"
    )]
    pub google_calendar_events: Vec<String>,

    /// Pepo webhook secret.
    #[arg(long, env = "PEPO_SECRET", hide_env_values = true)]
    pub pepo_secret: Option<Secret>,

    /// LeanIX webhook secret.
    #[arg(long, env = "LEANIX_SECRET", hide_env_values = true)]
    pub leanix_secret: Option<Secret>,

    /// LeanIX events to accept.
    #[arg(long, env = "LEANIX_EVENTS", value_delimiter = ',', default_value = "*")]
    pub leanix_events: Vec<String>,
}

fn parse_hook_uuid(value: &str) -> Result<Uuid, uuid::Error> {
    Uuid::parse_str(value.trim().trim_start_matches('{').trim_end_matches('}'))
}

impl HooksConfig {
    /// Validates limits and every subscription.
    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(self.body_limit > 0, "body limit must be at least one byte");
        self.check_subscriptions()
    }

    /// Builds a hook with the given secret and the configured body limit.
    pub fn hook<P: Provider>(&self, secret: Option<&Secret>) -> Hook<P> {
        let hook = Hook::new().with_body_limit(self.body_limit);
        match secret {
            Some(secret) => hook.with_secret(secret.clone()),
            None => hook,
        }
    }

    /// Logs which providers verify deliveries, without the secrets.
    pub fn log(&self) {
        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            path_prefix = %self.path_prefix,
            body_limit = self.body_limit,
            github_secret = self.github_secret.is_some(),
            gogs_secret = self.gogs_secret.is_some(),
            bitbucket_secret = self.bitbucket_secret.is_some(),
            bitbucket_hook_uuid = self.bitbucket_hook_uuid.is_some(),
            gitlab_secret = self.gitlab_secret.is_some(),
            google_calendar_secret = self.google_calendar_secret.is_some(),
            pepo_secret = self.pepo_secret.is_some(),
            leanix_secret = self.leanix_secret.is_some(),
            "hook configuration"
        );
    }

    fn check_subscriptions(&self) -> anyhow::Result<()> {
        use hookwire_providers::{Bitbucket, GitHub, GitLab, Gogs, GoogleCalendar, Leanix};

        subscription::<GitHub>("GITHUB_EVENTS", &self.github_events)?;
        subscription::<Gogs>("GOGS_EVENTS", &self.gogs_events)?;
        subscription::<Bitbucket>("BITBUCKET_EVENTS", &self.bitbucket_events)?;
        subscription::<GitLab>("GITLAB_EVENTS", &self.gitlab_events)?;
        subscription::<GoogleCalendar>("GOOGLE_CALENDAR_EVENTS", &self.google_calendar_events)?;
        subscription::<Leanix>("LEANIX_EVENTS", &self.leanix_events)?;
        Ok(())
    }
}

/// Parses a configured tag list into a subscription.
///
/// An empty list is rejected so that a provider is never mounted with a
/// subscription that refuses every delivery.
pub fn subscription<P: Provider>(
    name: &str,
    tags: &[String],
) -> anyhow::Result<Subscription<P::Event>> {
    let subscription = Subscription::from_tags(tags)
        .with_context(|| format!("invalid {name} for provider '{}'", P::SPEC.name))?;

    ensure!(
        !subscription.is_empty(),
        "{name} must name at least one event or '*'"
    );

    Ok(subscription)
}
