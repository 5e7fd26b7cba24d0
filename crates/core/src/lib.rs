pub mod domain;
pub mod scoring;
pub mod storage;

pub mod config {
    use crate::scoring::ScoringPolicy;
    use anyhow::Context;
    use std::borrow::Cow;

    pub const DEFAULT_PORT: u16 = 8080;

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub port: u16,
        pub sentry_dsn: Option<String>,
        pub scoring_policy: ScoringPolicy,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            Self::from_lookup(|key| std::env::var(key).ok())
        }

        pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
            let port = match lookup("PORT").filter(|s| !s.trim().is_empty()) {
                Some(s) => s
                    .trim()
                    .parse::<u16>()
                    .with_context(|| format!("PORT must be a port number (got {s:?})"))?,
                None => DEFAULT_PORT,
            };

            let scoring_policy = match lookup("SCORING_POLICY").filter(|s| !s.trim().is_empty()) {
                Some(s) => s.parse().context("invalid SCORING_POLICY")?,
                None => ScoringPolicy::default(),
            };

            Ok(Self {
                port,
                sentry_dsn: lookup("SENTRY_DSN").filter(|s| !s.trim().is_empty()),
                scoring_policy,
            })
        }

        /// Starts Sentry when `SENTRY_DSN` is set. Keep the guard alive for the process lifetime.
        pub fn init_sentry(
            &self,
            release: Option<Cow<'static, str>>,
        ) -> Option<sentry::ClientInitGuard> {
            let dsn = self.sentry_dsn.as_deref()?;
            Some(sentry::init((
                dsn,
                sentry::ClientOptions {
                    release,
                    ..Default::default()
                },
            )))
        }
    }

}
