use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Where log lines go and how they are labelled, read from the environment.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub loki_enabled: bool,
    pub loki_url: Option<String>,
    pub service_name: String,
    pub environment: String,
    pub log_level: String,
}

impl LoggingConfig {
    pub fn from_env() -> Self {
        let var = |key: &str, default: &str| std::env::var(key).unwrap_or_else(|_| default.into());

        Self {
            loki_enabled: env_flag(&var("LOKI_ENABLED", "false")),
            loki_url: std::env::var("LOKI_URL").ok().filter(|url| !url.trim().is_empty()),
            service_name: var("SERVICE_NAME", "finboard"),
            environment: var("ENVIRONMENT", "development"),
            log_level: var("RUST_LOG", "info"),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.loki_enabled && self.loki_url.is_none() {
            return Err("LOKI_ENABLED is true but LOKI_URL is not set".to_string());
        }
        Ok(())
    }
}

fn env_flag(raw: &str) -> bool {
    matches!(raw.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

/// An unparsable `RUST_LOG` falls back to `info` rather than silencing everything.
fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber: console output, plus Loki shipping when enabled.
///
/// With Loki enabled this must run inside a tokio runtime, since the sender
/// is a spawned background task.
pub fn init_logging(config: LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
    config.validate()?;

    #[cfg(feature = "loki")]
    let loki_layer = match config.loki_url.as_deref().filter(|_| config.loki_enabled) {
        Some(loki_url) => {
            let (layer, task) = tracing_loki::builder()
                .label("service", &config.service_name)?
                .label("environment", &config.environment)?
                .build_url(url::Url::parse(loki_url)?)?;
            tokio::spawn(task);
            Some(layer)
        }
        None => None,
    };

    let registry = tracing_subscriber::registry()
        .with(env_filter(&config.log_level))
        .with(tracing_subscriber::fmt::layer());

    #[cfg(feature = "loki")]
    let shipping = {
        let shipping = loki_layer.is_some();
        registry.with(loki_layer).try_init()?;
        shipping
    };
    #[cfg(not(feature = "loki"))]
    let shipping = {
        registry.try_init()?;
        false
    };

    tracing::info!(
        "📊 Logging initialized for {} ({}), loki shipping: {}",
        config.service_name,
        config.environment,
        shipping
    );
    Ok(())
}
