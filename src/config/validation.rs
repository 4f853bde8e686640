use crate::config::types::{Config, CrawlConfig, OutputConfig, ProxyConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawl_config(&config.crawl)?;
    validate_proxy_config(&config.proxy)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates crawl configuration
fn validate_crawl_config(config: &CrawlConfig) -> Result<(), ConfigError> {
    if config.render_timeout_ms == 0 {
        return Err(ConfigError::Validation(
            "render_timeout_ms must be greater than 0".to_string(),
        ));
    }

    // The settle delay runs inside the render timeout; a delay at or above
    // the ceiling would classify every page as a failure.
    if config.settle_delay_ms >= config.render_timeout_ms {
        return Err(ConfigError::Validation(format!(
            "settle_delay_ms ({}) must be below render_timeout_ms ({})",
            config.settle_delay_ms, config.render_timeout_ms
        )));
    }

    Ok(())
}

/// Validates the proxy origin: must be an absolute http(s) URL with a host
/// and nothing after the origin (no path, query, or fragment).
fn validate_proxy_config(config: &ProxyConfig) -> Result<(), ConfigError> {
    if config.origin.is_empty() {
        return Err(ConfigError::Validation(
            "proxy origin cannot be empty".to_string(),
        ));
    }

    let url = Url::parse(&config.origin)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid proxy origin: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "Proxy origin must be http or https, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(
            "Proxy origin has no host".to_string(),
        ));
    }

    if url.path() != "/" || url.query().is_some() || url.fragment().is_some() {
        return Err(ConfigError::InvalidUrl(format!(
            "Proxy origin must be a bare origin, got: {}",
            config.origin
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.summary_path.is_empty() {
        return Err(ConfigError::Validation(
            "summary_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> Config {
        Config {
            crawl: CrawlConfig::default(),
            proxy: ProxyConfig {
                origin: "https://proxy.example.com".to_string(),
            },
            output: OutputConfig::default(),
        }
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(validate(&valid_config()).is_ok());
    }

    #[test]
    fn test_zero_render_timeout_rejected() {
        let mut config = valid_config();
        config.crawl.render_timeout_ms = 0;
        assert!(matches!(
            validate(&config),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_settle_delay_above_timeout_rejected() {
        let mut config = valid_config();
        config.crawl.settle_delay_ms = 60_000;
        config.crawl.render_timeout_ms = 30_000;
        assert!(matches!(
            validate(&config),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_empty_proxy_origin_rejected() {
        let mut config = valid_config();
        config.proxy.origin = String::new();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_proxy_origin_with_path_rejected() {
        let mut config = valid_config();
        config.proxy.origin = "https://proxy.example.com/tools".to_string();
        assert!(matches!(
            validate(&config),
            Err(ConfigError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_non_http_proxy_origin_rejected() {
        let mut config = valid_config();
        config.proxy.origin = "ftp://proxy.example.com".to_string();
        assert!(matches!(
            validate(&config),
            Err(ConfigError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_empty_summary_path_rejected() {
        let mut config = valid_config();
        config.output.summary_path = String::new();
        assert!(validate(&config).is_err());
    }
}
