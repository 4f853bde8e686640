use serde::Deserialize;

/// Main configuration structure for Site-Scout
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawl: CrawlConfig,
    pub proxy: ProxyConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Crawl behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlConfig {
    /// Whether embedded page scripts are kept in the rendered document
    #[serde(rename = "enable-page-scripts", default)]
    pub enable_page_scripts: bool,

    /// Delay after a page body arrives before links are extracted (milliseconds)
    #[serde(rename = "settle-delay-ms", default = "default_settle_delay")]
    pub settle_delay_ms: u64,

    /// Ceiling on a single page render before the target is handed to the
    /// failure classifier (milliseconds)
    #[serde(rename = "render-timeout-ms", default = "default_render_timeout")]
    pub render_timeout_ms: u64,

    /// Whether the per-URL observer should surface each crawled page
    #[serde(rename = "show-preview", default)]
    pub show_preview: bool,
}

/// Proxy endpoint configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ProxyConfig {
    /// Origin of the same-origin proxy every target URL is routed through,
    /// e.g. "https://proxy.example.com"
    pub origin: String,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the markdown summary file
    #[serde(rename = "summary-path", default = "default_summary_path")]
    pub summary_path: String,
}

fn default_settle_delay() -> u64 {
    // Near-zero: just enough to yield once before introspection
    1
}

fn default_render_timeout() -> u64 {
    30_000
}

fn default_summary_path() -> String {
    "./crawl_summary.md".to_string()
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            enable_page_scripts: false,
            settle_delay_ms: default_settle_delay(),
            render_timeout_ms: default_render_timeout(),
            show_preview: false,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            summary_path: default_summary_path(),
        }
    }
}
