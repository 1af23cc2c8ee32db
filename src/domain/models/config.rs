//! Configuration model.

use serde::{Deserialize, Serialize};

/// Main configuration structure for Changeling.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Device identity reported in sync payloads.
    #[serde(default)]
    pub device: DeviceConfig,

    /// Host-application navigation anchors.
    #[serde(default)]
    pub host: HostConfig,

    /// Wait/poll timing.
    #[serde(default)]
    pub timing: TimingConfig,

    /// Member-scan bounds and the UI-chrome stoplist.
    #[serde(default)]
    pub scan: ScanConfig,

    /// Result sync.
    #[serde(default)]
    pub sync: SyncConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Device identity configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DeviceConfig {
    /// Identifier sent with every sync payload.
    #[serde(default = "default_device_identifier")]
    pub identifier: String,
}

fn default_device_identifier() -> String {
    "changeling-dev".to_string()
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            identifier: default_device_identifier(),
        }
    }
}

/// Anchor texts and identifiers for driving the host application.
///
/// Defaults target the messaging app the extractor was built against;
/// every anchor is overridable for other hosts or localized builds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct HostConfig {
    /// Candidate host application identifiers, tried in order.
    #[serde(default = "default_app_candidates")]
    pub app_candidates: Vec<String>,

    /// Accessibility description of the overflow-menu button.
    #[serde(default = "default_menu_description")]
    pub menu_description: String,

    /// Menu entry that leads to the target-list screen.
    #[serde(default = "default_menu_entry_text")]
    pub menu_entry_text: String,

    /// Marker text confirming the target-list screen is showing.
    #[serde(default = "default_screen_marker")]
    pub screen_marker: String,

    /// Marker phrase identifying a recipient-count label.
    #[serde(default = "default_recipient_marker")]
    pub recipient_marker: String,

    /// Optional coordinate fallback for the overflow-menu tap.
    #[serde(default)]
    pub menu_fallback_tap: Option<TapPoint>,
}

fn default_app_candidates() -> Vec<String> {
    vec!["com.whatsapp".to_string(), "com.whatsapp.w4b".to_string()]
}

fn default_menu_description() -> String {
    "More options".to_string()
}

fn default_menu_entry_text() -> String {
    "Broadcast lists".to_string()
}

fn default_screen_marker() -> String {
    "Broadcast lists".to_string()
}

fn default_recipient_marker() -> String {
    "recipient".to_string()
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            app_candidates: default_app_candidates(),
            menu_description: default_menu_description(),
            menu_entry_text: default_menu_entry_text(),
            screen_marker: default_screen_marker(),
            recipient_marker: default_recipient_marker(),
            menu_fallback_tap: None,
        }
    }
}

/// A fixed screen coordinate used for fallback taps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TapPoint {
    pub x: i32,
    pub y: i32,
}

/// Poll/wait timing for UI readiness.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TimingConfig {
    /// Interval between condition re-checks.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Upper bound for any single wait.
    #[serde(default = "default_wait_timeout_ms")]
    pub wait_timeout_ms: u64,

    /// Fixed settle between a scroll and the next scan.
    #[serde(default = "default_scroll_settle_ms")]
    pub scroll_settle_ms: u64,
}

const fn default_poll_interval_ms() -> u64 {
    100
}

const fn default_wait_timeout_ms() -> u64 {
    5000
}

const fn default_scroll_settle_ms() -> u64 {
    400
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            wait_timeout_ms: default_wait_timeout_ms(),
            scroll_settle_ms: default_scroll_settle_ms(),
        }
    }
}

/// Member-scan bounds and token rejection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ScanConfig {
    /// Maximum scan iterations per target. Bounds worst-case scan time at
    /// the cost of truncating very long lists.
    #[serde(default = "default_max_scroll_passes")]
    pub max_scroll_passes: u32,

    /// Tokens shorter than this (trimmed) are rejected.
    #[serde(default = "default_min_token_len")]
    pub min_token_len: usize,

    /// UI-chrome phrases; any token containing one is rejected.
    #[serde(default = "default_stoplist")]
    pub stoplist: Vec<String>,
}

const fn default_max_scroll_passes() -> u32 {
    10
}

const fn default_min_token_len() -> usize {
    3
}

fn default_stoplist() -> Vec<String> {
    ["recipient", "broadcast", "tap", "add", "create", "edit"]
        .iter()
        .map(ToString::to_string)
        .collect()
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            max_scroll_passes: default_max_scroll_passes(),
            min_token_len: default_min_token_len(),
            stoplist: default_stoplist(),
        }
    }
}

/// Result-sync configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SyncConfig {
    /// Whether to push results at the end of a run.
    #[serde(default = "default_sync_enabled")]
    pub enabled: bool,

    /// Backend base URL.
    #[serde(default = "default_sync_endpoint")]
    pub endpoint: String,

    /// Request timeout.
    #[serde(default = "default_sync_timeout_secs")]
    pub timeout_secs: u64,
}

const fn default_sync_enabled() -> bool {
    true
}

fn default_sync_endpoint() -> String {
    "http://localhost:3002".to_string()
}

const fn default_sync_timeout_secs() -> u64 {
    10
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            enabled: default_sync_enabled(),
            endpoint: default_sync_endpoint(),
            timeout_secs: default_sync_timeout_secs(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty.
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}
