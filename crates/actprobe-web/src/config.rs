#![forbid(unsafe_code)]

//! Detector construction options.
//!
//! Deserializes from the option object hosts already pass, with every field
//! optional:
//!
//! ```text
//! { "activityEvents": ["click", "keydown"], "logStackMaxLength": 50,
//!   "autoInit": false, "timeToStart": 0, "samplingTime": 100 }
//! ```

use core::time::Duration;

use actprobe_core::event::DEFAULT_ACTIVITY_EVENTS;
use actprobe_core::log_buffer::DEFAULT_LOG_CAPACITY;
use serde::{Deserialize, Serialize};

use crate::error::{DetectorError, Result};

/// Default throttle cooldown, in milliseconds.
pub const DEFAULT_SAMPLING_TIME_MS: u64 = 100;

/// Activity detector configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DetectorConfig {
    /// Event names to listen for.
    pub activity_events: Vec<String>,
    /// Log buffer capacity.
    pub log_stack_max_length: usize,
    /// Schedule `start()` at construction.
    pub auto_init: bool,
    /// Delay before the scheduled `start()`, in milliseconds.
    #[serde(rename = "timeToStart")]
    pub time_to_start_ms: u64,
    /// Throttle cooldown, in milliseconds.
    #[serde(rename = "samplingTime")]
    pub sampling_time_ms: u64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            activity_events: DEFAULT_ACTIVITY_EVENTS.iter().map(|s| s.to_string()).collect(),
            log_stack_max_length: DEFAULT_LOG_CAPACITY,
            auto_init: true,
            time_to_start_ms: 0,
            sampling_time_ms: DEFAULT_SAMPLING_TIME_MS,
        }
    }
}

impl DetectorConfig {
    /// Parse JSON options; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    #[must_use]
    pub fn with_activity_events<I, T>(mut self, events: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.activity_events = events.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_log_stack_max_length(mut self, capacity: usize) -> Self {
        self.log_stack_max_length = capacity;
        self
    }

    #[must_use]
    pub fn with_auto_init(mut self, auto_init: bool) -> Self {
        self.auto_init = auto_init;
        self
    }

    #[must_use]
    pub fn with_time_to_start(mut self, delay: Duration) -> Self {
        self.time_to_start_ms = duration_ms(delay);
        self
    }

    #[must_use]
    pub fn with_sampling_time(mut self, cooldown: Duration) -> Self {
        self.sampling_time_ms = duration_ms(cooldown);
        self
    }

    /// Delay before the scheduled start.
    #[must_use]
    pub fn time_to_start(&self) -> Duration {
        Duration::from_millis(self.time_to_start_ms)
    }

    /// Throttle cooldown.
    #[must_use]
    pub fn sampling_time(&self) -> Duration {
        Duration::from_millis(self.sampling_time_ms)
    }

    /// Reject configurations the detector cannot honor.
    pub fn validate(&self) -> Result<()> {
        if self.log_stack_max_length == 0 {
            return Err(DetectorError::invalid(
                "logStackMaxLength must be at least 1",
            ));
        }
        if self.activity_events.is_empty() {
            return Err(DetectorError::invalid("activityEvents must not be empty"));
        }
        if let Some(blank) = self.activity_events.iter().find(|name| name.trim().is_empty()) {
            return Err(DetectorError::invalid(format!(
                "activityEvents contains a blank event name: {blank:?}"
            )));
        }
        Ok(())
    }
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
