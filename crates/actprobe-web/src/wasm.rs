#![forbid(unsafe_code)]

//! `wasm-bindgen` exports for the activity probe.
//!
//! Wraps [`ActivityDetector`] over the system clock and the `window` event
//! source. Only compiled on `wasm32` targets.

use js_sys::Reflect;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use actprobe_core::log_entry::LogEntry;

use crate::browser::{BrowserEventSource, window_absent};
use crate::config::DetectorConfig;
use crate::detector::ActivityDetector;
use crate::{DetectorError, SystemClock, millis_from_js};

fn console_error(msg: &str) {
    let global = js_sys::global();
    let Ok(console) = Reflect::get(&global, &"console".into()) else {
        return;
    };
    let Ok(error) = Reflect::get(&console, &"error".into()) else {
        return;
    };
    let Ok(error_fn) = error.dyn_into::<js_sys::Function>() else {
        return;
    };
    let _ = error_fn.call1(&console, &JsValue::from_str(msg));
}

fn install_panic_hook() {
    use std::sync::Once;

    static ONCE: Once = Once::new();
    ONCE.call_once(|| {
        std::panic::set_hook(Box::new(|info| {
            console_error(&format!("actprobe panic: {info}"));
        }));
    });
}

fn js_error(err: DetectorError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn entries_json(entries: &[LogEntry]) -> Result<String, JsValue> {
    serde_json::to_string(entries).map_err(|err| js_error(err.into()))
}

#[wasm_bindgen(start)]
pub fn wasm_start() {
    install_panic_hook();
}

/// Activity probe bound to the page's `window`.
///
/// Host-driven: nothing runs between calls. The page must call `tick()` in a
/// loop (`requestAnimationFrame` or `setInterval`); without it `autoInit`
/// never starts and sampled events are never recorded.
#[wasm_bindgen]
pub struct ActivityProbe {
    inner: ActivityDetector<SystemClock, BrowserEventSource>,
}

#[wasm_bindgen]
impl ActivityProbe {
    /// Create a probe from a JSON options object (all fields optional).
    ///
    /// Without a global `window` the probe is headless and never records.
    ///
    /// Construction only schedules work. Keep calling `tick()` afterwards:
    ///
    /// ```js
    /// const probe = new ActivityProbe();
    /// (function frame() { probe.tick(); requestAnimationFrame(frame); })();
    /// ```
    #[wasm_bindgen(constructor)]
    pub fn new(options_json: Option<String>) -> Result<ActivityProbe, JsValue> {
        install_panic_hook();
        let config = match options_json.as_deref() {
            Some(json) if !json.trim().is_empty() => {
                DetectorConfig::from_json(json).map_err(js_error)?
            }
            _ => DetectorConfig::default(),
        };
        let clock = SystemClock::new();
        if window_absent() {
            tracing::warn!("no global window; ActivityProbe is headless");
        }
        let inner = ActivityDetector::new(config, clock, BrowserEventSource::attach(clock))
            .map_err(js_error)?;
        Ok(Self { inner })
    }

    pub fn start(&mut self) {
        self.inner.start();
    }

    pub fn stop(&mut self) {
        self.inner.stop();
    }

    /// Record due samples and fire a due scheduled start.
    pub fn tick(&mut self) {
        self.inner.tick();
    }

    #[wasm_bindgen(js_name = clearLog)]
    pub fn clear_log(&mut self) {
        self.inner.clear_log();
    }

    /// Entries within `pre_time` ms of the newest one, as a JSON array.
    #[wasm_bindgen(js_name = getPreTimeLog)]
    pub fn get_pre_time_log(&self, pre_time: Option<f64>) -> Result<String, JsValue> {
        entries_json(&self.inner.get_pre_time_log(millis_from_js(pre_time)))
    }

    /// Entries between two exact timestamps, as a JSON array.
    #[wasm_bindgen(js_name = getLog)]
    pub fn get_log(&self, start: Option<f64>, end: Option<f64>) -> Result<String, JsValue> {
        entries_json(&self.inner.get_log(millis_from_js(start), millis_from_js(end)))
    }

    /// `"start"` or `"stop"`.
    pub fn state(&self) -> String {
        self.inner.state().label().to_string()
    }

    #[wasm_bindgen(js_name = isHeadless)]
    pub fn is_headless(&self) -> bool {
        self.inner.is_headless()
    }
}
