//! Mapping durable monitor identifiers to the display currently bound to them.
//!
//! Display device names (`\\.\DISPLAY2`) change when monitors are
//! reconnected or reordered, so settings store a three-part key built
//! from the monitor's friendly name, serial number and instance name.
//! The key is re-resolved against a fresh enumeration at use time.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use tracing::{error, info, warn};

use crate::{Rect, WindowResult};

/// Separator between the fields of a unique key.
pub const UNIQUE_KEY_DELIMITER: char = '|';

/// How long an enumeration stays fresh.
pub const MONITOR_REFRESH: Duration = Duration::from_secs(300);

/// One enumerated monitor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorDescriptor {
    pub friendly_name: String,
    pub serial_number: String,
    pub instance_name: String,
    /// Volatile OS device name, e.g. `\\.\DISPLAY1`.
    pub device_name: String,
}

impl MonitorDescriptor {
    /// Returns the durable `friendly|serial|instance` key.
    pub fn unique_key(&self) -> String {
        let d = UNIQUE_KEY_DELIMITER;
        format!(
            "{}{d}{}{d}{}",
            self.friendly_name, self.serial_number, self.instance_name
        )
    }
}

/// Supplies monitor descriptors and work areas.
pub trait MonitorSource: Send + Sync {
    fn monitors(&self) -> WindowResult<Vec<MonitorDescriptor>>;

    /// Returns the work area (excluding taskbars) of the given device.
    fn work_area(&self, device_name: &str) -> Option<Rect>;
}

/// A destination monitor resolved for one operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screen {
    pub device_name: String,
    pub work_area: Rect,
}

/// A monitor listed for a user to pick from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenEntry {
    pub label: String,
    pub unique_key: String,
    pub device_name: String,
}

#[derive(Default)]
struct MonitorCache {
    monitors: Option<Vec<MonitorDescriptor>>,
    refreshed_at: Option<Instant>,
}

/// Resolves unique monitor keys, caching the enumeration for a fixed TTL.
pub struct ScreenResolver {
    source: Arc<dyn MonitorSource>,
    ttl: Duration,
    cache: Mutex<MonitorCache>,
}

type Field = fn(&MonitorDescriptor) -> &str;

const FIELDS: [(&str, Field); 3] = [
    ("friendly name", friendly_name),
    ("serial", serial_number),
    ("instance name", instance_name),
];

fn friendly_name(m: &MonitorDescriptor) -> &str {
    &m.friendly_name
}

fn serial_number(m: &MonitorDescriptor) -> &str {
    &m.serial_number
}

fn instance_name(m: &MonitorDescriptor) -> &str {
    &m.instance_name
}

impl ScreenResolver {
    pub fn new(source: Arc<dyn MonitorSource>) -> Self {
        Self::with_ttl(source, MONITOR_REFRESH)
    }

    pub fn with_ttl(source: Arc<dyn MonitorSource>, ttl: Duration) -> Self {
        Self {
            source,
            ttl,
            cache: Mutex::new(MonitorCache::default()),
        }
    }

    /// Returns the current monitor list, refreshing it when stale.
    ///
    /// The cache lock is held across the refresh so concurrent callers
    /// never enumerate twice. A failed refresh keeps the old snapshot.
    pub fn monitors(&self) -> Vec<MonitorDescriptor> {
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        let stale = match (&cache.monitors, cache.refreshed_at) {
            (Some(_), Some(at)) => at.elapsed() >= self.ttl,
            _ => true,
        };
        if stale {
            match self.source.monitors() {
                Ok(monitors) => {
                    info!("enumerated {} monitors", monitors.len());
                    cache.monitors = Some(monitors);
                    cache.refreshed_at = Some(Instant::now());
                }
                Err(e) => error!("failed to refresh monitors: {e}"),
            }
        }
        cache.monitors.clone().unwrap_or_default()
    }

    /// Resolves a stored key to the device name currently bound to it.
    ///
    /// Each key field is tried in order (friendly name, serial, instance
    /// name), but only when that field is unique across the enumerated
    /// monitors. A key without delimiters is a legacy device name and
    /// must match exactly.
    pub fn resolve_current_device_name(&self, unique_key: &str) -> Option<String> {
        if unique_key.is_empty() {
            error!("cannot resolve an empty screen key");
            return None;
        }

        let monitors = self.monitors();
        let values: Vec<&str> = unique_key.split(UNIQUE_KEY_DELIMITER).collect();

        if values.len() == 1 {
            let found = monitors
                .iter()
                .find(|m| m.device_name == unique_key)
                .map(|m| m.device_name.clone());
            if found.is_none() {
                warn!("no monitor with legacy device name {unique_key:?}");
            }
            return found;
        }

        if values.len() != FIELDS.len() {
            error!("invalid screen key {unique_key:?}");
            return None;
        }

        for ((label, field), value) in FIELDS.iter().zip(&values) {
            if !is_unique(&monitors, *field) {
                continue;
            }
            if let Some(monitor) = monitors.iter().find(|m| field(m) == *value) {
                info!("found monitor by unique {label}");
                return Some(monitor.device_name.clone());
            }
        }

        warn!("no monitor matches screen key {unique_key:?}");
        None
    }

    /// Resolves a stored key to a device name and its work area.
    pub fn resolve_screen(&self, unique_key: &str) -> Option<Screen> {
        let device_name = self.resolve_current_device_name(unique_key)?;
        let Some(work_area) = self.source.work_area(&device_name) else {
            warn!("monitor {device_name} disappeared before its work area was read");
            return None;
        };
        Some(Screen {
            device_name,
            work_area,
        })
    }

    /// Converts a legacy device-name key into the durable three-part key.
    ///
    /// Returns `None` when the key is already durable or no monitor has
    /// that device name any more.
    pub fn migrate_legacy_key(&self, key: &str) -> Option<String> {
        if key.is_empty() || key.contains(UNIQUE_KEY_DELIMITER) {
            return None;
        }
        let migrated = self
            .monitors()
            .iter()
            .find(|m| m.device_name == key)
            .map(MonitorDescriptor::unique_key);
        match &migrated {
            Some(new_key) => info!("replacing legacy screen key {key:?} with {new_key:?}"),
            None => info!("legacy screen key {key:?} no longer matches a monitor"),
        }
        migrated
    }

    /// Lists monitors with labels for display.
    ///
    /// With `friendly` set, monitors are labeled by friendly name, plus
    /// the serial number when two monitors share a friendly name.
    /// Otherwise the device name is used.
    pub fn screens(&self, friendly: bool) -> Vec<ScreenEntry> {
        let monitors = self.monitors();
        let unique_friendly = is_unique(&monitors, friendly_name);
        monitors
            .iter()
            .map(|m| {
                let label = match (friendly, unique_friendly) {
                    (false, _) => m.device_name.clone(),
                    (true, true) => m.friendly_name.clone(),
                    (true, false) => format!("{} ({})", m.friendly_name, m.serial_number),
                };
                ScreenEntry {
                    label,
                    unique_key: m.unique_key(),
                    device_name: m.device_name.clone(),
                }
            })
            .collect()
    }
}

fn is_unique(monitors: &[MonitorDescriptor], field: Field) -> bool {
    let mut seen = HashSet::new();
    monitors.iter().all(|m| seen.insert(field(m)))
}

#[cfg(test)]
#[path = "monitor_tests.rs"]
mod tests;
