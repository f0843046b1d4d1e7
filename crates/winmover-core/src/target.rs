use std::fmt;

/// Which windows a triggered action applies to.
///
/// When `app_specific` is false the action targets whatever window has
/// focus and the process name and filters are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetSpec {
    pub app_specific: bool,
    /// Process image name without extension (e.g. `notepad`).
    pub process_name: Option<String>,
    /// Case-insensitive substring of the executable path.
    pub location_filter: Option<String>,
    /// Case-sensitive substring of the main window title.
    pub title_filter: Option<String>,
}

impl TargetSpec {
    /// Targets the focused window.
    pub fn foreground() -> Self {
        Self::default()
    }

    /// Targets every main window of the named process.
    pub fn process(name: impl Into<String>) -> Self {
        Self {
            app_specific: true,
            process_name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn with_location(mut self, filter: impl Into<String>) -> Self {
        self.location_filter = Some(filter.into());
        self
    }

    pub fn with_title(mut self, filter: impl Into<String>) -> Self {
        self.title_filter = Some(filter.into());
        self
    }

    pub fn use_foreground_window(&self) -> bool {
        !self.app_specific
    }

    /// Stable identity used to key retries: two triggers for the same
    /// target share a single retry slot.
    pub fn key(&self) -> String {
        if self.use_foreground_window() {
            return "<foreground>".into();
        }
        format!(
            "{}|{}|{}",
            self.process_name.as_deref().unwrap_or_default(),
            self.location_filter.as_deref().unwrap_or_default(),
            self.title_filter.as_deref().unwrap_or_default()
        )
    }
}

impl fmt::Display for TargetSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.use_foreground_window() {
            return write!(f, "foreground window");
        }
        write!(
            f,
            "process {:?} location {:?} title {:?}",
            self.process_name.as_deref().unwrap_or_default(),
            self.location_filter.as_deref().unwrap_or_default(),
            self.title_filter.as_deref().unwrap_or_default()
        )
    }
}
