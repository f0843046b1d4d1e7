//! Virtual desktop targeting and pinning.
//!
//! The OS exposes no public API for most of this, so the platform side is
//! a narrow [`VirtualDesktopBackend`] over the undocumented shell
//! interfaces. Desktop indices are volatile: names are re-enumerated on
//! every operation and never cached.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{WindowHandle, WindowResult};

/// Shell-level virtual desktop operations.
pub trait VirtualDesktopBackend: Send + Sync {
    fn desktop_count(&self) -> WindowResult<usize>;

    /// Returns the name the user gave the desktop, if any.
    fn desktop_name(&self, index: usize) -> WindowResult<Option<String>>;

    /// Moves a window to the desktop at `index`, falling back between the
    /// owner-only and cross-process relocation calls as needed.
    fn move_window(&self, window: WindowHandle, index: usize) -> WindowResult<()>;

    fn is_window_pinned(&self, window: WindowHandle) -> WindowResult<bool>;
    fn pin_window(&self, window: WindowHandle) -> WindowResult<()>;
    fn unpin_window(&self, window: WindowHandle) -> WindowResult<()>;

    /// Queries whether the application owning `window` is pinned.
    fn is_app_pinned(&self, window: WindowHandle) -> WindowResult<bool>;
    fn pin_app(&self, window: WindowHandle) -> WindowResult<()>;
    fn unpin_app(&self, window: WindowHandle) -> WindowResult<()>;
}

/// What a pin action does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PinMode {
    #[default]
    Pin,
    Unpin,
    Toggle,
}

/// Whether pinning applies to one window or its whole application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PinScope {
    Window,
    #[default]
    Application,
}

/// Name-based access to virtual desktops on top of a backend.
#[derive(Clone)]
pub struct VirtualDesktopController {
    backend: Arc<dyn VirtualDesktopBackend>,
}

impl VirtualDesktopController {
    pub fn new(backend: Arc<dyn VirtualDesktopBackend>) -> Self {
        Self { backend }
    }

    pub fn count_desktops(&self) -> WindowResult<usize> {
        self.backend.desktop_count()
    }

    /// Returns the desktop's stored name, or `Desktop N` (1-based) if unnamed.
    pub fn name_of_desktop(&self, index: usize) -> WindowResult<String> {
        Ok(self
            .backend
            .desktop_name(index)?
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| format!("Desktop {}", index + 1)))
    }

    /// Returns the names of all desktops in their current order.
    pub fn desktop_names(&self) -> WindowResult<Vec<String>> {
        (0..self.count_desktops()?)
            .map(|i| self.name_of_desktop(i))
            .collect()
    }

    /// Finds the first desktop whose name contains `partial_name`,
    /// ignoring case.
    pub fn find_desktop_by_name(&self, partial_name: &str) -> WindowResult<Option<usize>> {
        let needle = partial_name.to_uppercase();
        for index in 0..self.count_desktops()? {
            if self.name_of_desktop(index)?.to_uppercase().contains(&needle) {
                return Ok(Some(index));
            }
        }
        Ok(None)
    }

    pub fn move_window_to_desktop(&self, window: WindowHandle, index: usize) -> WindowResult<()> {
        debug!("moving {window} to desktop {index}");
        self.backend.move_window(window, index)
    }

    pub fn is_window_pinned(&self, window: WindowHandle) -> WindowResult<bool> {
        self.backend.is_window_pinned(window)
    }

    pub fn pin_window(&self, window: WindowHandle) -> WindowResult<()> {
        if !self.backend.is_window_pinned(window)? {
            self.backend.pin_window(window)?;
        }
        Ok(())
    }

    pub fn unpin_window(&self, window: WindowHandle) -> WindowResult<()> {
        if self.backend.is_window_pinned(window)? {
            self.backend.unpin_window(window)?;
        }
        Ok(())
    }

    pub fn is_application_pinned(&self, window: WindowHandle) -> WindowResult<bool> {
        self.backend.is_app_pinned(window)
    }

    pub fn pin_application(&self, window: WindowHandle) -> WindowResult<()> {
        if !self.backend.is_app_pinned(window)? {
            self.backend.pin_app(window)?;
        }
        Ok(())
    }

    pub fn unpin_application(&self, window: WindowHandle) -> WindowResult<()> {
        if self.backend.is_app_pinned(window)? {
            self.backend.unpin_app(window)?;
        }
        Ok(())
    }

    /// Applies a pin action, resolving toggles against the current state.
    ///
    /// Returns whether the entity ends up pinned.
    pub fn apply_pin(
        &self,
        window: WindowHandle,
        mode: PinMode,
        scope: PinScope,
    ) -> WindowResult<bool> {
        let pin = match (mode, scope) {
            (PinMode::Pin, _) => true,
            (PinMode::Unpin, _) => false,
            (PinMode::Toggle, PinScope::Window) => !self.is_window_pinned(window)?,
            (PinMode::Toggle, PinScope::Application) => !self.is_application_pinned(window)?,
        };

        match (pin, scope) {
            (true, PinScope::Window) => self.pin_window(window)?,
            (false, PinScope::Window) => self.unpin_window(window)?,
            (true, PinScope::Application) => self.pin_application(window)?,
            (false, PinScope::Application) => self.unpin_application(window)?,
        }
        info!(
            "{} {scope:?} of {window}",
            if pin { "pinned" } else { "unpinned" }
        );
        Ok(pin)
    }

    /// Lists desktop names, logging and swallowing interop failures.
    pub fn desktop_names_or_empty(&self) -> Vec<String> {
        self.desktop_names().unwrap_or_else(|e| {
            warn!("failed to enumerate virtual desktops: {e}");
            Vec::new()
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use super::*;
    use crate::fakes::FakeDesktopBackend;

    fn controller(backend: FakeDesktopBackend) -> (Arc<FakeDesktopBackend>, VirtualDesktopController) {
        let backend = Arc::new(backend);
        (backend.clone(), VirtualDesktopController::new(backend))
    }

    #[test]
    fn unnamed_desktops_get_generic_names() {
        let (_, desktops) = controller(FakeDesktopBackend::with_names(&[None, Some("Work"), Some("")]));

        let names = desktops.desktop_names().unwrap();

        assert_eq!(names, vec!["Desktop 1", "Work", "Desktop 3"]);
    }

    #[test]
    fn find_by_name_is_case_insensitive_substring_first_match() {
        // Arrange
        let (_, desktops) = controller(FakeDesktopBackend::with_names(&[
            Some("Home"),
            Some("Work - Mail"),
            Some("Work - Code"),
        ]));

        // Act / Assert
        assert_eq!(desktops.find_desktop_by_name("work").unwrap(), Some(1));
        assert_eq!(desktops.find_desktop_by_name("CODE").unwrap(), Some(2));
        assert_eq!(desktops.find_desktop_by_name("games").unwrap(), None);
    }

    #[test]
    fn generic_names_are_searchable() {
        let (_, desktops) = controller(FakeDesktopBackend::with_names(&[None, None]));

        assert_eq!(desktops.find_desktop_by_name("desktop 2").unwrap(), Some(1));
    }

    #[test]
    fn pinning_twice_is_a_no_op() {
        // Arrange
        let (backend, desktops) = controller(FakeDesktopBackend::with_names(&[None]));
        let window = WindowHandle(5);

        // Act
        desktops.pin_window(window).unwrap();
        desktops.pin_window(window).unwrap();

        // Assert
        assert_eq!(backend.pin_calls.load(Ordering::SeqCst), 1);
        assert!(desktops.is_window_pinned(window).unwrap());
    }

    #[test]
    fn unpinning_unpinned_app_is_a_no_op() {
        let (backend, desktops) = controller(FakeDesktopBackend::with_names(&[None]));

        desktops.unpin_application(WindowHandle(5)).unwrap();

        assert_eq!(backend.pin_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn toggle_flips_application_pin_state() {
        // Arrange
        let (_, desktops) = controller(FakeDesktopBackend::with_names(&[None]));
        let window = WindowHandle(5);

        // Act
        let first = desktops
            .apply_pin(window, PinMode::Toggle, PinScope::Application)
            .unwrap();
        let second = desktops
            .apply_pin(window, PinMode::Toggle, PinScope::Application)
            .unwrap();

        // Assert
        assert!(first);
        assert!(!second);
        assert!(!desktops.is_application_pinned(window).unwrap());
    }

    #[test]
    fn broken_backend_surfaces_errors_instead_of_panicking() {
        let backend = FakeDesktopBackend {
            broken: true,
            ..Default::default()
        };
        let (_, desktops) = controller(backend);

        assert!(desktops.find_desktop_by_name("work").is_err());
        assert!(desktops.desktop_names_or_empty().is_empty());
    }
}
