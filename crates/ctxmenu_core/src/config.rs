//! Tunable menu options.
//!
//! Options are plain data so they can be shipped alongside page markup as JSON.
//! Handlers, hooks and collaborators are attached through [`crate::menu::MenuConfig`].

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::MenuError;
use crate::models::Point;

/// Default fade duration in milliseconds.
pub const DEFAULT_FADE_SPEED_MS: u64 = 200;

/// Default long-press threshold in milliseconds.
pub const DEFAULT_TOUCH_TIMER_MS: u64 = 600;

/// Pixel bias added to the activation point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Offsets {
    /// Horizontal bias.
    pub x: f32,
    /// Vertical bias.
    pub y: f32,
}

impl From<Offsets> for Point {
    fn from(offsets: Offsets) -> Self {
        Point::new(offsets.x, offsets.y)
    }
}

/// Options accepted by a menu at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MenuOptions {
    /// Pixel bias applied to the activation point.
    pub offsets: Offsets,
    /// Suppress the platform menu and bubbling on activation.
    pub stop_event: bool,
    /// Fade duration in milliseconds.
    pub fade_speed_ms: u64,
    /// Long-press threshold in milliseconds.
    pub touch_timer_ms: u64,
    /// Cap the root list height and scroll internally.
    pub scrollable: bool,
    /// Start with triggers disabled.
    pub disabled: bool,
    /// Selector resolving the initial trigger targets.
    pub targets: Option<String>,
}

impl Default for MenuOptions {
    fn default() -> Self {
        Self {
            offsets: Offsets::default(),
            stop_event: true,
            fade_speed_ms: DEFAULT_FADE_SPEED_MS,
            touch_timer_ms: DEFAULT_TOUCH_TIMER_MS,
            scrollable: false,
            disabled: false,
            targets: None,
        }
    }
}

impl MenuOptions {
    /// Parse options from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, MenuError> {
        let options: MenuOptions = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    /// Load options from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, MenuError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&json)
    }

    /// Reject values the engine cannot work with.
    pub fn validate(&self) -> Result<(), MenuError> {
        if !self.offsets.x.is_finite() || !self.offsets.y.is_finite() {
            return Err(MenuError::invalid_option("offsets", "offsets must be finite"));
        }
        if self.touch_timer_ms == 0 {
            return Err(MenuError::invalid_option(
                "touch_timer_ms",
                "a zero threshold turns every tap into a long press",
            ));
        }
        Ok(())
    }

    /// Fade duration.
    pub fn fade_speed(&self) -> Duration {
        Duration::from_millis(self.fade_speed_ms)
    }

    /// Long-press threshold.
    pub fn touch_timer(&self) -> Duration {
        Duration::from_millis(self.touch_timer_ms)
    }
}

/// Options for several menus keyed by menu id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OptionsFile {
    /// Per-menu options.
    pub menus: HashMap<String, MenuOptions>,
}

impl OptionsFile {
    /// Load and validate every entry of an options file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, MenuError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&json)
    }

    /// Parse and validate an options file.
    pub fn from_json(json: &str) -> Result<Self, MenuError> {
        let file: OptionsFile = serde_json::from_str(json)?;
        file.validate()?;
        Ok(file)
    }

    /// Validate every entry.
    pub fn validate(&self) -> Result<(), MenuError> {
        self.menus.values().try_for_each(MenuOptions::validate)
    }

    /// Options for `menu_id`, or the defaults.
    pub fn options_for(&self, menu_id: &str) -> MenuOptions {
        self.menus.get(menu_id).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let options = MenuOptions::default();
        assert!(options.stop_event);
        assert_eq!(options.fade_speed(), Duration::from_millis(200));
        assert_eq!(options.touch_timer(), Duration::from_millis(600));
        assert_eq!(options.offsets, Offsets::default());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let options = MenuOptions::from_json(r#"{"offsets": {"x": -30, "y": 0}, "scrollable": true}"#)
            .unwrap();
        assert_eq!(options.offsets.x, -30.0);
        assert!(options.scrollable);
        assert_eq!(options.touch_timer_ms, DEFAULT_TOUCH_TIMER_MS);
    }

    #[test]
    fn test_zero_touch_timer_rejected() {
        let err = MenuOptions::from_json(r#"{"touch_timer_ms": 0}"#).unwrap_err();
        assert!(matches!(err, MenuError::InvalidOption { option: "touch_timer_ms", .. }));
    }

    #[test]
    fn test_load_options_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r##"{{"torrentsTableMenu": {{"targets": ".torrentsTableContextMenuTarget"}},
                 "rssFeedMenu": {{"stop_event": false}}}}"##
        )
        .unwrap();

        let options = OptionsFile::load(file.path()).unwrap();
        assert_eq!(
            options.options_for("torrentsTableMenu").targets.as_deref(),
            Some(".torrentsTableContextMenuTarget")
        );
        assert!(!options.options_for("rssFeedMenu").stop_event);
        assert_eq!(options.options_for("unknown"), MenuOptions::default());
    }

    #[test]
    fn test_options_file_rejects_bad_entry() {
        let err = OptionsFile::from_json(r#"{"rssFeedMenu": {}, "statusesFilterMenu": {"touch_timer_ms": 0}}"#)
            .unwrap_err();
        assert!(matches!(err, MenuError::InvalidOption { option: "touch_timer_ms", .. }));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = MenuOptions::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, MenuError::Io { .. }));
    }
}
