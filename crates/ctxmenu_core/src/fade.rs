//! Opacity tween used to show and hide menus.
//!
//! Starting a new fade supersedes the one in flight and continues from the
//! current opacity, so the last `show`/`hide` call wins.

use std::time::Duration;

/// Visibility derived from opacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// Opacity above zero.
    Visible,
    /// Fully transparent.
    Hidden,
}

#[derive(Debug, Clone, Copy)]
struct Tween {
    from: f32,
    to: f32,
    started_at: Duration,
}

/// A cancellable opacity transition.
#[derive(Debug, Clone)]
pub struct Fade {
    duration: Duration,
    opacity: f32,
    tween: Option<Tween>,
}

impl Fade {
    /// Create a fully transparent fade.
    pub fn new(duration: Duration) -> Self {
        Self { duration, opacity: 0.0, tween: None }
    }

    /// Start moving toward `to`, replacing any running tween.
    pub fn start(&mut self, to: f32, now: Duration) {
        self.tick(now);
        let to = to.clamp(0.0, 1.0);
        if self.duration.is_zero() {
            self.opacity = to;
            self.tween = None;
        } else {
            self.tween = Some(Tween { from: self.opacity, to, started_at: now });
        }
    }

    /// Advance to `now` and return the opacity.
    pub fn tick(&mut self, now: Duration) -> f32 {
        if let Some(tween) = self.tween {
            let elapsed = now.saturating_sub(tween.started_at);
            if elapsed >= self.duration {
                self.opacity = tween.to;
                self.tween = None;
                tracing::trace!(opacity = self.opacity, "Fade complete");
            } else {
                let progress = elapsed.as_secs_f32() / self.duration.as_secs_f32();
                self.opacity = tween.from + (tween.to - tween.from) * progress;
            }
        }
        self.opacity
    }

    /// Current opacity as of the last tick.
    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    /// Opacity the running tween is heading to, or the settled opacity.
    pub fn target(&self) -> f32 {
        self.tween.map(|t| t.to).unwrap_or(self.opacity)
    }

    /// Whether a tween is running.
    pub fn is_running(&self) -> bool {
        self.tween.is_some()
    }

    /// Visibility as of the last tick.
    pub fn visibility(&self) -> Visibility {
        if self.opacity > 0.0 {
            Visibility::Visible
        } else {
            Visibility::Hidden
        }
    }

    /// Transparent and not heading anywhere else.
    pub fn is_fully_hidden(&self) -> bool {
        self.opacity <= 0.0 && self.target() <= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    #[test]
    fn test_fade_in_progress_and_completion() {
        let mut fade = Fade::new(ms(200));
        fade.start(1.0, ms(0));
        assert!(fade.is_running());
        assert!((fade.tick(ms(100)) - 0.5).abs() < 1e-6);
        assert_eq!(fade.visibility(), Visibility::Visible);
        assert_eq!(fade.tick(ms(250)), 1.0);
        assert!(!fade.is_running());
    }

    #[test]
    fn test_new_fade_supersedes_running_one() {
        let mut fade = Fade::new(ms(200));
        fade.start(1.0, ms(0));
        fade.start(0.0, ms(50));
        assert_eq!(fade.target(), 0.0);
        // continues from 0.25 down to zero
        assert!((fade.tick(ms(150)) - 0.125).abs() < 1e-6);
        assert_eq!(fade.tick(ms(250)), 0.0);
        assert!(fade.is_fully_hidden());
    }

    #[test]
    fn test_pending_fade_in_is_not_fully_hidden() {
        let mut fade = Fade::new(ms(200));
        fade.start(1.0, ms(0));
        assert_eq!(fade.opacity(), 0.0);
        assert!(!fade.is_fully_hidden());
    }

    #[test]
    fn test_zero_duration_jumps() {
        let mut fade = Fade::new(Duration::ZERO);
        fade.start(1.0, ms(10));
        assert_eq!(fade.opacity(), 1.0);
        assert!(!fade.is_running());
    }
}
