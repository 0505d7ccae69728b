//! Eased, interruptible transitions spread across frames.
//!
//! A [`Transition`] owns a value and animates it towards a target. Work is
//! carried by stored elapsed/duration state; nothing blocks. A new `charge`
//! pre-empts whatever is in flight by rebasing on the current interpolated
//! value, so rapid commands chain smoothly instead of snapping.

/// Values that can be blended between two endpoints.
pub trait Interpolate: Clone {
    /// Blend from `self` (t = 0) to `other` (t = 1).
    fn interpolate(&self, other: &Self, t: f64) -> Self;
}

impl Interpolate for f64 {
    fn interpolate(&self, other: &Self, t: f64) -> Self {
        self + (other - self) * t
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Easing {
    Linear,
    QuadIn,
    QuadOut,
    #[default]
    QuadInOut,
}

impl Easing {
    /// Evaluate the curve at `t`, clamped to `[0, 1]`.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::QuadIn => t * t,
            Easing::QuadOut => t * (2.0 - t),
            Easing::QuadInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - 2.0 * (1.0 - t) * (1.0 - t)
                }
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct Transition<T> {
    initial: T,
    current: T,
    target: T,
    elapsed_s: f64,
    duration_s: f64,
    easing: Easing,
    running: bool,
}

impl<T: Interpolate + PartialEq> Transition<T> {
    pub fn new(value: T, easing: Easing) -> Self {
        Self {
            initial: value.clone(),
            current: value.clone(),
            target: value,
            elapsed_s: 0.0,
            duration_s: 0.0,
            easing,
            running: false,
        }
    }

    /// Re-arm the transition.
    ///
    /// The in-flight value becomes the new starting point and `mutation` is
    /// applied to the previous target, so successive charges accumulate.
    pub fn charge(&mut self, duration_s: f64, mutation: impl FnOnce(T) -> T) {
        self.initial = self.current.clone();
        self.target = mutation(self.target.clone());
        self.elapsed_s = 0.0;
        self.duration_s = duration_s.max(0.0);
        self.running = true;
    }

    /// Advance by `dt_s` seconds. Returns whether the current value changed.
    pub fn process(&mut self, dt_s: f64) -> bool {
        if !self.running {
            return false;
        }

        self.elapsed_s += dt_s.max(0.0);
        let t = if self.duration_s <= 0.0 {
            1.0
        } else {
            (self.elapsed_s / self.duration_s).clamp(0.0, 1.0)
        };

        let next = if t >= 1.0 {
            self.running = false;
            self.target.clone()
        } else {
            self.initial.interpolate(&self.target, self.easing.apply(t))
        };

        let changed = next != self.current;
        self.current = next;
        changed
    }

    /// Freeze at the current interpolated value and drop the pending target.
    pub fn stop(&mut self) {
        self.initial = self.current.clone();
        self.target = self.current.clone();
        self.elapsed_s = 0.0;
        self.duration_s = 0.0;
        self.running = false;
    }

    pub fn current(&self) -> &T {
        &self.current
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    pub fn is_active(&self) -> bool {
        self.running
    }

    /// Normalized progress in `[0, 1]`; 1 when idle.
    pub fn progress(&self) -> f64 {
        if !self.running || self.duration_s <= 0.0 {
            1.0
        } else {
            (self.elapsed_s / self.duration_s).clamp(0.0, 1.0)
        }
    }
}
