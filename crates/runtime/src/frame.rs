use foundation::math::Vec2;
use foundation::time::Time;

/// Viewport size in pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width: width.max(1.0),
            height: height.max(1.0),
        }
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

/// Layout bounds of the 3D view inside the viewport, in pixels (y up).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl FrameRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width: width.max(1.0),
            height: height.max(1.0),
        }
    }

    /// A frame covering the whole viewport.
    pub fn full(viewport: Viewport) -> Self {
        Self::new(0.0, 0.0, viewport.width, viewport.height)
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + 0.5 * self.width, self.y + 0.5 * self.height)
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
    }
}

/// Per-frame input supplied by the host.
///
/// `index` and `time` are derived so a recorded sequence of frames replays
/// identically.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Frame {
    /// 0-based frame index.
    pub index: u64,
    /// Elapsed time since the previous frame (seconds).
    pub dt_s: f64,
    /// Engine time at the start of the frame.
    pub time: Time,
    pub viewport: Viewport,
    pub frame_rect: FrameRect,
}

impl Frame {
    pub fn first(viewport: Viewport, frame_rect: FrameRect) -> Self {
        Self {
            index: 0,
            dt_s: 0.0,
            time: Time(0.0),
            viewport,
            frame_rect,
        }
    }

    /// The frame after `self`, `dt_s` seconds later. Negative deltas clamp to 0.
    pub fn next(self, dt_s: f64) -> Self {
        let dt_s = dt_s.max(0.0);
        Self {
            index: self.index + 1,
            dt_s,
            time: self.time.advance(dt_s),
            ..self
        }
    }

    pub fn with_layout(self, viewport: Viewport, frame_rect: FrameRect) -> Self {
        Self {
            viewport,
            frame_rect,
            ..self
        }
    }
}
