//! Scroll-driven variable-font animation.
//!
//! Every tracked row gets a pair of font-variation axes, `grow` and `THCK`,
//! derived from where its vertical midpoint sits in the viewport:
//!
//! ```text
//! progress = clamp(1 - midpoint_y / viewport_height, 0, 1)
//!            0 = midpoint at/below the bottom edge, 1 = at/above the top edge
//! eased    = cubic ease-in-out(progress)
//! axes     = BANDS lookup on eased
//! ```
//!
//! [`BANDS`] is a design table, not derived from anything. It is serialized
//! into the page so the browser runtime applies exactly these numbers.
//!
//! Recomputation is frame-throttled: [`FrameThrottle`] keeps at most one
//! pending frame, and each new scroll/resize request supersedes it.

use crate::types::ItemKey;
use serde::Serialize;
use std::collections::BTreeMap;

/// The two font-variation axes driven by scroll position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FontAxes {
    pub grow: f64,
    pub thick: f64,
}

impl FontAxes {
    /// Fully resolved; also the value for rows that are not measured yet.
    pub const RESOLVED: FontAxes = FontAxes {
        grow: 1000.0,
        thick: 1000.0,
    };

    /// `font-variation-settings` value.
    pub fn to_css(self) -> String {
        format!("\"grow\" {}, \"THCK\" {}", self.grow.round(), self.thick.round())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Curve {
    Linear,
    /// Quadratic ease-in on the band-local progress.
    EaseIn,
}

impl Curve {
    fn apply(self, t: f64) -> f64 {
        match self {
            Curve::Linear => t,
            Curve::EaseIn => t * t,
        }
    }
}

/// One segment of the eased-progress range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Band {
    pub start: f64,
    pub end: f64,
    pub curve: Curve,
    /// `grow` at band start and end.
    pub grow: (f64, f64),
    /// `THCK` at band start and end.
    pub thick: (f64, f64),
}

pub const BANDS: [Band; 4] = [
    // entering from the bottom: held at the start values
    Band {
        start: 0.0,
        end: 0.2,
        curve: Curve::Linear,
        grow: (1000.0, 1000.0),
        thick: (300.0, 300.0),
    },
    Band {
        start: 0.2,
        end: 0.7,
        curve: Curve::Linear,
        grow: (1000.0, 100.0),
        thick: (300.0, 100.0),
    },
    // stable reading zone
    Band {
        start: 0.7,
        end: 0.9,
        curve: Curve::Linear,
        grow: (100.0, 100.0),
        thick: (100.0, 100.0),
    },
    Band {
        start: 0.9,
        end: 1.0,
        curve: Curve::EaseIn,
        grow: (100.0, 1000.0),
        thick: (100.0, 1000.0),
    },
];

/// JSON form of [`BANDS`] for the page runtime.
pub fn band_table_json() -> String {
    serde_json::to_string(&BANDS).unwrap_or_else(|_| "[]".to_string())
}

/// Standard cubic ease-in-out on `[0, 1]`.
pub fn ease_in_out_cubic(t: f64) -> f64 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

/// A row's box relative to the viewport, as `getBoundingClientRect` reports it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemRect {
    pub top: f64,
    pub height: f64,
}

/// Normalized scroll progress of a row. `viewport_height` must be positive.
pub fn progress(rect: ItemRect, viewport_height: f64) -> f64 {
    let midpoint = rect.top + rect.height / 2.0;
    (1.0 - midpoint / viewport_height).clamp(0.0, 1.0)
}

/// Map an already-eased value through [`BANDS`].
pub fn axes_for_eased(eased: f64) -> FontAxes {
    let eased = eased.clamp(0.0, 1.0);
    let band = BANDS
        .iter()
        .find(|b| eased < b.end)
        .unwrap_or(&BANDS[BANDS.len() - 1]);
    let local = band.curve.apply((eased - band.start) / (band.end - band.start));
    let lerp = |(from, to): (f64, f64)| from + (to - from) * local;
    FontAxes {
        grow: lerp(band.grow),
        thick: lerp(band.thick),
    }
}

/// Axes for a raw (not yet eased) progress value.
pub fn axes_at(progress: f64) -> FontAxes {
    axes_for_eased(ease_in_out_cubic(progress.clamp(0.0, 1.0)))
}

/// Per-frame result: one entry per tracked row.
pub type AxisMap = BTreeMap<ItemKey, FontAxes>;

/// Rows whose axes follow scroll position.
#[derive(Debug, Clone, Default)]
pub struct ScrollAnimator {
    tracked: Vec<ItemKey>,
}

impl ScrollAnimator {
    pub fn new(tracked: impl IntoIterator<Item = ItemKey>) -> Self {
        Self {
            tracked: tracked.into_iter().collect(),
        }
    }

    pub fn tracked(&self) -> &[ItemKey] {
        &self.tracked
    }

    /// Rebuild the axis map from current measurements.
    ///
    /// `measure` returns `None` for rows that are not mounted; those, and
    /// every row when the viewport has no height, get [`FontAxes::RESOLVED`].
    pub fn frame<F>(&self, viewport_height: f64, mut measure: F) -> AxisMap
    where
        F: FnMut(&ItemKey) -> Option<ItemRect>,
    {
        self.tracked
            .iter()
            .map(|key| {
                let axes = match measure(key) {
                    Some(rect) if viewport_height > 0.0 => axes_at(progress(rect, viewport_height)),
                    _ => FontAxes::RESOLVED,
                };
                (*key, axes)
            })
            .collect()
    }
}

/// Handle for a scheduled recomputation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameTicket(u64);

/// At most one pending animation frame; newer requests supersede older ones.
#[derive(Debug, Default)]
pub struct FrameThrottle {
    pending: Option<FrameTicket>,
    issued: u64,
}

impl FrameThrottle {
    /// Schedule a frame. Returns the new ticket and the one it cancelled.
    pub fn request(&mut self) -> (FrameTicket, Option<FrameTicket>) {
        self.issued += 1;
        let ticket = FrameTicket(self.issued);
        (ticket, self.pending.replace(ticket))
    }

    /// Called when a frame callback runs. Only the pending ticket may recompute.
    pub fn fire(&mut self, ticket: FrameTicket) -> bool {
        if self.pending == Some(ticket) {
            self.pending = None;
            true
        } else {
            false
        }
    }

    /// Teardown: forget the pending frame so a late callback is a no-op.
    pub fn cancel(&mut self) -> Option<FrameTicket> {
        self.pending.take()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}
