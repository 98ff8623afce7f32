// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Panorama-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Panorama and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::view::{Pan, View};

pub const MIN_ZOOM: f64 = 0.1;
pub const MAX_ZOOM: f64 = 10.0;

/// The live camera of the hosting canvas.
///
/// Screen coordinates relate to diagram coordinates as `screen = diagram * zoom + pan`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    zoom: f64,
    pan: Pan,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            pan: Pan::default(),
        }
    }
}

/// Zoom limited to `[MIN_ZOOM, MAX_ZOOM]`; values that are not finite and positive become 1.
pub fn clamp_zoom(zoom: f64) -> f64 {
    if zoom.is_finite() && zoom > 0.0 {
        zoom.clamp(MIN_ZOOM, MAX_ZOOM)
    } else {
        1.0
    }
}

impl Viewport {
    pub fn new(zoom: f64, pan: Pan) -> Self {
        Self {
            zoom: clamp_zoom(zoom),
            pan,
        }
    }

    /// Camera showing exactly what `view` stored. Out-of-range zoom is kept as stored so the
    /// viewport compares equal to the view; only unusable values fall back to 1.
    pub fn of_view(view: &View) -> Self {
        let zoom = view.zoom();
        Self {
            zoom: if zoom.is_finite() && zoom > 0.0 { zoom } else { 1.0 },
            pan: view.pan(),
        }
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn pan(&self) -> Pan {
        self.pan
    }

    /// Scales by `factor` while keeping the diagram point under `cursor` fixed on screen.
    ///
    /// Factors that are not finite and positive are ignored. The resulting zoom is clamped to
    /// `[MIN_ZOOM, MAX_ZOOM]`, and the pan is derived from the clamped zoom.
    pub fn zoom_at(&mut self, factor: f64, cursor: Pan) {
        if !factor.is_finite() || factor <= 0.0 {
            return;
        }
        let next_zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        let ratio = next_zoom / self.zoom;
        self.pan = Pan::new(
            cursor.x - (cursor.x - self.pan.x) * ratio,
            cursor.y - (cursor.y - self.pan.y) * ratio,
        );
        self.zoom = next_zoom;
    }

    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.pan = Pan::new(self.pan.x + dx, self.pan.y + dy);
    }

    /// Difference between this viewport and a saved view.
    pub fn delta_from(&self, view: &View) -> ViewportDelta {
        let zoom_ratio = if view.zoom() > 0.0 {
            self.zoom / view.zoom()
        } else {
            1.0
        };
        ViewportDelta {
            zoom_ratio,
            pan_dx: self.pan.x - view.pan().x,
            pan_dy: self.pan.y - view.pan().y,
        }
    }
}

/// "Current vs saved" readout between the live viewport and a view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportDelta {
    pub zoom_ratio: f64,
    pub pan_dx: f64,
    pub pan_dy: f64,
}

impl ViewportDelta {
    pub fn is_identity(&self) -> bool {
        (self.zoom_ratio - 1.0).abs() < 1e-9 && self.pan_dx.abs() < 1e-9 && self.pan_dy.abs() < 1e-9
    }
}
