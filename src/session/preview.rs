// SPDX-License-Identifier: GPL-3.0-only

//! Preview pane geometry
//!
//! The live preview occupies a fixed-extent pane: full screen width by 450
//! points in portrait, 450 points by full screen height in landscape. The
//! same box doubles as the crop target for still captures, so what the user
//! composes is exactly what gets saved.

use crate::constants::preview;

/// Orientation of the application interface
///
/// Distinct from the physical device orientation: the interface only
/// distinguishes the two pane layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InterfaceOrientation {
    #[default]
    Portrait,
    Landscape,
}

/// Geometry of the live preview pane in interface points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreviewLayout {
    pub width: f32,
    pub height: f32,
}

impl PreviewLayout {
    /// Layout for a screen size and interface orientation
    pub fn for_screen(
        screen_width: f32,
        screen_height: f32,
        orientation: InterfaceOrientation,
    ) -> Self {
        match orientation {
            InterfaceOrientation::Portrait => Self {
                width: screen_width,
                height: preview::PANE_EXTENT,
            },
            InterfaceOrientation::Landscape => Self {
                width: preview::PANE_EXTENT,
                height: screen_height,
            },
        }
    }

    /// Crop target for still captures, in whole pixels
    ///
    /// Fractional point sizes round up so the crop never comes out a pixel
    /// short of the pane.
    pub fn crop_target(&self) -> (u32, u32) {
        (
            self.width.ceil().max(1.0) as u32,
            self.height.ceil().max(1.0) as u32,
        )
    }

    /// Rectangle of a source frame aspect-filled into the pane
    ///
    /// Returns `(x, y, width, height)` relative to the pane origin. The
    /// frame is scaled by the smallest factor that covers the pane and
    /// centered, so offsets are zero or negative where it overhangs.
    pub fn fill_rect(&self, source_width: u32, source_height: u32) -> (f32, f32, f32, f32) {
        if source_width == 0 || source_height == 0 {
            return (0.0, 0.0, self.width, self.height);
        }
        let scale = (self.width / source_width as f32).max(self.height / source_height as f32);
        let width = source_width as f32 * scale;
        let height = source_height as f32 * scale;
        ((self.width - width) / 2.0, (self.height - height) / 2.0, width, height)
    }
}

impl Default for PreviewLayout {
    fn default() -> Self {
        Self::for_screen(
            preview::DEFAULT_SCREEN_WIDTH,
            preview::DEFAULT_SCREEN_HEIGHT,
            InterfaceOrientation::Portrait,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_portrait_pane_spans_screen_width() {
        let layout = PreviewLayout::for_screen(390.0, 844.0, InterfaceOrientation::Portrait);
        assert_eq!(layout.width, 390.0);
        assert_eq!(layout.height, preview::PANE_EXTENT);
    }

    #[test]
    fn test_landscape_pane_spans_screen_height() {
        let layout = PreviewLayout::for_screen(844.0, 390.0, InterfaceOrientation::Landscape);
        assert_eq!(layout.width, preview::PANE_EXTENT);
        assert_eq!(layout.height, 390.0);
    }

    #[test]
    fn test_crop_target_rounds_up() {
        let layout = PreviewLayout {
            width: 390.4,
            height: 450.0,
        };
        assert_eq!(layout.crop_target(), (391, 450));
    }

    #[test]
    fn test_fill_rect_covers_and_centers() {
        let layout = PreviewLayout {
            width: 390.0,
            height: 450.0,
        };
        // 4:3 source must overhang horizontally to cover the taller pane
        let (x, y, width, height) = layout.fill_rect(400, 300);
        assert_eq!(height, 450.0);
        assert_eq!(width, 600.0);
        assert_eq!(y, 0.0);
        assert_eq!(x, -105.0);
    }

    #[test]
    fn test_fill_rect_degenerate_source_fills_pane() {
        let layout = PreviewLayout::default();
        let (x, y, width, height) = layout.fill_rect(0, 0);
        assert_eq!((x, y), (0.0, 0.0));
        assert_eq!((width, height), (layout.width, layout.height));
    }
}
