//! Slider appearance: configurable colours and metrics, and the computed
//! visual state a renderer draws from.

use glide_ui_graphics::{Color, DrawPrimitive, GraphicsLayer, Rect, RoundedCornerShape, Size};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SliderColors {
    pub track: Color,
    pub fill: Color,
    pub thumb: Color,
}

impl SliderColors {
    pub fn with_track(mut self, color: Color) -> Self {
        self.track = color;
        self
    }

    pub fn with_fill(mut self, color: Color) -> Self {
        self.fill = color;
        self
    }

    pub fn with_thumb(mut self, color: Color) -> Self {
        self.thumb = color;
        self
    }
}

impl Default for SliderColors {
    fn default() -> Self {
        Self {
            track: Color::from_rgb_u8(0xd4, 0xd4, 0xd8),
            fill: Color::from_rgb_u8(0x3b, 0x82, 0xf6),
            thumb: Color::WHITE,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SliderStyle {
    pub thumb_size: Size,
    /// Height of the drawn track bar, centred in the track element.
    pub track_height: f32,
    /// Thumb scale while a drag is in progress.
    pub dragging_scale: f32,
    /// Alpha multiplier applied to every colour while disabled.
    pub disabled_alpha: f32,
}

impl SliderStyle {
    pub fn with_thumb_size(mut self, size: Size) -> Self {
        self.thumb_size = size;
        self
    }

    pub fn with_track_height(mut self, height: f32) -> Self {
        self.track_height = height;
        self
    }

    pub fn with_dragging_scale(mut self, scale: f32) -> Self {
        self.dragging_scale = scale;
        self
    }

    pub fn with_disabled_alpha(mut self, alpha: f32) -> Self {
        self.disabled_alpha = alpha;
        self
    }
}

impl Default for SliderStyle {
    fn default() -> Self {
        Self {
            thumb_size: Size::new(20.0, 20.0),
            track_height: 4.0,
            dragging_scale: 1.25,
            disabled_alpha: 0.38,
        }
    }
}

/// Everything a renderer needs to draw the slider for one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct SliderVisuals {
    /// Thumb placement along the track, in `[0, 100]`.
    pub percentage: f64,
    pub track: Rect,
    pub fill: Rect,
    pub thumb: Rect,
    pub thumb_layer: GraphicsLayer,
    pub colors: SliderColors,
    pub disabled: bool,
    pub dragging: bool,
}

impl SliderVisuals {
    /// Lays the slider out inside `track_bounds` at `percentage`.
    pub fn compute(
        track_bounds: Rect,
        percentage: f64,
        style: &SliderStyle,
        colors: SliderColors,
        disabled: bool,
        dragging: bool,
    ) -> Self {
        let thumb_size = style.thumb_size;
        let travel = (track_bounds.width - thumb_size.width).max(0.0);
        let center_y = track_bounds.y + track_bounds.height / 2.0;
        let thumb_x = (f64::from(track_bounds.x) + f64::from(travel) * percentage / 100.0) as f32;
        let thumb = Rect::new(
            thumb_x,
            center_y - thumb_size.height / 2.0,
            thumb_size.width,
            thumb_size.height,
        );
        let bar_y = center_y - style.track_height / 2.0;
        let track = Rect::new(track_bounds.x, bar_y, track_bounds.width, style.track_height);
        let fill_width = (thumb.center().x - track_bounds.x).clamp(0.0, track_bounds.width.max(0.0));
        let fill = Rect::new(track_bounds.x, bar_y, fill_width, style.track_height);

        let alpha = if disabled { style.disabled_alpha } else { 1.0 };
        let colors = SliderColors {
            track: colors.track.dimmed(alpha),
            fill: colors.fill.dimmed(alpha),
            thumb: colors.thumb.dimmed(alpha),
        };
        let thumb_layer = GraphicsLayer {
            alpha,
            scale: if dragging { style.dragging_scale } else { 1.0 },
        };

        Self {
            percentage,
            track,
            fill,
            thumb,
            thumb_layer,
            colors,
            disabled,
            dragging,
        }
    }

    /// Thumb rect with the graphics layer's scale applied around its centre.
    pub fn scaled_thumb(&self) -> Rect {
        let scale = self.thumb_layer.scale;
        let width = self.thumb.width * scale;
        let height = self.thumb.height * scale;
        let center = self.thumb.center();
        Rect::new(center.x - width / 2.0, center.y - height / 2.0, width, height)
    }

    /// Back-to-front draw list: track bar, fill, thumb.
    pub fn to_primitives(&self) -> Vec<DrawPrimitive> {
        let pill = RoundedCornerShape::pill();
        let thumb = self.scaled_thumb();
        vec![
            DrawPrimitive::RoundRect {
                rect: self.track,
                color: self.colors.track,
                radii: pill.resolve(self.track.width, self.track.height),
            },
            DrawPrimitive::RoundRect {
                rect: self.fill,
                color: self.colors.fill,
                radii: pill.resolve(self.fill.width, self.fill.height),
            },
            DrawPrimitive::RoundRect {
                rect: thumb,
                color: self.colors.thumb,
                radii: pill.resolve(thumb.width, thumb.height),
            },
        ]
    }
}
