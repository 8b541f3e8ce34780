//! Paint command list shared by the SVG and PNG encoders

use crate::layout::{DotKind, RenderModel};

pub type Rgba = (u8, u8, u8, u8);

/// Cross stroke width relative to its span.
pub const CROSS_STROKE_RATIO: f64 = 0.2;
/// Label baseline offset below the card, as a fraction of canvas height.
pub const LABEL_OFFSET_RATIO: f64 = 0.05;
/// Label font size as a fraction of canvas width.
pub const LABEL_FONT_RATIO: f64 = 0.045;

/// Colors for one visual style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub name: &'static str,
    pub background: Rgba,
    pub card: Rgba,
    pub past: Rgba,
    pub future: Rgba,
    pub today: Rgba,
    pub text: Rgba,
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            name: "dark",
            background: (0, 0, 0, 255),
            card: (28, 28, 30, 255),
            past: (142, 142, 147, 255),
            future: (72, 72, 74, 255),
            today: (255, 159, 10, 255),
            text: (235, 235, 245, 255),
        }
    }

    pub fn light() -> Self {
        Self {
            name: "light",
            background: (242, 242, 247, 255),
            card: (255, 255, 255, 255),
            past: (99, 99, 102, 255),
            future: (209, 209, 214, 255),
            today: (255, 59, 48, 255),
            text: (28, 28, 30, 255),
        }
    }

    pub fn by_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "dark" => Some(Self::dark()),
            "light" => Some(Self::light()),
            _ => None,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PaintCommand {
    Fill {
        rgba: Rgba,
    },
    RoundedRect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        radius: f64,
        rgba: Rgba,
    },
    Circle {
        cx: f64,
        cy: f64,
        radius: f64,
        rgba: Rgba,
    },
    /// Two diagonal strokes spanning `size`, centered on `(cx, cy)`
    Cross {
        cx: f64,
        cy: f64,
        size: f64,
        stroke: f64,
        rgba: Rgba,
    },
    /// Horizontally centered on `x`, baseline at `y`
    Text {
        x: f64,
        y: f64,
        size: f64,
        text: String,
        rgba: Rgba,
    },
}

/// Lower a render model to paint commands, back to front.
pub fn paint_commands(model: &RenderModel, theme: &Theme, with_label: bool) -> Vec<PaintCommand> {
    let g = &model.geometry;
    let mut cmds = Vec::with_capacity(model.drawables.len() + 3);

    cmds.push(PaintCommand::Fill { rgba: theme.background });
    cmds.push(PaintCommand::RoundedRect {
        x: g.card_left,
        y: g.card_top,
        width: g.card_w,
        height: g.card_h,
        radius: g.border_radius,
        rgba: theme.card,
    });

    for d in &model.drawables {
        let cmd = match d.kind {
            DotKind::Past => PaintCommand::Cross {
                cx: d.center_x,
                cy: d.center_y,
                size: d.size,
                stroke: d.size * CROSS_STROKE_RATIO,
                rgba: theme.past,
            },
            DotKind::Today => PaintCommand::Circle {
                cx: d.center_x,
                cy: d.center_y,
                radius: d.size / 2.0,
                rgba: theme.today,
            },
            DotKind::Future => PaintCommand::Circle {
                cx: d.center_x,
                cy: d.center_y,
                radius: d.size / 2.0,
                rgba: theme.future,
            },
        };
        cmds.push(cmd);
    }

    if with_label {
        cmds.push(PaintCommand::Text {
            x: g.canvas_w / 2.0,
            y: g.card_top + g.card_h + g.canvas_h * LABEL_OFFSET_RATIO,
            size: g.canvas_w * LABEL_FONT_RATIO,
            text: model.label.text(),
            rgba: theme.text,
        });
    }

    cmds
}
