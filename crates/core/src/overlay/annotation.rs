use crate::shared::detection::DetectionResult;

/// Corner radius of the face outline.
pub const OUTLINE_RADIUS: f32 = 8.0;
/// Stroke width of the face outline.
pub const OUTLINE_STROKE: f32 = 2.5;
/// Stroke width of the four corner accents.
pub const ACCENT_STROKE: f32 = 3.5;
/// Corner accents never exceed this length, nor 15% of either box side.
pub const ACCENT_MAX_LEN: f32 = 20.0;
/// Height of the label pill above the box.
pub const LABEL_HEIGHT: f32 = 26.0;
/// Corner radius of the label pill.
pub const LABEL_RADIUS: f32 = 6.0;
/// Horizontal inset between pill edge and label text (each side).
pub const LABEL_PADDING: f32 = 8.0;
/// Gap between the pill bottom and the box top.
pub const LABEL_GAP: f32 = 4.0;
/// Label text size.
pub const LABEL_FONT_SIZE: f32 = 14.0;

/// Caption pill geometry, in source pixel space like everything else here.
#[derive(Clone, Debug, PartialEq)]
pub struct LabelPill {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub text: String,
}

/// Everything the canvas needs to draw one detection: rounded outline,
/// corner accent length, and the caption pill. All coordinates are in the
/// source frame's native resolution; the renderer maps them through a
/// [`FitTransform`](crate::overlay::fit::FitTransform) at draw time.
#[derive(Clone, Debug, PartialEq)]
pub struct BoxAnnotation {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub corner_len: f32,
    pub known: bool,
    pub label: LabelPill,
}

/// Build draw geometry for a result set, preserving its order.
pub fn annotate(results: &[DetectionResult]) -> Vec<BoxAnnotation> {
    results.iter().map(annotate_one).collect()
}

fn annotate_one(result: &DetectionResult) -> BoxAnnotation {
    let x = result.bbox[0];
    let y = result.bbox[1];
    let width = result.width();
    let height = result.height();

    let text = result.label();
    let label = LabelPill {
        x,
        y: y - LABEL_HEIGHT - LABEL_GAP,
        width: estimate_text_width(&text, LABEL_FONT_SIZE) + 2.0 * LABEL_PADDING,
        height: LABEL_HEIGHT,
        text,
    };

    BoxAnnotation {
        x,
        y,
        width,
        height,
        corner_len: ACCENT_MAX_LEN.min(0.15 * width).min(0.15 * height),
        known: result.is_known(),
        label,
    }
}

/// Rough advance-width estimate; there is no text measurement on this side
/// of the renderer, and the pill only has to fit the caption comfortably.
fn estimate_text_width(text: &str, size: f32) -> f32 {
    text.chars()
        .map(|c| if c.is_ascii() { size * 0.58 } else { size })
        .sum()
}
