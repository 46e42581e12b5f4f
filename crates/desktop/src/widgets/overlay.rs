use iced::mouse;
use iced::widget::canvas::{self, Frame, Geometry, Path, Stroke};
use iced::{Color, Point, Rectangle, Renderer, Size, Theme};

use facedeck_core::overlay::annotation::{
    BoxAnnotation, ACCENT_STROKE, LABEL_FONT_SIZE, LABEL_PADDING, LABEL_RADIUS, OUTLINE_RADIUS,
    OUTLINE_STROKE,
};
use facedeck_core::overlay::fit::FitTransform;

use crate::theme::{known_face_color, unknown_face_color};

/// Canvas layer stacked over the video image. Annotations are in frame
/// pixels; the same contain-fit the image widget applies maps them onto
/// the canvas.
pub struct DetectionOverlay {
    pub annotations: Vec<BoxAnnotation>,
    pub frame_size: (u32, u32),
}

impl<Message> canvas::Program<Message> for DetectionOverlay {
    type State = ();

    fn draw(
        &self,
        _state: &(),
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());

        let source = (self.frame_size.0 as f32, self.frame_size.1 as f32);
        if let Some(fit) = FitTransform::contain(source, (bounds.width, bounds.height)) {
            for annotation in &self.annotations {
                draw_annotation(&mut frame, &fit, annotation);
            }
        }

        vec![frame.into_geometry()]
    }
}

fn draw_annotation(frame: &mut Frame, fit: &FitTransform, annotation: &BoxAnnotation) {
    let color = if annotation.known {
        known_face_color()
    } else {
        unknown_face_color()
    };

    let (x, y) = fit.apply(annotation.x, annotation.y);
    let width = fit.length(annotation.width);
    let height = fit.length(annotation.height);

    let radius: iced::border::Radius = fit.length(OUTLINE_RADIUS).into();
    let outline = Path::rounded_rectangle(Point::new(x, y), Size::new(width, height), radius);
    frame.stroke(
        &outline,
        Stroke::default()
            .with_color(color)
            .with_width(fit.length(OUTLINE_STROKE).max(1.0)),
    );

    draw_corner_accents(
        frame,
        color,
        Rectangle::new(Point::new(x, y), Size::new(width, height)),
        fit.length(annotation.corner_len),
        fit.length(ACCENT_STROKE).max(1.0),
    );

    draw_label(frame, fit, annotation, color);
}

/// Short L-shaped strokes on all four corners, drawn thicker than the
/// outline itself.
fn draw_corner_accents(frame: &mut Frame, color: Color, rect: Rectangle, len: f32, width: f32) {
    let corners = [
        (Point::new(rect.x, rect.y), 1.0, 1.0),
        (Point::new(rect.x + rect.width, rect.y), -1.0, 1.0),
        (
            Point::new(rect.x + rect.width, rect.y + rect.height),
            -1.0,
            -1.0,
        ),
        (Point::new(rect.x, rect.y + rect.height), 1.0, -1.0),
    ];

    for (corner, dx, dy) in corners {
        let accent = Path::new(|builder| {
            builder.move_to(Point::new(corner.x + dx * len, corner.y));
            builder.line_to(corner);
            builder.line_to(Point::new(corner.x, corner.y + dy * len));
        });
        frame.stroke(&accent, Stroke::default().with_color(color).with_width(width));
    }
}

fn draw_label(frame: &mut Frame, fit: &FitTransform, annotation: &BoxAnnotation, color: Color) {
    let pill = &annotation.label;
    let (x, y) = fit.apply(pill.x, pill.y);
    let width = fit.length(pill.width);
    let height = fit.length(pill.height);

    let radius: iced::border::Radius = fit.length(LABEL_RADIUS).into();
    let background = Path::rounded_rectangle(Point::new(x, y), Size::new(width, height), radius);
    frame.fill(&background, color);

    let font_size = fit.length(LABEL_FONT_SIZE).max(9.0);
    frame.fill_text(canvas::Text {
        content: pill.text.clone(),
        position: Point::new(
            x + fit.length(LABEL_PADDING),
            y + (height - font_size * 1.2) / 2.0,
        ),
        color: Color::WHITE,
        size: font_size.into(),
        font: iced::Font {
            weight: iced::font::Weight::Semibold,
            ..iced::Font::DEFAULT
        },
        ..canvas::Text::default()
    });
}
