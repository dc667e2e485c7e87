// ============================================================================
// RETAINED MODE ABSTRACTIONS
// ============================================================================

use crate::canvas::Canvas;
use crate::color::Color;
use rusttype::{Font, Scale};

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Rect {
        x0: f32,
        y0: f32,
        x1: f32,
        y1: f32,
        fill: Option<Color>,
        outline: Option<Color>,
        width: f32,
    },
    Oval {
        x0: f32,
        y0: f32,
        x1: f32,
        y1: f32,
        fill: Option<Color>,
        outline: Option<Color>,
    },
    Line {
        x0: f32,
        y0: f32,
        x1: f32,
        y1: f32,
        width: f32,
        color: Color,
    },
    Arc {
        cx: f32,
        cy: f32,
        radius: f32,
        start: f32,
        extent: f32,
        width: f32,
        color: Color,
    },
    Text {
        x: f32,
        y: f32,
        text: String,
        font_size: f32,
        color: Color,
    },
}

/// Ordered list of draw commands making up one frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scene {
    commands: Vec<DrawCommand>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn add_command(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    pub fn rect(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, fill: Color, outline: Option<Color>) {
        self.add_command(DrawCommand::Rect {
            x0,
            y0,
            x1,
            y1,
            fill: Some(fill),
            outline,
            width: 1.0,
        });
    }

    pub fn oval(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, fill: Color, outline: Option<Color>) {
        self.add_command(DrawCommand::Oval {
            x0,
            y0,
            x1,
            y1,
            fill: Some(fill),
            outline,
        });
    }

    pub fn line(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, width: f32, color: Color) {
        self.add_command(DrawCommand::Line {
            x0,
            y0,
            x1,
            y1,
            width,
            color,
        });
    }

    /// Rasterises every command in order. Text is skipped without a font.
    pub fn render(&self, canvas: &mut Canvas, font: Option<&Font>) {
        for command in &self.commands {
            match command {
                DrawCommand::Rect {
                    x0,
                    y0,
                    x1,
                    y1,
                    fill,
                    outline,
                    width,
                } => {
                    if let Some(fill) = fill {
                        canvas.fill_rect(*x0, *y0, *x1, *y1, *fill);
                    }
                    if let Some(outline) = outline {
                        canvas.stroke_rect(*x0, *y0, *x1, *y1, *width, *outline);
                    }
                }
                DrawCommand::Oval {
                    x0,
                    y0,
                    x1,
                    y1,
                    fill,
                    outline,
                } => {
                    if let Some(fill) = fill {
                        canvas.fill_ellipse(*x0, *y0, *x1, *y1, *fill);
                    }
                    if let Some(outline) = outline {
                        canvas.stroke_ellipse(*x0, *y0, *x1, *y1, 1.0, *outline);
                    }
                }
                DrawCommand::Line {
                    x0,
                    y0,
                    x1,
                    y1,
                    width,
                    color,
                } => canvas.line(*x0, *y0, *x1, *y1, *width, *color),
                DrawCommand::Arc {
                    cx,
                    cy,
                    radius,
                    start,
                    extent,
                    width,
                    color,
                } => canvas.arc(*cx, *cy, *radius, *start, *extent, *width, *color),
                DrawCommand::Text {
                    x,
                    y,
                    text,
                    font_size,
                    color,
                } => {
                    if let Some(font) = font {
                        canvas.text(
                            x.round() as i32,
                            y.round() as i32,
                            text,
                            font,
                            Scale::uniform(*font_size),
                            *color,
                        );
                    }
                }
            }
        }
    }
}
