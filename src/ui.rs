// ============================================================================
// PANEL LAYOUT & CHROME
// ============================================================================

use std::time::Instant;

use rusttype::{Font, Scale};

use crate::appliance::Appliance;
use crate::canvas::Canvas;
use crate::color::Color;
use crate::config::PanelConfig;
use crate::controller::Controller;

const MARGIN: i32 = 20;
const SECTION_HEADER: i32 = 30;
const ROW_HEIGHT: i32 = 85;
const BUTTON_WIDTH: i32 = 80;
const BUTTON_HEIGHT: i32 = 32;
const STATUS_HEIGHT: i32 = 26;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.x + self.w && y >= self.y && y < self.y + self.h
    }

    fn corners(&self) -> (f32, f32, f32, f32) {
        (
            self.x as f32,
            self.y as f32,
            (self.x + self.w) as f32,
            (self.y + self.h) as f32,
        )
    }

    fn center(&self) -> (i32, i32) {
        (self.x + self.w / 2, self.y + self.h / 2)
    }
}

/// Grouping of the appliances on the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Lighting,
    Climate,
    Entertainment,
}

impl Section {
    pub fn title(self) -> &'static str {
        match self {
            Section::Lighting => "Lighting Control",
            Section::Climate => "Climate Control",
            Section::Entertainment => "Entertainment",
        }
    }

    pub fn members(self) -> [Appliance; 3] {
        match self {
            Section::Lighting => [
                Appliance::LivingRoomLight,
                Appliance::BedroomLight,
                Appliance::KitchenLight,
            ],
            Section::Climate => [
                Appliance::LivingRoomFan,
                Appliance::BedroomFan,
                Appliance::AirConditioner,
            ],
            Section::Entertainment => [Appliance::Tv, Appliance::Speaker, Appliance::Radio],
        }
    }
}

#[derive(Debug, Clone)]
pub struct RowLayout {
    pub appliance: Appliance,
    /// Left edge and vertical centre of the name label.
    pub label: (i32, i32),
    pub button: Rect,
    /// Top-left corner of the blitted drawing surface.
    pub surface: (i32, i32),
}

#[derive(Debug, Clone)]
pub struct SectionLayout {
    pub section: Section,
    pub frame: Rect,
}

/// What a click or key press acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Toggle(Appliance),
    Save,
}

/// Fixed positions of every panel element in window pixels.
#[derive(Debug, Clone)]
pub struct Layout {
    pub width: i32,
    pub height: i32,
    pub heading: (i32, i32),
    pub sections: Vec<SectionLayout>,
    pub rows: Vec<RowLayout>,
    pub save_button: Rect,
    pub status_bar: Rect,
}

impl Layout {
    pub fn new(config: &PanelConfig) -> Self {
        let width = config.window_width as i32;
        let height = config.window_height as i32;
        let half = (width - 3 * MARGIN) / 2;
        let top = 60;

        let mut sections = Vec::new();
        let mut rows = Vec::new();

        // Lighting and climate side by side, one appliance per row.
        for (column, section) in [Section::Lighting, Section::Climate].into_iter().enumerate() {
            let frame = Rect::new(
                MARGIN + column as i32 * (half + MARGIN),
                top,
                half,
                SECTION_HEADER + 3 * ROW_HEIGHT,
            );
            for (i, appliance) in section.members().into_iter().enumerate() {
                let row_top = frame.y + SECTION_HEADER + i as i32 * ROW_HEIGHT;
                let centre = row_top + ROW_HEIGHT / 2;
                rows.push(RowLayout {
                    appliance,
                    label: (frame.x + 12, centre),
                    button: Rect::new(
                        frame.x + 160,
                        centre - BUTTON_HEIGHT / 2,
                        BUTTON_WIDTH,
                        BUTTON_HEIGHT,
                    ),
                    surface: (frame.x + 160 + BUTTON_WIDTH + 6, row_top + 2),
                });
            }
            sections.push(SectionLayout { section, frame });
        }

        // Entertainment spans the full width, one appliance per column.
        let frame = Rect::new(
            MARGIN,
            top + SECTION_HEADER + 3 * ROW_HEIGHT + MARGIN / 2,
            width - 2 * MARGIN,
            SECTION_HEADER + 24 + ROW_HEIGHT,
        );
        let column_width = frame.w / 3;
        for (i, appliance) in Section::Entertainment.members().into_iter().enumerate() {
            let x = frame.x + i as i32 * column_width;
            let cell_top = frame.y + SECTION_HEADER;
            let button = Rect::new(x + 12, cell_top + 36, BUTTON_WIDTH, BUTTON_HEIGHT);
            rows.push(RowLayout {
                appliance,
                label: (x + 12, cell_top + 12),
                button,
                surface: (button.x + BUTTON_WIDTH + 12, cell_top + 24),
            });
        }
        sections.push(SectionLayout {
            section: Section::Entertainment,
            frame,
        });

        let status_bar = Rect::new(0, height - STATUS_HEIGHT, width, STATUS_HEIGHT);
        let save_button = Rect::new(
            width - MARGIN - 170,
            status_bar.y - 12 - 34,
            170,
            34,
        );

        Self {
            width,
            height,
            heading: (width / 2, top / 2),
            sections,
            rows,
            save_button,
            status_bar,
        }
    }

    pub fn row(&self, appliance: Appliance) -> Option<&RowLayout> {
        self.rows.iter().find(|row| row.appliance == appliance)
    }

    pub fn hit(&self, x: i32, y: i32) -> Option<Target> {
        if self.save_button.contains(x, y) {
            return Some(Target::Save);
        }
        self.rows
            .iter()
            .find(|row| row.button.contains(x, y))
            .map(|row| Target::Toggle(row.appliance))
    }
}

/// Keyboard shortcut: `1`-`9` toggle appliances in panel order, `s` saves.
pub fn key_target(key: &str) -> Option<Target> {
    match key {
        "s" | "S" => Some(Target::Save),
        _ => {
            let digit: usize = key.parse().ok()?;
            let appliance = Appliance::all().nth(digit.checked_sub(1)?)?;
            Some(Target::Toggle(appliance))
        }
    }
}

pub fn dispatch(controller: &mut Controller, target: Target, now: Instant) {
    match target {
        Target::Toggle(appliance) => {
            controller.toggle(appliance, now);
        }
        Target::Save => controller.save_and_report(),
    }
}

/// Button fill: the pulse colour while pulsing, otherwise on/off colours.
pub fn button_color(controller: &Controller, appliance: Appliance, config: &PanelConfig) -> Color {
    if controller.is_on(appliance) {
        controller
            .engine()
            .indicator(appliance)
            .unwrap_or(config.on_color)
    } else {
        config.off_color
    }
}

pub fn render_panel(
    canvas: &mut Canvas,
    layout: &Layout,
    controller: &Controller,
    config: &PanelConfig,
    font: Option<&Font>,
) {
    canvas.clear(config.background_color);
    let text = config.text_color;
    let outline = Color::new(0x55, 0x55, 0x55);

    if let Some(font) = font {
        let (x, y) = layout.heading;
        canvas.text(x, y, &config.heading, font, Scale::uniform(config.heading_font_size), text);
    }

    for section in &layout.sections {
        let (x0, y0, x1, y1) = section.frame.corners();
        canvas.stroke_rect(x0, y0 + 10.0, x1, y1, 1.0, config.frame_color);
        if let Some(font) = font {
            let scale = Scale::uniform(config.label_font_size);
            let title = section.section.title();
            let title_x = section.frame.x + 12;
            let title_w = crate::canvas::text_width(title, font, scale);
            canvas.fill_rect(
                (title_x - 4) as f32,
                y0,
                (title_x + title_w + 4) as f32,
                y0 + 20.0,
                config.background_color,
            );
            canvas.text_left(title_x, section.frame.y + 10, title, font, scale, text);
        }
    }

    for row in &layout.rows {
        let on = controller.is_on(row.appliance);
        let (x0, y0, x1, y1) = row.button.corners();
        canvas.fill_rect(x0, y0, x1, y1, button_color(controller, row.appliance, config));
        canvas.stroke_rect(x0, y0, x1, y1, 1.0, outline);

        if let Some(font) = font {
            let scale = Scale::uniform(config.label_font_size);
            let (lx, ly) = row.label;
            canvas.text_left(lx, ly, &format!("{}:", row.appliance), font, scale, text);
            let (bx, by) = row.button.center();
            canvas.text(bx, by, if on { "ON" } else { "OFF" }, font, scale, text);
        }

        let (sx, sy) = row.surface;
        canvas.blit(
            controller.engine().surface(row.appliance),
            sx,
            sy,
            config.canvas_scale,
        );
    }

    let (x0, y0, x1, y1) = layout.save_button.corners();
    canvas.fill_rect(x0, y0, x1, y1, Color::new(0xdd, 0xdd, 0xdd));
    canvas.stroke_rect(x0, y0, x1, y1, 1.0, outline);

    let (x0, y0, x1, y1) = layout.status_bar.corners();
    canvas.fill_rect(x0, y0, x1, y1, Color::new(0xe4, 0xe4, 0xe4));
    canvas.line(x0, y0, x1, y0, 1.0, outline);

    if let Some(font) = font {
        let (bx, by) = layout.save_button.center();
        let scale = Scale::uniform(config.label_font_size);
        canvas.text(bx, by, "Save Configuration", font, scale, text);

        let (_, sy) = layout.status_bar.center();
        let scale = Scale::uniform(config.status_font_size);
        canvas.text_left(8, sy, controller.status().current(), font, scale, text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_appliance_has_one_row() {
        let layout = Layout::new(&PanelConfig::default());
        assert_eq!(layout.rows.len(), 9);
        for appliance in Appliance::all() {
            assert!(layout.row(appliance).is_some(), "{appliance} missing");
        }
    }

    #[test]
    fn elements_fit_in_window() {
        let config = PanelConfig::default();
        let layout = Layout::new(&config);
        let scale = config.canvas_scale as i32;
        for row in &layout.rows {
            let (w, h) = row.appliance.surface_size();
            let (sx, sy) = row.surface;
            assert!(sx + w as i32 * scale <= layout.width, "{}", row.appliance);
            assert!(sy + h as i32 * scale <= layout.save_button.y, "{}", row.appliance);
        }
        assert!(layout.save_button.y + layout.save_button.h <= layout.status_bar.y);
    }

    #[test]
    fn surfaces_stay_inside_their_section() {
        let config = PanelConfig::default();
        let layout = Layout::new(&config);
        let scale = config.canvas_scale as i32;
        for section in &layout.sections {
            let frame = section.frame;
            for appliance in section.section.members() {
                let row = layout.row(appliance).unwrap();
                let (w, h) = appliance.surface_size();
                let (sx, sy) = row.surface;
                assert!(sx > frame.x && sy > frame.y, "{appliance}");
                assert!(sx + w as i32 * scale < frame.x + frame.w, "{appliance}");
                assert!(sy + h as i32 * scale <= frame.y + frame.h, "{appliance}");
                assert!(row.button.x + row.button.w < sx, "{appliance}");
            }
        }
    }

    #[test]
    fn buttons_do_not_overlap() {
        let layout = Layout::new(&PanelConfig::default());
        for (i, a) in layout.rows.iter().enumerate() {
            for b in &layout.rows[i + 1..] {
                let (x, y) = a.button.center();
                assert!(!b.button.contains(x, y));
            }
            assert!(!layout.save_button.contains(a.button.x, a.button.y));
        }
    }

    #[test]
    fn clicks_map_to_targets() {
        let layout = Layout::new(&PanelConfig::default());
        let (x, y) = layout.row(Appliance::Radio).unwrap().button.center();
        assert_eq!(layout.hit(x, y), Some(Target::Toggle(Appliance::Radio)));

        let (x, y) = layout.save_button.center();
        assert_eq!(layout.hit(x, y), Some(Target::Save));
        assert_eq!(layout.hit(0, 0), None);
    }

    #[test]
    fn number_keys_follow_panel_order() {
        assert_eq!(key_target("1"), Some(Target::Toggle(Appliance::LivingRoomLight)));
        assert_eq!(key_target("7"), Some(Target::Toggle(Appliance::Tv)));
        assert_eq!(key_target("9"), Some(Target::Toggle(Appliance::Radio)));
        assert_eq!(key_target("s"), Some(Target::Save));
        assert_eq!(key_target("0"), None);
        assert_eq!(key_target("x"), None);
    }
}
