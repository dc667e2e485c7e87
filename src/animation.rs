// ============================================================================
// ANIMATION STATE
// ============================================================================

// Per-appliance animation state and the six procedural drawing routines.
// Every routine works in surface pixels on a fixed-size drawing surface.
// A tick advances the state and emits the frame as a `Scene`; the order
// of the two steps is part of each routine's contract (fan, light and TV
// advance before drawing; air conditioner, speaker and radio draw the
// current state and then advance it).

use std::time::Duration;

use rand::Rng;

use crate::appliance::AnimationFamily;
use crate::color::{brightness_color, Color};
use crate::scene::{DrawCommand, Scene};

const INK: Color = Color::new(0x33, 0x33, 0x33);
const SOCKET: Color = Color::new(0x88, 0x88, 0x88);

pub const FAN_STEP_DEGREES: u32 = 10;
pub const LIGHT_STEP: f64 = 0.05;
pub const LIGHT_MIN: f64 = 0.4;
pub const LIGHT_MAX: f64 = 1.0;
pub const AC_PARTICLE_LIMIT_X: f32 = 60.0;
pub const AC_SPAWN_X: f32 = 25.0;
pub const AC_SPAWN_PROBABILITY: f64 = 0.3;
pub const TV_FRAMES: u32 = 100;
pub const TV_CHANNELS: u8 = 3;
pub const TV_SWITCH_PROBABILITY: f64 = 0.3;
pub const SPEAKER_MAX_RADIUS: u32 = 25;
pub const SPEAKER_SPAWN_RADIUS: u32 = 3;
pub const SPEAKER_SPAWN_PROBABILITY: f64 = 0.2;
pub const RADIO_BARS: usize = 5;
pub const RADIO_MIN_BAR: u8 = 2;
pub const RADIO_MAX_BAR: u8 = 12;
pub const RADIO_CHANGE_PROBABILITY: f64 = 0.7;
pub const PULSE_STEP: f64 = 0.02;
pub const PULSE_MIN: f64 = 0.7;

impl AnimationFamily {
    /// Redraw period while the appliance is running.
    pub fn interval(self) -> Duration {
        Duration::from_millis(match self {
            AnimationFamily::Fan => 50,
            AnimationFamily::Light => 100,
            AnimationFamily::AirConditioner => 70,
            AnimationFamily::Tv => 100,
            AnimationFamily::Speaker => 100,
            AnimationFamily::Radio => 200,
            AnimationFamily::Pulse => 100,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Rising,
    Falling,
}

impl Direction {
    fn sign(self) -> f64 {
        match self {
            Direction::Rising => 1.0,
            Direction::Falling => -1.0,
        }
    }
}

/// Output of one tick.
#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    /// Render onto the appliance's drawing surface.
    Surface(Scene),
    /// Recolour the appliance's button.
    Indicator(Color),
}

#[derive(Debug, Clone, PartialEq)]
pub enum AnimationState {
    Fan(FanState),
    Light(LightState),
    AirConditioner(AcState),
    Tv(TvState),
    Speaker(SpeakerState),
    Radio(RadioState),
    Pulse(PulseState),
}

impl AnimationState {
    pub fn new(family: AnimationFamily) -> Self {
        match family {
            AnimationFamily::Fan => AnimationState::Fan(FanState::default()),
            AnimationFamily::Light => AnimationState::Light(LightState::default()),
            AnimationFamily::AirConditioner => AnimationState::AirConditioner(AcState::default()),
            AnimationFamily::Tv => AnimationState::Tv(TvState::default()),
            AnimationFamily::Speaker => AnimationState::Speaker(SpeakerState::default()),
            AnimationFamily::Radio => AnimationState::Radio(RadioState::default()),
            AnimationFamily::Pulse => AnimationState::Pulse(PulseState::default()),
        }
    }

    pub fn family(&self) -> AnimationFamily {
        match self {
            AnimationState::Fan(_) => AnimationFamily::Fan,
            AnimationState::Light(_) => AnimationFamily::Light,
            AnimationState::AirConditioner(_) => AnimationFamily::AirConditioner,
            AnimationState::Tv(_) => AnimationFamily::Tv,
            AnimationState::Speaker(_) => AnimationFamily::Speaker,
            AnimationState::Radio(_) => AnimationFamily::Radio,
            AnimationState::Pulse(_) => AnimationFamily::Pulse,
        }
    }

    /// Called on every Stopped -> Running transition. State is otherwise
    /// carried over from the previous run.
    pub fn restart(&mut self) {
        match self {
            AnimationState::Light(light) => light.direction = Direction::Rising,
            AnimationState::Pulse(pulse) => pulse.direction = Direction::Rising,
            _ => {}
        }
    }

    /// Advances the state by one frame and returns what to display.
    /// `indicator` is the button's current colour, used by the pulse fallback.
    pub fn tick<R: Rng + ?Sized>(&mut self, rng: &mut R, indicator: Color) -> Frame {
        let mut scene = Scene::new();
        match self {
            AnimationState::Fan(fan) => {
                fan.advance();
                fan.render(&mut scene);
            }
            AnimationState::Light(light) => {
                light.advance();
                light.render(&mut scene);
            }
            AnimationState::AirConditioner(ac) => {
                ac.render(&mut scene);
                ac.advance(rng);
            }
            AnimationState::Tv(tv) => {
                tv.advance(rng);
                tv.render(&mut scene);
            }
            AnimationState::Speaker(speaker) => {
                speaker.render(&mut scene);
                speaker.advance(rng);
            }
            AnimationState::Radio(radio) => {
                radio.render(&mut scene);
                radio.advance(rng);
            }
            AnimationState::Pulse(pulse) => return Frame::Indicator(pulse.advance(indicator)),
        }
        Frame::Surface(scene)
    }
}

// ============================================================================
// FAN
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FanState {
    /// Base blade angle in degrees, always below 360.
    pub angle: u32,
}

impl FanState {
    pub fn advance(&mut self) {
        self.angle = (self.angle + FAN_STEP_DEGREES) % 360;
    }

    pub fn render(&self, scene: &mut Scene) {
        let (cx, cy) = (20.0_f32, 20.0_f32);
        scene.oval(15.0, 15.0, 25.0, 25.0, INK, Some(INK));

        for i in 0..4 {
            let blade = ((self.angle + i * 90) as f32).to_radians();
            let (x1, y1) = (cx + 5.0 * blade.cos(), cy + 5.0 * blade.sin());
            let (x2, y2) = (cx + 18.0 * blade.cos(), cy + 18.0 * blade.sin());
            scene.line(x1, y1, x2, y2, 3.0, INK);

            let tip = blade + 30f32.to_radians();
            let (x3, y3) = (x2 + 5.0 * tip.cos(), y2 + 5.0 * tip.sin());
            scene.line(x2, y2, x3, y3, 3.0, INK);
        }
    }
}

// ============================================================================
// LIGHT BULB
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LightState {
    pub brightness: f64,
    pub direction: Direction,
}

impl LightState {
    /// Ping-pong step. The upper bound clamps; the lower bound only reverses.
    pub fn advance(&mut self) {
        self.brightness += self.direction.sign() * LIGHT_STEP;
        if self.brightness >= LIGHT_MAX {
            self.brightness = LIGHT_MAX;
            self.direction = Direction::Falling;
        } else if self.brightness <= LIGHT_MIN {
            self.direction = Direction::Rising;
        }
    }

    pub fn render(&self, scene: &mut Scene) {
        let bulb = brightness_color(self.brightness);
        let glow = brightness_color(self.brightness * 0.7);

        scene.oval(5.0, 5.0, 25.0, 25.0, glow, None);
        scene.oval(8.0, 8.0, 22.0, 22.0, bulb, Some(INK));
        scene.rect(12.0, 22.0, 18.0, 30.0, SOCKET, Some(INK));
        scene.rect(10.0, 30.0, 20.0, 35.0, SOCKET, Some(INK));
    }
}

// ============================================================================
// AIR CONDITIONER
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub size: f32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AcState {
    /// Wind particles, every one with `x < AC_PARTICLE_LIMIT_X`.
    pub particles: Vec<Particle>,
}

impl AcState {
    pub fn advance<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.particles.retain_mut(|particle| {
            particle.x += 2.0;
            particle.x < AC_PARTICLE_LIMIT_X
        });

        if rng.random_bool(AC_SPAWN_PROBABILITY) {
            for _ in 0..rng.random_range(1..=3) {
                let y = rng.random_range(5..=25) as f32;
                let size = rng.random_range(1.0..=3.0);
                self.particles.push(Particle {
                    x: AC_SPAWN_X,
                    y,
                    size,
                });
            }
        }
    }

    pub fn render(&self, scene: &mut Scene) {
        scene.rect(5.0, 5.0, 20.0, 25.0, Color::new(0xcc, 0xcc, 0xcc), Some(INK));
        for y in (8..23).step_by(5) {
            scene.line(20.0, y as f32, 25.0, y as f32, 1.0, INK);
        }

        let wind = Color::new(0xad, 0xd8, 0xe6);
        for p in &self.particles {
            scene.oval(p.x, p.y, p.x + p.size, p.y + p.size, wind, None);
        }
    }
}

// ============================================================================
// TV
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TvState {
    /// 0 = news, 1 = cartoon, 2 = sports.
    pub channel: u8,
    /// Frame counter in `0..TV_FRAMES`.
    pub frame: u32,
}

impl TvState {
    pub fn advance<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.frame = (self.frame + 1) % TV_FRAMES;
        if self.frame == 0 && rng.random_bool(TV_SWITCH_PROBABILITY) {
            self.channel = (self.channel + 1) % TV_CHANNELS;
        }
    }

    pub fn render(&self, scene: &mut Scene) {
        scene.add_command(DrawCommand::Rect {
            x0: 5.0,
            y0: 5.0,
            x1: 45.0,
            y1: 35.0,
            fill: Some(Color::new(0x22, 0x22, 0x22)),
            outline: Some(Color::BLACK),
            width: 2.0,
        });

        let frame = self.frame;
        match self.channel {
            0 => {
                scene.rect(8.0, 8.0, 42.0, 15.0, Color::new(0xff, 0x00, 0x00), None);
                scene.add_command(DrawCommand::Text {
                    x: 42.0 - (frame % 50) as f32,
                    y: 12.0,
                    text: "NEWS".to_string(),
                    font_size: 7.0,
                    color: Color::WHITE,
                });
                scene.rect(8.0, 16.0, 42.0, 32.0, Color::new(0xdd, 0xdd, 0xdd), None);
                for i in 0..3 {
                    let y = (20 + i * 4) as f32;
                    scene.line(10.0, y, 40.0, y, 1.0, Color::new(0x55, 0x55, 0x55));
                }
            }
            1 => {
                if frame % 20 < 10 {
                    scene.rect(8.0, 8.0, 42.0, 32.0, Color::new(0x00, 0x00, 0xff), None);
                    scene.oval(15.0, 15.0, 25.0, 25.0, Color::new(0xff, 0xff, 0x00), None);
                } else {
                    scene.rect(8.0, 8.0, 42.0, 32.0, Color::new(0x00, 0x88, 0x00), None);
                    scene.rect(25.0, 15.0, 35.0, 25.0, Color::new(0xff, 0x00, 0x00), None);
                }
            }
            _ => {
                scene.rect(8.0, 8.0, 42.0, 32.0, Color::new(0x00, 0xaa, 0x00), None);
                let (x, y) = ball_position(frame);
                scene.oval(x - 3.0, y - 3.0, x + 3.0, y + 3.0, Color::WHITE, None);
            }
        }

        scene.rect(20.0, 35.0, 30.0, 38.0, Color::new(0x44, 0x44, 0x44), Some(Color::BLACK));
    }
}

/// Ball centre on the sports channel.
pub fn ball_position(frame: u32) -> (f32, f32) {
    let t = frame as f32;
    (25.0 + 15.0 * (0.2 * t).cos(), 20.0 + 8.0 * (0.3 * t).sin())
}

// ============================================================================
// SPEAKER
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpeakerState {
    /// Radii of the expanding sound waves, oldest first.
    pub waves: Vec<u32>,
}

impl SpeakerState {
    pub fn advance<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.waves.retain(|radius| *radius < SPEAKER_MAX_RADIUS);
        for radius in &mut self.waves {
            *radius += 1;
        }
        if rng.random_bool(SPEAKER_SPAWN_PROBABILITY) || self.waves.is_empty() {
            self.waves.push(SPEAKER_SPAWN_RADIUS);
        }
    }

    pub fn render(&self, scene: &mut Scene) {
        scene.rect(5.0, 10.0, 15.0, 30.0, INK, Some(Color::new(0x22, 0x22, 0x22)));
        scene.oval(
            8.0,
            15.0,
            12.0,
            25.0,
            Color::new(0x66, 0x66, 0x66),
            Some(Color::new(0x44, 0x44, 0x44)),
        );

        for radius in &self.waves {
            let r = *radius as f32;
            scene.add_command(DrawCommand::Arc {
                cx: 10.0 + r,
                cy: 20.0,
                radius: r,
                start: 270.0,
                extent: 180.0,
                width: 2.0,
                color: INK,
            });
        }
    }
}

// ============================================================================
// RADIO
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RadioState {
    /// Equaliser bar heights; `None` until the first frame has advanced.
    pub bars: Option<[u8; RADIO_BARS]>,
}

impl RadioState {
    pub fn advance<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let previous = self.bars;
        let mut bars = [0; RADIO_BARS];
        for (i, bar) in bars.iter_mut().enumerate() {
            *bar = if rng.random_bool(RADIO_CHANGE_PROBABILITY) {
                rng.random_range(RADIO_MIN_BAR..=RADIO_MAX_BAR)
            } else {
                match previous {
                    Some(previous) => previous[i],
                    None => rng.random_range(RADIO_MIN_BAR..=RADIO_MAX_BAR),
                }
            };
        }
        self.bars = Some(bars);
    }

    pub fn render(&self, scene: &mut Scene) {
        scene.add_command(DrawCommand::Rect {
            x0: 5.0,
            y0: 10.0,
            x1: 35.0,
            y1: 30.0,
            fill: Some(Color::new(0x88, 0x44, 0x00)),
            outline: Some(Color::new(0x66, 0x33, 0x00)),
            width: 2.0,
        });
        scene.oval(10.0, 15.0, 18.0, 23.0, Color::new(0xcc, 0xcc, 0xcc), Some(INK));
        scene.line(14.0, 19.0, 17.0, 19.0, 1.0, INK);
        scene.rect(
            20.0,
            13.0,
            32.0,
            27.0,
            Color::new(0x22, 0x22, 0x22),
            Some(Color::new(0x11, 0x11, 0x11)),
        );

        let bar_width = 2.0;
        for (i, height) in self.bars.unwrap_or_default().iter().enumerate() {
            let x = 21.0 + i as f32 * (bar_width + 1.0);
            scene.rect(
                x,
                26.0 - *height as f32,
                x + bar_width,
                26.0,
                Color::new(0x00, 0xff, 0x00),
                None,
            );
        }
    }
}

// ============================================================================
// GENERIC PULSE
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PulseState {
    pub direction: Direction,
}

impl PulseState {
    /// Moves the HSV value of `current` one step, bouncing between
    /// `PULSE_MIN` and 1.0.
    pub fn advance(&mut self, current: Color) -> Color {
        let (h, s, mut v) = current.to_hsv();
        v += self.direction.sign() * PULSE_STEP;
        if v >= 1.0 {
            v = 1.0;
            self.direction = Direction::Falling;
        } else if v <= PULSE_MIN {
            v = PULSE_MIN;
            self.direction = Direction::Rising;
        }
        Color::from_hsv(h, s, v)
    }
}
