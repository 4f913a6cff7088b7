use std::ops::{Add, AddAssign, Div, Mul, Sub};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Unit vector pointing along `angle` (radians).
    pub fn from_angle(angle: f32) -> Self {
        Self::new(angle.cos(), angle.sin())
    }

    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;

    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

impl Mul<Vec2> for f32 {
    type Output = Vec2;

    fn mul(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self * rhs.x, self * rhs.y)
    }
}

impl Div<f32> for Vec2 {
    type Output = Vec2;

    fn div(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x / rhs, self.y / rhs)
    }
}

/// The fixed particle palette.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorId {
    Pink,
    Sky,
    Butter,
    Mint,
}

pub const PALETTE: [ColorId; 4] = [ColorId::Pink, ColorId::Sky, ColorId::Butter, ColorId::Mint];

impl ColorId {
    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            ColorId::Pink => (0xf3, 0xab, 0xfd),
            ColorId::Sky => (0x8b, 0xc3, 0xf7),
            ColorId::Butter => (0xf8, 0xed, 0x93),
            ColorId::Mint => (0xab, 0xfd, 0xb9),
        }
    }
}

/// Which motion policy particles follow each step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum MotionMode {
    /// Drift toward the mean of the neighborhood.
    Simple,
    /// Drift toward attractive neighbors and the focal point.
    #[default]
    Social,
}

/// A draw request produced by the simulation, consumed by a `Surface`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RenderCommand {
    Circle {
        center: Vec2,
        radius: f32,
        color: ColorId,
    },
}
