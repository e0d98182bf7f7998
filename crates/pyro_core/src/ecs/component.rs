//! # Component Records
//!
//! Components are pure data containers with no behavior.
//! They are `Copy` plain-old-data so archetype arrays stay dense and the
//! draw list can be handed to a renderer as raw bytes.

use bytemuck::{Pod, Zeroable};

use super::signature::Capability;

/// Simulation frame number.
pub type Frame = u64;

/// Marker trait for ECS components.
///
/// Components must be:
/// - `Copy`: No heap allocations, bitwise copyable
/// - `Pod`: Plain old data, safe to reinterpret as bytes
/// - `Default`: Zeroed value is meaningful
pub trait Component: Copy + Pod + Zeroable + Default + Send + Sync + 'static {
    /// The signature bit that claims this component's array.
    const CAPABILITY: Capability;
}

/// RGBA8 color.
///
/// Memory order is `b, g, r, a`, i.e. one little-endian ARGB8888 pixel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
#[repr(C)]
pub struct Color {
    /// Blue channel.
    pub b: u8,
    /// Green channel.
    pub g: u8,
    /// Red channel.
    pub r: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Color {
    /// Opaque red.
    pub const RED: Self = Self::rgba(255, 0, 0, 255);
    /// Opaque green.
    pub const GREEN: Self = Self::rgba(0, 255, 0, 255);
    /// Opaque blue.
    pub const BLUE: Self = Self::rgba(0, 0, 255, 255);
    /// Opaque yellow.
    pub const YELLOW: Self = Self::rgba(255, 255, 0, 255);
    /// Opaque cyan.
    pub const CYAN: Self = Self::rgba(0, 255, 255, 255);
    /// Opaque magenta.
    pub const MAGENTA: Self = Self::rgba(255, 0, 255, 255);

    /// Creates a color from channels in the usual r, g, b, a order.
    #[inline]
    #[must_use]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { b, g, r, a }
    }
}

/// The frame at which an entity is removed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
#[repr(C)]
pub struct DeathTime {
    /// Entity dies once the current frame reaches this value.
    pub dead_frame: Frame,
}

impl Component for DeathTime {
    const CAPABILITY: Capability = Capability::DeathTime;
}

/// Per-channel linear fade with a floor.
///
/// Each tick every channel drops by its rate and is clamped at its minimum.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
#[repr(C)]
pub struct Fades {
    /// Red decrement per tick.
    pub r_rate: u8,
    /// Red floor.
    pub r_min: u8,
    /// Green decrement per tick.
    pub g_rate: u8,
    /// Green floor.
    pub g_min: u8,
    /// Blue decrement per tick.
    pub b_rate: u8,
    /// Blue floor.
    pub b_min: u8,
    /// Alpha decrement per tick.
    pub a_rate: u8,
    /// Alpha floor.
    pub a_min: u8,
}

impl Component for Fades {
    const CAPABILITY: Capability = Capability::Fades;
}

/// Bursts into a flash and debris when the entity dies.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
#[repr(C)]
pub struct Explodes {
    /// Requested debris count.
    pub num_particles: u32,
}

impl Component for Explodes {
    const CAPABILITY: Capability = Capability::Explodes;
}

/// What the renderer draws.
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Graphics {
    /// Fill color.
    pub color: Color,
    /// Radius as a fraction of the screen.
    pub radius: f32,
}

impl Component for Graphics {
    const CAPABILITY: Capability = Capability::Graphics;
}

/// Normalized screen position, `y` increasing upward.
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Position {
    /// Horizontal coordinate in `[0, 1]` while on screen.
    pub x: f32,
    /// Vertical coordinate in `[0, 1]` while on screen.
    pub y: f32,
}

impl Component for Position {
    const CAPABILITY: Capability = Capability::Position;
}

impl Position {
    /// Creates a new position.
    #[inline]
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Displacement per tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Velocity {
    /// Horizontal displacement per tick.
    pub dx: f32,
    /// Vertical displacement per tick.
    pub dy: f32,
}

impl Component for Velocity {
    const CAPABILITY: Capability = Capability::Velocity;
}

impl Velocity {
    /// Creates a new velocity.
    #[inline]
    #[must_use]
    pub const fn new(dx: f32, dy: f32) -> Self {
        Self { dx, dy }
    }
}

/// One entry of the per-tick draw list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Drawable {
    /// Fill color.
    pub color: Color,
    /// Radius as a fraction of the screen.
    pub radius: f32,
    /// Normalized x.
    pub x: f32,
    /// Normalized y, increasing upward.
    pub y: f32,
}
