//! Data models for scene objects (pixels, frames, sprites, screen sizes)
//!
//! Sprites are built by the host and handed to a
//! [`SceneRenderer`](crate::scene::SceneRenderer). Geometry and position are
//! public; animation state and render tracking can only be advanced by the
//! renderer itself.

use crate::color::{parse_color, ColorError};
use image::{Rgba, RgbaImage};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// One colored block of a shape frame, relative to the sprite position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pixel {
    pub x: i32,
    pub y: i32,
    pub color: Rgba<u8>,
}

impl Pixel {
    pub fn new(x: i32, y: i32, color: Rgba<u8>) -> Self {
        Self { x, y, color }
    }

    /// Build a pixel from a CSS color string such as `"#fff"` or `"red"`.
    pub fn parse(x: i32, y: i32, color: &str) -> Result<Self, ColorError> {
        Ok(Self::new(x, y, parse_color(color)?))
    }
}

/// One animation step of a shape sprite, painted in pixel order.
pub type Frame = Vec<Pixel>;

/// Absolute coordinates painted for a sprite during the current frame.
///
/// Both coordinate lists grow and reset together, so they always have the
/// same length.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderTrack {
    xs: Vec<i32>,
    ys: Vec<i32>,
}

impl RenderTrack {
    pub fn rendered_x(&self) -> &[i32] {
        &self.xs
    }

    pub fn rendered_y(&self) -> &[i32] {
        &self.ys
    }

    pub fn len(&self) -> usize {
        self.xs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }

    /// Painted coordinates as `(x, y)` pairs, in paint order.
    pub fn points(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.xs.iter().copied().zip(self.ys.iter().copied())
    }

    /// Whether a block of `size` painted at any tracked origin covers `(x, y)`.
    pub fn hit(&self, x: i32, y: i32, size: u32) -> bool {
        let (x, y, size) = (i64::from(x), i64::from(y), i64::from(size));
        self.points().any(|(px, py)| {
            let (px, py) = (i64::from(px), i64::from(py));
            x >= px && x < px + size && y >= py && y < py + size
        })
    }

    pub(crate) fn push(&mut self, x: i32, y: i32) {
        self.xs.push(x);
        self.ys.push(y);
    }

    pub(crate) fn clear(&mut self) {
        self.xs.clear();
        self.ys.clear();
    }
}

/// Error type for sprite construction failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpriteError {
    #[error("sprite must have at least one frame")]
    NoFrames,
    #[error("frame count {frame_count} must be between 1 and {frames}")]
    InvalidFrameCount { frame_count: usize, frames: usize },
}

/// A sprite painted as batches of colored pixel blocks, one frame per step.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeSprite {
    frames: Vec<Frame>,
    frame_count: usize,
    current_frame: usize,
    tick: u32,
    tick_counter: u32,
    pub x: i32,
    pub y: i32,
    track: RenderTrack,
}

impl ShapeSprite {
    /// Create a shape sprite cycling through every frame, advancing once the
    /// tick counter passes `tick`.
    pub fn new(frames: Vec<Frame>, tick: u32) -> Result<Self, SpriteError> {
        if frames.is_empty() {
            return Err(SpriteError::NoFrames);
        }
        Ok(Self {
            frame_count: frames.len(),
            frames,
            current_frame: 0,
            tick,
            tick_counter: 0,
            x: 0,
            y: 0,
            track: RenderTrack::default(),
        })
    }

    /// Restrict the animation cycle to the first `frame_count` frames.
    pub fn with_frame_count(mut self, frame_count: usize) -> Result<Self, SpriteError> {
        if frame_count == 0 || frame_count > self.frames.len() {
            return Err(SpriteError::InvalidFrameCount {
                frame_count,
                frames: self.frames.len(),
            });
        }
        self.frame_count = frame_count;
        Ok(self)
    }

    pub fn at(mut self, x: i32, y: i32) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    pub fn current_frame(&self) -> usize {
        self.current_frame
    }

    pub fn tick(&self) -> u32 {
        self.tick
    }

    pub fn tick_counter(&self) -> u32 {
        self.tick_counter
    }

    /// The frame that the next paint will draw.
    pub fn frame(&self) -> &Frame {
        &self.frames[self.current_frame]
    }

    pub fn track(&self) -> &RenderTrack {
        &self.track
    }

    /// Run one tick of the animation state machine.
    ///
    /// The frame advances once `tick_counter` is strictly greater than
    /// `tick`, so a threshold of 2 advances on every fourth tick.
    pub(crate) fn advance(&mut self) {
        if self.tick_counter > self.tick {
            self.tick_counter = 0;
            self.current_frame += 1;
            if self.current_frame >= self.frame_count {
                self.current_frame = 0;
            }
        }
        self.tick_counter = self.tick_counter.saturating_add(1);
    }

    /// Current frame alongside the tracking it paints into.
    pub(crate) fn paint_parts(&mut self) -> (&Frame, &mut RenderTrack) {
        (&self.frames[self.current_frame], &mut self.track)
    }
}

/// A decoded image blitted into a destination box.
#[derive(Debug, Clone, PartialEq)]
pub struct Bitmap {
    pub image: RgbaImage,
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Bitmap {
    /// Wrap an image at the origin at its natural size.
    pub fn new(image: RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            image,
            x: 0,
            y: 0,
            width,
            height,
        }
    }

    pub fn at(mut self, x: i32, y: i32) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    pub fn sized(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }
}

/// A sprite drawn as a single image blit. Not animated.
#[derive(Debug, Clone, PartialEq)]
pub struct BitmapSprite {
    frames: Vec<Bitmap>,
    track: RenderTrack,
}

impl BitmapSprite {
    pub fn new(frames: Vec<Bitmap>) -> Result<Self, SpriteError> {
        if frames.is_empty() {
            return Err(SpriteError::NoFrames);
        }
        Ok(Self {
            frames,
            track: RenderTrack::default(),
        })
    }

    pub fn from_bitmap(bitmap: Bitmap) -> Self {
        Self {
            frames: vec![bitmap],
            track: RenderTrack::default(),
        }
    }

    pub fn frames(&self) -> &[Bitmap] {
        &self.frames
    }

    /// The image that gets painted (always the first frame).
    pub fn bitmap(&self) -> &Bitmap {
        &self.frames[0]
    }

    pub fn bitmap_mut(&mut self) -> &mut Bitmap {
        &mut self.frames[0]
    }

    pub fn track(&self) -> &RenderTrack {
        &self.track
    }
}

/// Sprite variant tag, as written in scene documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpriteKind {
    Shape,
    Bitmap,
}

impl fmt::Display for SpriteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpriteKind::Shape => write!(f, "shape"),
            SpriteKind::Bitmap => write!(f, "bitmap"),
        }
    }
}

impl FromStr for SpriteKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "shape" => Ok(SpriteKind::Shape),
            "bitmap" => Ok(SpriteKind::Bitmap),
            other => Err(format!("unknown sprite kind '{}'", other)),
        }
    }
}

/// A sprite in a scene.
#[derive(Debug, Clone, PartialEq)]
pub enum Sprite {
    Shape(ShapeSprite),
    Bitmap(BitmapSprite),
}

impl Sprite {
    pub fn kind(&self) -> SpriteKind {
        match self {
            Sprite::Shape(_) => SpriteKind::Shape,
            Sprite::Bitmap(_) => SpriteKind::Bitmap,
        }
    }

    pub fn track(&self) -> &RenderTrack {
        match self {
            Sprite::Shape(s) => &s.track,
            Sprite::Bitmap(b) => &b.track,
        }
    }

    pub(crate) fn track_mut(&mut self) -> &mut RenderTrack {
        match self {
            Sprite::Shape(s) => &mut s.track,
            Sprite::Bitmap(b) => &mut b.track,
        }
    }

    /// Sprite offset for shapes, destination origin for bitmaps.
    pub fn position(&self) -> (i32, i32) {
        match self {
            Sprite::Shape(s) => (s.x, s.y),
            Sprite::Bitmap(b) => (b.bitmap().x, b.bitmap().y),
        }
    }

    pub fn set_position(&mut self, x: i32, y: i32) {
        match self {
            Sprite::Shape(s) => {
                s.x = x;
                s.y = y;
            }
            Sprite::Bitmap(b) => {
                let bitmap = b.bitmap_mut();
                bitmap.x = x;
                bitmap.y = y;
            }
        }
    }

    pub fn as_shape(&self) -> Option<&ShapeSprite> {
        match self {
            Sprite::Shape(s) => Some(s),
            Sprite::Bitmap(_) => None,
        }
    }

    pub fn as_bitmap(&self) -> Option<&BitmapSprite> {
        match self {
            Sprite::Bitmap(b) => Some(b),
            Sprite::Shape(_) => None,
        }
    }
}

impl From<ShapeSprite> for Sprite {
    fn from(sprite: ShapeSprite) -> Self {
        Sprite::Shape(sprite)
    }
}

impl From<BitmapSprite> for Sprite {
    fn from(sprite: BitmapSprite) -> Self {
        Sprite::Bitmap(sprite)
    }
}

/// Error type for CSS-style dimension strings
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid dimension '{0}', expected a percentage like \"100%\" or pixels like \"320px\"")]
pub struct DimensionError(pub String);

/// A CSS-style length applied to the host container.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Dimension {
    /// Fraction of the parent (viewport) length, `"100%"`
    Percent(f64),
    /// Absolute length, `"320px"` or `"320"`
    Pixels(u32),
}

impl Dimension {
    /// Resolve against the parent length, flooring fractional results.
    pub fn resolve(&self, parent: u32) -> u32 {
        match *self {
            Dimension::Percent(p) => (parent as f64 * p / 100.0).floor() as u32,
            Dimension::Pixels(px) => px,
        }
    }
}

impl Default for Dimension {
    fn default() -> Self {
        Dimension::Percent(100.0)
    }
}

impl FromStr for Dimension {
    type Err = DimensionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let invalid = || DimensionError(s.to_string());

        if let Some(percent) = trimmed.strip_suffix('%') {
            let value: f64 = percent.trim().parse().map_err(|_| invalid())?;
            if !value.is_finite() || value < 0.0 {
                return Err(invalid());
            }
            return Ok(Dimension::Percent(value));
        }

        let pixels = trimmed.strip_suffix("px").unwrap_or(trimmed);
        pixels.trim().parse().map(Dimension::Pixels).map_err(|_| invalid())
    }
}

impl TryFrom<String> for Dimension {
    type Error = DimensionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Dimension> for String {
    fn from(value: Dimension) -> Self {
        value.to_string()
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dimension::Percent(p) => write!(f, "{}%", p),
            Dimension::Pixels(px) => write!(f, "{}px", px),
        }
    }
}

/// Logical screen size written onto the host container.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScreenSize {
    #[serde(default)]
    pub width: Dimension,
    #[serde(default)]
    pub height: Dimension,
}

impl ScreenSize {
    pub fn new(width: Dimension, height: Dimension) -> Self {
        Self { width, height }
    }

    /// Fixed pixel size, `"{width}px"` by `"{height}px"`.
    pub fn pixels(width: u32, height: u32) -> Self {
        Self::new(Dimension::Pixels(width), Dimension::Pixels(height))
    }
}

/// Current surface dimensions in device pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameSize {
    pub width: u32,
    pub height: u32,
}

/// Read-only snapshot of a renderer's sprite collection.
#[derive(Debug, Clone, Copy)]
pub struct Assets<'a> {
    pub sprite_count: usize,
    pub sprites: &'a [Sprite],
}

/// A warning message from scene loading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warning {
    pub message: String,
    /// Index of the offending sprite in the document, if any
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub sprite: Option<usize>,
}

impl Warning {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            sprite: None,
        }
    }

    pub fn for_sprite(index: usize, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            sprite: Some(index),
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.sprite {
            Some(index) => write!(f, "sprite {}: {}", index, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}
