//! Scene document parsing
//!
//! A scene document is a JSON5 object describing the sprites of one scene:
//!
//! ```json5
//! {
//!   pixel_size: 5,
//!   screen: { width: "100%", height: "100%" },
//!   sprites: [
//!     // Shape sprites advance a frame once more than `tick` updates have passed
//!     { kind: "shape", x: 10, y: 10, tick: 2, frames: [
//!       [{ x: 0, y: 0, color: "#fff" }, { x: 5, y: 0, color: "#000" }],
//!     ]},
//!     { kind: "bitmap", frames: [{ src: "hero.png", x: 0, y: 0, width: 16, height: 16 }] },
//!   ],
//! }
//! ```
//!
//! Parsing is lenient by default: sprites with an unknown `kind` are skipped
//! and invalid colors render as magenta, each with a [`Warning`]. In strict
//! mode both are errors.

use crate::color::parse_color;
use crate::models::{Bitmap, BitmapSprite, Frame, Pixel, ScreenSize, ShapeSprite, Sprite, SpriteKind, Warning};
use crate::scene::{validate_pixel_size, SceneError};
use image::Rgba;
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Magenta color used for invalid colors
const MAGENTA: Rgba<u8> = Rgba([255, 0, 255, 255]);

/// Error type for scene document failures.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("cannot read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid scene document: {0}")]
    Syntax(String),
    #[error(transparent)]
    Scene(#[from] SceneError),
    #[error("sprite {index}: {message}")]
    Sprite { index: usize, message: String },
    #[error("cannot load bitmap '{}': {source}", path.display())]
    Bitmap {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// Destination box and source path of a bitmap frame, before decoding.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BitmapSpec {
    pub src: PathBuf,
    #[serde(default)]
    pub x: i32,
    #[serde(default)]
    pub y: i32,
    /// Destination width, natural width when omitted
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

impl BitmapSpec {
    /// Decode the image, resolving `src` relative to `base`.
    pub fn load(&self, base: &Path) -> Result<Bitmap, ParseError> {
        let path = base.join(&self.src);
        let image = image::open(&path)
            .map_err(|source| ParseError::Bitmap {
                path: path.clone(),
                source,
            })?
            .to_rgba8();

        let mut bitmap = Bitmap::new(image).at(self.x, self.y);
        let width = self.width.unwrap_or(bitmap.width);
        let height = self.height.unwrap_or(bitmap.height);
        bitmap = bitmap.sized(width, height);
        Ok(bitmap)
    }
}

/// A sprite as described by a document. Shapes are complete; bitmaps still
/// need their image decoded.
#[derive(Debug, Clone, PartialEq)]
pub enum SpriteSpec {
    Shape(ShapeSprite),
    Bitmap(BitmapSpec),
}

impl SpriteSpec {
    pub fn kind(&self) -> SpriteKind {
        match self {
            SpriteSpec::Shape(_) => SpriteKind::Shape,
            SpriteSpec::Bitmap(_) => SpriteKind::Bitmap,
        }
    }

    pub fn build(self, base: &Path) -> Result<Sprite, ParseError> {
        match self {
            SpriteSpec::Shape(shape) => Ok(Sprite::Shape(shape)),
            SpriteSpec::Bitmap(spec) => Ok(Sprite::Bitmap(BitmapSprite::from_bitmap(spec.load(base)?))),
        }
    }
}

/// The settings and sprites of one scene document.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SceneDocument {
    pub pixel_size: Option<u32>,
    pub screen_size: Option<ScreenSize>,
    pub sprites: Vec<SpriteSpec>,
}

/// Result of parsing a scene document.
#[derive(Debug, Clone, Default)]
pub struct ParseResult {
    pub document: SceneDocument,
    pub warnings: Vec<Warning>,
}

/// A parsed document with every bitmap decoded, ready for a renderer.
#[derive(Debug, Clone)]
pub struct LoadedScene {
    pub pixel_size: Option<u32>,
    pub screen_size: Option<ScreenSize>,
    pub sprites: Vec<Sprite>,
    pub warnings: Vec<Warning>,
}

#[derive(Deserialize)]
struct PixelDef {
    x: i32,
    y: i32,
    color: String,
}

#[derive(Deserialize)]
struct ShapeDef {
    #[serde(default)]
    x: i32,
    #[serde(default)]
    y: i32,
    #[serde(default)]
    tick: u32,
    #[serde(default)]
    frame_count: Option<usize>,
    frames: Vec<Vec<PixelDef>>,
}

#[derive(Deserialize)]
struct BitmapDef {
    frames: Vec<BitmapSpec>,
}

/// Parse a scene document from JSON5 text.
///
/// # Errors
///
/// - [`SceneError::InvalidSpriteList`] if `sprites` is missing or not a list
/// - [`SceneError::InvalidPixelSize`] if `pixel_size` is not a positive integer
/// - [`ParseError::Sprite`] for malformed sprites (and, in strict mode, for
///   unknown kinds and invalid colors)
pub fn parse_scene(text: &str, strict: bool) -> Result<ParseResult, ParseError> {
    let value: Value = json5::from_str(text).map_err(|e| ParseError::Syntax(e.to_string()))?;
    let root = value
        .as_object()
        .ok_or_else(|| ParseError::Syntax("top level must be an object".to_string()))?;

    let mut result = ParseResult::default();

    if let Some(pixel_size) = root.get("pixel_size") {
        result.document.pixel_size = Some(parse_pixel_size(pixel_size)?);
    }

    if let Some(screen) = root.get("screen") {
        let screen_size = ScreenSize::deserialize(screen)
            .map_err(|e| ParseError::Syntax(format!("screen: {}", e)))?;
        result.document.screen_size = Some(screen_size);
    }

    let entries = root
        .get("sprites")
        .and_then(Value::as_array)
        .ok_or(SceneError::InvalidSpriteList)?;

    for (index, entry) in entries.iter().enumerate() {
        let kind = match entry.get("kind").and_then(Value::as_str) {
            Some(kind) => kind.parse::<SpriteKind>(),
            None => Err("missing sprite kind".to_string()),
        };

        let spec = match kind {
            Ok(SpriteKind::Shape) => SpriteSpec::Shape(parse_shape(index, entry, strict, &mut result.warnings)?),
            Ok(SpriteKind::Bitmap) => SpriteSpec::Bitmap(parse_bitmap(index, entry, &mut result.warnings)?),
            Err(message) => {
                if strict {
                    return Err(ParseError::Sprite { index, message });
                }
                log::warn!("sprite {}: {}, skipping", index, message);
                result
                    .warnings
                    .push(Warning::for_sprite(index, format!("{}, skipping", message)));
                continue;
            }
        };
        result.document.sprites.push(spec);
    }

    Ok(result)
}

/// Read, parse, and decode a scene document. Bitmap paths resolve relative
/// to the document's directory.
pub fn load_scene(path: &Path, strict: bool) -> Result<LoadedScene, ParseError> {
    let text = std::fs::read_to_string(path).map_err(|source| ParseError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let ParseResult { document, warnings } = parse_scene(&text, strict)?;

    let base = path.parent().unwrap_or(Path::new(""));
    let sprites = document
        .sprites
        .into_iter()
        .map(|spec| spec.build(base))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(LoadedScene {
        pixel_size: document.pixel_size,
        screen_size: document.screen_size,
        sprites,
        warnings,
    })
}

/// Accept integral numbers only; `5` and `5.0` pass, `2.5` and `"5"` do not.
fn parse_pixel_size(value: &Value) -> Result<u32, SceneError> {
    let invalid = || SceneError::InvalidPixelSize(value.to_string());

    let integral = match value.as_u64() {
        Some(n) => n,
        None => match value.as_f64() {
            Some(f) if f.fract() == 0.0 && f >= 0.0 && f <= u32::MAX as f64 => f as u64,
            _ => return Err(invalid()),
        },
    };
    let pixel_size = u32::try_from(integral).map_err(|_| invalid())?;
    validate_pixel_size(pixel_size).map_err(|_| invalid())
}

fn parse_shape(
    index: usize,
    entry: &Value,
    strict: bool,
    warnings: &mut Vec<Warning>,
) -> Result<ShapeSprite, ParseError> {
    let sprite_error = |message: String| ParseError::Sprite { index, message };

    let def = ShapeDef::deserialize(entry).map_err(|e| sprite_error(e.to_string()))?;

    let mut frames: Vec<Frame> = Vec::with_capacity(def.frames.len());
    for pixels in def.frames {
        let mut frame = Frame::with_capacity(pixels.len());
        for pixel in pixels {
            let color = match parse_color(&pixel.color) {
                Ok(color) => color,
                Err(e) if strict => {
                    return Err(sprite_error(format!("invalid color '{}': {}", pixel.color, e)));
                }
                Err(e) => {
                    warnings.push(Warning::for_sprite(
                        index,
                        format!("invalid color '{}': {}, using magenta", pixel.color, e),
                    ));
                    MAGENTA
                }
            };
            frame.push(Pixel::new(pixel.x, pixel.y, color));
        }
        frames.push(frame);
    }

    let mut sprite = ShapeSprite::new(frames, def.tick)
        .map_err(|e| sprite_error(e.to_string()))?
        .at(def.x, def.y);
    if let Some(frame_count) = def.frame_count {
        sprite = sprite.with_frame_count(frame_count).map_err(|e| sprite_error(e.to_string()))?;
    }
    Ok(sprite)
}

fn parse_bitmap(index: usize, entry: &Value, warnings: &mut Vec<Warning>) -> Result<BitmapSpec, ParseError> {
    let def = BitmapDef::deserialize(entry).map_err(|e| ParseError::Sprite {
        index,
        message: e.to_string(),
    })?;

    let extra = def.frames.len().saturating_sub(1);
    let Some(first) = def.frames.into_iter().next() else {
        return Err(ParseError::Sprite {
            index,
            message: "bitmap sprite must have at least one frame".to_string(),
        });
    };
    if extra > 0 {
        warnings.push(Warning::for_sprite(
            index,
            format!("bitmap sprites draw only their first frame, ignoring {} more", extra),
        ));
    }
    Ok(first)
}
