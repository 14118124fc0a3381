//! Scene rendering - the per-tick clear/animate/paint cycle
//!
//! A [`SceneRenderer`] owns a sprite collection and a drawing surface. The
//! host calls [`update`](SceneRenderer::update) once per tick:
//!
//! 1. a pending viewport resize is applied to the surface
//! 2. the whole surface and every sprite's render tracking are cleared
//! 3. sprites are painted in collection order, later ones on top
//!
//! Shape sprites advance their animation on a tick counter and paint one
//! `pixel_size` block per pixel. Bitmap sprites are a single blit and never
//! animate.

use crate::container::Container;
use crate::models::{Assets, BitmapSprite, FrameSize, Pixel, RenderTrack, ScreenSize, ShapeSprite, Sprite};
use crate::signal::{ResizeSignal, ResizeSubscription};
use crate::surface::Surface;
use thiserror::Error;

/// Pixel size used when the host does not pick one
pub const DEFAULT_PIXEL_SIZE: u32 = 5;

/// Error type for scene construction and sprite replacement
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SceneError {
    /// Sprites were not given as a list
    #[error("sprites must be a list")]
    InvalidSpriteList,
    /// A scene needs at least one sprite
    #[error("need at least one sprite to initialize a scene")]
    EmptySpriteList,
    /// Pixel size is not a positive integer
    #[error("pixel size must be a positive integer, got {0}")]
    InvalidPixelSize(String),
}

/// Construction options for a [`SceneRenderer`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneOptions {
    pub pixel_size: u32,
    pub screen_size: ScreenSize,
}

impl Default for SceneOptions {
    fn default() -> Self {
        Self {
            pixel_size: DEFAULT_PIXEL_SIZE,
            screen_size: ScreenSize::default(),
        }
    }
}

/// Check that a sprite collection can back a scene.
pub fn validate_sprites(sprites: &[Sprite]) -> Result<(), SceneError> {
    if sprites.is_empty() {
        return Err(SceneError::EmptySpriteList);
    }
    Ok(())
}

pub fn validate_pixel_size(pixel_size: u32) -> Result<u32, SceneError> {
    if pixel_size == 0 {
        return Err(SceneError::InvalidPixelSize(pixel_size.to_string()));
    }
    Ok(pixel_size)
}

/// Renders an ordered sprite collection onto a surface sized by its container.
///
/// The renderer is the only writer of each sprite's animation state
/// (`current_frame`, `tick_counter`) and render tracking. Hosts read sprites
/// through [`assets`](SceneRenderer::assets) and can move them with
/// [`sprite_mut`](SceneRenderer::sprite_mut).
#[derive(Debug)]
pub struct SceneRenderer<S, C> {
    surface: S,
    container: C,
    pixel_size: u32,
    screen_size: ScreenSize,
    sprites: Vec<Sprite>,
    resize: Option<ResizeSubscription>,
}

impl<S: Surface, C: Container> SceneRenderer<S, C> {
    /// Create a renderer and size `surface` to `container`'s rendered box.
    ///
    /// Writes `options.screen_size` onto the container and subscribes to
    /// `signal` until the renderer is disposed or dropped.
    ///
    /// # Errors
    ///
    /// - [`SceneError::EmptySpriteList`] if `sprites` is empty
    /// - [`SceneError::InvalidPixelSize`] if `options.pixel_size` is zero
    pub fn new(
        sprites: Vec<Sprite>,
        options: SceneOptions,
        surface: S,
        container: C,
        signal: &ResizeSignal,
    ) -> Result<Self, SceneError> {
        validate_sprites(&sprites)?;
        let pixel_size = validate_pixel_size(options.pixel_size)?;
        if pixel_size == DEFAULT_PIXEL_SIZE {
            log::info!("scene pixel size default of {}", DEFAULT_PIXEL_SIZE);
        }

        container.apply_screen_size(&options.screen_size);

        let mut renderer = Self {
            surface,
            container,
            pixel_size,
            screen_size: options.screen_size,
            sprites,
            resize: Some(signal.subscribe()),
        };
        renderer.on_resize();
        Ok(renderer)
    }

    /// Current surface size in device pixels.
    pub fn frame(&self) -> FrameSize {
        FrameSize {
            width: self.surface.width(),
            height: self.surface.height(),
        }
    }

    pub fn assets(&self) -> Assets<'_> {
        Assets {
            sprite_count: self.sprites.len(),
            sprites: &self.sprites,
        }
    }

    pub fn pixel_size(&self) -> u32 {
        self.pixel_size
    }

    pub fn screen_size(&self) -> ScreenSize {
        self.screen_size
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn container(&self) -> &C {
        &self.container
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    /// Mutable access to one sprite, e.g. to move it between ticks.
    pub fn sprite_mut(&mut self, index: usize) -> Option<&mut Sprite> {
        self.sprites.get_mut(index)
    }

    /// Replace the whole sprite collection.
    ///
    /// On error the previous collection stays in place.
    pub fn set_sprites(&mut self, sprites: Vec<Sprite>) -> Result<(), SceneError> {
        if let Err(e) = validate_sprites(&sprites) {
            log::warn!("keeping {} sprites, rejected replacement: {}", self.sprites.len(), e);
            return Err(e);
        }
        self.sprites = sprites;
        Ok(())
    }

    /// Apply a resize signalled since the last check. Returns whether one was pending.
    pub fn sync_resize(&mut self) -> bool {
        let pending = self.resize.as_ref().is_some_and(|sub| sub.take_pending());
        if pending {
            self.on_resize();
        }
        pending
    }

    /// Re-derive the surface size from the container's rendered box.
    pub fn on_resize(&mut self) {
        let size = self.container.offset_size();
        if size == self.frame() {
            return;
        }
        self.surface.set_size(size.width, size.height);
        log::debug!("canvas resize: {}x{}", size.width, size.height);
    }

    /// Stop listening for viewport resizes. [`on_resize`](Self::on_resize)
    /// still works when called directly.
    pub fn dispose(&mut self) {
        self.resize = None;
    }

    pub fn is_listening(&self) -> bool {
        self.resize.is_some()
    }

    /// Erase the whole surface and reset every sprite's render tracking.
    ///
    /// A resize signalled since the last check is applied first, so the
    /// cleared region is always the current one.
    pub fn clear(&mut self) {
        self.sync_resize();
        let frame = self.frame();
        self.surface.clear_rect(0, 0, frame.width, frame.height);
        for sprite in &mut self.sprites {
            sprite.track_mut().clear();
        }
    }

    /// Run one tick: resize if needed, clear, then animate and paint every sprite.
    pub fn update(&mut self) {
        self.clear();

        let surface = &mut self.surface;
        for sprite in &mut self.sprites {
            match sprite {
                Sprite::Shape(shape) => render_shape(surface, self.pixel_size, shape),
                Sprite::Bitmap(bitmap) => render_bitmap(surface, bitmap),
            }
        }
    }
}

fn render_shape<S: Surface>(surface: &mut S, pixel_size: u32, sprite: &mut ShapeSprite) {
    sprite.advance();
    let (x, y) = (sprite.x, sprite.y);
    let (frame, track) = sprite.paint_parts();
    for pixel in frame {
        render_pixel(surface, pixel_size, track, pixel, x, y);
    }
}

fn render_pixel<S: Surface>(
    surface: &mut S,
    pixel_size: u32,
    track: &mut RenderTrack,
    pixel: &Pixel,
    x: i32,
    y: i32,
) {
    // Surfaces clip off-screen blocks
    let px = pixel.x.saturating_add(x);
    let py = pixel.y.saturating_add(y);
    surface.set_fill_color(pixel.color);
    surface.fill_rect(px, py, pixel_size, pixel_size);
    track.push(px, py);
}

fn render_bitmap<S: Surface>(surface: &mut S, sprite: &BitmapSprite) {
    let bitmap = sprite.bitmap();
    surface.draw_image(&bitmap.image, bitmap.x, bitmap.y, bitmap.width, bitmap.height);
}
