//! Crayola - Library for rendering animated pixel-sprite scenes
//!
//! This library provides functionality to:
//! - Animate shape sprites frame by frame on a tick schedule
//! - Paint shape and bitmap sprites onto a resizable surface
//! - Load scene documents and play them back headlessly to PNG or GIF

pub mod cli;
pub mod color;
pub mod config;
pub mod container;
pub mod gif;
pub mod models;
pub mod output;
pub mod parser;
pub mod scene;
pub mod signal;
pub mod surface;

pub use container::{Container, Element};
pub use models::{Bitmap, BitmapSprite, Dimension, Pixel, ScreenSize, ShapeSprite, Sprite};
pub use scene::{SceneError, SceneOptions, SceneRenderer};
pub use signal::{ResizeSignal, ResizeSubscription};
pub use surface::{Canvas, Surface};
