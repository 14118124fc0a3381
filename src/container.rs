//! Host containers
//!
//! The container is the host element whose rendered box decides how large the
//! drawing surface is. The renderer writes the logical screen size onto it once
//! and afterwards only reads its box.

use crate::models::{FrameSize, ScreenSize};
use std::cell::Cell;
use std::rc::Rc;

/// A host element with a rendered box size.
///
/// Methods take `&self`: the element belongs to the host, which may keep
/// resizing it while a renderer holds a handle.
pub trait Container {
    /// Rendered box size in device pixels (`offsetWidth`/`offsetHeight`).
    fn offset_size(&self) -> FrameSize;

    /// Apply the logical screen size as the element's style dimensions.
    fn apply_screen_size(&self, size: &ScreenSize);
}

impl<C: Container + ?Sized> Container for &C {
    fn offset_size(&self) -> FrameSize {
        (**self).offset_size()
    }

    fn apply_screen_size(&self, size: &ScreenSize) {
        (**self).apply_screen_size(size)
    }
}

impl<C: Container + ?Sized> Container for Rc<C> {
    fn offset_size(&self) -> FrameSize {
        (**self).offset_size()
    }

    fn apply_screen_size(&self, size: &ScreenSize) {
        (**self).apply_screen_size(size)
    }
}

/// A minimal layout element: its box is its style size resolved against the
/// viewport it lives in.
#[derive(Debug, Default)]
pub struct Element {
    viewport: Cell<FrameSize>,
    style: Cell<ScreenSize>,
}

impl Element {
    pub fn new(viewport_width: u32, viewport_height: u32) -> Self {
        Self {
            viewport: Cell::new(FrameSize {
                width: viewport_width,
                height: viewport_height,
            }),
            style: Cell::new(ScreenSize::default()),
        }
    }

    pub fn viewport(&self) -> FrameSize {
        self.viewport.get()
    }

    /// Change the viewport size. Hosts emit a resize signal afterwards.
    pub fn set_viewport(&self, width: u32, height: u32) {
        self.viewport.set(FrameSize { width, height });
    }

    pub fn style(&self) -> ScreenSize {
        self.style.get()
    }
}

impl Container for Element {
    fn offset_size(&self) -> FrameSize {
        let viewport = self.viewport.get();
        let style = self.style.get();
        FrameSize {
            width: style.width.resolve(viewport.width),
            height: style.height.resolve(viewport.height),
        }
    }

    fn apply_screen_size(&self, size: &ScreenSize) {
        self.style.set(*size);
    }
}
