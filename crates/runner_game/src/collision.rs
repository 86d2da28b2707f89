//! Entity geometry: integer rectangles, per-pixel masks and the `Body` that
//! ties a rectangle to the sprite it is drawn with.
//!
//! Collision is two-stage: a cheap bounding-box test rejects most pairs, then
//! the masks are compared pixel by pixel over the intersection only. A pixel
//! is solid when its alpha is above 127.
//!
//! A `Sprite` computes its mask once when it is created and shares it behind
//! an `Arc`, so swapping sprites every few ticks for animation costs a pointer
//! copy. `Body` keeps its rectangle size locked to its sprite: the only way to
//! change either is `set_sprite`, which updates both together.

use image::RgbaImage;
use std::fmt;
use std::sync::Arc;

const SOLID_ALPHA_THRESHOLD: u8 = 127;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    /// Edge-touching rectangles do not intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        if !self.intersects(other) {
            return None;
        }
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        Some(Rect {
            x,
            y,
            width: self.right().min(other.right()) - x,
            height: self.bottom().min(other.bottom()) - y,
        })
    }

    /// Apply a real-valued displacement, truncating each coordinate toward zero.
    pub fn translate(&mut self, dx: f32, dy: f32) {
        self.x = (self.x as f32 + dx) as i32;
        self.y = (self.y as f32 + dy) as i32;
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct Mask {
    width: u32,
    height: u32,
    solid: Vec<bool>,
}

impl Mask {
    pub fn from_image(image: &RgbaImage) -> Self {
        let solid = image
            .pixels()
            .map(|p| p.0[3] > SOLID_ALPHA_THRESHOLD)
            .collect();
        Self {
            width: image.width(),
            height: image.height(),
            solid,
        }
    }

    /// Out-of-range coordinates read as empty.
    pub fn is_solid(&self, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return false;
        }
        self.solid[(y as u32 * self.width + x as u32) as usize]
    }

    pub fn solid_count(&self) -> usize {
        self.solid.iter().filter(|s| **s).count()
    }
}

impl fmt::Debug for Mask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mask")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("solid", &self.solid_count())
            .finish()
    }
}

/// A named, ready-to-draw image plus its collision mask.
#[derive(Clone)]
pub struct Sprite {
    key: Arc<str>,
    image: Arc<RgbaImage>,
    mask: Arc<Mask>,
}

impl Sprite {
    pub fn new(key: impl Into<Arc<str>>, image: RgbaImage) -> Self {
        let mask = Mask::from_image(&image);
        Self {
            key: key.into(),
            image: Arc::new(image),
            mask: Arc::new(mask),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn shared_key(&self) -> Arc<str> {
        Arc::clone(&self.key)
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn mask(&self) -> &Mask {
        &self.mask
    }

    pub fn width(&self) -> i32 {
        self.image.width() as i32
    }

    pub fn height(&self) -> i32 {
        self.image.height() as i32
    }
}

impl fmt::Debug for Sprite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sprite")
            .field("key", &self.key)
            .field("width", &self.image.width())
            .field("height", &self.image.height())
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct Body {
    rect: Rect,
    sprite: Sprite,
}

impl Body {
    pub fn new(sprite: Sprite, x: i32, y: i32) -> Self {
        let rect = Rect::new(x, y, sprite.width(), sprite.height());
        Self { rect, sprite }
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn sprite(&self) -> &Sprite {
        &self.sprite
    }

    /// Swap the sprite and resize the rectangle to match, keeping the
    /// top-left corner in place.
    pub fn set_sprite(&mut self, sprite: Sprite) {
        self.rect.width = sprite.width();
        self.rect.height = sprite.height();
        self.sprite = sprite;
    }

    pub fn set_position(&mut self, x: i32, y: i32) {
        self.rect.x = x;
        self.rect.y = y;
    }

    pub fn set_bottom(&mut self, bottom: i32) {
        self.rect.y = bottom - self.rect.height;
    }

    pub fn move_by(&mut self, dx: f32, dy: f32) {
        self.rect.translate(dx, dy);
    }

    pub fn overlaps(&self, other: &Body) -> bool {
        let Some(area) = self.rect.intersection(&other.rect) else {
            return false;
        };
        let mine = self.sprite.mask();
        let theirs = other.sprite.mask();
        for y in area.y..area.bottom() {
            for x in area.x..area.right() {
                if mine.is_solid(x - self.rect.x, y - self.rect.y)
                    && theirs.is_solid(x - other.rect.x, y - other.rect.y)
                {
                    return true;
                }
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn solid(key: &str, w: u32, h: u32) -> Sprite {
        Sprite::new(key, RgbaImage::from_pixel(w, h, Rgba([200, 40, 40, 255])))
    }

    /// Only the left half of the image is opaque.
    fn half_solid(key: &str, w: u32, h: u32) -> Sprite {
        let image = RgbaImage::from_fn(w, h, |x, _| {
            if x < w / 2 {
                Rgba([255, 255, 255, 255])
            } else {
                Rgba([0, 0, 0, 0])
            }
        });
        Sprite::new(key, image)
    }

    #[test]
    fn mask_uses_alpha_threshold() {
        let image = RgbaImage::from_fn(3, 1, |x, _| Rgba([0, 0, 0, [127u8, 128, 255][x as usize]]));
        let mask = Mask::from_image(&image);
        assert!(!mask.is_solid(0, 0));
        assert!(mask.is_solid(1, 0));
        assert!(mask.is_solid(2, 0));
        assert!(!mask.is_solid(3, 0));
        assert!(!mask.is_solid(-1, 0));
        assert_eq!(mask.solid_count(), 2);
    }

    #[test]
    fn sprite_mask_matches_image_size() {
        let sprite = solid("s", 16, 48);
        let mask = sprite.mask();
        assert_eq!(mask.solid_count(), 16 * 48);
        assert!(mask.is_solid(15, 47));
        assert!(!mask.is_solid(16, 0));
        assert!(!mask.is_solid(0, 48));
        assert_eq!((sprite.width(), sprite.height()), (16, 48));
    }

    #[test]
    fn translate_truncates_toward_zero() {
        let mut rect = Rect::new(10, 10, 4, 4);
        rect.translate(-3.9, 2.7);
        assert_eq!((rect.x, rect.y), (6, 12));

        let mut rect = Rect::new(1, 0, 4, 4);
        rect.translate(-1.5, 0.0);
        assert_eq!(rect.x, 0);
    }

    #[test]
    fn touching_rects_do_not_intersect() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(10, 0, 10, 10);
        assert!(!a.intersects(&b));
        assert_eq!(a.intersection(&b), None);
        let c = Rect::new(9, 9, 10, 10);
        assert_eq!(a.intersection(&c), Some(Rect::new(9, 9, 1, 1)));
    }

    #[test]
    fn set_sprite_resizes_from_top_left() {
        let mut body = Body::new(solid("small", 32, 32), 100, 200);
        body.set_sprite(solid("big", 64, 48));
        assert_eq!(body.rect(), Rect::new(100, 200, 64, 48));
        assert_eq!(body.sprite().key(), "big");
        assert_eq!(body.sprite().mask().solid_count(), 64 * 48);
        assert!(body.sprite().mask().is_solid(63, 47));
    }

    #[test]
    fn overlap_requires_solid_pixels_in_both_masks() {
        // Bounding boxes overlap on the right half of `a`, which is transparent.
        let a = Body::new(half_solid("a", 20, 20), 0, 0);
        let b = Body::new(solid("b", 10, 20), 12, 0);
        assert!(a.rect().intersects(&b.rect()));
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));

        let c = Body::new(solid("c", 10, 20), 5, 0);
        assert!(a.overlaps(&c));
        assert!(c.overlaps(&a));
    }

    #[test]
    fn set_bottom_snaps_to_surface() {
        let mut body = Body::new(solid("p", 64, 64), 100, 400);
        body.set_bottom(444);
        assert_eq!(body.rect().y, 380);
        assert_eq!(body.rect().bottom(), 444);
    }
}
