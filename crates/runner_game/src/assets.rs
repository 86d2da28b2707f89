//! Turns the raw PNG files under the asset root into game sprites.
//!
//! Character animations are horizontal strips of 32x32 frames on a black
//! background; each frame is cut out, doubled in size and has black keyed to
//! transparent. The ground tile and the obstacle are fixed regions of the
//! terrain sheet. Any missing or undersized image is a startup error.

use std::path::PathBuf;

use image::imageops::{self, FilterType};
use image::RgbaImage;

use crate::capabilities::AssetProvider;
use crate::collision::Sprite;
use crate::controller::CharacterFrames;

const CHARACTER_FRAME_SIZE: u32 = 32;
const COLOR_KEY: [u8; 3] = [0, 0, 0];

const TERRAIN_SHEET: &str = "terrain/Terrain.png";
const GROUND_REGION: Region = Region::new(96, 0, 48, 48);
const OBSTACLE_REGION: Region = Region::new(240, 0, 16, 48);
const BACKGROUND_IMAGE: &str = "backgrounds/nature.jpeg";
const SPACEBAR_SHEET: &str = "other/space_bar.png";
/// Region of the half-size space bar sheet.
const SPACEBAR_REGION: Region = Region::new(135, 230, 318, 120);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Region {
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Reads images from a directory on disk.
pub struct FileAssets {
    root: PathBuf,
}

impl FileAssets {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl AssetProvider for FileAssets {
    fn image(&self, name: &str) -> Result<RgbaImage, String> {
        let path = self.root.join(name);
        let image = image::open(&path)
            .map_err(|e| format!("Failed to read image {}: {e}", path.display()))?;
        Ok(image.to_rgba8())
    }
}

#[derive(Debug, Clone)]
pub struct GameAssets {
    pub character: CharacterFrames,
    pub ground: Sprite,
    pub obstacle: Sprite,
    pub background: Sprite,
    pub spacebar: Sprite,
}

impl GameAssets {
    pub fn load(provider: &dyn AssetProvider) -> Result<Self, String> {
        let character = CharacterFrames::new(
            load_strip(provider, "run")?,
            load_strip(provider, "jump")?,
            load_strip(provider, "fall")?,
        )?;

        let terrain = provider.image(TERRAIN_SHEET)?;
        let ground = Sprite::new(
            "ground",
            scale(&crop(&terrain, GROUND_REGION, TERRAIN_SHEET)?, 2.0),
        );
        let obstacle = Sprite::new("obstacle", crop(&terrain, OBSTACLE_REGION, TERRAIN_SHEET)?);

        let background = Sprite::new("background", provider.image(BACKGROUND_IMAGE)?);

        let spacebar_sheet = scale(&provider.image(SPACEBAR_SHEET)?, 0.5);
        let mut spacebar = crop(&spacebar_sheet, SPACEBAR_REGION, SPACEBAR_SHEET)?;
        apply_color_key(&mut spacebar, COLOR_KEY);
        let spacebar = Sprite::new("spacebar", spacebar);

        let assets = Self {
            character,
            ground,
            obstacle,
            background,
            spacebar,
        };
        log::info!("Loaded {} sprites", assets.all_sprites().count());
        Ok(assets)
    }

    pub fn all_sprites(&self) -> impl Iterator<Item = &Sprite> {
        self.character.all().chain([
            &self.ground,
            &self.obstacle,
            &self.background,
            &self.spacebar,
        ])
    }
}

fn load_strip(provider: &dyn AssetProvider, action: &str) -> Result<Vec<Sprite>, String> {
    let name = format!("sprites/{action}.png");
    let sheet = provider.image(&name)?;
    let frames = slice_strip(&sheet, CHARACTER_FRAME_SIZE, CHARACTER_FRAME_SIZE);
    if frames.is_empty() {
        return Err(format!(
            "Sprite sheet {name} ({}x{}) is smaller than one {CHARACTER_FRAME_SIZE}px frame",
            sheet.width(),
            sheet.height()
        ));
    }
    Ok(frames
        .into_iter()
        .enumerate()
        .map(|(i, frame)| {
            let mut frame = scale(&frame, 2.0);
            apply_color_key(&mut frame, COLOR_KEY);
            Sprite::new(format!("{action}#{i}"), frame)
        })
        .collect())
}

/// Cut whole `frame_width` x `frame_height` frames from the top row of a
/// sheet, left to right. A partial frame at the right edge is dropped.
pub fn slice_strip(sheet: &RgbaImage, frame_width: u32, frame_height: u32) -> Vec<RgbaImage> {
    if frame_width == 0 || frame_height == 0 || sheet.height() < frame_height {
        return Vec::new();
    }
    (0..sheet.width() / frame_width)
        .map(|i| imageops::crop_imm(sheet, i * frame_width, 0, frame_width, frame_height).to_image())
        .collect()
}

pub fn crop(sheet: &RgbaImage, region: Region, name: &str) -> Result<RgbaImage, String> {
    if region.x + region.width > sheet.width() || region.y + region.height > sheet.height() {
        return Err(format!(
            "Region {:?} is outside {name} ({}x{})",
            region,
            sheet.width(),
            sheet.height()
        ));
    }
    Ok(imageops::crop_imm(sheet, region.x, region.y, region.width, region.height).to_image())
}

/// Nearest-neighbour resize so pixel art stays crisp.
pub fn scale(image: &RgbaImage, factor: f32) -> RgbaImage {
    let width = ((image.width() as f32 * factor) as u32).max(1);
    let height = ((image.height() as f32 * factor) as u32).max(1);
    imageops::resize(image, width, height, FilterType::Nearest)
}

/// Make every pixel of colour `key` (and anything already invisible) fully
/// transparent.
pub fn apply_color_key(image: &mut RgbaImage, key: [u8; 3]) {
    for pixel in image.pixels_mut() {
        let [r, g, b, a] = pixel.0;
        if a == 0 || [r, g, b] == key {
            pixel.0 = [0, 0, 0, 0];
        }
    }
}
