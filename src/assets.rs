use std::collections::HashMap;
use std::path::{Path, PathBuf};

use egui::{ColorImage, Context, TextureHandle, TextureId, TextureOptions};
use image::imageops::FilterType;
use image::{Rgba, RgbaImage};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Pose { Idle, Happy, Judging }
impl Pose {
    pub const ALL: [Pose; 3] = [Pose::Idle, Pose::Happy, Pose::Judging];

    pub fn name(self) -> &'static str {
        match self {
            Pose::Idle    => "idle",
            Pose::Happy   => "happy",
            Pose::Judging => "judging",
        }
    }

    pub fn file_name(self) -> String { format!("{}.png", self.name()) }
}

/// Flattens `img` onto `key`, then turns every pixel that ended up exactly the
/// key color transparent and every other pixel opaque.
pub fn key_out(img: &RgbaImage, key: [u8; 3]) -> RgbaImage {
    let mut out = RgbaImage::new(img.width(), img.height());
    for (x, y, px) in img.enumerate_pixels() {
        let [r, g, b, a] = px.0;
        let blend = |src: u8, bg: u8| -> u8 {
            ((src as u32 * a as u32 + bg as u32 * (255 - a as u32) + 127) / 255) as u8
        };
        let rgb = [blend(r, key[0]), blend(g, key[1]), blend(b, key[2])];
        let alpha = if rgb == key { 0 } else { 255 };
        out.put_pixel(x, y, Rgba([rgb[0], rgb[1], rgb[2], alpha]));
    }
    out
}

pub fn load_sprite(dir: &Path, pose: Pose, size: [u32; 2], key: [u8; 3]) -> Option<ColorImage> {
    let path = dir.join(pose.file_name());
    if !path.exists() {
        log::warn!("sprite for {:?} not found at {}", pose, path.display());
        return None;
    }
    let img = match image::open(&path) {
        Ok(img) => img,
        Err(e) => {
            log::warn!("failed to decode {}: {e}", path.display());
            return None;
        }
    };
    let resized = img.resize_exact(size[0].max(1), size[1].max(1), FilterType::Lanczos3).to_rgba8();
    let keyed = key_out(&resized, key);
    let (w, h) = keyed.dimensions();
    Some(ColorImage::from_rgba_unmultiplied([w as usize, h as usize], keyed.as_raw()))
}

pub struct SpriteCache {
    dir:      PathBuf,
    size:     [u32; 2],
    key:      [u8; 3],
    textures: HashMap<Pose, Option<TextureHandle>>,
}
impl SpriteCache {
    pub fn new(dir: PathBuf, size: [u32; 2], key: [u8; 3]) -> Self {
        Self { dir, size, key, textures: HashMap::new() }
    }

    pub fn texture(&mut self, ctx: &Context, pose: Pose) -> Option<TextureId> {
        if !self.textures.contains_key(&pose) {
            let handle = load_sprite(&self.dir, pose, self.size, self.key)
                .map(|img| ctx.load_texture(pose.name(), img, TextureOptions::LINEAR));
            self.textures.insert(pose, handle);
        }
        self.textures.get(&pose).and_then(|t| t.as_ref()).map(|t| t.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAGENTA: [u8; 3] = [255, 0, 255];

    #[test]
    fn transparent_pixels_become_keyed_out() {
        let mut img = RgbaImage::new(3, 1);
        img.put_pixel(0, 0, Rgba([10, 20, 30, 0]));
        img.put_pixel(1, 0, Rgba([200, 10, 10, 255]));
        img.put_pixel(2, 0, Rgba([255, 255, 255, 128]));
        let out = key_out(&img, MAGENTA);

        assert_eq!(out.get_pixel(0, 0).0, [255, 0, 255, 0]);
        assert_eq!(out.get_pixel(1, 0).0, [200, 10, 10, 255]);
        let half = out.get_pixel(2, 0).0;
        assert_eq!(half[3], 255);
        assert_eq!(half[0], 255);
        assert_eq!(half[2], 255);
        assert!(half[1] > 100 && half[1] < 150);
    }

    #[test]
    fn opaque_key_colored_pixels_are_also_transparent() {
        let mut img = RgbaImage::new(1, 1);
        img.put_pixel(0, 0, Rgba([255, 0, 255, 255]));
        assert_eq!(key_out(&img, MAGENTA).get_pixel(0, 0).0[3], 0);
    }

    #[test]
    fn missing_sprite_is_none() {
        let dir = std::env::temp_dir().join("deskmate-no-such-sprite-dir");
        assert!(load_sprite(&dir, Pose::Judging, [250, 300], MAGENTA).is_none());
    }

    #[test]
    fn sprite_is_resized_and_keyed() {
        let dir = std::env::temp_dir().join(format!("deskmate-sprite-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let mut img = RgbaImage::new(8, 8);
        for px in img.pixels_mut() { *px = Rgba([0, 0, 0, 0]); }
        img.put_pixel(4, 4, Rgba([0, 128, 0, 255]));
        img.save(dir.join(Pose::Happy.file_name())).unwrap();

        let sprite = load_sprite(&dir, Pose::Happy, [16, 20], MAGENTA).unwrap();
        assert_eq!(sprite.size, [16, 20]);
        assert_eq!(sprite.pixels[0].a(), 0);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn file_names_follow_pose_names() {
        let names: Vec<String> = Pose::ALL.iter().map(|p| p.file_name()).collect();
        assert_eq!(names, vec!["idle.png", "happy.png", "judging.png"]);
    }

    #[test]
    fn sprite_cache_uploads_once_and_remembers_misses() {
        let dir = std::env::temp_dir().join(format!("deskmate-cache-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        RgbaImage::from_pixel(4, 4, Rgba([0, 128, 0, 255]))
            .save(dir.join(Pose::Happy.file_name())).unwrap();

        let ctx = Context::default();
        let mut cache = SpriteCache::new(dir.clone(), [8, 8], MAGENTA);
        let first = cache.texture(&ctx, Pose::Happy);
        assert!(first.is_some());
        assert_eq!(cache.texture(&ctx, Pose::Happy), first);

        assert_eq!(cache.texture(&ctx, Pose::Judging), None);
        assert_eq!(cache.texture(&ctx, Pose::Judging), None);
        assert!(matches!(cache.textures.get(&Pose::Judging), Some(None)));
        assert_eq!(cache.textures.len(), 2);
        std::fs::remove_dir_all(&dir).ok();
    }
}
