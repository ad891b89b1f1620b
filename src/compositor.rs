//! Layered image composition
//!
//! Loads one raster asset per layer (local file or remote URL),
//! normalizes sizes by centering onto a transparent canvas, and
//! alpha-composites bottom-to-top into one flattened RGBA image.

use std::collections::HashMap;
use std::time::Duration;

use image::{Rgba, RgbaImage};
use thiserror::Error;

use crate::models::{AssetLocator, ChosenTraits};

/// Timeout for remote asset fetches.
const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Error type for asset loading and composition failures.
///
/// Every variant names the layer and locator that caused it, and every
/// one is fatal for the run: silently skipping a layer would corrupt
/// each edition's visual composition.
#[derive(Debug, Error)]
pub enum AssetError {
    /// Locator is neither an existing local file nor a fetchable URL
    #[error("missing file for layer '{layer}': {locator}")]
    NotFound { layer: String, locator: String },
    /// Remote fetch failed (connection, HTTP status or timeout)
    #[error("unable to fetch image for layer '{layer}' from '{locator}': {source}")]
    Fetch {
        layer: String,
        locator: String,
        source: reqwest::Error,
    },
    /// Asset bytes are not a decodable image
    #[error("unable to decode image for layer '{layer}' from '{locator}': {source}")]
    Decode {
        layer: String,
        locator: String,
        source: image::ImageError,
    },
    /// HTTP client could not be constructed
    #[error("HTTP client setup failed: {0}")]
    Client(#[from] reqwest::Error),
}

/// Composes editions for one generation run.
///
/// Holds the run's asset cache: each distinct locator is read (and for
/// remote locators, fetched) at most once per run, however many
/// editions reuse the trait.
pub struct Compositor {
    client: reqwest::blocking::Client,
    cache: HashMap<AssetLocator, RgbaImage>,
    forced_size: Option<(u32, u32)>,
}

impl Compositor {
    /// Create a compositor for one run.
    ///
    /// `forced_size` overrides the canvas size; when `None` the first
    /// layer's natural size defines the canvas.
    pub fn new(forced_size: Option<(u32, u32)>) -> Result<Self, AssetError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            cache: HashMap::new(),
            forced_size,
        })
    }

    /// Flatten one edition's chosen assets into a single RGBA image.
    ///
    /// Layers composite in iteration order (bottom first). The canvas
    /// is the forced size if configured, otherwise the first layer's
    /// natural size. Layers whose natural size differs from the canvas
    /// are centered, never scaled. An empty selection yields a 1x1
    /// transparent image.
    pub fn compose(&mut self, chosen: &ChosenTraits) -> Result<RgbaImage, AssetError> {
        let mut canvas: Option<RgbaImage> = None;

        for (layer, choice) in chosen {
            self.ensure_loaded(layer, &choice.asset_locator)?;
            let asset = &self.cache[&choice.asset_locator];

            if let Some(base) = canvas.as_mut() {
                overlay_centered(base, asset);
            } else {
                canvas = Some(match self.forced_size {
                    // First layer defines the canvas when no size is forced
                    None => asset.clone(),
                    Some((width, height)) => {
                        let mut base = transparent_canvas(width, height);
                        overlay_centered(&mut base, asset);
                        base
                    }
                });
            }
        }

        Ok(canvas.unwrap_or_else(|| transparent_canvas(1, 1)))
    }

    /// Decode the asset behind `locator` into the cache if not already
    /// there.
    fn ensure_loaded(&mut self, layer: &str, locator: &AssetLocator) -> Result<(), AssetError> {
        if self.cache.contains_key(locator) {
            return Ok(());
        }

        let image = match locator {
            AssetLocator::Local(path) => {
                if !path.exists() {
                    return Err(AssetError::NotFound {
                        layer: layer.to_string(),
                        locator: locator.to_string(),
                    });
                }
                image::open(path)
                    .map_err(|source| AssetError::Decode {
                        layer: layer.to_string(),
                        locator: locator.to_string(),
                        source,
                    })?
                    .to_rgba8()
            }
            AssetLocator::Remote(url) => {
                let bytes = self
                    .client
                    .get(url.as_str())
                    .send()
                    .and_then(|response| response.error_for_status())
                    .and_then(|response| response.bytes())
                    .map_err(|source| AssetError::Fetch {
                        layer: layer.to_string(),
                        locator: locator.to_string(),
                        source,
                    })?;
                image::load_from_memory(&bytes)
                    .map_err(|source| AssetError::Decode {
                        layer: layer.to_string(),
                        locator: locator.to_string(),
                        source,
                    })?
                    .to_rgba8()
            }
        };

        self.cache.insert(locator.clone(), image);
        Ok(())
    }
}

fn transparent_canvas(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 0]))
}

/// Alpha-composite `asset` over `canvas`, centered.
///
/// The centering offset is `(canvas_dim - asset_dim) / 2` per axis; an
/// asset larger than the canvas is clipped around its center. Assets
/// are never scaled to fit.
fn overlay_centered(canvas: &mut RgbaImage, asset: &RgbaImage) {
    let (canvas_w, canvas_h) = canvas.dimensions();
    let (asset_w, asset_h) = asset.dimensions();
    let offset_x = (canvas_w as i64 - asset_w as i64) / 2;
    let offset_y = (canvas_h as i64 - asset_h as i64) / 2;

    for (src_x, src_y, pixel) in asset.enumerate_pixels() {
        if pixel[3] == 0 {
            continue;
        }
        let dest_x = offset_x + src_x as i64;
        let dest_y = offset_y + src_y as i64;
        if dest_x < 0 || dest_y < 0 || dest_x >= canvas_w as i64 || dest_y >= canvas_h as i64 {
            continue;
        }
        let (dest_x, dest_y) = (dest_x as u32, dest_y as u32);

        if pixel[3] == 255 {
            canvas.put_pixel(dest_x, dest_y, *pixel);
        } else {
            let below = *canvas.get_pixel(dest_x, dest_y);
            canvas.put_pixel(dest_x, dest_y, alpha_over(*pixel, below));
        }
    }
}

/// Source-over alpha blending of one pixel pair.
fn alpha_over(src: Rgba<u8>, dst: Rgba<u8>) -> Rgba<u8> {
    let src_a = src[3] as f32 / 255.0;
    let dst_a = dst[3] as f32 / 255.0;
    let out_a = src_a + dst_a * (1.0 - src_a);
    if out_a == 0.0 {
        return Rgba([0, 0, 0, 0]);
    }

    let channel = |s: u8, d: u8| -> u8 {
        let s = s as f32 / 255.0;
        let d = d as f32 / 255.0;
        (((s * src_a + d * dst_a * (1.0 - src_a)) / out_a) * 255.0).round() as u8
    };

    Rgba([
        channel(src[0], dst[0]),
        channel(src[1], dst[1]),
        channel(src[2], dst[2]),
        (out_a * 255.0).round() as u8,
    ])
}
