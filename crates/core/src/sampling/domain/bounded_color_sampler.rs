use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use ndarray::{s, Axis};
use thiserror::Error;

use crate::shared::constants::FALLBACK_COLOR;
use crate::shared::frame::Frame;
use crate::shared::region::{ClampedRegion, Region};

use super::color_sample::ColorSample;
use super::image_fetcher::{FetchError, ImageFetcher};
use super::region_planner::{RegionKind, SamplingPlan};

/// Why a region fell back. Logged, never returned to the pipeline.
#[derive(Error, Debug)]
pub enum SampleError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
    #[error("image has no pixels")]
    EmptyImage,
    #[error("region {region:?} exceeds the decoded {width}x{height} image")]
    OutOfBounds {
        region: ClampedRegion,
        width: u32,
        height: u32,
    },
    #[error("expected at least 3 color channels, got {0}")]
    NotColor(u8),
}

/// One color per planned region, each either measured or the fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionColors {
    pub hair: ColorSample,
    pub eyes: ColorSample,
    pub outfit: ColorSample,
}

impl RegionColors {
    pub fn all_fallback() -> Self {
        Self {
            hair: ColorSample::Fallback,
            eyes: ColorSample::Fallback,
            outfit: ColorSample::Fallback,
        }
    }

    pub fn set(&mut self, kind: RegionKind, sample: ColorSample) {
        match kind {
            RegionKind::Hair => self.hair = sample,
            RegionKind::Eyes => self.eyes = sample,
            RegionKind::Outfit => self.outfit = sample,
        }
    }

    pub fn fallback_count(&self) -> usize {
        [self.hair, self.eyes, self.outfit]
            .iter()
            .filter(|s| s.is_fallback())
            .count()
    }
}

/// Fetches an image, clamps a region into it and averages its color.
///
/// Never fails: every error path yields [`ColorSample::Fallback`]. Each
/// call fetches and decodes the image on its own, so calls are independent
/// and can run on separate threads.
pub struct BoundedColorSampler {
    fetcher: Arc<dyn ImageFetcher>,
    cancelled: Arc<AtomicBool>,
}

impl BoundedColorSampler {
    pub fn new(fetcher: Arc<dyn ImageFetcher>) -> Self {
        Self {
            fetcher,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Once `flag` is set, samples that have not finished fetching give up
    /// and return the fallback.
    pub fn with_cancellation(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancelled = flag;
        self
    }

    pub fn sample(
        &self,
        locator: &str,
        region: &Region,
        img_width: u32,
        img_height: u32,
    ) -> ColorSample {
        self.sample_labeled("region", locator, region, img_width, img_height)
    }

    /// Samples every region of `plan`, either on scoped threads or one
    /// after another. Results land in their own slot regardless of order.
    pub fn sample_plan(
        &self,
        locator: &str,
        plan: &SamplingPlan,
        img_width: u32,
        img_height: u32,
        concurrent: bool,
    ) -> RegionColors {
        let mut colors = RegionColors::all_fallback();

        if !concurrent {
            for (kind, region) in plan.regions() {
                let label = kind.to_string();
                colors.set(
                    kind,
                    self.sample_labeled(&label, locator, &region, img_width, img_height),
                );
            }
            return colors;
        }

        let (tx, rx) = crossbeam_channel::bounded::<(RegionKind, ColorSample)>(3);
        std::thread::scope(|scope| {
            for (kind, region) in plan.regions() {
                let tx = tx.clone();
                scope.spawn(move || {
                    let label = kind.to_string();
                    let sample =
                        self.sample_labeled(&label, locator, &region, img_width, img_height);
                    let _ = tx.send((kind, sample));
                });
            }
        });
        drop(tx);

        for (kind, sample) in rx.try_iter() {
            colors.set(kind, sample);
        }
        colors
    }

    fn sample_labeled(
        &self,
        label: &str,
        locator: &str,
        region: &Region,
        img_width: u32,
        img_height: u32,
    ) -> ColorSample {
        match self.try_sample(locator, region, img_width, img_height) {
            Ok(rgb) => ColorSample::Average(rgb),
            Err(e) => {
                log::warn!("Color sampling for {label} fell back to {FALLBACK_COLOR}: {e}");
                ColorSample::Fallback
            }
        }
    }

    fn try_sample(
        &self,
        locator: &str,
        region: &Region,
        img_width: u32,
        img_height: u32,
    ) -> Result<[u8; 3], SampleError> {
        self.check_cancelled(locator)?;
        let bytes = self.fetcher.fetch(locator)?;
        self.check_cancelled(locator)?;
        let frame = Frame::decode(&bytes)?;

        let clamped = region
            .clamp(img_width, img_height)
            .ok_or(SampleError::EmptyImage)?;
        log::debug!("Sampling {clamped:?} (requested {region:?})");
        average_color(&frame, &clamped)
    }

    fn check_cancelled(&self, locator: &str) -> Result<(), FetchError> {
        if self.cancelled.load(Ordering::Relaxed) {
            return Err(FetchError::Cancelled(locator.to_string()));
        }
        Ok(())
    }
}

/// Per-channel arithmetic mean over `region`, rounded to nearest.
///
/// Channels past the third (alpha) are ignored. The region must already
/// fit inside `frame`.
pub fn average_color(frame: &Frame, region: &ClampedRegion) -> Result<[u8; 3], SampleError> {
    if frame.channels() < 3 {
        return Err(SampleError::NotColor(frame.channels()));
    }
    let out_of_bounds = || SampleError::OutOfBounds {
        region: *region,
        width: frame.width(),
        height: frame.height(),
    };
    if region.width == 0
        || region.height == 0
        || region.x as u64 + region.width as u64 > frame.width() as u64
        || region.y as u64 + region.height as u64 > frame.height() as u64
    {
        return Err(out_of_bounds());
    }

    let view = frame.as_ndarray().ok_or(SampleError::EmptyImage)?;
    let (x0, y0) = (region.x as usize, region.y as usize);
    let (w, h) = (region.width as usize, region.height as usize);
    let crop = view.slice(s![y0..y0 + h, x0..x0 + w, 0..3]);

    let count = (w * h) as u64;
    let mut rgb = [0u8; 3];
    for (channel, out) in rgb.iter_mut().enumerate() {
        let sum: u64 = crop
            .index_axis(Axis(2), channel)
            .iter()
            .map(|&v| u64::from(v))
            .sum();
        *out = ((sum + count / 2) / count) as u8;
    }
    Ok(rgb)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Cursor;
    use std::sync::atomic::AtomicUsize;

    // --- Stubs ---

    struct StaticFetcher {
        bytes: Vec<u8>,
        calls: AtomicUsize,
    }

    impl StaticFetcher {
        fn new(bytes: Vec<u8>) -> Self {
            Self {
                bytes,
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl ImageFetcher for StaticFetcher {
        fn fetch(&self, _locator: &str) -> Result<Vec<u8>, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.bytes.clone())
        }
    }

    struct FailingFetcher;

    impl ImageFetcher for FailingFetcher {
        fn fetch(&self, locator: &str) -> Result<Vec<u8>, FetchError> {
            Err(FetchError::Io {
                path: locator.into(),
                source: std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused"),
            })
        }
    }

    /// Serves a different image per locator; unknown locators fail.
    struct MapFetcher(HashMap<String, Vec<u8>>);

    impl ImageFetcher for MapFetcher {
        fn fetch(&self, locator: &str) -> Result<Vec<u8>, FetchError> {
            self.0
                .get(locator)
                .cloned()
                .ok_or_else(|| FetchError::InvalidLocator(locator.to_string()))
        }
    }

    // --- Helpers ---

    fn png(img: image::RgbImage) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut buf, image::ImageFormat::Png)
            .unwrap();
        buf.into_inner()
    }

    fn solid_png(w: u32, h: u32, rgb: [u8; 3]) -> Vec<u8> {
        png(image::RgbImage::from_pixel(w, h, image::Rgb(rgb)))
    }

    /// Left half red, right half blue.
    fn split_png(w: u32, h: u32) -> Vec<u8> {
        png(image::RgbImage::from_fn(w, h, |x, _| {
            if x < w / 2 {
                image::Rgb([255, 0, 0])
            } else {
                image::Rgb([0, 0, 255])
            }
        }))
    }

    fn sampler(fetcher: impl ImageFetcher + 'static) -> BoundedColorSampler {
        BoundedColorSampler::new(Arc::new(fetcher))
    }

    fn plan() -> SamplingPlan {
        SamplingPlan {
            hair: Region::new(0.0, -10.0, 20.0, 10.0),
            eyes: Region::new(40.0, 40.0, 20.0, 20.0),
            outfit: Region::new(120.0, 120.0, 50.0, 50.0),
        }
    }

    // --- average_color ---

    #[test]
    fn test_average_of_uniform_crop() {
        let frame = Frame::decode(&solid_png(20, 20, [12, 34, 56])).unwrap();
        let region = Region::new(2.0, 3.0, 10.0, 10.0).clamp(20, 20).unwrap();
        assert_eq!(average_color(&frame, &region).unwrap(), [12, 34, 56]);
    }

    #[test]
    fn test_average_rounds_to_nearest() {
        // Two pixels: 0 and 255 → 127.5 → 128
        let frame = Frame::new(vec![0, 0, 0, 255, 255, 255], 2, 1, 3);
        let region = ClampedRegion {
            x: 0,
            y: 0,
            width: 2,
            height: 1,
        };
        assert_eq!(average_color(&frame, &region).unwrap(), [128, 128, 128]);
    }

    #[test]
    fn test_average_ignores_alpha_channel() {
        let frame = Frame::new(vec![10, 20, 30, 0, 30, 40, 50, 255], 2, 1, 4);
        let region = ClampedRegion {
            x: 0,
            y: 0,
            width: 2,
            height: 1,
        };
        assert_eq!(average_color(&frame, &region).unwrap(), [20, 30, 40]);
    }

    #[test]
    fn test_average_only_reads_crop() {
        let frame = Frame::decode(&split_png(40, 20)).unwrap();
        let left = ClampedRegion {
            x: 0,
            y: 0,
            width: 20,
            height: 20,
        };
        let straddle = ClampedRegion {
            x: 10,
            y: 0,
            width: 20,
            height: 10,
        };
        assert_eq!(average_color(&frame, &left).unwrap(), [255, 0, 0]);
        assert_eq!(average_color(&frame, &straddle).unwrap(), [128, 0, 128]);
    }

    #[test]
    fn test_average_rejects_region_past_frame() {
        let frame = Frame::new(vec![0; 10 * 10 * 3], 10, 10, 3);
        let region = ClampedRegion {
            x: 5,
            y: 0,
            width: 10,
            height: 10,
        };
        assert!(matches!(
            average_color(&frame, &region),
            Err(SampleError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn test_average_rejects_grayscale() {
        let frame = Frame::new(vec![0; 4], 2, 2, 1);
        let region = ClampedRegion {
            x: 0,
            y: 0,
            width: 2,
            height: 2,
        };
        assert!(matches!(
            average_color(&frame, &region),
            Err(SampleError::NotColor(1))
        ));
    }

    // --- sample ---

    #[test]
    fn test_sample_measures_region() {
        let s = sampler(StaticFetcher::new(split_png(100, 50)));
        let sample = s.sample("img", &Region::new(60.0, 10.0, 20.0, 20.0), 100, 50);
        assert_eq!(sample, ColorSample::Average([0, 0, 255]));
        assert_eq!(sample.hex(), "#0000ff");
    }

    #[test]
    fn test_fetch_failure_yields_fallback() {
        let s = sampler(FailingFetcher);
        let sample = s.sample("https://x/img.png", &Region::new(0.0, 0.0, 20.0, 20.0), 100, 100);
        assert_eq!(sample, ColorSample::Fallback);
        assert_eq!(sample.hex(), FALLBACK_COLOR);
    }

    #[test]
    fn test_decode_failure_yields_fallback() {
        let s = sampler(StaticFetcher::new(b"<html>not found</html>".to_vec()));
        let sample = s.sample("img", &Region::new(0.0, 0.0, 20.0, 20.0), 100, 100);
        assert!(sample.is_fallback());
    }

    #[test]
    fn test_fully_out_of_bounds_region_samples_edge() {
        let s = sampler(StaticFetcher::new(split_png(100, 100)));
        let sample = s.sample("img", &Region::new(5000.0, 5000.0, 100.0, 100.0), 100, 100);
        // Clamped to the bottom-right pixel, which is blue
        assert_eq!(sample, ColorSample::Average([0, 0, 255]));
    }

    #[test]
    fn test_negative_region_samples_top_left() {
        let s = sampler(StaticFetcher::new(split_png(100, 100)));
        let sample = s.sample("img", &Region::new(-50.0, -50.0, 30.0, 30.0), 100, 100);
        assert_eq!(sample, ColorSample::Average([255, 0, 0]));
    }

    #[test]
    fn test_stale_dimensions_larger_than_image_fall_back() {
        // Caller believes the image is 500x500 but the fetched one is 50x50
        let s = sampler(StaticFetcher::new(solid_png(50, 50, [1, 2, 3])));
        let sample = s.sample("img", &Region::new(480.0, 480.0, 100.0, 100.0), 500, 500);
        assert!(sample.is_fallback());
    }

    #[test]
    fn test_zero_dimensions_fall_back() {
        let s = sampler(StaticFetcher::new(solid_png(50, 50, [1, 2, 3])));
        assert!(s.sample("img", &Region::new(0.0, 0.0, 10.0, 10.0), 0, 50).is_fallback());
    }

    #[test]
    fn test_each_sample_fetches_independently() {
        let fetcher = Arc::new(StaticFetcher::new(solid_png(10, 10, [9, 9, 9])));
        let s = BoundedColorSampler::new(fetcher.clone());
        let region = Region::new(0.0, 0.0, 10.0, 10.0);
        s.sample("img", &region, 10, 10);
        s.sample("img", &region, 10, 10);
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_cancelled_sampler_skips_fetch() {
        let fetcher = Arc::new(StaticFetcher::new(solid_png(10, 10, [9, 9, 9])));
        let flag = Arc::new(AtomicBool::new(true));
        let s = BoundedColorSampler::new(fetcher.clone()).with_cancellation(flag);
        let sample = s.sample("img", &Region::new(0.0, 0.0, 10.0, 10.0), 10, 10);
        assert!(sample.is_fallback());
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 0);
    }

    /// Raises the cancellation flag while the download is in flight.
    struct CancellingFetcher {
        bytes: Vec<u8>,
        flag: Arc<AtomicBool>,
    }

    impl ImageFetcher for CancellingFetcher {
        fn fetch(&self, _locator: &str) -> Result<Vec<u8>, FetchError> {
            self.flag.store(true, Ordering::SeqCst);
            Ok(self.bytes.clone())
        }
    }

    #[rstest::rstest]
    fn test_cancel_during_fetch_discards_result(#[values(true, false)] concurrent: bool) {
        let flag = Arc::new(AtomicBool::new(false));
        let fetcher = Arc::new(CancellingFetcher {
            bytes: solid_png(200, 200, [40, 50, 60]),
            flag: flag.clone(),
        });
        let s = BoundedColorSampler::new(fetcher).with_cancellation(flag);

        let colors = s.sample_plan("img", &plan(), 200, 200, concurrent);

        assert_eq!(colors, RegionColors::all_fallback());
    }

    // --- sample_plan ---

    #[test]
    fn test_plan_fills_each_slot_concurrently() {
        let fetcher = Arc::new(StaticFetcher::new(solid_png(200, 200, [40, 50, 60])));
        let s = BoundedColorSampler::new(fetcher.clone());
        let colors = s.sample_plan("img", &plan(), 200, 200, true);
        assert_eq!(colors.hair, ColorSample::Average([40, 50, 60]));
        assert_eq!(colors.eyes, ColorSample::Average([40, 50, 60]));
        assert_eq!(colors.outfit, ColorSample::Average([40, 50, 60]));
        assert_eq!(colors.fallback_count(), 0);
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_plan_sequential_matches_concurrent() {
        let s = sampler(StaticFetcher::new(split_png(200, 200)));
        let concurrent = s.sample_plan("img", &plan(), 200, 200, true);
        let sequential = s.sample_plan("img", &plan(), 200, 200, false);
        assert_eq!(concurrent, sequential);
        assert_eq!(concurrent.hair, ColorSample::Average([255, 0, 0]));
        assert_eq!(concurrent.outfit, ColorSample::Average([0, 0, 255]));
    }

    #[test]
    fn test_plan_all_fallback_when_fetch_fails() {
        let s = sampler(FailingFetcher);
        let colors = s.sample_plan("img", &plan(), 200, 200, true);
        assert_eq!(colors, RegionColors::all_fallback());
        assert_eq!(colors.fallback_count(), 3);
    }

    #[test]
    fn test_plan_failures_stay_per_region() {
        let mut images = HashMap::new();
        images.insert("good".to_string(), solid_png(200, 200, [7, 7, 7]));
        let s = sampler(MapFetcher(images));
        let good = s.sample_plan("good", &plan(), 200, 200, true);
        let bad = s.sample_plan("bad", &plan(), 200, 200, true);
        assert_eq!(good.fallback_count(), 0);
        assert_eq!(bad.fallback_count(), 3);
    }

    #[test]
    fn test_region_colors_set_targets_slot() {
        let mut colors = RegionColors::all_fallback();
        colors.set(RegionKind::Eyes, ColorSample::Average([1, 1, 1]));
        assert!(colors.hair.is_fallback());
        assert_eq!(colors.eyes, ColorSample::Average([1, 1, 1]));
        assert!(colors.outfit.is_fallback());
        assert_eq!(colors.fallback_count(), 2);
    }
}
