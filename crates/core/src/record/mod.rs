//! Frame persistence and animation assembly.
//!
//! Frames are written one PNG per snapshot, then read back in index order and
//! stitched into a looping GIF. A failure part-way through leaves the frames
//! already written on disk; nothing is rolled back.

use std::{
    fs::{self, File},
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use image::{
    codecs::gif::{GifEncoder, Repeat},
    Delay, Frame, ImageFormat, RgbaImage,
};
use serde::{Deserialize, Serialize};

use crate::{
    render::{local_max, BarChartRenderer, FrameRenderer},
    BarScale, EncoderConfig, Result, Snapshot,
};

/// Quantizer speed handed to the GIF encoder (1 = best quality, 30 = fastest).
const GIF_SPEED: i32 = 10;

/// Directory used as a blob store keyed by frame index.
#[derive(Debug, Clone)]
pub struct FrameDirectory {
    root: PathBuf,
    prefix: String,
}

impl FrameDirectory {
    /// Opens `root`, creating it (and any parents) if missing.
    pub fn create(root: impl Into<PathBuf>, prefix: impl Into<String>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self {
            root,
            prefix: prefix.into(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn frame_path(&self, index: usize) -> PathBuf {
        self.root.join(format!("{}{index}.png", self.prefix))
    }

    pub fn animation_path(&self) -> PathBuf {
        self.root.join(format!("{}.gif", self.prefix))
    }

    pub fn write_frame(&self, index: usize, image: &RgbaImage) -> Result<PathBuf> {
        let path = self.frame_path(index);
        image.save_with_format(&path, ImageFormat::Png)?;
        Ok(path)
    }

    pub fn read_frame(&self, index: usize) -> Result<RgbaImage> {
        Ok(image::open(self.frame_path(index))?.into_rgba8())
    }

    /// Index encoded in a `<prefix><index>.png` file name.
    fn frame_index(&self, name: &str) -> Option<usize> {
        let digits = name
            .strip_prefix(self.prefix.as_str())?
            .strip_suffix(".png")?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse().ok()
    }

    /// Deletes frame files with an index of `keep` or above, left behind by an
    /// earlier run over more snapshots. Returns how many were removed.
    pub fn remove_frames_from(&self, keep: usize) -> Result<usize> {
        let mut removed = 0;
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            let name = entry.file_name();
            let Some(index) = name.to_str().and_then(|name| self.frame_index(name)) else {
                continue;
            };
            if index >= keep && entry.file_type()?.is_file() {
                fs::remove_file(entry.path())?;
                removed += 1;
            }
        }
        Ok(removed)
    }

    /// Deletes the animation file if present.
    pub fn remove_animation(&self) -> Result<bool> {
        match fs::remove_file(self.animation_path()) {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    /// Writes `frames` as an endlessly looping GIF, each shown for `delay_ms`.
    pub fn write_animation(&self, frames: Vec<RgbaImage>, delay_ms: u32) -> Result<PathBuf> {
        let path = self.animation_path();
        let mut writer = BufWriter::new(File::create(&path)?);
        {
            let mut encoder = GifEncoder::new_with_speed(&mut writer, GIF_SPEED);
            encoder.set_repeat(Repeat::Infinite)?;
            let delay = Delay::from_numer_denom_ms(delay_ms, 1);
            encoder.encode_frames(
                frames
                    .into_iter()
                    .map(|buffer| Frame::from_parts(buffer, 0, 0, delay)),
            )?;
        }
        writer.flush()?;
        Ok(path)
    }
}

/// Outcome of a successful encode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodeSummary {
    pub frame_count: usize,
    pub frame_paths: Vec<PathBuf>,
    /// `None` when there were no snapshots to animate.
    pub animation_path: Option<PathBuf>,
}

/// Renders snapshots to PNG frames and assembles them into a GIF.
#[derive(Debug, Clone)]
pub struct FrameEncoder<R = BarChartRenderer> {
    config: EncoderConfig,
    renderer: R,
}

impl FrameEncoder<BarChartRenderer> {
    pub fn new(config: EncoderConfig) -> Self {
        let renderer = BarChartRenderer::new(&config.render);
        Self { config, renderer }
    }
}

impl<R: FrameRenderer> FrameEncoder<R> {
    pub fn with_renderer(config: EncoderConfig, renderer: R) -> Self {
        Self { config, renderer }
    }

    /// Runs the whole pipeline over `snapshots`, which must be in emission
    /// order. Frames and an animation left in the directory by an earlier run
    /// are replaced; with no snapshots the directory ends up holding neither.
    pub fn encode<T>(&self, snapshots: &[Snapshot<T>]) -> Result<EncodeSummary>
    where
        T: Copy + Into<f64>,
    {
        self.config.validate()?;
        if let Some(first) = snapshots.first() {
            self.config.render.check_bar_count(first.len())?;
        }
        let store = FrameDirectory::create(&self.config.output_dir, self.config.prefix.clone())?;

        let scale_max = match self.config.render.scale {
            BarScale::PerFrame => None,
            BarScale::Global => Some(global_max(snapshots)),
        };

        let mut frame_paths = Vec::with_capacity(snapshots.len());
        for snapshot in snapshots {
            let values: Vec<f64> = snapshot.values().iter().map(|v| (*v).into()).collect();
            let image = self
                .renderer
                .render(&values, snapshot.frame_number(), scale_max);
            let path = store.write_frame(snapshot.index(), &image)?;
            tracing::debug!(index = snapshot.index(), path = %path.display(), "frame written");
            frame_paths.push(path);
        }

        let stale = store.remove_frames_from(snapshots.len())?;
        if stale > 0 {
            tracing::debug!(stale, "removed frames from an earlier run");
        }

        if snapshots.is_empty() {
            if store.remove_animation()? {
                tracing::debug!(path = %store.animation_path().display(), "removed stale animation");
            }
            tracing::warn!(dir = %store.root().display(), "no snapshots to encode; skipping animation");
            return Ok(EncodeSummary {
                frame_count: 0,
                frame_paths,
                animation_path: None,
            });
        }

        let frames = snapshots
            .iter()
            .map(|snapshot| store.read_frame(snapshot.index()))
            .collect::<Result<Vec<_>>>()?;
        let animation = store.write_animation(frames, self.config.frame_duration_ms)?;
        tracing::info!(
            frames = frame_paths.len(),
            path = %animation.display(),
            "animation written"
        );

        Ok(EncodeSummary {
            frame_count: frame_paths.len(),
            frame_paths,
            animation_path: Some(animation),
        })
    }
}

fn global_max<T: Copy + Into<f64>>(snapshots: &[Snapshot<T>]) -> f64 {
    snapshots
        .iter()
        .map(|snapshot| {
            let values: Vec<f64> = snapshot.values().iter().map(|v| (*v).into()).collect();
            local_max(&values)
        })
        .fold(0.0, f64::max)
}
