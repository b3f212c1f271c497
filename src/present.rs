use std::{
    fs, io,
    path::{Path, PathBuf},
};

use image::{ImageError, Rgb, RgbImage};
use indicatif::{ParallelProgressIterator, ProgressBar, ProgressStyle};
use log::info;
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use thiserror::Error;

use crate::{grid::FieldView, params::Color};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("cannot create output directory {}: {source}", .path.display())]
    CreateDir { path: PathBuf, source: io::Error },

    #[error("cannot write frame {}: {source}", .path.display())]
    Write { path: PathBuf, source: ImageError },
}

/// Map a cell to an 8-bit pixel. Channels are clamped to `[0, 1]`, so negative and saturated
/// intensities are displayed the same way an 8-bit texture would store them.
#[inline]
pub fn to_pixel(cell: &Color) -> Rgb<u8> {
    let byte = |v: f32| (v.max(0.0).min(1.0) * 255.0).round() as u8;
    Rgb([byte(cell[0]), byte(cell[1]), byte(cell[2])])
}

/// Render a field buffer into an image, one pixel per cell.
pub fn render(field: &FieldView<'_>) -> RgbImage {
    paint(field.width(), field.height(), field.cells())
}

// Field sides are capped at `u32::MAX` on construction, so the casts are lossless.
fn paint(width: usize, height: usize, cells: &[Color]) -> RgbImage {
    RgbImage::from_fn(width as u32, height as u32, |x, y| {
        to_pixel(&cells[y as usize * width + x as usize])
    })
}

/// A copy of the field taken between ticks, kept around to be rendered later.
#[derive(Debug, Clone)]
pub struct Frame {
    pub tick: u64,
    width: usize,
    height: usize,
    cells: Vec<Color>,
}

impl Frame {
    pub fn capture(field: &FieldView<'_>, tick: u64) -> Self {
        Frame {
            tick,
            width: field.width(),
            height: field.height(),
            cells: field.cells().to_vec(),
        }
    }

    pub fn render(&self) -> RgbImage {
        paint(self.width, self.height, &self.cells)
    }

    pub fn file_name(&self) -> String {
        format!("frame_{:06}.png", self.tick)
    }
}

/// Collects frames during a run and writes them out as PNG files at the end.
#[derive(Debug, Default)]
pub struct FrameRecorder {
    frames: Vec<Frame>,
}

impl FrameRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn capture(&mut self, field: &FieldView<'_>, tick: u64) {
        self.frames.push(Frame::capture(field, tick));
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Render every captured frame into `dir` in parallel and drop them afterwards. Returns the
    /// paths written, in capture order.
    pub fn render_all(&mut self, dir: &Path) -> Result<Vec<PathBuf>, ExportError> {
        fs::create_dir_all(dir).map_err(|source| ExportError::CreateDir {
            path: dir.to_path_buf(),
            source,
        })?;

        let pb = ProgressBar::new(self.frames.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} frames ({eta})")
                .progress_chars("#>-"),
        );

        let paths = self
            .frames
            .par_iter()
            .progress_with(pb.clone())
            .map(|frame| {
                let path = dir.join(frame.file_name());
                frame
                    .render()
                    .save(&path)
                    .map_err(|source| ExportError::Write {
                        path: path.clone(),
                        source,
                    })?;
                Ok(path)
            })
            .collect::<Result<Vec<_>, ExportError>>()?;
        pb.finish();

        info!("Wrote {} frames to {}", paths.len(), dir.display());
        self.frames.clear();
        Ok(paths)
    }
}
