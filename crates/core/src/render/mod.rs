mod font;

use image::{Rgba, RgbaImage};

use crate::RenderConfig;

pub use font::{draw_text, text_width};

const BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);
const BAR: Rgba<u8> = Rgba([0, 0, 255, 255]);
const INK: Rgba<u8> = Rgba([0, 0, 0, 255]);
/// Fraction of each slot occupied by its bar.
const BAR_FILL: f64 = 0.8;

/// Turns one array state into a raster frame. Implementations must be pure:
/// the same inputs always produce the same pixels.
pub trait FrameRenderer {
    /// Renders `values` as frame `frame_number` (1-based). When `scale_max` is
    /// `None` the frame is scaled to its own maximum.
    fn render(&self, values: &[f64], frame_number: usize, scale_max: Option<f64>) -> RgbaImage;
}

/// Pixel rectangle of the plotting area inside the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlotArea {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    /// Row of the x-axis; bars end just above it.
    pub baseline: u32,
}

impl PlotArea {
    pub fn width(&self) -> u32 {
        self.right - self.left
    }

    pub fn height(&self) -> u32 {
        self.baseline - self.top
    }
}

/// Bar chart renderer: white canvas, blue bars, black axes and a `Step N`
/// title above the plot.
#[derive(Debug, Clone)]
pub struct BarChartRenderer {
    width: u32,
    height: u32,
}

impl BarChartRenderer {
    pub fn new(config: &RenderConfig) -> Self {
        Self {
            width: config.width,
            height: config.height,
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn plot_area(&self) -> PlotArea {
        PlotArea {
            left: self.width / 10,
            top: self.height / 8,
            right: self.width - self.width / 20,
            baseline: self.height - self.height / 10,
        }
    }

    /// Horizontal pixel span `[start, end)` of each of `count` bars.
    ///
    /// The last column of every slot stays empty, so neighbouring bars never
    /// touch as long as each slot is at least two pixels wide (see
    /// [`RenderConfig::max_bars`]).
    pub fn bar_spans(&self, count: usize) -> Vec<(u32, u32)> {
        if count == 0 {
            return Vec::new();
        }

        let area = self.plot_area();
        let slot = area.width() as f64 / count as f64;
        let gap = (slot * (1.0 - BAR_FILL) * 0.5).round() as u32;
        let edge = |i: usize| (area.left as f64 + slot * i as f64).round() as u32;

        (0..count)
            .map(|i| {
                let (slot_start, slot_end) = (edge(i), edge(i + 1));
                let start = slot_start + gap;
                let end = slot_end
                    .saturating_sub(gap)
                    .min(slot_end.saturating_sub(1))
                    .max(start + 1);
                (start, end.min(area.right))
            })
            .collect()
    }

    fn title_scale(&self) -> u32 {
        (self.height / 160).max(1)
    }

    fn draw_title(&self, canvas: &mut RgbaImage, frame_number: usize) {
        let title = format!("Step {frame_number}");
        let scale = self.title_scale();
        let text_w = text_width(&title, scale);
        let text_h = font::GLYPH_H * scale;
        let x = self.width.saturating_sub(text_w) / 2;
        let y = (self.plot_area().top.saturating_sub(text_h)) / 2;
        draw_text(canvas, x, y, &title, scale, INK);
    }

    fn draw_axes(&self, canvas: &mut RgbaImage) {
        let area = self.plot_area();
        font::fill_rect(canvas, area.left, area.baseline, area.width(), 1, INK);
        font::fill_rect(canvas, area.left.saturating_sub(1), area.top, 1, area.height() + 1, INK);
    }
}

impl FrameRenderer for BarChartRenderer {
    fn render(&self, values: &[f64], frame_number: usize, scale_max: Option<f64>) -> RgbaImage {
        let mut canvas = RgbaImage::from_pixel(self.width, self.height, BACKGROUND);
        let area = self.plot_area();

        let max = scale_max.unwrap_or_else(|| local_max(values));
        let plot_h = area.height() as f64;

        for (value, (start, end)) in values.iter().zip(self.bar_spans(values.len())) {
            let bar_h = if max > 0.0 && *value > 0.0 {
                ((value / max).min(1.0) * plot_h).round() as u32
            } else {
                0
            };
            font::fill_rect(
                &mut canvas,
                start,
                area.baseline - bar_h,
                end.saturating_sub(start),
                bar_h,
                BAR,
            );
        }

        self.draw_axes(&mut canvas);
        self.draw_title(&mut canvas, frame_number);
        canvas
    }
}

/// Largest value in the slice, or 0 for an empty slice.
pub fn local_max(values: &[f64]) -> f64 {
    values.iter().copied().fold(0.0, f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn renderer() -> BarChartRenderer {
        BarChartRenderer::new(&RenderConfig::default())
    }

    /// Counts contiguous runs of bar-coloured pixels along one row.
    fn count_bars(image: &RgbaImage, row: u32) -> usize {
        let mut bars = 0;
        let mut inside = false;
        for x in 0..image.width() {
            let is_bar = *image.get_pixel(x, row) == BAR;
            if is_bar && !inside {
                bars += 1;
            }
            inside = is_bar;
        }
        bars
    }

    fn column_height(image: &RgbaImage, x: u32, baseline: u32) -> u32 {
        (0..baseline)
            .rev()
            .take_while(|y| *image.get_pixel(x, *y) == BAR)
            .count() as u32
    }

    #[test]
    fn rerendering_is_deterministic_with_one_bar_per_value() {
        let renderer = renderer();
        let values = [12.0, 3.0, 49.0, 1.0, 27.0, 8.0, 33.0, 19.0, 5.0, 41.0];

        let first = renderer.render(&values, 4, None);
        let second = renderer.render(&values, 4, None);

        assert_eq!(first.dimensions(), (640, 480));
        assert_eq!(first.dimensions(), second.dimensions());
        assert_eq!(first.as_raw(), second.as_raw());

        let baseline = renderer.plot_area().baseline;
        assert_eq!(count_bars(&first, baseline - 1), values.len());
    }

    #[test]
    fn tallest_bar_fills_the_plot_when_scaled_per_frame() {
        let renderer = renderer();
        let area = renderer.plot_area();
        let image = renderer.render(&[10.0, 20.0], 1, None);
        let spans = renderer.bar_spans(2);

        assert_eq!(column_height(&image, spans[1].0, area.baseline), area.height());
        assert_eq!(column_height(&image, spans[0].0, area.baseline), area.height() / 2);
    }

    #[test]
    fn global_scale_shrinks_bars_below_the_frame_max() {
        let renderer = renderer();
        let area = renderer.plot_area();
        let image = renderer.render(&[10.0, 20.0], 1, Some(40.0));
        let spans = renderer.bar_spans(2);

        assert_eq!(column_height(&image, spans[1].0, area.baseline), area.height() / 2);
    }

    #[test]
    fn zero_and_empty_inputs_draw_no_bars() {
        let renderer = renderer();
        let baseline = renderer.plot_area().baseline;

        let empty = renderer.render(&[], 1, None);
        assert_eq!(count_bars(&empty, baseline - 1), 0);

        let zeros = renderer.render(&[0.0, 0.0, 0.0], 1, None);
        assert_eq!(count_bars(&zeros, baseline - 1), 0);
        assert_eq!(zeros.dimensions(), renderer.dimensions());
    }

    #[test]
    fn title_changes_with_frame_number() {
        let renderer = renderer();
        let values = [3.0, 1.0];
        let title_rows = renderer.plot_area().top;

        let one = renderer.render(&values, 1, None);
        let two = renderer.render(&values, 2, None);

        let differs = (0..title_rows)
            .flat_map(|y| (0..one.width()).map(move |x| (x, y)))
            .any(|(x, y)| one.get_pixel(x, y) != two.get_pixel(x, y));
        assert!(differs);
    }

    #[test]
    fn bar_spans_do_not_overlap() {
        let renderer = renderer();
        let max = RenderConfig::default().max_bars();
        for count in [1, 10, 100, 271, max] {
            let spans = renderer.bar_spans(count);
            assert_eq!(spans.len(), count);
            for (start, end) in &spans {
                assert!(start < end, "empty bar for n={count}");
            }
            for pair in spans.windows(2) {
                assert!(pair[0].1 < pair[1].0, "bars touch for n={count}");
            }
        }
    }

    #[test]
    fn every_value_gets_a_visible_bar_up_to_the_canvas_limit() {
        let renderer = renderer();
        let baseline = renderer.plot_area().baseline;
        for count in [100, 200, RenderConfig::default().max_bars()] {
            let values: Vec<f64> = (1..=count).map(|v| v as f64).collect();
            let image = renderer.render(&values, 1, None);
            assert_eq!(count_bars(&image, baseline - 1), count, "n={count}");
        }
    }
}
