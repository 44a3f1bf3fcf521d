//! Core library for the Sort Animator.
//!
//! A bubble sort runs over an array and yields a snapshot after every
//! exchange ([`sort`]). Each snapshot is rendered to a bar chart ([`render`]),
//! persisted as a PNG and finally stitched into a looping GIF ([`record`]).

pub mod config;
pub mod error;
pub mod record;
pub mod render;
pub mod sort;

pub use config::{AppConfig, BarScale, EncoderConfig, InputConfig, RenderConfig};
pub use error::{Result, SortAnimError};
pub use record::{EncodeSummary, FrameDirectory, FrameEncoder};
pub use render::{BarChartRenderer, FrameRenderer, PlotArea};
pub use sort::{
    bubble_sort_snapshots, collect_snapshots, count_exchanges, random_values,
    BubbleSortSnapshots, Snapshot,
};
