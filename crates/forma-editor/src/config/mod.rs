//! Editor configuration module
//!
//! This module handles projection, input, drawing, resize and history
//! settings. Every section falls back to its defaults when missing from the
//! config file.

mod manager;

pub use manager::{ConfigError, ConfigManager, SharedConfig, create_shared_config};

use forma_cad::{AssemblyOptions, PlaneFit};
use forma_scene::ShapeStyle;
use serde::{Deserialize, Serialize};

use crate::projector::ContinuationPlane;

/// Pointer projection settings
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ProjectionConfig {
    /// Distance of the first-point construction plane from the camera
    pub standoff_distance: f32,
    /// Distance along the view direction used when no plane can be hit
    pub fallback_distance: f32,
    /// Maximum distance of a continued point from the previous one
    pub max_segment_length: f32,
    /// Continuation plane used by the line tool
    pub line_plane: ContinuationPlane,
    /// Plane the rectangle tool drags its second corner in
    pub rectangle_plane: ContinuationPlane,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            standoff_distance: 10.0,
            fallback_distance: 10.0,
            max_segment_length: 5.0,
            line_plane: ContinuationPlane::FreeForm,
            rectangle_plane: ContinuationPlane::Horizontal,
        }
    }
}

/// Pointer input settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InputConfig {
    /// Two clicks closer than this are a double-click
    pub double_click_ms: u64,
    /// Pointer travel below which a press-release is a click, not a drag
    pub drag_threshold_px: f32,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            double_click_ms: 250,
            drag_threshold_px: 4.0,
        }
    }
}

/// What the line tool commits
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum LineOutput {
    /// Flat fill with a border (two points or more)
    #[default]
    Fill,
    /// Extruded prism (three points or more)
    Extrusion,
}

/// Drawing settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DrawingConfig {
    /// Initial point capacity of an in-progress polyline
    pub polyline_capacity: usize,
    /// Shape committed by the line tool
    pub line_output: LineOutput,
    /// Height of line-tool extrusions
    pub extrusion_height: f32,
    /// When set, the rectangle tool commits a box of this height
    pub box_height: Option<f32>,
    /// How free-form point sets are fitted to a plane
    pub plane_fit: PlaneFit,
    /// Border lift above the fill
    pub border_offset: f32,
    /// Colors of committed shapes
    pub style: ShapeStyle,
}

impl Default for DrawingConfig {
    fn default() -> Self {
        Self {
            polyline_capacity: 16,
            line_output: LineOutput::Fill,
            extrusion_height: 1.0,
            box_height: None,
            plane_fit: PlaneFit::BestFit,
            border_offset: 0.002,
            style: ShapeStyle::default(),
        }
    }
}

impl DrawingConfig {
    pub fn assembly_options(&self) -> AssemblyOptions {
        AssemblyOptions {
            plane_fit: self.plane_fit,
            border_offset: self.border_offset,
        }
    }
}

/// Extrude/extend tool settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResizeConfig {
    /// Smallest height or footprint scale a resize may produce
    pub min_value: f32,
    /// Height change per pixel of vertical drag
    pub height_per_pixel: f32,
    /// Scale change per pixel of lateral drag
    pub scale_per_pixel: f32,
    /// Change per arrow-key press
    pub nudge_step: f32,
}

impl Default for ResizeConfig {
    fn default() -> Self {
        Self {
            min_value: 0.1,
            height_per_pixel: 0.01,
            scale_per_pixel: 0.005,
            nudge_step: 0.1,
        }
    }
}

/// Undo history settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct HistoryConfig {
    /// Maximum number of entries kept (0 = unbounded)
    pub max_entries: usize,
}

/// Complete editor configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct EditorConfig {
    /// Configuration format version
    #[serde(default)]
    pub version: u32,
    #[serde(default)]
    pub projection: ProjectionConfig,
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub drawing: DrawingConfig,
    #[serde(default)]
    pub resize: ResizeConfig,
    #[serde(default)]
    pub history: HistoryConfig,
}

impl EditorConfig {
    /// Current configuration version
    pub const CURRENT_VERSION: u32 = 1;

    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            ..Default::default()
        }
    }
}
