/// Number of columns on a play field.
pub const FIELD_COLS: usize = 6;

/// Number of visible rows on a play field.
pub const FIELD_ROWS: usize = 12;

/// Hidden rows stacked above the visible field in the code matrix.
pub const FIELD_HIDDEN_ROWS: usize = 1;

/// Number of digit slots in a score area.
pub const SCORE_DIGITS: usize = 8;

/// Similarity at or below which every label is rejected and a cell is empty.
pub const DEFAULT_THRESHOLD: f64 = 0.15;

/// Height of the cell mask ellipse as a fraction of the cell height.
pub const DEFAULT_ELLIPSE_HEIGHT_RATIO: f64 = 0.8;

/// Name of the profile selected when none is configured.
pub const DEFAULT_PROFILE_NAME: &str = "puyo_aqua";

/// Joint HSV histogram bins: hue, saturation, value.
pub const DEFAULT_HSV_BINS: [usize; 3] = [18, 10, 10];

/// Upper bound on the flat length of a configured histogram.
pub const MAX_HISTOGRAM_BINS: usize = 1 << 24;

/// Hue range in the 8-bit HSV convention (degrees / 2).
pub const HUE_RANGE: (f32, f32) = (0.0, 180.0);

/// Saturation and value range in the 8-bit HSV convention.
pub const SV_RANGE: (f32, f32) = (0.0, 256.0);

/// Swatch width in the calibration image.
pub const SWATCH_WIDTH: usize = 64;

/// Swatch height in the calibration image.
pub const SWATCH_HEIGHT: usize = 60;

/// Distance between neighbouring swatch origins, horizontally and vertically.
pub const SWATCH_PITCH: usize = 72;

/// Samples per colored label in the calibration image.
pub const SWATCH_SAMPLES: usize = 16;

/// Column (in pitches) of the garbage swatch.
pub const GARBAGE_SWATCH_COLUMN: usize = 18;

/// Row (in pitches) of the garbage swatch.
pub const GARBAGE_SWATCH_ROW: usize = 1;

/// Number of garbage samples in the calibration image.
pub const GARBAGE_SWATCH_SAMPLES: usize = 1;

/// Small epsilon to avoid division by zero in floating-point comparisons.
pub const EPSILON: f64 = 1e-10;

/// Minimum cell count to classify with Rayon parallelism.
pub const PARALLEL_CELL_THRESHOLD: usize = 16;

/// Minimum pixel count (h*w) to convert color spaces with Rayon parallelism.
pub const PARALLEL_PIXEL_THRESHOLD: usize = 65_536;
