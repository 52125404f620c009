pub mod calibration;
pub mod label;
pub mod store;

pub use calibration::{build_profile, calibrate, Calibration, CalibrationReport, SwatchLayout};
pub use label::ColorLabel;
pub use store::{load_profile, ColorProfile, ProfileData, ProfileSet};
