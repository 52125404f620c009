pub mod consts;
pub mod error;
pub mod frame;
pub mod color;
pub mod geometry;
pub mod layout;
pub mod region;
pub mod histogram;
pub mod profile;
pub mod classify;
pub mod pipeline;
pub mod overlay;
pub mod io;
