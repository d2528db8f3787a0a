pub mod dither;
pub mod frame;
