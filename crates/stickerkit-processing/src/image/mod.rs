pub mod converter;
pub mod resize;

pub use converter::StillImageConverter;
pub use resize::ImageResize;
