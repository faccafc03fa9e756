pub mod transcoder;

pub use transcoder::AnimatedTranscoder;
