//! Input acquisition: audio extraction from video, and video download.

pub mod downloader;
pub mod extractor;

pub use downloader::download_video;
pub use extractor::AudioExtractor;
