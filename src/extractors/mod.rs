pub mod dood;
pub mod gogocdn;
pub mod mp4upload;
pub mod playlist;
pub mod streamwish;
pub mod unpacker;

pub use dood::DoodExtractor;
pub use gogocdn::GogoCdnExtractor;
pub use mp4upload::Mp4uploadExtractor;
pub use streamwish::StreamWishExtractor;
