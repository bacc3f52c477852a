pub mod client;

pub use client::{sha1_file, Downloader};
