pub mod config;
pub mod element;
pub mod error;
pub mod fingerprint;
pub mod image;
pub mod pipeline;
pub mod source;
pub mod wmf;
