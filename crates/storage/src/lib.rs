//! Object storage for re-hosted media: Cloudflare R2 through its S3 API.

pub mod error;
pub mod mime;
pub mod r2;

pub use {
    error::{Error, Result},
    r2::{ObjectStore, R2Uploader, S3ObjectStore},
};
