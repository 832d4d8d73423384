//! Delivering finished files: share first, download as the fallback

use crate::io::save_bytes;
use crate::types::*;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;

pub type ShareFuture<'a> = Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>>;

/// A platform share capability (share sheet, messaging app, ...)
pub trait ShareTarget: Send + Sync {
    /// Whether sharing files is possible at all
    fn is_available(&self) -> bool;

    /// Share an encoded JPEG under `filename`
    fn share<'a>(&'a self, bytes: &'a [u8], filename: &'a str) -> ShareFuture<'a>;
}

/// Platform without a share capability
#[derive(Debug, Clone, Copy, Default)]
pub struct NoShare;

impl ShareTarget for NoShare {
    fn is_available(&self) -> bool {
        false
    }

    fn share<'a>(&'a self, _bytes: &'a [u8], _filename: &'a str) -> ShareFuture<'a> {
        Box::pin(async { Err(PhotoError::Share("sharing not available".to_string())) })
    }
}

/// How a file reached the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    Shared,
    /// Written to disk at this path
    Saved(PathBuf),
}

/// Offer `bytes` through `share` when available, otherwise (or when sharing
/// fails) save them to `download_dir/filename`.
pub async fn deliver(
    bytes: &[u8],
    filename: &str,
    share: &dyn ShareTarget,
    download_dir: impl AsRef<Path>,
) -> Result<Delivery> {
    if share.is_available() {
        match share.share(bytes, filename).await {
            Ok(()) => return Ok(Delivery::Shared),
            Err(e) => log::warn!("Sharing {} failed, saving instead: {}", filename, e),
        }
    }

    let path = save_bytes(bytes, download_dir, filename).await?;
    log::info!("Saved {}", path.display());
    Ok(Delivery::Saved(path))
}
