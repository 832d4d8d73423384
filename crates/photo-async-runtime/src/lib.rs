use std::path::PathBuf;
use std::sync::Arc;

mod worker;

pub use worker::worker_task;

// Re-export types from the library crate
pub use photo_sheet::{
    CropJob, CroppedResult, Delivery, ImageSource, PrintSheet, SheetJob, SheetTicket, ShareTarget,
    Ticket,
};

/// Commands sent from the front end to the worker
#[derive(Debug)]
pub enum PhotoCommand {
    /// Read and decode a photo from disk
    LoadImage { ticket: Ticket, path: PathBuf },
    /// Rasterize the crop frame; the job carries its own ticket
    RenderCrop { job: CropJob },
    /// Tile a cropped photo onto a sheet. Queued requests are coalesced,
    /// only the newest one is rendered.
    RenderSheet { job: SheetJob },
    /// Share encoded bytes, or save them under `dir` when sharing fails
    Save {
        bytes: Arc<Vec<u8>>,
        filename: String,
        dir: PathBuf,
    },
}

/// Updates sent from the worker to the front end
#[derive(Debug, Clone)]
pub enum PhotoUpdate {
    ImageLoaded {
        ticket: Ticket,
        image: Arc<ImageSource>,
    },
    CropRendered {
        ticket: Ticket,
        result: Arc<CroppedResult>,
    },
    SheetRendered {
        ticket: SheetTicket,
        sheet: Arc<PrintSheet>,
    },
    Saved {
        filename: String,
        delivery: Delivery,
    },
    /// A job failed; `ticket` is set when the failing job had one
    Error {
        ticket: Option<Ticket>,
        message: String,
    },
}

impl PhotoUpdate {
    /// Ticket of the upload or crop job this update answers, if any
    pub fn ticket(&self) -> Option<Ticket> {
        match self {
            PhotoUpdate::ImageLoaded { ticket, .. } | PhotoUpdate::CropRendered { ticket, .. } => {
                Some(*ticket)
            }
            PhotoUpdate::SheetRendered { .. } | PhotoUpdate::Saved { .. } => None,
            PhotoUpdate::Error { ticket, .. } => *ticket,
        }
    }
}
