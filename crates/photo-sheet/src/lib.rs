pub mod constants;
pub mod export;
pub mod interaction;
pub mod io;
pub mod layout;
pub mod render;
pub mod session;
mod options;
mod types;

pub use export::{Delivery, NoShare, ShareFuture, ShareTarget, deliver};
pub use interaction::{DragState, InputEvent, ViewController};
pub use io::{decode_image, encode_jpeg, load_image, save_bytes};
pub use layout::{Rect, SheetLayout, SheetStatistics, Size, Vec2};
pub use options::*;
pub use render::{
    CropJob, CroppedResult, PrintSheet, SheetJob, SheetTicket, render_crop, render_crop_async,
    render_sheet, render_sheet_async,
};
pub use session::{Memo, Session, Step, Ticket};
pub use types::*;
