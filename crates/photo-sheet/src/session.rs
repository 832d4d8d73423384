//! Step-by-step editing session
//!
//! Drives `upload → crop → result → print` and owns every piece of user
//! configuration. Decoding and rendering happen elsewhere (usually on a
//! worker); the session hands out a [`Ticket`] when a job starts and only
//! accepts a result whose ticket still matches the current state, so a late
//! callback can never overwrite newer state.

use crate::constants::{DEFAULT_CROP_HEIGHT_MM, DEFAULT_CROP_WIDTH_MM};
use crate::interaction::{InputEvent, ViewController};
use crate::layout::{Rect, Size, mapper};
use crate::render::{CropJob, CroppedResult, PrintSheet, SheetJob, SheetTicket, render_sheet};
use crate::types::*;
use std::sync::Arc;

/// Wizard step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Step {
    #[default]
    Upload,
    Crop,
    Result,
    Print,
}

/// Identifies the state a background job was started from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Ticket {
    /// Image generation at job start
    pub generation: u64,
    /// Monotonic job number
    pub job: u64,
}

/// Caches a value computed from a key, recomputing only when the key changes
#[derive(Debug, Clone)]
pub struct Memo<K, V> {
    entry: Option<(K, V)>,
}

impl<K, V> Default for Memo<K, V> {
    fn default() -> Self {
        Self { entry: None }
    }
}

impl<K: PartialEq, V: Clone> Memo<K, V> {
    /// Return the cached value for `key`, or compute and cache it.
    /// A failed computation leaves the cache untouched.
    pub fn get_or_try_compute<E>(
        &mut self,
        key: K,
        compute: impl FnOnce(&K) -> std::result::Result<V, E>,
    ) -> std::result::Result<V, E> {
        if let Some((cached_key, value)) = &self.entry {
            if *cached_key == key {
                return Ok(value.clone());
            }
        }

        let value = compute(&key)?;
        self.entry = Some((key, value.clone()));
        Ok(value)
    }

    pub fn invalidate(&mut self) {
        self.entry = None;
    }

    pub fn is_cached(&self, key: &K) -> bool {
        matches!(&self.entry, Some((k, _)) if k == key)
    }

    /// Store a value computed elsewhere
    pub fn insert(&mut self, key: K, value: V) {
        self.entry = Some((key, value));
    }
}

#[derive(Debug, Default)]
pub struct Session {
    step: Step,
    image: Option<Arc<ImageSource>>,
    /// Bumped whenever the image is replaced or discarded
    generation: u64,
    latest_upload: u64,
    latest_job: u64,
    /// Job number of the crop render in flight
    pending_crop: Option<u64>,

    crop_width: DimensionInput,
    crop_height: DimensionInput,
    view: ViewController,
    preview: Size,

    cropped: Option<Arc<CroppedResult>>,
    crop_revision: u64,

    sheet: SheetConfig,
    print_sheet: Memo<SheetTicket, Arc<PrintSheet>>,
}

impl Session {
    pub fn new() -> Self {
        Self {
            crop_width: DimensionInput::from(DEFAULT_CROP_WIDTH_MM),
            crop_height: DimensionInput::from(DEFAULT_CROP_HEIGHT_MM),
            ..Default::default()
        }
    }

    /// Start from saved settings
    pub fn with_settings(settings: &crate::SheetSettings) -> Self {
        let mut session = Self::new();
        session.crop_width = DimensionInput::from(settings.crop.width_mm);
        session.crop_height = DimensionInput::from(settings.crop.height_mm);
        session.sheet = settings.sheet;
        session
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn image(&self) -> Option<&Arc<ImageSource>> {
        self.image.as_ref()
    }

    /// True while a crop render is in flight
    pub fn is_processing(&self) -> bool {
        self.pending_crop.is_some()
    }

    pub fn cropped(&self) -> Option<&Arc<CroppedResult>> {
        self.cropped.as_ref()
    }

    // =========================================================================
    // Upload
    // =========================================================================

    /// Register a new upload; the decode result must come back with this ticket
    pub fn begin_upload(&mut self) -> Ticket {
        self.latest_job += 1;
        self.latest_upload = self.latest_job;
        Ticket {
            generation: self.generation,
            job: self.latest_upload,
        }
    }

    /// Accept a decoded image. Returns false if a newer upload superseded it.
    pub fn complete_upload(&mut self, ticket: Ticket, image: ImageSource) -> bool {
        if ticket.job != self.latest_upload {
            log::debug!("Ignoring stale upload (job {})", ticket.job);
            return false;
        }

        self.latest_upload = 0;
        self.generation += 1;
        self.image = Some(Arc::new(image));
        self.view.reset();
        self.clear_crop();
        self.pending_crop = None;
        self.step = Step::Crop;
        true
    }

    /// Decoding failed; forget the pending upload
    pub fn fail_upload(&mut self, ticket: Ticket) {
        if ticket.job == self.latest_upload {
            self.latest_upload = 0;
        }
    }

    // =========================================================================
    // Crop Editing
    // =========================================================================

    /// Width field text, as typed
    pub fn set_crop_width(&mut self, text: &str) {
        self.crop_width = DimensionInput::parse(text);
    }

    /// Height field text, as typed
    pub fn set_crop_height(&mut self, text: &str) {
        self.crop_height = DimensionInput::parse(text);
    }

    /// Crop size with defaults substituted for empty or invalid fields
    pub fn crop_target(&self) -> CropTarget {
        CropTarget::new(
            self.crop_width.or_default(DEFAULT_CROP_WIDTH_MM),
            self.crop_height.or_default(DEFAULT_CROP_HEIGHT_MM),
        )
    }

    /// Record the measured on-screen size of the crop frame
    pub fn set_preview_container(&mut self, size: Size) {
        self.preview = size;
    }

    pub fn preview_container(&self) -> Size {
        self.preview
    }

    /// Crop frame size for the available space
    pub fn preview_frame(&self, available_width: f32, viewport_height: f32) -> Size {
        mapper::preview_frame(&self.crop_target(), available_width, viewport_height)
    }

    /// Where the image sits inside the crop frame right now
    pub fn preview_rect(&self) -> Option<Rect> {
        let image = self.image.as_ref()?;
        Some(mapper::preview_rect(self.preview, image.size(), self.view.view()))
    }

    pub fn view(&self) -> &ViewTransform {
        self.view.view()
    }

    pub fn view_controller(&self) -> &ViewController {
        &self.view
    }

    /// Pointer or touch input on the crop frame
    pub fn input(&mut self, event: &InputEvent) -> bool {
        if self.step != Step::Crop {
            return false;
        }
        self.view.handle(event)
    }

    pub fn zoom_in(&mut self) {
        self.view.zoom_in();
    }

    pub fn zoom_out(&mut self) {
        self.view.zoom_out();
    }

    pub fn set_zoom_slider(&mut self, value: f32) {
        self.view.set_zoom_slider(value);
    }

    // =========================================================================
    // Crop Rendering
    // =========================================================================

    /// Capture a crop job. `None` if not cropping, no image, or a render
    /// is already in flight.
    pub fn start_crop(&mut self) -> Option<CropJob> {
        if self.step != Step::Crop || self.pending_crop.is_some() {
            return None;
        }
        let source = self.image.clone()?;

        self.latest_job += 1;
        self.pending_crop = Some(self.latest_job);
        Some(CropJob {
            ticket: Ticket {
                generation: self.generation,
                job: self.latest_job,
            },
            source,
            target: self.crop_target(),
            view: *self.view.view(),
            preview: self.preview,
        })
    }

    /// Accept a finished crop. Returns false when the result is stale.
    pub fn complete_crop(&mut self, ticket: Ticket, result: Result<CroppedResult>) -> bool {
        if ticket.generation != self.generation || self.pending_crop != Some(ticket.job) {
            log::debug!("Ignoring stale crop result (job {})", ticket.job);
            return false;
        }

        self.pending_crop = None;
        match result {
            Ok(cropped) => {
                self.cropped = Some(Arc::new(cropped));
                self.crop_revision += 1;
                self.step = Step::Result;
                true
            }
            Err(e) => {
                log::warn!("Crop failed: {}", e);
                false
            }
        }
    }

    fn clear_crop(&mut self) {
        self.cropped = None;
        self.crop_revision += 1;
        self.print_sheet.invalidate();
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Result → Print
    pub fn enter_print(&mut self) -> bool {
        if self.step == Step::Result && self.cropped.is_some() {
            self.step = Step::Print;
            true
        } else {
            false
        }
    }

    /// One step back: Print → Result, Result → Crop, Crop → Upload
    pub fn back(&mut self) {
        match self.step {
            Step::Print => self.step = Step::Result,
            Step::Result => self.step = Step::Crop,
            Step::Crop => self.reset(),
            Step::Upload => {}
        }
    }

    /// Discard the image and return to the upload step
    pub fn reset(&mut self) {
        self.image = None;
        self.generation += 1;
        self.pending_crop = None;
        self.view.reset();
        self.clear_crop();
        self.step = Step::Upload;
    }

    // =========================================================================
    // Print Sheet
    // =========================================================================

    pub fn sheet_config(&self) -> &SheetConfig {
        &self.sheet
    }

    pub fn select_preset(&mut self, preset: PaperPreset) {
        self.sheet.apply_preset(preset);
    }

    /// Paper width text; only editable on custom paper
    pub fn set_paper_width(&mut self, text: &str) {
        if self.sheet.preset == PaperPreset::Custom {
            self.sheet.paper_width_mm = DimensionInput::parse(text).or_zero();
        }
    }

    /// Paper height text; only editable on custom paper
    pub fn set_paper_height(&mut self, text: &str) {
        if self.sheet.preset == PaperPreset::Custom {
            self.sheet.paper_height_mm = DimensionInput::parse(text).or_zero();
        }
    }

    pub fn set_margin(&mut self, text: &str) {
        self.sheet.margin_mm = DimensionInput::parse(text).or_zero();
    }

    pub fn set_gap(&mut self, text: &str) {
        self.sheet.gap_mm = DimensionInput::parse(text).or_zero();
    }

    /// Inputs the print sheet currently depends on
    pub fn sheet_ticket(&self) -> SheetTicket {
        SheetTicket {
            generation: self.generation,
            crop_revision: self.crop_revision,
            config: self.sheet,
        }
    }

    /// Capture a sheet render for a worker. `None` without a cropped photo.
    pub fn start_sheet(&self) -> Option<SheetJob> {
        let crop = self.cropped.clone()?;
        Some(SheetJob {
            ticket: self.sheet_ticket(),
            crop,
        })
    }

    /// Accept a sheet rendered from `ticket`. Returns false when the image,
    /// the cropped photo or the sheet configuration changed since.
    pub fn complete_sheet(&mut self, ticket: SheetTicket, sheet: Arc<PrintSheet>) -> bool {
        if self.cropped.is_none() || ticket != self.sheet_ticket() {
            log::debug!(
                "Ignoring stale sheet (crop revision {})",
                ticket.crop_revision
            );
            return false;
        }

        self.print_sheet.insert(ticket, sheet);
        true
    }

    /// The print sheet for the current configuration.
    ///
    /// Rebuilt only when the sheet configuration or the cropped photo
    /// changed since the last call; otherwise the cached sheet is returned.
    pub fn print_sheet(&mut self) -> Result<Arc<PrintSheet>> {
        let cropped = self.cropped.clone().ok_or(PhotoError::NoCrop)?;
        let key = self.sheet_ticket();

        self.print_sheet.get_or_try_compute(key, |key| {
            render_sheet(&cropped.image, &key.config).map(Arc::new)
        })
    }

    /// Whether `print_sheet()` would return a cached sheet
    pub fn print_sheet_is_current(&self) -> bool {
        self.print_sheet.is_cached(&self.sheet_ticket())
    }

    /// Snapshot of the current settings, for saving
    pub fn settings(&self) -> crate::SheetSettings {
        crate::SheetSettings {
            crop: self.crop_target(),
            sheet: self.sheet,
        }
    }
}
