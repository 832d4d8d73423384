use crate::types::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Persistent settings: photo size and sheet configuration
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SheetSettings {
    pub crop: CropTarget,
    pub sheet: SheetConfig,
}

impl SheetSettings {
    /// Load settings from JSON file
    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let settings: Self = serde_json::from_slice(&bytes)
            .map_err(|e| PhotoError::Config(format!("Failed to parse settings: {}", e)))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Save settings to JSON file
    #[cfg(feature = "serde")]
    pub async fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| PhotoError::Config(format!("Failed to serialize settings: {}", e)))?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<()> {
        let positive = |v: f32| v.is_finite() && v > 0.0;
        let non_negative = |v: f32| v.is_finite() && v >= 0.0;

        if !positive(self.crop.width_mm) || !positive(self.crop.height_mm) {
            return Err(PhotoError::Config(
                "Photo width and height must be positive".to_string(),
            ));
        }

        self.crop.checked_pixel_size()?;

        let sheet = &self.sheet;
        if !positive(sheet.paper_width_mm) || !positive(sheet.paper_height_mm) {
            return Err(PhotoError::Config(
                "Paper width and height must be positive".to_string(),
            ));
        }
        sheet.checked_pixel_size()?;

        if !non_negative(sheet.margin_mm) || !non_negative(sheet.gap_mm) {
            return Err(PhotoError::Config(
                "Margin and gap must not be negative".to_string(),
            ));
        }

        if let Some((w, h)) = sheet.preset.dimensions_mm() {
            if (w, h) != (sheet.paper_width_mm, sheet.paper_height_mm) {
                return Err(PhotoError::Config(format!(
                    "{} paper must be {}x{}mm; use Custom for other sizes",
                    sheet.preset.name(),
                    w,
                    h
                )));
            }
        }

        Ok(())
    }
}
