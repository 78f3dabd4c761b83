//! Input validation run before any estimation or layout work.

use super::PageGeometry;
use crate::error::{Error, Result};
use crate::model::{Document, FontRole, Image};

/// Check every documented range of the settings and sections.
///
/// Nothing is clamped: out-of-range values are reported so estimator and
/// layout numbers stay reproducible.
pub fn validate(doc: &Document) -> Result<()> {
    let settings = &doc.settings;

    for (name, value) in settings.margins.named() {
        if !value.is_finite() || value < 0.0 {
            return Err(Error::InvalidSettings(format!(
                "margin {} must be a non-negative number of centimeters, got {}",
                name, value
            )));
        }
    }

    for role in FontRole::ALL {
        let font = settings.font(role);
        if !font.size_pt.is_finite() || font.size_pt <= 0.0 {
            return Err(Error::InvalidSettings(format!(
                "{:?} font size must be positive, got {}",
                role, font.size_pt
            )));
        }
        if !font.line_height.is_finite() || font.line_height <= 0.0 {
            return Err(Error::InvalidSettings(format!(
                "{:?} line height must be positive, got {}",
                role, font.line_height
            )));
        }
    }

    let geometry = PageGeometry::from_settings(settings);
    if geometry.content_width() <= 0.0 || geometry.content_height() <= 0.0 {
        return Err(Error::InvalidSettings(format!(
            "margins leave no content box ({:.1} x {:.1} mm)",
            geometry.content_width(),
            geometry.content_height()
        )));
    }

    for section in &doc.sections {
        if !section.indentation.is_finite() || section.indentation < 0.0 {
            return Err(Error::section(
                &section.id,
                format!("indentation must be non-negative, got {}", section.indentation),
            ));
        }
        if !section.line_spacing.is_finite() || section.line_spacing < 1.0 {
            return Err(Error::section(
                &section.id,
                format!("line spacing must be at least 1, got {}", section.line_spacing),
            ));
        }
        let images = section
            .images
            .iter()
            .chain(section.subsections.iter().flat_map(|sub| sub.images.iter()));
        for image in images {
            check_image(&section.id, image)?;
        }
    }

    Ok(())
}

fn check_image(section_id: &str, image: &Image) -> Result<()> {
    if image.width_in_range() {
        Ok(())
    } else {
        Err(Error::section(
            section_id,
            format!(
                "image '{}' width must be 10-100 percent, got {}",
                image.id, image.width_percent
            ),
        ))
    }
}
