//! Asynchronous image measurement.
//!
//! Image metadata is the only step of a layout that may block. These helpers
//! await every image's size, in reading order, and then run the synchronous
//! flow engine over the resolved table.

use std::future::Future;
use std::path::PathBuf;

use super::decode::{size_from_bytes, source_bytes};
use super::engine::FlowEngine;
use super::measure::{ImageSize, ImageSizes};
use super::result::LayoutResult;
use super::validate::validate;
use crate::detect::{classify_source, ImageSource};
use crate::error::{ImageError, Result};
use crate::model::Document;

/// Looks up an image's intrinsic size without blocking.
pub trait AsyncImageMeasurer: Send + Sync {
    fn measure(&self, src: &str) -> impl Future<Output = Result<ImageSize, ImageError>> + Send;
}

/// Reads image headers with `tokio::fs`, and decodes `data:` URIs in place.
#[derive(Debug, Clone, Default)]
pub struct TokioFileMeasurer {
    base_dir: Option<PathBuf>,
}

impl TokioFileMeasurer {
    /// Create a measurer resolving relative paths against the working directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve relative paths against `dir`.
    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }
}

impl AsyncImageMeasurer for TokioFileMeasurer {
    async fn measure(&self, src: &str) -> Result<ImageSize, ImageError> {
        let bytes = match classify_source(src) {
            Some(ImageSource::File(path)) => {
                let path = match &self.base_dir {
                    Some(base) if path.is_relative() => base.join(path),
                    _ => path,
                };
                tokio::fs::read(&path)
                    .await
                    .map_err(|e| ImageError::new(src, e.to_string()))?
            }
            _ => source_bytes(src)?,
        };
        size_from_bytes(src, &bytes)
    }
}

/// Every image reference of `doc` in reading order, covers included when
/// `include_cover` is set.
pub fn image_sources(doc: &Document, include_cover: bool) -> Vec<&str> {
    let mut sources = Vec::new();
    if include_cover {
        sources.extend(doc.info.cover_image.as_deref());
    }
    for section in &doc.sections {
        sources.extend(section.images.iter().map(|i| i.src.as_str()));
        for sub in &section.subsections {
            sources.extend(sub.images.iter().map(|i| i.src.as_str()));
        }
    }
    if include_cover {
        sources.extend(doc.info.back_cover_image.as_deref());
    }
    sources
}

/// Await every image size, then lay out `doc` with `engine`.
///
/// Sizes are requested sequentially in reading order; a repeated reference
/// is measured once.
pub async fn render_async<M>(
    engine: &FlowEngine<'_>,
    doc: &Document,
    measurer: &M,
) -> Result<LayoutResult>
where
    M: AsyncImageMeasurer,
{
    validate(doc)?;
    let mut sizes = ImageSizes::new();
    for src in image_sources(doc, engine.options().include_cover) {
        if sizes.contains(src) {
            continue;
        }
        match measurer.measure(src).await {
            Ok(size) => sizes.insert(src, size),
            Err(err) => sizes.insert_error(src, err.reason),
        }
    }
    log::debug!("resolved {} image sizes", sizes.len());
    engine.render(doc, &sizes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::LayoutOptions;
    use crate::model::{Image, Section, Subsection};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Fixed {
        calls: AtomicUsize,
    }

    impl AsyncImageMeasurer for Fixed {
        async fn measure(&self, src: &str) -> Result<ImageSize, ImageError> {
            self.calls.fetch_add(1, Ordering::Relaxed);
            if src.ends_with(".broken") {
                Err(ImageError::new(src, "unreadable"))
            } else {
                Ok(ImageSize::new(100, 50))
            }
        }
    }

    fn doc() -> Document {
        let mut doc = Document::new().section(
            Section::chapter("c", "C")
                .with_image(Image::new("a", "a.png"))
                .with_image(Image::new("a2", "a.png"))
                .with_subsection(
                    Subsection::new("s", "S").with_image(Image::new("b", "b.broken")),
                ),
        );
        doc.info.cover_image = Some("cover.png".to_string());
        doc
    }

    #[test]
    fn test_image_sources_order() {
        let doc = doc();
        assert_eq!(
            image_sources(&doc, true),
            vec!["cover.png", "a.png", "a.png", "b.broken"]
        );
        assert_eq!(image_sources(&doc, false).len(), 3);
    }

    #[tokio::test]
    async fn test_render_async() {
        let measurer = Fixed {
            calls: AtomicUsize::new(0),
        };
        let engine = FlowEngine::new(LayoutOptions::new().sequential());
        let result = render_async(&engine, &doc(), &measurer).await.unwrap();
        assert_eq!(measurer.calls.load(Ordering::Relaxed), 3);
        assert_eq!(result.stats.images_placed, 3);
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.warnings[0].image_id, "b");
    }

    #[tokio::test]
    async fn test_tokio_file_measurer_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let measurer = TokioFileMeasurer::new().with_base_dir(dir.path());
        let err = measurer.measure("missing.png").await.unwrap_err();
        assert_eq!(err.image_id, "missing.png");
    }
}
