use std::path::PathBuf;

use thiserror::Error;

use crate::shared::annotation::Annotation;

#[derive(Error, Debug)]
pub enum AnnotationError {
    #[error("annotation directory not found: {0}")]
    MissingDirectory(PathBuf),
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: quick_xml::de::DeError,
    },
    #[error("no annotation file for image '{0}'")]
    NotFound(String),
}

/// One of the two annotation sets being compared.
///
/// Yields, per image identifier, the image's annotations in file order.
/// Implementations must be shareable across worker threads.
pub trait AnnotationSource: Send + Sync {
    /// Human-readable origin (directory path, source name) for reports.
    fn describe(&self) -> String;

    /// Every image identifier the source has an annotation file for,
    /// sorted ascending.
    fn image_ids(&self) -> Result<Vec<String>, AnnotationError>;

    /// Annotations for one image, preserving the file's object order.
    fn load(&self, image_id: &str) -> Result<Vec<Annotation>, AnnotationError>;
}
