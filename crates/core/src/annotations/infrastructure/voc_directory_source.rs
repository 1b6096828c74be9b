use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use crate::annotations::domain::annotation_source::{AnnotationError, AnnotationSource};
use crate::annotations::infrastructure::voc_xml_parser::parse_voc;
use crate::shared::annotation::Annotation;

/// A directory of Pascal VOC files, one per image, named `<image_id>.<ext>`.
pub struct VocDirectorySource {
    root: PathBuf,
    extension: String,
}

impl VocDirectorySource {
    pub fn new(root: impl Into<PathBuf>, extension: &str) -> Result<Self, AnnotationError> {
        let root = root.into();
        if !root.is_dir() {
            return Err(AnnotationError::MissingDirectory(root));
        }
        Ok(Self {
            root,
            extension: extension.to_string(),
        })
    }

    pub fn annotation_path(&self, image_id: &str) -> PathBuf {
        self.root.join(format!("{image_id}.{}", self.extension))
    }

    fn image_id_of(&self, path: &Path) -> Option<String> {
        if !path.is_file() || path.extension() != Some(OsStr::new(&self.extension)) {
            return None;
        }
        match path.file_stem().and_then(OsStr::to_str) {
            Some(stem) => Some(stem.to_string()),
            None => {
                log::warn!(
                    "Skipping {}: file name is not valid UTF-8",
                    path.display()
                );
                None
            }
        }
    }
}

impl AnnotationSource for VocDirectorySource {
    fn describe(&self) -> String {
        self.root.display().to_string()
    }

    fn image_ids(&self) -> Result<Vec<String>, AnnotationError> {
        let entries = fs::read_dir(&self.root).map_err(|e| AnnotationError::Io {
            path: self.root.clone(),
            source: e,
        })?;

        let mut ids = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| AnnotationError::Io {
                path: self.root.clone(),
                source: e,
            })?;
            if let Some(id) = self.image_id_of(&entry.path()) {
                ids.push(id);
            }
        }
        ids.sort();
        log::debug!("{} annotation files in {}", ids.len(), self.root.display());
        Ok(ids)
    }

    fn load(&self, image_id: &str) -> Result<Vec<Annotation>, AnnotationError> {
        let path = self.annotation_path(image_id);
        if !path.is_file() {
            return Err(AnnotationError::NotFound(image_id.to_string()));
        }
        let xml = fs::read_to_string(&path).map_err(|e| AnnotationError::Io {
            path: path.clone(),
            source: e,
        })?;
        parse_voc(&xml, image_id).map_err(|e| AnnotationError::Parse { path, source: e })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::bounding_box::BoundingBox;

    fn write_voc(dir: &Path, name: &str, objects: &[(&str, [f64; 4])]) {
        let mut xml = String::from("<annotation>");
        for (label, b) in objects {
            xml.push_str(&format!(
                "<object><name>{label}</name><bndbox><xmin>{}</xmin><ymin>{}</ymin>\
                 <xmax>{}</xmax><ymax>{}</ymax></bndbox></object>",
                b[0], b[1], b[2], b[3]
            ));
        }
        xml.push_str("</annotation>");
        fs::write(dir.join(name), xml).unwrap();
    }

    #[test]
    fn test_missing_directory() {
        let result = VocDirectorySource::new("/nonexistent/annotations", "xml");
        assert!(matches!(result, Err(AnnotationError::MissingDirectory(_))));
    }

    #[test]
    fn test_image_ids_sorted_and_filtered_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        write_voc(dir.path(), "b.xml", &[]);
        write_voc(dir.path(), "a.xml", &[]);
        fs::write(dir.path().join("a.jpg"), b"not xml").unwrap();
        fs::write(dir.path().join("notes.txt"), b"hello").unwrap();
        fs::create_dir(dir.path().join("sub.xml")).unwrap();

        let source = VocDirectorySource::new(dir.path(), "xml").unwrap();
        assert_eq!(source.image_ids().unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn test_extension_is_case_sensitive() {
        let dir = tempfile::tempdir().unwrap();
        write_voc(dir.path(), "upper.XML", &[]);
        let source = VocDirectorySource::new(dir.path(), "xml").unwrap();
        assert!(source.image_ids().unwrap().is_empty());
    }

    #[test]
    fn test_load_preserves_order() {
        let dir = tempfile::tempdir().unwrap();
        write_voc(
            dir.path(),
            "img1.xml",
            &[("cat", [0.0, 0.0, 10.0, 10.0]), ("dog", [50.0, 50.0, 60.0, 60.0])],
        );
        let source = VocDirectorySource::new(dir.path(), "xml").unwrap();
        let anns = source.load("img1").unwrap();
        assert_eq!(anns.len(), 2);
        assert_eq!(anns[0].label, "cat");
        assert_eq!(anns[1].bbox, BoundingBox::new(50.0, 50.0, 60.0, 60.0));
    }

    #[test]
    fn test_load_unknown_image() {
        let dir = tempfile::tempdir().unwrap();
        let source = VocDirectorySource::new(dir.path(), "xml").unwrap();
        assert!(matches!(source.load("nope"), Err(AnnotationError::NotFound(_))));
    }

    #[test]
    fn test_load_malformed_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("bad.xml"), "<annotation><object>").unwrap();
        let source = VocDirectorySource::new(dir.path(), "xml").unwrap();
        let err = source.load("bad").unwrap_err();
        assert!(matches!(err, AnnotationError::Parse { .. }));
        assert!(err.to_string().contains("bad.xml"));
    }

    #[test]
    fn test_describe_is_root_path() {
        let dir = tempfile::tempdir().unwrap();
        let source = VocDirectorySource::new(dir.path(), "xml").unwrap();
        assert_eq!(source.describe(), dir.path().display().to_string());
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_non_utf8_file_name_is_skipped() {
        use std::os::unix::ffi::OsStrExt;

        let dir = tempfile::tempdir().unwrap();
        write_voc(dir.path(), "good.xml", &[("cat", [0.0, 0.0, 1.0, 1.0])]);
        let name = OsStr::from_bytes(b"bad\xff.xml");
        fs::write(dir.path().join(name), "<annotation/>").unwrap();

        let source = VocDirectorySource::new(dir.path(), "xml").unwrap();
        assert_eq!(source.image_ids().unwrap(), vec!["good".to_string()]);
    }
}
