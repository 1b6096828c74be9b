pub mod annotation_source;
