pub mod in_memory_source;
pub mod voc_directory_source;
pub mod voc_xml_parser;
