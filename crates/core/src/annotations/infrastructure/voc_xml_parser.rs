//! Pascal VOC annotation parsing.
//!
//! Only the `<object>` elements of the root `<annotation>` are read; each
//! contributes its `<name>` and `<bndbox>` corners. Everything else in the
//! document is ignored.

use serde::Deserialize;

use crate::shared::annotation::Annotation;
use crate::shared::bounding_box::BoundingBox;

#[derive(Deserialize)]
struct VocDocument {
    #[serde(rename = "object", default)]
    objects: Vec<VocObject>,
}

#[derive(Deserialize)]
struct VocObject {
    name: String,
    bndbox: VocBndBox,
}

#[derive(Deserialize)]
struct VocBndBox {
    xmin: f64,
    ymin: f64,
    xmax: f64,
    ymax: f64,
}

/// Parses a VOC XML document into annotations tagged with `image_id`.
pub fn parse_voc(xml: &str, image_id: &str) -> Result<Vec<Annotation>, quick_xml::de::DeError> {
    let document: VocDocument = quick_xml::de::from_str(xml)?;
    Ok(document
        .objects
        .into_iter()
        .map(|o| {
            let b = o.bndbox;
            Annotation::new(
                image_id,
                o.name,
                BoundingBox::new(b.xmin, b.ymin, b.xmax, b.ymax),
            )
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_OBJECTS: &str = r#"
<annotation>
    <folder>images</folder>
    <filename>img1.jpg</filename>
    <size><width>640</width><height>480</height><depth>3</depth></size>
    <object>
        <name>cat</name>
        <pose>Unspecified</pose>
        <truncated>0</truncated>
        <difficult>0</difficult>
        <bndbox><xmin>10</xmin><ymin>20</ymin><xmax>110.5</xmax><ymax>220</ymax></bndbox>
    </object>
    <object>
        <name>dog</name>
        <bndbox><xmin>300</xmin><ymin>40</ymin><xmax>400</xmax><ymax>140</ymax></bndbox>
    </object>
</annotation>
"#;

    #[test]
    fn test_parses_objects_in_order() {
        let anns = parse_voc(TWO_OBJECTS, "img1").unwrap();
        assert_eq!(anns.len(), 2);
        assert_eq!(anns[0].label, "cat");
        assert_eq!(anns[0].bbox, BoundingBox::new(10.0, 20.0, 110.5, 220.0));
        assert_eq!(anns[1].label, "dog");
        assert_eq!(anns[1].bbox, BoundingBox::new(300.0, 40.0, 400.0, 140.0));
        assert!(anns.iter().all(|a| a.image_id == "img1"));
    }

    #[test]
    fn test_no_objects_is_empty() {
        let xml = "<annotation><filename>empty.jpg</filename></annotation>";
        assert!(parse_voc(xml, "empty").unwrap().is_empty());
    }

    #[test]
    fn test_coordinate_order_is_not_swapped() {
        let xml = r#"<annotation><object><name>x</name>
            <bndbox><ymax>4</ymax><xmax>3</xmax><ymin>2</ymin><xmin>1</xmin></bndbox>
            </object></annotation>"#;
        let anns = parse_voc(xml, "img").unwrap();
        assert_eq!(anns[0].bbox.as_array(), [1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_non_numeric_coordinate_fails() {
        let xml = r#"<annotation><object><name>x</name>
            <bndbox><xmin>a</xmin><ymin>2</ymin><xmax>3</xmax><ymax>4</ymax></bndbox>
            </object></annotation>"#;
        assert!(parse_voc(xml, "img").is_err());
    }

    #[test]
    fn test_missing_bndbox_fails() {
        let xml = "<annotation><object><name>x</name></object></annotation>";
        assert!(parse_voc(xml, "img").is_err());
    }

    #[test]
    fn test_truncated_document_fails() {
        assert!(parse_voc("<annotation><object><name>x</name>", "img").is_err());
    }
}
