//! Tests for result tree assembly

use super::super::assembler::{assemble, count_leaves};
use super::super::dictionary::FieldDictionary;
use crate::app::models::{FieldSpec, ResultField};

fn value(header_key: &str, value: &str) -> (&'static FieldSpec, String) {
    (
        FieldDictionary::global().lookup(header_key).unwrap(),
        value.to_string(),
    )
}

#[test]
fn test_empty_input_yields_no_fields() {
    let fields = assemble(FieldDictionary::global(), Vec::<(&FieldSpec, String)>::new());
    assert!(fields.is_empty());
}

#[test]
fn test_top_level_only() {
    let fields = assemble(
        FieldDictionary::global(),
        vec![value("Count_cutoff", "1048575"), value("Detector", "PILATUS 6M-F")],
    );

    assert_eq!(
        fields,
        vec![
            ResultField::leaf("detectorType", "PILATUS 6M-F"),
            ResultField::leaf("countCutoff", "1048575"),
        ]
    );
}

#[test]
fn test_group_children_in_declared_order() {
    let fields = assemble(
        FieldDictionary::global(),
        vec![
            value("N_oscillations", "1"),
            value("Start_angle", "0.0000"),
            value("Wavelength", "0.97780"),
            value("Detector_distance", "190.5"),
        ],
    );

    assert_eq!(fields.len(), 1);
    let group = &fields[0];
    assert_eq!(group.name, "dataCollection");
    assert!(group.value.is_empty());

    let names: Vec<&str> = group.children.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["wavelength", "detectorDistance", "startAngle", "numberOfOscillations"]
    );
}

#[test]
fn test_group_after_top_level_fields() {
    let fields = assemble(
        FieldDictionary::global(),
        vec![value("Wavelength", "0.97780"), value("Gain_setting", "high gain")],
    );

    assert_eq!(fields[0], ResultField::leaf("gainSetting", "high gain"));
    assert_eq!(fields[1].name, "dataCollection");
}

#[test]
fn test_absent_children_are_not_placeholders() {
    let fields = assemble(FieldDictionary::global(), vec![value("Exposure_time", "0.1000")]);

    assert_eq!(fields[0].children.len(), 1);
    assert!(fields[0].child("wavelength").is_none());
}

#[test]
fn test_first_value_wins() {
    let fields = assemble(
        FieldDictionary::global(),
        vec![
            value("Detector", "PILATUS 6M-F"),
            value("Detector", "EIGER 16M"),
        ],
    );

    assert_eq!(fields, vec![ResultField::leaf("detectorType", "PILATUS 6M-F")]);
}

#[test]
fn test_count_leaves() {
    let fields = assemble(
        FieldDictionary::global(),
        vec![
            value("Detector", "PILATUS 6M-F"),
            value("Wavelength", "0.97780"),
            value("N_oscillations", "1"),
        ],
    );

    assert_eq!(fields.len(), 2);
    assert_eq!(count_leaves(&fields), 3);
}
