//! Field dictionary of recognised header keys
//!
//! Maps tokenizer keys to their output names, value kinds and unit rules.
//! The output layout is declared separately from the field table: top-level
//! order comes from [`LAYOUT`], and the order of a group's children comes
//! only from that group's child list. Neither depends on the order in which
//! a file writes its header lines.
//!
//! Raw PILATUS headers give lengths in metres; they are reported in
//! millimetres. Output names are a stable contract with the importer.

use crate::app::models::{Extract, FieldSpec, ValueKind};
use crate::constants::{SENSOR_THICKNESS_KEY, TIMESTAMP_KEY};
use crate::{Error, Result};
use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

/// Group holding the per-exposure acquisition parameters
pub const DATA_COLLECTION_GROUP: &str = "dataCollection";

const METRES_TO_MILLIMETRES: f64 = 1000.0;

/// Ordered set of fields rendered under one synthetic parent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupSpec {
    pub id: &'static str,
    pub output_name: &'static str,
    /// Header keys of the children, in output order
    pub children: &'static [&'static str],
}

/// One position in the top-level output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutSlot {
    /// An ungrouped field, by header key
    Field(&'static str),
    /// A group, by id
    Group(&'static str),
}

const fn text(header_key: &'static str, output_name: &'static str, extract: Extract) -> FieldSpec {
    FieldSpec {
        header_key,
        output_name,
        kind: ValueKind::Text,
        extract,
        unit_scale: None,
        source_unit: None,
        group: None,
    }
}

const fn float(
    header_key: &'static str,
    output_name: &'static str,
    decimals: usize,
    source_unit: Option<&'static str>,
) -> FieldSpec {
    FieldSpec {
        header_key,
        output_name,
        kind: ValueKind::Float { decimals },
        extract: Extract::FirstToken,
        unit_scale: None,
        source_unit,
        group: None,
    }
}

const fn integer(header_key: &'static str, output_name: &'static str) -> FieldSpec {
    FieldSpec {
        header_key,
        output_name,
        kind: ValueKind::Integer,
        extract: Extract::FirstToken,
        unit_scale: None,
        source_unit: None,
        group: None,
    }
}

const fn scaled(spec: FieldSpec, unit_scale: f64) -> FieldSpec {
    FieldSpec {
        unit_scale: Some(unit_scale),
        ..spec
    }
}

const fn grouped(spec: FieldSpec, group: &'static str) -> FieldSpec {
    FieldSpec {
        group: Some(group),
        ..spec
    }
}

/// Recognised keys, sorted by header key
pub const FIELD_SPECS: &[FieldSpec] = &[
    grouped(
        float("Angle_increment", "angleIncrement", 4, Some("deg.")),
        DATA_COLLECTION_GROUP,
    ),
    integer("Count_cutoff", "countCutoff"),
    text("Detector", "detectorType", Extract::CommaField(0)),
    grouped(
        scaled(
            float("Detector_distance", "detectorDistance", 1, Some("m")),
            METRES_TO_MILLIMETRES,
        ),
        DATA_COLLECTION_GROUP,
    ),
    grouped(
        float("Exposure_period", "exposurePeriod", 4, Some("s")),
        DATA_COLLECTION_GROUP,
    ),
    grouped(
        float("Exposure_time", "exposureTime", 4, Some("s")),
        DATA_COLLECTION_GROUP,
    ),
    text("Gain_setting", "gainSetting", Extract::Whole),
    integer("N_excluded_pixels", "excludedPixels"),
    grouped(
        integer("N_oscillations", "numberOfOscillations"),
        DATA_COLLECTION_GROUP,
    ),
    grouped(
        text("Oscillation_axis", "oscillationAxis", Extract::FirstToken),
        DATA_COLLECTION_GROUP,
    ),
    scaled(
        float("Pixel_size", "pixelSize", 3, Some("m")),
        METRES_TO_MILLIMETRES,
    ),
    scaled(
        float(SENSOR_THICKNESS_KEY, "sensorThickness", 2, Some("m")),
        METRES_TO_MILLIMETRES,
    ),
    grouped(
        float("Start_angle", "startAngle", 4, Some("deg.")),
        DATA_COLLECTION_GROUP,
    ),
    float("Threshold_setting", "thresholdEnergy", 0, Some("eV")),
    FieldSpec {
        kind: ValueKind::Timestamp,
        extract: Extract::FirstToken,
        ..text(TIMESTAMP_KEY, "collectionDate", Extract::FirstToken)
    },
    grouped(
        float("Wavelength", "wavelength", 5, Some("A")),
        DATA_COLLECTION_GROUP,
    ),
];

pub const GROUPS: &[GroupSpec] = &[GroupSpec {
    id: DATA_COLLECTION_GROUP,
    output_name: "dataCollection",
    children: &[
        "Wavelength",
        "Detector_distance",
        "Exposure_time",
        "Exposure_period",
        "Start_angle",
        "Angle_increment",
        "Oscillation_axis",
        "N_oscillations",
    ],
}];

/// Declared top-level output order
pub const LAYOUT: &[LayoutSlot] = &[
    LayoutSlot::Field("Detector"),
    LayoutSlot::Field(TIMESTAMP_KEY),
    LayoutSlot::Field(SENSOR_THICKNESS_KEY),
    LayoutSlot::Field("Pixel_size"),
    LayoutSlot::Field("Threshold_setting"),
    LayoutSlot::Field("Gain_setting"),
    LayoutSlot::Field("Count_cutoff"),
    LayoutSlot::Field("N_excluded_pixels"),
    LayoutSlot::Group(DATA_COLLECTION_GROUP),
];

static DICTIONARY: OnceLock<FieldDictionary> = OnceLock::new();

/// Read-only lookup table built from static spec, group and layout tables
#[derive(Debug)]
pub struct FieldDictionary {
    specs: &'static [FieldSpec],
    index: HashMap<&'static str, usize>,
    groups: &'static [GroupSpec],
    layout: &'static [LayoutSlot],
}

impl FieldDictionary {
    /// The process-wide dictionary for PILATUS CBF headers
    pub fn global() -> &'static FieldDictionary {
        DICTIONARY.get_or_init(|| {
            Self::new(FIELD_SPECS, GROUPS, LAYOUT).expect("Built-in field dictionary is inconsistent")
        })
    }

    /// Build a dictionary, checking that the tables agree with each other
    pub fn new(
        specs: &'static [FieldSpec],
        groups: &'static [GroupSpec],
        layout: &'static [LayoutSlot],
    ) -> Result<Self> {
        let mut index = HashMap::with_capacity(specs.len());
        for (position, spec) in specs.iter().enumerate() {
            if index.insert(spec.header_key, position).is_some() {
                return Err(Error::configuration(format!(
                    "Duplicate header key in field dictionary: {}",
                    spec.header_key
                )));
            }
        }

        let dictionary = Self {
            specs,
            index,
            groups,
            layout,
        };
        dictionary.check_layout()?;
        Ok(dictionary)
    }

    /// Every spec must be reachable exactly once through the layout
    fn check_layout(&self) -> Result<()> {
        let mut placed = HashSet::new();

        for slot in self.layout {
            match *slot {
                LayoutSlot::Field(key) => {
                    let spec = self.lookup(key).ok_or_else(|| {
                        Error::configuration(format!("Layout references unknown key: {}", key))
                    })?;
                    if spec.group.is_some() {
                        return Err(Error::configuration(format!(
                            "Grouped key placed at top level: {}",
                            key
                        )));
                    }
                    if !placed.insert(key) {
                        return Err(Error::configuration(format!("Key placed twice: {}", key)));
                    }
                }
                LayoutSlot::Group(id) => {
                    let group = self.group(id).ok_or_else(|| {
                        Error::configuration(format!("Layout references unknown group: {}", id))
                    })?;
                    for &key in group.children {
                        let spec = self.lookup(key).ok_or_else(|| {
                            Error::configuration(format!(
                                "Group {} references unknown key: {}",
                                id, key
                            ))
                        })?;
                        if spec.group != Some(id) {
                            return Err(Error::configuration(format!(
                                "Key {} listed in group {} but not tagged with it",
                                key, id
                            )));
                        }
                        if !placed.insert(key) {
                            return Err(Error::configuration(format!("Key placed twice: {}", key)));
                        }
                    }
                }
            }
        }

        if let Some(orphan) = self.specs.iter().find(|s| !placed.contains(s.header_key)) {
            return Err(Error::configuration(format!(
                "Key missing from layout: {}",
                orphan.header_key
            )));
        }

        Ok(())
    }

    /// Exact, case-sensitive lookup
    pub fn lookup(&self, header_key: &str) -> Option<&'static FieldSpec> {
        self.index.get(header_key).map(|&position| &self.specs[position])
    }

    pub fn group(&self, id: &str) -> Option<&'static GroupSpec> {
        self.groups.iter().find(|group| group.id == id)
    }

    pub fn layout(&self) -> &'static [LayoutSlot] {
        self.layout
    }

    /// All specs in table order
    pub fn specs(&self) -> &'static [FieldSpec] {
        self.specs
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Output names of the top-level fields and groups, in layout order
    pub fn top_level_names(&self) -> Vec<&'static str> {
        self.layout
            .iter()
            .filter_map(|slot| match *slot {
                LayoutSlot::Field(key) => self.lookup(key).map(|spec| spec.output_name),
                LayoutSlot::Group(id) => self.group(id).map(|group| group.output_name),
            })
            .collect()
    }
}
