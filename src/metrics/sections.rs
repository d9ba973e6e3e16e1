//! Dashboard section catalogs
//!
//! Each section lists its metrics in display order. A metric title is what
//! the standards document keys its rule by; the source says where the value
//! comes from.

use crate::standards::{BUILDING_SYSTEMS, FILE_SIZE_BREAKTHROUGH, GENERAL_STATISTICS, PERFORMANCE_IMPACTS};

/// Checks key of the row whose size cell is the model file size
pub const FILE_SIZE_KEY: &str = "File Size";

/// Where a metric's value is read from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricSource {
    /// Value column of the Checks row with this key (year-tolerant)
    CheckKey(&'static str),
    /// Size column of the "File Size" row, normalized to MB
    FileSizeCell,
    /// Number of families larger than 5 MB
    FamiliesOver5Mb,
    /// Sum of all defined family sizes (MB)
    TotalFamilyMb,
}

impl MetricSource {
    /// Whether the value is derived from the Elements table
    pub fn uses_elements(self) -> bool {
        matches!(self, MetricSource::FamiliesOver5Mb | MetricSource::TotalFamilyMb)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricSpec {
    pub title: &'static str,
    pub source: MetricSource,
}

const fn check(title: &'static str, key: &'static str) -> MetricSpec {
    MetricSpec {
        title,
        source: MetricSource::CheckKey(key),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionCatalog {
    pub name: &'static str,
    pub metrics: &'static [MetricSpec],
}

const GENERAL_STATISTICS_METRICS: &[MetricSpec] = &[
    MetricSpec {
        title: "File Size",
        source: MetricSource::FileSizeCell,
    },
    check("Total Element Count", "Total Model Elements Revit 2024"),
    check("Model Elements", "Elements Per Phase"),
    check("Annotative Elements", "Total Annotative Elements Revit 2024"),
    check("Imported Raster Images", "Raster Images"),
    check("Linked DWGs", "Linked CAD Files"),
    check("Model Groups", "Model Groups"),
    check("Detail Groups", "Detail Groups"),
    check("Design Options", "Design Options"),
    check("Number of Levels", "Levels"),
    check("Number of Grid Lines", "Grids"),
];

const PERFORMANCE_IMPACTS_METRICS: &[MetricSpec] = &[
    check("Errors & Warnings", "Warnings"),
    check("Imported DWG & SKP", "Imported CAD files"),
    check("Purgeable Elements", "Purgeable Elements"),
    check("Redundant and Unenclosed Rooms", "Redundant and Unenclosed Rooms"),
    check("Unplaced Rooms", "Unplaced Rooms"),
    check("Duplicate Modeled Elements", "Duplicate Modeled Elements"),
    check("Views Not On Sheets", "Views Not On Sheets"),
];

const BUILDING_SYSTEMS_METRICS: &[MetricSpec] = &[
    check("Unconnected Ducts", "Duct Systems That Are Not Connected"),
    check("Unconnected Pipe", "Piping Systems That Are Not Connected"),
    check("Unconnected Electrical", "Electrical Systems That Are Not Connected"),
    check("Non-native Object Styles", "Non built-in Object Styles"),
    check("Mirrored Elements", "Mirrored Elements"),
];

const FILE_SIZE_BREAKTHROUGH_METRICS: &[MetricSpec] = &[
    MetricSpec {
        title: "Families over 5 MB",
        source: MetricSource::FamiliesOver5Mb,
    },
    check("In-Place Families", "In-Place Families"),
    MetricSpec {
        title: "Total MB of Families",
        source: MetricSource::TotalFamilyMb,
    },
    check("Total Family Count", "Loadable Families"),
];

/// All sections in dashboard order
pub const SECTIONS: &[SectionCatalog] = &[
    SectionCatalog {
        name: GENERAL_STATISTICS,
        metrics: GENERAL_STATISTICS_METRICS,
    },
    SectionCatalog {
        name: PERFORMANCE_IMPACTS,
        metrics: PERFORMANCE_IMPACTS_METRICS,
    },
    SectionCatalog {
        name: BUILDING_SYSTEMS,
        metrics: BUILDING_SYSTEMS_METRICS,
    },
    SectionCatalog {
        name: FILE_SIZE_BREAKTHROUGH,
        metrics: FILE_SIZE_BREAKTHROUGH_METRICS,
    },
];

pub fn section_catalog(name: &str) -> Option<&'static SectionCatalog> {
    SECTIONS.iter().find(|section| section.name == name)
}
