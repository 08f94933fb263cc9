//! The three hazard classification taxonomies and their fixed option set.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::AnnotationError;

/// Classification labels valid for the "other" override path.
///
/// TBC, PSPP and GR currently share one list. Entries keep their numeric
/// prefix, so "1. Deviasi Prosedur" and "5. Deviasi Prosedur" are distinct.
pub const TAXONOMY_OPTIONS: &[&str] = &[
    "1. Deviasi Prosedur",
    "2. Housekeeping",
    "3. Geotech & Geologi",
    "4. Posisi Pekerja",
    "5. Deviasi Prosedur",
    "6. Pengamanan",
    "7. LOTO",
    "8. Deviasi Road Safety",
    "9. Kesesuaian",
    "10. Tools Tidak Layak",
    "11. Bahaya Elektrikal",
    "12. Bahaya Kebakaran",
    "13. Aktivitas Drilling",
    "14. Technology",
    "15. Deviasi Lainnya",
];

/// One of the three independent taxonomies annotated per hazard task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Taxonomy {
    Tbc,
    Pspp,
    Gr,
}

impl Taxonomy {
    /// All taxonomies in column order.
    pub const ALL: [Taxonomy; 3] = [Taxonomy::Tbc, Taxonomy::Pspp, Taxonomy::Gr];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tbc => "tbc",
            Self::Pspp => "pspp",
            Self::Gr => "gr",
        }
    }

    /// Column header text.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Tbc => "TBC",
            Self::Pspp => "PSPP",
            Self::Gr => "GR",
        }
    }

    /// Valid labels for an "other" override in this taxonomy.
    pub fn options(&self) -> &'static [&'static str] {
        TAXONOMY_OPTIONS
    }

    pub fn is_option(&self, label: &str) -> bool {
        self.options().contains(&label)
    }
}

impl fmt::Display for Taxonomy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Taxonomy {
    type Err = AnnotationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tbc" => Ok(Self::Tbc),
            "pspp" => Ok(Self::Pspp),
            "gr" => Ok(Self::Gr),
            other => Err(AnnotationError::UnknownTaxonomy(other.to_string())),
        }
    }
}
