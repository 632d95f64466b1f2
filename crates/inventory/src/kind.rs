use serde::{Deserialize, Serialize};

/// Category of catalog entry.
///
/// Capabilities are answered per kind. Only antibiotics are stocked today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    #[serde(rename = "antibiotico")]
    Antibiotic,
}

impl ItemKind {
    /// Stable machine tag (also the storage table name).
    pub fn tag(self) -> &'static str {
        match self {
            ItemKind::Antibiotic => "antibiotico",
        }
    }

    /// Human-readable label shown in views.
    pub fn label(self) -> &'static str {
        match self {
            ItemKind::Antibiotic => "Antibiótico",
        }
    }

    pub fn requires_prescription(self) -> bool {
        match self {
            ItemKind::Antibiotic => true,
        }
    }
}

impl core::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.tag())
    }
}
