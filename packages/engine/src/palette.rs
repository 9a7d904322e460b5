//! Manager color legend.
//!
//! Managers are colored in order of first appearance in the partner list,
//! cycling through [`MANAGER_COLORS`].

use serde::Serialize;
use territory_map_area_models::PartnerLocation;

/// Colors handed out to managers, in order.
pub const MANAGER_COLORS: &[&str] = &[
    "#FF0000", "#0000FF", "#00FF00", "#FFD700", "#9400D3", "#00FFFF",
];

/// Color for partners without a manager.
pub const UNASSIGNED_MANAGER_COLOR: &str = "#666666";

/// One legend row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LegendEntry {
    pub manager_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manager_name: Option<String>,
    pub color: &'static str,
}

/// Stable manager-to-color assignment for one batch.
#[derive(Debug, Clone, Default)]
pub struct ManagerPalette {
    entries: Vec<LegendEntry>,
}

impl ManagerPalette {
    #[must_use]
    pub fn from_partners(partners: &[PartnerLocation]) -> Self {
        let mut palette = Self::default();

        for partner in partners {
            let Some(manager_id) = partner.manager_id.as_deref() else {
                continue;
            };
            if palette.position(manager_id).is_some() {
                continue;
            }

            let color = MANAGER_COLORS[palette.entries.len() % MANAGER_COLORS.len()];
            palette.entries.push(LegendEntry {
                manager_id: manager_id.to_string(),
                manager_name: partner.manager_name.clone(),
                color,
            });
        }

        palette
    }

    fn position(&self, manager_id: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.manager_id == manager_id)
    }

    /// Color for a manager. Unknown and missing managers get
    /// [`UNASSIGNED_MANAGER_COLOR`].
    #[must_use]
    pub fn color_for(&self, manager_id: Option<&str>) -> &'static str {
        manager_id
            .and_then(|id| self.position(id))
            .map_or(UNASSIGNED_MANAGER_COLOR, |i| self.entries[i].color)
    }

    /// Legend rows in order of first appearance.
    #[must_use]
    pub fn legend(&self) -> &[LegendEntry] {
        &self.entries
    }
}
