//! # Layout Data Model
//!
//! Breakpoints, grid items, the per-breakpoint layout set, and the session
//! snapshot that persistence keeps consistent across tiers.
//!
//! The load-bearing contract of the whole system lives here: a [`LayoutSet`]
//! always maps **every** recognized breakpoint to a sequence. The type
//! enforces it by construction; `LayoutSet::from_map` re-seeds anything a
//! caller left out, and deserialization goes through the same path.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// A named responsive width tier.
///
/// The ordered, closed set of breakpoints every layout carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Breakpoint {
    /// Large desktop.
    Lg,
    /// Medium desktop.
    Md,
    /// Small / tablet.
    Sm,
    /// Extra small.
    Xs,
    /// Narrowest tier.
    Xxs,
}

impl Breakpoint {
    /// All breakpoints, widest first.
    pub const ALL: [Breakpoint; 5] = [
        Breakpoint::Lg,
        Breakpoint::Md,
        Breakpoint::Sm,
        Breakpoint::Xs,
        Breakpoint::Xxs,
    ];

    /// Wire name of the breakpoint.
    pub fn as_str(&self) -> &'static str {
        match self {
            Breakpoint::Lg => "lg",
            Breakpoint::Md => "md",
            Breakpoint::Sm => "sm",
            Breakpoint::Xs => "xs",
            Breakpoint::Xxs => "xxs",
        }
    }

    /// Resolve a wire name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "lg" => Some(Breakpoint::Lg),
            "md" => Some(Breakpoint::Md),
            "sm" => Some(Breakpoint::Sm),
            "xs" => Some(Breakpoint::Xs),
            "xxs" => Some(Breakpoint::Xxs),
            _ => None,
        }
    }
}

/// Width and height in grid units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    /// Width in columns.
    pub w: u32,
    /// Height in rows.
    pub h: u32,
}

impl Size {
    /// Construct a size.
    pub const fn new(w: u32, h: u32) -> Self {
        Self { w, h }
    }
}

fn default_min_dim() -> u32 {
    1
}

/// One placed item in a breakpoint's grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutItem {
    /// Pane identifier; unique within its breakpoint's collection.
    pub i: String,
    /// Column of the left edge.
    pub x: u32,
    /// Row of the top edge.
    pub y: u32,
    /// Width in columns.
    pub w: u32,
    /// Height in rows.
    pub h: u32,
    /// Minimum width the UI may resize to.
    #[serde(rename = "minW", default = "default_min_dim")]
    pub min_w: u32,
    /// Minimum height the UI may resize to.
    #[serde(rename = "minH", default = "default_min_dim")]
    pub min_h: u32,
}

impl LayoutItem {
    /// Item with minimums defaulted to 1.
    pub fn new(i: impl Into<String>, x: u32, y: u32, w: u32, h: u32) -> Self {
        Self {
            i: i.into(),
            x,
            y,
            w,
            h,
            min_w: default_min_dim(),
            min_h: default_min_dim(),
        }
    }
}

/// A structurally invalid layout or snapshot.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LayoutValidationError {
    /// The payload is not a JSON object.
    #[error("Layout payload is not an object")]
    NotAnObject,
    /// A recognized breakpoint key is absent.
    #[error("Missing breakpoint: {breakpoint}")]
    MissingBreakpoint {
        /// Name of the absent breakpoint.
        breakpoint: &'static str,
    },
    /// A breakpoint maps to something other than a sequence.
    #[error("Breakpoint {breakpoint} is not a sequence")]
    NotASequence {
        /// Name of the offending breakpoint.
        breakpoint: &'static str,
    },
    /// An item is missing its identifier or a numeric field.
    #[error("Invalid item in breakpoint {breakpoint}")]
    InvalidItem {
        /// Name of the breakpoint holding the item.
        breakpoint: &'static str,
    },
    /// An item id appears twice within one breakpoint.
    #[error("Duplicate item id {id} in breakpoint {breakpoint}")]
    DuplicateItemId {
        /// Name of the breakpoint holding the duplicates.
        breakpoint: &'static str,
        /// The repeated identifier.
        id: String,
    },
    /// An item is smaller than its own minimums.
    #[error("Item {id} is {w}x{h}, below its minimum {min_w}x{min_h}")]
    SizeBelowMinimum {
        /// The offending item id.
        id: String,
        /// Actual width.
        w: u32,
        /// Actual height.
        h: u32,
        /// Minimum width.
        min_w: u32,
        /// Minimum height.
        min_h: u32,
    },
}

/// Mapping from every breakpoint to its ordered item sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct LayoutSet {
    items: BTreeMap<Breakpoint, Vec<LayoutItem>>,
}

impl LayoutSet {
    /// Empty layout with every breakpoint seeded.
    pub fn empty() -> Self {
        let mut items = BTreeMap::new();
        for bp in Breakpoint::ALL {
            items.insert(bp, Vec::new());
        }
        Self { items }
    }

    /// Build from a partial map, seeding any breakpoint the caller omitted.
    pub fn from_map(map: BTreeMap<Breakpoint, Vec<LayoutItem>>) -> Self {
        let mut set = Self { items: map };
        for bp in Breakpoint::ALL {
            set.items.entry(bp).or_default();
        }
        set
    }

    /// Items of one breakpoint.
    pub fn items(&self, bp: Breakpoint) -> &[LayoutItem] {
        self.items.get(&bp).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Mutable items of one breakpoint.
    pub fn items_mut(&mut self, bp: Breakpoint) -> &mut Vec<LayoutItem> {
        self.items.entry(bp).or_default()
    }

    /// Iterate breakpoints widest-first with their items.
    pub fn iter(&self) -> impl Iterator<Item = (Breakpoint, &[LayoutItem])> {
        Breakpoint::ALL.into_iter().map(|bp| (bp, self.items(bp)))
    }

    /// Whether the given breakpoint already holds an item with this id.
    pub fn contains(&self, bp: Breakpoint, id: &str) -> bool {
        self.items(bp).iter().any(|item| item.i == id)
    }

    /// First item with this id across breakpoints, widest-first.
    pub fn find_item(&self, id: &str) -> Option<(Breakpoint, &LayoutItem)> {
        for (bp, items) in self.iter() {
            if let Some(item) = items.iter().find(|item| item.i == id) {
                return Some((bp, item));
            }
        }
        None
    }

    /// Whether every breakpoint is empty.
    pub fn is_empty(&self) -> bool {
        self.iter().all(|(_, items)| items.is_empty())
    }

    /// Item-level structural validation.
    ///
    /// The all-breakpoints invariant holds by construction; this checks the
    /// parts the type cannot express: non-empty ids, per-breakpoint id
    /// uniqueness, and sizes at or above their minimums.
    pub fn validate(&self) -> Result<(), LayoutValidationError> {
        for (bp, items) in self.iter() {
            let mut seen: Vec<&str> = Vec::with_capacity(items.len());
            for item in items {
                if item.i.is_empty() {
                    return Err(LayoutValidationError::InvalidItem {
                        breakpoint: bp.as_str(),
                    });
                }
                if seen.contains(&item.i.as_str()) {
                    return Err(LayoutValidationError::DuplicateItemId {
                        breakpoint: bp.as_str(),
                        id: item.i.clone(),
                    });
                }
                if item.w < item.min_w || item.h < item.min_h {
                    return Err(LayoutValidationError::SizeBelowMinimum {
                        id: item.i.clone(),
                        w: item.w,
                        h: item.h,
                        min_w: item.min_w,
                        min_h: item.min_h,
                    });
                }
                seen.push(&item.i);
            }
        }
        Ok(())
    }
}

impl Default for LayoutSet {
    fn default() -> Self {
        Self::empty()
    }
}

impl<'de> Deserialize<'de> for LayoutSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let map = BTreeMap::<Breakpoint, Vec<LayoutItem>>::deserialize(deserializer)?;
        Ok(Self::from_map(map))
    }
}

/// Full persisted session state: layout plus module activation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// The arrangement across all breakpoints.
    #[serde(rename = "gridLayout", alias = "grid_layout")]
    pub grid_layout: LayoutSet,
    /// Pane identifiers currently activated.
    #[serde(rename = "activeModules", alias = "active_modules", default)]
    pub active_modules: Vec<String>,
}

impl SessionSnapshot {
    /// Snapshot with an empty layout and no active modules.
    pub fn empty() -> Self {
        Self {
            grid_layout: LayoutSet::empty(),
            active_modules: Vec::new(),
        }
    }

    /// Structural validation of the whole snapshot.
    pub fn validate(&self) -> Result<(), LayoutValidationError> {
        self.grid_layout.validate()
    }
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_layout_carries_every_breakpoint() {
        let layout = LayoutSet::empty();
        for bp in Breakpoint::ALL {
            assert!(layout.items(bp).is_empty());
        }
        assert!(layout.is_empty());
    }

    #[test]
    fn from_map_seeds_omitted_breakpoints() {
        let mut map = BTreeMap::new();
        map.insert(Breakpoint::Lg, vec![LayoutItem::new("SYSTEM-Super-a", 0, 0, 12, 8)]);
        let layout = LayoutSet::from_map(map);
        assert_eq!(layout.items(Breakpoint::Lg).len(), 1);
        assert!(layout.items(Breakpoint::Xxs).is_empty());
    }

    #[test]
    fn deserialization_restores_missing_breakpoints() {
        let layout: LayoutSet =
            serde_json::from_str(r#"{"lg":[{"i":"SYSTEM-Super-a","x":0,"y":0,"w":12,"h":8}]}"#)
                .unwrap();
        for bp in Breakpoint::ALL {
            let _ = layout.items(bp);
        }
        assert_eq!(layout.items(Breakpoint::Lg)[0].min_w, 1);
        assert!(layout.items(Breakpoint::Md).is_empty());
    }

    #[test]
    fn serialization_uses_wire_names() {
        let mut layout = LayoutSet::empty();
        layout
            .items_mut(Breakpoint::Lg)
            .push(LayoutItem::new("SYSTEM-Super-a", 0, 0, 12, 8));
        let value = serde_json::to_value(&layout).unwrap();
        assert!(value.get("lg").unwrap().is_array());
        assert!(value.get("xxs").unwrap().is_array());
        assert_eq!(value["lg"][0]["minW"], 1);
    }

    #[test]
    fn validate_rejects_duplicate_ids() {
        let mut layout = LayoutSet::empty();
        layout
            .items_mut(Breakpoint::Sm)
            .push(LayoutItem::new("SERVICE-Nvidia-z9", 0, 0, 4, 4));
        layout
            .items_mut(Breakpoint::Sm)
            .push(LayoutItem::new("SERVICE-Nvidia-z9", 4, 0, 2, 2));
        assert!(matches!(
            layout.validate(),
            Err(LayoutValidationError::DuplicateItemId { .. })
        ));
    }

    #[test]
    fn validate_rejects_sub_minimum_sizes() {
        let mut item = LayoutItem::new("SYSTEM-Super-a", 0, 0, 2, 2);
        item.min_w = 3;
        item.min_h = 3;
        let mut layout = LayoutSet::empty();
        layout.items_mut(Breakpoint::Lg).push(item);
        assert!(matches!(
            layout.validate(),
            Err(LayoutValidationError::SizeBelowMinimum { .. })
        ));
    }

    #[test]
    fn snapshot_accepts_snake_case_aliases() {
        let snapshot: SessionSnapshot = serde_json::from_str(
            r#"{"grid_layout":{"lg":[]},"active_modules":["SYSTEM-Super-a"]}"#,
        )
        .unwrap();
        assert_eq!(snapshot.active_modules.len(), 1);
    }
}
