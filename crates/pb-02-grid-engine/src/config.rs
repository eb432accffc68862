//! # Grid Configuration
//!
//! The single table of layout constants: column counts per breakpoint,
//! the global default pane size, minimum dimensions, and the module-type
//! size map. Nothing else in the workspace hardcodes these numbers.

use std::collections::BTreeMap;

use shared_types::{canonical_type, Breakpoint, Size};

/// Column and sizing configuration for the grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridConfig {
    columns: BTreeMap<Breakpoint, u32>,
    /// Size used when neither an override nor a type default applies.
    pub default_size: Size,
    /// Minimum dimensions stamped onto engine-created items.
    pub min_size: Size,
    type_sizes: BTreeMap<String, Size>,
}

impl GridConfig {
    /// Column count for a breakpoint.
    pub fn columns(&self, bp: Breakpoint) -> u32 {
        self.columns.get(&bp).copied().unwrap_or(1)
    }

    /// Override the column count for one breakpoint.
    #[must_use]
    pub fn with_columns(mut self, bp: Breakpoint, cols: u32) -> Self {
        self.columns.insert(bp, cols.max(1));
        self
    }

    /// Override or add a type-based default size.
    #[must_use]
    pub fn with_type_size(mut self, module_type: impl Into<String>, size: Size) -> Self {
        self.type_sizes.insert(canonical_type(&module_type.into()), size);
        self
    }

    /// Default size for a raw type identifier (possibly a full pane key).
    ///
    /// Falls back to the global default for unknown or empty types.
    pub fn size_for(&self, raw_type: &str) -> Size {
        let key = canonical_type(raw_type);
        if key.is_empty() {
            return self.default_size;
        }
        self.type_sizes.get(&key).copied().unwrap_or(self.default_size)
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        let columns = BTreeMap::from([
            (Breakpoint::Lg, 12),
            (Breakpoint::Md, 10),
            (Breakpoint::Sm, 6),
            (Breakpoint::Xs, 4),
            (Breakpoint::Xxs, 2),
        ]);
        let type_sizes = BTreeMap::from([
            ("SYSTEM".to_string(), Size::new(12, 8)),
            ("SERVICE".to_string(), Size::new(12, 8)),
            ("CPU".to_string(), Size::new(12, 6)),
            ("MEMORY".to_string(), Size::new(12, 6)),
            ("DISK".to_string(), Size::new(12, 8)),
            ("NETWORK".to_string(), Size::new(12, 8)),
            ("USER".to_string(), Size::new(12, 8)),
        ]);
        Self {
            columns,
            default_size: Size::new(12, 8),
            min_size: Size::new(3, 3),
            type_sizes,
        }
    }
}
