//! # Placement Engine
//!
//! Pure functions over a [`LayoutSet`] and a [`GridConfig`]. Nothing here
//! throws; layout computation sits in the render path, so malformed input is
//! coerced rather than raised.

use serde_json::Value;
use shared_types::{Breakpoint, LayoutItem, LayoutSet, LayoutValidationError, Size};
use std::collections::BTreeMap;
use tracing::debug;

use crate::config::GridConfig;

/// Row bound for the first-fit scan. Densities past this fall back to
/// placement below the existing layout.
const MAX_SCAN_ROWS: u32 = 1000;

/// Upper bound on any coordinate or dimension accepted from a payload.
/// Values past this are not layout data; the item carrying them is dropped.
const MAX_GRID_UNIT: u32 = 10_000;

/// Axis-aligned overlap test between two placed items.
///
/// Items sharing the same id are never considered colliding with each other.
pub fn collides(a: &LayoutItem, b: &LayoutItem) -> bool {
    if a.i == b.i {
        return false;
    }
    // Saturating spans: items are constructible with arbitrary extents, and
    // the overlap test must stay total rather than overflow.
    !(a.x.saturating_add(a.w) <= b.x
        || a.x >= b.x.saturating_add(b.w)
        || a.y.saturating_add(a.h) <= b.y
        || a.y >= b.y.saturating_add(b.h))
}

fn region_is_free(items: &[LayoutItem], x: u32, y: u32, size: Size) -> bool {
    items.iter().all(|item| {
        x.saturating_add(size.w) <= item.x
            || x >= item.x.saturating_add(item.w)
            || y.saturating_add(size.h) <= item.y
            || y >= item.y.saturating_add(item.h)
    })
}

/// Row after the last occupied row, or 0 for an empty layout.
pub fn bottom_row(items: &[LayoutItem]) -> u32 {
    items
        .iter()
        .map(|item| item.y.saturating_add(item.h))
        .max()
        .unwrap_or(0)
}

/// First free position for an item of the given size.
///
/// Scans rows top-down and columns left-to-right, returning the first
/// position whose bounding box overlaps no existing item. Pathological
/// density falls back to `(0, bottom_row)` so placement always terminates.
pub fn first_fit(items: &[LayoutItem], cols: u32, size: Size) -> (u32, u32) {
    let max_col = cols.saturating_sub(size.w).saturating_add(1).max(1);
    for y in 0..=MAX_SCAN_ROWS {
        for x in 0..max_col {
            if region_is_free(items, x, y, size) {
                return (x, y);
            }
        }
    }
    (0, bottom_row(items))
}

/// Insert an item into every breakpoint with first-fit positioning.
///
/// Per breakpoint: skipped when an item with the same id already exists
/// there; the size is the per-breakpoint override when given, else the
/// type-based default derived from the id's type segment, else the global
/// default. Returns a new layout; the input is untouched.
pub fn insert(
    config: &GridConfig,
    layout: &LayoutSet,
    id: &str,
    size_overrides: Option<&BTreeMap<Breakpoint, Size>>,
) -> LayoutSet {
    if id.is_empty() {
        return layout.clone();
    }
    let mut result = layout.clone();
    for bp in Breakpoint::ALL {
        if result.contains(bp, id) {
            continue;
        }
        let size = size_overrides
            .and_then(|overrides| overrides.get(&bp).copied())
            .unwrap_or_else(|| config.size_for(id));
        let (x, y) = first_fit(result.items(bp), config.columns(bp), size);
        result.items_mut(bp).push(LayoutItem {
            i: id.to_string(),
            x,
            y,
            w: size.w,
            h: size.h,
            min_w: config.min_size.w.min(size.w),
            min_h: config.min_size.h.min(size.h),
        });
    }
    result
}

/// Remove an item from every breakpoint.
pub fn remove(layout: &LayoutSet, id: &str) -> LayoutSet {
    let mut result = layout.clone();
    for bp in Breakpoint::ALL {
        result.items_mut(bp).retain(|item| item.i != id);
    }
    result
}

/// Resize an item across all breakpoints, leaving positions untouched.
///
/// Either dimension may be omitted to keep its current value. Collision
/// resolution is not re-run; the engine trusts the caller's drag-resize
/// gesture to have avoided overlap.
pub fn resize(layout: &LayoutSet, id: &str, w: Option<u32>, h: Option<u32>) -> LayoutSet {
    let mut result = layout.clone();
    for bp in Breakpoint::ALL {
        for item in result.items_mut(bp).iter_mut() {
            if item.i == id {
                if let Some(w) = w {
                    item.w = w;
                }
                if let Some(h) = h {
                    item.h = h;
                }
            }
        }
    }
    result
}

fn grid_unit(value: &Value) -> Option<u32> {
    let n = if let Some(n) = value.as_u64() {
        u32::try_from(n).ok()?
    } else {
        let f = value
            .as_f64()
            .filter(|f| f.fract() == 0.0 && *f >= 0.0 && *f <= f64::from(u32::MAX))?;
        f as u32
    };
    (n <= MAX_GRID_UNIT).then_some(n)
}

fn coerce_item(value: &Value) -> Option<LayoutItem> {
    let obj = value.as_object()?;
    let id = obj.get("i")?.as_str()?;
    if id.is_empty() {
        return None;
    }
    Some(LayoutItem {
        i: id.to_string(),
        x: grid_unit(obj.get("x")?)?,
        y: grid_unit(obj.get("y")?)?,
        w: grid_unit(obj.get("w")?)?,
        h: grid_unit(obj.get("h")?)?,
        min_w: obj.get("minW").and_then(grid_unit).unwrap_or(1),
        min_h: obj.get("minH").and_then(grid_unit).unwrap_or(1),
    })
}

/// Coerce an untrusted payload into a well-formed [`LayoutSet`].
///
/// Missing or non-sequence breakpoints become empty sequences; items lacking
/// a non-empty id or numeric in-bound coordinates are dropped. This is the
/// function that restores the every-breakpoint-present invariant after data
/// arrives from the remote tier or a parsed storage string.
pub fn normalize(raw: &Value) -> LayoutSet {
    let mut result = LayoutSet::empty();
    let Some(obj) = raw.as_object() else {
        return result;
    };
    for bp in Breakpoint::ALL {
        let Some(items) = obj.get(bp.as_str()).and_then(Value::as_array) else {
            continue;
        };
        let dest = result.items_mut(bp);
        for raw_item in items {
            match coerce_item(raw_item) {
                Some(item) => dest.push(item),
                None => {
                    debug!(breakpoint = bp.as_str(), "Dropped invalid layout item");
                }
            }
        }
    }
    result
}

/// Strict structural check of a raw layout payload.
///
/// Unlike [`normalize`], nothing is coerced: every breakpoint must be
/// present as a sequence, and every item must carry a non-empty id and
/// numeric in-bound coordinates. Used at the save boundary so partial
/// corruption is never persisted.
pub fn validate_layout_value(raw: &Value) -> Result<(), LayoutValidationError> {
    let obj = raw.as_object().ok_or(LayoutValidationError::NotAnObject)?;
    for bp in Breakpoint::ALL {
        let value = obj
            .get(bp.as_str())
            .ok_or(LayoutValidationError::MissingBreakpoint {
                breakpoint: bp.as_str(),
            })?;
        let items = value.as_array().ok_or(LayoutValidationError::NotASequence {
            breakpoint: bp.as_str(),
        })?;
        for item in items {
            if coerce_item(item).is_none() {
                return Err(LayoutValidationError::InvalidItem {
                    breakpoint: bp.as_str(),
                });
            }
        }
    }
    Ok(())
}

/// Total item count across all breakpoints.
pub fn count_items(layout: &LayoutSet) -> usize {
    layout.iter().map(|(_, items)| items.len()).sum()
}

/// Stable reorder of every breakpoint's items by row, then column.
pub fn reorder_by_position(layout: &LayoutSet) -> LayoutSet {
    let mut result = layout.clone();
    for bp in Breakpoint::ALL {
        result
            .items_mut(bp)
            .sort_by(|a, b| a.y.cmp(&b.y).then(a.x.cmp(&b.x)));
    }
    result
}
