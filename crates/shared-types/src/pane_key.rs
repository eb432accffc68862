//! # Pane Key Codec
//!
//! Derives and parses the canonical composite identifier used throughout the
//! system: `TYPE-STATICID` for a base key, `TYPE-STATICID-INSTANCEID` for a
//! live pane instance.
//!
//! Codec functions never panic; malformed input yields an empty string or
//! `None` so callers on the render hot path can branch without unwinding.

/// Upper-cased type segment of a raw identifier.
///
/// Takes the segment before the first `-`, or the whole string when no `-`
/// is present. Empty input yields an empty string.
pub fn canonical_type(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }
    match raw.split_once('-') {
        Some((head, _)) => head.to_uppercase(),
        None => raw.to_uppercase(),
    }
}

/// Compose a registration key from its parts.
///
/// The type segment is canonicalized; the instance segment is omitted when
/// absent or empty. Returns an empty string when either required part is
/// missing.
pub fn compose_key(
    module_type: &str,
    static_identifier: &str,
    instance_id: Option<&str>,
) -> String {
    if module_type.is_empty() || static_identifier.is_empty() {
        return String::new();
    }
    let base = format!("{}-{}", canonical_type(module_type), static_identifier);
    match instance_id {
        Some(id) if !id.is_empty() => format!("{base}-{id}"),
        _ => base,
    }
}

/// A pane identifier decomposed into its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedPaneId {
    /// Type segment, as written in the identifier.
    pub module_type: String,
    /// Stable implementation name.
    pub static_identifier: String,
    /// Disambiguator for simultaneous panes; `None` for base keys.
    pub instance_id: Option<String>,
}

impl ParsedPaneId {
    /// Parse a pane identifier.
    ///
    /// Requires a `-` delimiter and at least two non-empty leading segments.
    /// Everything after the second segment is re-joined with `-` as the
    /// instance id, so instance ids may themselves contain `-`.
    pub fn parse(pane_id: &str) -> Option<Self> {
        if !pane_id.contains('-') {
            return None;
        }
        let mut parts = pane_id.split('-');
        let module_type = parts.next()?;
        let static_identifier = parts.next()?;
        if module_type.is_empty() || static_identifier.is_empty() {
            return None;
        }
        let rest: Vec<&str> = parts.collect();
        let instance_id = if rest.is_empty() {
            None
        } else {
            Some(rest.join("-"))
        };
        Some(Self {
            module_type: module_type.to_string(),
            static_identifier: static_identifier.to_string(),
            instance_id,
        })
    }

    /// Whether this identifier names a live pane instance (3-part key).
    pub fn is_instance(&self) -> bool {
        self.instance_id.is_some()
    }
}

/// Whether a key parses as a 3-part instance key.
pub fn is_instance_key(key: &str) -> bool {
    ParsedPaneId::parse(key).is_some_and(|parsed| parsed.is_instance())
}
