//! # Responsive Property Cascade
//!
//! Layout properties come in up to four forms: a base form (`direction`)
//! plus breakpoint-specific overrides (`desktopDirection`,
//! `tabletDirection`, `mobileDirection`). [`resolve`] is the only place
//! the fallback order between them is encoded:
//!
//! | breakpoint | lookup order |
//! |---|---|
//! | desktop | `desktop*` → base → `tablet*` → `mobile*` → default |
//! | tablet  | `tablet*` → base → `mobile*` → default |
//! | mobile  | `mobile*` → default |
//!
//! Renderers call it to compute effective layout values; the property
//! editor calls it to decide whether a value is inherited.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::Properties;

/// Viewport class a page is rendered or edited for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Breakpoint {
    #[default]
    Desktop,
    Tablet,
    Mobile,
}

impl Breakpoint {
    pub const ALL: [Breakpoint; 3] = [Breakpoint::Desktop, Breakpoint::Tablet, Breakpoint::Mobile];

    pub fn as_str(self) -> &'static str {
        match self {
            Breakpoint::Desktop => "desktop",
            Breakpoint::Tablet => "tablet",
            Breakpoint::Mobile => "mobile",
        }
    }

    /// Next breakpoint in desktop → tablet → mobile → desktop order
    pub fn next(self) -> Self {
        match self {
            Breakpoint::Desktop => Breakpoint::Tablet,
            Breakpoint::Tablet => Breakpoint::Mobile,
            Breakpoint::Mobile => Breakpoint::Desktop,
        }
    }

    /// Property key of the breakpoint-specific form, e.g. `tabletDirection`
    pub fn key(self, base: &str) -> String {
        let mut chars = base.chars();
        match chars.next() {
            Some(first) => format!("{}{}{}", self.as_str(), first.to_uppercase(), chars.as_str()),
            None => self.as_str().to_string(),
        }
    }

    /// Key the property editor writes to when editing `base` at this
    /// breakpoint. Desktop edits go to the base form.
    pub fn edit_key(self, base: &str) -> String {
        match self {
            Breakpoint::Desktop => base.to_string(),
            other => other.key(base),
        }
    }

    fn chain(self) -> &'static [Source] {
        use Source::*;
        match self {
            Breakpoint::Desktop => &[
                Override(Breakpoint::Desktop),
                Base,
                Override(Breakpoint::Tablet),
                Override(Breakpoint::Mobile),
            ],
            Breakpoint::Tablet => &[Override(Breakpoint::Tablet), Base, Override(Breakpoint::Mobile)],
            Breakpoint::Mobile => &[Override(Breakpoint::Mobile)],
        }
    }
}

impl fmt::Display for Breakpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which form of a responsive property supplied the effective value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// The breakpoint-specific form, e.g. `tabletDirection`
    Override(Breakpoint),
    /// The base form, e.g. `direction`
    Base,
    /// Nothing was set; the caller's default was used
    Default,
}

/// Effective value of a responsive property at one breakpoint
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved<'a> {
    pub value: &'a Value,
    pub source: Source,
}

impl Resolved<'_> {
    /// True when the value was not set for `breakpoint` itself.
    ///
    /// The base form counts as the desktop's own value.
    pub fn is_inherited(&self, breakpoint: Breakpoint) -> bool {
        match (self.source, breakpoint) {
            (Source::Override(bp), requested) => bp != requested,
            (Source::Base, Breakpoint::Desktop) => false,
            _ => true,
        }
    }
}

/// Resolve the effective value of `base` for `breakpoint`.
///
/// `null` values count as unset. Returns `None` only when nothing is set
/// and no default was supplied.
pub fn resolve<'a>(
    properties: &'a Properties,
    base: &str,
    breakpoint: Breakpoint,
    default: Option<&'a Value>,
) -> Option<Resolved<'a>> {
    for source in breakpoint.chain() {
        let key = match source {
            Source::Override(bp) => bp.key(base),
            _ => base.to_string(),
        };
        if let Some(value) = properties.get(&key).filter(|v| !v.is_null()) {
            return Some(Resolved {
                value,
                source: *source,
            });
        }
    }

    default.map(|value| Resolved {
        value,
        source: Source::Default,
    })
}

/// Convenience over [`resolve`] returning just the value
pub fn resolve_value<'a>(
    properties: &'a Properties,
    base: &str,
    breakpoint: Breakpoint,
    default: Option<&'a Value>,
) -> Option<&'a Value> {
    resolve(properties, base, breakpoint, default).map(|r| r.value)
}
