//! Paginated list results and the envelope shapes the backend wraps them in.
//!
//! Two list envelopes are in use:
//!
//! - `{ data: [...], meta: { current_page, last_page, per_page, total, from, to } }`
//!   (complaints, CCTV requests)
//! - `{ success, data: [...], current_page, last_page, total, per_page, from, to }`
//!   (collections)
//!
//! Each resource declares which one it uses through
//! [`Resource::ENVELOPE`](super::Resource::ENVELOPE). Both are normalized
//! into [`Page`] here and nowhere else.

use serde::{Deserialize, Serialize};

use crate::error::{FloranetError, Result};

/// Which list envelope an endpoint answers with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeShape {
    /// `{ data, meta: { ...counters } }`
    Meta,
    /// `{ success, data, ...counters }`
    Flat,
}

/// One page of records, replaced wholesale on every applied fetch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub current_page: u32,
    pub last_page: u32,
    pub per_page: u32,
    pub total: u64,
    /// 1-based index of the first item on this page, absent when empty
    pub from: Option<u64>,
    /// 1-based index of the last item on this page, absent when empty
    pub to: Option<u64>,
}

impl<T> Page<T> {
    /// Build a page from its items and pagination counters, deriving the
    /// range and last page the way the backend does.
    pub fn new(items: Vec<T>, current_page: u32, per_page: u32, total: u64) -> Self {
        let window = PageWindow::compute(current_page, per_page, total);
        Self {
            items,
            current_page,
            last_page: window.last_page,
            per_page,
            total,
            from: window.from,
            to: window.to,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn nav(&self) -> PageNav {
        PageNav {
            current_page: self.current_page,
            last_page: self.last_page,
        }
    }
}

/// Range arithmetic shared by normalization and in-memory backends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub from: Option<u64>,
    pub to: Option<u64>,
    pub last_page: u32,
}

impl PageWindow {
    pub fn compute(page: u32, per_page: u32, total: u64) -> Self {
        let page = page.max(1) as u64;
        let per_page = per_page.max(1) as u64;
        let last_page = total.div_ceil(per_page).max(1);

        let first = (page - 1) * per_page + 1;
        let (from, to) = if total == 0 || first > total {
            (None, None)
        } else {
            (Some(first), Some((page * per_page).min(total)))
        };

        Self {
            from,
            to,
            last_page: u32::try_from(last_page).unwrap_or(u32::MAX),
        }
    }

    /// Zero-based slice bounds of this page within the full result set
    pub fn slice_bounds(&self) -> Option<(usize, usize)> {
        match (self.from, self.to) {
            (Some(from), Some(to)) => Some((from as usize - 1, to as usize)),
            _ => None,
        }
    }
}

/// Previous/next availability, used by presentation layers to disable
/// out-of-range page buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageNav {
    pub current_page: u32,
    pub last_page: u32,
}

impl PageNav {
    pub fn has_prev(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.last_page
    }

    pub fn contains(&self, page: u32) -> bool {
        page >= 1 && page <= self.last_page
    }
}

#[derive(Debug, Deserialize)]
struct PaginationMeta {
    current_page: u32,
    last_page: u32,
    per_page: u32,
    total: u64,
    #[serde(default)]
    from: Option<u64>,
    #[serde(default)]
    to: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct MetaEnvelope<T> {
    data: Vec<T>,
    meta: PaginationMeta,
}

#[derive(Debug, Deserialize)]
struct FlatEnvelope<T> {
    #[serde(default = "default_success")]
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default = "Vec::new")]
    data: Vec<T>,
    #[serde(default)]
    current_page: Option<u32>,
    #[serde(default)]
    last_page: Option<u32>,
    #[serde(default)]
    per_page: Option<u32>,
    #[serde(default)]
    total: Option<u64>,
    #[serde(default)]
    from: Option<u64>,
    #[serde(default)]
    to: Option<u64>,
}

fn default_success() -> bool {
    true
}

/// Normalize a list response in the given envelope shape into a [`Page`].
///
/// A body that does not match the declared shape is an error; counters are
/// never guessed from the item count when a `meta` block is malformed.
pub fn parse_list_envelope<T>(body: serde_json::Value, shape: EnvelopeShape) -> Result<Page<T>>
where
    T: for<'de> Deserialize<'de>,
{
    if body.get("success").and_then(serde_json::Value::as_bool) == Some(false) {
        return Err(unsuccessful(
            body.get("message").and_then(|m| m.as_str()).map(str::to_string),
        ));
    }

    match shape {
        EnvelopeShape::Meta => {
            let MetaEnvelope { data, meta } = serde_json::from_value(body)?;
            let window = PageWindow::compute(meta.current_page, meta.per_page, meta.total);
            Ok(Page {
                items: data,
                current_page: meta.current_page,
                last_page: meta.last_page.max(1),
                per_page: meta.per_page,
                total: meta.total,
                from: meta.from.or(window.from),
                to: meta.to.or(window.to),
            })
        }
        EnvelopeShape::Flat => {
            let flat: FlatEnvelope<T> = serde_json::from_value(body)?;
            if !flat.success {
                return Err(unsuccessful(flat.message));
            }

            let count = flat.data.len();
            let current_page = flat.current_page.unwrap_or(1);
            let per_page = flat
                .per_page
                .unwrap_or_else(|| u32::try_from(count.max(1)).unwrap_or(u32::MAX));
            let total = flat.total.unwrap_or(count as u64);
            let window = PageWindow::compute(current_page, per_page, total);

            Ok(Page {
                items: flat.data,
                current_page,
                last_page: flat.last_page.unwrap_or(window.last_page).max(1),
                per_page,
                total,
                from: flat.from.or(window.from),
                to: flat.to.or(window.to),
            })
        }
    }
}

fn unsuccessful(message: Option<String>) -> FloranetError {
    FloranetError::Api {
        status: None,
        message: message.unwrap_or_else(|| "request was not successful".to_string()),
    }
}

/// `{ data: T }` or a bare `T`, as returned by single-record endpoints
pub fn parse_record_envelope<T>(body: serde_json::Value) -> Result<T>
where
    T: for<'de> Deserialize<'de>,
{
    let inner = unwrap_data(body);
    Ok(serde_json::from_value(inner)?)
}

/// Strip a `data` wrapper when present.
pub(crate) fn unwrap_data(body: serde_json::Value) -> serde_json::Value {
    match body {
        serde_json::Value::Object(mut map) if map.get("data").is_some_and(|d| d.is_object()) => {
            map.remove("data").unwrap_or_default()
        }
        other => other,
    }
}

/// The `{ success, data, message }` envelope used by community endpoints
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(default = "default_success")]
    pub success: bool,
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Turn an unsuccessful or empty envelope into an API error
    pub fn into_data(self) -> Result<T> {
        if !self.success {
            return Err(unsuccessful(self.message));
        }
        self.data.ok_or_else(|| FloranetError::Api {
            status: None,
            message: "response contained no data".to_string(),
        })
    }

    /// Accept an unsuccessful envelope as an error but ignore the payload
    pub fn into_unit(self) -> Result<()> {
        if self.success {
            Ok(())
        } else {
            Err(unsuccessful(self.message))
        }
    }
}
