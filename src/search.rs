//! Filter, sort and paginate engine.
//!
//! Everything here is a pure function of the bulk list and a [`FilterState`];
//! the caller owns the state and re-runs [`apply`] whenever it changes.

use std::cmp::Ordering;

use icu_collator::options::{CollatorOptions, Strength};
use icu_collator::{Collator, CollatorBorrowed};

use crate::source::UserSummary;

/// Page sizes offered by the page size selector.
pub const PAGE_SIZES: [usize; 3] = [5, 10, 20];

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Inactive,
}

impl StatusFilter {
    pub fn label(self) -> &'static str {
        match self {
            StatusFilter::All => "All",
            StatusFilter::Active => "Active",
            StatusFilter::Inactive => "Inactive",
        }
    }

    pub fn next(self) -> Self {
        match self {
            StatusFilter::All => StatusFilter::Active,
            StatusFilter::Active => StatusFilter::Inactive,
            StatusFilter::Inactive => StatusFilter::All,
        }
    }

    fn accepts(self, status: &str) -> bool {
        match self {
            StatusFilter::All => true,
            other => status == other.label(),
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum SortKey {
    #[default]
    NameAsc,
    NameDesc,
}

impl SortKey {
    pub fn label(self) -> &'static str {
        match self {
            SortKey::NameAsc => "Name A→Z",
            SortKey::NameDesc => "Name Z→A",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            SortKey::NameAsc => SortKey::NameDesc,
            SortKey::NameDesc => SortKey::NameAsc,
        }
    }
}

/// Operator-controlled view parameters. Lives for the session, never persisted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilterState {
    pub search_text: String,
    pub status_filter: StatusFilter,
    pub sort_key: SortKey,
    pub page_size: usize,
    pub current_page: usize,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            search_text: String::new(),
            status_filter: StatusFilter::All,
            sort_key: SortKey::NameAsc,
            page_size: 10,
            current_page: 1,
        }
    }
}

/// Result of one engine run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PageView {
    /// Filtered and sorted set, before pagination.
    pub filtered: Vec<UserSummary>,
    pub page: Vec<UserSummary>,
    pub total_pages: usize,
    pub current_page: usize,
}

/// Case-insensitive substring match on name, email and bio. `needle` must already be
/// trimmed and lower-cased; an empty needle matches everything.
pub fn matches_search(user: &UserSummary, needle: &str) -> bool {
    needle.is_empty()
        || user.name.to_lowercase().contains(needle)
        || user.email.to_lowercase().contains(needle)
        || user.bio.as_deref().unwrap_or("").to_lowercase().contains(needle)
}

thread_local! {
    static NAME_COLLATOR: Option<CollatorBorrowed<'static>> = {
        let mut options = CollatorOptions::default();
        options.strength = Some(Strength::Tertiary);
        match Collator::try_new(Default::default(), options) {
            Ok(collator) => Some(collator),
            Err(e) => {
                tracing::warn!(error = %e, "root collator unavailable; sorting by folded case");
                None
            }
        }
    };
}

/// Locale-aware name ordering (root collation, tertiary strength): accents and
/// case are secondary to the base letters, lowercase before uppercase on ties.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    NAME_COLLATOR.with(|collator| match collator {
        Some(collator) => collator.compare(a, b),
        None => fold_compare(a, b),
    })
}

fn fold_compare(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| b.cmp(a))
}

pub fn total_pages(count: usize, page_size: usize) -> usize {
    count.div_ceil(page_size.max(1))
}

/// The page the view should actually show: within `[1, max(1, total_pages)]`.
pub fn clamp_page(current: usize, total_pages: usize) -> usize {
    current.clamp(1, total_pages.max(1))
}

/// Run search, status filter, sort and pagination, in that order.
///
/// The page is sliced with `state.current_page` as given; callers correct an
/// out-of-range page with [`clamp_page`] and run the engine again.
pub fn apply(users: &[UserSummary], state: &FilterState) -> PageView {
    let needle = state.search_text.trim().to_lowercase();
    let mut filtered: Vec<UserSummary> = users
        .iter()
        .filter(|u| matches_search(u, &needle))
        .filter(|u| state.status_filter.accepts(&u.status))
        .cloned()
        .collect();

    // sort_by is stable, so equal names keep their filtered order in both directions
    match state.sort_key {
        SortKey::NameAsc => filtered.sort_by(|a, b| compare_names(&a.name, &b.name)),
        SortKey::NameDesc => filtered.sort_by(|a, b| compare_names(&b.name, &a.name)),
    }

    let page_size = state.page_size.max(1);
    let total = total_pages(filtered.len(), page_size);
    let current = state.current_page.max(1);
    let start = ((current - 1) * page_size).min(filtered.len());
    let end = (start + page_size).min(filtered.len());
    let page = filtered[start..end].to_vec();

    PageView {
        filtered,
        page,
        total_pages: total,
        current_page: current,
    }
}

/// Run the engine and fold an out-of-range page back into range, updating `state`.
pub fn apply_clamped(users: &[UserSummary], state: &mut FilterState) -> PageView {
    let view = apply(users, state);
    let clamped = clamp_page(state.current_page, view.total_pages);
    if clamped == state.current_page {
        return view;
    }
    tracing::debug!(from = state.current_page, to = clamped, "clamping current page");
    state.current_page = clamped;
    apply(users, state)
}
