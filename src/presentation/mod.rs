//! # Presentation Contract
//!
//! What a rendering surface needs from the listing, independent of any UI
//! toolkit: which of the three visible states to show, the pagination
//! summary, and the sortable columns. [`render_table`] is a plain-text
//! rendering used by the demo binary.

use crate::model::{ListingState, Product, SortDirection, SortKey};
use std::fmt::Write;

/// The three states a listing surface must tell apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingView<'a> {
    /// A fetch is running, or none has completed yet (e.g. the session is
    /// still being restored).
    Loading,
    /// Not loading and no rows.
    Empty,
    Populated(&'a [Product]),
}

impl<'a> ListingView<'a> {
    pub fn from_state(state: &'a ListingState) -> Self {
        if state.loading || !state.loaded {
            ListingView::Loading
        } else if state.items.is_empty() {
            ListingView::Empty
        } else {
            ListingView::Populated(&state.items)
        }
    }
}

/// "Showing 10 of 42 products", "Page 2 of 5", and the prev/next buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationSummary {
    pub shown: usize,
    pub total: u64,
    pub page: u32,
    pub total_pages: u32,
    pub has_previous: bool,
    pub has_next: bool,
}

impl PaginationSummary {
    pub fn from_state(state: &ListingState) -> Self {
        let total_pages = state.total_pages();
        Self {
            shown: state.items.len(),
            total: state.total_count,
            page: state.page,
            total_pages,
            has_previous: state.page > 1,
            has_next: state.page < total_pages,
        }
    }
}

/// A sortable column of the listing table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub label: &'static str,
    pub key: SortKey,
}

pub const COLUMNS: [Column; 5] = [
    Column { label: "Article Name", key: SortKey::ArticleName },
    Column { label: "Category", key: SortKey::CategoryName },
    Column { label: "Manufacturer", key: SortKey::ManufacturerName },
    Column { label: "Reference", key: SortKey::Reference },
    Column { label: "Certified", key: SortKey::CertifiedByAuthority },
];

/// Arrow for the active sort column, `None` for the others.
pub fn sort_indicator(state: &ListingState, key: SortKey) -> Option<&'static str> {
    (state.sort.key == key).then_some(match state.sort.direction {
        SortDirection::Asc => "↑",
        SortDirection::Desc => "↓",
    })
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}

fn cells(product: &Product) -> [&str; 5] {
    [
        &product.article.name,
        &product.article.category.name,
        &product.manufacturer.name,
        &product.reference,
        yes_no(product.certified_by_authority),
    ]
}

/// Renders the listing as a fixed-width text table.
pub fn render_table(state: &ListingState) -> String {
    let headers: Vec<String> = COLUMNS
        .iter()
        .map(|c| match sort_indicator(state, c.key) {
            Some(arrow) => format!("{} {arrow}", c.label),
            None => c.label.to_string(),
        })
        .collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for product in &state.items {
        for (width, cell) in widths.iter_mut().zip(cells(product)) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let row = |out: &mut String, values: &[&str]| {
        let line = values
            .iter()
            .zip(&widths)
            .map(|(v, &w)| format!("{v:<w$}"))
            .collect::<Vec<_>>()
            .join(" | ");
        let _ = writeln!(out, "{}", line.trim_end());
    };

    let header_refs: Vec<&str> = headers.iter().map(String::as_str).collect();
    row(&mut out, &header_refs);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let rule_refs: Vec<&str> = rule.iter().map(String::as_str).collect();
    row(&mut out, &rule_refs);

    match ListingView::from_state(state) {
        ListingView::Loading => {
            let _ = writeln!(out, "Loading products...");
        }
        ListingView::Empty => {
            let _ = writeln!(out, "No products found.");
        }
        ListingView::Populated(items) => {
            for product in items {
                row(&mut out, &cells(product));
            }
        }
    }

    if let Some(error) = &state.last_error {
        let _ = writeln!(out, "! {error}");
    }

    let summary = PaginationSummary::from_state(state);
    let _ = writeln!(
        out,
        "Showing {} of {} products. Page {} of {}",
        summary.shown, summary.total, summary.page, summary.total_pages
    );
    out
}
