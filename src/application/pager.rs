use serde::Serialize;

use super::result::{ReportResult, ReportRow};
use crate::domain::Cents;

/// The slice of one group visible on a page. `continues` is set when the
/// group's remaining rows spill onto the next page, so renderers know to
/// hold the subtotal line.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageGroup {
    pub key: String,
    pub label: String,
    pub rows: Vec<ReportRow>,
    pub subtotal_cents: Cents,
    pub continues: bool,
}

/// One window over an assembled report. Page numbers are 1-based and
/// always valid: out-of-range requests clamp instead of failing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub index: usize,
    pub page_count: usize,
    pub page_size: usize,
    pub total_rows: usize,
    pub groups: Vec<PageGroup>,
    pub grand_total_cents: Cents,
}

impl Page {
    pub fn is_last(&self) -> bool {
        self.index == self.page_count
    }
}

/// Cut a page out of a report. Pure: the same result, size and index always
/// produce the same page. A page size of zero is treated as one row per
/// page; an empty report yields a single page with no groups so renderers
/// still print headers.
pub fn paginate(result: &ReportResult, page_size: usize, page: usize) -> Page {
    let size = page_size.max(1);
    let total_rows = result.row_count();
    let page_count = total_rows.div_ceil(size).max(1);
    let index = page.clamp(1, page_count);

    let start = (index - 1) * size;
    let end = (start + size).min(total_rows);

    let mut groups = Vec::new();
    let mut offset = 0;
    for group in &result.groups {
        let group_start = offset;
        let group_end = offset + group.rows.len();
        offset = group_end;

        if group_end <= start || group_start >= end {
            continue;
        }

        let from = start.saturating_sub(group_start);
        let to = (end - group_start).min(group.rows.len());
        groups.push(PageGroup {
            key: group.key.clone(),
            label: group.label.clone(),
            rows: group.rows[from..to].to_vec(),
            subtotal_cents: group.subtotal_cents,
            continues: group_end > end,
        });
    }

    Page {
        index,
        page_count,
        page_size: size,
        total_rows,
        groups,
        grand_total_cents: result.grand_total_cents,
    }
}
