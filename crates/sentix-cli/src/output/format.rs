//! Plain-text formatting helpers for table output.

use sentix_core::PageInfo;

/// Compact dollar amount: `$1.23B`, `$4.50M`, `$7.00K`, `$12.34`, or `N/A`.
pub fn format_currency(value: Option<f64>) -> String {
    let Some(value) = value.filter(|value| value.is_finite()) else {
        return String::from("N/A");
    };

    let magnitude = value.abs();
    if magnitude >= 1e9 {
        format!("${:.2}B", value / 1e9)
    } else if magnitude >= 1e6 {
        format!("${:.2}M", value / 1e6)
    } else if magnitude >= 1e3 {
        format!("${:.2}K", value / 1e3)
    } else {
        format!("${value:.2}")
    }
}

/// One glyph per reading: `+` for non-negative, `-` for negative, `.` when missing.
pub fn trend_glyphs(values: &[Option<f64>]) -> String {
    values
        .iter()
        .map(|value| match value {
            Some(value) if *value < 0.0 => '-',
            Some(_) => '+',
            None => '.',
        })
        .collect()
}

pub fn page_footer(pagination: &PageInfo) -> String {
    let page = pagination.page.max(1);
    let total_pages = pagination.total_pages.max(1);
    if pagination.total > 0 {
        format!(
            "Showing page {page} of {total_pages} ({} total tokens)",
            pagination.total
        )
    } else {
        format!("Showing page {page} of {total_pages}")
    }
}

/// Left-aligned text table with a dashed header rule.
pub fn text_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths = headers
        .iter()
        .map(|header| header.chars().count())
        .collect::<Vec<_>>();
    for row in rows {
        for (index, cell) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(index) {
                *width = (*width).max(cell.chars().count());
            }
        }
    }

    let render_line = |cells: Vec<&str>| {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{cell:<width$}", width = *width))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_owned()
    };

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(render_line(headers.to_vec()));
    lines.push(
        widths
            .iter()
            .map(|width| "-".repeat(*width))
            .collect::<Vec<_>>()
            .join("  "),
    );
    for row in rows {
        lines.push(render_line(row.iter().map(String::as_str).collect()));
    }

    let mut rendered = lines.join("\n");
    rendered.push('\n');
    rendered
}
