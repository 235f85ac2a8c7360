use rust_decimal::Decimal;

pub fn format_grouped_int(value: i64) -> String {
    let grouped = group_digits(&value.unsigned_abs().to_string());
    if value < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

/// Insert a comma every three digits, counting from the right
fn group_digits(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Format a money amount with two decimal places and thousands separators
pub fn format_money(value: Decimal, currency_symbol: &str) -> String {
    let rounded = format!("{:.2}", value.round_dp(2));
    let (whole, frac) = rounded.split_once('.').unwrap_or((rounded.as_str(), "00"));

    let negative = whole.starts_with('-');
    let grouped = group_digits(whole.trim_start_matches('-'));

    if negative {
        format!("-{currency_symbol}{grouped}.{frac}")
    } else {
        format!("{currency_symbol}{grouped}.{frac}")
    }
}

/// Pad the column that ends just before char index `at` by `extra` cells.
/// Border lines are padded with `─`, content lines with spaces.
fn widen_column(line: &str, at: usize, extra: usize) -> String {
    let fill = if line.starts_with('│') { ' ' } else { '─' };
    let mut chars: Vec<char> = line.chars().collect();
    let at = at.min(chars.len());
    chars.splice(at..at, std::iter::repeat(fill).take(extra));
    chars.into_iter().collect()
}

/// Append summary rows under a rounded `tabled` table. Every column but
/// the last is merged into one right-aligned label cell; values go in the
/// last column. Columns of the original table grow when a label or value
/// does not fit, so all borders stay aligned.
pub fn add_summary_footer(table: &str, rows: &[(&str, String)]) -> String {
    let lines: Vec<&str> = table.lines().collect();
    if lines.len() < 4 || rows.is_empty() {
        return table.to_string();
    }

    // Parse the top border to discover column widths
    let Some(inner) = lines[0].strip_prefix('╭').and_then(|s| s.strip_suffix('╮')) else {
        return table.to_string();
    };

    let mut widths: Vec<usize> = inner.split('┬').map(|p| p.chars().count()).collect();
    if widths.len() < 2 {
        return table.to_string();
    }
    let line_width = lines[0].chars().count();
    if lines[..lines.len() - 1]
        .iter()
        .any(|l| l.chars().count() != line_width)
    {
        return table.to_string();
    }

    let cols = widths.len();
    let value_width = widths[cols - 1];
    // Merged cell also absorbs the borders between label columns
    let label_width = widths[..cols - 1].iter().sum::<usize>() + cols - 2;

    let needed_label = rows
        .iter()
        .map(|(label, _)| label.chars().count() + 2)
        .fold(label_width, usize::max);
    let needed_value = rows
        .iter()
        .map(|(_, value)| value.chars().count() + 2)
        .fold(value_width, usize::max);
    let extra_label = needed_label - label_width;
    let extra_value = needed_value - value_width;

    // Label overflow goes to the column left of the value column
    let label_end = line_width - value_width - 2;
    let mut out = String::new();
    for line in &lines[..lines.len() - 1] {
        let line = widen_column(line, label_end, extra_label);
        let line = widen_column(&line, line_width + extra_label - 1, extra_value);
        out.push_str(&line);
        out.push('\n');
    }

    widths[cols - 2] += extra_label;
    widths[cols - 1] += extra_value;
    let label_width = needed_label;
    let value_width = needed_value;

    let merged: Vec<String> = widths[..cols - 1].iter().map(|w| "─".repeat(*w)).collect();
    out.push_str(&format!("├{}┼{}┤\n", merged.join("┴"), "─".repeat(value_width)));

    for (idx, (label, value)) in rows.iter().enumerate() {
        out.push_str(&format!(
            "│ {:>label$} │ {:>value$} │\n",
            label,
            value,
            label = label_width - 2,
            value = value_width - 2
        ));
        if idx < rows.len() - 1 {
            out.push_str(&format!(
                "├{}┼{}┤\n",
                "─".repeat(label_width),
                "─".repeat(value_width)
            ));
        }
    }

    out.push_str(&format!(
        "╰{}┴{}╯",
        "─".repeat(label_width),
        "─".repeat(value_width)
    ));

    out
}
