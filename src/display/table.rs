use textwrap::core::display_width;

/// Cells wider than this are wrapped onto several lines.
const MAX_CELL_WIDTH: usize = 60;

/// Render rows as a heavy box-drawing grid with a header row.
pub fn render(headers: &[&str], rows: &[Vec<String>]) -> String {
    let header_row: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    let all_rows: Vec<Vec<Vec<String>>> = std::iter::once(&header_row)
        .chain(rows)
        .map(|row| row.iter().map(|cell| wrap_cell(cell)).collect())
        .collect();

    let columns = headers.len();
    let mut widths = vec![0; columns];
    for row in &all_rows {
        for (col, lines) in row.iter().enumerate().take(columns) {
            let widest = lines.iter().map(|l| display_width(l)).max().unwrap_or(0);
            widths[col] = widths[col].max(widest);
        }
    }

    let mut out = String::new();
    out.push_str(&rule(&widths, '┏', '┳', '┓'));
    for (i, row) in all_rows.iter().enumerate() {
        if i > 0 {
            out.push_str(&rule(&widths, '┣', '╋', '┫'));
        }
        out.push_str(&row_lines(row, &widths));
    }
    out.push_str(&rule(&widths, '┗', '┻', '┛'));
    out
}

fn wrap_cell(cell: &str) -> Vec<String> {
    // urls are left whole so they stay clickable
    if display_width(cell) <= MAX_CELL_WIDTH || !cell.contains(' ') {
        return vec![cell.to_string()];
    }
    textwrap::wrap(cell, MAX_CELL_WIDTH)
        .into_iter()
        .map(|line| line.into_owned())
        .collect()
}

fn rule(widths: &[usize], left: char, mid: char, right: char) -> String {
    let segments: Vec<String> = widths.iter().map(|w| "━".repeat(w + 2)).collect();
    format!("{left}{}{right}\n", segments.join(&mid.to_string()))
}

fn row_lines(row: &[Vec<String>], widths: &[usize]) -> String {
    let height = row.iter().map(Vec::len).max().unwrap_or(1);
    let mut out = String::new();
    for line in 0..height {
        out.push('┃');
        for (col, width) in widths.iter().enumerate() {
            let text = row
                .get(col)
                .and_then(|lines| lines.get(line))
                .map(String::as_str)
                .unwrap_or("");
            let pad = width - display_width(text);
            out.push(' ');
            out.push_str(text);
            out.push_str(&" ".repeat(pad + 1));
            out.push('┃');
        }
        out.push('\n');
    }
    out
}
