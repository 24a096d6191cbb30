use crate::errors::{HistError, Result};
use std::fmt::Write as _;

/// One table row: the source image and either its plot or why it failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub image_src: String,
    pub plot: std::result::Result<String, String>,
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn write_row(out: &mut String, row: &Row) -> std::fmt::Result {
    writeln!(out, "<tr>")?;
    writeln!(
        out,
        "<td><img class=\"image\" src=\"{}\" width=\"500\" /></td>",
        escape_html(&row.image_src)
    )?;
    match &row.plot {
        Ok(data_uri) => writeln!(out, "<td><img class=\"hist\" src=\"{}\" /></td>", data_uri)?,
        Err(message) => writeln!(out, "<td class=\"error\">{}</td>", escape_html(message))?,
    }
    writeln!(out, "</tr>")
}

/// Render the preview page with rows in the given order.
pub fn render_page(rows: &[Row]) -> Result<String> {
    let mut out = String::new();
    let template_err = |e: std::fmt::Error| HistError::Template {
        message: e.to_string(),
    };

    out.push_str("<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>Histograms</title></head>\n<body>\n<table>\n");
    for row in rows {
        write_row(&mut out, row).map_err(template_err)?;
    }
    out.push_str("</table>\n</body>\n</html>\n");
    Ok(out)
}
