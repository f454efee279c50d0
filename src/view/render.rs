//! Plain text rendering of reports and session frames.

use std::fmt::Write as _;

use colored::Colorize;

use crate::ext::ByteSizeExt;
use crate::filesystem::{FileTree, NodeId, PATH_SEPARATOR, display_label};
use crate::report::{FileViewMode, ImageReport, LayerReport};
use crate::view::{FileListItem, ReportSession, ToolbarControl, Zone};

const BAR_WIDTH: usize = 20;
const COMMAND_PREVIEW: usize = 48;

fn header(report: &ImageReport) -> String {
    let mut line = report.reference().bold().to_string();
    if let Some(architecture) = &report.architecture {
        let _ = write!(line, "  {}", architecture);
    }
    let _ = write!(
        line,
        "  {}  {} layers",
        report.total_size.format_bytes().cyan(),
        report.layer_count()
    );
    line
}

fn command_preview(layer: &LayerReport) -> String {
    let command = layer.created_by.as_deref().unwrap_or("");
    let first_line = command.split(['\t', '\n']).next().unwrap_or("").trim();
    if first_line.chars().count() > COMMAND_PREVIEW {
        let cut: String = first_line.chars().take(COMMAND_PREVIEW).collect();
        format!("{cut}...")
    } else {
        first_line.to_string()
    }
}

fn layer_line(index: usize, layer: &LayerReport) -> String {
    format!(
        "{:>3} {:<12} {:>10} {:>5} files  {}",
        index + 1,
        layer.short_digest(),
        layer.size.format_bytes().cyan(),
        layer.file_count(),
        command_preview(layer).dimmed()
    )
}

pub fn render_summary(report: &ImageReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", header(report));
    for (index, layer) in report.layers.iter().enumerate() {
        let _ = writeln!(out, "{}", layer_line(index, layer));
    }
    out
}

fn node_label(name: &str, is_whiteout: bool, is_file: bool) -> String {
    let label = display_label(name, is_whiteout);
    if is_whiteout {
        label.red().to_string()
    } else if is_file {
        label.into_owned()
    } else {
        format!("{label}/").blue().bold().to_string()
    }
}

/// Every node of `tree` below the root, directories first at each level.
pub fn render_tree(tree: &FileTree) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "/ {}", tree.root().size().format_bytes().cyan());

    let mut stack: Vec<(NodeId, usize)> = tree
        .sorted_children(NodeId::ROOT)
        .iter()
        .rev()
        .map(|node| (node.id(), 1))
        .collect();
    while let Some((id, depth)) = stack.pop() {
        let Some(node) = tree.get(id) else {
            continue;
        };
        let _ = writeln!(
            out,
            "{}{} {}",
            "  ".repeat(depth),
            node_label(node.name(), node.is_whiteout(), node.is_file()),
            node.size().format_bytes().cyan()
        );
        stack.extend(
            tree.sorted_children(id)
                .iter()
                .rev()
                .map(|child| (child.id(), depth + 1)),
        );
    }
    out
}

fn zone_title(session: &ReportSession, zone: Zone, title: &str) -> String {
    if session.focused_zone() == Some(zone) {
        format!("> {title}").green().bold().to_string()
    } else {
        format!("  {title}").bold().to_string()
    }
}

fn cursor_marker(active: bool) -> &'static str {
    if active { ">" } else { " " }
}

fn bar(fraction: f64) -> String {
    let filled = ((fraction.clamp(0.0, 1.0) * BAR_WIDTH as f64).round() as usize).min(BAR_WIDTH);
    format!("{}{}", "#".repeat(filled), ".".repeat(BAR_WIDTH - filled))
}

fn render_toolbar(out: &mut String, session: &ReportSession) {
    let focused = session.focused_zone() == Some(Zone::Toolbar);
    let controls = [
        (ToolbarControl::ViewMode, format!("View: {}", session.view_mode())),
        (ToolbarControl::FileView, format!("Files: {}", session.file_view())),
        (ToolbarControl::Filter, format!("Filter: {}", session.filter())),
    ];
    let rendered: Vec<String> = controls
        .into_iter()
        .map(|(control, text)| {
            let text = format!("[{text}]");
            if focused && session.toolbar().cursor == control {
                text.reversed().to_string()
            } else {
                text
            }
        })
        .collect();
    let _ = writeln!(out, "{}", zone_title(session, Zone::Toolbar, "Toolbar"));
    let _ = writeln!(out, "  {}", rendered.join(" "));
}

/// `*` for the selected layer, `+` for earlier layers folded into it.
fn layer_marker(session: &ReportSession, index: usize) -> &'static str {
    if index == session.layer() {
        "*"
    } else if session.view_mode().includes(index, session.layer()) {
        "+"
    } else {
        " "
    }
}

fn render_layers(out: &mut String, session: &ReportSession) {
    let _ = writeln!(out, "{}", zone_title(session, Zone::LayerList, "Layers"));
    let focused = session.focused_zone() == Some(Zone::LayerList);
    for (index, layer) in session.report().layers.iter().enumerate() {
        let _ = writeln!(
            out,
            "{}{} {}",
            cursor_marker(focused && session.layer_cursor() == index),
            layer_marker(session, index),
            layer_line(index, layer)
        );
    }
}

fn render_tree_pane(out: &mut String, session: &ReportSession) {
    let _ = writeln!(out, "{}", zone_title(session, Zone::TreePane, "Tree"));
    let focused = session.focused_zone() == Some(Zone::TreePane);
    let tree = session.tree();
    let active = session.selection().active_directory(tree).id();

    for (row_index, row) in session.tree_rows().iter().enumerate() {
        let Some(node) = tree.get(row.id) else {
            continue;
        };
        let expander = if row.id == NodeId::ROOT || tree.directory_children(row.id).is_empty() {
            " "
        } else if session.selection().is_expanded(row.id) {
            "v"
        } else {
            ">"
        };
        // The root and segments of paths with a leading or doubled slash are unnamed.
        let name = if node.name().is_empty() {
            PATH_SEPARATOR.to_string()
        } else {
            display_label(node.name(), node.is_whiteout()).into_owned()
        };
        let name = if row.id == active {
            name.bold().underline().to_string()
        } else {
            name
        };
        let _ = writeln!(
            out,
            "{} {}{} {} {}",
            cursor_marker(focused && session.tree_cursor() == row_index),
            "  ".repeat(row.depth),
            expander,
            name,
            node.size().format_bytes().cyan()
        );
    }
}

fn file_row(session: &ReportSession, item: &FileListItem, cursor: bool) -> String {
    let label = if item.is_whiteout {
        item.label().red().to_string()
    } else {
        item.label().into_owned()
    };
    format!(
        "{} {:>10} {} {}",
        cursor_marker(cursor),
        item.size.format_bytes().cyan(),
        bar(session.file_list().bar_fraction(item)),
        label
    )
}

fn render_files(out: &mut String, session: &ReportSession) {
    let _ = writeln!(out, "{}", zone_title(session, Zone::FilePane, "Files"));
    if session.file_view() == FileViewMode::Tree {
        let tree = session.tree();
        let active = session.selection().active_directory(tree).id();
        let path = tree.path_of(active).unwrap_or_default();
        let _ = writeln!(out, "  in {PATH_SEPARATOR}{path}");
    }
    let _ = writeln!(
        out,
        "  {} entries in view, sorted by {}",
        session.entries().len(),
        session.file_list().sort()
    );
    if let Some(message) = session.empty_message() {
        let _ = writeln!(out, "  {}", message.dimmed());
        return;
    }

    let focused = session.focused_zone() == Some(Zone::FilePane);
    let page = session.current_page();
    for (index, item) in page.items.iter().enumerate() {
        let cursor = focused && session.file_cursor() == index;
        let _ = writeln!(out, "{}", file_row(session, item, cursor));
    }
    if page.total_pages > 1 {
        let _ = writeln!(
            out,
            "  Page {} of {}  ({}-{} of {})",
            page.page + 1,
            page.total_pages,
            page.start() + 1,
            page.start() + page.items.len(),
            session.file_list().items().len()
        );
    }
}

fn render_dialog(out: &mut String, session: &ReportSession) {
    let Some(dialog) = session.dialog() else {
        return;
    };
    let digest = session
        .report()
        .layers
        .get(dialog.layer_index())
        .map(LayerReport::short_digest)
        .unwrap_or_default();
    let _ = writeln!(
        out,
        "{} {} [{}]",
        dialog.title().yellow().bold(),
        digest.dimmed(),
        dialog.view()
    );
    for line in dialog.text().lines() {
        let _ = writeln!(out, "  {}", line);
    }
}

/// Full screen of the session in its current state.
pub fn render_frame(session: &ReportSession) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", header(session.report()));
    render_toolbar(&mut out, session);
    render_layers(&mut out, session);
    if session.zones().contains(&Zone::TreePane) {
        render_tree_pane(&mut out, session);
    }
    render_files(&mut out, session);
    render_dialog(&mut out, session);
    out
}
