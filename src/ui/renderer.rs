//! Plain-text rendering of the view model.
//!
//! The renderer follows a two-step process:
//!
//! 1. **View Model Computation**: Transform `AppState` into `UIViewModel`
//! 2. **Section Rendering**: header, search bar, open panel, event list
//!
//! Output is returned as a `String` so hosts decide where it goes. With
//! `color` enabled, sections are styled with ANSI sequences from the theme.
//!
//! # Example
//!
//! ```rust
//! use eventmap::app::AppState;
//! use eventmap::ui::{render, Theme};
//! use eventmap::Config;
//!
//! let mut state = AppState::new(&Config::default(), Theme::default());
//! state.sync_derived();
//! let frame = render(&state, false);
//! assert!(frame.starts_with("Events: "));
//! ```

use crate::app::modes::ListSnap;
use crate::app::AppState;
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{DisplayItem, EmptyState, PanelView, UIViewModel};
use std::fmt::Write;

/// Rows shown while the list is minimized.
pub const MINIMIZED_ROWS: usize = 3;

/// Renders the current state.
#[must_use]
pub fn render(state: &AppState, color: bool) -> String {
    let viewmodel = state.compute_viewmodel();
    render_viewmodel(&viewmodel, &state.theme, color)
}

/// Renders a pre-computed view model.
#[must_use]
pub fn render_viewmodel(vm: &UIViewModel, theme: &Theme, color: bool) -> String {
    let painter = Painter { theme, color };
    let mut out = String::new();

    render_header(&mut out, vm, &painter);
    render_search_bar(&mut out, vm, &painter);
    render_panel(&mut out, &vm.panel, &painter);

    match &vm.empty_state {
        Some(empty) => render_empty_state(&mut out, empty, &painter),
        None => render_list(&mut out, vm, &painter),
    }
    out
}

struct Painter<'a> {
    theme: &'a Theme,
    color: bool,
}

impl Painter<'_> {
    fn paint(&self, hex: &str, text: &str) -> String {
        if self.color {
            format!("{}{text}{}", Theme::fg(hex), Theme::reset())
        } else {
            text.to_string()
        }
    }

    fn bold(&self, text: &str) -> String {
        if self.color {
            format!("{}{text}{}", Theme::bold(), Theme::reset())
        } else {
            text.to_string()
        }
    }

    fn dim(&self, text: &str) -> String {
        if self.color {
            format!(
                "{}{}{text}{}",
                Theme::dim(),
                Theme::fg(&self.theme.colors.text_dim),
                Theme::reset()
            )
        } else {
            text.to_string()
        }
    }
}

fn render_header(out: &mut String, vm: &UIViewModel, painter: &Painter<'_>) {
    let indicators = &vm.indicators;
    let mut flags = Vec::new();
    if indicators.type_active {
        flags.push("type");
    }
    if indicators.date_active {
        flags.push("date");
    }
    if indicators.centered_on_user {
        flags.push("me");
    }

    let title = painter.bold(&painter.paint(&painter.theme.colors.header_fg, &vm.header.title));
    let _ = write!(out, "{title}  {}", painter.dim(&format!("sorted by {}", vm.header.sort_label)));
    if !flags.is_empty() {
        let active = format!("[{}]", flags.join(", "));
        let _ = write!(out, "  {}", painter.paint(&painter.theme.colors.active_fg, &active));
    }
    out.push('\n');
}

fn render_search_bar(out: &mut String, vm: &UIViewModel, painter: &Painter<'_>) {
    let bar = &vm.search_bar;
    if bar.query.is_empty() {
        let _ = writeln!(out, "> {}", painter.dim(&bar.placeholder));
    } else {
        let _ = writeln!(out, "> {}", bar.query);
    }
}

fn render_panel(out: &mut String, panel: &PanelView, painter: &Painter<'_>) {
    match panel {
        PanelView::None => {}
        PanelView::Types { items, all_picked } => {
            let toggle = if *all_picked { "Clear all" } else { "Select all" };
            let _ = writeln!(out, "{}  {}", painter.bold("Type"), painter.dim(toggle));
            for item in items {
                let mark = if item.picked { "[x]" } else { "[ ]" };
                let _ = writeln!(out, "  {mark} {}", painter.paint(&item.color, &item.name));
            }
        }
        PanelView::Places {
            items,
            showing_recent,
            searching,
        } => {
            let heading = if *showing_recent { "Recent places" } else { "Places" };
            let _ = writeln!(out, "{}", painter.bold(heading));
            if *searching {
                let _ = writeln!(out, "  {}", painter.dim("searching..."));
            } else if items.is_empty() {
                let _ = writeln!(out, "  {}", painter.dim("No places found"));
            }
            for (i, item) in items.iter().enumerate() {
                let _ = writeln!(out, "  {i}. {}", item.label);
            }
        }
        PanelView::Dates { start, end } => {
            let show = |d: &Option<chrono::NaiveDate>| d.map_or_else(|| "-".to_string(), |d| d.to_string());
            let _ = writeln!(out, "{}  {} .. {}", painter.bold("Date"), show(start), show(end));
        }
        PanelView::EventDetails {
            id,
            name,
            event_type,
            date,
            description,
            link,
            photo,
            is_favorite,
        } => {
            let star = if *is_favorite { " *" } else { "" };
            let _ = writeln!(out, "{}{star}  {}", painter.bold(name), painter.dim(&format!("#{id}")));
            let _ = writeln!(out, "  {event_type} | {date}");
            if !description.is_empty() {
                let _ = writeln!(out, "  {description}");
            }
            for extra in [link, photo].into_iter().flatten() {
                let _ = writeln!(out, "  {}", painter.dim(extra));
            }
        }
    }
}

fn render_list(out: &mut String, vm: &UIViewModel, painter: &Painter<'_>) {
    let shown = match vm.list_snap {
        ListSnap::Minimized => MINIMIZED_ROWS.min(vm.display_items.len()),
        ListSnap::Expanded => vm.display_items.len(),
    };
    for item in &vm.display_items[..shown] {
        render_row(out, item, painter);
    }
    let hidden = vm.display_items.len() - shown;
    if hidden > 0 {
        let _ = writeln!(out, "{}", painter.dim(&format!("... {hidden} more")));
    }
    if vm.show_scroll_to_top {
        let _ = writeln!(out, "{}", painter.dim("^ top"));
    }
}

fn render_row(out: &mut String, item: &DisplayItem, painter: &Painter<'_>) {
    let marker = painter.paint(&item.color, "●");
    let star = if item.is_favorite { "*" } else { " " };
    let open = if item.is_open { ">" } else { " " };
    let name = if item.is_open {
        painter.paint(&painter.theme.colors.active_fg, &item.name)
    } else {
        painter.paint(&painter.theme.colors.text_normal, &item.name)
    };
    let distance = item.distance.as_deref().unwrap_or("");
    let _ = writeln!(
        out,
        "{open}{marker}{star} {name}  {}",
        painter.dim(&format!("{} {} {distance}", item.event_type, item.date).trim_end())
    );
}

fn render_empty_state(out: &mut String, empty: &EmptyState, painter: &Painter<'_>) {
    let _ = writeln!(out, "{}", painter.paint(&painter.theme.colors.empty_state_fg, &empty.message));
    let _ = writeln!(out, "{}", painter.dim(&empty.subtitle));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::viewmodel::{FilterIndicators, HeaderInfo, SearchBarInfo, TypeItem};

    fn item(id: &str, name: &str) -> DisplayItem {
        DisplayItem {
            id: id.into(),
            name: name.into(),
            event_type: "music".into(),
            date: "2024-01-01".into(),
            distance: Some("1.0 km".into()),
            color: "#FF4081".into(),
            is_favorite: id == "2",
            is_open: false,
        }
    }

    fn viewmodel(items: Vec<DisplayItem>, snap: ListSnap) -> UIViewModel {
        UIViewModel {
            header: HeaderInfo {
                title: format!("Events: {}", items.len()),
                sort_label: "Date".into(),
            },
            search_bar: SearchBarInfo {
                query: String::new(),
                placeholder: "Find events...".into(),
            },
            indicators: FilterIndicators {
                type_active: true,
                ..FilterIndicators::default()
            },
            panel: PanelView::None,
            display_items: items,
            empty_state: None,
            list_snap: snap,
            show_scroll_to_top: false,
        }
    }

    #[test]
    fn minimized_list_shows_first_rows_only() {
        let items = (1..=5).map(|i| item(&i.to_string(), &format!("Event {i}"))).collect();
        let frame = render_viewmodel(&viewmodel(items, ListSnap::Minimized), &Theme::default(), false);
        let lines: Vec<&str> = frame.lines().collect();
        assert_eq!(lines[0], "Events: 5  sorted by Date  [type]");
        assert_eq!(lines[1], "> Find events...");
        assert_eq!(lines[2], " ●  Event 1  music 2024-01-01 1.0 km");
        assert_eq!(lines[3], " ●* Event 2  music 2024-01-01 1.0 km");
        assert_eq!(lines[5], "... 2 more");
    }

    #[test]
    fn type_panel_lists_checkboxes() {
        let mut vm = viewmodel(vec![item("1", "A")], ListSnap::Expanded);
        vm.panel = PanelView::Types {
            items: vec![TypeItem {
                name: "music".into(),
                picked: true,
                color: "#FF4081".into(),
            }],
            all_picked: true,
        };
        let frame = render_viewmodel(&vm, &Theme::default(), false);
        assert!(frame.contains("Type  Clear all\n  [x] music\n"));
    }

    #[test]
    fn color_output_uses_theme_sequences() {
        let frame = render_viewmodel(&viewmodel(vec![item("1", "A")], ListSnap::Expanded), &Theme::default(), true);
        assert!(frame.contains(&Theme::fg("#FF4081")));
    }
}
