use signage_core::{BoardViewModel, Freshness, Phase, WidgetDisplay, WidgetId};

/// One text line per widget, in widget id order.
pub fn render(view: &BoardViewModel) -> Vec<String> {
    view.widgets
        .iter()
        .map(|widget| format_widget(widget.widget, &widget.display))
        .collect()
}

fn format_widget(id: WidgetId, display: &WidgetDisplay) -> String {
    let body = match display {
        WidgetDisplay::Clock { text } => format!("clock {text}"),
        WidgetDisplay::Countdown {
            label,
            text,
            completed,
            ..
        } => {
            let label = label
                .as_deref()
                .map(|l| format!("{l} "))
                .unwrap_or_default();
            let done = if *completed { " (done)" } else { "" };
            format!("countdown {label}{text}{done}")
        }
        WidgetDisplay::Rotator {
            active,
            outgoing,
            phase,
            progress,
            index,
            item_count,
            paused,
        } => {
            let mut line = match active {
                Some(item) => format!("rotator {}/{} {item}", index + 1, item_count),
                None => "rotator (empty)".to_string(),
            };
            if *phase != Phase::Idle {
                let previous = outgoing.as_deref().unwrap_or("-");
                line.push_str(&format!(" <- {previous} ({:.0}%)", progress * 100.0));
            }
            if *paused {
                line.push_str(" [paused]");
            }
            line
        }
        WidgetDisplay::Pager {
            page_index,
            page_count,
            rows,
            paused,
        } => {
            let paused = if *paused { " [paused]" } else { "" };
            if *page_count == 0 {
                format!("pager (empty){paused}")
            } else {
                format!(
                    "pager page {}/{page_count}{paused}: {}",
                    page_index + 1,
                    rows.join(" | ")
                )
            }
        }
        WidgetDisplay::Gate { open, showing } => {
            let state = if *open { "open" } else { "closed" };
            format!("gate {state}: {}", showing.as_deref().unwrap_or("-"))
        }
        WidgetDisplay::Freshness { level, label } => {
            format!("freshness {} {label}", freshness_label(*level))
        }
    };
    format!("[#{id}] {body}")
}

fn freshness_label(level: Freshness) -> &'static str {
    match level {
        Freshness::Fresh => "FRESH",
        Freshness::Warning => "WARNING",
        Freshness::Stale => "STALE",
    }
}
