//! The `view` command.

use std::io::Write;
use std::path::Path;

use hearthcal_core::{CalendarView, CategoryFilter, Expander, StoredEvent, TimeWindow, group_by_day};
use tracing::debug;

use crate::config::CliConfig;
use crate::error::CliResult;
use crate::render;

/// Arguments for `view`.
#[derive(Debug, Clone)]
pub struct ViewOptions {
    pub view: CalendarView,
    pub date: String,
    pub category: Option<String>,
    pub json: bool,
}

/// Loads `file` and prints the occurrences a calendar page would show.
pub fn run(
    config: &CliConfig,
    file: &Path,
    options: &ViewOptions,
    out: &mut impl Write,
) -> CliResult<()> {
    let events = super::load_events(file)?;
    write_view(config, &events, options, out)
}

/// Expands already loaded events over the view window and writes them to
/// `out`, grouped by day.
pub fn write_view(
    config: &CliConfig,
    events: &[StoredEvent],
    options: &ViewOptions,
    out: &mut impl Write,
) -> CliResult<()> {
    let selected = super::parse_date_arg(&options.date)?.date();
    let window = TimeWindow::for_view(options.view, selected, config.display.week_starts_on);
    debug!(view = ?options.view, start = %window.start, end = %window.end, "View window");

    let occurrences = Expander::new(config.expansion.clone()).expand(events, &window);
    let occurrences = CategoryFilter::from_option(options.category.clone()).apply(occurrences);
    let days = group_by_day(&occurrences);

    if options.json {
        let output = render::json_view_output(&window, &days);
        writeln!(out, "{}", render::to_json(&output)?)?;
    } else {
        writeln!(
            out,
            "{}",
            render::render_days(&days, &config.display.no_events_text)
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::parse_events;
    use hearthcal_core::WeekStart;

    const EVENTS: &str = r#"[
        {"id": "bins", "title": "Bins out", "start_time": "2024-01-02T19:00:00",
         "end_time": "2024-01-02T19:15:00", "recurrence_rule": "FREQ=WEEKLY;INTERVAL=2"},
        {"id": "holiday", "title": "Holiday", "start_time": "2024-03-15",
         "end_time": "2024-03-16", "is_all_day": true, "category_id": "family"}
    ]"#;

    fn render(view: CalendarView, date: &str, config: &CliConfig) -> String {
        let events = parse_events(EVENTS).unwrap();
        let options = ViewOptions {
            view,
            date: date.to_string(),
            category: None,
            json: false,
        };
        let mut out = Vec::new();
        write_view(config, &events, &options, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn day_view_covers_buffer_months() {
        let options = ViewOptions {
            view: CalendarView::Day,
            date: "2024-03-15".to_string(),
            category: Some("family".to_string()),
            json: true,
        };
        let events = parse_events(EVENTS).unwrap();
        let mut out = Vec::new();
        write_view(&CliConfig::default(), &events, &options, &mut out).unwrap();

        let output: render::JsonViewOutput = serde_json::from_slice(&out).unwrap();
        assert_eq!(output.window_start, "2024-02-01T00:00:00");
        assert_eq!(output.window_end, "2024-04-30T23:59:59.999");
        assert_eq!(output.count, 1);
        assert_eq!(output.days[0].date, "2024-03-15");
    }

    #[test]
    fn week_view_text() {
        let mut config = CliConfig::default();
        config.display.week_starts_on = WeekStart::Monday;
        // window: Mon 2024-02-12 .. Sun 2024-04-14
        insta::assert_snapshot!(render(CalendarView::Week, "2024-03-12", &config), @r"
        Tuesday 2024-02-13
          19:00-19:15  Bins out (Every 2 weeks)

        Tuesday 2024-02-27
          19:00-19:15  Bins out (Every 2 weeks)

        Tuesday 2024-03-12
          19:00-19:15  Bins out (Every 2 weeks)

        Friday 2024-03-15
          all day      Holiday

        Tuesday 2024-03-26
          19:00-19:15  Bins out (Every 2 weeks)

        Tuesday 2024-04-09
          19:00-19:15  Bins out (Every 2 weeks)
        ");
    }
}
