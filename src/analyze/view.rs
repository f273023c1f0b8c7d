//! Contains the entry point [generate_view()] for the per-event views.
use crate::util::*;
use io::Write;

/// One event of a view: the scanned input entry and its classification, if it could be classified.
pub type ViewRow<'a> = (&'a ScannedEvent, Option<Observation>);

const HEADER: [&str; 7] = [
    "LINE", "FORMAT", "MASK", "TRIGGERS", "VERTEX", "CENTRALITY", "COUNTERS",
];
const WIDTHS: [usize; 7] = [8, 6, 10, 33, 6, 17, 0];

/// Calls a specific view generator based on the [ViewCommands] type.
#[inline]
pub fn generate_view(
    view: ViewCommands,
    rows: &[ViewRow<'_>],
    print_header: bool,
    disable_styled_view: bool,
) -> Result<(), io::Error> {
    match view {
        ViewCommands::Events => events_view(rows, print_header, disable_styled_view),
    }
}

fn events_view(
    rows: &[ViewRow<'_>],
    print_header: bool,
    disable_styled_view: bool,
) -> Result<(), io::Error> {
    let mut stdio_lock = io::stdout().lock();

    if print_header {
        let header = join_columns(HEADER.map(String::from));
        if disable_styled_view {
            writeln!(stdio_lock, "{header}")?;
        } else {
            writeln!(stdio_lock, "{}", header.bold().underline())?;
        }
    }

    for (event, observation) in rows {
        let columns = event_columns(event, observation.as_ref());
        if disable_styled_view {
            writeln!(stdio_lock, "{}", join_columns(columns))?;
        } else {
            writeln!(stdio_lock, "{}", styled_row(columns, observation.as_ref()))?;
        }
    }
    Ok(())
}

/// The text of each column of an event row.
fn event_columns(event: &ScannedEvent, observation: Option<&Observation>) -> [String; 7] {
    let line = event.line().to_string();
    match (event, observation) {
        (ScannedEvent::Event { record, .. }, Some(obs)) => [
            line,
            record.format.to_string(),
            record.trigger_mask.to_string(),
            obs.triggers.to_string(),
            obs.vertex_class.to_string(),
            obs.centrality.to_string(),
            obs.records()
                .filter(|r| r.bin == TriggerBin::Any)
                .map(|r| r.counter)
                .join(" "),
        ],
        (ScannedEvent::Malformed { .. }, _) => skipped_columns(line, "malformed"),
        _ => skipped_columns(line, "missing"),
    }
}

fn skipped_columns(line: String, reason: &str) -> [String; 7] {
    [
        line,
        "-".to_string(),
        "-".to_string(),
        format!("skipped ({reason})"),
        "-".to_string(),
        "-".to_string(),
        "-".to_string(),
    ]
}

fn join_columns(columns: [String; 7]) -> String {
    columns
        .iter()
        .zip(WIDTHS)
        .map(|(col, width)| format!("{col:<width$}"))
        .join(" ")
        .trim_end()
        .to_string()
}

fn styled_row(columns: [String; 7], observation: Option<&Observation>) -> String {
    let [line, format, mask, triggers, vertex, centrality, counters] = columns;
    let Some(obs) = observation else {
        return format!(
            "{line:<8} {}",
            format!("{format:<6} {mask:<10} {triggers}").red()
        );
    };
    let vertex = format!("{vertex:<6}");
    let vertex = match obs.vertex_class {
        VertexClass::None => vertex.dimmed().to_string(),
        VertexClass::Track => vertex.green().to_string(),
        VertexClass::Tpc => vertex.yellow().to_string(),
        VertexClass::SpdZ | VertexClass::Spd3D => vertex.cyan().to_string(),
    };
    let centrality = format!("{centrality:<17}");
    let centrality = if obs.centrality.is_defaulted() {
        centrality.yellow().to_string()
    } else {
        centrality
    };
    format!(
        "{line} {format:<6} {mask:<10} {triggers} {vertex} {centrality} {counters}",
        line = format_args!("{line:<8}").bg_rgb::<51, 0, 51>().bold(),
        triggers = format_args!("{triggers:<33}").bright_blue(),
        counters = counters.bright_purple(),
    )
}
