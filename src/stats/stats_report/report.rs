/// The Report struct is used by the Controller to structure the report printed at the end of execution
///
/// Report contains several StatSummary structs that are used to generate the report table
use tabled::{
    settings::{object::Rows, Alignment, Format, Modify, Panel},
    Table, Tabled,
};

use super::table_formatter_utils::format_global_stats_sub_table;
use super::table_formatter_utils::format_sub_table;
use super::table_formatter_utils::format_super_table;
use super::table_formatter_utils::SubtableColor;
use owo_colors::OwoColorize;

/// Describes the columns of the report table
#[derive(Tabled)]
pub struct StatSummary {
    pub statistic: String,
    pub value: String,
    pub notes: String,
}

impl StatSummary {
    pub fn new(statistic: String, value: String, notes: Option<String>) -> Self {
        Self {
            statistic,
            value,
            notes: notes.unwrap_or_default(),
        }
    }
}
impl std::default::Default for StatSummary {
    fn default() -> Self {
        Self {
            statistic: "".to_string(),
            value: "".to_string(),
            notes: "".to_string(),
        }
    }
}

/// Describes the columns of the vertex class table
#[derive(Tabled)]
struct VertexClassSummary {
    pub vertex: String,
    pub events: String,
}

/// Describes the columns of the event counters table, one row per trigger bin
#[derive(Tabled)]
pub struct CounterSummary {
    pub trigger: String,
    #[tabled(rename = "PhysSel")]
    pub phys_sel: String,
    #[tabled(rename = "SPDVert")]
    pub spd_vert: String,
    #[tabled(rename = "TrackVert")]
    pub track_vert: String,
}

/// The Report struct is used by the Controller to structure the report printed at the end of execution
///
/// Contains convenience methods to add stats to the report, and to generate the report table
pub struct Report {
    pub(crate) stats: Vec<StatSummary>,
    counters: Vec<CounterSummary>,
    vertex_classes: Vec<VertexClassSummary>,
    processing_time: std::time::Duration,
    fatal_error: Option<String>,
    report_table: Option<Table>,
}
impl Report {
    pub fn new(processing_time: std::time::Duration) -> Self {
        Self {
            stats: Vec::new(),
            counters: Vec::new(),
            vertex_classes: Vec::new(),
            processing_time,
            fatal_error: None,
            report_table: None,
        }
    }

    pub fn add_stat(&mut self, stat: StatSummary) {
        self.stats.push(stat);
    }

    pub fn add_counters(&mut self, counters: CounterSummary) {
        self.counters.push(counters);
    }

    pub fn add_vertex_class(&mut self, vertex: String, events: String) {
        self.vertex_classes
            .push(VertexClassSummary { vertex, events });
    }

    pub fn add_fatal_error(&mut self, error: String) {
        self.fatal_error = Some(error);
    }

    /// Builds the report table
    pub fn format(&mut self) -> &Table {
        let mut global_stats_table = Table::new(&self.stats);
        format_global_stats_sub_table(&mut global_stats_table);

        let vertex_classes_table = format_sub_table(
            Table::new(&self.vertex_classes),
            "Vertex Classes".to_string(),
            SubtableColor::Yellow,
        );
        let counters_table = format_sub_table(
            Table::new(&self.counters),
            "Event Counters".to_string(),
            SubtableColor::Purple,
        );

        let mut multi_table = tabled::col![
            global_stats_table,
            tabled::row![counters_table, vertex_classes_table]
        ];
        let multi_table = multi_table.with(tabled::settings::Style::rounded());
        let mut report_table = format_super_table(multi_table, self.processing_time);

        if let Some(fatal_error) = &self.fatal_error {
            let _ = report_table
                .with(Panel::header(format!(
                    "FATAL ERROR - EARLY TERMINATION\n{fatal_error}"
                )))
                .with(Modify::new(Rows::single(0)).with(Alignment::center()).with(
                    Format::content(|x| {
                        let x = x.to_uppercase();
                        x.red().to_string()
                    }),
                ));
        }
        self.report_table.insert(report_table)
    }

    /// Prints the formatted report to stdout.
    pub fn print(&mut self) {
        println!("{final_report}", final_report = self.format());
    }
}
