//! Miscellaneous utility functions
pub mod lib;

pub(crate) use {
    crate::{
        classify::{Counter, CounterRecord, EventClassifier, Observation, VertexClass},
        config::{
            custom_checks::{CustomChecks, CustomChecksOpt},
            inputoutput::{DataOutputFormat, DataOutputMode},
            prelude::*,
            Cfg,
        },
        event::{EventRecord, TriggerBin},
        input::{EventBatch, ScannedEvent},
        stats::{
            self,
            histogram::{Axis, Hist1D, Hist2D},
            stats_collector::{event_counters::EventCounters, StatsCollector},
            stats_report::report::{Report, StatSummary},
            StatType,
        },
    },
    clap::{
        builder::{
            styling::{AnsiColor, Effects},
            Styles,
        },
        Args, Subcommand,
    },
    crossbeam_channel, flume,
    indicatif::{ProgressBar, ProgressStyle},
    itertools::Itertools,
    owo_colors::OwoColorize,
    regex::Regex,
    serde::{Deserialize, Serialize},
    std::{
        error, fmt, fs,
        io::{self, BufRead},
        path::{Path, PathBuf},
        process::ExitCode,
        str::FromStr,
        sync::{
            atomic::{self, AtomicBool, Ordering},
            Arc, OnceLock,
        },
        thread::{self, Builder, JoinHandle},
        time::{Duration, Instant},
    },
};
