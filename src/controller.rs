//! Contains the [Controller] that collects stats and reports errors.
//! It also controls the stop flag, which can be used to stop the program if a fatal error occurs, or if the config contains a max number of errors to tolerate.
//! Finally when the event loop breaks (at the end of execution), it will print a summary of the stats collected, using the Report struct.
//!
//! Also contains the convenience [init_controller] function, which spawns a thread with the [Controller] running, and returns the thread handle, the channel to send stats to, and the stop flag.

use crate::util::*;
use std::io::Write;

/// How many events between each update of the spinner prefix
const SPINNER_UPDATE_INTERVAL: u64 = 1024;

/// Spawns a thread with the [Controller] running, and returns the thread handle, the channel to send stats to, the stop flag, and the any errors flag.
///
/// Joining the thread handle returns true if processing ended with a fatal error.
pub fn init_controller<C: Config + 'static>(
    config: &'static C,
) -> (
    JoinHandle<bool>,
    flume::Sender<StatType>,
    Arc<AtomicBool>,
    Arc<AtomicBool>,
) {
    spawn_controller(Controller::new(config))
}

/// Same as [init_controller] but the [Controller] starts out with stats collected in previous runs, e.g. from merged stats files.
pub fn init_controller_with_stats<C: Config + 'static>(
    config: &'static C,
    stats_collector: StatsCollector,
) -> (
    JoinHandle<bool>,
    flume::Sender<StatType>,
    Arc<AtomicBool>,
    Arc<AtomicBool>,
) {
    spawn_controller(Controller::with_collector(config, stats_collector))
}

fn spawn_controller<C: Config + 'static>(
    mut controller: Controller<C>,
) -> (
    JoinHandle<bool>,
    flume::Sender<StatType>,
    Arc<AtomicBool>,
    Arc<AtomicBool>,
) {
    log::trace!("Initializing stats controller");
    let stats_send_chan = controller.send_channel();
    let thread_stop_flag = controller.end_processing_flag();
    let any_errors_flag = controller.any_errors_flag();

    let stats_thread = Builder::new()
        .name("stats_thread".to_string())
        .spawn(move || controller.run())
        .expect("Failed to spawn stats thread");
    (
        stats_thread,
        stats_send_chan,
        thread_stop_flag,
        any_errors_flag,
    )
}

/// The Controller receives stats and builds a summary report that is printed at the end of execution.
pub struct Controller<C: Config + 'static> {
    stats_collector: StatsCollector,
    /// Time from [Controller] is instantiated, to all data processing threads disconnected their [StatType] producer channel.
    pub processing_time: Instant,
    config: &'static C,
    max_tolerate_errors: u32,
    // The channel where stats are received from other threads.
    stats_recv_chan: flume::Receiver<StatType>,
    // The channel stats are sent through, stored so that a clone of the channel can be returned easily
    // Has to be an option so that it can be set to None when the event loop starts.
    // Once run is called no producers that don't already have a channel to send stats through, will be able to get one.
    // This is because the event loop breaks when all sender channels are dropped, and if the Controller keeps a reference to the channel, it will cause a deadlock.
    stats_send_chan: Option<flume::Sender<StatType>>,
    end_processing_flag: Arc<AtomicBool>,
    any_errors_flag: Arc<AtomicBool>,
    spinner: Option<ProgressBar>,
    spinner_message: String,
}
impl<C: Config + 'static> Controller<C> {
    /// Creates a new [Controller] from a [Config], with no stats collected.
    pub fn new(global_config: &'static C) -> Self {
        Self::with_collector(global_config, StatsCollector::default())
    }

    /// Creates a new [Controller] from a [Config], that adds to the stats in `stats_collector`.
    pub fn with_collector(global_config: &'static C, stats_collector: StatsCollector) -> Self {
        let (stats_send_chan, stats_recv_chan): (
            flume::Sender<StatType>,
            flume::Receiver<StatType>,
        ) = flume::unbounded();
        Controller {
            stats_collector,
            config: global_config,
            processing_time: Instant::now(),
            max_tolerate_errors: global_config.max_tolerate_errors(),
            stats_recv_chan,
            stats_send_chan: Some(stats_send_chan),
            end_processing_flag: Arc::new(AtomicBool::new(false)),
            any_errors_flag: Arc::new(AtomicBool::new(false)),
            spinner: if global_config.view().is_some() {
                None
            } else {
                Some(new_styled_spinner())
            },
            spinner_message: String::new(),
        }
    }

    /// Returns a clone of the channel that is used to send stats to the Controller.
    pub fn send_channel(&self) -> flume::Sender<StatType> {
        match self.stats_send_chan.as_ref() {
            Some(chan) => chan.clone(),
            None => {
                log::error!("Controller send channel is none, most likely it is already running and does not accept new producers");
                panic!("Controller send channel is none, most likely it is already running and does not accept new producers");
            }
        }
    }

    /// Returns a cloned reference to the end processing flag.
    pub fn end_processing_flag(&self) -> Arc<AtomicBool> {
        self.end_processing_flag.clone()
    }

    /// Returns a cloned reference to the any errors flag
    ///
    /// The flag is set if there's any errors in the input events at end of processing.
    pub fn any_errors_flag(&self) -> Arc<AtomicBool> {
        self.any_errors_flag.clone()
    }

    /// Starts the event loop for the Controller
    /// This function will block until the channel is closed
    ///
    /// Returns true if a fatal error was received.
    pub fn run(&mut self) -> bool {
        // Set the send stats channel to none so that no new producers can be added, and so the loop breaks when all producers have dropped their channel.
        self.stats_send_chan = None;

        // While loop breaks when an error is received from the channel, which means the channel is disconnected
        while let Ok(stats_update) = self.stats_recv_chan.recv() {
            self.update(stats_update);
        }
        // The report takes the fatal error out of the collector
        let fatal_error = self.stats_collector.any_fatal_err();

        if self.config.custom_checks_enabled() {
            self.stats_collector.validate_custom_stats(self.config);
        }

        // After processing all stats, print the summary report or don't if in view mode
        if self.config.view().is_some() || self.config.stats_output_mode() == DataOutputMode::Stdout
        {
            // Avoid printing the report in the middle of a view, or if stats are written to stdout
            log::info!("View active or stats are written to stdout, skipping report summary printout.");
            self.stats_collector.finalize(self.config.mute_errors());
        } else {
            self.process_stats();

            // Print the summary report if any events were seen. If not, it's likely that an early error occurred and nothing was processed.
            if self.stats_collector.events_seen() > 0 || self.stats_collector.any_fatal_err() {
                self.new_spinner_with_prefix("Generating report".to_string());
                self.print();
            }
        }
        if self.stats_collector.any_errors() {
            self.any_errors_flag.store(true, Ordering::SeqCst);
        }

        // Stats collector will serialize and write out stats if the config specifies it
        if let Some(format) = self.config.stats_output_format() {
            if let Err(e) = self
                .stats_collector
                .write_stats(&self.config.stats_output_mode(), format)
            {
                crate::display_error(&e);
            }
        }

        // User supplied a stats file to compare against, validate the match
        if let Some(input_stats) = self.config.input_stats_file() {
            log::info!("Validating input stats file against collected stats");
            match stats::read_stats_file(input_stats) {
                Ok(input_stats_collector) => {
                    if self
                        .stats_collector
                        .validate_other_stats(&input_stats_collector, self.config.mute_errors())
                        .is_err()
                    {
                        self.any_errors_flag.store(true, Ordering::SeqCst);
                        log::warn!("Input stats did not match collected stats");
                    } else {
                        log::info!("Input stats matched collected stats");
                    }
                }
                Err(e) => {
                    self.any_errors_flag.store(true, Ordering::SeqCst);
                    crate::display_error(&e);
                }
            }
        }
        fatal_error
    }

    fn update(&mut self, stat: StatType) {
        match stat {
            StatType::Observation(_) => self.stats_collector.collect(stat),
            StatType::EventSeen => {
                self.stats_collector.collect(stat);
                let events_seen = self.stats_collector.events_seen();
                if events_seen % SPINNER_UPDATE_INTERVAL == 1 {
                    if let Some(spinner) = self.spinner.as_mut() {
                        spinner.set_prefix(format!("Analyzing {events_seen} events"));
                    }
                }
            }
            StatType::Warning(msg) => {
                if !self.config.mute_errors() {
                    log::warn!("{msg}");
                }
                self.stats_collector.collect(StatType::Warning(msg));
            }
            StatType::Error(msg) => {
                // Stop processing any error messages
                if self.stats_collector.any_fatal_err() {
                    log::trace!("Fatal error already seen, ignoring error: {msg}");
                    return;
                }

                self.stats_collector.collect(StatType::Error(msg));

                self.set_spinner_msg(
                    format!(
                        "{err_cnt} Errors in input!",
                        err_cnt = self.stats_collector.err_count()
                    )
                    .red()
                    .to_string(),
                );

                if self.max_tolerate_errors > 0 {
                    log::trace!("Error count: {}", self.stats_collector.err_count());
                    if self.stats_collector.err_count() == self.max_tolerate_errors as u64 {
                        log::trace!("Errors reached maximum tolerated errors, exiting...");
                        self.end_processing_flag.store(true, Ordering::SeqCst);
                    }
                }
            }
            StatType::Fatal(err) => {
                // Stop processing any error messages
                if self.stats_collector.any_fatal_err() {
                    log::trace!("Fatal error already seen, ignoring error: {err}");
                    return;
                }
                self.end_processing_flag.store(true, Ordering::SeqCst);
                log::error!("FATAL: {err}\nShutting down...");
                self.stats_collector.collect(StatType::Fatal(err));
            }
        }
    }

    fn process_stats(&mut self) {
        // New spinner/progress bar if there's any errors
        if self.stats_collector.err_count() > 0 {
            self.new_spinner_with_prefix(
                format!(
                    "Processing {err_count} error messages",
                    err_count = self.stats_collector.err_count()
                )
                .yellow()
                .to_string(),
            );
            self.stats_collector.finalize(self.config.mute_errors());
            if let Some(spinner) = self.spinner.as_mut() {
                spinner.abandon();
            }
        } else {
            self.stats_collector.finalize(self.config.mute_errors());
        }

        if self.stats_collector.any_errors() && !self.config.mute_errors() {
            // Print the errors, limited if there's a max error limit set
            let max_errors = match self.config.max_tolerate_errors() {
                0 => usize::MAX,
                max => max as usize,
            };
            self.stats_collector
                .error_stats()
                .errors_as_slice_iter()
                .take(max_errors)
                .for_each(|e| crate::display_error(e));
        }
    }

    /// Builds and prints the report
    fn print(&mut self) {
        let mut report = stats::stats_report::make_report(
            self.processing_time.elapsed(),
            &mut self.stats_collector,
            self.config.estimator(),
        );
        self.append_spinner_msg("... completed");
        if let Some(spinner) = self.spinner.as_mut() {
            spinner.abandon();
        }

        let mut lock = io::stdout().lock();
        if let Err(e) = writeln!(lock, "{}", report.format()) {
            if e.kind() == io::ErrorKind::BrokenPipe {
                log::warn!("Broken pipe, stdout was closed before report could be written");
            } else {
                log::error!("Failed to write report to stdout: {e}");
            }
        }
    }

    /// Add completed message to current spinner and abandon it
    /// Replace it with new spinner with an empty message
    /// Set the new spinners prefix message
    fn new_spinner_with_prefix(&mut self, prefix: String) {
        if self.spinner.is_some() {
            self.append_spinner_msg("... completed");
        }
        if let Some(spinner) = self.spinner.take() {
            spinner.abandon();
        }
        let spinner = new_styled_spinner();
        spinner.set_prefix(prefix);
        self.spinner = Some(spinner);
        self.spinner_message = String::new();
    }

    fn set_spinner_msg(&mut self, new_msg: String) {
        if let Some(spinner) = self.spinner.as_mut() {
            self.spinner_message = new_msg;
            spinner.set_message(self.spinner_message.clone());
        }
    }

    fn append_spinner_msg(&mut self, to_append: &str) {
        if let Some(spinner) = self.spinner.as_mut() {
            self.spinner_message = self.spinner_message.clone() + to_append + " ";
            spinner.set_message(self.spinner_message.clone());
        }
    }
}

fn new_styled_spinner() -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    match ProgressStyle::with_template("{spinner} [ {prefix:.bold.blue} ] {wide_msg}") {
        Ok(style) => pb.set_style(style.tick_strings(&[
            "▹▹▹▹▹",
            "▸▹▹▹▹",
            "▹▸▹▹▹",
            "▹▹▸▹▹",
            "▹▹▹▸▹",
            "▹▹▹▹▸",
            "▪▪▪▪▪",
        ])),
        Err(e) => log::debug!("Failed to style spinner: {e}"),
    }
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

#[cfg(test)]
mod tests {
    use super::*;
    use temp_dir::TempDir;

    fn observation() -> Observation {
        EventClassifier::default()
            .classify(Some(
                &serde_json::from_str(
                    r#"{"trigger_mask":2,"primary_vertex":{"title":"vertexer: 3D"},"spd_vertex":{"n_contributors":4},"multiplicity":{"V0M":12.5}}"#,
                )
                .unwrap(),
            ))
            .unwrap()
    }

    static CONFIG_TEST_INIT_CONTROLLER: OnceLock<MockConfig> = OnceLock::new();

    #[test]
    fn test_init_controller() {
        let mock_config = MockConfig::default();
        CONFIG_TEST_INIT_CONTROLLER.set(mock_config).unwrap();

        let (handle, send_ch, stop_flag, _errors_flag) =
            init_controller(CONFIG_TEST_INIT_CONTROLLER.get().unwrap());

        // Stop flag should be false
        assert!(!stop_flag.load(Ordering::SeqCst));

        send_ch.send(StatType::EventSeen).unwrap();
        send_ch.send(StatType::Observation(observation())).unwrap();

        // Send a fatal error that should cause the stop flag to be set
        send_ch
            .send(StatType::Fatal("Test fatal error".to_string().into()))
            .unwrap();

        // Stop the controller by dropping the sender channel
        drop(send_ch);

        // Wait for the controller to stop, it reports the fatal error
        assert!(handle.join().unwrap());

        // Stop flag should be true
        assert!(stop_flag.load(Ordering::SeqCst));
    }

    static CONFIG_TEST_MAX_ERRORS: OnceLock<MockConfig> = OnceLock::new();

    #[test]
    fn test_max_tolerate_errors_sets_stop_flag() {
        let mut mock_config = MockConfig::new();
        mock_config.max_tolerate_errors = 2;
        mock_config.mute_errors = true;
        CONFIG_TEST_MAX_ERRORS.set(mock_config).unwrap();

        let (handle, send_ch, stop_flag, any_errors_flag) =
            init_controller(CONFIG_TEST_MAX_ERRORS.get().unwrap());

        send_ch.send(StatType::EventSeen).unwrap();
        send_ch
            .send(StatType::Error("line 1: [E11] Missing event, skipped".into()))
            .unwrap();
        assert!(!stop_flag.load(Ordering::SeqCst));
        send_ch.send(StatType::EventSeen).unwrap();
        send_ch
            .send(StatType::Error("line 2: [E11] Missing event, skipped".into()))
            .unwrap();
        drop(send_ch);
        // Too many errors is not a fatal error
        assert!(!handle.join().unwrap());

        assert!(stop_flag.load(Ordering::SeqCst));
        assert!(any_errors_flag.load(Ordering::SeqCst));
    }

    static CONFIG_TEST_WRITE_AND_VALIDATE: OnceLock<MockConfig> = OnceLock::new();

    #[test]
    fn test_write_stats_then_validate_against_them() {
        let tmp_d = TempDir::new().unwrap();
        let stats_file = tmp_d.child("stats.toml");

        // Collect and write stats
        let mut stats = StatsCollector::default();
        stats.collect(StatType::EventSeen);
        stats.collect(StatType::Observation(observation()));
        stats.finalize(false);
        stats
            .write_stats(
                &DataOutputMode::File(stats_file.clone().into_boxed_path()),
                DataOutputFormat::TOML,
            )
            .unwrap();

        // A run with the same events validates against the written stats
        let mut mock_config = MockConfig::new();
        mock_config.stats_input_file = Some(stats_file);
        mock_config.view = Some(ViewCommands::Events);
        CONFIG_TEST_WRITE_AND_VALIDATE.set(mock_config).unwrap();

        let (handle, send_ch, _stop_flag, any_errors_flag) =
            init_controller(CONFIG_TEST_WRITE_AND_VALIDATE.get().unwrap());
        send_ch.send(StatType::EventSeen).unwrap();
        send_ch.send(StatType::Observation(observation())).unwrap();
        drop(send_ch);
        assert!(!handle.join().unwrap());

        assert!(!any_errors_flag.load(Ordering::SeqCst));
    }

    static CONFIG_TEST_MERGED: OnceLock<MockConfig> = OnceLock::new();

    #[test]
    fn test_init_controller_with_stats() {
        let mut mock_config = MockConfig::new();
        mock_config.mute_errors = true;
        CONFIG_TEST_MERGED.set(mock_config).unwrap();

        let mut merged = StatsCollector::default();
        merged.collect(StatType::EventSeen);
        merged.collect(StatType::Error("line 1: [E11] Missing event, skipped".into()));

        let (handle, send_ch, stop_flag, any_errors_flag) =
            init_controller_with_stats(CONFIG_TEST_MERGED.get().unwrap(), merged);
        drop(send_ch);
        assert!(!handle.join().unwrap());

        assert!(!stop_flag.load(Ordering::SeqCst));
        assert!(any_errors_flag.load(Ordering::SeqCst));
    }
}
