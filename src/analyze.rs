//! Contains the [spawn_analysis] function that spawns the analysis thread, classifying events or generating views of them.
pub mod view;

use crate::classify::DEFAULT_CENTRALITY;
use crate::util::*;

/// Analysis thread that classifies the events of each batch and sends the outcome to the [Controller](crate::controller::Controller).
///
/// If a view is configured, the classified events are also printed with [view::generate_view].
pub fn spawn_analysis(
    config: &'static impl Config,
    stop_flag: Arc<AtomicBool>,
    stats_send: flume::Sender<StatType>,
    data_recv: crossbeam_channel::Receiver<EventBatch>,
) -> Result<JoinHandle<()>, io::Error> {
    let analysis_thread = Builder::new().name("Analysis".to_string());
    analysis_thread.spawn({
        move || {
            let analyzer = EventAnalyzer::new(config.estimator(), stats_send.clone());
            let mut print_header = true;
            while !stop_flag.load(Ordering::SeqCst) {
                // Receive batch from reader
                let batch = match data_recv.recv() {
                    Ok(batch) => batch,
                    Err(e) => {
                        debug_assert_eq!(e, crossbeam_channel::RecvError);
                        break;
                    }
                };

                let observations: Vec<Option<Observation>> =
                    batch.iter().map(|event| analyzer.analyze(event)).collect();

                if let Some(view) = config.view() {
                    let rows: Vec<view::ViewRow> = batch.iter().zip(observations).collect();
                    if let Err(e) = view::generate_view(
                        view,
                        &rows,
                        print_header,
                        config.disable_styled_views(),
                    ) {
                        stats_send
                            .send(StatType::Fatal(e.to_string().into()))
                            .expect("Couldn't send to Controller");
                    }
                    print_header = false;
                }
            }
            log::trace!("Analysis done");
        }
    })
}

/// Classifies scanned events and reports the outcome as [StatType]s.
#[derive(Debug)]
pub struct EventAnalyzer {
    classifier: EventClassifier,
    stats_send: flume::Sender<StatType>,
}

impl EventAnalyzer {
    /// Create an analyzer that reads the centrality from `estimator`.
    pub fn new(estimator: &str, stats_send: flume::Sender<StatType>) -> Self {
        Self {
            classifier: EventClassifier::new(estimator),
            stats_send,
        }
    }

    /// Classify one scanned event.
    ///
    /// Every event is reported as seen. Malformed and missing events are reported as errors and nothing is counted for them.
    /// An event without a centrality estimate is counted at the default centrality and reported as a warning.
    pub fn analyze(&self, event: &ScannedEvent) -> Option<Observation> {
        self.send(StatType::EventSeen);
        let line = event.line();

        if let ScannedEvent::Malformed { reason, .. } = event {
            self.send(StatType::Error(
                format!("line {line}: [E10] Malformed event record: {reason}").into(),
            ));
            return None;
        }

        match self.classifier.classify(event.record()) {
            Ok(observation) => {
                if observation.centrality.is_defaulted() {
                    self.send(StatType::Warning(
                        format!(
                            "line {line}: [W20] No {estimator} multiplicity, centrality set to {DEFAULT_CENTRALITY}",
                            estimator = self.classifier.estimator()
                        )
                        .into(),
                    ));
                }
                self.send(StatType::Observation(observation));
                Some(observation)
            }
            Err(e) => {
                self.send(StatType::Error(format!("line {line}: {e}").into()));
                None
            }
        }
    }

    #[inline]
    fn send(&self, stat: StatType) {
        self.stats_send
            .send(stat)
            .expect("Couldn't send to Controller");
    }
}
