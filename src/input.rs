//! Contains the [EventScanner] that reads event records from JSON Lines input, and the [EventBatch] it groups them in.
//!
//! The helper function [spawn_reader] spawns a thread that reads the input and sends batches to a channel that is returned from the function.
//!
//! Each non-blank line of the input holds one event. A line with the literal `null` is a missing event,
//! and a line that doesn't deserialize into an [EventRecord] is kept as malformed so it can be reported along with its line number.

use crate::util::*;
use std::io::IsTerminal;

/// Depth of the FIFO where the event batches are inserted as they are read
pub const CHANNEL_BATCH_CAPACITY: usize = 100;
/// Max number of events in a batch
pub const BATCH_SIZE: usize = 1000;
const READER_BUFFER_SIZE: usize = 1024 * 50; // 50KB

/// One scanned line of the input
#[derive(Debug, Clone, PartialEq)]
pub enum ScannedEvent {
    /// A successfully parsed event
    Event {
        /// Line number in the input (1-indexed)
        line: u64,
        /// The parsed event
        record: Box<EventRecord>,
    },
    /// The input had no event for this entry
    Missing {
        /// Line number in the input (1-indexed)
        line: u64,
    },
    /// The line could not be parsed as an event
    Malformed {
        /// Line number in the input (1-indexed)
        line: u64,
        /// Why parsing failed
        reason: Box<str>,
    },
}

impl ScannedEvent {
    /// Line number of the scanned event
    pub fn line(&self) -> u64 {
        match self {
            ScannedEvent::Event { line, .. }
            | ScannedEvent::Missing { line }
            | ScannedEvent::Malformed { line, .. } => *line,
        }
    }

    /// Returns the event record if there is one.
    pub fn record(&self) -> Option<&EventRecord> {
        match self {
            ScannedEvent::Event { record, .. } => Some(record),
            _ => None,
        }
    }
}

/// A batch of scanned events, in input order.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct EventBatch {
    events: Vec<ScannedEvent>,
}

impl EventBatch {
    /// Create a batch with room for `capacity` events.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            events: Vec::with_capacity(capacity),
        }
    }

    /// Add an event to the batch.
    pub fn push(&mut self, event: ScannedEvent) {
        self.events.push(event);
    }

    /// Number of events in the batch.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns true if the batch has no events.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Iterate over the events in the batch.
    pub fn iter(&self) -> std::slice::Iter<'_, ScannedEvent> {
        self.events.iter()
    }
}

impl IntoIterator for EventBatch {
    type Item = ScannedEvent;
    type IntoIter = std::vec::IntoIter<ScannedEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.into_iter()
    }
}

impl<'a> IntoIterator for &'a EventBatch {
    type Item = &'a ScannedEvent;
    type IntoIter = std::slice::Iter<'a, ScannedEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}

/// Reads event records line by line from a buffered reader.
#[derive(Debug)]
pub struct EventScanner<R: BufRead> {
    reader: R,
    line_buf: Vec<u8>,
    lines_read: u64,
    // Read error held back until the events scanned before it are returned
    pending_err: Option<io::Error>,
}

impl<R: BufRead> EventScanner<R> {
    /// Create a new scanner on top of a buffered reader.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line_buf: Vec::new(),
            lines_read: 0,
            pending_err: None,
        }
    }

    /// Number of lines read so far, including blank lines.
    pub fn lines_read(&self) -> u64 {
        self.lines_read
    }

    /// Scan the next event.
    ///
    /// Returns `Ok(None)` at the end of the input. Blank lines are skipped.
    /// A line that isn't valid UTF-8 is scanned as [ScannedEvent::Malformed].
    pub fn next_event(&mut self) -> io::Result<Option<ScannedEvent>> {
        if let Some(e) = self.pending_err.take() {
            return Err(e);
        }
        loop {
            self.line_buf.clear();
            if self.reader.read_until(b'\n', &mut self.line_buf)? == 0 {
                return Ok(None);
            }
            self.lines_read += 1;
            let line = match std::str::from_utf8(&self.line_buf) {
                Ok(line) => line.trim(),
                Err(e) => {
                    return Ok(Some(ScannedEvent::Malformed {
                        line: self.lines_read,
                        reason: format!("invalid UTF-8: {e}").into(),
                    }))
                }
            };
            if line.is_empty() {
                continue;
            }
            return Ok(Some(parse_line(line, self.lines_read)));
        }
    }

    /// Scan up to `max_events` events into a batch.
    ///
    /// Returns `Ok(None)` if the input is exhausted before any event is scanned.
    /// If reading fails after some events were scanned, those events are returned and the error is returned by the next call.
    pub fn next_batch(&mut self, max_events: usize) -> io::Result<Option<EventBatch>> {
        let mut batch = EventBatch::with_capacity(max_events);
        while batch.len() < max_events {
            match self.next_event() {
                Ok(Some(event)) => batch.push(event),
                Ok(None) => break,
                Err(e) if batch.is_empty() => return Err(e),
                Err(e) => {
                    self.pending_err = Some(e);
                    break;
                }
            }
        }
        if batch.is_empty() {
            Ok(None)
        } else {
            Ok(Some(batch))
        }
    }
}

fn parse_line(line: &str, line_number: u64) -> ScannedEvent {
    match serde_json::from_str::<Option<EventRecord>>(line) {
        Ok(Some(record)) => ScannedEvent::Event {
            line: line_number,
            record: Box::new(record),
        },
        Ok(None) => ScannedEvent::Missing { line: line_number },
        Err(e) => ScannedEvent::Malformed {
            line: line_number,
            reason: e.to_string().into(),
        },
    }
}

/// Initializes the reader based on the input mode (file or stdin) and returns it
///
/// The input mode is determined by the presence of the input file path in the config
pub fn init_reader(input_file: Option<&Path>) -> io::Result<Box<dyn BufRead + Send>> {
    if let Some(path) = input_file {
        let f = fs::OpenOptions::new().read(true).open(path)?;
        Ok(Box::new(io::BufReader::with_capacity(READER_BUFFER_SIZE, f)))
    } else if !io::stdin().is_terminal() {
        Ok(Box::new(io::BufReader::with_capacity(
            READER_BUFFER_SIZE,
            io::stdin(),
        )))
    } else {
        Err(io::Error::new(io::ErrorKind::Other, "stdin not redirected!"))
    }
}

/// Spawns a reader thread that reads event batches from the input and sends them to a producer channel
///
/// Read errors are sent as fatal errors on the stats channel.
/// Returns the thread handle and the receiver channel
pub fn spawn_reader<R: BufRead + Send + 'static>(
    stop_flag: Arc<AtomicBool>,
    scanner: EventScanner<R>,
    stats_send: flume::Sender<StatType>,
) -> (JoinHandle<()>, crossbeam_channel::Receiver<EventBatch>) {
    let reader_thread = Builder::new().name("Reader".to_string());
    let (send_chan, recv_chan) = crossbeam_channel::bounded(CHANNEL_BATCH_CAPACITY);
    let thread_handle = reader_thread
        .spawn({
            move || {
                let mut scanner = scanner;
                while !stop_flag.load(Ordering::SeqCst) {
                    let batch = match scanner.next_batch(BATCH_SIZE) {
                        Ok(Some(batch)) => batch,
                        Ok(None) => break,
                        Err(e) => {
                            stats_send
                                .send(StatType::Fatal(
                                    format!(
                                        "Failed reading input after line {}: {e}",
                                        scanner.lines_read()
                                    )
                                    .into(),
                                ))
                                .ok();
                            break;
                        }
                    };
                    // Send a batch to the analysis
                    if send_chan.send(batch).is_err() {
                        break;
                    }
                }
                log::trace!("Reader done after {} lines", scanner.lines_read());
            }
        })
        .expect("Failed to spawn reader thread");
    (thread_handle, recv_chan)
}
