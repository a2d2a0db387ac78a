use std::{
    fmt,
    fs::File,
    io::{self, BufWriter, Write},
    mem,
};

use tracing::{debug, error};

use crate::domain::{
    error::{SegmentError, SegmentResult},
    segment::{SegmentSummary, destination_comment, segment_file_name},
    statement::{StatementLimit, count_statements},
};

/// An open output and the name it is reported under.
struct Destination {
    name: String,
    sink: Box<dyn Write>,
}

impl Destination {
    fn new(name: String, sink: impl Write + 'static) -> Self {
        Self {
            name,
            sink: Box::new(sink),
        }
    }

    fn write_text(&mut self, text: &str) -> SegmentResult<()> {
        self.sink
            .write_all(text.as_bytes())
            .map_err(|source| SegmentError::WriteFailure {
                destination: self.name.clone(),
                source,
            })
    }

    fn close(mut self) -> SegmentResult<()> {
        // Dropping the sink releases the handle; only the flush can report.
        self.sink
            .flush()
            .map_err(|source| SegmentError::CloseFailure {
                destination: self.name,
                source,
            })
    }
}

impl fmt::Debug for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Destination")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

#[derive(Debug)]
enum Handle {
    Unopened,
    /// Caller-supplied destination that has not been bracketed by a header yet.
    Pending(Destination),
    Open(Destination),
}

#[derive(Debug, Clone, Copy)]
enum Segmenting {
    Enabled(StatementLimit),
    Disabled,
}

/// Text handed to the raw write primitive. Only payload is counted.
enum Text<'a> {
    Payload(&'a str),
    Header,
    Footer,
}

/// Writes SQL text into a sequence of numbered files, rolling over to the next
/// file once the statement limit is reached.
///
/// Every destination starts with a `-- <name>` comment line and the header
/// text in effect when it was opened, and ends with the footer text in effect
/// when it was closed. Nothing touches the filesystem until the first
/// [`write`](Self::write).
///
/// Call [`finish`](Self::finish) to close the last destination and observe
/// errors. Dropping the writer performs the same teardown and logs failures.
#[derive(Debug)]
pub struct SegmentedWriter {
    base_name: String,
    segment_number: u32,
    segmenting: Segmenting,
    handle: Handle,
    statement_count: usize,
    header: String,
    footer: String,
    completed: Vec<SegmentSummary>,
}

impl SegmentedWriter {
    /// Writer that creates `<base_name><segment_number>.sql` files on demand,
    /// starting at `starting_segment`.
    pub fn new(
        base_name: impl Into<String>,
        starting_segment: u32,
        statement_limit: StatementLimit,
    ) -> Self {
        Self {
            base_name: base_name.into(),
            segment_number: starting_segment,
            segmenting: Segmenting::Enabled(statement_limit),
            handle: Handle::Unopened,
            statement_count: 0,
            header: String::new(),
            footer: String::new(),
            completed: Vec::new(),
        }
    }

    /// Writer bound to an already-open destination. Segmenting is disabled for
    /// the writer's whole life; `destination_name` must not be blank.
    pub fn with_destination(
        base_name: impl Into<String>,
        starting_segment: u32,
        destination: impl Write + 'static,
        destination_name: impl Into<String>,
    ) -> SegmentResult<Self> {
        let destination_name = destination_name.into();
        if destination_name.trim().is_empty() {
            return Err(SegmentError::InvalidConfiguration(
                "a destination name is required when a fixed destination is supplied"
                    .to_string(),
            ));
        }
        debug!("Fixed output file specified: {destination_name}");

        Ok(Self {
            base_name: base_name.into(),
            segment_number: starting_segment,
            segmenting: Segmenting::Disabled,
            handle: Handle::Pending(Destination::new(destination_name, destination)),
            statement_count: 0,
            header: String::new(),
            footer: String::new(),
            completed: Vec::new(),
        })
    }

    pub fn set_header(&mut self, text: impl Into<String>) {
        self.header = text.into();
    }

    pub fn append_header(&mut self, text: &str) {
        self.header.push_str(text);
    }

    pub fn append_footer(&mut self, text: &str) {
        self.footer.push_str(text);
    }

    pub fn header(&self) -> &str {
        &self.header
    }

    pub fn footer(&self) -> &str {
        &self.footer
    }

    pub fn base_name(&self) -> &str {
        &self.base_name
    }

    pub fn segment_number(&self) -> u32 {
        self.segment_number
    }

    /// Statements written to the current destination since its header.
    pub fn statement_count(&self) -> usize {
        self.statement_count
    }

    pub fn is_segmenting(&self) -> bool {
        matches!(self.segmenting, Segmenting::Enabled(_))
    }

    /// Name of the open destination, or the supplied one in fixed mode.
    pub fn current_destination_name(&self) -> Option<&str> {
        match &self.handle {
            Handle::Unopened => None,
            Handle::Pending(destination) | Handle::Open(destination) => Some(&destination.name),
        }
    }

    /// Destinations closed so far, oldest first.
    pub fn completed_segments(&self) -> &[SegmentSummary] {
        &self.completed
    }

    /// Writes `text` verbatim to the current destination, opening one first if
    /// needed, and rolls over once the statement limit is reached.
    pub fn write(&mut self, text: &str) -> SegmentResult<()> {
        self.ensure_open()?;
        self.write_raw(Text::Payload(text))?;

        if let Segmenting::Enabled(limit) = self.segmenting
            && limit.is_reached_by(self.statement_count)
        {
            self.next_segment()?;
        }
        Ok(())
    }

    pub fn write_line(&mut self, line: &str) -> SegmentResult<()> {
        self.write(&format!("{line}\n"))
    }

    /// Writes the footer, closes the last destination and returns a summary of
    /// every destination this writer closed.
    pub fn finish(mut self) -> SegmentResult<Vec<SegmentSummary>> {
        self.teardown()?;
        Ok(mem::take(&mut self.completed))
    }

    fn ensure_open(&mut self) -> SegmentResult<()> {
        match self.handle {
            Handle::Open(_) => Ok(()),
            Handle::Pending(_) => self.adopt_fixed_destination(),
            Handle::Unopened => self.next_segment(),
        }
    }

    fn adopt_fixed_destination(&mut self) -> SegmentResult<()> {
        if let Handle::Pending(destination) = mem::replace(&mut self.handle, Handle::Unopened) {
            self.handle = Handle::Open(destination);
        }
        self.statement_count = 0;
        self.write_raw(Text::Header)
    }

    fn next_segment(&mut self) -> SegmentResult<()> {
        if !self.is_segmenting() {
            return Err(SegmentError::InvalidConfiguration(
                "cannot roll over a fixed destination".to_string(),
            ));
        }

        let mut close_result = Ok(());
        if let Handle::Open(_) = self.handle {
            let next_number = self.segment_number.checked_add(1).ok_or_else(|| {
                SegmentError::SegmentNumbersExhausted {
                    base_name: self.base_name.clone(),
                    last: self.segment_number,
                }
            })?;
            self.write_raw(Text::Footer)?;
            close_result = self.close_current();
            self.segment_number = next_number;
        }

        if let Err(open_error) = self.open_segment() {
            if let Err(close_error) = close_result {
                error!("Previous segment was not closed cleanly: {close_error}");
            }
            return Err(open_error);
        }
        close_result
    }

    fn open_segment(&mut self) -> SegmentResult<()> {
        let name = segment_file_name(&self.base_name, self.segment_number);
        debug!("Opening output file segment {name}");
        let file = File::create(&name).map_err(|source| SegmentError::OpenFailure {
            destination: name.clone(),
            source,
        })?;
        self.handle = Handle::Open(Destination::new(name, BufWriter::new(file)));
        self.statement_count = 0;
        self.write_raw(Text::Header)
    }

    /// The one place text reaches a destination. Header and footer go through
    /// here too, but are never counted and never trigger a rollover.
    fn write_raw(&mut self, text: Text<'_>) -> SegmentResult<()> {
        let Handle::Open(destination) = &mut self.handle else {
            return Err(SegmentError::WriteFailure {
                destination: self.base_name.clone(),
                source: io::Error::new(io::ErrorKind::NotConnected, "no destination is open"),
            });
        };

        match text {
            Text::Payload(payload) => {
                destination.write_text(payload)?;
                self.statement_count += count_statements(payload);
            }
            Text::Header => {
                let comment = destination_comment(&destination.name);
                destination.write_text(&comment)?;
                destination.write_text(&self.header)?;
            }
            Text::Footer => destination.write_text(&self.footer)?,
        }
        Ok(())
    }

    fn close_current(&mut self) -> SegmentResult<()> {
        match mem::replace(&mut self.handle, Handle::Unopened) {
            Handle::Open(destination) => {
                self.completed.push(SegmentSummary {
                    name: destination.name.clone(),
                    statement_count: self.statement_count,
                });
                destination.close()
            }
            Handle::Pending(destination) => destination.close(),
            Handle::Unopened => Ok(()),
        }
    }

    /// Leaves the handle unopened whatever happens, so a second call is a no-op.
    fn teardown(&mut self) -> SegmentResult<()> {
        let footer_result = match self.handle {
            Handle::Open(_) => self.write_raw(Text::Footer),
            Handle::Pending(_) | Handle::Unopened => Ok(()),
        };
        let close_result = self.close_current();
        footer_result.and(close_result)
    }
}

impl Drop for SegmentedWriter {
    fn drop(&mut self) {
        if let Err(error) = self.teardown() {
            error!("Failed to finalize segmented output: {error}");
        }
    }
}
