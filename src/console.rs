//! Line-oriented rating surface.
//!
//! Shows one comparison at a time and reads the rater's answer from a
//! `BufRead`. Generic over input/output so the loop can be driven by tests as
//! well as a terminal.

use std::io::{BufRead, Write};

use crate::catalog::{Catalog, Item};
use crate::session::{ComparisonPair, SessionError, SessionState, Side};
use crate::upload::UploadSink;

#[derive(Debug, Clone)]
pub struct ConsoleOptions {
    /// Export automatically once this many judgments are pending.
    pub export_every: Option<usize>,
    /// Image cells shown per item.
    pub image_slots: usize,
    /// Export whatever is pending when the rater quits.
    pub export_on_quit: bool,
}

impl Default for ConsoleOptions {
    fn default() -> Self {
        Self {
            export_every: None,
            image_slots: crate::catalog::DISPLAY_IMAGE_COUNT,
            export_on_quit: true,
        }
    }
}

/// Counters reported when the loop ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConsoleSummary {
    pub rounds: u64,
    pub exported: usize,
    pub pending: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum ConsoleError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Session(#[from] SessionError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Pick(Side),
    Export,
    Results,
    Quit,
}

fn parse_command(line: &str) -> Option<Command> {
    match line.trim().to_ascii_lowercase().as_str() {
        "a" => Some(Command::Pick(Side::A)),
        "b" => Some(Command::Pick(Side::B)),
        "e" | "export" => Some(Command::Export),
        "r" | "results" => Some(Command::Results),
        "q" | "quit" | "exit" => Some(Command::Quit),
        _ => None,
    }
}

/// Pending judgments as an aligned table plus the comparison count.
pub fn render_results(state: &SessionState) -> String {
    if state.pending_count() == 0 {
        return format!(
            "No pending comparisons. Comparisons made: {}\n",
            state.rounds()
        );
    }
    let mut out = format!("{:>9}  {:>6}  {:>5}\n", "title_idx", "winner", "loser");
    for j in state.pending() {
        out.push_str(&format!(
            "{:>9}  {:>6}  {:>5}\n",
            j.item_id, j.winner, j.loser
        ));
    }
    out.push_str(&format!("Comparisons made: {}\n", state.rounds()));
    out
}

fn render_pair(
    out: &mut impl Write,
    item: &Item,
    pair: &ComparisonPair,
    image_slots: usize,
) -> std::io::Result<()> {
    writeln!(out)?;
    writeln!(out, "---")?;
    if let Some(title) = &item.title {
        writeln!(out, "Original Title: {title}")?;
    }
    let images: Vec<&str> = item
        .display_images(image_slots)
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect();
    if !images.is_empty() {
        writeln!(out, "Images: {}", images.join("  "))?;
    }
    writeln!(out, "---")?;
    writeln!(out, "Version A: {}", pair.text(Side::A))?;
    writeln!(out, "---")?;
    writeln!(out, "Version B: {}", pair.text(Side::B))?;
    writeln!(out, "---")?;
    Ok(())
}

async fn export_and_report(
    state: &mut SessionState,
    sink: &dyn UploadSink,
    out: &mut impl Write,
    summary: &mut ConsoleSummary,
) -> std::io::Result<()> {
    match state.export_pending(sink).await {
        Ok(receipt) => {
            summary.exported += receipt.judgments;
            writeln!(
                out,
                "Exported {} comparisons to {}",
                receipt.judgments, receipt.location
            )
        }
        Err(SessionError::EmptyExport) => writeln!(out, "No comparisons to export yet."),
        Err(err) => writeln!(
            out,
            "Export failed: {err}. {} comparisons kept; press [e] to retry.",
            state.pending_count()
        ),
    }
}

/// Run rating rounds until the rater quits or input ends.
pub async fn run<R: BufRead, W: Write>(
    catalog: &Catalog,
    state: &mut SessionState,
    sink: &dyn UploadSink,
    options: &ConsoleOptions,
    mut input: R,
    mut output: W,
) -> Result<ConsoleSummary, ConsoleError> {
    let mut summary = ConsoleSummary::default();
    let mut line = String::new();

    'rounds: loop {
        let pair = state.draw_pair(catalog)?;
        let item = catalog.get_item(pair.item_id).map_err(SessionError::from)?;
        render_pair(&mut output, item, &pair, options.image_slots)?;

        loop {
            write!(
                output,
                "[a] Version A  [b] Version B  [e] export  [r] results  [q] quit > "
            )?;
            output.flush()?;

            line.clear();
            let command = if input.read_line(&mut line)? == 0 {
                Command::Quit
            } else {
                match parse_command(&line) {
                    Some(command) => command,
                    None => {
                        writeln!(output, "Unrecognized input: {}", line.trim())?;
                        continue;
                    }
                }
            };

            match command {
                Command::Pick(side) => {
                    state.record_judgment(&pair, pair.slot(side))?;
                    if options
                        .export_every
                        .is_some_and(|n| n > 0 && state.pending_count() >= n)
                    {
                        export_and_report(state, sink, &mut output, &mut summary).await?;
                    }
                    continue 'rounds;
                }
                Command::Export => {
                    export_and_report(state, sink, &mut output, &mut summary).await?;
                }
                Command::Results => {
                    write!(output, "{}", render_results(state))?;
                }
                Command::Quit => break 'rounds,
            }
        }
    }

    if options.export_on_quit && state.pending_count() > 0 {
        export_and_report(state, sink, &mut output, &mut summary).await?;
    }
    writeln!(output, "Comparisons made: {}", state.rounds())?;
    output.flush()?;

    summary.rounds = state.rounds();
    summary.pending = state.pending_count();
    Ok(summary)
}
