//! Text figures rendered onto a terminal-sized canvas.
//!
//! A [`Figure`] only knows its title and rows; how wide the bars get and
//! how many rows fit is decided by the [`Canvas`] it is attached to.

use std::io::Write;

use console::Term;

use qprobe_hal::{HalResult, JobResult};

use crate::format::format_counts;

/// Fallback canvas size when no canvas is attached.
const DEFAULT_WIDTH: usize = 80;
const DEFAULT_HEIGHT: usize = 24;

/// Columns used by a row besides its label and bar.
const ROW_OVERHEAD: usize = 2 + 2 + 8 + 10 + 1;

/// A drawing surface of fixed size, in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Canvas {
    /// Columns.
    pub width: usize,
    /// Lines.
    pub height: usize,
}

impl Canvas {
    /// A canvas of the given size.
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// A canvas matching the current terminal.
    pub fn for_terminal() -> Self {
        let (rows, cols) = Term::stdout().size();
        Self::new(usize::from(cols), usize::from(rows))
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new(DEFAULT_WIDTH, DEFAULT_HEIGHT)
    }
}

/// One labelled bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FigureRow {
    /// Row label.
    pub label: String,
    /// Bar value.
    pub value: u64,
}

/// A titled horizontal bar chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Figure {
    title: String,
    rows: Vec<FigureRow>,
    canvas: Option<Canvas>,
}

impl Figure {
    /// An empty figure, not yet attached to a canvas.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            rows: Vec::new(),
            canvas: None,
        }
    }

    /// Append a row.
    pub fn push(&mut self, label: impl Into<String>, value: u64) {
        self.rows.push(FigureRow {
            label: label.into(),
            value,
        });
    }

    /// Title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Rows in insertion order.
    pub fn rows(&self) -> &[FigureRow] {
        &self.rows
    }

    /// The attached canvas, if any.
    pub fn canvas(&self) -> Option<Canvas> {
        self.canvas
    }

    /// Attach the figure to `canvas`, replacing any previous one.
    pub fn set_canvas(&mut self, canvas: Canvas) {
        self.canvas = Some(canvas);
    }

    /// Render against the attached canvas.
    pub fn render(&self) -> String {
        let canvas = self.canvas.unwrap_or_default();
        let mut text = format!("{}\n", self.title);

        let total: u64 = self.rows.iter().map(|r| r.value).sum();
        let max = self.rows.iter().map(|r| r.value).max().unwrap_or(0);
        let label_width = self
            .rows
            .iter()
            .map(|r| r.label.chars().count())
            .max()
            .unwrap_or(0);
        let bar_width = canvas
            .width
            .saturating_sub(label_width + ROW_OVERHEAD)
            .max(1);
        // Title and the overflow line take one line each.
        let visible = canvas.height.saturating_sub(2).max(1);

        for row in self.rows.iter().take(visible) {
            let pct = if total == 0 {
                0.0
            } else {
                row.value as f64 / total as f64 * 100.0
            };
            let bar_len = if max == 0 {
                0
            } else {
                (row.value as f64 / max as f64 * bar_width as f64).round() as usize
            };
            text.push_str(&format!(
                "  {:<label_width$}: {:>8} ({:>6.2}%) {}\n",
                row.label,
                row.value,
                pct,
                "█".repeat(bar_len),
            ));
        }
        if self.rows.len() > visible {
            text.push_str(&format!(
                "  ... and {} more outcomes\n",
                self.rows.len() - visible
            ));
        }
        text
    }
}

/// Histogram of measured states, in the given order.
pub fn counts_histogram(title: impl Into<String>, counts: &[(String, u64)]) -> Figure {
    let mut figure = Figure::new(title);
    for (state, count) in counts {
        figure.push(state.clone(), *count);
    }
    figure
}

/// One histogram per circuit of a successful result.
///
/// Results that are not [`JobResult::is_successful`] yield no figures.
pub fn result_histograms(result: &JobResult) -> HalResult<Vec<Figure>> {
    if !result.is_successful() {
        return Ok(Vec::new());
    }
    Ok(result
        .experiments()?
        .into_iter()
        .map(|experiment| {
            let counts = format_counts(&experiment.data.counts, &experiment.header);
            counts_histogram(format!("Circuit: {}", experiment.header.name), &counts)
        })
        .collect())
}

/// Re-parent `figure` onto a fresh terminal-sized canvas and write it out.
pub fn show_figure(figure: &mut Figure, out: &mut dyn Write) -> std::io::Result<()> {
    figure.set_canvas(Canvas::for_terminal());
    out.write_all(figure.render().as_bytes())
}
