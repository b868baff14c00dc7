// Bar charts of the selection frequencies.

use std::cell::Cell;
use std::rc::Rc;

use crate::sociogram::*;

pub const CHART_TITLE: &str = "Frecuencia de Selección";

/// The data of a horizontal bar chart: one bar per value, sorted by decreasing count.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct BarChart {
    pub question: String,
    pub labels: Vec<Choice>,
    pub values: Vec<u64>,
}

impl BarChart {
    pub fn from_counts(question: &str, counts: &FrequencyCount) -> BarChart {
        let ranked = counts.ranked();
        BarChart {
            question: question.to_string(),
            labels: ranked.iter().map(|(c, _)| c.clone()).collect(),
            values: ranked.iter().map(|(_, n)| *n).collect(),
        }
    }

    /// The value behind the bar at the given index.
    pub fn label_at(&self, index: usize) -> Option<&Choice> {
        self.labels.get(index)
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Something that can display a bar chart.
///
/// The handle returned by `draw` keeps the chart alive; dropping it disposes the chart.
pub trait ChartSurface {
    type Handle;

    fn draw(&mut self, chart: &BarChart) -> Self::Handle;
}

/// Draws the charts as text bars.
#[derive(Debug)]
pub struct TextChartSurface {
    width: usize,
    canvas: String,
    live: Rc<Cell<usize>>,
}

#[derive(Debug)]
pub struct TextChartHandle {
    question: String,
    live: Rc<Cell<usize>>,
}

impl Drop for TextChartHandle {
    fn drop(&mut self) {
        debug!("disposing chart for {:?}", self.question);
        self.live.set(self.live.get() - 1);
    }
}

impl TextChartSurface {
    pub fn new(width: usize) -> TextChartSurface {
        TextChartSurface {
            width,
            canvas: String::new(),
            live: Rc::new(Cell::new(0)),
        }
    }

    /// The last chart drawn.
    pub fn canvas(&self) -> &str {
        &self.canvas
    }

    /// The number of charts that have not been disposed.
    pub fn live_charts(&self) -> usize {
        self.live.get()
    }
}

impl ChartSurface for TextChartSurface {
    type Handle = TextChartHandle;

    fn draw(&mut self, chart: &BarChart) -> TextChartHandle {
        self.canvas = draw_text_chart(chart, self.width);
        self.live.set(self.live.get() + 1);
        TextChartHandle {
            question: chart.question.clone(),
            live: self.live.clone(),
        }
    }
}

pub fn draw_text_chart(chart: &BarChart, width: usize) -> String {
    let labels: Vec<String> = chart.labels.iter().map(|c| c.to_string()).collect();
    let label_width = labels
        .iter()
        .map(|l| l.chars().count())
        .max()
        .unwrap_or(0)
        .min(40);
    let max_value = chart.values.iter().cloned().max().unwrap_or(0);

    let mut res = format!("{}\n", CHART_TITLE);
    for (idx, (label, value)) in labels.iter().zip(chart.values.iter()).enumerate() {
        // Bars are scaled to the largest count, and a non-zero count always gets a bar.
        let len = if max_value == 0 {
            0
        } else {
            ((*value as usize) * width + (max_value as usize) - 1) / (max_value as usize)
        };
        res.push_str(&format!(
            "{:>3} {:<lw$} |{} {}\n",
            idx,
            label,
            "#".repeat(len),
            value,
            lw = label_width
        ));
    }
    res
}
