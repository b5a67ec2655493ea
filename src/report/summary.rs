//! Training summary report

use std::time::Duration;

use chrono::{DateTime, Local};
use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, Color, Table};
use console::style;

use crate::pipeline::PreparationStats;

/// Summary of how the model was prepared, with per-step timings
#[derive(Debug, Clone)]
pub struct TrainingSummary {
    pub stats: PreparationStats,
    pub fitted_at: DateTime<Local>,
    pub load_time: Duration,
    pub clean_time: Duration,
    pub fit_time: Duration,
}

impl TrainingSummary {
    pub fn new(stats: PreparationStats) -> Self {
        Self {
            stats,
            fitted_at: Local::now(),
            load_time: Duration::ZERO,
            clean_time: Duration::ZERO,
            fit_time: Duration::ZERO,
        }
    }

    pub fn set_load_time(&mut self, duration: Duration) {
        self.load_time = duration;
    }

    pub fn set_clean_time(&mut self, duration: Duration) {
        self.clean_time = duration;
    }

    pub fn set_fit_time(&mut self, duration: Duration) {
        self.fit_time = duration;
    }

    pub fn total_time(&self) -> Duration {
        self.load_time + self.clean_time + self.fit_time
    }

    /// Rows removed because a feature value was missing
    pub fn dropped_incomplete(&self) -> usize {
        self.stats.rows_resolved - self.stats.rows_complete
    }

    /// Rows removed because the outcome was not Completed or Terminated
    pub fn dropped_unresolved(&self) -> usize {
        self.stats.rows_loaded - self.stats.rows_resolved
    }

    /// Render the summary table as text, one line per table row
    pub fn render_table(&self) -> String {
        let s = &self.stats;

        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_header(vec![
            Cell::new("Metric").add_attribute(Attribute::Bold),
            Cell::new("Value").add_attribute(Attribute::Bold),
        ]);

        table.add_row(vec![Cell::new("📁 Deals loaded"), Cell::new(s.rows_loaded)]);
        table.add_row(vec![
            Cell::new("⏳ Unresolved (dropped)"),
            Cell::new(self.dropped_unresolved()).fg(dropped_color(self.dropped_unresolved())),
        ]);
        table.add_row(vec![
            Cell::new("🕳️  Incomplete (dropped)"),
            Cell::new(self.dropped_incomplete()).fg(dropped_color(self.dropped_incomplete())),
        ]);
        table.add_row(vec![
            Cell::new("✅ Completed / ❌ Terminated"),
            Cell::new(format!("{} / {}", s.completed, s.terminated)),
        ]);
        table.add_row(vec![
            Cell::new("⚖️  Class weights (T / C)"),
            Cell::new(format!("{:.3} / {:.3}", s.class_weights[0], s.class_weights[1])),
        ]);
        table.add_row(vec![
            Cell::new("🏋️  Train / held-out rows"),
            Cell::new(format!("{} / {}", s.train_rows, s.test_rows)),
        ]);
        table.add_row(vec![
            Cell::new("🔁 Solver iterations"),
            Cell::new(s.n_iter),
        ]);
        table.add_row(vec![
            Cell::new("🎯 Converged"),
            Cell::new(if s.converged { "yes" } else { "no" })
                .fg(if s.converged { Color::Green } else { Color::Yellow })
                .add_attribute(Attribute::Bold),
        ]);
        table.add_row(vec![
            Cell::new("⏱️  Preparation time"),
            Cell::new(format!("{:.2?}", self.total_time())),
        ]);

        table.to_string()
    }

    pub fn display(&self) {
        println!();
        println!(
            "    {} {}",
            style("📋").cyan(),
            style("TRAINING SUMMARY").white().bold()
        );
        println!("    {}", style("─".repeat(50)).dim());
        println!(
            "    {}",
            style(format!("Fitted {}", self.fitted_at.format("%Y-%m-%d %H:%M:%S"))).dim()
        );
        println!();

        // Indent the table
        for line in self.render_table().lines() {
            println!("    {}", line);
        }

        let incomplete: Vec<&(String, f64)> = self
            .stats
            .missing_ratios
            .iter()
            .filter(|(_, ratio)| *ratio > 0.0)
            .collect();

        if !incomplete.is_empty() {
            println!();
            println!(
                "    {} {}",
                style("📝").cyan(),
                style("MISSING VALUES").white().bold()
            );
            println!("    {}", style("─".repeat(50)).dim());
            for (feature, ratio) in incomplete {
                println!(
                    "        {} {} {}",
                    style("•").dim(),
                    feature,
                    style(format!("({:.1}%)", ratio * 100.0)).yellow()
                );
            }
        }
    }
}

fn dropped_color(count: usize) -> Color {
    if count == 0 {
        Color::White
    } else {
        Color::Red
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats() -> PreparationStats {
        PreparationStats {
            rows_loaded: 120,
            rows_resolved: 100,
            rows_complete: 90,
            missing_ratios: vec![("Deal Premium".into(), 0.1), ("Size".into(), 0.0)],
            train_rows: 67,
            test_rows: 23,
            completed: 60,
            terminated: 30,
            class_weights: [1.5, 0.75],
            n_iter: 7,
            converged: true,
        }
    }

    #[test]
    fn test_dropped_counts() {
        let summary = TrainingSummary::new(stats());
        assert_eq!(summary.dropped_unresolved(), 20);
        assert_eq!(summary.dropped_incomplete(), 10);
    }

    #[test]
    fn test_total_time() {
        let mut summary = TrainingSummary::new(stats());
        summary.set_load_time(Duration::from_millis(100));
        summary.set_clean_time(Duration::from_millis(20));
        summary.set_fit_time(Duration::from_millis(5));
        assert_eq!(summary.total_time(), Duration::from_millis(125));
    }

    #[test]
    fn test_table_mentions_split_sizes() {
        let table = TrainingSummary::new(stats()).render_table();
        assert!(table.contains("67 / 23"));
        assert!(table.contains("60 / 30"));
        assert!(table.contains("yes"));
    }
}
