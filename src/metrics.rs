use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Score history of a run. Grows for the life of the run.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct EpisodeMetrics {
    pub scores: Vec<u32>,
    pub mean_scores: Vec<f32>,
    pub total_score: u64,
    pub record: u32,
}

impl EpisodeMetrics {
    /// Appends an episode. Returns true when the score beats the record.
    pub fn record_episode(&mut self, score: u32) -> bool {
        self.scores.push(score);
        self.total_score += u64::from(score);
        let mean = self.total_score as f32 / self.scores.len() as f32;
        self.mean_scores.push(mean);

        let improved = score > self.record;
        if improved {
            self.record = score;
        }
        improved
    }
}

/// Receives the full history after every episode.
pub trait MetricsSink {
    fn plot(&mut self, scores: &[u32], mean_scores: &[f32]) -> Result<()>;
}

/// Discards everything.
pub struct NullSink;

impl MetricsSink for NullSink {
    fn plot(&mut self, _: &[u32], _: &[f32]) -> Result<()> {
        Ok(())
    }
}

/// Rewrites `game,score,mean_score` rows for an external chart.
pub struct CsvPlot {
    path: PathBuf,
}

impl CsvPlot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl MetricsSink for CsvPlot {
    fn plot(&mut self, scores: &[u32], mean_scores: &[f32]) -> Result<()> {
        let mut out = String::from("game,score,mean_score\n");
        for (i, (s, m)) in scores.iter().zip(mean_scores).enumerate() {
            // writing into a String cannot fail
            let _ = writeln!(out, "{},{},{:.4}", i + 1, s, m);
        }
        let mut tmp = self.path.clone();
        tmp.as_mut_os_string().push(".tmp");
        fs::write(&tmp, out)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_running_mean_and_record() {
        let mut m = EpisodeMetrics::default();
        assert!(!m.record_episode(0));
        assert!(m.record_episode(3));
        assert!(!m.record_episode(3));
        assert!(m.record_episode(5));
        assert_eq!(m.scores, vec![0, 3, 3, 5]);
        assert_eq!(m.mean_scores, vec![0.0, 1.5, 2.0, 2.75]);
        assert_eq!(m.record, 5);
    }

    #[test]
    fn test_csv_plot_writes_rows() {
        let path = std::env::temp_dir().join(format!("snake_qlearn_scores_{}.csv", std::process::id()));
        let mut sink = CsvPlot::new(&path);
        sink.plot(&[1, 4], &[1.0, 2.5]).unwrap();
        let text = fs::read_to_string(sink.path()).unwrap();
        assert_eq!(text, "game,score,mean_score\n1,1,1.0000\n2,4,2.5000\n");
        let _ = fs::remove_file(&path);
    }
}
