//! Pure aggregation over the learning history.
//!
//! Nothing here touches storage; the services layer owns persistence and hands
//! a `ProgressSnapshot` to callers that need statistics.

use serde::{Deserialize, Serialize};

use crate::model::{QuizResult, TopicName, round_percent};

/// Maximum characters of a topic kept in chart labels before truncation.
pub const CHART_LABEL_CHARS: usize = 15;

/// Percentage bands used when presenting quiz scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreBand {
    /// 80% and above.
    Strong,
    /// 60% up to 79%.
    Fair,
    /// Below 60%.
    Weak,
}

impl ScoreBand {
    #[must_use]
    pub fn from_percent(percent: u32) -> Self {
        if percent >= 80 {
            ScoreBand::Strong
        } else if percent >= 60 {
            ScoreBand::Fair
        } else {
            ScoreBand::Weak
        }
    }
}

/// Headline numbers for a progress overview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProgressStats {
    pub topics_learned: usize,
    pub quizzes_completed: usize,
    pub average_score_percent: u32,
}

/// A single bar of the recent-performance chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartPoint {
    pub label: String,
    pub percent: u32,
}

/// Most-recent-first views of both activity streams, kept separate.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RecentActivity {
    pub topics: Vec<TopicName>,
    pub quizzes: Vec<QuizResult>,
}

/// A quiz result decorated for history listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizHistoryEntry {
    pub result: QuizResult,
    pub percent: u32,
    pub band: ScoreBand,
}

/// In-memory copy of everything the learner has done so far.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProgressSnapshot {
    topics: Vec<TopicName>,
    results: Vec<QuizResult>,
}

impl ProgressSnapshot {
    /// Build a snapshot from persisted collections.
    ///
    /// Duplicate topics are dropped, keeping the first occurrence.
    #[must_use]
    pub fn from_parts(topics: Vec<TopicName>, results: Vec<QuizResult>) -> Self {
        let mut snapshot = Self {
            topics: Vec::with_capacity(topics.len()),
            results,
        };
        for topic in topics {
            snapshot.add_topic(topic);
        }
        snapshot
    }

    #[must_use]
    pub fn topics(&self) -> &[TopicName] {
        &self.topics
    }

    #[must_use]
    pub fn results(&self) -> &[QuizResult] {
        &self.results
    }

    #[must_use]
    pub fn contains_topic(&self, topic: &TopicName) -> bool {
        self.topics.contains(topic)
    }

    /// Append a topic unless it is already recorded.
    ///
    /// Returns `true` if the topic was added.
    pub fn add_topic(&mut self, topic: TopicName) -> bool {
        if self.contains_topic(&topic) {
            return false;
        }
        self.topics.push(topic);
        true
    }

    pub fn push_result(&mut self, result: QuizResult) {
        self.results.push(result);
    }

    /// Mean of per-quiz percentages, rounded; `0` when no quiz was taken.
    ///
    /// Every quiz counts equally regardless of its question count.
    #[must_use]
    pub fn average_score_percent(&self) -> u32 {
        if self.results.is_empty() {
            return 0;
        }
        let sum: f64 = self.results.iter().map(QuizResult::ratio_percent).sum();
        #[allow(clippy::cast_precision_loss)]
        let count = self.results.len() as f64;
        round_percent(sum / count)
    }

    #[must_use]
    pub fn stats(&self) -> ProgressStats {
        ProgressStats {
            topics_learned: self.topics.len(),
            quizzes_completed: self.results.len(),
            average_score_percent: self.average_score_percent(),
        }
    }

    /// The last `n` topics and the last `n` quizzes, newest first.
    #[must_use]
    pub fn recent_activity(&self, n: usize) -> RecentActivity {
        self.recent_activity_split(n, n)
    }

    /// Like `recent_activity`, with a separate length per stream.
    #[must_use]
    pub fn recent_activity_split(&self, topics: usize, quizzes: usize) -> RecentActivity {
        RecentActivity {
            topics: last_n(&self.topics, topics).iter().rev().cloned().collect(),
            quizzes: last_n(&self.results, quizzes).iter().rev().cloned().collect(),
        }
    }

    /// The last `k` quizzes in chronological order, reduced to chart points.
    #[must_use]
    pub fn chart_series(&self, k: usize) -> Vec<ChartPoint> {
        last_n(&self.results, k)
            .iter()
            .map(|result| ChartPoint {
                label: result.topic().short_label(CHART_LABEL_CHARS),
                percent: result.percent(),
            })
            .collect()
    }

    /// The last `n` quizzes, newest first, with their score band.
    #[must_use]
    pub fn quiz_history(&self, n: usize) -> Vec<QuizHistoryEntry> {
        last_n(&self.results, n)
            .iter()
            .rev()
            .map(|result| {
                let percent = result.percent();
                QuizHistoryEntry {
                    result: result.clone(),
                    percent,
                    band: ScoreBand::from_percent(percent),
                }
            })
            .collect()
    }
}

fn last_n<T>(items: &[T], n: usize) -> &[T] {
    &items[items.len().saturating_sub(n)..]
}
