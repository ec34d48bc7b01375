//! Engine-wide usage counters.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use crate::types::EngineStats;

/// Collects generation counters across all request paths. All counters are
/// monotonic; reads produce a consistent-enough snapshot without blocking
/// any generation.
pub struct StatsCollector {
    quiz_questions: AtomicU64,
    generation_time_ms: AtomicU64,
    psychometric_questions: AtomicU64,
    personality_analyses: AtomicU64,
    start_time: Instant,
}

impl StatsCollector {
    pub fn new() -> Self {
        Self {
            quiz_questions: AtomicU64::new(0),
            generation_time_ms: AtomicU64::new(0),
            psychometric_questions: AtomicU64::new(0),
            personality_analyses: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    pub fn record_quiz_question(&self, elapsed: Duration) {
        self.quiz_questions.fetch_add(1, Ordering::Relaxed);
        self.generation_time_ms
            .fetch_add(elapsed.as_millis() as u64, Ordering::Relaxed);
    }

    pub fn record_psychometric_questions(&self, count: u64) {
        self.psychometric_questions.fetch_add(count, Ordering::Relaxed);
    }

    pub fn record_personality_analysis(&self) {
        self.personality_analyses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> EngineStats {
        let total = self.quiz_questions.load(Ordering::Relaxed);
        let total_time_ms = self.generation_time_ms.load(Ordering::Relaxed);
        let uptime = self.start_time.elapsed();

        let average_generation_time_ms = if total > 0 {
            total_time_ms as f64 / total as f64
        } else {
            0.0
        };
        let questions_per_minute = if uptime.as_millis() > 0 {
            total as f64 * 60_000.0 / uptime.as_millis() as f64
        } else {
            0.0
        };

        EngineStats {
            total_questions_generated: total,
            total_generation_time_ms: total_time_ms,
            average_generation_time_ms,
            questions_per_minute,
            psychometric_questions_generated: self.psychometric_questions.load(Ordering::Relaxed),
            personality_analyses: self.personality_analyses.load(Ordering::Relaxed),
            uptime_seconds: uptime.as_secs(),
        }
    }
}

impl Default for StatsCollector {
    fn default() -> Self {
        Self::new()
    }
}
