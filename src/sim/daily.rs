//! Daily task generation and progress
//!
//! One task per calendar day, drawn from a fixed template set. Each
//! template describes itself (id, text, target range, progress source), so
//! new templates only need a new entry in `TASK_TEMPLATES`.

use std::fmt;

use chrono::NaiveDate;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Local calendar date, formatted `YYYY-MM-DD`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DateKey(String);

impl DateKey {
    const FORMAT: &'static str = "%Y-%m-%d";

    pub fn from_date(date: NaiveDate) -> Self {
        Self(date.format(Self::FORMAT).to_string())
    }

    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self::from_date)
    }

    /// Parse a stored key, normalizing its formatting
    pub fn parse(s: &str) -> Option<Self> {
        NaiveDate::parse_from_str(s.trim(), Self::FORMAT)
            .ok()
            .map(Self::from_date)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for DateKey {
    /// Unix epoch date
    fn default() -> Self {
        Self("1970-01-01".to_string())
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Template identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    /// Reach a score within a single game
    ScoreInGame,
    /// Complete levels back to back in one run
    ConsecutiveLevels,
}

impl TaskKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskKind::ScoreInGame => "score_in_game",
            TaskKind::ConsecutiveLevels => "consecutive_levels",
        }
    }
}

/// Session statistics a template can read progress from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskStats {
    pub score: u64,
    pub consecutive_levels: u32,
}

/// Immutable description of one kind of daily task
#[derive(Debug, Clone, Copy)]
pub struct TaskTemplate {
    pub kind: TaskKind,
    /// Inclusive target bounds
    pub target_min: u32,
    pub target_max: u32,
    describe: fn(u32) -> String,
    progress: fn(&TaskStats) -> u32,
}

impl TaskTemplate {
    pub fn describe(&self, target: u32) -> String {
        (self.describe)(target)
    }

    pub fn roll_target<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        rng.random_range(self.target_min..=self.target_max)
    }

    pub fn progress(&self, stats: &TaskStats) -> u32 {
        (self.progress)(stats)
    }
}

fn describe_score(target: u32) -> String {
    format!("Score {} points in a single game", target)
}

fn score_progress(stats: &TaskStats) -> u32 {
    u32::try_from(stats.score).unwrap_or(u32::MAX)
}

fn describe_consecutive(target: u32) -> String {
    format!("Complete {} levels in a row", target)
}

fn consecutive_progress(stats: &TaskStats) -> u32 {
    stats.consecutive_levels
}

/// The built-in template set
pub const TASK_TEMPLATES: &[TaskTemplate] = &[
    TaskTemplate {
        kind: TaskKind::ScoreInGame,
        target_min: 200,
        target_max: 600,
        describe: describe_score,
        progress: score_progress,
    },
    TaskTemplate {
        kind: TaskKind::ConsecutiveLevels,
        target_min: 3,
        target_max: 7,
        describe: describe_consecutive,
        progress: consecutive_progress,
    },
];

/// Today's challenge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyTask {
    pub id: TaskKind,
    pub description: String,
    pub target: u32,
    /// Never decreases within a day, never exceeds `target`
    pub progress: u32,
    /// Flips to true once and stays there
    pub completed: bool,
}

/// A task together with the day it belongs to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyTaskRecord {
    pub date: DateKey,
    pub task: DailyTask,
}

/// Where a loaded task came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskOrigin {
    /// Same-day task from storage, untouched
    Restored,
    /// Freshly generated for today
    Generated,
}

/// Result of feeding stats into a task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskProgress {
    Unchanged,
    Progressed,
    /// Reached the target on this call; reported exactly once per task
    JustCompleted,
}

/// Generates and advances daily tasks over a template set
#[derive(Debug, Clone, Copy)]
pub struct DailyTaskEngine {
    templates: &'static [TaskTemplate],
}

impl Default for DailyTaskEngine {
    fn default() -> Self {
        Self::new(TASK_TEMPLATES)
    }
}

impl DailyTaskEngine {
    /// `templates` must not be empty
    pub fn new(templates: &'static [TaskTemplate]) -> Self {
        debug_assert!(!templates.is_empty());
        Self { templates }
    }

    pub fn templates(&self) -> &'static [TaskTemplate] {
        self.templates
    }

    pub fn template_for(&self, kind: TaskKind) -> Option<&'static TaskTemplate> {
        self.templates.iter().find(|t| t.kind == kind)
    }

    /// Restore a same-day task verbatim, otherwise generate one for `today`
    pub fn load_or_create<R: Rng + ?Sized>(
        &self,
        today: &DateKey,
        stored: Option<DailyTaskRecord>,
        rng: &mut R,
    ) -> (DailyTaskRecord, TaskOrigin) {
        match stored {
            Some(record) if record.date == *today => {
                log::info!(
                    "Restored daily task {} ({}/{})",
                    record.task.id.as_str(),
                    record.task.progress,
                    record.task.target
                );
                (record, TaskOrigin::Restored)
            }
            _ => (self.generate(today, rng), TaskOrigin::Generated),
        }
    }

    /// Pick a template uniformly and roll a fresh target
    pub fn generate<R: Rng + ?Sized>(&self, today: &DateKey, rng: &mut R) -> DailyTaskRecord {
        let template = &self.templates[rng.random_range(0..self.templates.len())];
        let target = template.roll_target(rng);
        let task = DailyTask {
            id: template.kind,
            description: template.describe(target),
            target,
            progress: 0,
            completed: false,
        };
        log::info!(
            "Generated daily task for {}: {}",
            today,
            task.description
        );
        DailyTaskRecord {
            date: today.clone(),
            task,
        }
    }

    /// Feed session stats into `task`
    ///
    /// Progress only moves forward; a lower or equal reading (e.g. after the
    /// score resets for a new run) is ignored.
    pub fn advance(&self, task: &mut DailyTask, stats: &TaskStats) -> TaskProgress {
        if task.completed {
            return TaskProgress::Unchanged;
        }
        let Some(template) = self.template_for(task.id) else {
            return TaskProgress::Unchanged;
        };
        let observed = template.progress(stats);
        if observed <= task.progress {
            return TaskProgress::Unchanged;
        }

        task.progress = observed.min(task.target);
        if task.progress >= task.target {
            task.completed = true;
            log::info!("Daily task completed: {}", task.description);
            TaskProgress::JustCompleted
        } else {
            TaskProgress::Progressed
        }
    }
}
