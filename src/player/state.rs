use serde::{Deserialize, Serialize};

use crate::plan::SectionType;
use crate::timeline::PlaybackStep;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum PlaybackStatus {
    Idle,
    Ready,
    Running,
    Paused,
    Finished,
}

impl Default for PlaybackStatus {
    fn default() -> Self {
        PlaybackStatus::Idle
    }
}

impl PlaybackStatus {
    /// Running and Paused share the current-step pointer.
    pub fn is_active(self) -> bool {
        matches!(self, PlaybackStatus::Running | PlaybackStatus::Paused)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PlaybackStatus::Idle => "Idle",
            PlaybackStatus::Ready => "Ready",
            PlaybackStatus::Running => "Running",
            PlaybackStatus::Paused => "Paused",
            PlaybackStatus::Finished => "Finished",
        }
    }
}

/// What a single engine command did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The command did not apply in the current state.
    Ignored,
    /// The countdown moved but the step did not change.
    Counted,
    /// Status changed without moving to another step.
    StatusChanged,
    /// A new step became current.
    StepChanged,
    /// The last step ended.
    Finished,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EngineSnapshot {
    pub status: PlaybackStatus,
    pub position: Option<usize>,
    pub step_count: usize,
    pub time_left: u32,
    pub section_index: Option<usize>,
    pub section_type: Option<SectionType>,
    pub label: Option<String>,
    pub elapsed_seconds: u64,
    pub total_seconds: u64,
}

/// Countdown sequencer over a flattened timeline.
///
/// Every command is synchronous and a no-op when it does not apply to the
/// current status.
#[derive(Debug, Clone, Default)]
pub struct PlaybackEngine {
    status: PlaybackStatus,
    steps: Vec<PlaybackStep>,
    position: usize,
    time_left: u32,
}

impl PlaybackEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(&mut self, steps: Vec<PlaybackStep>) -> Transition {
        self.steps = steps;
        self.status = PlaybackStatus::Ready;
        self.move_to(0)
    }

    pub fn unload(&mut self) {
        *self = Self::default();
    }

    pub fn play(&mut self) -> Transition {
        match self.status {
            PlaybackStatus::Ready | PlaybackStatus::Paused => {
                self.status = PlaybackStatus::Running;
                Transition::StatusChanged
            }
            PlaybackStatus::Idle | PlaybackStatus::Running | PlaybackStatus::Finished => {
                Transition::Ignored
            }
        }
    }

    pub fn pause(&mut self) -> Transition {
        if self.status != PlaybackStatus::Running {
            return Transition::Ignored;
        }
        self.status = PlaybackStatus::Paused;
        Transition::StatusChanged
    }

    /// One unit of countdown. Expiry advances before any further decrement.
    pub fn tick(&mut self) -> Transition {
        if self.status != PlaybackStatus::Running {
            return Transition::Ignored;
        }

        self.time_left = self.time_left.saturating_sub(1);
        if self.time_left == 0 {
            self.advance()
        } else {
            Transition::Counted
        }
    }

    /// Moves to the next step: the rest of the current section first, then the
    /// next section, then `Finished`. Status is otherwise kept, so skipping while
    /// paused stays paused.
    pub fn advance(&mut self) -> Transition {
        if !self.can_move() {
            return Transition::Ignored;
        }

        let next = self.position + 1;
        if next < self.steps.len() {
            self.move_to(next)
        } else {
            self.finish()
        }
    }

    /// Jumps to the first step of the next section that has any steps.
    pub fn skip_section(&mut self) -> Transition {
        if !self.can_move() {
            return Transition::Ignored;
        }

        let current_section = self.steps[self.position].section_index;
        match self.steps[self.position..]
            .iter()
            .position(|step| step.section_index != current_section)
        {
            Some(offset) => self.move_to(self.position + offset),
            None => self.finish(),
        }
    }

    fn can_move(&self) -> bool {
        matches!(
            self.status,
            PlaybackStatus::Ready | PlaybackStatus::Running | PlaybackStatus::Paused
        ) && self.position < self.steps.len()
    }

    /// Lands on the first step at or after `position` with a non-zero duration.
    /// Zero-second steps get no time on the clock.
    fn move_to(&mut self, position: usize) -> Transition {
        let landing = self
            .steps
            .iter()
            .enumerate()
            .skip(position)
            .find(|(_, step)| step.seconds > 0)
            .map(|(index, step)| (index, step.seconds));

        match landing {
            Some((index, seconds)) => {
                self.position = index;
                self.time_left = seconds;
                Transition::StepChanged
            }
            None => self.finish(),
        }
    }

    fn finish(&mut self) -> Transition {
        self.position = self.steps.len();
        self.time_left = 0;
        self.status = PlaybackStatus::Finished;
        Transition::Finished
    }

    pub fn status(&self) -> PlaybackStatus {
        self.status
    }

    pub fn time_left(&self) -> u32 {
        self.time_left
    }

    pub fn steps(&self) -> &[PlaybackStep] {
        &self.steps
    }

    /// Index of the current step, `None` when idle or finished.
    pub fn position(&self) -> Option<usize> {
        match self.status {
            PlaybackStatus::Idle | PlaybackStatus::Finished => None,
            _ => Some(self.position),
        }
    }

    pub fn current_step(&self) -> Option<&PlaybackStep> {
        self.position().and_then(|index| self.steps.get(index))
    }

    pub fn current_section(&self) -> Option<(usize, &SectionType)> {
        self.current_step()
            .map(|step| (step.section_index, &step.section_type))
    }

    pub fn total_seconds(&self) -> u64 {
        crate::timeline::total_seconds(&self.steps)
    }

    /// Timeline position in seconds: every step before the current one counts
    /// in full, skipped or not, plus the consumed part of the current step.
    pub fn elapsed_seconds(&self) -> u64 {
        match self.current_step() {
            Some(step) => {
                let before = crate::timeline::total_seconds(&self.steps[..self.position]);
                before + u64::from(step.seconds.saturating_sub(self.time_left))
            }
            None if self.status == PlaybackStatus::Finished => self.total_seconds(),
            None => 0,
        }
    }

    pub fn remaining_total_seconds(&self) -> u64 {
        self.total_seconds() - self.elapsed_seconds()
    }

    pub fn snapshot(&self) -> EngineSnapshot {
        let step = self.current_step();
        EngineSnapshot {
            status: self.status,
            position: self.position(),
            step_count: self.steps.len(),
            time_left: self.time_left,
            section_index: step.map(|s| s.section_index),
            section_type: step.map(|s| s.section_type.clone()),
            label: step.map(|s| s.label.clone()),
            elapsed_seconds: self.elapsed_seconds(),
            total_seconds: self.total_seconds(),
        }
    }
}
