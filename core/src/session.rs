use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use crate::action::PuzzleAction;
use crate::generate::GridConfig;
use crate::grid::{GridCoord, PipeGrid, SegmentHandle};

/// Extra wait after a rotation before the connectivity check runs.
pub const CHECK_DELAY_PADDING: f32 = 0.1;
pub const EVENT_QUEUE_LIMIT: usize = 256;
const TIMER_EPSILON: f32 = 1e-5;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PuzzleEvent {
    Activated,
    Deactivated,
    RotationStarted {
        handle: SegmentHandle,
        clockwise: bool,
    },
    RotationFinished {
        handle: SegmentHandle,
    },
    Solved,
}

pub type PuzzleSubscriber = Rc<dyn Fn(&PuzzleEvent)>;

/// Mini-game shell around a [`PipeGrid`]: gates input on the activation
/// state, runs the delayed connectivity check after each rotation and
/// reports the solved transition once.
pub struct PipePuzzle {
    grid: PipeGrid,
    active: bool,
    solved: bool,
    pending_checks: Vec<f32>,
    events: VecDeque<PuzzleEvent>,
    subscribers: Rc<RefCell<Vec<PuzzleSubscriber>>>,
}

impl PipePuzzle {
    pub fn new(config: &GridConfig) -> Self {
        Self::from_grid(PipeGrid::generate(config))
    }

    pub fn from_grid(grid: PipeGrid) -> Self {
        Self {
            grid,
            active: false,
            solved: false,
            pending_checks: Vec::new(),
            events: VecDeque::new(),
            subscribers: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn grid(&self) -> &PipeGrid {
        &self.grid
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_solved(&self) -> bool {
        self.solved
    }

    pub fn pending_checks(&self) -> usize {
        self.pending_checks.len()
    }

    pub fn subscribe(&self, subscriber: PuzzleSubscriber) -> PuzzleSubscription {
        self.subscribers.borrow_mut().push(subscriber.clone());
        PuzzleSubscription {
            subscriber,
            subscribers: Rc::clone(&self.subscribers),
        }
    }

    /// Events since the last drain, oldest first.
    pub fn drain_events(&mut self) -> Vec<PuzzleEvent> {
        self.events.drain(..).collect()
    }

    pub fn activate(&mut self) {
        if self.active {
            return;
        }
        self.active = true;
        log::debug!("pipe puzzle activated");
        self.emit(PuzzleEvent::Activated);
    }

    /// Stops accepting input. Pending checks are dropped and turns in flight
    /// snap to their end state so the grid stays consistent.
    pub fn deactivate(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;
        self.pending_checks.clear();
        let snapped = self.grid.finish_rotations();
        log::debug!("pipe puzzle deactivated ({snapped} rotations snapped)");
        self.emit(PuzzleEvent::Deactivated);
    }

    pub fn regenerate(&mut self, config: &GridConfig) {
        self.pending_checks.clear();
        self.grid.regenerate(config);
        self.solved = false;
    }

    /// Input entry point. Ignored while inactive, for stale handles, and for
    /// segments that are still turning.
    pub fn on_segment_activated(&mut self, handle: SegmentHandle, clockwise: bool) -> bool {
        if !self.active {
            return false;
        }
        let Some(segment) = self.grid.segment_mut(handle) else {
            return false;
        };
        if !segment.rotate(clockwise) {
            return false;
        }
        let delay = segment.rotation_duration() + CHECK_DELAY_PADDING;
        log::debug!(
            "rotating segment {} {}",
            handle.index(),
            if clockwise { "clockwise" } else { "counter-clockwise" }
        );
        self.pending_checks.push(delay);
        self.emit(PuzzleEvent::RotationStarted { handle, clockwise });
        true
    }

    pub fn rotate_at(&mut self, coord: GridCoord, clockwise: bool) -> bool {
        match self.grid.handle_at(coord) {
            Some(handle) => self.on_segment_activated(handle, clockwise),
            None => false,
        }
    }

    /// Advances animations by `dt` seconds, then fires any checks that came due.
    pub fn tick(&mut self, dt: f32) {
        let dt = dt.max(0.0);
        for handle in self.grid.advance(dt) {
            self.emit(PuzzleEvent::RotationFinished { handle });
        }
        if self.pending_checks.is_empty() {
            return;
        }
        for remaining in self.pending_checks.iter_mut() {
            *remaining -= dt;
        }
        let before = self.pending_checks.len();
        self.pending_checks
            .retain(|remaining| *remaining > TIMER_EPSILON);
        if self.pending_checks.len() < before {
            self.check_now();
        }
    }

    /// Runs the connectivity check immediately and returns the result.
    pub fn check_now(&mut self) -> bool {
        let solved = self.grid.check_solved();
        log::debug!("connectivity check: solved={solved}");
        if solved && !self.solved {
            log::info!("pipe puzzle solved");
            self.solved = true;
            self.emit(PuzzleEvent::Solved);
        } else {
            self.solved = solved;
        }
        solved
    }

    pub fn apply_action(&mut self, action: PuzzleAction) -> bool {
        match action {
            PuzzleAction::Activate => {
                self.activate();
                true
            }
            PuzzleAction::Deactivate => {
                self.deactivate();
                true
            }
            PuzzleAction::Rotate { handle, clockwise } => {
                self.on_segment_activated(handle, clockwise)
            }
            PuzzleAction::RotateAt { coord, clockwise } => self.rotate_at(coord, clockwise),
            PuzzleAction::Tick { dt } => {
                self.tick(dt);
                true
            }
            PuzzleAction::Check => self.check_now(),
            PuzzleAction::Regenerate { config } => {
                self.regenerate(&config);
                true
            }
        }
    }

    fn emit(&mut self, event: PuzzleEvent) {
        if self.events.len() >= EVENT_QUEUE_LIMIT {
            self.events.pop_front();
        }
        self.events.push_back(event);
        let subscribers = self.subscribers.borrow().clone();
        for subscriber in subscribers {
            (subscriber)(&event);
        }
    }
}

pub struct PuzzleSubscription {
    subscriber: PuzzleSubscriber,
    subscribers: Rc<RefCell<Vec<PuzzleSubscriber>>>,
}

impl Drop for PuzzleSubscription {
    fn drop(&mut self) {
        let mut subscribers = self.subscribers.borrow_mut();
        subscribers.retain(|item| !Rc::ptr_eq(item, &self.subscriber));
    }
}
