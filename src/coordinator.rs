//! Keeps one arrow's anchors in sync with layout.
//!
//! Every trigger funnels into [`Coordinator::invalidate`], which holds a
//! single frame slot: while a frame is outstanding further requests are
//! dropped, so any number of triggers between two frames costs one
//! recomputation. The recomputation itself reads rectangles fresh when the
//! frame runs.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use log::{debug, trace, warn};

use crate::config::{ArrowStyle, ResolverConfig};
use crate::error::Result;
use crate::geometry::{anchor_id, pick_relation_with, PathKind};
use crate::tree::{LayoutHost, ObservationSet};

pub type FrameTask = Box<dyn FnOnce()>;

/// Handle returned by a [`FrameScheduler`] for cancelling a queued frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameToken(pub i32);

/// Runs a task on the next animation frame.
pub trait FrameScheduler {
    fn request_frame(&self, task: FrameTask) -> Result<FrameToken>;

    fn cancel_frame(&self, token: FrameToken);
}

/// Receives every freshly computed update; this is the renderer's redraw hook.
pub trait ArrowSink {
    fn publish(&self, update: &ArrowUpdate);
}

/// What the renderer draws: two anchor element ids, a path kind and the
/// caller's style.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrowUpdate {
    pub start_anchor: String,
    pub end_anchor: String,
    pub path: PathKind,
    pub style: ArrowStyle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Watching,
    TornDown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FrameSlot {
    Free,
    /// The scheduler has been asked but has not handed back a token yet.
    Requesting,
    Scheduled(FrameToken),
}

struct State {
    phase: Phase,
    slot: FrameSlot,
    current: ArrowUpdate,
    recomputes: u64,
}

struct Shared<H> {
    host: H,
    start: String,
    end: String,
    style: ArrowStyle,
    config: ResolverConfig,
    scheduler: Box<dyn FrameScheduler>,
    sink: Box<dyn ArrowSink>,
    state: RefCell<State>,
}

/// Owner of one arrow's observation state. Clones share the same arrow.
pub struct Coordinator<H> {
    shared: Rc<Shared<H>>,
}

impl<H> Clone for Coordinator<H> {
    fn clone(&self) -> Self {
        Self { shared: Rc::clone(&self.shared) }
    }
}

impl<H: LayoutHost + 'static> Coordinator<H> {
    pub fn new(
        host: H,
        start: impl Into<String>,
        end: impl Into<String>,
        style: ArrowStyle,
        config: ResolverConfig,
        scheduler: Box<dyn FrameScheduler>,
        sink: Box<dyn ArrowSink>,
    ) -> Self {
        let start = start.into();
        let end = end.into();
        let current = ArrowUpdate {
            start_anchor: start.clone(),
            end_anchor: end.clone(),
            path: PathKind::Smooth,
            style: style.clone(),
        };
        Self {
            shared: Rc::new(Shared {
                host,
                start,
                end,
                style,
                config,
                scheduler,
                sink,
                state: RefCell::new(State {
                    phase: Phase::Idle,
                    slot: FrameSlot::Free,
                    current,
                    recomputes: 0,
                }),
            }),
        }
    }

    pub fn host(&self) -> &H {
        &self.shared.host
    }

    pub fn phase(&self) -> Phase {
        self.shared.state.borrow().phase
    }

    /// Last published update, or the bare node ids before the first one.
    pub fn current(&self) -> ArrowUpdate {
        self.shared.state.borrow().current.clone()
    }

    pub fn recompute_count(&self) -> u64 {
        self.shared.state.borrow().recomputes
    }

    pub fn has_pending_frame(&self) -> bool {
        self.shared.state.borrow().slot != FrameSlot::Free
    }

    /// Weak handle for observer callbacks.
    pub fn invalidator(&self) -> Invalidator<H> {
        Invalidator { shared: Rc::downgrade(&self.shared) }
    }

    /// Resolve both nodes, start watching and recompute once.
    ///
    /// Returns what the platform layer should subscribe to, or `None` if the
    /// arrow was already mounted or torn down.
    pub fn mount(&self) -> Option<ObservationSet<H::Node>> {
        {
            let mut state = self.shared.state.borrow_mut();
            if state.phase != Phase::Idle {
                return None;
            }
            state.phase = Phase::Watching;
        }

        let host = &self.shared.host;
        let start = host.find(&self.shared.start);
        let end = host.find(&self.shared.end);
        if start.is_none() || end.is_none() {
            debug!(
                "arrow {} -> {}: node missing at mount (start found: {}, end found: {})",
                self.shared.start,
                self.shared.end,
                start.is_some(),
                end.is_some()
            );
        }

        let set = ObservationSet::collect(host, start.as_ref(), end.as_ref());
        debug!(
            "arrow {} -> {}: watching {} resize and {} scroll targets",
            self.shared.start,
            self.shared.end,
            set.resize.len(),
            set.scroll.len()
        );

        self.recompute();
        Some(set)
    }

    /// Ask for a recomputation on the next frame.
    pub fn invalidate(&self) {
        {
            let mut state = self.shared.state.borrow_mut();
            if state.phase != Phase::Watching || state.slot != FrameSlot::Free {
                return;
            }
            state.slot = FrameSlot::Requesting;
        }

        let weak = Rc::downgrade(&self.shared);
        let task: FrameTask = Box::new(move || {
            if let Some(shared) = weak.upgrade() {
                Coordinator { shared }.on_frame();
            }
        });

        match self.shared.scheduler.request_frame(task) {
            Ok(token) => {
                let mut state = self.shared.state.borrow_mut();
                // the frame may already have run if the scheduler is synchronous
                if state.slot == FrameSlot::Requesting {
                    state.slot = FrameSlot::Scheduled(token);
                }
            }
            Err(err) => {
                warn!("arrow {} -> {}: {err}", self.shared.start, self.shared.end);
                self.shared.state.borrow_mut().slot = FrameSlot::Free;
            }
        }
    }

    fn on_frame(&self) {
        {
            let mut state = self.shared.state.borrow_mut();
            state.slot = FrameSlot::Free;
            if state.phase != Phase::Watching {
                return;
            }
        }
        self.recompute();
    }

    /// Measure both nodes now and publish the resulting anchors.
    ///
    /// Returns `None` without publishing when either node is absent or the
    /// arrow is not watching.
    pub fn recompute(&self) -> Option<ArrowUpdate> {
        if self.phase() != Phase::Watching {
            return None;
        }

        let shared = &self.shared;
        let host = &shared.host;
        let (Some(a), Some(b)) = (host.find(&shared.start), host.find(&shared.end)) else {
            trace!("arrow {} -> {}: node missing, keeping last anchors", shared.start, shared.end);
            return None;
        };

        let rel = pick_relation_with(
            &host.bounding_rect(&a),
            &host.bounding_rect(&b),
            shared.config.same_row_factor,
        );

        let update = {
            let mut state = shared.state.borrow_mut();
            state.current = ArrowUpdate {
                start_anchor: anchor_id(&shared.start, rel.start),
                end_anchor: anchor_id(&shared.end, rel.end),
                path: rel.path,
                style: shared.style.clone(),
            };
            state.recomputes += 1;
            state.current.clone()
        };
        trace!(
            "arrow {} -> {}: {} -> {} ({})",
            shared.start,
            shared.end,
            update.start_anchor,
            update.end_anchor,
            update.path
        );

        shared.sink.publish(&update);
        Some(update)
    }

    /// Stop watching and cancel any queued frame.
    ///
    /// The platform layer drops its subscriptions alongside this call.
    pub fn teardown(&self) {
        let slot = {
            let mut state = self.shared.state.borrow_mut();
            if state.phase == Phase::TornDown {
                return;
            }
            state.phase = Phase::TornDown;
            std::mem::replace(&mut state.slot, FrameSlot::Free)
        };
        if let FrameSlot::Scheduled(token) = slot {
            self.shared.scheduler.cancel_frame(token);
        }
        debug!("arrow {} -> {}: torn down", self.shared.start, self.shared.end);
    }
}

/// Observer-side handle. Does nothing once the coordinator is gone or torn down.
pub struct Invalidator<H> {
    shared: Weak<Shared<H>>,
}

impl<H> Clone for Invalidator<H> {
    fn clone(&self) -> Self {
        Self { shared: Weak::clone(&self.shared) }
    }
}

impl<H: LayoutHost + 'static> Invalidator<H> {
    pub fn invalidate(&self) {
        if let Some(shared) = self.shared.upgrade() {
            Coordinator { shared }.invalidate();
        }
    }
}
