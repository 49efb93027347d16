use crate::error::PlacementRejection;
use crate::models::{ActivityDescriptor, Interval};
use crate::placement::{Edge, PlacementEngine};
use crate::store::IntervalStore;
use crate::timescale;
use crate::{log_debug, log_error};

use super::axis::PointerPosition;
use super::state::{GestureOutcome, GestureState, PointerEvent, PointerKind};
use super::surface::{HitTarget, SurfaceId, TimelineSurface};

const ENABLE_LOGS: bool = false;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InteractionConfig {
    /// Movement along the axis below this many pixels is a click.
    pub drag_threshold_px: f64,
    /// Half-width of the grab zone around an interval edge.
    pub edge_handle_px: f64,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            drag_threshold_px: 5.0,
            edge_handle_px: 8.0,
        }
    }
}

/// Everything one transition may touch. Borrowed per event so the
/// controller never holds on to store or surface state between events.
pub struct GestureContext<'a> {
    pub surface: &'a mut TimelineSurface,
    pub store: &'a mut IntervalStore,
    pub engine: &'a PlacementEngine,
    /// The picker's pending selection; consumed by a successful create.
    pub selection: &'a mut Option<ActivityDescriptor>,
}

/// Pointer state machine for the active timeline surface.
#[derive(Debug, Clone, Default)]
pub struct InteractionController {
    config: InteractionConfig,
    bound: Option<SurfaceId>,
    gesture: GestureState,
}

impl InteractionController {
    pub fn new(config: InteractionConfig) -> Self {
        Self {
            config,
            bound: None,
            gesture: GestureState::Idle,
        }
    }

    pub fn config(&self) -> &InteractionConfig {
        &self.config
    }

    /// Bind to `surface`. Events for any other surface become inert.
    /// Any gesture must already have been cancelled by the caller.
    pub fn bind(&mut self, surface: SurfaceId) {
        self.bound = Some(surface);
        self.gesture = GestureState::Idle;
    }

    pub fn release(&mut self) -> Option<SurfaceId> {
        self.gesture = GestureState::Idle;
        self.bound.take()
    }

    pub fn bound_surface(&self) -> Option<SurfaceId> {
        self.bound
    }

    pub fn gesture(&self) -> &GestureState {
        &self.gesture
    }

    pub fn is_idle(&self) -> bool {
        self.gesture.is_idle()
    }

    fn accepts(&self, event_surface: SurfaceId, ctx: &GestureContext<'_>) -> bool {
        self.bound == Some(event_surface) && ctx.surface.id() == event_surface
    }

    /// Feed one pointer event through the state machine.
    pub fn handle(&mut self, event: PointerEvent, mut ctx: GestureContext<'_>) -> GestureOutcome {
        if !self.accepts(event.surface, &ctx) {
            return GestureOutcome::Ignored;
        }

        let inside = ctx.surface.layout().geometry.contains(event.position);
        let state = std::mem::take(&mut self.gesture);

        let (next, outcome) = match (state, event.kind) {
            (GestureState::Idle, PointerKind::Down) => self.begin(event.position, &mut ctx),
            (GestureState::Idle, _) => (GestureState::Idle, GestureOutcome::Ignored),

            (GestureState::Pending { origin, origin_pct }, PointerKind::Move) => {
                let travel = ctx.surface.layout().axis.travel(origin, event.position);
                if travel < self.config.drag_threshold_px {
                    (
                        GestureState::Pending { origin, origin_pct },
                        GestureOutcome::Pending,
                    )
                } else {
                    let current_pct = ctx.surface.layout().percent_at(event.position);
                    let outcome = update_preview(origin_pct, current_pct, &mut ctx);
                    (
                        GestureState::Previewing {
                            origin,
                            origin_pct,
                            current_pct,
                        },
                        outcome,
                    )
                }
            }
            (GestureState::Pending { origin_pct, .. }, PointerKind::Up) if inside => {
                (GestureState::Idle, commit_click(origin_pct, &mut ctx))
            }

            (
                GestureState::Previewing {
                    origin, origin_pct, ..
                },
                PointerKind::Move,
            ) => {
                let current_pct = ctx.surface.layout().percent_at(event.position);
                let outcome = update_preview(origin_pct, current_pct, &mut ctx);
                (
                    GestureState::Previewing {
                        origin,
                        origin_pct,
                        current_pct,
                    },
                    outcome,
                )
            }
            (GestureState::Previewing { origin_pct, .. }, PointerKind::Up) if inside => {
                let current_pct = ctx.surface.layout().percent_at(event.position);
                (
                    GestureState::Idle,
                    commit_drag(origin_pct, current_pct, &mut ctx),
                )
            }

            (
                GestureState::Pending { .. } | GestureState::Previewing { .. },
                PointerKind::Up | PointerKind::Cancel,
            ) => {
                ctx.surface.clear_preview();
                log_debug!("Create gesture cancelled on {}", ctx.surface.timeline_key());
                (GestureState::Idle, GestureOutcome::Cancelled)
            }

            (
                GestureState::Resizing {
                    interval_id,
                    edge,
                    original,
                },
                PointerKind::Move,
            ) => {
                let outcome = resize_step(&interval_id, edge, event.position, &mut ctx);
                (
                    GestureState::Resizing {
                        interval_id,
                        edge,
                        original,
                    },
                    outcome,
                )
            }
            (GestureState::Resizing { interval_id, .. }, PointerKind::Up) if inside => {
                ctx.surface.clear_feedback();
                let key = ctx.surface.timeline_key().to_string();
                let outcome = match ctx.store.get(&key, &interval_id) {
                    Some(interval) => GestureOutcome::ResizeFinished(interval.clone()),
                    None => GestureOutcome::Cancelled,
                };
                (GestureState::Idle, outcome)
            }
            (GestureState::Resizing { original, .. }, PointerKind::Up | PointerKind::Cancel) => {
                (GestureState::Idle, roll_back(original, &mut ctx))
            }

            // A second pointer going down mid-gesture is ignored.
            (state, PointerKind::Down) => (state, GestureOutcome::Ignored),
        };

        self.gesture = next;
        outcome
    }

    /// Abandon whatever gesture is in progress, restoring pre-gesture state.
    /// Used before navigation, layout changes, undo and clear.
    pub fn force_cancel(&mut self, ctx: GestureContext<'_>) -> GestureOutcome {
        let outcome = match self.bound {
            Some(surface) => self.handle(PointerEvent::cancel(surface), ctx),
            None => GestureOutcome::Ignored,
        };
        self.gesture = GestureState::Idle;
        outcome
    }

    fn begin(
        &self,
        position: PointerPosition,
        ctx: &mut GestureContext<'_>,
    ) -> (GestureState, GestureOutcome) {
        let layout = ctx.surface.layout();
        if !layout.geometry.contains(position) {
            return (GestureState::Idle, GestureOutcome::Ignored);
        }
        ctx.surface.clear_feedback();

        match ctx.surface.hit_test(position, self.config.edge_handle_px) {
            HitTarget::Edge { interval_id, edge } => {
                let key = ctx.surface.timeline_key().to_string();
                let Some(original) = ctx.store.get(&key, &interval_id).cloned() else {
                    return (GestureState::Idle, GestureOutcome::Ignored);
                };
                log_debug!("Resize of {} ({:?}) started on {}", interval_id, edge, key);
                (
                    GestureState::Resizing {
                        interval_id: interval_id.clone(),
                        edge,
                        original,
                    },
                    GestureOutcome::ResizeStarted { interval_id, edge },
                )
            }
            HitTarget::Body { .. } => (GestureState::Idle, GestureOutcome::Ignored),
            HitTarget::Empty if ctx.selection.is_some() => (
                GestureState::Pending {
                    origin: position,
                    origin_pct: layout.percent_at(position),
                },
                GestureOutcome::Pending,
            ),
            HitTarget::Empty => (GestureState::Idle, GestureOutcome::Ignored),
        }
    }
}

/// Span covered by a create gesture between two axis positions.
fn create_bounds(a_pct: f64, b_pct: f64, step: u32) -> (u32, u32) {
    let (low, high) = if a_pct <= b_pct {
        (a_pct, b_pct)
    } else {
        (b_pct, a_pct)
    };
    (
        timescale::position_to_minutes_with_step(low, false, step),
        timescale::position_to_minutes_with_step(high, true, step),
    )
}

fn update_preview(origin_pct: f64, current_pct: f64, ctx: &mut GestureContext<'_>) -> GestureOutcome {
    let step = ctx.engine.config().step_minutes;
    let (raw_start, raw_end) = create_bounds(origin_pct, current_pct, step);
    let key = ctx.surface.timeline_key().to_string();

    let (start, end) = ctx.engine.create_span(raw_start, raw_end);
    let valid = ctx.engine.check_create(ctx.store, &key, raw_start, raw_end).is_ok();
    ctx.surface.set_preview(start, end, valid);
    GestureOutcome::PreviewUpdated { start, end, valid }
}

fn commit_click(origin_pct: f64, ctx: &mut GestureContext<'_>) -> GestureOutcome {
    let step = ctx.engine.config().step_minutes;
    let start = timescale::position_to_minutes_with_step(origin_pct, false, step);
    let key = ctx.surface.timeline_key().to_string();
    let Some(descriptor) = ctx.selection.as_ref() else {
        ctx.surface.clear_preview();
        return GestureOutcome::Cancelled;
    };

    let result = ctx.engine.evaluate_click(ctx.store, &key, start, descriptor);
    finish_create(result, ctx)
}

fn commit_drag(origin_pct: f64, current_pct: f64, ctx: &mut GestureContext<'_>) -> GestureOutcome {
    let step = ctx.engine.config().step_minutes;
    let (raw_start, raw_end) = create_bounds(origin_pct, current_pct, step);
    let key = ctx.surface.timeline_key().to_string();
    let Some(descriptor) = ctx.selection.as_ref() else {
        ctx.surface.clear_preview();
        return GestureOutcome::Cancelled;
    };

    let result = ctx
        .engine
        .evaluate_create(ctx.store, &key, raw_start, raw_end, descriptor);
    finish_create(result, ctx)
}

fn finish_create(
    result: Result<Interval, PlacementRejection>,
    ctx: &mut GestureContext<'_>,
) -> GestureOutcome {
    ctx.surface.clear_preview();
    match result {
        Ok(interval) => {
            // The selection is handed over to the placed interval.
            *ctx.selection = None;
            ctx.surface.clear_feedback();
            ctx.surface.render_interval(&interval);
            GestureOutcome::Created(interval)
        }
        Err(rejection) => {
            log_debug!("Create rejected: {}", rejection);
            ctx.surface.flag_invalid(rejection.clone());
            GestureOutcome::Rejected(rejection)
        }
    }
}

fn resize_step(
    interval_id: &str,
    edge: Edge,
    position: PointerPosition,
    ctx: &mut GestureContext<'_>,
) -> GestureOutcome {
    let step = ctx.engine.config().step_minutes;
    let percent = ctx.surface.layout().percent_at(position);
    let raw = timescale::position_to_minutes_with_step(percent, edge == Edge::End, step);
    let key = ctx.surface.timeline_key().to_string();

    match ctx
        .engine
        .evaluate_resize(ctx.store, &key, interval_id, edge, raw)
    {
        Ok(interval) => {
            ctx.surface.clear_feedback();
            ctx.surface.render_interval(&interval);
            GestureOutcome::Resized(interval)
        }
        Err(rejection) => {
            // Snap the drawn edge back to the last accepted boundary.
            if let Some(current) = ctx.store.get(&key, interval_id) {
                ctx.surface.render_interval(current);
            }
            ctx.surface.flag_invalid(rejection.clone());
            GestureOutcome::ResizeRejected(rejection)
        }
    }
}

fn roll_back(original: Interval, ctx: &mut GestureContext<'_>) -> GestureOutcome {
    let key = ctx.surface.timeline_key().to_string();
    ctx.surface.clear_feedback();

    match ctx
        .store
        .replace(&key, &original.id, original.start, original.end)
    {
        Ok(restored) => {
            ctx.surface.render_interval(&restored);
            log_debug!("Resize of {} rolled back", restored.id);
            GestureOutcome::RolledBack(restored)
        }
        Err(err) => {
            log_error!("Failed to roll back resize of {}: {}", original.id, err);
            ctx.surface.sync(ctx.store.intervals(&key));
            GestureOutcome::Cancelled
        }
    }
}
