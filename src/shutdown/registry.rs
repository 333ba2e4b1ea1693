//! Single-slot timer registry.
//!
//! # Responsibilities
//! - Hold zero-or-one pending delayed action
//! - Race-safe arm / cancel / list / fire
//! - Guarantee the action runs at most once
//!
//! # Design Decisions
//! - A second arm while one timer is active is rejected, never silently
//!   superseded
//! - All mutation goes through one mutex; the lock is never held across
//!   an `.await`
//! - A fire that has already passed the fire-guard cannot be suppressed
//!   by a concurrent cancel (accepted race, see `fire`)

use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime};

use thiserror::Error;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use uuid::Uuid;

/// Error type for arming a timer.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ArmError {
    /// A timer is already pending; cancel it before arming another.
    #[error("a shutdown timer is already armed")]
    AlreadyArmed,

    /// The requested delay cannot be represented as a deadline.
    #[error("timeout too far in the future")]
    DurationTooLong,
}

/// Point-in-time snapshot of a pending timer.
#[derive(Debug, Clone)]
pub struct TimerStatus {
    /// Opaque handle of the scheduled callback.
    pub id: Uuid,
    /// Wall-clock time the timer was armed.
    pub armed_at: SystemTime,
    /// Requested delay before firing.
    pub duration: Duration,
    /// Time left until the deadline at the moment of the snapshot.
    pub remaining: Duration,
}

impl TimerStatus {
    /// Wall-clock time the timer is scheduled to fire.
    pub fn fires_at(&self) -> SystemTime {
        self.armed_at + self.duration
    }
}

/// The registered timer plus the task that will fire it.
struct ArmedTimer {
    id: Uuid,
    armed_at: SystemTime,
    duration: Duration,
    deadline: Instant,
    task: JoinHandle<()>,
}

/// Registry holding at most one pending delayed action.
///
/// Cloning shares the underlying slot.
#[derive(Clone, Default)]
pub struct TimerRegistry {
    slot: Arc<Mutex<Option<ArmedTimer>>>,
}

impl TimerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm a timer that runs `on_fire` after `duration`.
    ///
    /// Rejects the call if a timer is already pending. The returned status
    /// is a snapshot taken at arm time.
    pub fn arm<F, Fut>(&self, duration: Duration, on_fire: F) -> Result<TimerStatus, ArmError>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let deadline = Instant::now()
            .checked_add(duration)
            .ok_or(ArmError::DurationTooLong)?;

        let mut slot = self.slot.lock().expect("timer registry mutex poisoned");
        if slot.is_some() {
            return Err(ArmError::AlreadyArmed);
        }

        let id = Uuid::new_v4();
        let armed_at = SystemTime::now();

        let task = tokio::spawn({
            let registry = self.clone();
            async move {
                tokio::time::sleep_until(deadline).await;
                registry.fire(id, on_fire).await;
            }
        });

        *slot = Some(ArmedTimer {
            id,
            armed_at,
            duration,
            deadline,
            task,
        });

        Ok(TimerStatus {
            id,
            armed_at,
            duration,
            remaining: duration,
        })
    }

    /// Cancel every pending timer (0 or 1) and return how many were cancelled.
    ///
    /// Safe to call concurrently with an in-flight fire: a callback that has
    /// already begun executing is not un-fired, and cancelling an empty
    /// registry is a no-op.
    pub fn cancel_all(&self) -> usize {
        let taken = self
            .slot
            .lock()
            .expect("timer registry mutex poisoned")
            .take();
        match taken {
            Some(timer) => {
                timer.task.abort();
                tracing::info!(timer = %timer.id, "cancelled pending shutdown timer");
                1
            }
            None => 0,
        }
    }

    /// Snapshot of the registry state; never mutates.
    pub fn list(&self) -> Vec<TimerStatus> {
        let slot = self.slot.lock().expect("timer registry mutex poisoned");
        slot.as_ref()
            .map(|timer| TimerStatus {
                id: timer.id,
                armed_at: timer.armed_at,
                duration: timer.duration,
                remaining: timer.deadline.saturating_duration_since(Instant::now()),
            })
            .into_iter()
            .collect()
    }

    /// Whether a timer is currently pending.
    pub fn is_armed(&self) -> bool {
        self.slot
            .lock()
            .expect("timer registry mutex poisoned")
            .is_some()
    }

    /// Fire-guard: remove the entry for `id` and run the action only if the
    /// entry is still registered.
    ///
    /// The check-and-remove happens under the lock, so a concurrent `list`
    /// or `cancel_all` observed during action execution sees no pending
    /// timer. A timer that was cancelled between its dequeue and this check
    /// no-ops here; that narrow window is inherent to the timer-queue design.
    async fn fire<F, Fut>(&self, id: Uuid, on_fire: F)
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = ()>,
    {
        let armed = {
            let mut slot = self.slot.lock().expect("timer registry mutex poisoned");
            match slot.as_ref() {
                Some(timer) if timer.id == id => slot.take(),
                _ => None,
            }
        };

        match armed {
            Some(timer) => {
                tracing::info!(timer = %timer.id, "shutdown timer elapsed");
                on_fire().await;
            }
            None => {
                tracing::debug!(timer = %id, "timer fired after cancellation, ignoring");
            }
        }
    }
}

impl std::fmt::Debug for TimerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerRegistry")
            .field("armed", &self.is_armed())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn arm_counting(
        registry: &TimerRegistry,
        duration: Duration,
        fired: &Arc<AtomicUsize>,
    ) -> Result<TimerStatus, ArmError> {
        let fired = fired.clone();
        registry.arm(duration, move || async move {
            fired.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[tokio::test(start_paused = true)]
    async fn test_fire_invokes_action_exactly_once() {
        let registry = TimerRegistry::new();
        let fired = Arc::new(AtomicUsize::new(0));

        arm_counting(&registry, Duration::from_secs(60), &fired).unwrap();
        assert!(registry.is_armed());

        // Well past the deadline; the paused clock auto-advances.
        tokio::time::sleep(Duration::from_secs(120)).await;

        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert!(registry.list().is_empty());
        assert!(!registry.is_armed());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_before_elapse_suppresses_action() {
        let registry = TimerRegistry::new();
        let fired = Arc::new(AtomicUsize::new(0));

        arm_counting(&registry, Duration::from_secs(300), &fired).unwrap();
        tokio::time::sleep(Duration::from_secs(150)).await;

        assert_eq!(registry.cancel_all(), 1);
        tokio::time::sleep(Duration::from_secs(400)).await;

        assert_eq!(fired.load(Ordering::SeqCst), 0);
        assert!(registry.list().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_arm_rejected_while_armed() {
        let registry = TimerRegistry::new();
        let fired = Arc::new(AtomicUsize::new(0));

        arm_counting(&registry, Duration::from_secs(600), &fired).unwrap();
        let err = arm_counting(&registry, Duration::from_secs(10), &fired).unwrap_err();
        assert_eq!(err, ArmError::AlreadyArmed);
        assert_eq!(registry.list().len(), 1);

        // After cancelling, arming works again.
        assert_eq!(registry.cancel_all(), 1);
        arm_counting(&registry, Duration::from_secs(10), &fired).unwrap();
        assert!(registry.is_armed());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_all_on_empty_registry_is_idempotent() {
        let registry = TimerRegistry::new();
        assert_eq!(registry.cancel_all(), 0);
        assert_eq!(registry.cancel_all(), 0);
        assert!(registry.list().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_list_reports_decreasing_remaining() {
        let registry = TimerRegistry::new();
        let fired = Arc::new(AtomicUsize::new(0));

        let status = arm_counting(&registry, Duration::from_secs(300), &fired).unwrap();
        assert_eq!(status.remaining, Duration::from_secs(300));
        assert_eq!(status.fires_at(), status.armed_at + Duration::from_secs(300));

        tokio::time::sleep(Duration::from_secs(100)).await;
        let snapshot = registry.list();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].id, status.id);
        assert_eq!(snapshot[0].remaining, Duration::from_secs(200));

        tokio::time::sleep(Duration::from_secs(50)).await;
        assert_eq!(registry.list()[0].remaining, Duration::from_secs(150));
    }

    // Arm 300 s at t=0, list at t=100 shows 200 s, cancel at t=150,
    // timer never fires, list at t=200 is empty.
    #[tokio::test(start_paused = true)]
    async fn test_arm_list_cancel_scenario() {
        let registry = TimerRegistry::new();
        let fired = Arc::new(AtomicUsize::new(0));

        arm_counting(&registry, Duration::from_secs(300), &fired).unwrap();

        tokio::time::sleep(Duration::from_secs(100)).await;
        assert_eq!(registry.list()[0].remaining, Duration::from_secs(200));

        tokio::time::sleep(Duration::from_secs(50)).await;
        assert_eq!(registry.cancel_all(), 1);

        tokio::time::sleep(Duration::from_secs(50)).await;
        assert!(registry.list().is_empty());
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unrepresentable_duration_rejected() {
        let registry = TimerRegistry::new();
        let fired = Arc::new(AtomicUsize::new(0));

        let err =
            arm_counting(&registry, Duration::from_secs(u64::MAX), &fired).unwrap_err();
        assert_eq!(err, ArmError::DurationTooLong);
        assert!(!registry.is_armed());
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_duration_timer_fires() {
        let registry = TimerRegistry::new();
        let fired = Arc::new(AtomicUsize::new(0));

        arm_counting(&registry, Duration::ZERO, &fired).unwrap();
        tokio::time::sleep(Duration::from_millis(1)).await;

        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert!(!registry.is_armed());
    }
}
