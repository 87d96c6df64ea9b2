//! Hazard-spotting session.
//!
//! Per image: `Loading -> Active -> {Succeeded | TimedOut}`, with a side
//! branch `Loading -> LoadFailed -> Loading` for asset errors. The session is
//! complete once every image is terminal.
//!
//! One countdown runs per image. It starts when the image finishes loading,
//! stops when the image succeeds, and a time-out shows a blocking notice
//! that `Advance` dismisses. While a quiz overlay or the notice is open no
//! zone clicks are accepted. Whether the countdown keeps running under a
//! quiz is `QuizClockPolicy`.

use std::sync::Arc;

use im::{HashSet as ImHashSet, Vector};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::geometry::PointerEvent;
use super::quiz::{ActiveQuiz, SelectError};
use crate::catalog::{GameKind, ImageTarget};
use crate::clock::{ClockTick, SessionClock};
use crate::core::{EngineConfig, GameError, Permuter, QuizClockPolicy, Result, ZoneId};
use crate::persistence::ScoreDetails;
use crate::rules::{
    IgnoreReason, InputOutcome, SessionEngine, SessionOutcome, TerminalCallback, TerminalNotifier,
    TerminalReport,
};
use crate::scoring::{mean_with_failure_veto, score_for_effort, MAX_SCORE};

/// Status of one image.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageStatus {
    /// Waiting for the asset to render.
    Loading,
    /// Asset failed to render; `RetryImage` goes back to `Loading`.
    LoadFailed,
    /// Accepting clicks, countdown running.
    Active,
    /// Every zone found.
    Succeeded,
    /// Countdown ran out first.
    TimedOut,
}

impl ImageStatus {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, ImageStatus::Succeeded | ImageStatus::TimedOut)
    }
}

/// Status of the whole session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum HazardStatus {
    InProgress,
    Complete,
}

/// Mutable progress for one image.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageProgress {
    pub status: ImageStatus,
    pub found: ImHashSet<ZoneId>,
    pub click_count: u32,
    pub remaining_seconds: u32,
    /// Frozen once the image is terminal.
    pub score: Option<u8>,
    pub load_error: Option<String>,
}

impl ImageProgress {
    fn new(seconds: u32) -> Self {
        Self {
            status: ImageStatus::Loading,
            found: ImHashSet::new(),
            click_count: 0,
            remaining_seconds: seconds,
            score: None,
            load_error: None,
        }
    }
}

/// Inputs to a hazard session.
#[derive(Clone, Debug, PartialEq)]
pub enum HazardEvent {
    /// Current image rendered.
    ImageLoaded,
    /// Current image failed to render.
    ImageLoadFailed { reason: String },
    /// Retry a failed image.
    RetryImage,
    /// Click on the current image.
    Pointer(PointerEvent),
    /// Pick the quiz option at a presented slot.
    SelectOption(usize),
    /// Finish a locked quiz answer (scheduled after the feedback delay).
    ResolveQuiz { token: u64 },
    /// Dismiss the quiz without answering.
    CloseQuiz,
    /// One second elapsed.
    Tick,
    /// Move past a finished image (dismisses the time-up notice).
    Advance,
}

/// Read-only view of a hazard session.
#[derive(Clone, Debug)]
pub struct HazardSnapshot {
    pub targets: Arc<Vec<ImageTarget>>,
    pub images: Vector<ImageProgress>,
    pub current_index: usize,
    pub remaining_seconds: u32,
    pub active_quiz: Option<ActiveQuiz>,
    pub time_up_notice: bool,
    pub status: HazardStatus,
    pub session_score: Option<u8>,
}

impl HazardSnapshot {
    #[must_use]
    pub fn current(&self) -> &ImageProgress {
        &self.images[self.current_index]
    }

    #[must_use]
    pub fn current_target(&self) -> &ImageTarget {
        &self.targets[self.current_index]
    }

    /// Found/total zones on the current image.
    #[must_use]
    pub fn progress(&self) -> (usize, usize) {
        (self.current().found.len(), self.current_target().zones.len())
    }
}

type HazardOutcome = InputOutcome<HazardEvent>;

/// One play-through of a hazard game.
pub struct HazardSession {
    targets: Arc<Vec<ImageTarget>>,
    images: Vector<ImageProgress>,
    current: usize,
    clock: SessionClock,
    active_quiz: Option<ActiveQuiz>,
    next_quiz_token: u64,
    time_up_notice: bool,
    status: HazardStatus,
    config: EngineConfig,
    permuter: Box<dyn Permuter>,
    notifier: TerminalNotifier,
    report: Option<TerminalReport>,
}

impl HazardSession {
    /// Create a session over `targets`, which are copied from the catalog.
    pub fn new(targets: Vec<ImageTarget>, config: &EngineConfig, permuter: Box<dyn Permuter>) -> Result<Self> {
        if targets.is_empty() {
            return Err(GameError::CatalogEmpty("hazard game has no images".into()));
        }
        for target in &targets {
            let mut ids = ImHashSet::new();
            if let Some(zone) = target.zones.iter().find(|zone| ids.insert(zone.id.clone()).is_some()) {
                return Err(GameError::InvalidInput(format!(
                    "image {} has duplicate zone id {}",
                    target.asset_id, zone.id
                )));
            }
        }
        let seconds = config.hazard_seconds_per_image;
        let images = (0..targets.len()).map(|_| ImageProgress::new(seconds)).collect();

        Ok(Self {
            targets: Arc::new(targets),
            images,
            current: 0,
            clock: SessionClock::new(),
            active_quiz: None,
            next_quiz_token: 1,
            time_up_notice: false,
            status: HazardStatus::InProgress,
            config: config.clone(),
            permuter,
            notifier: TerminalNotifier::new(),
            report: None,
        })
    }

    #[must_use]
    pub fn image_count(&self) -> usize {
        self.targets.len()
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn status(&self) -> HazardStatus {
        self.status
    }

    #[must_use]
    pub fn active_quiz(&self) -> Option<&ActiveQuiz> {
        self.active_quiz.as_ref()
    }

    fn image(&self) -> &ImageProgress {
        &self.images[self.current]
    }

    fn image_mut(&mut self) -> &mut ImageProgress {
        &mut self.images[self.current]
    }

    fn image_loaded(&mut self) -> HazardOutcome {
        if self.status == HazardStatus::Complete || self.image().status != ImageStatus::Loading {
            return InputOutcome::Ignored(IgnoreReason::NotActive);
        }
        let seconds = self.config.hazard_seconds_per_image;
        let image = self.image_mut();
        image.status = ImageStatus::Active;
        image.remaining_seconds = seconds;
        self.clock.reset(seconds);
        debug!(image = self.current, seconds, "image active");

        if self.targets[self.current].zones.is_empty() {
            self.succeed_current();
        }
        InputOutcome::Applied
    }

    fn image_load_failed(&mut self, reason: String) -> HazardOutcome {
        if self.image().status != ImageStatus::Loading {
            return InputOutcome::Ignored(IgnoreReason::NotActive);
        }
        let err = GameError::AssetLoadFailed { image: self.current, reason: reason.clone() };
        warn!(error = %err, "image load failed");
        self.clock.cancel();
        let image = self.image_mut();
        image.status = ImageStatus::LoadFailed;
        image.load_error = Some(reason);
        InputOutcome::Applied
    }

    fn retry_image(&mut self) -> HazardOutcome {
        if self.image().status != ImageStatus::LoadFailed {
            return InputOutcome::Ignored(IgnoreReason::NotActive);
        }
        let image = self.image_mut();
        image.status = ImageStatus::Loading;
        image.load_error = None;
        InputOutcome::Applied
    }

    fn pointer(&mut self, event: PointerEvent) -> HazardOutcome {
        if self.status == HazardStatus::Complete {
            return InputOutcome::Ignored(IgnoreReason::NotActive);
        }
        if self.time_up_notice || self.active_quiz.is_some() {
            return InputOutcome::Ignored(IgnoreReason::Blocked);
        }
        if self.image().status != ImageStatus::Active {
            return InputOutcome::Ignored(IgnoreReason::NotActive);
        }
        let Some(point) = event.percent() else {
            return InputOutcome::Ignored(IgnoreReason::InvalidPointer);
        };

        self.image_mut().click_count += 1;

        let targets = Arc::clone(&self.targets);
        let found = &self.images[self.current].found;
        let hit = targets[self.current]
            .zones
            .iter()
            .find(|zone| !found.contains(&zone.id) && zone.rect.contains(point));

        match hit {
            None => {
                debug!(image = self.current, x = point.x, y = point.y, "miss");
            }
            Some(zone) => match &zone.quiz {
                Some(challenge) => {
                    let token = self.next_quiz_token;
                    self.next_quiz_token += 1;
                    self.active_quiz =
                        Some(ActiveQuiz::open(zone.id.clone(), challenge, token, self.permuter.as_mut()));
                    if self.config.quiz_clock_policy == QuizClockPolicy::Pause {
                        self.clock.pause();
                    }
                    debug!(image = self.current, zone = %zone.id, token, "quiz opened");
                }
                None => {
                    debug!(image = self.current, zone = %zone.id, "zone found");
                    self.mark_found(zone.id.clone());
                }
            },
        }
        InputOutcome::Applied
    }

    fn select_option(&mut self, slot: usize) -> HazardOutcome {
        let delay = self.config.quiz_resolve_delay();
        let Some(quiz) = self.active_quiz.as_mut() else {
            return InputOutcome::Ignored(IgnoreReason::NotActive);
        };
        match quiz.select(slot) {
            Ok(correct) => {
                debug!(zone = %quiz.zone_id(), slot, correct, "quiz answer locked");
                InputOutcome::Deferred {
                    event: HazardEvent::ResolveQuiz { token: quiz.token() },
                    after: delay,
                }
            }
            Err(SelectError::Locked) => InputOutcome::Ignored(IgnoreReason::AwaitingResolution),
            Err(SelectError::OutOfRange) => InputOutcome::Ignored(IgnoreReason::OutOfRange),
        }
    }

    fn resolve_quiz(&mut self, token: u64) -> HazardOutcome {
        let resolvable = self
            .active_quiz
            .as_ref()
            .is_some_and(|quiz| quiz.token() == token && quiz.is_locked());
        if !resolvable {
            return InputOutcome::Ignored(IgnoreReason::Stale);
        }
        let Some(quiz) = self.active_quiz.take() else {
            return InputOutcome::Ignored(IgnoreReason::Stale);
        };
        self.clock.resume();

        if quiz.answer_correct() == Some(true) {
            self.mark_found(quiz.zone_id().clone());
        } else {
            debug!(zone = %quiz.zone_id(), "wrong answer, zone stays hidden");
        }
        InputOutcome::Applied
    }

    fn close_quiz(&mut self) -> HazardOutcome {
        match &self.active_quiz {
            None => InputOutcome::Ignored(IgnoreReason::NotActive),
            Some(quiz) if quiz.is_locked() => InputOutcome::Ignored(IgnoreReason::AwaitingResolution),
            Some(_) => {
                self.active_quiz = None;
                self.clock.resume();
                InputOutcome::Applied
            }
        }
    }

    fn tick(&mut self) -> HazardOutcome {
        if self.status == HazardStatus::Complete || self.image().status != ImageStatus::Active {
            return InputOutcome::Ignored(IgnoreReason::NotActive);
        }
        match self.clock.tick() {
            ClockTick::Idle => InputOutcome::Ignored(IgnoreReason::NotActive),
            ClockTick::Running { remaining } => {
                self.image_mut().remaining_seconds = remaining;
                InputOutcome::Applied
            }
            ClockTick::Expired => {
                self.time_out_current();
                InputOutcome::Applied
            }
        }
    }

    fn advance(&mut self) -> HazardOutcome {
        if !self.image().status.is_terminal() {
            return InputOutcome::Ignored(IgnoreReason::NotActive);
        }
        let had_notice = std::mem::take(&mut self.time_up_notice);

        if self.current + 1 < self.targets.len() {
            self.current += 1;
            self.clock.cancel();
            debug!(image = self.current, "advanced to next image");
            InputOutcome::Applied
        } else if had_notice {
            InputOutcome::Applied
        } else {
            InputOutcome::Ignored(IgnoreReason::NotActive)
        }
    }

    fn mark_found(&mut self, zone: ZoneId) {
        let total = self.targets[self.current].zones.len();
        let image = self.image_mut();
        image.found.insert(zone);
        if image.found.len() == total {
            self.succeed_current();
        }
    }

    fn succeed_current(&mut self) {
        self.clock.cancel();
        let remaining = self.clock.remaining();
        let ideal = self.targets[self.current].zones.len();
        let image = self.image_mut();
        let score = if ideal == 0 {
            MAX_SCORE
        } else {
            score_for_effort(ideal as u32, image.click_count, false)
        };
        image.status = ImageStatus::Succeeded;
        image.remaining_seconds = remaining;
        image.score = Some(score);
        info!(image = self.current, score, clicks = self.images[self.current].click_count, "image succeeded");
        self.check_complete();
    }

    fn time_out_current(&mut self) {
        let image = self.image_mut();
        image.status = ImageStatus::TimedOut;
        image.remaining_seconds = 0;
        image.score = Some(0);
        self.active_quiz = None;
        self.time_up_notice = true;
        info!(image = self.current, "image timed out");
        self.check_complete();
    }

    fn check_complete(&mut self) {
        if self.status == HazardStatus::Complete || !self.images.iter().all(|i| i.status.is_terminal()) {
            return;
        }
        self.status = HazardStatus::Complete;

        let image_scores: Vec<u8> = self.images.iter().map(|i| i.score.unwrap_or(0)).collect();
        let has_failed = self.images.iter().any(|i| i.status == ImageStatus::TimedOut);
        let score = mean_with_failure_veto(&image_scores);
        let outcome = if has_failed { SessionOutcome::TimedOut } else { SessionOutcome::Succeeded };

        let report = TerminalReport {
            kind: GameKind::Hazard,
            outcome,
            score,
            details: ScoreDetails::Hazard {
                image_count: self.images.len(),
                click_counts: self.images.iter().map(|i| i.click_count).collect(),
                completed_images: (0..self.images.len()).collect(),
                image_scores,
                has_failed,
            },
        };
        info!(score, ?outcome, "hazard session complete");
        self.notifier.notify(&report);
        self.report = Some(report);
    }
}

impl SessionEngine for HazardSession {
    type Event = HazardEvent;
    type Snapshot = HazardSnapshot;

    fn on_input(&mut self, event: HazardEvent) -> HazardOutcome {
        match event {
            HazardEvent::ImageLoaded => self.image_loaded(),
            HazardEvent::ImageLoadFailed { reason } => self.image_load_failed(reason),
            HazardEvent::RetryImage => self.retry_image(),
            HazardEvent::Pointer(pointer) => self.pointer(pointer),
            HazardEvent::SelectOption(slot) => self.select_option(slot),
            HazardEvent::ResolveQuiz { token } => self.resolve_quiz(token),
            HazardEvent::CloseQuiz => self.close_quiz(),
            HazardEvent::Tick => self.tick(),
            HazardEvent::Advance => self.advance(),
        }
    }

    fn snapshot(&self) -> HazardSnapshot {
        let remaining_seconds = if self.image().status == ImageStatus::Active {
            self.clock.remaining()
        } else {
            self.image().remaining_seconds
        };
        HazardSnapshot {
            targets: Arc::clone(&self.targets),
            images: self.images.clone(),
            current_index: self.current,
            remaining_seconds,
            active_quiz: self.active_quiz.clone(),
            time_up_notice: self.time_up_notice,
            status: self.status,
            session_score: self.report.as_ref().map(|r| r.score),
        }
    }

    fn set_on_terminal(&mut self, callback: TerminalCallback) {
        self.notifier.register(callback, self.report.clone());
    }

    fn terminal_report(&self) -> Option<TerminalReport> {
        self.report.clone()
    }
}

impl std::fmt::Debug for HazardSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HazardSession")
            .field("current", &self.current)
            .field("images", &self.images)
            .field("status", &self.status)
            .field("time_up_notice", &self.time_up_notice)
            .field("active_quiz", &self.active_quiz)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{HazardZone, QuizChallenge};
    use crate::core::SequencePermuter;
    use crate::games::hazard::{PercentPoint, PercentRect};

    fn click(x: f64, y: f64) -> HazardEvent {
        HazardEvent::Pointer(PointerEvent::at_percent(PercentPoint::new(x, y)))
    }

    fn four_zone_image() -> ImageTarget {
        ImageTarget::new("img", "https://cdn/img.png")
            .with_zone(HazardZone::new("a", PercentRect::new(0.0, 0.0, 10.0, 10.0)))
            .with_zone(HazardZone::new("b", PercentRect::new(20.0, 0.0, 10.0, 10.0)))
            .with_zone(HazardZone::new("c", PercentRect::new(40.0, 0.0, 10.0, 10.0)))
            .with_zone(HazardZone::new("d", PercentRect::new(60.0, 0.0, 10.0, 10.0)))
    }

    fn session(targets: Vec<ImageTarget>) -> HazardSession {
        HazardSession::new(targets, &EngineConfig::default(), Box::new(SequencePermuter::identity())).unwrap()
    }

    #[test]
    fn test_empty_targets_rejected() {
        let err = HazardSession::new(vec![], &EngineConfig::default(), Box::new(SequencePermuter::identity()))
            .unwrap_err();
        assert!(matches!(err, GameError::CatalogEmpty(_)));
    }

    #[test]
    fn test_duplicate_zone_ids_rejected() {
        let image = ImageTarget::new("img", "u")
            .with_zone(HazardZone::new("z", PercentRect::new(0.0, 0.0, 10.0, 10.0)))
            .with_zone(HazardZone::new("z", PercentRect::new(50.0, 50.0, 10.0, 10.0)));
        let err = HazardSession::new(vec![image], &EngineConfig::default(), Box::new(SequencePermuter::identity()))
            .unwrap_err();
        assert!(matches!(err, GameError::InvalidInput(_)));
    }

    #[test]
    fn test_clicks_ignored_while_loading() {
        let mut s = session(vec![four_zone_image()]);
        assert_eq!(s.on_input(click(5.0, 5.0)), InputOutcome::Ignored(IgnoreReason::NotActive));
        assert_eq!(s.snapshot().current().click_count, 0);
    }

    #[test]
    fn test_perfect_image() {
        let mut s = session(vec![four_zone_image()]);
        s.on_input(HazardEvent::ImageLoaded);
        for x in [5.0, 25.0, 45.0, 65.0] {
            assert!(s.on_input(click(x, 5.0)).is_applied());
        }
        let snap = s.snapshot();
        assert_eq!(snap.current().status, ImageStatus::Succeeded);
        assert_eq!(snap.current().score, Some(100));
        assert_eq!(snap.status, HazardStatus::Complete);
        assert_eq!(snap.session_score, Some(100));
    }

    #[test]
    fn test_misses_count() {
        let mut s = session(vec![four_zone_image()]);
        s.on_input(HazardEvent::ImageLoaded);
        for _ in 0..4 {
            s.on_input(click(95.0, 95.0));
        }
        for x in [5.0, 25.0, 45.0, 65.0] {
            s.on_input(click(x, 5.0));
        }
        let snap = s.snapshot();
        assert_eq!(snap.current().click_count, 8);
        assert_eq!(snap.current().score, Some(50));
    }

    #[test]
    fn test_timeout_zeroes_image() {
        let config = EngineConfig::default().with_hazard_seconds(3);
        let mut s = HazardSession::new(vec![four_zone_image()], &config, Box::new(SequencePermuter::identity())).unwrap();
        s.on_input(HazardEvent::ImageLoaded);
        s.on_input(click(5.0, 5.0));
        s.on_input(click(25.0, 5.0));
        for _ in 0..3 {
            s.on_input(HazardEvent::Tick);
        }
        let snap = s.snapshot();
        assert_eq!(snap.current().status, ImageStatus::TimedOut);
        assert_eq!(snap.current().score, Some(0));
        assert!(snap.time_up_notice);
        assert_eq!(snap.session_score, Some(0));
        // Clicks blocked by the notice
        assert_eq!(s.on_input(click(45.0, 5.0)), InputOutcome::Ignored(IgnoreReason::Blocked));
    }

    #[test]
    fn test_overlap_first_in_list_wins() {
        let image = ImageTarget::new("img", "u")
            .with_zone(HazardZone::new("first", PercentRect::new(0.0, 0.0, 50.0, 50.0)))
            .with_zone(HazardZone::new("second", PercentRect::new(10.0, 10.0, 50.0, 50.0)));
        let mut s = session(vec![image]);
        s.on_input(HazardEvent::ImageLoaded);
        s.on_input(click(20.0, 20.0));
        let snap = s.snapshot();
        assert!(snap.current().found.contains(&ZoneId::new("first")));
        assert!(!snap.current().found.contains(&ZoneId::new("second")));

        // Same point again now hits the second zone
        s.on_input(click(20.0, 20.0));
        assert_eq!(s.snapshot().current().status, ImageStatus::Succeeded);
    }

    #[test]
    fn test_quiz_wrong_then_right() {
        let quiz = QuizChallenge::new(["a".into(), "b".into(), "c".into(), "d".into()], 2).unwrap();
        let image = ImageTarget::new("img", "u")
            .with_zone(HazardZone::new("q", PercentRect::new(0.0, 0.0, 10.0, 10.0)).with_quiz(quiz));
        let mut s = session(vec![image]);
        s.on_input(HazardEvent::ImageLoaded);

        s.on_input(click(5.0, 5.0));
        let token = s.active_quiz().unwrap().token();
        // Clicks blocked while the quiz is open
        assert_eq!(s.on_input(click(5.0, 5.0)), InputOutcome::Ignored(IgnoreReason::Blocked));

        let outcome = s.on_input(HazardEvent::SelectOption(0));
        assert_eq!(
            outcome,
            InputOutcome::Deferred {
                event: HazardEvent::ResolveQuiz { token },
                after: EngineConfig::default().quiz_resolve_delay(),
            }
        );
        s.on_input(HazardEvent::ResolveQuiz { token });
        assert!(s.active_quiz().is_none());
        assert!(s.snapshot().current().found.is_empty());

        s.on_input(click(5.0, 5.0));
        let token = s.active_quiz().unwrap().token();
        s.on_input(HazardEvent::SelectOption(2));
        s.on_input(HazardEvent::ResolveQuiz { token });
        let snap = s.snapshot();
        assert_eq!(snap.current().status, ImageStatus::Succeeded);
        // Two zone clicks for one zone
        assert_eq!(snap.current().score, Some(50));
    }

    #[test]
    fn test_stale_quiz_resolution_ignored() {
        let quiz = QuizChallenge::new(["a".into(), "b".into(), "c".into(), "d".into()], 0).unwrap();
        let image = ImageTarget::new("img", "u")
            .with_zone(HazardZone::new("q", PercentRect::new(0.0, 0.0, 10.0, 10.0)).with_quiz(quiz));
        let mut s = session(vec![image]);
        s.on_input(HazardEvent::ImageLoaded);
        s.on_input(click(5.0, 5.0));
        let token = s.active_quiz().unwrap().token();
        // Not yet locked
        assert_eq!(s.on_input(HazardEvent::ResolveQuiz { token }), InputOutcome::Ignored(IgnoreReason::Stale));
        s.on_input(HazardEvent::SelectOption(0));
        assert_eq!(
            s.on_input(HazardEvent::ResolveQuiz { token: token + 1 }),
            InputOutcome::Ignored(IgnoreReason::Stale)
        );
    }

    #[test]
    fn test_pause_policy_freezes_clock() {
        let quiz = QuizChallenge::new(["a".into(), "b".into(), "c".into(), "d".into()], 0).unwrap();
        let image = ImageTarget::new("img", "u")
            .with_zone(HazardZone::new("q", PercentRect::new(0.0, 0.0, 10.0, 10.0)).with_quiz(quiz));
        let config = EngineConfig::default().with_quiz_clock_policy(QuizClockPolicy::Pause);
        let mut s = HazardSession::new(vec![image], &config, Box::new(SequencePermuter::identity())).unwrap();
        s.on_input(HazardEvent::ImageLoaded);
        s.on_input(click(5.0, 5.0));
        s.on_input(HazardEvent::Tick);
        assert_eq!(s.snapshot().remaining_seconds, 60);
        s.on_input(HazardEvent::CloseQuiz);
        s.on_input(HazardEvent::Tick);
        assert_eq!(s.snapshot().remaining_seconds, 59);
    }

    #[test]
    fn test_image_without_zones_scores_full() {
        let mut s = session(vec![ImageTarget::new("empty", "u")]);
        s.on_input(HazardEvent::ImageLoaded);
        assert_eq!(s.snapshot().session_score, Some(100));
    }

    #[test]
    fn test_load_failure_and_retry() {
        let mut s = session(vec![four_zone_image()]);
        s.on_input(HazardEvent::ImageLoadFailed { reason: "404".into() });
        let snap = s.snapshot();
        assert_eq!(snap.current().status, ImageStatus::LoadFailed);
        assert_eq!(snap.current().load_error.as_deref(), Some("404"));
        assert_eq!(s.on_input(HazardEvent::Tick), InputOutcome::Ignored(IgnoreReason::NotActive));

        s.on_input(HazardEvent::RetryImage);
        s.on_input(HazardEvent::ImageLoaded);
        assert_eq!(s.snapshot().current().status, ImageStatus::Active);
        assert_eq!(s.snapshot().remaining_seconds, 60);
    }
}
