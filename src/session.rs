use std::sync::Arc;

use crate::error::GenerationError;
use crate::generation::{GenerationBridge, GenerationRequest, GenerationResult, Generator};
use crate::live::{LiveNavigation, ScrollRequest};
use crate::persistence::{Persistence, SnapshotStore};
use crate::sections::SectionId;
use crate::store::EditorStore;
use crate::timer::{Clock, Timer};

/// Everything the UI composes: the document store, the live cursor, the
/// talk timer and the generation bridge.
///
/// Live mode is one switch: turning it on starts the timer and places the
/// cursor, turning it off pauses the timer and drops the cursor.
pub struct Session<S> {
    store: EditorStore<S>,
    navigation: LiveNavigation,
    timer: Timer,
    clock: Clock,
    generation: GenerationBridge,
}

impl<S: SnapshotStore> Session<S> {
    pub fn new(persistence: Persistence<S>, generator: Arc<dyn Generator>) -> Self {
        Self {
            store: EditorStore::open(persistence),
            navigation: LiveNavigation::new(),
            timer: Timer::new(),
            clock: Clock::new(),
            generation: GenerationBridge::new(generator),
        }
    }

    pub fn store(&self) -> &EditorStore<S> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut EditorStore<S> {
        &mut self.store
    }

    pub fn navigation(&self) -> &LiveNavigation {
        &self.navigation
    }

    pub fn timer(&self) -> &Timer {
        &self.timer
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    pub fn is_live(&self) -> bool {
        self.navigation.is_active()
    }

    /// Text edits must not be routed to the store while live.
    pub fn can_edit(&self) -> bool {
        !self.is_live()
    }

    pub fn set_live(&mut self, enabled: bool) {
        if enabled == self.is_live() {
            return;
        }
        self.navigation.set_enabled(enabled);
        self.timer.set_running(enabled);
        tracing::info!(enabled, "live mode");
    }

    pub fn toggle_live(&mut self) {
        self.set_live(!self.is_live());
    }

    pub fn advance(&mut self) -> Option<ScrollRequest> {
        self.navigation.advance()
    }

    pub fn retreat(&mut self) -> Option<ScrollRequest> {
        self.navigation.retreat()
    }

    pub fn activate(&mut self, id: SectionId) -> bool {
        self.navigation.activate(id)
    }

    /// Zeroes the timer. A running timer first leaves live mode, since live
    /// mode is the timer's start/stop control.
    pub fn reset_timer(&mut self) {
        if self.timer.is_running() {
            self.set_live(false);
        }
        self.timer.reset();
    }

    /// One-second heartbeat for the timer. Returns whether it changed.
    pub fn tick_timer(&mut self) -> bool {
        self.timer.tick()
    }

    pub fn sample_clock(&mut self) {
        self.clock.sample();
    }

    pub fn is_generating(&self) -> bool {
        self.generation.is_busy()
    }

    /// Starts generating from the current reference, verses and statement.
    pub fn start_generation(&mut self) -> Result<(), GenerationError> {
        let request = GenerationRequest::from_document(self.store.document());
        self.generation.start(request)
    }

    /// Collects a finished generation, writing it into the document on
    /// success. `None` while nothing has finished.
    pub fn poll_generation(&mut self) -> Option<Result<(), GenerationError>> {
        let result = self.generation.poll()?;
        Some(self.finish_generation(result))
    }

    /// Blocks until the pending generation finishes.
    pub fn wait_generation(&mut self) -> Option<Result<(), GenerationError>> {
        let result = self.generation.wait()?;
        Some(self.finish_generation(result))
    }

    fn finish_generation(&mut self, result: GenerationResult) -> Result<(), GenerationError> {
        match result {
            Ok(content) => {
                self.store.apply_generated(&content);
                tracing::info!("generation applied");
                Ok(())
            }
            Err(err) => {
                tracing::warn!(error = ?err, "generation failed");
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::generation::GeneratedContent;
    use crate::persistence::MemoryStore;
    use crate::sections::SECTION_ORDER;

    struct FixedGenerator(GenerationResult);

    impl Generator for FixedGenerator {
        fn generate(&self, _request: &GenerationRequest) -> GenerationResult {
            self.0.clone()
        }
    }

    fn session_with(result: GenerationResult) -> Session<MemoryStore> {
        Session::new(
            Persistence::new(MemoryStore::new()),
            Arc::new(FixedGenerator(result)),
        )
    }

    fn success() -> GenerationResult {
        Ok(GeneratedContent::new(
            "New point",
            SECTION_ORDER.map(|id| format!("{} text", id.key())),
        ))
    }

    #[test]
    fn live_mode_drives_navigation_and_timer() {
        let mut session = session_with(success());
        assert!(session.can_edit());

        session.toggle_live();
        assert!(session.is_live());
        assert!(!session.can_edit());
        assert!(session.timer().is_running());
        assert_eq!(session.navigation().cursor(), Some(SectionId::Intro));

        session.tick_timer();
        session.advance();
        session.toggle_live();
        assert!(!session.timer().is_running());
        assert_eq!(session.timer().elapsed(), 1);
        assert_eq!(session.navigation().cursor(), None);

        session.toggle_live();
        assert_eq!(session.navigation().cursor(), Some(SectionId::Intro));
    }

    #[test]
    fn timer_pauses_across_live_sessions() {
        let mut session = session_with(success());
        session.set_live(true);
        for _ in 0..5 {
            session.tick_timer();
        }
        session.set_live(false);
        session.tick_timer();
        session.set_live(true);
        for _ in 0..3 {
            session.tick_timer();
        }
        assert_eq!(session.timer().elapsed(), 8);
    }

    #[test]
    fn resetting_a_running_timer_leaves_live_mode() {
        let mut session = session_with(success());
        session.set_live(true);
        session.tick_timer();
        session.reset_timer();
        assert!(!session.is_live());
        assert_eq!(session.timer().elapsed(), 0);
        assert!(!session.timer().is_running());
    }

    #[test]
    fn successful_generation_updates_everything_at_once() {
        let mut session = session_with(success());
        session.store_mut().set_reference("Luke 15");
        session.start_generation().unwrap();
        assert!(session.is_generating());

        session.wait_generation().unwrap().unwrap();
        assert!(!session.is_generating());
        let document = session.store().document();
        assert_eq!(document.statement, "New point");
        for id in SECTION_ORDER {
            assert_eq!(document.section(id).content, format!("{} text", id.key()));
        }
    }

    #[test]
    fn failed_generation_leaves_document_untouched() {
        let mut session = session_with(Err(GenerationError::Failed("timeout".to_string())));
        session.store_mut().set_reference("Luke 15");
        session.store_mut().set_statement("Mine");
        session
            .store_mut()
            .set_section_content(SectionId::God, "keep me");
        let before = session.store().document().clone();
        let writes = session.store().persistence().backend().writes();

        session.start_generation().unwrap();
        let outcome = session.wait_generation().unwrap();

        assert!(matches!(outcome, Err(GenerationError::Failed(_))));
        assert_eq!(session.store().document(), &before);
        assert_eq!(session.store().persistence().backend().writes(), writes);
    }

    #[test]
    fn generation_with_blank_input_is_rejected_up_front() {
        let mut session = session_with(success());
        assert_eq!(session.start_generation(), Err(GenerationError::EmptyInput));
        assert!(!session.is_generating());
        assert!(session.poll_generation().is_none());
    }
}
