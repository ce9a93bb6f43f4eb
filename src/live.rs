use crate::sections::SectionId;

/// State of the live walkthrough.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LiveState {
    #[default]
    Inactive,
    Active {
        cursor: SectionId,
    },
}

/// Request for the view to bring a section into sight.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScrollRequest {
    pub target: SectionId,
}

/// Single-selection cursor over the sections while live mode is on.
///
/// Movement clamps at both ends of the display order; there is no
/// wraparound. Leaving live mode discards the cursor, so every walkthrough
/// starts again at the first section.
#[derive(Clone, Debug, Default)]
pub struct LiveNavigation {
    state: LiveState,
}

impl LiveNavigation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> LiveState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, LiveState::Active { .. })
    }

    pub fn cursor(&self) -> Option<SectionId> {
        match self.state {
            LiveState::Active { cursor } => Some(cursor),
            LiveState::Inactive => None,
        }
    }

    /// Enters live mode at the first section. Already active: unchanged.
    pub fn enable(&mut self) {
        if self.is_active() {
            return;
        }
        self.state = LiveState::Active {
            cursor: SectionId::first(),
        };
        tracing::debug!("live navigation enabled");
    }

    pub fn disable(&mut self) {
        if self.is_active() {
            tracing::debug!("live navigation disabled");
        }
        self.state = LiveState::Inactive;
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        if enabled {
            self.enable();
        } else {
            self.disable();
        }
    }

    /// Moves to the next section. `None` when inactive or already at the
    /// last section.
    pub fn advance(&mut self) -> Option<ScrollRequest> {
        let target = self.cursor()?.next()?;
        Some(self.move_to(target))
    }

    /// Moves to the previous section. `None` when inactive or already at
    /// the first section.
    pub fn retreat(&mut self) -> Option<ScrollRequest> {
        let target = self.cursor()?.previous()?;
        Some(self.move_to(target))
    }

    /// Points the cursor at `id` directly. Ignored while inactive.
    pub fn activate(&mut self, id: SectionId) -> bool {
        if !self.is_active() {
            return false;
        }
        self.state = LiveState::Active { cursor: id };
        true
    }

    fn move_to(&mut self, target: SectionId) -> ScrollRequest {
        self.state = LiveState::Active { cursor: target };
        ScrollRequest { target }
    }
}
