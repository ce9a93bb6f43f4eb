use std::fmt;

/// Identifier of one slot in the sermon framework.
///
/// The set is closed: every document always holds exactly one section per
/// variant, in the order given by [`SECTION_ORDER`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SectionId {
    Intro,
    Me,
    We1,
    God,
    You,
    We2,
    Out,
}

pub const SECTION_COUNT: usize = 7;

/// Display order used by the live walkthrough and by rendering.
pub const SECTION_ORDER: [SectionId; SECTION_COUNT] = [
    SectionId::Intro,
    SectionId::Me,
    SectionId::We1,
    SectionId::God,
    SectionId::You,
    SectionId::We2,
    SectionId::Out,
];

/// Rows of the editor layout. Sections sharing a row are shown side by side
/// when there is room for it.
pub const DISPLAY_ROWS: [&[SectionId]; 5] = [
    &[SectionId::Intro],
    &[SectionId::Me, SectionId::We1],
    &[SectionId::God],
    &[SectionId::You, SectionId::We2],
    &[SectionId::Out],
];

/// Category tag attached to every section. Only the theme interprets it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SectionColor {
    Cyan,
    Indigo,
    Violet,
    Amber,
    Orange,
    Emerald,
    Rose,
}

/// Static registry entry for a section.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SectionMeta {
    pub label: &'static str,
    pub title: &'static str,
    pub subtitle: &'static str,
    pub placeholder: &'static str,
    pub color: SectionColor,
}

const INTRO: SectionMeta = SectionMeta {
    label: "INTRO",
    title: "INTRODUCTION",
    subtitle: "Hook the audience and introduce the topic.",
    placeholder: "Hook the audience and introduce the topic. Start with a story, a question, or a tension that grabs attention...",
    color: SectionColor::Cyan,
};

const ME: SectionMeta = SectionMeta {
    label: "ME",
    title: "ORIENTATION",
    subtitle: "Here is a problem I have or have had. (Builds Rapport)",
    placeholder: "Here is a problem I have or have had. (Builds Rapport)",
    color: SectionColor::Indigo,
};

const WE1: SectionMeta = SectionMeta {
    label: "WE",
    title: "IDENTIFICATION",
    subtitle: "Here is how this affects all of us. (Builds Tension)",
    placeholder: "Here is how this affects all of us. (Builds Tension)",
    color: SectionColor::Violet,
};

const GOD: SectionMeta = SectionMeta {
    label: "GOD",
    title: "ILLUMINATION",
    subtitle: "Here is what God says about it. (Resolves Tension)",
    placeholder: "Here is what God says about it. (Resolves Tension)",
    color: SectionColor::Amber,
};

const YOU: SectionMeta = SectionMeta {
    label: "YOU",
    title: "APPLICATION",
    subtitle: "Here is what you should do. (Challenge)",
    placeholder: "Here is what you should do. (Challenge)",
    color: SectionColor::Orange,
};

const WE2: SectionMeta = SectionMeta {
    label: "WE",
    title: "INSPIRATION",
    subtitle: "Here is what happens if we all do this. (Vision)",
    placeholder: "Here is what happens if we all do this. (Vision)",
    color: SectionColor::Emerald,
};

const OUT: SectionMeta = SectionMeta {
    label: "OUT",
    title: "CONCLUSION",
    subtitle: "Summarize the main point and land the plane.",
    placeholder: "Summarize the main point and land the plane.",
    color: SectionColor::Rose,
};

impl SectionId {
    /// Stable key used in snapshots and generation payloads.
    pub const fn key(self) -> &'static str {
        match self {
            SectionId::Intro => "intro",
            SectionId::Me => "me",
            SectionId::We1 => "we1",
            SectionId::God => "god",
            SectionId::You => "you",
            SectionId::We2 => "we2",
            SectionId::Out => "out",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        SECTION_ORDER.iter().copied().find(|id| id.key() == key)
    }

    pub const fn meta(self) -> &'static SectionMeta {
        match self {
            SectionId::Intro => &INTRO,
            SectionId::Me => &ME,
            SectionId::We1 => &WE1,
            SectionId::God => &GOD,
            SectionId::You => &YOU,
            SectionId::We2 => &WE2,
            SectionId::Out => &OUT,
        }
    }

    /// Position in [`SECTION_ORDER`].
    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn first() -> Self {
        SECTION_ORDER[0]
    }

    pub fn last() -> Self {
        SECTION_ORDER[SECTION_ORDER.len() - 1]
    }

    /// Next section in display order, `None` past the end.
    pub fn next(self) -> Option<Self> {
        SECTION_ORDER.get(self.index() + 1).copied()
    }

    /// Previous section in display order, `None` before the start.
    pub fn previous(self) -> Option<Self> {
        self.index()
            .checked_sub(1)
            .and_then(|idx| SECTION_ORDER.get(idx).copied())
    }

    /// Whether a freshly created section starts expanded.
    pub const fn default_expanded(self) -> bool {
        true
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_matches_enum_index() {
        for (idx, id) in SECTION_ORDER.iter().enumerate() {
            assert_eq!(id.index(), idx);
        }
    }

    #[test]
    fn keys_round_trip_and_unknown_keys_are_rejected() {
        for id in SECTION_ORDER {
            assert_eq!(SectionId::from_key(id.key()), Some(id));
        }
        assert_eq!(SectionId::from_key("outro"), None);
        assert_eq!(SectionId::from_key("INTRO"), None);
    }

    #[test]
    fn display_rows_cover_every_section_once_in_order() {
        let flattened: Vec<SectionId> = DISPLAY_ROWS
            .iter()
            .flat_map(|row| row.iter().copied())
            .collect();
        assert_eq!(flattened, SECTION_ORDER.to_vec());
    }

    #[test]
    fn neighbours_stop_at_the_ends() {
        assert_eq!(SectionId::Intro.previous(), None);
        assert_eq!(SectionId::Intro.next(), Some(SectionId::Me));
        assert_eq!(SectionId::Out.next(), None);
        assert_eq!(SectionId::Out.previous(), Some(SectionId::We2));
        assert_eq!(SectionId::first(), SectionId::Intro);
        assert_eq!(SectionId::last(), SectionId::Out);
    }

    #[test]
    fn both_we_sections_share_a_label_but_not_a_title() {
        assert_eq!(SectionId::We1.meta().label, SectionId::We2.meta().label);
        assert_ne!(SectionId::We1.meta().title, SectionId::We2.meta().title);
    }
}
