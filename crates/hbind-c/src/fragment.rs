//! Rendered header fragments and their ordering keys.

/// Header sections, in emission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Section {
    Banner,
    GuardOpen,
    Includes,
    CppOpen,
    RuntimeBuffer,
    Helpers,
    Types,
    Library,
    CppClose,
    GuardClose,
}

/// Position of a fragment within the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FragmentKey {
    pub section: Section,
    /// Order within the section.
    pub ordinal: u32,
}

/// A piece of rendered header text. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub key: FragmentKey,
    pub text: String,
}

impl Fragment {
    pub fn new(section: Section, ordinal: u32, text: impl Into<String>) -> Self {
        Self {
            key: FragmentKey { section, ordinal },
            text: text.into(),
        }
    }

    /// Whether this fragment contributes nothing to the header.
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Number fragment texts in the given section, keeping their order.
pub fn sequence(section: Section, texts: impl IntoIterator<Item = String>) -> Vec<Fragment> {
    (0u32..)
        .zip(texts)
        .map(|(ordinal, text)| Fragment::new(section, ordinal, text))
        .collect()
}
