use crate::{
    comparator::Comparator,
    error::Result,
    ffi::adapter::{ComparatorAdapter, make_name},
};

#[derive(Debug, Clone)]
pub struct AdapterOptions {
    name: Option<String>,

    track_lifecycle: bool,
}

impl Default for AdapterOptions {
    fn default() -> Self {
        Self {
            name: None,
            track_lifecycle: cfg!(debug_assertions),
        }
    }
}

impl AdapterOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Name reported to the engine instead of the comparator's own.
    ///
    /// The engine stores this name with the database and refuses to open it
    /// under a different one, so an existing database can keep its name while
    /// the implementation behind it changes.
    pub fn name(&mut self, name: impl Into<String>) -> &mut Self {
        self.name = Some(name.into());
        self
    }

    /// Check every callback against the live handle set. Without
    /// `debug_assertions` there is no live set and the unchecked callbacks are
    /// always used.
    pub fn track_lifecycle(&mut self, track: bool) -> &mut Self {
        self.track_lifecycle = track;
        self
    }

    pub fn build<C>(&self, c: C) -> Result<ComparatorAdapter<C>>
    where
        C: Comparator,
    {
        let name = make_name(self.name.as_deref().unwrap_or(c.name()))?;
        let track = self.track_lifecycle && cfg!(debug_assertions);
        Ok(ComparatorAdapter::from_parts(name, c, track))
    }
}

#[cfg(test)]
mod tests {
    use std::cmp::Ordering::*;

    use crate::{comparator::prelude::*, error::Error, ffi::prelude::*};

    use super::AdapterOptions;

    #[test]
    fn defaults_to_comparator_name() {
        let adapter = AdapterOptions::new().build(BytewiseComparator).unwrap();
        assert_eq!(adapter.name().to_bytes(), BYTEWISE_COMPARATOR_NAME.as_bytes());
    }

    #[test]
    fn name_override() {
        let adapter = AdapterOptions::new()
            .name("app.keys.v1")
            .build(BytewiseComparator)
            .unwrap();

        let raw = adapter.into_raw();
        unsafe {
            assert_eq!(raw.name().to_bytes(), b"app.keys.v1");
            assert_eq!(raw.compare(b"a", b"b"), Less);
            raw.destroy();
        }
    }

    #[test]
    fn empty_override_is_rejected() {
        let err = AdapterOptions::new()
            .name("")
            .build(BytewiseComparator)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidName(_)));
    }

    #[test]
    fn tracking_only_with_debug_assertions() {
        let adapter = AdapterOptions::new()
            .track_lifecycle(true)
            .build(BytewiseComparator)
            .unwrap();
        assert_eq!(adapter.tracks_lifecycle(), cfg!(debug_assertions));

        let raw = adapter.into_raw();
        assert_eq!(raw.is_tracked(), cfg!(debug_assertions));
        unsafe { raw.destroy() };
    }

    #[test]
    fn untracked_handle_still_works() {
        let raw = AdapterOptions::new()
            .track_lifecycle(false)
            .build(FnComparator::new("reverse-lex", |a: &[u8], b: &[u8]| b.cmp(a)))
            .unwrap()
            .into_raw();

        assert!(!raw.is_tracked());
        if cfg!(debug_assertions) {
            assert!(!is_live(raw.state()));
        }
        // not in the live set, but still a valid handle
        assert!(raw.check_live().is_ok());
        unsafe {
            assert_eq!(raw.compare(b"apple", b"banana"), Greater);
            assert_eq!(raw.name().to_bytes(), b"reverse-lex");
            raw.destroy();
        }
    }
}
