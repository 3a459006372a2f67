use hdr_types::DeclId;
use indexmap::IndexMap;

/// State shared by every module printed into one C++ header.
#[derive(Debug, Default)]
pub struct InteropContext {
    core_scaffold_printed: bool,
    /* value type -> extensions printed inside it */
    extensions: IndexMap<DeclId, Vec<DeclId>>,
}

impl InteropContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true the first time it is called for this artifact.
    pub fn claim_core_scaffold(&mut self) -> bool {
        !std::mem::replace(&mut self.core_scaffold_printed, true)
    }

    /// Records `ext` as printed inside the value type `base`.
    pub fn record_extensions(&mut self, base: DeclId, ext: DeclId) {
        let recorded = self.extensions.entry(base).or_default();
        if !recorded.contains(&ext) {
            recorded.push(ext);
        }
    }

    pub fn extensions_for(&self, base: DeclId) -> &[DeclId] {
        self.extensions.get(&base).map(Vec::as_slice).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_scaffold_is_claimed_once() {
        let mut interop = InteropContext::new();
        assert!(interop.claim_core_scaffold());
        assert!(!interop.claim_core_scaffold());
        assert!(!interop.claim_core_scaffold());
    }

    #[test]
    fn extensions_are_recorded_once_in_order() {
        let mut interop = InteropContext::new();
        interop.record_extensions(DeclId(1), DeclId(5));
        interop.record_extensions(DeclId(1), DeclId(3));
        interop.record_extensions(DeclId(1), DeclId(5));
        assert_eq!(interop.extensions_for(DeclId(1)), &[DeclId(5), DeclId(3)]);
        assert!(interop.extensions_for(DeclId(2)).is_empty());
    }
}
