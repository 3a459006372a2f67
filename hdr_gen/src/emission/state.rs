use crate::dialect::DialectConfig;
use hdr_types::{DeclId, ModuleGraph, ModuleId, ModuleKind};
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, trace};

/// Definition progress of one declaration. Only ever moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum EmissionState {
    #[default]
    NotYetDefined,
    DefinitionRequested,
    Defined,
}

/// Side-table entry for a declaration seen during a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SeenType {
    pub state: EmissionState,
    /// Sticky; independent of `state`.
    pub forward_declared: bool,
}

impl SeenType {
    fn advance(&mut self, to: EmissionState) {
        if to > self.state {
            self.state = to;
        }
    }
}

/// Outcome of requiring a declaration's definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    /// Already defined, or provided by an import.
    Satisfied,
    /// Pushed onto the work stack; the requester must be retried.
    Pending,
    /// The declaration is itself waiting on the requester, directly or
    /// through other requests: pushing it again would never make progress.
    Cycle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct WorkEntry {
    decl: DeclId,
    serial: usize,
    /* Serial of the entry that was being written when this one was pushed */
    requested_by: Option<usize>,
}

/// LIFO of declarations waiting to be written.
#[derive(Debug, Default)]
pub struct WorkStack {
    entries: Vec<WorkEntry>,
    /// Index of the entry being written.
    current: Option<usize>,
    next_serial: usize,
}

impl WorkStack {
    /// Seeds the stack so that popping yields `sorted` in order.
    pub fn seeded(sorted: &[DeclId]) -> Self {
        let mut stack = Self::default();
        for decl in sorted.iter().rev() {
            let entry = stack.entry(*decl, None);
            stack.entries.push(entry);
        }
        stack
    }

    fn entry(&mut self, decl: DeclId, requested_by: Option<usize>) -> WorkEntry {
        let serial = self.next_serial;
        self.next_serial += 1;
        WorkEntry {
            decl,
            serial,
            requested_by,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn top(&self) -> Option<DeclId> {
        self.entries.last().map(|entry| entry.decl)
    }

    /// Pushes `decl` on behalf of the entry being written.
    pub fn push(&mut self, decl: DeclId) {
        let requested_by = self.current.map(|index| self.entries[index].serial);
        let entry = self.entry(decl, requested_by);
        self.entries.push(entry);
    }

    /// Marks the top entry as the one being written.
    pub fn begin_top(&mut self) -> Option<DeclId> {
        let top = self.top()?;
        self.current = Some(self.entries.len() - 1);
        Some(top)
    }

    /// Inserts `decls` directly beneath the current entry so they are written
    /// right after it, in their given order.
    pub fn insert_below_current(&mut self, decls: &[DeclId]) {
        if decls.is_empty() {
            return;
        }
        let at = self.current.unwrap_or(self.entries.len());
        let inserted: Vec<WorkEntry> = decls.iter().rev().map(|decl| self.entry(*decl, None)).collect();
        self.entries.splice(at..at, inserted);
        if let Some(current) = self.current.as_mut() {
            *current += decls.len();
        }
    }

    /// True if `decl` is the current entry or one of the entries it is
    /// waiting for through a chain of requests.
    pub fn on_request_chain(&self, decl: DeclId) -> bool {
        let mut next = self.current.map(|index| self.entries[index]);
        while let Some(entry) = next {
            if entry.decl == decl {
                return true;
            }
            next = entry.requested_by.and_then(|serial| {
                self.entries
                    .iter()
                    .find(|candidate| candidate.serial == serial)
                    .copied()
            });
        }
        false
    }

    /// Removes the current entry after it was written, returning it.
    pub fn finish_current(&mut self) -> Option<DeclId> {
        let current = self.current.take()?;
        Some(self.entries.remove(current).decl)
    }

    pub fn current(&self) -> Option<DeclId> {
        self.current.map(|index| self.entries[index].decl)
    }
}

/// Tracks which external modules the header must import.
#[derive(Debug)]
pub struct ImportTracker<'g> {
    graph: &'g ModuleGraph,
    module: ModuleId,
    dialect: DialectConfig,
    imports: BTreeSet<ModuleId>,
    depends_on_stdlib: bool,
}

impl<'g> ImportTracker<'g> {
    pub fn new(graph: &'g ModuleGraph, module: ModuleId, dialect: DialectConfig) -> Self {
        Self {
            graph,
            module,
            dialect,
            imports: BTreeSet::new(),
            depends_on_stdlib: false,
        }
    }

    /// Returns true if `decl` comes from another module (recording the import
    /// it needs, if any), false if it is local to the module being printed.
    ///
    /// Stdlib, builtin and vector-type declarations are handled by the
    /// prologue rather than an explicit import.
    pub fn add_import(&mut self, decl: DeclId) -> bool {
        let d = self.graph.decl(decl);
        if d.module == self.module {
            return false;
        }

        let other = self.graph.module(d.module);
        match other.kind {
            ModuleKind::Stdlib => {
                self.depends_on_stdlib = true;
                return true;
            }
            ModuleKind::Builtin | ModuleKind::Simd => return true,
            _ => {}
        }

        // Foreign declarations import their nearest explicit owning submodule.
        if let Some(owner) = d.foreign.as_ref().and_then(|origin| origin.owning_module) {
            if let Some(explicit) = self.graph.nearest_explicit(owner) {
                self.insert(explicit);
                return true;
            }
        }

        if self.dialect.is_cxx()
            && (!d.has_foreign_node() || other.kind == ModuleKind::BridgingHeader)
        {
            return true;
        }

        self.insert(d.module);
        true
    }

    fn insert(&mut self, module: ModuleId) {
        if self.imports.insert(module) {
            debug!(module = %self.graph.module(module).name, "recorded import");
        }
    }

    pub fn imports(&self) -> &BTreeSet<ModuleId> {
        &self.imports
    }

    pub fn depends_on_stdlib(&self) -> bool {
        self.depends_on_stdlib
    }

    pub fn into_parts(self) -> (BTreeSet<ModuleId>, bool) {
        (self.imports, self.depends_on_stdlib)
    }
}

/// Per-pass emission bookkeeping: seen types, imports and the work stack.
#[derive(Debug)]
pub struct EmissionTracker<'g> {
    pub imports: ImportTracker<'g>,
    pub work: WorkStack,
    seen: HashMap<DeclId, SeenType>,
}

impl<'g> EmissionTracker<'g> {
    pub fn new(imports: ImportTracker<'g>, work: WorkStack) -> Self {
        Self {
            imports,
            work,
            seen: HashMap::new(),
        }
    }

    pub fn seen(&self, decl: DeclId) -> SeenType {
        self.seen.get(&decl).copied().unwrap_or_default()
    }

    pub fn state(&self, decl: DeclId) -> EmissionState {
        self.seen(decl).state
    }

    pub fn is_defined(&self, decl: DeclId) -> bool {
        self.state(decl) == EmissionState::Defined
    }

    pub fn has_been_requested(&self, decl: DeclId) -> bool {
        self.state(decl) >= EmissionState::DefinitionRequested
    }

    pub fn is_forward_declared(&self, decl: DeclId) -> bool {
        self.seen(decl).forward_declared
    }

    pub fn mark_forward_declared(&mut self, decl: DeclId) {
        self.seen.entry(decl).or_default().forward_declared = true;
    }

    pub fn mark_defined(&mut self, decl: DeclId) {
        let entry = self.seen.entry(decl).or_default();
        entry.advance(EmissionState::Defined);
        entry.forward_declared = true;
    }

    /// Satisfied if imported or already defined. Never schedules `decl`.
    pub fn try_require(&mut self, decl: DeclId) -> bool {
        if self.imports.add_import(decl) {
            self.mark_defined(decl);
            return true;
        }
        self.is_defined(decl)
    }

    /// Like [`Self::try_require`], but schedules `decl` when it isn't defined yet.
    pub fn require(&mut self, decl: DeclId) -> Requirement {
        if self.imports.add_import(decl) {
            self.mark_defined(decl);
            return Requirement::Satisfied;
        }

        match self.state(decl) {
            EmissionState::Defined => Requirement::Satisfied,
            EmissionState::DefinitionRequested if self.work.on_request_chain(decl) => {
                Requirement::Cycle
            }
            EmissionState::NotYetDefined | EmissionState::DefinitionRequested => {
                self.seen
                    .entry(decl)
                    .or_default()
                    .advance(EmissionState::DefinitionRequested);
                self.work.push(decl);
                trace!(%decl, "scheduled definition");
                Requirement::Pending
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hdr_types::{DeclKind, ForeignOrigin};

    struct Fixture {
        graph: ModuleGraph,
        zoo: ModuleId,
    }

    fn fixture() -> Fixture {
        let mut graph = ModuleGraph::new();
        let zoo = graph.add_module("Zoo", ModuleKind::Source);
        Fixture { graph, zoo }
    }

    #[test]
    fn local_declarations_are_not_imported() {
        let mut f = fixture();
        let cage = f.graph.add_top_level(DeclKind::Class, "Cage", f.zoo);
        let mut tracker = ImportTracker::new(&f.graph, f.zoo, DialectConfig::objc());

        assert!(!tracker.add_import(cage));
        assert!(tracker.imports().is_empty());
    }

    #[test]
    fn stdlib_is_recorded_but_not_imported() {
        let mut f = fixture();
        let std = f.graph.add_module("Std", ModuleKind::Stdlib);
        let array = f.graph.add_top_level(DeclKind::Struct, "Array", std);
        let mut tracker = ImportTracker::new(&f.graph, f.zoo, DialectConfig::objc());

        assert!(tracker.add_import(array));
        assert!(tracker.imports().is_empty());
        assert!(tracker.depends_on_stdlib());
    }

    #[test]
    fn foreign_declarations_import_nearest_explicit_module() {
        let mut f = fixture();
        let kit = f.graph.add_module("Kit", ModuleKind::Foreign);
        let internals = f.graph.add_module("Kit.Internals", ModuleKind::Foreign);
        f.graph.module_mut(internals).explicit = false;
        f.graph.module_mut(internals).parent = Some(kit);
        let widget = f.graph.add_top_level(DeclKind::Class, "Widget", kit);
        f.graph.decl_mut(widget).foreign = Some(ForeignOrigin {
            owning_module: Some(internals),
            ..Default::default()
        });
        let mut tracker = ImportTracker::new(&f.graph, f.zoo, DialectConfig::objc());

        assert!(tracker.add_import(widget));
        assert!(tracker.add_import(widget));
        assert_eq!(tracker.imports().iter().copied().collect::<Vec<_>>(), vec![kit]);
    }

    #[test]
    fn cxx_does_not_import_native_modules() {
        let mut f = fixture();
        let other = f.graph.add_module("Aquarium", ModuleKind::Source);
        let tank = f.graph.add_top_level(DeclKind::Class, "Tank", other);

        let mut cxx = ImportTracker::new(&f.graph, f.zoo, DialectConfig::cxx());
        assert!(cxx.add_import(tank));
        assert!(cxx.imports().is_empty());

        let mut objc = ImportTracker::new(&f.graph, f.zoo, DialectConfig::objc());
        assert!(objc.add_import(tank));
        assert_eq!(objc.imports().len(), 1);
    }

    #[test]
    fn require_schedules_and_try_require_does_not() {
        let mut f = fixture();
        let cage = f.graph.add_top_level(DeclKind::Class, "Cage", f.zoo);
        let imports = ImportTracker::new(&f.graph, f.zoo, DialectConfig::objc());
        let mut tracker = EmissionTracker::new(imports, WorkStack::default());

        assert!(!tracker.try_require(cage));
        assert!(tracker.work.is_empty());
        assert!(!tracker.has_been_requested(cage));

        assert_eq!(tracker.require(cage), Requirement::Pending);
        assert_eq!(tracker.work.top(), Some(cage));
        assert!(tracker.has_been_requested(cage));

        tracker.mark_defined(cage);
        assert_eq!(tracker.require(cage), Requirement::Satisfied);
        assert!(tracker.try_require(cage));
        assert_eq!(tracker.state(cage), EmissionState::Defined);
    }

    #[test]
    fn state_never_moves_backwards() {
        let mut f = fixture();
        let cage = f.graph.add_top_level(DeclKind::Class, "Cage", f.zoo);
        let imports = ImportTracker::new(&f.graph, f.zoo, DialectConfig::objc());
        let mut tracker = EmissionTracker::new(imports, WorkStack::default());

        tracker.mark_defined(cage);
        tracker
            .seen
            .get_mut(&cage)
            .unwrap()
            .advance(EmissionState::DefinitionRequested);
        assert_eq!(tracker.state(cage), EmissionState::Defined);
        assert!(tracker.is_forward_declared(cage));
    }

    #[test]
    fn requiring_an_entry_on_the_request_chain_is_a_cycle() {
        let mut f = fixture();
        let a = f.graph.add_top_level(DeclKind::Class, "A", f.zoo);
        let b = f.graph.add_top_level(DeclKind::Class, "B", f.zoo);
        let imports = ImportTracker::new(&f.graph, f.zoo, DialectConfig::objc());
        let mut tracker = EmissionTracker::new(imports, WorkStack::seeded(&[a]));

        assert_eq!(tracker.work.begin_top(), Some(a));
        assert_eq!(tracker.require(b), Requirement::Pending);
        assert_eq!(tracker.work.begin_top(), Some(b));
        assert!(tracker.work.on_request_chain(a));
        // The seeded entry was never requested, so it gets one more try.
        assert_eq!(tracker.require(a), Requirement::Pending);
        assert_eq!(tracker.work.begin_top(), Some(a));
        assert!(tracker.work.on_request_chain(b));
        assert_eq!(tracker.require(b), Requirement::Cycle);
        assert_eq!(tracker.work.len(), 3);
    }

    #[test]
    fn shared_prerequisite_is_pushed_again() {
        let mut f = fixture();
        let base = f.graph.add_top_level(DeclKind::Protocol, "Base", f.zoo);
        let derived = f.graph.add_top_level(DeclKind::Protocol, "Derived", f.zoo);
        let user = f.graph.add_top_level(DeclKind::Class, "User", f.zoo);
        let imports = ImportTracker::new(&f.graph, f.zoo, DialectConfig::objc());
        let mut tracker =
            EmissionTracker::new(imports, WorkStack::seeded(&[user, base, derived]));

        // User needs both protocols, Derived needs Base as well.
        tracker.work.begin_top();
        assert_eq!(tracker.require(base), Requirement::Pending);
        assert_eq!(tracker.require(derived), Requirement::Pending);
        assert_eq!(tracker.work.begin_top(), Some(derived));
        assert!(!tracker.work.on_request_chain(base));
        assert_eq!(tracker.require(base), Requirement::Pending);
        assert_eq!(tracker.work.top(), Some(base));
    }

    #[test]
    fn nested_entries_follow_the_current_entry() {
        let mut stack = WorkStack::seeded(&[DeclId(0), DeclId(1)]);
        assert_eq!(stack.begin_top(), Some(DeclId(0)));
        stack.insert_below_current(&[DeclId(7), DeclId(8)]);
        assert_eq!(stack.current(), Some(DeclId(0)));

        assert_eq!(stack.finish_current(), Some(DeclId(0)));
        let mut order = Vec::new();
        while let Some(top) = stack.begin_top() {
            order.push(top);
            stack.finish_current();
        }
        assert_eq!(order, vec![DeclId(7), DeclId(8), DeclId(1)]);
    }
}
