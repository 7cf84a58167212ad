/// Arena handle of a clause. Clause identity is always an index, never an
/// address: the allocator may be compacted, external code holds only handles.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ClauseRef(pub(crate) usize);
