use std::time::Instant;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TaskKind { Poll, Reveal }

#[derive(Debug)]
struct Pending { id: TaskId, kind: TaskKind, due: Instant }

#[derive(Debug, Default)]
pub struct Scheduler {
    pending: Vec<Pending>,
    next_id: u64,
}
impl Scheduler {
    pub fn new() -> Self { Self::default() }

    pub fn schedule(&mut self, kind: TaskKind, due: Instant) -> TaskId {
        if let Some(old) = self.pending.iter().position(|p| p.kind == kind) {
            let replaced = self.pending.swap_remove(old);
            log::trace!("replacing pending {:?} task {:?}", kind, replaced.id);
        }
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.pending.push(Pending { id, kind, due });
        id
    }

    pub fn cancel(&mut self, id: TaskId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|p| p.id != id);
        self.pending.len() != before
    }

    #[cfg(test)]
    pub fn is_pending(&self, id: TaskId) -> bool {
        self.pending.iter().any(|p| p.id == id)
    }

    #[cfg(test)]
    pub fn pending_count(&self, kind: TaskKind) -> usize {
        self.pending.iter().filter(|p| p.kind == kind).count()
    }

    pub fn take_due(&mut self, now: Instant) -> Vec<(TaskId, TaskKind)> {
        let mut due: Vec<Pending> = Vec::new();
        let mut i = 0;
        while i < self.pending.len() {
            if self.pending[i].due <= now { due.push(self.pending.swap_remove(i)); } else { i += 1; }
        }
        due.sort_by_key(|p| (p.due, p.id));
        due.into_iter().map(|p| (p.id, p.kind)).collect()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.iter().map(|p| p.due).min()
    }
}
