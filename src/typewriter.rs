use std::time::{Duration, Instant};

use crate::scheduler::{Scheduler, TaskId, TaskKind};

#[derive(Debug)]
pub struct Typewriter {
    target:   String,
    shown:    usize,
    interval: Duration,
    task:     Option<TaskId>,
}
impl Typewriter {
    pub fn new(interval: Duration) -> Self {
        Self { target: String::new(), shown: 0, interval, task: None }
    }

    pub fn reveal(&mut self, text: impl Into<String>, scheduler: &mut Scheduler, now: Instant) {
        self.cancel(scheduler);
        self.target = text.into();
        self.shown = 0;
        if !self.target.is_empty() {
            self.task = Some(scheduler.schedule(TaskKind::Reveal, now + self.interval));
        }
    }

    pub fn cancel(&mut self, scheduler: &mut Scheduler) {
        if let Some(id) = self.task.take() { scheduler.cancel(id); }
    }

    pub fn advance(&mut self, id: TaskId, scheduler: &mut Scheduler, now: Instant) {
        if self.task != Some(id) { return; }
        self.task = None;
        let remaining = &self.target[self.shown..];
        self.shown = remaining.char_indices().nth(1).map(|(i, _)| self.shown + i).unwrap_or(self.target.len());
        if self.shown < self.target.len() {
            self.task = Some(scheduler.schedule(TaskKind::Reveal, now + self.interval));
        }
    }

    pub fn visible(&self) -> &str { &self.target[..self.shown] }

    #[cfg(test)]
    pub fn target(&self) -> &str { &self.target }

    pub fn is_revealing(&self) -> bool { self.shown < self.target.len() }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_to_end(tw: &mut Typewriter, s: &mut Scheduler, mut now: Instant) -> Vec<String> {
        let mut frames = Vec::new();
        for _ in 0..1000 {
            now += Duration::from_millis(10);
            for (id, kind) in s.take_due(now) {
                if kind == TaskKind::Reveal { tw.advance(id, s, now); }
            }
            frames.push(tw.visible().to_string());
            if !tw.is_revealing() { break; }
        }
        frames
    }

    #[test]
    fn reveals_prefixes_until_complete() {
        let now = Instant::now();
        let mut s = Scheduler::new();
        let mut tw = Typewriter::new(Duration::from_millis(10));
        tw.reveal("Hey", &mut s, now);
        assert_eq!(tw.visible(), "");
        assert!(tw.is_revealing());

        let frames = run_to_end(&mut tw, &mut s, now);
        assert_eq!(frames, vec!["H", "He", "Hey"]);
        assert_eq!(s.pending_count(TaskKind::Reveal), 0);
    }

    #[test]
    fn second_reveal_supersedes_the_first() {
        let now = Instant::now();
        let mut s = Scheduler::new();
        let mut tw = Typewriter::new(Duration::from_millis(10));
        tw.reveal("Hello", &mut s, now);
        tw.reveal("Hello", &mut s, now + Duration::from_millis(1));
        assert_eq!(s.pending_count(TaskKind::Reveal), 1);

        let frames = run_to_end(&mut tw, &mut s, now);
        assert_eq!(frames.last().map(String::as_str), Some("Hello"));
        for pair in frames.windows(2) {
            assert!(pair[1].starts_with(pair[0].as_str()), "{:?} then {:?}", pair[0], pair[1]);
        }
    }

    #[test]
    fn restart_mid_reveal_starts_new_text_from_scratch() {
        let now = Instant::now();
        let mut s = Scheduler::new();
        let mut tw = Typewriter::new(Duration::from_millis(10));
        tw.reveal("first line", &mut s, now);
        let later = now + Duration::from_millis(35);
        for (id, _) in s.take_due(later) { tw.advance(id, &mut s, later); }
        assert!(!tw.visible().is_empty());

        tw.reveal("second", &mut s, later);
        assert_eq!(tw.visible(), "");
        let frames = run_to_end(&mut tw, &mut s, later);
        assert_eq!(frames.last().map(String::as_str), Some("second"));
    }

    #[test]
    fn stale_task_ids_are_ignored() {
        let now = Instant::now();
        let mut s = Scheduler::new();
        let mut tw = Typewriter::new(Duration::from_millis(10));
        tw.reveal("abc", &mut s, now);
        let stale = s.take_due(now + Duration::from_millis(10))[0].0;
        tw.reveal("xyz", &mut s, now + Duration::from_millis(10));
        tw.advance(stale, &mut s, now + Duration::from_millis(10));
        assert_eq!(tw.visible(), "");
    }

    #[test]
    fn multibyte_text_advances_on_char_boundaries() {
        let now = Instant::now();
        let mut s = Scheduler::new();
        let mut tw = Typewriter::new(Duration::from_millis(10));
        tw.reveal("hé♥", &mut s, now);
        let frames = run_to_end(&mut tw, &mut s, now);
        assert_eq!(frames, vec!["h", "hé", "hé♥"]);
    }

    #[test]
    fn empty_text_schedules_nothing() {
        let now = Instant::now();
        let mut s = Scheduler::new();
        let mut tw = Typewriter::new(Duration::from_millis(10));
        tw.reveal("", &mut s, now);
        assert!(!tw.is_revealing());
        assert_eq!(s.pending_count(TaskKind::Reveal), 0);
    }
}
