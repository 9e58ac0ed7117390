use std::time::{Duration, Instant};

use crate::assets::Pose;
use crate::chat;
use crate::config::Config;
use crate::dialogue::{DialogueSelector, PhraseTable};
use crate::mood::{MoodCategory, MoodClassifier};
use crate::probe::ForegroundProbe;
use crate::scheduler::{Scheduler, TaskId, TaskKind};
use crate::typewriter::Typewriter;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode { Autonomous, Reacting }

#[derive(Clone, Copy, Debug)]
pub struct Timings {
    pub poll_interval:   Duration,
    pub idle_timeout:    Duration,
    pub reveal_interval: Duration,
}
impl Timings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            poll_interval:   config.poll_interval(),
            idle_timeout:    config.idle_timeout(),
            reveal_interval: config.reveal_interval(),
        }
    }
}

#[derive(Debug)]
pub struct InteractionState {
    pub last_interaction: Instant,
    pub is_reacting:      bool,
    pub last_phrase:      Option<String>,
    pub reveal:           Typewriter,
    pub idle_reverted:    bool,
}

pub struct BehaviorLoop<P: ForegroundProbe> {
    probe:      P,
    classifier: MoodClassifier,
    selector:   DialogueSelector,
    scheduler:  Scheduler,
    timings:    Timings,
    state:      InteractionState,
    pose:       Pose,
    displayed:  Option<MoodCategory>,
}

impl<P: ForegroundProbe> BehaviorLoop<P> {
    pub fn new(probe: P, classifier: MoodClassifier, selector: DialogueSelector, timings: Timings, now: Instant) -> Self {
        Self {
            probe, classifier, selector,
            scheduler: Scheduler::new(),
            timings,
            state: InteractionState {
                last_interaction: now,
                is_reacting:      false,
                last_phrase:      None,
                reveal:           Typewriter::new(timings.reveal_interval),
                idle_reverted:    false,
            },
            pose: Pose::Idle,
            displayed: None,
        }
    }

    pub fn from_config(probe: P, config: &Config, now: Instant) -> Self {
        let classifier = MoodClassifier::new(config.distracted_keywords.as_slice(), config.coding_keywords.as_slice());
        let selector = DialogueSelector::new(PhraseTable::with_overrides(&config.phrases));
        Self::new(probe, classifier, selector, Timings::from_config(config), now)
    }

    pub fn start(&mut self, greeting: &str, now: Instant) {
        self.state.reveal.reveal(greeting, &mut self.scheduler, now);
        self.scheduler.schedule(TaskKind::Poll, now + self.timings.poll_interval);
    }

    pub fn pump(&mut self, now: Instant) {
        for (id, kind) in self.scheduler.take_due(now) {
            match kind {
                TaskKind::Poll => {
                    self.scheduler.schedule(TaskKind::Poll, now + self.timings.poll_interval);
                    self.tick(now);
                }
                TaskKind::Reveal => self.advance_reveal(id, now),
            }
        }
    }

    fn advance_reveal(&mut self, id: TaskId, now: Instant) {
        self.state.reveal.advance(id, &mut self.scheduler, now);
    }

    fn tick(&mut self, now: Instant) {
        let idle = now.saturating_duration_since(self.state.last_interaction);
        if idle > self.timings.idle_timeout && !self.state.idle_reverted {
            log::info!("no interaction for {}s, settling back to idle", idle.as_secs());
            self.state.idle_reverted = true;
            let was_reacting = std::mem::replace(&mut self.state.is_reacting, false);
            self.probe.refresh();
            if was_reacting || self.displayed != Some(MoodCategory::Idle) {
                self.show_mood(MoodCategory::Idle, now);
            }
            return;
        }
        if self.state.is_reacting { return; }

        let title = match self.probe.foreground_title() {
            Ok(title) => title,
            Err(e) => {
                log::debug!("foreground window query failed: {e:#}");
                None
            }
        };
        let category = self.classifier.classify(title.as_deref());
        if self.displayed != Some(category) {
            log::info!("mood {:?} -> {:?} ({:?})", self.displayed, category, title.as_deref().unwrap_or(""));
            self.show_mood(category, now);
        }
    }

    fn show_mood(&mut self, category: MoodCategory, now: Instant) {
        self.displayed = Some(category);
        self.pose = category.pose();
        let phrase = self.selector.select(category, &mut self.state.last_phrase);
        self.state.reveal.reveal(phrase, &mut self.scheduler, now);
    }

    fn note_interaction(&mut self, now: Instant) {
        self.state.last_interaction = now;
        self.state.idle_reverted = false;
    }

    // false when the line was blank and nothing changed
    pub fn submit_chat(&mut self, input: &str, now: Instant) -> bool {
        let Some(reply) = chat::respond(input) else { return false };
        self.note_interaction(now);
        self.state.is_reacting = true;
        self.pose = reply.pose;
        self.state.reveal.reveal(reply.text, &mut self.scheduler, now);
        true
    }

    pub fn note_drag_start(&mut self, now: Instant) {
        self.note_interaction(now);
    }

    pub fn force_pose(&mut self, pose: Pose, now: Instant) {
        self.note_interaction(now);
        self.state.is_reacting = true;
        self.show_mood(MoodCategory::for_pose(pose), now);
    }

    pub fn mode(&self) -> Mode {
        if self.state.is_reacting { Mode::Reacting } else { Mode::Autonomous }
    }

    pub fn pose(&self) -> Pose { self.pose }
    pub fn displayed_mood(&self) -> Option<MoodCategory> { self.displayed }
    pub fn visible_text(&self) -> &str { self.state.reveal.visible() }
    pub fn is_revealing(&self) -> bool { self.state.reveal.is_revealing() }
    #[cfg(test)]
    pub fn state(&self) -> &InteractionState { &self.state }
    pub fn next_deadline(&self) -> Option<Instant> { self.scheduler.next_deadline() }
    #[cfg(test)]
    pub fn probe_mut(&mut self) -> &mut P { &mut self.probe }
}
