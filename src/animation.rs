// src/animation.rs
use crate::bfs::PathSearch;
use crate::config::AnimationConfig;
use crate::network::{SocialNetwork, UserId};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationPhase {
    Idle,
    /// Revealing BFS levels one interval at a time.
    Animating,
    /// Every level is revealed and nothing is waiting to fade.
    Complete,
    /// Explored nodes off the final path are fading out.
    Vanishing,
}

/// Drives the BFS reveal from externally supplied timestamps (seconds).
#[derive(Debug, Clone)]
pub struct AnimationScheduler {
    config: AnimationConfig,
    phase: AnimationPhase,
    levels: Vec<Vec<UserId>>,
    path: Vec<UserId>,
    step: usize,
    last_advance: f64,
    completed_at: Option<f64>,
    exploring: HashSet<UserId>,
    visited: HashSet<UserId>,
    vanishing: HashMap<UserId, f64>,
    stagger: HashMap<UserId, f64>,
}

impl AnimationScheduler {
    pub fn new(config: AnimationConfig) -> Self {
        Self {
            config,
            phase: AnimationPhase::Idle,
            levels: Vec::new(),
            path: Vec::new(),
            step: 0,
            last_advance: 0.0,
            completed_at: None,
            exploring: HashSet::new(),
            visited: HashSet::new(),
            vanishing: HashMap::new(),
            stagger: HashMap::new(),
        }
    }

    /// Drops any running session and begins revealing `search` from `now`.
    pub fn start(&mut self, search: &PathSearch, network: &SocialNetwork, now: f64) {
        self.clear();
        self.levels = search.levels.clone();
        self.path = search.path.clone();
        self.last_advance = now;
        self.phase = AnimationPhase::Animating;

        let origin = search
            .start()
            .and_then(|id| network.user(id))
            .map(|user| user.pos);
        if let Some(origin) = origin {
            let reach = self.config.stagger_distance.max(f64::EPSILON);
            for id in search.explored() {
                if let Some(user) = network.user(id) {
                    let distance = origin.distance(user.pos) as f64;
                    let offset = (distance / reach).min(1.0) * self.config.max_stagger;
                    self.stagger.insert(id, offset);
                }
            }
        }

        log::debug!(
            "animation started: {} levels, path of {}",
            self.levels.len(),
            self.path.len()
        );
    }

    pub fn clear(&mut self) {
        self.phase = AnimationPhase::Idle;
        self.levels.clear();
        self.path.clear();
        self.step = 0;
        self.last_advance = 0.0;
        self.completed_at = None;
        self.exploring.clear();
        self.visited.clear();
        self.vanishing.clear();
        self.stagger.clear();
    }

    pub fn tick(&mut self, now: f64) {
        match self.phase {
            AnimationPhase::Idle => {}
            AnimationPhase::Animating => self.advance(now),
            AnimationPhase::Complete | AnimationPhase::Vanishing => self.fade(now),
        }
    }

    fn advance(&mut self, now: f64) {
        if self.step < self.levels.len() {
            if now - self.last_advance <= self.config.step_interval {
                return;
            }
            for &id in &self.levels[self.step] {
                self.exploring.insert(id);
                self.visited.insert(id);
            }
            self.step += 1;
            self.last_advance = now;
        }

        if self.step >= self.levels.len() {
            self.complete(now);
        }
    }

    fn complete(&mut self, now: f64) {
        self.completed_at = Some(now);
        self.phase = AnimationPhase::Complete;

        if self.path.is_empty() {
            return;
        }

        let on_path: HashSet<UserId> = self.path.iter().copied().collect();
        let fade_from = now + self.config.vanish_delay;
        for &id in self.visited.iter().filter(|id| !on_path.contains(*id)) {
            let offset = self.stagger.get(&id).copied().unwrap_or(0.0);
            self.vanishing.insert(id, fade_from + offset);
        }

        if !self.vanishing.is_empty() {
            self.phase = AnimationPhase::Vanishing;
        }
        log::debug!(
            "animation complete at {:.2}s; {} nodes scheduled to vanish",
            now,
            self.vanishing.len()
        );
    }

    fn fade(&mut self, now: f64) {
        let duration = self.config.vanish_duration;
        let finished: Vec<UserId> = self
            .vanishing
            .iter()
            .filter(|&(_, &start)| now >= start + duration)
            .map(|(&id, _)| id)
            .collect();

        for id in finished {
            self.vanishing.remove(&id);
            self.visited.remove(&id);
            self.exploring.remove(&id);
        }

        if self.vanishing.is_empty() {
            self.phase = AnimationPhase::Idle;
            log::debug!("animation settled at {:.2}s", now);
        }
    }

    pub fn phase(&self) -> AnimationPhase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        self.phase != AnimationPhase::Idle
    }

    /// Index of the next level to reveal.
    pub fn level(&self) -> usize {
        self.step
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    pub fn progress(&self) -> f32 {
        if self.levels.is_empty() {
            return 0.0;
        }
        self.step as f32 / self.levels.len() as f32
    }

    pub fn path(&self) -> &[UserId] {
        &self.path
    }

    pub fn completed_at(&self) -> Option<f64> {
        self.completed_at
    }

    pub fn exploring(&self) -> &HashSet<UserId> {
        &self.exploring
    }

    pub fn visited(&self) -> &HashSet<UserId> {
        &self.visited
    }

    pub fn is_exploring(&self, id: UserId) -> bool {
        self.exploring.contains(&id)
    }

    pub fn is_visited(&self, id: UserId) -> bool {
        self.visited.contains(&id)
    }

    pub fn vanish_start(&self, id: UserId) -> Option<f64> {
        self.vanishing.get(&id).copied()
    }

    pub fn vanishing_count(&self) -> usize {
        self.vanishing.len()
    }

    /// Fade fraction in `[0, 1]` for a scheduled node; 0 until its fade begins.
    pub fn vanish_progress(&self, id: UserId, now: f64) -> Option<f32> {
        let start = self.vanish_start(id)?;
        let duration = self.config.vanish_duration;
        if duration <= 0.0 {
            return Some(if now >= start { 1.0 } else { 0.0 });
        }
        Some(((now - start) / duration).clamp(0.0, 1.0) as f32)
    }

    pub fn vanishing(&self, now: f64) -> Vec<(UserId, f32)> {
        self.vanishing
            .keys()
            .filter_map(|&id| self.vanish_progress(id, now).map(|p| (id, p)))
            .collect()
    }
}

impl Default for AnimationScheduler {
    fn default() -> Self {
        Self::new(AnimationConfig::default())
    }
}
