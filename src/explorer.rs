// src/explorer.rs
use crate::animation::{AnimationPhase, AnimationScheduler};
use crate::bfs::{PathSearch, find_shortest_path};
use crate::config::{AnimationConfig, AppConfig, NetworkConfig};
use crate::error::ExplorerError;
use crate::network::{SocialNetwork, User, UserId};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;

/// One interactive session: the network, the user's selection and the
/// animation of the current search.
pub struct Explorer {
    network_config: NetworkConfig,
    network: SocialNetwork,
    scheduler: AnimationScheduler,
    start: Option<UserId>,
    target: Option<UserId>,
    search: Option<PathSearch>,
    now: f64,
    rng: StdRng,
}

impl Explorer {
    pub fn new(config: &AppConfig) -> Self {
        let mut rng = match config.network.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let network = SocialNetwork::generate(&config.network, &mut rng);
        Self {
            network_config: config.network.clone(),
            network,
            scheduler: AnimationScheduler::new(config.animation.clone()),
            start: None,
            target: None,
            search: None,
            now: 0.0,
            rng,
        }
    }

    pub fn with_network(network: SocialNetwork, animation: AnimationConfig) -> Self {
        Self {
            network_config: NetworkConfig::default().with_node_count(network.len()),
            network,
            scheduler: AnimationScheduler::new(animation),
            start: None,
            target: None,
            search: None,
            now: 0.0,
            rng: StdRng::from_os_rng(),
        }
    }

    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    fn check(&self, id: UserId) -> Result<(), ExplorerError> {
        if self.network.contains(id) {
            Ok(())
        } else {
            Err(ExplorerError::UnknownUser(id))
        }
    }

    /// Makes `id` the start user, discarding the target and any running search.
    pub fn select_start(&mut self, id: UserId) -> Result<(), ExplorerError> {
        self.check(id)?;
        self.clear_session();
        self.start = Some(id);
        if let Some(user) = self.network.user(id) {
            log::info!("selected start user: {} ({})", user.name, id);
        }
        Ok(())
    }

    /// Runs the search towards `id`. Returns false without doing anything when
    /// no start is selected or `id` is the start itself.
    pub fn select_target(&mut self, id: UserId) -> Result<bool, ExplorerError> {
        self.check(id)?;
        let start = match self.start {
            Some(start) if start != id => start,
            _ => return Ok(false),
        };

        let search = find_shortest_path(&self.network, start, id)?;
        self.scheduler.start(&search, &self.network, self.now);
        match search.degrees_of_separation() {
            Some(degrees) => log::info!(
                "path found {} -> {}: {} degrees of separation",
                start,
                id,
                degrees
            ),
            None => log::info!("no path found between {} and {}", start, id),
        }
        self.target = Some(id);
        self.search = Some(search);
        Ok(true)
    }

    /// Mouse flow: the first click picks the start, later clicks pick a target.
    pub fn click(&mut self, id: UserId) -> Result<(), ExplorerError> {
        match self.start {
            None => self.select_start(id),
            Some(_) => self.select_target(id).map(|_| ()),
        }
    }

    pub fn reset(&mut self) {
        self.clear_session();
        self.start = None;
        log::info!("selection reset");
    }

    fn clear_session(&mut self) {
        self.target = None;
        self.search = None;
        self.scheduler.clear();
    }

    pub fn regenerate(&mut self, node_count: usize) {
        self.reset();
        self.network_config.node_count = node_count;
        self.network = SocialNetwork::generate(&self.network_config, &mut self.rng);
        log::info!("new network generated with {} users", self.network.len());
    }

    /// Picks a random start and a different random target and searches between them.
    pub fn random_demo(&mut self) -> Option<(UserId, UserId)> {
        if self.network.len() < 2 {
            return None;
        }
        let start = self.rng.random_range(0..self.network.len());
        let others: Vec<UserId> = (0..self.network.len()).filter(|&id| id != start).collect();
        let target = *others.choose(&mut self.rng)?;

        self.select_start(start).ok()?;
        self.select_target(target).ok()?;
        if let (Some(from), Some(to)) = (self.network.user(start), self.network.user(target)) {
            log::info!("random demo: {} -> {}", from.name, to.name);
        }
        Some((start, target))
    }

    pub fn tick(&mut self, now: f64) {
        self.now = now;
        self.scheduler.tick(now);
    }

    pub fn network(&self) -> &SocialNetwork {
        &self.network
    }

    pub fn network_config(&self) -> &NetworkConfig {
        &self.network_config
    }

    pub fn scheduler(&self) -> &AnimationScheduler {
        &self.scheduler
    }

    pub fn user_at(&self, pos: egui::Pos2) -> Option<UserId> {
        self.network.user_at(pos)
    }

    pub fn start(&self) -> Option<UserId> {
        self.start
    }

    pub fn target(&self) -> Option<UserId> {
        self.target
    }

    pub fn start_user(&self) -> Option<&User> {
        self.start.and_then(|id| self.network.user(id))
    }

    pub fn target_user(&self) -> Option<&User> {
        self.target.and_then(|id| self.network.user(id))
    }

    pub fn search(&self) -> Option<&PathSearch> {
        self.search.as_ref()
    }

    pub fn phase(&self) -> AnimationPhase {
        self.scheduler.phase()
    }

    pub fn is_animating(&self) -> bool {
        self.scheduler.is_active()
    }

    pub fn level(&self) -> usize {
        self.scheduler.level()
    }

    pub fn level_count(&self) -> usize {
        self.scheduler.level_count()
    }

    pub fn exploring(&self) -> &HashSet<UserId> {
        self.scheduler.exploring()
    }

    pub fn visited(&self) -> &HashSet<UserId> {
        self.scheduler.visited()
    }

    pub fn vanishing(&self) -> Vec<(UserId, f32)> {
        self.scheduler.vanishing(self.now)
    }

    pub fn vanish_progress(&self, id: UserId) -> Option<f32> {
        self.scheduler.vanish_progress(id, self.now)
    }

    pub fn path(&self) -> &[UserId] {
        self.search
            .as_ref()
            .map(|search| search.path.as_slice())
            .unwrap_or(&[])
    }

    pub fn path_found(&self) -> bool {
        self.search.as_ref().is_some_and(PathSearch::found)
    }

    pub fn degrees_of_separation(&self) -> Option<usize> {
        self.search.as_ref()?.degrees_of_separation()
    }

    /// Degrees of separation, or -1 when the last search found no path or none ran.
    pub fn degrees_or_sentinel(&self) -> i64 {
        self.search
            .as_ref()
            .map_or(-1, PathSearch::degrees_or_sentinel)
    }

    /// Whether `id` should be painted as explored: throughout the animation,
    /// and for good after a search that found no path.
    pub fn shows_as_visited(&self, id: UserId) -> bool {
        self.visited().contains(&id) && (self.is_animating() || !self.path_found())
    }

    pub fn on_path(&self, id: UserId) -> bool {
        self.path().contains(&id)
    }

    /// Whether `a` and `b` are consecutive on the current path.
    pub fn is_path_edge(&self, a: UserId, b: UserId) -> bool {
        self.path()
            .windows(2)
            .any(|pair| (pair[0] == a && pair[1] == b) || (pair[0] == b && pair[1] == a))
    }
}
