// src/network.rs
use crate::config::NetworkConfig;
use crate::error::ExplorerError;
use chrono::{DateTime, Local};
use egui::Pos2;
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use std::ops::RangeInclusive;

pub type UserId = usize;

/// Extra pixels around a user's circle that still count as a hit.
pub const HIT_SLOP: f32 = 5.0;
pub const DEFAULT_RADIUS: f32 = 10.0;

const NAMES: &[&str] = &[
    "Aarav", "Vivaan", "Aditya", "Vihaan", "Arjun", "Reyansh", "Muhammad", "Sai", "Krishna",
    "Atharv", "Ishaan", "Shaurya", "Dhruv", "Aryan", "Yuvraj", "Harsh", "Dev", "Arnav",
    "Shivansh", "Kartik", "Ananya", "Fatima", "Aadhya", "Diya", "Saanvi", "Myra", "Sara",
    "Aanya", "Pari", "Kavya", "Priya", "Shreya", "Kiara", "Arya", "Riya", "Tara", "Zara", "Avni",
    "Ira", "Mahira", "Rohan", "Ayaan", "Karan", "Kabir", "Om", "Ritik", "Tanishq", "Rudra",
    "Riaan", "Arman", "Nisha", "Meera", "Rahul", "Vikram", "Amit", "Suresh", "Rajesh", "Neha",
    "Pooja", "Sunita", "Aditi", "Sita", "Geeta", "Maya", "Kiran", "Ravi", "Ajay", "Vijay",
    "Sanjay", "Deepak", "Kavita", "Mala", "Lata", "Rekha", "Shanti", "Gouri", "Kamala", "Radha",
    "Lakshmi", "Durga", "Ganesh", "Bharath", "Ashwin", "Varun", "Surya", "Chandra", "Indra",
    "Anjali", "Divya", "Sonal", "Preeti", "Vandana", "Monika", "Rashmi", "Swati", "Pallavi",
    "Madhuri", "Akash", "Nikhil", "Tarun", "Manish", "Sachin", "Rohit", "Abhishek", "Vishal",
    "Sandeep", "Manoj", "Sneha", "Manisha", "Shweta", "Jyoti", "Smita", "Renu", "Deepika",
    "Karishma", "Sapna", "Nidhi", "Raman", "Prakash", "Mahesh", "Dinesh", "Naresh", "Mukesh",
    "Ramesh", "Yogesh", "Sunil", "Sonia", "Meena", "Usha", "Poonam", "Neeta", "Seema", "Rita",
    "Anita", "Gaurav", "Sourav", "Ashish", "Nitish", "Harish", "Girish", "Jagdish", "Umesh",
    "Lokesh", "Rakesh", "Kavitha", "Sangita", "Sunitha", "Mamta", "Pushpa", "Sharda", "Leela",
    "Veena", "Geetha",
];

#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub pos: Pos2,
    pub radius: f32,
    /// Density band assigned by the generator; None for hand-built networks.
    pub tier: Option<Tier>,
}

impl User {
    pub fn new(id: UserId, name: impl Into<String>, pos: Pos2) -> Self {
        Self {
            id,
            name: name.into(),
            pos,
            radius: DEFAULT_RADIUS,
            tier: None,
        }
    }

    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius = radius;
        self
    }

    pub fn with_tier(mut self, tier: Tier) -> Self {
        self.tier = Some(tier);
        self
    }

    pub fn distance_to(&self, pos: Pos2) -> f32 {
        self.pos.distance(pos)
    }
}

/// Connection density band a user is wired with, picked from its grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    Dense,
    Medium,
    Sparse,
    Isolated,
}

impl Tier {
    pub const ALL: [Tier; 4] = [Tier::Dense, Tier::Medium, Tier::Sparse, Tier::Isolated];

    fn of_cell(row: usize, col: usize, rows: usize, cols: usize) -> Self {
        let (row, col) = (row as f32, col as f32);
        let (rows, cols) = (rows as f32, cols as f32);
        if row < rows * 0.3 && col < cols * 0.3 {
            Tier::Dense
        } else if row < rows * 0.6 && col < cols * 0.6 {
            Tier::Medium
        } else if row < rows * 0.8 && col < cols * 0.8 {
            Tier::Sparse
        } else {
            Tier::Isolated
        }
    }

    /// How many nearest users a member of this tier links to.
    pub fn nearest_links(self) -> RangeInclusive<usize> {
        match self {
            Tier::Dense => 8..=15,
            Tier::Medium => 5..=10,
            Tier::Sparse => 3..=6,
            Tier::Isolated => 1..=4,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

const MAX_NEAREST: usize = 15;

// (from, to, probability); one attempt per ten members of the smaller tier.
const BRIDGES: [(Tier, Tier, f64); 5] = [
    (Tier::Dense, Tier::Medium, 0.7),
    (Tier::Medium, Tier::Sparse, 0.5),
    (Tier::Sparse, Tier::Isolated, 0.3),
    (Tier::Dense, Tier::Sparse, 0.2),
    (Tier::Medium, Tier::Isolated, 0.1),
];

pub struct SocialNetwork {
    graph: UnGraph<User, ()>,
    generated_at: DateTime<Local>,
}

impl Default for SocialNetwork {
    fn default() -> Self {
        Self::new()
    }
}

impl SocialNetwork {
    pub fn new() -> Self {
        Self {
            graph: UnGraph::new_undirected(),
            generated_at: Local::now(),
        }
    }

    /// Builds a network from explicit users (ids are assigned in order) and edges.
    pub fn from_parts(
        users: impl IntoIterator<Item = User>,
        edges: &[(UserId, UserId)],
    ) -> Result<Self, ExplorerError> {
        let mut network = Self::new();
        for user in users {
            network.add_user(user);
        }
        for &(a, b) in edges {
            for id in [a, b] {
                if !network.contains(id) {
                    return Err(ExplorerError::UnknownUser(id));
                }
            }
            network.add_connection(a, b);
        }
        Ok(network)
    }

    /// Uses `config.seed` when present so the same config yields the same network.
    pub fn generate_seeded(config: &NetworkConfig) -> Self {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self::generate(config, &mut rng)
    }

    pub fn generate<R: Rng + ?Sized>(config: &NetworkConfig, rng: &mut R) -> Self {
        let mut network = Self::new();
        let count = config.node_count;
        if count == 0 {
            return network;
        }

        let cols = (count as f32).sqrt() as usize + 2;
        let rows = count.div_ceil(cols);
        let usable_width = (config.width - 2.0 * config.margin).max(1.0);
        let usable_height = (config.height - 2.0 * config.margin).max(1.0);
        let cell_width = usable_width / cols as f32;
        let cell_height = usable_height / rows as f32;
        let inset = config.margin * 0.8;

        let mut tiers: [Vec<UserId>; 4] = Default::default();

        'grid: for row in 0..rows {
            for col in 0..cols {
                let id = network.len();
                if id >= count {
                    break 'grid;
                }

                let base_x = config.margin + col as f32 * cell_width + cell_width / 2.0;
                let base_y = config.margin + row as f32 * cell_height + cell_height / 2.0;
                let dx = cell_width * config.jitter;
                let dy = cell_height * config.jitter;
                let x = base_x + jitter(rng, dx);
                let y = base_y + jitter(rng, dy);
                let pos = Pos2::new(
                    x.clamp(inset, (config.width - inset).max(inset)),
                    y.clamp(inset, (config.height - inset).max(inset)),
                );

                let name = match NAMES.get(id) {
                    Some(name) => name.to_string(),
                    None => {
                        let base = NAMES.choose(rng).copied().unwrap_or("User");
                        format!("{}{}", base, id - NAMES.len() + 1)
                    }
                };
                let radius = rng.random_range(8..=12) as f32;

                let tier = Tier::of_cell(row, col, rows, cols);

                network.add_user(User::new(id, name, pos).with_radius(radius).with_tier(tier));
                tiers[tier.index()].push(id);
            }
        }

        network.wire_tiers(&tiers, rng);
        network.add_bridges(&tiers, rng);

        log::info!(
            "generated network: {} users, {} connections (dense {}, medium {}, sparse {}, isolated {})",
            network.len(),
            network.connection_count(),
            tiers[0].len(),
            tiers[1].len(),
            tiers[2].len(),
            tiers[3].len(),
        );
        network
    }

    fn wire_tiers<R: Rng + ?Sized>(&mut self, tiers: &[Vec<UserId>; 4], rng: &mut R) {
        let nearest = self.nearest_rankings(MAX_NEAREST);

        for tier in Tier::ALL {
            for &id in &tiers[tier.index()] {
                let k = rng.random_range(tier.nearest_links());
                for &other in nearest[id].iter().take(k) {
                    self.add_connection(id, other);
                }

                match tier {
                    Tier::Dense => {
                        for _ in 0..rng.random_range(3..=6) {
                            if let Some(&other) = tiers[Tier::Dense.index()].choose(rng) {
                                self.add_connection(id, other);
                            }
                        }
                    }
                    Tier::Medium => self.maybe_link(id, &tiers[Tier::Dense.index()], 0.6, rng),
                    Tier::Sparse => self.maybe_link(id, &tiers[Tier::Medium.index()], 0.4, rng),
                    Tier::Isolated => self.maybe_link(id, &tiers[Tier::Sparse.index()], 0.3, rng),
                }
            }
        }
    }

    fn maybe_link<R: Rng + ?Sized>(
        &mut self,
        id: UserId,
        pool: &[UserId],
        probability: f64,
        rng: &mut R,
    ) {
        if rng.random_bool(probability) {
            if let Some(&other) = pool.choose(rng) {
                self.add_connection(id, other);
            }
        }
    }

    fn add_bridges<R: Rng + ?Sized>(&mut self, tiers: &[Vec<UserId>; 4], rng: &mut R) {
        for (from, to, probability) in BRIDGES {
            let (from, to) = (&tiers[from.index()], &tiers[to.index()]);
            if from.is_empty() || to.is_empty() {
                continue;
            }
            let attempts = (from.len().min(to.len()) / 10).max(1);
            for _ in 0..attempts {
                if rng.random_bool(probability) {
                    if let (Some(&a), Some(&b)) = (from.choose(rng), to.choose(rng)) {
                        self.add_connection(a, b);
                    }
                }
            }
        }
    }

    /// For every user, the ids of the `limit` closest other users, nearest first.
    fn nearest_rankings(&self, limit: usize) -> Vec<Vec<UserId>> {
        let positions: Vec<Pos2> = self.users().map(|user| user.pos).collect();
        (0..positions.len())
            .into_par_iter()
            .map(|id| {
                let origin = positions[id];
                let mut ranked: Vec<(f32, UserId)> = positions
                    .iter()
                    .enumerate()
                    .filter(|&(other, _)| other != id)
                    .map(|(other, pos)| (origin.distance(*pos), other))
                    .collect();
                ranked.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
                ranked.truncate(limit);
                ranked.into_iter().map(|(_, other)| other).collect()
            })
            .collect()
    }

    fn add_user(&mut self, mut user: User) -> UserId {
        user.id = self.graph.node_count();
        self.graph.add_node(user).index()
    }

    /// Links two users. Self links and duplicates are ignored; returns whether an edge was added.
    pub fn add_connection(&mut self, a: UserId, b: UserId) -> bool {
        if a == b || !self.contains(a) || !self.contains(b) || self.are_connected(a, b) {
            return false;
        }
        self.graph.add_edge(NodeIndex::new(a), NodeIndex::new(b), ());
        true
    }

    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn contains(&self, id: UserId) -> bool {
        id < self.graph.node_count()
    }

    pub fn user(&self, id: UserId) -> Option<&User> {
        self.graph.node_weight(NodeIndex::new(id))
    }

    pub fn users(&self) -> impl Iterator<Item = &User> + '_ {
        self.graph.node_weights()
    }

    pub fn neighbors(&self, id: UserId) -> impl Iterator<Item = UserId> + '_ {
        self.graph.neighbors(NodeIndex::new(id)).map(|n| n.index())
    }

    pub fn degree(&self, id: UserId) -> usize {
        self.neighbors(id).count()
    }

    pub fn are_connected(&self, a: UserId, b: UserId) -> bool {
        self.graph
            .find_edge(NodeIndex::new(a), NodeIndex::new(b))
            .is_some()
    }

    pub fn edges(&self) -> impl Iterator<Item = (UserId, UserId)> + '_ {
        self.graph
            .edge_references()
            .map(|e| (e.source().index(), e.target().index()))
    }

    pub fn connection_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn average_connections(&self) -> f32 {
        if self.is_empty() {
            return 0.0;
        }
        (2 * self.connection_count()) as f32 / self.len() as f32
    }

    /// Closest user whose circle (plus a small slop) contains `pos`.
    pub fn user_at(&self, pos: Pos2) -> Option<UserId> {
        self.users()
            .map(|user| (user.distance_to(pos), user))
            .filter(|(distance, user)| *distance <= user.radius + HIT_SLOP)
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, user)| user.id)
    }

    pub fn generated_at(&self) -> DateTime<Local> {
        self.generated_at
    }
}

fn jitter<R: Rng + ?Sized>(rng: &mut R, amount: f32) -> f32 {
    if amount > 0.0 {
        rng.random_range(-amount..=amount)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(count: usize) -> NetworkConfig {
        NetworkConfig::default().with_node_count(count).with_seed(42)
    }

    #[test]
    fn generates_requested_number_of_users() {
        for count in [0, 1, 2, 17, 300] {
            let network = SocialNetwork::generate_seeded(&config(count));
            assert_eq!(network.len(), count);
            for (expected, user) in network.users().enumerate() {
                assert_eq!(user.id, expected);
            }
        }
    }

    #[test]
    fn single_user_has_no_connections() {
        let network = SocialNetwork::generate_seeded(&config(1));
        assert_eq!(network.connection_count(), 0);
        assert_eq!(network.average_connections(), 0.0);
    }

    #[test]
    fn adjacency_is_symmetric_without_loops_or_duplicates() {
        let network = SocialNetwork::generate_seeded(&config(200));
        let mut seen = std::collections::HashSet::new();
        for (a, b) in network.edges() {
            assert_ne!(a, b);
            assert!(seen.insert((a.min(b), a.max(b))), "duplicate edge {a}-{b}");
            assert!(network.neighbors(a).any(|n| n == b));
            assert!(network.neighbors(b).any(|n| n == a));
        }
    }

    #[test]
    fn every_user_has_at_least_one_connection() {
        let network = SocialNetwork::generate_seeded(&config(120));
        for user in network.users() {
            assert!(network.degree(user.id) >= 1, "user {} is unlinked", user.id);
        }
    }

    #[test]
    fn positions_stay_on_canvas() {
        let cfg = config(300);
        let network = SocialNetwork::generate_seeded(&cfg);
        let canvas = cfg.canvas();
        for user in network.users() {
            assert!(canvas.contains(user.pos), "{:?} off canvas", user.pos);
            assert!((8.0..=12.0).contains(&user.radius));
        }
    }

    #[test]
    fn same_seed_same_network() {
        let a = SocialNetwork::generate_seeded(&config(150));
        let b = SocialNetwork::generate_seeded(&config(150));
        assert_eq!(a.edges().collect::<Vec<_>>(), b.edges().collect::<Vec<_>>());
        let names_a: Vec<_> = a.users().map(|u| u.name.clone()).collect();
        let names_b: Vec<_> = b.users().map(|u| u.name.clone()).collect();
        assert_eq!(names_a, names_b);
    }

    #[test]
    fn names_beyond_list_get_a_counter() {
        let network = SocialNetwork::generate_seeded(&config(NAMES.len() + 3));
        assert_eq!(network.user(0).unwrap().name, NAMES[0]);
        let last = network.user(NAMES.len() + 2).unwrap();
        assert!(last.name.ends_with('3'), "{}", last.name);
    }

    #[test]
    fn tiers_follow_grid_bands() {
        let tier = |row, col| Tier::of_cell(row, col, 10, 10);
        assert_eq!(tier(0, 0), Tier::Dense);
        assert_eq!(tier(2, 2), Tier::Dense);
        assert_eq!(tier(2, 4), Tier::Medium);
        assert_eq!(tier(4, 4), Tier::Medium);
        assert_eq!(tier(5, 5), Tier::Medium);
        assert_eq!(tier(5, 7), Tier::Sparse);
        assert_eq!(tier(7, 7), Tier::Sparse);
        assert_eq!(tier(7, 9), Tier::Isolated);
        assert_eq!(tier(9, 9), Tier::Isolated);
        assert_eq!(tier(0, 9), Tier::Isolated);
        assert_eq!(tier(9, 0), Tier::Isolated);
    }

    #[test]
    fn generated_users_carry_their_tier() {
        let network = SocialNetwork::generate_seeded(&config(300));
        assert!(network.users().all(|user| user.tier.is_some()));
        // cols = 19, rows = 16; the first cell is dense and the last row is isolated
        assert_eq!(network.user(0).unwrap().tier, Some(Tier::Dense));
        assert_eq!(network.user(299).unwrap().tier, Some(Tier::Isolated));
        for tier in Tier::ALL {
            assert!(
                network.users().any(|user| user.tier == Some(tier)),
                "no {tier:?} users"
            );
        }
    }

    #[test]
    fn dense_users_get_at_least_their_minimum_links() {
        for seed in [1, 7, 42, 1234] {
            let cfg = NetworkConfig::default().with_node_count(300).with_seed(seed);
            let network = SocialNetwork::generate_seeded(&cfg);
            let min_dense = *Tier::Dense.nearest_links().start();
            for user in network.users() {
                let degree = network.degree(user.id);
                assert!(degree >= 1, "seed {seed}: user {} is unlinked", user.id);
                if user.tier == Some(Tier::Dense) {
                    assert!(
                        degree >= min_dense,
                        "seed {seed}: dense user {} has degree {degree}",
                        user.id
                    );
                }
            }
        }
    }

    #[test]
    fn dense_users_are_better_connected_than_isolated_ones() {
        let network = SocialNetwork::generate_seeded(&config(300));
        let average = |tier: Tier| {
            let degrees: Vec<usize> = network
                .users()
                .filter(|user| user.tier == Some(tier))
                .map(|user| network.degree(user.id))
                .collect();
            degrees.iter().sum::<usize>() as f32 / degrees.len() as f32
        };
        assert!(average(Tier::Dense) > average(Tier::Isolated));
    }

    #[test]
    fn tiers_are_bridged() {
        let network = SocialNetwork::generate_seeded(&config(300));
        let tier_of = |id: UserId| network.user(id).and_then(|user| user.tier);
        let crosses = |a: Tier, b: Tier| {
            network.edges().any(|(x, y)| {
                let (tx, ty) = (tier_of(x), tier_of(y));
                (tx == Some(a) && ty == Some(b)) || (tx == Some(b) && ty == Some(a))
            })
        };
        assert!(crosses(Tier::Dense, Tier::Medium));
        assert!(crosses(Tier::Medium, Tier::Sparse));
        assert!(crosses(Tier::Sparse, Tier::Isolated));
    }

    #[test]
    fn add_connection_ignores_loops_and_duplicates() {
        let users = (0..3).map(|i| User::new(i, format!("u{i}"), Pos2::new(i as f32, 0.0)));
        let mut network = SocialNetwork::from_parts(users, &[]).unwrap();
        assert!(network.add_connection(0, 1));
        assert!(!network.add_connection(1, 0));
        assert!(!network.add_connection(2, 2));
        assert!(!network.add_connection(0, 9));
        assert_eq!(network.connection_count(), 1);
    }

    #[test]
    fn from_parts_rejects_unknown_ids() {
        let users = (0..2).map(|i| User::new(i, "u", Pos2::ZERO));
        let err = SocialNetwork::from_parts(users, &[(0, 5)]).err();
        assert_eq!(err, Some(ExplorerError::UnknownUser(5)));
    }

    #[test]
    fn user_at_picks_closest_hit() {
        let users = vec![
            User::new(0, "a", Pos2::new(0.0, 0.0)),
            User::new(1, "b", Pos2::new(12.0, 0.0)),
        ];
        let network = SocialNetwork::from_parts(users, &[]).unwrap();
        assert_eq!(network.user_at(Pos2::new(2.0, 0.0)), Some(0));
        assert_eq!(network.user_at(Pos2::new(9.0, 0.0)), Some(1));
        assert_eq!(network.user_at(Pos2::new(0.0, 14.0)), Some(0));
        assert_eq!(network.user_at(Pos2::new(0.0, 16.0)), None);
    }
}
