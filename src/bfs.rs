// src/bfs.rs
use crate::error::ExplorerError;
use crate::network::{SocialNetwork, UserId};
use std::collections::{HashMap, HashSet};

/// Outcome of a shortest path search: the path (empty when unreachable) and
/// the BFS wavefront, one entry per depth, starting with `[start]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathSearch {
    pub path: Vec<UserId>,
    pub levels: Vec<Vec<UserId>>,
}

impl PathSearch {
    pub fn found(&self) -> bool {
        !self.path.is_empty()
    }

    pub fn degrees_of_separation(&self) -> Option<usize> {
        self.path.len().checked_sub(1)
    }

    /// Degrees of separation, or -1 when the target is unreachable.
    pub fn degrees_or_sentinel(&self) -> i64 {
        self.degrees_of_separation().map_or(-1, |d| d as i64)
    }

    pub fn start(&self) -> Option<UserId> {
        self.levels.first().and_then(|level| level.first()).copied()
    }

    pub fn explored(&self) -> impl Iterator<Item = UserId> + '_ {
        self.levels.iter().flatten().copied()
    }
}

/// Level-by-level BFS from `start`. Stops as soon as `target` is discovered;
/// the level it was found in ends with it and no further levels are built.
pub fn find_shortest_path(
    network: &SocialNetwork,
    start: UserId,
    target: UserId,
) -> Result<PathSearch, ExplorerError> {
    for id in [start, target] {
        if !network.contains(id) {
            return Err(ExplorerError::UnknownUser(id));
        }
    }

    if start == target {
        return Ok(PathSearch {
            path: vec![start],
            levels: vec![vec![start]],
        });
    }

    let mut visited = HashSet::from([start]);
    let mut parents: HashMap<UserId, UserId> = HashMap::new();
    let mut levels = vec![vec![start]];
    let mut frontier = vec![start];

    while !frontier.is_empty() {
        let mut level = Vec::new();

        for &current in &frontier {
            for neighbor in network.neighbors(current) {
                if !visited.insert(neighbor) {
                    continue;
                }
                parents.insert(neighbor, current);
                level.push(neighbor);

                if neighbor == target {
                    levels.push(level);
                    let path = trace_back(&parents, start, target);
                    log::debug!(
                        "path {} -> {} found at depth {}",
                        start,
                        target,
                        path.len() - 1
                    );
                    return Ok(PathSearch { path, levels });
                }
            }
        }

        if !level.is_empty() {
            levels.push(level.clone());
        }
        frontier = level;
    }

    log::debug!(
        "no path {} -> {}; explored {} levels",
        start,
        target,
        levels.len()
    );
    Ok(PathSearch {
        path: Vec::new(),
        levels,
    })
}

fn trace_back(parents: &HashMap<UserId, UserId>, start: UserId, target: UserId) -> Vec<UserId> {
    let mut path = vec![target];
    let mut current = target;
    while current != start {
        match parents.get(&current) {
            Some(&parent) => {
                path.push(parent);
                current = parent;
            }
            None => break,
        }
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::User;
    use egui::Pos2;

    fn chain_with_loner() -> SocialNetwork {
        let users = (0..5).map(|i| User::new(i, format!("u{i}"), Pos2::new(i as f32 * 50.0, 0.0)));
        SocialNetwork::from_parts(users, &[(0, 1), (1, 2), (2, 3)]).unwrap()
    }

    #[test]
    fn chain_path_and_levels() {
        let network = chain_with_loner();
        let search = find_shortest_path(&network, 0, 3).unwrap();
        assert_eq!(search.path, vec![0, 1, 2, 3]);
        assert_eq!(search.levels, vec![vec![0], vec![1], vec![2], vec![3]]);
        assert_eq!(search.degrees_of_separation(), Some(3));
        assert_eq!(search.degrees_or_sentinel(), 3);
        assert!(search.found());
    }

    #[test]
    fn same_start_and_target() {
        let network = chain_with_loner();
        let search = find_shortest_path(&network, 0, 0).unwrap();
        assert_eq!(search.path, vec![0]);
        assert_eq!(search.levels, vec![vec![0]]);
        assert_eq!(search.degrees_of_separation(), Some(0));
    }

    #[test]
    fn unreachable_target_covers_component() {
        let network = chain_with_loner();
        let search = find_shortest_path(&network, 0, 4).unwrap();
        assert!(search.path.is_empty());
        assert!(!search.found());
        assert_eq!(search.degrees_of_separation(), None);
        assert_eq!(search.degrees_or_sentinel(), -1);
        let mut explored: Vec<_> = search.explored().collect();
        explored.sort_unstable();
        assert_eq!(explored, vec![0, 1, 2, 3]);
        assert_eq!(search.levels.len(), 4);
    }

    #[test]
    fn isolated_start_yields_single_level() {
        let network = chain_with_loner();
        let search = find_shortest_path(&network, 4, 0).unwrap();
        assert!(search.path.is_empty());
        assert_eq!(search.levels, vec![vec![4]]);
    }

    #[test]
    fn unknown_users_are_rejected() {
        let network = chain_with_loner();
        assert_eq!(
            find_shortest_path(&network, 9, 0),
            Err(ExplorerError::UnknownUser(9))
        );
        assert_eq!(
            find_shortest_path(&network, 0, 12),
            Err(ExplorerError::UnknownUser(12))
        );
        assert_eq!(
            find_shortest_path(&network, 7, 7),
            Err(ExplorerError::UnknownUser(7))
        );
    }

    #[test]
    fn stops_at_the_level_holding_the_target() {
        // 0 fans out to 1,2,3; 3 reaches 4; 4 reaches 5
        let users = (0..6).map(|i| User::new(i, "u", Pos2::ZERO));
        let network =
            SocialNetwork::from_parts(users, &[(0, 1), (0, 2), (0, 3), (3, 4), (4, 5)]).unwrap();
        let search = find_shortest_path(&network, 0, 4).unwrap();
        assert_eq!(search.path, vec![0, 3, 4]);
        assert_eq!(search.levels.len(), 3);
        assert_eq!(search.levels[2], vec![4]);
        assert!(!search.explored().any(|id| id == 5));
        assert_eq!(search.path.len(), search.levels.len());
    }

    #[test]
    fn diamond_picks_a_shortest_route() {
        let users = (0..4).map(|i| User::new(i, "u", Pos2::ZERO));
        let network =
            SocialNetwork::from_parts(users, &[(0, 1), (0, 2), (1, 3), (2, 3)]).unwrap();
        let search = find_shortest_path(&network, 0, 3).unwrap();
        assert_eq!(search.path.len(), 3);
        assert_eq!(search.path.first(), Some(&0));
        assert_eq!(search.path.last(), Some(&3));
        assert!(network.are_connected(search.path[0], search.path[1]));
        assert!(network.are_connected(search.path[1], search.path[2]));
    }
}
