use indigram::{
    AnimationConfig, AnimationPhase, AppConfig, Explorer, ExplorerError, SocialNetwork, User,
    find_shortest_path,
};

fn chain_with_loner() -> SocialNetwork {
    let users = (0..5).map(|i| User::new(i, format!("u{i}"), egui::pos2(100.0 * i as f32, 0.0)));
    SocialNetwork::from_parts(users, &[(0, 1), (1, 2), (2, 3)]).unwrap()
}

#[test]
fn chain_scenarios() {
    let network = chain_with_loner();

    let search = find_shortest_path(&network, 0, 3).unwrap();
    assert_eq!(search.path, vec![0, 1, 2, 3]);
    assert_eq!(search.levels, vec![vec![0], vec![1], vec![2], vec![3]]);
    assert_eq!(search.degrees_of_separation(), Some(3));

    let search = find_shortest_path(&network, 0, 0).unwrap();
    assert_eq!(search.path, vec![0]);
    assert_eq!(search.levels, vec![vec![0]]);

    let search = find_shortest_path(&network, 0, 4).unwrap();
    assert!(search.path.is_empty());
    let mut covered: Vec<_> = search.explored().collect();
    covered.sort_unstable();
    assert_eq!(covered, vec![0, 1, 2, 3]);
}

#[test]
fn full_session_with_synthetic_clock() {
    // 0-1-2-3 plus a side branch 1-4 that gets explored but is not on the path
    let users = (0..5).map(|i| User::new(i, format!("u{i}"), egui::pos2(100.0 * i as f32, 0.0)));
    let network = SocialNetwork::from_parts(users, &[(0, 1), (1, 2), (2, 3), (1, 4)]).unwrap();
    let mut explorer = Explorer::with_network(network, AnimationConfig::default());

    explorer.tick(0.0);
    explorer.click(0).unwrap();
    explorer.click(3).unwrap();
    assert_eq!(explorer.degrees_or_sentinel(), 3);
    assert_eq!(explorer.phase(), AnimationPhase::Animating);

    let mut now = 0.0;
    while explorer.phase() == AnimationPhase::Animating {
        now += 0.5;
        explorer.tick(now);
    }
    let completed = explorer.scheduler().completed_at().unwrap();
    assert_eq!(completed, now);
    assert_eq!(explorer.level(), explorer.level_count());

    // node 4 may or may not be discovered before 3 depending on neighbor order
    let explored_side_branch = explorer.visited().contains(&4);
    if explored_side_branch {
        assert_eq!(explorer.phase(), AnimationPhase::Vanishing);
        let fading = explorer.vanishing();
        assert_eq!(fading.len(), 1);
        assert_eq!(fading[0], (4, 0.0));
    }

    explorer.tick(completed + 10.0);
    explorer.tick(completed + 10.1);
    assert_eq!(explorer.phase(), AnimationPhase::Idle);
    assert!(!explorer.is_animating());
    assert!(!explorer.visited().contains(&4));
    for id in [0, 1, 2, 3] {
        assert!(explorer.visited().contains(&id));
    }
    // fading never touches the result
    assert_eq!(explorer.path(), &[0, 1, 2, 3]);
    assert_eq!(explorer.degrees_of_separation(), Some(3));
}

#[test]
fn retargeting_restarts_from_the_same_start() {
    let mut explorer = Explorer::with_network(chain_with_loner(), AnimationConfig::default());
    explorer.select_start(0).unwrap();
    assert!(explorer.select_target(3).unwrap());
    explorer.tick(1.0);
    assert!(explorer.select_target(2).unwrap());
    assert_eq!(explorer.start(), Some(0));
    assert_eq!(explorer.path(), &[0, 1, 2]);
    assert_eq!(explorer.level(), 0);
}

#[test]
fn invalid_ids_never_change_the_session() {
    let mut explorer = Explorer::with_network(chain_with_loner(), AnimationConfig::default());
    explorer.select_start(1).unwrap();
    explorer.select_target(3).unwrap();
    assert_eq!(explorer.click(99), Err(ExplorerError::UnknownUser(99)));
    assert_eq!(explorer.path(), &[1, 2, 3]);
    assert_eq!(
        ExplorerError::UnknownUser(99).to_string(),
        "user 99 does not exist in the network"
    );
}

#[test]
fn degenerate_networks_are_handled() {
    let mut config = AppConfig::default();
    config.network = config.network.with_node_count(0).with_seed(1);
    let mut explorer = Explorer::new(&config);
    assert!(explorer.network().is_empty());
    assert_eq!(explorer.random_demo(), None);
    assert_eq!(explorer.select_start(0), Err(ExplorerError::UnknownUser(0)));
    explorer.tick(1.0);

    config.network.node_count = 1;
    let mut explorer = Explorer::new(&config);
    assert_eq!(explorer.network().len(), 1);
    explorer.select_start(0).unwrap();
    assert_eq!(explorer.select_target(0), Ok(false));
    assert_eq!(explorer.random_demo(), None);
}
