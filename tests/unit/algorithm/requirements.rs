//! Tests for path grouping, requirement assignment and entry flagging

#[cfg(test)]
mod tests {
    use unlockgen::algorithm::requirements::{
        GroupKind, PathGroup, Progression, RequirementAssigner, chain_cap, flag_entry_points,
        harmonize_entry_levels, tier_levels,
    };
    use unlockgen::io::configuration::{ItemChain, canonical_chains};
    use unlockgen::math::probability::RandomSelector;
    use unlockgen::spatial::grid::Grid;
    use unlockgen::spatial::tiles::{RequiredItem, Tile, TileExtractor, TileType};

    fn grid(rows: &[&[&str]]) -> Grid {
        let layout: Vec<Vec<String>> = rows
            .iter()
            .map(|row| row.iter().map(|token| (*token).to_string()).collect())
            .collect();
        Grid::from_tokens(&layout).expect("layout is valid")
    }

    fn single_path() -> Grid {
        grid(&[
            &["rock", "key", "rock"],
            &["path1", "path1", "rock"],
            &["rock", "path1", "bridge"],
            &["start", "start", "start"],
        ])
    }

    fn twin_paths() -> Grid {
        grid(&[
            &["path1", "key", "path2"],
            &["path1", "rock", "path2"],
            &["path1", "rock", "path2"],
            &["start", "start", "start"],
        ])
    }

    fn levelled(row: usize, col: usize, level: u8) -> Tile {
        Tile {
            row,
            col,
            tile_type: TileType::SemiLocked,
            unlocked: false,
            discovered: false,
            required_item: Some(RequiredItem::new(&ItemChain::new("Ember", "red", 8), level)),
            is_entry_point: false,
            generator: None,
        }
    }

    fn levels(tiles: &[Tile], group: &PathGroup) -> Vec<u8> {
        group
            .tiles
            .iter()
            .filter_map(|&i| tiles.get(i).and_then(Tile::level))
            .collect()
    }

    // Tests grouping by path tag with the bridge pool last, bottom tiles first
    // Verified by sorting tiles by ascending row
    #[test]
    fn test_progression_groups_and_order() {
        let board = single_path();
        let tiles = TileExtractor::extract_tiles(&board, &canonical_chains());
        let progression = Progression::from_grid(&board, &tiles);

        let groups = progression.groups();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups.first().map(|g| g.kind), Some(GroupKind::Path(1)));
        assert_eq!(groups.first().map(|g| g.tiles.clone()), Some(vec![7, 3, 4]));
        assert_eq!(groups.get(1).map(|g| g.kind), Some(GroupKind::Bridge));
        assert_eq!(progression.path_groups().count(), 1);
    }

    // Tests that allowed levels respect both neighbors in a group
    // Verified by ignoring the successor in allows
    #[test]
    fn test_allows_respects_neighbors() {
        let tiles = vec![levelled(1, 1, 3), levelled(1, 2, 4), levelled(1, 3, 5)];
        let mut progression = Progression::default();
        progression.push_group(PathGroup {
            kind: GroupKind::Path(1),
            tiles: vec![0, 1, 2],
        });

        assert!(progression.allows(&tiles, 1, 3));
        assert!(progression.allows(&tiles, 1, 5));
        assert!(!progression.allows(&tiles, 1, 2));
        assert!(!progression.allows(&tiles, 1, 6));
        assert!(!progression.allows(&tiles, 0, 5));
        assert!(progression.allows(&tiles, 2, 7));
    }

    // Tests the three difficulty tiers by position ratio
    // Verified by using < instead of <= at the tier limits
    #[test]
    fn test_tier_levels() {
        assert_eq!(tier_levels(0.0), (2, 3));
        assert_eq!(tier_levels(0.3), (2, 3));
        assert_eq!(tier_levels(0.5), (3, 5));
        assert_eq!(tier_levels(0.7), (3, 5));
        assert_eq!(tier_levels(1.0), (4, 7));
    }

    // Tests chain caps by name, by color and for unknown chains
    // Verified by using max_level instead of max_level - 1
    #[test]
    fn test_chain_cap() {
        let chains = canonical_chains();
        let tide = chains.get(1).expect("canonical chain");
        assert_eq!(chain_cap(&chains, &RequiredItem::new(tide, 4)), 7);

        let mut recolored = RequiredItem::new(tide, 4);
        recolored.chain = "Renamed".to_string();
        assert_eq!(chain_cap(&chains, &recolored), 7);

        let stranger = RequiredItem::new(&ItemChain::new("Stone", "grey", 5), 3);
        assert_eq!(chain_cap(&chains, &stranger), 3);
    }

    // Tests requirement coverage, level range and non-decreasing groups
    // Verified by dropping the max with the previous level
    #[test]
    fn test_assign_progressive_levels() {
        let chains = canonical_chains();
        for board in [single_path(), twin_paths()] {
            for seed in 0..20 {
                let mut tiles = TileExtractor::extract_tiles(&board, &chains);
                let progression = Progression::from_grid(&board, &tiles);
                let mut selector = RandomSelector::new(seed);
                RequirementAssigner::new(&chains).assign(&mut tiles, &progression, &mut selector);

                for group in progression.groups() {
                    let group_levels = levels(&tiles, group);
                    assert_eq!(group_levels.len(), group.tiles.len());
                    assert!(group_levels.iter().all(|l| (2..=7).contains(l)));
                    assert!(
                        group_levels.windows(2).all(|w| w.first() <= w.get(1)),
                        "seed {seed}: {group_levels:?}"
                    );
                }
                let semi_locked = tiles
                    .iter()
                    .filter(|t| t.tile_type == TileType::SemiLocked)
                    .count();
                assert_eq!(
                    semi_locked,
                    tiles.iter().filter(|t| t.required_item.is_some()).count()
                );
            }
        }
    }

    // Tests that short chains are never asked beyond their cap
    // Verified by skipping the chain fitting search
    #[test]
    fn test_assign_respects_short_chains() {
        let chains = vec![ItemChain::new("Tiny", "red", 4), ItemChain::new("Big", "blue", 8)];
        let board = twin_paths();
        for seed in 0..20 {
            let mut tiles = TileExtractor::extract_tiles(&board, &chains);
            let progression = Progression::from_grid(&board, &tiles);
            let mut selector = RandomSelector::new(seed);
            RequirementAssigner::new(&chains).assign(&mut tiles, &progression, &mut selector);

            for item in tiles.iter().filter_map(|t| t.required_item.as_ref()) {
                assert!(item.level >= 2);
                assert!(item.level <= chain_cap(&chains, item), "{item:?}");
            }
        }
    }

    // Tests the farthest tile wins, ties broken away from the centre column
    // Verified by preferring the tile nearer the centre column
    #[test]
    fn test_flag_entry_points_tie_break() {
        let board = single_path();
        let mut tiles = TileExtractor::extract_tiles(&board, &canonical_chains());
        let progression = Progression::from_grid(&board, &tiles);
        let key = board.key().expect("board has a key");

        let entries = flag_entry_points(&mut tiles, &progression, key, board.cols());
        assert_eq!(entries, vec![3]);
        assert!(tiles.get(3).is_some_and(|t| t.is_entry_point));
        assert_eq!(tiles.iter().filter(|t| t.is_entry_point).count(), 1);
    }

    // Tests that two groups never get entries in the same column
    // Verified by removing the column check
    #[test]
    fn test_flag_entry_points_distinct_columns() {
        let board = grid(&[
            &["rock", "key", "rock"],
            &["rock", "path1", "rock"],
            &["rock", "path2", "rock"],
            &["start", "start", "start"],
        ]);
        let mut tiles = TileExtractor::extract_tiles(&board, &canonical_chains());
        let progression = Progression::from_grid(&board, &tiles);
        let key = board.key().expect("board has a key");

        let entries = flag_entry_points(&mut tiles, &progression, key, board.cols());
        assert_eq!(entries, vec![4]);
        assert!(tiles.get(7).is_some_and(|t| !t.is_entry_point));
    }

    // Tests lowering entry levels to one above the easiest entry
    // Verified by raising the easiest entry instead
    #[test]
    fn test_harmonize_entry_levels() {
        let board = twin_paths();
        let mut tiles = TileExtractor::extract_tiles(&board, &canonical_chains());
        let progression = Progression::from_grid(&board, &tiles);
        let ember = ItemChain::new("Ember", "red", 8);
        for (index, level) in [(6, 2), (3, 3), (0, 4), (8, 6), (5, 6), (2, 7)] {
            if let Some(tile) = tiles.get_mut(index) {
                tile.lock_with(RequiredItem::new(&ember, level));
            }
        }

        harmonize_entry_levels(&mut tiles, &[6, 8], &progression);
        assert_eq!(tiles.get(6).and_then(Tile::level), Some(2));
        assert_eq!(tiles.get(8).and_then(Tile::level), Some(3));
    }

    // Tests that harmonization stops at the group predecessor's level
    // Verified by lowering without consulting the progression
    #[test]
    fn test_harmonize_keeps_group_order() {
        let mut tiles = vec![levelled(1, 1, 5), levelled(2, 1, 6), levelled(3, 3, 2)];
        let mut progression = Progression::default();
        progression.push_group(PathGroup {
            kind: GroupKind::Path(1),
            tiles: vec![0, 1],
        });

        harmonize_entry_levels(&mut tiles, &[2, 1], &progression);
        assert_eq!(tiles.get(1).and_then(Tile::level), Some(5));
        assert_eq!(tiles.get(2).and_then(Tile::level), Some(2));
    }
}
