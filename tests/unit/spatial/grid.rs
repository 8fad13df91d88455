//! Tests for the cell-type grid, token normalization and neighbor order

#[cfg(test)]
mod tests {
    use unlockgen::GeneratorError;
    use unlockgen::spatial::grid::{CellKind, Coord, Direction, Grid};

    fn layout(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|row| row.iter().map(|token| (*token).to_string()).collect())
            .collect()
    }

    // Tests alias and case normalization of layout tokens
    // Verified by removing the lowercase conversion in from_token
    #[test]
    fn test_from_tokens_normalizes_aliases() {
        let grid = Grid::from_tokens(&layout(&[&["K", "p1", "b"], &["s", ".", "X"]]))
            .expect("layout is valid");

        assert_eq!(grid.get(Coord::new(0, 0)), Some(CellKind::Key));
        assert_eq!(grid.get(Coord::new(0, 1)), Some(CellKind::Path(1)));
        assert_eq!(grid.get(Coord::new(0, 2)), Some(CellKind::Bridge));
        assert_eq!(grid.get(Coord::new(1, 0)), Some(CellKind::Start));
        assert_eq!(grid.get(Coord::new(1, 1)), Some(CellKind::Free));
        assert_eq!(grid.get(Coord::new(1, 2)), Some(CellKind::Rock));
    }

    // Tests the long token forms accepted next to the aliases
    // Verified by dropping the "goal" alias
    #[test]
    fn test_from_token_long_forms() {
        assert_eq!(CellKind::from_token("goal"), Some(CellKind::Key));
        assert_eq!(CellKind::from_token(" Path3 "), Some(CellKind::Path(3)));
        assert_eq!(CellKind::from_token("#"), Some(CellKind::Rock));
        assert_eq!(CellKind::from_token("lava"), None);
        assert_eq!(CellKind::from_token("pathx"), None);
    }

    // Tests that unknown tokens fall back to rock instead of failing
    // Verified by returning an error for unknown tokens
    #[test]
    fn test_unknown_token_becomes_rock() {
        let grid = Grid::from_tokens(&layout(&[&["key", "lava"]])).expect("layout is valid");
        assert_eq!(grid.get(Coord::new(0, 1)), Some(CellKind::Rock));
    }

    // Tests rejection of ragged, empty and key-less layouts
    // Verified by skipping the row length check
    #[test]
    fn test_malformed_layouts_are_errors() {
        let ragged = Grid::from_tokens(&layout(&[&["key", "rock"], &["start"]]));
        assert!(matches!(ragged, Err(GeneratorError::InvalidGrid { .. })));

        let empty = Grid::from_tokens(&[]);
        assert!(matches!(empty, Err(GeneratorError::InvalidGrid { .. })));

        let no_key = Grid::from_tokens(&layout(&[&["start", "rock"]]));
        assert!(matches!(no_key, Err(GeneratorError::InvalidGrid { .. })));

        let two_keys = Grid::from_tokens(&layout(&[&["key", "key"]]));
        assert!(matches!(two_keys, Err(GeneratorError::InvalidGrid { .. })));
    }

    // Tests that tokens written back parse into the same grid
    // Verified by emitting short aliases for path cells
    #[test]
    fn test_to_tokens_is_canonical() {
        let grid = Grid::from_tokens(&layout(&[&["k", "p2"], &["S", "b"]])).expect("layout is valid");
        let tokens = grid.to_tokens();

        assert_eq!(tokens, layout(&[&["key", "path2"], &["start", "bridge"]]));
        assert_eq!(Grid::from_tokens(&tokens).ok(), Some(grid));
    }

    // Tests the up, down, left, right neighbor order and edge clipping
    // Verified by reordering Direction::ALL
    #[test]
    fn test_neighbors_order_and_bounds() {
        let grid = Grid::new(3, 3);

        let centre: Vec<Coord> = grid.neighbors(Coord::new(1, 1)).collect();
        assert_eq!(
            centre,
            vec![
                Coord::new(0, 1),
                Coord::new(2, 1),
                Coord::new(1, 0),
                Coord::new(1, 2)
            ]
        );

        let corner: Vec<Coord> = grid.neighbors(Coord::new(0, 0)).collect();
        assert_eq!(corner, vec![Coord::new(1, 0), Coord::new(0, 1)]);

        assert_eq!(grid.step(Coord::new(2, 2), Direction::Down), None);
        assert_eq!(grid.step(Coord::new(2, 2), Direction::Right), None);
    }

    // Tests that writes outside the grid are refused
    // Verified by returning true unconditionally from set
    #[test]
    fn test_set_outside_grid() {
        let mut grid = Grid::new(2, 2);
        assert!(grid.set(Coord::new(1, 1), CellKind::Key));
        assert!(!grid.set(Coord::new(2, 0), CellKind::Key));
        assert_eq!(grid.count(CellKind::Key), 1);
        assert_eq!(grid.key(), Some(Coord::new(1, 1)));
    }

    // Tests start block placement clipped at the grid border
    // Verified by removing the bounds check in set
    #[test]
    fn test_place_start_block_clips() {
        let mut grid = Grid::new(9, 7);
        grid.place_start_block(Coord::new(7, 0), 2, 3);
        assert_eq!(grid.count(CellKind::Start), 6);
        assert_eq!(grid.start_cells().first(), Some(&Coord::new(7, 0)));

        let mut small = Grid::new(3, 3);
        small.place_start_block(Coord::new(2, 1), 2, 3);
        assert_eq!(small.count(CellKind::Start), 2);
    }

    // Tests the ASCII rendering used in debug logs
    // Verified by swapping the bridge and free glyphs
    #[test]
    fn test_display_renders_glyphs() {
        let grid = Grid::from_tokens(&layout(&[&["key", "path1", "bridge"], &["start", "free", "rock"]]))
            .expect("layout is valid");
        assert_eq!(grid.to_string(), "K1B\nS.#\n");
    }

    // Tests Manhattan distance symmetry
    // Verified by dropping the column term
    #[test]
    fn test_coord_manhattan() {
        let a = Coord::new(8, 0);
        let b = Coord::new(0, 6);
        assert_eq!(a.manhattan(b), 14);
        assert_eq!(b.manhattan(a), 14);
        assert_eq!(a.manhattan(a), 0);
    }
}
