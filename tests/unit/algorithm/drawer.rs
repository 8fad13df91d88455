//! Tests for biased random walks and their painting rules

#[cfg(test)]
mod tests {
    use unlockgen::algorithm::drawer::PathDrawer;
    use unlockgen::math::probability::RandomSelector;
    use unlockgen::spatial::grid::{CellKind, Coord, Grid};

    // Tests a straight walk stopping next to the key without entering it
    // Verified by letting the walk step onto the key
    #[test]
    fn test_walk_stops_next_to_key() {
        let mut grid = Grid::new(5, 3);
        grid.set(Coord::new(0, 1), CellKind::Key);
        let mut selector = RandomSelector::new(1);

        let walk = PathDrawer::new(&mut selector)
            .with_detour_probability(0.0)
            .draw(&mut grid, Coord::new(4, 1), Coord::new(0, 1), CellKind::Path(1));

        let expected = vec![
            Coord::new(4, 1),
            Coord::new(3, 1),
            Coord::new(2, 1),
            Coord::new(1, 1),
        ];
        assert!(walk.reached);
        assert_eq!(walk.cells, expected);
        assert_eq!(walk.painted, expected);
        assert_eq!(walk.end(), Some(Coord::new(1, 1)));
        assert_eq!(grid.get(Coord::new(0, 1)), Some(CellKind::Key));
        assert_eq!(grid.count(CellKind::Path(1)), 4);
    }

    // Tests that cells tagged by another route keep their tag
    // Verified by painting every visited cell
    #[test]
    fn test_existing_tags_are_kept() {
        let mut grid = Grid::new(4, 1);
        grid.set(Coord::new(0, 0), CellKind::Key);
        grid.set(Coord::new(2, 0), CellKind::Path(2));
        let mut selector = RandomSelector::new(2);

        let walk = PathDrawer::new(&mut selector)
            .with_detour_probability(0.0)
            .draw(&mut grid, Coord::new(3, 0), Coord::new(0, 0), CellKind::Path(1));

        assert!(walk.reached);
        assert_eq!(walk.painted, vec![Coord::new(3, 0), Coord::new(1, 0)]);
        assert_eq!(grid.get(Coord::new(2, 0)), Some(CellKind::Path(2)));
    }

    // Tests that walks route around start cells
    // Verified by allowing start cells as walk steps
    #[test]
    fn test_start_cells_are_never_entered() {
        let mut grid = Grid::new(3, 3);
        grid.set(Coord::new(1, 1), CellKind::Start);
        let mut selector = RandomSelector::new(3);

        let walk = PathDrawer::new(&mut selector)
            .with_detour_probability(0.0)
            .draw(&mut grid, Coord::new(2, 1), Coord::new(0, 1), CellKind::Bridge);

        assert!(walk.reached);
        assert!(!walk.cells.contains(&Coord::new(1, 1)));
        assert_eq!(grid.get(Coord::new(1, 1)), Some(CellKind::Start));
        assert_eq!(grid.get(Coord::new(0, 1)), Some(CellKind::Bridge));
    }

    // Tests that pure detour walks stay within the step cap
    // Verified by removing the step limit
    #[test]
    fn test_walk_is_bounded() {
        let mut grid = Grid::new(9, 7);
        grid.set(Coord::new(0, 3), CellKind::Key);
        let mut selector = RandomSelector::new(4);

        let walk = PathDrawer::new(&mut selector)
            .with_detour_probability(1.0)
            .draw(&mut grid, Coord::new(8, 3), Coord::new(0, 3), CellKind::Path(1));

        assert!(walk.cells.len() <= 4 * 9 * 7 + 1);
        assert!(!walk.cells.contains(&Coord::new(0, 3)));
        assert_eq!(grid.count(CellKind::Key), 1);
    }
}
