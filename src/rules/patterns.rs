//! Pattern detection.
//!
//! Lines are found by scanning rows and columns for maximal runs. Every
//! other shape has a fixed footprint, so all of its placements on the 6×6
//! board are enumerated once into a template table and matching is a mask
//! test per template. The detector is called for every candidate move the
//! AI looks at, so it never allocates per cell.
//!
//! | Kind  | Cells | Shape                                   |
//! |-------|-------|-----------------------------------------|
//! | Line  | 3–6   | maximal straight run                    |
//! | Bend  | 3     | corner plus one neighbour on each axis  |
//! | Gate  | 4     | 2×2 block                               |
//! | Cross | 5     | plus sign, centre off the border        |
//! | Pod   | 4     | T-tetromino                             |
//! | Hook  | 4     | L-tetromino                             |

use std::sync::OnceLock;

use rustc_hash::FxHashSet;

use crate::core::{
    Board, Pattern, PatternId, PatternKind, Player, Position, PositionSet, BOARD_SIZE, CELL_COUNT,
};

/// Minimum run length that counts as a line.
pub const MIN_LINE: usize = 3;

struct TemplateTable {
    /// Fixed-footprint shapes in detection order.
    templates: Vec<(PatternKind, PositionSet)>,
    /// Indices into `templates` for shapes covering each cell.
    through: Vec<Vec<usize>>,
}

static TEMPLATES: OnceLock<TemplateTable> = OnceLock::new();

fn table() -> &'static TemplateTable {
    TEMPLATES.get_or_init(build_table)
}

fn footprint(cells: &[Option<Position>]) -> Option<PositionSet> {
    cells.iter().copied().collect::<Option<Vec<_>>>().map(|v| v.into_iter().collect())
}

fn build_table() -> TemplateTable {
    let mut templates: Vec<(PatternKind, PositionSet)> = Vec::new();
    let mut seen: FxHashSet<PatternId> = FxHashSet::default();
    let mut push = |kind: PatternKind, set: Option<PositionSet>| {
        if let Some(set) = set {
            if seen.insert(PatternId::new(kind, set)) {
                templates.push((kind, set));
            }
        }
    };

    // Bends: every cell as the corner, four orientations.
    for corner in Position::all() {
        for (h, v) in [(1, 1), (1, -1), (-1, 1), (-1, -1)] {
            push(
                PatternKind::Bend,
                footprint(&[Some(corner), corner.offset(h, 0), corner.offset(0, v)]),
            );
        }
    }

    // Gates: every 2×2 block by its lower-left cell.
    for origin in Position::all() {
        push(
            PatternKind::Gate,
            footprint(&[
                Some(origin),
                origin.offset(1, 0),
                origin.offset(0, 1),
                origin.offset(1, 1),
            ]),
        );
    }

    // Crosses: centre plus all four neighbours.
    for centre in Position::all() {
        let mut cells = vec![Some(centre)];
        cells.extend(centre.neighbor_slots());
        push(PatternKind::Cross, footprint(&cells));
    }

    // Pods: centre plus three of its four neighbours.
    for centre in Position::all() {
        let slots = centre.neighbor_slots();
        for skip in 0..slots.len() {
            let mut cells = vec![Some(centre)];
            cells.extend(slots.iter().enumerate().filter(|(i, _)| *i != skip).map(|(_, s)| *s));
            push(PatternKind::Pod, footprint(&cells));
        }
    }

    // Hooks: a run of three with a foot at one end, either side.
    for start in Position::all() {
        for (dc, dr) in [(1, 0), (0, 1)] {
            let line = [Some(start), start.offset(dc, dr), start.offset(2 * dc, 2 * dr)];
            for end in [line[0], line[2]].into_iter().flatten() {
                for (pc, pr) in [(dr, dc), (-dr, -dc)] {
                    let mut cells = line.to_vec();
                    cells.push(end.offset(pc, pr));
                    push(PatternKind::Hook, footprint(&cells));
                }
            }
        }
    }

    let mut through = vec![Vec::new(); CELL_COUNT];
    for (i, (_, set)) in templates.iter().enumerate() {
        for pos in set.iter() {
            through[pos.index()].push(i);
        }
    }

    TemplateTable { templates, through }
}

/// Maximal runs of at least `MIN_LINE` along one row or column.
fn runs_along(
    cells: PositionSet,
    lane: impl Iterator<Item = Position>,
    out: &mut Vec<PositionSet>,
) {
    let mut run = PositionSet::EMPTY;
    for pos in lane {
        if cells.contains(pos) {
            run.insert(pos);
        } else {
            if run.len() >= MIN_LINE {
                out.push(run);
            }
            run = PositionSet::EMPTY;
        }
    }
    if run.len() >= MIN_LINE {
        out.push(run);
    }
}

fn row_cells(row: u8) -> impl Iterator<Item = Position> {
    (0..BOARD_SIZE).map(move |col| Position::new(col, row))
}

fn col_cells(col: u8) -> impl Iterator<Item = Position> {
    (0..BOARD_SIZE).map(move |row| Position::new(col, row))
}

/// Every maximal line formed by `cells`.
#[must_use]
pub fn line_runs(cells: PositionSet) -> Vec<PositionSet> {
    let mut runs = Vec::new();
    for i in 0..BOARD_SIZE {
        runs_along(cells, row_cells(i), &mut runs);
    }
    for i in 0..BOARD_SIZE {
        runs_along(cells, col_cells(i), &mut runs);
    }
    runs
}

/// Patterns formed by an arbitrary cell set, attributed to `player`.
///
/// This is the detector proper; [`detect`] feeds it the board's cells.
/// The AI calls it directly with hypothetical cell sets.
#[must_use]
pub fn detect_in(cells: PositionSet, player: Player) -> Vec<Pattern> {
    if cells.len() < MIN_LINE {
        return Vec::new();
    }

    let mut found: Vec<Pattern> = line_runs(cells)
        .into_iter()
        .map(|run| Pattern::new(PatternKind::Line, run, player))
        .collect();

    found.extend(
        table()
            .templates
            .iter()
            .filter(|(_, set)| set.is_subset(cells))
            .map(|&(kind, set)| Pattern::new(kind, set, player)),
    );
    found
}

/// Patterns formed by `player`'s stones.
///
/// With `unlocked_only`, locked stones are treated as absent: the result is
/// exactly the set of patterns the player could lock right now.
#[must_use]
pub fn detect(board: &Board, player: Player, unlocked_only: bool) -> Vec<Pattern> {
    let cells = if unlocked_only {
        board.free_stones(player)
    } else {
        board.occupied_by(player)
    };
    detect_in(cells, player)
}

/// Patterns in `cells` that include `pos`.
#[must_use]
pub fn patterns_through(cells: PositionSet, player: Player, pos: Position) -> Vec<Pattern> {
    if !cells.contains(pos) {
        return Vec::new();
    }

    let mut lanes = Vec::new();
    runs_along(cells, row_cells(pos.row()), &mut lanes);
    runs_along(cells, col_cells(pos.col()), &mut lanes);

    let mut found: Vec<Pattern> = lanes
        .into_iter()
        .filter(|run| run.contains(pos))
        .map(|run| Pattern::new(PatternKind::Line, run, player))
        .collect();

    let table = table();
    found.extend(
        table.through[pos.index()]
            .iter()
            .map(|&i| table.templates[i])
            .filter(|(_, set)| set.is_subset(cells))
            .map(|(kind, set)| Pattern::new(kind, set, player)),
    );
    found
}

/// Look up a lockable pattern of `player` by id.
#[must_use]
pub fn find_unlocked(board: &Board, player: Player, id: PatternId) -> Option<Pattern> {
    let kind = id.kind()?;
    let positions = id.positions();
    let free = board.free_stones(player);
    if !positions.is_subset(free) {
        return None;
    }
    match kind {
        PatternKind::Line => line_runs(free)
            .into_iter()
            .find(|run| *run == positions)
            .map(|run| Pattern::new(kind, run, player)),
        _ => table()
            .templates
            .iter()
            .any(|&(k, set)| k == kind && set == positions)
            .then(|| Pattern::new(kind, positions, player)),
    }
}
