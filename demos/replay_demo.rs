//! Replay demo: two recorded players pushing crates on a tiny board.
//!
//! Usage: `cargo run --example replay_demo -- [ROUND_ROBIN|FREE_RACE] [fps]`
//!
//! Set `RUST_LOG=replay=debug` to watch the scheduler.

use replay::{
    Action, ActionResult, BoxError, Direction, GameState, InputStream, Mode, ReplayConfig,
    ReplayGame, ScriptedInput, TerminalRenderer,
};
use std::fmt;
use tracing_subscriber::EnvFilter;

const MAP: &str = "\
#########
#A  $  .#
#       #
#B  $  .#
#########";

/// Minimal board: walls, goals, crates, and one player per stream.
struct Board {
    cells: Vec<Vec<char>>,
    goals: Vec<(usize, usize)>,
    history: Vec<Vec<Vec<char>>>,
    undo_quota: Option<u32>,
}

impl Board {
    fn parse(map: &str, undo_quota: Option<u32>) -> Self {
        let mut cells: Vec<Vec<char>> = map.lines().map(|l| l.chars().collect()).collect();
        let mut goals = Vec::new();
        for (r, row) in cells.iter_mut().enumerate() {
            for (c, cell) in row.iter_mut().enumerate() {
                if *cell == '.' {
                    goals.push((r, c));
                    *cell = ' ';
                }
            }
        }
        Self {
            cells,
            goals,
            history: Vec::new(),
            undo_quota,
        }
    }

    fn find_player(&self, player: usize) -> Option<(usize, usize)> {
        let symbol = char::from(b'A' + u8::try_from(player).ok()?);
        self.cells.iter().enumerate().find_map(|(r, row)| {
            row.iter().position(|&cell| cell == symbol).map(|c| (r, c))
        })
    }

    fn step(&self, (r, c): (usize, usize), direction: Direction) -> Option<(usize, usize)> {
        let (dr, dc) = direction.offset();
        let r = r.checked_add_signed(dr)?;
        let c = c.checked_add_signed(dc)?;
        self.cells.get(r)?.get(c)?;
        Some((r, c))
    }

    fn try_move(&mut self, player: usize, direction: Direction) -> ActionResult {
        let Some(from) = self.find_player(player) else {
            return ActionResult::failed(format!("Player {player} is not on the board."));
        };
        let Some(to) = self.step(from, direction) else {
            return ActionResult::failed("You hit a wall.");
        };
        let snapshot = self.cells.clone();
        match self.cells[to.0][to.1] {
            ' ' => {}
            '$' => {
                let Some(beyond) = self.step(to, direction) else {
                    return ActionResult::failed("You hit a wall.");
                };
                if self.cells[beyond.0][beyond.1] != ' ' {
                    return ActionResult::failed("The crate is stuck.");
                }
                self.cells[beyond.0][beyond.1] = '$';
            }
            _ => return ActionResult::failed("You hit a wall."),
        }
        self.cells[to.0][to.1] = self.cells[from.0][from.1];
        self.cells[from.0][from.1] = ' ';
        self.history.push(snapshot);
        ActionResult::Success
    }

    fn try_undo(&mut self) -> ActionResult {
        if self.undo_quota == Some(0) {
            return ActionResult::failed("You have run out of your undo quota.");
        }
        let Some(previous) = self.history.pop() else {
            return ActionResult::Success;
        };
        self.cells = previous;
        if let Some(quota) = self.undo_quota.as_mut() {
            *quota -= 1;
        }
        ActionResult::Success
    }
}

impl GameState for Board {
    fn process_action(&mut self, action: &Action) -> Result<ActionResult, BoxError> {
        Ok(match action {
            Action::Move {
                initiator,
                direction,
            } => self.try_move(*initiator, *direction),
            Action::Undo { .. } => self.try_undo(),
            Action::InvalidInput { message, .. } => ActionResult::failed(message.clone()),
            Action::Exit { .. } => ActionResult::Success,
        })
    }

    fn is_win(&self) -> bool {
        self.goals.iter().all(|&(r, c)| self.cells[r][c] == '$')
    }

    fn undo_quota(&self) -> Option<u32> {
        self.undo_quota
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (r, row) in self.cells.iter().enumerate() {
            for (c, &cell) in row.iter().enumerate() {
                let on_goal = self.goals.contains(&(r, c));
                let symbol = match (cell, on_goal) {
                    ('$', true) => '*',
                    (' ', true) => '.',
                    (other, _) => other,
                };
                write!(f, "{symbol}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

fn script(player: usize) -> ScriptedInput {
    use Direction::{Left, Right};
    let moves = [Right, Right, Left, Right, Right, Right, Right];
    ScriptedInput::new(
        player,
        moves
            .into_iter()
            .map(|direction| Action::moving(player, direction))
            .chain([Action::undo(player), Action::moving(player, Right)]),
    )
    .with_delay(150..=250)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let mode: Mode = args.next().as_deref().unwrap_or("ROUND_ROBIN").parse()?;
    let fps: u32 = args.next().as_deref().unwrap_or("10").parse()?;

    let inputs: Vec<Box<dyn InputStream>> = vec![Box::new(script(0)), Box::new(script(1))];
    let mut game = ReplayGame::new(
        ReplayConfig::new(mode, fps),
        Board::parse(MAP, Some(2)),
        inputs,
        TerminalRenderer::stdout().clearing(),
    )?;

    let report = game.run()?;
    println!();
    println!(
        "{} actions ({} rejected), {} frames in {:.2?}",
        report.actions, report.failures, report.frames, report.elapsed
    );
    Ok(())
}
