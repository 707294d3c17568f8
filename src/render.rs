use std::io::{self, Write};

use crossterm::{
    cursor::MoveTo,
    queue,
    terminal::{Clear, ClearType},
};

use crate::gym::{Cell, GridWorld, WORLD_SIZE};

pub fn symbol(cell: Cell) -> char {
    match cell {
        Cell::Empty => ' ',
        Cell::Wall => '*',
        Cell::Agent => 'X',
        Cell::Food => 'O',
    }
}

/// Character map of the grid, one line per row
pub fn render(world: &GridWorld) -> String {
    let mut out = String::with_capacity(WORLD_SIZE * (WORLD_SIZE + 1));
    for row in world.cells() {
        out.extend(row.iter().map(|&cell| symbol(cell)));
        out.push('\n');
    }
    out
}

/// Clear the terminal and redraw the world followed by the iteration and score
pub fn draw(out: &mut impl Write, world: &GridWorld, iteration: u64, score: i64) -> io::Result<()> {
    queue!(out, Clear(ClearType::All), MoveTo(0, 0))?;
    out.write_all(render(world).as_bytes())?;
    writeln!(out, "iter: {iteration}")?;
    writeln!(out, "score: {score}")?;
    out.flush()
}
