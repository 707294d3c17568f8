use rand::Rng;
use strum::{EnumIter, FromRepr, VariantArray};

/// Side length of the square world, walls included
pub const WORLD_SIZE: usize = 20;

/// Normalized `(food x, food y, agent x, agent y)`
pub type StateVector = [f32; 4];

/// Contents of a single grid cell
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Cell {
    #[default]
    Empty,
    Wall,
    Food,
    Agent,
}

/// A cell coordinate, `x` is the column and `y` the row with `y = 0` being the north wall
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Pos {
    pub x: usize,
    pub y: usize,
}

impl Pos {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// The neighbouring position in direction `dir`, or `None` if it falls off the grid
    pub fn step(self, dir: Dir) -> Option<Self> {
        let (dx, dy) = dir.delta();
        let x = self.x.checked_add_signed(dx)?;
        let y = self.y.checked_add_signed(dy)?;
        (x < WORLD_SIZE && y < WORLD_SIZE).then_some(Self { x, y })
    }

    pub fn manhattan(self, other: Self) -> usize {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

/// The four moves available to the agent, discriminants are the action indices
#[derive(EnumIter, VariantArray, FromRepr, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum Dir {
    Up = 0,
    Down = 1,
    Left = 2,
    Right = 3,
}

impl Dir {
    /// Unit offset `(dx, dy)`
    pub const fn delta(self) -> (isize, isize) {
        match self {
            Dir::Up => (0, -1),
            Dir::Down => (0, 1),
            Dir::Left => (-1, 0),
            Dir::Right => (1, 0),
        }
    }

    pub const fn index(self) -> usize {
        self as usize
    }
}

type Cells = [[Cell; WORLD_SIZE]; WORLD_SIZE];

/// A walled square field holding one agent and one piece of food
///
/// Cloning produces an independent snapshot, which is how transitions record
/// the world before and after a move.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GridWorld {
    cells: Cells,
    agent: Pos,
    food: Pos,
}

impl GridWorld {
    /// Build a walled world with food and agent dropped on random interior cells
    ///
    /// The two placements are independent, so the agent may start on the food.
    pub fn new(rng: &mut impl Rng) -> Self {
        let mut world = Self {
            cells: walled(),
            agent: Pos::new(1, 1),
            food: Pos::new(1, 1),
        };
        world.move_food(rng);
        let agent = random_interior(rng);
        world.agent = agent;
        world[agent] = Cell::Agent;
        world
    }

    /// Build a walled world with the agent and food at fixed positions
    ///
    /// **Panics** if either position is not an interior cell
    pub fn with_positions(agent: Pos, food: Pos) -> Self {
        assert!(is_interior(agent), "Agent must be placed inside the walls.");
        assert!(is_interior(food), "Food must be placed inside the walls.");
        let mut world = Self {
            cells: walled(),
            agent,
            food,
        };
        world[food] = Cell::Food;
        world[agent] = Cell::Agent;
        world
    }

    pub fn agent(&self) -> Pos {
        self.agent
    }

    pub fn food(&self) -> Pos {
        self.food
    }

    pub fn cell(&self, pos: Pos) -> Cell {
        self[pos]
    }

    /// Row-major view of the grid, `cells()[y][x]`
    pub fn cells(&self) -> &[[Cell; WORLD_SIZE]; WORLD_SIZE] {
        &self.cells
    }

    /// Drop the food on a new random interior cell
    ///
    /// The previous food cell is left as is. Food is only moved once the agent
    /// stands on it, so that cell already reads `Agent`.
    pub fn move_food(&mut self, rng: &mut impl Rng) {
        let food = random_interior(rng);
        self.food = food;
        self[food] = Cell::Food;
    }

    /// Move the agent one cell in `dir` unless a wall is in the way
    ///
    /// **Returns** whether the move happened; the world is untouched otherwise
    pub fn attempt_move(&mut self, dir: Dir) -> bool {
        let Some(next) = self.agent.step(dir) else {
            return false;
        };
        if self[next] == Cell::Wall {
            return false;
        }

        let prev = self.agent;
        self[prev] = Cell::Empty;
        self.agent = next;
        self[next] = Cell::Agent;
        true
    }

    pub fn is_food_eaten(&self) -> bool {
        self.agent == self.food
    }

    pub fn distance_to_food(&self) -> usize {
        self.agent.manhattan(self.food)
    }

    pub fn state_vector(&self) -> StateVector {
        let size = WORLD_SIZE as f32;
        [
            self.food.x as f32 / size,
            self.food.y as f32 / size,
            self.agent.x as f32 / size,
            self.agent.y as f32 / size,
        ]
    }
}

impl std::ops::Index<Pos> for GridWorld {
    type Output = Cell;

    fn index(&self, pos: Pos) -> &Self::Output {
        &self.cells[pos.y][pos.x]
    }
}

impl std::ops::IndexMut<Pos> for GridWorld {
    fn index_mut(&mut self, pos: Pos) -> &mut Self::Output {
        &mut self.cells[pos.y][pos.x]
    }
}

fn walled() -> Cells {
    let mut cells = [[Cell::Empty; WORLD_SIZE]; WORLD_SIZE];
    for i in 0..WORLD_SIZE {
        cells[0][i] = Cell::Wall;
        cells[WORLD_SIZE - 1][i] = Cell::Wall;
        cells[i][0] = Cell::Wall;
        cells[i][WORLD_SIZE - 1] = Cell::Wall;
    }
    cells
}

fn is_interior(pos: Pos) -> bool {
    (1..WORLD_SIZE - 1).contains(&pos.x) && (1..WORLD_SIZE - 1).contains(&pos.y)
}

fn random_interior(rng: &mut impl Rng) -> Pos {
    Pos::new(
        rng.gen_range(1..WORLD_SIZE - 1),
        rng.gen_range(1..WORLD_SIZE - 1),
    )
}
