//! Hull-painting robot driven by an Intcode brain.
//!
//! The robot reads the colour under it through the VM's input callback and
//! receives alternating paint / turn commands through the output callback.
//! All robot state lives here; the VM only sees the two callbacks.

use std::cell::RefCell;

use hashbrown::HashSet;
use intcode_vm::{InputChannel, OutputChannel, Vm, VmError, VmResult};

pub type Pos = (i64, i64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Paint,
    Turn,
}

/// Panels the robot has touched.
#[derive(Debug, Clone, Default)]
pub struct Hull {
    pub white: HashSet<Pos>,
    pub painted: HashSet<Pos>,
}

impl Hull {
    /// Panels painted at least once, whatever the colour.
    pub fn painted_count(&self) -> usize {
        self.painted.len()
    }

    /// White panels as `#`, one text row per y, bounded by the white panels.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let (Some(min_x), Some(max_x)) = (
            self.white.iter().map(|p| p.0).min(),
            self.white.iter().map(|p| p.0).max(),
        ) else {
            return out;
        };
        let min_y = self.white.iter().map(|p| p.1).min().unwrap_or(0);
        let max_y = self.white.iter().map(|p| p.1).max().unwrap_or(0);
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                out.push(if self.white.contains(&(x, y)) { '#' } else { ' ' });
            }
            out.push('\n');
        }
        out
    }
}

#[derive(Debug)]
pub struct Robot {
    pos: Pos,
    dir: Pos,
    phase: Phase,
    hull: Hull,
}

impl Robot {
    /// Starts at the origin facing up (negative y).
    pub fn new(start_white: bool) -> Self {
        let mut hull = Hull::default();
        if start_white {
            hull.white.insert((0, 0));
        }
        Self {
            pos: (0, 0),
            dir: (0, -1),
            phase: Phase::Paint,
            hull,
        }
    }

    /// Colour of the current panel: 1 for white, 0 for black.
    pub fn camera(&self) -> i64 {
        self.hull.white.contains(&self.pos) as i64
    }

    /// Applies one output value: a colour, then a turn (0 left, 1 right).
    pub fn command(&mut self, n: i64) -> VmResult<()> {
        match self.phase {
            Phase::Paint => {
                match n {
                    0 => self.hull.white.remove(&self.pos),
                    1 => self.hull.white.insert(self.pos),
                    _ => return Err(VmError::Peripheral(format!("bad paint: {}", n))),
                };
                self.hull.painted.insert(self.pos);
                self.phase = Phase::Turn;
            }
            Phase::Turn => {
                let (dx, dy) = self.dir;
                self.dir = match n {
                    0 => (dy, -dx),
                    1 => (-dy, dx),
                    _ => return Err(VmError::Peripheral(format!("bad turn: {}", n))),
                };
                self.pos = (self.pos.0 + self.dir.0, self.pos.1 + self.dir.1);
                self.phase = Phase::Paint;
            }
        }
        Ok(())
    }

    pub fn into_hull(self) -> Hull {
        self.hull
    }
}

/// Runs `program` as the robot's brain until it halts.
pub fn paint(program: &[i64], start_white: bool) -> VmResult<Hull> {
    let robot = RefCell::new(Robot::new(start_white));
    {
        let mut input = InputChannel::callback(|| Ok(robot.borrow().camera()));
        let mut output = OutputChannel::callback(|n| robot.borrow_mut().command(n));
        Vm::new(program).run(&mut input, &mut output, false)?;
    }
    Ok(robot.into_inner().into_hull())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turns() {
        let mut robot = Robot::new(false);
        // paint white, turn left -> (-1, 0)
        robot.command(1).unwrap();
        robot.command(0).unwrap();
        assert_eq!(robot.pos, (-1, 0));
        // paint black, turn right -> facing up again
        robot.command(0).unwrap();
        robot.command(1).unwrap();
        assert_eq!(robot.pos, (-1, -1));
        assert_eq!(robot.dir, (0, -1));
        assert_eq!(robot.camera(), 0);
    }

    #[test]
    fn test_bad_commands() {
        let mut robot = Robot::new(false);
        assert!(robot.command(2).is_err());
        robot.command(1).unwrap();
        assert!(robot.command(7).is_err());
    }

    #[test]
    fn test_paint_program() {
        // Paints the opposite of what the camera sees and always turns left,
        // so four cycles trace a 2x2 square back to the origin.
        let program = vec![
            3, 100, // in 100
            1008, 100, 0, 101, // seteq 100 #0 101
            4, 101, // out 101
            104, 0, // out #0
            1001, 102, 1, 102, // add 102 #1 102
            1007, 102, 4, 103, // setlt 102 #4 103
            1005, 103, 0, // jnz 103 #0
            99,
        ];
        let hull = paint(&program, false).unwrap();
        assert_eq!(hull.painted_count(), 4);
        assert_eq!(hull.render(), "##\n##\n");

        // Origin starts white, so it is the one panel flipped to black.
        let hull = paint(&program, true).unwrap();
        assert_eq!(hull.painted_count(), 4);
        assert!(!hull.white.contains(&(0, 0)));
        assert_eq!(hull.render(), "# \n##\n");
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(Hull::default().render(), "");
    }
}
