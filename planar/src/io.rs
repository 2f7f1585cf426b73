//! Plain text maps and CSV dumps of planning results.
//!
//! Obstacles are written and read one per line as `x,y,dx,dy` with `(x, y)` the top left corner.

use std::io::{self, Write};
use std::num::ParseFloatError;

use log::debug;
use thiserror::Error;

use rrt_star::{Path, SearchTree};

use crate::dynamic_point::DynamicPoint;
use crate::environment::PlanarEnvironment;
use crate::obstacle::Rectangle;
use crate::point::Point;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("line {line}: expected 4 comma separated values, found {found}")]
    FieldCount { line: usize, found: usize },

    #[error("line {line}: {source}")]
    Number {
        line: usize,
        #[source]
        source: ParseFloatError,
    },

    #[error("line {line}: obstacle sides must be positive")]
    NonPositiveSize { line: usize },
}

/// Parses an obstacle list. Blank lines and lines starting with `#` are skipped. Line numbers in
/// errors start at 1.
pub fn parse_obstacles(s: &str) -> Result<Vec<Rectangle>, ParseError> {
    let mut obstacles = Vec::new();

    for (i, raw) in s.lines().enumerate() {
        let line = i + 1;
        let raw = raw.trim();
        if raw.is_empty() || raw.starts_with('#') {
            continue;
        }

        let fields = raw
            .split(',')
            .map(|field| field.trim().parse::<f32>())
            .collect::<Result<Vec<f32>, _>>()
            .map_err(|source| ParseError::Number { line, source })?;

        let (x, y, dx, dy) = match fields[..] {
            [x, y, dx, dy] => (x, y, dx, dy),
            _ => {
                return Err(ParseError::FieldCount {
                    line,
                    found: fields.len(),
                })
            }
        };

        if !(dx > 0.0 && dy > 0.0) {
            return Err(ParseError::NonPositiveSize { line });
        }

        obstacles.push(Rectangle::from_top_left(x, y, dx, dy));
    }

    debug!("parsed {} obstacles", obstacles.len());
    Ok(obstacles)
}

/// Things that can be written as the fields of a single CSV row.
pub trait CsvRecord {
    fn write_fields<W: Write + ?Sized>(&self, w: &mut W) -> io::Result<()>;
}

impl CsvRecord for Point {
    fn write_fields<W: Write + ?Sized>(&self, w: &mut W) -> io::Result<()> {
        write!(w, "{},{}", self.x(), self.y())
    }
}

impl CsvRecord for DynamicPoint {
    fn write_fields<W: Write + ?Sized>(&self, w: &mut W) -> io::Result<()> {
        write!(
            w,
            "{},{},{},{}",
            self.position.x, self.position.y, self.velocity.x, self.velocity.y
        )
    }
}

impl CsvRecord for Rectangle {
    fn write_fields<W: Write + ?Sized>(&self, w: &mut W) -> io::Result<()> {
        let top_left = self.top_left();
        write!(w, "{},{},{},{}", top_left.x, top_left.y, self.size.x, self.size.y)
    }
}

/// One row per waypoint, root first.
pub fn write_path<S, W>(w: &mut W, path: &Path<S>) -> io::Result<()>
where
    S: CsvRecord,
    W: Write + ?Sized,
{
    for waypoint in &path.waypoints {
        waypoint.write_fields(w)?;
        writeln!(w)?;
    }
    Ok(())
}

/// One row per node in discovery order: the state fields, the cost and the parent index. The
/// parent field of the root is empty.
pub fn write_nodes<S, W>(w: &mut W, tree: &SearchTree<S>) -> io::Result<()>
where
    S: CsvRecord,
    W: Write + ?Sized,
{
    for node in tree.iter() {
        node.state().write_fields(w)?;
        match node.parent() {
            Some(parent) => writeln!(w, ",{},{}", node.cost(), parent)?,
            None => writeln!(w, ",{},", node.cost())?,
        }
    }
    Ok(())
}

/// Environment extents, then the start state, then the goal region.
pub fn write_environment<S, W>(
    w: &mut W,
    env: &PlanarEnvironment,
    start: &S,
    goal: &Rectangle,
) -> io::Result<()>
where
    S: CsvRecord,
    W: Write + ?Sized,
{
    writeln!(w, "{},{}", env.width(), env.height())?;
    start.write_fields(w)?;
    writeln!(w)?;
    goal.write_fields(w)?;
    writeln!(w)
}

pub fn write_obstacles<W: Write + ?Sized>(w: &mut W, env: &PlanarEnvironment) -> io::Result<()> {
    for obstacle in env.obstacles() {
        obstacle.write_fields(w)?;
        writeln!(w)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use nalgebra as na;

    use super::*;

    #[test]
    fn test_parsing() {
        let input = r"# x,y,dx,dy
10.0,50.0,2.0,45.0

20, 40, 2, 45
30.5,50,2,45.25";

        let obstacles = parse_obstacles(input).unwrap();
        assert_eq!(obstacles.len(), 3);
        assert_eq!(obstacles[0], Rectangle::from_top_left(10.0, 50.0, 2.0, 45.0));
        assert_eq!(obstacles[1].corner, na::Point2::new(20.0, -5.0));
        assert_eq!(obstacles[2].size, na::Vector2::new(2.0, 45.25));
    }

    #[test]
    fn parse_errors_carry_the_line() {
        assert_eq!(
            parse_obstacles("1,2,3,4\n1,2,3"),
            Err(ParseError::FieldCount { line: 2, found: 3 })
        );
        assert!(matches!(
            parse_obstacles("1,2,x,4"),
            Err(ParseError::Number { line: 1, .. })
        ));
        assert_eq!(
            parse_obstacles("\n\n1,2,0,4"),
            Err(ParseError::NonPositiveSize { line: 3 })
        );
    }

    #[test]
    fn obstacles_round_trip_through_csv() {
        let env = PlanarEnvironment::new(50.0, 50.0).with_obstacles([
            Rectangle::from_top_left(10.0, 50.0, 2.0, 45.0),
            Rectangle::from_top_left(30.0, 50.0, 2.0, 45.0),
        ]);

        let mut out = Vec::new();
        write_obstacles(&mut out, &env).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "10,50,2,45\n30,50,2,45\n");
        assert_eq!(parse_obstacles(&text).unwrap(), env.obstacles());
    }

    #[test]
    fn environment_rows() {
        let env = PlanarEnvironment::new(50.0, 40.0);
        let goal = Rectangle::from_top_left(43.0, 39.0, 7.0, 2.0);
        let mut out = Vec::new();
        write_environment(&mut out, &env, &DynamicPoint::new(1.0, 2.5, 0.0, -1.0), &goal).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "50,40\n1,2.5,0,-1\n43,39,7,2\n");
    }
}
