use web_sys::CanvasRenderingContext2d;

use crate::constants::{CONNECTION_LINE_COLOR, CONNECTION_LINE_WIDTH, CURVE_REACH_RATIO, MIN_CURVE_REACH};
use crate::models::Position;

/// A cubic Bezier from a source block's right anchor to a target block's
/// left anchor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CurvePath {
    pub from: Position,
    pub control1: Position,
    pub control2: Position,
    pub to: Position,
}

/// Horizontal control-point offset for a connection spanning `dx`.
///
/// The minimum reach keeps the curve readable when blocks are vertically
/// stacked or nearly touching horizontally.
pub fn control_reach(dx: f64) -> f64 {
    f64::max(CURVE_REACH_RATIO * dx.abs(), MIN_CURVE_REACH)
}

/// Compute the curve between two anchors. Control points extend to the
/// right of the source and to the left of the target so the path always
/// leaves right-of-source and enters left-of-target, whatever the vertical
/// offset.
pub fn connection_path(from: Position, to: Position) -> CurvePath {
    let reach = control_reach(to.x - from.x);
    CurvePath {
        from,
        control1: Position::new(from.x + reach, from.y),
        control2: Position::new(to.x - reach, to.y),
        to,
    }
}

pub fn draw_connection(context: &CanvasRenderingContext2d, path: &CurvePath) {
    context.begin_path();
    context.move_to(path.from.x, path.from.y);
    context.bezier_curve_to(
        path.control1.x,
        path.control1.y,
        path.control2.x,
        path.control2.y,
        path.to.x,
        path.to.y,
    );
    context.set_stroke_style_str(CONNECTION_LINE_COLOR);
    context.set_line_width(CONNECTION_LINE_WIDTH);
    context.stroke();

    // arrow head entering the target's left anchor
    draw_arrow(context, path.to.x, path.to.y, 1.0, 0.0);
}

pub fn draw_arrow(context: &CanvasRenderingContext2d, x: f64, y: f64, dx: f64, dy: f64) {
    let head_len = 10.0;
    let angle = f64::atan2(dy, dx);

    context.begin_path();
    context.move_to(x, y);
    context.line_to(
        x - head_len * f64::cos(angle - std::f64::consts::PI / 6.0),
        y - head_len * f64::sin(angle - std::f64::consts::PI / 6.0),
    );
    context.move_to(x, y);
    context.line_to(
        x - head_len * f64::cos(angle + std::f64::consts::PI / 6.0),
        y - head_len * f64::sin(angle + std::f64::consts::PI / 6.0),
    );
    context.set_stroke_style_str(CONNECTION_LINE_COLOR);
    context.set_line_width(CONNECTION_LINE_WIDTH);
    context.stroke();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reach_has_a_floor_for_close_blocks() {
        assert_eq!(control_reach(0.0), 80.0);
        assert_eq!(control_reach(50.0), 80.0);
        assert_eq!(control_reach(-50.0), 80.0);
    }

    #[test]
    fn reach_scales_with_horizontal_distance() {
        assert_eq!(control_reach(200.0), 120.0);
        assert_eq!(control_reach(-400.0), 240.0);
    }

    #[test]
    fn path_leaves_right_and_enters_left() {
        let from = Position::new(300.0, 50.0);
        let to = Position::new(340.0, 400.0);
        let path = connection_path(from, to);

        assert_eq!(path.from, from);
        assert_eq!(path.to, to);
        assert!(path.control1.x > from.x);
        assert!(path.control2.x < to.x);
        assert_eq!(path.control1.y, from.y);
        assert_eq!(path.control2.y, to.y);
    }

    #[test]
    fn path_holds_shape_when_target_is_behind_source() {
        let path = connection_path(Position::new(500.0, 100.0), Position::new(100.0, 100.0));
        assert!(path.control1.x > 500.0);
        assert!(path.control2.x < 100.0);
    }
}
