//! 2D drawing of the mechanism in the x/y plane: the closed platform polygon and one segment
//! per leg. Drawing goes through the [`Canvas`] trait; [`SvgCanvas`] renders to an SVG document.

use crate::mechanism::Rpr;

/// Minimal drawing surface.
pub trait Canvas {
    /// Draws connected line segments through the points, back to the first if `closed`.
    fn polyline(&mut self, points: &[[f64; 2]], closed: bool);
}

impl Rpr {
    pub fn plot(&self, canvas: &mut dyn Canvas) {
        let platform: Vec<[f64; 2]> = self.platform().joints().iter().map(|j| [j.x, j.y]).collect();
        canvas.polyline(&platform, true);
        for (a, b) in self.ground().joints().iter().zip(self.platform().joints().iter()) {
            canvas.polyline(&[[a.x, a.y], [b.x, b.y]], false);
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SvgCanvas {
    lines: Vec<(Vec<[f64; 2]>, bool)>,
}

impl SvgCanvas {
    pub fn new() -> Self {
        SvgCanvas { lines: Vec::new() }
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// SVG document fitting everything drawn so far, with `margin` as a fraction of the extent
    /// added on every side. The y axis points up.
    pub fn to_svg(&self, margin: f64) -> String {
        let points = || self.lines.iter().flat_map(|(p, _)| p.iter());
        let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
        let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
        for p in points() {
            min_x = min_x.min(p[0]);
            max_x = max_x.max(p[0]);
            min_y = min_y.min(p[1]);
            max_y = max_y.max(p[1]);
        }
        if !min_x.is_finite() {
            (min_x, min_y, max_x, max_y) = (-1.0, -1.0, 1.0, 1.0);
        }
        let pad = margin * (max_x - min_x).max(max_y - min_y).max(1.0);
        let (x0, y0) = (min_x - pad, -(max_y + pad));
        let (w, h) = (max_x - min_x + 2.0 * pad, max_y - min_y + 2.0 * pad);

        let mut svg = format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"{:.3} {:.3} {:.3} {:.3}\">\n",
            x0, y0, w, h
        );
        for (line, closed) in &self.lines {
            let coords = line
                .iter()
                .map(|p| format!("{:.3},{:.3}", p[0], -p[1]))
                .collect::<Vec<_>>()
                .join(" ");
            let element = if *closed { "polygon" } else { "polyline" };
            svg.push_str(&format!(
                "  <{} points=\"{}\" fill=\"none\" stroke=\"blue\" stroke-width=\"{:.3}\"/>\n",
                element, coords, w / 400.0
            ));
        }
        svg.push_str("</svg>\n");
        svg
    }
}

impl Canvas for SvgCanvas {
    fn polyline(&mut self, points: &[[f64; 2]], closed: bool) {
        self.lines.push((points.to_vec(), closed));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameters::rpr_kinematics::Parameters;

    #[test]
    fn test_plot_draws_platform_and_legs() {
        let rpr = Rpr::from_parameters(&Parameters::default()).unwrap();
        let mut canvas = SvgCanvas::new();
        rpr.plot(&mut canvas);
        assert_eq!(canvas.line_count(), 4);

        let svg = canvas.to_svg(0.25);
        assert!(svg.starts_with("<svg"));
        assert_eq!(svg.matches("<polygon").count(), 1);
        assert_eq!(svg.matches("<polyline").count(), 3);
    }

    #[test]
    fn test_empty_canvas() {
        let svg = SvgCanvas::new().to_svg(0.1);
        assert!(svg.contains("viewBox"));
        assert!(svg.ends_with("</svg>\n"));
    }
}
