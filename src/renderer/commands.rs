//! Display list for the 2D canvas
//!
//! The scene is described as a flat list of Canvas 2D operations so it can be
//! built (and inspected) without a browser.

/// Drawing surface size in css pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// A gradient color stop: offset in [0, 1] and a css color
pub type ColorStop = (f32, String);

/// Fill source
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Solid(String),
    Linear {
        from: (f32, f32),
        to: (f32, f32),
        stops: Vec<ColorStop>,
    },
    Radial {
        inner: (f32, f32, f32),
        outer: (f32, f32, f32),
        stops: Vec<ColorStop>,
    },
}

/// Canvas `globalCompositeOperation` values used by the scene
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Composite {
    SourceOver,
    Lighter,
    Screen,
}

impl Composite {
    pub fn as_str(&self) -> &'static str {
        match self {
            Composite::SourceOver => "source-over",
            Composite::Lighter => "lighter",
            Composite::Screen => "screen",
        }
    }
}

/// Path segment for [`DrawCommand::FillPath`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathOp {
    MoveTo(f32, f32),
    LineTo(f32, f32),
    QuadTo { cx: f32, cy: f32, x: f32, y: f32 },
    Close,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Save,
    Restore,
    Translate(f32, f32),
    Rotate(f32),
    SetFill(Paint),
    SetShadow { color: String, blur: f32 },
    SetComposite(Composite),
    ClearRect { x: f32, y: f32, w: f32, h: f32 },
    FillRect { x: f32, y: f32, w: f32, h: f32 },
    /// Filled elliptical arc (a full ellipse when the angles span TAU)
    FillEllipse {
        x: f32,
        y: f32,
        rx: f32,
        ry: f32,
        rotation: f32,
        start: f32,
        end: f32,
    },
    FillCircle { x: f32, y: f32, r: f32 },
    FillPath(Vec<PathOp>),
}

/// Ordered list of drawing commands for one frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisplayList {
    pub commands: Vec<DrawCommand>,
}

impl DisplayList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    pub fn save(&mut self) {
        self.push(DrawCommand::Save);
    }

    pub fn restore(&mut self) {
        self.push(DrawCommand::Restore);
    }

    pub fn translate(&mut self, x: f32, y: f32) {
        self.push(DrawCommand::Translate(x, y));
    }

    pub fn rotate(&mut self, angle: f32) {
        self.push(DrawCommand::Rotate(angle));
    }

    pub fn fill(&mut self, paint: Paint) {
        self.push(DrawCommand::SetFill(paint));
    }

    pub fn fill_color(&mut self, color: impl Into<String>) {
        self.fill(Paint::Solid(color.into()));
    }

    pub fn shadow(&mut self, color: impl Into<String>, blur: f32) {
        self.push(DrawCommand::SetShadow {
            color: color.into(),
            blur,
        });
    }

    pub fn composite(&mut self, op: Composite) {
        self.push(DrawCommand::SetComposite(op));
    }

    pub fn ellipse(&mut self, x: f32, y: f32, rx: f32, ry: f32) {
        self.ellipse_arc(x, y, rx, ry, 0.0, 0.0, std::f32::consts::TAU);
    }

    #[allow(clippy::too_many_arguments)]
    pub fn ellipse_arc(
        &mut self,
        x: f32,
        y: f32,
        rx: f32,
        ry: f32,
        rotation: f32,
        start: f32,
        end: f32,
    ) {
        self.push(DrawCommand::FillEllipse {
            x,
            y,
            rx,
            ry,
            rotation,
            start,
            end,
        });
    }

    pub fn circle(&mut self, x: f32, y: f32, r: f32) {
        self.push(DrawCommand::FillCircle { x, y, r });
    }

    /// Count commands matching a predicate (handy for assertions)
    pub fn count(&self, pred: impl Fn(&DrawCommand) -> bool) -> usize {
        self.commands.iter().filter(|c| pred(c)).count()
    }
}

/// Build a gradient stop list from borrowed colors
pub fn stops<S: AsRef<str>>(entries: &[(f32, S)]) -> Vec<ColorStop> {
    entries
        .iter()
        .map(|(offset, color)| (*offset, color.as_ref().to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_appends_in_order() {
        let mut list = DisplayList::new();
        list.save();
        list.translate(1.0, 2.0);
        list.circle(0.0, 0.0, 3.0);
        list.restore();
        assert_eq!(
            list.commands,
            vec![
                DrawCommand::Save,
                DrawCommand::Translate(1.0, 2.0),
                DrawCommand::FillCircle { x: 0.0, y: 0.0, r: 3.0 },
                DrawCommand::Restore,
            ]
        );
    }

    #[test]
    fn test_stops_copies_colors() {
        let s = stops(&[(0.0, "#000000"), (1.0, "#ffffff")]);
        assert_eq!(s[1], (1.0, "#ffffff".to_string()));
    }
}
