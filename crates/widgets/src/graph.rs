use fw_core::{state::GraphState, GraphScale, Series};
use fw_theme::Theme;
use iced::{
    mouse,
    widget::canvas::{self, Canvas, Frame, Geometry, Path, Stroke},
    Element, Length, Point, Rectangle, Renderer, Size,
};

/// Scrolling line graph of the instant, short-average and long-average series.
#[derive(Debug, Default)]
pub struct GraphWidget;

impl GraphWidget {
    pub fn new() -> Self {
        Self
    }

    pub fn view<'a, M: 'a>(&'a self, graph: &'a GraphState, theme: &'a Theme) -> Element<'a, M> {
        Canvas::new(GraphProgram { graph, theme })
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }
}

struct GraphProgram<'a> {
    graph: &'a GraphState,
    theme: &'a Theme,
}

impl<M> canvas::Program<M> for GraphProgram<'_> {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &iced::Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());

        // No range until the first short window has flushed.
        if !self.graph.scale.is_empty() {
            for series in Series::ALL {
                let values: Vec<f64> = self.graph.series(series).iter().copied().collect();
                let points = series_points(&values, self.graph.scale, bounds.size());
                let Some((first, rest)) = points.split_first() else {
                    continue;
                };

                let path = Path::new(|b| {
                    b.move_to(*first);
                    for point in rest {
                        b.line_to(*point);
                    }
                });
                let color = iced::Color::from(self.theme.series_color(series));
                frame.stroke(&path, Stroke::default().with_color(color).with_width(1.0));
            }
        }

        vec![frame.into_geometry()]
    }
}

/// Map series values onto canvas coordinates.
///
/// Values are spread evenly across the width (oldest on the left) and scaled
/// vertically by `scale`, with the range minimum on the bottom edge.
pub fn series_points(values: &[f64], scale: GraphScale, size: Size) -> Vec<Point> {
    let step = if values.len() > 1 {
        size.width / (values.len() - 1) as f32
    } else {
        0.0
    };

    values
        .iter()
        .enumerate()
        .map(|(i, &value)| {
            let y = size.height * (1.0 - scale.normalize(value) as f32);
            Point::new(i as f32 * step, y)
        })
        .collect()
}
