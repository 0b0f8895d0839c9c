//! End-to-end figure composition tests (no font, so only segment glyphs).

use field_common::FieldError;
use renderer::calibrate::calibrate;
use renderer::colorbar::ColorbarOrientation;
use renderer::colormap::Colormap;
use renderer::figure::{encode_png, Figure, FigureOptions};
use renderer::overlay::Marker;
use renderer::plot::{render_field, RenderMode, RenderedPlot};
use renderer::text::TextPainter;
use renderer::viewport::PixelRect;
use test_utils::wavefield_snapshot;

fn options(colorbar: Option<ColorbarOrientation>) -> FigureOptions {
    FigureOptions {
        width: 600,
        height: 400,
        title: Some("Wavefield".to_string()),
        colorbar,
        ..FigureOptions::default()
    }
}

fn plot_for(figure: &Figure) -> RenderedPlot {
    let field = wavefield_snapshot(8, 4, 5);
    let limits = calibrate(field.values(), None, None, true, None).unwrap();
    let colormap = Colormap::by_name("seismic").unwrap();
    render_field(
        &field,
        RenderMode::FilledContour,
        limits,
        &colormap,
        &figure.render_options(Some(32)),
    )
    .unwrap()
}

/// Data box of the placed plot in figure pixels.
fn placed_data_rect(figure: &Figure, plot: &RenderedPlot) -> PixelRect {
    let origin = figure.layout().plot;
    let inner = plot.viewport().data_rect();
    PixelRect::new(origin.x + inner.x, origin.y + inner.y, inner.width, inner.height)
}

fn is_white(image: &image::RgbaImage, x: f32, y: f32) -> bool {
    let p = image.get_pixel(x.round() as u32, y.round() as u32);
    p.0 == [255, 255, 255, 255]
}

// ============================================================================
// Composition
// ============================================================================

#[test]
fn test_figure_with_vertical_colorbar() {
    let mut figure = Figure::new(options(Some(ColorbarOrientation::Vertical))).unwrap();
    let plot = plot_for(&figure);
    let rect = placed_data_rect(&figure, &plot);

    figure.place_plot(&plot);
    figure.place_colorbar(&plot).unwrap();
    let image = figure.finish(&TextPainter::none()).unwrap();

    assert_eq!(image.dimensions(), (600, 400));
    // Field inside the data box, bar to its right.
    assert!(!is_white(&image, rect.x + rect.width / 2.0, rect.y + rect.height / 2.0 + 20.0));
    assert!(!is_white(&image, rect.right() + 29.0, rect.y + 5.0));
    assert!(!is_white(&image, rect.right() + 29.0, rect.bottom() - 5.0));
    // Top-left corner stays background.
    assert!(is_white(&image, 2.0, 2.0));
}

#[test]
fn test_figure_with_horizontal_colorbar() {
    let mut figure = Figure::new(options(Some(ColorbarOrientation::Horizontal))).unwrap();
    let plot = plot_for(&figure);
    let rect = placed_data_rect(&figure, &plot);

    figure.place_plot(&plot);
    figure.place_colorbar(&plot).unwrap();
    let image = figure.finish(&TextPainter::none()).unwrap();

    // Bar below the x tick labels: TICK_LENGTH + 2 * font + gap.
    let bar_y = rect.bottom() + 5.0 + 24.0 + 20.0 + 9.0;
    assert!(!is_white(&image, rect.x + 5.0, bar_y));
    assert!(!is_white(&image, rect.right() - 5.0, bar_y));
}

#[test]
fn test_without_colorbar_nothing_right_of_plot() {
    let mut options = options(None);
    options.title = None;
    let mut figure = Figure::new(options).unwrap();
    let plot = plot_for(&figure);

    figure.place_plot(&plot);
    figure.place_colorbar(&plot).unwrap();
    let image = figure.finish(&TextPainter::none()).unwrap();

    let right_edge = (599u32, 200u32);
    assert_eq!(image.get_pixel(right_edge.0, right_edge.1).0, [255, 255, 255, 255]);
}

#[test]
fn test_colorbar_needs_placed_plot() {
    let mut figure = Figure::new(options(Some(ColorbarOrientation::Vertical))).unwrap();
    let plot = plot_for(&figure);
    let err = figure.place_colorbar(&plot).unwrap_err();
    assert!(matches!(err, FieldError::RenderError(_)));
}

#[test]
fn test_render_options_match_layout() {
    let figure = Figure::new(options(Some(ColorbarOrientation::Vertical))).unwrap();
    let render = figure.render_options(None);
    let layout = figure.layout();
    assert_eq!(render.width, layout.plot.width as u32);
    assert_eq!(render.height, layout.plot.height as u32);
    assert_eq!(render.levels, 64);
}

#[test]
fn test_figure_too_small_is_rejected() {
    let err = Figure::new(FigureOptions {
        width: 50,
        height: 50,
        ..FigureOptions::default()
    })
    .unwrap_err();
    assert!(matches!(err, FieldError::InvalidArgument { .. }));
}

#[test]
fn test_station_labels_inside_data_box() {
    let mut figure = Figure::new(options(None)).unwrap();
    let plot = plot_for(&figure);
    figure.place_plot(&plot);

    let marker = |x: f64, y: f64, label: Option<&str>| Marker {
        x,
        y,
        label: label.map(str::to_string),
    };
    let markers = vec![
        marker(500.0, -500.0, Some("S0001")),
        marker(3500.0, -1500.0, Some("S0002")),
        marker(9000.0, -10.0, Some("FAR")),
        marker(1000.0, -1000.0, None),
    ];
    assert_eq!(figure.label_markers(&plot, &markers, 8.0), 2);
    assert!(figure.finish(&TextPainter::none()).is_ok());
}

// ============================================================================
// Output
// ============================================================================

#[test]
fn test_encoded_figure_decodes() {
    let mut figure = Figure::new(options(Some(ColorbarOrientation::Vertical))).unwrap();
    let plot = plot_for(&figure);
    figure.place_plot(&plot);
    figure.place_colorbar(&plot).unwrap();
    let image = figure.finish(&TextPainter::none()).unwrap();

    let png = encode_png(&image).unwrap();
    let decoded = image::load_from_memory(&png).unwrap().to_rgba8();
    assert_eq!(decoded.as_raw(), image.as_raw());
}
