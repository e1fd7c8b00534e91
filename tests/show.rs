use ndarray::{Array2, Array3};
use quicklook::data::generate::{easter_egg, static_grid};
use quicklook::{show_with, DisplayOptions, Error, NumericGrid, Renderer, Result};
use serde_json::json;

/// Keeps what it was asked to draw instead of opening a window.
#[derive(Default)]
struct RecordingRenderer {
    calls: Vec<(NumericGrid, DisplayOptions)>,
}

impl Renderer for RecordingRenderer {
    fn render(&mut self, grid: &NumericGrid, options: &DisplayOptions) -> Result<()> {
        self.calls.push((grid.clone(), options.clone()));
        Ok(())
    }
}

#[test]
fn non_array_input_is_a_type_error_before_rendering() {
    let mut renderer = RecordingRenderer::default();
    let opts = DisplayOptions::default();

    let err = show_with(json!("not_an_array"), &opts, &mut renderer).unwrap_err();
    assert!(matches!(err, Error::Type(_)));
    let err = show_with(json!(1), &opts, &mut renderer).unwrap_err();
    assert!(matches!(err, Error::Type(_)));
    let err = show_with(json!(3.14159), &opts, &mut renderer).unwrap_err();
    assert!(matches!(err, Error::Type(_)));

    assert!(renderer.calls.is_empty());
}

#[test]
fn json_arrays_are_shown() {
    let mut renderer = RecordingRenderer::default();
    show_with(json!([[0, 1], [2, 3]]), &DisplayOptions::default(), &mut renderer).unwrap();
    assert_eq!(renderer.calls.len(), 1);
    assert_eq!(renderer.calls[0].0.shape(), &[2, 2]);
}

#[test]
fn renderer_receives_display_ready_grid() {
    let mut renderer = RecordingRenderer::default();
    let opts = DisplayOptions::default().with_title("static").with_colormap("magma");
    show_with(&static_grid(12, 8), &opts, &mut renderer).unwrap();

    let (grid, seen_opts) = &renderer.calls[0];
    assert_eq!(grid.shape(), &[8, 12]);
    assert!(grid.values().iter().all(|&v| (0.0..=255.0).contains(&v)));
    assert_eq!(seen_opts, &opts);
}

#[test]
fn colour_grids_reach_renderer_channel_last() {
    let mut renderer = RecordingRenderer::default();
    show_with(&easter_egg(41), &DisplayOptions::default(), &mut renderer).unwrap();
    assert_eq!(renderer.calls[0].0.shape(), &[41, 41, 3]);
}

#[test]
fn pipeline_errors_stop_before_rendering() {
    let mut renderer = RecordingRenderer::default();
    let opts = DisplayOptions::default();

    let nan = Array2::from_elem((3, 3), f64::NAN);
    assert!(matches!(show_with(&nan, &opts, &mut renderer), Err(Error::Domain(_))));

    let four_d = ndarray::Array4::<f64>::ones((2, 2, 2, 2));
    assert!(matches!(show_with(&four_d, &opts, &mut renderer), Err(Error::Shape(_))));

    let nan_clip = DisplayOptions {
        clip_percentile: Some(f64::NAN),
        ..Default::default()
    };
    let grid = Array3::<f64>::ones((4, 4, 3));
    assert!(matches!(show_with(&grid, &nan_clip, &mut renderer), Err(Error::Type(_))));

    assert!(renderer.calls.is_empty());
}
