//! End-to-end element rendering over realistic data.

use ndarray::Array2;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

use rasterplot::{
    CanvasSize, ColorScheme, Colormap, EmptySpace, Histogram, Plottable, Subplot, TextField,
    DEFAULT_TEXT_COLOR,
};

/// 200x100 matrix of Gaussian samples, mean 0 and sigma 20, fixed seed.
fn gaussian_matrix() -> Array2<f64> {
    let mut rng = StdRng::seed_from_u64(42);
    let normal = Normal::new(0.0, 20.0).unwrap();
    Array2::from_shape_fn((200, 100), |_| normal.sample(&mut rng))
}

#[test]
fn test_histogram_of_gaussian_data() {
    let data = gaussian_matrix();
    let mut hist = Histogram::from_array(&data, Some(50), None, None).unwrap();
    hist.set_text(TextField::Title, "noise distribution", 1.0, DEFAULT_TEXT_COLOR);
    hist.set_text(TextField::XAxis, "ADU", 1.0, DEFAULT_TEXT_COLOR);

    let canvas = hist.generate().unwrap();
    assert!(canvas.width() > 0 && canvas.height() > 0);

    // Every sample is in range, so all of them land in a bin, and the
    // central bins dominate the tails.
    assert_eq!(hist.histogram().iter().sum::<usize>(), 200 * 100);
    let counts = hist.histogram();
    assert!(counts[counts.len() / 2] > counts[0]);
    assert!(counts[counts.len() / 2] > counts[counts.len() - 1]);
}

#[test]
fn test_histogram_explicit_range_discards_tails() {
    let data = gaussian_matrix();
    let hist = Histogram::from_array(&data, Some(20), Some(-10.0), Some(10.0)).unwrap();
    let binned: usize = hist.histogram().iter().sum();
    assert!(binned > 0);
    assert!(binned < 200 * 100);
}

#[test]
fn test_colormap_of_gaussian_data() {
    let data = gaussian_matrix();
    let mut map = Colormap::new(&data, ColorScheme::Viridis).unwrap();
    map.set_text(TextField::Title, "raw frame", 1.0, DEFAULT_TEXT_COLOR);
    map.set_colorbar_precision(0);

    let canvas = map.generate().unwrap();
    // The body never renders below the native 100x200 resolution.
    assert!(canvas.width() >= 100);
    assert!(canvas.height() >= 200);

    let (min, max) = map.value_range();
    assert!(min < 0.0 && max > 0.0);
}

#[test]
fn test_colormap_bounded_range_is_recorded() {
    let data = gaussian_matrix();
    let map =
        Colormap::with_bounds(&data, Some(-20.0), Some(20.0), ColorScheme::Inferno).unwrap();
    assert_eq!(map.value_range(), (-20.0, 20.0));
}

#[test]
fn test_subplot_mixing_all_element_kinds() {
    let data = gaussian_matrix();
    let hist = Histogram::from_array(&data, Some(30), None, None).unwrap();
    let map = Colormap::new(&data, ColorScheme::Plasma).unwrap();
    let inner = Subplot::new(
        vec![Plottable::from(Histogram::from_counts(vec![1, 2, 3]).unwrap())],
        1,
        1,
    )
    .unwrap();

    let elements = vec![
        Plottable::from(hist),
        Plottable::from(map),
        Plottable::from(inner),
        Plottable::from(EmptySpace::new()),
    ];
    let mut grid = Subplot::new(elements, 2, 2).unwrap();
    grid.set_text(TextField::Title, "frame summary", 1.5, DEFAULT_TEXT_COLOR);
    grid.set_canvas_size(CanvasSize::new(0, 0));

    let canvas = grid.generate().unwrap();
    assert!(canvas.width() > 0 && canvas.height() > 0);

    // Every non-placeholder child came out rendered at its own size.
    for index in 0..3 {
        let child = grid.element(index).unwrap();
        assert!(child.is_rendered());
        assert!(!child.canvas_size().is_empty());
    }
}

#[test]
fn test_plottable_clone_does_not_alias() {
    let mut hist = Histogram::from_counts(vec![5, 3, 8]).unwrap();
    hist.generate().unwrap();
    let original = Plottable::from(hist);

    let mut copy = original.clone();
    copy.set_canvas_size(CanvasSize::new(
        original.canvas_size().width + 100,
        original.canvas_size().height + 100,
    ));
    copy.generate().unwrap();

    assert_ne!(copy.canvas_size(), original.canvas_size());
    assert_ne!(copy.canvas().dimensions(), original.canvas().dimensions());
}

#[test]
fn test_requested_size_is_a_floor_not_a_cap() {
    let mut hist = Histogram::from_counts(vec![1]).unwrap();
    hist.set_canvas_size(CanvasSize::new(5, 5));
    let canvas = hist.generate().unwrap();
    assert!(canvas.width() > 5);
    assert!(canvas.height() > 5);

    let data = gaussian_matrix();
    let mut map = Colormap::new(&data, ColorScheme::Viridis).unwrap();
    map.set_canvas_size(CanvasSize::new(1200, 900));
    let canvas = map.generate().unwrap();
    assert_eq!(canvas.dimensions(), (1200, 900));
}

#[test]
fn test_empty_space_fills_grid_cell_exactly() {
    let hist = Histogram::from_counts(vec![2, 4, 6]).unwrap();
    let elements = vec![Plottable::from(hist), Plottable::from(EmptySpace::new())];
    let mut grid = Subplot::new(elements, 1, 2).unwrap();
    let canvas = grid.generate().unwrap();
    assert!(canvas.width() > grid.element(0).unwrap().canvas_size().width);
}
