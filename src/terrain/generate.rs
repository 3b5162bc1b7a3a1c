//! Elevation grid generators for the built-in terrains.

/// All-zero grid.
pub fn flat(rows: usize, cols: usize) -> Vec<Vec<f32>> {
    vec![vec![0.0; cols]; rows]
}

/// Parallel ridges running north-south: columns alternate between bands of
/// `width` samples at elevation 0 and at `height`.
pub fn stripes(rows: usize, cols: usize, width: usize, height: f32) -> Vec<Vec<f32>> {
    let width = width.max(1);
    let row: Vec<f32> = (0..cols)
        .map(|col| if (col / width) % 2 == 1 { height } else { 0.0 })
        .collect();
    vec![row; rows]
}

/// Smooth hills: a product of sines with the given amplitude and wavelength
/// (both in grid samples), offset so the minimum elevation is zero.
pub fn rolling(rows: usize, cols: usize, amplitude: f32, wavelength: f32) -> Vec<Vec<f32>> {
    let k = std::f32::consts::TAU / wavelength.max(1.0);
    (0..rows)
        .map(|row| {
            (0..cols)
                .map(|col| amplitude * (1.0 + (k * col as f32).sin() * (k * row as f32).cos()))
                .collect()
        })
        .collect()
}
