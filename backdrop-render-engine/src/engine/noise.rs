//! CPU mirror of the lattice noise used by both WGSL programs.
//!
//! `shaders/noise.wgsl` evaluates the same hash and interpolation per pixel.
//! This copy is test-only: it checks the kernel's properties off the GPU and
//! keeps its constants in step with the shader source.

use bevy::math::Vec3;

const HASH_X: Vec3 = Vec3::new(127.1, 311.7, 74.7);
const HASH_Y: Vec3 = Vec3::new(269.5, 183.3, 246.1);
const HASH_Z: Vec3 = Vec3::new(113.5, 271.9, 124.6);
const HASH_SCALE: f32 = 43758.547;

/// Number of octaves summed by [`fbm`].
pub const FBM_OCTAVES: usize = 2;

/// GLSL-style `fract`, always in `[0, 1)`.
fn fract(x: f32) -> f32 {
    x - x.floor()
}

/// Cubic Hermite weight `3f² - 2f³`.
pub fn smoothstep_weight(f: f32) -> f32 {
    f * f * (3.0 - 2.0 * f)
}

/// Pseudo-random value in `[0, 1)` for a lattice corner.
pub fn hash(p: Vec3) -> f32 {
    let projected = Vec3::new(p.dot(HASH_X), p.dot(HASH_Y), p.dot(HASH_Z));
    let value = fract((projected.x + projected.y + projected.z).sin() * HASH_SCALE);
    // Large products can round up to exactly 1.0 in f32.
    value.min(1.0 - f32::EPSILON)
}

/// Smooth value noise in `[0, 1]`, interpolated in x, then y, then z.
pub fn noise3d(p: Vec3) -> f32 {
    let cell = p.floor();
    let local = p - cell;
    let w = Vec3::new(
        smoothstep_weight(local.x),
        smoothstep_weight(local.y),
        smoothstep_weight(local.z),
    );

    let corner = |x: f32, y: f32, z: f32| hash(cell + Vec3::new(x, y, z));

    let nx00 = lerp(corner(0.0, 0.0, 0.0), corner(1.0, 0.0, 0.0), w.x);
    let nx10 = lerp(corner(0.0, 1.0, 0.0), corner(1.0, 1.0, 0.0), w.x);
    let nx01 = lerp(corner(0.0, 0.0, 1.0), corner(1.0, 0.0, 1.0), w.x);
    let nx11 = lerp(corner(0.0, 1.0, 1.0), corner(1.0, 1.0, 1.0), w.x);

    let nxy0 = lerp(nx00, nx10, w.y);
    let nxy1 = lerp(nx01, nx11, w.y);

    lerp(nxy0, nxy1, w.z).clamp(0.0, 1.0)
}

/// Two octaves of [`noise3d`] at doubling frequency and halving amplitude.
pub fn fbm(p: Vec3) -> f32 {
    let mut sum = 0.0;
    let mut amplitude = 0.5;
    let mut frequency = 1.0;
    for _ in 0..FBM_OCTAVES {
        sum += amplitude * noise3d(p * frequency);
        frequency *= 2.0;
        amplitude *= 0.5;
    }
    sum
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOISE_SOURCE: &str = include_str!("../../assets/shaders/noise.wgsl");

    fn wgsl_vec3(v: Vec3) -> String {
        format!("vec3<f32>({}, {}, {})", v.x, v.y, v.z)
    }

    #[test]
    fn shader_uses_the_same_hash_constants() {
        for axis in [HASH_X, HASH_Y, HASH_Z] {
            let literal = wgsl_vec3(axis);
            assert!(NOISE_SOURCE.contains(&literal), "noise.wgsl lacks {literal}");
        }
        assert!(NOISE_SOURCE.contains(&format!("* {HASH_SCALE})")));
        assert!(NOISE_SOURCE.contains(&format!("{}", 1.0 - f32::EPSILON)));
    }

    #[test]
    fn shader_sums_the_same_octaves() {
        let bound = format!("octave < {FBM_OCTAVES};");
        assert!(NOISE_SOURCE.contains(&bound), "noise.wgsl lacks {bound}");
    }

    fn sample_grid() -> impl Iterator<Item = Vec3> {
        (0..24).flat_map(|i| {
            (0..24).flat_map(move |j| {
                (0..6).map(move |k| {
                    Vec3::new(
                        i as f32 * 0.37 - 4.0,
                        j as f32 * 0.53 - 6.0,
                        k as f32 * 1.71 + 0.25,
                    )
                })
            })
        })
    }

    #[test]
    fn noise_is_deterministic() {
        for p in sample_grid() {
            assert_eq!(noise3d(p).to_bits(), noise3d(p).to_bits());
        }
    }

    #[test]
    fn noise_stays_in_unit_range() {
        for p in sample_grid() {
            let n = noise3d(p);
            assert!((0.0..=1.0).contains(&n), "noise3d({p}) = {n}");
            let f = fbm(p);
            assert!((0.0..=0.75).contains(&f), "fbm({p}) = {f}");
        }
    }

    #[test]
    fn noise_matches_hash_on_lattice_corners() {
        let corner = Vec3::new(3.0, -2.0, 5.0);
        assert!((noise3d(corner) - hash(corner)).abs() < 1e-6);
    }

    #[test]
    fn noise_is_continuous_across_cell_faces() {
        let eps = 1e-3;
        for face in [1.0_f32, 2.0, -3.0] {
            let below = noise3d(Vec3::new(face - eps, 0.4, 0.7));
            let above = noise3d(Vec3::new(face + eps, 0.4, 0.7));
            assert!((below - above).abs() < 0.01, "seam at x = {face}");
        }
    }

    #[test]
    fn smoothstep_weight_hits_endpoints() {
        assert_eq!(smoothstep_weight(0.0), 0.0);
        assert_eq!(smoothstep_weight(1.0), 1.0);
        assert_eq!(smoothstep_weight(0.5), 0.5);
    }
}
