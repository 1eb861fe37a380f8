use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use image::{Rgb, RgbImage};

/// Peak added on top of the sine carrier.
fn bump(t: f64, centre: f64, width: f64, height: f64) -> f64 {
    let z = (t - centre) / width;
    height * (-0.5 * z * z).exp()
}

/// Reproducible jitter for sample data (SplitMix64 stream).
struct Jitter(u64);

impl Jitter {
    fn seeded(seed: u64) -> Self {
        Jitter(seed)
    }

    fn next_bits(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Uniform value in `[-amplitude, amplitude)`.
    fn around_zero(&mut self, amplitude: f64) -> f64 {
        let unit = (self.next_bits() >> 11) as f64 / (1u64 << 53) as f64;
        (2.0 * unit - 1.0) * amplitude
    }
}

/// Diagonal RGB gradient with a little per-pixel noise.
fn gradient_image(width: u32, height: u32, tint: [f64; 3], noise: &mut Jitter) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        let t = (x + y) as f64 / (width + height - 2).max(1) as f64;
        let mut px = [0u8; 3];
        for (c, slot) in px.iter_mut().enumerate() {
            let v = 255.0 * t * tint[c] + noise.around_zero(10.0);
            *slot = v.clamp(0.0, 255.0) as u8;
        }
        Rgb(px)
    })
}

/// Noisy sine carrier with a gaussian bump, one row per sample.
fn write_signal(path: &Path, n: usize, peak_at: f64, noise: &mut Jitter) -> Result<()> {
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("creating {}", path.display()))?;
    writer.write_record(["time", "signal"])?;
    for i in 0..n {
        let t = i as f64 * 0.01;
        let signal = (2.0 * std::f64::consts::PI * 1.5 * t).sin()
            + bump(t, peak_at, 0.05, 2.0)
            + noise.around_zero(0.25);
        writer.write_record([format!("{t:.2}"), format!("{signal:.6}")])?;
    }
    writer.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let out_dir = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("sample_data"));
    fs::create_dir_all(&out_dir).with_context(|| format!("creating {}", out_dir.display()))?;

    let mut noise = Jitter::seeded(42);

    let images = [
        ("sunset.png", 64, 48, [1.0, 0.55, 0.2]),
        ("ocean.png", 32, 32, [0.1, 0.5, 1.0]),
        ("forest.jpg", 80, 60, [0.2, 0.9, 0.3]),
    ];
    for (name, w, h, tint) in images {
        let path = out_dir.join(name);
        gradient_image(w, h, tint, &mut noise)
            .save(&path)
            .with_context(|| format!("writing {}", path.display()))?;
    }

    let signals = [("sensor_a.csv", 500, 1.2), ("sensor_b.csv", 250, 0.8)];
    for (name, n, peak_at) in signals {
        write_signal(&out_dir.join(name), n, peak_at, &mut noise)?;
    }

    fs::write(out_dir.join("notes.txt"), "not processed: unknown extension\n")?;

    println!(
        "Wrote {} images and {} signal tables to {}",
        images.len(),
        signals.len(),
        out_dir.display()
    );
    Ok(())
}
