/// 256-entry magnitude → RGB lookup table.
///
/// Built once per renderer: hue sweeps from 280° (violet) at magnitude 0
/// down to 0° (red) at 255, saturation stays at 100 %, and lightness rises
/// from 50 % toward a 95 % cap so loud bins wash toward white.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    entries: Box<[[u8; 3]; 256]>,
}

impl Palette {
    pub fn build() -> Self {
        let mut entries = Box::new([[0u8; 3]; 256]);
        for (i, entry) in entries.iter_mut().enumerate() {
            let t = i as f32 / 255.0;
            let hue = 280.0 - t * 280.0;
            let lightness = (50.0 + t * 35.0).min(95.0);
            *entry = hsl_to_rgb(hue / 360.0, 1.0, lightness / 100.0);
        }
        Self { entries }
    }

    pub fn color(&self, magnitude: u8) -> [u8; 3] {
        self.entries[magnitude as usize]
    }
}

/// Standard HSL → RGB conversion. `h`, `s`, `l` all in `[0, 1]`.
pub fn hsl_to_rgb(h: f32, s: f32, l: f32) -> [u8; 3] {
    if s == 0.0 {
        let v = (l * 255.0).round() as u8;
        return [v, v, v];
    }
    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;
    let channel = |mut t: f32| {
        if t < 0.0 {
            t += 1.0;
        }
        if t > 1.0 {
            t -= 1.0;
        }
        let value = if t < 1.0 / 6.0 {
            p + (q - p) * 6.0 * t
        } else if t < 1.0 / 2.0 {
            q
        } else if t < 2.0 / 3.0 {
            p + (q - p) * (2.0 / 3.0 - t) * 6.0
        } else {
            p
        };
        (value * 255.0).round() as u8
    };
    [channel(h + 1.0 / 3.0), channel(h), channel(h - 1.0 / 3.0)]
}
