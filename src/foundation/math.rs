pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

pub(crate) fn mul_div255_u8(x: u16, y: u16) -> u8 {
    mul_div255_u16(x, y) as u8
}

/// Scale a premultiplied RGBA8 buffer by `factor` in `[0, 1]` (fade towards transparent).
///
/// Flattened over black this is a fade from black.
pub(crate) fn scale_premul_rgba8_in_place(rgba: &mut [u8], factor: f32) {
    let f = (factor.clamp(0.0, 1.0) * 255.0).round() as u16;
    if f == 255 {
        return;
    }
    for c in rgba.iter_mut() {
        *c = mul_div255_u8(u16::from(*c), f);
    }
}

/// Source-over composite of premultiplied `src` onto premultiplied `dst` (equal sizes).
pub(crate) fn premul_over_in_place(dst: &mut [u8], src: &[u8]) {
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let sa = u16::from(s[3]);
        if sa == 0 {
            continue;
        }
        if sa == 255 {
            d.copy_from_slice(s);
            continue;
        }
        let inv = 255 - sa;
        for i in 0..4 {
            let v = u16::from(s[i]) + mul_div255_u16(u16::from(d[i]), inv);
            d[i] = v.min(255) as u8;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
