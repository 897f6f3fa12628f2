use atlaspack_core::Placement;
use image::RgbaImage;

/// Copies `src` into `canvas` at the placement's top-left corner.
///
/// Rotated placements are drawn turned 90° clockwise, so the rendered
/// footprint is `src.height() x src.width()`. Pixels falling outside the
/// canvas are dropped.
pub fn blit_placement(src: &RgbaImage, canvas: &mut RgbaImage, placement: &Placement) {
    blit_rgba(src, canvas, placement.rect.x, placement.rect.y, placement.rotated);
}

pub fn blit_rgba(src: &RgbaImage, canvas: &mut RgbaImage, dx: u32, dy: u32, rotated: bool) {
    let (cw, ch) = canvas.dimensions();
    let (sw, sh) = src.dimensions();
    let (rw, rh) = if rotated { (sh, sw) } else { (sw, sh) };

    for yy in 0..rh {
        let ty = dy + yy;
        if ty >= ch {
            break;
        }
        for xx in 0..rw {
            let tx = dx + xx;
            if tx >= cw {
                break;
            }
            // destination column xx reads source row (sh - 1 - xx)
            let (ix, iy) = if rotated { (yy, sh - 1 - xx) } else { (xx, yy) };
            canvas.put_pixel(tx, ty, *src.get_pixel(ix, iy));
        }
    }
}
