use super::image::CodelImage;

/// Shrink an image by `codel_size`, one output pixel per codel block.
///
/// The output is `floor(w / codel_size)` × `floor(h / codel_size)`. Each
/// output pixel takes the color at the centre of its block, so no blended
/// colors are introduced. Partial blocks at the right and bottom edges are
/// dropped.
pub fn downscale(img: &CodelImage, codel_size: u32) -> CodelImage {
    if codel_size <= 1 {
        return img.clone();
    }

    let f = codel_size;
    let out_w = img.width / f;
    let out_h = img.height / f;
    let half = f / 2;

    let buf = (0..out_h)
        .flat_map(|oy| (0..out_w).map(move |ox| (ox, oy)))
        .map(|(ox, oy)| img.get(ox * f + half, oy * f + half))
        .collect();

    CodelImage {
        width: out_w,
        height: out_h,
        buf,
    }
}
