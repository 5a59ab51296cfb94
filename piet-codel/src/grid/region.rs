use super::image::CodelImage;

/// Walk the 4-connected same-color component containing (x, y), calling
/// `visit` once per cell. Does nothing if the seed is out of bounds.
///
/// Uses an explicit stack, so a large uniform image costs heap rather
/// than call depth.
fn flood_fill(img: &CodelImage, x: u32, y: u32, mut visit: impl FnMut(u32, u32)) {
    if !img.in_bounds(x, y) {
        return;
    }

    let color = img.get(x, y);
    let mut visited = vec![false; img.buf.len()];
    let mut stack = vec![(x, y)];
    visited[img.index(x, y)] = true;

    while let Some((cx, cy)) = stack.pop() {
        visit(cx, cy);

        let neighbors = [
            cx.checked_add(1).map(|nx| (nx, cy)),
            cx.checked_sub(1).map(|nx| (nx, cy)),
            cy.checked_add(1).map(|ny| (cx, ny)),
            cy.checked_sub(1).map(|ny| (cx, ny)),
        ];
        for (nx, ny) in neighbors.into_iter().flatten() {
            if !img.in_bounds(nx, ny) {
                continue;
            }
            let i = img.index(nx, ny);
            if !visited[i] && img.buf[i] == color {
                visited[i] = true;
                stack.push((nx, ny));
            }
        }
    }
}

/// Number of cells in the 4-connected same-color region containing (x, y),
/// the seed included. Out-of-bounds coordinates give 0.
pub fn region_size(img: &CodelImage, x: u32, y: u32) -> u32 {
    let mut count = 0;
    flood_fill(img, x, y, |_, _| count += 1);
    count
}

/// Coordinates of every cell in the region containing (x, y), sorted
/// row-major.
pub fn region_cells(img: &CodelImage, x: u32, y: u32) -> Vec<(u32, u32)> {
    let mut cells = Vec::new();
    flood_fill(img, x, y, |cx, cy| cells.push((cx, cy)));
    cells.sort_unstable_by_key(|&(cx, cy)| (cy, cx));
    cells
}
